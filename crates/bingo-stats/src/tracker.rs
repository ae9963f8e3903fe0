//! Stats tracker: owns the aggregate and its store

use bingo_core::GameResult;
use chrono::{DateTime, Utc};

use crate::aggregate::StatsAggregate;
use crate::store::{MemoryStore, StatsStore};

/// Process-wide statistics, persisted after every update
pub struct StatsTracker {
    stats: StatsAggregate,
    store: Box<dyn StatsStore>,
}

impl StatsTracker {
    /// Load stats from the store, falling back to zeroed defaults
    pub fn open(store: impl StatsStore + 'static) -> Self {
        let stats = match store.load() {
            Ok(Some(stats)) => {
                log::info!(
                    "Loaded stats: {} played, {} won",
                    stats.games_played,
                    stats.games_won
                );
                stats
            }
            Ok(None) => StatsAggregate::default(),
            Err(e) => {
                log::warn!("Failed to load stats, starting fresh: {}", e);
                StatsAggregate::default()
            }
        };

        Self {
            stats,
            store: Box::new(store),
        }
    }

    /// Tracker backed by a fresh in-memory store
    pub fn in_memory() -> Self {
        Self::open(MemoryStore::new())
    }

    /// Current aggregate
    pub fn stats(&self) -> &StatsAggregate {
        &self.stats
    }

    /// Fold a finished round in and persist immediately
    pub fn record(&mut self, result: &GameResult, now: DateTime<Utc>) -> &StatsAggregate {
        self.stats = std::mem::take(&mut self.stats).fold(result, now);
        self.persist();
        &self.stats
    }

    /// Restore zeroed defaults and persist them
    pub fn reset(&mut self) -> &StatsAggregate {
        self.stats = StatsAggregate::default();
        self.persist();
        log::info!("Stats reset");
        &self.stats
    }

    fn persist(&mut self) {
        if let Err(e) = self.store.save(&self.stats) {
            log::error!("Failed to persist stats: {}", e);
        }
    }
}

impl std::fmt::Debug for StatsTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatsTracker")
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}
