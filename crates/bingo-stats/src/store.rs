//! Persistence for the stats record
//!
//! A single record under a fixed key, read once at startup and written
//! wholesale after every change.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use bingo_core::BingoResult;
use parking_lot::Mutex;

use crate::aggregate::StatsAggregate;

/// Fixed identifier of the persisted stats record
pub const STATS_KEY: &str = "bingo-stats";

/// Get/set store for the stats record
pub trait StatsStore {
    /// Read the record, `Ok(None)` when nothing was saved yet
    fn load(&self) -> BingoResult<Option<StatsAggregate>>;

    /// Replace the record
    fn save(&mut self, stats: &StatsAggregate) -> BingoResult<()>;
}

// ═══════════════════════════════════════════════════════════════════════════════
// JSON FILE STORE
// ═══════════════════════════════════════════════════════════════════════════════

/// Stores the record as pretty JSON in a single file
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Store at an explicit path
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Store at the platform data directory
    pub fn at_default_location() -> Self {
        Self::new(Self::default_path())
    }

    /// `<data dir>/bingo-night/bingo-stats.json`
    pub fn default_path() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("bingo-night")
            .join(format!("{STATS_KEY}.json"))
    }

    /// File backing this store
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StatsStore for JsonFileStore {
    fn load(&self) -> BingoResult<Option<StatsAggregate>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let stats = serde_json::from_str(&content)?;
        Ok(Some(stats))
    }

    fn save(&mut self, stats: &StatsAggregate) -> BingoResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(stats)?;
        fs::write(&self.path, json)?;
        log::debug!("Stats saved to {:?}", self.path);
        Ok(())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// IN-MEMORY STORE
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Default)]
struct MemoryState {
    record: Option<StatsAggregate>,
    saves: usize,
}

/// In-memory store; clones share the same record
///
/// Handy for tests and for sessions that should not touch the disk.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<MemoryState>>,
}

impl MemoryStore {
    /// Empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Store that already holds a record
    pub fn with_record(stats: StatsAggregate) -> Self {
        let store = Self::new();
        store.inner.lock().record = Some(stats);
        store
    }

    /// Current record
    pub fn record(&self) -> Option<StatsAggregate> {
        self.inner.lock().record.clone()
    }

    /// Number of saves so far
    pub fn save_count(&self) -> usize {
        self.inner.lock().saves
    }
}

impl StatsStore for MemoryStore {
    fn load(&self) -> BingoResult<Option<StatsAggregate>> {
        Ok(self.inner.lock().record.clone())
    }

    fn save(&mut self, stats: &StatsAggregate) -> BingoResult<()> {
        let mut state = self.inner.lock();
        state.record = Some(stats.clone());
        state.saves += 1;
        Ok(())
    }
}
