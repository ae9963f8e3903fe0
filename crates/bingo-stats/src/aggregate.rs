//! Running statistics across all rounds

use bingo_core::GameResult;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum number of wins kept in the history
pub const WIN_HISTORY_LIMIT: usize = 10;

/// One entry of the win history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WinRecord {
    /// When the round was won
    pub date: DateTime<Utc>,
    /// Mode display name
    pub mode: String,
    /// Seconds taken, if measured
    #[serde(rename = "time", default)]
    pub elapsed_secs: Option<u64>,
    /// Items called before the win
    #[serde(rename = "calls", default)]
    pub call_count: u32,
}

/// Lifetime statistics
///
/// Field names serialize in camelCase so records written by earlier
/// versions of the game load unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StatsAggregate {
    pub games_played: u32,
    pub games_won: u32,
    #[serde(rename = "fastestWin")]
    pub fastest_win_secs: Option<u64>,
    pub fewest_calls: Option<u32>,
    #[serde(rename = "totalPlayTime")]
    pub total_play_time_secs: u64,
    /// Most recent first, at most [`WIN_HISTORY_LIMIT`] entries
    pub win_history: Vec<WinRecord>,
}

impl StatsAggregate {
    /// Fold a finished round into the aggregate
    pub fn fold(mut self, result: &GameResult, now: DateTime<Utc>) -> Self {
        self.games_played = self.games_played.saturating_add(1);

        if result.won {
            self.games_won = self.games_won.saturating_add(1);

            if let Some(elapsed) = result.elapsed_secs {
                self.fastest_win_secs = Some(
                    self.fastest_win_secs
                        .map_or(elapsed, |best| best.min(elapsed)),
                );
            }
            self.fewest_calls = Some(
                self.fewest_calls
                    .map_or(result.call_count, |best| best.min(result.call_count)),
            );

            self.win_history.insert(
                0,
                WinRecord {
                    date: now,
                    mode: result.mode_name.clone(),
                    elapsed_secs: result.elapsed_secs,
                    call_count: result.call_count,
                },
            );
            self.win_history.truncate(WIN_HISTORY_LIMIT);
        }

        if let Some(elapsed) = result.elapsed_secs {
            self.total_play_time_secs = self.total_play_time_secs.saturating_add(elapsed);
        }

        self
    }

    /// Win percentage (0-100)
    pub fn win_rate(&self) -> f64 {
        if self.games_played > 0 {
            (self.games_won as f64 / self.games_played as f64) * 100.0
        } else {
            0.0
        }
    }

    /// Most recent win, if any
    pub fn last_win(&self) -> Option<&WinRecord> {
        self.win_history.first()
    }
}
