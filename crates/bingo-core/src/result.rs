//! Outcome of a finished round

use serde::{Deserialize, Serialize};

/// Produced once per round when it ends, consumed by the stats tracker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameResult {
    /// Round ended with a bingo
    pub won: bool,
    /// Display name of the mode the round was played in
    pub mode_name: String,
    /// Whole seconds from board generation to round end
    pub elapsed_secs: Option<u64>,
    /// Items called during the round
    pub call_count: u32,
}

impl GameResult {
    /// A winning round
    pub fn win(mode_name: impl Into<String>, elapsed_secs: Option<u64>, call_count: u32) -> Self {
        Self {
            won: true,
            mode_name: mode_name.into(),
            elapsed_secs,
            call_count,
        }
    }

    /// A lost (timed out) round
    pub fn loss(mode_name: impl Into<String>, elapsed_secs: Option<u64>, call_count: u32) -> Self {
        Self {
            won: false,
            mode_name: mode_name.into(),
            elapsed_secs,
            call_count,
        }
    }
}
