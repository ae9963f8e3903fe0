//! Game mode presets

use std::fmt;
use std::str::FromStr;

use bingo_core::BingoError;
use serde::{Deserialize, Serialize};

/// Selectable game mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GameModeKind {
    /// No time limit, manual marking
    Classic,
    /// Three minute countdown, calls mark the board automatically
    Speed,
    /// No time limit, play for the fewest calls
    Challenge,
}

impl GameModeKind {
    /// All modes in menu order
    pub const ALL: [GameModeKind; 3] = [Self::Classic, Self::Speed, Self::Challenge];
}

impl Default for GameModeKind {
    fn default() -> Self {
        Self::Classic
    }
}

impl fmt::Display for GameModeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(GameMode::from_kind(*self).name)
    }
}

impl FromStr for GameModeKind {
    type Err = BingoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "classic" => Ok(Self::Classic),
            "speed" => Ok(Self::Speed),
            "challenge" => Ok(Self::Challenge),
            other => Err(BingoError::UnknownMode(other.to_string())),
        }
    }
}

/// Immutable mode preset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GameMode {
    pub kind: GameModeKind,
    pub name: &'static str,
    pub description: &'static str,
    /// Countdown length; `None` means untimed
    pub time_limit_secs: Option<u32>,
    /// Calls mark matching cells and check for a win
    pub auto_mark: bool,
    /// Call count is part of the score
    pub track_calls: bool,
}

impl GameMode {
    /// Traditional bingo, no time limit
    pub const fn classic() -> Self {
        Self {
            kind: GameModeKind::Classic,
            name: "Classic",
            description: "Traditional bingo with no time limit",
            time_limit_secs: None,
            auto_mark: false,
            track_calls: false,
        }
    }

    /// Race the clock: 180 seconds, auto-marking
    pub const fn speed() -> Self {
        Self {
            kind: GameModeKind::Speed,
            name: "Speed",
            description: "Race against time to get bingo!",
            time_limit_secs: Some(180),
            auto_mark: true,
            track_calls: false,
        }
    }

    /// Bingo in as few calls as possible
    pub const fn challenge() -> Self {
        Self {
            kind: GameModeKind::Challenge,
            name: "Challenge",
            description: "Get bingo with the fewest calls possible",
            time_limit_secs: None,
            auto_mark: false,
            track_calls: true,
        }
    }

    /// Preset for a kind
    pub const fn from_kind(kind: GameModeKind) -> Self {
        match kind {
            GameModeKind::Classic => Self::classic(),
            GameModeKind::Speed => Self::speed(),
            GameModeKind::Challenge => Self::challenge(),
        }
    }

    /// All presets in menu order
    pub fn all() -> [GameMode; 3] {
        GameModeKind::ALL.map(Self::from_kind)
    }

    /// Is this a timed mode
    pub fn is_timed(&self) -> bool {
        self.time_limit_secs.is_some()
    }
}

impl Default for GameMode {
    fn default() -> Self {
        Self::classic()
    }
}

/// Format seconds as `m:ss` for countdown displays
pub fn format_clock(secs: u32) -> String {
    format!("{}:{:02}", secs / 60, secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets() {
        let speed = GameMode::speed();
        assert_eq!(speed.time_limit_secs, Some(180));
        assert!(speed.auto_mark);
        assert!(speed.is_timed());

        let classic = GameMode::classic();
        assert!(!classic.is_timed());
        assert!(!classic.auto_mark);

        let challenge = GameMode::challenge();
        assert!(challenge.track_calls);
        assert!(!challenge.is_timed());
    }

    #[test]
    fn test_from_kind_round_trip() {
        for mode in GameMode::all() {
            assert_eq!(GameMode::from_kind(mode.kind), mode);
        }
    }

    #[test]
    fn test_parse_kind() {
        assert_eq!("Speed".parse::<GameModeKind>().unwrap(), GameModeKind::Speed);
        assert_eq!(" CLASSIC ".parse::<GameModeKind>().unwrap(), GameModeKind::Classic);
        assert!(matches!(
            "blitz".parse::<GameModeKind>(),
            Err(BingoError::UnknownMode(_))
        ));
    }

    #[test]
    fn test_kind_serializes_upper_case() {
        let json = serde_json::to_string(&GameModeKind::Challenge).unwrap();
        assert_eq!(json, "\"CHALLENGE\"");
    }

    #[test]
    fn test_format_clock() {
        assert_eq!(format_clock(180), "3:00");
        assert_eq!(format_clock(65), "1:05");
        assert_eq!(format_clock(0), "0:00");
    }
}
