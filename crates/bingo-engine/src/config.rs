//! Engine configuration

use std::fs;
use std::path::{Path, PathBuf};

use bingo_core::{BingoError, BingoResult};
use serde::{Deserialize, Serialize};

use crate::audio::SoundPaths;
use crate::mode::GameModeKind;
use crate::speech::SpeechConfig;

/// Default auto-play cadence (ms)
pub const DEFAULT_AUTO_PLAY_INTERVAL_MS: u64 = 3000;

/// Default countdown poll cadence (ms)
pub const DEFAULT_COUNTDOWN_INTERVAL_MS: u64 = 1000;

/// Session configuration
///
/// Every field has a default, so a config file only needs the keys it
/// changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Mode selected when the session opens
    pub starting_mode: GameModeKind,

    /// Time between automatic calls (ms)
    pub auto_play_interval_ms: u64,

    /// Time between countdown polls (ms)
    pub countdown_interval_ms: u64,

    /// Sound effects on at startup
    pub sound_enabled: bool,

    /// Sound effect files
    pub sounds: SoundPaths,

    /// Caller voice settings
    pub speech: SpeechConfig,

    /// Stats file; platform data directory when unset
    pub stats_path: Option<PathBuf>,

    /// Content pool file; built-in pool when unset
    pub content_pool: Option<PathBuf>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            starting_mode: GameModeKind::Classic,
            auto_play_interval_ms: DEFAULT_AUTO_PLAY_INTERVAL_MS,
            countdown_interval_ms: DEFAULT_COUNTDOWN_INTERVAL_MS,
            sound_enabled: true,
            sounds: SoundPaths::default(),
            speech: SpeechConfig::default(),
            stats_path: None,
            content_pool: None,
        }
    }
}

impl EngineConfig {
    /// Parse from YAML
    pub fn from_yaml_str(yaml: &str) -> BingoResult<Self> {
        let config: Self = serde_yml::from_str(yaml)?;
        config.validated()
    }

    /// Parse from JSON
    pub fn from_json_str(json: &str) -> BingoResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validated()
    }

    /// Load from a `.yaml`, `.yml` or `.json` file
    pub fn load<P: AsRef<Path>>(path: P) -> BingoResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let config = match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml_str(&content)?,
            Some("json") => Self::from_json_str(&content)?,
            _ => {
                return Err(BingoError::Config(format!(
                    "Unsupported config format: {}",
                    path.display()
                )));
            }
        };
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Export as pretty JSON
    pub fn export_json(&self) -> BingoResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    fn validated(self) -> BingoResult<Self> {
        if self.auto_play_interval_ms == 0 {
            return Err(BingoError::Config(
                "auto_play_interval_ms must be greater than zero".into(),
            ));
        }
        if self.countdown_interval_ms == 0 {
            return Err(BingoError::Config(
                "countdown_interval_ms must be greater than zero".into(),
            ));
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.auto_play_interval_ms, 3000);
        assert_eq!(config.countdown_interval_ms, 1000);
        assert_eq!(config.starting_mode, GameModeKind::Classic);
        assert!(config.sound_enabled);
    }

    #[test]
    fn test_partial_yaml() {
        let yaml = "starting_mode: SPEED\nsound_enabled: false\nspeech:\n  rate: 1.2\n";
        let config = EngineConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.starting_mode, GameModeKind::Speed);
        assert!(!config.sound_enabled);
        assert_eq!(config.speech.rate, 1.2);
        assert_eq!(config.speech.pitch, SpeechConfig::default().pitch);
        assert_eq!(config.auto_play_interval_ms, 3000);
    }

    #[test]
    fn test_json_round_trip() {
        let config = EngineConfig {
            auto_play_interval_ms: 1500,
            stats_path: Some(PathBuf::from("/tmp/stats.json")),
            ..Default::default()
        };
        let json = config.export_json().unwrap();
        assert_eq!(EngineConfig::from_json_str(&json).unwrap(), config);
    }

    #[test]
    fn test_zero_interval_rejected() {
        let err = EngineConfig::from_json_str(r#"{"auto_play_interval_ms": 0}"#).unwrap_err();
        assert!(matches!(err, BingoError::Config(_)));
    }

    #[test]
    fn test_load_by_extension() {
        let dir = tempfile::tempdir().unwrap();

        let yaml = dir.path().join("bingo.yml");
        fs::write(&yaml, "countdown_interval_ms: 500\n").unwrap();
        assert_eq!(EngineConfig::load(&yaml).unwrap().countdown_interval_ms, 500);

        let toml = dir.path().join("bingo.toml");
        fs::write(&toml, "").unwrap();
        assert!(matches!(EngineConfig::load(&toml), Err(BingoError::Config(_))));
    }
}
