//! Sound effect cues
//!
//! The engine decides *when* a cue plays; an [`AudioOutput`] decides how.
//! Clips that fail to load are skipped, and playing a missing clip is a no-op.

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Sound effect identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SoundKey {
    /// Every call attempt
    Call,
    /// A cell marked by auto-mark
    Mark,
    /// Round won
    Win,
    /// Round timed out
    Error,
}

impl SoundKey {
    pub const ALL: [SoundKey; 4] = [Self::Call, Self::Mark, Self::Win, Self::Error];

    /// Bundled asset path
    pub fn default_path(&self) -> &'static str {
        match self {
            Self::Call => "sounds/call.mp3",
            Self::Mark => "sounds/mark.mp3",
            Self::Win => "sounds/win.mp3",
            Self::Error => "sounds/error.mp3",
        }
    }
}

impl fmt::Display for SoundKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Call => "CALL",
            Self::Mark => "MARK",
            Self::Win => "WIN",
            Self::Error => "ERROR",
        };
        f.write_str(name)
    }
}

/// Asset file per cue
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SoundPaths {
    pub call: PathBuf,
    pub mark: PathBuf,
    pub win: PathBuf,
    pub error: PathBuf,
}

impl SoundPaths {
    /// Path configured for a cue
    pub fn path(&self, key: SoundKey) -> &Path {
        match key {
            SoundKey::Call => &self.call,
            SoundKey::Mark => &self.mark,
            SoundKey::Win => &self.win,
            SoundKey::Error => &self.error,
        }
    }

    /// Resolve every path against a base directory
    pub fn relative_to(&self, base: &Path) -> Self {
        Self {
            call: base.join(&self.call),
            mark: base.join(&self.mark),
            win: base.join(&self.win),
            error: base.join(&self.error),
        }
    }
}

impl Default for SoundPaths {
    fn default() -> Self {
        Self {
            call: SoundKey::Call.default_path().into(),
            mark: SoundKey::Mark.default_path().into(),
            win: SoundKey::Win.default_path().into(),
            error: SoundKey::Error.default_path().into(),
        }
    }
}

/// Audio device seam
pub trait AudioOutput {
    /// Play a decoded-or-raw clip; best effort
    fn play(&mut self, key: SoundKey, clip: &[u8]);
}

/// Discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NullAudio;

impl AudioOutput for NullAudio {
    fn play(&mut self, _key: SoundKey, _clip: &[u8]) {}
}

/// Preloaded clips plus the on/off switch
pub struct SoundBank {
    enabled: bool,
    clips: HashMap<SoundKey, Vec<u8>>,
    output: Box<dyn AudioOutput>,
}

impl SoundBank {
    /// Read every configured clip; unreadable files are logged and skipped
    pub fn preload(paths: &SoundPaths, output: impl AudioOutput + 'static) -> Self {
        let mut clips = HashMap::new();
        for key in SoundKey::ALL {
            let path = paths.path(key);
            match fs::read(path) {
                Ok(bytes) => {
                    log::debug!("Loaded sound {} from {}", key, path.display());
                    clips.insert(key, bytes);
                }
                Err(e) => log::warn!("Failed to load sound {} ({}): {}", key, path.display(), e),
            }
        }

        Self {
            enabled: true,
            clips,
            output: Box::new(output),
        }
    }

    /// Bank with in-memory clips
    pub fn with_clips(
        clips: impl IntoIterator<Item = (SoundKey, Vec<u8>)>,
        output: impl AudioOutput + 'static,
    ) -> Self {
        Self {
            enabled: true,
            clips: clips.into_iter().collect(),
            output: Box::new(output),
        }
    }

    /// Bank with no clips; every cue is silent
    pub fn silent() -> Self {
        Self {
            enabled: true,
            clips: HashMap::new(),
            output: Box::new(NullAudio),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Is a clip available for this cue
    pub fn is_loaded(&self, key: SoundKey) -> bool {
        self.clips.contains_key(&key)
    }

    /// Play a cue if sound is on and the clip loaded
    pub fn play(&mut self, key: SoundKey) {
        if !self.enabled {
            return;
        }
        if let Some(clip) = self.clips.get(&key) {
            self.output.play(key, clip);
        }
    }
}

impl fmt::Debug for SoundBank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut loaded: Vec<SoundKey> = self.clips.keys().copied().collect();
        loaded.sort_by_key(|key| *key as u8);
        f.debug_struct("SoundBank")
            .field("enabled", &self.enabled)
            .field("loaded", &loaded)
            .finish_non_exhaustive()
    }
}
