//! Bingo Night game engine
//!
//! Board generation, call sequencing, win detection, game modes and the
//! session that ties them together.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use bingo_core::ContentPool;
//! use bingo_engine::{EngineConfig, GameModeKind, GameSession};
//! use bingo_stats::StatsTracker;
//!
//! let mut session = GameSession::with_seed(
//!     ContentPool::standard(),
//!     EngineConfig::default(),
//!     StatsTracker::in_memory(),
//!     42,
//!     0,
//! )?;
//! session.select_mode(GameModeKind::Speed, 0)?;
//! session.toggle_auto_play(0)?;
//! session.tick(3_000)?;
//! ```

pub mod audio;
pub mod board;
pub mod caller;
pub mod config;
pub mod events;
pub mod lines;
pub mod mode;
pub mod session;
pub mod speech;
pub mod timer;

pub use audio::*;
pub use board::*;
pub use caller::*;
pub use config::*;
pub use events::*;
pub use lines::*;
pub use mode::*;
pub use session::*;
pub use speech::*;
pub use timer::*;
