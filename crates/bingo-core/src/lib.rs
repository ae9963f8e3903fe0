//! bingo-core: Shared types for Bingo Night
//!
//! Items and content pools, round results, and the error type used by
//! every other crate in the workspace.

mod error;
mod item;
mod result;

pub use error::*;
pub use item::*;
pub use result::*;
