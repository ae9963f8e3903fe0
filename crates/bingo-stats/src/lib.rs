//! bingo-stats: Lifetime statistics for Bingo Night
//!
//! Folds finished rounds into a running [`StatsAggregate`] and persists it
//! after every update through a [`StatsStore`].

mod aggregate;
mod store;
mod tracker;

pub use aggregate::*;
pub use store::*;
pub use tracker::*;
