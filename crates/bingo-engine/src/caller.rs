//! Call sequencing: draw items without repeats until the pool is exhausted

use bingo_core::{BingoError, BingoResult, ContentPool, ItemId};
use rand::Rng;
use rand::seq::IndexedRandom;

/// Called items, most recent first
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallLog {
    calls: Vec<ItemId>,
}

impl CallLog {
    /// Empty log
    pub fn new() -> Self {
        Self::default()
    }

    /// Has this item been called in the current cycle
    pub fn contains(&self, id: ItemId) -> bool {
        self.calls.contains(&id)
    }

    /// Most recent call
    pub fn latest(&self) -> Option<ItemId> {
        self.calls.first().copied()
    }

    /// Calls in the current cycle
    pub fn len(&self) -> usize {
        self.calls.len()
    }

    /// No calls yet
    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }

    /// Iterate most recent first
    pub fn iter(&self) -> impl Iterator<Item = ItemId> + '_ {
        self.calls.iter().copied()
    }

    /// Forget all calls
    pub fn clear(&mut self) {
        self.calls.clear();
    }

    fn push_latest(&mut self, id: ItemId) {
        self.calls.insert(0, id);
    }
}

/// Result of one call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallOutcome {
    /// The item drawn
    pub item: ItemId,
    /// The log was full and got cleared before this draw
    pub exhausted_reset: bool,
}

/// Draw the next item uniformly from those not yet called
///
/// When every callable item is already in the log, the log is cleared first
/// and the draw starts a new cycle, so auto-play never stalls. The new cycle
/// may open with the item that closed the previous one.
pub fn call_next<R: Rng + ?Sized>(
    pool: &ContentPool,
    log: &mut CallLog,
    rng: &mut R,
) -> BingoResult<CallOutcome> {
    let callable = pool.callable_ids();
    if callable.is_empty() {
        return Err(BingoError::PoolTooSmall {
            found: 0,
            required: 1,
        });
    }

    let exhausted_reset = callable.iter().all(|&id| log.contains(id));
    if exhausted_reset {
        log::debug!("All {} items called, starting a new cycle", callable.len());
        log.clear();
    }

    let available: Vec<ItemId> = callable
        .into_iter()
        .filter(|&id| !log.contains(id))
        .collect();
    let item = *available.choose(rng).ok_or(BingoError::PoolTooSmall {
        found: 0,
        required: 1,
    })?;

    log.push_latest(item);
    Ok(CallOutcome {
        item,
        exhausted_reset,
    })
}
