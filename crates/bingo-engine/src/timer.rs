//! Repeating timers owned by a round
//!
//! Time is a plain millisecond counter supplied by the caller, so the same
//! timers run against a wall clock in the front end and a scripted clock in
//! tests. There is one slot per [`TimerKind`]: starting a timer replaces the
//! previous one of that kind, so a timer can never run twice.

use serde::{Deserialize, Serialize};

/// Timers a round can own
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimerKind {
    /// Once-per-second countdown poll in timed modes
    Countdown,
    /// Automatic call cadence while auto-play is on
    AutoPlay,
}

/// A single repeating timer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepeatingTimer {
    period_ms: u64,
    next_due_ms: u64,
    fired: u64,
}

impl RepeatingTimer {
    /// First tick one period after `now_ms`
    pub fn new(period_ms: u64, now_ms: u64) -> Self {
        let period_ms = period_ms.max(1);
        Self {
            period_ms,
            next_due_ms: now_ms.saturating_add(period_ms),
            fired: 0,
        }
    }

    /// Timestamp of the next tick
    pub fn next_due_ms(&self) -> u64 {
        self.next_due_ms
    }

    /// Tick interval
    pub fn period_ms(&self) -> u64 {
        self.period_ms
    }

    /// Ticks delivered so far
    pub fn fired(&self) -> u64 {
        self.fired
    }

    fn is_due(&self, now_ms: u64) -> bool {
        self.next_due_ms <= now_ms
    }

    fn advance(&mut self) {
        self.next_due_ms = self.next_due_ms.saturating_add(self.period_ms);
        self.fired += 1;
    }
}

/// A due tick popped from [`Timers`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerTick {
    pub kind: TimerKind,
    /// When the tick was scheduled, not when it was observed
    pub due_ms: u64,
}

/// Countdown and auto-play timers of the active round
#[derive(Debug, Clone, Default)]
pub struct Timers {
    countdown: Option<RepeatingTimer>,
    auto_play: Option<RepeatingTimer>,
}

impl Timers {
    /// No timers running
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self, kind: TimerKind) -> &Option<RepeatingTimer> {
        match kind {
            TimerKind::Countdown => &self.countdown,
            TimerKind::AutoPlay => &self.auto_play,
        }
    }

    fn slot_mut(&mut self, kind: TimerKind) -> &mut Option<RepeatingTimer> {
        match kind {
            TimerKind::Countdown => &mut self.countdown,
            TimerKind::AutoPlay => &mut self.auto_play,
        }
    }

    /// Start (or restart) a timer; returns true if one was replaced
    pub fn start(&mut self, kind: TimerKind, period_ms: u64, now_ms: u64) -> bool {
        let replaced = self
            .slot_mut(kind)
            .replace(RepeatingTimer::new(period_ms, now_ms))
            .is_some();
        log::debug!("Timer {:?} started ({} ms period)", kind, period_ms);
        replaced
    }

    /// Cancel a timer; returns true if it was running
    pub fn cancel(&mut self, kind: TimerKind) -> bool {
        let was_running = self.slot_mut(kind).take().is_some();
        if was_running {
            log::debug!("Timer {:?} cancelled", kind);
        }
        was_running
    }

    /// Cancel everything; returns how many were running
    pub fn cancel_all(&mut self) -> usize {
        [TimerKind::Countdown, TimerKind::AutoPlay]
            .into_iter()
            .filter(|&kind| self.cancel(kind))
            .count()
    }

    /// Is this timer running
    pub fn is_active(&self, kind: TimerKind) -> bool {
        self.slot(kind).is_some()
    }

    /// Number of running timers
    pub fn active_count(&self) -> usize {
        usize::from(self.countdown.is_some()) + usize::from(self.auto_play.is_some())
    }

    /// Timer state, if running
    pub fn get(&self, kind: TimerKind) -> Option<&RepeatingTimer> {
        self.slot(kind).as_ref()
    }

    /// Pop the earliest tick due at `now_ms`, advancing that timer
    ///
    /// Call repeatedly until `None`. Ticks come out in timestamp order
    /// (countdown first on a tie), and a timer cancelled between calls
    /// delivers nothing further.
    pub fn next_due(&mut self, now_ms: u64) -> Option<TimerTick> {
        let tick = [TimerKind::Countdown, TimerKind::AutoPlay]
            .into_iter()
            .filter_map(|kind| {
                self.slot(kind)
                    .as_ref()
                    .filter(|timer| timer.is_due(now_ms))
                    .map(|timer| TimerTick {
                        kind,
                        due_ms: timer.next_due_ms,
                    })
            })
            .min_by_key(|tick| tick.due_ms)?;

        if let Some(timer) = self.slot_mut(tick.kind) {
            timer.advance();
        }
        Some(tick)
    }

    /// Milliseconds until the next tick of any timer
    pub fn time_until_next(&self, now_ms: u64) -> Option<u64> {
        [self.countdown, self.auto_play]
            .into_iter()
            .flatten()
            .map(|timer| timer.next_due_ms.saturating_sub(now_ms))
            .min()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(timers: &mut Timers, now_ms: u64) -> Vec<TimerKind> {
        std::iter::from_fn(|| timers.next_due(now_ms))
            .map(|tick| tick.kind)
            .collect()
    }

    #[test]
    fn test_nothing_due_before_first_period() {
        let mut timers = Timers::new();
        timers.start(TimerKind::AutoPlay, 3000, 0);
        assert_eq!(timers.next_due(2999), None);
        assert_eq!(
            timers.next_due(3000),
            Some(TimerTick {
                kind: TimerKind::AutoPlay,
                due_ms: 3000
            })
        );
        assert_eq!(timers.next_due(3000), None);
    }

    #[test]
    fn test_catches_up_in_order() {
        let mut timers = Timers::new();
        timers.start(TimerKind::Countdown, 1000, 0);
        timers.start(TimerKind::AutoPlay, 3000, 0);

        let ticks = drain(&mut timers, 3000);
        assert_eq!(
            ticks,
            vec![
                TimerKind::Countdown,
                TimerKind::Countdown,
                TimerKind::Countdown,
                TimerKind::AutoPlay,
            ]
        );
        assert_eq!(timers.get(TimerKind::Countdown).unwrap().fired(), 3);
    }

    #[test]
    fn test_late_poll_reports_scheduled_times() {
        let mut timers = Timers::new();
        timers.start(TimerKind::Countdown, 1000, 0);

        let due: Vec<u64> = std::iter::from_fn(|| timers.next_due(2500))
            .map(|tick| tick.due_ms)
            .collect();
        assert_eq!(due, vec![1000, 2000]);
    }

    #[test]
    fn test_restart_replaces() {
        let mut timers = Timers::new();
        assert!(!timers.start(TimerKind::AutoPlay, 3000, 0));
        assert!(timers.start(TimerKind::AutoPlay, 3000, 1000));
        assert_eq!(timers.active_count(), 1);

        // Rescheduled from the restart, not the first start
        assert_eq!(timers.next_due(3000), None);
        assert_eq!(timers.next_due(4000).map(|tick| tick.kind), Some(TimerKind::AutoPlay));
    }

    #[test]
    fn test_cancel_stops_ticks() {
        let mut timers = Timers::new();
        timers.start(TimerKind::Countdown, 1000, 0);
        assert!(timers.cancel(TimerKind::Countdown));
        assert!(!timers.cancel(TimerKind::Countdown));
        assert_eq!(timers.next_due(10_000), None);
    }

    #[test]
    fn test_cancel_all() {
        let mut timers = Timers::new();
        timers.start(TimerKind::Countdown, 1000, 0);
        timers.start(TimerKind::AutoPlay, 3000, 0);
        assert_eq!(timers.cancel_all(), 2);
        assert_eq!(timers.active_count(), 0);
        assert_eq!(timers.cancel_all(), 0);
    }

    #[test]
    fn test_time_until_next() {
        let mut timers = Timers::new();
        assert_eq!(timers.time_until_next(0), None);
        timers.start(TimerKind::AutoPlay, 3000, 0);
        timers.start(TimerKind::Countdown, 1000, 500);
        assert_eq!(timers.time_until_next(1000), Some(500));
    }

    #[test]
    fn test_zero_period_clamped() {
        let timer = RepeatingTimer::new(0, 10);
        assert_eq!(timer.period_ms(), 1);
        assert_eq!(timer.next_due_ms(), 11);
    }
}
