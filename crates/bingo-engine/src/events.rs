//! Session events
//!
//! The session never renders. Everything a front end needs to draw (board,
//! calls, countdown, results, stats) goes out as a [`GameEvent`] to every
//! subscribed [`GameObserver`], in emission order.

use std::fmt;
use std::sync::Arc;

use bingo_core::{GameResult, Item};
use bingo_stats::StatsAggregate;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::board::BoardSnapshot;
use crate::mode::GameModeKind;

/// Why the call log was emptied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClearReason {
    /// A new board was generated
    NewRound,
    /// Every item had been called
    Exhausted,
}

/// User-facing soft failures and announcements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Notice {
    /// Bingo checked without a complete line
    NotBingoYet,
    /// The pool ran out and the call log starts over
    CallsExhausted,
    /// The countdown reached zero
    TimeUp,
    /// Action on a round that already ended
    RoundOver,
    /// Tried to unmark the free space
    FreeSpaceLocked,
}

impl Notice {
    /// Text shown to the player
    pub fn message(&self) -> &'static str {
        match self {
            Self::NotBingoYet => "Not quite yet! Keep marking those squares!",
            Self::CallsExhausted => "All items have been called! Starting over.",
            Self::TimeUp => "Time's up! Better luck next time!",
            Self::RoundOver => "This round is over. Start a new game to keep playing.",
            Self::FreeSpaceLocked => "The free space is always marked.",
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Everything the session tells its front end
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    /// A mode was selected (a new round follows)
    ModeSelected {
        mode: GameModeKind,
        name: String,
        description: String,
        time_limit_secs: Option<u32>,
    },

    /// Board or marks changed
    BoardChanged { round: u64, snapshot: BoardSnapshot },

    /// An item was called
    ItemCalled {
        item: Item,
        /// Cell holding the item on the current board
        cell: Option<usize>,
        /// Calls in the round so far, this one included
        call_count: u32,
    },

    /// The call log was emptied
    CallLogCleared { reason: ClearReason },

    /// Countdown poll in a timed round
    CountdownTick { remaining_secs: u32 },

    AutoPlayChanged { enabled: bool },

    SoundToggled { enabled: bool },

    /// Round finished; a win also opens the win dialog
    RoundEnded { result: GameResult },

    StatsUpdated { stats: StatsAggregate },

    Notice { notice: Notice },

    WinDialogClosed,
}

impl GameEvent {
    /// Event name, for logging
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::ModeSelected { .. } => "mode_selected",
            Self::BoardChanged { .. } => "board_changed",
            Self::ItemCalled { .. } => "item_called",
            Self::CallLogCleared { .. } => "call_log_cleared",
            Self::CountdownTick { .. } => "countdown_tick",
            Self::AutoPlayChanged { .. } => "auto_play_changed",
            Self::SoundToggled { .. } => "sound_toggled",
            Self::RoundEnded { .. } => "round_ended",
            Self::StatsUpdated { .. } => "stats_updated",
            Self::Notice { .. } => "notice",
            Self::WinDialogClosed => "win_dialog_closed",
        }
    }
}

/// Receives session events
pub trait GameObserver {
    fn on_event(&mut self, event: &GameEvent);
}

impl<F> GameObserver for F
where
    F: FnMut(&GameEvent),
{
    fn on_event(&mut self, event: &GameEvent) {
        self(event)
    }
}

/// Fan-out to every subscriber
#[derive(Default)]
pub struct EventBus {
    observers: Vec<Box<dyn GameObserver>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an observer; it receives every later event
    pub fn subscribe(&mut self, observer: impl GameObserver + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// Deliver to every observer in subscription order
    pub fn emit(&mut self, event: GameEvent) {
        log::trace!("Event: {}", event.type_name());
        for observer in &mut self.observers {
            observer.on_event(&event);
        }
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("observers", &self.observers.len())
            .finish()
    }
}

/// Observer that keeps every event; clones share the same buffer
#[derive(Debug, Clone, Default)]
pub struct EventRecorder {
    events: Arc<Mutex<Vec<GameEvent>>>,
}

impl EventRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of everything recorded so far
    pub fn events(&self) -> Vec<GameEvent> {
        self.events.lock().clone()
    }

    /// Take and clear the buffer
    pub fn drain(&self) -> Vec<GameEvent> {
        std::mem::take(&mut *self.events.lock())
    }

    /// Notices recorded so far
    pub fn notices(&self) -> Vec<Notice> {
        self.events
            .lock()
            .iter()
            .filter_map(|event| match event {
                GameEvent::Notice { notice } => Some(*notice),
                _ => None,
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }
}

impl GameObserver for EventRecorder {
    fn on_event(&mut self, event: &GameEvent) {
        self.events.lock().push(event.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_closure_observer() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);

        let mut bus = EventBus::new();
        bus.subscribe(move |event: &GameEvent| sink.borrow_mut().push(event.type_name()));
        bus.emit(GameEvent::AutoPlayChanged { enabled: true });
        bus.emit(GameEvent::WinDialogClosed);

        assert_eq!(*seen.borrow(), vec!["auto_play_changed", "win_dialog_closed"]);
    }

    #[test]
    fn test_recorder_clones_share_buffer() {
        let recorder = EventRecorder::new();
        let mut bus = EventBus::new();
        bus.subscribe(recorder.clone());
        bus.subscribe(recorder.clone());

        bus.emit(GameEvent::Notice {
            notice: Notice::NotBingoYet,
        });
        assert_eq!(recorder.len(), 2);
        assert_eq!(recorder.notices(), vec![Notice::NotBingoYet, Notice::NotBingoYet]);

        recorder.drain();
        assert!(recorder.is_empty());
    }

    #[test]
    fn test_event_json_is_tagged() {
        let json = serde_json::to_value(GameEvent::CountdownTick { remaining_secs: 42 }).unwrap();
        assert_eq!(json["type"], "countdown_tick");
        assert_eq!(json["remaining_secs"], 42);

        let json = serde_json::to_value(GameEvent::Notice {
            notice: Notice::TimeUp,
        })
        .unwrap();
        assert_eq!(json["notice"], "time_up");
    }
}
