//! Game session: the single owner of all round state
//!
//! A session holds the content pool, the current mode, the active round
//! (board, marks, call log, timers) and the stats tracker. Every UI action is
//! a method here, every state change goes out as a [`GameEvent`], and time
//! only enters through the `now_ms` arguments.

use bingo_core::{BingoError, BingoResult, ContentPool, GameResult, Item, ItemId};
use bingo_stats::{StatsAggregate, StatsTracker};
use chrono::Utc;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use crate::audio::{SoundBank, SoundKey};
use crate::board::{Board, BoardSnapshot, CELL_COUNT, CellState, FREE_INDEX};
use crate::caller::{CallLog, call_next};
use crate::config::EngineConfig;
use crate::events::{ClearReason, EventBus, GameEvent, GameObserver, Notice};
use crate::lines::{Line, has_win, winning_lines};
use crate::mode::{GameMode, GameModeKind};
use crate::speech::{Announcer, NullAnnouncer, caller_phrase};
use crate::timer::{TimerKind, Timers};

/// Where the active round stands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundPhase {
    Playing,
    Won,
    Lost,
}

impl RoundPhase {
    pub fn is_finished(&self) -> bool {
        !matches!(self, Self::Playing)
    }
}

/// One board from generation until win, timeout or replacement
#[derive(Debug, Clone)]
struct Round {
    id: u64,
    board: Board,
    cells: CellState,
    calls: CallLog,
    /// Every call of the round, across exhaustion resets
    call_count: u32,
    started_at_ms: u64,
    phase: RoundPhase,
}

impl Round {
    fn new(id: u64, board: Board, now_ms: u64) -> Self {
        Self {
            id,
            board,
            cells: CellState::new(),
            calls: CallLog::new(),
            call_count: 0,
            started_at_ms: now_ms,
            phase: RoundPhase::Playing,
        }
    }

    fn elapsed_secs(&self, now_ms: u64) -> u64 {
        now_ms.saturating_sub(self.started_at_ms) / 1000
    }
}

/// Everything a renderer needs for a full redraw
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionView {
    pub mode: GameModeKind,
    pub mode_name: String,
    pub round: u64,
    pub phase: RoundPhase,
    pub board: BoardSnapshot,
    /// Current cycle, most recent first
    pub calls: Vec<Item>,
    pub remaining_secs: Option<u32>,
    pub auto_playing: bool,
    pub sound_enabled: bool,
    pub win_dialog_open: bool,
    pub stats: StatsAggregate,
}

/// Bingo game session
///
/// Owns one round at a time. Starting a round (new game or mode change)
/// cancels every timer of the previous one before the new board exists.
pub struct GameSession {
    pool: ContentPool,
    config: EngineConfig,
    mode: GameMode,
    round: Round,
    next_round_id: u64,
    timers: Timers,
    rng: StdRng,
    /// Caller lines only, so speech never shifts the call sequence
    phrase_rng: StdRng,
    stats: StatsTracker,
    sounds: SoundBank,
    announcer: Box<dyn Announcer>,
    bus: EventBus,
    auto_playing: bool,
    win_dialog_open: bool,
}

impl GameSession {
    /// Open a session with an entropy-seeded RNG
    pub fn new(
        pool: ContentPool,
        config: EngineConfig,
        stats: StatsTracker,
        now_ms: u64,
    ) -> BingoResult<Self> {
        Self::with_rng(pool, config, stats, StdRng::from_os_rng(), now_ms)
    }

    /// Open a session with a fixed seed (reproducible boards and calls)
    pub fn with_seed(
        pool: ContentPool,
        config: EngineConfig,
        stats: StatsTracker,
        seed: u64,
        now_ms: u64,
    ) -> BingoResult<Self> {
        Self::with_rng(pool, config, stats, StdRng::seed_from_u64(seed), now_ms)
    }

    fn with_rng(
        pool: ContentPool,
        config: EngineConfig,
        stats: StatsTracker,
        mut rng: StdRng,
        now_ms: u64,
    ) -> BingoResult<Self> {
        let phrase_rng = StdRng::from_rng(&mut rng);
        let mode = GameMode::from_kind(config.starting_mode);
        let board = Board::generate(&pool, &mut rng)?;

        let mut timers = Timers::new();
        if mode.is_timed() {
            timers.start(TimerKind::Countdown, config.countdown_interval_ms, now_ms);
        }

        let mut sounds = SoundBank::silent();
        sounds.set_enabled(config.sound_enabled);

        log::info!(
            "Session opened: {} mode, {} items in pool",
            mode.name,
            pool.len()
        );

        Ok(Self {
            pool,
            mode,
            round: Round::new(1, board, now_ms),
            next_round_id: 2,
            timers,
            rng,
            phrase_rng,
            stats,
            sounds,
            announcer: Box::new(NullAnnouncer),
            bus: EventBus::new(),
            auto_playing: false,
            win_dialog_open: false,
            config,
        })
    }

    /// Replace the sound bank; the session's sound switch carries over
    pub fn set_sounds(&mut self, mut sounds: SoundBank) {
        sounds.set_enabled(self.sounds.is_enabled());
        self.sounds = sounds;
    }

    pub fn set_announcer(&mut self, announcer: impl Announcer + 'static) {
        self.announcer = Box::new(announcer);
    }

    pub fn subscribe(&mut self, observer: impl GameObserver + 'static) {
        self.bus.subscribe(observer);
    }

    /// Re-send mode, board, countdown and stats, e.g. to a new subscriber
    pub fn publish_state(&mut self, now_ms: u64) {
        self.emit_mode();
        self.emit_board();
        if let Some(remaining_secs) = self.remaining_secs(now_ms) {
            self.bus.emit(GameEvent::CountdownTick { remaining_secs });
        }
        self.emit_stats();
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // ROUNDS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Deal a fresh board in the current mode
    pub fn new_game(&mut self, now_ms: u64) -> BingoResult<()> {
        let board = Board::generate(&self.pool, &mut self.rng)?;
        self.start_round(board, now_ms);
        Ok(())
    }

    /// Switch mode; always starts a new round
    ///
    /// Selecting the current mode again simply deals a new board.
    pub fn select_mode(&mut self, kind: GameModeKind, now_ms: u64) -> BingoResult<()> {
        let board = Board::generate(&self.pool, &mut self.rng)?;
        self.mode = GameMode::from_kind(kind);
        log::info!("Mode selected: {}", self.mode.name);
        self.emit_mode();
        self.start_round(board, now_ms);
        Ok(())
    }

    fn start_round(&mut self, board: Board, now_ms: u64) {
        self.stop_timers();
        self.close_win_dialog();

        let id = self.next_round_id;
        self.next_round_id += 1;
        self.round = Round::new(id, board, now_ms);

        if let Some(limit) = self.mode.time_limit_secs {
            self.timers
                .start(TimerKind::Countdown, self.config.countdown_interval_ms, now_ms);
            self.bus.emit(GameEvent::CountdownTick {
                remaining_secs: limit,
            });
        }

        log::info!("Round {} started ({} mode)", id, self.mode.name);
        self.bus.emit(GameEvent::CallLogCleared {
            reason: ClearReason::NewRound,
        });
        self.emit_board();
    }

    fn end_round(&mut self, won: bool, now_ms: u64) {
        self.stop_timers();

        // Only timed rounds are clocked
        let elapsed = self
            .mode
            .is_timed()
            .then(|| self.round.elapsed_secs(now_ms));
        let result = if won {
            self.round.phase = RoundPhase::Won;
            GameResult::win(self.mode.name, elapsed, self.round.call_count)
        } else {
            self.round.phase = RoundPhase::Lost;
            GameResult::loss(self.mode.name, elapsed, self.round.call_count)
        };

        if won {
            self.sounds.play(SoundKey::Win);
            self.win_dialog_open = true;
        } else {
            self.sounds.play(SoundKey::Error);
        }

        log::info!(
            "Round {} {} after {:?}s and {} calls",
            self.round.id,
            if won { "won" } else { "lost" },
            elapsed,
            self.round.call_count
        );

        let stats = self.stats.record(&result, Utc::now()).clone();
        self.bus.emit(GameEvent::RoundEnded { result });
        self.bus.emit(GameEvent::StatsUpdated { stats });
    }

    fn stop_timers(&mut self) {
        self.timers.cancel_all();
        if self.auto_playing {
            self.auto_playing = false;
            self.bus.emit(GameEvent::AutoPlayChanged { enabled: false });
        }
    }

    /// Emit `RoundOver` if the round already ended
    fn reject_if_finished(&mut self) -> bool {
        if self.round.phase.is_finished() {
            self.notice(Notice::RoundOver);
            true
        } else {
            false
        }
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // CALLS AND MARKS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Call the next item; `None` when the round has already ended
    pub fn call_item(&mut self, now_ms: u64) -> BingoResult<Option<ItemId>> {
        if self.reject_if_finished() {
            return Ok(None);
        }

        self.sounds.play(SoundKey::Call);

        let outcome = call_next(&self.pool, &mut self.round.calls, &mut self.rng)?;
        if outcome.exhausted_reset {
            self.notice(Notice::CallsExhausted);
            self.bus.emit(GameEvent::CallLogCleared {
                reason: ClearReason::Exhausted,
            });
        }
        self.round.call_count = self.round.call_count.saturating_add(1);

        let item = self.pool.get(outcome.item).cloned().ok_or_else(|| {
            BingoError::Config(format!("Called item {} is not in the pool", outcome.item))
        })?;
        let cell = self.round.board.position_of(outcome.item);
        log::debug!("Called {} (cell {:?})", item.text, cell);

        if self.config.speech.enabled {
            let line = caller_phrase(&item.text, &mut self.phrase_rng);
            self.announcer.announce(&line, &self.config.speech);
        }

        self.bus.emit(GameEvent::ItemCalled {
            item,
            cell,
            call_count: self.round.call_count,
        });

        if self.mode.auto_mark {
            self.auto_mark(cell, now_ms)?;
        }

        Ok(Some(outcome.item))
    }

    fn auto_mark(&mut self, cell: Option<usize>, now_ms: u64) -> BingoResult<()> {
        if let Some(index) = cell {
            if self.round.cells.mark(index)? {
                self.sounds.play(SoundKey::Mark);
                self.emit_board();
            }
        }
        if has_win(&self.round.cells) {
            self.end_round(true, now_ms);
        }
        Ok(())
    }

    /// Flip a cell by hand; returns its new marked state
    pub fn toggle_cell(&mut self, index: usize) -> BingoResult<bool> {
        if index >= CELL_COUNT {
            return Err(BingoError::CellOutOfRange(index));
        }
        if self.reject_if_finished() {
            return Ok(self.round.cells.is_marked(index));
        }
        if index == FREE_INDEX {
            self.notice(Notice::FreeSpaceLocked);
            return Ok(true);
        }

        let marked = self.round.cells.toggle(index)?;
        self.emit_board();
        Ok(marked)
    }

    /// Claim a bingo; ends the round as won if any line is complete
    pub fn check_bingo(&mut self, now_ms: u64) -> bool {
        if self.reject_if_finished() {
            return false;
        }
        if has_win(&self.round.cells) {
            self.end_round(true, now_ms);
            true
        } else {
            self.notice(Notice::NotBingoYet);
            false
        }
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // TOGGLES AND TIMERS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Turn auto-play on (calling once immediately) or off
    ///
    /// Returns whether auto-play is running afterwards; the immediate call
    /// may already win the round and stop it again.
    pub fn toggle_auto_play(&mut self, now_ms: u64) -> BingoResult<bool> {
        if self.auto_playing {
            self.timers.cancel(TimerKind::AutoPlay);
            self.auto_playing = false;
            log::info!("Auto-play off");
            self.bus.emit(GameEvent::AutoPlayChanged { enabled: false });
            return Ok(false);
        }

        if self.reject_if_finished() {
            return Ok(false);
        }

        self.timers
            .start(TimerKind::AutoPlay, self.config.auto_play_interval_ms, now_ms);
        self.auto_playing = true;
        log::info!(
            "Auto-play on ({} ms interval)",
            self.config.auto_play_interval_ms
        );
        self.bus.emit(GameEvent::AutoPlayChanged { enabled: true });

        self.call_item(now_ms)?;
        Ok(self.auto_playing)
    }

    /// Flip sound effects; returns the new state
    pub fn toggle_sound(&mut self) -> bool {
        let enabled = !self.sounds.is_enabled();
        self.sounds.set_enabled(enabled);
        log::info!("Sound {}", if enabled { "on" } else { "off" });
        self.bus.emit(GameEvent::SoundToggled { enabled });
        enabled
    }

    /// Zero the lifetime stats and persist
    pub fn reset_stats(&mut self) {
        self.stats.reset();
        self.emit_stats();
    }

    /// Dismiss the win dialog; returns false if it was not open
    pub fn close_win_dialog(&mut self) -> bool {
        if !self.win_dialog_open {
            return false;
        }
        self.win_dialog_open = false;
        self.bus.emit(GameEvent::WinDialogClosed);
        true
    }

    /// Deliver every timer tick due by `now_ms`
    ///
    /// Ticks run in schedule order at their scheduled time, so a late poll
    /// replays exactly what an on-time clock would have done. A tick that
    /// ends the round cancels the timers and nothing further fires.
    pub fn tick(&mut self, now_ms: u64) -> BingoResult<()> {
        while let Some(tick) = self.timers.next_due(now_ms) {
            match tick.kind {
                TimerKind::Countdown => self.poll_countdown(tick.due_ms),
                TimerKind::AutoPlay => {
                    self.call_item(tick.due_ms)?;
                }
            }
        }
        Ok(())
    }

    fn poll_countdown(&mut self, at_ms: u64) {
        let Some(remaining_secs) = self.remaining_secs(at_ms) else {
            self.timers.cancel(TimerKind::Countdown);
            return;
        };

        self.bus.emit(GameEvent::CountdownTick { remaining_secs });
        if remaining_secs == 0 {
            self.notice(Notice::TimeUp);
            self.end_round(false, at_ms);
        }
    }

    /// Milliseconds until the next timer tick, for front-end sleeps
    pub fn time_until_next_tick(&self, now_ms: u64) -> Option<u64> {
        self.timers.time_until_next(now_ms)
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // STATE
    // ═══════════════════════════════════════════════════════════════════════════

    pub fn mode(&self) -> &GameMode {
        &self.mode
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn pool(&self) -> &ContentPool {
        &self.pool
    }

    pub fn board(&self) -> &Board {
        &self.round.board
    }

    pub fn cells(&self) -> &CellState {
        &self.round.cells
    }

    pub fn call_log(&self) -> &CallLog {
        &self.round.calls
    }

    /// Calls in the round, across exhaustion resets
    pub fn call_count(&self) -> u32 {
        self.round.call_count
    }

    pub fn round_id(&self) -> u64 {
        self.round.id
    }

    pub fn phase(&self) -> RoundPhase {
        self.round.phase
    }

    pub fn is_auto_playing(&self) -> bool {
        self.auto_playing
    }

    pub fn is_sound_enabled(&self) -> bool {
        self.sounds.is_enabled()
    }

    pub fn is_win_dialog_open(&self) -> bool {
        self.win_dialog_open
    }

    pub fn is_timer_active(&self, kind: TimerKind) -> bool {
        self.timers.is_active(kind)
    }

    pub fn active_timer_count(&self) -> usize {
        self.timers.active_count()
    }

    pub fn stats(&self) -> &StatsAggregate {
        self.stats.stats()
    }

    /// Countdown seconds left; `None` in untimed modes or after the round
    pub fn remaining_secs(&self, now_ms: u64) -> Option<u32> {
        if self.round.phase.is_finished() {
            return None;
        }
        let limit = u64::from(self.mode.time_limit_secs?);
        let left = limit.saturating_sub(self.round.elapsed_secs(now_ms));
        Some(u32::try_from(left).unwrap_or(u32::MAX))
    }

    /// Complete lines on the current board
    pub fn winning_lines(&self) -> Vec<Line> {
        winning_lines(&self.round.cells)
    }

    pub fn snapshot(&self) -> BoardSnapshot {
        BoardSnapshot::capture(&self.round.board, &self.round.cells, &self.pool)
    }

    /// Full state for a redraw
    pub fn view(&self, now_ms: u64) -> SessionView {
        SessionView {
            mode: self.mode.kind,
            mode_name: self.mode.name.to_string(),
            round: self.round.id,
            phase: self.round.phase,
            board: self.snapshot(),
            calls: self
                .round
                .calls
                .iter()
                .filter_map(|id| self.pool.get(id).cloned())
                .collect(),
            remaining_secs: self.remaining_secs(now_ms),
            auto_playing: self.auto_playing,
            sound_enabled: self.sounds.is_enabled(),
            win_dialog_open: self.win_dialog_open,
            stats: self.stats.stats().clone(),
        }
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // EVENTS
    // ═══════════════════════════════════════════════════════════════════════════

    fn notice(&mut self, notice: Notice) {
        log::debug!("Notice: {:?}", notice);
        self.bus.emit(GameEvent::Notice { notice });
    }

    fn emit_mode(&mut self) {
        self.bus.emit(GameEvent::ModeSelected {
            mode: self.mode.kind,
            name: self.mode.name.to_string(),
            description: self.mode.description.to_string(),
            time_limit_secs: self.mode.time_limit_secs,
        });
    }

    fn emit_board(&mut self) {
        let snapshot = self.snapshot();
        self.bus.emit(GameEvent::BoardChanged {
            round: self.round.id,
            snapshot,
        });
    }

    fn emit_stats(&mut self) {
        let stats = self.stats.stats().clone();
        self.bus.emit(GameEvent::StatsUpdated { stats });
    }
}

impl std::fmt::Debug for GameSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameSession")
            .field("mode", &self.mode.kind)
            .field("round", &self.round.id)
            .field("phase", &self.round.phase)
            .field("calls", &self.round.call_count)
            .field("auto_playing", &self.auto_playing)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventRecorder;

    fn open(kind: GameModeKind) -> (GameSession, EventRecorder) {
        let config = EngineConfig {
            starting_mode: kind,
            ..Default::default()
        };
        let mut session = GameSession::with_seed(
            ContentPool::standard(),
            config,
            StatsTracker::in_memory(),
            42,
            0,
        )
        .unwrap();
        let recorder = EventRecorder::new();
        session.subscribe(recorder.clone());
        (session, recorder)
    }

    #[test]
    fn test_opens_with_fresh_round() {
        let (session, recorder) = open(GameModeKind::Classic);
        assert_eq!(session.round_id(), 1);
        assert_eq!(session.phase(), RoundPhase::Playing);
        assert!(session.call_log().is_empty());
        assert_eq!(session.cells().marked_indices(), vec![FREE_INDEX]);
        assert_eq!(session.active_timer_count(), 0);
        assert!(recorder.is_empty());
    }

    #[test]
    fn test_timed_mode_starts_countdown_on_open() {
        let (session, _) = open(GameModeKind::Speed);
        assert!(session.is_timer_active(TimerKind::Countdown));
        assert_eq!(session.remaining_secs(0), Some(180));
        assert_eq!(session.remaining_secs(61_000), Some(119));
    }

    #[test]
    fn test_manual_call_does_not_mark_in_classic() {
        let (mut session, _) = open(GameModeKind::Classic);
        for _ in 0..10 {
            session.call_item(0).unwrap();
        }
        assert_eq!(session.cells().marked_count(), 1);
        assert_eq!(session.call_count(), 10);
    }

    #[test]
    fn test_toggle_cell() {
        let (mut session, recorder) = open(GameModeKind::Classic);
        assert!(session.toggle_cell(0).unwrap());
        assert!(!session.toggle_cell(0).unwrap());

        assert!(session.toggle_cell(FREE_INDEX).unwrap());
        assert!(session.cells().is_marked(FREE_INDEX));
        assert_eq!(recorder.notices(), vec![Notice::FreeSpaceLocked]);

        assert!(matches!(
            session.toggle_cell(25),
            Err(BingoError::CellOutOfRange(25))
        ));
    }

    #[test]
    fn test_check_bingo_without_line() {
        let (mut session, recorder) = open(GameModeKind::Classic);
        session.toggle_cell(0).unwrap();
        assert!(!session.check_bingo(0));
        assert_eq!(session.phase(), RoundPhase::Playing);
        assert_eq!(recorder.notices(), vec![Notice::NotBingoYet]);
        assert_eq!(session.stats().games_played, 0);
    }

    #[test]
    fn test_manual_bingo_wins_without_clock() {
        let (mut session, recorder) = open(GameModeKind::Classic);
        for index in [10, 11, 13, 14] {
            session.toggle_cell(index).unwrap();
        }
        assert!(session.check_bingo(12_500));
        assert_eq!(session.phase(), RoundPhase::Won);
        assert!(session.is_win_dialog_open());

        assert!(recorder.events().iter().any(|e| matches!(
            e,
            GameEvent::RoundEnded { result } if result.won && result.elapsed_secs.is_none()
        )));

        let stats = session.stats();
        assert_eq!(stats.games_won, 1);
        assert_eq!(stats.fastest_win_secs, None);
        assert_eq!(stats.total_play_time_secs, 0);
        assert_eq!(stats.win_history[0].elapsed_secs, None);
        assert_eq!(stats.win_history[0].mode, "Classic");
    }

    #[test]
    fn test_timed_bingo_is_clocked() {
        let (mut session, _) = open(GameModeKind::Speed);
        for index in [2, 7, 17, 22] {
            session.toggle_cell(index).unwrap();
        }
        assert!(session.check_bingo(12_500));

        let stats = session.stats();
        assert_eq!(stats.fastest_win_secs, Some(12));
        assert_eq!(stats.total_play_time_secs, 12);
    }

    #[test]
    fn test_time_until_next_tick_follows_active_timers() {
        let (mut session, _) = open(GameModeKind::Classic);
        assert_eq!(session.time_until_next_tick(0), None);

        session.toggle_auto_play(0).unwrap();
        assert_eq!(session.time_until_next_tick(1_000), Some(2_000));

        session.select_mode(GameModeKind::Speed, 5_000).unwrap();
        assert_eq!(session.time_until_next_tick(5_400), Some(600));
    }

    #[test]
    fn test_new_game_resets_round() {
        let (mut session, recorder) = open(GameModeKind::Classic);
        session.call_item(0).unwrap();
        session.toggle_cell(3).unwrap();
        recorder.drain();

        session.new_game(1000).unwrap();
        assert_eq!(session.round_id(), 2);
        assert!(session.call_log().is_empty());
        assert_eq!(session.call_count(), 0);
        assert!(!session.cells().is_marked(3));
        assert!(recorder.events().contains(&GameEvent::CallLogCleared {
            reason: ClearReason::NewRound
        }));
    }

    #[test]
    fn test_sound_toggle() {
        let (mut session, recorder) = open(GameModeKind::Classic);
        assert!(session.is_sound_enabled());
        assert!(!session.toggle_sound());
        assert!(session.toggle_sound());
        assert_eq!(
            recorder.events(),
            vec![
                GameEvent::SoundToggled { enabled: false },
                GameEvent::SoundToggled { enabled: true },
            ]
        );
    }

    #[test]
    fn test_view_lists_calls_most_recent_first() {
        let (mut session, _) = open(GameModeKind::Challenge);
        let first = session.call_item(0).unwrap().unwrap();
        let second = session.call_item(0).unwrap().unwrap();

        let view = session.view(0);
        assert_eq!(view.mode, GameModeKind::Challenge);
        assert_eq!(view.board.cells.len(), CELL_COUNT);
        assert_eq!(view.calls.len(), 2);
        assert_eq!(&view.calls[0], session.pool().get(second).unwrap());
        assert_eq!(&view.calls[1], session.pool().get(first).unwrap());
        assert_eq!(view.remaining_secs, None);
    }
}
