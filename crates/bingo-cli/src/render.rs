//! Terminal output: event printer, bell and caller voice

use std::io::{self, Write};

use bingo_engine::{
    AudioOutput, Announcer, BOARD_SIZE, BoardSnapshot, GameEvent, GameObserver, SoundKey,
    SpeechConfig, format_clock,
};
use bingo_stats::StatsAggregate;

const CELL_WIDTH: usize = 14;

/// Fit text into a fixed-width cell
fn fit(text: &str, width: usize) -> String {
    let count = text.chars().count();
    if count <= width {
        format!("{:<width$}", text, width = width)
    } else {
        let cut: String = text.chars().take(width.saturating_sub(1)).collect();
        format!("{}…", cut)
    }
}

/// Board as a text grid; marked cells are bracketed
pub fn format_board(snapshot: &BoardSnapshot) -> String {
    let rule = format!("+{}\n", format!("{}+", "-".repeat(CELL_WIDTH + 2)).repeat(BOARD_SIZE));
    let mut out = rule.clone();

    for row in 0..BOARD_SIZE {
        let cells = snapshot.row(row);

        let mut top = String::from("|");
        let mut bottom = String::from("|");
        for cell in cells {
            let (open, close) = if cell.marked { ('[', ']') } else { (' ', ' ') };
            let label = format!("{:>2} {}", cell.index + 1, cell.item.icon);
            top.push_str(&format!("{}{}{}|", open, fit(&label, CELL_WIDTH), close));
            bottom.push_str(&format!("{}{}{}|", open, fit(&cell.item.text, CELL_WIDTH), close));
        }
        out.push_str(&top);
        out.push('\n');
        out.push_str(&bottom);
        out.push('\n');
        out.push_str(&rule);
    }
    out
}

/// Lifetime stats block; fastest win and fewest calls only once recorded
pub fn format_stats(stats: &StatsAggregate) -> String {
    let mut lines = vec![
        format!("Games Played: {}", stats.games_played),
        format!("Games Won: {} ({:.0}%)", stats.games_won, stats.win_rate()),
    ];
    if let Some(secs) = stats.fastest_win_secs {
        lines.push(format!("Fastest Win: {} seconds", secs));
    }
    if let Some(calls) = stats.fewest_calls {
        lines.push(format!("Fewest Calls: {}", calls));
    }
    lines.push(format!("Total Play Time: {} seconds", stats.total_play_time_secs));
    for record in &stats.win_history {
        lines.push(format!(
            "  {}  {:<10} {:>4}s {:>3} calls",
            record.date.format("%Y-%m-%d %H:%M"),
            record.mode,
            record
                .elapsed_secs
                .map_or_else(|| "-".to_string(), |s| s.to_string()),
            record.call_count
        ));
    }
    lines.join("\n")
}

/// Prints session events to stdout
#[derive(Debug, Default)]
pub struct TerminalRenderer {
    /// Last countdown value shown, to print only on whole-ten boundaries
    last_countdown: Option<u32>,
}

impl TerminalRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    fn show_countdown(&mut self, remaining: u32) -> bool {
        let first = self.last_countdown.is_none_or(|last| remaining > last);
        self.last_countdown = Some(remaining);
        first || remaining % 10 == 0 || remaining <= 5
    }
}

impl GameObserver for TerminalRenderer {
    fn on_event(&mut self, event: &GameEvent) {
        match event {
            GameEvent::ModeSelected {
                name, description, ..
            } => println!("\n== {} mode: {} ==", name, description),
            GameEvent::BoardChanged { snapshot, .. } => print!("{}", format_board(snapshot)),
            GameEvent::ItemCalled {
                item,
                cell,
                call_count,
            } => match cell {
                Some(index) => println!(
                    "Call #{}: {} {}  (on your board, cell {})",
                    call_count,
                    item.icon,
                    item.text,
                    index + 1
                ),
                None => println!("Call #{}: {} {}", call_count, item.icon, item.text),
            },
            GameEvent::CallLogCleared { .. } => {}
            GameEvent::CountdownTick { remaining_secs } => {
                if self.show_countdown(*remaining_secs) {
                    println!("Time left: {}", format_clock(*remaining_secs));
                }
            }
            GameEvent::AutoPlayChanged { enabled } => {
                println!("Auto Play: {}", if *enabled { "ON" } else { "OFF" })
            }
            GameEvent::SoundToggled { enabled } => {
                println!("Sound: {}", if *enabled { "ON" } else { "OFF" })
            }
            GameEvent::RoundEnded { result } => {
                if result.won {
                    println!("\n*** BINGO! ***");
                    if let Some(secs) = result.elapsed_secs {
                        println!("Time: {} seconds", secs);
                    }
                    println!("Calls: {}", result.call_count);
                    println!("Mode: {}", result.mode_name);
                    println!("(x to close, n for a new game)");
                } else {
                    println!("\nRound over. Type n for a new game.");
                }
            }
            GameEvent::StatsUpdated { stats } => println!("{}", format_stats(stats)),
            GameEvent::Notice { notice } => println!("! {}", notice),
            GameEvent::WinDialogClosed => {}
        }
    }
}

/// Rings the terminal bell for every cue
#[derive(Debug, Default)]
pub struct TerminalBell;

impl AudioOutput for TerminalBell {
    fn play(&mut self, key: SoundKey, _clip: &[u8]) {
        log::trace!("Bell for {}", key);
        let mut out = io::stdout();
        if let Err(e) = out.write_all(b"\x07").and_then(|_| out.flush()) {
            log::warn!("Bell failed: {}", e);
        }
    }
}

/// Prints the caller's line
#[derive(Debug, Default)]
pub struct PrintAnnouncer;

impl Announcer for PrintAnnouncer {
    fn announce(&mut self, line: &str, _config: &SpeechConfig) {
        println!("  \"{}\"", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bingo_core::Item;
    use bingo_engine::CellView;

    fn snapshot() -> BoardSnapshot {
        let cells = (0..25)
            .map(|index| CellView {
                index,
                item: if index == 12 {
                    Item::free("FREE", "*")
                } else {
                    Item::new(format!("Item number {}", index), "#")
                },
                marked: index == 12 || index == 0,
            })
            .collect();
        BoardSnapshot { cells }
    }

    #[test]
    fn test_fit() {
        assert_eq!(fit("abc", 5), "abc  ");
        assert_eq!(fit("abcdefgh", 5), "abcd…");
    }

    #[test]
    fn test_board_grid() {
        let text = format_board(&snapshot());
        let lines: Vec<&str> = text.lines().collect();
        // Rule, then two lines and a rule per row
        assert_eq!(lines.len(), 1 + BOARD_SIZE * 3);
        assert!(lines[1].starts_with("|[ 1 #"));
        assert!(text.contains("FREE"));
        assert!(text.contains("25 #"));
    }

    #[test]
    fn test_stats_hide_missing_records() {
        let text = format_stats(&StatsAggregate::default());
        assert!(text.contains("Games Played: 0"));
        assert!(!text.contains("Fastest Win"));
        assert!(!text.contains("Fewest Calls"));
    }

    #[test]
    fn test_countdown_throttle() {
        let mut renderer = TerminalRenderer::new();
        assert!(renderer.show_countdown(180));
        assert!(!renderer.show_countdown(179));
        assert!(renderer.show_countdown(170));
        assert!(renderer.show_countdown(5));
        // A new round starts over
        assert!(renderer.show_countdown(180));
    }
}
