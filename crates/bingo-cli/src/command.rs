//! Interactive command parsing

use std::str::FromStr;

use anyhow::{Context, Result, anyhow, bail};
use bingo_engine::{CELL_COUNT, GameModeKind};

pub const HELP: &str = "\
Commands:
  n            new game
  c            call the next item
  b            check for bingo
  a            toggle auto-play
  s            toggle sound
  m <mode>     switch mode (classic, speed, challenge)
  t <cell>     mark or unmark a cell (1-25, row by row)
  x            close the win dialog
  board        redraw the board
  stats        show lifetime statistics
  reset        reset statistics
  h            this help
  q            quit";

/// One line of player input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    NewGame,
    Call,
    CheckBingo,
    ToggleAutoPlay,
    ToggleSound,
    SelectMode(GameModeKind),
    /// Zero-based cell index
    ToggleCell(usize),
    CloseWinDialog,
    Board,
    Stats,
    ResetStats,
    Help,
    Quit,
}

impl FromStr for Command {
    type Err = anyhow::Error;

    fn from_str(line: &str) -> Result<Self> {
        let mut words = line.split_whitespace();
        let Some(head) = words.next() else {
            bail!("empty command");
        };
        let arg = words.next();

        let command = match head.to_ascii_lowercase().as_str() {
            "n" | "new" => Self::NewGame,
            "c" | "call" => Self::Call,
            "b" | "bingo" => Self::CheckBingo,
            "a" | "auto" => Self::ToggleAutoPlay,
            "s" | "sound" => Self::ToggleSound,
            "m" | "mode" => {
                let name = arg.ok_or_else(|| anyhow!("usage: m <classic|speed|challenge>"))?;
                Self::SelectMode(name.parse()?)
            }
            "t" | "toggle" => {
                let cell: usize = arg
                    .ok_or_else(|| anyhow!("usage: t <cell 1-{}>", CELL_COUNT))?
                    .parse()
                    .context("cell must be a number")?;
                if !(1..=CELL_COUNT).contains(&cell) {
                    bail!("cell must be between 1 and {}", CELL_COUNT);
                }
                Self::ToggleCell(cell - 1)
            }
            "x" | "close" => Self::CloseWinDialog,
            "board" => Self::Board,
            "stats" => Self::Stats,
            "reset" => Self::ResetStats,
            "h" | "help" | "?" => Self::Help,
            "q" | "quit" | "exit" => Self::Quit,
            other => bail!("unknown command '{}', type h for help", other),
        };
        Ok(command)
    }
}
