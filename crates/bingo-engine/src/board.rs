//! Board generation and cell marks

use bingo_core::{BingoError, BingoResult, ContentPool, Item, ItemId};
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

/// Cells per row and column
pub const BOARD_SIZE: usize = 5;

/// Total cells on a board
pub const CELL_COUNT: usize = BOARD_SIZE * BOARD_SIZE;

/// Center cell, always the free space
pub const FREE_INDEX: usize = 12;

/// Callable items a pool needs to fill a board
pub const REQUIRED_ITEMS: usize = CELL_COUNT - 1;

/// A 5×5 board of item IDs, row-major (`index = row * 5 + col`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    cells: [ItemId; CELL_COUNT],
}

impl Board {
    /// Shuffle the callable items and lay the first 24 around the free space
    pub fn generate<R: Rng + ?Sized>(pool: &ContentPool, rng: &mut R) -> BingoResult<Self> {
        let mut callable = pool.callable_ids();
        if callable.len() < REQUIRED_ITEMS {
            return Err(BingoError::PoolTooSmall {
                found: callable.len(),
                required: REQUIRED_ITEMS,
            });
        }

        callable.shuffle(rng);

        let mut cells = [pool.free_id(); CELL_COUNT];
        let mut picks = callable.into_iter();
        for (index, cell) in cells.iter_mut().enumerate() {
            if index != FREE_INDEX {
                // Length checked above
                if let Some(id) = picks.next() {
                    *cell = id;
                }
            }
        }

        Ok(Self { cells })
    }

    /// Item ID at a cell
    pub fn item_at(&self, index: usize) -> Option<ItemId> {
        self.cells.get(index).copied()
    }

    /// Cell holding an item, if it is on this board
    pub fn position_of(&self, id: ItemId) -> Option<usize> {
        self.cells.iter().position(|&cell| cell == id)
    }

    /// All item IDs in cell order
    pub fn cells(&self) -> &[ItemId; CELL_COUNT] {
        &self.cells
    }

    /// Convert a cell index to (row, col)
    pub fn row_col(index: usize) -> (usize, usize) {
        (index / BOARD_SIZE, index % BOARD_SIZE)
    }
}

/// Marked flags parallel to a [`Board`]
///
/// The free space is marked on creation and can never be cleared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellState {
    marked: [bool; CELL_COUNT],
}

impl CellState {
    /// Fresh marks: only the free space
    pub fn new() -> Self {
        let mut marked = [false; CELL_COUNT];
        marked[FREE_INDEX] = true;
        Self { marked }
    }

    /// Marks from a list of indices (free space is always added)
    pub fn from_indices(indices: &[usize]) -> Self {
        let mut state = Self::new();
        for &index in indices {
            if index < CELL_COUNT {
                state.marked[index] = true;
            }
        }
        state
    }

    /// Is a cell marked (out of range is never marked)
    pub fn is_marked(&self, index: usize) -> bool {
        self.marked.get(index).copied().unwrap_or(false)
    }

    /// Mark a cell; returns true if it was newly marked
    pub fn mark(&mut self, index: usize) -> BingoResult<bool> {
        let cell = self
            .marked
            .get_mut(index)
            .ok_or(BingoError::CellOutOfRange(index))?;
        let newly = !*cell;
        *cell = true;
        Ok(newly)
    }

    /// Flip a cell and return its new state; the free space stays marked
    pub fn toggle(&mut self, index: usize) -> BingoResult<bool> {
        if index >= CELL_COUNT {
            return Err(BingoError::CellOutOfRange(index));
        }
        if index != FREE_INDEX {
            self.marked[index] = !self.marked[index];
        }
        Ok(self.marked[index])
    }

    /// Indices of all marked cells
    pub fn marked_indices(&self) -> Vec<usize> {
        (0..CELL_COUNT).filter(|&i| self.marked[i]).collect()
    }

    /// Number of marked cells, free space included
    pub fn marked_count(&self) -> usize {
        self.marked.iter().filter(|&&m| m).count()
    }
}

impl Default for CellState {
    fn default() -> Self {
        Self::new()
    }
}

/// One cell as seen by a renderer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellView {
    pub index: usize,
    pub item: Item,
    pub marked: bool,
}

/// Board plus marks, resolved to items
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardSnapshot {
    pub cells: Vec<CellView>,
}

impl BoardSnapshot {
    /// Resolve a board against its pool
    pub fn capture(board: &Board, marks: &CellState, pool: &ContentPool) -> Self {
        let cells = board
            .cells()
            .iter()
            .enumerate()
            .filter_map(|(index, &id)| {
                pool.get(id).map(|item| CellView {
                    index,
                    item: item.clone(),
                    marked: marks.is_marked(index),
                })
            })
            .collect();
        Self { cells }
    }

    /// Cells of one row
    pub fn row(&self, row: usize) -> &[CellView] {
        let start = (row * BOARD_SIZE).min(self.cells.len());
        let end = (start + BOARD_SIZE).min(self.cells.len());
        &self.cells[start..end]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashSet;

    fn small_pool(callable: usize) -> ContentPool {
        let mut items: Vec<Item> = (0..callable)
            .map(|i| Item::new(format!("Item {i}"), "•"))
            .collect();
        items.push(Item::free("FREE", "⭐"));
        ContentPool::new(items).unwrap()
    }

    #[test]
    fn test_generated_board_invariants() {
        let pool = ContentPool::standard();

        for seed in 0..200 {
            let mut rng = StdRng::seed_from_u64(seed);
            let board = Board::generate(&pool, &mut rng).unwrap();

            assert_eq!(board.item_at(FREE_INDEX), Some(pool.free_id()));

            let others: Vec<ItemId> = board
                .cells()
                .iter()
                .enumerate()
                .filter(|(i, _)| *i != FREE_INDEX)
                .map(|(_, &id)| id)
                .collect();
            assert_eq!(others.len(), 24);
            assert!(!others.contains(&pool.free_id()));

            let distinct: HashSet<ItemId> = others.iter().copied().collect();
            assert_eq!(distinct.len(), 24);
        }
    }

    #[test]
    fn test_exact_pool_uses_every_item() {
        let pool = small_pool(24);
        let mut rng = StdRng::seed_from_u64(7);
        let board = Board::generate(&pool, &mut rng).unwrap();

        let used: HashSet<ItemId> = board.cells().iter().copied().collect();
        assert_eq!(used.len(), 25);
    }

    #[test]
    fn test_pool_too_small() {
        let pool = small_pool(23);
        let mut rng = StdRng::seed_from_u64(1);
        let err = Board::generate(&pool, &mut rng).unwrap_err();
        assert!(matches!(
            err,
            BingoError::PoolTooSmall {
                found: 23,
                required: 24
            }
        ));
    }

    #[test]
    fn test_boards_differ_across_seeds() {
        let pool = ContentPool::standard();
        let a = Board::generate(&pool, &mut StdRng::seed_from_u64(1)).unwrap();
        let b = Board::generate(&pool, &mut StdRng::seed_from_u64(2)).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_free_space_premarked() {
        let marks = CellState::new();
        assert!(marks.is_marked(FREE_INDEX));
        assert_eq!(marks.marked_count(), 1);
    }

    #[test]
    fn test_free_space_cannot_be_unmarked() {
        let mut marks = CellState::new();
        assert!(marks.toggle(FREE_INDEX).unwrap());
        assert!(marks.is_marked(FREE_INDEX));
    }

    #[test]
    fn test_toggle_and_mark() {
        let mut marks = CellState::new();
        assert!(marks.toggle(3).unwrap());
        assert!(!marks.toggle(3).unwrap());
        assert!(marks.mark(3).unwrap());
        assert!(!marks.mark(3).unwrap());
        assert_eq!(marks.marked_indices(), vec![3, FREE_INDEX]);
    }

    #[test]
    fn test_out_of_range() {
        let mut marks = CellState::new();
        assert!(matches!(marks.toggle(25), Err(BingoError::CellOutOfRange(25))));
        assert!(matches!(marks.mark(99), Err(BingoError::CellOutOfRange(99))));
        assert!(!marks.is_marked(25));
    }

    #[test]
    fn test_snapshot_rows() {
        let pool = ContentPool::standard();
        let board = Board::generate(&pool, &mut StdRng::seed_from_u64(3)).unwrap();
        let snapshot = BoardSnapshot::capture(&board, &CellState::new(), &pool);

        assert_eq!(snapshot.cells.len(), CELL_COUNT);
        let middle = snapshot.row(2);
        assert!(middle[2].item.is_free);
        assert!(middle[2].marked);
        assert_eq!(Board::row_col(13), (2, 3));
    }
}
