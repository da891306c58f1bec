//! Bingo boards and their random generation.

use std::collections::HashSet;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::constants::RESAMPLE_BUDGET_FACTOR;

/// A single square on a board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cell {
    /// Center square of an odd-sized board. Always stamped, never called.
    Free,
    /// A callable number and whether it has been stamped.
    Number { value: i32, stamped: bool },
}

impl Cell {
    pub fn is_stamped(&self) -> bool {
        match self {
            Cell::Free => true,
            Cell::Number { stamped, .. } => *stamped,
        }
    }

    pub fn number(&self) -> Option<i32> {
        match self {
            Cell::Free => None,
            Cell::Number { value, .. } => Some(*value),
        }
    }
}

/// Square grid of cells, stored row-major.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    size: usize,
    cells: Vec<Cell>,
    /// Set when the resample budget ran out and a duplicate number was accepted.
    #[serde(skip)]
    degraded: bool,
}

impl Board {
    /// Build a board from explicit rows. Used for fixtures and replays.
    ///
    /// Returns `None` unless `rows` is a non-empty square grid.
    pub fn from_rows(rows: Vec<Vec<Cell>>) -> Option<Self> {
        let size = rows.len();
        if size == 0 || rows.iter().any(|r| r.len() != size) {
            return None;
        }
        Some(Self {
            size,
            cells: rows.into_iter().flatten().collect(),
            degraded: false,
        })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn cell(&self, row: usize, col: usize) -> Cell {
        self.cells[row * self.size + col]
    }

    pub fn is_stamped(&self, row: usize, col: usize) -> bool {
        self.cell(row, col).is_stamped()
    }

    /// Rows of the board, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks(self.size)
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn is_degraded(&self) -> bool {
        self.degraded
    }

    pub fn stamped_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_stamped()).count()
    }

    pub fn contains(&self, number: i32) -> bool {
        self.cells.iter().any(|c| c.number() == Some(number))
    }

    /// Stamp every cell holding `number`. Returns how many cells changed.
    pub fn stamp(&mut self, number: i32) -> usize {
        self.set_stamped(number, true)
    }

    /// Clear the stamp on every cell holding `number`. Free cells are untouched.
    pub fn unstamp(&mut self, number: i32) -> usize {
        self.set_stamped(number, false)
    }

    fn set_stamped(&mut self, number: i32, on: bool) -> usize {
        let mut changed = 0;
        for cell in &mut self.cells {
            if let Cell::Number { value, stamped } = cell {
                if *value == number && *stamped != on {
                    *stamped = on;
                    changed += 1;
                }
            }
        }
        changed
    }
}

/// Whether `(row, col)` is the free center square of a board of `size`.
pub fn is_free_cell(size: usize, row: usize, col: usize) -> bool {
    size % 2 == 1 && row == size / 2 && col == size / 2
}

/// Generate a random board with numbers drawn from `[min_num, max_num]`.
///
/// Numbers are unique on the board while the range allows it. Each cell gets
/// at most `2 * range` draws to find an unused number; when that budget runs
/// out the last candidate is kept anyway and the board is marked degraded.
pub fn generate_board<R: Rng + ?Sized>(
    size: usize,
    min_num: i32,
    max_num: i32,
    rng: &mut R,
) -> Board {
    let range = (max_num as i64 - min_num as i64 + 1).max(1) as usize;
    let budget = range * RESAMPLE_BUDGET_FACTOR;
    let mut used: HashSet<i32> = HashSet::with_capacity(size * size);
    let mut cells = Vec::with_capacity(size * size);
    let mut degraded = false;

    for row in 0..size {
        for col in 0..size {
            if is_free_cell(size, row, col) {
                cells.push(Cell::Free);
                continue;
            }

            let mut attempts = 0;
            let value = loop {
                let candidate = rng.gen_range(min_num..=max_num);
                attempts += 1;
                if !used.contains(&candidate) {
                    break candidate;
                }
                if used.len() >= range || attempts >= budget {
                    degraded = true;
                    break candidate;
                }
            };
            used.insert(value);
            cells.push(Cell::Number {
                value,
                stamped: false,
            });
        }
    }

    Board {
        size,
        cells,
        degraded,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn create_test_rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(12345)
    }

    fn numbers(board: &Board) -> Vec<i32> {
        board.cells().iter().filter_map(|c| c.number()).collect()
    }

    #[test]
    fn test_odd_board_has_free_center() {
        let mut rng = create_test_rng();
        let board = generate_board(5, 1, 75, &mut rng);

        assert_eq!(board.size(), 5);
        assert_eq!(board.cell(2, 2), Cell::Free);
        assert_eq!(board.stamped_count(), 1);
        assert_eq!(numbers(&board).len(), 24);
    }

    #[test]
    fn test_even_board_has_no_free_cell() {
        let mut rng = create_test_rng();
        let board = generate_board(4, 1, 75, &mut rng);

        assert!(board.cells().iter().all(|c| *c != Cell::Free));
        assert_eq!(board.stamped_count(), 0);
    }

    #[test]
    fn test_numbers_unique_and_in_range() {
        let mut rng = create_test_rng();
        for _ in 0..200 {
            let board = generate_board(5, 1, 75, &mut rng);
            let nums = numbers(&board);
            let unique: HashSet<i32> = nums.iter().copied().collect();
            assert_eq!(unique.len(), nums.len());
            assert!(nums.iter().all(|n| (1..=75).contains(n)));
            assert!(!board.is_degraded());
        }
    }

    #[test]
    fn test_duplicates_only_when_degraded() {
        // 24 numbered cells, 24 numbers available: the budget may or may not run out
        let mut rng = create_test_rng();
        for _ in 0..100 {
            let board = generate_board(5, 1, 24, &mut rng);
            let nums = numbers(&board);
            let unique: HashSet<i32> = nums.iter().copied().collect();
            if !board.is_degraded() {
                assert_eq!(unique.len(), 24);
            }
        }
    }

    #[test]
    fn test_tight_range_degrades_instead_of_failing() {
        let mut rng = create_test_rng();
        let board = generate_board(5, 1, 10, &mut rng);

        assert!(board.is_degraded());
        assert_eq!(numbers(&board).len(), 24);
        assert!(numbers(&board).iter().all(|n| (1..=10).contains(n)));
    }

    #[test]
    fn test_single_cell_board_is_free() {
        let mut rng = create_test_rng();
        let board = generate_board(1, 1, 2, &mut rng);
        assert_eq!(board.cells(), &[Cell::Free]);
    }

    #[test]
    fn test_stamp_and_unstamp() {
        let mut rng = create_test_rng();
        let mut board = generate_board(3, 1, 9, &mut rng);
        let target = board.cell(0, 0).number().unwrap();

        assert_eq!(board.stamp(target), 1);
        assert!(board.is_stamped(0, 0));
        assert_eq!(board.stamp(target), 0);

        assert_eq!(board.unstamp(target), 1);
        assert!(!board.is_stamped(0, 0));
        assert!(board.is_stamped(1, 1));
    }

    #[test]
    fn test_from_rows_rejects_ragged() {
        let n = |v| Cell::Number {
            value: v,
            stamped: false,
        };
        assert!(Board::from_rows(vec![vec![n(1), n(2)], vec![n(3)]]).is_none());
        assert!(Board::from_rows(vec![]).is_none());
        let board = Board::from_rows(vec![vec![n(1), n(2)], vec![n(3), n(4)]]).unwrap();
        assert_eq!(board.size(), 2);
        assert_eq!(board.cell(1, 0), n(3));
    }
}
