//! Win detection.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::board::Board;

/// Pattern requested to end a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WinCondition {
    Row,
    Column,
    Diagonal,
    Blackout,
    /// Row, then column, then diagonal. Never blackout.
    #[default]
    Any,
}

/// Pattern that actually completed on a board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WinPattern {
    Row,
    Column,
    Diagonal,
    Blackout,
}

impl WinCondition {
    pub const ALL: [WinCondition; 5] = [
        WinCondition::Row,
        WinCondition::Column,
        WinCondition::Diagonal,
        WinCondition::Blackout,
        WinCondition::Any,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            WinCondition::Row => "row",
            WinCondition::Column => "column",
            WinCondition::Diagonal => "diagonal",
            WinCondition::Blackout => "blackout",
            WinCondition::Any => "any",
        }
    }
}

impl WinPattern {
    pub fn as_str(&self) -> &'static str {
        match self {
            WinPattern::Row => "row",
            WinPattern::Column => "column",
            WinPattern::Diagonal => "diagonal",
            WinPattern::Blackout => "blackout",
        }
    }
}

impl fmt::Display for WinCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for WinPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WinCondition {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        WinCondition::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                format!(
                    "unknown win condition '{}' (expected row, column, diagonal, blackout or any)",
                    s
                )
            })
    }
}

/// Check `board` against `condition`. Returns the completed pattern, if any.
///
/// Read-only: stamps are never touched.
pub fn evaluate(board: &Board, condition: WinCondition) -> Option<WinPattern> {
    match condition {
        WinCondition::Row => has_row(board).then_some(WinPattern::Row),
        WinCondition::Column => has_column(board).then_some(WinPattern::Column),
        WinCondition::Diagonal => has_diagonal(board).then_some(WinPattern::Diagonal),
        WinCondition::Blackout => is_blackout(board).then_some(WinPattern::Blackout),
        WinCondition::Any => evaluate(board, WinCondition::Row)
            .or_else(|| evaluate(board, WinCondition::Column))
            .or_else(|| evaluate(board, WinCondition::Diagonal)),
    }
}

fn has_row(board: &Board) -> bool {
    board.rows().any(|row| row.iter().all(|c| c.is_stamped()))
}

fn has_column(board: &Board) -> bool {
    let n = board.size();
    (0..n).any(|col| (0..n).all(|row| board.is_stamped(row, col)))
}

fn has_diagonal(board: &Board) -> bool {
    let n = board.size();
    let main = (0..n).all(|i| board.is_stamped(i, i));
    let anti = (0..n).all(|i| board.is_stamped(i, n - 1 - i));
    main || anti
}

fn is_blackout(board: &Board) -> bool {
    board.cells().iter().all(|c| c.is_stamped())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulator::board::Cell;

    /// Board of `size` numbered 1..=size*size with the given cells stamped.
    fn board_with(size: usize, stamped: &[(usize, usize)]) -> Board {
        let rows = (0..size)
            .map(|r| {
                (0..size)
                    .map(|c| Cell::Number {
                        value: (r * size + c + 1) as i32,
                        stamped: stamped.contains(&(r, c)),
                    })
                    .collect()
            })
            .collect();
        Board::from_rows(rows).unwrap()
    }

    fn all_except(size: usize, skip: (usize, usize)) -> Vec<(usize, usize)> {
        (0..size)
            .flat_map(|r| (0..size).map(move |c| (r, c)))
            .filter(|&p| p != skip)
            .collect()
    }

    #[test]
    fn test_empty_board_never_wins() {
        let board = board_with(5, &[]);
        for condition in WinCondition::ALL {
            assert_eq!(evaluate(&board, condition), None);
        }
    }

    #[test]
    fn test_row_and_column() {
        let row: Vec<_> = (0..5).map(|c| (3, c)).collect();
        let board = board_with(5, &row);
        assert_eq!(evaluate(&board, WinCondition::Row), Some(WinPattern::Row));
        assert_eq!(evaluate(&board, WinCondition::Column), None);

        let col: Vec<_> = (0..5).map(|r| (r, 1)).collect();
        let board = board_with(5, &col);
        assert_eq!(evaluate(&board, WinCondition::Column), Some(WinPattern::Column));
        assert_eq!(evaluate(&board, WinCondition::Row), None);
        assert_eq!(evaluate(&board, WinCondition::Any), Some(WinPattern::Column));
    }

    #[test]
    fn test_both_diagonals() {
        let main: Vec<_> = (0..4).map(|i| (i, i)).collect();
        let board = board_with(4, &main);
        assert_eq!(evaluate(&board, WinCondition::Diagonal), Some(WinPattern::Diagonal));

        let anti: Vec<_> = (0..4).map(|i| (i, 3 - i)).collect();
        let board = board_with(4, &anti);
        assert_eq!(evaluate(&board, WinCondition::Diagonal), Some(WinPattern::Diagonal));
        assert_eq!(evaluate(&board, WinCondition::Any), Some(WinPattern::Diagonal));
    }

    #[test]
    fn test_missing_off_diagonal_cell() {
        // (0, 1) is on neither diagonal of a 5x5 board
        let board = board_with(5, &all_except(5, (0, 1)));

        assert_eq!(evaluate(&board, WinCondition::Blackout), None);
        assert_eq!(evaluate(&board, WinCondition::Diagonal), Some(WinPattern::Diagonal));
        // Rows 1-4 are still complete
        assert_eq!(evaluate(&board, WinCondition::Row), Some(WinPattern::Row));
    }

    #[test]
    fn test_one_by_one_board() {
        // A 1x1 board: row, column, diagonal and blackout are the same cell
        let board = board_with(1, &[]);
        assert_eq!(evaluate(&board, WinCondition::Any), None);

        let board = board_with(1, &[(0, 0)]);
        assert_eq!(evaluate(&board, WinCondition::Blackout), Some(WinPattern::Blackout));
        assert_eq!(evaluate(&board, WinCondition::Any), Some(WinPattern::Row));
    }

    #[test]
    fn test_any_prefers_row_over_diagonal() {
        let mut stamped: Vec<_> = (0..5).map(|c| (0, c)).collect();
        stamped.extend((0..5).map(|i| (i, i)));
        let board = board_with(5, &stamped);

        assert_eq!(evaluate(&board, WinCondition::Diagonal), Some(WinPattern::Diagonal));
        assert_eq!(evaluate(&board, WinCondition::Any), Some(WinPattern::Row));
    }

    #[test]
    fn test_any_never_reports_blackout() {
        let all: Vec<_> = (0..3).flat_map(|r| (0..3).map(move |c| (r, c))).collect();
        let board = board_with(3, &all);
        assert_eq!(evaluate(&board, WinCondition::Blackout), Some(WinPattern::Blackout));
        assert_eq!(evaluate(&board, WinCondition::Any), Some(WinPattern::Row));
    }

    #[test]
    fn test_evaluate_is_read_only() {
        let board = board_with(3, &[(0, 0), (1, 1)]);
        let before = board.clone();
        for condition in WinCondition::ALL {
            let _ = evaluate(&board, condition);
        }
        assert_eq!(board, before);
    }

    #[test]
    fn test_parse_condition() {
        assert_eq!("ROW".parse::<WinCondition>(), Ok(WinCondition::Row));
        assert_eq!(" any ".parse::<WinCondition>(), Ok(WinCondition::Any));
        assert!("corners".parse::<WinCondition>().is_err());
        for condition in WinCondition::ALL {
            assert_eq!(condition.to_string().parse::<WinCondition>(), Ok(condition));
        }
    }
}
