//! Plays one complete simulated game.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::board::{generate_board, Board};
use super::config::GameParams;
use super::draw::DrawSequence;
use super::win::{evaluate, WinCondition, WinPattern};

/// Outcome of one simulated game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameResult {
    /// 1-based position of the game in its batch
    pub game_index: u32,
    /// Draws consumed until the first win (the full range if nobody won)
    pub draw_count: u32,
    /// 0-based index of the first winning board, None if nobody won
    pub winning_board_index: Option<usize>,
    /// Pattern that completed on the winning board
    pub win_condition_matched: Option<WinPattern>,
}

impl GameResult {
    pub fn has_winner(&self) -> bool {
        self.winning_board_index.is_some()
    }
}

/// A game result plus generation diagnostics that the batch tallies.
#[derive(Debug, Clone, Copy)]
pub(crate) struct PlayedGame {
    pub result: GameResult,
    pub degraded_boards: u32,
}

/// Deal boards, draw until a board wins, and report the result.
pub fn play_game<R: Rng + ?Sized>(params: &GameParams, game_index: u32, rng: &mut R) -> GameResult {
    play_game_with_diagnostics(params, game_index, rng).result
}

pub(crate) fn play_game_with_diagnostics<R: Rng + ?Sized>(
    params: &GameParams,
    game_index: u32,
    rng: &mut R,
) -> PlayedGame {
    let mut boards: Vec<Board> = (0..params.board_count)
        .map(|_| generate_board(params.board_size, params.min_num, params.max_num, rng))
        .collect();
    let degraded_boards = boards.iter().filter(|b| b.is_degraded()).count() as u32;

    // All boards hear the same calls
    let draws = DrawSequence::shuffled(params.min_num, params.max_num, rng);
    let result = play_out(&mut boards, draws, params.win_condition, game_index);

    PlayedGame {
        result,
        degraded_boards,
    }
}

/// Draw numbers onto `boards` until one satisfies `condition`.
///
/// Boards are checked in index order after every draw, so ties go to the
/// lowest index. An exhausted sequence yields a result with no winner.
pub fn play_out(
    boards: &mut [Board],
    mut draws: DrawSequence,
    condition: WinCondition,
    game_index: u32,
) -> GameResult {
    let total_draws = draws.len() as u32;
    let mut draw_count = 0;

    for number in draws.by_ref() {
        draw_count += 1;
        for board in boards.iter_mut() {
            board.stamp(number);
        }

        let winner = boards
            .iter()
            .enumerate()
            .find_map(|(i, b)| evaluate(b, condition).map(|p| (i, p)));
        if let Some((index, pattern)) = winner {
            return GameResult {
                game_index,
                draw_count,
                winning_board_index: Some(index),
                win_condition_matched: Some(pattern),
            };
        }
    }

    GameResult {
        game_index,
        draw_count: total_draws,
        winning_board_index: None,
        win_condition_matched: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulator::board::Cell;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn params(win_condition: WinCondition) -> GameParams {
        GameParams {
            board_size: 5,
            board_count: 2,
            min_num: 1,
            max_num: 75,
            win_condition,
        }
    }

    #[test]
    fn test_classic_game_has_winner() {
        let mut rng = ChaCha8Rng::seed_from_u64(12345);
        for i in 1..=50 {
            let result = play_game(&params(WinCondition::Any), i, &mut rng);
            assert_eq!(result.game_index, i);
            assert!(result.has_winner());
            assert!(result.winning_board_index.unwrap() < 2);
            // A line needs at least 4 numbers on a board with a free center
            assert!(result.draw_count >= 4 && result.draw_count <= 75);
        }
    }

    #[test]
    fn test_blackout_takes_at_least_24_draws() {
        let mut rng = ChaCha8Rng::seed_from_u64(555);
        let result = play_game(&params(WinCondition::Blackout), 1, &mut rng);
        assert_eq!(result.win_condition_matched, Some(WinPattern::Blackout));
        assert!(result.draw_count >= 24);
    }

    #[test]
    fn test_same_seed_same_result() {
        let p = params(WinCondition::Any);
        let a = play_game(&p, 3, &mut ChaCha8Rng::seed_from_u64(77));
        let b = play_game(&p, 3, &mut ChaCha8Rng::seed_from_u64(77));
        assert_eq!(a, b);
    }

    #[test]
    fn test_one_by_one_board_wins_on_first_draw() {
        let p = GameParams {
            board_size: 1,
            board_count: 1,
            min_num: 1,
            max_num: 10,
            win_condition: WinCondition::Any,
        };
        let result = play_game(&p, 1, &mut ChaCha8Rng::seed_from_u64(1));
        assert_eq!(result.draw_count, 1);
        assert_eq!(result.winning_board_index, Some(0));
        assert_eq!(result.win_condition_matched, Some(WinPattern::Row));
    }

    #[test]
    fn test_degraded_boards_still_play() {
        // 24 cells from only 10 numbers: duplicates, but every cell gets stamped eventually
        let p = GameParams {
            board_size: 5,
            board_count: 3,
            min_num: 1,
            max_num: 10,
            win_condition: WinCondition::Blackout,
        };
        let played = play_game_with_diagnostics(&p, 1, &mut ChaCha8Rng::seed_from_u64(9));
        assert_eq!(played.degraded_boards, 3);
        assert!(played.result.has_winner());
        assert!(played.result.draw_count <= 10);
    }

    #[test]
    fn test_no_winner_reports_full_range() {
        // 99 is never called, so the blackout can't complete
        let n = |v| Cell::Number {
            value: v,
            stamped: false,
        };
        let board = Board::from_rows(vec![vec![n(1), n(2)], vec![n(3), n(99)]]).unwrap();
        let mut boards = vec![board];
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let draws = DrawSequence::shuffled(1, 10, &mut rng);

        let result = play_out(&mut boards, draws, WinCondition::Blackout, 8);
        assert_eq!(result.game_index, 8);
        assert_eq!(result.draw_count, 10);
        assert_eq!(result.winning_board_index, None);
        assert_eq!(result.win_condition_matched, None);
        assert!(!result.has_winner());
    }

    #[test]
    fn test_lowest_board_index_wins_ties() {
        let n = |v| Cell::Number {
            value: v,
            stamped: false,
        };
        let board = Board::from_rows(vec![vec![n(1), n(2)], vec![n(3), n(4)]]).unwrap();
        let mut boards = vec![board.clone(), board];
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let draws = DrawSequence::shuffled(1, 4, &mut rng);

        let result = play_out(&mut boards, draws, WinCondition::Any, 1);
        assert_eq!(result.winning_board_index, Some(0));
        assert_eq!(result.draw_count, 2);
    }
}
