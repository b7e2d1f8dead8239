use std::collections::HashMap;

use crate::tic_tac_toe::{Board, Mark, Spot};

const WIN_SCORE: i32 = 10;
const LOSS_SCORE: i32 = -10;

/// Exhaustive game-tree search for one letter.
pub struct Minimax {
    letter: Mark,
}

type Memo = HashMap<([Spot; 9], bool), i32>;

impl Minimax {
    pub fn new(letter: Mark) -> Self {
        Self { letter }
    }

    /// Best cell for `letter` on `board`. Equal scores keep the lowest cell.
    pub fn select_move(&self, board: &Board) -> usize {
        assert!(
            !board.remaining_moves().is_empty(),
            "minimax asked to move on a full board"
        );

        let mut memo = Memo::new();
        let mut best_score = i32::MIN;
        let mut best_move = board.remaining_moves()[0];

        for &location in board.remaining_moves() {
            let mut copy = board.clone();
            copy.apply_move(location, self.letter);
            // The maximizer has just moved; the opponent is on move.
            let score = self.evaluate(&copy, true, &mut memo);
            log::trace!("minimax {}: cell {} scores {}", self.letter, location, score);
            if score > best_score {
                best_score = score;
                best_move = location;
            }
        }

        log::debug!(
            "minimax {} picks cell {} (score {})",
            self.letter,
            best_move,
            best_score
        );
        best_move
    }

    /// With the flag set the opponent places its letter and the minimum child
    /// score is returned; with it clear the searching letter is placed and the
    /// maximum is returned.
    fn evaluate(&self, board: &Board, is_maximizing_turn: bool, memo: &mut Memo) -> i32 {
        if board.is_game_over() {
            return self.score_game(board);
        }

        let memo_key = (*board.spots(), is_maximizing_turn);
        if let Some(&score) = memo.get(&memo_key) {
            return score;
        }

        let mark = if is_maximizing_turn {
            self.letter.opponent()
        } else {
            self.letter
        };

        let scores = board.remaining_moves().iter().map(|&location| {
            let mut copy = board.clone();
            copy.apply_move(location, mark);
            self.evaluate(&copy, !is_maximizing_turn, memo)
        });
        let scores: Vec<i32> = scores.collect();

        let score = if is_maximizing_turn {
            scores.into_iter().min()
        } else {
            scores.into_iter().max()
        }
        .unwrap_or_else(|| unreachable!("non-terminal board without remaining moves"));

        memo.insert(memo_key, score);
        score
    }

    /// +10 if `letter` won, -10 if its opponent won, 0 for a draw or quit.
    pub fn score_game(&self, board: &Board) -> i32 {
        match board.winner() {
            Some(mark) if mark == self.letter => WIN_SCORE,
            Some(_) => LOSS_SCORE,
            None => 0,
        }
    }
}
