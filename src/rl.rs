//! Tabular temporal-difference learner
//!
//! The agent keeps a value for every board it has seen, keyed by
//! [`Board::key`] so the same table works whether it plays X or O.
//! In training mode it moves epsilon-greedily and, after each of its own
//! moves, nudges the value of the previous position towards
//! `reward + discount * V(current)`.

use std::collections::HashMap;

use log::{debug, trace};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::agent::apply_or_retry;
use crate::tic_tac_toe::{Board, Mark};

pub const IN_PLAY_REWARD: f64 = 5.0;
pub const WIN_REWARD: f64 = 10.0;
pub const LOSS_REWARD: f64 = 0.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Training,
    Playing,
}

#[derive(Debug, Clone)]
pub struct RlAgent {
    value_function: HashMap<String, f64>,
    learning_rate: f64,
    discount_rate: f64,
    epsilon: f64,
    previous_state: Option<Board>,
    mode: Mode,
}

impl Default for RlAgent {
    fn default() -> Self {
        Self::new()
    }
}

impl RlAgent {
    /// Untrained agent in playing mode.
    pub fn new() -> Self {
        Self {
            value_function: HashMap::new(),
            learning_rate: 0.0,
            discount_rate: 0.0,
            epsilon: 0.0,
            previous_state: None,
            mode: Mode::Playing,
        }
    }

    /// Sets the learning parameters, forgets the previous state and
    /// switches to training mode.
    pub fn init_training(&mut self, learning_rate: f64, discount_rate: f64, epsilon: f64) {
        self.learning_rate = learning_rate;
        self.discount_rate = discount_rate;
        self.epsilon = epsilon;
        self.previous_state = None;
        self.mode = Mode::Training;
    }

    pub fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    pub fn discount_rate(&self) -> f64 {
        self.discount_rate
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    pub fn previous_state(&self) -> Option<&Board> {
        self.previous_state.as_ref()
    }

    pub fn set_previous_state(&mut self, board: Option<Board>) {
        self.previous_state = board;
    }

    pub fn value_function(&self) -> &HashMap<String, f64> {
        &self.value_function
    }

    pub fn table_len(&self) -> usize {
        self.value_function.len()
    }

    pub fn set_value(&mut self, key: impl Into<String>, value: f64) {
        self.value_function.insert(key.into(), value);
    }

    /// Stored value of `key`, inserting 0 for a key not seen before.
    pub fn value_of_state(&mut self, key: &str) -> f64 {
        *self.value_function.entry(key.to_string()).or_insert(0.0)
    }

    pub fn make_move<R: Rng + ?Sized>(&mut self, board: &mut Board, letter: Mark, rng: &mut R) {
        match self.mode {
            Mode::Training => {
                if rng.gen::<f64>() < self.epsilon {
                    let location = *board
                        .remaining_moves()
                        .choose(rng)
                        .unwrap_or_else(|| unreachable!("learner asked to move on a full board"));
                    trace!("exploring cell {location}");
                    apply_or_retry(board, location, letter, rng, "RL");
                } else {
                    self.greedy_move(board, letter, rng);
                }

                let previous = self.previous_state.take();
                self.reward_state(board, letter, previous.as_ref());
                self.previous_state = Some(board.clone());
            }
            Mode::Playing => self.greedy_move(board, letter, rng),
        }
    }

    /// Plays the cell leading to the highest-valued position. The last of
    /// several equal values wins.
    fn greedy_move<R: Rng + ?Sized>(&mut self, board: &mut Board, letter: Mark, rng: &mut R) {
        let mut best_move = None;
        let mut best_value = f64::NEG_INFINITY;

        for &location in board.remaining_moves() {
            let mut copy = board.clone();
            copy.apply_move(location, letter);
            let value = self.value_of_state(&copy.key(letter));
            if value >= best_value {
                best_value = value;
                best_move = Some(location);
            }
        }

        let location =
            best_move.unwrap_or_else(|| unreachable!("learner asked to move on a full board"));
        trace!("exploiting cell {location} (value {best_value})");
        apply_or_retry(board, location, letter, rng, "RL");
    }

    /// 10 for a win by `letter`, 0 for a loss, 5 for anything else.
    pub fn reward(&self, board: &Board, letter: Mark) -> f64 {
        match board.winner() {
            None => IN_PLAY_REWARD,
            Some(winner) if winner == letter => WIN_REWARD,
            Some(_) => LOSS_REWARD,
        }
    }

    /// One-step TD update of the previous position, or a plain reward step
    /// on the current position when there is no previous one.
    pub fn reward_state(&mut self, board: &Board, letter: Mark, previous: Option<&Board>) {
        let reward = self.reward(board, letter);
        let key = board.key(letter);
        let value = self.value_of_state(&key);

        match previous {
            None => {
                let updated = value + self.learning_rate * reward;
                self.value_function.insert(key, updated);
            }
            Some(previous) => {
                let previous_key = previous.key(letter);
                let previous_value = self.value_of_state(&previous_key);
                let updated = previous_value
                    + self.learning_rate
                        * (reward + self.discount_rate * value - previous_value);
                debug!("V({previous_key}) {previous_value:.3} -> {updated:.3}");
                self.value_function.insert(previous_key, updated);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    fn board(s: &str) -> Board {
        s.parse().unwrap()
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_new_agent_is_playing() {
        let agent = RlAgent::new();
        assert_eq!(agent.mode(), Mode::Playing);
        assert_eq!(agent.table_len(), 0);
        assert!(agent.previous_state().is_none());
    }

    #[test]
    fn test_init_training() {
        let mut agent = RlAgent::new();
        agent.set_previous_state(Some(Board::new()));
        agent.init_training(0.1, 1.0, 0.2);

        assert_eq!(agent.mode(), Mode::Training);
        assert_eq!(agent.learning_rate(), 0.1);
        assert_eq!(agent.discount_rate(), 1.0);
        assert_eq!(agent.epsilon(), 0.2);
        assert!(agent.previous_state().is_none());

        agent.set_mode(Mode::Playing);
        assert_eq!(agent.mode(), Mode::Playing);
    }

    #[test]
    fn test_value_of_state_inserts_default() {
        let mut agent = RlAgent::new();
        assert_eq!(agent.value_of_state("L***T****"), 0.0);
        assert_eq!(agent.value_function().get("L***T****"), Some(&0.0));
    }

    #[test]
    fn test_reward() {
        let agent = RlAgent::new();
        assert_eq!(agent.reward(&board("X***O****"), Mark::X), 5.0);
        assert_eq!(agent.reward(&board("XOXXOOOXX"), Mark::X), 5.0);
        assert_eq!(agent.reward(&board("XXXOO****"), Mark::X), 10.0);
        assert_eq!(agent.reward(&board("XXXOO****"), Mark::O), 0.0);
    }

    #[test]
    fn test_reward_state_without_previous() {
        let mut agent = RlAgent::new();
        agent.init_training(0.1, 1.0, 0.0);
        let won = board("XXXOO****");

        agent.reward_state(&won, Mark::X, None);
        assert_close(agent.value_of_state(&won.key(Mark::X)), 1.0);
    }

    #[test]
    fn test_reward_state_temporal_difference() {
        let mut agent = RlAgent::new();
        agent.init_training(0.5, 0.9, 0.0);
        let empty = Board::new();
        let first = board("X********");
        let second = board("X***O***X");

        agent.reward_state(&first, Mark::X, Some(&empty));
        assert_close(agent.value_of_state(&empty.key(Mark::X)), 2.5);
        assert_close(agent.value_of_state(&first.key(Mark::X)), 0.0);

        agent.reward_state(&second, Mark::X, Some(&first));
        assert_close(agent.value_of_state(&first.key(Mark::X)), 2.5);

        // 2.5 + 0.5 * (5 + 0.9 * 2.5 - 2.5)
        agent.reward_state(&first, Mark::X, Some(&empty));
        assert_close(agent.value_of_state(&empty.key(Mark::X)), 4.875);
    }

    #[test]
    fn test_greedy_takes_highest_value() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut agent = RlAgent::new();
        agent.set_value("****L****", 3.0);
        agent.set_value("L********", 1.0);

        let mut board = Board::new();
        agent.make_move(&mut board, Mark::X, &mut rng);
        assert_eq!(board.last_move(), Some(4));
    }

    #[test]
    fn test_greedy_ties_take_last_cell_and_fill_table() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut agent = RlAgent::new();

        let mut board = board("O********");
        agent.make_move(&mut board, Mark::X, &mut rng);
        assert_eq!(board.last_move(), Some(8));
        assert_eq!(agent.table_len(), 8);
        assert!(agent.value_function().values().all(|&v| v == 0.0));
    }

    #[test]
    fn test_unseen_state_beats_negative_value() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut agent = RlAgent::new();
        for location in 0..9 {
            let mut key = vec!['*'; 9];
            key[location] = 'L';
            if location != 2 {
                agent.set_value(key.into_iter().collect::<String>(), -1.0);
            }
        }

        let mut board = Board::new();
        agent.make_move(&mut board, Mark::O, &mut rng);
        assert_eq!(board.last_move(), Some(2));
    }

    #[test]
    fn test_training_move_updates_previous_state() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut agent = RlAgent::new();
        agent.init_training(0.1, 1.0, 0.0);
        let mut board = Board::new();
        agent.set_previous_state(Some(board.clone()));

        agent.make_move(&mut board, Mark::X, &mut rng);
        assert_eq!(board.move_count(), 1);
        assert_eq!(agent.previous_state(), Some(&board));
        // V(empty) = 0 + 0.1 * (5 + 0 - 0)
        assert_close(agent.value_of_state("*********"), 0.5);
    }

    #[test]
    fn test_full_exploration_stays_legal() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut agent = RlAgent::new();
        agent.init_training(0.1, 1.0, 1.0);

        let mut board = Board::new();
        let mut letter = Mark::X;
        while !board.is_game_over() {
            agent.make_move(&mut board, letter, &mut rng);
            letter = letter.opponent();
        }
        assert!(board.is_game_over());
        assert!(agent.table_len() > 0);
    }
}
