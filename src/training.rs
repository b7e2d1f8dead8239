//! Self-play training driver for the reinforcement learning player

use log::info;
use rand::Rng;

use crate::agent::Player;
use crate::config::TrainingConfig;
use crate::error::{Error, Result};
use crate::tic_tac_toe::{Board, Status};
use crate::tournament::play_out;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrainingSummary {
    pub episodes: usize,
    pub learner_wins: usize,
    pub learner_losses: usize,
    pub draws: usize,
    pub table_size: usize,
}

fn learner<'a>(first: &'a mut Player, second: &'a mut Player) -> Result<&'a mut Player> {
    if first.learner().is_some() {
        Ok(first)
    } else if second.learner().is_some() {
        Ok(second)
    } else {
        Err(Error::NoLearner)
    }
}

/// Trains the learner seated among `first` and `second` with the parameters
/// in `config`, then plays `config.episodes` games with `first` moving first.
pub fn train_with_config<R: Rng + ?Sized>(
    first: &mut Player,
    second: &mut Player,
    config: &TrainingConfig,
    rng: &mut R,
) -> Result<TrainingSummary> {
    learner(first, second)?
        .learner_mut()
        .ok_or(Error::NoLearner)?
        .init_training(config.learning_rate, config.discount_rate, config.epsilon);
    train(first, second, config.episodes, config.log_every, rng)
}

/// Plays `episodes` games with `first` moving first. One of the two players
/// must be a reinforcement learner; it is updated after each of its moves
/// and once more on the final position of every game.
pub fn train<R: Rng + ?Sized>(
    first: &mut Player,
    second: &mut Player,
    episodes: usize,
    log_every: usize,
    rng: &mut R,
) -> Result<TrainingSummary> {
    let letter = learner(first, second)?.letter();
    let mut summary = TrainingSummary {
        episodes,
        ..TrainingSummary::default()
    };

    for episode in 1..=episodes {
        match run_episode(first, second, rng)? {
            Status::Won(mark) if mark == letter => summary.learner_wins += 1,
            Status::Won(_) => summary.learner_losses += 1,
            _ => summary.draws += 1,
        }

        if log_every > 0 && episode % log_every == 0 {
            info!(
                "episode {episode}/{episodes}: {}W {}L {}D",
                summary.learner_wins, summary.learner_losses, summary.draws
            );
        }
    }

    summary.table_size = learner(first, second)?
        .learner()
        .map_or(0, |rl| rl.table_len());
    info!(
        "training finished: {} episodes, {} states learned",
        summary.episodes, summary.table_size
    );
    Ok(summary)
}

/// Plays one training game and returns its final status.
pub fn run_episode<R: Rng + ?Sized>(
    first: &mut Player,
    second: &mut Player,
    rng: &mut R,
) -> Result<Status> {
    let mut board = Board::new();
    board.set_players(first.letter(), second.letter());

    if let Some(rl) = learner(first, second)?.learner_mut() {
        rl.set_previous_state(Some(board.clone()));
    }

    play_out(&mut board, first, second, rng, |_| {})?;

    let player = learner(first, second)?;
    let letter = player.letter();
    if let Some(rl) = player.learner_mut() {
        rl.reward_state(&board, letter, None);
    }
    Ok(board.status())
}
