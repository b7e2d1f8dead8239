//! Repeated games between two players with Elo-style rating updates

use log::{debug, info};
use rand::rngs::StdRng;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::agent::Player;
use crate::config::TournamentConfig;
use crate::error::{Error, Result};
use crate::tic_tac_toe::Board;

pub const K_FACTOR: f64 = 30.0;

/// Score both players receive when a game ends without a winner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum DrawScoring {
    /// Both players are scored as if they had won (1.0 each).
    BothWin,
    /// Conventional Elo: 0.5 each.
    Split,
}

impl DrawScoring {
    fn score(self) -> f64 {
        match self {
            DrawScoring::BothWin => 1.0,
            DrawScoring::Split => 0.5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameResult {
    FirstWon,
    SecondWon,
    /// Draw or a game abandoned by a human.
    NoWinner,
}

/// Expected score of a player rated `rating` against `opponent_rating`.
pub fn expected_score(rating: f64, opponent_rating: f64) -> f64 {
    1.0 / (1.0 + 10f64.powf((opponent_rating - rating) / 400.0))
}

/// Plays `board` to the end, asking whichever seated player is on turn to move.
/// `on_move` sees the board after every move.
pub fn play_out<R, F>(
    board: &mut Board,
    first: &mut Player,
    second: &mut Player,
    rng: &mut R,
    mut on_move: F,
) -> Result<()>
where
    R: Rng + ?Sized,
    F: FnMut(&Board),
{
    if first.letter() == second.letter() {
        return Err(Error::SameLetter {
            letter: first.letter().as_char(),
        });
    }

    while !board.is_game_over() {
        let mark = board.next();
        let player = if mark == first.letter() {
            &mut *first
        } else {
            &mut *second
        };
        player.make_move(board, rng)?;
        on_move(board);
    }
    Ok(())
}

pub struct Tournament {
    rng: StdRng,
    human_playing: bool,
    draw_scoring: DrawScoring,
    k_factor: f64,
}

impl Tournament {
    pub fn new(rng: StdRng) -> Self {
        Self {
            rng,
            human_playing: false,
            draw_scoring: DrawScoring::BothWin,
            k_factor: K_FACTOR,
        }
    }

    pub fn from_config(config: &TournamentConfig, rng: StdRng) -> Self {
        Self::new(rng)
            .with_draw_scoring(config.draw_scoring)
            .with_k_factor(config.k_factor)
    }

    pub fn with_draw_scoring(mut self, draw_scoring: DrawScoring) -> Self {
        self.draw_scoring = draw_scoring;
        self
    }

    pub fn with_k_factor(mut self, k_factor: f64) -> Self {
        self.k_factor = k_factor;
        self
    }

    /// Draws the board after every move. Only useful with a human seated.
    pub fn enable_human_player(&mut self) {
        self.human_playing = true;
    }

    /// Plays `games` games with `p1` moving first, rating each one.
    pub fn start(&mut self, p1: &mut Player, p2: &mut Player, games: usize) -> Result<()> {
        for _ in 0..games {
            let result = self.game(p1, p2)?;
            self.elo(p1, p2, result);

            if self.human_playing {
                match result {
                    GameResult::FirstWon => println!("Winner: {}", p1.name),
                    GameResult::SecondWon => println!("Winner: {}", p2.name),
                    GameResult::NoWinner => println!("Draw"),
                }
            }
        }
        Ok(())
    }

    /// Plays `games` games with each player moving first.
    pub fn play_both_ways(&mut self, a: &mut Player, b: &mut Player, games: usize) -> Result<()> {
        self.start(a, b, games)?;
        self.start(b, a, games)
    }

    /// Plays a single game with `p1` moving first.
    pub fn game(&mut self, p1: &mut Player, p2: &mut Player) -> Result<GameResult> {
        let mut board = Board::new();
        board.set_players(p1.letter(), p2.letter());

        let human_playing = self.human_playing;
        if human_playing {
            draw(&board);
        }
        play_out(&mut board, p1, p2, &mut self.rng, |board| {
            if human_playing {
                draw(board);
            }
        })?;

        let result = match board.winner() {
            Some(mark) if mark == p1.letter() => GameResult::FirstWon,
            Some(_) => GameResult::SecondWon,
            None => GameResult::NoWinner,
        };
        debug!(
            "{} vs {}: {:?} after {} moves",
            p1.name,
            p2.name,
            result,
            board.move_count()
        );
        Ok(result)
    }

    /// Updates both ratings and win/loss/draw counters for one result.
    pub fn elo(&self, p1: &mut Player, p2: &mut Player, result: GameResult) {
        let e1 = expected_score(p1.rating, p2.rating);
        let e2 = expected_score(p2.rating, p1.rating);

        let (s1, s2) = match result {
            GameResult::FirstWon => {
                p1.wins += 1;
                p2.losses += 1;
                (1.0, 0.0)
            }
            GameResult::SecondWon => {
                p2.wins += 1;
                p1.losses += 1;
                (0.0, 1.0)
            }
            GameResult::NoWinner => {
                p1.draws += 1;
                p2.draws += 1;
                (self.draw_scoring.score(), self.draw_scoring.score())
            }
        };

        p1.rating += self.k_factor * (s1 - e1);
        p2.rating += self.k_factor * (s2 - e2);
    }
}

fn draw(board: &Board) {
    println!("\n\n\n{}\n\n\n", board.render());
}

/// One line per player: name, wins, losses, draws and rating.
pub fn standings(players: &[&Player]) -> String {
    let lines: Vec<String> = players.iter().map(|p| p.to_string()).collect();
    let table = lines.join("\n");
    info!("standings:\n{table}");
    table
}
