//! Players and the strategies that pick their moves

use std::collections::VecDeque;
use std::fmt;
use std::io::{self, BufRead, Write};

use log::warn;
use rand::Rng;

use crate::error::{Error, Result};
use crate::minimax::Minimax;
use crate::rl::RlAgent;
use crate::tic_tac_toe::{Board, Mark};

pub const DEFAULT_RATING: f64 = 1200.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum AgentKind {
    Random,
    Human,
    Minimax,
    Reinforcement,
}

impl fmt::Display for AgentKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            AgentKind::Random => "Random",
            AgentKind::Human => "Human",
            AgentKind::Minimax => "Minimax",
            AgentKind::Reinforcement => "RL",
        };
        write!(f, "{name}")
    }
}

#[derive(Debug)]
pub enum Agent {
    Random,
    Human(HumanAgent),
    Minimax,
    Reinforcement(RlAgent),
}

impl Agent {
    pub fn from_kind(kind: AgentKind) -> Self {
        match kind {
            AgentKind::Random => Agent::Random,
            AgentKind::Human => Agent::Human(HumanAgent::stdin()),
            AgentKind::Minimax => Agent::Minimax,
            AgentKind::Reinforcement => Agent::Reinforcement(RlAgent::new()),
        }
    }

    pub fn kind(&self) -> AgentKind {
        match self {
            Agent::Random => AgentKind::Random,
            Agent::Human(_) => AgentKind::Human,
            Agent::Minimax => AgentKind::Minimax,
            Agent::Reinforcement(_) => AgentKind::Reinforcement,
        }
    }
}

/// A seated participant: letter, strategy and accumulated results.
#[derive(Debug)]
pub struct Player {
    pub name: String,
    letter: Mark,
    agent: Agent,
    pub rating: f64,
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
}

impl Player {
    pub fn new(letter: Mark, agent: Agent) -> Self {
        Self {
            name: "Unknown".to_string(),
            letter,
            agent,
            rating: DEFAULT_RATING,
            wins: 0,
            losses: 0,
            draws: 0,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn letter(&self) -> Mark {
        self.letter
    }

    pub fn opponent(&self) -> Mark {
        self.letter.opponent()
    }

    pub fn kind(&self) -> AgentKind {
        self.agent.kind()
    }

    pub fn learner(&self) -> Option<&RlAgent> {
        match &self.agent {
            Agent::Reinforcement(rl) => Some(rl),
            _ => None,
        }
    }

    pub fn learner_mut(&mut self) -> Option<&mut RlAgent> {
        match &mut self.agent {
            Agent::Reinforcement(rl) => Some(rl),
            _ => None,
        }
    }

    pub fn games_played(&self) -> u32 {
        self.wins + self.losses + self.draws
    }

    /// Picks a cell and applies it to `board`.
    ///
    /// Must only be called on the player's turn of an unfinished game.
    pub fn make_move<R: Rng + ?Sized>(&mut self, board: &mut Board, rng: &mut R) -> Result<()> {
        assert!(
            !board.remaining_moves().is_empty(),
            "{} asked to move with no legal moves left",
            self.name
        );

        let letter = self.letter;
        match &mut self.agent {
            Agent::Random => {
                random_move(board, letter, rng);
            }
            Agent::Human(human) => human.make_move(board, letter)?,
            Agent::Minimax => {
                let location = Minimax::new(letter).select_move(board);
                apply_or_retry(board, location, letter, rng, "MINIMAX");
            }
            Agent::Reinforcement(rl) => rl.make_move(board, letter, rng),
        }
        Ok(())
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} {}W {}L {}D {:.2}",
            self.name, self.wins, self.losses, self.draws, self.rating
        )
    }
}

/// Samples cells uniformly until one is free.
pub(crate) fn random_move<R: Rng + ?Sized>(board: &mut Board, letter: Mark, rng: &mut R) -> usize {
    loop {
        let location = rng.gen_range(0..9);
        if board.apply_move(location, letter) {
            return location;
        }
    }
}

/// Applies a chosen cell, falling back to a random legal cell if it is rejected.
pub(crate) fn apply_or_retry<R: Rng + ?Sized>(
    board: &mut Board,
    location: usize,
    letter: Mark,
    rng: &mut R,
    who: &str,
) {
    if !board.apply_move(location, letter) {
        warn!("*** WARNING ILLEGAL MOVE BY {who} *** (cell {location})");
        random_move(board, letter, rng);
    }
}

/// Source of raw move tokens for a human player.
pub trait MoveInput {
    /// Next token entered for `letter`, or `None` once the input is exhausted.
    fn request_move(&mut self, letter: Mark) -> Result<Option<String>>;
}

/// Prompts on stdout and reads one line per move from stdin.
pub struct StdinInput;

impl MoveInput for StdinInput {
    fn request_move(&mut self, letter: Mark) -> Result<Option<String>> {
        print!("Player {letter}, enter a move (e.g. 0...8) : ");
        io::stdout().flush()?;

        let mut line = String::new();
        if io::stdin().lock().read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line))
    }
}

/// Pre-recorded tokens, consumed in order.
#[derive(Debug, Default)]
pub struct ScriptedInput {
    tokens: VecDeque<String>,
}

impl ScriptedInput {
    pub fn new<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tokens: tokens.into_iter().map(Into::into).collect(),
        }
    }
}

impl MoveInput for ScriptedInput {
    fn request_move(&mut self, _letter: Mark) -> Result<Option<String>> {
        Ok(self.tokens.pop_front())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HumanMove {
    Cell(usize),
    Quit,
}

pub fn parse_move(token: &str) -> Result<HumanMove> {
    let token = token.trim();
    if token.eq_ignore_ascii_case("quit") {
        return Ok(HumanMove::Quit);
    }

    let position: usize = token.parse().map_err(|_| Error::InvalidInput {
        input: token.to_string(),
    })?;
    if position > 8 {
        return Err(Error::InvalidMove { position });
    }
    Ok(HumanMove::Cell(position))
}

pub struct HumanAgent {
    input: Box<dyn MoveInput>,
}

impl fmt::Debug for HumanAgent {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("HumanAgent").finish_non_exhaustive()
    }
}

impl HumanAgent {
    pub fn new(input: Box<dyn MoveInput>) -> Self {
        Self { input }
    }

    pub fn stdin() -> Self {
        Self::new(Box::new(StdinInput))
    }

    pub fn scripted<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(Box::new(ScriptedInput::new(tokens)))
    }

    /// Re-prompts until a free cell or `quit` is entered.
    fn make_move(&mut self, board: &mut Board, letter: Mark) -> Result<()> {
        loop {
            let token = self
                .input
                .request_move(letter)?
                .ok_or(Error::InputClosed)?;

            match parse_move(&token) {
                Ok(HumanMove::Quit) => {
                    board.quit();
                    return Ok(());
                }
                Ok(HumanMove::Cell(location)) => {
                    if board.apply_move(location, letter) {
                        return Ok(());
                    }
                    warn!("cell {location} is already taken, try again");
                }
                Err(err) => warn!("{err}, try again"),
            }
        }
    }
}
