//! Error types for the tic-tac-toe engine

use thiserror::Error;

#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("invalid input '{input}': expected a cell number 0-8 or 'quit'")]
    InvalidInput { input: String },

    #[error("invalid move: cell {position} is out of range or already occupied")]
    InvalidMove { position: usize },

    #[error("move input was closed before a move was entered")]
    InputClosed,

    #[error("both players use the letter '{letter}'")]
    SameLetter { letter: char },

    #[error("training requires one reinforcement learning player")]
    NoLearner,

    #[error("invalid board '{board}': {reason}")]
    InvalidBoard { board: String, reason: String },

    #[error("invalid configuration: {message}")]
    Config { message: String },

    #[error("failed to parse configuration: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
