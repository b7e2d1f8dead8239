//! Tic-tac-toe engine with interchangeable agents
//!
//! - [`tic_tac_toe`]: the board, its rules and text rendering
//! - [`agent`]: players and the random, human, minimax and learning strategies
//! - [`minimax`]: exhaustive game-tree search
//! - [`rl`]: tabular temporal-difference learner
//! - [`training`]: self-play training driver
//! - [`tournament`]: repeated games with Elo-style ratings

pub mod agent;
pub mod config;
pub mod error;
pub mod minimax;
pub mod rl;
pub mod tic_tac_toe;
pub mod tournament;
pub mod training;

pub use agent::{Agent, AgentKind, HumanAgent, MoveInput, Player, ScriptedInput, StdinInput};
pub use config::{AppConfig, TournamentConfig, TrainingConfig};
pub use error::{Error, Result};
pub use minimax::Minimax;
pub use rl::{Mode, RlAgent};
pub use tic_tac_toe::{Board, Mark, Spot, Status};
pub use tournament::{DrawScoring, GameResult, Tournament};
pub use training::{train, TrainingSummary};
