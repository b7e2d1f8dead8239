use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;

use tictactoe_agents::agent::{Agent, AgentKind, Player};
use tictactoe_agents::config::AppConfig;
use tictactoe_agents::rl::Mode;
use tictactoe_agents::tic_tac_toe::Mark;
use tictactoe_agents::tournament::{standings, Tournament};
use tictactoe_agents::training::train_with_config;

#[derive(Parser)]
#[command(name = "tictactoe", about = "Tic-tac-toe agents, training and tournaments")]
struct Cli {
    /// Path to TOML configuration file
    #[arg(long, default_value = "tictactoe.toml", global = true)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Play one game with the board drawn after every move
    Play {
        /// Agent playing X, moving first
        #[arg(long, value_enum, default_value = "minimax")]
        first: AgentKind,
        /// Agent playing O
        #[arg(long, value_enum, default_value = "human")]
        second: AgentKind,
    },
    /// Train a learner against a random player, then evaluate it
    Train {
        /// Override number of training episodes
        #[arg(long)]
        episodes: Option<usize>,
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Rate two agents over games played in both seating orders
    Tournament {
        #[arg(long, value_enum)]
        a: AgentKind,
        #[arg(long, value_enum)]
        b: AgentKind,
        /// Games per seating order
        #[arg(long)]
        games: Option<usize>,
        #[arg(long)]
        seed: Option<u64>,
    },
}

fn rng_from(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

fn player(letter: Mark, kind: AgentKind) -> Player {
    Player::new(letter, Agent::from_kind(kind)).with_name(kind.to_string())
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("loading config from {}", cli.config.display()))?;

    match cli.command {
        Command::Play { first, second } => {
            let mut p1 = player(Mark::X, first);
            let mut p2 = player(Mark::O, second);

            let mut tournament =
                Tournament::from_config(&config.tournament, rng_from(config.tournament.seed));
            tournament.enable_human_player();
            tournament.start(&mut p1, &mut p2, 1)?;
        }
        Command::Train { episodes, seed } => {
            let mut training = config.training.clone();
            if let Some(episodes) = episodes {
                training.episodes = episodes;
            }
            let mut rng = rng_from(seed.or(training.seed));

            let mut learner = player(Mark::X, AgentKind::Reinforcement);
            let mut partner = player(Mark::O, AgentKind::Random);

            let summary = train_with_config(&mut learner, &mut partner, &training, &mut rng)
                .context("training the learner")?;
            println!(
                "Trained {} episodes: {}W {}L {}D, {} states",
                summary.episodes,
                summary.learner_wins,
                summary.learner_losses,
                summary.draws,
                summary.table_size
            );

            if let Some(rl) = learner.learner_mut() {
                rl.set_mode(Mode::Playing);
            }
            let mut tournament = Tournament::from_config(&config.tournament, rng);
            tournament.play_both_ways(&mut learner, &mut partner, config.tournament.games)?;
            println!("{}", standings(&[&learner, &partner]));
        }
        Command::Tournament { a, b, games, seed } => {
            let mut p1 = player(Mark::X, a);
            let mut p2 = player(Mark::O, b);
            let games = games.unwrap_or(config.tournament.games);

            let rng = rng_from(seed.or(config.tournament.seed));
            let mut tournament = Tournament::from_config(&config.tournament, rng);
            if a == AgentKind::Human || b == AgentKind::Human {
                tournament.enable_human_player();
            }
            tournament.play_both_ways(&mut p1, &mut p2, games)?;
            println!("{}", standings(&[&p1, &p2]));
        }
    }

    Ok(())
}
