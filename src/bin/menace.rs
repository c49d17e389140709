//! MENACE driver
//!
//! - `train`: play and learn a run of games, with optional save/resume
//! - `states`: count the decision states each seat needs
//! - `inspect`: show the bead counts a saved engine holds for a board

use anyhow::Result;
use clap::{Parser, Subcommand};
use matchbox_menace::cli::commands::{inspect, states, train};

#[derive(Parser)]
#[command(name = "menace")]
#[command(version, about = "Matchbox Educable Noughts And Crosses Engine", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train an engine against an opponent
    Train(Box<train::TrainArgs>),

    /// Count reachable decision states
    States(states::StatesArgs),

    /// Inspect a saved matchbox store
    Inspect(inspect::InspectArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Train(args) => train::execute(*args),
        Commands::States(args) => states::execute(args),
        Commands::Inspect(args) => inspect::execute(args),
    }
}
