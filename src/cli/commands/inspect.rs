//! Inspect command - look inside a saved matchbox store

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;

use crate::{
    adapters::repository_for_path,
    cli::output::{format_number, print_board, print_kv, print_section, print_subsection},
    menace::{MatchboxStore, SavedStore},
    tictactoe::{BoardState, canonicalize},
};

#[derive(Parser, Debug)]
#[command(about = "Show the matchbox a saved engine uses for a board")]
pub struct InspectArgs {
    /// Saved matchbox store (`.json` or MessagePack)
    #[arg(long)]
    pub store: PathBuf,

    /// Board in compact form, e.g. `X...O....`; store summary when omitted
    #[arg(long)]
    pub board: Option<String>,
}

/// Bead counts laid out on the board's own orientation; `None` for occupied
/// cells.
pub fn beads_on_board(store: &MatchboxStore, board: &BoardState) -> Option<[Option<u32>; 9]> {
    let context = canonicalize(board);
    let matchbox = store.get(&context.state)?;

    let mut grid = [None; 9];
    for (canonical_pos, count) in matchbox.beads() {
        grid[context.map_canonical_to_original(canonical_pos)] = Some(count);
    }
    Some(grid)
}

fn print_bead_grid(board: &BoardState, grid: &[Option<u32>; 9]) {
    let cells = board.cells();
    for row in 0..3 {
        let rendered: Vec<String> = (0..3)
            .map(|col| {
                let pos = row * 3 + col;
                match grid[pos] {
                    Some(count) => format!("{count:>3}"),
                    None => format!("{:>3}", cells[pos].to_char()),
                }
            })
            .collect();
        println!("    {}", rendered.join(" |"));
        if row < 2 {
            println!("    {}", "-".repeat(14));
        }
    }
}

fn print_summary(saved: &SavedStore, store: &MatchboxStore) {
    let stats = store.stats();
    print_kv("Engine seat", &saved.seat.to_string());
    print_kv("Games played", &saved.games_played.to_string());
    print_kv("Initial beads", &saved.initial_beads.to_string());
    print_kv("Reinforcement", &saved.reinforcement.to_string());
    print_kv("Matchboxes", &format_number(stats.matchboxes));
    print_kv("Total beads", &stats.total_beads.to_string());
    print_kv("Average entropy", &format!("{:.3} nats", stats.average_entropy));
}

pub fn execute(args: InspectArgs) -> Result<()> {
    let saved = repository_for_path(&args.store)
        .load(&args.store)
        .with_context(|| format!("failed to load matchbox store {}", args.store.display()))?;
    let store = saved.to_store()?;

    print_section(&format!("Matchbox store {}", args.store.display()));
    print_summary(&saved, &store);

    let Some(raw) = args.board else {
        return Ok(());
    };
    let board = BoardState::from_string(&raw)?;
    if board.is_terminal() {
        bail!("board '{}' is already decided", board.encode());
    }
    if board.to_move() != saved.seat {
        bail!(
            "{} is to move on '{}', but the engine plays {}",
            board.to_move(),
            board.encode(),
            saved.seat
        );
    }

    let context = canonicalize(&board);
    print_subsection("Board");
    print_board(&board);
    print_kv("Canonical form", &context.state.encode());
    print_kv("Transform", &context.transform.to_string());

    print_subsection("Beads");
    match beads_on_board(&store, &board) {
        Some(grid) => {
            print_bead_grid(&board, &grid);
            let total: u64 = grid.iter().flatten().map(|&count| u64::from(count)).sum();
            println!();
            for (pos, count) in grid.iter().enumerate() {
                if let Some(count) = *count {
                    let share = f64::from(count) * 100.0 / total as f64;
                    print_kv(
                        &format!("Position {pos}"),
                        &format!("{count} beads ({share:.1}%)"),
                    );
                }
            }
        }
        None => println!(
            "  No matchbox yet; it would open with {} beads per move",
            store.schedule().beads_for(board.occupied_count())
        ),
    }

    Ok(())
}
