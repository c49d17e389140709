//! States command - how many matchboxes each seat and filter calls for

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use crate::{
    cli::output::{format_number, print_kv, print_section, print_subsection},
    tictactoe::{
        DecisionStateStats, Player, StateFilter, analyze_decision_states, format_board,
        reachable_canonical_states, reachable_decision_states,
    },
};

#[derive(Parser, Debug)]
#[command(about = "Count the decision states a matchbox engine needs")]
pub struct StatesArgs {
    /// Seat to analyse (`x` or `o`); both when omitted
    #[arg(long)]
    pub seat: Option<String>,

    /// List the states admitted by this filter (all, decision-only, michie)
    #[arg(long)]
    pub list: Option<String>,

    /// Write the analysis as JSON
    #[arg(long)]
    pub export: Option<PathBuf>,
}

fn print_stats(stats: &DecisionStateStats) {
    print_subsection(&format!("Engine plays {}", stats.seat));
    print_kv("all", &format_number(stats.total));
    print_kv("decision-only", &format_number(stats.total - stats.forced));
    print_kv("michie", &format_number(stats.michie));
    print_kv("forced", &format_number(stats.forced));
    print_kv("double threat", &format_number(stats.double_threat));

    println!("\n  By marks on the board:");
    for (occupied, count) in stats.by_occupied.iter().enumerate() {
        if *count > 0 {
            println!("    {occupied}: {count}");
        }
    }
}

pub fn execute(args: StatesArgs) -> Result<()> {
    let seats = match &args.seat {
        Some(seat) => vec![Player::parse(seat)?],
        None => vec![Player::X, Player::O],
    };
    let list_filter = args
        .list
        .as_deref()
        .map(str::parse::<StateFilter>)
        .transpose()?;

    print_section("Noughts and crosses state space");
    print_kv(
        "Canonical positions",
        &format_number(reachable_canonical_states().len()),
    );

    let mut all_stats = Vec::with_capacity(seats.len());
    for seat in seats {
        let stats = analyze_decision_states(seat);
        print_stats(&stats);

        if let Some(filter) = list_filter {
            let states = reachable_decision_states(seat, filter);
            println!("\n  {filter} states ({}):", states.len());
            for state in &states {
                let encoded = state.encode();
                println!("    {}", format_board(&encoded).unwrap_or(encoded));
            }
        }
        all_stats.push(stats);
    }

    if let Some(path) = args.export {
        let file = std::fs::File::create(&path)
            .with_context(|| format!("failed to create {}", path.display()))?;
        serde_json::to_writer_pretty(file, &all_stats)?;
        println!("\nState counts exported to: {}", path.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn export_holds_both_seats() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("states.json");
        execute(StatesArgs {
            seat: None,
            list: None,
            export: Some(path.clone()),
        })
        .unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let stats: Vec<DecisionStateStats> = serde_json::from_str(&text).unwrap();
        assert_eq!(stats.len(), 2);
        assert_eq!(stats[0].seat, Player::X);
        assert_eq!(stats[0].total - stats[0].forced, 304);
        assert_eq!(stats[1].total, 289);
    }

    #[test]
    fn bad_filter_is_rejected() {
        let result = execute(StatesArgs {
            seat: Some("o".to_string()),
            list: Some("everything".to_string()),
            export: None,
        });
        assert!(result.is_err());
    }
}
