//! Output formatting and progress bars for CLI

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};

use crate::{pipeline::Tally, tictactoe::BoardState};

/// Create a progress bar for training
pub fn create_training_progress(total_games: u64) -> Result<ProgressBar> {
    let pb = ProgressBar::new(total_games);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} games ({msg})")
            .context("invalid progress bar template")?
            .progress_chars("=>-"),
    );
    Ok(pb)
}

/// Print a section header
pub fn print_section(title: &str) {
    println!("\n{}", "=".repeat(60));
    println!("{title}");
    println!("{}", "=".repeat(60));
}

/// Print a subsection header
pub fn print_subsection(title: &str) {
    println!("\n{title}");
    println!("{}", "-".repeat(40));
}

/// Format a number with thousands separators
pub fn format_number(n: usize) -> String {
    let digits = n.to_string();
    let mut result = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i).is_multiple_of(3) {
            result.push(',');
        }
        result.push(c);
    }
    result
}

/// Format a fraction as a percentage with one decimal
pub fn format_percent(rate: f64) -> String {
    format!("{:.1}%", rate * 100.0)
}

/// Print a key-value pair
pub fn print_kv(key: &str, value: &str) {
    println!("  {:20} {}", format!("{key}:"), value);
}

/// Print win/draw/loss counts with rates
pub fn print_tally(tally: &Tally) {
    let line = |count: usize, rate: f64| format!("{} ({})", format_number(count), format_percent(rate));
    print_kv("Games", &format_number(tally.games()));
    print_kv("Engine wins", &line(tally.engine_wins, tally.engine_win_rate()));
    print_kv("Draws", &line(tally.draws, tally.draw_rate()));
    print_kv(
        "Engine losses",
        &line(tally.engine_losses, tally.opponent_win_rate()),
    );
}

/// Print one row per block: games covered and outcome rates
pub fn print_block_table(blocks: &[Tally], block_size: usize) {
    println!(
        "  {:>15}  {:>8}  {:>8}  {:>8}",
        "games", "win", "draw", "loss"
    );
    for (i, block) in blocks.iter().enumerate() {
        let start = i * block_size + 1;
        let end = start + block.games() - 1;
        println!(
            "  {:>15}  {:>8}  {:>8}  {:>8}",
            format!("{start}-{end}"),
            format_percent(block.engine_win_rate()),
            format_percent(block.draw_rate()),
            format_percent(block.opponent_win_rate()),
        );
    }
}

/// Print a board indented under the current section
pub fn print_board(board: &BoardState) {
    for line in board.to_string().lines() {
        println!("    {line}");
    }
}
