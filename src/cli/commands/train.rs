//! Train command - play a run of games and report how the engine learned

use std::{
    fs::File,
    io::{self, BufRead, Write},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;
use serde::Serialize;

use crate::{
    adapters::repository_for_path,
    app::EngineConfig,
    cli::output::{
        create_training_progress, format_number, print_block_table, print_kv, print_section,
        print_subsection, print_tally,
    },
    menace::{Engine, InitialBeadSchedule, OpponentKind, ReinforcementValues, SavedStore},
    pipeline::{
        JsonlObserver, MetricsObserver, MetricsSummary, ProgressObserver, TrainingConfig,
        TrainingPipeline, TrainingReport,
    },
    ports::rng_from_seed,
    tictactoe::Player,
};

#[derive(Parser, Debug)]
#[command(about = "Train a MENACE engine", allow_negative_numbers = true)]
pub struct TrainArgs {
    /// Number of training games (prompted for when omitted)
    #[arg(long, short = 'g')]
    pub games: Option<usize>,

    /// Mark the engine plays (`x` or `o`); X always moves first
    #[arg(long)]
    pub seat: Option<String>,

    /// Opponent to train against (random, sequential, perfect)
    #[arg(long, short = 'o', default_value = "random")]
    pub opponent: String,

    /// Initial beads per move: one count or four per stage (e.g. 4,3,2,1)
    #[arg(long, conflicts_with = "load")]
    pub init_beads: Option<String>,

    /// Bead changes for win,draw,loss (e.g. 3,1,-1). Win must be positive and
    /// loss negative. The default draw change is 0 (draws leave the beads
    /// alone); any other draw value also reinforces drawn games.
    #[arg(long, conflicts_with = "load")]
    pub reward: Option<String>,

    /// Games per block in the results table
    #[arg(long, default_value_t = 100)]
    pub block_size: usize,

    /// Random seed for reproducibility
    #[arg(long)]
    pub seed: Option<u64>,

    /// Engine configuration file (JSON); flags override its values
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Resume from a saved matchbox store
    #[arg(long)]
    pub load: Option<PathBuf>,

    /// Save the trained matchbox store (`.json` for JSON, MessagePack otherwise)
    #[arg(long, short = 'O')]
    pub save: Option<PathBuf>,

    /// Optional path for writing a summary JSON file
    #[arg(long)]
    pub summary: Option<PathBuf>,

    /// Optional file for JSONL observations
    #[arg(long)]
    pub observations: Option<PathBuf>,

    /// Hide the progress bar
    #[arg(long, default_value_t = false)]
    pub no_progress: bool,
}

#[derive(Debug, Serialize)]
struct TrainingSummaryFile {
    engine: EngineConfig,
    opponent: String,
    games: usize,
    games_played: u64,
    report: TrainingReport,
    metrics: MetricsSummary,
}

/// Parse a game count typed by the operator
pub fn parse_game_count(input: &str) -> crate::Result<usize> {
    let trimmed = input.trim();
    trimmed
        .parse::<usize>()
        .map_err(|_| crate::Error::ParseGameCount {
            input: trimmed.to_string(),
        })
}

/// Ask for a game count until a non-negative integer is entered.
///
/// Fails when `input` runs out before a valid count arrives.
pub fn read_game_count<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> Result<usize> {
    let mut line = String::new();
    loop {
        write!(output, "How many games should MENACE play? ")?;
        output.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            bail!("no game count given before end of input");
        }
        match parse_game_count(&line) {
            Ok(games) => return Ok(games),
            Err(err) => writeln!(output, "{err}")?,
        }
    }
}

fn sanitize_summary_path(raw: &Path) -> PathBuf {
    let mut normalized = raw.to_path_buf();
    let raw_str = raw.as_os_str().to_string_lossy();

    // Trailing separator or no file name: treat as a directory.
    if raw_str.ends_with(std::path::MAIN_SEPARATOR) || normalized.file_name().is_none() {
        normalized.push("training_summary.json");
        return normalized;
    }

    match normalized.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("json") => normalized,
        _ => {
            normalized.set_extension("json");
            normalized
        }
    }
}

/// Engine settings from `--config` with flag overrides applied
fn resolve_config(args: &TrainArgs) -> Result<EngineConfig> {
    let mut config = match &args.config {
        Some(path) => EngineConfig::from_json_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => EngineConfig::default(),
    };

    if let Some(seat) = &args.seat {
        config = config.with_seat(Player::parse(seat)?);
    }
    if let Some(beads) = &args.init_beads {
        config = config.with_initial_beads(beads.parse::<InitialBeadSchedule>()?);
    }
    if let Some(reward) = &args.reward {
        config = config.with_reinforcement(reward.parse::<ReinforcementValues>()?);
    }
    if let Some(seed) = args.seed {
        config = config.with_seed(seed);
    }

    config.validate()?;
    Ok(config)
}

/// Fresh engine from `config`, or the snapshot named by `--load`
fn build_engine(args: &TrainArgs, config: &mut EngineConfig) -> Result<Engine> {
    let Some(path) = &args.load else {
        return Ok(config.build_engine()?);
    };

    let saved = repository_for_path(path)
        .load(path)
        .with_context(|| format!("failed to load matchbox store {}", path.display()))?;
    if args.seat.is_some() && config.seat != saved.seat {
        return Err(anyhow!(
            "--seat {} does not match the loaded store, which plays {}",
            config.seat,
            saved.seat
        ));
    }

    config.seat = saved.seat;
    config.initial_beads = saved.initial_beads;
    config.reinforcement = saved.reinforcement;
    Ok(Engine::from_saved(&saved, rng_from_seed(config.seed))?)
}

pub fn execute(args: TrainArgs) -> Result<()> {
    let mut config = resolve_config(&args)?;
    let opponent_kind: OpponentKind = args.opponent.parse()?;
    let training = TrainingConfig::new(0, args.block_size);
    training.validate()?;

    let mut engine = build_engine(&args, &mut config)?;

    let games = match args.games {
        Some(games) => games,
        None => read_game_count(&mut io::stdin().lock(), &mut io::stdout().lock())?,
    };

    print_section("MENACE training");
    print_kv("Engine seat", &config.seat.to_string());
    print_kv("Opponent", &opponent_kind.to_string());
    print_kv("Initial beads", &config.initial_beads.to_string());
    print_kv("Reinforcement", &config.reinforcement.to_string());
    print_kv("Games", &format_number(games));
    if engine.games_played() > 0 {
        print_kv("Resumed after", &format!("{} games", engine.games_played()));
    }

    let metrics = MetricsObserver::new();
    let metrics_handle = metrics.handle();
    let mut pipeline = TrainingPipeline::new(TrainingConfig::new(games, args.block_size))
        .with_observer(Box::new(metrics));
    if !args.no_progress {
        let bar = create_training_progress(games as u64)?;
        pipeline = pipeline.with_observer(Box::new(ProgressObserver::with_bar(bar)));
    }
    if let Some(path) = &args.observations {
        let observer = JsonlObserver::new(path)
            .with_context(|| format!("failed to open observations file {}", path.display()))?;
        pipeline = pipeline.with_observer(Box::new(observer));
    }

    // Offset so the opponent does not replay the engine's draws.
    let mut opponent = opponent_kind.build(config.seed.map(|seed| seed.wrapping_add(1)));
    let report = pipeline
        .run(&mut engine, &mut *opponent)
        .context("training run failed")?;
    let metrics = metrics_handle.summary();

    print_subsection("Results");
    print_tally(&report.total);
    print_kv("Avg game length", &format!("{:.2} moves", metrics.avg_game_length));

    if !report.blocks.is_empty() {
        print_subsection(&format!("Per block of {}", format_number(report.block_size)));
        print_block_table(&report.blocks, report.block_size);
    }

    print_subsection("Matchboxes");
    print_kv("Matchboxes", &format_number(report.store.matchboxes));
    print_kv("Total beads", &report.store.total_beads.to_string());
    print_kv(
        "Average entropy",
        &format!("{:.3} nats", report.store.average_entropy),
    );

    if let Some(path) = &args.save {
        repository_for_path(path)
            .save(&SavedStore::from_engine(&engine), path)
            .with_context(|| format!("failed to save matchbox store {}", path.display()))?;
        println!("\nMatchbox store saved to {}", path.display());
    }

    if let Some(raw) = &args.summary {
        let path = sanitize_summary_path(raw);
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        let summary = TrainingSummaryFile {
            engine: config,
            opponent: opponent_kind.to_string(),
            games,
            games_played: engine.games_played(),
            report,
            metrics,
        };
        let file = File::create(&path)
            .with_context(|| format!("failed to create summary {}", path.display()))?;
        serde_json::to_writer_pretty(file, &summary)?;
        println!("Summary written to {}", path.display());
    }

    Ok(())
}
