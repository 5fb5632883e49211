mod geo;
mod ingest;
mod pipeline;
mod query;
mod track;
mod web;

use chrono::TimeDelta;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::pipeline::load_dataset;
use crate::query::{
    parse_tolerance, rank_proximity, resolve_snapshot_str, DEFAULT_MAX_DISTANCE_M,
};

#[derive(Parser)]
#[command(name = "prox-o-mat")]
#[command(about = "Who was near whom, from paired JSON/VTT location recordings")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List entities within range of a target at an instant
    Query {
        /// Directory searched recursively for .json/.vtt pairs
        directory: PathBuf,
        /// ISO-8601 instant, e.g. 2024-05-08T02:04:14.016256Z
        #[arg(long)]
        time: String,
        /// Entity to measure from
        #[arg(long)]
        target: String,
        /// Proximity radius in meters
        #[arg(long, default_value_t = DEFAULT_MAX_DISTANCE_M)]
        max_distance: f64,
        /// Maximum gap between the instant and a usable sample
        #[arg(long, default_value = "1s", value_parser = parse_tolerance)]
        tolerance: TimeDelta,
    },
    /// Summarize the entities found in a directory
    Scan { directory: PathBuf },
    /// Serve the HTTP API
    Serve { config: PathBuf },
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Query {
            directory,
            time,
            target,
            max_distance,
            tolerance,
        } => run_query(&directory, &time, &target, max_distance, tolerance),
        Commands::Scan { directory } => scan(&directory),
        Commands::Serve { config } => serve(&config),
    }
}

fn run_query(
    directory: &Path,
    time: &str,
    target: &str,
    max_distance: f64,
    tolerance: TimeDelta,
) -> ExitCode {
    println!("Processing files...");
    let loaded = match load_dataset(directory) {
        Ok(l) => l,
        Err(e) => {
            eprintln!("Error loading data: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if loaded.dataset.is_empty() {
        println!("No valid entity data found.");
        return ExitCode::SUCCESS;
    }

    let snapshot = resolve_snapshot_str(&loaded.dataset, time, tolerance);
    if snapshot.is_empty() {
        log::warn!("No entity has a sample within tolerance of {}", time);
    } else {
        log::debug!("{} entities resolved at {}", snapshot.len(), time);
    }

    if !snapshot.contains(target) {
        println!("\nEntity '{}' not found at {}.", target, time);
        if let Some(track) = loaded.dataset.get(target) {
            if let (Some(first), Some(last)) = (track.first(), track.last()) {
                println!(
                    "Recorded {} samples between {} and {}.",
                    track.len(),
                    first.timestamp.to_rfc3339(),
                    last.timestamp.to_rfc3339()
                );
            }
        }
        return ExitCode::SUCCESS;
    }

    let neighbors = rank_proximity(&snapshot, target, max_distance);

    println!("\nResults for {}:", time);
    println!("Target entity: {}", target);
    println!("Maximum proximity: {} meters\n", max_distance);

    if neighbors.is_empty() {
        println!("No other entities were within proximity.");
    } else {
        println!("Nearby entities:");
        for n in neighbors {
            println!(" - {}: {:.2} meters away", n.name, n.distance_m);
        }
    }

    ExitCode::SUCCESS
}

fn scan(directory: &Path) -> ExitCode {
    let loaded = match load_dataset(directory) {
        Ok(l) => l,
        Err(e) => {
            eprintln!("Error loading data: {}", e);
            return ExitCode::FAILURE;
        }
    };

    println!(
        "{} entities from {} of {} source pairs",
        loaded.dataset.len(),
        loaded.stats.pairs_loaded,
        loaded.stats.pairs_found
    );

    for track in loaded.dataset.tracks() {
        let (Some(first), Some(last)) = (track.first(), track.last()) else {
            continue;
        };
        println!(
            "  {}: {} samples, {} .. {} (last at {})",
            track.name(),
            track.len(),
            first.timestamp.to_rfc3339(),
            last.timestamp.to_rfc3339(),
            last.position
        );
    }

    ExitCode::SUCCESS
}

fn serve(path: &Path) -> ExitCode {
    let config = match web::Config::from_file(path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error reading config: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Failed to start runtime: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(web::run_server(config)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Server error: {}", e);
            ExitCode::FAILURE
        }
    }
}
