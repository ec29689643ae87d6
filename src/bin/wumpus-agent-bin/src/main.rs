/*
 * Copyright (C) 2023 Asim Ihsan
 * SPDX-License-Identifier: AGPL-3.0-only
 *
 * This program is free software: you can redistribute it and/or modify it under
 * the terms of the GNU Affero General Public License as published by the Free
 * Software Foundation, version 3.
 *
 * This program is distributed in the hope that it will be useful, but WITHOUT ANY
 * WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A
 * PARTICULAR PURPOSE. See the GNU Affero General Public License for more details.
 *
 * You should have received a copy of the GNU Affero General Public License along
 * with this program. If not, see <https://www.gnu.org/licenses/>
 */

//! Play many seeded games of Wumpus World with the knowledge-based agent and print how it did.
//!
//! Usage:
//!   cargo run --release -p wumpus-agent-bin -- --games 1000 --seed 42
//!   RUST_LOG=debug cargo run -p wumpus-agent-bin -- --games 1 --verbose-games

use std::path::PathBuf;

use clap::Parser;
use rayon::prelude::*;
use tracing::error;
use wumpus_games::{play_game, GameConfig, GameReport, Summary};

#[derive(Debug, Parser)]
#[command(name = "wumpus-agent")]
#[command(about = "Evaluate the knowledge-based Wumpus World agent over many generated levels")]
struct Args {
    /// Number of games to play.
    #[arg(long, default_value_t = 1000)]
    games: u64,

    /// Seed of the first game; game i uses seed + i.
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Stop a game after this many turns.
    #[arg(long, default_value_t = 200)]
    max_turns: usize,

    /// Write one JSON trace per game into this directory.
    #[arg(long)]
    trace_dir: Option<PathBuf>,

    /// Print every game's level and outcome.
    #[arg(long)]
    verbose_games: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::filter::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let config = GameConfig {
        max_turns: args.max_turns,
        record_trace: args.trace_dir.is_some(),
    };
    if let Some(dir) = &args.trace_dir {
        std::fs::create_dir_all(dir)
            .unwrap_or_else(|e| panic!("Failed to create {}: {e}", dir.display()));
    }

    println!("playing {} games from seed {}", args.games, args.seed);
    let reports: Vec<GameReport> = (0..args.games)
        .into_par_iter()
        .filter_map(|i| {
            let seed = args.seed.wrapping_add(i);
            play_game(seed, &config)
                .map_err(|e| error!(seed, "game aborted: {e}"))
                .ok()
        })
        .collect();

    for report in &reports {
        if args.verbose_games {
            println!(
                "seed {}: {} with score {} after {} turns",
                report.seed, report.outcome, report.score, report.turns
            );
            println!("{}", report.level);
        }
        if let (Some(dir), Some(trace)) = (&args.trace_dir, &report.trace) {
            let path = dir.join(format!("game-{}.json", report.seed));
            let json = trace.to_json().expect("trace serializes to JSON");
            std::fs::write(&path, json)
                .unwrap_or_else(|e| panic!("Failed to write {}: {e}", path.display()));
        }
    }

    let aborted = args.games as usize - reports.len();
    let summary: Summary = reports.iter().collect();
    println!();
    println!("{}", summary);
    if aborted > 0 {
        println!("aborted:     {}", aborted);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_args() {
        let args = Args::parse_from(["wumpus-agent"]);
        assert_eq!(args.games, 1000);
        assert_eq!(args.seed, 42);
        assert_eq!(args.max_turns, 200);
        assert_eq!(args.trace_dir, None);
        assert!(!args.verbose_games);
    }

    #[test]
    fn test_flags() {
        let args = Args::parse_from([
            "wumpus-agent",
            "--games",
            "5",
            "--seed",
            "7",
            "--max-turns",
            "50",
            "--trace-dir",
            "/tmp/traces",
            "--verbose-games",
        ]);
        assert_eq!(args.games, 5);
        assert_eq!(args.seed, 7);
        assert_eq!(args.max_turns, 50);
        assert_eq!(args.trace_dir, Some(PathBuf::from("/tmp/traces")));
        assert!(args.verbose_games);
    }

    #[test]
    fn test_seeds_are_played_in_order() {
        let config = GameConfig::default();
        let reports: Vec<GameReport> = (0..8u64)
            .into_par_iter()
            .filter_map(|i| play_game(100 + i, &config).ok())
            .collect();
        let seeds: Vec<u64> = reports.iter().map(|r| r.seed).collect();
        assert_eq!(seeds, (100..108).collect::<Vec<_>>());
    }
}
