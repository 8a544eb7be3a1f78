// Standalone replay tool for analyzing Light Rider debug logs
//
// Usage:
//   cargo run --bin replay -- <log_file> [options]
//
// Options:
//   --all                    Replay all searched rounds
//   --rounds <r1,r2>         Replay specific rounds (comma-separated)
//   --validate <r:move,...>  Check logged moves against expectations
//   --verbose                Show detailed output for each round
//   --config <path>          Path to Rider.toml (default: Rider.toml)

use std::env;
use std::process;

use light_rider::config::Config;
use light_rider::replay::ReplayEngine;
use light_rider::types::Action;

enum Mode {
    All,
    Rounds(String),
    Validate(String),
}

fn print_usage() {
    eprintln!("Light Rider Replay Tool");
    eprintln!();
    eprintln!("USAGE:");
    eprintln!("  replay <log_file> [OPTIONS]");
    eprintln!();
    eprintln!("OPTIONS:");
    eprintln!("  --all                   Replay all searched rounds in the log");
    eprintln!("  --rounds <R1,R2,...>    Replay specific rounds (comma-separated)");
    eprintln!("  --validate <R:M,...>    Validate expected moves (format: round:move,...)");
    eprintln!("  --verbose               Show detailed output for each round");
    eprintln!("  --config <path>         Path to Rider.toml (default: Rider.toml)");
    eprintln!("  --help                  Show this help message");
    eprintln!();
    eprintln!("EXAMPLES:");
    eprintln!("  # Replay all searched rounds");
    eprintln!("  replay light_rider_debug.jsonl --all");
    eprintln!();
    eprintln!("  # Replay specific rounds");
    eprintln!("  replay light_rider_debug.jsonl --rounds 5,10,15");
    eprintln!();
    eprintln!("  # Validate expected moves, '|' separates acceptable alternatives");
    eprintln!("  replay light_rider_debug.jsonl --validate 5:up,10:right|down");
}

fn parse_rounds(s: &str) -> Result<Vec<u32>, String> {
    s.split(',')
        .map(|r| {
            r.trim()
                .parse::<u32>()
                .map_err(|e| format!("Invalid round number '{}': {}", r, e))
        })
        .collect()
}

fn parse_expected_moves(s: &str) -> Result<Vec<(u32, Vec<Action>)>, String> {
    s.split(',')
        .map(|pair| {
            let (round, moves) = pair
                .trim()
                .split_once(':')
                .ok_or_else(|| format!("Invalid format '{}'. Expected 'round:move'", pair))?;

            let round = round
                .parse::<u32>()
                .map_err(|e| format!("Invalid round number '{}': {}", round, e))?;

            let moves = moves
                .split('|')
                .map(|m| ReplayEngine::parse_action(m.trim()))
                .collect::<Result<Vec<Action>, String>>()?;

            Ok((round, moves))
        })
        .collect()
}

fn required_value(args: &[String], i: usize, flag: &str) -> String {
    match args.get(i + 1) {
        Some(value) => value.clone(),
        None => {
            eprintln!("Error: {} requires an argument", flag);
            process::exit(1);
        }
    }
}

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 || args.iter().any(|a| a == "--help") {
        print_usage();
        process::exit(if args.iter().any(|a| a == "--help") {
            0
        } else {
            1
        });
    }

    let log_file = &args[1];
    let mut config_path = "Rider.toml".to_string();
    let mut verbose = false;
    let mut mode = None;

    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "--all" => mode = Some(Mode::All),
            "--rounds" => {
                mode = Some(Mode::Rounds(required_value(&args, i, "--rounds")));
                i += 1;
            }
            "--validate" => {
                mode = Some(Mode::Validate(required_value(&args, i, "--validate")));
                i += 1;
            }
            "--config" => {
                config_path = required_value(&args, i, "--config");
                i += 1;
            }
            "--verbose" => verbose = true,
            _ => {
                eprintln!("Error: Unknown option '{}'", args[i]);
                print_usage();
                process::exit(1);
            }
        }
        i += 1;
    }

    let Some(mode) = mode else {
        eprintln!("Error: Must specify --all, --rounds, or --validate");
        print_usage();
        process::exit(1);
    };

    let config = Config::from_file(&config_path).unwrap_or_else(|e| {
        eprintln!("Warning: Could not load config from '{}': {}", config_path, e);
        eprintln!("Using default configuration");
        Config::default_hardcoded()
    });

    println!("Replay log file: {}", log_file);

    let engine = ReplayEngine::new(config, verbose);

    let entries = match engine.load_log_file(log_file) {
        Ok(entries) => entries,
        Err(e) => {
            eprintln!("Error loading log file: {}", e);
            process::exit(1);
        }
    };

    if entries.is_empty() {
        eprintln!("Error: Log file is empty");
        process::exit(1);
    }

    println!("Loaded {} log entries\n", entries.len());

    match mode {
        Mode::All => match engine.replay_all(&entries) {
            Ok(results) => engine.print_report(&results),
            Err(e) => {
                eprintln!("Error during replay: {}", e);
                process::exit(1);
            }
        },
        Mode::Rounds(arg) => {
            let rounds = match parse_rounds(&arg) {
                Ok(r) => r,
                Err(e) => {
                    eprintln!("Error parsing rounds: {}", e);
                    process::exit(1);
                }
            };

            println!("Replaying {} specific round(s)...\n", rounds.len());
            match engine.replay_rounds(&entries, &rounds) {
                Ok(results) => engine.print_report(&results),
                Err(e) => {
                    eprintln!("Error during replay: {}", e);
                    process::exit(1);
                }
            }
        }
        Mode::Validate(arg) => {
            let expected_moves = match parse_expected_moves(&arg) {
                Ok(m) => m,
                Err(e) => {
                    eprintln!("Error parsing expected moves: {}", e);
                    process::exit(1);
                }
            };

            println!("Validating {} expected move(s)...\n", expected_moves.len());
            match engine.validate_expected_moves(&entries, &expected_moves) {
                Ok(()) => println!("✓ All expected moves validated successfully!"),
                Err(e) => {
                    eprintln!("✗ Validation failed: {}", e);
                    process::exit(1);
                }
            }
        }
    }
}
