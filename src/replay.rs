// Replay module for analyzing logged turns and debugging decision-making
//
// This module provides functionality to:
// 1. Parse JSONL debug logs
// 2. Re-run the search on each logged board at the logged depth
// 3. Compare logged vs replayed moves
// 4. Generate summary reports

use log::{debug, info, warn};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::time::Instant;

use crate::config::Config;
use crate::debug_logger::TurnRecord;
use crate::eval::Evaluator;
use crate::grid::Grid;
use crate::search::Search;
use crate::types::{Action, PlayerId};

/// A single line of the debug JSONL file
pub type LogEntry = TurnRecord;

/// Result of replaying a single turn
#[derive(Debug, Clone)]
pub struct ReplayResult {
    pub round: u32,
    pub original_move: Action,
    pub replayed_move: Action,
    pub matches: bool,
    pub original_value: Option<i32>,
    pub replayed_value: i32,
    pub search_depth: u8,
    pub computation_time_ms: u128,
}

/// Statistics for a complete replay session
#[derive(Debug, Default)]
pub struct ReplayStats {
    pub total_turns: usize,
    pub matches: usize,
    pub mismatches: usize,
    pub match_rate: f64,
}

/// Replay engine for analyzing debug logs
pub struct ReplayEngine {
    config: Config,
    verbose: bool,
}

impl ReplayEngine {
    /// Creates a new replay engine with the given configuration
    pub fn new(config: Config, verbose: bool) -> Self {
        ReplayEngine { config, verbose }
    }

    /// Loads all log entries from a JSONL file
    pub fn load_log_file<P: AsRef<Path>>(&self, log_path: P) -> Result<Vec<LogEntry>, String> {
        let file =
            File::open(log_path.as_ref()).map_err(|e| format!("Failed to open log file: {}", e))?;

        let reader = BufReader::new(file);
        let mut entries = Vec::new();

        for (line_num, line) in reader.lines().enumerate() {
            let line = line.map_err(|e| format!("Failed to read line {}: {}", line_num + 1, e))?;

            if line.trim().is_empty() {
                continue;
            }

            let entry: LogEntry = serde_json::from_str(&line)
                .map_err(|e| format!("Failed to parse JSON on line {}: {}", line_num + 1, e))?;

            entries.push(entry);
        }

        info!("Loaded {} log entries", entries.len());
        Ok(entries)
    }

    /// Re-runs the search on a logged board at the logged depth.
    /// Returns the replayed action, its value, the depth and the time taken.
    pub fn replay_turn(&self, entry: &LogEntry) -> Result<(Action, i32, u8, u128), String> {
        let depth = entry
            .depth
            .ok_or_else(|| format!("Round {} was not searched", entry.round))?;
        let player = PlayerId::from_index(entry.bot_id)
            .ok_or_else(|| format!("Round {} has invalid bot id {}", entry.round, entry.bot_id))?;
        let mut grid = Grid::parse(entry.width, entry.height, &entry.field)
            .map_err(|e| format!("Round {} has an unreadable field: {}", entry.round, e))?;

        let start_time = Instant::now();
        let mut search = Search::new(Evaluator::new(self.config.scores.opponent_territory_weight));
        let result = search.run(&mut grid, player, depth);
        let computation_time = start_time.elapsed().as_millis();

        let action = result.best_move.map(Action::Move).unwrap_or(Action::Pass);
        Ok((action, result.value, depth, computation_time))
    }

    /// Replays a single log entry and compares the result
    pub fn replay_entry(&self, entry: &LogEntry) -> Result<ReplayResult, String> {
        if self.verbose {
            info!("Replaying round {}...", entry.round);
        }

        let original_move = Self::parse_action(&entry.chosen_move)?;
        let (replayed_move, replayed_value, search_depth, computation_time) =
            self.replay_turn(entry)?;

        let matches = original_move == replayed_move;

        let result = ReplayResult {
            round: entry.round,
            original_move,
            replayed_move,
            matches,
            original_value: entry.value,
            replayed_value,
            search_depth,
            computation_time_ms: computation_time,
        };

        if self.verbose {
            if matches {
                info!(
                    "Round {}: ✓ MATCH - {} (value: {}, depth: {}, time: {}ms)",
                    entry.round, replayed_move, replayed_value, search_depth, computation_time
                );
            } else {
                warn!(
                    "Round {}: ✗ MISMATCH - Original: {}, Replayed: {} (value: {}, depth: {}, time: {}ms)",
                    entry.round,
                    original_move,
                    replayed_move,
                    replayed_value,
                    search_depth,
                    computation_time
                );
            }
        }

        Ok(result)
    }

    /// Replays every searched entry; opening and forced turns are skipped
    pub fn replay_all(&self, entries: &[LogEntry]) -> Result<Vec<ReplayResult>, String> {
        let mut results = Vec::new();

        for entry in entries {
            if entry.depth.is_none() {
                debug!("Skipping round {}: not a searched turn", entry.round);
                continue;
            }
            match self.replay_entry(entry) {
                Ok(result) => results.push(result),
                Err(e) => {
                    warn!("Failed to replay round {}: {}", entry.round, e);
                }
            }
        }

        Ok(results)
    }

    /// Replays specific rounds from a log file
    pub fn replay_rounds(
        &self,
        entries: &[LogEntry],
        rounds: &[u32],
    ) -> Result<Vec<ReplayResult>, String> {
        let mut results = Vec::new();

        for round in rounds {
            let entry = entries
                .iter()
                .find(|e| e.round == *round)
                .ok_or_else(|| format!("Round {} not found in log file", round))?;

            match self.replay_entry(entry) {
                Ok(result) => results.push(result),
                Err(e) => {
                    warn!("Failed to replay round {}: {}", round, e);
                }
            }
        }

        Ok(results)
    }

    /// Generates statistics from replay results
    pub fn generate_stats(&self, results: &[ReplayResult]) -> ReplayStats {
        let total_turns = results.len();
        let matches = results.iter().filter(|r| r.matches).count();
        let mismatches = total_turns - matches;
        let match_rate = if total_turns > 0 {
            (matches as f64 / total_turns as f64) * 100.0
        } else {
            0.0
        };

        ReplayStats {
            total_turns,
            matches,
            mismatches,
            match_rate,
        }
    }

    /// Prints a detailed report of replay results
    pub fn print_report(&self, results: &[ReplayResult]) {
        let stats = self.generate_stats(results);

        println!("\n═══════════════════════════════════════════════════════════");
        println!("                    REPLAY REPORT");
        println!("═══════════════════════════════════════════════════════════");
        println!("Total Turns:    {}", stats.total_turns);
        println!("Matches:        {} ({:.1}%)", stats.matches, stats.match_rate);
        println!("Mismatches:     {}", stats.mismatches);
        println!("═══════════════════════════════════════════════════════════\n");

        if !results.is_empty() {
            let avg_time: f64 = results
                .iter()
                .map(|r| r.computation_time_ms as f64)
                .sum::<f64>()
                / results.len() as f64;
            let avg_depth: f64 =
                results.iter().map(|r| r.search_depth as f64).sum::<f64>() / results.len() as f64;

            println!("Average Search Depth:       {:.1}", avg_depth);
            println!("Average Computation Time:   {:.1}ms\n", avg_time);
        }

        let mismatches: Vec<_> = results.iter().filter(|r| !r.matches).collect();
        if !mismatches.is_empty() {
            println!("═══════════════════════════════════════════════════════════");
            println!("                  DETAILED MISMATCHES");
            println!("═══════════════════════════════════════════════════════════");

            for result in mismatches {
                println!(
                    "Round {}: {} → {} (value: {}, depth: {}, time: {}ms)",
                    result.round,
                    result.original_move,
                    result.replayed_move,
                    result.replayed_value,
                    result.search_depth,
                    result.computation_time_ms
                );
            }
            println!();
        }
    }

    /// Validates that specific expected moves were made
    pub fn validate_expected_moves(
        &self,
        entries: &[LogEntry],
        expected_moves: &[(u32, Vec<Action>)], // (round, acceptable_moves)
    ) -> Result<(), String> {
        for (round, acceptable) in expected_moves {
            let entry = entries
                .iter()
                .find(|e| e.round == *round)
                .ok_or_else(|| format!("Round {} not found in log", round))?;

            let actual_move = Self::parse_action(&entry.chosen_move)?;

            if !acceptable.contains(&actual_move) {
                return Err(format!(
                    "Round {}: Expected one of {:?}, but got {}",
                    round,
                    acceptable.iter().map(|a| a.as_str()).collect::<Vec<_>>(),
                    actual_move
                ));
            }
        }

        Ok(())
    }

    /// Helper to parse a logged move label
    pub fn parse_action(s: &str) -> Result<Action, String> {
        s.parse::<Action>()
    }
}
