// Debug logging module for per-turn game state logging
//
// Each decided turn is appended to a JSONL file: the board as the judge sent
// it, the time bank, and what the bot did with them. The replay tool reads
// these files back.

use log::error;
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::Write;

use crate::bot::TurnDecision;
use crate::grid::Grid;
use crate::types::{Direction, PlayerId};

/// Represents a single debug log entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TurnRecord {
    pub round: u32,
    pub bot_id: usize,
    pub width: usize,
    pub height: usize,
    pub field: String,
    pub time_bank_ms: u64,
    /// Search depth, absent when the turn was not searched
    pub depth: Option<u8>,
    pub chosen_move: String,
    pub value: Option<i32>,
    #[serde(default)]
    pub scores: Vec<(Direction, i32)>,
    pub elapsed_ms: u64,
    pub timestamp: String,
}

impl TurnRecord {
    pub fn new(
        round: u32,
        bot_id: PlayerId,
        grid: &Grid,
        time_bank_ms: u64,
        decision: &TurnDecision,
    ) -> Self {
        let search = decision.search.as_ref();
        TurnRecord {
            round,
            bot_id: bot_id.index(),
            width: grid.width(),
            height: grid.height(),
            field: grid.to_field_string(),
            time_bank_ms,
            depth: search.map(|s| s.depth),
            chosen_move: decision.action.as_str().to_string(),
            value: search.map(|s| s.value),
            scores: search
                .map(|s| s.root_scores.entries().to_vec())
                .unwrap_or_default(),
            elapsed_ms: decision.elapsed.as_millis() as u64,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Appends turn records to a JSONL file; a no-op when disabled
pub struct DebugLogger {
    file: Option<File>,
}

impl DebugLogger {
    /// Creates a new debug logger
    /// If enabled is true, initializes the log file (truncating if it exists)
    pub fn new(enabled: bool, log_file_path: &str) -> Self {
        if !enabled {
            return DebugLogger::disabled();
        }

        match OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(log_file_path)
        {
            Ok(file) => {
                log::info!("Debug logging enabled: {}", log_file_path);
                DebugLogger { file: Some(file) }
            }
            Err(e) => {
                error!("Failed to create debug log file '{}': {}", log_file_path, e);
                DebugLogger::disabled()
            }
        }
    }

    /// Creates a disabled debug logger (no-op)
    pub fn disabled() -> Self {
        DebugLogger { file: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.file.is_some()
    }

    /// Writes one record and flushes; failures are logged, never returned,
    /// so a full disk cannot cost a move
    pub fn log_turn(&mut self, record: &TurnRecord) {
        let Some(file) = self.file.as_mut() else {
            return;
        };

        match serde_json::to_string(record) {
            Ok(json_line) => {
                if let Err(e) = writeln!(file, "{}", json_line) {
                    error!("Failed to write debug log entry: {}", e);
                } else if let Err(e) = file.flush() {
                    error!("Failed to flush debug log: {}", e);
                }
            }
            Err(e) => {
                error!("Failed to serialize debug log entry: {}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bot::DecisionReason;
    use crate::types::Action;
    use std::time::Duration;

    #[test]
    fn test_record_without_search() {
        let grid = Grid::parse(2, 2, "0,.,.,1").unwrap();
        let decision = TurnDecision {
            action: Action::Move(Direction::Right),
            reason: DecisionReason::Opening,
            search: None,
            adjustment: None,
            elapsed: Duration::from_millis(3),
        };
        let record = TurnRecord::new(7, PlayerId::One, &grid, 9000, &decision);

        assert_eq!(record.round, 7);
        assert_eq!(record.bot_id, 1);
        assert_eq!(record.field, "0,.,.,1");
        assert_eq!(record.depth, None);
        assert_eq!(record.chosen_move, "right");
        assert!(record.scores.is_empty());
    }

    #[test]
    fn test_logged_lines_parse_back() {
        let path = std::env::temp_dir().join(format!(
            "light_rider_debug_logger_test_{}.jsonl",
            std::process::id()
        ));
        let path_str = path.to_str().unwrap();

        let grid = Grid::parse(2, 2, "0,.,.,1").unwrap();
        let decision = TurnDecision {
            action: Action::Pass,
            reason: DecisionReason::NoLegalMove,
            search: None,
            adjustment: None,
            elapsed: Duration::ZERO,
        };
        let record = TurnRecord::new(1, PlayerId::Zero, &grid, 10_000, &decision);

        let mut logger = DebugLogger::new(true, path_str);
        assert!(logger.is_enabled());
        logger.log_turn(&record);
        logger.log_turn(&record);
        drop(logger);

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        let parsed: TurnRecord = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(parsed, record);

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_disabled_logger_writes_nothing() {
        let mut logger = DebugLogger::new(false, "/nonexistent/dir/log.jsonl");
        assert!(!logger.is_enabled());
        let grid = Grid::parse(2, 2, "0,.,.,1").unwrap();
        let decision = TurnDecision {
            action: Action::Pass,
            reason: DecisionReason::NoBoard,
            search: None,
            adjustment: None,
            elapsed: Duration::ZERO,
        };
        logger.log_turn(&TurnRecord::new(0, PlayerId::Zero, &grid, 0, &decision));
    }
}
