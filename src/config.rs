// Configuration module for reading Rider.toml
// This module provides OOP-style configuration management for the Light Riders bot

use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Main configuration structure containing all tunable parameters
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct Config {
    pub depth: DepthConfig,
    pub opening: OpeningConfig,
    pub scores: ScoresConfig,
    pub board: BoardConfig,
    pub debug: DebugConfig,
}

/// Adaptive search depth constants
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct DepthConfig {
    pub initial_depth: u8,
    pub min_depth: u8,
    pub max_depth: u8,
    pub fast_turn_ms: u64,
    pub slow_turn_ms: u64,
    pub min_time_bank_ms: u64,
    pub slow_turn_extra_decrease: u8,
}

impl DepthConfig {
    /// Turns strictly faster than this may deepen the next search
    pub fn fast_turn(&self) -> Duration {
        Duration::from_millis(self.fast_turn_ms)
    }

    /// Turns strictly slower than this lose extra depth
    pub fn slow_turn(&self) -> Duration {
        Duration::from_millis(self.slow_turn_ms)
    }
}

/// Opening book: how long to head for the opponent before searching
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct OpeningConfig {
    pub toward_opponent_turns: u32,
}

/// Evaluation constants
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ScoresConfig {
    pub opponent_territory_weight: i32,
}

/// Board dimensions used until the judge announces its own
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct BoardConfig {
    pub default_width: usize,
    pub default_height: usize,
}

/// Debug configuration
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct DebugConfig {
    pub enabled: bool,
    pub log_file_path: String,
}

impl Config {
    /// Loads configuration from a TOML file
    ///
    /// # Arguments
    /// * `path` - Path to the Rider.toml configuration file
    ///
    /// # Returns
    /// * `Result<Config, String>` - Parsed configuration or error message
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let contents = fs::read_to_string(path.as_ref())
            .map_err(|e| format!("Failed to read config file: {}", e))?;

        let config: Config = toml::from_str(&contents)
            .map_err(|e| format!("Failed to parse config file: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    /// Creates a configuration with hardcoded default values as fallback
    /// This should match the constants defined in Rider.toml
    pub fn default_hardcoded() -> Self {
        Config {
            depth: DepthConfig {
                initial_depth: 5,
                min_depth: 5,
                max_depth: 20,
                fast_turn_ms: 300,
                slow_turn_ms: 1000,
                min_time_bank_ms: 5500,
                slow_turn_extra_decrease: 2,
            },
            opening: OpeningConfig {
                toward_opponent_turns: 4,
            },
            scores: ScoresConfig {
                opponent_territory_weight: 2,
            },
            board: BoardConfig {
                default_width: 16,
                default_height: 16,
            },
            debug: DebugConfig {
                enabled: false,
                log_file_path: "light_rider_debug.jsonl".to_string(),
            },
        }
    }

    /// Attempts to load from file, falls back to hardcoded defaults on error
    pub fn load_or_default_from<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        Self::from_file(path).unwrap_or_else(|e| {
            log::warn!(
                "Could not load {} ({}), using hardcoded defaults",
                path.display(),
                e
            );
            Self::default_hardcoded()
        })
    }

    fn validate(&self) -> Result<(), String> {
        let depth = &self.depth;
        if depth.min_depth > depth.max_depth {
            return Err(format!(
                "depth.min_depth ({}) exceeds depth.max_depth ({})",
                depth.min_depth, depth.max_depth
            ));
        }
        if depth.initial_depth < depth.min_depth || depth.initial_depth > depth.max_depth {
            return Err(format!(
                "depth.initial_depth ({}) outside [{}, {}]",
                depth.initial_depth, depth.min_depth, depth.max_depth
            ));
        }
        if self.board.default_width == 0 || self.board.default_height == 0 {
            return Err("board dimensions must be non-zero".to_string());
        }
        Ok(())
    }
}
