// Reactive search depth control
//
// After each searched turn the controller looks at how long the search took
// and how much time bank is left, and moves the depth for the next turn by
// a step. It never interrupts a search in progress.

use std::fmt;
use std::time::Duration;

use crate::config::DepthConfig;

/// What `observe` did to the depth
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DepthAdjustment {
    Increased { from: u8, to: u8 },
    Decreased { from: u8, to: u8 },
}

impl fmt::Display for DepthAdjustment {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DepthAdjustment::Increased { from, to } => {
                write!(f, "increase depth {} -> {}", from, to)
            }
            DepthAdjustment::Decreased { from, to } => {
                write!(f, "decrease depth {} -> {}", from, to)
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct DepthController {
    depth: u8,
    config: DepthConfig,
}

impl DepthController {
    pub fn new(config: DepthConfig) -> Self {
        DepthController {
            depth: config.initial_depth,
            config,
        }
    }

    /// Starts from an arbitrary depth, even one outside the configured bounds;
    /// the next `observe` brings it back in range
    pub fn starting_at(config: DepthConfig, depth: u8) -> Self {
        DepthController { depth, config }
    }

    /// Depth to use for the next search
    pub fn depth(&self) -> u8 {
        self.depth
    }

    /// Feeds back one completed search.
    ///
    /// Fast turn with a healthy bank: one ply deeper, capped at max_depth.
    /// Otherwise one ply shallower, plus `slow_turn_extra_decrease` more for
    /// a slow turn, floored at min_depth.
    pub fn observe(&mut self, elapsed: Duration, time_bank_ms: u64) -> DepthAdjustment {
        let from = self.depth;

        if elapsed < self.config.fast_turn() && time_bank_ms > self.config.min_time_bank_ms {
            self.depth = from.saturating_add(1).min(self.config.max_depth);
            DepthAdjustment::Increased {
                from,
                to: self.depth,
            }
        } else {
            let mut decrease = 1;
            if elapsed > self.config.slow_turn() {
                decrease += self.config.slow_turn_extra_decrease;
            }
            self.depth = from.saturating_sub(decrease).max(self.config.min_depth);
            DepthAdjustment::Decreased {
                from,
                to: self.depth,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn depth_config() -> DepthConfig {
        Config::default_hardcoded().depth
    }

    #[test]
    fn test_starts_at_initial_depth() {
        assert_eq!(DepthController::new(depth_config()).depth(), 5);
    }

    #[test]
    fn test_fast_turn_with_bank_deepens() {
        let mut controller = DepthController::starting_at(depth_config(), 10);
        let adjustment = controller.observe(Duration::from_millis(100), 6000);
        assert_eq!(adjustment, DepthAdjustment::Increased { from: 10, to: 11 });
        assert_eq!(controller.depth(), 11);
    }

    #[test]
    fn test_slow_turn_loses_three() {
        let mut controller = DepthController::starting_at(depth_config(), 10);
        controller.observe(Duration::from_secs(2), 9000);
        assert_eq!(controller.depth(), 7);

        let mut controller = DepthController::starting_at(depth_config(), 10);
        controller.observe(Duration::from_secs(2), 100);
        assert_eq!(controller.depth(), 7);
    }

    #[test]
    fn test_floor_is_min_depth() {
        let mut controller = DepthController::starting_at(depth_config(), 4);
        let adjustment = controller.observe(Duration::from_secs(5), 100);
        assert_eq!(adjustment, DepthAdjustment::Decreased { from: 4, to: 5 });
        assert_eq!(controller.depth(), 5);
    }

    #[test]
    fn test_ceiling_is_max_depth() {
        let mut controller = DepthController::starting_at(depth_config(), 20);
        controller.observe(Duration::from_millis(1), 100_000);
        assert_eq!(controller.depth(), 20);
    }

    #[test]
    fn test_fast_turn_with_low_bank_shrinks_by_one() {
        let mut controller = DepthController::starting_at(depth_config(), 10);
        controller.observe(Duration::from_millis(100), 5500);
        assert_eq!(controller.depth(), 9);
    }

    #[test]
    fn test_moderate_turn_shrinks_by_one() {
        // Between the fast and slow thresholds, inclusive of both edges
        let mut controller = DepthController::starting_at(depth_config(), 10);
        controller.observe(Duration::from_millis(300), 9000);
        assert_eq!(controller.depth(), 9);
        controller.observe(Duration::from_millis(1000), 9000);
        assert_eq!(controller.depth(), 8);
    }
}
