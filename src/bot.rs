// Light Riders bot
//
// Owns everything that lives across turns: settings from the judge, the
// latest board, the adaptive depth and the search buffers. One call to
// `get_move` per `action move` line.

use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::SeedableRng;
use std::time::{Duration, Instant};

use crate::config::Config;
use crate::debug_logger::{DebugLogger, TurnRecord};
use crate::depth::{DepthAdjustment, DepthController};
use crate::error::GridError;
use crate::eval::Evaluator;
use crate::grid::Grid;
use crate::search::{ordered_moves, Search, SearchResult};
use crate::simple_profiler;
use crate::types::{Action, Direction, PlayerId, Setting};

/// How moves are picked
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Strategy {
    /// Opening toward the opponent, then alpha-beta search
    Search,
    /// Always step toward the opponent
    TowardOpponent,
    /// Uniformly random legal move
    Random,
}

/// Why a turn's action was chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecisionReason {
    NoBoard,
    NoLegalMove,
    Opening,
    TowardOpponent,
    Random,
    Search,
    /// Search produced no move although legal moves existed
    SearchFallback,
}

#[derive(Debug, Clone)]
pub struct TurnDecision {
    pub action: Action,
    pub reason: DecisionReason,
    pub search: Option<SearchResult>,
    pub adjustment: Option<DepthAdjustment>,
    pub elapsed: Duration,
}

/// Match settings announced through `settings` lines
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSettings {
    pub bot_id: PlayerId,
    pub bot_name: Option<String>,
    pub player_names: Option<(String, String)>,
    pub width: usize,
    pub height: usize,
    pub timebank: Option<Duration>,
    pub time_per_move: Option<Duration>,
}

pub struct Bot {
    config: Config,
    strategy: Strategy,
    settings: GameSettings,
    grid: Option<Grid>,
    // Set when the latest field update was rejected, so `grid` is stale
    field_rejected: bool,
    round: u32,
    steps: u32,
    depth: DepthController,
    search: Search,
    rng: StdRng,
    logger: DebugLogger,
}

impl Bot {
    /// Creates a new Bot instance
    ///
    /// # Arguments
    /// * `config` - Static configuration that does not change during the bot's lifetime
    /// * `strategy` - Move selection policy
    /// * `seed` - RNG seed for the random policies
    pub fn new(config: Config, strategy: Strategy, seed: u64) -> Self {
        let logger = DebugLogger::new(config.debug.enabled, &config.debug.log_file_path);
        let settings = GameSettings {
            bot_id: PlayerId::Zero,
            bot_name: None,
            player_names: None,
            width: config.board.default_width,
            height: config.board.default_height,
            timebank: None,
            time_per_move: None,
        };

        Bot {
            depth: DepthController::new(config.depth.clone()),
            search: Search::new(Evaluator::new(config.scores.opponent_territory_weight)),
            rng: StdRng::seed_from_u64(seed),
            strategy,
            settings,
            grid: None,
            field_rejected: false,
            round: 0,
            steps: 0,
            logger,
            config,
        }
    }

    pub fn settings(&self) -> &GameSettings {
        &self.settings
    }

    pub fn grid(&self) -> Option<&Grid> {
        self.grid.as_ref()
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    /// Depth the next search will use
    pub fn depth(&self) -> u8 {
        self.depth.depth()
    }

    pub fn apply_setting(&mut self, setting: Setting) {
        debug!("Setting: {:?}", setting);
        match setting {
            Setting::Timebank(timebank) => self.settings.timebank = Some(timebank),
            Setting::TimePerMove(per_move) => self.settings.time_per_move = Some(per_move),
            Setting::PlayerNames { player0, player1 } => {
                self.settings.player_names = Some((player0, player1))
            }
            Setting::BotName(name) => self.settings.bot_name = Some(name),
            Setting::BotId(id) => self.settings.bot_id = id,
            Setting::FieldWidth(width) => self.settings.width = width,
            Setting::FieldHeight(height) => self.settings.height = height,
        }
    }

    pub fn update_round(&mut self, round: u32) {
        self.round = round;
    }

    /// Replaces the board with the judge's latest field. A rejected field
    /// leaves the previous board in place.
    pub fn update_field(&mut self, field: &str) -> Result<(), GridError> {
        match Grid::parse(self.settings.width, self.settings.height, field) {
            Ok(grid) => {
                self.grid = Some(grid);
                self.field_rejected = false;
                Ok(())
            }
            Err(err) => {
                self.field_rejected = true;
                Err(err)
            }
        }
    }

    /// Computes and returns the action for this turn
    ///
    /// # Arguments
    /// * `time_bank_ms` - Time left in the shared match budget, as sent with `action move`
    pub fn get_move(&mut self, time_bank_ms: u64) -> Action {
        simple_profiler::reset();

        let decision = self.decide_turn(time_bank_ms);

        info!(
            "Round {}: Chose {} ({:?}, {}ms)",
            self.round,
            decision.action,
            decision.reason,
            decision.elapsed.as_millis()
        );
        simple_profiler::log_report(self.round);

        if self.logger.is_enabled() && self.field_rejected {
            warn!(
                "Round {}: field update was rejected, not recording a stale board",
                self.round
            );
        } else if self.logger.is_enabled() {
            if let Some(grid) = &self.grid {
                let record = TurnRecord::new(
                    self.round,
                    self.settings.bot_id,
                    grid,
                    time_bank_ms,
                    &decision,
                );
                self.logger.log_turn(&record);
            }
        }

        decision.action
    }

    /// Picks this turn's action without logging it to the debug file
    pub fn decide_turn(&mut self, time_bank_ms: u64) -> TurnDecision {
        let start_time = Instant::now();
        self.steps += 1;

        let me = self.settings.bot_id;
        let round = self.round;
        let finish = |action, reason| TurnDecision {
            action,
            reason,
            search: None,
            adjustment: None,
            elapsed: start_time.elapsed(),
        };

        let grid = match self.grid.as_mut() {
            Some(grid) => grid,
            None => {
                warn!("Round {}: move requested before any field update", round);
                return finish(Action::Pass, DecisionReason::NoBoard);
            }
        };

        let legal = grid.legal_moves(me);
        if legal.is_empty() {
            info!("Round {}: no legal moves, passing", round);
            return finish(Action::Pass, DecisionReason::NoLegalMove);
        }

        match self.strategy {
            Strategy::TowardOpponent => {
                let action = toward_opponent(grid, me, &legal);
                finish(action, DecisionReason::TowardOpponent)
            }
            Strategy::Random => {
                let action = random_move(&mut self.rng, &legal);
                finish(action, DecisionReason::Random)
            }
            Strategy::Search if self.steps <= self.config.opening.toward_opponent_turns => {
                let action = toward_opponent(grid, me, &legal);
                finish(action, DecisionReason::Opening)
            }
            Strategy::Search => {
                let depth = self.depth.depth();
                let result = self.search.run(grid, me, depth);

                let (action, reason) = match result.best_move {
                    Some(direction) => (Action::Move(direction), DecisionReason::Search),
                    None => (random_move(&mut self.rng, &legal), DecisionReason::SearchFallback),
                };
                info!(
                    "Round {}: depth {} value {} nodes {} cutoffs {} options {}",
                    round, depth, result.value, result.nodes, result.cutoffs, result.root_scores
                );

                let elapsed = start_time.elapsed();
                let adjustment = self.depth.observe(elapsed, time_bank_ms);
                info!(
                    "Round {}: took {}ms with {}ms in bank -> {}",
                    round,
                    elapsed.as_millis(),
                    time_bank_ms,
                    adjustment
                );

                TurnDecision {
                    action,
                    reason,
                    search: Some(result),
                    adjustment: Some(adjustment),
                    elapsed,
                }
            }
        }
    }
}

/// Legal move that brings `player` closest to the opponent (Manhattan),
/// first in direction order on ties
pub fn toward_opponent(grid: &Grid, player: PlayerId, legal: &[Direction]) -> Action {
    ordered_moves(grid, player)
        .into_iter()
        .find(|direction| legal.contains(direction))
        .map(Action::Move)
        .unwrap_or(Action::Pass)
}

/// Uniformly random legal move
pub fn random_move(rng: &mut StdRng, legal: &[Direction]) -> Action {
    legal
        .choose(rng)
        .copied()
        .map(Action::Move)
        .unwrap_or(Action::Pass)
}
