// Negamax search with alpha-beta pruning
//
// Every node applies a move to the shared grid, recurses for the opponent
// with the window negated and swapped, negates the answer back and undoes
// the move. Leaves (depth exhausted or mover stuck) are scored by the
// territory evaluator from the mover's point of view.

use std::fmt;

use crate::eval::Evaluator;
use crate::grid::Grid;
use crate::profile;
use crate::simple_profiler;
use crate::types::{Direction, PlayerId};

/// Bound of the initial search window, far outside any territory score
pub const INFINITY: i32 = 1_000_000;

/// Value of each root move from the last root search, in search order.
/// Non-best entries may be bounds rather than exact values once pruning
/// has kicked in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RootScores {
    entries: Vec<(Direction, i32)>,
}

impl RootScores {
    fn clear(&mut self) {
        self.entries.clear();
    }

    fn record(&mut self, direction: Direction, value: i32) {
        self.entries.push((direction, value));
    }

    pub fn get(&self, direction: Direction) -> Option<i32> {
        self.entries
            .iter()
            .find(|(d, _)| *d == direction)
            .map(|(_, value)| *value)
    }

    pub fn entries(&self) -> &[(Direction, i32)] {
        &self.entries
    }
}

impl fmt::Display for RootScores {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let listing: Vec<String> = self
            .entries
            .iter()
            .map(|(direction, value)| format!("{}: {}", direction, value))
            .collect();
        write!(f, "[{}]", listing.join(", "))
    }
}

/// Outcome of one root search
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    /// None iff the mover had no legal move at the root
    pub best_move: Option<Direction>,
    pub value: i32,
    pub depth: u8,
    pub root_scores: RootScores,
    pub nodes: u64,
    pub cutoffs: u64,
}

#[derive(Debug, Clone, Default)]
pub struct Search {
    evaluator: Evaluator,
    root_scores: RootScores,
    best_move: Option<Direction>,
    nodes: u64,
    cutoffs: u64,
}

impl Search {
    pub fn new(evaluator: Evaluator) -> Self {
        Search {
            evaluator,
            ..Search::default()
        }
    }

    /// Searches `depth` plies ahead for `player` and returns the chosen move.
    /// The grid is left exactly as it was passed in.
    pub fn run(&mut self, grid: &mut Grid, player: PlayerId, depth: u8) -> SearchResult {
        profile!("search", {
            self.root_scores.clear();
            self.best_move = None;
            self.nodes = 0;
            self.cutoffs = 0;

            let value = self.negamax(grid, player, depth, 0, -INFINITY, INFINITY);

            SearchResult {
                best_move: self.best_move,
                value,
                depth,
                root_scores: self.root_scores.clone(),
                nodes: self.nodes,
                cutoffs: self.cutoffs,
            }
        })
    }

    fn negamax(
        &mut self,
        grid: &mut Grid,
        player: PlayerId,
        depth: u8,
        ply: u8,
        mut alpha: i32,
        beta: i32,
    ) -> i32 {
        self.nodes += 1;

        let moves = ordered_moves(grid, player);
        if depth == 0 || moves.is_empty() {
            return self.evaluator.score(grid, player);
        }

        let opponent = player.opponent();
        let mut best = -INFINITY;

        for direction in moves {
            grid.apply_move(player, direction);
            let value = -self.negamax(grid, opponent, depth - 1, ply + 1, -beta, -alpha);
            grid.undo_move(player, direction);

            if ply == 0 {
                self.root_scores.record(direction, value);
            }
            if value > best {
                best = value;
                if ply == 0 {
                    self.best_move = Some(direction);
                }
            }

            alpha = alpha.max(value);
            if alpha >= beta {
                self.cutoffs += 1;
                simple_profiler::record_beta_cutoff();
                break;
            }
        }

        best
    }
}

/// Legal moves for `player`, closest-to-opponent first. The sort is stable,
/// so ties keep the canonical direction order.
pub fn ordered_moves(grid: &Grid, player: PlayerId) -> Vec<Direction> {
    let position = grid.player_position(player);
    let target = grid.player_position(player.opponent());
    let mut moves = grid.legal_moves(player);
    moves.sort_by_key(|&direction| position.step(direction).manhattan(target));
    moves
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Plain negamax without pruning, as a reference
    fn minimax(eval: &mut Evaluator, grid: &mut Grid, player: PlayerId, depth: u8) -> (Option<Direction>, i32) {
        let moves = ordered_moves(grid, player);
        if depth == 0 || moves.is_empty() {
            return (None, eval.score(grid, player));
        }
        let mut best = (None, -INFINITY);
        for direction in moves {
            grid.apply_move(player, direction);
            let value = -minimax(eval, grid, player.opponent(), depth - 1).1;
            grid.undo_move(player, direction);
            if value > best.1 {
                best = (Some(direction), value);
            }
        }
        best
    }

    #[test]
    fn test_depth_one_on_open_3x3() {
        // Either first move leaves the same 6-cell region worth 11 to both
        // riders; from the mover's side: 2 * 11 - 11 = 11.
        let mut grid = Grid::parse(3, 3, "0,.,.,.,.,.,.,.,1").unwrap();
        let mut search = Search::default();
        let result = search.run(&mut grid, PlayerId::Zero, 1);

        assert_eq!(result.best_move, Some(Direction::Right));
        assert_eq!(result.value, 11);
        assert_eq!(result.root_scores.get(Direction::Right), Some(11));
        assert_eq!(result.root_scores.get(Direction::Down), Some(11));
        assert_eq!(result.root_scores.get(Direction::Up), None);
    }

    #[test]
    fn test_stuck_rider_returns_static_score() {
        let mut grid = Grid::parse(3, 2, "0,x,.,x,.,1").unwrap();
        let mut search = Search::default();
        let result = search.run(&mut grid, PlayerId::Zero, 6);

        assert_eq!(result.best_move, None);
        assert_eq!(result.value, -4);
        assert!(result.root_scores.entries().is_empty());
        assert_eq!(result.nodes, 1);
    }

    #[test]
    fn test_move_ordering_prefers_closing_distance() {
        // . . . .
        // . 0 . .
        // . . . 1
        let grid = Grid::parse(4, 3, ".,.,.,.,.,0,.,.,.,.,.,1").unwrap();
        assert_eq!(
            ordered_moves(&grid, PlayerId::Zero),
            vec![Direction::Right, Direction::Down, Direction::Up, Direction::Left]
        );
    }

    #[test]
    fn test_search_leaves_grid_untouched() {
        let mut grid = Grid::parse(4, 4, "0,.,.,.,.,x,.,.,.,.,x,.,.,.,.,1").unwrap();
        let before = grid.clone();
        let mut search = Search::default();
        search.run(&mut grid, PlayerId::Zero, 4);
        assert_eq!(grid, before);
    }

    #[test]
    fn test_pruning_matches_plain_minimax() {
        let boards = [
            (4, 4, "0,.,.,.,.,x,.,.,.,.,x,.,.,.,.,1"),
            (5, 4, ".,0,.,.,.,.,x,x,.,.,.,.,.,.,.,.,.,1,.,."),
            (6, 6, "0,.,.,.,.,.,.,x,.,.,x,.,.,.,.,.,.,.,.,x,.,.,.,.,.,.,.,x,.,.,.,.,.,.,.,1"),
        ];
        for (width, height, field) in boards {
            for depth in 1..=4 {
                let mut grid = Grid::parse(width, height, field).unwrap();
                let mut search = Search::default();
                let pruned = search.run(&mut grid, PlayerId::Zero, depth);

                let mut eval = Evaluator::default();
                let (best, value) = minimax(&mut eval, &mut grid, PlayerId::Zero, depth);

                assert_eq!(pruned.value, value, "{} at depth {}", field, depth);
                assert_eq!(pruned.best_move, best, "{} at depth {}", field, depth);
            }
        }
    }

    #[test]
    fn test_root_scores_reset_between_searches() {
        let mut grid = Grid::parse(3, 3, "0,.,.,.,.,.,.,.,1").unwrap();
        let mut search = Search::default();
        search.run(&mut grid, PlayerId::Zero, 2);
        let result = search.run(&mut grid, PlayerId::One, 1);
        assert_eq!(result.root_scores.entries().len(), 2);
        assert!(result.root_scores.get(Direction::Right).is_none());
        assert!(result.root_scores.get(Direction::Up).is_some());
    }
}
