// Territory evaluation
//
// A rider's territory is the set of empty cells it can reach. Each reached
// cell is weighted by how connected it is, so junctions count for more than
// corridors:
//
//     weight(cell) = legal_neighbors(cell) / 2 + 1
//
// and the static score from a rider's point of view is
//
//     own territory - opponent_weight * opponent territory

use crate::grid::Grid;
use crate::profile;
use crate::types::{Coord, PlayerId};

/// Opponent territory counts double: denying space beats gaining it
pub const DEFAULT_OPPONENT_WEIGHT: i32 = 2;

/// Flood-fill scorer. Scratch buffers are kept between calls so leaf
/// evaluation does not allocate.
#[derive(Debug, Clone)]
pub struct Evaluator {
    opponent_weight: i32,
    // visited[cell] == stamp marks a cell seen during the current fill
    visited: Vec<u32>,
    stamp: u32,
    frontier: Vec<Coord>,
    next_frontier: Vec<Coord>,
}

impl Default for Evaluator {
    fn default() -> Self {
        Evaluator::new(DEFAULT_OPPONENT_WEIGHT)
    }
}

impl Evaluator {
    pub fn new(opponent_weight: i32) -> Self {
        Evaluator {
            opponent_weight,
            visited: Vec::new(),
            stamp: 0,
            frontier: Vec::new(),
            next_frontier: Vec::new(),
        }
    }

    fn begin_fill(&mut self, cells: usize) {
        if self.visited.len() != cells {
            self.visited = vec![0; cells];
            self.stamp = 0;
        }
        self.stamp = self.stamp.wrapping_add(1);
        if self.stamp == 0 {
            // Stamp wrapped around; stale marks could alias the new one
            self.visited.iter_mut().for_each(|v| *v = 0);
            self.stamp = 1;
        }
        self.frontier.clear();
        self.next_frontier.clear();
    }

    /// Marks `coord` visited, returning false if it already was
    fn visit(&mut self, grid: &Grid, coord: Coord) -> bool {
        let slot = coord.row as usize * grid.width() + coord.col as usize;
        if self.visited[slot] == self.stamp {
            return false;
        }
        self.visited[slot] = self.stamp;
        true
    }

    /// Weighted size of the empty region reachable from `player`'s cell.
    ///
    /// Breadth-first, one frontier layer per round. The rider's own cell is
    /// the seed and is not counted.
    pub fn reachable_points(&mut self, grid: &mut Grid, player: PlayerId) -> i32 {
        profile!("flood_fill", {
            self.begin_fill(grid.width() * grid.height());

            let start = grid.player_position(player);
            self.visit(grid, start);
            for &cell in grid.neighbors(start).iter() {
                if self.visit(grid, cell) {
                    self.frontier.push(cell);
                }
            }

            let mut total = 0;
            while !self.frontier.is_empty() {
                for i in 0..self.frontier.len() {
                    let cell = self.frontier[i];
                    let neighbors = grid.neighbors(cell);
                    total += (neighbors.len() / 2) as i32 + 1;

                    for &next in neighbors.iter() {
                        if self.visit(grid, next) {
                            self.next_frontier.push(next);
                        }
                    }
                }
                std::mem::swap(&mut self.frontier, &mut self.next_frontier);
                self.next_frontier.clear();
            }

            total
        })
    }

    /// Static evaluation from `player`'s point of view
    pub fn score(&mut self, grid: &mut Grid, player: PlayerId) -> i32 {
        let own = self.reachable_points(grid, player);
        let opponent = self.reachable_points(grid, player.opponent());
        own - self.opponent_weight * opponent
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_3x3_territory_by_hand() {
        // x 0 .
        // . . .
        // . . 1
        // Empty cells and their legal-neighbor counts:
        // (0,2):1 (1,0):2 (1,1):3 (1,2):2 (2,0):2 (2,1):2
        // Weights: 1 + 2 + 2 + 2 + 2 + 2 = 11, same region for both riders
        let mut grid = Grid::parse(3, 3, "x,0,.,.,.,.,.,.,1").unwrap();
        let mut eval = Evaluator::default();

        assert_eq!(eval.reachable_points(&mut grid, PlayerId::Zero), 11);
        assert_eq!(eval.reachable_points(&mut grid, PlayerId::One), 11);
        assert_eq!(eval.score(&mut grid, PlayerId::Zero), 11 - 2 * 11);
    }

    #[test]
    fn test_trapped_rider_has_no_territory() {
        // 0 x .
        // x . 1
        let mut grid = Grid::parse(3, 2, "0,x,.,x,.,1").unwrap();
        let mut eval = Evaluator::default();
        assert_eq!(eval.reachable_points(&mut grid, PlayerId::Zero), 0);
        // Rider 1 reaches (0,2) and (1,1), both dead ends worth 1 each
        assert_eq!(eval.reachable_points(&mut grid, PlayerId::One), 2);
        assert_eq!(eval.score(&mut grid, PlayerId::Zero), -4);
        assert_eq!(eval.score(&mut grid, PlayerId::One), 2);
    }

    #[test]
    fn test_separated_regions() {
        // 0 . x . .
        // . . x . 1
        let mut grid = Grid::parse(5, 2, "0,.,x,.,.,.,.,x,.,1").unwrap();
        let mut eval = Evaluator::default();
        // Left region: (0,1):1 (1,0):1 (1,1):2 -> 1 + 1 + 2 = 4
        assert_eq!(eval.reachable_points(&mut grid, PlayerId::Zero), 4);
        // Right region: (0,4):1 (1,3):1 (0,3):2 -> 1 + 1 + 2 = 4
        assert_eq!(eval.reachable_points(&mut grid, PlayerId::One), 4);
    }

    #[test]
    fn test_repeated_fills_reuse_buffers() {
        let mut grid = Grid::parse(3, 3, "0,.,.,.,.,.,.,.,1").unwrap();
        let mut eval = Evaluator::new(3);
        let first = eval.reachable_points(&mut grid, PlayerId::Zero);
        for _ in 0..10 {
            assert_eq!(eval.reachable_points(&mut grid, PlayerId::Zero), first);
        }
        assert_eq!(eval.score(&mut grid, PlayerId::One), first - 3 * first);
    }
}
