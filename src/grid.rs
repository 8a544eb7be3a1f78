// Board state with reversible move application
//
// The search shares a single Grid across the whole tree: every apply_move
// is paired with an undo_move on the way back up, so no node ever copies
// the board.

use std::fmt;

use crate::adjacency::{AdjacencyCache, Neighbors};
use crate::error::GridError;
use crate::profile;
use crate::types::{Cell, Coord, Direction, PlayerId};

#[derive(Debug, Clone)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
    players: [Coord; 2],
    adjacency: AdjacencyCache,
}

impl Grid {
    /// Parses a judge field update: `width * height` comma-separated
    /// single-character tokens in row-major order.
    ///
    /// `.` is empty, `0` and `1` are the riders, any other character is a
    /// wall. Tokens that are not exactly one character, a wrong token count,
    /// and a missing or repeated rider are all rejected. Nothing is sized
    /// from the dimensions until the token count has matched them.
    pub fn parse(width: usize, height: usize, text: &str) -> Result<Grid, GridError> {
        if width == 0 || height == 0 {
            return Err(GridError::EmptyDimensions);
        }

        let expected = width
            .checked_mul(height)
            .ok_or(GridError::TooLarge { width, height })?;
        let tokens: Vec<&str> = text.trim().split(',').collect();
        let mut cells = Vec::with_capacity(tokens.len());
        let mut players: [Option<Coord>; 2] = [None, None];

        for (index, token) in tokens.into_iter().enumerate() {
            let mut chars = token.chars();
            let symbol = match (chars.next(), chars.next()) {
                (Some(symbol), None) => symbol,
                _ => {
                    return Err(GridError::InvalidToken {
                        index,
                        token: token.to_string(),
                    })
                }
            };

            let coord = Coord::new((index / width) as i32, (index % width) as i32);
            let cell = match symbol {
                '.' => Cell::Empty,
                '0' => Cell::Player(PlayerId::Zero),
                '1' => Cell::Player(PlayerId::One),
                _ => Cell::Blocked,
            };

            if let Cell::Player(player) = cell {
                if players[player.index()].replace(coord).is_some() {
                    return Err(GridError::DuplicatePlayer(player));
                }
            }
            cells.push(cell);
        }

        if cells.len() != expected {
            return Err(GridError::WrongCellCount {
                expected,
                found: cells.len(),
            });
        }

        let player0 = players[0].ok_or(GridError::MissingPlayer(PlayerId::Zero))?;
        let player1 = players[1].ok_or(GridError::MissingPlayer(PlayerId::One))?;

        Ok(Grid {
            width,
            height,
            cells,
            players: [player0, player1],
            adjacency: AdjacencyCache::new(width, height),
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn player_position(&self, player: PlayerId) -> Coord {
        self.players[player.index()]
    }

    pub fn in_bounds(&self, coord: Coord) -> bool {
        coord.row >= 0
            && coord.col >= 0
            && (coord.row as usize) < self.height
            && (coord.col as usize) < self.width
    }

    fn index(&self, coord: Coord) -> usize {
        coord.row as usize * self.width + coord.col as usize
    }

    pub fn cell(&self, coord: Coord) -> Option<Cell> {
        if self.in_bounds(coord) {
            Some(self.cells[self.index(coord)])
        } else {
            None
        }
    }

    fn set_cell(&mut self, coord: Coord, cell: Cell) {
        let index = self.index(coord);
        self.cells[index] = cell;
    }

    /// A cell can be entered iff it is on the board and empty
    pub fn is_legal(&self, coord: Coord) -> bool {
        self.cell(coord) == Some(Cell::Empty)
    }

    /// Computes the legal neighbors of `coord` without consulting the cache
    pub fn fresh_neighbors(&self, coord: Coord) -> Neighbors {
        let mut neighbors = Neighbors::default();
        if !self.in_bounds(coord) {
            return neighbors;
        }
        for direction in Direction::all() {
            let next = coord.step(direction);
            if self.is_legal(next) {
                neighbors.push(next);
            }
        }
        neighbors
    }

    /// Legal neighbors of `coord`, served from the adjacency cache
    pub fn neighbors(&mut self, coord: Coord) -> Neighbors {
        if let Some(cached) = self.adjacency.get(coord) {
            return cached;
        }
        let neighbors = self.fresh_neighbors(coord);
        self.adjacency.store(coord, neighbors);
        neighbors
    }

    /// Directions `player` may move in, in canonical order
    pub fn legal_moves(&self, player: PlayerId) -> Vec<Direction> {
        let position = self.player_position(player);
        Direction::all()
            .iter()
            .filter(|&&direction| self.is_legal(position.step(direction)))
            .copied()
            .collect()
    }

    /// Moves `player` one step, leaving a wall on the vacated cell.
    /// The target must be legal.
    pub fn apply_move(&mut self, player: PlayerId, direction: Direction) {
        profile!("apply_move", {
            let from = self.player_position(player);
            let to = from.step(direction);
            debug_assert!(self.is_legal(to), "apply_move onto {:?}", to);

            self.set_cell(from, Cell::Blocked);
            self.set_cell(to, Cell::Player(player));
            self.players[player.index()] = to;

            self.refresh_around(from);
            self.refresh_around(to);
        })
    }

    /// Exact inverse of `apply_move` for the same player and direction
    pub fn undo_move(&mut self, player: PlayerId, direction: Direction) {
        let current = self.player_position(player);
        let origin = current.unstep(direction);

        self.set_cell(current, Cell::Empty);
        self.set_cell(origin, Cell::Player(player));
        self.players[player.index()] = origin;

        self.refresh_around(current);
        self.refresh_around(origin);
    }

    /// Recomputes the cached entries of the four cells next to `coord`,
    /// whose neighbor lists depend on whether `coord` is empty
    fn refresh_around(&mut self, coord: Coord) {
        for direction in Direction::all() {
            let next = coord.step(direction);
            if self.in_bounds(next) {
                let neighbors = self.fresh_neighbors(next);
                self.adjacency.store(next, neighbors);
            }
        }
    }

    /// Re-encodes the board in the judge's field format
    pub fn to_field_string(&self) -> String {
        self.cells
            .iter()
            .map(|cell| cell.to_string())
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// Two grids are equal when cells and rider positions match; cache state is ignored
impl PartialEq for Grid {
    fn eq(&self, other: &Self) -> bool {
        self.width == other.width
            && self.height == other.height
            && self.cells == other.cells
            && self.players == other.players
    }
}

impl Eq for Grid {}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for row in self.cells.chunks(self.width) {
            for cell in row {
                write!(f, "{} ", cell)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const OPEN_3X3: &str = "0,.,.,.,.,.,.,.,1";

    #[test]
    fn test_parse_reproduces_cells_and_players() {
        let grid = Grid::parse(4, 2, "0,.,x,.,#,.,.,1").unwrap();

        assert_eq!(grid.cell(Coord::new(0, 0)), Some(Cell::Player(PlayerId::Zero)));
        assert_eq!(grid.cell(Coord::new(0, 1)), Some(Cell::Empty));
        assert_eq!(grid.cell(Coord::new(0, 2)), Some(Cell::Blocked));
        assert_eq!(grid.cell(Coord::new(1, 0)), Some(Cell::Blocked));
        assert_eq!(grid.cell(Coord::new(1, 3)), Some(Cell::Player(PlayerId::One)));
        assert_eq!(grid.player_position(PlayerId::Zero), Coord::new(0, 0));
        assert_eq!(grid.player_position(PlayerId::One), Coord::new(1, 3));
        assert_eq!(grid.to_field_string(), "0,.,x,.,x,.,.,1");
    }

    #[test]
    fn test_parse_rejects_multi_character_token() {
        let err = Grid::parse(3, 3, "0,..,.,.,.,.,.,.,1").unwrap_err();
        assert_eq!(
            err,
            GridError::InvalidToken {
                index: 1,
                token: "..".to_string()
            }
        );

        let err = Grid::parse(3, 3, "0,,.,.,.,.,.,.,1").unwrap_err();
        assert!(matches!(err, GridError::InvalidToken { index: 1, .. }));
    }

    #[test]
    fn test_parse_rejects_wrong_cell_count() {
        let err = Grid::parse(3, 3, "0,.,.,.,1").unwrap_err();
        assert_eq!(err, GridError::WrongCellCount { expected: 9, found: 5 });
    }

    #[test]
    fn test_parse_rejects_oversized_dimensions() {
        assert_eq!(
            Grid::parse(usize::MAX, 2, "0,1").unwrap_err(),
            GridError::TooLarge {
                width: usize::MAX,
                height: 2
            }
        );
        // Huge but representable: fails on the count without allocating a board
        assert_eq!(
            Grid::parse(100_000, 100_000, "0,1").unwrap_err(),
            GridError::WrongCellCount {
                expected: 10_000_000_000,
                found: 2
            }
        );
    }

    #[test]
    fn test_parse_rejects_missing_or_repeated_players() {
        assert_eq!(
            Grid::parse(2, 2, ".,.,.,1").unwrap_err(),
            GridError::MissingPlayer(PlayerId::Zero)
        );
        assert_eq!(
            Grid::parse(2, 2, "0,0,.,1").unwrap_err(),
            GridError::DuplicatePlayer(PlayerId::Zero)
        );
    }

    #[test]
    fn test_is_legal() {
        let grid = Grid::parse(3, 3, "0,x,.,.,.,.,.,.,1").unwrap();
        assert!(!grid.is_legal(Coord::new(0, 0)), "rider cell");
        assert!(!grid.is_legal(Coord::new(0, 1)), "wall");
        assert!(grid.is_legal(Coord::new(0, 2)));
        assert!(!grid.is_legal(Coord::new(-1, 0)));
        assert!(!grid.is_legal(Coord::new(0, 3)));
        assert!(!grid.is_legal(Coord::new(3, 0)));
    }

    #[test]
    fn test_neighbors_in_direction_order() {
        let mut grid = Grid::parse(3, 3, OPEN_3X3).unwrap();
        let centre = grid.neighbors(Coord::new(1, 1));
        assert_eq!(
            centre.as_slice(),
            &[
                Coord::new(0, 1),
                Coord::new(1, 2),
                Coord::new(2, 1),
                Coord::new(1, 0)
            ]
        );

        let corner = grid.neighbors(Coord::new(0, 0));
        assert_eq!(corner.as_slice(), &[Coord::new(0, 1), Coord::new(1, 0)]);
    }

    #[test]
    fn test_legal_moves() {
        let grid = Grid::parse(3, 3, OPEN_3X3).unwrap();
        assert_eq!(
            grid.legal_moves(PlayerId::Zero),
            vec![Direction::Right, Direction::Down]
        );
        assert_eq!(
            grid.legal_moves(PlayerId::One),
            vec![Direction::Up, Direction::Left]
        );
    }

    #[test]
    fn test_apply_move_leaves_trail() {
        let mut grid = Grid::parse(3, 3, OPEN_3X3).unwrap();
        grid.apply_move(PlayerId::Zero, Direction::Right);

        assert_eq!(grid.cell(Coord::new(0, 0)), Some(Cell::Blocked));
        assert_eq!(grid.cell(Coord::new(0, 1)), Some(Cell::Player(PlayerId::Zero)));
        assert_eq!(grid.player_position(PlayerId::Zero), Coord::new(0, 1));
        assert_eq!(grid.to_field_string(), "x,0,.,.,.,.,.,.,1");
    }

    #[test]
    fn test_apply_then_undo_restores_everything() {
        let mut grid = Grid::parse(3, 3, OPEN_3X3).unwrap();
        let before = grid.clone();

        grid.apply_move(PlayerId::Zero, Direction::Down);
        grid.apply_move(PlayerId::One, Direction::Left);
        grid.undo_move(PlayerId::One, Direction::Left);
        grid.undo_move(PlayerId::Zero, Direction::Down);

        assert_eq!(grid, before);
    }

    #[test]
    fn test_cache_is_refreshed_by_moves() {
        let mut grid = Grid::parse(3, 3, OPEN_3X3).unwrap();
        // Warm the entry for the centre before the move changes it
        assert_eq!(grid.neighbors(Coord::new(1, 1)).len(), 4);

        grid.apply_move(PlayerId::Zero, Direction::Right);
        assert_eq!(
            grid.neighbors(Coord::new(1, 1)).as_slice(),
            &[Coord::new(1, 2), Coord::new(2, 1), Coord::new(1, 0)]
        );

        grid.undo_move(PlayerId::Zero, Direction::Right);
        assert_eq!(grid.neighbors(Coord::new(1, 1)).len(), 4);
        assert_eq!(
            grid.neighbors(Coord::new(1, 0)),
            grid.fresh_neighbors(Coord::new(1, 0))
        );
    }

    #[test]
    fn test_display_renders_rows() {
        let grid = Grid::parse(2, 2, "0,x,.,1").unwrap();
        assert_eq!(grid.to_string(), "0 x \n. 1 \n");
    }
}
