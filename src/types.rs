// Light Riders game types
// Board vocabulary shared by the grid, the search and the judge protocol

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// One of the two riders on the board
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlayerId {
    Zero,
    One,
}

impl PlayerId {
    /// Converts a judge-supplied bot id; only 0 and 1 exist
    pub fn from_index(index: usize) -> Option<PlayerId> {
        match index {
            0 => Some(PlayerId::Zero),
            1 => Some(PlayerId::One),
            _ => None,
        }
    }

    pub fn index(self) -> usize {
        match self {
            PlayerId::Zero => 0,
            PlayerId::One => 1,
        }
    }

    pub fn opponent(self) -> PlayerId {
        match self {
            PlayerId::Zero => PlayerId::One,
            PlayerId::One => PlayerId::Zero,
        }
    }
}

/// 2D coordinate on the board, row-major, (0, 0) is the top-left cell
#[derive(Deserialize, Serialize, Debug, PartialEq, Eq, Clone, Copy, Hash, Default)]
pub struct Coord {
    pub row: i32,
    pub col: i32,
}

impl Coord {
    pub fn new(row: i32, col: i32) -> Self {
        Coord { row, col }
    }

    /// Coordinate one step away in `direction`
    pub fn step(self, direction: Direction) -> Coord {
        let (d_row, d_col) = direction.delta();
        Coord {
            row: self.row + d_row,
            col: self.col + d_col,
        }
    }

    /// Inverse of `step`
    pub fn unstep(self, direction: Direction) -> Coord {
        let (d_row, d_col) = direction.delta();
        Coord {
            row: self.row - d_row,
            col: self.col - d_col,
        }
    }

    pub fn manhattan(self, other: Coord) -> i32 {
        (self.row - other.row).abs() + (self.col - other.col).abs()
    }
}

/// State of a single board cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cell {
    Empty,
    Player(PlayerId),
    Blocked,
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Cell::Empty => write!(f, "."),
            Cell::Player(PlayerId::Zero) => write!(f, "0"),
            Cell::Player(PlayerId::One) => write!(f, "1"),
            Cell::Blocked => write!(f, "x"),
        }
    }
}

/// The four movement directions, in the fixed order used for
/// neighbor lists and move-ordering ties
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Right,
    Down,
    Left,
}

impl Direction {
    /// Returns all directions in canonical order
    pub fn all() -> [Direction; 4] {
        [Direction::Up, Direction::Right, Direction::Down, Direction::Left]
    }

    /// Unit (row, col) offset
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Right => (0, 1),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
        }
    }

    /// Label sent to the judge
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Right => "right",
            Direction::Down => "down",
            Direction::Left => "left",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "up" => Ok(Direction::Up),
            "right" => Ok(Direction::Right),
            "down" => Ok(Direction::Down),
            "left" => Ok(Direction::Left),
            _ => Err(format!("Invalid direction: {}", s)),
        }
    }
}

/// What the bot answers to `action move`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Move(Direction),
    Pass,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Move(direction) => direction.as_str(),
            Action::Pass => "pass",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("pass") {
            return Ok(Action::Pass);
        }
        s.parse::<Direction>().map(Action::Move)
    }
}

/// Match settings announced by the judge before the first round
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Setting {
    Timebank(Duration),
    TimePerMove(Duration),
    PlayerNames { player0: String, player1: String },
    BotName(String),
    BotId(PlayerId),
    FieldWidth(usize),
    FieldHeight(usize),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_order_and_deltas() {
        let deltas: Vec<(i32, i32)> = Direction::all().iter().map(|d| d.delta()).collect();
        assert_eq!(deltas, vec![(-1, 0), (0, 1), (1, 0), (0, -1)]);
    }

    #[test]
    fn test_step_then_unstep_is_identity() {
        let origin = Coord::new(3, 7);
        for direction in Direction::all() {
            assert_eq!(origin.step(direction).unstep(direction), origin);
        }
    }

    #[test]
    fn test_action_labels() {
        assert_eq!(Action::Move(Direction::Left).as_str(), "left");
        assert_eq!(Action::Pass.as_str(), "pass");
        assert_eq!("DOWN".parse::<Action>().unwrap(), Action::Move(Direction::Down));
        assert_eq!("Pass".parse::<Action>().unwrap(), Action::Pass);
        assert!("sideways".parse::<Action>().is_err());
    }

    #[test]
    fn test_player_ids() {
        assert_eq!(PlayerId::Zero.opponent(), PlayerId::One);
        assert_eq!(PlayerId::from_index(1), Some(PlayerId::One));
        assert_eq!(PlayerId::from_index(2), None);
    }
}
