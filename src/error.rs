// Error types for board parsing and the judge protocol
//
// Board errors are kept separate so callers outside the protocol (the replay
// tool) can report them; protocol errors wrap them as their source.

use crate::types::PlayerId;

/// The error type for [`Grid::parse()`](crate::grid::Grid::parse).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    /// A token that is not exactly one character long
    InvalidToken { index: usize, token: String },
    WrongCellCount { expected: usize, found: usize },
    MissingPlayer(PlayerId),
    DuplicatePlayer(PlayerId),
    EmptyDimensions,
    /// `width * height` does not fit in a usize
    TooLarge { width: usize, height: usize },
}

impl std::error::Error for GridError {}

impl std::fmt::Display for GridError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GridError::InvalidToken { index, token } => write!(
                f,
                "Field token {} is '{}', expected a single character",
                index, token
            ),
            GridError::WrongCellCount { expected, found } => write!(
                f,
                "Field has {} cells, expected {}",
                found, expected
            ),
            GridError::MissingPlayer(player) => {
                write!(f, "Field has no cell for player {}", player.index())
            }
            GridError::DuplicatePlayer(player) => {
                write!(f, "Field has more than one cell for player {}", player.index())
            }
            GridError::EmptyDimensions => write!(f, "Field width and height must be non-zero"),
            GridError::TooLarge { width, height } => {
                write!(f, "Field of {}x{} cells is too large", width, height)
            }
        }
    }
}

/// The error type for one line of the judge protocol.
#[derive(Debug)]
pub enum ProtocolError {
    UnknownCommand(String),
    MissingArgument { command: String },
    InvalidNumber { command: String, value: String },
    InvalidBotId(usize),
    InvalidField(GridError),
    Io(std::io::Error),
}

impl std::error::Error for ProtocolError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ProtocolError::InvalidField(err) => Some(err),
            ProtocolError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl std::fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProtocolError::UnknownCommand(line) => write!(f, "Unknown command: '{}'", line),
            ProtocolError::MissingArgument { command } => {
                write!(f, "Command '{}' is missing an argument", command)
            }
            ProtocolError::InvalidNumber { command, value } => write!(
                f,
                "Command '{}' expected a number, got '{}'",
                command, value
            ),
            ProtocolError::InvalidBotId(id) => write!(f, "Bot id {} is not 0 or 1", id),
            ProtocolError::InvalidField(_) => write!(f, "Could not parse the field update"),
            ProtocolError::Io(_) => write!(f, "Judge channel I/O failed"),
        }
    }
}

impl From<GridError> for ProtocolError {
    fn from(err: GridError) -> Self {
        ProtocolError::InvalidField(err)
    }
}

impl From<std::io::Error> for ProtocolError {
    fn from(err: std::io::Error) -> Self {
        ProtocolError::Io(err)
    }
}
