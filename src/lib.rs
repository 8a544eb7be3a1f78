// Library exports for the Light Riders bot
// This allows the replay tool and the integration tests to use the core bot logic

pub mod adjacency;
pub mod bot;
pub mod config;
pub mod debug_logger;
pub mod depth;
pub mod error;
pub mod eval;
pub mod grid;
pub mod protocol;
pub mod replay;
pub mod search;
pub mod simple_profiler;
pub mod types;
