//! The replay engine: per-run state and the bar loop.

pub mod replay;
pub mod state;

pub use replay::{run, RunReport};
pub use state::RunState;
