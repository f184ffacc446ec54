//! Application layer - use-case handlers orchestrating domain and ports.

mod progress;
mod turn;

pub use progress::{
    GetProgressHandler, ProgressError, SetWatchedCommand, SetWatchedHandler,
};
pub use turn::{HandleTurnHandler, TurnCommand, TurnError, TurnResponse};
