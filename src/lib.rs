//! Connect Four engine: UCT Monte-Carlo tree search under a wall-clock
//! budget, generic over a gravity-drop rules seam.

pub mod board;
pub mod cli;
pub mod rules;
pub mod search;
pub mod time;
pub mod tree;
pub mod types;
