//! # Ghost Chase AI Library
//!
//! This library provides the simulation core of a maze-chase game and a
//! depth-limited lookahead search that picks the player's next move.
//!
//! It is used by two binaries:
//! - `ai_player`: Plays a full game against the four ghosts, choosing every
//!   move with the search, and prints the board as it goes.
//! - `depth_evaluator`: Plays many seeded games at several search depths and
//!   reports how each depth fares.
//!
//! A caller embedding the search in a live game implements the traits in
//! `live` and calls `solver::choose_move` once per decision.
//!
//! ## Modules
//! - `engine`: Tile states, directions and the mutable `Maze` copy used for simulation.
//! - `actors`: Ghost identities and modes, and the player and ghost snapshots.
//! - `pursuit`: The ghost pursuit policy: per-ghost targeting and the greedy next-tile rule.
//! - `state`: `GameState`, its outcome, and the one-ply transition `advance`.
//! - `live`: Read-only traits over a running game and the snapshot built from them.
//! - `heuristics`: The static evaluator used at the search leaves.
//! - `solver`: The lookahead search and move selection.
//! - `play`: The self-play game loop the binaries share.
//! - `utils`: Parsing mazes and scenarios from strings, and the classic maze.
//! - `error`: The crate's error type.

pub mod actors;
pub mod engine;
pub mod error;
pub mod heuristics;
pub mod live;
pub mod play;
pub mod pursuit;
pub mod solver;
pub mod state;
pub mod utils;

pub use error::{Error, Result};
