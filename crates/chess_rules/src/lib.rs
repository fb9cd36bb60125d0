//! Two-player chess rules engine.
//!
//! A [`Board`] owns the grid and answers the three questions a front-end asks:
//! where may the piece on a square go, what happened when a move was played,
//! and is the side to move checkmated or stalemated. [`Game`] adds the turn,
//! capture log and promotion bookkeeping a front-end would otherwise keep.

pub mod board;
pub mod config;
pub mod error;
pub mod game;
pub mod layout;
pub mod piece;
pub mod square_set;
pub mod types;

pub use board::*;
pub use config::{ConfigError, GameConfig};
pub use error::*;
pub use game::*;
pub use layout::STANDARD_LAYOUT;
pub use piece::EnPassant;
pub use square_set::SquareSet;
pub use types::*;
