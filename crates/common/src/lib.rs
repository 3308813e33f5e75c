//! Conway's Game of Life on a toroidal board.

pub mod board;
pub mod cell;
pub mod config;
pub mod error;
pub mod text;
pub mod world;

pub use board::{Board, Position};
pub use cell::Cell;
pub use config::BoardConfig;
pub use error::{Error, ErrorKind, Result};
pub use world::Generation;
