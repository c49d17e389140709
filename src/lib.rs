//! MENACE (Matchbox Educable Noughts And Crosses Engine)
//!
//! This crate provides:
//! - Noughts and crosses rules with D4 symmetry reduction
//! - Matchbox learning: bead counts per canonical state, reinforced after
//!   every game
//! - A training driver with observers, snapshots and a CLI
//!
//! ```
//! use matchbox_menace::{
//!     menace::{Engine, InitialBeadSchedule, RandomOpponent, ReinforcementValues},
//!     tictactoe::Player,
//! };
//!
//! let mut engine = Engine::seeded(
//!     Player::O,
//!     InitialBeadSchedule::default(),
//!     ReinforcementValues::default(),
//!     Some(1),
//! );
//! let mut opponent = RandomOpponent::from_seed(Some(2));
//! let outcome = engine.play_game(&mut opponent)?;
//! println!("{outcome}");
//! # Ok::<(), matchbox_menace::Error>(())
//! ```

pub mod adapters;
pub mod app;
pub mod cli;
pub mod error;
pub mod menace;
pub mod pipeline;
pub mod ports;
pub mod tictactoe;
pub mod utils;

pub use error::{Error, Result};
