//! Application layer: configuration that turns into a ready engine.
//!
//! ```
//! use matchbox_menace::{app::EngineConfig, tictactoe::Player};
//!
//! let config = EngineConfig::default().with_seat(Player::X).with_seed(42);
//! let engine = config.build_engine()?;
//! assert_eq!(engine.seat(), Player::X);
//! # Ok::<(), matchbox_menace::Error>(())
//! ```

pub mod config;

pub use config::EngineConfig;
