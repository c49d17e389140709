//! Subcommands of the `menace` binary

pub mod inspect;
pub mod states;
pub mod train;
