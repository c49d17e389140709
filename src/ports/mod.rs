//! Ports (trait boundaries) for external dependencies.
//!
//! The domain owns these traits; `adapters` implements them.

pub mod observer;
pub mod random;
pub mod repository;

pub use observer::{NoopObserver, Observer};
pub use random::{DrawSource, rng_from_seed};
pub use repository::StoreRepository;
