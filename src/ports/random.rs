//! Random source port
//!
//! Move selection never talks to `rand` directly. It asks a [`DrawSource`]
//! for a bounded integer so tests can substitute a fixed script of draws.

use rand::{
    Rng, SeedableRng,
    rngs::{StdRng, ThreadRng},
};

/// `StdRng` seeded from `seed`, or from the OS when there is none
pub fn rng_from_seed(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    }
}

/// Source of uniform integer draws
pub trait DrawSource {
    /// Return a value in `0..bound`. Callers guarantee `bound >= 1`.
    fn draw_below(&mut self, bound: u32) -> u32;
}

impl DrawSource for StdRng {
    fn draw_below(&mut self, bound: u32) -> u32 {
        self.random_range(0..bound.max(1))
    }
}

impl DrawSource for ThreadRng {
    fn draw_below(&mut self, bound: u32) -> u32 {
        self.random_range(0..bound.max(1))
    }
}

impl<D: DrawSource + ?Sized> DrawSource for &mut D {
    fn draw_below(&mut self, bound: u32) -> u32 {
        (**self).draw_below(bound)
    }
}

impl<D: DrawSource + ?Sized> DrawSource for Box<D> {
    fn draw_below(&mut self, bound: u32) -> u32 {
        (**self).draw_below(bound)
    }
}
