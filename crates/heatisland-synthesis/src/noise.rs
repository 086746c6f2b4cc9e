//! Injectable noise for the synthesis engine.
//!
//! The engine never reaches for an ambient random generator. Callers pass
//! a [`NoiseSource`]: [`RngNoise`] wraps any `rand` generator (OS-seeded in
//! production, fixed-seed for reproducible runs), and [`MidpointNoise`]
//! always sits at the centre of the range so every draw contributes zero.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// A source of uniform values in `[0, 1)`.
pub trait NoiseSource {
    /// Next uniform value in `[0, 1)`.
    fn next_unit(&mut self) -> f64;

    /// A uniform draw on `[-amplitude / 2, amplitude / 2]`.
    fn uniform(&mut self, amplitude: f64) -> f64 {
        (self.next_unit() - 0.5) * amplitude
    }
}

impl<N: NoiseSource + ?Sized> NoiseSource for &mut N {
    fn next_unit(&mut self) -> f64 {
        (**self).next_unit()
    }
}

impl<N: NoiseSource + ?Sized> NoiseSource for Box<N> {
    fn next_unit(&mut self) -> f64 {
        (**self).next_unit()
    }
}

/// Noise drawn from a `rand` generator.
#[derive(Debug, Clone)]
pub struct RngNoise<R> {
    rng: R,
}

impl<R: Rng> RngNoise<R> {
    /// Wrap an existing generator.
    pub const fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RngNoise<StdRng> {
    /// Generator seeded from the operating system. Output differs run to run.
    pub fn from_os_rng() -> Self {
        Self::new(StdRng::from_os_rng())
    }

    /// Generator with a fixed seed. The same seed always yields the same series.
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> NoiseSource for RngNoise<R> {
    fn next_unit(&mut self) -> f64 {
        self.rng.random::<f64>()
    }
}

/// Zero noise: every draw returns the midpoint of the unit range.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MidpointNoise;

impl NoiseSource for MidpointNoise {
    fn next_unit(&mut self) -> f64 {
        0.5
    }
}
