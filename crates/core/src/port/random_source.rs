// Random Source Port
//
// The generator draws every random decision through this trait so tests can
// replay a fixed sequence.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of uniform floats in `[0, 1)`
pub trait RandomSource: Send {
    fn next_unit(&mut self) -> f64;
}

/// `StdRng`-backed source (production)
pub struct StdRandomSource {
    rng: StdRng,
}

impl StdRandomSource {
    /// Seeded from OS entropy
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Reproducible sequence, used for demos and soak tests
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl RandomSource for StdRandomSource {
    fn next_unit(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }
}

pub mod mocks {
    use super::RandomSource;

    /// Replays a fixed list of draws, cycling when exhausted
    pub struct ScriptedRandomSource {
        values: Vec<f64>,
        cursor: usize,
    }

    impl ScriptedRandomSource {
        pub fn new(values: Vec<f64>) -> Self {
            assert!(!values.is_empty(), "scripted source needs at least one value");
            Self { values, cursor: 0 }
        }

        /// Number of draws consumed so far
        pub fn draws(&self) -> usize {
            self.cursor
        }
    }

    impl RandomSource for ScriptedRandomSource {
        fn next_unit(&mut self) -> f64 {
            let value = self.values[self.cursor % self.values.len()];
            self.cursor += 1;
            value
        }
    }
}
