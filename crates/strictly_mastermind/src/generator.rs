//! Secret sequence generation and integer decoding.

use super::types::{COLS, SEQL, Sequence};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, instrument};

/// Produces secret sequences.
///
/// A process creates one generator, seeded from the time at start-up, and
/// draws a single secret from it.
#[derive(Debug, Clone)]
pub struct SequenceGenerator<R = StdRng> {
    rng: R,
}

impl SequenceGenerator<StdRng> {
    /// Creates a generator seeded from the current wall-clock time.
    #[instrument]
    pub fn from_time() -> Self {
        let seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default();
        debug!(seed, "Seeding secret generator");
        Self::with_seed(seed)
    }

    /// Creates a generator with a fixed seed.
    pub fn with_seed(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> SequenceGenerator<R> {
    /// Wraps an existing random source.
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Fills every slot independently and uniformly from `1..=COLS`.
    #[instrument(skip(self))]
    pub fn generate_random(&mut self) -> Sequence {
        let mut digits = [0u8; SEQL];
        for slot in &mut digits {
            *slot = self.rng.random_range(1..=COLS);
        }
        Sequence::new(digits)
    }
}

impl Sequence {
    /// Decodes base-10 digits of `value`, ones digit first.
    ///
    /// Index 0 receives the ones digit, index 1 the tens digit and so on.
    /// Missing high digits become `0`; digits beyond `SEQL` are dropped.
    /// No range check is made.
    pub fn decode(value: u64) -> Self {
        let mut digits = [0u8; SEQL];
        let mut rest = value;
        for slot in &mut digits {
            // rest % 10 < 10, always fits.
            *slot = (rest % 10) as u8;
            rest /= 10;
        }
        Self::new(digits)
    }

    /// Inverse of [`Sequence::decode`]: the sum of `digit * 10^index`.
    pub fn encode_as_integer(&self) -> u64 {
        self.digits()
            .iter()
            .rev()
            .fold(0u64, |acc, &d| acc * 10 + u64::from(d))
    }
}
