//! Tracking-number generation behind a seedable interface.

use crate::domain::TrackingNumber;
use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Mutex;

/// Produces public tracking numbers of the form `CM<yymmdd><7 digits>`.
pub trait TrackingNumberGenerator: Send + Sync {
    fn next(&self, now: DateTime<Utc>) -> TrackingNumber;
}

/// Pseudo-random generator. Seedable so tests get a deterministic sequence;
/// production wiring seeds from entropy.
pub struct RandomTrackingGenerator {
    rng: Mutex<StdRng>,
}

impl RandomTrackingGenerator {
    pub fn from_entropy() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl TrackingNumberGenerator for RandomTrackingGenerator {
    fn next(&self, now: DateTime<Utc>) -> TrackingNumber {
        let suffix: u32 = {
            let mut rng = self.rng.lock().unwrap_or_else(|p| p.into_inner());
            rng.gen_range(0..10_000_000)
        };
        TrackingNumber::new(format!("CM{}{:07}", now.format("%y%m%d"), suffix))
    }
}
