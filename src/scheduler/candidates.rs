//! Randomized candidate generation.
//!
//! Every random decision the scheduler makes goes through
//! [`CandidateSource`], so tests can substitute a scripted source and
//! production runs can fix a seed for reproducible output.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

/// Source of the random choices behind one placement attempt.
pub trait CandidateSource {
    /// Picks a day in `0..day_count`.
    fn pick_day(&mut self, day_count: usize) -> usize;

    /// Returns every start index in `0..slot_count` in the order to try.
    fn start_order(&mut self, slot_count: usize) -> Vec<usize>;

    /// Reorders candidate rooms before probing.
    fn shuffle_rooms(&mut self, rooms: &mut [&str]);
}

/// [`CandidateSource`] backed by a seedable `StdRng`.
#[derive(Debug, Clone)]
pub struct SeededCandidates {
    rng: StdRng,
}

impl SeededCandidates {
    /// Deterministic source for a fixed seed.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Source seeded from OS entropy.
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Seeded when `seed` is given, entropy otherwise.
    pub fn from_optional_seed(seed: Option<u64>) -> Self {
        match seed {
            Some(s) => Self::from_seed(s),
            None => Self::from_entropy(),
        }
    }
}

impl CandidateSource for SeededCandidates {
    fn pick_day(&mut self, day_count: usize) -> usize {
        if day_count == 0 {
            return 0;
        }
        self.rng.random_range(0..day_count)
    }

    fn start_order(&mut self, slot_count: usize) -> Vec<usize> {
        let mut order: Vec<usize> = (0..slot_count).collect();
        order.shuffle(&mut self.rng);
        order
    }

    fn shuffle_rooms(&mut self, rooms: &mut [&str]) {
        rooms.shuffle(&mut self.rng);
    }
}
