//! Editor pick sampling
//!
//! Sampling draws from an injectable random source so tests can fix the
//! outcome. The sampler is shared by every session of a store.

use bookstore_core::Book;
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{RngCore, SeedableRng};

/// Uniform sampler without replacement over editor picks
pub struct EditorPickSampler {
    rng: Mutex<Box<dyn RngCore + Send>>,
}

impl EditorPickSampler {
    /// Sampler seeded with `seed`, or from OS entropy when `None`
    pub fn from_seed(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(rng)
    }

    /// Sampler drawing from a caller-supplied source
    pub fn with_rng(rng: impl RngCore + Send + 'static) -> Self {
        Self {
            rng: Mutex::new(Box::new(rng)),
        }
    }

    /// Pick `n` distinct books from `candidates`
    ///
    /// Every candidate is returned when `n` covers them all.
    pub fn sample(&self, candidates: Vec<Book>, n: usize) -> Vec<Book> {
        if n >= candidates.len() {
            return candidates;
        }
        let mut rng = self.rng.lock();
        candidates
            .choose_multiple(&mut **rng, n)
            .cloned()
            .collect()
    }
}

impl std::fmt::Debug for EditorPickSampler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditorPickSampler").finish_non_exhaustive()
    }
}
