//! Pluggable source of randomness for the pipeline.
//!
//! Every random decision the stages make goes through [`Chooser`], so callers
//! can run the pipeline against the thread RNG, a seeded RNG for reproducible
//! output, or a scripted source in tests.

use rand::rngs::{StdRng, ThreadRng};
use rand::{Rng, SeedableRng};

/// Random decisions made by the transformation stages.
pub trait Chooser {
    /// Return `true` with the given probability (clamped to `[0, 1]`).
    fn chance(&mut self, probability: f64) -> bool;

    /// Pick an index uniformly from `0..len`. `len` is never zero.
    fn pick(&mut self, len: usize) -> usize;
}

/// Pick one element of a non-empty slice.
pub fn choose<'a, T>(chooser: &mut dyn Chooser, items: &'a [T]) -> &'a T {
    let idx = chooser.pick(items.len());
    &items[idx.min(items.len() - 1)]
}

/// [`Chooser`] backed by any `rand` RNG.
#[derive(Debug, Clone)]
pub struct RandomChooser<R> {
    rng: R,
}

impl<R: Rng> RandomChooser<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RandomChooser<ThreadRng> {
    /// Chooser over the thread-local RNG.
    pub fn thread() -> Self {
        Self::new(rand::thread_rng())
    }
}

impl RandomChooser<StdRng> {
    /// Deterministic chooser for reproducible runs.
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> Chooser for RandomChooser<R> {
    fn chance(&mut self, probability: f64) -> bool {
        if probability <= 0.0 {
            return false;
        }
        if probability >= 1.0 {
            return true;
        }
        self.rng.gen::<f64>() < probability
    }

    fn pick(&mut self, len: usize) -> usize {
        self.rng.gen_range(0..len)
    }
}

/// Chooser with fixed answers, counting how often it was asked.
#[cfg(test)]
#[derive(Debug, Clone, Default)]
pub struct FixedChooser {
    pub answer: bool,
    pub index: usize,
    pub chance_calls: usize,
    pub pick_calls: usize,
}

#[cfg(test)]
impl FixedChooser {
    pub fn always(index: usize) -> Self {
        Self {
            answer: true,
            index,
            ..Default::default()
        }
    }

    pub fn never(index: usize) -> Self {
        Self {
            answer: false,
            index,
            ..Default::default()
        }
    }
}

#[cfg(test)]
impl Chooser for FixedChooser {
    fn chance(&mut self, _probability: f64) -> bool {
        self.chance_calls += 1;
        self.answer
    }

    fn pick(&mut self, len: usize) -> usize {
        self.pick_calls += 1;
        self.index.min(len - 1)
    }
}
