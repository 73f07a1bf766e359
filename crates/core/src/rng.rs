use rand::{rngs::StdRng, seq::SliceRandom, Rng, RngCore, SeedableRng};

/// Source of every random decision a session makes: the shuffle permutation,
/// the reversed-orientation trial, the auto-draw index pick and the wheel
/// jitter.
pub trait RandomSource {
    /// Uniform value in `[0, 1)`.
    fn next_f64(&mut self) -> f64;

    /// Uniform index in `[0, upper)`. `upper` must be non-zero.
    fn below(&mut self, upper: usize) -> usize {
        let idx = (self.next_f64() * upper as f64) as usize;
        idx.min(upper.saturating_sub(1))
    }

    /// Fisher-Yates over [`RandomSource::below`].
    fn shuffle<T>(&mut self, items: &mut [T])
    where
        Self: Sized,
    {
        for idx in (1..items.len()).rev() {
            let swap = self.below(idx + 1);
            items.swap(idx, swap);
        }
    }
}

#[derive(Debug, Clone)]
pub struct RngState {
    seed: u64,
    rng: StdRng,
}

impl RngState {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            seed,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self::from_seed(rand::random())
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn next_u64(&mut self) -> u64 {
        self.rng.next_u64()
    }
}

impl RandomSource for RngState {
    fn next_f64(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }

    fn below(&mut self, upper: usize) -> usize {
        self.rng.gen_range(0..upper.max(1))
    }

    fn shuffle<T>(&mut self, items: &mut [T]) {
        items.shuffle(&mut self.rng);
    }
}

/// Always returns the same value. Useful for pinning orientation trials.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedSource(pub f64);

impl RandomSource for FixedSource {
    fn next_f64(&mut self) -> f64 {
        self.0
    }
}

/// Replays a fixed list of values, wrapping around at the end.
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptedSource {
    values: Vec<f64>,
    cursor: usize,
}

impl ScriptedSource {
    pub fn new(values: Vec<f64>) -> Self {
        Self { values, cursor: 0 }
    }
}

impl RandomSource for ScriptedSource {
    fn next_f64(&mut self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        let value = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_shuffle_is_reproducible() {
        let mut a: Vec<u32> = (0..78).collect();
        let mut b = a.clone();
        RngState::from_seed(7).shuffle(&mut a);
        RngState::from_seed(7).shuffle(&mut b);
        assert_eq!(a, b);
        let mut sorted = a.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..78).collect::<Vec<_>>());
    }

    #[test]
    fn different_seeds_give_different_orders() {
        let mut a: Vec<u32> = (0..78).collect();
        let mut b = a.clone();
        RngState::from_seed(1).shuffle(&mut a);
        RngState::from_seed(2).shuffle(&mut b);
        assert_ne!(a, b);
    }

    #[test]
    fn default_shuffle_is_a_permutation() {
        let mut items: Vec<u32> = (0..20).collect();
        ScriptedSource::new(vec![0.9, 0.1, 0.5, 0.33]).shuffle(&mut items);
        let mut sorted = items.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..20).collect::<Vec<_>>());
    }

    #[test]
    fn below_stays_in_range_at_the_top_edge() {
        let mut source = FixedSource(0.999_999_999);
        assert_eq!(source.below(10), 9);
        let mut source = FixedSource(0.0);
        assert_eq!(source.below(10), 0);
    }

    #[test]
    fn scripted_source_wraps() {
        let mut source = ScriptedSource::new(vec![0.25, 0.75]);
        assert_eq!(source.next_f64(), 0.25);
        assert_eq!(source.next_f64(), 0.75);
        assert_eq!(source.next_f64(), 0.25);
    }
}
