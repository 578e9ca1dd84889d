//! Random draw helpers shared by mutation, crossover and selection.
//!
//! Engine entry points are generic over [`rand::Rng`]; this extension trait
//! adds the handful of draws the algorithm needs. [`Population`] owns its
//! generator, so a run seeded with a fixed generator is reproducible as long
//! as fitness evaluation is deterministic and sequential.
//!
//! [`Population`]: crate::population::Population

use rand::Rng;
use rand_distr::{Distribution, Normal};

/// Draws used throughout the engine, available on every [`Rng`].
pub trait RngExt {
    /// Uniform draw in `[0, 1)`.
    fn uniform(&mut self) -> f64;

    /// Returns `true` with probability `p`.
    fn chance(&mut self, p: f64) -> bool;

    /// Gaussian draw; falls back to `mean` if the distribution parameters
    /// are unusable (non-finite or negative standard deviation).
    fn gaussian(&mut self, mean: f64, std_dev: f64) -> f64;

    /// Gaussian draw clamped to `[min, max]`.
    fn gaussian_clamped(&mut self, mean: f64, std_dev: f64, min: f64, max: f64) -> f64;

    /// Weighted binary choice: `a` with probability `p`, `b` otherwise.
    fn pick<T>(&mut self, p: f64, a: T, b: T) -> T;

    /// Uniform index into a collection of `len` elements.
    ///
    /// Panics when `len` is zero; callers guard against empty collections.
    fn choose_index(&mut self, len: usize) -> usize;

    /// Uniform choice of an element from a non-empty slice.
    fn choose_from<'a, T>(&mut self, items: &'a [T]) -> &'a T;
}

impl<R: Rng> RngExt for R {
    fn uniform(&mut self) -> f64 {
        self.gen()
    }

    fn chance(&mut self, p: f64) -> bool {
        self.uniform() < p
    }

    fn gaussian(&mut self, mean: f64, std_dev: f64) -> f64 {
        match Normal::new(mean, std_dev) {
            Ok(dist) => dist.sample(self),
            Err(_) => mean,
        }
    }

    fn gaussian_clamped(&mut self, mean: f64, std_dev: f64, min: f64, max: f64) -> f64 {
        self.gaussian(mean, std_dev).clamp(min, max)
    }

    fn pick<T>(&mut self, p: f64, a: T, b: T) -> T {
        if self.chance(p) {
            a
        } else {
            b
        }
    }

    fn choose_index(&mut self, len: usize) -> usize {
        self.gen_range(0..len)
    }

    fn choose_from<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[self.choose_index(items.len())]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn uniform_stays_in_unit_interval() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        for _ in 0..1000 {
            let x = rng.uniform();
            assert!((0.0..1.0).contains(&x));
        }
    }

    #[test]
    fn chance_handles_degenerate_probabilities() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        for _ in 0..100 {
            assert!(!rng.chance(0.0));
            assert!(rng.chance(1.0));
        }
    }

    #[test]
    fn gaussian_clamped_respects_bounds() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        for _ in 0..1000 {
            let x = rng.gaussian_clamped(0.0, 10.0, -1.0, 1.0);
            assert!((-1.0..=1.0).contains(&x));
        }
    }

    #[test]
    fn gaussian_falls_back_to_mean_on_bad_std_dev() {
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        assert_eq!(rng.gaussian(2.5, -1.0), 2.5);
    }

    #[test]
    fn pick_is_roughly_balanced_at_half() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let hits = (0..10_000).filter(|_| rng.pick(0.5, true, false)).count();
        assert!((4_500..=5_500).contains(&hits), "hits = {hits}");
    }

    #[test]
    fn choose_from_returns_a_member() {
        let mut rng = ChaCha8Rng::seed_from_u64(6);
        let items = [10, 20, 30];
        for _ in 0..50 {
            assert!(items.contains(rng.choose_from(&items)));
        }
    }

    #[test]
    fn seeded_draws_are_reproducible() {
        let mut a = ChaCha8Rng::seed_from_u64(7);
        let mut b = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..20 {
            assert_eq!(a.gaussian(0.0, 1.0), b.gaussian(0.0, 1.0));
            assert_eq!(a.choose_index(17), b.choose_index(17));
        }
    }
}
