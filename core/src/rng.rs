//! Deterministic random number generation for demo data.
//!
//! RULE: the generator never touches a platform RNG. Every draw flows through
//! a `DemoRng` stream derived from one seed, so a seed reproduces the same
//! population byte for byte.
//!
//! Each concern (profiles, orders, tickets, feedback) has its own stream,
//! seeded from (seed XOR slot * golden ratio). Adding a stream never shifts
//! the draws of the existing ones.

use rand::{RngCore, SeedableRng};
use rand_pcg::Pcg64Mcg;

pub struct DemoRng {
    pub name: &'static str,
    inner: Pcg64Mcg,
}

impl DemoRng {
    pub fn new(seed: u64, slot_index: u64) -> Self {
        let derived_seed = seed ^ (slot_index.wrapping_mul(0x9e37_79b9_7f4a_7c15));
        Self {
            name: "unnamed",
            inner: Pcg64Mcg::seed_from_u64(derived_seed),
        }
    }

    pub fn with_name(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }

    /// Float in [0.0, 1.0).
    pub fn next_f64(&mut self) -> f64 {
        let bits = self.inner.next_u64();
        (bits >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }

    pub fn next_u64(&mut self) -> u64 {
        self.inner.next_u64()
    }

    /// u64 in [0, n).
    pub fn next_u64_below(&mut self, n: u64) -> u64 {
        assert!(n > 0, "n must be > 0");
        self.inner.next_u64() % n
    }

    /// Integer in [low, high], both ends included.
    pub fn between(&mut self, low: u32, high: u32) -> u32 {
        assert!(low <= high, "empty range {low}..={high}");
        low + self.next_u64_below((high - low) as u64 + 1) as u32
    }

    pub fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }

    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[self.next_u64_below(items.len() as u64) as usize]
    }

    /// Index drawn proportionally to `weights`. Weights need not sum to 1.
    pub fn weighted_index(&mut self, weights: &[f64]) -> usize {
        let total: f64 = weights.iter().sum();
        let roll = self.next_f64() * total;
        let mut cumulative = 0.0;
        for (i, w) in weights.iter().enumerate() {
            cumulative += w;
            if roll < cumulative {
                return i;
            }
        }
        weights.len().saturating_sub(1)
    }

    /// Poisson draw (Knuth). Fine for the small means demo data uses.
    pub fn poisson(&mut self, lambda: f64) -> u32 {
        if lambda <= 0.0 {
            return 0;
        }
        let limit = (-lambda).exp();
        let mut k = 0u32;
        let mut p = 1.0;
        loop {
            p *= self.next_f64();
            if p <= limit {
                return k;
            }
            k += 1;
        }
    }

    /// Standard normal via Box–Muller.
    pub fn standard_normal(&mut self) -> f64 {
        let u1 = self.next_f64().max(1e-12);
        let u2 = self.next_f64();
        (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos()
    }

    pub fn lognormal(&mut self, mu: f64, sigma: f64) -> f64 {
        (mu + sigma * self.standard_normal()).exp()
    }

    pub fn bytes16(&mut self) -> [u8; 16] {
        let mut out = [0u8; 16];
        self.inner.fill_bytes(&mut out);
        out
    }
}

pub struct RngBank {
    seed: u64,
}

impl RngBank {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    pub fn for_stream(&self, slot: StreamSlot) -> DemoRng {
        DemoRng::new(self.seed, slot as u64).with_name(slot.name())
    }
}

/// Stable stream assignments. Append only: reordering reseeds everything.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u64)]
pub enum StreamSlot {
    Profile = 0,
    Orders = 1,
    Tickets = 2,
    Feedback = 3,
}

impl StreamSlot {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Profile => "profile",
            Self::Orders => "orders",
            Self::Tickets => "tickets",
            Self::Feedback => "feedback",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_stream() {
        let bank = RngBank::new(7);
        let mut a = bank.for_stream(StreamSlot::Orders);
        let mut b = bank.for_stream(StreamSlot::Orders);
        for _ in 0..32 {
            assert_eq!(a.next_u64(), b.next_u64());
        }
    }

    #[test]
    fn streams_are_independent() {
        let bank = RngBank::new(7);
        let mut a = bank.for_stream(StreamSlot::Orders);
        let mut b = bank.for_stream(StreamSlot::Tickets);
        assert_ne!(a.next_u64(), b.next_u64());
    }

    #[test]
    fn poisson_mean_is_close() {
        let mut rng = DemoRng::new(11, 0);
        let n = 20_000;
        let sum: u64 = (0..n).map(|_| rng.poisson(5.0) as u64).sum();
        let mean = sum as f64 / n as f64;
        assert!((mean - 5.0).abs() < 0.15, "poisson mean {mean}");
    }

    #[test]
    fn weighted_index_respects_zero_weights() {
        let mut rng = DemoRng::new(3, 0);
        for _ in 0..1_000 {
            assert_eq!(rng.weighted_index(&[0.0, 1.0, 0.0]), 1);
        }
    }

    #[test]
    fn between_is_inclusive() {
        let mut rng = DemoRng::new(5, 0);
        let draws: Vec<u32> = (0..2_000).map(|_| rng.between(1, 5)).collect();
        assert!(draws.iter().all(|d| (1..=5).contains(d)));
        assert!(draws.contains(&1) && draws.contains(&5));
    }
}
