//! Deterministic pseudo-random number generator
//!
//! A 32-bit linear congruential generator (Numerical Recipes constants).
//! Every component that needs randomness is handed its own instance, so
//! independent simulations never share generator state.

use rand::{RngCore, SeedableRng};

const MULTIPLIER: u32 = 1_664_525;
const INCREMENT: u32 = 1_013_904_223;
const MODULUS: f64 = 4_294_967_296.0; // 2^32

/// Seeded linear congruential generator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lcg {
    state: u32,
}

impl Lcg {
    /// Create a generator whose initial state is `seed`
    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    /// Current internal state
    pub fn state(&self) -> u32 {
        self.state
    }

    fn advance(&mut self) -> u32 {
        self.state = self.state.wrapping_mul(MULTIPLIER).wrapping_add(INCREMENT);
        self.state
    }

    /// Next value in `[0, 1)`
    pub fn next_f64(&mut self) -> f64 {
        f64::from(self.advance()) / MODULUS
    }

    /// Uniform index in `[0, len)`; returns 0 for an empty range
    pub fn next_index(&mut self, len: usize) -> usize {
        let index = (self.next_f64() * len as f64) as usize;
        index.min(len.saturating_sub(1))
    }

    /// True with probability `probability`
    pub fn chance(&mut self, probability: f64) -> bool {
        self.next_f64() < probability
    }

    /// Uniform integer in `[low, high]`
    pub fn range_inclusive(&mut self, low: usize, high: usize) -> usize {
        if high <= low {
            // One draw either way
            self.advance();
            return low;
        }
        low + self.next_index(high - low + 1)
    }
}

impl RngCore for Lcg {
    fn next_u32(&mut self) -> u32 {
        self.advance()
    }

    fn next_u64(&mut self) -> u64 {
        let high = u64::from(self.advance());
        let low = u64::from(self.advance());
        (high << 32) | low
    }

    fn fill_bytes(&mut self, dst: &mut [u8]) {
        for chunk in dst.chunks_mut(4) {
            let bytes = self.advance().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }
}

impl SeedableRng for Lcg {
    type Seed = [u8; 4];

    fn from_seed(seed: Self::Seed) -> Self {
        Self::new(u32::from_le_bytes(seed))
    }
}
