//! Deterministic random number generation
//!
//! A small 32-bit add-and-mix generator (mulberry32 constants). Every stream
//! used by world generation is derived from the world seed, so identical seeds
//! reproduce identical terrain on any platform.

use rand::RngCore;

const GOLDEN_GAMMA: u32 = 0x6D2B_79F5;
const TWO_POW_32: f64 = 4_294_967_296.0;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SeededRng {
    state: u32,
}

impl SeededRng {
    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    /// Stream for a signed world seed; the bit pattern is reused as-is.
    pub fn from_world_seed(seed: i32) -> Self {
        Self::new(seed as u32)
    }

    pub fn state(&self) -> u32 {
        self.state
    }

    fn next_raw(&mut self) -> u32 {
        self.state = self.state.wrapping_add(GOLDEN_GAMMA);
        let mut t = self.state;
        t = (t ^ (t >> 15)).wrapping_mul(t | 1);
        t ^= t.wrapping_add((t ^ (t >> 7)).wrapping_mul(t | 61));
        t ^ (t >> 14)
    }

    /// Uniform value in `[0, 1)`.
    pub fn next_f64(&mut self) -> f64 {
        self.next_raw() as f64 / TWO_POW_32
    }

    /// Uniform integer in `[min, max]`, both bounds inclusive.
    pub fn next_int(&mut self, min: i64, max: i64) -> i64 {
        let span = (max - min + 1) as f64;
        (self.next_f64() * span).floor() as i64 + min
    }
}

impl RngCore for SeededRng {
    fn next_u32(&mut self) -> u32 {
        self.next_raw()
    }

    fn next_u64(&mut self) -> u64 {
        let high = self.next_raw() as u64;
        let low = self.next_raw() as u64;
        (high << 32) | low
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(4) {
            let bytes = self.next_raw().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

/// Derive an independent stream seed from the world seed and a salt.
pub fn mix_seed(seed: i32, salt: i32) -> u32 {
    let mut h = (seed as u32) ^ (salt as u32);
    h ^= h >> 16;
    h = h.wrapping_mul(0x85EB_CA6B);
    h ^= h >> 13;
    h = h.wrapping_mul(0xC2B2_AE35);
    h ^= h >> 16;
    h
}
