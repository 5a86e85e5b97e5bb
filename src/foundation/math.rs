use crate::foundation::error::{SkylineError, SkylineResult};

/// Run-scoped deterministic generator (SplitMix64).
///
/// Only the layout generator draws from it; rendering is a pure function of the layout.
#[derive(Clone, Debug)]
pub struct Rng64 {
    state: u64,
}

impl Rng64 {
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    /// Seed from the wall clock, for runs that did not pin a seed.
    pub fn seed_from_time() -> u64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0x5EED)
    }

    pub fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    /// Uniform in `[0, 1)` with 53 bits of precision.
    pub fn next_f64_01(&mut self) -> f64 {
        let v = self.next_u64() >> 11;
        (v as f64) * (1.0 / ((1u64 << 53) as f64))
    }

    /// Uniform integer in `[lo, hi)`.
    pub fn range_u32(&mut self, lo: u32, hi: u32) -> SkylineResult<u32> {
        if lo >= hi {
            return Err(SkylineError::config(format!(
                "empty sampling range [{lo}, {hi})"
            )));
        }
        let span = u64::from(hi - lo);
        let offset = ((u128::from(self.next_u64()) * u128::from(span)) >> 64) as u32;
        Ok(lo + offset)
    }

    /// Uniform float in `[lo, hi)`.
    pub fn range_f64(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64_01()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
