/// Deterministic SplitMix64 generator used for injected visual randomness.
///
/// Burst jitter must be a pure function of a seed so tests reproduce the
/// exact parameter stream without substituting a randomness source.
#[derive(Clone, Copy, Debug)]
pub struct Rng64 {
    state: u64,
}

impl Rng64 {
    /// Create a generator from an explicit seed.
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    /// Next raw 64-bit value.
    pub fn next_u64(&mut self) -> u64 {
        // SplitMix64
        self.state = self.state.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    /// Next float uniformly distributed in `[0, 1)`.
    pub fn next_f64_01(&mut self) -> f64 {
        // 53 bits of precision.
        let v = self.next_u64() >> 11;
        (v as f64) * (1.0 / ((1u64 << 53) as f64))
    }

    /// Next float uniformly distributed in `[-1, 1)`.
    pub fn next_f64_signed(&mut self) -> f64 {
        self.next_f64_01() * 2.0 - 1.0
    }
}

/// Stable 64-bit seed derived from a name, for per-scene effect streams.
pub(crate) fn seed_from_name(root_seed: u64, name: &str) -> u64 {
    root_seed ^ xxhash_rust::xxh3::xxh3_64(name.as_bytes())
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
