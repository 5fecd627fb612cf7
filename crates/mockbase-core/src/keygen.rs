//! Push-key generation
//!
//! Keys for `push` come from a [`KeyGenerator`]. The default
//! [`ShortIdGenerator`] produces short random identifiers from a URL-safe
//! alphabet; tests substitute their own generator (any `FnMut() -> String`
//! works) to script collisions.

/// Source of candidate keys for pushed children
///
/// Candidates may collide with existing keys; the caller retries.
pub trait KeyGenerator {
    /// Produce the next candidate key
    fn generate(&mut self) -> String;
}

impl<F> KeyGenerator for F
where
    F: FnMut() -> String,
{
    fn generate(&mut self) -> String {
        self()
    }
}

/// A small deterministic random number generator
///
/// Uses xorshift64 so a seed reproduces the same key sequence everywhere.
#[derive(Debug, Clone)]
pub struct XorShift64 {
    state: u64,
}

impl XorShift64 {
    /// Create a new RNG with the given seed
    pub fn new(seed: u64) -> Self {
        // xorshift requires a non-zero state
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Get the current state
    pub fn state(&self) -> u64 {
        self.state
    }

    /// Generate the next raw u64 value
    pub fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }

    /// Generate a random usize in range [min, max]
    pub fn range_usize(&mut self, min: usize, max: usize) -> usize {
        let range = (max - min + 1) as u64;
        min + (self.next_u64() % range) as usize
    }
}

impl Default for XorShift64 {
    fn default() -> Self {
        Self::new(12345)
    }
}

/// URL-safe alphabet used for generated keys
const ALPHABET: &[u8; 64] =
    b"0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ_-";

const MIN_LEN: usize = 7;
const MAX_LEN: usize = 14;

/// Generator of short random identifiers (7 to 14 characters)
#[derive(Debug, Clone, Default)]
pub struct ShortIdGenerator {
    rng: XorShift64,
}

impl ShortIdGenerator {
    /// Create a generator from a seed
    pub fn new(seed: u64) -> Self {
        Self {
            rng: XorShift64::new(seed),
        }
    }
}

impl KeyGenerator for ShortIdGenerator {
    fn generate(&mut self) -> String {
        let len = self.rng.range_usize(MIN_LEN, MAX_LEN);
        (0..len)
            .map(|_| ALPHABET[(self.rng.next_u64() % 64) as usize] as char)
            .collect()
    }
}
