//! Injected random source for simulated figures

use md5::{Digest, Md5};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Run-level random source
///
/// Each candidate gets its own generator derived from the run seed and a
/// stable hash of `domain|keyword`, so a seeded run reproduces every figure
/// for a given candidate regardless of which other candidates were drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Simulation {
    seed: u64,
}

impl Simulation {
    /// Reproducible simulation
    pub fn seeded(seed: u64) -> Self {
        Self { seed }
    }

    /// Fresh seed from the OS
    pub fn from_entropy() -> Self {
        Self {
            seed: rand::random(),
        }
    }

    /// Seeded when `seed` is given, otherwise from entropy
    pub fn from_option(seed: Option<u64>) -> Self {
        seed.map_or_else(Self::from_entropy, Self::seeded)
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Generator for one candidate
    pub fn rng_for(&self, domain: &str, keyword: &str) -> StdRng {
        let key = stable_hash(&format!("{}|{}", domain, keyword));
        StdRng::seed_from_u64(self.seed ^ key)
    }
}

/// First eight bytes of the md5 digest
pub fn stable_hash(input: &str) -> u64 {
    let digest = md5_digest(input);
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    u64::from_be_bytes(bytes)
}

/// Integer value of the first eight hex digits of the md5 digest
pub fn md5_prefix(input: &str) -> u64 {
    let digest = md5_digest(input);
    let mut bytes = [0u8; 4];
    bytes.copy_from_slice(&digest[..4]);
    u64::from(u32::from_be_bytes(bytes))
}

fn md5_digest(input: &str) -> [u8; 16] {
    let mut hasher = Md5::new();
    hasher.update(input.as_bytes());
    let mut out = [0u8; 16];
    out.copy_from_slice(&hasher.finalize());
    out
}
