//! Uniform random sources, seeded construction, and index draws.
//!
//! Every randomized operation in this crate is written against
//! [`UniformSource`]: a single draw of a real value in `[0, 1)`. All
//! [`rand::Rng`] implementations are sources, so any generator from the
//! `rand` ecosystem can be passed in directly.
//!
//! # Reproducibility
//!
//! For reproducible runs, use [`create_rng`] with a fixed seed (or a
//! [`SourceConfig`] carrying one). The underlying algorithm (SmallRng) is
//! deterministic for a given seed on the same platform.

use std::env::VarError;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Environment variable read by [`SourceConfig::from_env`].
pub const SEED_ENV_VAR: &str = "U_SAMPLING_SEED";

/// A uniform random source over `[0, 1)`.
///
/// Successive draws are assumed independent. Implementations need not be
/// thread-safe; sources are always borrowed mutably.
pub trait UniformSource {
    /// Draws the next value in `[0, 1)`.
    fn next_unit(&mut self) -> f64;
}

impl<R: Rng + ?Sized> UniformSource for R {
    fn next_unit(&mut self) -> f64 {
        self.random::<f64>()
    }
}

/// Creates a fast, seeded random number generator.
///
/// Uses `SmallRng` (Xoshiro256++) for high performance.
/// The sequence is deterministic for a given seed on the same platform.
///
/// # Examples
/// ```
/// use u_sampling::random::{create_rng, UniformSource};
/// let mut rng = create_rng(42);
/// let x = rng.next_unit();
/// assert!(x >= 0.0 && x < 1.0);
/// ```
pub fn create_rng(seed: u64) -> SmallRng {
    tracing::trace!(seed, "seeding SmallRng");
    SmallRng::seed_from_u64(seed)
}

/// Creates a `SmallRng` seeded from operating-system entropy.
///
/// Draw sequences are not reproducible across calls.
pub fn entropy_rng() -> SmallRng {
    tracing::trace!("seeding SmallRng from OS entropy");
    SmallRng::from_os_rng()
}

/// Draws a uniform index in `[0, n)` as `floor(u * n)`.
///
/// The result is clamped to `n - 1` so that a source returning values
/// a rounding step below 1.0 can never index past the end.
///
/// # Panics
/// Panics if `n == 0`.
///
/// # Examples
/// ```
/// use u_sampling::random::{create_rng, index_below};
/// let mut rng = create_rng(7);
/// for _ in 0..100 {
///     assert!(index_below(&mut rng, 3) < 3);
/// }
/// ```
pub fn index_below<S: UniformSource + ?Sized>(source: &mut S, n: usize) -> usize {
    assert!(n > 0, "index_below requires n >= 1");
    let j = (source.next_unit() * n as f64).floor() as usize;
    j.min(n - 1)
}

/// Returns a fair random boolean: `true` when the draw is `>= 0.5`.
///
/// # Examples
/// ```
/// use u_sampling::random::{create_rng, random_bool};
/// let mut rng = create_rng(1);
/// let heads = (0..1000).filter(|_| random_bool(&mut rng)).count();
/// assert!(heads > 400 && heads < 600);
/// ```
pub fn random_bool<S: UniformSource + ?Sized>(source: &mut S) -> bool {
    source.next_unit() >= 0.5
}

/// Configuration selecting how a random source is seeded.
///
/// `seed: None` (the default) means OS entropy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Fixed seed for reproducible draws.
    pub seed: Option<u64>,
}

impl SourceConfig {
    /// A configuration with a fixed seed.
    pub fn seeded(seed: u64) -> Self {
        Self { seed: Some(seed) }
    }

    /// Reads the seed from [`SEED_ENV_VAR`]; unset means entropy.
    ///
    /// # Errors
    /// [`ConfigError::InvalidSeed`] if the variable is set but is not a
    /// `u64`, including when it is not valid Unicode.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_var(std::env::var(SEED_ENV_VAR))
    }

    fn from_var(var: Result<String, VarError>) -> Result<Self, ConfigError> {
        match var {
            Ok(raw) => Self::from_seed_str(&raw),
            Err(VarError::NotPresent) => Ok(Self::default()),
            Err(VarError::NotUnicode(raw)) => Err(ConfigError::InvalidSeed {
                value: raw.to_string_lossy().into_owned(),
            }),
        }
    }

    /// Parses a seed given as text. Surrounding whitespace is ignored.
    ///
    /// # Errors
    /// [`ConfigError::InvalidSeed`] if `raw` is not a `u64`.
    pub fn from_seed_str(raw: &str) -> Result<Self, ConfigError> {
        raw.trim()
            .parse::<u64>()
            .map(Self::seeded)
            .map_err(|_| ConfigError::InvalidSeed {
                value: raw.to_string(),
            })
    }

    /// Builds the generator this configuration describes.
    pub fn build(&self) -> SmallRng {
        match self.seed {
            Some(seed) => create_rng(seed),
            None => entropy_rng(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
