//! Random slug generation.
//!
//! Slugs are drawn uniformly from a 62-character alphanumeric alphabet using
//! the operating system's cryptographically secure random source.
//!
//! Random bytes are mapped onto the alphabet by rejection sampling. Bytes in
//! `248..=255` are discarded so that every character keeps a probability of
//! exactly 1/62.

use thiserror::Error;

/// Characters a slug may contain.
pub const ALPHABET: &[u8; 62] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Longest slug accepted for lookup. Matches the `slug` column bound.
pub const MAX_SLUG_LENGTH: usize = 16;

/// Largest multiple of 62 that fits in a byte (62 * 4).
const ACCEPT_BELOW: u8 = 248;

/// Bytes requested from the random source per draw.
const DRAW_SIZE: usize = 32;

/// Consecutive draws without a single usable byte before the source is
/// declared broken. A healthy source fails one draw with probability
/// (8/256)^32.
const MAX_EMPTY_DRAWS: usize = 8;

/// Errors raised while generating a slug.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SlugError {
    /// The secure random source failed. Never papered over with weaker randomness.
    #[error("secure random source failed: {0}")]
    Entropy(String),

    #[error("slug length must be at least 1")]
    ZeroLength,
}

/// Source of random bytes for slug generation.
///
/// Production code uses [`OsRandom`]; tests substitute deterministic or
/// failing sources.
pub trait RandomSource: Send + Sync {
    /// Fills `dest` entirely with random bytes.
    ///
    /// # Errors
    ///
    /// Returns [`SlugError::Entropy`] if the source cannot produce bytes.
    fn fill(&self, dest: &mut [u8]) -> Result<(), SlugError>;
}

/// Operating system CSPRNG via `getrandom`.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsRandom;

impl RandomSource for OsRandom {
    fn fill(&self, dest: &mut [u8]) -> Result<(), SlugError> {
        getrandom::fill(dest).map_err(|e| SlugError::Entropy(e.to_string()))
    }
}

/// Generates a slug of exactly `length` characters from [`ALPHABET`].
///
/// # Errors
///
/// - [`SlugError::ZeroLength`] if `length` is 0
/// - [`SlugError::Entropy`] if the random source fails or keeps returning
///   only out-of-range bytes
///
/// # Examples
///
/// ```
/// use slug_shortener::domain::slug::{OsRandom, generate};
///
/// let slug = generate(&OsRandom, 6).unwrap();
/// assert_eq!(slug.len(), 6);
/// assert!(slug.chars().all(|c| c.is_ascii_alphanumeric()));
/// ```
pub fn generate(source: &dyn RandomSource, length: usize) -> Result<String, SlugError> {
    if length == 0 {
        return Err(SlugError::ZeroLength);
    }

    let mut slug = String::with_capacity(length);
    let mut buffer = [0u8; DRAW_SIZE];

    let mut empty_draws = 0;

    while empty_draws < MAX_EMPTY_DRAWS {
        source.fill(&mut buffer)?;

        let before = slug.len();
        for &byte in buffer.iter().filter(|&&b| b < ACCEPT_BELOW) {
            slug.push(ALPHABET[usize::from(byte % 62)] as char);
            if slug.len() == length {
                return Ok(slug);
            }
        }

        if slug.len() == before {
            empty_draws += 1;
        } else {
            empty_draws = 0;
        }
    }

    Err(SlugError::Entropy(
        "random source produced no usable bytes".to_string(),
    ))
}

/// Returns true if `slug` could have been produced by [`generate`] and fits storage.
pub fn is_well_formed(slug: &str) -> bool {
    !slug.is_empty()
        && slug.len() <= MAX_SLUG_LENGTH
        && slug.bytes().all(|b| b.is_ascii_alphanumeric())
}
