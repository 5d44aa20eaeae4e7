//! Configuration for value generation.
//!
//! [`GenerateConfig`] chooses between canonical generation, which reproduces
//! the fixed reference values (`1`, `""`, `true`, empty arrays), and seeded
//! random generation for property-based testing.
//!
//! # Example
//! ```rust
//! use tsr_runtime::{GenerateConfig, GenerationMode};
//!
//! let config = GenerateConfig::random()
//!     .with_seed(42)
//!     .with_collection_len(1, 3)
//!     .with_max_string_len(12);
//!
//! assert_eq!(config.mode, GenerationMode::Random);
//! config.validate().expect("config should be valid");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// Upper bound accepted for any length limit.
pub const MAX_GENERATION_LIMIT: usize = 1 << 16;

/// Error type for configuration validation failures.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigValidationError {
    /// min_collection_len must not exceed max_collection_len
    InvalidCollectionRange { min: usize, max: usize },
    /// max_collection_len must not exceed MAX_GENERATION_LIMIT
    CollectionLimitTooLarge(usize),
    /// max_string_len must not exceed MAX_GENERATION_LIMIT
    StringLimitTooLarge(usize),
}

impl fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidCollectionRange { min, max } => {
                write!(
                    f,
                    "min_collection_len ({}) must not exceed max_collection_len ({})",
                    min, max
                )
            }
            Self::CollectionLimitTooLarge(len) => {
                write!(
                    f,
                    "max_collection_len ({}) must be at most {}",
                    len, MAX_GENERATION_LIMIT
                )
            }
            Self::StringLimitTooLarge(len) => {
                write!(
                    f,
                    "max_string_len ({}) must be at most {}",
                    len, MAX_GENERATION_LIMIT
                )
            }
        }
    }
}

impl std::error::Error for ConfigValidationError {}

/// How generators pick values.
///
/// * `Canonical` - Always produce the fixed reference instance of each shape.
///   Deterministic and independent of every other config field.
///
/// * `Random` - Draw primitives and collection lengths from a random source.
///   Output still satisfies the descriptor it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum GenerationMode {
    #[default]
    Canonical,
    Random,
}

/// Generation settings.
///
/// # Fields
///
/// * `mode` - Canonical or random generation. Default: `Canonical`.
///
/// * `seed` - Seed for the random source. `None` seeds from OS entropy.
///   Ignored in canonical mode.
///
/// * `min_collection_len` / `max_collection_len` - Inclusive length range for
///   generated arrays in random mode. Default: 0..=4.
///
/// * `max_string_len` - Longest generated string in random mode. Default: 8.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerateConfig {
    pub mode: GenerationMode,
    pub seed: Option<u64>,
    pub min_collection_len: usize,
    pub max_collection_len: usize,
    pub max_string_len: usize,
}

impl Default for GenerateConfig {
    fn default() -> Self {
        Self {
            mode: GenerationMode::default(),
            seed: None,
            min_collection_len: 0,
            max_collection_len: 4,
            max_string_len: 8,
        }
    }
}

impl GenerateConfig {
    /// Canonical configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Random configuration with default limits.
    pub fn random() -> Self {
        Self::default().with_mode(GenerationMode::Random)
    }

    /// Set the generation mode.
    pub fn with_mode(mut self, mode: GenerationMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the inclusive length range for generated arrays.
    pub fn with_collection_len(mut self, min: usize, max: usize) -> Self {
        self.min_collection_len = min;
        self.max_collection_len = max;
        self
    }

    /// Set the longest generated string.
    pub fn with_max_string_len(mut self, max: usize) -> Self {
        self.max_string_len = max;
        self
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `min_collection_len` is greater than `max_collection_len`
    /// - `max_collection_len` or `max_string_len` exceeds [`MAX_GENERATION_LIMIT`]
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.min_collection_len > self.max_collection_len {
            return Err(ConfigValidationError::InvalidCollectionRange {
                min: self.min_collection_len,
                max: self.max_collection_len,
            });
        }
        if self.max_collection_len > MAX_GENERATION_LIMIT {
            return Err(ConfigValidationError::CollectionLimitTooLarge(
                self.max_collection_len,
            ));
        }
        if self.max_string_len > MAX_GENERATION_LIMIT {
            return Err(ConfigValidationError::StringLimitTooLarge(
                self.max_string_len,
            ));
        }
        Ok(())
    }
}
