//! Source of primitive choices for descriptor generators.

use std::fmt;

use rand::distributions::Alphanumeric;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::config::{ConfigValidationError, GenerateConfig, GenerationMode};
use crate::value::Symbol;

/// Hands out primitive values and collection lengths to generators.
///
/// A canonical sampler always answers with the reference instance of each
/// kind; a random sampler draws from a [`StdRng`] within the configured
/// limits. Either way, the caller decides the shape, so generated values
/// satisfy the descriptor that asked for them.
pub struct Sampler {
    config: GenerateConfig,
    rng: Option<StdRng>,
}

impl Sampler {
    /// A sampler producing reference values.
    pub fn canonical() -> Self {
        Self {
            config: GenerateConfig::default(),
            rng: None,
        }
    }

    /// A random sampler with default limits and a fixed seed.
    pub fn seeded(seed: u64) -> Self {
        Self {
            config: GenerateConfig::random().with_seed(seed),
            rng: Some(StdRng::seed_from_u64(seed)),
        }
    }

    /// Build a sampler from a validated configuration.
    pub fn new(config: GenerateConfig) -> Result<Self, ConfigValidationError> {
        config.validate()?;
        let rng = match config.mode {
            GenerationMode::Canonical => None,
            GenerationMode::Random => Some(match config.seed {
                Some(seed) => {
                    debug!(seed, "seeding random sampler");
                    StdRng::seed_from_u64(seed)
                }
                None => StdRng::from_entropy(),
            }),
        };
        Ok(Self { config, rng })
    }

    pub fn config(&self) -> &GenerateConfig {
        &self.config
    }

    pub fn is_random(&self) -> bool {
        self.rng.is_some()
    }

    pub fn number(&mut self) -> f64 {
        match &mut self.rng {
            None => 1.0,
            Some(rng) => f64::from(rng.gen_range(-1000i32..=1000)),
        }
    }

    pub fn string(&mut self) -> String {
        match &mut self.rng {
            None => String::new(),
            Some(rng) => {
                let len = rng.gen_range(0..=self.config.max_string_len);
                (0..len).map(|_| char::from(rng.sample(Alphanumeric))).collect()
            }
        }
    }

    pub fn boolean(&mut self) -> bool {
        match &mut self.rng {
            None => true,
            Some(rng) => rng.gen_bool(0.5),
        }
    }

    pub fn symbol(&mut self) -> Symbol {
        Symbol::new(Some("generated"))
    }

    /// Length for a generated array; always zero in canonical mode.
    pub fn collection_len(&mut self) -> usize {
        match &mut self.rng {
            None => 0,
            Some(rng) => {
                rng.gen_range(self.config.min_collection_len..=self.config.max_collection_len)
            }
        }
    }
}

impl Default for Sampler {
    fn default() -> Self {
        Self::canonical()
    }
}

impl fmt::Debug for Sampler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sampler")
            .field("config", &self.config)
            .field("random", &self.is_random())
            .finish()
    }
}
