//! Persisted serial number configuration
//!
//! Stores the serial range, the optional code prefix, and the seed: the last
//! serial handed out. The register value after every draw equals the drawn
//! serial, so a sampler rebuilt from `(smallest, biggest, seed)` picks up the
//! cycle exactly where the previous run stopped.
//!
//! # File Format
//!
//! ```text
//! {
//!     "*warning*": "Preserve the seed! Back-up this file and don't delete it.",
//!     "smallest": 1,
//!     "seed": 42,
//!     "biggest": 999,
//!     "prefix": "https://example.com/c/"
//! }
//! ```
//!
//! # Critical Invariants
//!
//! - **Range**: `0 < smallest <= seed <= biggest`, checked on configure, load and save
//! - **Strict fields**: unknown keys and non-integer numbers are rejected on load

use crate::entropy::EntropySource;
use crate::error::SequenceError;
use crate::sampler::RangeSampler;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_FILE_STEM: &str = "RandSN_config";
pub const CONFIG_EXTENSION: &str = ".json";

/// Smallest twelve-digit serial, the CLI's default lower bound
pub const DEFAULT_SMALLEST: u64 = 100_000_000_000;
/// Largest twelve-digit serial, the CLI's default upper bound
pub const DEFAULT_BIGGEST: u64 = 999_999_999_999;

const WARNING: &str = "Preserve the seed! Back-up this file and don't delete it.";

/// Errors from locating, loading or saving a configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Path {} is not a directory", .0.display())]
    NotADirectory(PathBuf),

    #[error("Config file name must have something before .json")]
    EmptyFileName,

    #[error("Range error, 0 < smallest <= seed <= biggest is required (got {smallest} <= {seed} <= {biggest})")]
    Range {
        smallest: u64,
        seed: u64,
        biggest: u64,
    },

    #[error("Sequence error: {0}")]
    Sequence(#[from] SequenceError),

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed config {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Where a configuration lives on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigLocation {
    path: PathBuf,
}

impl ConfigLocation {
    /// Resolve a config path
    ///
    /// `dir` defaults to the current working directory and must exist.
    /// `file_name` defaults to `RandSN_config`; `.json` is appended when
    /// missing.
    ///
    /// # Example
    /// ```
    /// use randsn_core::config::ConfigLocation;
    ///
    /// let dir = std::env::temp_dir();
    /// let location = ConfigLocation::new(Some(&dir), Some("batches")).unwrap();
    /// assert!(location.path().ends_with("batches.json"));
    /// ```
    pub fn new(dir: Option<&Path>, file_name: Option<&str>) -> Result<Self, ConfigError> {
        let dir = match dir {
            Some(dir) => {
                if !dir.is_dir() {
                    return Err(ConfigError::NotADirectory(dir.to_path_buf()));
                }
                dir.to_path_buf()
            }
            None => std::env::current_dir().map_err(|source| ConfigError::Io {
                path: PathBuf::from("."),
                source,
            })?,
        };

        let mut file = file_name.unwrap_or(DEFAULT_FILE_STEM).to_string();
        if !file.ends_with(CONFIG_EXTENSION) {
            file.push_str(CONFIG_EXTENSION);
        }
        if file == CONFIG_EXTENSION {
            return Err(ConfigError::EmptyFileName);
        }

        Ok(Self {
            path: dir.join(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }
}

/// On-disk shape, including the advisory warning
#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    #[serde(rename = "*warning*", default)]
    warning: Option<String>,
    smallest: u64,
    seed: u64,
    biggest: u64,
    #[serde(default)]
    prefix: Option<String>,
}

/// Serial range, code prefix and resume seed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerialConfig {
    smallest: u64,
    seed: u64,
    biggest: u64,
    prefix: Option<String>,
}

impl SerialConfig {
    /// Build a configuration from explicit values
    pub fn new(
        smallest: u64,
        seed: u64,
        biggest: u64,
        prefix: Option<String>,
    ) -> Result<Self, ConfigError> {
        let config = Self {
            smallest,
            seed,
            biggest,
            prefix,
        };
        config.validate()?;
        Ok(config)
    }

    /// Fresh configuration with a seed drawn uniformly from the range
    ///
    /// # Example
    /// ```
    /// use rand::rngs::StdRng;
    /// use rand::SeedableRng;
    /// use randsn_core::config::SerialConfig;
    ///
    /// let mut rng = StdRng::seed_from_u64(1);
    /// let config = SerialConfig::configure(999, 1, None, &mut rng).unwrap();
    /// assert!((1..=999).contains(&config.seed()));
    /// ```
    pub fn configure<E>(
        biggest: u64,
        smallest: u64,
        prefix: Option<String>,
        entropy: &mut E,
    ) -> Result<Self, ConfigError>
    where
        E: EntropySource + ?Sized,
    {
        if smallest == 0 || smallest > biggest {
            return Err(ConfigError::Range {
                smallest,
                seed: smallest,
                biggest,
            });
        }
        let seed = entropy.random_in(smallest, biggest);
        Self::new(smallest, seed, biggest, prefix)
    }

    /// Check `0 < smallest <= seed <= biggest`
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0 < self.smallest && self.smallest <= self.seed && self.seed <= self.biggest) {
            return Err(ConfigError::Range {
                smallest: self.smallest,
                seed: self.seed,
                biggest: self.biggest,
            });
        }
        Ok(())
    }

    /// Read and validate a configuration
    pub fn load(location: &ConfigLocation) -> Result<Self, ConfigError> {
        let path = location.path();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let file: ConfigFile = serde_json::from_str(&text).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })?;

        let config = Self::new(file.smallest, file.seed, file.biggest, file.prefix)?;
        tracing::debug!(
            path = %path.display(),
            smallest = config.smallest,
            biggest = config.biggest,
            "loaded serial config"
        );
        Ok(config)
    }

    /// Validate and write the configuration as pretty JSON
    pub fn save(&self, location: &ConfigLocation) -> Result<(), ConfigError> {
        self.validate()?;
        let path = location.path();
        let file = ConfigFile {
            warning: Some(WARNING.to_string()),
            smallest: self.smallest,
            seed: self.seed,
            biggest: self.biggest,
            prefix: self.prefix.clone(),
        };
        let mut text = serde_json::to_string_pretty(&file).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        text.push('\n');
        fs::write(path, text).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), seed = self.seed, "saved serial config");
        Ok(())
    }

    /// Sampler positioned just after the last recorded serial
    pub fn sampler(&self) -> Result<RangeSampler, ConfigError> {
        Ok(RangeSampler::with_seed(self.smallest, self.biggest, self.seed)?)
    }

    /// Record the last serial handed out as the next run's seed
    pub fn record(&mut self, last: u64) -> Result<(), ConfigError> {
        if !(self.smallest..=self.biggest).contains(&last) {
            return Err(ConfigError::Range {
                smallest: self.smallest,
                seed: last,
                biggest: self.biggest,
            });
        }
        self.seed = last;
        Ok(())
    }

    pub fn smallest(&self) -> u64 {
        self.smallest
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn biggest(&self) -> u64 {
        self.biggest
    }

    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    /// Decimal digits in `biggest`, the zero-padded width of a serial
    pub fn serial_width(&self) -> usize {
        self.biggest.to_string().len()
    }
}
