//! Filter configuration
//!
//! # Example
//!
//! ```
//! use triad_bloom::FilterConfig;
//!
//! let config = FilterConfig {
//!     capacity: 1_000_003,
//!     ..FilterConfig::default()
//! };
//! let filter = config.build().unwrap();
//! assert_eq!(filter.capacity(), 1_000_003);
//! ```

use crate::bloom::BloomFilter;
use crate::hash::{HashBank, DEFAULT_MODULUS, DEFAULT_MULTIPLIER};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default bit-array size
pub const DEFAULT_CAPACITY: usize = 1_000_001;

/// Bloom filter configuration
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Bit-array size
    pub capacity: usize,
    /// Polynomial hash multiplier
    pub multiplier: u64,
    /// Polynomial hash modulus (fingerprint range)
    pub modulus: u64,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            multiplier: DEFAULT_MULTIPLIER,
            modulus: DEFAULT_MODULUS,
        }
    }
}

impl FilterConfig {
    /// Load a configuration from a JSON file; missing fields take defaults
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&raw)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.capacity == 0 {
            return Err(Error::Config("capacity must be > 0".to_string()));
        }
        if self.modulus == 0 {
            return Err(Error::Config("modulus must be > 0".to_string()));
        }
        Ok(())
    }

    /// Construct an empty filter from this configuration
    pub fn build(&self) -> Result<BloomFilter> {
        self.validate()?;
        let bank = HashBank::new(self.multiplier, self.modulus)?;
        BloomFilter::with_hash_bank(self.capacity, bank)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = FilterConfig::default();
        assert!(config.validate().is_ok());

        let filter = config.build().unwrap();
        assert_eq!(filter.capacity(), DEFAULT_CAPACITY);
        assert_eq!(filter.hash_bank().modulus(), DEFAULT_MODULUS);
    }

    #[test]
    fn test_invalid_config() {
        let zero_capacity = FilterConfig {
            capacity: 0,
            ..FilterConfig::default()
        };
        assert!(matches!(zero_capacity.build(), Err(Error::Config(_))));

        let zero_modulus = FilterConfig {
            modulus: 0,
            ..FilterConfig::default()
        };
        assert!(zero_modulus.validate().is_err());
    }

    #[test]
    fn test_from_json_file_partial() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "capacity": 4096 }}"#).unwrap();
        file.flush().unwrap();

        let config = FilterConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.capacity, 4096);
        assert_eq!(config.multiplier, DEFAULT_MULTIPLIER);
    }

    #[test]
    fn test_from_json_file_malformed() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "capacity = 12").unwrap();
        file.flush().unwrap();

        assert!(matches!(
            FilterConfig::from_json_file(file.path()),
            Err(Error::Config(_))
        ));
    }
}
