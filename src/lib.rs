//! # Triad Bloom
//!
//! A Bloom filter over string keys. Every key is fingerprinted by a fixed bank
//! of three classic string hashes (polynomial rolling, DJB2 and SDBM), and each
//! fingerprint selects one bit of a bit array sized at construction time.
//!
//! ```
//! use triad_bloom::BloomFilter;
//!
//! let mut filter = BloomFilter::new(1_000_003).unwrap();
//! filter.insert("malware");
//! filter.insert("trojan");
//!
//! assert!(filter.contains("malware"));
//! assert!(filter.contains("trojan"));
//! assert!(!filter.contains("benign"));
//! ```

pub mod bloom;
pub mod config;
pub mod dataset;
pub mod hash;
pub mod utils;

pub use bloom::{BloomFilter, BloomStats};
pub use config::FilterConfig;
pub use dataset::{populate, probe, probe_with, Dataset, QueryTally};
pub use hash::{Djb2Hash, HashBank, HashFunction, PolynomialHash, SdbmHash};

use std::path::PathBuf;

/// Common error types for the library
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_bloom_filter() {
        let mut bloom = BloomFilter::new(1000).unwrap();

        bloom.insert("alpha");
        bloom.insert("beta");
        bloom.insert("gamma");

        assert!(bloom.contains("alpha"));
        assert!(bloom.contains("beta"));
        assert!(bloom.contains("gamma"));
        assert_eq!(bloom.len(), 3);
    }

    #[test]
    fn test_error_display() {
        let err = Error::InvalidParameter("Capacity must be > 0".to_string());
        assert_eq!(err.to_string(), "Invalid parameter: Capacity must be > 0");
    }
}
