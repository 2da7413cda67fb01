//! Standard Bloom filter implementation
//!
//! A fixed-size bit array fed by a [`HashBank`]. Each key sets the three bits
//! selected by its fingerprints; a query reports membership only when all three
//! are set. Bits are never cleared, so an inserted key is always reported.
//!
//! Keys are anything that exposes bytes: `&str`, `String`, `&[u8]` or
//! `Vec<u8>`. A string key and its UTF-8 bytes select the same bits.
//!
//! With a capacity of 1 every fingerprint reduces to bit 0, so after the first
//! insertion every key is reported as present. This follows directly from the
//! reduction and is not treated as an error.

use crate::hash::{HashBank, NUM_HASHES};
use crate::{Error, Result};
use bit_vec::BitVec;
use tracing::debug;

/// A standard Bloom filter over string keys
#[derive(Debug, Clone)]
pub struct BloomFilter {
    /// Bit array storing the filter data
    bits: BitVec,
    /// Hash functions used for this filter
    bank: HashBank,
    /// Number of insertions performed (for statistics)
    count: usize,
}

impl BloomFilter {
    /// Create a new Bloom filter with exactly `capacity` bits and the default
    /// hash constants
    pub fn new(capacity: usize) -> Result<Self> {
        Self::with_hash_bank(capacity, HashBank::default())
    }

    /// Create a Bloom filter with a specific hash bank
    pub fn with_hash_bank(capacity: usize, bank: HashBank) -> Result<Self> {
        if capacity == 0 {
            return Err(Error::InvalidParameter(
                "Capacity must be > 0".to_string(),
            ));
        }

        debug!(
            capacity,
            multiplier = bank.multiplier(),
            modulus = bank.modulus(),
            "allocating bloom filter"
        );

        Ok(BloomFilter {
            bits: BitVec::from_elem(capacity, false),
            bank,
            count: 0,
        })
    }

    /// Bit positions selected by `key`, in hash bank order
    pub fn indices<K: AsRef<[u8]> + ?Sized>(&self, key: &K) -> [usize; NUM_HASHES] {
        let bit_count = self.bits.len() as u64;
        self.bank
            .fingerprints(key)
            .map(|fingerprint| (fingerprint % bit_count) as usize)
    }

    /// Insert a key into the filter
    pub fn insert<K: AsRef<[u8]> + ?Sized>(&mut self, key: &K) {
        for idx in self.indices(key) {
            self.bits.set(idx, true);
        }

        self.count += 1;
    }

    /// Check if a key might be in the filter
    /// Returns true if the key might be present (with possible false positives)
    /// Returns false if the key is definitely not present
    pub fn contains<K: AsRef<[u8]> + ?Sized>(&self, key: &K) -> bool {
        self.indices(key)
            .iter()
            .all(|&idx| self.bits.get(idx).unwrap_or(false))
    }

    /// Number of bits currently set
    pub fn set_bits(&self) -> usize {
        self.bits.iter().filter(|&bit| bit).count()
    }

    /// Get the current load factor (fraction of bits set)
    pub fn load_factor(&self) -> f64 {
        self.set_bits() as f64 / self.bits.len() as f64
    }

    /// Get the estimated false positive rate from the observed load
    pub fn estimated_fpr(&self) -> f64 {
        self.load_factor().powi(NUM_HASHES as i32)
    }

    /// Whether every bit in the array is set
    pub fn all_set(&self) -> bool {
        self.bits.all()
    }

    /// Read-only view of the bit array
    pub fn bits(&self) -> &BitVec {
        &self.bits
    }

    pub fn hash_bank(&self) -> &HashBank {
        &self.bank
    }

    /// Get statistics about the filter
    pub fn stats(&self) -> BloomStats {
        BloomStats {
            capacity: self.bits.len(),
            num_hash_functions: NUM_HASHES,
            hash_functions: self.bank.functions().iter().map(|f| f.name()).collect(),
            elements_inserted: self.count,
            set_bits: self.set_bits(),
            load_factor: self.load_factor(),
            estimated_fpr: self.estimated_fpr(),
        }
    }

    /// Get the number of insertions performed
    pub fn len(&self) -> usize {
        self.count
    }

    /// Check if nothing has been inserted
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Get the capacity (number of bits)
    pub fn capacity(&self) -> usize {
        self.bits.len()
    }

    /// Get the number of hash functions
    pub fn num_hash_functions(&self) -> usize {
        NUM_HASHES
    }
}

/// Statistics about a Bloom filter
#[derive(Debug, Clone)]
pub struct BloomStats {
    pub capacity: usize,
    pub num_hash_functions: usize,
    pub hash_functions: Vec<String>,
    pub elements_inserted: usize,
    pub set_bits: usize,
    pub load_factor: f64,
    pub estimated_fpr: f64,
}

impl std::fmt::Display for BloomStats {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "BloomFilter Stats:\n\
             - Capacity: {} bits\n\
             - Hash functions: {} ({})\n\
             - Elements inserted: {}\n\
             - Bits set: {}\n\
             - Load factor: {:.6}\n\
             - Estimated FPR: {:.6}",
            self.capacity,
            self.num_hash_functions,
            self.hash_functions.join(", "),
            self.elements_inserted,
            self.set_bits,
            self.load_factor,
            self.estimated_fpr
        )
    }
}
