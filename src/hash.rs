//! Hash functions for Bloom filters
//!
//! Three classic string hashes with different mixing strategies: a polynomial
//! rolling hash, DJB2 and SDBM. They are not cryptographic and are used only
//! to derive bit positions.
//!
//! Keys are consumed as raw bytes (UTF-8 for `&str` keys, anything at all for
//! byte keys). Each byte is read as a signed 8-bit code unit, so bytes at or
//! above `0x80` contribute negative values. All arithmetic wraps at 2^64.

use crate::{Error, Result};

/// Default multiplier of the polynomial rolling hash
pub const DEFAULT_MULTIPLIER: u64 = 31;

/// Default modulus of the polynomial rolling hash, also the fingerprint range
pub const DEFAULT_MODULUS: u64 = 1_000_000_009;

/// Number of hash functions in a [`HashBank`]
pub const NUM_HASHES: usize = 3;

/// Trait for hash functions used in Bloom filters
pub trait HashFunction: Send + Sync {
    /// Hash a key to its raw (unreduced) value
    fn hash(&self, key: &[u8]) -> u64;

    /// Get a name/identifier for this hash function
    fn name(&self) -> String;
}

/// Sign-extended code units of `key`.
#[inline]
fn code_units(key: &[u8]) -> impl Iterator<Item = u64> + '_ {
    key.iter().map(|&b| b as i8 as i64 as u64)
}

/// Polynomial rolling hash: `(s[0] + s[1]*p + s[2]*p^2 + ...) mod m`
///
/// Each code unit is mapped to its 1-based lowercase alphabet position
/// (`c - 'a' + 1`). Characters outside `'a'..='z'` are not rejected; they
/// simply produce values outside `1..=26`.
pub fn polynomial_hash<K: AsRef<[u8]> + ?Sized>(
    key: &K,
    multiplier: u64,
    modulus: u64,
) -> u64 {
    let mut hash = 0u64;
    let mut p_pow = 1u64;
    for c in code_units(key.as_ref()) {
        let value = c.wrapping_sub(b'a' as u64).wrapping_add(1);
        hash = hash.wrapping_add(value.wrapping_mul(p_pow)) % modulus;
        p_pow = p_pow.wrapping_mul(multiplier) % modulus;
    }
    hash
}

/// DJB2: `hash * 33 + c`, seeded with 5381
pub fn djb2<K: AsRef<[u8]> + ?Sized>(key: &K) -> u64 {
    code_units(key.as_ref()).fold(5381u64, |hash, c| {
        (hash << 5).wrapping_add(hash).wrapping_add(c)
    })
}

/// SDBM: `hash * 65599 + c`, seeded with 0
pub fn sdbm<K: AsRef<[u8]> + ?Sized>(key: &K) -> u64 {
    code_units(key.as_ref()).fold(0u64, |hash, c| {
        c.wrapping_add(hash << 6)
            .wrapping_add(hash << 16)
            .wrapping_sub(hash)
    })
}

/// Polynomial rolling hash with a fixed multiplier and modulus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PolynomialHash {
    multiplier: u64,
    modulus: u64,
}

impl PolynomialHash {
    /// Create a new polynomial hash
    /// The modulus must be non-zero; its output lies in `[0, modulus)`
    pub fn new(multiplier: u64, modulus: u64) -> Result<Self> {
        if modulus == 0 {
            return Err(Error::InvalidParameter(
                "Polynomial hash modulus must be > 0".to_string(),
            ));
        }
        Ok(PolynomialHash {
            multiplier,
            modulus,
        })
    }

    pub fn multiplier(&self) -> u64 {
        self.multiplier
    }

    pub fn modulus(&self) -> u64 {
        self.modulus
    }
}

impl Default for PolynomialHash {
    fn default() -> Self {
        PolynomialHash {
            multiplier: DEFAULT_MULTIPLIER,
            modulus: DEFAULT_MODULUS,
        }
    }
}

impl HashFunction for PolynomialHash {
    fn hash(&self, key: &[u8]) -> u64 {
        polynomial_hash(key, self.multiplier, self.modulus)
    }

    fn name(&self) -> String {
        format!("polynomial{}-{}", self.multiplier, self.modulus)
    }
}

/// DJB2 hash (Dan Bernstein, `k = 33`)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Djb2Hash;

impl HashFunction for Djb2Hash {
    fn hash(&self, key: &[u8]) -> u64 {
        djb2(key)
    }

    fn name(&self) -> String {
        "djb2".to_string()
    }
}

/// SDBM hash, from the public-domain ndbm reimplementation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SdbmHash;

impl HashFunction for SdbmHash {
    fn hash(&self, key: &[u8]) -> u64 {
        sdbm(key)
    }

    fn name(&self) -> String {
        "sdbm".to_string()
    }
}

/// The fixed, ordered bank of three hash functions feeding a filter.
///
/// Every fingerprint is reduced into `[0, modulus)`, where `modulus` is the
/// polynomial hash's modulus. Reduction into a bit array happens separately,
/// in the filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HashBank {
    polynomial: PolynomialHash,
    djb2: Djb2Hash,
    sdbm: SdbmHash,
}

impl HashBank {
    pub fn new(multiplier: u64, modulus: u64) -> Result<Self> {
        Ok(HashBank {
            polynomial: PolynomialHash::new(multiplier, modulus)?,
            djb2: Djb2Hash,
            sdbm: SdbmHash,
        })
    }

    /// The three fingerprints of `key`, in bank order
    pub fn fingerprints<K: AsRef<[u8]> + ?Sized>(&self, key: &K) -> [u64; NUM_HASHES] {
        let key = key.as_ref();
        let modulus = self.polynomial.modulus();
        [
            self.polynomial.hash(key),
            self.djb2.hash(key) % modulus,
            self.sdbm.hash(key) % modulus,
        ]
    }

    /// The bank's functions, in fingerprint order
    pub fn functions(&self) -> [&dyn HashFunction; NUM_HASHES] {
        [&self.polynomial, &self.djb2, &self.sdbm]
    }

    pub fn multiplier(&self) -> u64 {
        self.polynomial.multiplier()
    }

    pub fn modulus(&self) -> u64 {
        self.polynomial.modulus()
    }
}
