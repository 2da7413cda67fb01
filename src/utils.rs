//! Utility functions for Bloom filters
//!
//! The filter never sizes itself. These helpers let a caller pick a capacity
//! for an expected key count and estimate the resulting false positive rate.

use crate::hash::NUM_HASHES;

/// Smallest bit count that keeps the false positive rate of a three-hash
/// filter at or below `desired_fpr` after `expected_keys` insertions
///
/// m = -k * n / ln(1 - p^(1/k))
pub fn optimal_capacity(expected_keys: usize, desired_fpr: f64) -> usize {
    if expected_keys == 0 || !(desired_fpr > 0.0 && desired_fpr < 1.0) {
        return 1;
    }

    let k = NUM_HASHES as f64;
    let n = expected_keys as f64;
    let per_hash = desired_fpr.powf(1.0 / k);
    let bits = (-k * n / (1.0 - per_hash).ln()).ceil();

    (bits as usize).max(1)
}

/// Theoretical false positive rate of a three-hash filter
///
/// p = (1 - e^(-k * n / m))^k
pub fn theoretical_fpr(capacity: usize, inserted: usize) -> f64 {
    if capacity == 0 {
        return 1.0;
    }

    let k = NUM_HASHES as f64;
    let fill = 1.0 - (-k * inserted as f64 / capacity as f64).exp();
    fill.powi(NUM_HASHES as i32)
}
