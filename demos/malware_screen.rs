//! Screen a handful of keys against a small blocklist

use triad_bloom::utils::{optimal_capacity, theoretical_fpr};
use triad_bloom::BloomFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Triad Bloom Filter Example ===\n");

    let blocklist = ["malware", "trojan", "keylogger", "rootkit", "worm"];
    let capacity = optimal_capacity(blocklist.len(), 0.001);
    let mut filter = BloomFilter::new(capacity)?;

    for key in &blocklist {
        filter.insert(key);
        println!("  added {:<10} -> bits {:?}", key, filter.indices(key));
    }

    println!();
    for key in ["malware", "rootkit", "benign", "spreadsheet", "Malware"] {
        println!("  {:<12} in filter: {}", key, filter.contains(key));
    }

    println!("\n{}", filter.stats());
    println!(
        "Theoretical FPR: {:.6}",
        theoretical_fpr(filter.capacity(), filter.len())
    );
    Ok(())
}
