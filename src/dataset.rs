//! Line-delimited record sources
//!
//! A [`Dataset`] supplies the filter with an ordered sequence of keys, one per
//! line. It owns all file I/O; the filter itself never sees a failure.
//!
//! Records are raw bytes with the trailing `\n` (and `\r`, if any) removed.
//! No character-set validation happens here, so a Latin-1 or otherwise
//! non-UTF-8 line is inserted and queried like any other.

use crate::bloom::BloomFilter;
use crate::{Error, Result};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// A restartable, line-delimited record source
#[derive(Debug, Clone)]
pub struct Dataset {
    path: PathBuf,
}

impl Dataset {
    /// Open a dataset, failing early if the file cannot be read
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        File::open(&path).map_err(|source| Error::Io {
            path: path.clone(),
            source,
        })?;
        Ok(Dataset { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the records from the start of the file
    pub fn records(&self) -> Result<impl Iterator<Item = Result<Vec<u8>>> + '_> {
        let file = File::open(&self.path).map_err(|source| self.io_error(source))?;
        Ok(BufReader::new(file).split(b'\n').map(move |line| {
            line.map(|mut record| {
                if record.last() == Some(&b'\r') {
                    record.pop();
                }
                record
            })
            .map_err(|source| self.io_error(source))
        }))
    }

    fn io_error(&self, source: std::io::Error) -> Error {
        Error::Io {
            path: self.path.clone(),
            source,
        }
    }
}

/// Running positive/negative counters for a series of membership queries
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueryTally {
    pub positives: usize,
    pub negatives: usize,
}

impl QueryTally {
    pub fn record(&mut self, present: bool) {
        if present {
            self.positives += 1;
        } else {
            self.negatives += 1;
        }
    }

    pub fn total(&self) -> usize {
        self.positives + self.negatives
    }
}

/// Insert every record of `dataset` into `filter`, returning the rows added
pub fn populate(filter: &mut BloomFilter, dataset: &Dataset) -> Result<usize> {
    let mut added = 0;
    for record in dataset.records()? {
        let record = record?;
        debug!(key = %String::from_utf8_lossy(&record), "added");
        filter.insert(&record);
        added += 1;
    }

    info!(
        source = %dataset.path().display(),
        rows_added = added,
        total_bits = filter.capacity(),
        "bloom filter populated"
    );
    Ok(added)
}

/// Query every record of `dataset` against `filter`
pub fn probe(filter: &BloomFilter, dataset: &Dataset) -> Result<QueryTally> {
    probe_with(filter, dataset, |_, _| {})
}

/// Query every record of `dataset` against `filter`, handing each record and
/// its result to `visit` in file order
pub fn probe_with<F>(filter: &BloomFilter, dataset: &Dataset, mut visit: F) -> Result<QueryTally>
where
    F: FnMut(&[u8], bool),
{
    let mut tally = QueryTally::default();
    for record in dataset.records()? {
        let record = record?;
        let present = filter.contains(&record);
        debug!(key = %String::from_utf8_lossy(&record), present, "checked");
        visit(&record, present);
        tally.record(present);
    }

    info!(
        source = %dataset.path().display(),
        positives = tally.positives,
        negatives = tally.negatives,
        "probe finished"
    );
    Ok(tally)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_lines(lines: &[u8]) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(lines).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_records_are_restartable() {
        let file = write_lines(b"malware\r\ntrojan\n\nworm");
        let dataset = Dataset::open(file.path()).unwrap();

        let first: Vec<Vec<u8>> = dataset.records().unwrap().map(|r| r.unwrap()).collect();
        let second: Vec<Vec<u8>> = dataset.records().unwrap().map(|r| r.unwrap()).collect();

        assert_eq!(
            first,
            vec![b"malware".to_vec(), b"trojan".to_vec(), vec![], b"worm".to_vec()]
        );
        assert_eq!(first, second);
    }

    #[test]
    fn test_open_missing_file() {
        let err = Dataset::open("/definitely/not/here.csv").unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
        assert!(err.to_string().contains("/definitely/not/here.csv"));
    }

    #[test]
    fn test_populate_then_probe() {
        let file = write_lines(b"malware\ntrojan\n");
        let dataset = Dataset::open(file.path()).unwrap();
        let mut filter = BloomFilter::new(1_000_003).unwrap();

        assert_eq!(populate(&mut filter, &dataset).unwrap(), 2);
        assert_eq!(filter.len(), 2);

        let tally = probe(&filter, &dataset).unwrap();
        assert_eq!(
            tally,
            QueryTally {
                positives: 2,
                negatives: 0
            }
        );

        let benign = write_lines(b"benign\n");
        let tally = probe(&filter, &Dataset::open(benign.path()).unwrap()).unwrap();
        assert_eq!(tally.negatives, 1);
        assert_eq!(tally.total(), 1);
    }

    #[test]
    fn test_non_utf8_line_does_not_stop_the_load() {
        let file = write_lines(b"malware\ncaf\xe9\ntrojan\n");
        let dataset = Dataset::open(file.path()).unwrap();
        let mut filter = BloomFilter::new(1_000_003).unwrap();

        assert_eq!(populate(&mut filter, &dataset).unwrap(), 3);
        assert_eq!(filter.len(), 3);
        assert!(filter.contains("malware"));
        assert!(filter.contains(&b"caf\xe9"[..]));
        assert!(filter.contains("trojan"));

        let tally = probe(&filter, &dataset).unwrap();
        assert_eq!(tally.positives, 3);
        assert_eq!(tally.negatives, 0);
    }

    #[test]
    fn test_probe_with_visits_in_order() {
        let source = write_lines(b"malware\ntrojan\n");
        let mut filter = BloomFilter::new(1_000_003).unwrap();
        populate(&mut filter, &Dataset::open(source.path()).unwrap()).unwrap();

        let checks = write_lines(b"trojan\nbenign\n");
        let mut seen = Vec::new();
        let tally = probe_with(&filter, &Dataset::open(checks.path()).unwrap(), |key, present| {
            seen.push((key.to_vec(), present))
        })
        .unwrap();

        assert_eq!(
            seen,
            vec![(b"trojan".to_vec(), true), (b"benign".to_vec(), false)]
        );
        assert_eq!(tally, QueryTally { positives: 1, negatives: 1 });
    }
}
