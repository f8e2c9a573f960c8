//! Persistent dedup cache for evaluated listings.
//!
//! One JSON record per listing, appended to a line-delimited file and keyed
//! by listing id. Presence of an id means the listing was evaluated on some
//! earlier pass; records are never removed, so a listing is shown at most
//! once across runs. The full decoded listing is stored (not just the id)
//! so past records can be inspected after the fact.

use std::collections::HashSet;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use crate::domain::Listing;

/// Errors from the dedup cache.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// Reading or writing the cache file failed.
    #[error("cache I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Encoding a record failed.
    #[error("cache encode error: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Seam over the dedup store.
///
/// Running without a cache is a valid configuration: [`NoCache`] implements
/// the same seam as a no-op, so the pipeline never branches on "is there a
/// cache".
pub trait SeenStore {
    /// True when `id` was recorded on this or an earlier pass.
    fn contains(&self, id: u64) -> bool;

    /// Durably record a listing. Recording the same id again is a no-op.
    fn add(&mut self, listing: &Listing) -> Result<(), CacheError>;
}

impl SeenStore for Box<dyn SeenStore> {
    fn contains(&self, id: u64) -> bool {
        (**self).contains(id)
    }

    fn add(&mut self, listing: &Listing) -> Result<(), CacheError> {
        (**self).add(listing)
    }
}

/// File-backed cache of every listing the pipeline has evaluated.
#[derive(Debug)]
pub struct ListingCache {
    path: PathBuf,
    file: File,
    ids: HashSet<u64>,
}

impl ListingCache {
    /// Open (or create) a cache file and load the recorded id set.
    ///
    /// Creates parent directories if needed. Lines that fail to decode are
    /// skipped with a warning rather than poisoning the whole cache.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, CacheError> {
        let path = path.into();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent)?;
        }

        let mut ids = HashSet::new();
        if path.exists() {
            let reader = BufReader::new(File::open(&path)?);
            for (number, line) in reader.lines().enumerate() {
                let line = line?;
                if line.trim().is_empty() {
                    continue;
                }
                match serde_json::from_str::<Listing>(&line) {
                    Ok(listing) => {
                        ids.insert(listing.id);
                    }
                    Err(error) => tracing::warn!(
                        line = number + 1,
                        %error,
                        "skipping undecodable cache record"
                    ),
                }
            }
        }

        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        tracing::debug!(path = %path.display(), records = ids.len(), "opened listing cache");

        Ok(Self { path, file, ids })
    }

    /// Number of distinct recorded listings.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// The backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Re-read every decodable record from disk, in recorded order.
    pub fn records(&self) -> Result<Vec<Listing>, CacheError> {
        let reader = BufReader::new(File::open(&self.path)?);
        let mut records = Vec::new();
        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            if let Ok(listing) = serde_json::from_str::<Listing>(&line) {
                records.push(listing);
            }
        }
        Ok(records)
    }
}

impl SeenStore for ListingCache {
    fn contains(&self, id: u64) -> bool {
        self.ids.contains(&id)
    }

    fn add(&mut self, listing: &Listing) -> Result<(), CacheError> {
        if !self.ids.insert(listing.id) {
            return Ok(());
        }
        let mut line = serde_json::to_string(listing)?;
        line.push('\n');
        self.file.write_all(line.as_bytes())?;
        self.file.flush()?;
        Ok(())
    }
}

/// The absent-cache configuration: contains nothing, records nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCache;

impl SeenStore for NoCache {
    fn contains(&self, _id: u64) -> bool {
        false
    }

    fn add(&mut self, _listing: &Listing) -> Result<(), CacheError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use crate::domain::{Coordinate, Frequency, Price};

    use super::*;

    fn listing(id: u64) -> Listing {
        Listing {
            id,
            display_address: format!("Address {id}"),
            price: Some(Price {
                amount: 1500,
                frequency: Frequency::Monthly,
            }),
            location: Coordinate::new(51.5, -0.12),
            detail_path: Some(format!("/properties/{id}")),
        }
    }

    #[test]
    fn contains_after_add() {
        let dir = tempdir().unwrap();
        let mut cache = ListingCache::open(dir.path().join("seen.jsonl")).unwrap();

        assert!(!cache.contains(1));
        cache.add(&listing(1)).unwrap();
        assert!(cache.contains(1));
        assert!(!cache.contains(2));
    }

    #[test]
    fn contains_is_order_independent() {
        let dir = tempdir().unwrap();
        let mut cache = ListingCache::open(dir.path().join("seen.jsonl")).unwrap();

        cache.add(&listing(5)).unwrap();
        for id in [9, 2, 7, 4] {
            cache.add(&listing(id)).unwrap();
        }

        // Still present no matter how many records came after it
        assert!(cache.contains(5));
        assert_eq!(cache.len(), 5);
    }

    #[test]
    fn records_survive_reopening() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("seen.jsonl");

        {
            let mut cache = ListingCache::open(&path).unwrap();
            cache.add(&listing(1)).unwrap();
            cache.add(&listing(2)).unwrap();
        }

        let cache = ListingCache::open(&path).unwrap();
        assert!(cache.contains(1));
        assert!(cache.contains(2));
        assert!(!cache.contains(3));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn stored_record_round_trips() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("seen.jsonl");
        let original = listing(42);

        let mut cache = ListingCache::open(&path).unwrap();
        cache.add(&original).unwrap();

        let records = cache.records().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, original.id);
        assert_eq!(records[0].price, original.price);
        assert_eq!(records[0], original);
    }

    #[test]
    fn wire_decoded_listing_round_trips_through_the_cache() {
        let json = r#"{
            "id": 131405182,
            "display_address": "Baker Street, Marylebone, NW1",
            "price": {"amount": 1850, "frequency": "monthly"},
            "location": {"latitude": 51.5226, "longitude": -0.1571},
            "detail_path": "/properties/131405182"
        }"#;
        let decoded: Listing = serde_json::from_str(json).unwrap();

        let dir = tempdir().unwrap();
        let path = dir.path().join("seen.jsonl");
        {
            let mut cache = ListingCache::open(&path).unwrap();
            cache.add(&decoded).unwrap();
        }

        let reloaded = ListingCache::open(&path).unwrap();
        let records = reloaded.records().unwrap();
        assert_eq!(records[0].id, decoded.id);
        assert_eq!(records[0].price, decoded.price);
    }

    #[test]
    fn re_adding_an_id_is_idempotent() {
        let dir = tempdir().unwrap();
        let mut cache = ListingCache::open(dir.path().join("seen.jsonl")).unwrap();

        cache.add(&listing(1)).unwrap();
        cache.add(&listing(1)).unwrap();
        cache.add(&listing(1)).unwrap();

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.records().unwrap().len(), 1);
    }

    #[test]
    fn undecodable_lines_are_skipped() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("seen.jsonl");

        {
            let mut cache = ListingCache::open(&path).unwrap();
            cache.add(&listing(1)).unwrap();
        }
        // Corrupt the tail of the file, as a crash mid-write might
        let mut contents = std::fs::read_to_string(&path).unwrap();
        contents.push_str("{\"id\": trunc");
        std::fs::write(&path, contents).unwrap();

        let mut cache = ListingCache::open(&path).unwrap();
        assert!(cache.contains(1));
        assert_eq!(cache.len(), 1);

        // And the cache keeps working afterwards
        cache.add(&listing(2)).unwrap();
        assert!(cache.contains(2));
    }

    #[test]
    fn creates_parent_directories() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("dir").join("seen.jsonl");

        let mut cache = ListingCache::open(&path).unwrap();
        cache.add(&listing(1)).unwrap();

        assert!(path.exists());
    }

    #[test]
    fn no_cache_contains_nothing() {
        let mut cache = NoCache;

        assert!(!cache.contains(1));
        cache.add(&listing(1)).unwrap();
        assert!(!cache.contains(1));
    }

    #[test]
    fn boxed_store_delegates() {
        let dir = tempdir().unwrap();
        let mut cache: Box<dyn SeenStore> =
            Box::new(ListingCache::open(dir.path().join("seen.jsonl")).unwrap());

        cache.add(&listing(1)).unwrap();
        assert!(cache.contains(1));
        assert!(!cache.contains(2));
    }
}
