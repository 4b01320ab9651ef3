//! Size and digest grouping structures.
//!
//! # Overview
//!
//! Three nested collections carry files through the pipeline:
//!
//! - [`SizeIndex`]: size → files, in walk order (every indexed file)
//! - [`HashIndex`]: size → [`DigestBuckets`] (digest → files), only for
//!   sizes that had two or more files
//! - [`DuplicateSets`]: size → digest groups with two or more files
//!
//! Buckets are created explicitly on first insert; nothing is
//! default-constructed behind the caller's back. Insertion order is kept
//! at every level below the size key.
//!
//! # Example
//!
//! ```
//! use dupecull::duplicates::SizeIndex;
//! use dupecull::scanner::FileEntry;
//! use std::path::PathBuf;
//!
//! let index: SizeIndex = vec![
//!     FileEntry::new(PathBuf::from("/a.txt"), 100),
//!     FileEntry::new(PathBuf::from("/b.txt"), 100),
//!     FileEntry::new(PathBuf::from("/c.txt"), 200),
//! ]
//! .into_iter()
//! .collect();
//!
//! assert_eq!(index.len(), 2);
//! assert_eq!(index.total_files(), 3);
//! assert_eq!(index.candidate_files(), 2);  // Only the 100-byte pair can be duplicates
//! ```

use std::collections::HashMap;
use std::path::PathBuf;

use crate::scanner::{Digest, FileEntry};

/// Files grouped by exact byte size.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SizeIndex {
    buckets: HashMap<u64, Vec<FileEntry>>,
    total_files: usize,
}

impl SizeIndex {
    /// Create an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file to the bucket for its size, creating the bucket if absent.
    pub fn insert(&mut self, file: FileEntry) {
        match self.buckets.get_mut(&file.size) {
            Some(bucket) => bucket.push(file),
            None => {
                self.buckets.insert(file.size, vec![file]);
            }
        }
        self.total_files += 1;
    }

    /// Files of the given size, in insertion order.
    #[must_use]
    pub fn get(&self, size: u64) -> Option<&[FileEntry]> {
        self.buckets.get(&size).map(Vec::as_slice)
    }

    /// Number of distinct sizes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    /// Check whether no file was indexed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Total number of indexed files.
    #[must_use]
    pub fn total_files(&self) -> usize {
        self.total_files
    }

    /// Total size of all indexed files in bytes.
    #[must_use]
    pub fn total_size(&self) -> u64 {
        self.buckets
            .iter()
            .map(|(size, files)| size * files.len() as u64)
            .sum()
    }

    /// Distinct sizes, in no particular order.
    pub fn sizes(&self) -> impl Iterator<Item = u64> + '_ {
        self.buckets.keys().copied()
    }

    /// Iterate over all buckets, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (u64, &[FileEntry])> + '_ {
        self.buckets
            .iter()
            .map(|(size, files)| (*size, files.as_slice()))
    }

    /// Buckets that hold two or more files and so may contain duplicates.
    pub fn candidate_buckets(&self) -> impl Iterator<Item = (u64, &[FileEntry])> + '_ {
        self.iter().filter(|(_, files)| files.len() > 1)
    }

    /// Number of files sitting in candidate buckets.
    #[must_use]
    pub fn candidate_files(&self) -> usize {
        self.candidate_buckets().map(|(_, files)| files.len()).sum()
    }
}

impl FromIterator<FileEntry> for SizeIndex {
    fn from_iter<I: IntoIterator<Item = FileEntry>>(iter: I) -> Self {
        let mut index = Self::new();
        for file in iter {
            index.insert(file);
        }
        index
    }
}

/// Files of one size that share one digest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DigestGroup {
    /// File size in bytes (shared by all files in this group)
    pub size: u64,
    /// Content digest shared by all files in this group
    pub digest: Digest,
    /// Files with this size and digest, in walk order
    pub files: Vec<FileEntry>,
}

impl DigestGroup {
    /// Number of files in this group.
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Check if this group is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// A group is a duplicate set once it holds two or more files.
    #[must_use]
    pub fn is_duplicate(&self) -> bool {
        self.files.len() > 1
    }

    /// Space held by all copies but one.
    #[must_use]
    pub fn wasted_space(&self) -> u64 {
        self.size * self.files.len().saturating_sub(1) as u64
    }

    /// Get just the paths of files in this group.
    #[must_use]
    pub fn paths(&self) -> Vec<PathBuf> {
        self.files.iter().map(|f| f.path.clone()).collect()
    }
}

/// Digest groups for a single size, in first-seen digest order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DigestBuckets {
    size: u64,
    groups: Vec<DigestGroup>,
    positions: HashMap<Digest, usize>,
}

impl DigestBuckets {
    /// Create an empty set of buckets for files of `size` bytes.
    #[must_use]
    pub fn new(size: u64) -> Self {
        Self {
            size,
            groups: Vec::new(),
            positions: HashMap::new(),
        }
    }

    /// Size shared by every file in these buckets.
    #[must_use]
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Add a file under `digest`, opening a new group if the digest is new.
    pub fn push(&mut self, digest: Digest, file: FileEntry) {
        debug_assert_eq!(
            file.size, self.size,
            "File size {} doesn't match bucket size {}",
            file.size, self.size
        );
        match self.positions.get(&digest) {
            Some(&position) => self.groups[position].files.push(file),
            None => {
                self.positions.insert(digest.clone(), self.groups.len());
                self.groups.push(DigestGroup {
                    size: self.size,
                    digest,
                    files: vec![file],
                });
            }
        }
    }

    /// Group for `digest`, if any file had it.
    #[must_use]
    pub fn get(&self, digest: &Digest) -> Option<&DigestGroup> {
        self.positions.get(digest).map(|&i| &self.groups[i])
    }

    /// All groups in first-seen order.
    #[must_use]
    pub fn groups(&self) -> &[DigestGroup] {
        &self.groups
    }

    /// Consume into groups in first-seen order.
    #[must_use]
    pub fn into_groups(self) -> Vec<DigestGroup> {
        self.groups
    }

    /// Number of distinct digests.
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Check whether nothing was pushed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Number of files across all groups.
    #[must_use]
    pub fn file_count(&self) -> usize {
        self.groups.iter().map(DigestGroup::len).sum()
    }
}

/// Digest buckets keyed by size, for every size that was hashed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HashIndex {
    buckets: HashMap<u64, DigestBuckets>,
}

impl HashIndex {
    /// Create an empty hash index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the digest buckets computed for one size.
    pub fn insert(&mut self, buckets: DigestBuckets) {
        self.buckets.insert(buckets.size(), buckets);
    }

    /// Buckets for `size`, if that size was hashed.
    #[must_use]
    pub fn get(&self, size: u64) -> Option<&DigestBuckets> {
        self.buckets.get(&size)
    }

    /// Number of hashed sizes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    /// Check whether no size was hashed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Iterate over hashed sizes, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &DigestBuckets> + '_ {
        self.buckets.values()
    }
}

impl IntoIterator for HashIndex {
    type Item = DigestBuckets;
    type IntoIter = std::collections::hash_map::IntoValues<u64, DigestBuckets>;

    fn into_iter(self) -> Self::IntoIter {
        self.buckets.into_values()
    }
}

/// Confirmed duplicate sets keyed by size.
///
/// Every stored group has two or more files, and a size is only present
/// when it has at least one such group.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DuplicateSets {
    sets: HashMap<u64, Vec<DigestGroup>>,
}

impl DuplicateSets {
    /// Create an empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the duplicate groups found for one size.
    ///
    /// Groups with fewer than two files are dropped, and nothing is
    /// stored when no group qualifies.
    pub fn insert(&mut self, size: u64, groups: Vec<DigestGroup>) {
        let groups: Vec<DigestGroup> = groups.into_iter().filter(DigestGroup::is_duplicate).collect();
        if !groups.is_empty() {
            self.sets.insert(size, groups);
        }
    }

    /// Duplicate groups for `size`, in digest insertion order.
    #[must_use]
    pub fn get(&self, size: u64) -> Option<&[DigestGroup]> {
        self.sets.get(&size).map(Vec::as_slice)
    }

    /// Sizes that have duplicates, in no particular order.
    pub fn sizes(&self) -> impl Iterator<Item = u64> + '_ {
        self.sets.keys().copied()
    }

    /// Iterate over every duplicate group, in no particular order.
    pub fn groups(&self) -> impl Iterator<Item = &DigestGroup> + '_ {
        self.sets.values().flatten()
    }

    /// Number of sizes with duplicates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sets.len()
    }

    /// Check whether no duplicates were found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    /// Number of duplicate sets.
    #[must_use]
    pub fn set_count(&self) -> usize {
        self.sets.values().map(Vec::len).sum()
    }

    /// Number of files across all duplicate sets.
    #[must_use]
    pub fn file_count(&self) -> usize {
        self.groups().map(DigestGroup::len).sum()
    }

    /// Bytes that deleting all copies but one per set would free.
    #[must_use]
    pub fn reclaimable_space(&self) -> u64 {
        self.groups().map(DigestGroup::wasted_space).sum()
    }
}
