//! Duplicate finder implementation.
//!
//! # Overview
//!
//! This module runs the detection pipeline:
//! 1. **Indexing** ([`index_files`]): walk the tree and bucket files by size
//! 2. **Hashing** ([`group_by_digest`]): digest every file whose size bucket
//!    has two or more members, and bucket those files by digest
//! 3. **Set building** ([`build_duplicate_sets`]): keep digest groups with
//!    two or more files
//!
//! Files that are alone in their size bucket are never opened.
//!
//! Hashing fans out over a bounded rayon pool, one task per size bucket.
//! Each task walks its bucket in order, so the result does not depend on
//! which task finishes first.
//!
//! # Example
//!
//! ```no_run
//! use dupecull::duplicates::{build_duplicate_sets, group_by_digest, index_files, GrouperConfig};
//! use dupecull::scanner::{HashAlgorithm, Hasher, WalkerConfig};
//! use std::path::Path;
//!
//! let index = index_files(Path::new("."), &WalkerConfig::default(), None).unwrap();
//! let hasher = Hasher::new(HashAlgorithm::Md5);
//! let (hashed, stats) = group_by_digest(&index, &hasher, &GrouperConfig::default()).unwrap();
//! let sets = build_duplicate_sets(hashed);
//!
//! println!("{} files hashed, {} duplicate sets", stats.hashed_files, sets.set_count());
//! ```

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use rayon::prelude::*;

use super::groups::{DigestBuckets, DuplicateSets, HashIndex, SizeIndex};
use crate::progress::{ProgressCallback, PHASE_HASHING, PHASE_INDEXING};
use crate::scanner::{
    FileEntry, FileHasher, HashAlgorithm, HashError, Hasher, ScanError, Walker, WalkerConfig,
};

/// Walk `root` and bucket every matching file by size (FileIndexer).
///
/// The walk is all-or-nothing: the first traversal or metadata error
/// aborts indexing and is returned.
///
/// # Errors
///
/// Returns `ScanError` if the root is missing or not a directory, or if
/// any entry beneath it cannot be read.
pub fn index_files(
    root: &Path,
    config: &WalkerConfig,
    progress: Option<&dyn ProgressCallback>,
) -> Result<SizeIndex, ScanError> {
    let walker = Walker::new(root, config.clone());
    walker.validate_root()?;

    log::info!(
        "Indexing {} (suffix filter: {:?})",
        root.display(),
        config.extension
    );

    if let Some(callback) = progress {
        callback.on_phase_start(PHASE_INDEXING, 0);
    }

    let mut index = SizeIndex::new();
    let result = walker.walk().try_for_each(|entry| -> Result<(), ScanError> {
        let file = entry?;
        if let Some(callback) = progress {
            callback.on_progress(index.total_files() + 1, &file.path.to_string_lossy());
        }
        index.insert(file);
        Ok(())
    });

    if let Some(callback) = progress {
        callback.on_phase_end(PHASE_INDEXING);
    }
    result?;

    log::info!(
        "Indexed {} files in {} size buckets ({} bytes)",
        index.total_files(),
        index.len(),
        index.total_size()
    );

    Ok(index)
}

/// Configuration for the hashing phase.
#[derive(Clone)]
pub struct GrouperConfig {
    /// Number of I/O threads for parallel hashing.
    /// Default is 4 to prevent disk thrashing.
    pub io_threads: usize,
    /// Optional progress callback.
    pub progress_callback: Option<Arc<dyn ProgressCallback>>,
}

impl std::fmt::Debug for GrouperConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GrouperConfig")
            .field("io_threads", &self.io_threads)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<callback>"),
            )
            .finish()
    }
}

impl Default for GrouperConfig {
    fn default() -> Self {
        Self {
            io_threads: 4,
            progress_callback: None,
        }
    }
}

impl GrouperConfig {
    /// Create a new configuration with custom I/O thread count.
    #[must_use]
    pub fn with_io_threads(mut self, threads: usize) -> Self {
        self.io_threads = threads.max(1);
        self
    }

    /// Set the progress callback.
    #[must_use]
    pub fn with_progress_callback(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress_callback = Some(callback);
        self
    }
}

/// Statistics from the hashing phase.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HashStats {
    /// Files present in the size index
    pub input_files: usize,
    /// Files that were read and digested
    pub hashed_files: usize,
    /// Files skipped because no other file shares their size
    pub unique_size_files: usize,
    /// Total bytes read while hashing
    pub bytes_hashed: u64,
    /// Distinct (size, digest) groups produced
    pub digest_groups: usize,
}

/// Digest every file in a size bucket with two or more members and
/// bucket the files by digest within their size (HashGrouper).
///
/// # Errors
///
/// Any file that cannot be read fails the whole operation; there is no
/// partial result.
pub fn group_by_digest(
    index: &SizeIndex,
    hasher: &dyn FileHasher,
    config: &GrouperConfig,
) -> Result<(HashIndex, HashStats), HashError> {
    let candidates: Vec<(u64, &[FileEntry])> = index.candidate_buckets().collect();
    let total: usize = candidates.iter().map(|(_, files)| files.len()).sum();
    let mut stats = HashStats {
        input_files: index.total_files(),
        unique_size_files: index.total_files() - total,
        ..Default::default()
    };

    if candidates.is_empty() {
        log::info!("No size bucket holds more than one file, nothing to hash");
        return Ok((HashIndex::new(), stats));
    }

    log::info!(
        "Hashing {} files in {} size buckets ({} files skipped as unique in size)",
        total,
        candidates.len(),
        stats.unique_size_files
    );

    let progress = config.progress_callback.as_deref();
    if let Some(callback) = progress {
        callback.on_phase_start(PHASE_HASHING, total);
    }

    let counter = AtomicUsize::new(0);
    let hash_all = || {
        candidates
            .par_iter()
            .map(|(size, files)| hash_bucket(*size, files, hasher, progress, &counter))
            .collect::<Result<Vec<DigestBuckets>, HashError>>()
    };

    // Build a custom thread pool with limited parallelism for I/O
    let results = match rayon::ThreadPoolBuilder::new()
        .num_threads(config.io_threads.max(1))
        .build()
    {
        Ok(pool) => pool.install(hash_all),
        Err(e) => {
            log::warn!(
                "Failed to create hashing pool ({}), using global pool with {} threads",
                e,
                rayon::current_num_threads()
            );
            hash_all()
        }
    };

    if let Some(callback) = progress {
        callback.on_phase_end(PHASE_HASHING);
    }

    let mut hashed = HashIndex::new();
    for buckets in results? {
        stats.hashed_files += buckets.file_count();
        stats.bytes_hashed += buckets.size() * buckets.file_count() as u64;
        stats.digest_groups += buckets.len();
        hashed.insert(buckets);
    }

    log::info!(
        "Hashing complete: {} files, {} bytes, {} digest groups",
        stats.hashed_files,
        stats.bytes_hashed,
        stats.digest_groups
    );

    Ok((hashed, stats))
}

/// Digest one size bucket in order.
fn hash_bucket(
    size: u64,
    files: &[FileEntry],
    hasher: &dyn FileHasher,
    progress: Option<&dyn ProgressCallback>,
    counter: &AtomicUsize,
) -> Result<DigestBuckets, HashError> {
    let mut buckets = DigestBuckets::new(size);
    for file in files {
        let digest = hasher.digest(&file.path).map_err(|e| {
            log::error!("Failed to hash {}: {}", file.path.display(), e);
            e
        })?;
        if let Some(callback) = progress {
            let current = counter.fetch_add(1, Ordering::Relaxed) + 1;
            callback.on_progress(current, &file.path.to_string_lossy());
            callback.on_item_completed(size);
        }
        buckets.push(digest, file.clone());
    }
    log::debug!(
        "Size bucket {} bytes: {} files, {} distinct digests",
        size,
        buckets.file_count(),
        buckets.len()
    );
    Ok(buckets)
}

/// Keep only digest groups with two or more files (DuplicateSetBuilder).
///
/// Sizes left without any qualifying group are omitted entirely.
#[must_use]
pub fn build_duplicate_sets(hashed: HashIndex) -> DuplicateSets {
    let mut sets = DuplicateSets::new();
    for buckets in hashed {
        let size = buckets.size();
        let groups = buckets.into_groups();
        for group in groups.iter().filter(|g| g.len() == 1) {
            log::trace!(
                "Eliminated unique digest {}: {}",
                group.digest,
                group.files[0].path.display()
            );
        }
        sets.insert(size, groups);
    }

    log::info!(
        "{} duplicate sets, {} files, {} bytes reclaimable",
        sets.set_count(),
        sets.file_count(),
        sets.reclaimable_space()
    );

    sets
}

// ============================================================================
// DuplicateFinder - Pipeline Orchestrator
// ============================================================================

/// Configuration for the duplicate finder.
#[derive(Clone, Default)]
pub struct FinderConfig {
    /// Walker configuration for directory traversal.
    pub walker_config: WalkerConfig,
    /// Hashing configuration.
    pub grouper_config: GrouperConfig,
    /// Digest algorithm.
    pub algorithm: HashAlgorithm,
}

impl std::fmt::Debug for FinderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FinderConfig")
            .field("walker_config", &self.walker_config)
            .field("grouper_config", &self.grouper_config)
            .field("algorithm", &self.algorithm)
            .finish()
    }
}

impl FinderConfig {
    /// Set the file-name suffix filter.
    #[must_use]
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.walker_config.extension = extension.into();
        self
    }

    /// Enable or disable symlink following.
    #[must_use]
    pub fn with_follow_symlinks(mut self, follow: bool) -> Self {
        self.walker_config.follow_symlinks = follow;
        self
    }

    /// Set the I/O thread count used for hashing.
    #[must_use]
    pub fn with_io_threads(mut self, threads: usize) -> Self {
        self.grouper_config = self.grouper_config.with_io_threads(threads);
        self
    }

    /// Set the digest algorithm.
    #[must_use]
    pub fn with_algorithm(mut self, algorithm: HashAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Set the progress callback.
    #[must_use]
    pub fn with_progress_callback(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.grouper_config = self.grouper_config.with_progress_callback(callback);
        self
    }
}

/// Errors that can occur during duplicate finding.
#[derive(thiserror::Error, Debug)]
pub enum FinderError {
    /// The tree could not be indexed.
    #[error(transparent)]
    Scan(#[from] ScanError),

    /// A candidate file could not be hashed.
    #[error(transparent)]
    Hash(#[from] HashError),
}

impl FinderError {
    /// Path involved in the failure, when known.
    #[must_use]
    pub fn path(&self) -> Option<PathBuf> {
        match self {
            Self::Scan(
                ScanError::NotFound(p)
                | ScanError::PermissionDenied(p)
                | ScanError::NotADirectory(p)
                | ScanError::Io { path: p, .. },
            ) => Some(p.clone()),
            Self::Hash(e) => Some(e.path().to_path_buf()),
        }
    }
}

/// Duplicate finder that runs the pipeline stages in order.
///
/// The stages are exposed separately so a caller can list the size index
/// before deciding whether hashing is wanted at all.
///
/// # Example
///
/// ```no_run
/// use dupecull::duplicates::{DuplicateFinder, FinderConfig};
/// use std::path::Path;
///
/// let finder = DuplicateFinder::new(FinderConfig::default().with_extension(".jpg"));
/// let index = finder.index(Path::new("/some/path")).unwrap();
/// let sets = finder.find_duplicates(&index).unwrap();
///
/// println!("Found {} duplicate sets", sets.set_count());
/// ```
pub struct DuplicateFinder {
    config: FinderConfig,
    hasher: Arc<dyn FileHasher>,
}

impl DuplicateFinder {
    /// Create a finder that hashes with the configured algorithm.
    #[must_use]
    pub fn new(config: FinderConfig) -> Self {
        let hasher = Arc::new(Hasher::new(config.algorithm));
        Self { config, hasher }
    }

    /// Create a finder with a caller-supplied hasher.
    #[must_use]
    pub fn with_hasher(config: FinderConfig, hasher: Arc<dyn FileHasher>) -> Self {
        Self { config, hasher }
    }

    /// Create a new duplicate finder with default configuration.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(FinderConfig::default())
    }

    /// Configuration in use.
    #[must_use]
    pub fn config(&self) -> &FinderConfig {
        &self.config
    }

    /// Index `root` by size.
    ///
    /// # Errors
    ///
    /// Returns `FinderError::Scan` on any traversal failure.
    pub fn index(&self, root: &Path) -> Result<SizeIndex, FinderError> {
        let progress = self.config.grouper_config.progress_callback.as_deref();
        Ok(index_files(root, &self.config.walker_config, progress)?)
    }

    /// Hash candidate buckets of `index` and return the duplicate sets.
    ///
    /// # Errors
    ///
    /// Returns `FinderError::Hash` if any candidate file cannot be read.
    pub fn find_duplicates(&self, index: &SizeIndex) -> Result<DuplicateSets, FinderError> {
        let (hashed, _stats) =
            group_by_digest(index, self.hasher.as_ref(), &self.config.grouper_config)?;
        Ok(build_duplicate_sets(hashed))
    }
}
