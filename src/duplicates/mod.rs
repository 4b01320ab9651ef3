//! Duplicate detection module.
//!
//! This module provides functionality for:
//! - Size-based file grouping (Phase 1)
//! - Full-content digest comparison within size buckets (Phase 2)
//! - Duplicate set construction

pub mod finder;
pub mod groups;

pub use finder::{
    build_duplicate_sets, group_by_digest, index_files, DuplicateFinder, FinderConfig,
    FinderError, GrouperConfig, HashStats,
};
pub use groups::{DigestBuckets, DigestGroup, DuplicateSets, HashIndex, SizeIndex};
