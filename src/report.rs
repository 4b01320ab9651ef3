//! Console listings and ordinal numbering.
//!
//! # Overview
//!
//! [`Reporter`] writes the two listings a session shows:
//!
//! - the plain listing of every indexed file grouped by size
//! - the duplicate listing, where every file gets a 1-based ordinal
//!
//! Both sort sizes explicitly with [`SortOrder`]. Hash map iteration order
//! never leaks into the output.
//!
//! Ordinals are recorded in a [`NumberedList`] owned by the caller, so the
//! deleter can later resolve "delete 2 and 4" back to paths.
//!
//! # Example
//!
//! ```
//! use dupecull::report::{NumberedList, Reporter, SortOrder};
//! use dupecull::duplicates::DuplicateSets;
//!
//! let reporter = Reporter::new(false);
//! let mut numbered = NumberedList::new();
//! let mut out = Vec::new();
//! reporter
//!     .write_duplicate_listing(&mut out, &DuplicateSets::new(), SortOrder::Descending, &mut numbered)
//!     .unwrap();
//! assert!(out.is_empty());
//! assert!(numbered.is_empty());
//! ```

use std::io::{self, Write};

use yansi::Paint;

use crate::duplicates::{DuplicateSets, SizeIndex};
use crate::scanner::FileEntry;

/// Direction in which sizes are listed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    /// Largest files first
    #[default]
    Descending,
    /// Smallest files first
    Ascending,
}

impl SortOrder {
    /// Sort `sizes` in place in this direction.
    pub fn sort(self, sizes: &mut [u64]) {
        match self {
            Self::Ascending => sizes.sort_unstable(),
            Self::Descending => sizes.sort_unstable_by(|a, b| b.cmp(a)),
        }
    }
}

/// One numbered file in the duplicate listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberedEntry {
    /// 1-based ordinal shown to the user
    pub ordinal: usize,
    /// The file behind the ordinal
    pub file: FileEntry,
}

/// Ordinal → file accumulator.
///
/// Ordinals are contiguous from 1. The list only grows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NumberedList {
    entries: Vec<NumberedEntry>,
}

impl NumberedList {
    /// Create an empty list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a file and return the ordinal it was given.
    pub fn push(&mut self, file: FileEntry) -> usize {
        let ordinal = self.entries.len() + 1;
        self.entries.push(NumberedEntry { ordinal, file });
        ordinal
    }

    /// Look up a 1-based ordinal. Out-of-range ordinals (including 0) give `None`.
    #[must_use]
    pub fn resolve(&self, ordinal: usize) -> Option<&FileEntry> {
        ordinal
            .checked_sub(1)
            .and_then(|i| self.entries.get(i))
            .map(|entry| &entry.file)
    }

    /// Number of numbered files.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check whether nothing has been numbered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries in ordinal order.
    #[must_use]
    pub fn entries(&self) -> &[NumberedEntry] {
        &self.entries
    }
}

/// Writes listings to any `Write` sink.
#[derive(Debug, Clone, Copy, Default)]
pub struct Reporter {
    color: bool,
}

impl Reporter {
    /// Create a reporter. With `color` set, size headings and digests
    /// are styled; otherwise output is plain text.
    #[must_use]
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    fn size_heading(&self, size: u64) -> String {
        let text = format!("{size} bytes");
        if self.color {
            text.bold().to_string()
        } else {
            text
        }
    }

    fn digest_line(&self, hex: &str) -> String {
        if self.color {
            format!("Hash: {}", hex.yellow())
        } else {
            format!("Hash: {hex}")
        }
    }

    /// Write every indexed file grouped by size.
    ///
    /// # Errors
    ///
    /// Returns any error from the underlying writer.
    pub fn write_plain_listing<W: Write>(
        &self,
        out: &mut W,
        index: &SizeIndex,
        order: SortOrder,
    ) -> io::Result<()> {
        let mut sizes: Vec<u64> = index.sizes().collect();
        order.sort(&mut sizes);

        for size in sizes {
            let Some(files) = index.get(size) else {
                continue;
            };
            writeln!(out)?;
            writeln!(out, "{}", self.size_heading(size))?;
            for file in files {
                writeln!(out, "{}", file.path.display())?;
            }
            writeln!(out)?;
        }
        Ok(())
    }

    /// Write the duplicate sets with ordinals, appending each numbered
    /// file to `numbered`.
    ///
    /// Numbering continues from `numbered.len() + 1`.
    ///
    /// # Errors
    ///
    /// Returns any error from the underlying writer.
    pub fn write_duplicate_listing<W: Write>(
        &self,
        out: &mut W,
        sets: &DuplicateSets,
        order: SortOrder,
        numbered: &mut NumberedList,
    ) -> io::Result<()> {
        let mut sizes: Vec<u64> = sets.sizes().collect();
        order.sort(&mut sizes);

        for size in sizes {
            let Some(groups) = sets.get(size) else {
                continue;
            };
            writeln!(out)?;
            writeln!(out, "{}", self.size_heading(size))?;
            for group in groups {
                writeln!(out, "{}", self.digest_line(&group.digest.to_hex()))?;
                for file in &group.files {
                    let ordinal = numbered.push(file.clone());
                    writeln!(out, "{}. {}", ordinal, file.path.display())?;
                }
                writeln!(out)?;
            }
        }

        log::debug!("Numbered {} files", numbered.len());
        Ok(())
    }
}
