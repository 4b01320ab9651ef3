//! The interactive session.
//!
//! A [`Session`] drives one run from the first prompt to the freed-space
//! summary:
//!
//! 1. ask for the suffix filter and index the tree
//! 2. ask for the sort direction and print the plain listing
//! 3. ask whether to check for duplicates; if so hash and print the
//!    numbered duplicate listing
//! 4. ask whether to delete; if so read ordinals, delete, and report
//!    the freed space
//!
//! Hashing only happens after step 3 is answered `yes`.
//!
//! The session is generic over its input and output so tests can script
//! the answers and capture everything that was printed.

use std::io::{BufRead, Write};
use std::path::Path;
use std::sync::Arc;

use bytesize::ByteSize;

use crate::actions::{delete_ordinals, BatchDeleteResult};
use crate::config::Settings;
use crate::duplicates::DuplicateFinder;
use crate::progress::ProgressCallback;
use crate::prompt::Prompter;
use crate::report::{NumberedList, Reporter, SortOrder};

pub const FORMAT_PROMPT: &str = "Enter file format:";
pub const SORT_PROMPT: &str =
    "\nSize sorting options:\n1. Descending\n2. Ascending\n\nEnter a sorting option:";
pub const CHECK_PROMPT: &str = "\nCheck for duplicates?";
pub const DELETE_PROMPT: &str = "Delete files?";
pub const ORDINALS_PROMPT: &str = "Enter file numbers to delete:";

/// What a finished session did.
#[derive(Debug, Clone, Default)]
pub struct SessionSummary {
    /// Files that passed the suffix filter
    pub files_indexed: usize,
    /// Duplicate sets found, when the duplicate check ran
    pub duplicate_sets: Option<usize>,
    /// Deletion outcome, when deletion ran
    pub deletion: Option<BatchDeleteResult>,
}

/// One interactive run over a directory.
pub struct Session<R, W> {
    settings: Settings,
    prompter: Prompter<R, W>,
    reporter: Reporter,
    numbered: NumberedList,
    progress: Option<Arc<dyn ProgressCallback>>,
}

impl<R: BufRead, W: Write> Session<R, W> {
    /// Create a session reading answers from `input` and printing to `output`.
    pub fn new(settings: Settings, input: R, output: W) -> Self {
        Self {
            settings,
            prompter: Prompter::new(input, output),
            reporter: Reporter::new(false),
            numbered: NumberedList::new(),
            progress: None,
        }
    }

    /// Style listing headings.
    #[must_use]
    pub fn with_color(mut self, color: bool) -> Self {
        self.reporter = Reporter::new(color);
        self
    }

    /// Report indexing and hashing progress.
    #[must_use]
    pub fn with_progress(mut self, progress: Arc<dyn ProgressCallback>) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Files numbered by the duplicate listing so far.
    pub fn numbered(&self) -> &NumberedList {
        &self.numbered
    }

    /// Give back the output stream.
    pub fn into_output(self) -> W {
        self.prompter.into_inner().1
    }

    /// Run the session against `root`.
    ///
    /// # Errors
    ///
    /// Fails on any indexing or hashing error, when input ends while a
    /// prompt is waiting, and on a deletion error when `continue_on_error`
    /// is off.
    pub fn run(&mut self, root: &Path) -> anyhow::Result<SessionSummary> {
        let mut summary = SessionSummary::default();

        let extension = self.prompter.ask(FORMAT_PROMPT)?;
        let mut config = self.settings.finder_config(&extension);
        if let Some(progress) = &self.progress {
            config = config.with_progress_callback(Arc::clone(progress));
        }
        let finder = DuplicateFinder::new(config);

        let index = finder.index(root)?;
        summary.files_indexed = index.total_files();

        let order = self.prompter.choose(
            SORT_PROMPT,
            &[("1", SortOrder::Descending), ("2", SortOrder::Ascending)],
        )?;
        self.reporter
            .write_plain_listing(self.prompter.output(), &index, order)?;

        if !self.prompter.confirm(CHECK_PROMPT)? {
            log::info!("Duplicate check declined");
            return Ok(summary);
        }

        let sets = finder.find_duplicates(&index)?;
        summary.duplicate_sets = Some(sets.set_count());
        self.reporter.write_duplicate_listing(
            self.prompter.output(),
            &sets,
            order,
            &mut self.numbered,
        )?;

        if sets.is_empty() {
            log::info!("No duplicates found");
            return Ok(summary);
        }

        if !self.prompter.confirm(DELETE_PROMPT)? {
            return Ok(summary);
        }

        let ordinals = self.prompter.read_ordinals(ORDINALS_PROMPT)?;
        let result = delete_ordinals(&self.numbered, &ordinals, &self.settings.delete_config())?;
        self.write_deletion_report(&result)?;
        summary.deletion = Some(result);

        Ok(summary)
    }

    fn write_deletion_report(&mut self, result: &BatchDeleteResult) -> std::io::Result<()> {
        let out = self.prompter.output();
        for (path, error) in &result.failures {
            writeln!(out, "Could not delete {}: {}", path.display(), error)?;
        }

        write!(out, "\nTotal freed up space: {} bytes", result.bytes_freed)?;
        if result.bytes_freed >= 1024 {
            write!(out, " ({})", ByteSize::b(result.bytes_freed))?;
        }
        writeln!(out)?;
        out.flush()
    }
}
