//! Command-line interface definitions for dupecull.
//!
//! This module defines all CLI arguments and options using the clap derive API.
//! The directory to scan is the only positional argument; everything else about
//! a run (suffix filter, sort order, what to delete) is asked interactively.
//!
//! # Example
//!
//! ```bash
//! # Scan a directory
//! dupecull ~/Downloads
//!
//! # Hash with BLAKE3 on 8 threads and move deleted files to the trash
//! dupecull ~/Downloads --hash blake3 --io-threads 8 --trash
//!
//! # Verbose mode for debugging
//! dupecull -v ~/Downloads
//! ```

use clap::Parser;
use std::path::PathBuf;

use crate::scanner::HashAlgorithm;

/// Interactive duplicate file finder.
///
/// Lists the files under a directory by size, confirms duplicates by content
/// digest, and deletes the ones you pick by number.
#[derive(Debug, Parser)]
#[command(name = "dupecull")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory to scan for duplicates
    #[arg(value_name = "ROOT")]
    pub path: Option<PathBuf>,

    /// Increase verbosity level (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress logs and progress bars except errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, env = "NO_COLOR")]
    pub no_color: bool,

    /// Output errors as JSON
    #[arg(long)]
    pub json_errors: bool,

    /// Digest algorithm used to confirm duplicates [default: md5]
    #[arg(long = "hash", value_enum, value_name = "ALGORITHM")]
    pub hash: Option<HashAlgorithm>,

    /// Number of I/O threads for hashing [default: 4]
    ///
    /// Lower values reduce disk thrashing on HDDs.
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(usize))]
    pub io_threads: Option<usize>,

    /// Follow symbolic links during scan
    ///
    /// Warning: May cause infinite loops if symlinks form cycles.
    #[arg(long)]
    pub follow_symlinks: bool,

    /// Move deleted files to the system trash instead of removing them
    #[arg(long)]
    pub trash: bool,

    /// Keep deleting the remaining files when one cannot be deleted
    #[arg(long)]
    pub continue_on_error: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_debug_assert() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_cli_parse_path_only() {
        let cli = Cli::try_parse_from(["dupecull", "/path"]).unwrap();

        assert_eq!(cli.path, Some(PathBuf::from("/path")));
        assert_eq!(cli.verbose, 0);
        assert!(!cli.quiet);
        assert!(cli.hash.is_none());
        assert!(cli.io_threads.is_none());
        assert!(!cli.trash);
        assert!(!cli.continue_on_error);
    }

    #[test]
    fn test_cli_missing_path_is_not_a_parse_error() {
        let cli = Cli::try_parse_from(["dupecull"]).unwrap();
        assert!(cli.path.is_none());
    }

    #[test]
    fn test_cli_parse_all_flags() {
        let cli = Cli::try_parse_from([
            "dupecull",
            "/path",
            "--hash",
            "blake3",
            "--io-threads",
            "8",
            "--follow-symlinks",
            "--trash",
            "--continue-on-error",
            "--json-errors",
        ])
        .unwrap();

        assert_eq!(cli.hash, Some(HashAlgorithm::Blake3));
        assert_eq!(cli.io_threads, Some(8));
        assert!(cli.follow_symlinks);
        assert!(cli.trash);
        assert!(cli.continue_on_error);
        assert!(cli.json_errors);
    }

    #[test]
    fn test_cli_verbosity_count() {
        let cli = Cli::try_parse_from(["dupecull", "-vv", "/path"]).unwrap();
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_cli_quiet_conflicts_with_verbose() {
        let result = Cli::try_parse_from(["dupecull", "-q", "-v", "/path"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_invalid_hash() {
        let result = Cli::try_parse_from(["dupecull", "--hash", "sha1", "/path"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_invalid_io_threads() {
        let result = Cli::try_parse_from(["dupecull", "--io-threads", "many", "/path"]);
        assert!(result.is_err());
    }
}
