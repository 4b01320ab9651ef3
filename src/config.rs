//! Run settings.
//!
//! Settings are layered with figment, later layers winning:
//!
//! 1. Built-in defaults
//! 2. Environment variables prefixed `DUPECULL_` (e.g. `DUPECULL_IO_THREADS=8`)
//! 3. Command-line flags
//!
//! There is no configuration file.

use figment::providers::{Env, Serialized};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::actions::DeleteConfig;
use crate::cli::Cli;
use crate::duplicates::FinderConfig;
use crate::scanner::{HashAlgorithm, WalkerConfig};

/// Prefix for environment variable overrides.
pub const ENV_PREFIX: &str = "DUPECULL_";

/// Settings for one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Digest algorithm used to confirm duplicates.
    pub hash: HashAlgorithm,
    /// Number of I/O threads for hashing.
    pub io_threads: usize,
    /// Follow symbolic links during the walk.
    pub follow_symlinks: bool,
    /// Move deleted files to the trash instead of removing them.
    pub trash: bool,
    /// Keep deleting after a file fails to delete.
    pub continue_on_error: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            hash: HashAlgorithm::Md5,
            io_threads: 4,
            follow_symlinks: false,
            trash: false,
            continue_on_error: false,
        }
    }
}

/// Values given on the command line. Flags left off are not serialized,
/// so they cannot mask an environment setting.
#[derive(Debug, Default, Serialize)]
struct CliOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    hash: Option<HashAlgorithm>,
    #[serde(skip_serializing_if = "Option::is_none")]
    io_threads: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    follow_symlinks: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    trash: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    continue_on_error: Option<bool>,
}

impl From<&Cli> for CliOverrides {
    fn from(cli: &Cli) -> Self {
        Self {
            hash: cli.hash,
            io_threads: cli.io_threads,
            follow_symlinks: cli.follow_symlinks.then_some(true),
            trash: cli.trash.then_some(true),
            continue_on_error: cli.continue_on_error.then_some(true),
        }
    }
}

impl Settings {
    /// Layer defaults, `DUPECULL_*` environment variables and CLI flags.
    ///
    /// # Errors
    ///
    /// Returns a figment error if an environment variable has a value
    /// of the wrong type (e.g. `DUPECULL_IO_THREADS=lots`).
    pub fn load(cli: &Cli) -> Result<Self, figment::Error> {
        Self::figment(cli).extract()
    }

    /// Figment used by [`Settings::load`].
    pub fn figment(cli: &Cli) -> Figment {
        Figment::from(Serialized::defaults(Settings::default()))
            .merge(Env::prefixed(ENV_PREFIX))
            .merge(Serialized::defaults(CliOverrides::from(cli)))
    }

    /// Walker configuration for the given suffix filter.
    #[must_use]
    pub fn walker_config(&self, extension: &str) -> WalkerConfig {
        WalkerConfig::with_extension(extension).with_follow_symlinks(self.follow_symlinks)
    }

    /// Finder configuration for the given suffix filter.
    #[must_use]
    pub fn finder_config(&self, extension: &str) -> FinderConfig {
        FinderConfig::default()
            .with_extension(extension)
            .with_follow_symlinks(self.follow_symlinks)
            .with_io_threads(self.io_threads)
            .with_algorithm(self.hash)
    }

    /// Deletion configuration.
    #[must_use]
    pub fn delete_config(&self) -> DeleteConfig {
        let config = if self.trash {
            DeleteConfig::trash()
        } else {
            DeleteConfig::permanent()
        };
        config.with_continue_on_error(self.continue_on_error)
    }
}
