//! Whole-file content hashing with streaming reads.
//!
//! # Overview
//!
//! [`Hasher`] computes a digest over the complete content of a file,
//! reading it through a fixed-size buffer. Digests are only used for
//! equality grouping, so MD5 (the default) is acceptable; BLAKE3 is
//! available when a wider digest is preferred.
//!
//! Grouping code talks to hashers through the [`FileHasher`] trait.
//!
//! # Example
//!
//! ```no_run
//! use dupecull::scanner::{FileHasher, HashAlgorithm, Hasher};
//! use std::path::Path;
//!
//! let hasher = Hasher::new(HashAlgorithm::Md5);
//! let digest = hasher.digest(Path::new("photo.jpg")).unwrap();
//! println!("{}", digest);
//! ```

use std::fmt;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

use md5::Digest as _;
use serde::{Deserialize, Serialize};

use super::HashError;

/// Read buffer size for streaming hashes (64 KiB).
pub const BUFFER_SIZE: usize = 64 * 1024;

/// Digest algorithm used for content comparison.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    /// MD5, 128-bit
    #[default]
    Md5,
    /// BLAKE3, 256-bit
    Blake3,
}

impl HashAlgorithm {
    /// Digest length in bytes.
    #[must_use]
    pub fn output_len(self) -> usize {
        match self {
            Self::Md5 => 16,
            Self::Blake3 => 32,
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Md5 => write!(f, "md5"),
            Self::Blake3 => write!(f, "blake3"),
        }
    }
}

/// A content digest. Displays as lowercase hex.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Digest(Box<[u8]>);

impl Digest {
    /// Wrap raw digest bytes.
    #[must_use]
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self(bytes.into())
    }

    /// Raw digest bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Lowercase hexadecimal rendering.
    #[must_use]
    pub fn to_hex(&self) -> String {
        use fmt::Write as _;
        let mut hex = String::with_capacity(self.0.len() * 2);
        for byte in self.0.iter() {
            let _ = write!(hex, "{byte:02x}");
        }
        hex
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Something that can turn a file's content into a [`Digest`].
///
/// Implementations must be safe to share across the hashing pool.
pub trait FileHasher: Send + Sync {
    /// Digest the complete content of the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns `HashError` if the file cannot be opened or read.
    fn digest(&self, path: &Path) -> Result<Digest, HashError>;
}

enum State {
    Md5(md5::Md5),
    Blake3(Box<blake3::Hasher>),
}

impl State {
    fn new(algorithm: HashAlgorithm) -> Self {
        match algorithm {
            HashAlgorithm::Md5 => Self::Md5(md5::Md5::new()),
            HashAlgorithm::Blake3 => Self::Blake3(Box::new(blake3::Hasher::new())),
        }
    }

    fn update(&mut self, data: &[u8]) {
        match self {
            Self::Md5(h) => h.update(data),
            Self::Blake3(h) => {
                h.update(data);
            }
        }
    }

    fn finalize(self) -> Digest {
        match self {
            Self::Md5(h) => Digest::from_bytes(&h.finalize()),
            Self::Blake3(h) => Digest::from_bytes(h.finalize().as_bytes()),
        }
    }
}

/// Streaming file hasher.
///
/// Counts how many files it has digested, which lets callers confirm
/// that files were never opened when they did not need to be.
#[derive(Debug, Default)]
pub struct Hasher {
    algorithm: HashAlgorithm,
    files_hashed: AtomicUsize,
}

impl Hasher {
    /// Create a hasher for the given algorithm.
    #[must_use]
    pub fn new(algorithm: HashAlgorithm) -> Self {
        Self {
            algorithm,
            files_hashed: AtomicUsize::new(0),
        }
    }

    /// Algorithm in use.
    #[must_use]
    pub fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }

    /// Number of files digested so far.
    #[must_use]
    pub fn files_hashed(&self) -> usize {
        self.files_hashed.load(Ordering::Relaxed)
    }

    /// Digest an in-memory buffer with this hasher's algorithm.
    #[must_use]
    pub fn digest_bytes(&self, data: &[u8]) -> Digest {
        let mut state = State::new(self.algorithm);
        state.update(data);
        state.finalize()
    }

    fn digest_reader(&self, mut reader: impl Read, path: &Path) -> Result<Digest, HashError> {
        let mut state = State::new(self.algorithm);
        let mut buffer = vec![0u8; BUFFER_SIZE];
        loop {
            match reader.read(&mut buffer) {
                Ok(0) => break,
                Ok(n) => state.update(&buffer[..n]),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(HashError::from_io(path, e)),
            }
        }
        Ok(state.finalize())
    }
}

impl FileHasher for Hasher {
    fn digest(&self, path: &Path) -> Result<Digest, HashError> {
        let file = File::open(path).map_err(|e| HashError::from_io(path, e))?;
        let digest = self.digest_reader(file, path)?;
        self.files_hashed.fetch_add(1, Ordering::Relaxed);
        log::trace!("{} {} {}", self.algorithm, digest, path.display());
        Ok(digest)
    }
}
