//! Structured error handling and exit codes.

use serde::Serialize;

/// Exit codes for the dupecull application.
///
/// - 0: Success (session completed)
/// - 1: General error (filesystem failure, closed input, bad settings)
/// - 2: Usage error (no directory given)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExitCode {
    /// Success: the session ran to completion.
    Success = 0,
    /// General error: An unexpected error occurred.
    GeneralError = 1,
    /// Usage error: the command line was incomplete.
    UsageError = 2,
}

impl ExitCode {
    /// Get the numeric exit code.
    #[must_use]
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Get the machine-readable code prefix.
    #[must_use]
    pub fn code_prefix(self) -> &'static str {
        match self {
            Self::Success => "DC000",
            Self::GeneralError => "DC001",
            Self::UsageError => "DC002",
        }
    }
}

/// Structured error information for JSON output.
#[derive(Debug, Serialize)]
pub struct StructuredError {
    /// The error code (e.g., "DC001")
    pub code: String,
    /// The exit code number
    pub exit_code: i32,
    /// Human-readable error message
    pub message: String,
    /// Path involved in the failure, when one is known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl StructuredError {
    /// Create a new structured error from an anyhow error and an exit code.
    #[must_use]
    pub fn new(err: &anyhow::Error, exit_code: ExitCode) -> Self {
        let path = err
            .downcast_ref::<crate::duplicates::FinderError>()
            .and_then(crate::duplicates::FinderError::path)
            .or_else(|| {
                err.downcast_ref::<crate::actions::DeleteError>()
                    .map(|e| e.path().to_path_buf())
            })
            .map(|p| p.display().to_string());

        Self {
            code: exit_code.code_prefix().to_string(),
            exit_code: exit_code.as_i32(),
            message: format!("{err:#}"),
            path,
        }
    }
}
