//! File actions module.
//!
//! # Deletion
//!
//! The delete module removes files picked by their listing ordinal:
//! - Permanent deletion (default)
//! - Move to system trash (optional, recoverable)
//! - Configurable stop-or-continue policy on failures
//!
//! ```no_run
//! use dupecull::actions::{delete_ordinals, DeleteConfig};
//! use dupecull::report::NumberedList;
//!
//! let result = delete_ordinals(&NumberedList::new(), &[2], &DeleteConfig::trash());
//! ```

pub mod delete;

// Re-export commonly used types
pub use delete::{
    delete_file, delete_ordinals, delete_to_trash, permanent_delete, BatchDeleteResult,
    DeleteConfig, DeleteError, DeleteResult,
};
