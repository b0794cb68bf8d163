//! File actions module.
//!
//! The only action is permanent batch deletion of user-selected duplicates.
//! Each path succeeds or fails on its own; see [`delete`] for the rules.
//!
//! ```no_run
//! use dupeshell::actions::{Deleter, DeletionSummary};
//!
//! # async fn demo() {
//! let results = Deleter::new().delete_all(&["/path/to/duplicate.txt"]).await;
//! println!("{}", DeletionSummary::from_results(&results).summary());
//! # }
//! ```

pub mod delete;

// Re-export commonly used types
pub use delete::{
    delete_file, DeleteError, DeleteProgressCallback, Deleter, DeletionResult, DeletionSummary,
};
