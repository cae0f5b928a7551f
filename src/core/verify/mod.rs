//! Batch verification
//!
//! Runs a recipe over a list of files and reports how many were cleaned.

pub mod job;
pub mod summary;

pub use job::VerifyJob;
pub use summary::VerificationSummary;
