//! DICOM de-identification
//!
//! This module turns a recipe and a DICOM record into a cleaned record.
//!
//! # Architecture
//!
//! - **Recipe**: parses recipe text into header actions ([`DeidRecipe`])
//! - **Dataset**: lenient reading and writing of records
//! - **Actions**: applies header actions and records what changed
//! - **Identifiers**: per-record values for `var:` lookups
//! - **Adapter**: the total, in-memory entry point used by host runtimes
//! - **Audit**: JSON-lines trail of changes with hashed values
//!
//! # Usage
//!
//! ```rust,no_run
//! use deidkit::deid::{deidentify_file, bundled_recipe};
//!
//! let bytes = std::fs::read("0002.DCM").unwrap();
//! let recipe = bundled_recipe("deid.dicom.basic").unwrap();
//! let outcome = deidentify_file(&bytes, recipe, "0002.DCM");
//! if let Some(cleaned) = outcome.content() {
//!     std::fs::write("0002.clean.DCM", cleaned).unwrap();
//! }
//! ```

pub mod actions;
pub mod adapter;
#[cfg(not(target_arch = "wasm32"))]
pub mod audit;
pub mod bundled;
pub mod dataset;
pub mod identifiers;
pub mod recipe;

// Re-export main types
pub use actions::{apply_actions, ActionRecord};
pub use adapter::{deidentify_bytes, deidentify_file};
pub use bundled::{bundled_recipe, bundled_recipe_names};
pub use identifiers::{get_identifiers, Identifiers};
pub use recipe::{ActionKind, DeidRecipe, FieldSpec};
