//! Domain types for deidkit.
//!
//! - **Error types** ([`DeidError`], [`RecipeError`])
//! - **Result type alias** ([`Result`])
//! - **Per-file outcome** ([`DeidOutcome`]) returned across the host boundary
//!
//! # Error Handling
//!
//! All fallible operations return [`Result<T, DeidError>`]:
//!
//! ```rust
//! use deidkit::domain::Result;
//! use deidkit::deid::DeidRecipe;
//!
//! fn example() -> Result<()> {
//!     let _recipe = DeidRecipe::from_text("FORMAT dicom\n%header\nREMOVE PatientName\n")?;
//!     Ok(())
//! }
//! ```

pub mod errors;
pub mod outcome;
pub mod result;

pub use errors::{error_chain, DeidError, RecipeError};
pub use outcome::DeidOutcome;
pub use result::Result;
