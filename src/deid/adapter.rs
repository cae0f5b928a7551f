//! In-memory de-identification for a host runtime
//!
//! [`deidentify_file`] is total: whatever goes wrong while building the
//! recipe, reading the record, applying actions or writing the result, the
//! caller gets a [`DeidOutcome`] back, so a host driving many files can
//! carry on after one failure. Nothing here touches the filesystem.
//!
//! Failures travel as errors, never as panics. On native targets a panic
//! from the DICOM stack is additionally caught and turned into a failed
//! outcome. `wasm32-unknown-unknown` aborts on panic, so there the code
//! paths themselves must stay panic-free.

use crate::deid::actions::apply_actions;
use crate::deid::dataset::{read_lenient, write_to_vec};
use crate::deid::identifiers::identifiers_from_object;
use crate::deid::recipe::DeidRecipe;
use crate::domain::errors::error_chain;
use crate::domain::outcome::DeidOutcome;
use crate::domain::result::Result;
use std::panic::{self, AssertUnwindSafe};

/// De-identifies one record held in memory
///
/// `file_path` only labels the outcome and its error message.
///
/// # Examples
///
/// ```
/// use deidkit::deid::deidentify_file;
///
/// let outcome = deidentify_file(b"not dicom", "%header\nREMOVE PatientName\n", "scan/0001.dcm");
/// assert!(!outcome.is_success());
/// assert!(outcome.error().unwrap().contains("scan/0001.dcm"));
/// ```
pub fn deidentify_file(file_bytes: &[u8], recipe_text: &str, file_path: &str) -> DeidOutcome {
    let attempt = panic::catch_unwind(AssertUnwindSafe(|| deidentify_bytes(file_bytes, recipe_text)));

    match attempt {
        Ok(Ok(content)) => {
            tracing::debug!(path = file_path, bytes = content.len(), "De-identified record");
            DeidOutcome::success(file_path, content)
        }
        Ok(Err(e)) => {
            tracing::warn!(path = file_path, error = %e, "De-identification failed");
            DeidOutcome::failure(
                file_path,
                format!("Failed to process {file_path}:\n{}", error_chain(&e)),
            )
        }
        Err(payload) => {
            let message = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            tracing::error!(path = file_path, panic = %message, "De-identification panicked");
            DeidOutcome::failure(
                file_path,
                format!("Failed to process {file_path}:\npanic: {message}"),
            )
        }
    }
}

/// Fallible core of [`deidentify_file`]
pub fn deidentify_bytes(file_bytes: &[u8], recipe_text: &str) -> Result<Vec<u8>> {
    let recipe = DeidRecipe::from_text(recipe_text)?;
    let mut obj = read_lenient(file_bytes)?;
    let ids = identifiers_from_object(&obj);
    apply_actions(&mut obj, &recipe, &ids)?;
    write_to_vec(&obj)
}
