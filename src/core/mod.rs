//! Core orchestration for deidkit.
//!
//! # Modules
//!
//! - [`verify`] - Batch verification: recipe loading, per-file cleaning and reporting
//!
//! # Verification Workflow
//!
//! 1. **Load Recipe**: From a file path or a bundled recipe name
//! 2. **Collect Identifiers**: Read each input once for `var:` lookups
//! 3. **Prepare Output**: Create the output folder when absent
//! 4. **Clean**: Apply header actions and write `<output>/<file name>`
//! 5. **Audit** (optional): Append hashed change records
//! 6. **Report**: Summarize how many files were produced
//!
//! # Example
//!
//! ```rust,no_run
//! use deidkit::config::VerifyConfig;
//! use deidkit::core::verify::VerifyJob;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let job = VerifyJob::new(VerifyConfig::default())?;
//! let summary = job.run()?;
//! println!("{}", summary.message());
//! # Ok(())
//! # }
//! ```

pub mod verify;
