// deidkit - DICOM de-identification toolkit
// Copyright (c) 2025 deidkit Contributors
// Licensed under the MIT License

//! # deidkit - DICOM de-identification
//!
//! deidkit applies de-identification recipes to DICOM records. It ships as a
//! command-line tool and as a WebAssembly module for the browser front-end.
//!
//! ## Overview
//!
//! This library provides the core functionality for:
//! - **Parsing** recipes (`%header` actions: ADD, REPLACE, BLANK, REMOVE, KEEP, JITTER)
//! - **Cleaning** records in memory through a total adapter that never panics
//! - **Verifying** a recipe against files on disk in a batch job
//! - **Serving** the browser front-end with optional cross-origin isolation
//!
//! ## Architecture
//!
//! deidkit follows a layered architecture:
//!
//! - [`domain`] - Error types and the de-identification outcome record
//! - [`deid`] - Recipes, record I/O, action application and the adapter
//! - [`config`] - Configuration management
//! - `core` - Batch verification (native targets)
//! - `server` - Static file server (native targets)
//! - `cli` - Command-line interface and argument parsing (native targets)
//! - `logging` - Structured logging and observability (native targets)
//! - `wasm` - Browser exports (`wasm32` targets)
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use deidkit::deid::{bundled_recipe, deidentify_file};
//!
//! let bytes = std::fs::read("0002.DCM").unwrap();
//! let recipe = bundled_recipe("deid.dicom").unwrap();
//!
//! let outcome = deidentify_file(&bytes, recipe, "0002.DCM");
//! match outcome.content() {
//!     Some(cleaned) => std::fs::write("clean.dcm", cleaned).unwrap(),
//!     None => eprintln!("{}", outcome.error().unwrap_or_default()),
//! }
//! ```
//!
//! ## Error Handling
//!
//! Fallible operations return [`domain::Result`], built on [`domain::DeidError`].
//! Recipe problems are reported as [`domain::RecipeError`] with the offending
//! line number:
//!
//! ```rust
//! use deidkit::deid::DeidRecipe;
//! use deidkit::domain::RecipeError;
//!
//! let err = DeidRecipe::from_text("%header\nSCRAMBLE PatientName\n").unwrap_err();
//! assert!(matches!(err, RecipeError::UnknownAction { line: 2, .. }));
//! ```

#[cfg(not(target_arch = "wasm32"))]
pub mod cli;
pub mod config;
#[cfg(not(target_arch = "wasm32"))]
pub mod core;
pub mod deid;
pub mod domain;
#[cfg(not(target_arch = "wasm32"))]
pub mod logging;
#[cfg(not(target_arch = "wasm32"))]
pub mod server;
#[cfg(target_arch = "wasm32")]
pub mod wasm;
