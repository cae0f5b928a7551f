//! CLI command implementations
//!
//! This module contains all CLI command implementations.

pub mod init;
pub mod recipes;
pub mod serve;
pub mod validate;
pub mod verify;
