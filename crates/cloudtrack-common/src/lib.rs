//! CloudTrack Common Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Shared error handling and logging for the CloudTrack workspace.
//!
//! # Overview
//!
//! - **Error Handling**: the [`CloudtrackError`] enum and [`Result`] alias
//!   used across the ingestion pipeline
//! - **Logging**: `tracing`-based logging configured from the environment

pub mod error;
pub mod logging;

// Re-export commonly used types
pub use error::{CloudtrackError, Result};
