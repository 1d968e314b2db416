//! CloudTrack Ingest Library
//!
//! Loads whitespace-delimited cloud-trajectory tracking files (one file per
//! tracked cloud, one row per observed timestep) into a two-table PostgreSQL
//! schema: `cloudids` maps file names to cloud identifiers, and `dataset`
//! holds one normalized measurement row per timestep.
//!
//! # Pipeline
//!
//! Validation gate -> record parser -> identity extractor -> schema
//! normalizer -> load coordinator -> relational sink. Two entry points share
//! that pipeline: [`loader::bulk_load`] for a full historical directory, and
//! [`loader::incremental_load`] for a single newly arrived file.
//!
//! # Example
//!
//! ```no_run
//! use cloudtrack_ingest::loader;
//! use cloudtrack_ingest::sink::MemorySink;
//! use std::path::Path;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let mut sink = MemorySink::default();
//!     let report = loader::bulk_load(Path::new("./data/historical"), &mut sink).await?;
//!     println!("loaded {} rows from {} files", report.rows, report.accepted);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod identity;
pub mod loader;
pub mod parser;
pub mod schema;
pub mod sink;
pub mod validate;

pub use identity::CloudIdentity;
pub use schema::Observation;
pub use validate::RejectReason;
