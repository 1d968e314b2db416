//! Load coordination for bulk and incremental ingestion
//!
//! Both modes run the same per-file pipeline (gate -> parse -> identity ->
//! normalize) strictly one file at a time. Bulk mode accumulates batches
//! over a whole directory and quarantines unusable files without aborting
//! the run; incremental mode handles exactly one file and stops at the
//! first problem without writing anything.
//!
//! The transform is deterministic, but the sink is append-only: re-running
//! either mode against an already-loaded file duplicates its rows.

use crate::identity::{self, CloudIdentity};
use crate::schema::{self, Observation};
use crate::sink::RelationalSink;
use crate::validate::{self, RejectReason};
use cloudtrack_common::Result;
use std::path::Path;
use tracing::{error, info, warn};

/// Outcome of running the pipeline over one file
///
/// A file never partially succeeds: it either yields its full identity and
/// observation set, or nothing.
#[derive(Debug, Clone, PartialEq)]
pub enum FileOutcome {
    Accepted {
        identity: CloudIdentity,
        observations: Vec<Observation>,
    },
    Rejected(RejectReason),
}

/// Summary of one bulk run
#[derive(Debug, Default)]
pub struct BulkReport {
    /// Files whose rows made it into the emitted batches
    pub accepted: usize,

    /// Structurally unusable files, quarantined with their reasons
    pub rejected: Vec<(String, RejectReason)>,

    /// Files that failed identity extraction or field parsing
    pub failed: Vec<String>,

    /// Total observation rows emitted
    pub rows: usize,
}

/// Run the shared per-file pipeline on one file's content
///
/// Structural rejection is a normal outcome ([`FileOutcome::Rejected`]);
/// identity-extraction and field-parse problems are errors, since no safe
/// default exists for either.
pub fn process_file(file_name: &str, content: &str) -> Result<FileOutcome> {
    let table = match validate::check_file(content) {
        Ok(table) => table,
        Err(reason) => return Ok(FileOutcome::Rejected(reason)),
    };

    let identity = identity::extract(file_name)?;
    let observations = schema::normalize(&table, &identity)?;

    Ok(FileOutcome::Accepted {
        identity,
        observations,
    })
}

/// Bulk-load every file in a directory into the sink
///
/// Files are visited in directory-listing order (not guaranteed stable,
/// which is fine: row identity depends only on the cloud id). Rejected and
/// failed files are logged and counted, never fatal to the run. On
/// completion one identity batch and one observation batch covering all
/// accepted files are written; a sink failure aborts the in-flight batch
/// with no retry.
pub async fn bulk_load<S: RelationalSink>(directory: &Path, sink: &mut S) -> Result<BulkReport> {
    let mut report = BulkReport::default();
    let mut identities: Vec<CloudIdentity> = Vec::new();
    let mut observations: Vec<Observation> = Vec::new();

    info!(directory = %directory.display(), "Starting bulk load");

    for entry in std::fs::read_dir(directory)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let file_name = entry.file_name().to_string_lossy().into_owned();
        let content = std::fs::read_to_string(entry.path())?;

        match process_file(&file_name, &content) {
            Ok(FileOutcome::Accepted {
                identity,
                observations: rows,
            }) => {
                info!(file_name = %file_name, cloud_id = identity.cloud_id, rows = rows.len(), "File accepted");
                identities.push(identity);
                observations.extend(rows);
                report.accepted += 1;
            },
            Ok(FileOutcome::Rejected(reason)) => {
                warn!(file_name = %file_name, reason = %reason, "File rejected");
                report.rejected.push((file_name, reason));
            },
            Err(err) => {
                error!(file_name = %file_name, error = %err, "File failed");
                report.failed.push(file_name);
            },
        }
    }

    report.rows = observations.len();

    sink.insert_identities(&identities).await?;
    sink.insert_observations(&observations).await?;

    info!(
        accepted = report.accepted,
        rejected = report.rejected.len(),
        failed = report.failed.len(),
        rows = report.rows,
        "Bulk load complete"
    );

    Ok(report)
}

/// Ingest one newly arrived file into the sink
///
/// Emits one identity record and one observation batch when the file passes
/// the whole pipeline. Any rejection or failure stops before anything is
/// written; there is no partial emission.
pub async fn incremental_load<S: RelationalSink>(path: &Path, sink: &mut S) -> Result<FileOutcome> {
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let content = std::fs::read_to_string(path)?;

    let outcome = process_file(&file_name, &content)?;

    match &outcome {
        FileOutcome::Accepted {
            identity,
            observations,
        } => {
            sink.insert_identities(std::slice::from_ref(identity)).await?;
            sink.insert_observations(observations).await?;
            info!(file_name = %file_name, cloud_id = identity.cloud_id, rows = observations.len(), "Appended file");
        },
        FileOutcome::Rejected(reason) => {
            warn!(file_name = %file_name, reason = %reason, "File rejected, nothing written");
        },
    }

    Ok(outcome)
}
