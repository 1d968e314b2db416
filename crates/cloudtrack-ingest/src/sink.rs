//! Relational sink for identity and measurement batches
//!
//! The sink exposes two idempotency-free append operations mirroring the
//! `cloudids` and `dataset` tables. Inserts are plain batched appends: no
//! upsert, no uniqueness constraint, no transaction spanning the two tables.
//! Re-submitting an already-loaded file therefore duplicates its rows;
//! operators own at-most-once submission.

use crate::config::DatabaseConfig;
use crate::identity::CloudIdentity;
use crate::schema::Observation;
use cloudtrack_common::Result;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::time::Duration;
use tracing::{debug, info};

/// Destination for the two record batches the pipeline produces
#[allow(async_fn_in_trait)]
pub trait RelationalSink {
    /// Append file-name -> cloud-id mappings to the identity table
    async fn insert_identities(&mut self, identities: &[CloudIdentity]) -> Result<()>;

    /// Append normalized measurement rows to the dataset table
    async fn insert_observations(&mut self, observations: &[Observation]) -> Result<()>;
}

const CREATE_CLOUDIDS: &str = "CREATE TABLE IF NOT EXISTS cloudids (
    filenames TEXT,
    cloudid BIGINT
)";

const CREATE_DATASET: &str = "CREATE TABLE IF NOT EXISTS dataset (
    id INTEGER,
    area_size INTEGER,
    xg_cloud REAL,
    yg_cloud REAL,
    t_mean_b5 REAL,
    t_mean_b6 REAL,
    t_mean_b7 REAL,
    t_mean_b9 REAL,
    t_mean_b10 REAL,
    t_min_b5 REAL,
    t_min_b6 REAL,
    t_min_b7 REAL,
    t_min_b9 REAL,
    t_min_b10 REAL,
    t_mode_b5 REAL,
    t_mode_b6 REAL,
    t_mode_b7 REAL,
    t_mode_b9 REAL,
    t_mode_b10 REAL,
    m_s_symbol VARCHAR(5),
    d_area REAL,
    d_tempc10_b5 REAL,
    d_tempc10_b9 REAL,
    d_tempc50_b5 REAL,
    d_tempc50_b9 REAL,
    skew_b9 REAL,
    cloudid BIGINT,
    timestamp TIMESTAMP
)";

const INSERT_IDENTITY: &str = "INSERT INTO cloudids (filenames, cloudid) VALUES ($1, $2)";

const INSERT_OBSERVATION: &str = "INSERT INTO dataset (
    id, area_size, xg_cloud, yg_cloud,
    t_mean_b5, t_mean_b6, t_mean_b7, t_mean_b9, t_mean_b10,
    t_min_b5, t_min_b6, t_min_b7, t_min_b9, t_min_b10,
    t_mode_b5, t_mode_b6, t_mode_b7, t_mode_b9, t_mode_b10,
    m_s_symbol, d_area, d_tempc10_b5, d_tempc10_b9, d_tempc50_b5, d_tempc50_b9,
    skew_b9, cloudid, timestamp
) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14,
          $15, $16, $17, $18, $19, $20, $21, $22, $23, $24, $25, $26, $27, $28)";

/// PostgreSQL-backed sink over an sqlx connection pool
#[derive(Debug, Clone)]
pub struct PgSink {
    pool: PgPool,
}

impl PgSink {
    /// Connect to the database described by the configuration
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connect_timeout_secs))
            .connect(&config.url)
            .await?;
        Ok(Self { pool })
    }

    /// Create the `cloudids` and `dataset` tables if they do not exist
    ///
    /// One-time bootstrap; faithful to the original DDL, including the
    /// absence of any primary key or uniqueness constraint.
    pub async fn ensure_tables(&self) -> Result<()> {
        sqlx::query(CREATE_CLOUDIDS).execute(&self.pool).await?;
        sqlx::query(CREATE_DATASET).execute(&self.pool).await?;
        info!("Ensured cloudids and dataset tables exist");
        Ok(())
    }
}

impl RelationalSink for PgSink {
    async fn insert_identities(&mut self, identities: &[CloudIdentity]) -> Result<()> {
        for identity in identities {
            sqlx::query(INSERT_IDENTITY)
                .bind(&identity.file_name)
                .bind(identity.cloud_id)
                .execute(&self.pool)
                .await?;
        }
        debug!(count = identities.len(), "Inserted identity batch");
        Ok(())
    }

    async fn insert_observations(&mut self, observations: &[Observation]) -> Result<()> {
        for obs in observations {
            sqlx::query(INSERT_OBSERVATION)
                .bind(obs.id)
                .bind(obs.area_size)
                .bind(obs.xg_cloud)
                .bind(obs.yg_cloud)
                .bind(obs.t_mean_b5)
                .bind(obs.t_mean_b6)
                .bind(obs.t_mean_b7)
                .bind(obs.t_mean_b9)
                .bind(obs.t_mean_b10)
                .bind(obs.t_min_b5)
                .bind(obs.t_min_b6)
                .bind(obs.t_min_b7)
                .bind(obs.t_min_b9)
                .bind(obs.t_min_b10)
                .bind(obs.t_mode_b5)
                .bind(obs.t_mode_b6)
                .bind(obs.t_mode_b7)
                .bind(obs.t_mode_b9)
                .bind(obs.t_mode_b10)
                .bind(&obs.m_s_symbol)
                .bind(obs.d_area)
                .bind(obs.d_tempc10_b5)
                .bind(obs.d_tempc10_b9)
                .bind(obs.d_tempc50_b5)
                .bind(obs.d_tempc50_b9)
                .bind(obs.skew_b9)
                .bind(obs.cloud_id)
                .bind(obs.timestamp)
                .execute(&self.pool)
                .await?;
        }
        debug!(count = observations.len(), "Inserted observation batch");
        Ok(())
    }
}

/// In-memory sink that records every batch it receives
///
/// Used by coordinator tests; append-only like the real sink, so duplicate
/// submissions show up as duplicate rows here too.
#[derive(Debug, Default)]
pub struct MemorySink {
    pub identities: Vec<CloudIdentity>,
    pub observations: Vec<Observation>,
}

impl RelationalSink for MemorySink {
    async fn insert_identities(&mut self, identities: &[CloudIdentity]) -> Result<()> {
        self.identities.extend_from_slice(identities);
        Ok(())
    }

    async fn insert_observations(&mut self, observations: &[Observation]) -> Result<()> {
        self.observations.extend_from_slice(observations);
        Ok(())
    }
}
