//! Schema normalization for raw tracking tables
//!
//! Projects the 156 positional columns of a raw tracking file down to the
//! named measurement schema of the `dataset` table. The column map is a
//! static table, never inferred from the data. Normalization also composes
//! the per-row timestamp from five integer components, substitutes the `##`
//! sentinel ("no rate of change computed yet") with zero, and stamps every
//! row with the file's cloud id.

use crate::identity::CloudIdentity;
use crate::parser::RawTable;
use chrono::{NaiveDate, NaiveDateTime};
use cloudtrack_common::{CloudtrackError, Result};

/// Placeholder written by the tracker when no rate of change exists yet
pub const SENTINEL: &str = "##";

/// Value the sentinel is normalized to before persistence
pub const SENTINEL_REPLACEMENT: &str = "0.0";

/// Known-erroneous column written by the upstream tracker (off-by-one
/// artifact); must never be mapped to a named field
pub const DROPPED_COLUMN: usize = 28;

// Timestamp component columns
const COL_YEAR: usize = 144;
const COL_MONTH: usize = 145;
const COL_DAY: usize = 146;
const COL_HOUR: usize = 147;
const COL_MINUTE: usize = 148;

// Identification and geometry
const COL_ID: usize = 0;
const COL_AREA_SIZE: usize = 1;
const COL_XG_CLOUD: usize = 2;
const COL_YG_CLOUD: usize = 3;

// Temperature features: mean, min, and mode over bands 5, 6, 7, 9, 10
const COL_T_MEAN: [usize; 5] = [10, 11, 12, 13, 14];
const COL_T_MIN: [usize; 5] = [15, 16, 17, 18, 19];
const COL_T_MODE: [usize; 5] = [20, 21, 22, 23, 24];

// Classification symbol and rate-of-change features
const COL_M_S_SYMBOL: usize = 149;
const COL_D_AREA: usize = 150;
const COL_D_TEMPC10_B5: usize = 151;
const COL_D_TEMPC10_B9: usize = 152;
const COL_D_TEMPC50_B5: usize = 153;
const COL_D_TEMPC50_B9: usize = 154;
const COL_SKEW_B9: usize = 155;

/// One normalized timestep of one tracked cloud
///
/// Field names and types mirror the `dataset` table one to one.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub id: i32,
    pub area_size: i32,
    pub xg_cloud: f64,
    pub yg_cloud: f64,
    pub t_mean_b5: f64,
    pub t_mean_b6: f64,
    pub t_mean_b7: f64,
    pub t_mean_b9: f64,
    pub t_mean_b10: f64,
    pub t_min_b5: f64,
    pub t_min_b6: f64,
    pub t_min_b7: f64,
    pub t_min_b9: f64,
    pub t_min_b10: f64,
    pub t_mode_b5: f64,
    pub t_mode_b6: f64,
    pub t_mode_b7: f64,
    pub t_mode_b9: f64,
    pub t_mode_b10: f64,
    pub m_s_symbol: String,
    pub d_area: f64,
    pub d_tempc10_b5: f64,
    pub d_tempc10_b9: f64,
    pub d_tempc50_b5: f64,
    pub d_tempc50_b9: f64,
    pub skew_b9: f64,
    pub cloud_id: i64,
    pub timestamp: NaiveDateTime,
}

/// Normalize a rectangular raw table into one [`Observation`] per row
///
/// Output rows are 1:1 with input rows; row-level filtering happens only in
/// the validation gate. The caller guarantees the table has the expected
/// 156-column width.
pub fn normalize(table: &RawTable, identity: &CloudIdentity) -> Result<Vec<Observation>> {
    let mut observations = Vec::with_capacity(table.row_count());
    for row in table.rows() {
        observations.push(normalize_row(row, identity.cloud_id)?);
    }
    Ok(observations)
}

fn normalize_row(row: &[String], cloud_id: i64) -> Result<Observation> {
    Ok(Observation {
        id: int_field(row, COL_ID)?,
        area_size: int_field(row, COL_AREA_SIZE)?,
        xg_cloud: float_field(row, COL_XG_CLOUD)?,
        yg_cloud: float_field(row, COL_YG_CLOUD)?,
        t_mean_b5: float_field(row, COL_T_MEAN[0])?,
        t_mean_b6: float_field(row, COL_T_MEAN[1])?,
        t_mean_b7: float_field(row, COL_T_MEAN[2])?,
        t_mean_b9: float_field(row, COL_T_MEAN[3])?,
        t_mean_b10: float_field(row, COL_T_MEAN[4])?,
        t_min_b5: float_field(row, COL_T_MIN[0])?,
        t_min_b6: float_field(row, COL_T_MIN[1])?,
        t_min_b7: float_field(row, COL_T_MIN[2])?,
        t_min_b9: float_field(row, COL_T_MIN[3])?,
        t_min_b10: float_field(row, COL_T_MIN[4])?,
        t_mode_b5: float_field(row, COL_T_MODE[0])?,
        t_mode_b6: float_field(row, COL_T_MODE[1])?,
        t_mode_b7: float_field(row, COL_T_MODE[2])?,
        t_mode_b9: float_field(row, COL_T_MODE[3])?,
        t_mode_b10: float_field(row, COL_T_MODE[4])?,
        m_s_symbol: cell(row, COL_M_S_SYMBOL).to_string(),
        d_area: float_field(row, COL_D_AREA)?,
        d_tempc10_b5: float_field(row, COL_D_TEMPC10_B5)?,
        d_tempc10_b9: float_field(row, COL_D_TEMPC10_B9)?,
        d_tempc50_b5: float_field(row, COL_D_TEMPC50_B5)?,
        d_tempc50_b9: float_field(row, COL_D_TEMPC50_B9)?,
        skew_b9: float_field(row, COL_SKEW_B9)?,
        cloud_id,
        timestamp: compose_timestamp(row)?,
    })
}

/// Read one cell with the sentinel substitution applied
///
/// The sentinel can appear in any field, including the classification
/// symbol; substitution only fires on an exact match, every other cell
/// passes through untouched.
fn cell(row: &[String], column: usize) -> &str {
    let raw = row[column].as_str();
    if raw == SENTINEL {
        SENTINEL_REPLACEMENT
    } else {
        raw
    }
}

fn float_field(row: &[String], column: usize) -> Result<f64> {
    let value = cell(row, column);
    value.parse::<f64>().map_err(|_| CloudtrackError::FieldParse {
        column,
        value: value.to_string(),
    })
}

/// Parse an integer-typed field, discarding any fractional part
///
/// Source tokens are sometimes written as textual floats (e.g. `"12.0"`);
/// integer fields must never retain a fraction.
fn int_field(row: &[String], column: usize) -> Result<i32> {
    let value = cell(row, column);
    if let Ok(parsed) = value.parse::<i32>() {
        return Ok(parsed);
    }
    let truncated = value
        .parse::<f64>()
        .map_err(|_| CloudtrackError::FieldParse {
            column,
            value: value.to_string(),
        })?
        .trunc();
    Ok(truncated as i32)
}

/// Compose the timestamp from the five positional components
///
/// All five must be present, integral, and form a valid calendar instant.
/// Happens against the raw positions, independent of the erroneous-column
/// drop.
fn compose_timestamp(row: &[String]) -> Result<NaiveDateTime> {
    let year = int_field(row, COL_YEAR)?;
    let month = component_u32(row, COL_MONTH)?;
    let day = component_u32(row, COL_DAY)?;
    let hour = component_u32(row, COL_HOUR)?;
    let minute = component_u32(row, COL_MINUTE)?;

    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|date| date.and_hms_opt(hour, minute, 0))
        .ok_or_else(|| {
            CloudtrackError::Timestamp(format!(
                "{:04}-{:02}-{:02} {:02}:{:02}",
                year, month, day, hour, minute
            ))
        })
}

fn component_u32(row: &[String], column: usize) -> Result<u32> {
    let value = int_field(row, column)?;
    u32::try_from(value).map_err(|_| CloudtrackError::FieldParse {
        column,
        value: value.to_string(),
    })
}
