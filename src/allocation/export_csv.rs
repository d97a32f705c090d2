//! Flat CSV export of a payout sheet: one row per rank.

use std::io;

use serde::Serialize;
use thiserror::Error;

use crate::allocation::engine::AllocationResult;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("csv write failed: {0}")]
    Csv(#[from] csv::Error),
    #[error("csv flush failed: {0}")]
    Io(#[from] io::Error),
    #[error("csv output is not utf-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

#[derive(Debug, Serialize)]
struct PayoutRow<'a> {
    division: &'a str,
    division_share: f64,
    division_units: u64,
    rank: usize,
    rank_share: f64,
    rank_units: u64,
}

pub fn write_csv<W: io::Write>(result: &AllocationResult, writer: W) -> Result<W, ExportError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for division in &result.divisions {
        for rank in &division.ranks {
            csv_writer.serialize(PayoutRow {
                division: &division.name,
                division_share: division.share,
                division_units: division.units,
                rank: rank.rank,
                rank_share: rank.share,
                rank_units: rank.units,
            })?;
        }
    }
    csv_writer
        .into_inner()
        .map_err(|err| ExportError::Io(err.into_error()))
}

pub fn to_csv_string(result: &AllocationResult) -> Result<String, ExportError> {
    let bytes = write_csv(result, Vec::new())?;
    Ok(String::from_utf8(bytes)?)
}
