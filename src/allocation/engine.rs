//! Integer allocation of a pool across divisions and ranks.
//!
//! Each level is floored first (`floor(total * percent / 100)`), then the units lost to
//! flooring are handed out one at a time in declaration order, wrapping around when there
//! are more leftover units than entries. Ranks are allocated from their division's rounded
//! unit count, so every level sums exactly to the level above.

use log::{debug, trace};
use serde::Serialize;
use thiserror::Error;

use crate::data::distribution::AllocationTable;
use crate::data::validate::FULL_SHARE;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankResult {
    /// 1-based position within the division.
    pub rank: usize,
    pub share: f64,
    pub units: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DivisionResult {
    pub name: String,
    pub share: f64,
    pub units: u64,
    pub ranks: Vec<RankResult>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AllocationResult {
    pub total: u64,
    pub divisions: Vec<DivisionResult>,
}

impl AllocationResult {
    pub fn division(&self, name: &str) -> Option<&DivisionResult> {
        self.divisions.iter().find(|division| division.name == name)
    }

    pub fn allocated_units(&self) -> u64 {
        self.divisions.iter().map(|division| division.units).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AllocationError {
    #[error("{context} has invalid percentage {value}")]
    InvalidPercentage { context: String, value: f64 },
    #[error("{context} percentages claim {claimed} units but only {total} are available")]
    OverAllocated {
        context: String,
        claimed: u64,
        total: u64,
    },
    #[error("{context} has {total} units but nothing to give them to")]
    NoRecipients { context: String, total: u64 },
}

/// Allocate `total` units across the table's divisions, then each division's units
/// across its ranks.
///
/// The table is expected to have passed [crate::data::validate()]; percentages that do not
/// reach 100 still conserve the total (the rotation absorbs the gap), while negative
/// percentages or shares above 100 are reported as errors.
pub fn allocate(total: u64, table: &AllocationTable) -> Result<AllocationResult, AllocationError> {
    let shares: Vec<f64> = table.iter().map(|division| division.share).collect();
    let division_units = distribute(total, &shares, "pool")?;
    debug!("pool of {total} split across divisions as {division_units:?}");

    let divisions = table
        .iter()
        .zip(division_units)
        .map(|(division, units)| -> Result<DivisionResult, AllocationError> {
            let rank_units = distribute(units, &division.ranks, &division.name)?;
            trace!("{} ranks receive {rank_units:?}", division.name);
            Ok(DivisionResult {
                name: division.name.clone(),
                share: division.share,
                units,
                ranks: division
                    .ranks
                    .iter()
                    .zip(rank_units)
                    .enumerate()
                    .map(|(index, (&share, units))| RankResult {
                        rank: index + 1,
                        share,
                        units,
                    })
                    .collect(),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(AllocationResult { total, divisions })
}

/// Split `total` units by `percentages`, returning one count per entry that sums to `total`.
pub fn distribute(
    total: u64,
    percentages: &[f64],
    context: &str,
) -> Result<Vec<u64>, AllocationError> {
    if let Some(&value) = percentages
        .iter()
        .find(|value| !value.is_finite() || **value < 0.0)
    {
        return Err(AllocationError::InvalidPercentage {
            context: context.to_string(),
            value,
        });
    }
    if percentages.is_empty() {
        if total == 0 {
            return Ok(Vec::new());
        }
        return Err(AllocationError::NoRecipients {
            context: context.to_string(),
            total,
        });
    }

    let mut units: Vec<u64> = percentages
        .iter()
        .map(|&percent| floor_share(total, percent))
        .collect();
    let claimed: u128 = units.iter().map(|&value| u128::from(value)).sum();
    if claimed > u128::from(total) {
        let percent_sum: f64 = percentages.iter().sum();
        if percent_sum > FULL_SHARE {
            return Err(AllocationError::OverAllocated {
                context: context.to_string(),
                claimed: u64::try_from(claimed).unwrap_or(u64::MAX),
                total,
            });
        }
        // Above 2^53 the ideal shares are rounded and can overshoot; the last entries give it back.
        trim_overshoot(&mut units, claimed - u128::from(total));
    }
    let remainder = total - units.iter().sum::<u64>();

    // Same result as handing out one unit at a time, first entry first, wrapping around.
    let count = units.len() as u64;
    let per_entry = remainder / count;
    let extra = remainder % count;
    for (index, value) in units.iter_mut().enumerate() {
        *value += per_entry + u64::from((index as u64) < extra);
    }

    Ok(units)
}

fn floor_share(total: u64, percent: f64) -> u64 {
    ((total as f64 * percent / FULL_SHARE).floor() as u64).min(total)
}

fn trim_overshoot(units: &mut [u64], mut excess: u128) {
    for value in units.iter_mut().rev() {
        let cut = excess.min(u128::from(*value));
        *value -= cut as u64;
        excess -= cut;
        if excess == 0 {
            break;
        }
    }
}
