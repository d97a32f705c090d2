//! Human-readable payout sheet.

use std::fmt::Write as _;

use crate::allocation::engine::AllocationResult;

/// Render the payout sheet: pool total, then each division and its ranks in declaration order.
/// Rank lines are indented with a tab.
///
/// ```text
/// Total Pool: 100
/// Premiership: Total 60 Keys (60%)
/// 	1: 30 Keys (50%)
/// ```
pub fn format_report(result: &AllocationResult) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Total Pool: {}", result.total);
    for division in &result.divisions {
        let _ = writeln!(
            out,
            "{}: Total {} Keys ({}%)",
            division.name, division.units, division.share
        );
        for rank in &division.ranks {
            let _ = writeln!(out, "\t{}: {} Keys ({}%)", rank.rank, rank.units, rank.share);
        }
    }
    out
}

pub fn to_json(result: &AllocationResult) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(result)
}
