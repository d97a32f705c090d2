use std::fmt;

use log::warn;

use crate::data::distribution::AllocationTable;

/// Percentages at every level must add up to this.
pub const FULL_SHARE: f64 = 100.0;

/// How close a level's sum must be to [FULL_SHARE]. The default is exact equality:
/// a table whose ranks add up to 99.999999 is rejected.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValidationOptions {
    pub tolerance: f64,
}

impl Default for ValidationOptions {
    fn default() -> Self {
        Self { tolerance: 0.0 }
    }
}

impl ValidationOptions {
    /// Negative and NaN tolerances fall back to exact equality.
    pub fn with_tolerance(tolerance: f64) -> Self {
        Self {
            tolerance: tolerance.max(0.0),
        }
    }

    fn accepts(&self, sum: f64) -> bool {
        (sum - FULL_SHARE).abs() <= self.tolerance.max(0.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagnosticScope {
    /// The ranks of one division.
    Division(String),
    /// The shares of all divisions together.
    Total,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValidationDiagnostic {
    pub scope: DiagnosticScope,
    pub actual_sum: f64,
}

impl fmt::Display for ValidationDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.scope {
            DiagnosticScope::Division(name) => {
                write!(f, "Total of {name} division is {}", self.actual_sum)
            }
            DiagnosticScope::Total => write!(f, "All divisions add up to {}", self.actual_sum),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    pub diagnostics: Vec<ValidationDiagnostic>,
}

impl ValidationReport {
    fn push(&mut self, scope: DiagnosticScope, actual_sum: f64) {
        self.diagnostics.push(ValidationDiagnostic { scope, actual_sum });
    }

    pub fn is_valid(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// Check every division's ranks and the overall shares, collecting all violations.
pub fn validate_table(table: &AllocationTable, options: &ValidationOptions) -> ValidationReport {
    let mut report = ValidationReport::default();
    let mut total = 0.0;

    for division in table {
        total += division.share;

        let rank_total: f64 = division.ranks.iter().sum();
        if !options.accepts(rank_total) {
            report.push(DiagnosticScope::Division(division.name.clone()), rank_total);
        }
    }

    if !options.accepts(total) {
        report.push(DiagnosticScope::Total, total);
    }

    report
}

/// Exact-equality validation; each violation is logged as a warning.
pub fn validate(table: &AllocationTable) -> bool {
    let report = validate_table(table, &ValidationOptions::default());
    for diagnostic in &report.diagnostics {
        warn!("{diagnostic}");
    }
    report.is_valid()
}
