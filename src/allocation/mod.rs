pub mod engine;
pub mod export_csv;
pub mod report;

pub use engine::{
    allocate, distribute, AllocationError, AllocationResult, DivisionResult, RankResult,
};
pub use export_csv::{to_csv_string, write_csv, ExportError};
pub use report::{format_report, to_json};
