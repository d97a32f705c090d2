pub mod distribution;
pub mod loader;
pub mod validate;

pub use distribution::{AllocationTable, Division, DuplicateDivision};
pub use loader::{
    load_distributions, load_profile, ConfigError, Distributions, CONFIG_PATH_ENV,
    DEFAULT_DISTRIBUTIONS_PATH,
};
pub use validate::{
    validate, validate_table, DiagnosticScope, ValidationDiagnostic, ValidationOptions,
    ValidationReport, FULL_SHARE,
};
