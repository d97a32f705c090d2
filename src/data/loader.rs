//! Load named distribution profiles from the YAML distributions file.
//! Layout: `profile name -> division name -> { share, distribution: [...] }`.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::Path;

use log::debug;
use serde::Deserialize;
use thiserror::Error;

use crate::data::distribution::AllocationTable;

pub const DEFAULT_DISTRIBUTIONS_PATH: &str = "distributions.yml";

/// Overrides [DEFAULT_DISTRIBUTIONS_PATH] when set.
pub const CONFIG_PATH_ENV: &str = "PRIZE_POOLER_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("distributions could not be found at '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("unable to parse distributions '{path}': {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("no distribution named '{0}'")]
    UnknownProfile(String),
    #[error("distribution '{0}' has no divisions")]
    EmptyProfile(String),
}

/// Every profile in a distributions file, keyed by profile name.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct Distributions {
    profiles: BTreeMap<String, AllocationTable>,
}

impl Distributions {
    pub fn from_yaml_str(raw: &str) -> Result<Self, serde_yaml::Error> {
        // An empty file is an empty set of profiles, not a syntax error.
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(raw)
    }

    /// Look up a profile; a missing or division-less profile is an error.
    pub fn profile(&self, name: &str) -> Result<&AllocationTable, ConfigError> {
        let table = self
            .profiles
            .get(name)
            .ok_or_else(|| ConfigError::UnknownProfile(name.to_string()))?;
        if table.is_empty() {
            return Err(ConfigError::EmptyProfile(name.to_string()));
        }
        Ok(table)
    }

    pub fn profile_names(&self) -> impl Iterator<Item = &str> {
        self.profiles.keys().map(String::as_str)
    }
}

pub fn load_distributions(path: impl AsRef<Path>) -> Result<Distributions, ConfigError> {
    let path = path.as_ref();
    let display = path.display().to_string();
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: display.clone(),
        source,
    })?;
    let distributions = Distributions::from_yaml_str(&raw).map_err(|source| ConfigError::Parse {
        path: display.clone(),
        source,
    })?;
    debug!(
        "loaded {} distribution profile(s) from {display}",
        distributions.profiles.len()
    );
    Ok(distributions)
}

/// Load one profile's table from the distributions file at `path`.
pub fn load_profile(path: impl AsRef<Path>, name: &str) -> Result<AllocationTable, ConfigError> {
    let distributions = load_distributions(path)?;
    distributions.profile(name).cloned()
}
