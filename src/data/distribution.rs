//! Allocation tables: named divisions with a pool share and per-rank percentages.
//! Division order follows the configuration file and decides who receives remainder units.

use std::collections::HashSet;
use std::fmt;

use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::Deserialize;
use thiserror::Error;

/// One top-level bucket of the pool.
#[derive(Debug, Clone, PartialEq)]
pub struct Division {
    pub name: String,
    /// Percentage of the whole pool (0-100).
    pub share: f64,
    /// Percentage of this division's units per rank, best rank first.
    pub ranks: Vec<f64>,
}

impl Division {
    pub fn new(name: impl Into<String>, share: f64, ranks: impl Into<Vec<f64>>) -> Self {
        Self {
            name: name.into(),
            share,
            ranks: ranks.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("duplicate division '{0}'")]
pub struct DuplicateDivision(pub String);

/// Ordered, name-unique list of divisions. Read-only once built.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AllocationTable {
    divisions: Vec<Division>,
}

impl AllocationTable {
    pub fn new(divisions: Vec<Division>) -> Result<Self, DuplicateDivision> {
        let mut seen = HashSet::with_capacity(divisions.len());
        for division in &divisions {
            if !seen.insert(division.name.as_str()) {
                return Err(DuplicateDivision(division.name.clone()));
            }
        }
        Ok(Self { divisions })
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Division> {
        self.divisions.iter()
    }

    pub fn get(&self, name: &str) -> Option<&Division> {
        self.divisions.iter().find(|division| division.name == name)
    }

    pub fn len(&self) -> usize {
        self.divisions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.divisions.is_empty()
    }
}

impl<'a> IntoIterator for &'a AllocationTable {
    type Item = &'a Division;
    type IntoIter = std::slice::Iter<'a, Division>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Body of a division entry in YAML: `{ share: 40, distribution: [50, 30, 20] }`.
#[derive(Debug, Deserialize)]
struct DivisionEntry {
    share: f64,
    #[serde(alias = "ranks", default)]
    distribution: Vec<f64>,
}

struct TableVisitor;

impl<'de> Visitor<'de> for TableVisitor {
    type Value = AllocationTable;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a mapping of division name to { share, distribution }")
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut divisions = Vec::with_capacity(map.size_hint().unwrap_or(0));
        while let Some((name, entry)) = map.next_entry::<String, DivisionEntry>()? {
            divisions.push(Division::new(name, entry.share, entry.distribution));
        }
        AllocationTable::new(divisions).map_err(de::Error::custom)
    }
}

impl<'de> Deserialize<'de> for AllocationTable {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(TableVisitor)
    }
}
