//! Run configuration loaded from a TOML file
//!
//! Master-data mapping tables, the month column list, the target year and the
//! default start date for newly created projects are all injected here rather
//! than compiled in, so a new export season is a config edit, not a source
//! change.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::Deserialize;

/// One month column group in the CSV (`"{label} Team size"` etc.).
#[derive(Debug, Clone, Deserialize)]
pub struct MonthColumn {
    pub label: String,
    pub number: u8,
}

/// A master-data lookup table for one identity role.
///
/// `aliases` may map several spellings to the same canonical id. `unmapped`
/// holds names that are known in the export but have no master-data entry;
/// these are reported differently from wholly unrecognized names.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MappingTable {
    #[serde(default)]
    pub aliases: HashMap<String, String>,
    #[serde(default)]
    pub unmapped: HashSet<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RunConfig {
    /// Calendar year every operations record in this run is keyed to.
    pub year: i32,
    /// Start date stamped on projects created by this run.
    pub project_start_date: NaiveDate,
    #[serde(default = "default_months")]
    pub months: Vec<MonthColumn>,
    pub directors: MappingTable,
    pub business_unit_heads: MappingTable,
}

fn default_months() -> Vec<MonthColumn> {
    const NAMES: [&str; 12] = [
        "January",
        "February",
        "March",
        "April",
        "May",
        "June",
        "July",
        "August",
        "September",
        "October",
        "November",
        "December",
    ];
    NAMES
        .iter()
        .enumerate()
        .map(|(i, name)| MonthColumn {
            label: (*name).to_string(),
            number: (i + 1) as u8,
        })
        .collect()
}

impl RunConfig {
    /// Load and validate a run configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read mapping config: {}", path.display()))?;
        let config: RunConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse mapping config: {}", path.display()))?;
        config
            .validate()
            .with_context(|| format!("Invalid mapping config: {}", path.display()))?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.directors.aliases.is_empty() {
            anyhow::bail!("directors table has no aliases");
        }
        if self.business_unit_heads.aliases.is_empty() {
            anyhow::bail!("business_unit_heads table has no aliases");
        }
        if self.months.is_empty() {
            anyhow::bail!("month list is empty");
        }
        for month in &self.months {
            if month.number < 1 || month.number > 12 {
                anyhow::bail!(
                    "month '{}' has out-of-range number {}",
                    month.label,
                    month.number
                );
            }
        }
        Ok(())
    }
}
