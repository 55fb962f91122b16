//! Identity resolution for human-entered master-data names
//!
//! The export carries free-text delivery director ("DD") and business unit
//! head ("BUH") names. One parameterized mapper covers both roles; only the
//! configured table and the role label in the discrepancy text differ.

use crate::config::MappingTable;
use crate::report::DiscrepancyLog;

/// Resolves raw names against one role's master-data table.
#[derive(Debug, Clone)]
pub struct IdentityMapper {
    role: &'static str,
    table: MappingTable,
}

impl IdentityMapper {
    pub fn new(role: &'static str, table: MappingTable) -> Self {
        Self { role, table }
    }

    /// Map a raw name to its canonical identifier.
    ///
    /// Returns `None` and records a discrepancy when the name is empty,
    /// known-but-unmapped, or wholly unrecognized. Alias lookup is exact and
    /// case-sensitive after trimming.
    pub fn resolve(&self, raw: &str, log: &mut DiscrepancyLog) -> Option<String> {
        let name = raw.trim();
        if name.is_empty() {
            log.warn(format!("Empty {} name found", self.role));
            return None;
        }

        if let Some(id) = self.table.aliases.get(name) {
            return Some(id.clone());
        }

        if self.table.unmapped.contains(name) {
            log.error(format!(
                "{} not found in master data: '{}'",
                self.role, name
            ));
        } else {
            log.error(format!("Unknown {} name: '{}'", self.role, name));
        }
        None
    }
}
