use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

use crate::config::ConflictPolicy;
use crate::error::Result;
use crate::models::{CatalogRecord, Variable};
use crate::processors::Inventory;

/// Every catalogued quantity, keyed (and therefore ordered) by name
#[derive(Debug, Clone, Default, Serialize)]
pub struct Catalog {
    variables: BTreeMap<String, Variable>,
}

impl Catalog {
    pub fn get(&self, name: &str) -> Option<&Variable> {
        self.variables.get(name)
    }

    /// Variables in ascending name order
    pub fn variables(&self) -> impl Iterator<Item = &Variable> {
        self.variables.values()
    }

    pub fn records(&self) -> Vec<CatalogRecord> {
        self.variables().map(CatalogRecord::from).collect()
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    pub fn location_count(&self) -> usize {
        self.variables.values().map(|v| v.locations.len()).sum()
    }
}

/// An inventory that was left out of the catalog, and why
#[derive(Debug, Clone, Serialize)]
pub struct SkippedInventory {
    pub location: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct BuildReport {
    pub inventories_seen: usize,
    pub inventories_contributing: usize,
    /// Locations with an unrecognized grid, vertical coordinate or time average
    pub excluded_locations: Vec<String>,
    /// Only filled under the skip policy
    pub skipped: Vec<SkippedInventory>,
    pub variables: usize,
    pub locations: usize,
}

impl BuildReport {
    pub fn summary(&self) -> String {
        let mut summary = format!(
            "Catalog Build Report:\n  Inventories: {} ({} contributing)\n  Variables: {}\n  Locations: {}\n",
            self.inventories_seen, self.inventories_contributing, self.variables, self.locations
        );

        if !self.excluded_locations.is_empty() {
            summary.push_str(&format!(
                "  Excluded (unrecognized collection axes): {}\n",
                self.excluded_locations.len()
            ));
            for location in &self.excluded_locations {
                summary.push_str(&format!("    {}\n", location));
            }
        }

        if !self.skipped.is_empty() {
            summary.push_str(&format!("  Skipped after conflicts: {}\n", self.skipped.len()));
            for skipped in &self.skipped {
                summary.push_str(&format!("    {}: {}\n", skipped.location, skipped.reason));
            }
        }

        summary
    }
}

/// Merges per-file inventories into one catalog
pub struct CatalogBuilder {
    conflict_policy: ConflictPolicy,
}

impl CatalogBuilder {
    pub fn new() -> Self {
        Self {
            conflict_policy: ConflictPolicy::Abort,
        }
    }

    pub fn with_conflict_policy(mut self, conflict_policy: ConflictPolicy) -> Self {
        self.conflict_policy = conflict_policy;
        self
    }

    /// Merge inventories in the order given.
    ///
    /// The first definition of a quantity shapes its catalog entry; later ones
    /// only fill unset fields and add their location. Under the abort policy
    /// the first conflict ends the build with no catalog.
    pub fn build(&self, inventories: &[Inventory]) -> Result<(Catalog, BuildReport)> {
        let mut catalog = Catalog::default();
        let mut report = BuildReport {
            inventories_seen: inventories.len(),
            ..BuildReport::default()
        };

        for inventory in inventories {
            let location = inventory.location();

            if !location.is_catalogable() {
                debug!("Excluding {}: unrecognized collection axis", location);
                report.excluded_locations.push(location.to_string());
                continue;
            }

            if let Err(e) = self.check_inventory(&catalog, inventory) {
                match self.conflict_policy {
                    ConflictPolicy::Abort => return Err(e),
                    ConflictPolicy::Skip => {
                        warn!("Skipping {}: {}", location, e);
                        report.skipped.push(SkippedInventory {
                            location: location.to_string(),
                            reason: e.to_string(),
                        });
                        continue;
                    }
                }
            }

            self.apply_inventory(&mut catalog, inventory)?;
            report.inventories_contributing += 1;
        }

        for variable in catalog.variables.values_mut() {
            variable.sort_locations();
        }

        report.variables = catalog.len();
        report.locations = catalog.location_count();
        info!(
            "Catalogued {} variables at {} locations from {} inventories",
            report.variables, report.locations, report.inventories_contributing
        );

        Ok((catalog, report))
    }

    /// Check every variable of an inventory against the catalog so far
    fn check_inventory(&self, catalog: &Catalog, inventory: &Inventory) -> Result<()> {
        for (name, variable) in inventory.variables() {
            if let Some(existing) = catalog.variables.get(name) {
                existing.check_compatible(variable)?;
            }
        }
        Ok(())
    }

    fn apply_inventory(&self, catalog: &mut Catalog, inventory: &Inventory) -> Result<()> {
        let location = inventory.location();

        for (name, variable) in inventory.variables() {
            match catalog.variables.get_mut(name) {
                Some(existing) => {
                    existing.merge(variable)?;
                    existing.add_location(location.clone());
                }
                None => {
                    let mut entry = variable.clone();
                    entry.add_location(location.clone());
                    catalog.variables.insert(name.clone(), entry);
                }
            }
        }
        Ok(())
    }
}

impl Default for CatalogBuilder {
    fn default() -> Self {
        Self::new()
    }
}
