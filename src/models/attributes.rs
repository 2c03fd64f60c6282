use serde::{Deserialize, Serialize};

use crate::error::{CatalogError, Result};

/// The descriptive text attached to a variable or dimension. Empty means unset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attributes {
    pub long_name: String,
    pub standard_name: String,
    pub units: String,
}

impl Attributes {
    pub fn new(
        long_name: impl Into<String>,
        standard_name: impl Into<String>,
        units: impl Into<String>,
    ) -> Self {
        Self {
            long_name: long_name.into(),
            standard_name: standard_name.into(),
            units: units.into(),
        }
    }

    /// Fields that are set on both sides must agree exactly.
    pub fn check_compatible(&self, entity: &str, other: &Attributes) -> Result<()> {
        check_field(entity, "long name", &self.long_name, &other.long_name)?;
        check_field(entity, "std name", &self.standard_name, &other.standard_name)?;
        check_field(entity, "units", &self.units, &other.units)?;
        Ok(())
    }

    /// Left-biased merge: unset fields are filled from `other`, a disagreement
    /// on a set field is a conflict and leaves `self` untouched.
    pub fn merge(&mut self, entity: &str, other: &Attributes) -> Result<()> {
        self.check_compatible(entity, other)?;

        fill(&mut self.long_name, &other.long_name);
        fill(&mut self.standard_name, &other.standard_name);
        fill(&mut self.units, &other.units);

        Ok(())
    }
}

fn check_field(entity: &str, field: &'static str, existing: &str, incoming: &str) -> Result<()> {
    if !existing.is_empty() && !incoming.is_empty() && existing != incoming {
        return Err(CatalogError::conflict(entity, field, existing, incoming));
    }
    Ok(())
}

fn fill(target: &mut String, source: &str) {
    if target.is_empty() && !source.is_empty() {
        *target = source.to_string();
    }
}
