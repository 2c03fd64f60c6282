use serde::Serialize;

use crate::error::{CatalogError, Result};
use crate::models::location::{sort_by_priority, LocationCode};
use crate::models::Attributes;

/// A data-bearing physical quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Variable {
    pub name: String,
    pub attributes: Attributes,
    /// Dimension names in on-disk axis order
    pub dims: Vec<String>,
    /// Zero until the shape is known
    pub ndims: usize,
    /// Treated as a set; ordered by priority only when written out
    pub locations: Vec<LocationCode>,
}

impl Variable {
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_attributes(name, Attributes::default())
    }

    pub fn with_attributes(name: impl Into<String>, attributes: Attributes) -> Self {
        Self {
            name: name.into(),
            attributes,
            dims: Vec::new(),
            ndims: 0,
            locations: Vec::new(),
        }
    }

    pub fn with_dims(mut self, dims: Vec<String>) -> Self {
        self.ndims = dims.len();
        self.dims = dims;
        self
    }

    pub fn check_compatible(&self, other: &Variable) -> Result<()> {
        self.attributes.check_compatible(&self.name, &other.attributes)?;
        check_ndims(&self.name, self.ndims, other.ndims)
    }

    /// Merge another record of the same quantity into this one.
    ///
    /// Unset fields are filled from `other` and its locations are added; any
    /// disagreement is a conflict and leaves `self` untouched.
    pub fn merge(&mut self, other: &Variable) -> Result<()> {
        self.check_compatible(other)?;
        self.attributes.merge(&self.name, &other.attributes)?;

        if self.ndims == 0 {
            self.ndims = other.ndims;
        }
        if self.dims.is_empty() && !other.dims.is_empty() {
            self.dims = other.dims.clone();
        }
        for location in &other.locations {
            self.add_location(location.clone());
        }

        Ok(())
    }

    /// Record the shape declared by a descriptor line. A different, already
    /// known number of dimensions is a conflict.
    pub fn set_shape(&mut self, dims: Vec<String>) -> Result<()> {
        check_ndims(&self.name, self.ndims, dims.len())?;
        self.ndims = dims.len();
        self.dims = dims;
        Ok(())
    }

    /// Add a location unless the same place is already listed
    pub fn add_location(&mut self, location: LocationCode) -> bool {
        if self.locations.iter().any(|l| l.same_place(&location)) {
            return false;
        }
        self.locations.push(location);
        true
    }

    pub fn sort_locations(&mut self) {
        sort_by_priority(&mut self.locations);
    }
}

fn check_ndims(name: &str, existing: usize, incoming: usize) -> Result<()> {
    if existing > 0 && incoming > 0 && existing != incoming {
        return Err(CatalogError::conflict(name, "ndims", existing, incoming));
    }
    Ok(())
}
