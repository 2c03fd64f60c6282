use serde::Serialize;

use crate::error::Result;
use crate::models::Attributes;

/// A coordinate axis such as time, latitude or pressure level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dimension {
    pub name: String,
    pub attributes: Attributes,
}

impl Dimension {
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_attributes(name, Attributes::default())
    }

    pub fn with_attributes(name: impl Into<String>, attributes: Attributes) -> Self {
        Self {
            name: name.into(),
            attributes,
        }
    }

    pub fn merge(&mut self, other: &Dimension) -> Result<()> {
        self.attributes.merge(&self.name, &other.attributes)
    }
}
