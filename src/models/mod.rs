pub mod attributes;
pub mod dimension;
pub mod location;
pub mod record;
pub mod variable;

pub use attributes::Attributes;
pub use dimension::Dimension;
pub use location::{
    sort_by_priority, HorizontalGrid, LocationCode, LocationPriority, TimeAverage, VerticalCoord,
};
pub use record::{CatalogLocation, CatalogRecord};
pub use variable::Variable;
