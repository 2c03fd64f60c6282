use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

use crate::error::Result;
use crate::models::{Dimension, LocationCode, Variable};
use crate::readers::{DasEntity, DasReader, DdsField, DdsReader, EntityKind, SourcePages};

/// The variables and dimensions found in one file, at one location.
///
/// Built in one go from the file's attribute and descriptor text; a conflict
/// anywhere means there is no inventory.
#[derive(Debug, Clone, Serialize)]
pub struct Inventory {
    location: LocationCode,
    variables: BTreeMap<String, Variable>,
    dimensions: BTreeMap<String, Dimension>,
}

impl Inventory {
    pub fn build(location: LocationCode, das_text: &str, dds_text: &str) -> Result<Self> {
        let mut inventory = Self {
            location,
            variables: BTreeMap::new(),
            dimensions: BTreeMap::new(),
        };

        for entity in DasReader::new().read_entities(das_text) {
            inventory.file_entity(entity)?;
        }
        for field in DdsReader::new().read_fields(dds_text) {
            inventory.file_field(field)?;
        }

        debug!(
            "Inventoried {}: {} variables, {} dimensions",
            inventory.location,
            inventory.variables.len(),
            inventory.dimensions.len()
        );

        Ok(inventory)
    }

    pub fn from_pages(pages: &SourcePages) -> Result<Self> {
        let location =
            LocationCode::from_file_url(&pages.base_url, &pages.collection_code, &pages.file_url)?;
        Self::build(location, &pages.das_text, &pages.dds_text)
    }

    pub fn location(&self) -> &LocationCode {
        &self.location
    }

    pub fn variables(&self) -> &BTreeMap<String, Variable> {
        &self.variables
    }

    pub fn dimensions(&self) -> &BTreeMap<String, Dimension> {
        &self.dimensions
    }

    /// File a closed DAS section
    fn file_entity(&mut self, entity: DasEntity) -> Result<()> {
        let DasEntity {
            name,
            attributes,
            kind,
        } = entity;

        if kind == EntityKind::Variable || self.variables.contains_key(&name) {
            return self.variable_entry(&name).attributes.merge(&name, &attributes);
        }

        self.dimensions
            .entry(name.clone())
            .or_insert_with(|| Dimension::new(name.as_str()))
            .merge(&Dimension::with_attributes(name.as_str(), attributes))
    }

    /// File a DDS array declaration
    fn file_field(&mut self, field: DdsField) -> Result<()> {
        let DdsField { name, dims, kind } = field;

        if kind == EntityKind::Dimension && !self.variables.contains_key(&name) {
            self.dimensions
                .entry(name.clone())
                .or_insert_with(|| Dimension::new(name.as_str()));
            return Ok(());
        }

        self.variable_entry(&name).set_shape(dims)
    }

    /// The variable of this name, moving it over from the dimensions if the
    /// attribute text had it down as one.
    fn variable_entry(&mut self, name: &str) -> &mut Variable {
        if !self.variables.contains_key(name) {
            let variable = match self.dimensions.remove(name) {
                Some(dimension) => {
                    debug!("{} reclassified from dimension to variable", name);
                    Variable::with_attributes(dimension.name, dimension.attributes)
                }
                None => Variable::new(name),
            };
            self.variables.insert(name.to_string(), variable);
        }

        self.variables
            .entry(name.to_string())
            .or_insert_with(|| Variable::new(name))
    }

    /// Human-readable dump of the inventory
    pub fn summary(&self) -> String {
        let mut summary = format!("Name: {}\n", self.location);

        summary.push_str(&format!("Dimensions: {}\n", self.dimensions.len()));
        for dimension in self.dimensions.values() {
            summary.push_str(&format!(
                "    {} ({})\n",
                dimension.name, dimension.attributes.long_name
            ));
        }

        summary.push_str(&format!("Variables: {}\n", self.variables.len()));
        for variable in self.variables.values() {
            summary.push_str(&format!(
                "    {} ({}) [{}]\n",
                variable.name,
                variable.attributes.long_name,
                variable.dims.join(", ")
            ));
        }

        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CatalogError;
    use crate::models::Attributes;
    use pretty_assertions::assert_eq;

    const DAS: &str = r#"Attributes {
    HDF_GLOBAL {
        String title "MERRA inst3_3d_asm_Cp";
    }
    XDim {
        String long_name "longitude";
        String units "degrees_east";
    }
    YDim {
        String long_name "latitude";
        String units "degrees_north";
    }
    Height {
        String long_name "vertical level";
        String units "hPa";
    }
    TIME {
        String long_name "time";
    }
    T {
        String long_name "Air temperature";
        String standard_name "air_temperature";
        String units "K";
        String coordinates "TIME Height YDim XDim";
    }
    PS {
        String long_name "Surface pressure";
        String units "Pa";
    }
}
"#;

    const DDS: &str = r#"Dataset {
    Float64 XDim[XDim = 540];
    Float64 YDim[YDim = 361];
    Float64 Height[Height = 42];
    Float64 TIME[TIME = 8];
    Float32 T[TIME = 8][Height = 42][YDim = 361][XDim = 540];
    Float32 PS[TIME = 8][YDim = 361][XDim = 540];
} MERRA300.prod.assim.inst3_3d_asm_Cp.19900715.hdf;
"#;

    fn location() -> LocationCode {
        LocationCode::from_file_url(
            "https://goldsmr3.gesdisc.eosdis.nasa.gov/opendap/MERRA/",
            "MAI3CPASM",
            "https://goldsmr3.gesdisc.eosdis.nasa.gov/opendap/MERRA/MAI3CPASM.5.2.0/1990/07/MERRA300.prod.assim.inst3_3d_asm_Cp.19900715.hdf.das",
        )
        .unwrap()
    }

    #[test]
    fn test_build_inventory() {
        let inventory = Inventory::build(location(), DAS, DDS).unwrap();

        assert_eq!(inventory.location().tag(), "MERRA300.prod.assim.inst3_3d_asm_Cp");

        let dims: Vec<&str> = inventory.dimensions().keys().map(|k| k.as_str()).collect();
        assert_eq!(dims, vec!["Height", "TIME", "XDim", "YDim"]);

        let t = &inventory.variables()["T"];
        assert_eq!(t.attributes, Attributes::new("Air temperature", "air_temperature", "K"));
        assert_eq!(t.dims, vec!["TIME", "Height", "YDim", "XDim"]);
        assert_eq!(t.ndims, 4);
    }

    #[test]
    fn test_descriptor_moves_dimension_candidate_to_variables() {
        let inventory = Inventory::build(location(), DAS, DDS).unwrap();

        assert!(!inventory.dimensions().contains_key("PS"));
        let ps = &inventory.variables()["PS"];
        assert_eq!(ps.attributes.long_name, "Surface pressure");
        assert_eq!(ps.attributes.units, "Pa");
        assert_eq!(ps.ndims, 3);
    }

    #[test]
    fn test_names_are_in_one_table_only() {
        let inventory = Inventory::build(location(), DAS, DDS).unwrap();

        for name in inventory.variables().keys() {
            assert!(!inventory.dimensions().contains_key(name), "{}", name);
        }
    }

    #[test]
    fn test_variable_declared_self_indexed_stays_variable() {
        let das = "Attributes {\n  lev {\n    String units \"hPa\";\n    String coordinates \"lev\";\n  }\n}\n";
        let dds = "Dataset {\n  Float32 lev[lev = 42];\n}\n";

        let inventory = Inventory::build(location(), das, dds).unwrap();

        assert!(inventory.dimensions().is_empty());
        assert_eq!(inventory.variables()["lev"].dims, vec!["lev"]);
    }

    #[test]
    fn test_repeated_section_with_conflicting_units_fails() {
        let das = "Attributes {\n  T {\n    String units \"K\";\n    String coordinates \"TIME\";\n  }\n  T {\n    String units \"C\";\n    String coordinates \"TIME\";\n  }\n}\n";

        let err = Inventory::build(location(), das, "").unwrap_err();
        match err {
            CatalogError::Conflict {
                entity,
                existing,
                incoming,
                ..
            } => {
                assert_eq!(entity, "T");
                assert_eq!(existing, "K");
                assert_eq!(incoming, "C");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_descriptor_rank_change_fails() {
        let dds = "Float32 T[TIME = 8][YDim = 361][XDim = 540];\nFloat32 T[TIME = 8][Height = 42][YDim = 361][XDim = 540];\n";

        let err = Inventory::build(location(), "", dds).unwrap_err();
        assert!(err.is_conflict());
    }

    #[test]
    fn test_summary_lists_contents() {
        let inventory = Inventory::build(location(), DAS, DDS).unwrap();
        let summary = inventory.summary();

        assert!(summary.contains("MAI3CPASM"));
        assert!(summary.contains("Variables: 2"));
        assert!(summary.contains("T (Air temperature) [TIME, Height, YDim, XDim]"));
    }

    #[test]
    fn test_repeated_dimension_section_with_conflicting_units_fails() {
        let das = "Attributes {\n  lat {\n    String units \"degrees_north\";\n  }\n  lat {\n    String units \"radians\";\n  }\n}\n";

        let err = Inventory::build(location(), das, "").unwrap_err();
        match err {
            CatalogError::Conflict {
                entity,
                field,
                existing,
                incoming,
            } => {
                assert_eq!(entity, "lat");
                assert_eq!(field, "units");
                assert_eq!(existing, "degrees_north");
                assert_eq!(incoming, "radians");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_repeated_dimension_section_fills_missing_fields() {
        let das = "Attributes {\n  lat {\n    String units \"degrees_north\";\n  }\n  lat {\n    String long_name \"latitude\";\n  }\n}\n";

        let inventory = Inventory::build(location(), das, "").unwrap();

        assert_eq!(
            inventory.dimensions()["lat"].attributes,
            Attributes::new("latitude", "", "degrees_north")
        );
    }

    #[test]
    fn test_dimension_moved_by_later_coordinates_section_keeps_attributes() {
        let das = "Attributes {\n  lev {\n    String long_name \"level\";\n  }\n  lev {\n    String units \"hPa\";\n    String coordinates \"lev\";\n  }\n}\n";

        let inventory = Inventory::build(location(), das, "").unwrap();

        assert!(inventory.dimensions().is_empty());
        assert_eq!(
            inventory.variables()["lev"].attributes,
            Attributes::new("level", "", "hPa")
        );
    }

    #[test]
    fn test_dimension_moved_by_later_coordinates_section_with_other_units_fails() {
        let das = "Attributes {\n  lev {\n    String units \"hPa\";\n  }\n  lev {\n    String units \"Pa\";\n    String coordinates \"lev\";\n  }\n}\n";

        let err = Inventory::build(location(), das, "").unwrap_err();

        assert!(err.is_conflict());
        let message = err.to_string();
        assert!(message.contains("'lev'"));
        assert!(message.contains("hPa"));
        assert!(message.contains("<<Pa>>"));
    }
}
