//! Attribute text (DAS) reader.
//!
//! A DAS page is one `Attributes { ... }` block holding a section per
//! variable, dimension or file-level metadata group:
//!
//! ```text
//! Attributes {
//!     HDF_GLOBAL {
//!         String HDFEOSVersion "HDFEOS_V2.14";
//!     }
//!     T {
//!         String long_name "Air temperature";
//!         String units "K";
//!         String coordinates "TIME Height YDim XDim";
//!     }
//! }
//! ```
//!
//! Sections carrying a `coordinates` attribute are variables; the rest are
//! taken to be dimensions until the descriptor text says otherwise.

use tracing::debug;

use crate::models::Attributes;
use crate::utils::constants::{
    ATTR_COORDINATES, ATTR_LONG_NAME, ATTR_STANDARD_NAME, ATTR_UNITS, METADATA_SECTIONS,
};

/// Whether a parsed section describes a data variable or a coordinate axis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Variable,
    Dimension,
}

/// One closed entity section, in the order it appeared
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DasEntity {
    pub name: String,
    pub attributes: Attributes,
    pub kind: EntityKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DasState {
    /// Before `Attributes {`
    Outside,
    /// Looking for section headers
    Top,
    InEntity,
    /// Inside a file-level metadata section; only braces are counted
    SkipMetadata,
}

/// Entity whose section is still open
struct PendingEntity {
    name: String,
    attributes: Attributes,
    has_coordinates: bool,
}

impl PendingEntity {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            attributes: Attributes::default(),
            has_coordinates: false,
        }
    }

    fn close(self) -> DasEntity {
        let kind = if self.has_coordinates {
            EntityKind::Variable
        } else {
            EntityKind::Dimension
        };

        DasEntity {
            name: self.name,
            attributes: self.attributes,
            kind,
        }
    }
}

struct DasScanner<'a> {
    metadata_sections: &'a [&'a str],
    state: DasState,
    depth: usize,
    pending: Option<PendingEntity>,
    entities: Vec<DasEntity>,
}

impl<'a> DasScanner<'a> {
    fn new(metadata_sections: &'a [&'a str]) -> Self {
        Self {
            metadata_sections,
            state: DasState::Outside,
            depth: 0,
            pending: None,
            entities: Vec::new(),
        }
    }

    fn feed(&mut self, line: &str) {
        match self.state {
            DasState::Outside => {
                if section_header(line) == Some("Attributes") {
                    self.state = DasState::Top;
                }
            }
            DasState::Top => {
                if let Some(name) = section_header(line) {
                    self.depth += 1;
                    if self.metadata_sections.contains(&name) {
                        self.state = DasState::SkipMetadata;
                    } else {
                        self.pending = Some(PendingEntity::new(name));
                        self.state = DasState::InEntity;
                    }
                } else if is_close_brace(line) {
                    // end of the Attributes block
                    self.state = DasState::Outside;
                    self.depth = 0;
                }
            }
            DasState::InEntity => {
                if is_close_brace(line) {
                    if self.depth == 1 {
                        if let Some(pending) = self.pending.take() {
                            let entity = pending.close();
                            debug!("DAS section {} closed as {:?}", entity.name, entity.kind);
                            self.entities.push(entity);
                        }
                        self.state = DasState::Top;
                    }
                    self.depth = self.depth.saturating_sub(1);
                } else if opens_block(line) {
                    self.depth += 1;
                } else if let Some((attr, value)) = string_attribute(line) {
                    self.record_attribute(attr, value);
                }
            }
            DasState::SkipMetadata => {
                if is_close_brace(line) {
                    self.depth = self.depth.saturating_sub(1);
                    if self.depth == 0 {
                        self.state = DasState::Top;
                    }
                } else if opens_block(line) {
                    self.depth += 1;
                }
            }
        }
    }

    fn record_attribute(&mut self, attr: &str, value: &str) {
        let Some(pending) = self.pending.as_mut() else {
            return;
        };

        match attr {
            ATTR_COORDINATES => pending.has_coordinates = true,
            ATTR_LONG_NAME | ATTR_STANDARD_NAME | ATTR_UNITS => {
                if let Some(text) = quoted(value) {
                    let slot = match attr {
                        ATTR_LONG_NAME => &mut pending.attributes.long_name,
                        ATTR_STANDARD_NAME => &mut pending.attributes.standard_name,
                        _ => &mut pending.attributes.units,
                    };
                    *slot = text.to_string();
                }
            }
            _ => {}
        }
    }

    fn finish(self) -> Vec<DasEntity> {
        if let Some(pending) = self.pending {
            debug!("DAS text ended inside section {}; section dropped", pending.name);
        }
        self.entities
    }
}

pub struct DasReader {
    metadata_sections: &'static [&'static str],
}

impl DasReader {
    pub fn new() -> Self {
        Self {
            metadata_sections: METADATA_SECTIONS,
        }
    }

    /// Scan DAS text and return every closed variable/dimension section.
    ///
    /// Lines that fit none of the recognized shapes are ignored.
    pub fn read_entities(&self, text: &str) -> Vec<DasEntity> {
        let mut scanner = DasScanner::new(self.metadata_sections);
        for line in text.lines() {
            scanner.feed(line);
        }
        scanner.finish()
    }
}

impl Default for DasReader {
    fn default() -> Self {
        Self::new()
    }
}

/// `Name {` with the name made of letters, digits and underscores
fn section_header(line: &str) -> Option<&str> {
    let rest = line.trim_start();
    let end = rest
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .unwrap_or(rest.len());
    if end == 0 {
        return None;
    }

    let (name, after) = rest.split_at(end);
    after.trim_start().starts_with('{').then_some(name)
}

fn is_close_brace(line: &str) -> bool {
    line.trim() == "}"
}

fn opens_block(line: &str) -> bool {
    line.trim_end().ends_with('{')
}

/// `String <attr> <value>` -> (attr, value)
fn string_attribute(line: &str) -> Option<(&str, &str)> {
    let rest = line.trim_start().strip_prefix("String")?.trim_start();
    let end = rest
        .find(|c: char| c.is_whitespace() || c == '"')
        .unwrap_or(rest.len());
    if end == 0 {
        return None;
    }

    let (attr, value) = rest.split_at(end);
    Some((attr, value.trim()))
}

/// `"text";` -> text
fn quoted(value: &str) -> Option<&str> {
    value
        .strip_suffix(';')?
        .trim_end()
        .strip_prefix('"')?
        .strip_suffix('"')
}
