use tracing::debug;

use crate::readers::das_reader::EntityKind;
use crate::utils::constants::FLOAT_TYPES;

/// One floating-point array declaration from descriptor text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DdsField {
    pub name: String,
    /// Dimension names in declaration order; sizes are not kept
    pub dims: Vec<String>,
    pub kind: EntityKind,
}

impl DdsField {
    fn new(name: String, dims: Vec<String>) -> Self {
        // An array indexed only by itself is a coordinate axis
        let kind = if dims.len() == 1 && dims[0] == name {
            EntityKind::Dimension
        } else {
            EntityKind::Variable
        };

        Self { name, dims, kind }
    }

    pub fn ndims(&self) -> usize {
        self.dims.len()
    }
}

pub struct DdsReader;

impl DdsReader {
    pub fn new() -> Self {
        Self
    }

    /// Read every `Float32`/`Float64` array declaration, in order.
    ///
    /// Integer and string fields, structure headers and anything else are skipped.
    pub fn read_fields(&self, text: &str) -> Vec<DdsField> {
        let mut fields = Vec::new();

        for line in text.lines() {
            if line.trim().is_empty() {
                continue;
            }

            if let Some(field) = self.parse_field_line(line) {
                debug!(
                    "DDS field {} {:?} ({:?})",
                    field.name, field.dims, field.kind
                );
                fields.push(field);
            }
        }

        fields
    }

    /// Parse a single declaration line
    /// Expected format: Float32 TLML[time = 8][lat = 361][lon = 540];
    fn parse_field_line(&self, line: &str) -> Option<DdsField> {
        let rest = line.trim_start();
        let type_end = rest.find(char::is_whitespace)?;
        let (field_type, rest) = rest.split_at(type_end);
        if !FLOAT_TYPES.contains(&field_type) {
            return None;
        }

        let body = rest.trim().strip_suffix(';')?;

        let name_end = body
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
            .unwrap_or(body.len());
        let name = &body[..name_end];
        if !name.starts_with(|c: char| c.is_ascii_alphabetic()) {
            return None;
        }

        let dims = parse_dimensions(&body[name_end..]);
        if dims.is_empty() {
            return None;
        }

        Some(DdsField::new(name.to_string(), dims))
    }
}

impl Default for DdsReader {
    fn default() -> Self {
        Self::new()
    }
}

/// Consume `[name = size]` groups left to right, stopping at the first one
/// that does not parse.
fn parse_dimensions(mut rest: &str) -> Vec<String> {
    let mut dims = Vec::new();

    while let Some((dim, remainder)) = parse_dimension_group(rest) {
        dims.push(dim.to_string());
        rest = remainder;
    }

    dims
}

fn parse_dimension_group(text: &str) -> Option<(&str, &str)> {
    let inner_start = text.trim_start().strip_prefix('[')?;
    let close = inner_start.find(']')?;
    let (inner, remainder) = (&inner_start[..close], &inner_start[close + 1..]);

    let (dim, size) = inner.split_once('=')?;
    let dim = dim.trim();
    let size = size.trim();

    let valid_dim = !dim.is_empty() && dim.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    let valid_size = !size.is_empty() && size.chars().all(|c| c.is_ascii_digit());
    if !valid_dim || !valid_size {
        return None;
    }

    Some((dim, remainder))
}
