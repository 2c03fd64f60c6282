use serde::Serialize;

use crate::models::{LocationCode, Variable};
use crate::processors::Catalog;
use crate::utils::constants::{FIELD_SEPARATOR, LOCATION_FIELD_SEPARATOR, LOCATION_SEPARATOR};

#[derive(Debug, Clone, Default, Serialize)]
pub struct IntegrityReport {
    pub total_variables: usize,
    pub total_locations: usize,
    pub valid_variables: usize,
    pub violations: Vec<CatalogViolation>,
}

impl IntegrityReport {
    pub fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }

    /// Violations that would make the written catalog unreadable
    pub fn has_errors(&self) -> bool {
        self.violations
            .iter()
            .any(|v| v.violation_type != ViolationType::SeparatorInField)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CatalogViolation {
    pub variable: String,
    pub violation_type: ViolationType,
    pub details: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ViolationType {
    RankMismatch,
    NoLocations,
    PriorityOrder,
    /// Reported only; the line format has no escaping
    SeparatorInField,
}

pub struct IntegrityChecker;

impl IntegrityChecker {
    pub fn new() -> Self {
        Self
    }

    /// Check a built catalog before it is written
    pub fn check_catalog(&self, catalog: &Catalog) -> IntegrityReport {
        let mut report = IntegrityReport {
            total_variables: catalog.len(),
            total_locations: catalog.location_count(),
            ..IntegrityReport::default()
        };

        for variable in catalog.variables() {
            let before = report.violations.len();

            self.check_rank(variable, &mut report);
            self.check_locations(variable, &mut report);
            self.check_separators(variable, &mut report);

            if report.violations.len() == before {
                report.valid_variables += 1;
            }
        }

        report
    }

    fn check_rank(&self, variable: &Variable, report: &mut IntegrityReport) {
        if !variable.dims.is_empty() && variable.ndims != variable.dims.len() {
            report.violations.push(CatalogViolation {
                variable: variable.name.clone(),
                violation_type: ViolationType::RankMismatch,
                details: format!(
                    "ndims {} but {} dimensions listed",
                    variable.ndims,
                    variable.dims.len()
                ),
            });
        }
    }

    fn check_locations(&self, variable: &Variable, report: &mut IntegrityReport) {
        if variable.locations.is_empty() {
            report.violations.push(CatalogViolation {
                variable: variable.name.clone(),
                violation_type: ViolationType::NoLocations,
                details: "no locations".to_string(),
            });
            return;
        }

        for window in variable.locations.windows(2) {
            if window[0].priority() < window[1].priority() {
                report.violations.push(CatalogViolation {
                    variable: variable.name.clone(),
                    violation_type: ViolationType::PriorityOrder,
                    details: format!(
                        "{} listed before better location {}",
                        window[0].collection_code(),
                        window[1].collection_code()
                    ),
                });
            }
        }
    }

    fn check_separators(&self, variable: &Variable, report: &mut IntegrityReport) {
        let attributes = &variable.attributes;
        let mut fields = vec![
            ("name", variable.name.as_str()),
            ("standard_name", attributes.standard_name.as_str()),
            ("long_name", attributes.long_name.as_str()),
            ("units", attributes.units.as_str()),
        ];
        fields.extend(variable.locations.iter().flat_map(location_fields));

        for (field, value) in fields {
            if contains_separator(value) {
                report.violations.push(CatalogViolation {
                    variable: variable.name.clone(),
                    violation_type: ViolationType::SeparatorInField,
                    details: format!("{} '{}' contains a separator character", field, value),
                });
            }
        }
    }

    pub fn generate_summary(&self, report: &IntegrityReport) -> String {
        let mut summary = String::new();

        summary.push_str("=== Catalog Integrity Report ===\n");
        summary.push_str(&format!("Variables: {}\n", report.total_variables));
        summary.push_str(&format!("Locations: {}\n", report.total_locations));
        summary.push_str(&format!(
            "Valid Variables: {} ({:.1}%)\n",
            report.valid_variables,
            percentage(report.valid_variables, report.total_variables)
        ));
        summary.push_str(&format!("\nViolations: {}\n", report.violations.len()));

        if !report.violations.is_empty() {
            summary.push_str("\nTop 10 Violations:\n");
            for (i, violation) in report.violations.iter().take(10).enumerate() {
                summary.push_str(&format!(
                    "  {}. {} ({:?}): {}\n",
                    i + 1,
                    violation.variable,
                    violation.violation_type,
                    violation.details
                ));
            }
        }

        summary
    }
}

impl Default for IntegrityChecker {
    fn default() -> Self {
        Self::new()
    }
}

fn location_fields(location: &LocationCode) -> [(&'static str, &str); 3] {
    [
        ("base_url", location.base_url()),
        ("collection_code", location.collection_code()),
        ("tag", location.tag()),
    ]
}

fn contains_separator(value: &str) -> bool {
    value.contains(FIELD_SEPARATOR as char)
        || value.contains(LOCATION_SEPARATOR)
        || value.contains(LOCATION_FIELD_SEPARATOR)
}

fn percentage(part: usize, total: usize) -> f64 {
    if total == 0 {
        return 100.0;
    }
    100.0 * part as f64 / total as f64
}
