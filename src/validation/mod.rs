pub mod boundary;
pub mod coordinates;
pub mod production;
pub mod report;
pub mod sanitize;

pub use boundary::validate_boundary;
pub use coordinates::{parse_ring, validate_coordinates};
pub use production::validate_production;
pub use report::ValidationReport;
pub use sanitize::sanitize_input;

use crate::survey::model::PLACEHOLDER;

/// Missing, blank, or still showing the "Select..." placeholder.
pub(crate) fn is_unset(value: Option<&str>) -> bool {
    match value.map(str::trim) {
        None => true,
        Some(v) => v.is_empty() || v == PLACEHOLDER,
    }
}
