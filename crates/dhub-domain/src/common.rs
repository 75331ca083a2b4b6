//! Shared traits and label parsing errors for donation primitives.

use std::fmt;

use uuid::Uuid;

/// Exposes a stable identifier for entities stored in the ledger.
pub trait Identifiable {
    fn id(&self) -> Uuid;
}

/// Supplies a common contract for retrieving numeric amounts.
pub trait Amounted {
    fn amount(&self) -> f64;
}

/// Converts an entity into a user-facing display label.
pub trait Displayable {
    fn display_label(&self) -> String;
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Errors raised when a label does not belong to one of the closed sets.
pub enum LabelError {
    UnknownCategory(String),
    UnknownRegion(String),
}

impl fmt::Display for LabelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LabelError::UnknownCategory(value) => write!(f, "unknown category `{value}`"),
            LabelError::UnknownRegion(value) => write!(f, "unknown region `{value}`"),
        }
    }
}

impl std::error::Error for LabelError {}

/// Lowercases and strips separators so `J Area`, `j-area` and `JAREA` compare equal.
pub(crate) fn normalize_label(value: &str) -> String {
    value
        .trim()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}
