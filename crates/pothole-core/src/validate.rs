//! Required-field rules for a report draft.
//!
//! Every rule runs on every pass; the result is a fresh field-keyed map that
//! replaces whatever the caller held before.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::draft::ReportDraft;

/// Minimum description length in characters.
pub const MIN_DESCRIPTION_LEN: usize = 10;

/// Draft fields that can carry a validation error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DraftField {
    Images,
    Description,
    Category,
}

impl DraftField {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Images => "images",
            Self::Description => "description",
            Self::Category => "category",
        }
    }
}

impl fmt::Display for DraftField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Field name to human-readable message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<DraftField, String>);

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, field: DraftField) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn contains(&self, field: DraftField) -> bool {
        self.0.contains_key(&field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (DraftField, &str)> {
        self.0.iter().map(|(f, m)| (*f, m.as_str()))
    }

    fn insert(&mut self, field: DraftField, message: &str) {
        self.0.insert(field, message.to_string());
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in self.iter() {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {message}")?;
            first = false;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Check `draft` against the required-field rules.
///
/// Severity and road condition are never reported: they always hold a value.
pub fn validate(draft: &ReportDraft) -> ValidationErrors {
    let mut errors = ValidationErrors::default();
    if draft.images().is_empty() {
        errors.insert(DraftField::Images, "Please add at least one image");
    }
    if draft.description_len() < MIN_DESCRIPTION_LEN {
        errors.insert(
            DraftField::Description,
            "Description must be at least 10 characters",
        );
    }
    if draft.category.is_none() {
        errors.insert(DraftField::Category, "Please select a pothole category");
    }
    errors
}
