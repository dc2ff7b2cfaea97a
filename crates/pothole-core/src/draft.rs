//! The in-progress report held by the authoring screen.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::report::{Category, Coordinates, ReportId, RoadCondition, Severity};

/// Upper bound on images attached to one report.
pub const MAX_IMAGES: usize = 5;

/// Location used until the device position has been resolved.
pub const FALLBACK_COORDINATES: Coordinates = Coordinates::new(44.6488, -63.5752);

/// Compression hint passed to image collaborators. Fixed; no transcoding policy.
pub const IMAGE_QUALITY: f32 = 0.8;

/// Crop aspect offered by the camera editor.
pub const CAPTURE_ASPECT: (u8, u8) = (4, 3);

/// Opaque reference to an acquired image (a local file URI until uploaded).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageRef(String);

impl ImageRef {
    pub fn new(uri: impl Into<String>) -> Self {
        Self(uri.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Draft report. Never persisted; discarded on success or when the screen
/// is left.
///
/// `images` is private so the five-image bound cannot be bypassed.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportDraft {
    pub id: ReportId,
    images: Vec<ImageRef>,
    pub description: String,
    pub category: Option<Category>,
    pub severity: Severity,
    pub road_condition: RoadCondition,
    pub location: Coordinates,
    pub address: Option<String>,
}

impl Default for ReportDraft {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportDraft {
    pub fn new() -> Self {
        Self {
            id: ReportId::generate(),
            images: Vec::new(),
            description: String::new(),
            category: None,
            severity: Severity::default(),
            road_condition: RoadCondition::default(),
            location: FALLBACK_COORDINATES,
            address: None,
        }
    }

    pub fn images(&self) -> &[ImageRef] {
        &self.images
    }

    pub fn is_full(&self) -> bool {
        self.images.len() >= MAX_IMAGES
    }

    pub fn remaining_slots(&self) -> usize {
        MAX_IMAGES.saturating_sub(self.images.len())
    }

    /// Append images in acquisition order, dropping any that would exceed
    /// [`MAX_IMAGES`]. Returns how many were kept.
    pub fn append_images<I>(&mut self, images: I) -> usize
    where
        I: IntoIterator<Item = ImageRef>,
    {
        let room = self.remaining_slots();
        let before = self.images.len();
        self.images.extend(images.into_iter().take(room));
        self.images.len() - before
    }

    /// Remove the image at `index`. Out-of-range indices are ignored.
    pub fn remove_image(&mut self, index: usize) -> Option<ImageRef> {
        (index < self.images.len()).then(|| self.images.remove(index))
    }

    /// Description length as the user perceives it (characters, not bytes).
    pub fn description_len(&self) -> usize {
        self.description.chars().count()
    }
}
