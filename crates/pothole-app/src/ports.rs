//! Collaborators the client core talks to: device services and the UI shell.
//!
//! Device traits are async and may suspend; UI traits are fire-and-forget.

use async_trait::async_trait;
use pothole_core::draft::{CAPTURE_ASPECT, IMAGE_QUALITY};
use pothole_core::{Coordinates, ImageRef};
use serde::Serialize;

use crate::advisory::Advisory;
use crate::error::ProviderError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionStatus {
    Granted,
    Denied,
}

impl PermissionStatus {
    pub fn is_granted(&self) -> bool {
        matches!(self, Self::Granted)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Accuracy {
    Balanced,
    High,
}

/// One reverse-geocoding candidate. Every part is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeocodedAddress {
    pub street: Option<String>,
    pub city: Option<String>,
    pub region: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
}

impl GeocodedAddress {
    /// `street, city, region postal, country` with empty parts dropped.
    pub fn format(&self) -> String {
        let part = |p: &Option<String>| p.as_deref().map(str::trim).unwrap_or("").to_string();
        let region_postal = format!("{} {}", part(&self.region), part(&self.postal_code))
            .trim()
            .to_string();
        [
            part(&self.street),
            part(&self.city),
            region_postal,
            part(&self.country),
        ]
        .into_iter()
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
    }
}

#[async_trait]
pub trait LocationProvider: Send + Sync {
    async fn request_foreground_permission(&self) -> PermissionStatus;

    async fn current_position(&self, accuracy: Accuracy) -> Result<Coordinates, ProviderError>;

    async fn reverse_geocode(
        &self,
        _at: Coordinates,
    ) -> Result<Vec<GeocodedAddress>, ProviderError> {
        Ok(Vec::new())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageSource {
    Camera,
    Library,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CaptureOptions {
    pub quality: f32,
    pub allows_editing: bool,
    pub aspect: (u8, u8),
}

impl Default for CaptureOptions {
    fn default() -> Self {
        Self {
            quality: IMAGE_QUALITY,
            allows_editing: true,
            aspect: CAPTURE_ASPECT,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LibraryOptions {
    pub quality: f32,
    pub allows_multiple_selection: bool,
    /// Selection quota; never more than the draft's free slots.
    pub max_count: usize,
}

impl LibraryOptions {
    pub fn with_quota(max_count: usize) -> Self {
        Self {
            quality: IMAGE_QUALITY,
            allows_multiple_selection: true,
            max_count,
        }
    }
}

/// Camera and photo library. `None` from a picker means the user cancelled.
#[async_trait]
pub trait ImageProvider: Send + Sync {
    /// Ask the user where the image should come from.
    async fn choose_source(&self) -> Option<ImageSource>;

    async fn request_permission(&self, source: ImageSource) -> PermissionStatus;

    async fn capture_from_camera(
        &self,
        options: &CaptureOptions,
    ) -> Result<Option<ImageRef>, ProviderError>;

    async fn pick_from_library(
        &self,
        options: &LibraryOptions,
    ) -> Result<Option<Vec<ImageRef>>, ProviderError>;
}

/// Non-blocking, dismissable user feedback.
pub trait Advisor: Send + Sync {
    fn advise(&self, advisory: Advisory);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Route {
    Feed,
    Login,
}

pub trait Navigator: Send + Sync {
    fn go_back(&self);
    fn replace(&self, route: Route);
}

pub trait MapView: Send + Sync {
    fn recenter(&self, at: Coordinates);
}
