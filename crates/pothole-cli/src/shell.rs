//! Terminal stand-ins for the device and UI collaborators.

use std::path::PathBuf;

use async_trait::async_trait;
use pothole_app::{
    Accuracy, Advisor, Advisory, CaptureOptions, ImageProvider, ImageSource, LibraryOptions,
    LocationProvider, MapView, Navigator, PermissionStatus, ProviderError, Route,
};
use pothole_core::{Coordinates, ImageRef};
use tracing::{debug, info};

/// Advisories go to stderr; navigation and map moves are logged.
pub struct ConsoleUi;

impl Advisor for ConsoleUi {
    fn advise(&self, advisory: Advisory) {
        eprintln!("{}: {}", advisory.title(), advisory.message());
    }
}

impl Navigator for ConsoleUi {
    fn go_back(&self) {
        debug!("navigate back");
    }

    fn replace(&self, route: Route) {
        info!(?route, "navigate");
    }
}

impl MapView for ConsoleUi {
    fn recenter(&self, at: Coordinates) {
        debug!(%at, "map recentred");
    }
}

/// Position given on the command line. Without one, permission is denied.
pub struct FixedLocation {
    position: Option<Coordinates>,
}

impl FixedLocation {
    pub fn new(position: Option<Coordinates>) -> Self {
        Self { position }
    }
}

#[async_trait]
impl LocationProvider for FixedLocation {
    async fn request_foreground_permission(&self) -> PermissionStatus {
        match self.position {
            Some(_) => PermissionStatus::Granted,
            None => PermissionStatus::Denied,
        }
    }

    async fn current_position(&self, _accuracy: Accuracy) -> Result<Coordinates, ProviderError> {
        self.position
            .ok_or_else(|| ProviderError::new("no position given"))
    }
}

/// Treats `--image` paths as the photo library selection.
pub struct FileImages {
    paths: Vec<PathBuf>,
}

impl FileImages {
    pub fn new(paths: Vec<PathBuf>) -> Self {
        Self { paths }
    }
}

#[async_trait]
impl ImageProvider for FileImages {
    async fn choose_source(&self) -> Option<ImageSource> {
        (!self.paths.is_empty()).then_some(ImageSource::Library)
    }

    async fn request_permission(&self, _source: ImageSource) -> PermissionStatus {
        PermissionStatus::Granted
    }

    async fn capture_from_camera(
        &self,
        _options: &CaptureOptions,
    ) -> Result<Option<ImageRef>, ProviderError> {
        Err(ProviderError::new("no camera on this device"))
    }

    async fn pick_from_library(
        &self,
        options: &LibraryOptions,
    ) -> Result<Option<Vec<ImageRef>>, ProviderError> {
        let mut picked = Vec::new();
        for path in self.paths.iter().take(options.max_count) {
            let path = std::path::absolute(path)
                .map_err(|e| ProviderError::new(format!("{}: {e}", path.display())))?;
            if !path.is_file() {
                return Err(ProviderError::new(format!("{} is not a file", path.display())));
            }
            picked.push(ImageRef::new(format!("file://{}", path.display())));
        }
        Ok(Some(picked))
    }
}
