//! Camera capture and library selection for the draft.

use std::sync::Arc;

use pothole_core::ImageRef;
use tracing::{debug, info, warn};

use crate::context::ClientContext;
use crate::error::{AppError, DeviceOp, Permission};
use crate::ports::{Advisor, CaptureOptions, ImageProvider, ImageSource, LibraryOptions};

/// Mediates between the image collaborators and the draft's free slots.
///
/// It never touches the draft: the caller appends what comes back, and the
/// draft clamps again in case another pick finished first.
pub struct ImageAcquisition {
    provider: Arc<dyn ImageProvider>,
    advisor: Arc<dyn Advisor>,
}

impl ImageAcquisition {
    pub fn new(ctx: &ClientContext) -> Self {
        Self {
            provider: Arc::clone(&ctx.images),
            advisor: Arc::clone(&ctx.advisor),
        }
    }

    /// Offer camera or library for up to `free_slots` images.
    ///
    /// With no free slots the request is refused before any picker opens.
    pub async fn request(&self, free_slots: usize) -> Result<Vec<ImageRef>, AppError> {
        let result = self.acquire(free_slots).await;
        match &result {
            Ok(images) => info!(count = images.len(), "images acquired"),
            Err(AppError::Cancelled) => debug!("image request cancelled"),
            Err(err) => {
                warn!(error = %err, "image request failed");
                if let Some(advisory) = err.advisory() {
                    self.advisor.advise(advisory);
                }
            }
        }
        result
    }

    async fn acquire(&self, free_slots: usize) -> Result<Vec<ImageRef>, AppError> {
        if free_slots == 0 {
            return Err(AppError::ImageLimitReached);
        }
        let source = self
            .provider
            .choose_source()
            .await
            .ok_or(AppError::Cancelled)?;

        if !self.provider.request_permission(source).await.is_granted() {
            return Err(AppError::PermissionDenied(match source {
                ImageSource::Camera => Permission::Camera,
                ImageSource::Library => Permission::MediaLibrary,
            }));
        }

        let images = match source {
            ImageSource::Camera => self
                .provider
                .capture_from_camera(&CaptureOptions::default())
                .await
                .map_err(|source| AppError::Device {
                    op: DeviceOp::Capture,
                    source,
                })?
                .map(|image| vec![image]),
            ImageSource::Library => self
                .provider
                .pick_from_library(&LibraryOptions::with_quota(free_slots))
                .await
                .map_err(|source| AppError::Device {
                    op: DeviceOp::Pick,
                    source,
                })?,
        };

        match images {
            Some(mut images) if !images.is_empty() => {
                images.truncate(free_slots);
                Ok(images)
            }
            _ => Err(AppError::Cancelled),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::advisory::Advisory;
    use crate::error::ProviderError;
    use crate::ports::PermissionStatus;
    use crate::testing::{Harness, uris};

    #[tokio::test]
    async fn full_draft_never_opens_a_picker() {
        let h = Harness::new();
        let err = ImageAcquisition::new(&h.ctx).request(0).await.unwrap_err();
        assert_eq!(err, AppError::ImageLimitReached);
        assert_eq!(h.images.source_prompts(), 0);
        assert_eq!(h.ui.advisories(), vec![Advisory::MaximumImages]);
    }

    #[tokio::test]
    async fn camera_capture_returns_one_image() {
        let h = Harness::new();
        h.images.set_source(Some(ImageSource::Camera));
        h.images.set_capture(Ok(Some(ImageRef::new("file:///cam.jpg"))));

        let got = ImageAcquisition::new(&h.ctx).request(5).await.unwrap();
        assert_eq!(got, vec![ImageRef::new("file:///cam.jpg")]);
    }

    #[tokio::test]
    async fn camera_denial_aborts_with_advisory() {
        let h = Harness::new();
        h.images.set_source(Some(ImageSource::Camera));
        h.images.set_permission(PermissionStatus::Denied);

        let err = ImageAcquisition::new(&h.ctx).request(5).await.unwrap_err();
        assert_eq!(err, AppError::PermissionDenied(Permission::Camera));
        assert_eq!(h.ui.advisories(), vec![Advisory::CameraPermissionRequired]);
        assert_eq!(h.images.captures(), 0);
    }

    #[tokio::test]
    async fn library_quota_is_clamped_to_free_slots() {
        let h = Harness::new();
        h.images.set_library(Ok(Some(uris("lib", 2))));

        let got = ImageAcquisition::new(&h.ctx).request(2).await.unwrap();
        assert_eq!(got.len(), 2);
        assert_eq!(h.images.library_quotas(), vec![2]);
    }

    #[tokio::test]
    async fn oversized_library_result_is_truncated() {
        let h = Harness::new();
        h.images.set_library(Ok(Some(uris("lib", 4))));

        let got = ImageAcquisition::new(&h.ctx).request(1).await.unwrap();
        assert_eq!(got, uris("lib", 1));
    }

    #[tokio::test]
    async fn cancellation_is_silent() {
        let h = Harness::new();
        h.images.set_source(None);
        assert_eq!(
            ImageAcquisition::new(&h.ctx).request(5).await.unwrap_err(),
            AppError::Cancelled
        );

        h.images.set_source(Some(ImageSource::Library));
        h.images.set_library(Ok(None));
        assert_eq!(
            ImageAcquisition::new(&h.ctx).request(5).await.unwrap_err(),
            AppError::Cancelled
        );
        assert!(h.ui.advisories().is_empty());
    }

    #[tokio::test]
    async fn picker_failure_is_advised() {
        let h = Harness::new();
        h.images.set_library(Err(ProviderError::new("picker crashed")));

        assert!(ImageAcquisition::new(&h.ctx).request(5).await.is_err());
        assert_eq!(h.ui.advisories(), vec![Advisory::PickFailed]);
    }
}
