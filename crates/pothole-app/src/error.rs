use std::fmt;

use pothole_core::{MAX_IMAGES, ServiceError, ValidationErrors};
use thiserror::Error;

use crate::advisory::Advisory;

/// Failure reported by a device collaborator (GPS, camera, picker).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct ProviderError(pub String);

impl ProviderError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    Location,
    Camera,
    MediaLibrary,
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Location => "location",
            Self::Camera => "camera",
            Self::MediaLibrary => "media library",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceOp {
    Locate,
    Capture,
    Pick,
}

impl fmt::Display for DeviceOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Locate => "location lookup",
            Self::Capture => "photo capture",
            Self::Pick => "library pick",
        })
    }
}

/// Outcome of a client operation that did not complete.
///
/// By the time a caller sees one of these, the matching advisory has
/// already been raised. None of them leave state half-written.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AppError {
    #[error("{0} permission denied")]
    PermissionDenied(Permission),
    #[error("image limit of {MAX_IMAGES} reached")]
    ImageLimitReached,
    #[error("validation failed: {0}")]
    ValidationFailed(ValidationErrors),
    #[error("cancelled by user")]
    Cancelled,
    #[error("{op} failed: {source}")]
    Device { op: DeviceOp, source: ProviderError },
    #[error("no signed-in user")]
    SessionExpired,
    #[error("a submission is already in progress")]
    SubmissionInFlight,
    #[error("service failure: {0}")]
    Service(#[from] ServiceError),
    #[error("screen was left before the operation finished")]
    Abandoned,
}

impl AppError {
    /// Advisory to show for this error, if any. Cancellation is silent.
    pub fn advisory(&self) -> Option<Advisory> {
        match self {
            Self::PermissionDenied(Permission::Location) => {
                Some(Advisory::LocationPermissionRequired)
            }
            Self::PermissionDenied(Permission::Camera) => Some(Advisory::CameraPermissionRequired),
            Self::PermissionDenied(Permission::MediaLibrary) => {
                Some(Advisory::LibraryPermissionRequired)
            }
            Self::ImageLimitReached => Some(Advisory::MaximumImages),
            Self::ValidationFailed(_) => Some(Advisory::ValidationFailed),
            Self::Device {
                op: DeviceOp::Locate,
                ..
            } => Some(Advisory::LocationUnavailable),
            Self::Device {
                op: DeviceOp::Capture,
                ..
            } => Some(Advisory::CaptureFailed),
            Self::Device {
                op: DeviceOp::Pick, ..
            } => Some(Advisory::PickFailed),
            Self::SessionExpired | Self::Service(ServiceError::Unauthenticated) => {
                Some(Advisory::SessionExpired)
            }
            Self::Service(ServiceError::PermissionDenied(_)) => {
                Some(Advisory::SubmissionForbidden)
            }
            Self::Service(_) => Some(Advisory::SubmissionFailed),
            Self::Cancelled | Self::SubmissionInFlight | Self::Abandoned => None,
        }
    }
}
