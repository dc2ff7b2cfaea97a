//! User-facing advisories raised by the client core.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Advisory {
    LocationPermissionRequired,
    LocationUnavailable,
    CameraPermissionRequired,
    LibraryPermissionRequired,
    MaximumImages,
    CaptureFailed,
    PickFailed,
    ValidationFailed,
    SessionExpired,
    SubmissionForbidden,
    SubmissionSucceeded,
    SubmissionFailed,
}

impl Advisory {
    pub fn title(&self) -> &'static str {
        match self {
            Self::LocationPermissionRequired => "Location Permission Required",
            Self::CameraPermissionRequired | Self::LibraryPermissionRequired => {
                "Permission Required"
            }
            Self::MaximumImages => "Maximum Images",
            Self::ValidationFailed => "Validation Error",
            Self::SessionExpired => "Session Expired",
            Self::SubmissionForbidden => "Permission Error",
            Self::SubmissionSucceeded => "Success",
            Self::LocationUnavailable
            | Self::CaptureFailed
            | Self::PickFailed
            | Self::SubmissionFailed => "Error",
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Self::LocationPermissionRequired => {
                "Please enable location services to accurately report pothole locations."
            }
            Self::LocationUnavailable => "Failed to fetch location. Please try again.",
            Self::CameraPermissionRequired => "Camera permission is required to take photos.",
            Self::LibraryPermissionRequired => {
                "Photo library permission is required to choose photos."
            }
            Self::MaximumImages => "You can only upload up to 5 images.",
            Self::CaptureFailed => "Failed to take photo. Please try again.",
            Self::PickFailed => "Failed to pick images. Please try again.",
            Self::ValidationFailed => "Please fill in all required fields correctly.",
            Self::SessionExpired => "Please log in again to continue.",
            Self::SubmissionForbidden => {
                "You don't have permission to submit this report. Please try creating a new report."
            }
            Self::SubmissionSucceeded => {
                "Thank you for reporting this pothole. Your report has been submitted successfully."
            }
            Self::SubmissionFailed => {
                "Failed to submit report. Please check your connection and try again."
            }
        }
    }
}
