//! Client-side controllers for capturing pothole reports and browsing the
//! shared feed.
//!
//! Every controller is built from a [`ClientContext`] holding the report
//! service, the session, and the device and UI collaborators. Nothing here
//! draws a screen; state is read back through view snapshots.

pub mod advisory;
pub mod composer;
pub mod context;
pub mod error;
pub mod feed;
pub mod geolocation;
pub mod images;
pub mod likes;
pub mod ports;

#[cfg(test)]
mod testing;

pub use advisory::Advisory;
pub use composer::{ComposerView, ReportComposer, SubmissionPhase};
pub use context::ClientContext;
pub use error::{AppError, DeviceOp, Permission, ProviderError};
pub use feed::{FeedController, FeedView, FetchTrigger};
pub use geolocation::{GeolocationResolver, ResolvedLocation};
pub use images::ImageAcquisition;
pub use likes::{LikeLedger, LikeOutcome};
pub use ports::{
    Accuracy, Advisor, CaptureOptions, GeocodedAddress, ImageProvider, ImageSource,
    LibraryOptions, LocationProvider, MapView, Navigator, PermissionStatus, Route,
};
