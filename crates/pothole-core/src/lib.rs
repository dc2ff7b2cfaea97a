pub mod draft;
pub mod feed;
pub mod report;
pub mod service;
pub mod session;
pub mod validate;

pub use draft::{FALLBACK_COORDINATES, ImageRef, MAX_IMAGES, ReportDraft};
pub use feed::FeedFilter;
pub use report::{
    Category, Coordinates, PotholeReport, Profile, ReportId, ReportStatus, RoadCondition, Severity,
};
pub use service::{NewReport, ReportService, ServiceError};
pub use session::{SessionContext, SessionUser};
pub use validate::{DraftField, ValidationErrors, validate};
