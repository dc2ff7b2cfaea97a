//! Contract of the remote report store.

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use crate::draft::ReportDraft;
use crate::report::{Category, PotholeReport, ReportId, ReportStatus, RoadCondition, Severity};
use crate::session::SessionUser;
use crate::validate::{ValidationErrors, validate};

/// Fallback location text when no address was resolved.
pub const UNKNOWN_LOCATION: &str = "Unknown location";

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ServiceError {
    #[error("not authenticated")]
    Unauthenticated,
    #[error("permission denied: {0}")]
    PermissionDenied(String),
    #[error("service rejected request ({status}): {message}")]
    Rejected { status: u16, message: String },
    #[error("transport error: {0}")]
    Transport(String),
    #[error("malformed response: {0}")]
    Malformed(String),
}

/// A validated draft ready to hand to the report service.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewReport {
    pub id: ReportId,
    /// Local image references; the service decides how they are stored.
    pub images: Vec<String>,
    pub location: String,
    pub latitude: f64,
    pub longitude: f64,
    pub description: String,
    pub category: Category,
    pub severity: Severity,
    pub road_condition: RoadCondition,
    pub status: ReportStatus,
}

impl TryFrom<&ReportDraft> for NewReport {
    type Error = ValidationErrors;

    fn try_from(draft: &ReportDraft) -> Result<Self, Self::Error> {
        let errors = validate(draft);
        let category = match draft.category {
            Some(category) if errors.is_empty() => category,
            _ => return Err(errors),
        };
        Ok(Self {
            id: draft.id.clone(),
            images: draft
                .images()
                .iter()
                .map(|img| img.as_str().to_string())
                .collect(),
            location: draft
                .address
                .clone()
                .filter(|a| !a.trim().is_empty())
                .unwrap_or_else(|| UNKNOWN_LOCATION.to_string()),
            latitude: draft.location.latitude,
            longitude: draft.location.longitude,
            description: draft.description.clone(),
            category,
            severity: draft.severity,
            road_condition: draft.road_condition,
            status: ReportStatus::Submitted,
        })
    }
}

/// Remote report store. Implementations own transport, retries, and timeouts.
#[async_trait]
pub trait ReportService: Send + Sync {
    /// Persist a new report on behalf of `user`.
    async fn submit_report(
        &self,
        user: &SessionUser,
        report: &NewReport,
    ) -> Result<ReportId, ServiceError>;

    /// The full report collection in server order.
    async fn get_all_reports(&self) -> Result<Vec<PotholeReport>, ServiceError>;

    /// `true` when the server confirmed the increment.
    async fn like_report(&self, id: &ReportId) -> bool;
}
