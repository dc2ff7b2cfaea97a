//! Report authoring: the draft, its images and location, and submission.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;
use pothole_core::{
    Category, Coordinates, ImageRef, NewReport, ReportDraft, ReportId, ReportService,
    RoadCondition, ServiceError, SessionContext, Severity, ValidationErrors,
};
use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::advisory::Advisory;
use crate::context::ClientContext;
use crate::error::AppError;
use crate::geolocation::GeolocationResolver;
use crate::images::ImageAcquisition;
use crate::ports::{Advisor, Navigator, Route};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionPhase {
    Editing,
    Submitting,
    Succeeded,
    Failed,
}

#[derive(Debug)]
struct ComposerState {
    draft: ReportDraft,
    errors: ValidationErrors,
    phase: SubmissionPhase,
}

/// Render-ready snapshot of the authoring screen.
#[derive(Debug, Clone)]
pub struct ComposerView {
    pub draft: ReportDraft,
    pub errors: ValidationErrors,
    pub phase: SubmissionPhase,
}

impl ComposerView {
    /// The submit affordance is disabled while a submission is in flight.
    pub fn can_submit(&self) -> bool {
        self.phase != SubmissionPhase::Submitting
    }
}

/// Owns one draft for the lifetime of the authoring screen.
///
/// Results that arrive after [`leave`](Self::leave) are dropped.
pub struct ReportComposer {
    service: Arc<dyn ReportService>,
    session: Arc<SessionContext>,
    advisor: Arc<dyn Advisor>,
    navigator: Arc<dyn Navigator>,
    images: ImageAcquisition,
    geolocation: GeolocationResolver,
    state: Mutex<ComposerState>,
    mounted: AtomicBool,
}

impl ReportComposer {
    pub fn new(ctx: &ClientContext) -> Self {
        Self {
            service: Arc::clone(&ctx.service),
            session: Arc::clone(&ctx.session),
            advisor: Arc::clone(&ctx.advisor),
            navigator: Arc::clone(&ctx.navigator),
            images: ImageAcquisition::new(ctx),
            geolocation: GeolocationResolver::new(ctx),
            state: Mutex::new(ComposerState {
                draft: ReportDraft::new(),
                errors: ValidationErrors::default(),
                phase: SubmissionPhase::Editing,
            }),
            mounted: AtomicBool::new(true),
        }
    }

    /// Screen entry: resolve the device location once.
    pub async fn enter(&self) -> Option<Coordinates> {
        debug!("report composer entered");
        self.recenter().await
    }

    /// Screen exit. The draft is abandoned along with any pending results.
    pub fn leave(&self) {
        if self.mounted.swap(false, Ordering::SeqCst) {
            debug!("report composer left");
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted.load(Ordering::SeqCst)
    }

    pub fn view(&self) -> ComposerView {
        let state = self.state.lock();
        ComposerView {
            draft: state.draft.clone(),
            errors: state.errors.clone(),
            phase: state.phase,
        }
    }

    pub fn phase(&self) -> SubmissionPhase {
        self.state.lock().phase
    }

    pub fn errors(&self) -> ValidationErrors {
        self.state.lock().errors.clone()
    }

    pub fn draft(&self) -> ReportDraft {
        self.state.lock().draft.clone()
    }

    // ── Field edits ──

    /// Apply a user edit. A settled outcome (`Failed` or `Succeeded`) gives
    /// way to `Editing`; an in-flight submission keeps its phase.
    fn edit<R>(&self, apply: impl FnOnce(&mut ReportDraft) -> R) -> R {
        let mut state = self.state.lock();
        if matches!(
            state.phase,
            SubmissionPhase::Failed | SubmissionPhase::Succeeded
        ) {
            state.phase = SubmissionPhase::Editing;
        }
        apply(&mut state.draft)
    }

    pub fn set_description(&self, text: impl Into<String>) {
        let text = text.into();
        self.edit(|d| d.description = text);
    }

    pub fn select_category(&self, category: Category) {
        self.edit(|d| d.category = Some(category));
    }

    pub fn select_severity(&self, severity: Severity) {
        self.edit(|d| d.severity = severity);
    }

    pub fn select_road_condition(&self, condition: RoadCondition) {
        self.edit(|d| d.road_condition = condition);
    }

    /// Manual pick on the map.
    pub fn set_location(&self, at: Coordinates, address: Option<String>) {
        self.edit(|d| {
            d.location = at;
            d.address = address;
        });
    }

    // ── Location ──

    /// Resolve the device position and, if still on screen, store it.
    ///
    /// Never fails the caller: on denial or error the draft keeps its
    /// current location and an advisory has been raised.
    pub async fn recenter(&self) -> Option<Coordinates> {
        let resolved = self.geolocation.resolve().await.ok()?;
        if !self.is_mounted() {
            debug!("location resolved after leaving; dropped");
            return None;
        }
        let mut state = self.state.lock();
        state.draft.location = resolved.coordinates;
        if resolved.address.is_some() {
            state.draft.address = resolved.address;
        }
        Some(resolved.coordinates)
    }

    // ── Images ──

    /// Acquire images from camera or library and append them in order.
    ///
    /// Returns how many were appended.
    pub async fn request_image(&self) -> Result<usize, AppError> {
        let free = self.state.lock().draft.remaining_slots();
        let acquired = self.images.request(free).await?;
        if !self.is_mounted() {
            debug!("images acquired after leaving; dropped");
            return Err(AppError::Abandoned);
        }
        let offered = acquired.len();
        let appended = self.edit(|d| d.append_images(acquired));
        if appended < offered {
            warn!(offered, appended, "image limit reached while picking; extra images dropped");
        }
        Ok(appended)
    }

    /// Remove one image by its current position.
    pub fn remove_image(&self, index: usize) -> Option<ImageRef> {
        self.edit(|d| d.remove_image(index))
    }

    // ── Submission ──

    /// Validate and submit the draft.
    ///
    /// Validation failures keep the screen in `Editing` with the error map
    /// stored. Service failures leave the draft untouched and the phase at
    /// `Failed`; the draft stays editable and the next edit or submit moves
    /// on from there. Success discards the draft and returns to the feed.
    pub async fn submit(&self) -> Result<ReportId, AppError> {
        let report = self.begin_submission()?;

        let Some(user) = self.session.current_user() else {
            self.state.lock().phase = SubmissionPhase::Editing;
            warn!(report_id = %report.id, "submit without a session");
            return Err(self.expire_session(AppError::SessionExpired));
        };

        info!(report_id = %report.id, images = report.images.len(), "submitting report");
        let result = self.service.submit_report(&user, &report).await;

        if !self.is_mounted() {
            debug!(report_id = %report.id, "submission finished after leaving; result dropped");
            return result.map_err(AppError::from);
        }

        match result {
            Ok(id) => {
                {
                    let mut state = self.state.lock();
                    state.phase = SubmissionPhase::Succeeded;
                    state.draft = ReportDraft::new();
                    state.errors = ValidationErrors::default();
                }
                info!(report_id = %id, "report submitted");
                self.advisor.advise(Advisory::SubmissionSucceeded);
                self.navigator.replace(Route::Feed);
                Ok(id)
            }
            Err(e) => Err(self.fail_submission(e)),
        }
    }

    fn begin_submission(&self) -> Result<NewReport, AppError> {
        let mut state = self.state.lock();
        if state.phase == SubmissionPhase::Submitting {
            return Err(AppError::SubmissionInFlight);
        }
        match NewReport::try_from(&state.draft) {
            Ok(report) => {
                state.errors = ValidationErrors::default();
                state.phase = SubmissionPhase::Submitting;
                Ok(report)
            }
            Err(errors) => {
                state.errors = errors.clone();
                state.phase = SubmissionPhase::Editing;
                drop(state);
                info!(fields = errors.len(), "draft failed validation");
                self.advisor.advise(Advisory::ValidationFailed);
                Err(AppError::ValidationFailed(errors))
            }
        }
    }

    fn fail_submission(&self, e: ServiceError) -> AppError {
        error!(error = %e, "report submission failed");
        {
            let mut state = self.state.lock();
            // Stays visible until the next edit or submit; the draft remains
            // editable throughout.
            state.phase = SubmissionPhase::Failed;
            if let ServiceError::PermissionDenied(_) = e {
                // Retry under a fresh identity; everything else is kept.
                state.draft.id = ReportId::generate();
            }
        }
        let err = AppError::Service(e);
        if matches!(err, AppError::Service(ServiceError::Unauthenticated)) {
            return self.expire_session(err);
        }
        if let Some(advisory) = err.advisory() {
            self.advisor.advise(advisory);
        }
        err
    }

    fn expire_session(&self, err: AppError) -> AppError {
        self.advisor.advise(Advisory::SessionExpired);
        self.navigator.replace(Route::Login);
        err
    }
}
