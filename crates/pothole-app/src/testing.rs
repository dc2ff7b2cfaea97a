//! Scripted collaborators for controller tests.
//!
//! Every fake answers from a queue of steps; a step may carry a oneshot gate
//! so a test can hold one call open while others run.

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use parking_lot::Mutex;
use pothole_core::{
    Coordinates, ImageRef, NewReport, PotholeReport, ReportId, ReportService, ReportStatus,
    ServiceError, SessionContext, SessionUser, Severity,
};
use tokio::sync::oneshot;

use crate::advisory::Advisory;
use crate::context::ClientContext;
use crate::error::ProviderError;
use crate::ports::{
    Accuracy, Advisor, CaptureOptions, GeocodedAddress, ImageProvider, ImageSource,
    LibraryOptions, LocationProvider, MapView, Navigator, PermissionStatus, Route,
};

pub(crate) fn uris(prefix: &str, n: usize) -> Vec<ImageRef> {
    (0..n)
        .map(|i| ImageRef::new(format!("file:///{prefix}{i}.jpg")))
        .collect()
}

pub(crate) fn report(id: &str, location: &str, likes: u32) -> PotholeReport {
    let created = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
    PotholeReport {
        id: ReportId::new(id),
        user_id: None,
        location: location.into(),
        latitude: 44.6488,
        longitude: -63.5752,
        description: format!("Pothole on {location}"),
        category: "Surface Break".into(),
        severity: Severity::Medium,
        road_condition: "Dry".into(),
        status: ReportStatus::Submitted,
        images: vec![],
        likes,
        comments: 0,
        created_at: created,
        updated_at: created,
        admin_notes: None,
        profiles: None,
    }
}

pub(crate) fn user() -> SessionUser {
    SessionUser {
        id: "user-1".into(),
        email: Some("driver@example.com".into()),
        access_token: "token".into(),
    }
}

struct Step<T> {
    gate: Option<oneshot::Receiver<()>>,
    result: T,
}

async fn pass(gate: Option<oneshot::Receiver<()>>) {
    if let Some(gate) = gate {
        let _ = gate.await;
    }
}

#[derive(Default)]
pub(crate) struct FakeService {
    fetches: Mutex<VecDeque<Step<Result<Vec<PotholeReport>, ServiceError>>>>,
    submits: Mutex<VecDeque<Step<Result<ReportId, ServiceError>>>>,
    likes: Mutex<VecDeque<Step<bool>>>,
    submitted: Mutex<Vec<NewReport>>,
    fetch_calls: AtomicUsize,
    like_calls: AtomicUsize,
}

impl FakeService {
    pub(crate) fn push_fetch(&self, result: Result<Vec<PotholeReport>, ServiceError>) {
        self.fetches.lock().push_back(Step { gate: None, result });
    }

    pub(crate) fn push_gated_fetch(
        &self,
        result: Result<Vec<PotholeReport>, ServiceError>,
    ) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.fetches.lock().push_back(Step {
            gate: Some(rx),
            result,
        });
        tx
    }

    pub(crate) fn push_submit(&self, result: Result<ReportId, ServiceError>) {
        self.submits.lock().push_back(Step { gate: None, result });
    }

    pub(crate) fn push_gated_submit(
        &self,
        result: Result<ReportId, ServiceError>,
    ) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.submits.lock().push_back(Step {
            gate: Some(rx),
            result,
        });
        tx
    }

    pub(crate) fn push_like(&self, confirmed: bool) {
        self.likes.lock().push_back(Step {
            gate: None,
            result: confirmed,
        });
    }

    pub(crate) fn push_gated_like(&self, confirmed: bool) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.likes.lock().push_back(Step {
            gate: Some(rx),
            result: confirmed,
        });
        tx
    }

    pub(crate) fn submitted(&self) -> Vec<NewReport> {
        self.submitted.lock().clone()
    }

    pub(crate) fn fetch_calls(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn like_calls(&self) -> usize {
        self.like_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ReportService for FakeService {
    async fn submit_report(
        &self,
        _user: &SessionUser,
        report: &NewReport,
    ) -> Result<ReportId, ServiceError> {
        self.submitted.lock().push(report.clone());
        let step = self.submits.lock().pop_front();
        match step {
            Some(step) => {
                pass(step.gate).await;
                step.result
            }
            None => Ok(report.id.clone()),
        }
    }

    async fn get_all_reports(&self) -> Result<Vec<PotholeReport>, ServiceError> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        let step = self.fetches.lock().pop_front();
        match step {
            Some(step) => {
                pass(step.gate).await;
                step.result
            }
            None => Ok(Vec::new()),
        }
    }

    async fn like_report(&self, _id: &ReportId) -> bool {
        self.like_calls.fetch_add(1, Ordering::SeqCst);
        let step = self.likes.lock().pop_front();
        match step {
            Some(step) => {
                pass(step.gate).await;
                step.result
            }
            None => true,
        }
    }
}

pub(crate) struct FakeLocation {
    permission: Mutex<PermissionStatus>,
    position: Mutex<Result<Coordinates, ProviderError>>,
    queued: Mutex<VecDeque<Step<Result<Coordinates, ProviderError>>>>,
    addresses: Mutex<Vec<GeocodedAddress>>,
    geocode_fails: AtomicBool,
}

impl Default for FakeLocation {
    fn default() -> Self {
        Self {
            permission: Mutex::new(PermissionStatus::Granted),
            position: Mutex::new(Ok(Coordinates::new(44.65, -63.58))),
            queued: Mutex::new(VecDeque::new()),
            addresses: Mutex::new(Vec::new()),
            geocode_fails: AtomicBool::new(false),
        }
    }
}

impl FakeLocation {
    pub(crate) fn set_permission(&self, status: PermissionStatus) {
        *self.permission.lock() = status;
    }

    pub(crate) fn set_position(&self, result: Result<Coordinates, ProviderError>) {
        *self.position.lock() = result;
    }

    pub(crate) fn push_gated_position(
        &self,
        result: Result<Coordinates, ProviderError>,
    ) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.queued.lock().push_back(Step {
            gate: Some(rx),
            result,
        });
        tx
    }

    pub(crate) fn set_addresses(&self, addresses: Vec<GeocodedAddress>) {
        *self.addresses.lock() = addresses;
    }

    pub(crate) fn fail_geocoding(&self) {
        self.geocode_fails.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl LocationProvider for FakeLocation {
    async fn request_foreground_permission(&self) -> PermissionStatus {
        *self.permission.lock()
    }

    async fn current_position(&self, _accuracy: Accuracy) -> Result<Coordinates, ProviderError> {
        let step = self.queued.lock().pop_front();
        match step {
            Some(step) => {
                pass(step.gate).await;
                step.result
            }
            None => self.position.lock().clone(),
        }
    }

    async fn reverse_geocode(
        &self,
        _at: Coordinates,
    ) -> Result<Vec<GeocodedAddress>, ProviderError> {
        if self.geocode_fails.load(Ordering::SeqCst) {
            return Err(ProviderError::new("geocoder offline"));
        }
        Ok(self.addresses.lock().clone())
    }
}

pub(crate) struct FakeImages {
    source: Mutex<Option<ImageSource>>,
    permission: Mutex<PermissionStatus>,
    capture: Mutex<Result<Option<ImageRef>, ProviderError>>,
    library: Mutex<Result<Option<Vec<ImageRef>>, ProviderError>>,
    queued_library: Mutex<VecDeque<Step<Result<Option<Vec<ImageRef>>, ProviderError>>>>,
    source_prompts: AtomicUsize,
    captures: AtomicUsize,
    library_quotas: Mutex<Vec<usize>>,
}

impl Default for FakeImages {
    fn default() -> Self {
        Self {
            source: Mutex::new(Some(ImageSource::Library)),
            permission: Mutex::new(PermissionStatus::Granted),
            capture: Mutex::new(Ok(None)),
            library: Mutex::new(Ok(None)),
            queued_library: Mutex::new(VecDeque::new()),
            source_prompts: AtomicUsize::new(0),
            captures: AtomicUsize::new(0),
            library_quotas: Mutex::new(Vec::new()),
        }
    }
}

impl FakeImages {
    pub(crate) fn set_source(&self, source: Option<ImageSource>) {
        *self.source.lock() = source;
    }

    pub(crate) fn set_permission(&self, status: PermissionStatus) {
        *self.permission.lock() = status;
    }

    pub(crate) fn set_capture(&self, result: Result<Option<ImageRef>, ProviderError>) {
        *self.capture.lock() = result;
    }

    pub(crate) fn set_library(&self, result: Result<Option<Vec<ImageRef>>, ProviderError>) {
        *self.library.lock() = result;
    }

    pub(crate) fn push_gated_library(
        &self,
        result: Result<Option<Vec<ImageRef>>, ProviderError>,
    ) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.queued_library.lock().push_back(Step {
            gate: Some(rx),
            result,
        });
        tx
    }

    pub(crate) fn source_prompts(&self) -> usize {
        self.source_prompts.load(Ordering::SeqCst)
    }

    pub(crate) fn captures(&self) -> usize {
        self.captures.load(Ordering::SeqCst)
    }

    pub(crate) fn library_quotas(&self) -> Vec<usize> {
        self.library_quotas.lock().clone()
    }
}

#[async_trait]
impl ImageProvider for FakeImages {
    async fn choose_source(&self) -> Option<ImageSource> {
        self.source_prompts.fetch_add(1, Ordering::SeqCst);
        *self.source.lock()
    }

    async fn request_permission(&self, _source: ImageSource) -> PermissionStatus {
        *self.permission.lock()
    }

    async fn capture_from_camera(
        &self,
        _options: &CaptureOptions,
    ) -> Result<Option<ImageRef>, ProviderError> {
        self.captures.fetch_add(1, Ordering::SeqCst);
        self.capture.lock().clone()
    }

    async fn pick_from_library(
        &self,
        options: &LibraryOptions,
    ) -> Result<Option<Vec<ImageRef>>, ProviderError> {
        self.library_quotas.lock().push(options.max_count);
        let step = self.queued_library.lock().pop_front();
        match step {
            Some(step) => {
                pass(step.gate).await;
                step.result
            }
            None => self.library.lock().clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Nav {
    Back,
    Replace(Route),
}

#[derive(Default)]
pub(crate) struct RecordingUi {
    advisories: Mutex<Vec<Advisory>>,
    navigation: Mutex<Vec<Nav>>,
    recenters: Mutex<Vec<Coordinates>>,
}

impl RecordingUi {
    pub(crate) fn advisories(&self) -> Vec<Advisory> {
        self.advisories.lock().clone()
    }

    pub(crate) fn navigation(&self) -> Vec<Nav> {
        self.navigation.lock().clone()
    }

    pub(crate) fn recenters(&self) -> Vec<Coordinates> {
        self.recenters.lock().clone()
    }
}

impl Advisor for RecordingUi {
    fn advise(&self, advisory: Advisory) {
        self.advisories.lock().push(advisory);
    }
}

impl Navigator for RecordingUi {
    fn go_back(&self) {
        self.navigation.lock().push(Nav::Back);
    }

    fn replace(&self, route: Route) {
        self.navigation.lock().push(Nav::Replace(route));
    }
}

impl MapView for RecordingUi {
    fn recenter(&self, at: Coordinates) {
        self.recenters.lock().push(at);
    }
}

pub(crate) struct Harness {
    pub(crate) ctx: ClientContext,
    pub(crate) service: Arc<FakeService>,
    pub(crate) location: Arc<FakeLocation>,
    pub(crate) images: Arc<FakeImages>,
    pub(crate) ui: Arc<RecordingUi>,
    pub(crate) session: Arc<SessionContext>,
}

impl Harness {
    /// Fakes wired into a context with a signed-in user.
    pub(crate) fn new() -> Self {
        let service = Arc::new(FakeService::default());
        let location = Arc::new(FakeLocation::default());
        let images = Arc::new(FakeImages::default());
        let ui = Arc::new(RecordingUi::default());
        let session = Arc::new(SessionContext::signed_in(user()));
        let ctx = ClientContext {
            service: service.clone(),
            session: session.clone(),
            location: location.clone(),
            images: images.clone(),
            advisor: ui.clone(),
            navigator: ui.clone(),
            map: ui.clone(),
        };
        Self {
            ctx,
            service,
            location,
            images,
            ui,
            session,
        }
    }
}
