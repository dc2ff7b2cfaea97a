//! Collaborators and session shared by the controllers of one client.

use std::sync::Arc;

use pothole_core::{ReportService, SessionContext};

use crate::ports::{Advisor, ImageProvider, LocationProvider, MapView, Navigator};

/// Everything a controller may reach outside itself.
///
/// Built once when the client boots and passed by reference to each
/// controller constructor. Dropping the last clone ends the client; the
/// session is ended explicitly with [`ClientContext::shutdown`].
#[derive(Clone)]
pub struct ClientContext {
    pub service: Arc<dyn ReportService>,
    pub session: Arc<SessionContext>,
    pub location: Arc<dyn LocationProvider>,
    pub images: Arc<dyn ImageProvider>,
    pub advisor: Arc<dyn Advisor>,
    pub navigator: Arc<dyn Navigator>,
    pub map: Arc<dyn MapView>,
}

impl ClientContext {
    pub fn shutdown(&self) {
        self.session.sign_out();
    }
}
