//! Device location for the draft.

use std::sync::Arc;

use pothole_core::Coordinates;
use tracing::{debug, info, warn};

use crate::context::ClientContext;
use crate::error::{AppError, DeviceOp, Permission};
use crate::ports::{Accuracy, Advisor, LocationProvider, MapView};

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedLocation {
    pub coordinates: Coordinates,
    /// Formatted address of the first geocoding match, when there is one.
    pub address: Option<String>,
}

/// Resolves the current position and recenters the map on success.
///
/// Calls are not serialised; whichever resolution the caller applies last
/// wins.
pub struct GeolocationResolver {
    provider: Arc<dyn LocationProvider>,
    advisor: Arc<dyn Advisor>,
    map: Arc<dyn MapView>,
}

impl GeolocationResolver {
    pub fn new(ctx: &ClientContext) -> Self {
        Self {
            provider: Arc::clone(&ctx.location),
            advisor: Arc::clone(&ctx.advisor),
            map: Arc::clone(&ctx.map),
        }
    }

    /// Failures are advised here; the error is informational only.
    pub async fn resolve(&self) -> Result<ResolvedLocation, AppError> {
        match self.locate().await {
            Ok(resolved) => Ok(resolved),
            Err(err) => {
                warn!(error = %err, "location unavailable");
                if let Some(advisory) = err.advisory() {
                    self.advisor.advise(advisory);
                }
                Err(err)
            }
        }
    }

    async fn locate(&self) -> Result<ResolvedLocation, AppError> {
        if !self.provider.request_foreground_permission().await.is_granted() {
            return Err(AppError::PermissionDenied(Permission::Location));
        }
        let coordinates = self
            .provider
            .current_position(Accuracy::High)
            .await
            .map_err(|source| AppError::Device {
                op: DeviceOp::Locate,
                source,
            })?;
        info!(%coordinates, "location resolved");
        self.map.recenter(coordinates);

        let address = match self.provider.reverse_geocode(coordinates).await {
            Ok(candidates) => candidates
                .first()
                .map(|a| a.format())
                .filter(|a| !a.is_empty()),
            Err(e) => {
                debug!(error = %e, "reverse geocoding failed");
                None
            }
        };
        Ok(ResolvedLocation {
            coordinates,
            address,
        })
    }
}
