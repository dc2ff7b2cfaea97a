//! Signed-in user context.
//!
//! Owned by whoever boots the client and handed to the controllers that need
//! it. `sign_in` and `sign_out` are the only writers.

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    /// Bearer token for authenticated backend calls.
    #[serde(skip)]
    pub access_token: String,
}

#[derive(Debug, Default)]
pub struct SessionContext {
    user: RwLock<Option<SessionUser>>,
}

impl SessionContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn signed_in(user: SessionUser) -> Self {
        Self {
            user: RwLock::new(Some(user)),
        }
    }

    pub fn sign_in(&self, user: SessionUser) {
        info!(user_id = %user.id, "session started");
        *self.user.write() = Some(user);
    }

    pub fn sign_out(&self) {
        if let Some(user) = self.user.write().take() {
            info!(user_id = %user.id, "session ended");
        }
    }

    pub fn current_user(&self) -> Option<SessionUser> {
        self.user.read().clone()
    }

    pub fn is_signed_in(&self) -> bool {
        self.user.read().is_some()
    }
}
