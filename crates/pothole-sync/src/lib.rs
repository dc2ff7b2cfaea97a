//! Backend access: HTTP implementation of the report service.

pub mod config;
pub use config::{BackendConfig, ConfigError};

#[cfg(feature = "http")]
pub mod http;

#[cfg(feature = "http")]
pub use http::{SupabaseClient, SyncError};
