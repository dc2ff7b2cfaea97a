//! HTTP report service client for the Supabase-style backend.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use pothole_core::{
    NewReport, PotholeReport, ReportId, ReportService, ServiceError, SessionContext, SessionUser,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, info, warn};

use crate::config::BackendConfig;

const REPORTS_TABLE: &str = "pothole_reports";
const REPORT_SELECT: &str = "*,profiles:user_id(username,avatar_url)";

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server returned {status}: {body}")]
    Server { status: u16, body: String },
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("reading image {path}: {source}")]
    Image {
        path: String,
        source: std::io::Error,
    },
    #[error("server returned no rows")]
    Empty,
}

impl From<SyncError> for ServiceError {
    fn from(err: SyncError) -> Self {
        match err {
            SyncError::Server { status: 401, .. } => ServiceError::Unauthenticated,
            SyncError::Server { status: 403, body } => ServiceError::PermissionDenied(body),
            SyncError::Server { status, body } => ServiceError::Rejected {
                status,
                message: body,
            },
            SyncError::Http(e) => ServiceError::Transport(e.to_string()),
            SyncError::Image { .. } => ServiceError::Transport(err.to_string()),
            SyncError::Json(e) => ServiceError::Malformed(e.to_string()),
            SyncError::Empty => ServiceError::Malformed(err.to_string()),
        }
    }
}

/// Row sent on insert: the report plus ownership and timestamps.
#[derive(Serialize)]
struct InsertRow<'a> {
    #[serde(flatten)]
    report: &'a NewReport,
    user_id: &'a str,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Deserialize)]
struct InsertedRow {
    id: ReportId,
}

#[derive(Serialize)]
struct LikeArgs<'a> {
    report_id: &'a str,
}

#[derive(Deserialize)]
struct AuthUser {
    id: String,
    #[serde(default)]
    email: Option<String>,
}

/// Report service backed by the REST, storage, and auth endpoints.
///
/// Reads and likes run as the signed-in user when a session is attached,
/// and fall back to the anon key otherwise.
pub struct SupabaseClient {
    client: reqwest::Client,
    config: BackendConfig,
    session: Option<Arc<SessionContext>>,
}

impl SupabaseClient {
    pub fn new(config: BackendConfig) -> Result<Self, SyncError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;
        Ok(Self {
            client,
            config,
            session: None,
        })
    }

    pub fn with_session(mut self, session: Arc<SessionContext>) -> Self {
        self.session = Some(session);
        self
    }

    /// Bearer token for calls not tied to an explicit user.
    fn bearer(&self) -> String {
        self.session
            .as_ref()
            .and_then(|s| s.current_user())
            .map(|u| u.access_token)
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| self.config.anon_key.clone())
    }

    pub fn config(&self) -> &BackendConfig {
        &self.config
    }

    fn rest_url(&self, path: &str) -> String {
        format!("{}/rest/v1/{}", self.config.base_url, path)
    }

    fn object_url(&self, object_path: &str) -> String {
        format!(
            "{}/storage/v1/object/{}/{}",
            self.config.base_url, self.config.storage_bucket, object_path
        )
    }

    fn public_url(&self, object_path: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{}",
            self.config.base_url, self.config.storage_bucket, object_path
        )
    }

    fn request(&self, method: reqwest::Method, url: &str, token: &str) -> reqwest::RequestBuilder {
        self.client
            .request(method, url)
            .header("apikey", &self.config.anon_key)
            .bearer_auth(token)
    }

    async fn check(resp: reqwest::Response) -> Result<reqwest::Response, SyncError> {
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(SyncError::Server {
                status: status.as_u16(),
                body,
            });
        }
        Ok(resp)
    }

    /// Resolve the user owning `access_token`.
    pub async fn current_user(&self, access_token: &str) -> Result<SessionUser, SyncError> {
        let url = format!("{}/auth/v1/user", self.config.base_url);
        let resp = self
            .request(reqwest::Method::GET, &url, access_token)
            .send()
            .await?;
        let user: AuthUser = Self::check(resp).await?.json().await?;
        info!(user_id = %user.id, "resolved session user");
        Ok(SessionUser {
            id: user.id,
            email: user.email,
            access_token: access_token.to_string(),
        })
    }

    /// All reports with author profiles, newest first.
    pub async fn fetch_reports(&self) -> Result<Vec<PotholeReport>, SyncError> {
        let req = self.reports_request();
        info!(url = %self.rest_url(REPORTS_TABLE), "fetching reports");
        let resp = req.send().await?;
        let reports: Vec<PotholeReport> = Self::check(resp).await?.json().await?;
        info!(count = reports.len(), "fetched reports");
        Ok(reports)
    }

    /// Upload local images to `reports/<id>/`. Returns public URLs of the
    /// uploads that succeeded; failures are logged and skipped.
    pub async fn upload_images(
        &self,
        user: &SessionUser,
        images: &[String],
        report_id: &ReportId,
    ) -> Vec<String> {
        let mut uploaded = Vec::with_capacity(images.len());
        for (index, uri) in images.iter().enumerate() {
            match self.upload_image(user, uri, report_id, index).await {
                Ok(url) => uploaded.push(url),
                Err(e) => warn!(index, uri = %uri, error = %e, "image upload failed"),
            }
        }
        info!(
            report_id = %report_id,
            uploaded = uploaded.len(),
            total = images.len(),
            "image upload finished"
        );
        uploaded
    }

    async fn upload_image(
        &self,
        user: &SessionUser,
        uri: &str,
        report_id: &ReportId,
        index: usize,
    ) -> Result<String, SyncError> {
        let path = local_path(uri);
        let bytes = tokio::fs::read(path).await.map_err(|source| SyncError::Image {
            path: path.to_string(),
            source,
        })?;
        let ext = image_extension(uri);
        let object_path = object_path(report_id, index, &ext);

        let resp = self
            .request(
                reqwest::Method::POST,
                &self.object_url(&object_path),
                &user.access_token,
            )
            .header("x-upsert", "true")
            .header(reqwest::header::CONTENT_TYPE, format!("image/{ext}"))
            .body(bytes)
            .send()
            .await?;
        Self::check(resp).await?;
        Ok(self.public_url(&object_path))
    }

    /// Insert a report row owned by `user`. `images` replaces the draft's
    /// local references.
    pub async fn insert_report(
        &self,
        user: &SessionUser,
        report: &NewReport,
        images: Vec<String>,
    ) -> Result<ReportId, SyncError> {
        let now = Utc::now();
        let row = NewReport {
            images,
            ..report.clone()
        };
        let body = InsertRow {
            report: &row,
            user_id: &user.id,
            created_at: now,
            updated_at: now,
        };

        let url = self.rest_url(REPORTS_TABLE);
        info!(url = %url, report_id = %report.id, "inserting report");
        let resp = self
            .request(reqwest::Method::POST, &url, &user.access_token)
            .header("Prefer", "return=representation")
            .json(&body)
            .send()
            .await?;
        let rows: Vec<InsertedRow> = Self::check(resp).await?.json().await?;
        let inserted = rows.into_iter().next().ok_or(SyncError::Empty)?;
        info!(report_id = %inserted.id, "report inserted");
        Ok(inserted.id)
    }

    /// Increment the like counter server-side.
    pub async fn increment_likes(&self, id: &ReportId) -> Result<(), SyncError> {
        let resp = self.like_request(id).send().await?;
        Self::check(resp).await?;
        Ok(())
    }

    fn reports_request(&self) -> reqwest::RequestBuilder {
        self.request(
            reqwest::Method::GET,
            &self.rest_url(REPORTS_TABLE),
            &self.bearer(),
        )
        .query(&[("select", REPORT_SELECT), ("order", "created_at.desc")])
    }

    fn like_request(&self, id: &ReportId) -> reqwest::RequestBuilder {
        self.request(
            reqwest::Method::POST,
            &self.rest_url("rpc/increment_likes"),
            &self.bearer(),
        )
        .json(&LikeArgs {
            report_id: id.as_str(),
        })
    }
}

#[async_trait]
impl ReportService for SupabaseClient {
    async fn submit_report(
        &self,
        user: &SessionUser,
        report: &NewReport,
    ) -> Result<ReportId, ServiceError> {
        let uploaded = self.upload_images(user, &report.images, &report.id).await;
        // Keep the local references when nothing could be uploaded.
        let images = if uploaded.is_empty() {
            report.images.clone()
        } else {
            uploaded
        };
        self.insert_report(user, report, images).await.map_err(|e| {
            error!(report_id = %report.id, error = %e, "report insert failed");
            ServiceError::from(e)
        })
    }

    async fn get_all_reports(&self) -> Result<Vec<PotholeReport>, ServiceError> {
        Ok(self.fetch_reports().await?)
    }

    async fn like_report(&self, id: &ReportId) -> bool {
        match self.increment_likes(id).await {
            Ok(()) => true,
            Err(e) => {
                error!(report_id = %id, error = %e, "like failed");
                false
            }
        }
    }
}

fn local_path(uri: &str) -> &str {
    uri.strip_prefix("file://").unwrap_or(uri)
}

fn image_extension(uri: &str) -> String {
    Path::new(local_path(uri))
        .extension()
        .and_then(|e| e.to_str())
        .filter(|e| !e.is_empty())
        .map(str::to_ascii_lowercase)
        .unwrap_or_else(|| "jpg".to_string())
}

fn object_path(report_id: &ReportId, index: usize, ext: &str) -> String {
    format!("reports/{report_id}/{report_id}_{index}.{ext}")
}
