//! Report entities shared between the feed, the submission flow, and the backend.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Window in which a changed report is shown as "recently updated".
pub const RECENT_UPDATE_WINDOW_HOURS: i64 = 24;

/// Stable identifier of a pothole report.
///
/// Drafts get a fresh v4 UUID on creation; reports fetched from the backend
/// carry whatever id the backend assigned.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReportId(String);

impl ReportId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ReportId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.5}, {:.5}", self.latitude, self.longitude)
    }
}

/// Kind of road damage. The authoring flow only offers these five.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Surface Break")]
    SurfaceBreak,
    #[serde(rename = "Deep Hole")]
    DeepHole,
    #[serde(rename = "Cracking")]
    Cracking,
    #[serde(rename = "Edge Damage")]
    EdgeDamage,
    #[serde(rename = "Sinkhole")]
    Sinkhole,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Self::SurfaceBreak,
        Self::DeepHole,
        Self::Cracking,
        Self::EdgeDamage,
        Self::Sinkhole,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SurfaceBreak => "Surface Break",
            Self::DeepHole => "Deep Hole",
            Self::Cracking => "Cracking",
            Self::EdgeDamage => "Edge Damage",
            Self::Sinkhole => "Sinkhole",
        }
    }

    /// Case-insensitive lookup by display label.
    pub fn parse(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(label))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Assessed danger level. Drafts always hold one; the default is `Medium`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Severity {
    Low,
    #[default]
    Medium,
    Danger,
}

impl Severity {
    pub const ALL: [Severity; 3] = [Self::Low, Self::Medium, Self::Danger];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::Danger => "Danger",
        }
    }

    pub fn parse(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::ALL
            .into_iter()
            .find(|s| s.as_str().eq_ignore_ascii_case(label))
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Surface condition at the time of the report. Defaults to `Dry`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoadCondition {
    #[default]
    Dry,
    Wet,
    #[serde(rename = "Snow/Ice")]
    SnowIce,
    Construction,
}

impl RoadCondition {
    pub const ALL: [RoadCondition; 4] = [Self::Dry, Self::Wet, Self::SnowIce, Self::Construction];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dry => "Dry",
            Self::Wet => "Wet",
            Self::SnowIce => "Snow/Ice",
            Self::Construction => "Construction",
        }
    }

    pub fn parse(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::ALL
            .into_iter()
            .find(|r| r.as_str().eq_ignore_ascii_case(label))
    }
}

impl fmt::Display for RoadCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle of a report on the backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    #[default]
    Submitted,
    InProgress,
    Fixed,
    Rejected,
}

impl ReportStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Submitted => "submitted",
            Self::InProgress => "in_progress",
            Self::Fixed => "fixed",
            Self::Rejected => "rejected",
        }
    }

    pub fn parse(label: &str) -> Option<Self> {
        let label = label.trim();
        [Self::Submitted, Self::InProgress, Self::Fixed, Self::Rejected]
            .into_iter()
            .find(|s| s.as_str().eq_ignore_ascii_case(label))
    }
}

/// Author display info joined onto feed reports.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

/// A submitted report as held in the feed.
///
/// `category` and `road_condition` stay free text: the backend owns the
/// record and older rows carry labels outside the authoring enums.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PotholeReport {
    pub id: ReportId,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub location: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub latitude: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub longitude: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub category: String,
    #[serde(default, deserialize_with = "lenient_severity")]
    pub severity: Severity,
    #[serde(default, deserialize_with = "null_as_default")]
    pub road_condition: String,
    #[serde(default, deserialize_with = "lenient_status")]
    pub status: ReportStatus,
    #[serde(default, deserialize_with = "null_as_default")]
    pub images: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub likes: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub comments: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub admin_notes: Option<String>,
    #[serde(default)]
    pub profiles: Option<Profile>,
}

// Backend rows may carry explicit nulls; one bad row must not sink the feed.

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Unknown or null labels read as `Medium`.
fn lenient_severity<'de, D>(deserializer: D) -> Result<Severity, D::Error>
where
    D: Deserializer<'de>,
{
    let label = Option::<String>::deserialize(deserializer)?;
    Ok(label.as_deref().and_then(Severity::parse).unwrap_or_default())
}

/// Unknown or null labels read as `Submitted`.
fn lenient_status<'de, D>(deserializer: D) -> Result<ReportStatus, D::Error>
where
    D: Deserializer<'de>,
{
    let label = Option::<String>::deserialize(deserializer)?;
    Ok(label.as_deref().and_then(ReportStatus::parse).unwrap_or_default())
}

impl PotholeReport {
    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.latitude, self.longitude)
    }

    /// True when the report changed after creation and the change happened
    /// within the last 24 hours relative to `now`.
    pub fn is_recently_updated(&self, now: DateTime<Utc>) -> bool {
        if self.updated_at == self.created_at {
            return false;
        }
        let age = now.signed_duration_since(self.updated_at);
        age >= Duration::zero() && age <= Duration::hours(RECENT_UPDATE_WINDOW_HOURS)
    }

    pub fn author_name(&self) -> &str {
        self.profiles
            .as_ref()
            .and_then(|p| p.username.as_deref())
            .filter(|name| !name.is_empty())
            .unwrap_or("Anonymous")
    }

    /// Number of images beyond the cover image.
    pub fn extra_image_count(&self) -> usize {
        self.images.len().saturating_sub(1)
    }

    pub fn cover_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }
}

/// Human-readable age like "5 minutes ago".
pub fn relative_age(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let age = now.signed_duration_since(then);
    if age < Duration::minutes(1) {
        return "just now".to_string();
    }
    let (n, unit) = if age < Duration::hours(1) {
        (age.num_minutes(), "minute")
    } else if age < Duration::days(1) {
        (age.num_hours(), "hour")
    } else if age < Duration::days(30) {
        (age.num_days(), "day")
    } else if age < Duration::days(365) {
        (age.num_days() / 30, "month")
    } else {
        (age.num_days() / 365, "year")
    };
    let plural = if n == 1 { "" } else { "s" };
    format!("{n} {unit}{plural} ago")
}
