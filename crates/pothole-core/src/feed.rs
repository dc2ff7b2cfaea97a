//! Derived views over the fetched report collection.
//!
//! Nothing here stores a filtered copy: callers derive the view from the
//! source collection every time it or the query changes.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::report::{PotholeReport, ReportStatus};

/// Feed tab applied before the search filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedFilter {
    /// Server order, untouched.
    #[default]
    All,
    /// Newest `created_at` first.
    Recent,
    /// Most liked first.
    Popular,
    /// Only reports marked fixed.
    Fixed,
}

impl FeedFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Recent => "recent",
            Self::Popular => "popular",
            Self::Fixed => "fixed",
        }
    }
}

impl fmt::Display for FeedFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Case-insensitive substring test against location, description, and category.
pub fn matches(report: &PotholeReport, query: &str) -> bool {
    let needle = query.to_lowercase();
    [&report.location, &report.description, &report.category]
        .into_iter()
        .any(|field| field.to_lowercase().contains(&needle))
}

/// Search projection. A blank query returns the collection as-is.
pub fn search<'a>(reports: &'a [PotholeReport], query: &str) -> Vec<&'a PotholeReport> {
    if query.trim().is_empty() {
        return reports.iter().collect();
    }
    reports.iter().filter(|r| matches(r, query)).collect()
}

/// Apply the feed tab, then the search query.
pub fn project<'a>(
    reports: &'a [PotholeReport],
    filter: FeedFilter,
    query: &str,
) -> Vec<&'a PotholeReport> {
    let mut view = search(reports, query);
    match filter {
        FeedFilter::All => {}
        FeedFilter::Recent => view.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        FeedFilter::Popular => view.sort_by(|a, b| b.likes.cmp(&a.likes)),
        FeedFilter::Fixed => view.retain(|r| r.status == ReportStatus::Fixed),
    }
    view
}
