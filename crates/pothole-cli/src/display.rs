//! Terminal rendering for feed reports.
//!
//! Lists are one line per report; `--id` prints a vertical card grouped by
//! section the way the feed's detail sheet does.

use chrono::{DateTime, Utc};
use pothole_app::FeedView;
use pothole_core::report::relative_age;
use pothole_core::{PotholeReport, ReportStatus};

const MAX_DESCRIPTION: usize = 60;

// ── Public API ──

/// Print the derived feed view, one report per line.
pub fn print_feed(view: &FeedView, total: usize, now: DateTime<Utc>) {
    if view.is_empty_state() {
        if view.search_query.trim().is_empty() {
            println!("No reports yet.");
        } else {
            println!("No reports match \"{}\".", view.search_query);
        }
        return;
    }

    println!(
        "{} of {} reports ({} tab)",
        view.reports.len(),
        total,
        view.filter
    );
    println!();
    for report in &view.reports {
        let heart = if view.liked.contains(&report.id) { "♥" } else { "♡" };
        let updated = if report.is_recently_updated(now) {
            " [updated]"
        } else {
            ""
        };
        println!(
            "{:<38} {:<8} {:<12} {} {:<4} {}{}",
            report.id.as_str(),
            report.severity.as_str(),
            status_label(report.status),
            heart,
            report.likes,
            truncate(&report.location, 40),
            updated,
        );
    }
}

/// Print one report as a vertical card.
pub fn print_report_card(report: &PotholeReport, now: DateTime<Utc>) {
    println!("=== {} ===", report.location);
    println!(
        "{} · {}",
        report.author_name(),
        relative_age(report.created_at, now)
    );
    println!();

    print_section(
        "Report",
        &[
            ("id", report.id.to_string()),
            ("category", report.category.clone()),
            ("severity", report.severity.to_string()),
            ("road_condition", report.road_condition.clone()),
            ("description", truncate(&report.description, MAX_DESCRIPTION)),
        ],
    );
    print_section(
        "Location",
        &[
            ("address", report.location.clone()),
            ("coordinates", report.coordinates().to_string()),
        ],
    );
    print_section(
        "Status",
        &[
            ("status", status_label(report.status).to_string()),
            ("admin_notes", report.admin_notes.clone().unwrap_or_default()),
            (
                "updated",
                if report.is_recently_updated(now) {
                    relative_age(report.updated_at, now)
                } else {
                    String::new()
                },
            ),
        ],
    );

    let more = match report.extra_image_count() {
        0 => String::new(),
        n => format!("+{n} more"),
    };
    print_section(
        "Images",
        &[
            ("cover", report.cover_image().unwrap_or_default().to_string()),
            ("additional", more),
        ],
    );
    print_section(
        "Engagement",
        &[
            ("likes", report.likes.to_string()),
            ("comments", report.comments.to_string()),
        ],
    );
}

// ── Section rendering ──

fn print_section(header: &str, rows: &[(&str, String)]) {
    if rows.iter().all(|(_, value)| value.is_empty()) {
        return;
    }
    println!("{header}");
    for (label, value) in rows {
        if value.is_empty() {
            continue;
        }
        println!("  {:<26} {}", label, value);
    }
    println!();
}

fn status_label(status: ReportStatus) -> &'static str {
    match status {
        ReportStatus::Submitted => "Submitted",
        ReportStatus::InProgress => "In progress",
        ReportStatus::Fixed => "Fixed",
        ReportStatus::Rejected => "Rejected",
    }
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let cut: String = text.chars().take(max.saturating_sub(1)).collect();
    format!("{cut}…")
}
