//! Optimistic "like" handling for feed cards.
//!
//! A card is marked liked before the service is asked, and stays marked
//! whatever the answer. Only a fresh load of the collection clears the marks,
//! and never the mark of a like still in flight. A confirmed like bumps the
//! held count by one, but only in the load it was sent against; the count is
//! never re-fetched for this alone.

use std::collections::HashSet;

use parking_lot::Mutex;
use pothole_core::{PotholeReport, ReportId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LikeOutcome {
    /// Server confirmed. Carries the new local count, or `None` when the
    /// collection was reloaded while the call was in flight or no longer
    /// holds the report.
    Confirmed(Option<u32>),
    /// The card was already liked; nothing was sent.
    AlreadyLiked,
    /// The service did not confirm. The card stays marked.
    Unconfirmed,
}

#[derive(Debug, Default)]
struct Marks {
    liked: HashSet<ReportId>,
    pending: HashSet<ReportId>,
}

/// Cards liked since the collection was last loaded.
#[derive(Debug, Default)]
pub struct LikeLedger {
    marks: Mutex<Marks>,
}

impl LikeLedger {
    /// Mark `id` liked and pending. Returns `false` if it already was liked.
    pub fn try_mark(&self, id: &ReportId) -> bool {
        let mut marks = self.marks.lock();
        if !marks.liked.insert(id.clone()) {
            return false;
        }
        marks.pending.insert(id.clone());
        true
    }

    /// The service answered for `id`. The liked mark stays.
    pub fn settle(&self, id: &ReportId) {
        self.marks.lock().pending.remove(id);
    }

    pub fn is_liked(&self, id: &ReportId) -> bool {
        self.marks.lock().liked.contains(id)
    }

    /// Forget settled likes. Pending ones stay marked so they cannot be
    /// sent twice.
    pub fn reset(&self) {
        let mut marks = self.marks.lock();
        let Marks { liked, pending } = &mut *marks;
        liked.retain(|id| pending.contains(id));
    }
}

/// Increment the held like count of `id` by exactly one.
///
/// This is the only write the like path may make to the collection.
pub fn apply_confirmed_like(reports: &mut [PotholeReport], id: &ReportId) -> Option<u32> {
    let report = reports.iter_mut().find(|r| &r.id == id)?;
    report.likes = report.likes.saturating_add(1);
    Some(report.likes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::report;
    use proptest::prelude::*;

    #[test]
    fn ledger_marks_once() {
        let ledger = LikeLedger::default();
        let id = ReportId::new("r-1");
        assert!(ledger.try_mark(&id));
        assert!(!ledger.try_mark(&id));
        assert!(ledger.is_liked(&id));
        ledger.settle(&id);
        ledger.reset();
        assert!(!ledger.is_liked(&id));
    }

    #[test]
    fn reset_keeps_pending_marks() {
        let ledger = LikeLedger::default();
        let pending = ReportId::new("r-1");
        let settled = ReportId::new("r-2");
        ledger.try_mark(&pending);
        ledger.try_mark(&settled);
        ledger.settle(&settled);

        ledger.reset();
        assert!(ledger.is_liked(&pending));
        assert!(!ledger.is_liked(&settled));
        assert!(!ledger.try_mark(&pending));

        ledger.settle(&pending);
        ledger.reset();
        assert!(!ledger.is_liked(&pending));
    }

    #[test]
    fn confirmed_like_touches_only_the_matching_report() {
        let mut reports = vec![report("a", "Main St", 3), report("b", "Oak Ave", 10)];
        assert_eq!(apply_confirmed_like(&mut reports, &ReportId::new("b")), Some(11));
        assert_eq!(reports[0].likes, 3);
        assert_eq!(reports[1].likes, 11);
    }

    #[test]
    fn unknown_id_is_ignored() {
        let mut reports = vec![report("a", "Main St", 3)];
        assert_eq!(apply_confirmed_like(&mut reports, &ReportId::new("zz")), None);
        assert_eq!(reports[0].likes, 3);
    }

    proptest! {
        #[test]
        fn each_card_is_sent_at_most_once(taps in proptest::collection::vec(0usize..4, 0..40)) {
            let ledger = LikeLedger::default();
            let mut reports: Vec<_> = (0..4)
                .map(|i| report(&format!("r-{i}"), "Main St", 0))
                .collect();
            for tap in &taps {
                let id = ReportId::new(format!("r-{tap}"));
                if ledger.try_mark(&id) {
                    apply_confirmed_like(&mut reports, &id);
                }
            }
            for r in &reports {
                let tapped = taps.iter().any(|t| r.id.as_str() == format!("r-{t}"));
                prop_assert_eq!(r.likes, u32::from(tapped));
                prop_assert_eq!(ledger.is_liked(&r.id), tapped);
            }
        }
    }
}
