//! Aggregation helpers for dashboard metrics.

use dhub_domain::{DonationRecord, DonationSummary};

/// Computes [`DonationSummary`] values over record snapshots.
///
/// Only keys present in the data appear in the breakdowns; nothing is zero-filled.
pub struct SummaryService;

impl SummaryService {
    pub fn aggregate(records: &[DonationRecord]) -> DonationSummary {
        Self::aggregate_where(records, |_| true)
    }

    /// Aggregates the records accepted by `filter`.
    pub fn aggregate_where<F>(records: &[DonationRecord], filter: F) -> DonationSummary
    where
        F: Fn(&DonationRecord) -> bool,
    {
        let mut summary = DonationSummary::default();
        for record in records.iter().filter(|record| filter(record)) {
            summary.record(record);
        }
        summary
    }
}
