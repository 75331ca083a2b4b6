//! Aggregated totals derived from the record collection.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{category::DonationCategory, record::DonationRecord, region::Region};

/// Totals over all records. Breakdown maps only contain keys that have records.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DonationSummary {
    pub total: f64,
    pub count: usize,
    pub by_category: BTreeMap<DonationCategory, f64>,
    pub by_region: BTreeMap<Region, f64>,
}

impl DonationSummary {
    /// Adds one record's amount to every bucket it belongs to.
    pub fn record(&mut self, record: &DonationRecord) {
        self.total += record.amount;
        self.count += 1;
        *self.by_category.entry(record.category).or_insert(0.0) += record.amount;
        *self.by_region.entry(record.region).or_insert(0.0) += record.amount;
    }

    /// Total for `category`, zero when no record carries it.
    pub fn category_total(&self, category: DonationCategory) -> f64 {
        self.by_category.get(&category).copied().unwrap_or(0.0)
    }

    pub fn region_total(&self, region: Region) -> f64 {
        self.by_region.get(&region).copied().unwrap_or(0.0)
    }

    /// Percentage of the overall total represented by `amount`.
    pub fn share_of_total(&self, amount: f64) -> Option<f64> {
        if self.total.abs() > f64::EPSILON {
            Some(amount / self.total * 100.0)
        } else {
            None
        }
    }

    /// Category breakdown ordered by descending amount, ready for charting.
    pub fn category_series(&self) -> Vec<(DonationCategory, f64)> {
        sorted_series(&self.by_category)
    }

    pub fn region_series(&self) -> Vec<(Region, f64)> {
        sorted_series(&self.by_region)
    }
}

fn sorted_series<K: Copy + Ord>(map: &BTreeMap<K, f64>) -> Vec<(K, f64)> {
    let mut series: Vec<(K, f64)> = map.iter().map(|(key, value)| (*key, *value)).collect();
    series.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
    series
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{receipt::ReceiptNumber, record::DonationDraft};
    use chrono::{NaiveDate, Utc};

    fn record(amount: f64, category: DonationCategory, region: Region, seq: u64) -> DonationRecord {
        let date = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        DonationRecord::new(
            DonationDraft::new("Donor", amount, category, region),
            ReceiptNumber::new(date, region, seq),
            Utc::now(),
        )
    }

    #[test]
    fn empty_summary_has_no_keys() {
        let summary = DonationSummary::default();
        assert_eq!(summary.total, 0.0);
        assert!(summary.by_category.is_empty());
        assert!(summary.by_region.is_empty());
        assert_eq!(summary.share_of_total(10.0), None);
    }

    #[test]
    fn series_are_sorted_by_amount() {
        let records = vec![
            record(100.0, DonationCategory::Fitra, Region::J1, 1),
            record(900.0, DonationCategory::Zakat, Region::J1, 2),
            record(300.0, DonationCategory::Fitra, Region::Area4No, 3),
        ];
        let mut summary = DonationSummary::default();
        for entry in &records {
            summary.record(entry);
        }
        assert_eq!(
            summary.category_series(),
            vec![(DonationCategory::Zakat, 900.0), (DonationCategory::Fitra, 400.0)]
        );
        assert_eq!(summary.region_total(Region::J1), 1000.0);
        assert_eq!(summary.category_total(DonationCategory::Monthly), 0.0);
        assert_eq!(summary.count, 3);
    }
}
