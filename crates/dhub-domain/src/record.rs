//! Domain model for a single logged contribution.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{category::DonationCategory, common::*, receipt::ReceiptNumber, region::Region};

/// Number of hex digits of the id shown as the receipt verification code.
pub const VERIFICATION_CODE_LEN: usize = 8;

/// One logged donation. `id`, `receipt_number` and `timestamp` never change after creation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DonationRecord {
    pub id: Uuid,
    pub receipt_number: ReceiptNumber,
    pub donor_name: String,
    pub amount: f64,
    pub category: DonationCategory,
    pub region: Region,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl DonationRecord {
    pub fn new(draft: DonationDraft, receipt_number: ReceiptNumber, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            receipt_number,
            donor_name: draft.donor_name.trim().to_string(),
            amount: draft.amount,
            category: draft.category,
            region: draft.region,
            timestamp,
            notes: clean_notes(draft.notes),
        }
    }

    /// Short code derived from the id, printed on receipts so copies can be checked.
    pub fn verification_code(&self) -> String {
        self.id
            .simple()
            .to_string()
            .chars()
            .take(VERIFICATION_CODE_LEN)
            .collect::<String>()
            .to_ascii_uppercase()
    }

    /// Applies the mutable subset of fields. Identity fields are untouched.
    pub fn apply(&mut self, changes: RecordChanges) {
        if let Some(name) = changes.donor_name {
            self.donor_name = name.trim().to_string();
        }
        if let Some(amount) = changes.amount {
            self.amount = amount;
        }
        if let Some(category) = changes.category {
            self.category = category;
        }
        if let Some(region) = changes.region {
            self.region = region;
        }
        if let Some(notes) = changes.notes {
            self.notes = clean_notes(notes);
        }
    }
}

impl Identifiable for DonationRecord {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Amounted for DonationRecord {
    fn amount(&self) -> f64 {
        self.amount
    }
}

impl Displayable for DonationRecord {
    fn display_label(&self) -> String {
        format!("{} {} ({})", self.receipt_number, self.donor_name, self.category)
    }
}

/// Caller-supplied fields for a new record.
#[derive(Debug, Clone, PartialEq)]
pub struct DonationDraft {
    pub donor_name: String,
    pub amount: f64,
    pub category: DonationCategory,
    pub region: Region,
    pub notes: Option<String>,
}

impl DonationDraft {
    pub fn new(
        donor_name: impl Into<String>,
        amount: f64,
        category: DonationCategory,
        region: Region,
    ) -> Self {
        Self {
            donor_name: donor_name.into(),
            amount,
            category,
            region,
            notes: None,
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

/// Partial update for an existing record.
///
/// `notes` is doubly optional: `None` leaves notes alone, `Some(None)` clears them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordChanges {
    pub donor_name: Option<String>,
    pub amount: Option<f64>,
    pub category: Option<DonationCategory>,
    pub region: Option<Region>,
    pub notes: Option<Option<String>>,
}

impl RecordChanges {
    pub fn is_empty(&self) -> bool {
        self.donor_name.is_none()
            && self.amount.is_none()
            && self.category.is_none()
            && self.region.is_none()
            && self.notes.is_none()
    }
}

fn clean_notes(notes: Option<String>) -> Option<String> {
    notes
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
}
