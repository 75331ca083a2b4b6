//! Donation purposes accepted by the ledger.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::common::{normalize_label, LabelError};

/// Closed set of donation purposes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[derive(Default)]
pub enum DonationCategory {
    #[default]
    Zakat,
    Fitra,
    Monthly,
    General,
    Other,
}

impl DonationCategory {
    pub const ALL: [DonationCategory; 5] = [
        DonationCategory::Zakat,
        DonationCategory::Fitra,
        DonationCategory::Monthly,
        DonationCategory::General,
        DonationCategory::Other,
    ];

    pub fn label(self) -> &'static str {
        match self {
            DonationCategory::Zakat => "Zakat",
            DonationCategory::Fitra => "Fitra",
            DonationCategory::Monthly => "Monthly",
            DonationCategory::General => "General",
            DonationCategory::Other => "Other",
        }
    }

    /// Urdu caption shown next to the English label on receipts.
    pub fn urdu_label(self) -> &'static str {
        match self {
            DonationCategory::Zakat => "زکوٰۃ",
            DonationCategory::Fitra => "فطرہ",
            DonationCategory::Monthly => "ماہانہ",
            DonationCategory::General => "عمومی",
            DonationCategory::Other => "دیگر",
        }
    }
}

impl fmt::Display for DonationCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for DonationCategory {
    type Err = LabelError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let needle = normalize_label(value);
        DonationCategory::ALL
            .into_iter()
            .find(|category| normalize_label(category.label()) == needle)
            .ok_or_else(|| LabelError::UnknownCategory(value.trim().to_string()))
    }
}
