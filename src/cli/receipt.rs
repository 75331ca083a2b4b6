//! Printable receipt and share text for a single donation.

use dhub_domain::DonationRecord;

use crate::cli::format::{format_amount, format_timestamp};

const RECEIPT_WIDTH: usize = 44;
const ORGANIZATION: &str = "Donation Hub";

/// Options that vary the receipt layout.
#[derive(Debug, Clone)]
pub struct ReceiptStyle<'a> {
    pub currency: &'a str,
    pub bilingual: bool,
}

pub fn render_receipt(record: &DonationRecord, style: &ReceiptStyle<'_>) -> String {
    let border = "=".repeat(RECEIPT_WIDTH);
    let mut lines = vec![
        border.clone(),
        centered(&format!("{ORGANIZATION} | Donation Receipt")),
        border.clone(),
    ];

    let category = if style.bilingual {
        format!("{} ({})", record.category.label(), record.category.urdu_label())
    } else {
        record.category.label().to_string()
    };

    let fields = [
        ("Receipt No", record.receipt_number.to_string()),
        ("Date", format_timestamp(&record.timestamp)),
        ("Donor", record.donor_name.clone()),
        ("Amount", format_amount(record.amount, style.currency)),
        ("Category", category),
        ("Region", record.region.label().to_string()),
    ];
    lines.extend(
        fields
            .iter()
            .map(|(label, value)| format!("{label:<12}: {value}")),
    );
    if let Some(notes) = &record.notes {
        lines.push(format!("{:<12}: {notes}", "Notes"));
    }

    lines.push("-".repeat(RECEIPT_WIDTH));
    lines.push(format!("Verification code: {}", record.verification_code()));
    if style.bilingual {
        lines.push(centered("JazakAllah Khair | جزاک اللہ خیر"));
    } else {
        lines.push(centered("Thank you for your donation"));
    }
    lines.push(border);
    lines.join("\n")
}

/// Plain-text message suitable for pasting into a chat app.
pub fn share_text(record: &DonationRecord, currency: &str) -> String {
    format!(
        "Assalam-o-Alaikum {}, we received your {} donation of {} ({} region). Receipt {} / verification {}. JazakAllah Khair.",
        record.donor_name,
        record.category.label(),
        format_amount(record.amount, currency),
        record.region.label(),
        record.receipt_number,
        record.verification_code(),
    )
}

fn centered(text: &str) -> String {
    let width = text.chars().count();
    let pad = RECEIPT_WIDTH.saturating_sub(width) / 2;
    format!("{}{}", " ".repeat(pad), text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Utc};
    use dhub_domain::{DonationCategory, DonationDraft, ReceiptNumber, Region};

    fn sample() -> DonationRecord {
        let date = NaiveDate::from_ymd_opt(2025, 3, 14).unwrap();
        DonationRecord::new(
            DonationDraft::new("Ali Ahmed", 5000.0, DonationCategory::Zakat, Region::Area5No)
                .with_notes("Family zakat"),
            ReceiptNumber::new(date, Region::Area5No, 1),
            Utc.with_ymd_and_hms(2025, 3, 14, 10, 0, 0).unwrap(),
        )
    }

    #[test]
    fn receipt_lists_fields_and_verification_code() {
        let record = sample();
        let text = render_receipt(
            &record,
            &ReceiptStyle {
                currency: "Rs",
                bilingual: true,
            },
        );

        assert!(text.contains("20250314-5N-0000001"));
        assert!(text.contains("Rs 5,000"));
        assert!(text.contains("Family zakat"));
        assert!(text.contains(&record.verification_code()));
        assert!(text.contains(DonationCategory::Zakat.urdu_label()));
    }

    #[test]
    fn monolingual_receipt_skips_urdu() {
        let text = render_receipt(
            &sample(),
            &ReceiptStyle {
                currency: "Rs",
                bilingual: false,
            },
        );
        assert!(!text.contains(DonationCategory::Zakat.urdu_label()));
    }

    #[test]
    fn share_text_mentions_receipt() {
        let record = sample();
        let text = share_text(&record, "Rs");
        assert!(text.contains("Ali Ahmed"));
        assert!(text.contains("20250314-5N-0000001"));
        assert!(text.contains("Rs 5,000"));
    }
}
