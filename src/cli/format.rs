//! Number and date formatting for terminal output.

use chrono::{DateTime, Local, Utc};

/// `5000.0` -> `Rs 5,000`; fractional amounts keep two decimals.
pub fn format_amount(amount: f64, currency: &str) -> String {
    let sign = if amount < 0.0 { "-" } else { "" };
    let cents = (amount.abs() * 100.0).round() as u64;
    let whole = group_thousands(cents / 100);
    let fraction = cents % 100;
    let body = if fraction == 0 {
        whole
    } else {
        format!("{whole}.{fraction:02}")
    };
    if currency.is_empty() {
        format!("{sign}{body}")
    } else {
        format!("{sign}{currency} {body}")
    }
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

pub fn format_percent(percent: f64) -> String {
    format!("{:.1}%", percent)
}

/// Horizontal bar of `width` cells filled in proportion to `share` (0..=1).
pub fn share_bar(share: f64, width: usize) -> String {
    let filled = ((share.clamp(0.0, 1.0) * width as f64).round() as usize).min(width);
    format!("{}{}", "#".repeat(filled), ".".repeat(width - filled))
}

pub fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp
        .with_timezone(&Local)
        .format("%Y-%m-%d %H:%M")
        .to_string()
}
