//! Human-readable receipt identifiers of the form `YYYYMMDD-RC-0000001`.

use std::{fmt, str::FromStr};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::region::Region;

/// Minimum width of the zero-padded sequence segment.
pub const SEQUENCE_WIDTH: usize = 7;
const DATE_FORMAT: &str = "%Y%m%d";

/// Structured view over a receipt number.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReceiptNumber {
    pub date: NaiveDate,
    pub region_code: String,
    pub sequence: u64,
}

impl ReceiptNumber {
    pub fn new(date: NaiveDate, region: Region, sequence: u64) -> Self {
        Self {
            date,
            region_code: region.code().to_string(),
            sequence,
        }
    }

    /// Region the receipt was issued for, when the code is a known mapping.
    pub fn region(&self) -> Option<Region> {
        Region::from_code(&self.region_code)
    }

    pub fn parse(value: &str) -> Result<Self, ReceiptParseError> {
        let mut parts = value.trim().splitn(3, '-');
        let (Some(date), Some(code), Some(sequence)) = (parts.next(), parts.next(), parts.next())
        else {
            return Err(ReceiptParseError::Shape(value.to_string()));
        };
        if date.len() != 8 || !date.chars().all(|c| c.is_ascii_digit()) {
            return Err(ReceiptParseError::Date(date.to_string()));
        }
        let date = NaiveDate::parse_from_str(date, DATE_FORMAT)
            .map_err(|_| ReceiptParseError::Date(date.to_string()))?;
        if code.is_empty() || !code.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(ReceiptParseError::RegionCode(code.to_string()));
        }
        if sequence.len() < SEQUENCE_WIDTH || !sequence.chars().all(|c| c.is_ascii_digit()) {
            return Err(ReceiptParseError::Sequence(sequence.to_string()));
        }
        let sequence = sequence
            .parse::<u64>()
            .map_err(|_| ReceiptParseError::Sequence(sequence.to_string()))?;
        Ok(Self {
            date,
            region_code: code.to_ascii_uppercase(),
            sequence,
        })
    }
}

impl fmt::Display for ReceiptNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{}-{:0width$}",
            self.date.format(DATE_FORMAT),
            self.region_code,
            self.sequence,
            width = SEQUENCE_WIDTH
        )
    }
}

impl FromStr for ReceiptNumber {
    type Err = ReceiptParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        ReceiptNumber::parse(value)
    }
}

impl Serialize for ReceiptNumber {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ReceiptNumber {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        ReceiptNumber::parse(&raw).map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Reasons a string failed to parse as a [`ReceiptNumber`].
pub enum ReceiptParseError {
    Shape(String),
    Date(String),
    RegionCode(String),
    Sequence(String),
}

impl fmt::Display for ReceiptParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReceiptParseError::Shape(value) => {
                write!(f, "`{value}` is not shaped like DATE-REGION-SEQUENCE")
            }
            ReceiptParseError::Date(value) => write!(f, "invalid receipt date `{value}`"),
            ReceiptParseError::RegionCode(value) => write!(f, "invalid region code `{value}`"),
            ReceiptParseError::Sequence(value) => write!(f, "invalid receipt sequence `{value}`"),
        }
    }
}

impl std::error::Error for ReceiptParseError {}
