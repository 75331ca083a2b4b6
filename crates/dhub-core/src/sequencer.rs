//! Receipt numbering backed by a persisted, strictly increasing counter.

use chrono::NaiveDate;

use dhub_domain::{ReceiptNumber, Region};

use crate::CoreError;

/// A receipt number that has been computed but not yet made durable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiptReservation {
    pub receipt: ReceiptNumber,
    pub sequence: u64,
}

/// Issues receipt numbers from a monotonically increasing sequence.
///
/// The counter only moves forward through [`ReceiptSequencer::commit`], which callers invoke
/// after the new value has been persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReceiptSequencer {
    last_issued: u64,
}

impl ReceiptSequencer {
    pub fn new(last_issued: u64) -> Self {
        Self { last_issued }
    }

    pub fn last_issued(&self) -> u64 {
        self.last_issued
    }

    pub fn peek_next(&self) -> Result<u64, CoreError> {
        self.last_issued
            .checked_add(1)
            .ok_or_else(|| CoreError::Validation("receipt sequence exhausted".into()))
    }

    /// Computes the next receipt without advancing the counter.
    pub fn reserve(&self, date: NaiveDate, region: Region) -> Result<ReceiptReservation, CoreError> {
        let sequence = self.peek_next()?;
        Ok(ReceiptReservation {
            receipt: ReceiptNumber::new(date, region, sequence),
            sequence,
        })
    }

    /// Advances the counter to a reservation's sequence. Stale reservations are ignored.
    pub fn commit(&mut self, reservation: &ReceiptReservation) {
        self.last_issued = self.last_issued.max(reservation.sequence);
    }

    /// Raises the counter so it is never below `sequence`, used when stored records carry
    /// numbers beyond a stale counter file.
    pub fn observe(&mut self, sequence: u64) {
        self.last_issued = self.last_issued.max(sequence);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 14).unwrap()
    }

    #[test]
    fn first_receipt_starts_at_one() {
        let sequencer = ReceiptSequencer::default();
        let reservation = sequencer.reserve(date(), Region::Area5No).unwrap();
        assert_eq!(reservation.sequence, 1);
        assert_eq!(reservation.receipt.to_string(), "20250314-5N-0000001");
    }

    #[test]
    fn reserve_does_not_advance_until_commit() {
        let mut sequencer = ReceiptSequencer::new(4);
        let first = sequencer.reserve(date(), Region::J1).unwrap();
        let again = sequencer.reserve(date(), Region::J1).unwrap();
        assert_eq!(first, again);

        sequencer.commit(&first);
        assert_eq!(sequencer.last_issued(), 5);
        let next = sequencer.reserve(date(), Region::J1).unwrap();
        assert_eq!(next.sequence, 6);
    }

    #[test]
    fn commit_and_observe_never_move_backwards() {
        let mut sequencer = ReceiptSequencer::new(10);
        let stale = ReceiptReservation {
            receipt: ReceiptNumber::new(date(), Region::J1, 3),
            sequence: 3,
        };
        sequencer.commit(&stale);
        sequencer.observe(7);
        assert_eq!(sequencer.last_issued(), 10);
        sequencer.observe(12);
        assert_eq!(sequencer.last_issued(), 12);
    }

    #[test]
    fn exhausted_counter_is_reported() {
        let sequencer = ReceiptSequencer::new(u64::MAX);
        assert!(matches!(
            sequencer.reserve(date(), Region::J1),
            Err(CoreError::Validation(_))
        ));
    }
}
