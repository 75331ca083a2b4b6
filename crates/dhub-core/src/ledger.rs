//! The donation ledger: owns records and the receipt counter, flushes every mutation.

use tracing::{debug, info, warn};
use uuid::Uuid;

use dhub_domain::{
    DonationDraft, DonationRecord, DonationSummary, ReceiptNumber, RecordChanges,
};

use crate::{
    sequencer::{ReceiptReservation, ReceiptSequencer},
    storage::{LedgerStorage, StoredLedger},
    summary_service::SummaryService,
    time::{Clock, SystemClock},
    CoreError,
};

/// Ordered collection of donations, most recent first.
///
/// Mutations take `&mut self`; every successful mutation has been written through the
/// storage backend before it returns. A failed write leaves the in-memory state exactly as
/// it was before the call.
pub struct DonationLedger {
    records: Vec<DonationRecord>,
    sequencer: ReceiptSequencer,
    storage: Box<dyn LedgerStorage>,
    clock: Box<dyn Clock>,
}

impl DonationLedger {
    /// Loads the ledger from `storage` using the system clock.
    pub fn open(storage: Box<dyn LedgerStorage>) -> Result<Self, CoreError> {
        Self::open_with_clock(storage, Box::new(SystemClock))
    }

    pub fn open_with_clock(
        storage: Box<dyn LedgerStorage>,
        clock: Box<dyn Clock>,
    ) -> Result<Self, CoreError> {
        let StoredLedger {
            records,
            last_sequence,
        } = storage.load().map_err(persistence)?;
        let mut sequencer = ReceiptSequencer::new(last_sequence);
        for record in &records {
            sequencer.observe(record.receipt_number.sequence);
        }
        if sequencer.last_issued() != last_sequence {
            warn!(
                stored = last_sequence,
                observed = sequencer.last_issued(),
                "receipt counter behind stored records; advancing"
            );
        }
        debug!(
            records = records.len(),
            last_sequence = sequencer.last_issued(),
            "ledger loaded"
        );
        Ok(Self {
            records,
            sequencer,
            storage,
            clock,
        })
    }

    /// Records a new donation and returns it.
    ///
    /// The counter is flushed before the records so a durable record never carries a
    /// sequence the durable counter has not reached.
    pub fn insert(&mut self, draft: DonationDraft) -> Result<DonationRecord, CoreError> {
        validate_donor_name(&draft.donor_name)?;
        validate_amount(draft.amount)?;

        let reservation = self.sequencer.reserve(self.clock.today(), draft.region)?;
        let mut record = DonationRecord::new(draft, reservation.receipt.clone(), self.clock.now());
        while self.get(record.id).is_some() {
            record.id = Uuid::new_v4();
        }

        self.storage
            .save_sequence(reservation.sequence)
            .map_err(persistence)?;
        self.records.insert(0, record.clone());
        if let Err(err) = self.storage.save_records(&self.records) {
            self.records.remove(0);
            warn!(receipt = %record.receipt_number, error = %err, "insert rolled back");
            self.restore_sequence(&reservation);
            return Err(persistence(err));
        }
        self.sequencer.commit(&reservation);

        info!(
            receipt = %record.receipt_number,
            amount = record.amount,
            category = %record.category,
            region = %record.region,
            "donation recorded"
        );
        Ok(record)
    }

    /// Puts the durable counter back after a failed record flush. When that write fails too,
    /// the reserved number is treated as spent so memory and storage still agree.
    fn restore_sequence(&mut self, reservation: &ReceiptReservation) {
        let previous = self.sequencer.last_issued();
        if let Err(err) = self.storage.save_sequence(previous) {
            warn!(
                sequence = reservation.sequence,
                error = %err,
                "could not restore receipt counter; skipping reserved sequence"
            );
            self.sequencer.commit(reservation);
        }
    }

    /// Applies `changes` to the record identified by `id`.
    pub fn update(&mut self, id: Uuid, changes: RecordChanges) -> Result<DonationRecord, CoreError> {
        let index = self.position(id).ok_or(CoreError::NotFound(id))?;
        if let Some(name) = changes.donor_name.as_deref() {
            validate_donor_name(name)?;
        }
        if let Some(amount) = changes.amount {
            validate_amount(amount)?;
        }
        if changes.is_empty() {
            return Ok(self.records[index].clone());
        }

        let previous = self.records[index].clone();
        self.records[index].apply(changes);
        if let Err(err) = self.storage.save_records(&self.records) {
            self.records[index] = previous;
            warn!(%id, error = %err, "update rolled back");
            return Err(persistence(err));
        }

        let updated = self.records[index].clone();
        info!(receipt = %updated.receipt_number, "donation updated");
        Ok(updated)
    }

    /// Removes the record if present. Deleting an unknown id succeeds and changes nothing.
    pub fn delete(&mut self, id: Uuid) -> Result<Option<DonationRecord>, CoreError> {
        let Some(index) = self.position(id) else {
            debug!(%id, "delete ignored for unknown record");
            return Ok(None);
        };

        let removed = self.records.remove(index);
        if let Err(err) = self.storage.save_records(&self.records) {
            self.records.insert(index, removed);
            warn!(%id, error = %err, "delete rolled back");
            return Err(persistence(err));
        }

        info!(receipt = %removed.receipt_number, "donation deleted");
        Ok(Some(removed))
    }

    /// All records, most recently created first.
    pub fn list(&self) -> &[DonationRecord] {
        &self.records
    }

    pub fn aggregate(&self) -> DonationSummary {
        SummaryService::aggregate(&self.records)
    }

    pub fn get(&self, id: Uuid) -> Option<&DonationRecord> {
        self.records.iter().find(|record| record.id == id)
    }

    pub fn find_by_receipt(&self, receipt: &str) -> Option<&DonationRecord> {
        let parsed = ReceiptNumber::parse(receipt).ok()?;
        self.records
            .iter()
            .find(|record| record.receipt_number == parsed)
    }

    /// Looks a record up by full id, unique id prefix, or receipt number.
    pub fn resolve(&self, key: &str) -> Result<&DonationRecord, CoreError> {
        let key = key.trim();
        if let Ok(id) = Uuid::parse_str(key) {
            return self.get(id).ok_or(CoreError::NotFound(id));
        }
        if let Some(record) = self.find_by_receipt(key) {
            return Ok(record);
        }
        let prefix = key.to_ascii_lowercase().replace('-', "");
        if !prefix.is_empty() && prefix.chars().all(|c| c.is_ascii_hexdigit()) {
            let mut matches = self
                .records
                .iter()
                .filter(|record| record.id.simple().to_string().starts_with(&prefix));
            if let (Some(record), None) = (matches.next(), matches.next()) {
                return Ok(record);
            }
        }
        Err(CoreError::ReceiptNotFound(key.to_string()))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Highest receipt sequence issued over the ledger's lifetime.
    pub fn last_issued_sequence(&self) -> u64 {
        self.sequencer.last_issued()
    }

    fn position(&self, id: Uuid) -> Option<usize> {
        self.records.iter().position(|record| record.id == id)
    }
}

fn validate_donor_name(name: &str) -> Result<(), CoreError> {
    if name.trim().is_empty() {
        return Err(CoreError::Validation("donor name must not be empty".into()));
    }
    Ok(())
}

fn validate_amount(amount: f64) -> Result<(), CoreError> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(CoreError::Validation(format!(
            "amount must be greater than zero (got {amount})"
        )));
    }
    Ok(())
}

fn persistence(err: CoreError) -> CoreError {
    match err {
        CoreError::Persistence(_) => err,
        other => CoreError::Persistence(other.to_string()),
    }
}
