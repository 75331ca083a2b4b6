use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc, Mutex,
};

use dhub_domain::DonationRecord;

use crate::CoreError;

/// Durable state read back at startup.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoredLedger {
    /// Records, most recent first.
    pub records: Vec<DonationRecord>,
    /// Highest receipt sequence ever issued.
    pub last_sequence: u64,
}

/// Abstraction over persistence backends. The receipt counter is stored apart from the
/// records so that deleting records never lowers it.
pub trait LedgerStorage: Send + Sync {
    /// Loads stored state. Absence of any prior store yields an empty ledger, not an error.
    fn load(&self) -> Result<StoredLedger, CoreError>;
    fn save_records(&self, records: &[DonationRecord]) -> Result<(), CoreError>;
    fn save_sequence(&self, last_sequence: u64) -> Result<(), CoreError>;
}

impl<S: LedgerStorage + ?Sized> LedgerStorage for Arc<S> {
    fn load(&self) -> Result<StoredLedger, CoreError> {
        (**self).load()
    }

    fn save_records(&self, records: &[DonationRecord]) -> Result<(), CoreError> {
        (**self).save_records(records)
    }

    fn save_sequence(&self, last_sequence: u64) -> Result<(), CoreError> {
        (**self).save_sequence(last_sequence)
    }
}

/// In-process storage for ephemeral sessions and tests.
///
/// Writes can be made to fail on demand to exercise rollback paths.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    state: Mutex<StoredLedger>,
    fail_records: AtomicBool,
    fail_sequence: AtomicBool,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_state(state: StoredLedger) -> Self {
        Self {
            state: Mutex::new(state),
            ..Self::default()
        }
    }

    /// Makes subsequent `save_records` calls fail until reset.
    pub fn fail_record_writes(&self, fail: bool) {
        self.fail_records.store(fail, Ordering::SeqCst);
    }

    /// Makes subsequent `save_sequence` calls fail until reset.
    pub fn fail_sequence_writes(&self, fail: bool) {
        self.fail_sequence.store(fail, Ordering::SeqCst);
    }

    /// Copy of what is currently "on disk".
    pub fn snapshot(&self) -> Result<StoredLedger, CoreError> {
        self.load()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, StoredLedger>, CoreError> {
        self.state
            .lock()
            .map_err(|_| CoreError::Persistence("memory storage lock poisoned".into()))
    }
}

impl LedgerStorage for MemoryStorage {
    fn load(&self) -> Result<StoredLedger, CoreError> {
        Ok(self.lock()?.clone())
    }

    fn save_records(&self, records: &[DonationRecord]) -> Result<(), CoreError> {
        if self.fail_records.load(Ordering::SeqCst) {
            return Err(CoreError::Persistence("record store unavailable".into()));
        }
        self.lock()?.records = records.to_vec();
        Ok(())
    }

    fn save_sequence(&self, last_sequence: u64) -> Result<(), CoreError> {
        if self.fail_sequence.load(Ordering::SeqCst) {
            return Err(CoreError::Persistence("sequence store unavailable".into()));
        }
        self.lock()?.last_sequence = last_sequence;
        Ok(())
    }
}
