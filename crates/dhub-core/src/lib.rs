//! dhub-core
//!
//! Business logic and services for the donation ledger.
//! Depends on dhub-domain. No CLI, no terminal I/O; persistence goes through [`storage::LedgerStorage`].

pub mod error;
pub mod insight;
pub mod ledger;
pub mod sequencer;
pub mod shared;
pub mod storage;
pub mod summary_service;
pub mod time;

pub use error::CoreError;
pub use insight::*;
pub use ledger::*;
pub use sequencer::*;
pub use shared::*;
pub use summary_service::*;
pub use time::*;
