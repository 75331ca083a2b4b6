//! dhub-domain
//!
//! Pure domain models (DonationRecord, categories, regions, receipt numbers, summaries).
//! No I/O, no CLI, no storage. Only data types and core enums.

pub mod category;
pub mod common;
pub mod receipt;
pub mod record;
pub mod region;
pub mod summary;

pub use category::*;
pub use common::*;
pub use receipt::*;
pub use record::*;
pub use region::*;
pub use summary::*;
