//! Injectable source of the in-memory record lists.
//!
//! The engine never reaches for process globals: whoever owns the
//! datasets (the synthetic generator in production, fixtures in tests)
//! hands them to the views through this trait.

use crate::records::{Credit, Disbursement, Prisoner, Recipient, Sender};

/// Read-only access to the five record lists for the process lifetime.
/// Lists are generated once and never mutated afterwards, so shared
/// references are all a consumer ever needs.
pub trait DataProvider: Send + Sync {
    fn credits(&self) -> &[Credit];
    fn senders(&self) -> &[Sender];
    fn prisoners(&self) -> &[Prisoner];
    fn recipients(&self) -> &[Recipient];
    fn disbursements(&self) -> &[Disbursement];
}
