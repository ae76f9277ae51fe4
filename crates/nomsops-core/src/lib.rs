//! Record model and filter-form engine for the transfer-filter
//! prototype.
//!
//! Everything here is a pure function over a request's query parameters
//! and the read-only, process-lifetime record lists: clean the raw
//! values into a typed [`QueryState`], filter and sort a record slice,
//! and derive the removable filter descriptions the pages render as
//! chips.

pub mod error;
pub mod fields;
pub mod filter;
pub mod forms;
pub mod provider;
pub mod query;
pub mod records;
pub mod types;

pub use error::CleanError;
pub use fields::{amount_to_pence, FieldKind, FieldSpec};
pub use filter::{DescribeHook, FilterDescription, FilterOutcome, FormSpec, PredicateHook, StopFiltering};
pub use forms::{CREDIT_FORM, DISBURSEMENT_FORM, PRISONER_FORM, RECIPIENT_FORM, SENDER_FORM};
pub use provider::DataProvider;
pub use query::{combine_split_date, QueryState, SortSpec};
pub use records::{Credit, Disbursement, Prisoner, Recipient, Record, Sender};
pub use types::{
    choice_label, AmountPattern, Choices, FieldValue, AMOUNT_PATTERNS, CREDIT_STATUSES,
    DISBURSEMENT_STATUSES, METHODS, PRISONS, SOURCES,
};
