//! Route modules for the API server
//!
//! One module per record list, each with:
//! - mod.rs: module declaration and exports
//! - api.rs: JSON API endpoint
//! - page.rs: HTML filter page

pub mod credits;
pub mod disbursements;
pub mod prisoners;
pub mod recipients;
pub mod senders;
