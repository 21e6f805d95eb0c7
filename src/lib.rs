//! loandb - validated storage for loan applications, predictions and analytics
//!
//! Every record passes the schema validator before it is stored; unique
//! indexes reject duplicate keys; collection logs are checksummed and
//! replayed on open.

pub mod cli;
pub mod index;
pub mod observability;
pub mod schema;
pub mod seed;
pub mod store;
