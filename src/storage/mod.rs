//!  Storage is organized through [ledger_storage::JsonLedgerStorage].
//!  The basic idea is:
//!   - There is an application directory holding `ledger.json` and an optional `limits.json`.
//!   - The ledger is loaded as a whole on start and written as a whole after every change.
//!   - Bad data never stops the application. Unknown dates and categories are skipped, invalid
//!     amounts become 0, an unreadable ledger becomes an empty one.

pub mod entities;
pub mod ledger_storage;
pub mod limits_config;
