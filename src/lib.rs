//! Simple to use cli for keeping track of daily screen time. Usage is entered per category and
//! day, then compared against daily and weekly limits.
//!

pub mod cli;
pub mod ledger;
pub mod storage;
pub mod utils;
