//! SQLite backend for the commission ledger.

mod sqlite_impl;

pub mod db;
pub use sqlite_impl::SqliteDatabase;
