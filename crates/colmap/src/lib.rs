//! # colmap
//!
//! Struct-to-column matching and SQL statement helpers.
//!
//! Describe a record type once with `#[derive(Record)]`, then derive column
//! lists, SELECT/INSERT/UPDATE statements and their parameters from it.
//!
//! ## Column matching
//!
//! Every `pub` field maps to the column named after the snake-cased field
//! name; acronyms count as one word, so `HelloRPCWorld` maps to
//! `hello_rpc_world`. Private fields are ignored. The `#[colmap("...")]`
//! attribute overrides the default:
//!
//! ```ignore
//! #[derive(colmap::Record, Default)]
//! pub struct Animal {
//!     // Column "id", selected but never inserted or updated.
//!     #[colmap(",readonly")]
//!     pub id: i64,
//!     // Column "common_name".
//!     #[colmap("common_name")]
//!     pub name: String,
//!     // Column "hage", selected only.
//!     #[colmap("hage,readonly")]
//!     pub age: i32,
//!     // Not mapped.
//!     #[colmap("-")]
//!     pub notes: String,
//!     // Column "weight"; `None` is skipped by `update_query`.
//!     pub weight: Option<f64>,
//! }
//!
//! let select = colmap::select_query::<Animal>("zoo")?;
//! // SELECT id,common_name,hage,weight FROM zoo
//! let insert = colmap::insert_query::<Animal>("zoo")?;
//! // INSERT INTO zoo (common_name,weight) VALUES (?,?)
//! let params = colmap::values(&animal)?;
//! ```
//!
//! ## Placeholders
//!
//! Statements use `?` placeholders unless [`set_numbered_placeholders`] is
//! switched on, or a [`Statements`] builder is created with
//! [`StatementConfig::numbered_placeholders`]. UPDATE statements number their
//! placeholders from `$2`, leaving `$1` for the WHERE clause.
//!
//! ## Errors
//!
//! Builders and accessors return [`MapResult`]. Errors for which
//! [`MapError::is_programming_error`] holds come from broken record
//! definitions or bad field names and should not be retried.

// Lets `#[derive(Record)]` output refer to `::colmap` inside this crate's own tests.
extern crate self as colmap;

pub mod access;
pub mod client;
pub mod error;
pub mod matching;
pub mod naming;
pub mod placeholder;
pub mod record;
pub mod statement;
pub mod transaction;

pub use access::{
    addresses, column_name_of, columns, scan_row, value_of, values, writeable_columns,
};
pub use client::GenericClient;
pub use error::{MapError, MapResult};
pub use matching::{Column, Matching, MatchingCache};
pub use naming::snake_case;
pub use placeholder::{
    Placeholder, PlaceholderStyle, numbered_placeholders, set_numbered_placeholders,
};
pub use record::{FieldDef, Record, ScanTarget, SqlValue};
pub use statement::{
    BoundQuery, StatementConfig, Statements, insert_query, limit_offset, select_alias_query,
    select_query, update_all_query, update_fields_query, update_query, where_clause,
};
pub use transaction::{TransactionOptions, begin_transaction_with};

#[cfg(feature = "derive")]
pub use colmap_derive::Record;

pub mod prelude;
