//! Convenient imports for typical `colmap` usage.
//!
//! ```ignore
//! use colmap::prelude::*;
//! ```

pub use crate::{
    BoundQuery, GenericClient, MapError, MapResult, Record, StatementConfig, Statements,
    insert_query, select_query, update_all_query, update_fields_query, update_query, values,
};
