//! Derive macro for colmap
//!
//! Provides `#[derive(Record)]`.

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

mod attrs;
mod record;

/// Derive the `Record` trait for a struct.
///
/// # Example
///
/// ```ignore
/// use colmap::Record;
///
/// #[derive(Record, Default)]
/// pub struct Animal {
///     #[colmap(",readonly")]
///     pub id: i64,
///     #[colmap("common_name")]
///     pub name: String,
///     #[colmap("-")]
///     pub notes: String,
///     secret: i32,
/// }
/// ```
///
/// # Attributes
///
/// - `#[colmap("name")]` - Map field to a different column name
/// - `#[colmap(",readonly")]` - Keep the derived name; never insert or update the column
/// - `#[colmap("name,readonly")]` - Both
/// - `#[colmap("-")]` - Do not map the field
///
/// Fields without `pub` visibility are never mapped.
///
/// # Generated
///
/// - `type_name()` - The struct's name, used in error messages
/// - `field_defs()` - One entry per field, in declaration order
/// - `field_value()` / `scan_targets()` - Typed access to the mapped fields
#[proc_macro_derive(Record, attributes(colmap))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    record::expand(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
