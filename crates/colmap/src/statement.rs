//! Statement builders driven by record matchings.
//!
//! Table, alias and column names are inserted verbatim; quoting them is up to
//! the caller. Column order always follows the struct.
//!
//! ```ignore
//! use colmap::{PlaceholderStyle, Record, StatementConfig, Statements};
//!
//! #[derive(Record, Default)]
//! pub struct Animal {
//!     #[colmap(",readonly")]
//!     pub id: i64,
//!     pub name: String,
//! }
//!
//! let stmts = Statements::new(StatementConfig::new().numbered_placeholders(true));
//! assert_eq!(stmts.select::<Animal>("zoo")?, "SELECT id,name FROM zoo");
//! assert_eq!(stmts.insert::<Animal>("zoo")?, "INSERT INTO zoo (name) VALUES ($1)");
//! # Ok::<(), colmap::MapError>(())
//! ```

use std::sync::Arc;

use tokio_postgres::types::ToSql;

use crate::access::column_value;
use crate::error::{MapError, MapResult};
use crate::matching::{Matching, MatchingCache};
use crate::placeholder::{Placeholder, PlaceholderStyle, numbered_placeholders};
use crate::record::Record;

/// Configuration for [`Statements`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatementConfig {
    /// Placeholder style for every statement built with this configuration.
    pub placeholder_style: PlaceholderStyle,
}

impl StatementConfig {
    /// Create a new configuration with defaults (`?` placeholders).
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot the process-wide placeholder setting.
    pub fn from_global() -> Self {
        Self::new().numbered_placeholders(numbered_placeholders())
    }

    /// Use `$n` placeholders when `yes` is true, `?` otherwise.
    pub fn numbered_placeholders(mut self, yes: bool) -> Self {
        self.placeholder_style = PlaceholderStyle::from_numbered(yes);
        self
    }

    /// Set the placeholder style.
    pub fn placeholder_style(mut self, style: PlaceholderStyle) -> Self {
        self.placeholder_style = style;
        self
    }
}

/// A statement together with the parameters to bind, in placeholder order.
#[derive(Debug, Default)]
pub struct BoundQuery<'a> {
    sql: String,
    params: Vec<&'a (dyn ToSql + Sync)>,
}

impl<'a> BoundQuery<'a> {
    pub fn new(sql: String, params: Vec<&'a (dyn ToSql + Sync)>) -> Self {
        Self { sql, params }
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn params(&self) -> &[&'a (dyn ToSql + Sync)] {
        &self.params
    }

    /// True when there was nothing to update.
    pub fn is_empty(&self) -> bool {
        self.sql.is_empty()
    }

    pub fn into_parts(self) -> (String, Vec<&'a (dyn ToSql + Sync)>) {
        (self.sql, self.params)
    }
}

/// Statement builder bound to a placeholder style and a matching cache.
///
/// The style is fixed at construction, so builders on different threads never
/// observe a change of [`set_numbered_placeholders`](crate::set_numbered_placeholders)
/// halfway through a statement.
#[derive(Debug, Clone, Copy)]
pub struct Statements<'c> {
    config: StatementConfig,
    cache: &'c MatchingCache,
}

impl Statements<'static> {
    /// Builder using the process-wide matching cache.
    pub fn new(config: StatementConfig) -> Self {
        Self::with_cache(config, MatchingCache::global())
    }

    /// Builder using the process-wide cache and placeholder setting.
    pub fn current() -> Self {
        Self::new(StatementConfig::from_global())
    }
}

impl<'c> Statements<'c> {
    pub fn with_cache(config: StatementConfig, cache: &'c MatchingCache) -> Self {
        Self { config, cache }
    }

    pub fn config(&self) -> StatementConfig {
        self.config
    }

    /// The matching for `R`, from the cache.
    pub fn matching<R: Record>(&self) -> MapResult<Arc<Matching>> {
        self.cache.resolve::<R>()
    }

    /// Placeholders for UPDATE statements start at `$2`, reserving `$1` for the WHERE clause.
    fn update_placeholder(&self) -> Placeholder {
        Placeholder::starting_at(self.config.placeholder_style, 1)
    }

    /// `SELECT <columns> FROM <table>`, read-only columns included.
    pub fn select<R: Record>(&self, table: &str) -> MapResult<String> {
        let matching = self.matching::<R>()?;
        let mut sql = String::from("SELECT");
        let mut sep = ' ';
        for c in matching.columns() {
            sql.push(sep);
            sql.push_str(c.name());
            sep = ',';
        }
        sql.push_str(" FROM ");
        sql.push_str(table);
        Ok(sql)
    }

    /// `SELECT <alias>.<col0>,<alias>.<col1>,... FROM <table> <alias>`
    pub fn select_alias<R: Record>(&self, table: &str, alias: &str) -> MapResult<String> {
        let matching = self.matching::<R>()?;
        let mut sql = String::from("SELECT");
        let mut sep = ' ';
        for c in matching.columns() {
            sql.push(sep);
            sql.push_str(alias);
            sql.push('.');
            sql.push_str(c.name());
            sep = ',';
        }
        sql.push_str(" FROM ");
        sql.push_str(table);
        sql.push(' ');
        sql.push_str(alias);
        Ok(sql)
    }

    /// `INSERT INTO <table> (<columns>) VALUES (?,?,...)` over the writeable columns.
    ///
    /// Pair with [`values`](crate::values) for the parameters.
    pub fn insert<R: Record>(&self, table: &str) -> MapResult<String> {
        let matching = self.matching::<R>()?;
        let mut sql = format!("INSERT INTO {table} ");
        let mut sep = '(';
        let mut n = 0;
        for c in matching.writeable_columns() {
            sql.push(sep);
            sql.push_str(c.name());
            sep = ',';
            n += 1;
        }
        if n == 0 {
            return Err(MapError::NoWriteableFields {
                type_name: matching.type_name(),
            });
        }

        sql.push_str(") VALUES ");
        let mut p = Placeholder::new(self.config.placeholder_style);
        sep = '(';
        for _ in 0..n {
            sql.push(sep);
            sql.push_str(&p.next());
            sep = ',';
        }
        sql.push(')');
        Ok(sql)
    }

    /// `UPDATE <table> SET <column>=?,...` over every writeable column.
    ///
    /// Pair with [`values`](crate::values) and append a WHERE clause; with
    /// numbered placeholders the SET list starts at `$2`.
    pub fn update_all<R: Record>(&self, table: &str) -> MapResult<String> {
        let matching = self.matching::<R>()?;
        let mut p = self.update_placeholder();
        let sets: Vec<String> = matching
            .writeable_columns()
            .map(|c| format!("{}={}", c.name(), p.next()))
            .collect();
        Ok(format!("UPDATE {table} SET {}", sets.join(",")))
    }

    /// UPDATE for the writeable fields of `record` that hold a non-zero value.
    ///
    /// Zero fields are left out, so a plain field can never be set back to
    /// zero here. Use an `Option` field for that: `None` is skipped, while
    /// `Some(v)` is written (binding `v`) even when `v` is zero. Returns an
    /// empty query when no field qualifies.
    pub fn update<'a, R: Record>(&self, table: &str, record: &'a R) -> MapResult<BoundQuery<'a>> {
        let matching = self.matching::<R>()?;
        let mut p = self.update_placeholder();
        let mut sets = Vec::new();
        let mut params = Vec::new();

        for c in matching.writeable_columns() {
            let value = column_value(record, c)?;
            if !value.is_zero() {
                sets.push(format!("{}={}", c.name(), p.next()));
                params.push(value.update_param());
            }
        }
        if sets.is_empty() {
            return Ok(BoundQuery::default());
        }

        Ok(BoundQuery::new(
            format!("UPDATE {table} SET {}", sets.join(",")),
            params,
        ))
    }

    /// UPDATE for exactly the named fields, in the order given.
    ///
    /// Read-only fields are accepted. Unlike [`Statements::update`], values
    /// are bound as they are, zero or not. Use [`column_name_of`](crate::column_name_of)
    /// first when the names come from untrusted input.
    pub fn update_fields<'a, R: Record>(
        &self,
        table: &str,
        record: &'a R,
        fields: &[&str],
    ) -> MapResult<BoundQuery<'a>> {
        let matching = self.matching::<R>()?;
        if fields.is_empty() {
            return Err(MapError::MissingFields);
        }

        let mut p = self.update_placeholder();
        let mut sets = Vec::with_capacity(fields.len());
        let mut params = Vec::with_capacity(fields.len());
        for field in fields {
            let c = matching.column_of(field)?;
            sets.push(format!("{}={}", c.name(), p.next()));
            params.push(column_value(record, c)?.as_param());
        }

        Ok(BoundQuery::new(
            format!("UPDATE {table} SET {}", sets.join(",")),
            params,
        ))
    }
}

/// [`Statements::select`] with the process-wide settings.
pub fn select_query<R: Record>(table: &str) -> MapResult<String> {
    Statements::current().select::<R>(table)
}

/// [`Statements::select_alias`] with the process-wide settings.
pub fn select_alias_query<R: Record>(table: &str, alias: &str) -> MapResult<String> {
    Statements::current().select_alias::<R>(table, alias)
}

/// [`Statements::insert`] with the process-wide settings.
pub fn insert_query<R: Record>(table: &str) -> MapResult<String> {
    Statements::current().insert::<R>(table)
}

/// [`Statements::update_all`] with the process-wide settings.
pub fn update_all_query<R: Record>(table: &str) -> MapResult<String> {
    Statements::current().update_all::<R>(table)
}

/// [`Statements::update`] with the process-wide settings.
pub fn update_query<'a, R: Record>(table: &str, record: &'a R) -> MapResult<BoundQuery<'a>> {
    Statements::current().update(table, record)
}

/// [`Statements::update_fields`] with the process-wide settings.
pub fn update_fields_query<'a, R: Record>(
    table: &str,
    record: &'a R,
    fields: &[&str],
) -> MapResult<BoundQuery<'a>> {
    Statements::current().update_fields(table, record, fields)
}

/// ` WHERE (<c1>) AND (<c2>) ...` with a leading space, or `""` without conditions.
pub fn where_clause(conditions: &[&str]) -> String {
    if conditions.is_empty() {
        return String::new();
    }
    format!(" WHERE ({})", conditions.join(") AND ("))
}

/// ` LIMIT <limit> OFFSET <offset>` with a leading space; zero parts are omitted.
pub fn limit_offset(limit: i64, offset: i64) -> String {
    let mut out = String::new();
    if limit != 0 {
        out.push_str(&format!(" LIMIT {limit}"));
    }
    if offset != 0 {
        out.push_str(&format!(" OFFSET {offset}"));
    }
    out
}
