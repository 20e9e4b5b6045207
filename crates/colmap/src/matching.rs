//! Field-to-column matching and the per-type matching cache.
//!
//! A [`Matching`] is built once per record type from its [`FieldDef`] table:
//!
//! - private fields are skipped;
//! - the annotation's first segment is the column name (`-` excludes the
//!   field, empty means "derive it from the field name");
//! - a later `readonly` segment keeps the column out of INSERT/UPDATE.

use std::any::TypeId;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

use crate::error::{MapError, MapResult};
use crate::naming::snake_case;
use crate::record::{FieldDef, Record};

/// Annotation keyword marking a select-only column.
pub const READONLY: &str = "readonly";

/// Annotation value excluding a field from the matching.
pub const SKIP: &str = "-";

/// A struct field matched to a database column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    index: usize,
    name: String,
    readonly: bool,
}

impl Column {
    /// Position of the field within the struct.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Name of the database column.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the column is skipped on INSERT/UPDATE (primary keys, automatic timestamps).
    pub fn is_readonly(&self) -> bool {
        self.readonly
    }
}

/// The resolved columns of one record type.
#[derive(Debug)]
pub struct Matching {
    type_name: &'static str,
    type_id: TypeId,
    columns: Vec<Column>,
    by_field: HashMap<&'static str, usize>,
}

impl Matching {
    /// Build the matching for `R` without consulting any cache.
    pub fn of<R: Record>() -> MapResult<Self> {
        Self::build(R::type_name(), TypeId::of::<R>(), R::field_defs())
    }

    /// Build a matching from a field table.
    pub fn build(
        type_name: &'static str,
        type_id: TypeId,
        fields: &'static [FieldDef],
    ) -> MapResult<Self> {
        let mut columns = Vec::with_capacity(fields.len());
        let mut by_field = HashMap::with_capacity(fields.len());

        for (index, field) in fields.iter().enumerate() {
            if !field.exported {
                continue;
            }
            let mut segments = field.annotation.split(',');
            let column_name = segments.next().unwrap_or_default();
            if column_name == SKIP {
                continue;
            }
            let name = if column_name.is_empty() {
                snake_case(field.name)
            } else {
                column_name.to_string()
            };
            // The first segment is always the name, so `readonly` only counts later on.
            let readonly = segments.any(|tag| tag == READONLY);

            by_field.insert(field.name, columns.len());
            columns.push(Column {
                index,
                name,
                readonly,
            });
        }

        if columns.is_empty() {
            return Err(MapError::NoUsableFields { type_name });
        }

        Ok(Self {
            type_name,
            type_id,
            columns,
            by_field,
        })
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Columns in struct order.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Columns in struct order, without the read-only ones.
    pub fn writeable_columns(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter().filter(|c| !c.readonly)
    }

    pub fn writeable_count(&self) -> usize {
        self.writeable_columns().count()
    }

    /// Names of all columns in struct order.
    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    /// Names of all columns in struct order, without the read-only ones.
    pub fn writeable_column_names(&self) -> Vec<String> {
        self.writeable_columns().map(|c| c.name.clone()).collect()
    }

    /// The column matched to the named field.
    ///
    /// A missing field here means the caller named a field that does not
    /// exist, is private or is excluded; that is a bug in the calling code.
    pub fn column_of(&self, field: &str) -> MapResult<&Column> {
        self.by_field
            .get(field)
            .map(|&pos| &self.columns[pos])
            .ok_or_else(|| MapError::unknown_field(self.type_name, field))
    }
}

/// Lazily built matchings keyed by record type.
///
/// Entries are never evicted. Building a matching happens under the lock, so
/// racing first-time callers for the same type observe a single result.
#[derive(Debug, Default)]
pub struct MatchingCache {
    entries: Mutex<HashMap<TypeId, Arc<Matching>>>,
}

impl MatchingCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide cache used by the free statement functions.
    pub fn global() -> &'static MatchingCache {
        static GLOBAL: OnceLock<MatchingCache> = OnceLock::new();
        GLOBAL.get_or_init(MatchingCache::new)
    }

    /// Return the matching for `R`, building and caching it on first use.
    pub fn resolve<R: Record>(&self) -> MapResult<Arc<Matching>> {
        // The map only memoizes; a panic elsewhere cannot leave it inconsistent.
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        let type_id = TypeId::of::<R>();

        if let Some(matching) = entries.get(&type_id) {
            #[cfg(feature = "tracing")]
            tracing::trace!(target: "colmap.matching", type_name = R::type_name(), "matching cache hit");
            return Ok(Arc::clone(matching));
        }

        let matching = Arc::new(Matching::of::<R>()?);
        #[cfg(feature = "tracing")]
        tracing::debug!(
            target: "colmap.matching",
            type_name = R::type_name(),
            columns = matching.columns.len(),
            writeable = matching.writeable_count(),
            "built matching",
        );
        entries.insert(type_id, Arc::clone(&matching));
        Ok(matching)
    }

    /// Number of cached matchings.
    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
