//! Record introspection traits.
//!
//! Rust has no runtime reflection, so a record type describes itself through
//! [`Record`]: a static table of [`FieldDef`]s plus accessors that hand out
//! field values by position. `#[derive(Record)]` generates all of it.

use tokio_postgres::Row;
use tokio_postgres::types::{FromSql, ToSql};

/// One field of a record type, as written in the struct definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDef {
    /// Rust field name
    pub name: &'static str,
    /// Declared type, as written
    pub kind: &'static str,
    /// Whether the field is visible outside its module (`pub`, `pub(crate)`, ...)
    pub exported: bool,
    /// Raw `#[colmap("...")]` text, empty when absent
    pub annotation: &'static str,
}

impl FieldDef {
    pub const fn new(
        name: &'static str,
        kind: &'static str,
        exported: bool,
        annotation: &'static str,
    ) -> Self {
        Self {
            name,
            kind,
            exported,
            annotation,
        }
    }
}

/// A struct whose fields map onto table columns.
///
/// Field positions are indexes into [`Record::field_defs`]. Accessors return
/// `None` for fields the type cannot expose (private or `-`-annotated ones),
/// and for out-of-range positions.
pub trait Record: 'static {
    /// Name of the type, used in error messages.
    fn type_name() -> &'static str;

    /// All fields in declaration order.
    fn field_defs() -> &'static [FieldDef];

    /// Current value of the field at `index`.
    fn field_value(&self, index: usize) -> Option<&dyn SqlValue>;

    /// Scan destinations for every field, indexed like [`Record::field_defs`].
    fn scan_targets(&mut self) -> Vec<Option<&mut dyn ScanTarget>>;
}

/// A field value that can be bound as a statement parameter.
///
/// `Option<T>` plays the role of a pointer field: `None` is "unset", and
/// `Some(v)` binds `v` itself in a changed-only UPDATE even when `v` is zero.
pub trait SqlValue: ToSql + Sync {
    /// Whether this is the zero value of its type.
    fn is_zero(&self) -> bool;

    /// The value as a statement parameter.
    fn as_param(&self) -> &(dyn ToSql + Sync);

    /// The value to bind when the field is written through a changed-only UPDATE.
    fn update_param(&self) -> &(dyn ToSql + Sync) {
        self.as_param()
    }
}

macro_rules! impl_sql_value {
    ($($t:ty => |$v:ident| $zero:expr),+ $(,)?) => {
        $(impl SqlValue for $t {
            fn is_zero(&self) -> bool {
                let $v = self;
                $zero
            }

            fn as_param(&self) -> &(dyn ToSql + Sync) {
                self
            }
        })+
    };
}

impl_sql_value!(
    bool => |v| !*v,
    i8 => |v| *v == 0,
    i16 => |v| *v == 0,
    i32 => |v| *v == 0,
    i64 => |v| *v == 0,
    u32 => |v| *v == 0,
    f32 => |v| *v == 0.0,
    f64 => |v| *v == 0.0,
    String => |v| v.is_empty(),
    uuid::Uuid => |v| v.is_nil(),
    serde_json::Value => |v| v.is_null(),
    chrono::NaiveDate => |v| *v == chrono::NaiveDate::default(),
    chrono::NaiveTime => |v| *v == chrono::NaiveTime::default(),
    chrono::NaiveDateTime => |v| *v == chrono::NaiveDateTime::default(),
    chrono::DateTime<chrono::Utc> => |v| *v == chrono::DateTime::<chrono::Utc>::default(),
);

impl<T> SqlValue for Vec<T>
where
    Vec<T>: ToSql + Sync,
{
    fn is_zero(&self) -> bool {
        self.is_empty()
    }

    fn as_param(&self) -> &(dyn ToSql + Sync) {
        self
    }
}

impl<T: SqlValue> SqlValue for Option<T> {
    fn is_zero(&self) -> bool {
        self.is_none()
    }

    fn as_param(&self) -> &(dyn ToSql + Sync) {
        self
    }

    fn update_param(&self) -> &(dyn ToSql + Sync) {
        match self {
            Some(inner) => inner.as_param(),
            None => self,
        }
    }
}

/// A field that can receive one column of a result row.
pub trait ScanTarget {
    /// Overwrite the field with column `idx` of `row`.
    fn scan(&mut self, row: &Row, idx: usize) -> Result<(), tokio_postgres::Error>;
}

impl std::fmt::Debug for dyn ScanTarget + '_ {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ScanTarget")
    }
}

impl<T> ScanTarget for T
where
    T: for<'a> FromSql<'a>,
{
    fn scan(&mut self, row: &Row, idx: usize) -> Result<(), tokio_postgres::Error> {
        *self = row.try_get(idx)?;
        Ok(())
    }
}
