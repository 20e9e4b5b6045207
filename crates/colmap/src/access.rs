//! Field accessors and column introspection.
//!
//! Everything here follows the column order of the record's matching, so the
//! output lines up with statements built by [`Statements`](crate::Statements).

use tokio_postgres::Row;
use tokio_postgres::types::ToSql;

use crate::error::{MapError, MapResult};
use crate::matching::{Column, MatchingCache};
use crate::record::{Record, ScanTarget, SqlValue};

/// The value behind `column` in `record`.
pub(crate) fn column_value<'a, R: Record>(
    record: &'a R,
    column: &Column,
) -> MapResult<&'a dyn SqlValue> {
    record
        .field_value(column.index())
        .ok_or_else(|| unexposed::<R>(column))
}

/// The derive hides accessors for fields it considers unusable; reaching one
/// means the field table and the accessors disagree.
fn unexposed<R: Record>(column: &Column) -> MapError {
    let field = R::field_defs()
        .get(column.index())
        .map_or(column.name(), |f| f.name);
    MapError::unknown_field(R::type_name(), field)
}

/// Mutable references to every matched field of `dest`, read-only ones included.
///
/// Use as scan destinations for rows produced by a statement from
/// [`select_query`](crate::select_query).
pub fn addresses<R: Record>(dest: &mut R) -> MapResult<Vec<&mut dyn ScanTarget>> {
    let matching = MatchingCache::global().resolve::<R>()?;
    let mut targets = dest.scan_targets();
    let mut addrs = Vec::with_capacity(matching.columns().len());
    for c in matching.columns() {
        let target = targets
            .get_mut(c.index())
            .and_then(Option::take)
            .ok_or_else(|| unexposed::<R>(c))?;
        addrs.push(target);
    }
    Ok(addrs)
}

/// Values of the writeable fields of `data`, zero values included.
///
/// Use as parameters for [`insert_query`](crate::insert_query) or
/// [`update_all_query`](crate::update_all_query).
pub fn values<R: Record>(data: &R) -> MapResult<Vec<&(dyn ToSql + Sync)>> {
    let matching = MatchingCache::global().resolve::<R>()?;
    matching
        .writeable_columns()
        .map(|c| column_value(data, c).map(|v| v.as_param()))
        .collect()
}

/// Value of a single named field of `data`.
pub fn value_of<'a, R: Record>(data: &'a R, field: &str) -> MapResult<&'a (dyn ToSql + Sync)> {
    let matching = MatchingCache::global().resolve::<R>()?;
    let c = matching.column_of(field)?;
    Ok(column_value(data, c)?.as_param())
}

/// Names of all columns of `R`, in struct order.
pub fn columns<R: Record>() -> MapResult<Vec<String>> {
    Ok(MatchingCache::global().resolve::<R>()?.column_names())
}

/// Names of the writeable columns of `R`, in struct order.
pub fn writeable_columns<R: Record>() -> MapResult<Vec<String>> {
    Ok(MatchingCache::global().resolve::<R>()?.writeable_column_names())
}

/// Column name for the named field of `R`.
///
/// Use this to validate field names from untrusted input before handing them
/// to [`update_fields_query`](crate::update_fields_query).
pub fn column_name_of<R: Record>(field: &str) -> MapResult<String> {
    let matching = MatchingCache::global().resolve::<R>()?;
    Ok(matching.column_of(field)?.name().to_string())
}

/// Copy the columns of `row` into `dest`, in matching order.
pub fn scan_row<R: Record>(row: &Row, dest: &mut R) -> MapResult<()> {
    for (idx, target) in addresses(dest)?.into_iter().enumerate() {
        target.scan(row, idx)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::tests::test_record;

    test_record!(Mixed {
        Key: i64 = true, ",readonly";
        Label: String = true, "";
        Hidden: String = true, "-";
        Count: Option<i32> = true, "";
        secret: i64 = false, "";
    });

    test_record!(Lonely {
        Only: String = true, "-";
        shy: i64 = false, "";
    });

    #[test]
    fn addresses_cover_every_column() {
        let mut m = Mixed::default();
        assert_eq!(addresses(&mut m).unwrap().len(), 3);
    }

    #[test]
    fn values_skip_readonly_but_not_zero() {
        let m = Mixed {
            Key: 12,
            ..Mixed::default()
        };
        let rendered: Vec<String> = values(&m)
            .unwrap()
            .iter()
            .map(|v| format!("{v:?}"))
            .collect();
        assert_eq!(rendered, ["\"\"", "None"]);
    }

    #[test]
    fn single_field_values() {
        let m = Mixed {
            Label: "tag".to_string(),
            ..Mixed::default()
        };
        assert_eq!(format!("{:?}", value_of(&m, "Label").unwrap()), "\"tag\"");
        assert_eq!(format!("{:?}", value_of(&m, "Key").unwrap()), "0");
        assert!(value_of(&m, "Hidden").unwrap_err().is_unknown_field());
        assert!(value_of(&m, "secret").unwrap_err().is_unknown_field());
    }

    #[test]
    fn column_introspection() {
        assert_eq!(columns::<Mixed>().unwrap(), ["key", "label", "count"]);
        assert_eq!(writeable_columns::<Mixed>().unwrap(), ["label", "count"]);
        assert_eq!(column_name_of::<Mixed>("Count").unwrap(), "count");

        let err = column_name_of::<Mixed>("Hidden").unwrap_err();
        assert_eq!(err.to_string(), "struct Mixed has no usable field Hidden");
    }

    #[test]
    fn unusable_types_fail_everywhere() {
        let mut l = Lonely::default();
        let want = "struct Lonely has no usable fields";
        assert_eq!(columns::<Lonely>().unwrap_err().to_string(), want);
        assert_eq!(values(&l).unwrap_err().to_string(), want);
        assert_eq!(addresses(&mut l).unwrap_err().to_string(), want);
    }
}
