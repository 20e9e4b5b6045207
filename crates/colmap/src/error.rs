//! Error types for colmap

use thiserror::Error;

/// Result type alias for colmap operations
pub type MapResult<T> = Result<T, MapError>;

/// Error types for matching, statement building and execution
#[derive(Debug, Error)]
pub enum MapError {
    /// A record type has no column left after filtering
    #[error("struct {type_name} has no usable fields")]
    NoUsableFields { type_name: &'static str },

    /// A field name is absent from the matching (missing, private or excluded)
    #[error("struct {type_name} has no usable field {field}")]
    UnknownField {
        type_name: &'static str,
        field: String,
    },

    /// Every column of a record type is read-only
    #[error("struct {type_name} has no writeable fields")]
    NoWriteableFields { type_name: &'static str },

    /// `update_fields` was called with an empty field list
    #[error("UpdateFieldsQuery requires at least one field")]
    MissingFields,

    /// Query execution error
    #[error("Query error: {0}")]
    Query(#[from] tokio_postgres::Error),

    /// Row not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Other errors
    #[error("{0}")]
    Other(String),
}

impl MapError {
    /// Create an unknown field error
    pub fn unknown_field(type_name: &'static str, field: impl Into<String>) -> Self {
        Self::UnknownField {
            type_name,
            field: field.into(),
        }
    }

    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// Check if this is an unknown field error
    pub fn is_unknown_field(&self) -> bool {
        matches!(self, Self::UnknownField { .. })
    }

    /// Check if this is a not found error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Whether this error reflects a defect in a record type definition or in
    /// the arguments handed to a statement builder.
    ///
    /// These never go away on retry: callers should stop the current unit of
    /// work and report them rather than attempt local recovery.
    pub fn is_programming_error(&self) -> bool {
        matches!(
            self,
            Self::NoUsableFields { .. }
                | Self::UnknownField { .. }
                | Self::NoWriteableFields { .. }
                | Self::MissingFields
        )
    }
}
