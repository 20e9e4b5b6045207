//! Transaction helpers.
//!
//! [`transaction!`] runs a block inside a database transaction: it commits when
//! the block returns `Ok`, and rolls back and hands back the block's error
//! when it returns `Err`. Inside the block, `tx` implements
//! [`GenericClient`](crate::GenericClient), so statements built by this crate
//! run on it directly.
//!
//! # Example
//!
//! ```ignore
//! use colmap::{GenericClient, MapResult, insert_query, values};
//!
//! # async fn demo(client: &mut tokio_postgres::Client, animal: &Animal) -> MapResult<()> {
//! colmap::transaction!(client, tx, {
//!     let sql = insert_query::<Animal>("zoo")?;
//!     tx.execute(&sql, &values(animal)?).await?;
//!     Ok(())
//! })?;
//! # Ok(()) }
//! ```

use crate::error::{MapError, MapResult};
use tokio_postgres::IsolationLevel;

/// Runs the given block inside a database transaction.
///
/// - Begins a transaction via `$client.transaction().await`.
/// - Commits on `Ok(_)`.
/// - Rolls back on `Err(_)` and returns that error.
///
/// The block must evaluate to `colmap::MapResult<T>`.
#[macro_export]
macro_rules! transaction {
    ($client:expr, $tx:ident, $body:block) => {{
        let $tx = ($client)
            .transaction()
            .await
            .map_err($crate::MapError::from)?;
        $crate::__finish_transaction!($tx, $body)
    }};
}

/// Like [`transaction!`], with explicit [`TransactionOptions`].
#[macro_export]
macro_rules! transaction_with {
    ($client:expr, $tx:ident, $options:expr, $body:block) => {{
        let $tx = $crate::begin_transaction_with($client, $options).await?;
        $crate::__finish_transaction!($tx, $body)
    }};
}

#[doc(hidden)]
#[macro_export]
macro_rules! __finish_transaction {
    ($tx:ident, $body:block) => {{
        let __colmap_tx_body_result = async { $body }.await;
        match __colmap_tx_body_result {
            Ok(value) => {
                $tx.commit().await.map_err($crate::MapError::from)?;
                Ok(value)
            }
            Err(error) => match $tx.rollback().await {
                Ok(()) => Err(error),
                Err(rollback_err) => Err($crate::transaction::__rollback_failed(
                    error,
                    rollback_err,
                )),
            },
        }
    }};
}

/// Fold a failed rollback into the error that triggered it.
#[doc(hidden)]
pub fn __rollback_failed(error: MapError, rollback_err: tokio_postgres::Error) -> MapError {
    #[cfg(feature = "tracing")]
    tracing::warn!(target: "colmap.transaction", %error, %rollback_err, "rollback failed");
    MapError::Other(format!("{error} (rollback failed: {rollback_err})"))
}

/// Isolation level and access mode for a transaction.
#[derive(Debug, Clone, Copy, Default)]
pub struct TransactionOptions {
    isolation_level: Option<IsolationLevel>,
    read_only: Option<bool>,
    deferrable: Option<bool>,
}

impl TransactionOptions {
    /// Server defaults for everything.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn isolation_level(mut self, level: IsolationLevel) -> Self {
        self.isolation_level = Some(level);
        self
    }

    pub fn read_only(mut self, read_only: bool) -> Self {
        self.read_only = Some(read_only);
        self
    }

    /// Only meaningful for `SERIALIZABLE READ ONLY` transactions.
    pub fn deferrable(mut self, deferrable: bool) -> Self {
        self.deferrable = Some(deferrable);
        self
    }
}

/// Begin a transaction on `client` with the given options.
pub async fn begin_transaction_with(
    client: &mut tokio_postgres::Client,
    options: TransactionOptions,
) -> MapResult<tokio_postgres::Transaction<'_>> {
    let mut builder = client.build_transaction();
    if let Some(level) = options.isolation_level {
        builder = builder.isolation_level(level);
    }
    if let Some(read_only) = options.read_only {
        builder = builder.read_only(read_only);
    }
    if let Some(deferrable) = options.deferrable {
        builder = builder.deferrable(deferrable);
    }
    Ok(builder.start().await?)
}
