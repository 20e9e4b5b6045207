//! Generic client trait for unified database access.
//!
//! Statements and parameters produced by this crate are plain
//! `(&str, &[&(dyn ToSql + Sync)])` pairs; this trait runs them on either a
//! connection or a transaction and scans result rows back into records.

use crate::access::scan_row;
use crate::error::{MapError, MapResult};
use crate::record::Record;
use tokio_postgres::Row;
use tokio_postgres::types::ToSql;

/// A trait that unifies database clients and transactions.
///
/// This allows repository methods to accept either a direct client connection
/// or a transaction, making it easy to compose operations within transactions.
pub trait GenericClient: Send + Sync {
    /// Execute a query and return all rows.
    fn query(
        &self,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> impl std::future::Future<Output = MapResult<Vec<Row>>> + Send;

    /// Execute a statement and return the number of affected rows.
    fn execute(
        &self,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> impl std::future::Future<Output = MapResult<u64>> + Send;

    /// Execute a query and return the first row, if any.
    ///
    /// Extra rows are ignored.
    fn query_opt(
        &self,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> impl std::future::Future<Output = MapResult<Option<Row>>> + Send {
        async move {
            let rows = self.query(sql, params).await?;
            Ok(rows.into_iter().next())
        }
    }

    /// Execute a query and scan every row into a fresh `R`.
    ///
    /// The query's columns must be in matching order, as produced by
    /// [`select_query`](crate::select_query).
    fn fetch_records<R>(
        &self,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> impl std::future::Future<Output = MapResult<Vec<R>>> + Send
    where
        R: Record + Default + Send,
    {
        async move {
            #[cfg(feature = "tracing")]
            tracing::debug!(target: "colmap.sql", sql, param_count = params.len(), "fetch records");
            let rows = self.query(sql, params).await?;
            let mut records = Vec::with_capacity(rows.len());
            for row in &rows {
                let mut record = R::default();
                scan_row(row, &mut record)?;
                records.push(record);
            }
            Ok(records)
        }
    }

    /// Execute a query and scan the first row into a fresh `R`.
    ///
    /// Returns [`MapError::NotFound`] if no rows are returned.
    fn fetch_record<R>(
        &self,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> impl std::future::Future<Output = MapResult<R>> + Send
    where
        R: Record + Default + Send,
    {
        async move {
            #[cfg(feature = "tracing")]
            tracing::debug!(target: "colmap.sql", sql, param_count = params.len(), "fetch record");
            let row = self
                .query_opt(sql, params)
                .await?
                .ok_or_else(|| MapError::not_found("Expected one row, got none"))?;
            let mut record = R::default();
            scan_row(&row, &mut record)?;
            Ok(record)
        }
    }
}

impl GenericClient for tokio_postgres::Client {
    async fn query(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> MapResult<Vec<Row>> {
        Ok(tokio_postgres::Client::query(self, sql, params).await?)
    }

    async fn execute(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> MapResult<u64> {
        Ok(tokio_postgres::Client::execute(self, sql, params).await?)
    }
}

impl GenericClient for tokio_postgres::Transaction<'_> {
    async fn query(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> MapResult<Vec<Row>> {
        Ok(tokio_postgres::Transaction::query(self, sql, params).await?)
    }

    async fn execute(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> MapResult<u64> {
        Ok(tokio_postgres::Transaction::execute(self, sql, params).await?)
    }
}
