//! Database port. The ArangoDB client implements this; nothing in here knows
//! about connections or transport.

use crate::aql::AqlQuery;
use async_trait::async_trait;
use futures::stream::{BoxStream, StreamExt, TryStreamExt};
use serde_json::Value as Json;
use std::fmt;

/// Result rows of one executed query, yielded in server order.
pub type Cursor<E> = BoxStream<'static, Result<Json, E>>;

#[cfg_attr(test, mockall::automock(type Error = ();))]
#[async_trait]
pub trait AqlDatabase: Send + Sync {
    type Error: fmt::Debug + Send + Sync + 'static;

    /// Execute an assembled query and return a cursor over its results.
    async fn query(&self, query: &AqlQuery) -> Result<Cursor<Self::Error>, Self::Error>;
}

/// Fetch the next single value, or `None` once the cursor is drained.
pub async fn next_value<E>(cursor: &mut Cursor<E>) -> Result<Option<Json>, E> {
    cursor.next().await.transpose()
}

/// Fetch all remaining values.
pub async fn all_values<E>(cursor: Cursor<E>) -> Result<Vec<Json>, E> {
    cursor.try_collect().await
}

/// Wrap already-materialized rows as a cursor.
pub fn cursor_from_rows<E: Send + 'static>(rows: Vec<Json>) -> Cursor<E> {
    futures::stream::iter(rows.into_iter().map(Ok)).boxed()
}
