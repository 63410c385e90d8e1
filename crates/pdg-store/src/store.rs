//! Data store collaborator interface and scoped sessions.

use pdg_schema::{Cell, Record, Table};

use crate::query::{Aggregate, Query};
use crate::StoreResult;

/// A read-only, tabular data store.
///
/// Row access goes through a [`Session`], which releases the underlying
/// connection when dropped, on every exit path.
pub trait DataStore {
    /// Columns the store holds for `table`, or `None` if the table is absent.
    fn declared_columns(&self, table: Table) -> Option<Vec<String>>;

    fn acquire(&self) -> StoreResult<()>;

    fn release(&self);

    /// Rows of `R`'s table matching `query`, in query order.
    fn select<R: Record>(&self, query: &Query) -> StoreResult<Vec<R>>;

    fn session(&self) -> StoreResult<Session<'_, Self>>
    where
        Self: Sized,
    {
        self.acquire()?;
        Ok(Session { store: self })
    }
}

/// An acquired connection. Released on drop.
pub struct Session<'s, S: DataStore> {
    store: &'s S,
}

impl<S: DataStore> Session<'_, S> {
    pub fn fetch_rows<R: Record>(&self, query: &Query) -> StoreResult<Vec<R>> {
        let rows = self.store.select::<R>(query)?;
        tracing::debug!(
            table = %R::TABLE,
            filters = query.filters.len(),
            rows = rows.len(),
            "fetch rows"
        );
        Ok(rows)
    }

    /// First row in query order, if any.
    pub fn fetch_row<R: Record>(&self, query: &Query) -> StoreResult<Option<R>> {
        Ok(self.fetch_rows::<R>(query)?.into_iter().next())
    }

    pub fn fetch_scalar<R: Record>(&self, aggregate: Aggregate, query: &Query) -> StoreResult<i64> {
        match aggregate {
            Aggregate::Count => {
                let count = self.store.select::<R>(query)?.len();
                tracing::debug!(table = %R::TABLE, filters = query.filters.len(), count, "count rows");
                Ok(i64::try_from(count).unwrap_or(i64::MAX))
            }
        }
    }

    /// Distinct non-null text values of `column`, in first-seen query order.
    pub fn distinct_text<R: Record>(
        &self,
        column: &'static str,
        query: &Query,
    ) -> StoreResult<Vec<String>> {
        let mut values: Vec<String> = Vec::new();
        for row in self.fetch_rows::<R>(query)? {
            if let Some(Cell::Text(text)) = row.column(column) {
                if !values.iter().any(|v| v == text) {
                    values.push(text.to_string());
                }
            }
        }
        Ok(values)
    }
}

impl<S: DataStore> Drop for Session<'_, S> {
    fn drop(&mut self) {
        self.store.release();
    }
}
