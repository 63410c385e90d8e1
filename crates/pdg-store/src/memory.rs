//! In-memory reference store over a loaded [`Dataset`].

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::path::Path;

use pdg_schema::{Cell, Dataset, Record, Table, validate_dataset};

use crate::query::Query;
use crate::store::DataStore;
use crate::{StoreError, StoreResult};

#[derive(Debug)]
pub struct MemoryStore {
    dataset: Dataset,
    declared: BTreeMap<Table, Vec<String>>,
    open_sessions: std::cell::Cell<usize>,
    round_trips: std::cell::Cell<usize>,
}

impl MemoryStore {
    pub fn new(dataset: Dataset) -> StoreResult<Self> {
        validate_dataset(&dataset).map_err(pdg_schema::SchemaError::from)?;
        let declared = Table::ALL
            .iter()
            .map(|&table| {
                let cols = table.columns().iter().map(|c| c.to_string()).collect();
                (table, cols)
            })
            .collect();
        Ok(Self {
            dataset,
            declared,
            open_sessions: std::cell::Cell::new(0),
            round_trips: std::cell::Cell::new(0),
        })
    }

    /// Load a YAML or JSON dataset file.
    pub fn open(path: &Path) -> StoreResult<Self> {
        let dataset = pdg_schema::load_path(path)?;
        tracing::info!(path = %path.display(), "opened dataset");
        Self::new(dataset)
    }

    /// Override the declared structure of one table; `None` drops the table.
    pub fn with_declared_columns(mut self, table: Table, columns: Option<Vec<String>>) -> Self {
        match columns {
            Some(cols) => {
                self.declared.insert(table, cols);
            }
            None => {
                self.declared.remove(&table);
            }
        }
        self
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn open_sessions(&self) -> usize {
        self.open_sessions.get()
    }

    /// Number of row fetches served so far.
    pub fn round_trips(&self) -> usize {
        self.round_trips.get()
    }

    fn check_columns<R: Record>(&self, query: &Query) -> StoreResult<()> {
        let declared = self.declared.get(&R::TABLE);
        for column in query.columns() {
            let known = R::COLUMNS.contains(&column)
                && declared.is_some_and(|cols| cols.iter().any(|c| c == column));
            if !known {
                return Err(StoreError::UnknownColumn {
                    table: R::TABLE.name(),
                    column: column.to_string(),
                });
            }
        }
        Ok(())
    }
}

impl DataStore for MemoryStore {
    fn declared_columns(&self, table: Table) -> Option<Vec<String>> {
        self.declared.get(&table).cloned()
    }

    fn acquire(&self) -> StoreResult<()> {
        self.open_sessions.set(self.open_sessions.get() + 1);
        Ok(())
    }

    fn release(&self) {
        self.open_sessions.set(self.open_sessions.get().saturating_sub(1));
    }

    fn select<R: Record>(&self, query: &Query) -> StoreResult<Vec<R>> {
        self.check_columns::<R>(query)?;
        self.round_trips.set(self.round_trips.get() + 1);

        let mut rows: Vec<R> = R::rows(&self.dataset)
            .iter()
            .filter(|row| query.matches(*row))
            .cloned()
            .collect();

        if let Some(column) = query.order_by {
            rows.sort_by(|a, b| {
                let ord = compare_cells(
                    a.column(column).unwrap_or(Cell::Null),
                    b.column(column).unwrap_or(Cell::Null),
                );
                if query.descending { ord.reverse() } else { ord }
            });
        }
        Ok(rows)
    }
}

/// Null sorts first, as in SQLite.
fn compare_cells(a: Cell<'_>, b: Cell<'_>) -> Ordering {
    match (a, b) {
        (Cell::Null, Cell::Null) => Ordering::Equal,
        (Cell::Null, _) => Ordering::Less,
        (_, Cell::Null) => Ordering::Greater,
        (Cell::Int(x), Cell::Int(y)) => x.cmp(&y),
        (Cell::Real(x), Cell::Real(y)) => x.total_cmp(&y),
        (Cell::Int(x), Cell::Real(y)) => (x as f64).total_cmp(&y),
        (Cell::Real(x), Cell::Int(y)) => x.total_cmp(&(y as f64)),
        (Cell::Text(x), Cell::Text(y)) => x.cmp(y),
        (Cell::Bool(x), Cell::Bool(y)) => x.cmp(&y),
        _ => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pdg_schema::InfoRow;

    fn info_store() -> MemoryStore {
        let dataset = Dataset {
            pdginfo: vec![
                InfoRow {
                    name: "edition".to_string(),
                    value: "2024".to_string(),
                },
                InfoRow {
                    name: "citation".to_string(),
                    value: "PDG".to_string(),
                },
            ],
            ..Dataset::default()
        };
        MemoryStore::new(dataset).unwrap()
    }

    #[test]
    fn session_counts_and_releases() {
        let store = info_store();
        {
            let _a = store.session().unwrap();
            let _b = store.session().unwrap();
            assert_eq!(store.open_sessions(), 2);
        }
        assert_eq!(store.open_sessions(), 0);
    }

    #[test]
    fn sorted_fetch() {
        let store = info_store();
        let session = store.session().unwrap();
        let rows: Vec<InfoRow> = session.fetch_rows(&Query::new().order_by("name")).unwrap();
        assert_eq!(rows[0].name, "citation");
        let rows: Vec<InfoRow> = session
            .fetch_rows(&Query::new().order_by_desc("name"))
            .unwrap();
        assert_eq!(rows[0].name, "edition");
    }

    #[test]
    fn unknown_column_is_an_error() {
        let store = info_store();
        let session = store.session().unwrap();
        let err = session
            .fetch_rows::<InfoRow>(&Query::new().eq("no_such", "x"))
            .unwrap_err();
        assert!(matches!(err, StoreError::UnknownColumn { .. }));
    }

    #[test]
    fn undeclared_table_rejects_queries() {
        let store = info_store().with_declared_columns(Table::Info, None);
        assert!(store.declared_columns(Table::Info).is_none());
        let session = store.session().unwrap();
        assert!(
            session
                .fetch_rows::<InfoRow>(&Query::new().eq("name", "edition"))
                .is_err()
        );
    }
}
