//! Binding of typed records to the store's tables and columns.
//!
//! Every record type names its table and the columns it reads. A store
//! declares which tables and columns it holds; [`check_all_bindings`] runs
//! once at startup and fails fast on the first missing table or column.

use core::fmt;

use crate::schema::*;
use crate::{SchemaError, SchemaResult};

/// Tables of the PDG dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Table {
    Info,
    PdgId,
    PdgData,
    PdgParticle,
    PdgDecay,
    PdgItem,
    PdgItemMap,
    PdgMeasurement,
    PdgMeasurementValues,
    PdgReference,
    PdgFootnote,
    PdgMeasurementFootnote,
    PdgDoc,
}

impl Table {
    pub const ALL: [Table; 13] = [
        Table::Info,
        Table::PdgId,
        Table::PdgData,
        Table::PdgParticle,
        Table::PdgDecay,
        Table::PdgItem,
        Table::PdgItemMap,
        Table::PdgMeasurement,
        Table::PdgMeasurementValues,
        Table::PdgReference,
        Table::PdgFootnote,
        Table::PdgMeasurementFootnote,
        Table::PdgDoc,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Table::Info => "pdginfo",
            Table::PdgId => "pdgid",
            Table::PdgData => "pdgdata",
            Table::PdgParticle => "pdgparticle",
            Table::PdgDecay => "pdgdecay",
            Table::PdgItem => "pdgitem",
            Table::PdgItemMap => "pdgitem_map",
            Table::PdgMeasurement => "pdgmeasurement",
            Table::PdgMeasurementValues => "pdgmeasurement_values",
            Table::PdgReference => "pdgreference",
            Table::PdgFootnote => "pdgfootnote",
            Table::PdgMeasurementFootnote => "pdgmeasurement_footnote",
            Table::PdgDoc => "pdgdoc",
        }
    }

    /// Columns read by the record bound to this table.
    pub fn columns(self) -> &'static [&'static str] {
        match self {
            Table::Info => InfoRow::COLUMNS,
            Table::PdgId => PdgIdRow::COLUMNS,
            Table::PdgData => PdgDataRow::COLUMNS,
            Table::PdgParticle => PdgParticleRow::COLUMNS,
            Table::PdgDecay => PdgDecayRow::COLUMNS,
            Table::PdgItem => PdgItemRow::COLUMNS,
            Table::PdgItemMap => PdgItemMapRow::COLUMNS,
            Table::PdgMeasurement => PdgMeasurementRow::COLUMNS,
            Table::PdgMeasurementValues => PdgValueRow::COLUMNS,
            Table::PdgReference => PdgReferenceRow::COLUMNS,
            Table::PdgFootnote => PdgFootnoteRow::COLUMNS,
            Table::PdgMeasurementFootnote => PdgMeasurementFootnoteRow::COLUMNS,
            Table::PdgDoc => PdgDocRow::COLUMNS,
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Borrowed view of one column value, used for predicate evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Cell<'a> {
    Null,
    Text(&'a str),
    Int(i64),
    Real(f64),
    Bool(bool),
}

impl Cell<'_> {
    pub fn is_null(&self) -> bool {
        matches!(self, Cell::Null)
    }
}

pub trait AsCell {
    fn as_cell(&self) -> Cell<'_>;
}

impl AsCell for String {
    fn as_cell(&self) -> Cell<'_> {
        Cell::Text(self)
    }
}

impl AsCell for i64 {
    fn as_cell(&self) -> Cell<'_> {
        Cell::Int(*self)
    }
}

impl AsCell for f64 {
    fn as_cell(&self) -> Cell<'_> {
        Cell::Real(*self)
    }
}

impl AsCell for bool {
    fn as_cell(&self) -> Cell<'_> {
        Cell::Bool(*self)
    }
}

impl<T: AsCell> AsCell for Option<T> {
    fn as_cell(&self) -> Cell<'_> {
        match self {
            Some(v) => v.as_cell(),
            None => Cell::Null,
        }
    }
}

/// A typed row of one table.
pub trait Record: Clone + fmt::Debug {
    const TABLE: Table;
    const COLUMNS: &'static [&'static str];

    /// Column value by name; `None` for a column this record does not bind.
    fn column(&self, name: &str) -> Option<Cell<'_>>;

    /// This table's rows inside a whole-dataset container.
    fn rows(dataset: &Dataset) -> &[Self];
}

macro_rules! bind_record {
    ($ty:ty, $table:expr, $field:ident, [$($col:ident),* $(,)?]) => {
        impl Record for $ty {
            const TABLE: Table = $table;
            const COLUMNS: &'static [&'static str] = &[$(stringify!($col)),*];

            fn column(&self, name: &str) -> Option<Cell<'_>> {
                match name {
                    $(stringify!($col) => Some(self.$col.as_cell()),)*
                    _ => None,
                }
            }

            fn rows(dataset: &Dataset) -> &[Self] {
                &dataset.$field
            }
        }
    };
}

bind_record!(InfoRow, Table::Info, pdginfo, [name, value]);
bind_record!(
    PdgIdRow,
    Table::PdgId,
    pdgid,
    [id, pdgid, parent_pdgid, description, mode_number, data_type, flags, sort]
);
bind_record!(
    PdgDataRow,
    Table::PdgData,
    pdgdata,
    [
        id,
        pdgid,
        edition,
        value_type,
        in_summary_table,
        confidence_level,
        limit_type,
        comment,
        value,
        value_text,
        error_positive,
        error_negative,
        scale_factor,
        unit_text,
        display_value_text,
        display_power_of_ten,
        display_in_percent,
        flags,
        sort,
    ]
);
bind_record!(
    PdgParticleRow,
    Table::PdgParticle,
    pdgparticle,
    [
        id,
        pdgid,
        pdgitem_id,
        name,
        cc_type,
        mcid,
        charge,
        quantum_i,
        quantum_g,
        quantum_j,
        quantum_p,
        quantum_c,
        charge_type,
        entry_type,
    ]
);
bind_record!(
    PdgDecayRow,
    Table::PdgDecay,
    pdgdecay,
    [id, pdgid, pdgitem_id, name, is_outgoing, multiplier, subdecay_id, sort]
);
bind_record!(PdgItemRow, Table::PdgItem, pdgitem, [id, name, name_tex, item_type]);
bind_record!(
    PdgItemMapRow,
    Table::PdgItemMap,
    pdgitem_map,
    [id, pdgitem_id, target_id, sort]
);
bind_record!(
    PdgMeasurementRow,
    Table::PdgMeasurement,
    pdgmeasurement,
    [
        id,
        pdgid,
        pdgreference_id,
        event_count,
        confidence_level,
        technique,
        charge,
        changebar,
        comment,
        sort,
    ]
);
bind_record!(
    PdgValueRow,
    Table::PdgMeasurementValues,
    pdgmeasurement_values,
    [
        id,
        pdgmeasurement_id,
        column_name,
        column_name_tex,
        unit_text,
        value_text,
        display_value_text,
        display_power_of_ten,
        display_in_percent,
        limit_type,
        used_in_average,
        used_in_fit,
        value,
        error_positive,
        error_negative,
        stat_error_positive,
        stat_error_negative,
        syst_error_positive,
        syst_error_negative,
        sort,
    ]
);
bind_record!(
    PdgReferenceRow,
    Table::PdgReference,
    pdgreference,
    [
        id,
        document_id,
        publication_name,
        publication_year,
        title,
        doi,
        inspire_id,
    ]
);
bind_record!(PdgFootnoteRow, Table::PdgFootnote, pdgfootnote, [id, text]);
bind_record!(
    PdgMeasurementFootnoteRow,
    Table::PdgMeasurementFootnote,
    pdgmeasurement_footnote,
    [id, pdgmeasurement_id, pdgfootnote_id]
);
bind_record!(
    PdgDocRow,
    Table::PdgDoc,
    pdgdoc,
    [id, table_name, column_name, value, indicator, description, comment]
);

/// Check one table's binding against the columns a store declares for it.
pub fn check_binding(table: Table, declared: Option<&[String]>) -> SchemaResult<()> {
    let declared = declared.ok_or(SchemaError::MissingTable {
        table: table.name(),
    })?;
    for &column in table.columns() {
        if !declared.iter().any(|d| d == column) {
            return Err(SchemaError::MissingColumn {
                table: table.name(),
                column,
            });
        }
    }
    Ok(())
}

/// Check every table binding; `declared` returns a store's columns for a table.
pub fn check_all_bindings<F>(mut declared: F) -> SchemaResult<()>
where
    F: FnMut(Table) -> Option<Vec<String>>,
{
    for table in Table::ALL {
        let columns = declared(table);
        check_binding(table, columns.as_deref())?;
    }
    tracing::debug!(tables = Table::ALL.len(), "schema binding verified");
    Ok(())
}
