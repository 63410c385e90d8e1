//! Typed records, one per dataset table.

use serde::{Deserialize, Serialize};

/// Whole-dataset container used by file-backed stores.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Dataset {
    #[serde(default)]
    pub pdginfo: Vec<InfoRow>,
    #[serde(default)]
    pub pdgid: Vec<PdgIdRow>,
    #[serde(default)]
    pub pdgdata: Vec<PdgDataRow>,
    #[serde(default)]
    pub pdgparticle: Vec<PdgParticleRow>,
    #[serde(default)]
    pub pdgdecay: Vec<PdgDecayRow>,
    #[serde(default)]
    pub pdgitem: Vec<PdgItemRow>,
    #[serde(default)]
    pub pdgitem_map: Vec<PdgItemMapRow>,
    #[serde(default)]
    pub pdgmeasurement: Vec<PdgMeasurementRow>,
    #[serde(default)]
    pub pdgmeasurement_values: Vec<PdgValueRow>,
    #[serde(default)]
    pub pdgreference: Vec<PdgReferenceRow>,
    #[serde(default)]
    pub pdgfootnote: Vec<PdgFootnoteRow>,
    #[serde(default)]
    pub pdgmeasurement_footnote: Vec<PdgMeasurementFootnoteRow>,
    #[serde(default)]
    pub pdgdoc: Vec<PdgDocRow>,
}

/// Metadata key/value pair (edition, schema version, citation, ...).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InfoRow {
    pub name: String,
    pub value: String,
}

/// One PDG Identifier and its metadata.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PdgIdRow {
    pub id: i64,
    pub pdgid: String,
    pub parent_pdgid: Option<String>,
    pub description: String,
    pub mode_number: Option<i64>,
    pub data_type: Option<String>,
    /// Single-character flags augmenting the data type (`A`, `D`, `s`, `0`..`2`, ...).
    #[serde(default)]
    pub flags: String,
    #[serde(default)]
    pub sort: i64,
}

/// One summary value for a quantity in one edition.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PdgDataRow {
    pub id: i64,
    pub pdgid: String,
    pub edition: String,
    pub value_type: Option<String>,
    #[serde(default)]
    pub in_summary_table: bool,
    pub confidence_level: Option<f64>,
    pub limit_type: Option<String>,
    pub comment: Option<String>,
    pub value: Option<f64>,
    pub value_text: Option<String>,
    pub error_positive: Option<f64>,
    pub error_negative: Option<f64>,
    pub scale_factor: Option<f64>,
    #[serde(default)]
    pub unit_text: String,
    #[serde(default)]
    pub display_value_text: String,
    pub display_power_of_ten: Option<i64>,
    #[serde(default)]
    pub display_in_percent: bool,
    #[serde(default)]
    pub flags: String,
    #[serde(default)]
    pub sort: i64,
}

/// One charge state (or generic state) of a particle.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PdgParticleRow {
    pub id: i64,
    pub pdgid: String,
    pub pdgitem_id: Option<i64>,
    pub name: String,
    /// `P` particle, `A` antiparticle, `S` self-conjugate, or null.
    pub cc_type: Option<String>,
    pub mcid: Option<i64>,
    pub charge: Option<f64>,
    pub quantum_i: Option<String>,
    pub quantum_g: Option<String>,
    pub quantum_j: Option<String>,
    pub quantum_p: Option<String>,
    pub quantum_c: Option<String>,
    /// `S` specific charge, `E` explicit-only state, `G` generic charge.
    pub charge_type: String,
    /// `P` for particle rows proper.
    pub entry_type: String,
}

/// One item of a branching fraction's decay product list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PdgDecayRow {
    pub id: i64,
    pub pdgid: String,
    pub pdgitem_id: i64,
    pub name: String,
    #[serde(default)]
    pub is_outgoing: bool,
    pub multiplier: i64,
    pub subdecay_id: Option<String>,
    #[serde(default)]
    pub sort: i64,
}

/// A named decay-product token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PdgItemRow {
    pub id: i64,
    pub name: String,
    pub name_tex: Option<String>,
    #[serde(default)]
    pub item_type: String,
}

/// Alias edge from one item to a target item.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PdgItemMapRow {
    pub id: i64,
    pub pdgitem_id: i64,
    pub target_id: i64,
    #[serde(default)]
    pub sort: i64,
}

/// One literature-reported measurement.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PdgMeasurementRow {
    pub id: i64,
    pub pdgid: String,
    pub pdgreference_id: i64,
    pub event_count: Option<String>,
    pub confidence_level: Option<f64>,
    pub technique: Option<String>,
    pub charge: Option<String>,
    #[serde(default)]
    pub changebar: bool,
    pub comment: Option<String>,
    #[serde(default)]
    pub sort: i64,
}

/// One reported number of a measurement.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PdgValueRow {
    pub id: i64,
    pub pdgmeasurement_id: i64,
    pub column_name: Option<String>,
    pub column_name_tex: Option<String>,
    pub unit_text: Option<String>,
    pub value_text: Option<String>,
    pub display_value_text: Option<String>,
    pub display_power_of_ten: Option<i64>,
    #[serde(default)]
    pub display_in_percent: bool,
    pub limit_type: Option<String>,
    #[serde(default)]
    pub used_in_average: bool,
    #[serde(default)]
    pub used_in_fit: bool,
    pub value: Option<f64>,
    pub error_positive: Option<f64>,
    pub error_negative: Option<f64>,
    pub stat_error_positive: Option<f64>,
    pub stat_error_negative: Option<f64>,
    pub syst_error_positive: Option<f64>,
    pub syst_error_negative: Option<f64>,
    #[serde(default)]
    pub sort: i64,
}

/// Bibliographic metadata.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PdgReferenceRow {
    pub id: i64,
    pub document_id: String,
    pub publication_name: Option<String>,
    pub publication_year: Option<i64>,
    pub title: Option<String>,
    pub doi: Option<String>,
    pub inspire_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PdgFootnoteRow {
    pub id: i64,
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PdgMeasurementFootnoteRow {
    pub id: i64,
    pub pdgmeasurement_id: i64,
    pub pdgfootnote_id: i64,
}

/// Documentation of a key value or flag used in some table column.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PdgDocRow {
    pub id: i64,
    pub table_name: String,
    pub column_name: String,
    pub value: String,
    pub indicator: Option<String>,
    pub description: String,
    pub comment: Option<String>,
}
