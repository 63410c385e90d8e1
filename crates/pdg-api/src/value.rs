//! Summary values: published averages, fits, limits and evaluations.

use pdg_core::{PdgResult, conversion_factor, convert};
use pdg_schema::PdgDataRow;

use crate::best::DataFlags;

/// PDG indicator string for a summary value type key.
pub fn value_type_indicator(key: Option<&str>) -> &'static str {
    match key {
        Some("AC" | "D" | "E") => "OUR AVERAGE",
        Some("L") => "BEST LIMIT",
        Some("OL") => "OUR LIMIT",
        Some("FC" | "DR") => "OUR FIT",
        Some("V" | "DV") => "OUR EVALUATION",
        _ => "",
    }
}

/// One summary value of a property, immutable.
///
/// Unit conversion yields a new record through [`SummaryValue::converted`].
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryValue {
    pdgid: String,
    description: String,
    edition: String,
    value_type_key: Option<String>,
    in_summary_table: bool,
    confidence_level: Option<f64>,
    limit_type: Option<String>,
    comment: Option<String>,
    value: Option<f64>,
    value_text: Option<String>,
    error_positive: Option<f64>,
    error_negative: Option<f64>,
    scale_factor: Option<f64>,
    units: String,
    original_units: Option<String>,
    display_value_text: String,
    display_power_of_ten: Option<i64>,
    display_in_percent: bool,
    flags: String,
}

impl SummaryValue {
    pub fn from_row(row: PdgDataRow, description: &str) -> Self {
        Self {
            pdgid: row.pdgid,
            description: description.to_string(),
            edition: row.edition,
            value_type_key: row.value_type,
            in_summary_table: row.in_summary_table,
            confidence_level: row.confidence_level,
            limit_type: row.limit_type,
            comment: row.comment,
            value: row.value,
            value_text: row.value_text,
            error_positive: row.error_positive,
            error_negative: row.error_negative,
            scale_factor: row.scale_factor,
            units: row.unit_text,
            original_units: None,
            display_value_text: row.display_value_text,
            display_power_of_ten: row.display_power_of_ten,
            display_in_percent: row.display_in_percent,
            flags: row.flags,
        }
    }

    pub fn pdgid(&self) -> &str {
        &self.pdgid
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn edition(&self) -> &str {
        &self.edition
    }

    pub fn value_type_key(&self) -> Option<&str> {
        self.value_type_key.as_deref()
    }

    /// Indicator such as `OUR FIT`, empty when the key has none.
    pub fn value_type(&self) -> &'static str {
        value_type_indicator(self.value_type_key.as_deref())
    }

    pub fn in_summary_table(&self) -> bool {
        self.in_summary_table
    }

    pub fn confidence_level(&self) -> Option<f64> {
        self.confidence_level
    }

    pub fn limit_type(&self) -> Option<&str> {
        self.limit_type.as_deref()
    }

    pub fn is_limit(&self) -> bool {
        self.confidence_level.is_some() || self.limit_type.is_some()
    }

    pub fn is_upper_limit(&self) -> bool {
        self.limit_type.as_deref() == Some("U")
    }

    pub fn is_lower_limit(&self) -> bool {
        self.limit_type.as_deref() == Some("L")
    }

    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    /// Value in [`SummaryValue::units`]; check `is_limit` before reading it as a central value.
    pub fn value(&self) -> Option<f64> {
        self.value
    }

    pub fn value_text(&self) -> Option<&str> {
        self.value_text.as_deref()
    }

    pub fn error_positive(&self) -> Option<f64> {
        self.error_positive
    }

    pub fn error_negative(&self) -> Option<f64> {
        self.error_negative
    }

    /// Error scale factor already applied to the errors; 1.0 when unset.
    pub fn scale_factor(&self) -> f64 {
        self.scale_factor.unwrap_or(1.0)
    }

    pub fn units(&self) -> &str {
        &self.units
    }

    /// Units before conversion, for converted values.
    pub fn original_units(&self) -> Option<&str> {
        self.original_units.as_deref()
    }

    pub fn display_value_text(&self) -> &str {
        &self.display_value_text
    }

    pub fn display_power_of_ten(&self) -> Option<i64> {
        self.display_power_of_ten
    }

    pub fn display_in_percent(&self) -> bool {
        self.display_in_percent
    }

    pub fn get_value(&self, units: Option<&str>) -> PdgResult<Option<f64>> {
        self.in_units(self.value, units)
    }

    pub fn get_error_positive(&self, units: Option<&str>) -> PdgResult<Option<f64>> {
        self.in_units(self.error_positive, units)
    }

    pub fn get_error_negative(&self, units: Option<&str>) -> PdgResult<Option<f64>> {
        self.in_units(self.error_negative, units)
    }

    /// Symmetric error: the mean of both errors when they differ by less
    /// than 10% of that mean. `None` for limits and asymmetric errors.
    pub fn get_error(&self, units: Option<&str>) -> PdgResult<Option<f64>> {
        if self.is_limit() {
            return Ok(None);
        }
        let (Some(pos), Some(neg)) = (self.error_positive, self.error_negative) else {
            return Ok(None);
        };
        let mean = (pos + neg) / 2.0;
        if (pos - neg).abs() < 0.1 * mean {
            self.in_units(Some(mean), units)
        } else {
            Ok(None)
        }
    }

    /// Shorthand for `get_error(None)`.
    pub fn error(&self) -> Option<f64> {
        self.get_error(None).ok().flatten()
    }

    /// Copy rescaled to `to_units`. Display-only fields are cleared.
    pub fn converted(&self, to_units: &str) -> PdgResult<SummaryValue> {
        let factor = conversion_factor(&self.units, to_units)?;
        Ok(SummaryValue {
            value: self.value.map(|v| v * factor),
            error_positive: self.error_positive.map(|e| e * factor),
            error_negative: self.error_negative.map(|e| e * factor),
            value_text: None,
            display_value_text: String::new(),
            display_power_of_ten: None,
            display_in_percent: false,
            units: to_units.to_string(),
            original_units: Some(
                self.original_units
                    .clone()
                    .unwrap_or_else(|| self.units.clone()),
            ),
            ..self.clone()
        })
    }

    fn in_units(&self, quantity: Option<f64>, units: Option<&str>) -> PdgResult<Option<f64>> {
        match (quantity, units) {
            (None, _) => Ok(None),
            (Some(q), None) => Ok(Some(q)),
            (Some(q), Some(to)) => Ok(Some(convert(q, &self.units, to)?)),
        }
    }
}

impl DataFlags for SummaryValue {
    fn data_flags(&self) -> PdgResult<&str> {
        Ok(&self.flags)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use pdg_core::{PdgError, UnitError};

    pub(crate) fn data_row(value: f64, pos: f64, neg: f64, units: &str) -> PdgDataRow {
        PdgDataRow {
            id: 1,
            pdgid: "S008M".to_string(),
            edition: "2024".to_string(),
            value_type: Some("FC".to_string()),
            in_summary_table: true,
            confidence_level: None,
            limit_type: None,
            comment: None,
            value: Some(value),
            value_text: Some(format!("{value}")),
            error_positive: Some(pos),
            error_negative: Some(neg),
            scale_factor: None,
            unit_text: units.to_string(),
            display_value_text: format!("{value}"),
            display_power_of_ten: Some(0),
            display_in_percent: true,
            flags: String::new(),
            sort: 1,
        }
    }

    #[test]
    fn raw_and_converted_access() {
        let v = SummaryValue::from_row(data_row(139.57, 0.0002, 0.0002, "MeV"), "pi+- mass");
        assert_eq!(v.get_value(None).unwrap(), Some(139.57));
        let gev = v.get_value(Some("GeV")).unwrap().unwrap();
        assert!((gev - 0.13957).abs() < 1e-12);
        assert_eq!(v.value_type(), "OUR FIT");
        assert_eq!(v.scale_factor(), 1.0);
    }

    #[test]
    fn symmetric_error_rule() {
        let close = SummaryValue::from_row(data_row(1.0, 0.105, 0.095, "GeV"), "");
        assert!((close.get_error(None).unwrap().unwrap() - 0.1).abs() < 1e-12);

        let far = SummaryValue::from_row(data_row(1.0, 0.2, 0.1, "GeV"), "");
        assert_eq!(far.get_error(None).unwrap(), None);
    }

    #[test]
    fn limits_have_no_error() {
        let mut row = data_row(1.0, 0.1, 0.1, "GeV");
        row.limit_type = Some("U".to_string());
        let v = SummaryValue::from_row(row, "");
        assert!(v.is_limit());
        assert!(v.is_upper_limit());
        assert!(!v.is_lower_limit());
        assert_eq!(v.get_error(None).unwrap(), None);

        let mut row = data_row(1.0, 0.1, 0.1, "GeV");
        row.confidence_level = Some(0.9);
        assert!(SummaryValue::from_row(row, "").is_limit());
    }

    #[test]
    fn converted_is_a_new_record() {
        let v = SummaryValue::from_row(data_row(139.57, 0.2, 0.2, "MeV"), "pi+- mass");
        let c = v.converted("GeV").unwrap();
        assert_eq!(v.units(), "MeV");
        assert_eq!(c.units(), "GeV");
        assert_eq!(c.original_units(), Some("MeV"));
        assert!((c.value().unwrap() - 0.13957).abs() < 1e-12);
        assert!((c.error_positive().unwrap() - 0.0002).abs() < 1e-12);
        assert_eq!(c.value_text(), None);
        assert_eq!(c.display_value_text(), "");
        assert_eq!(c.display_power_of_ten(), None);
        assert!(!c.display_in_percent());
        assert_eq!(c.description(), "pi+- mass");
    }

    #[test]
    fn incompatible_conversion_fails() {
        let v = SummaryValue::from_row(data_row(1.0, 0.1, 0.1, "MeV"), "");
        let err = v.converted("s").unwrap_err();
        assert!(matches!(
            err,
            PdgError::Unit(UnitError::IncompatibleDimensions { .. })
        ));
        assert!(v.get_value(Some("furlong")).is_err());
    }

    #[test]
    fn indicator_table() {
        assert_eq!(value_type_indicator(Some("AC")), "OUR AVERAGE");
        assert_eq!(value_type_indicator(Some("L")), "BEST LIMIT");
        assert_eq!(value_type_indicator(Some("OL")), "OUR LIMIT");
        assert_eq!(value_type_indicator(Some("DV")), "OUR EVALUATION");
        assert_eq!(value_type_indicator(Some("XX")), "");
        assert_eq!(value_type_indicator(None), "");
    }
}
