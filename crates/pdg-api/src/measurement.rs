//! Literature measurements behind the summary values.

use pdg_core::{PdgError, PdgResult};
use pdg_schema::{
    PdgFootnoteRow, PdgMeasurementFootnoteRow, PdgMeasurementRow, PdgReferenceRow, PdgValueRow,
};
use pdg_store::{DataStore, Query, Session};

use crate::api::PdgApi;
use crate::config::Resolution;

/// One measurement from the Particle Listings.
pub struct Measurement<'a, S: DataStore> {
    api: &'a PdgApi<S>,
    row: PdgMeasurementRow,
}

impl<'a, S: DataStore> Measurement<'a, S> {
    pub(crate) fn new(api: &'a PdgApi<S>, row: PdgMeasurementRow) -> Self {
        Self { api, row }
    }

    pub fn id(&self) -> i64 {
        self.row.id
    }

    /// Identifier of the quantity measured.
    pub fn pdgid(&self) -> &str {
        &self.row.pdgid
    }

    pub fn event_count(&self) -> Option<&str> {
        self.row.event_count.as_deref()
    }

    pub fn confidence_level(&self) -> Option<f64> {
        self.row.confidence_level
    }

    pub fn technique(&self) -> Option<&str> {
        self.row.technique.as_deref()
    }

    pub fn charge(&self) -> Option<&str> {
        self.row.charge.as_deref()
    }

    /// Added or updated since the previous edition.
    pub fn changebar(&self) -> bool {
        self.row.changebar
    }

    pub fn comment(&self) -> Option<&str> {
        self.row.comment.as_deref()
    }

    pub fn values(&self) -> PdgResult<Vec<Value<'a, S>>> {
        let session = self.api.session()?;
        let rows = session.fetch_rows::<PdgValueRow>(
            &Query::new()
                .eq("pdgmeasurement_id", self.row.id)
                .order_by("sort"),
        )?;
        Ok(rows.into_iter().map(|row| Value::new(self.api, row)).collect())
    }

    /// The single value of a single-column measurement.
    pub fn value(&self) -> PdgResult<Value<'a, S>> {
        let mut values = self.values()?;
        if values.len() != 1 {
            return Err(PdgError::ambiguous(format!(
                "{} values for measurement {}; use values() instead",
                values.len(),
                self.row.id
            )));
        }
        Ok(values.remove(0))
    }

    pub fn reference(&self) -> PdgResult<Reference<'a, S>> {
        let session = self.api.session()?;
        let row = session
            .fetch_row::<PdgReferenceRow>(&Query::new().eq("id", self.row.pdgreference_id))?
            .ok_or_else(|| {
                PdgError::no_data(format!("Reference {} not found", self.row.pdgreference_id))
            })?;
        Ok(Reference {
            api: self.api,
            row,
        })
    }

    pub fn footnotes(&self) -> PdgResult<Vec<Footnote<'a, S>>> {
        let session = self.api.session()?;
        footnotes_of(self.api, &session, self.row.id)
    }
}

fn footnotes_of<'a, S: DataStore>(
    api: &'a PdgApi<S>,
    session: &Session<'_, S>,
    measurement_id: i64,
) -> PdgResult<Vec<Footnote<'a, S>>> {
    let links = session.fetch_rows::<PdgMeasurementFootnoteRow>(
        &Query::new()
            .eq("pdgmeasurement_id", measurement_id)
            .order_by("id"),
    )?;
    let mut footnotes = Vec::with_capacity(links.len());
    for link in links {
        if let Some(row) =
            session.fetch_row::<PdgFootnoteRow>(&Query::new().eq("id", link.pdgfootnote_id))?
        {
            footnotes.push(Footnote { api, row });
        }
    }
    Ok(footnotes)
}

fn symmetric(
    positive: Option<f64>,
    negative: Option<f64>,
    ctx: Resolution,
    what: &str,
) -> PdgResult<Option<f64>> {
    let (Some(pos), Some(neg)) = (positive, negative) else {
        return Ok(None);
    };
    if ctx.strict && pos != neg {
        return Err(PdgError::ambiguous(format!(
            "{what} is ill-defined under strict resolution when positive and negative errors differ"
        )));
    }
    Ok(Some(0.5 * (pos + neg)))
}

/// One number reported by a measurement.
pub struct Value<'a, S: DataStore> {
    api: &'a PdgApi<S>,
    row: PdgValueRow,
}

impl<'a, S: DataStore> Value<'a, S> {
    fn new(api: &'a PdgApi<S>, row: PdgValueRow) -> Self {
        Self { api, row }
    }

    pub fn id(&self) -> i64 {
        self.row.id
    }

    pub fn measurement(&self) -> PdgResult<Measurement<'a, S>> {
        let session = self.api.session()?;
        let row = session
            .fetch_row::<PdgMeasurementRow>(&Query::new().eq("id", self.row.pdgmeasurement_id))?
            .ok_or_else(|| {
                PdgError::no_data(format!(
                    "Measurement {} not found",
                    self.row.pdgmeasurement_id
                ))
            })?;
        Ok(Measurement::new(self.api, row))
    }

    pub fn column_name(&self) -> Option<&str> {
        self.row.column_name.as_deref()
    }

    pub fn column_name_tex(&self) -> Option<&str> {
        self.row.column_name_tex.as_deref()
    }

    pub fn unit_text(&self) -> Option<&str> {
        self.row.unit_text.as_deref()
    }

    pub fn value_text(&self) -> Option<&str> {
        self.row.value_text.as_deref()
    }

    pub fn display_value_text(&self) -> Option<&str> {
        self.row.display_value_text.as_deref()
    }

    pub fn display_power_of_ten(&self) -> Option<i64> {
        self.row.display_power_of_ten
    }

    pub fn display_in_percent(&self) -> bool {
        self.row.display_in_percent
    }

    pub fn is_limit(&self) -> bool {
        self.row.limit_type.is_some()
    }

    pub fn is_upper_limit(&self) -> bool {
        self.row.limit_type.as_deref() == Some("U")
    }

    pub fn is_lower_limit(&self) -> bool {
        self.row.limit_type.as_deref() == Some("L")
    }

    pub fn used_in_average(&self) -> bool {
        self.row.used_in_average
    }

    pub fn used_in_fit(&self) -> bool {
        self.row.used_in_fit
    }

    pub fn value(&self) -> Option<f64> {
        self.row.value
    }

    pub fn error_positive(&self) -> Option<f64> {
        self.row.error_positive
    }

    pub fn error_negative(&self) -> Option<f64> {
        self.row.error_negative
    }

    pub fn stat_error_positive(&self) -> Option<f64> {
        self.row.stat_error_positive
    }

    pub fn stat_error_negative(&self) -> Option<f64> {
        self.row.stat_error_negative
    }

    pub fn syst_error_positive(&self) -> Option<f64> {
        self.row.syst_error_positive
    }

    pub fn syst_error_negative(&self) -> Option<f64> {
        self.row.syst_error_negative
    }

    /// Mean of the total errors. Strict resolution rejects asymmetric errors.
    pub fn error(&self, ctx: Resolution) -> PdgResult<Option<f64>> {
        symmetric(self.row.error_positive, self.row.error_negative, ctx, "error")
    }

    pub fn stat_error(&self, ctx: Resolution) -> PdgResult<Option<f64>> {
        symmetric(
            self.row.stat_error_positive,
            self.row.stat_error_negative,
            ctx,
            "statistical error",
        )
    }

    pub fn syst_error(&self, ctx: Resolution) -> PdgResult<Option<f64>> {
        symmetric(
            self.row.syst_error_positive,
            self.row.syst_error_negative,
            ctx,
            "systematic error",
        )
    }
}

/// Bibliographic record of a publication.
pub struct Reference<'a, S: DataStore> {
    api: &'a PdgApi<S>,
    row: PdgReferenceRow,
}

impl<'a, S: DataStore> Reference<'a, S> {
    pub fn id(&self) -> i64 {
        self.row.id
    }

    /// Short `AUTHOR YEAR` identifier.
    pub fn document_id(&self) -> &str {
        &self.row.document_id
    }

    pub fn publication_name(&self) -> Option<&str> {
        self.row.publication_name.as_deref()
    }

    pub fn publication_year(&self) -> Option<i64> {
        self.row.publication_year
    }

    pub fn title(&self) -> Option<&str> {
        self.row.title.as_deref()
    }

    pub fn doi(&self) -> Option<&str> {
        self.row.doi.as_deref()
    }

    pub fn inspire_id(&self) -> Option<&str> {
        self.row.inspire_id.as_deref()
    }

    /// Footnotes attached to measurements citing this publication.
    pub fn footnotes(&self) -> PdgResult<Vec<Footnote<'a, S>>> {
        let session = self.api.session()?;
        let measurements = session.fetch_rows::<PdgMeasurementRow>(
            &Query::new()
                .eq("pdgreference_id", self.row.id)
                .order_by("sort"),
        )?;
        let mut footnotes: Vec<Footnote<'a, S>> = Vec::new();
        for measurement in measurements {
            for footnote in footnotes_of(self.api, &session, measurement.id)? {
                if !footnotes.iter().any(|f| f.row.id == footnote.row.id) {
                    footnotes.push(footnote);
                }
            }
        }
        Ok(footnotes)
    }
}

pub struct Footnote<'a, S: DataStore> {
    api: &'a PdgApi<S>,
    row: PdgFootnoteRow,
}

impl<'a, S: DataStore> Footnote<'a, S> {
    pub fn id(&self) -> i64 {
        self.row.id
    }

    pub fn text(&self) -> &str {
        &self.row.text
    }

    /// Measurements referring to this footnote.
    pub fn measurements(&self) -> PdgResult<Vec<Measurement<'a, S>>> {
        let session = self.api.session()?;
        let links = session.fetch_rows::<PdgMeasurementFootnoteRow>(
            &Query::new()
                .eq("pdgfootnote_id", self.row.id)
                .order_by("id"),
        )?;
        let mut measurements = Vec::with_capacity(links.len());
        for link in links {
            if let Some(row) = session.fetch_row::<PdgMeasurementRow>(
                &Query::new().eq("id", link.pdgmeasurement_id),
            )? {
                measurements.push(Measurement::new(self.api, row));
            }
        }
        Ok(measurements)
    }
}

macro_rules! debug_by_id {
    ($($ty:ident),*) => {
        $(
            impl<S: DataStore> std::fmt::Debug for $ty<'_, S> {
                fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                    f.debug_struct(stringify!($ty)).field("row", &self.row).finish()
                }
            }
        )*
    };
}

debug_by_id!(Measurement, Value, Reference, Footnote);
