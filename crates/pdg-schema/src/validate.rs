//! Structural checks for file-backed datasets.
//!
//! Only file integrity is checked here: unique keys and resolvable
//! references. Physics content is taken as published.

use crate::schema::Dataset;
use std::collections::HashSet;

#[derive(thiserror::Error, Debug)]
pub enum ValidationError {
    #[error("Duplicate ID: {id} in {context}")]
    DuplicateId { id: String, context: String },

    #[error("Missing reference: {id} in {context}")]
    MissingReference { id: String, context: String },
}

pub fn validate_dataset(dataset: &Dataset) -> Result<(), ValidationError> {
    let mut info_names = HashSet::new();
    for info in &dataset.pdginfo {
        if !info_names.insert(info.name.as_str()) {
            return Err(ValidationError::DuplicateId {
                id: info.name.clone(),
                context: "pdginfo".to_string(),
            });
        }
    }

    let mut pdgids = HashSet::new();
    for row in &dataset.pdgid {
        if !pdgids.insert(row.pdgid.to_uppercase()) {
            return Err(ValidationError::DuplicateId {
                id: row.pdgid.clone(),
                context: "pdgid".to_string(),
            });
        }
    }
    unique_keys(dataset.pdgid.iter().map(|r| r.id), "pdgid.id")?;

    for row in &dataset.pdgid {
        if let Some(parent) = &row.parent_pdgid {
            require(&pdgids, parent, || format!("parent of {}", row.pdgid))?;
        }
    }

    unique_keys(dataset.pdgdata.iter().map(|r| r.id), "pdgdata")?;
    for row in &dataset.pdgdata {
        require(&pdgids, &row.pdgid, || format!("pdgdata {}", row.id))?;
    }

    let item_ids = unique_keys(dataset.pdgitem.iter().map(|r| r.id), "pdgitem")?;

    unique_keys(dataset.pdgparticle.iter().map(|r| r.id), "pdgparticle")?;
    for row in &dataset.pdgparticle {
        require(&pdgids, &row.pdgid, || format!("pdgparticle {}", row.id))?;
        if let Some(item) = row.pdgitem_id {
            require_key(&item_ids, item, || format!("pdgparticle {} item", row.id))?;
        }
    }

    unique_keys(dataset.pdgdecay.iter().map(|r| r.id), "pdgdecay")?;
    for row in &dataset.pdgdecay {
        require(&pdgids, &row.pdgid, || format!("pdgdecay {}", row.id))?;
        require_key(&item_ids, row.pdgitem_id, || format!("pdgdecay {} item", row.id))?;
        if let Some(sub) = &row.subdecay_id {
            require(&pdgids, sub, || format!("pdgdecay {} subdecay", row.id))?;
        }
    }

    unique_keys(dataset.pdgitem_map.iter().map(|r| r.id), "pdgitem_map")?;
    for row in &dataset.pdgitem_map {
        require_key(&item_ids, row.pdgitem_id, || format!("pdgitem_map {}", row.id))?;
        require_key(&item_ids, row.target_id, || {
            format!("pdgitem_map {} target", row.id)
        })?;
    }

    let reference_ids = unique_keys(dataset.pdgreference.iter().map(|r| r.id), "pdgreference")?;
    let measurement_ids =
        unique_keys(dataset.pdgmeasurement.iter().map(|r| r.id), "pdgmeasurement")?;
    for row in &dataset.pdgmeasurement {
        require(&pdgids, &row.pdgid, || format!("pdgmeasurement {}", row.id))?;
        require_key(&reference_ids, row.pdgreference_id, || {
            format!("pdgmeasurement {} reference", row.id)
        })?;
    }

    unique_keys(
        dataset.pdgmeasurement_values.iter().map(|r| r.id),
        "pdgmeasurement_values",
    )?;
    for row in &dataset.pdgmeasurement_values {
        require_key(&measurement_ids, row.pdgmeasurement_id, || {
            format!("pdgmeasurement_values {}", row.id)
        })?;
    }

    let footnote_ids = unique_keys(dataset.pdgfootnote.iter().map(|r| r.id), "pdgfootnote")?;
    for row in &dataset.pdgmeasurement_footnote {
        require_key(&measurement_ids, row.pdgmeasurement_id, || {
            format!("pdgmeasurement_footnote {}", row.id)
        })?;
        require_key(&footnote_ids, row.pdgfootnote_id, || {
            format!("pdgmeasurement_footnote {} footnote", row.id)
        })?;
    }

    unique_keys(dataset.pdgdoc.iter().map(|r| r.id), "pdgdoc")?;

    Ok(())
}

fn unique_keys(
    keys: impl Iterator<Item = i64>,
    context: &str,
) -> Result<HashSet<i64>, ValidationError> {
    let mut seen = HashSet::new();
    for key in keys {
        if !seen.insert(key) {
            return Err(ValidationError::DuplicateId {
                id: key.to_string(),
                context: context.to_string(),
            });
        }
    }
    Ok(seen)
}

fn require(
    pdgids: &HashSet<String>,
    pdgid: &str,
    context: impl FnOnce() -> String,
) -> Result<(), ValidationError> {
    if pdgids.contains(&pdgid.to_uppercase()) {
        Ok(())
    } else {
        Err(ValidationError::MissingReference {
            id: pdgid.to_string(),
            context: context(),
        })
    }
}

fn require_key(
    keys: &HashSet<i64>,
    key: i64,
    context: impl FnOnce() -> String,
) -> Result<(), ValidationError> {
    if keys.contains(&key) {
        Ok(())
    } else {
        Err(ValidationError::MissingReference {
            id: key.to_string(),
            context: context(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{PdgDecayRow, PdgIdRow};

    fn id_row(id: i64, pdgid: &str, parent: Option<&str>) -> PdgIdRow {
        PdgIdRow {
            id,
            pdgid: pdgid.to_string(),
            parent_pdgid: parent.map(str::to_string),
            description: String::new(),
            mode_number: None,
            data_type: None,
            flags: String::new(),
            sort: id,
        }
    }

    #[test]
    fn empty_dataset_is_valid() {
        validate_dataset(&Dataset::default()).unwrap();
    }

    #[test]
    fn duplicate_pdgid_rejected() {
        let dataset = Dataset {
            pdgid: vec![id_row(1, "S008", None), id_row(2, "s008", None)],
            ..Dataset::default()
        };
        assert!(matches!(
            validate_dataset(&dataset),
            Err(ValidationError::DuplicateId { .. })
        ));
    }

    #[test]
    fn dangling_parent_rejected() {
        let dataset = Dataset {
            pdgid: vec![id_row(1, "S008M", Some("S008"))],
            ..Dataset::default()
        };
        assert!(matches!(
            validate_dataset(&dataset),
            Err(ValidationError::MissingReference { id, .. }) if id == "S008"
        ));
    }

    #[test]
    fn dangling_decay_item_rejected() {
        let dataset = Dataset {
            pdgid: vec![id_row(1, "S009.1", None)],
            pdgdecay: vec![PdgDecayRow {
                id: 1,
                pdgid: "S009.1".to_string(),
                pdgitem_id: 77,
                name: "gamma".to_string(),
                is_outgoing: true,
                multiplier: 2,
                subdecay_id: None,
                sort: 1,
            }],
            ..Dataset::default()
        };
        assert!(matches!(
            validate_dataset(&dataset),
            Err(ValidationError::MissingReference { id, .. }) if id == "77"
        ));
    }
}
