//! Shared in-code dataset for the integration tests.

#![allow(dead_code)]

use pdg_api::{ApiConfig, PdgApi};
use pdg_schema::*;
use pdg_store::MemoryStore;

pub const EDITION: &str = "2024";
pub const OLD_EDITION: &str = "2022";

fn id(id: i64, pdgid: &str, parent: Option<&str>, description: &str, data_type: &str, flags: &str) -> PdgIdRow {
    PdgIdRow {
        id,
        pdgid: pdgid.to_string(),
        parent_pdgid: parent.map(str::to_string),
        description: description.to_string(),
        mode_number: None,
        data_type: Some(data_type.to_string()),
        flags: flags.to_string(),
        sort: id,
    }
}

fn mode(mut row: PdgIdRow, number: i64) -> PdgIdRow {
    row.mode_number = Some(number);
    row
}

#[allow(clippy::too_many_arguments)]
fn data(
    id: i64,
    pdgid: &str,
    edition: &str,
    value: f64,
    error_positive: f64,
    error_negative: f64,
    units: &str,
    in_summary_table: bool,
    flags: &str,
) -> PdgDataRow {
    PdgDataRow {
        id,
        pdgid: pdgid.to_string(),
        edition: edition.to_string(),
        value_type: Some("AC".to_string()),
        in_summary_table,
        confidence_level: None,
        limit_type: None,
        comment: None,
        value: Some(value),
        value_text: Some(format!("{value}")),
        error_positive: Some(error_positive),
        error_negative: Some(error_negative),
        scale_factor: None,
        unit_text: units.to_string(),
        display_value_text: format!("{value}"),
        display_power_of_ten: None,
        display_in_percent: false,
        flags: flags.to_string(),
        sort: id,
    }
}

#[allow(clippy::too_many_arguments)]
fn particle(
    id: i64,
    pdgid: &str,
    item: Option<i64>,
    name: &str,
    cc_type: Option<&str>,
    mcid: Option<i64>,
    charge: Option<f64>,
    charge_type: &str,
) -> PdgParticleRow {
    PdgParticleRow {
        id,
        pdgid: pdgid.to_string(),
        pdgitem_id: item,
        name: name.to_string(),
        cc_type: cc_type.map(str::to_string),
        mcid,
        charge,
        quantum_i: Some("1".to_string()),
        quantum_g: None,
        quantum_j: Some("0".to_string()),
        quantum_p: Some("-".to_string()),
        quantum_c: None,
        charge_type: charge_type.to_string(),
        entry_type: "P".to_string(),
    }
}

fn decay(id: i64, pdgid: &str, item: i64, name: &str, outgoing: bool, multiplier: i64, subdecay: Option<&str>) -> PdgDecayRow {
    PdgDecayRow {
        id,
        pdgid: pdgid.to_string(),
        pdgitem_id: item,
        name: name.to_string(),
        is_outgoing: outgoing,
        multiplier,
        subdecay_id: subdecay.map(str::to_string),
        sort: id,
    }
}

fn item(id: i64, name: &str, item_type: &str) -> PdgItemRow {
    PdgItemRow {
        id,
        name: name.to_string(),
        name_tex: None,
        item_type: item_type.to_string(),
    }
}

fn alias(id: i64, from: i64, to: i64) -> PdgItemMapRow {
    PdgItemMapRow {
        id,
        pdgitem_id: from,
        target_id: to,
        sort: id,
    }
}

fn info(name: &str, value: &str) -> InfoRow {
    InfoRow {
        name: name.to_string(),
        value: value.to_string(),
    }
}

fn doc(id: i64, table: &str, column: &str, value: &str, indicator: Option<&str>, description: &str) -> PdgDocRow {
    PdgDocRow {
        id,
        table_name: table.to_string(),
        column_name: column.to_string(),
        value: value.to_string(),
        indicator: indicator.map(str::to_string),
        description: description.to_string(),
        comment: None,
    }
}

#[allow(clippy::too_many_arguments)]
fn measured(id: i64, measurement: i64, column: Option<&str>, value: f64, pos: f64, neg: f64, sort: i64) -> PdgValueRow {
    PdgValueRow {
        id,
        pdgmeasurement_id: measurement,
        column_name: column.map(str::to_string),
        column_name_tex: None,
        unit_text: Some("MeV".to_string()),
        value_text: Some(format!("{value}")),
        display_value_text: Some(format!("{value}")),
        display_power_of_ten: None,
        display_in_percent: false,
        limit_type: None,
        used_in_average: true,
        used_in_fit: false,
        value: Some(value),
        error_positive: Some(pos),
        error_negative: Some(neg),
        stat_error_positive: Some(pos / 2.0),
        stat_error_negative: Some(neg / 2.0),
        syst_error_positive: Some(pos / 2.0),
        syst_error_negative: Some(neg / 2.0),
        sort,
    }
}

/// Item ids in the fixture.
pub mod items {
    pub const GAMMA: i64 = 1;
    pub const PI_PLUS: i64 = 2;
    pub const PI_MINUS: i64 = 3;
    pub const PI_ZERO: i64 = 4;
    pub const E_PLUS: i64 = 5;
    pub const E_MINUS: i64 = 6;
    /// Generic `e`, aliasing e+ and e-.
    pub const E: i64 = 7;
    /// Single alias of pi+.
    pub const PI_CHARGED: i64 = 8;
    /// Reaches `e` both directly and through `Y`.
    pub const X: i64 = 10;
    pub const Y: i64 = 11;
    pub const LOOP_A: i64 = 12;
    pub const LOOP_B: i64 = 13;
    /// Plain text, no particle behind it.
    pub const ANYTHING: i64 = 14;
}

pub fn dataset() -> Dataset {
    use items::*;

    Dataset {
        pdginfo: vec![
            info("edition", EDITION),
            info("schema_version", "0.2"),
            info("citation", "Particle Data Group, test fixture"),
        ],
        pdgid: vec![
            id(1, "S008", None, "pi+-", "PART", "M"),
            id(2, "S008M", Some("S008"), "pi+- MASS", "M", ""),
            id(3, "S008T", Some("S008"), "pi+- MEAN LIFE", "T", ""),
            id(4, "S009", None, "pi0", "PART", "M"),
            id(5, "S009M", Some("S009"), "pi0 MASS", "M", ""),
            id(6, "S009T", Some("S009"), "pi0 MEAN LIFE", "T", ""),
            mode(id(7, "S009.1", Some("S009"), "pi0 --> 2gamma", "BFX", ""), 1),
            mode(id(8, "S009.2", Some("S009"), "pi0 --> e+ e- gamma", "BFX", ""), 2),
            mode(id(9, "S009.3", Some("S009"), "pi0 --> gamma e+ e-, internal", "BFX1", ""), 3),
            mode(id(10, "S009.4", Some("S009"), "pi0 --> gamma X", "BFI", ""), 4),
            id(11, "S043", None, "W", "PART", "G"),
            id(12, "S043M", Some("S043"), "W MASS", "M", ""),
            id(13, "S043W", Some("S043"), "W WIDTH", "G", ""),
            id(14, "Q007", None, "t", "PART", "Q"),
            id(15, "Q007TP2", Some("Q007"), "t MASS FROM CROSS SECTION", "M", ""),
            id(16, "Q007TP", Some("Q007"), "t MASS (DIRECT)", "M", "D"),
            id(17, "Q007TP4", Some("Q007"), "t POLE MASS", "M", "s"),
            id(18, "S013", None, "K(L)0", "PART", "M"),
            id(19, "S013D", Some("S013"), "m(K(L)0) - m(K(S)0)", "DM", ""),
            id(20, "M018", None, "K*(892)", "PART", "M"),
            id(21, "M018M", Some("M018"), "K*(892)+- MASS", "M", "1"),
            id(22, "M018M0", Some("M018"), "K*(892)0 MASS", "M", "0"),
            mode(id(23, "M018.1", Some("M018"), "K*(892)+ --> pi+ pi0", "BFX", ""), 1),
            id(24, "S003", None, "e", "PART", "L"),
            id(25, "G001", None, "gamma", "PART", "G"),
            id(26, "G001M", Some("G001"), "gamma MASS", "M", ""),
            id(27, "S008A", Some("S008"), "pi+- MASS (ALTERNATE)", "M", "A"),
            id(28, "M019", None, "rho(770)", "PART", "M"),
            id(29, "M900", None, "X(1)", "PART", "M"),
        ],
        pdgdata: {
            let mut rows = vec![
                data(1, "S008M", EDITION, 139.57039, 0.00018, 0.00018, "MeV", true, ""),
                data(2, "S008T", EDITION, 2.6033e-8, 0.0005e-8, 0.0005e-8, "s", true, ""),
                data(3, "S009M", EDITION, 134.9766, 0.0006, 0.0006, "MeV", false, ""),
                data(4, "S009M", EDITION, 134.9768, 0.0005, 0.0005, "MeV", true, ""),
                data(5, "S009T", EDITION, 8.43e-17, 0.13e-17, 0.13e-17, "s", true, ""),
                data(6, "S009.1", EDITION, 0.98823, 0.00034, 0.00034, "", true, ""),
                data(7, "S009.2", EDITION, 0.01174, 0.00035, 0.00035, "", true, ""),
                data(8, "S009.3", EDITION, 0.5, 0.1, 0.1, "", true, ""),
                data(9, "S009.4", EDITION, 0.2, 0.1, 0.1, "", true, ""),
                data(10, "S043M", EDITION, 80.3692, 0.0133, 0.0133, "GeV", true, ""),
                data(11, "S043W", EDITION, 2.085, 0.042, 0.042, "GeV", true, ""),
                data(12, "Q007TP2", EDITION, 162.5, 2.1, 1.5, "GeV", true, ""),
                data(13, "Q007TP", EDITION, 172.57, 0.29, 0.29, "GeV", true, ""),
                data(14, "Q007TP4", EDITION, 172.5, 0.7, 0.7, "GeV", true, ""),
                data(15, "S013D", EDITION, 0.5293, 0.0009, 0.0009, "10^10 hbar s^-1", true, ""),
                data(16, "S013D", EDITION, 0.5289, 0.0010, 0.0010, "10^10 hbar s^-1", true, ""),
                data(17, "M018M", EDITION, 891.67, 0.26, 0.26, "MeV", true, ""),
                data(18, "M018M0", EDITION, 895.55, 0.20, 0.20, "MeV", true, ""),
                data(19, "M018.1", EDITION, 0.67, 0.01, 0.01, "", true, ""),
                data(20, "G001M", EDITION, 1e-18, 0.0, 0.0, "eV", true, ""),
                data(21, "S008M", OLD_EDITION, 139.57061, 0.00024, 0.00024, "MeV", true, ""),
                data(22, "S008A", EDITION, 139.5, 0.1, 0.1, "MeV", true, ""),
            ];
            rows[19].limit_type = Some("U".to_string());
            rows[19].confidence_level = Some(0.95);
            rows[0].value_type = Some("FC".to_string());
            rows[0].scale_factor = Some(1.8);
            rows
        },
        pdgparticle: vec![
            particle(1, "S008", Some(PI_PLUS), "pi+", Some("P"), Some(211), Some(1.0), "S"),
            particle(2, "S008", Some(PI_MINUS), "pi-", Some("A"), Some(-211), Some(-1.0), "S"),
            particle(3, "S009", Some(PI_ZERO), "pi0", Some("S"), Some(111), Some(0.0), "S"),
            particle(4, "S043", None, "W+", Some("P"), Some(24), Some(1.0), "S"),
            particle(5, "S043", None, "W-", Some("A"), Some(-24), Some(-1.0), "S"),
            particle(6, "Q007", None, "t", Some("P"), Some(6), Some(2.0 / 3.0), "S"),
            particle(7, "Q007", None, "tbar", Some("A"), Some(-6), Some(-2.0 / 3.0), "S"),
            particle(8, "S013", None, "K(L)0", Some("S"), Some(130), Some(0.0), "S"),
            particle(9, "M018", None, "K*(892)+", Some("P"), Some(323), Some(1.0), "S"),
            particle(10, "M018", None, "K*(892)-", Some("A"), Some(-323), Some(-1.0), "S"),
            particle(11, "M018", None, "K*(892)0", Some("P"), Some(313), Some(0.0), "S"),
            particle(12, "M018", None, "K*(892)bar0", Some("A"), Some(-313), Some(0.0), "S"),
            particle(13, "M018", None, "K*(892)", None, None, None, "G"),
            particle(14, "M018", None, "K*(892)bar", None, None, None, "G"),
            particle(15, "S003", Some(E_MINUS), "e-", Some("P"), Some(11), Some(-1.0), "S"),
            particle(16, "S003", Some(E_PLUS), "e+", Some("A"), Some(-11), Some(1.0), "S"),
            particle(17, "G001", Some(GAMMA), "gamma", Some("S"), Some(22), Some(0.0), "S"),
            particle(18, "M019", None, "rho(770)", None, Some(113), None, "G"),
            particle(19, "M019", None, "rho(770)+-", None, Some(213), None, "G"),
            particle(20, "M900", None, "X(1)", None, Some(9001), None, "G"),
            particle(21, "M900", None, "X(1)bar", None, Some(-9001), None, "G"),
        ],
        pdgdecay: vec![
            decay(1, "S009.1", PI_ZERO, "pi0", false, 1, None),
            decay(2, "S009.1", GAMMA, "gamma", true, 2, None),
            decay(3, "S009.2", PI_ZERO, "pi0", false, 1, None),
            decay(4, "S009.2", E_PLUS, "e+", true, 1, None),
            decay(5, "S009.2", E_MINUS, "e-", true, 1, None),
            decay(6, "S009.2", GAMMA, "gamma", true, 1, None),
            decay(7, "S009.4", GAMMA, "gamma", true, 0, None),
            decay(8, "M018.1", PI_ZERO, "pi0", true, 1, Some("S009.1")),
            decay(9, "M018.1", PI_PLUS, "pi+", true, 1, None),
        ],
        pdgitem: vec![
            item(GAMMA, "gamma", "P"),
            item(PI_PLUS, "pi+", "P"),
            item(PI_MINUS, "pi-", "P"),
            item(PI_ZERO, "pi0", "P"),
            item(E_PLUS, "e+", "P"),
            item(E_MINUS, "e-", "P"),
            item(E, "e", "G"),
            item(PI_CHARGED, "pi+-", "A"),
            item(X, "X", "G"),
            item(Y, "Y", "A"),
            item(LOOP_A, "loopA", "A"),
            item(LOOP_B, "loopB", "A"),
            item(ANYTHING, "anything", "T"),
        ],
        pdgitem_map: vec![
            alias(1, E, E_PLUS),
            alias(2, E, E_MINUS),
            alias(3, PI_CHARGED, PI_PLUS),
            alias(4, X, E),
            alias(5, X, Y),
            alias(6, Y, E),
            alias(7, LOOP_A, LOOP_B),
            alias(8, LOOP_B, LOOP_A),
        ],
        pdgmeasurement: vec![
            PdgMeasurementRow {
                id: 1,
                pdgid: "S008M".to_string(),
                pdgreference_id: 1,
                event_count: Some("1200".to_string()),
                confidence_level: None,
                technique: Some("SPEC".to_string()),
                charge: Some("+".to_string()),
                changebar: true,
                comment: Some("pionic atoms".to_string()),
                sort: 1,
            },
            PdgMeasurementRow {
                id: 2,
                pdgid: "S008M".to_string(),
                pdgreference_id: 2,
                event_count: None,
                confidence_level: None,
                technique: Some("CNTR".to_string()),
                charge: None,
                changebar: false,
                comment: None,
                sort: 2,
            },
        ],
        pdgmeasurement_values: vec![
            measured(1, 1, None, 139.57077, 0.00018, 0.00018, 1),
            measured(2, 2, Some("MASS"), 139.5702, 0.0004, 0.0002, 1),
            measured(3, 2, Some("MASS DIFF"), 4.5936, 0.0005, 0.0005, 2),
        ],
        pdgreference: vec![
            PdgReferenceRow {
                id: 1,
                document_id: "TROTSENKO 2000".to_string(),
                publication_name: Some("PL B511 125".to_string()),
                publication_year: Some(2000),
                title: Some("Precision pion mass".to_string()),
                doi: Some("10.1016/test".to_string()),
                inspire_id: Some("12345".to_string()),
            },
            PdgReferenceRow {
                id: 2,
                document_id: "JECKELMANN 1994".to_string(),
                publication_name: None,
                publication_year: Some(1994),
                title: None,
                doi: None,
                inspire_id: None,
            },
        ],
        pdgfootnote: vec![PdgFootnoteRow {
            id: 1,
            text: "Uses the muonic correction.".to_string(),
        }],
        pdgmeasurement_footnote: vec![PdgMeasurementFootnoteRow {
            id: 1,
            pdgmeasurement_id: 1,
            pdgfootnote_id: 1,
        }],
        pdgdoc: vec![
            doc(1, "PDGID", "DATA_TYPE", "M", None, "Mass"),
            doc(2, "PDGID", "DATA_TYPE", "G", None, "Width"),
            doc(3, "PDGID", "DATA_TYPE", "PART", None, "Particle"),
            doc(4, "PDGDATA", "VALUE_TYPE", "FC", Some("OUR FIT"), "Fit, constrained"),
            doc(5, "PDGDATA", "VALUE_TYPE", "AC", Some("OUR AVERAGE"), "Average, constrained"),
        ],
    }
}

pub fn store() -> MemoryStore {
    MemoryStore::new(dataset()).unwrap()
}

pub fn api() -> PdgApi<MemoryStore> {
    PdgApi::new(store(), ApiConfig::default()).unwrap()
}

pub fn strict_api() -> PdgApi<MemoryStore> {
    let config = ApiConfig {
        strict: true,
        ..ApiConfig::default()
    };
    PdgApi::new(store(), config).unwrap()
}

pub fn assert_close(actual: f64, expected: f64) {
    let scale = expected.abs().max(1e-300);
    assert!(
        (actual - expected).abs() / scale < 1e-9,
        "expected {expected}, got {actual}"
    );
}
