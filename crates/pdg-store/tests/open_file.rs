//! Opening a dataset file through the in-memory store.

use pdg_schema::{Dataset, InfoRow, PdgItemMapRow, PdgItemRow, save_json, save_yaml};
use pdg_store::{Aggregate, DataStore, MemoryStore, Query, StoreError};

fn items() -> Dataset {
    Dataset {
        pdginfo: vec![InfoRow {
            name: "edition".to_string(),
            value: "2024".to_string(),
        }],
        pdgitem: vec![
            PdgItemRow {
                id: 1,
                name: "e+".to_string(),
                name_tex: None,
                item_type: "P".to_string(),
            },
            PdgItemRow {
                id: 2,
                name: "E".to_string(),
                name_tex: Some("e".to_string()),
                item_type: "G".to_string(),
            },
        ],
        pdgitem_map: vec![PdgItemMapRow {
            id: 1,
            pdgitem_id: 2,
            target_id: 1,
            sort: 1,
        }],
        ..Dataset::default()
    }
}

#[test]
fn open_json_and_query() {
    let path = std::env::temp_dir().join("pdg_store_open_items.json");
    save_json(&path, &items()).unwrap();

    let store = MemoryStore::open(&path).unwrap();
    let session = store.session().unwrap();
    let generic: Vec<PdgItemRow> = session
        .fetch_rows(&Query::new().like("name", "e%").eq("item_type", "G"))
        .unwrap();
    assert_eq!(generic.len(), 1);
    assert_eq!(generic[0].id, 2);

    let nameless_tex = session
        .fetch_scalar::<PdgItemRow>(Aggregate::Count, &Query::new().is_null("name_tex"))
        .unwrap();
    assert_eq!(nameless_tex, 1);
    drop(session);
    assert_eq!(store.open_sessions(), 0);
    assert_eq!(store.round_trips(), 2);

    let _ = std::fs::remove_file(path);
}

#[test]
fn dangling_alias_rejected_on_open() {
    let mut data = items();
    data.pdgitem_map[0].target_id = 99;
    let path = std::env::temp_dir().join("pdg_store_open_dangling.yaml");
    save_yaml(&path, &data).unwrap();

    let err = MemoryStore::open(&path).unwrap_err();
    assert!(matches!(err, StoreError::Schema(_)));

    let _ = std::fs::remove_file(path);
}
