// Tests for the record store

use geotrawl_core::gps::decode_gps_tags;
use geotrawl_core::model::GpsRecord;
use geotrawl_core::store::{persistable, RecordStore};
use std::fs;
use tempfile::TempDir;

const VALID_TAGS: &str = "GPS Latitude                    : 51 deg 30' 26.00\" N\n\
GPS Longitude                   : 0 deg 7' 39.00\" W\n\
GPS Latitude Ref                : North\n\
GPS Longitude Ref               : West\n";

const BROKEN_TAGS: &str = "GPS Latitude                    : n/a\n\
GPS Longitude                   : n/a\n\
GPS Latitude Ref                : North\n\
GPS Longitude Ref               : West\n";

fn create_test_store() -> (TempDir, RecordStore) {
    let temp_dir = TempDir::new().unwrap();
    let store = RecordStore::new(temp_dir.path().join("addresses.json"));
    (temp_dir, store)
}

fn valid_record(host: &str) -> GpsRecord {
    decode_gps_tags(VALID_TAGS, host)
}

// ============================================================================
// Load Tests
// ============================================================================

#[test]
fn test_load_missing_store_is_empty() {
    let (_temp_dir, store) = create_test_store();
    assert!(!store.exists());
    assert!(store.load_or_empty().is_empty());
}

#[test]
fn test_load_blank_store_is_empty() {
    let (_temp_dir, store) = create_test_store();
    fs::write(store.path(), "  \n").unwrap();
    assert!(store.load_or_empty().is_empty());
}

#[test]
fn test_load_corrupt_store_is_empty() {
    let (_temp_dir, store) = create_test_store();
    fs::write(store.path(), "{ this is not json").unwrap();
    assert!(store.load_or_empty().is_empty());
}

#[test]
fn test_load_wrong_shape_is_empty() {
    let (_temp_dir, store) = create_test_store();
    fs::write(store.path(), r#"{"GoogleMapsLink": "https://x"}"#).unwrap();
    assert!(store.load_or_empty().is_empty());
}

#[test]
fn test_load_existing_records() {
    let (_temp_dir, store) = create_test_store();
    fs::write(
        store.path(),
        r#"[
  {
    "GPSLatitude": "1 deg 0' 0.00\" N",
    "GPSLongitude": "2 deg 0' 0.00\" E",
    "GPSLatitudeRef": "North",
    "GPSLongitudeRef": "East",
    "Latitude": 1,
    "Longitude": 2,
    "GoogleMapsLink": "https://www.google.com/maps?q=1,2",
    "subDomain": "old.example"
  }
]"#,
    )
    .unwrap();

    let records = store.load_or_empty();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].host.as_deref(), Some("old.example"));
    assert_eq!(records[0].map_link.url(), Some("https://www.google.com/maps?q=1,2"));
}

#[test]
fn test_load_skips_foreign_elements() {
    let (_temp_dir, store) = create_test_store();
    fs::write(
        store.path(),
        r#"[{"GoogleMapsLink": "https://www.google.com/maps?q=1,2", "subDomain": "old"}, {"note": "manual"}]"#,
    )
    .unwrap();

    assert_eq!(store.load_raw().len(), 2);
    let records = store.load_or_empty();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].host.as_deref(), Some("old"));
}

// ============================================================================
// Append Tests
// ============================================================================

#[test]
fn test_persistable_excludes_absent_only() {
    let batch = vec![
        valid_record("a.example"),
        GpsRecord::absent(),
        decode_gps_tags(BROKEN_TAGS, "a.example"),
    ];
    let kept: Vec<_> = persistable(&batch).collect();
    assert_eq!(kept.len(), 2);
    assert!(kept.iter().all(|r| !r.is_absent()));
}

#[test]
fn test_append_creates_store() {
    let (_temp_dir, store) = create_test_store();

    let appended = store.append(&[valid_record("a.example")]).unwrap();
    assert_eq!(appended, 1);
    assert!(store.exists());
    assert_eq!(store.load_or_empty().len(), 1);
}

#[test]
fn test_append_keeps_conversion_failures() {
    let (_temp_dir, store) = create_test_store();

    let batch = vec![decode_gps_tags(BROKEN_TAGS, "a.example"), GpsRecord::absent()];
    let appended = store.append(&batch).unwrap();

    assert_eq!(appended, 1);
    let records = store.load_or_empty();
    assert_eq!(records[0].map_link.as_str(), "No valid coordinates available");
}

#[test]
fn test_append_twice_does_not_dedup() {
    let (_temp_dir, store) = create_test_store();

    store.append(&[valid_record("a.example")]).unwrap();
    store.append(&[valid_record("a.example")]).unwrap();

    let records = store.load_or_empty();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0], records[1]);
}

#[test]
fn test_append_preserves_prior_order() {
    let (_temp_dir, store) = create_test_store();

    store.append(&[valid_record("first.example")]).unwrap();
    store
        .append(&[valid_record("second.example"), valid_record("third.example")])
        .unwrap();

    let hosts: Vec<_> = store
        .load_or_empty()
        .into_iter()
        .filter_map(|r| r.host)
        .collect();
    assert_eq!(hosts, vec!["first.example", "second.example", "third.example"]);
}

#[test]
fn test_append_over_corrupt_store() {
    let (_temp_dir, store) = create_test_store();
    fs::write(store.path(), "garbage").unwrap();

    let appended = store.append(&[valid_record("a.example")]).unwrap();
    assert_eq!(appended, 1);
    assert_eq!(store.load_or_empty().len(), 1);
}

#[test]
fn test_append_empty_batch_writes_empty_array() {
    let (_temp_dir, store) = create_test_store();

    let appended = store.append(&[GpsRecord::absent()]).unwrap();
    assert_eq!(appended, 0);
    assert_eq!(fs::read_to_string(store.path()).unwrap(), "[]");
}

#[test]
fn test_store_is_pretty_printed() {
    let (_temp_dir, store) = create_test_store();
    store.append(&[valid_record("a.example")]).unwrap();

    let content = fs::read_to_string(store.path()).unwrap();
    assert!(content.starts_with("[\n  {\n    \"GPSLatitude\""));
}

#[test]
fn test_save_creates_parent_directory() {
    let temp_dir = TempDir::new().unwrap();
    let store = RecordStore::new(temp_dir.path().join("nested/out/addresses.json"));

    store.save(&[valid_record("a.example")]).unwrap();
    assert!(store.exists());
    // no temporary files left behind
    let entries = fs::read_dir(temp_dir.path().join("nested/out")).unwrap().count();
    assert_eq!(entries, 1);
}

#[test]
fn test_append_keeps_foreign_prior_elements() {
    let (_temp_dir, store) = create_test_store();
    fs::write(
        store.path(),
        r#"[{"GoogleMapsLink":"https://www.google.com/maps?q=1,2","subDomain":"old","openedAt":"2024"},{"note":"manual"}]"#,
    )
    .unwrap();

    let appended = store.append(&[valid_record("new")]).unwrap();
    assert_eq!(appended, 1);

    let elements: Vec<serde_json::Value> =
        serde_json::from_str(&fs::read_to_string(store.path()).unwrap()).unwrap();
    assert_eq!(elements.len(), 3);
    assert_eq!(
        elements[0],
        serde_json::json!({
            "GoogleMapsLink": "https://www.google.com/maps?q=1,2",
            "subDomain": "old",
            "openedAt": "2024"
        })
    );
    assert_eq!(elements[1], serde_json::json!({"note": "manual"}));
    assert_eq!(elements[2]["subDomain"], "new");
}

#[test]
fn test_append_keeps_prior_field_order() {
    let (_temp_dir, store) = create_test_store();
    fs::write(store.path(), r#"[{"zeta": 1, "alpha": 2}]"#).unwrap();

    store.append(&[]).unwrap();

    let content = fs::read_to_string(store.path()).unwrap();
    assert!(content.find("zeta").unwrap() < content.find("alpha").unwrap());
}
