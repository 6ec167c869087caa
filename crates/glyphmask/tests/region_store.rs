//! Region template store tests on a temporary file.

use glyphmask::region::{
    DEFAULT_TEMPLATE, JsonRegionStore, RangeRule, Region, RegionRules, RegionStore, StyleRule,
    default_templates,
};
use glyphmask::sprite::TextStyle;
use glyphmask_core::PlacementMode;
use glyphmask_core::math::Vec2;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn banner() -> Region {
    Region::new(
        "Banner",
        vec![
            Vec2::new(0.25, 0.0),
            Vec2::new(0.75, 0.0),
            Vec2::new(0.75, 0.125),
            Vec2::new(0.25, 0.125),
        ],
        RegionRules {
            size_range: RangeRule::new(24, 48),
            word_count_range: RangeRule::new(1, 2),
            text_type: StyleRule::Only(TextStyle::Arc),
            placement_mode: PlacementMode::Fit,
            enforce_boundaries: true,
        },
    )
}

// ==== Opening ====

#[test]
fn test_missing_file_writes_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("regions.json");
    let store = JsonRegionStore::open(&path);

    assert!(path.exists());
    assert_eq!(store.len(), default_templates().len());
    assert_eq!(store.list_template_names()[0], DEFAULT_TEMPLATE);
    assert_eq!(store.load_template(DEFAULT_TEMPLATE).len(), 3);
}

#[test]
fn test_corrupt_file_reverts_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("regions.json");
    std::fs::write(&path, "{ not json").unwrap();

    let store = JsonRegionStore::open(&path);
    assert_eq!(store.list_template_names(), default_templates().keys().cloned().collect::<Vec<_>>());

    // The broken file has been replaced.
    let reopened = JsonRegionStore::open(&path);
    assert_eq!(reopened.len(), store.len());
}

#[test]
fn test_loose_fields_are_sanitized_on_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("regions.json");
    std::fs::write(
        &path,
        r#"{ "Loose": [ { "shape": [[0, 0], [1, 0], [1, 1]], "rules": { "size_range": [60, 10], "text_type": "bogus" } } ] }"#,
    )
    .unwrap();

    let store = JsonRegionStore::open(&path);
    let regions = store.load_template("Loose");
    assert_eq!(regions.len(), 1);
    assert_eq!(regions[0].name, "Region 1");
    assert_eq!(regions[0].rules.size_range, RangeRule::new(10, 60));
    assert_eq!(regions[0].rules.text_type, StyleRule::Any);
}

// ==== Save / list / delete ====

#[test]
fn test_save_persists_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("regions.json");
    let mut store = JsonRegionStore::open(&path);
    store.save_template("Posters", vec![banner()]).unwrap();

    let reopened = JsonRegionStore::open(&path);
    assert_eq!(reopened.list_template_names().last().unwrap(), "Posters");
    assert_eq!(reopened.load_template("Posters"), vec![banner()]);
}

#[test]
fn test_save_replaces_in_place() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = JsonRegionStore::open(dir.path().join("regions.json"));
    let names = store.list_template_names();

    store.save_template(DEFAULT_TEMPLATE, vec![banner()]).unwrap();
    assert_eq!(store.list_template_names(), names);
    assert_eq!(store.load_template(DEFAULT_TEMPLATE), vec![banner()]);
}

#[test]
fn test_delete_template() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("regions.json");
    let mut store = JsonRegionStore::open(&path);
    store.save_template("Scratch", vec![banner()]).unwrap();

    assert!(store.delete_template("Scratch").unwrap());
    assert!(!store.delete_template("Scratch").unwrap());
    assert!(store.load_template("Scratch").is_empty());
    assert!(
        !JsonRegionStore::open(&path)
            .list_template_names()
            .contains(&"Scratch".to_string())
    );
}

#[test]
fn test_default_template_is_protected() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = JsonRegionStore::open(dir.path().join("regions.json"));
    assert!(!store.delete_template(DEFAULT_TEMPLATE).unwrap());
    assert!(!store.load_template(DEFAULT_TEMPLATE).is_empty());
}

#[test]
fn test_choose_template_covers_names() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonRegionStore::open(dir.path().join("regions.json"));
    let mut rng = ChaCha8Rng::seed_from_u64(17);

    let names = store.list_template_names();
    for _ in 0..50 {
        let name = store.choose_template(&mut rng).unwrap();
        assert!(names.contains(&name));
    }
}
