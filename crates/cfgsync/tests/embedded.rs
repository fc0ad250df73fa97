//! Defaults compiled into the binary.

use std::fs;

use cfgsync::{ConfigUpdater, EmbeddedResources, ResourceProvider, Resources, UpdateOutcome};
use include_dir::{Dir, include_dir};
use tempfile::TempDir;

static FIXTURES: Dir<'static> = include_dir!("$CARGO_MANIFEST_DIR/tests/fixtures");
static RESOURCES: EmbeddedResources = EmbeddedResources::new(&FIXTURES);

#[test]
fn test_embedded_names() {
    let names = RESOURCES.names();
    assert!(names.contains(&"config.yml".to_string()));
    assert!(names.contains(&"messages.yml".to_string()));
}

#[test]
fn test_embedded_load_matches_disk() {
    let on_disk = fs::read_to_string(
        std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/messages.yml"),
    )
    .unwrap();
    assert_eq!(RESOURCES.load("messages.yml").unwrap(), on_disk);
}

#[test]
fn test_update_from_embedded_default() {
    let temp = TempDir::new().unwrap();
    let target = temp.path().join("messages.yml");
    fs::write(&target, "farewell: Tschuess\n").unwrap();

    let updater = ConfigUpdater::new(Resources::from(RESOURCES));
    assert_eq!(updater.update("messages.yml", &target).unwrap(), UpdateOutcome::Updated);

    let text = fs::read_to_string(&target).unwrap();
    assert!(text.contains("farewell: Tschuess\n"));
    assert!(text.contains("greeting:"));
    assert_eq!(updater.update("messages.yml", &target).unwrap(), UpdateOutcome::Unchanged);
}
