// tests/watch_filter.rs

use std::path::{Path, PathBuf};

use notify::event::{
    AccessKind, CreateKind, DataChange, MetadataKind, ModifyKind, RemoveKind, RenameMode,
};
use notify::{Event, EventKind};

use whenchanged::types::Language;
use whenchanged::watch::path_utils::relative_str;
use whenchanged::watch::{changed_paths, classify, ChangeKind, WatchFilter};
use whenchanged_test_utils::builders::ConfigFileBuilder;

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[test]
fn java_preset_filter_matches_sources_only() {
    let cfg = ConfigFileBuilder::new().language(Language::Java).build();
    let filter = WatchFilter::from_config(&cfg).unwrap();

    assert!(filter.matches("A.java"));
    assert!(!filter.matches("A.class"));
    assert!(!filter.matches("A.java_Log.txt"));
    assert!(!filter.matches("notes.txt"));
}

#[test]
fn python_preset_filter_reaches_into_subdirectories() {
    let cfg = ConfigFileBuilder::new().language(Language::Python).build();
    let filter = WatchFilter::from_config(&cfg).unwrap();

    assert!(filter.matches("B.py"));
    assert!(filter.matches("pkg/sub/C.py"));
    assert!(!filter.matches("pkg/__pycache__/C.py"));
    assert!(!filter.matches("B.py_Log.txt"));
}

#[test]
fn exclude_wins_over_include() {
    let filter = WatchFilter::new(&strings(&["src/**/*.java"]), &strings(&["src/gen/**"])).unwrap();

    assert!(filter.matches("src/app/Main.java"));
    assert!(!filter.matches("src/gen/Parser.java"));
    assert!(!filter.matches("test/Main.java"));
}

#[test]
fn invalid_glob_is_reported() {
    let err = WatchFilter::new(&strings(&["src/[abc"]), &[]).unwrap_err();
    assert!(format!("{err:#}").contains("invalid glob pattern"));
}

#[test]
fn writes_creates_and_renames_are_forwarded() {
    assert_eq!(
        classify(&EventKind::Modify(ModifyKind::Data(DataChange::Content))),
        Some(ChangeKind::Changed)
    );
    assert_eq!(
        classify(&EventKind::Modify(ModifyKind::Any)),
        Some(ChangeKind::Changed)
    );
    assert_eq!(
        classify(&EventKind::Modify(ModifyKind::Metadata(MetadataKind::WriteTime))),
        Some(ChangeKind::Changed)
    );
    assert_eq!(
        classify(&EventKind::Create(CreateKind::File)),
        Some(ChangeKind::Created)
    );
    assert_eq!(
        classify(&EventKind::Modify(ModifyKind::Name(RenameMode::To))),
        Some(ChangeKind::Renamed)
    );
}

#[test]
fn deletes_and_other_noise_are_dropped() {
    assert_eq!(classify(&EventKind::Remove(RemoveKind::File)), None);
    assert_eq!(classify(&EventKind::Access(AccessKind::Any)), None);
    assert_eq!(
        classify(&EventKind::Modify(ModifyKind::Metadata(MetadataKind::Permissions))),
        None
    );
    assert_eq!(
        classify(&EventKind::Modify(ModifyKind::Name(RenameMode::From))),
        None
    );
    assert_eq!(classify(&EventKind::Any), None);
}

#[test]
fn rename_with_both_names_reports_the_new_name() {
    let event = Event::new(EventKind::Modify(ModifyKind::Name(RenameMode::Both)))
        .add_path(PathBuf::from("/w/Old.java"))
        .add_path(PathBuf::from("/w/New.java"));

    let (kind, paths) = changed_paths(&event).expect("rename is forwarded");
    assert_eq!(kind, ChangeKind::Renamed);
    assert_eq!(paths, vec![PathBuf::from("/w/New.java")]);
}

#[test]
fn removal_event_yields_nothing() {
    let event = Event::new(EventKind::Remove(RemoveKind::File)).add_path(PathBuf::from("/w/A.java"));
    assert!(changed_paths(&event).is_none());
}

#[test]
fn relative_paths_use_forward_slashes() {
    let root = Path::new("/work");
    assert_eq!(
        relative_str(root, Path::new("/work/pkg/B.py")).as_deref(),
        Some("pkg/B.py")
    );
    assert_eq!(relative_str(root, Path::new("/work/A.java")).as_deref(), Some("A.java"));
}

#[test]
fn paths_outside_the_root_are_rejected() {
    let tmp = tempfile::TempDir::new().unwrap();
    let outside = tempfile::TempDir::new().unwrap();
    let file = outside.path().join("A.java");
    std::fs::write(&file, "").unwrap();

    assert_eq!(relative_str(tmp.path(), &file), None);
}
