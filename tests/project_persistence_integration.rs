// Integration test for project persistence system
// Tests the complete save/load cycle with realistic data

use mymusic_tab::project::{
    MemoryProjectStore, StoreFormat, load_document_file, save_document_file,
    serialization::{deserialize_from_json, serialize_to_json},
};
use mymusic_tab::tab::Tuning;
use mymusic_tab::{
    Autosave, CellCoord, FileProjectStore, Instrument, Project, ProjectError, ProjectStore,
    SectionUpdate, TabEditor, TabStore, create_notification_channel, export_plain_text,
};
use std::time::{Duration, Instant};
use tempfile::tempdir;

/// A small song: intro riff, chorus chord, drum beat
fn build_song() -> TabEditor {
    let mut project = Project::new("Integration Song");
    project.key = "E".to_string();
    let mut editor = TabEditor::new(TabStore::new(project));
    let intro = editor.store().project().sections[0].id;

    editor.store_mut().set_tempo(96.0).unwrap();
    editor.store_mut().set_tuning(Instrument::Guitar, Tuning::Drop);
    editor.store_mut().update_section(
        intro,
        SectionUpdate {
            notes: Some("palm mute throughout".to_string()),
            measures: Some(2),
            ..SectionUpdate::default()
        },
    );

    editor.set_power_chord(true);
    editor.click(CellCoord::new(intro, 0, 5, 0), false);
    editor.set_value("0");
    editor.click(CellCoord::new(intro, 0, 5, 2), false);
    editor.set_value("m");

    let chorus = editor.store_mut().add_section("Chorus");
    editor.store_mut().update_section(chorus, SectionUpdate::repeat(2));
    editor.click(CellCoord::new(chorus, 1, 0, 0), false);
    editor.apply_chord_shape("G");

    editor.set_instrument(Instrument::Drums);
    for cell in (0..16).step_by(2) {
        editor.click(CellCoord::new(chorus, 0, 1, cell), false);
        editor.set_value("x");
    }
    editor.click(CellCoord::new(chorus, 0, 5, 0), false);
    editor.set_value("X");

    editor
}

#[test]
fn test_complete_project_persistence() {
    let editor = build_song();
    let store = editor.store();
    let dir = tempdir().unwrap();

    for name in ["song.json", "song.ron"] {
        let path = dir.path().join(name);
        save_document_file(&path, &store.to_document()).unwrap();

        let mut loaded = TabStore::new(Project::default());
        loaded.load_document(&load_document_file(&path).unwrap()).unwrap();

        assert_eq!(loaded.project().name, "Integration Song");
        assert_eq!(loaded.project().tempo.bpm(), 96.0);
        assert_eq!(loaded.project().tunings.guitar, Tuning::Drop);
        assert_eq!(loaded.project().sections, store.project().sections);
        assert_eq!(loaded.tab_data(), store.tab_data());
        assert!(!loaded.is_dirty());
        assert!(!loaded.can_undo());
    }
}

#[test]
fn test_wire_field_names() {
    let editor = build_song();
    let json = serialize_to_json(&editor.store().to_document()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    for field in [
        "projectName",
        "bpm",
        "timeSignature",
        "noteResolution",
        "projectKey",
        "tunings",
        "stringCounts",
        "sections",
        "tabData",
    ] {
        assert!(value.get(field).is_some(), "missing {}", field);
    }
    assert_eq!(value["timeSignature"]["noteValue"], 4);
    assert_eq!(value["noteResolution"]["perQuarter"], 4);
    assert_eq!(value["tabData"]["1-guitar"][0][5][0], "0");
    assert_eq!(value["tabData"]["1-guitar"][0][4][0], "0");
    assert_eq!(value["tabData"]["1-guitar"][0][5][2], "m");

    let back = deserialize_from_json(&json).unwrap();
    assert_eq!(back, editor.store().to_document());
}

#[test]
fn test_export_plain_text() {
    let editor = build_song();
    let text = export_plain_text(editor.store().project(), editor.store().tab_data());

    assert!(text.contains("[Intro]\npalm mute throughout\n"));
    assert!(text.contains("[Chorus] x2\n"));
    // Drop tuning relabels the low string
    assert!(text.contains("\nD|-0---m"));
    assert!(text.contains("HH|-x---x---x"));
    assert!(text.contains("BD|-X"));
}

#[test]
fn test_autosave_to_file_store() {
    let dir = tempdir().unwrap();
    let (producer, consumer) = create_notification_channel(64);
    let mut tabs = TabStore::new(Project::new("Autosaved")).with_notifications(producer);
    let mut autosave = Autosave::new(consumer, Duration::from_millis(1500));
    let mut files = FileProjectStore::new(dir.path(), StoreFormat::Ron);
    let start = Instant::now();

    let section = tabs.project().sections[0].id;
    tabs.add_section("Verse");
    tabs.clear_bar(section, Instrument::Guitar, 0);
    tabs.set_tempo(140.0).unwrap();

    assert!(!autosave.poll(start, &mut tabs, &mut files).unwrap());
    assert!(
        autosave
            .poll(start + Duration::from_millis(2000), &mut tabs, &mut files)
            .unwrap()
    );
    assert!(!tabs.is_dirty());

    let stored = files.get(tabs.project().id).unwrap();
    assert_eq!(stored.bpm, 140.0);
    assert_eq!(stored.sections.len(), 2);

    // Undo is a change too
    tabs.undo();
    assert!(tabs.is_dirty());
    assert!(
        autosave
            .poll(start + Duration::from_millis(2100), &mut tabs, &mut files)
            .is_ok()
    );
    assert!(autosave.is_pending());
}

#[test]
fn test_missing_project_is_not_found() {
    let store = MemoryProjectStore::new();
    let project = Project::default();
    assert!(matches!(
        store.get(project.id),
        Err(ProjectError::NotFound(id)) if id == project.id
    ));
}

#[test]
fn test_corrupt_file_is_rejected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("broken.json");
    std::fs::write(&path, "{ \"projectName\": 42 }").unwrap();
    assert!(load_document_file(&path).is_err());

    let editor = build_song();
    let mut document = editor.store().to_document();
    document.tab_data.insert("1-drums".to_string(), vec![vec![vec!["7".to_string()]]]);
    let mut store = TabStore::new(Project::default());
    assert!(matches!(
        store.load_document(&document),
        Err(ProjectError::InvalidStructure(_))
    ));
}
