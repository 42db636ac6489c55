// Serialization utilities for the tab document
//
// The wire form is a plain nested key-value tree: project settings, the
// section list and `tabData` keyed by "<sectionId>-<instrument>", each bar
// an array of rows of cell glyph strings.

use crate::project::ProjectError;
use crate::project::types::{Project, ProjectId, Section, SectionId};
use crate::tab::bar::{Bar, Row};
use crate::tab::cell::Cell;
use crate::tab::data::TabData;
use crate::tab::timing::{NoteResolution, Tempo, TimeSignature};
use crate::tab::tuning::{Instrument, StringCounts, Tunings};
use ron::{from_str as ron_from_str, to_string as ron_to_string};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Bar as stored: rows of cell glyphs
pub type WireBar = Vec<Vec<String>>;

/// Full document in its serializable shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub project_name: String,
    pub bpm: f64,
    pub time_signature: TimeSignature,
    pub note_resolution: NoteResolution,
    pub project_key: String,
    pub tunings: Tunings,
    pub string_counts: StringCounts,
    pub sections: Vec<Section>,
    pub tab_data: BTreeMap<String, Vec<WireBar>>,
}

/// Composite key used by the wire form
pub fn tab_key(section: SectionId, instrument: Instrument) -> String {
    format!("{}-{}", section, instrument)
}

/// Split a composite key back into its parts
pub fn parse_tab_key(key: &str) -> Option<(SectionId, Instrument)> {
    let (section, instrument) = key.rsplit_once('-')?;
    let section = section.parse::<u64>().ok()?;
    Some((SectionId(section), Instrument::from_name(instrument)?))
}

fn bar_to_wire(bar: &Bar) -> WireBar {
    bar.rows
        .iter()
        .map(|row| row.cells.iter().map(Cell::to_string).collect())
        .collect()
}

fn bar_from_wire(wire: &WireBar, instrument: Instrument, key: &str) -> Result<Bar, ProjectError> {
    let rows = wire
        .iter()
        .map(|row| {
            let cells = row
                .iter()
                .map(|glyph| {
                    Cell::parse(glyph, instrument).ok_or_else(|| {
                        ProjectError::InvalidStructure(format!(
                            "Unrecognized cell '{}' in {}",
                            glyph, key
                        ))
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Row { cells })
        })
        .collect::<Result<Vec<_>, ProjectError>>()?;
    Ok(Bar { rows })
}

/// Snapshot the project and its tab data into the wire shape
pub fn to_document(project: &Project, tab_data: &TabData) -> Document {
    let tab_data = tab_data
        .iter()
        .map(|(section, instrument, bars)| {
            (
                tab_key(section, instrument),
                bars.iter().map(bar_to_wire).collect(),
            )
        })
        .collect();

    Document {
        project_name: project.name.clone(),
        bpm: project.tempo.bpm(),
        time_signature: project.time_signature.clone(),
        note_resolution: project.note_resolution.clone(),
        project_key: project.key.clone(),
        tunings: project.tunings,
        string_counts: project.string_counts,
        sections: project.sections.clone(),
        tab_data,
    }
}

/// Rebuild project and tab data from the wire shape
///
/// Entries for sections that no longer exist are dropped; cell glyphs that do
/// not parse for their instrument are rejected.
pub fn from_document(document: &Document, id: ProjectId) -> Result<(Project, TabData), ProjectError> {
    let tempo = Tempo::new(document.bpm)
        .map_err(|e| ProjectError::InvalidStructure(e.to_string()))?;

    let project = Project {
        id,
        name: document.project_name.clone(),
        tempo,
        time_signature: document.time_signature.clone(),
        note_resolution: document.note_resolution.clone(),
        key: document.project_key.clone(),
        tunings: document.tunings,
        string_counts: document.string_counts,
        sections: document.sections.clone(),
    };
    crate::project::validate_project_structure(&project)?;

    let mut tab_data = TabData::new();
    for (key, wire_bars) in &document.tab_data {
        let Some((section, instrument)) = parse_tab_key(key) else {
            return Err(ProjectError::InvalidStructure(format!(
                "Malformed tab data key '{}'",
                key
            )));
        };
        if project.section(section).is_none() {
            tracing::warn!("Dropping tab data for unknown section {}", key);
            continue;
        }
        let bars = wire_bars
            .iter()
            .map(|wire| bar_from_wire(wire, instrument, key))
            .collect::<Result<Vec<_>, _>>()?;
        tab_data.insert(section, instrument, bars);
    }

    Ok((project, tab_data))
}

/// Serialize a document to pretty JSON
pub fn serialize_to_json(document: &Document) -> Result<String, ProjectError> {
    Ok(serde_json::to_string_pretty(document)?)
}

/// Deserialize a document from JSON
pub fn deserialize_from_json(json_data: &str) -> Result<Document, ProjectError> {
    Ok(serde_json::from_str(json_data)?)
}

/// Serialize a document to RON format
pub fn serialize_to_ron(document: &Document) -> Result<String, ProjectError> {
    Ok(ron_to_string(document)?)
}

/// Deserialize a document from RON format
pub fn deserialize_from_ron(ron_data: &str) -> Result<Document, ProjectError> {
    Ok(ron_from_str(ron_data)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (Project, TabData) {
        let project = Project::default();
        let section = project.sections[0].id;
        let mut bar = Bar::empty(6, 16);
        bar.set(5, 0, Cell::Fret(5));
        bar.set(2, 3, Cell::parse("h", Instrument::Guitar).unwrap());
        let mut tab_data = TabData::new();
        tab_data.insert(section, Instrument::Guitar, vec![bar]);
        (project, tab_data)
    }

    #[test]
    fn test_tab_key_round_trip() {
        let key = tab_key(SectionId(42), Instrument::Drums);
        assert_eq!(key, "42-drums");
        assert_eq!(parse_tab_key(&key), Some((SectionId(42), Instrument::Drums)));
        assert_eq!(parse_tab_key("42-banjo"), None);
        assert_eq!(parse_tab_key("guitar"), None);
    }

    #[test]
    fn test_json_field_names() {
        let (project, tab_data) = sample();
        let json = serialize_to_json(&to_document(&project, &tab_data)).unwrap();

        for field in [
            "projectName",
            "bpm",
            "timeSignature",
            "noteValue",
            "noteResolution",
            "perQuarter",
            "projectKey",
            "tunings",
            "stringCounts",
            "sections",
            "tabData",
            "1-guitar",
        ] {
            assert!(json.contains(field), "missing {}", field);
        }
    }

    #[test]
    fn test_document_round_trip() {
        let (project, tab_data) = sample();
        let json = serialize_to_json(&to_document(&project, &tab_data)).unwrap();
        let document = deserialize_from_json(&json).unwrap();
        let (loaded, loaded_tabs) = from_document(&document, project.id).unwrap();

        assert_eq!(loaded, project);
        assert_eq!(loaded_tabs, tab_data);
    }

    #[test]
    fn test_ron_round_trip() {
        let (project, tab_data) = sample();
        let document = to_document(&project, &tab_data);
        let ron_data = serialize_to_ron(&document).unwrap();
        assert_eq!(deserialize_from_ron(&ron_data).unwrap(), document);
    }

    #[test]
    fn test_unknown_section_entries_are_dropped() {
        let (project, tab_data) = sample();
        let mut document = to_document(&project, &tab_data);
        document
            .tab_data
            .insert("99-bass".to_string(), vec![vec![vec!["-".to_string()]]]);

        let (_, loaded) = from_document(&document, project.id).unwrap();
        assert!(!loaded.contains(SectionId(99), Instrument::Bass));
    }

    #[test]
    fn test_bad_glyph_is_rejected() {
        let (project, tab_data) = sample();
        let mut document = to_document(&project, &tab_data);
        document
            .tab_data
            .insert("1-drums".to_string(), vec![vec![vec!["7".to_string()]]]);

        assert!(matches!(
            from_document(&document, project.id),
            Err(ProjectError::InvalidStructure(_))
        ));
    }

    #[test]
    fn test_decode_errors_keep_their_source() {
        assert!(matches!(
            deserialize_from_json("{ \"projectName\": 42 }"),
            Err(ProjectError::Json(_))
        ));
        assert!(matches!(
            deserialize_from_ron("(projectName: )"),
            Err(ProjectError::RonParse(_))
        ));
    }
}
