// Types for the tab document

use crate::tab::timing::{self, NoteResolution, Tempo, TimeSignature};
use crate::tab::tuning::{Instrument, StringCounts, Tunings};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Identifier a persistence store files a project under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectId(Uuid);

impl ProjectId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ProjectId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for ProjectId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Section identifier, unique within a project
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SectionId(pub u64);

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Named, repeatable group of bars; vector order is playback order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub id: SectionId,
    pub name: String,
    /// Free-form annotation
    pub notes: String,
    /// Bar count shared by all three instruments
    pub measures: usize,
    /// Times the section plays before moving on
    pub repeat: u32,
    pub color: String,
}

impl Section {
    pub fn new(id: SectionId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            notes: String::new(),
            measures: 4,
            repeat: 1,
            color: "blue".to_string(),
        }
    }
}

/// Partial section edit; `None` fields are left untouched
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionUpdate {
    pub name: Option<String>,
    pub notes: Option<String>,
    pub measures: Option<usize>,
    pub repeat: Option<u32>,
    pub color: Option<String>,
}

impl SectionUpdate {
    pub fn measures(measures: usize) -> Self {
        Self {
            measures: Some(measures),
            ..Self::default()
        }
    }

    pub fn repeat(repeat: u32) -> Self {
        Self {
            repeat: Some(repeat),
            ..Self::default()
        }
    }
}

/// Project settings and the ordered section list
#[derive(Debug, Clone, PartialEq)]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
    pub tempo: Tempo,
    pub time_signature: TimeSignature,
    pub note_resolution: NoteResolution,
    pub key: String,
    pub tunings: Tunings,
    pub string_counts: StringCounts,
    pub sections: Vec<Section>,
}

impl Project {
    /// New project with a single default section
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn cells_per_measure(&self) -> usize {
        timing::cells_per_measure(&self.time_signature, &self.note_resolution)
    }

    pub fn cells_per_beat(&self) -> f64 {
        timing::cells_per_beat(&self.time_signature, &self.note_resolution)
    }

    pub fn ms_per_cell(&self) -> f64 {
        timing::ms_per_cell(&self.tempo, &self.time_signature, &self.note_resolution)
    }

    /// Row count a newly materialized bar gets
    pub fn row_count(&self, instrument: Instrument) -> usize {
        self.string_counts.rows_for(instrument)
    }

    pub fn section(&self, id: SectionId) -> Option<&Section> {
        self.sections.iter().find(|s| s.id == id)
    }

    pub fn section_index(&self, id: SectionId) -> Option<usize> {
        self.sections.iter().position(|s| s.id == id)
    }

    /// Smallest id not yet used by any section
    pub fn next_section_id(&self) -> SectionId {
        SectionId(self.sections.iter().map(|s| s.id.0 + 1).max().unwrap_or(1))
    }
}

impl Default for Project {
    fn default() -> Self {
        Self {
            id: ProjectId::new(),
            name: "Untitled Project".to_string(),
            tempo: Tempo::default(),
            time_signature: TimeSignature::four_four(),
            note_resolution: NoteResolution::sixteenth(),
            key: "C".to_string(),
            tunings: Tunings::default(),
            string_counts: StringCounts::default(),
            sections: vec![Section::new(SectionId(1), "Intro")],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_project() {
        let project = Project::default();
        assert_eq!(project.cells_per_measure(), 16);
        assert_eq!(project.sections.len(), 1);
        assert_eq!(project.row_count(Instrument::Guitar), 6);
        assert_eq!(project.row_count(Instrument::Bass), 4);
    }

    #[test]
    fn test_next_section_id() {
        let mut project = Project::default();
        project.sections.push(Section::new(SectionId(9), "Chorus"));
        assert_eq!(project.next_section_id(), SectionId(10));

        project.sections.clear();
        assert_eq!(project.next_section_id(), SectionId(1));
    }

    #[test]
    fn test_project_id_round_trip() {
        let id = ProjectId::new();
        let parsed: ProjectId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
    }
}
