// Project document: settings, sections, persistence and export

pub mod export;
pub mod manager;
pub mod serialization;
pub mod types;

pub use export::export_plain_text;
pub use manager::{
    Autosave, FileProjectStore, MemoryProjectStore, ProjectError, ProjectStore, StoreFormat,
    load_document_file, save_document_file,
};
pub use serialization::{Document, from_document, to_document};
pub use types::{Project, ProjectId, Section, SectionId, SectionUpdate};

use crate::tab::tuning::Instrument;
use std::collections::HashSet;

/// Helper function to validate project structure
pub fn validate_project_structure(project: &Project) -> Result<(), ProjectError> {
    if project.name.len() > 255 {
        return Err(ProjectError::InvalidStructure(
            "Project name cannot exceed 255 characters".to_string(),
        ));
    }

    let ts = &project.time_signature;
    if crate::tab::TimeSignature::new(ts.beats, ts.note_value).is_err() {
        return Err(ProjectError::InvalidStructure(format!(
            "Invalid time signature {}/{}",
            ts.beats, ts.note_value
        )));
    }

    if crate::tab::NoteResolution::new(project.note_resolution.per_quarter).is_err() {
        return Err(ProjectError::InvalidStructure(format!(
            "Unsupported note resolution {}",
            project.note_resolution.label
        )));
    }

    for instrument in [Instrument::Guitar, Instrument::Bass] {
        let count = project.string_counts.rows_for(instrument);
        if !instrument.supported_string_counts().contains(&count) {
            return Err(ProjectError::InvalidStructure(format!(
                "Unsupported {} string count {}",
                instrument, count
            )));
        }
    }

    let mut section_ids = HashSet::new();
    for section in &project.sections {
        if !section_ids.insert(section.id) {
            return Err(ProjectError::InvalidStructure(format!(
                "Duplicate section ID: {}",
                section.id
            )));
        }

        if section.measures == 0 {
            return Err(ProjectError::InvalidStructure(format!(
                "Section {} must have at least one measure",
                section.id
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_project_structure_valid() {
        assert!(validate_project_structure(&Project::default()).is_ok());
    }

    #[test]
    fn test_validate_project_structure_duplicate_sections() {
        let mut project = Project::default();
        let copy = project.sections[0].clone();
        project.sections.push(copy);
        let result = validate_project_structure(&project);
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Duplicate section ID")
        );
    }

    #[test]
    fn test_validate_project_structure_zero_measures() {
        let mut project = Project::default();
        project.sections[0].measures = 0;
        assert!(validate_project_structure(&project).is_err());
    }

    #[test]
    fn test_validate_project_structure_string_count() {
        let mut project = Project::default();
        project.string_counts.guitar = 12;
        assert!(
            validate_project_structure(&project)
                .unwrap_err()
                .to_string()
                .contains("string count")
        );
    }
}
