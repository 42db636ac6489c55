// TabStore - invariant-preserving document mutations

use crate::history::HistoryManager;
use crate::messaging::channels::NotificationProducer;
use crate::messaging::notification::{Notification, NotificationKind};
use crate::project::serialization::{self, Document};
use crate::project::types::{Project, Section, SectionId, SectionUpdate};
use crate::project::ProjectError;
use crate::selection::coord::{GridShape, SectionGrid};
use crate::tab::bar::Bar;
use crate::tab::data::TabData;
use crate::tab::timing::{NoteResolution, Tempo, TimeSignature};
use crate::tab::tuning::{Instrument, Tuning};
use crate::tab::TabError;
use ringbuf::traits::Producer;

/// History entry: the tab data plus the section list it is shaped against
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub sections: Vec<Section>,
    pub tab_data: TabData,
}

/// Document owner; see the module docs for the invariants it keeps
pub struct TabStore {
    project: Project,
    tab_data: TabData,
    history: HistoryManager<Snapshot>,
    notifications: Option<NotificationProducer>,
    revision: u64,
    dirty: bool,
}

impl TabStore {
    /// Store for a fresh project; every (section, instrument) pair starts all-rest
    pub fn new(project: Project) -> Self {
        let mut store = Self {
            project,
            tab_data: TabData::new(),
            history: HistoryManager::new(),
            notifications: None,
            revision: 0,
            dirty: false,
        };
        store.normalize();
        store
    }

    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history = HistoryManager::with_capacity(limit);
        self
    }

    /// Raise change notifications on this channel
    pub fn with_notifications(mut self, producer: NotificationProducer) -> Self {
        self.notifications = Some(producer);
        self
    }

    pub fn project(&self) -> &Project {
        &self.project
    }

    pub fn tab_data(&self) -> &TabData {
        &self.tab_data
    }

    pub fn cells_per_measure(&self) -> usize {
        self.project.cells_per_measure()
    }

    /// Monotonic counter bumped by every commit
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_saved(&mut self) {
        self.dirty = false;
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    // ---------------------------------------------------------------------
    // Bars
    // ---------------------------------------------------------------------

    /// Bars of a pair, materializing all-rest bars on first read.
    /// None when the section is unknown.
    pub fn get_bars(&mut self, section: SectionId, instrument: Instrument) -> Option<&[Bar]> {
        self.materialize(section, instrument).map(|bars| bars.as_slice())
    }

    /// Read-only view; pairs never read stay absent
    pub fn bars(&self, section: SectionId, instrument: Instrument) -> Option<&[Bar]> {
        self.tab_data
            .get(section, instrument)
            .map(|bars| bars.as_slice())
    }

    /// Replace the whole bar array of a pair and record history.
    /// Returns false (and changes nothing) for an unknown section or an
    /// array that does not match the section's measures, the pair's row
    /// count and the current cells per measure.
    pub fn set_bars(&mut self, section: SectionId, instrument: Instrument, bars: Vec<Bar>) -> bool {
        let Some(measures) = self.project.section(section).map(|s| s.measures) else {
            tracing::debug!("set_bars ignored: unknown section {}", section);
            return false;
        };
        let rows = self.section_rows(section, instrument);
        let cells = self.cells_per_measure();
        if bars.len() != measures || !bars.iter().all(|bar| bar.has_shape(rows, cells)) {
            tracing::debug!(
                "set_bars ignored: {}/{} expects {} bars of {}x{}",
                section,
                instrument,
                measures,
                rows,
                cells
            );
            return false;
        }

        self.commit(format!("Edited {}/{}", section, instrument), |store| {
            store.tab_data.insert(section, instrument, bars);
        });
        true
    }

    /// Copy a pair's bars, let `edit` change the copy, and commit it.
    /// `edit` returns whether it changed anything; nothing is committed otherwise.
    pub fn edit_bars<F>(&mut self, section: SectionId, instrument: Instrument, edit: F) -> bool
    where
        F: FnOnce(&mut Vec<Bar>) -> bool,
    {
        let Some(bars) = self.materialize(section, instrument) else {
            tracing::debug!("edit ignored: unknown section {}", section);
            return false;
        };

        let mut copy = bars.clone();
        if !edit(&mut copy) || copy == *bars {
            return false;
        }
        self.set_bars(section, instrument, copy)
    }

    /// Insert an empty bar at `at` for all three instruments
    pub fn insert_bar(&mut self, section: SectionId, at: usize) -> bool {
        let Some(index) = self.project.section_index(section) else {
            return false;
        };
        let measures = self.project.sections[index].measures;
        if at > measures {
            return false;
        }

        self.materialize_section(section);
        let cells = self.cells_per_measure();
        self.commit(format!("Inserted bar {} in {}", at, section), |store| {
            store.project.sections[index].measures += 1;
            for instrument in Instrument::ALL {
                let rows = store.section_rows(section, instrument);
                if let Some(bars) = store.tab_data.get(section, instrument) {
                    let mut bars = bars.clone();
                    bars.insert(at, Bar::empty(rows, cells));
                    store.tab_data.insert(section, instrument, bars);
                }
            }
        });
        true
    }

    /// Remove the bar at `at` from all three instruments; the last bar stays
    pub fn remove_bar(&mut self, section: SectionId, at: usize) -> bool {
        let Some(index) = self.project.section_index(section) else {
            return false;
        };
        let measures = self.project.sections[index].measures;
        if measures <= 1 || at >= measures {
            return false;
        }

        self.materialize_section(section);
        self.commit(format!("Removed bar {} from {}", at, section), |store| {
            store.project.sections[index].measures -= 1;
            for instrument in Instrument::ALL {
                if let Some(bars) = store.tab_data.get(section, instrument) {
                    let mut bars = bars.clone();
                    if at < bars.len() {
                        bars.remove(at);
                    }
                    store.tab_data.insert(section, instrument, bars);
                }
            }
        });
        true
    }

    /// Reset every cell of one bar to rest
    pub fn clear_bar(&mut self, section: SectionId, instrument: Instrument, at: usize) -> bool {
        self.edit_bars(section, instrument, |bars| match bars.get_mut(at) {
            Some(bar) => {
                bar.clear();
                true
            }
            None => false,
        })
    }

    // ---------------------------------------------------------------------
    // Grid settings
    // ---------------------------------------------------------------------

    /// Pad or truncate every row of every bar to `cells_per_measure`
    pub fn resize(&mut self, cells_per_measure: usize) -> Result<(), TabError> {
        if cells_per_measure == 0 {
            return Err(TabError::InvalidResize(cells_per_measure));
        }

        let mut changed = false;
        for bar in self.tab_data.bars_mut() {
            if bar.rows.iter().any(|row| row.len() != cells_per_measure) {
                bar.resize(cells_per_measure);
                changed = true;
            }
        }

        if changed {
            tracing::debug!("Resized all rows to {} cells", cells_per_measure);
            self.notify_changed(format!("Resized to {} cells per measure", cells_per_measure));
        }
        Ok(())
    }

    pub fn set_tempo(&mut self, bpm: f64) -> Result<(), TabError> {
        self.project.tempo = Tempo::new(bpm)?;
        self.notify_changed(format!("Tempo set to {}", bpm));
        Ok(())
    }

    /// Change the time signature and resize every row to match
    pub fn set_time_signature(&mut self, beats: u8, note_value: u8) -> Result<(), TabError> {
        let time_signature = TimeSignature::new(beats, note_value)?;
        let cells = crate::tab::timing::cells_per_measure(&time_signature, &self.project.note_resolution);
        if cells == 0 {
            return Err(TabError::InvalidResize(cells));
        }
        self.project.time_signature = time_signature;
        self.resize(cells)?;
        self.notify_changed(format!("Time signature set to {}/{}", beats, note_value));
        Ok(())
    }

    /// Change the grid resolution and resize every row to match
    pub fn set_note_resolution(&mut self, per_quarter: u32) -> Result<(), TabError> {
        let resolution = NoteResolution::new(per_quarter)?;
        let cells = crate::tab::timing::cells_per_measure(&self.project.time_signature, &resolution);
        if cells == 0 {
            return Err(TabError::InvalidResize(cells));
        }
        self.project.note_resolution = resolution;
        self.resize(cells)?;
        self.notify_changed(format!("Resolution set to {}", per_quarter));
        Ok(())
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.project.name = name.into();
        self.notify_changed("Renamed project".to_string());
    }

    pub fn set_key(&mut self, key: impl Into<String>) {
        self.project.key = key.into();
        self.notify_changed("Key changed".to_string());
    }

    pub fn set_tuning(&mut self, instrument: Instrument, tuning: Tuning) {
        if !instrument.is_stringed() {
            return;
        }
        self.project.tunings.set(instrument, tuning);
        self.notify_changed(format!("Tuning of {} changed", instrument));
    }

    /// Change a string count. Bars that already exist keep their row count;
    /// only bars materialized afterwards use the new one.
    pub fn set_string_count(&mut self, instrument: Instrument, count: usize) -> Result<(), TabError> {
        if !instrument.is_stringed() || !instrument.supported_string_counts().contains(&count) {
            return Err(TabError::InvalidStringCount { instrument, count });
        }
        self.project.string_counts.set(instrument, count);
        self.notify_changed(format!("{} now has {} strings", instrument, count));
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Sections
    // ---------------------------------------------------------------------

    /// Append a section with all-rest bars for every instrument
    pub fn add_section(&mut self, name: impl Into<String>) -> SectionId {
        let section = Section::new(self.project.next_section_id(), name);
        let id = section.id;
        self.commit(format!("Added section {}", id), |store| {
            store.project.sections.push(section);
            store.materialize_section(id);
        });
        id
    }

    /// Deep-copy a section and its bars, inserted right after the source
    pub fn duplicate_section(&mut self, source: SectionId) -> Option<SectionId> {
        let index = self.project.section_index(source)?;
        self.materialize_section(source);

        let mut copy = self.project.sections[index].clone();
        copy.id = self.project.next_section_id();
        copy.name = format!("{} (copy)", copy.name);
        let id = copy.id;

        self.commit(format!("Duplicated section {}", source), |store| {
            store.project.sections.insert(index + 1, copy);
            for instrument in Instrument::ALL {
                if let Some(bars) = store.tab_data.get(source, instrument).cloned() {
                    store.tab_data.insert(id, instrument, bars);
                }
            }
        });
        Some(id)
    }

    pub fn delete_section(&mut self, id: SectionId) -> bool {
        let Some(index) = self.project.section_index(id) else {
            tracing::debug!("delete ignored: unknown section {}", id);
            return false;
        };

        self.commit(format!("Deleted section {}", id), |store| {
            store.project.sections.remove(index);
            store.tab_data.remove_section(id);
        });
        true
    }

    /// Apply a partial edit. A measures change grows (empty bars) or
    /// truncates (from the end) all three instruments together.
    pub fn update_section(&mut self, id: SectionId, update: SectionUpdate) -> bool {
        let Some(index) = self.project.section_index(id) else {
            tracing::debug!("update ignored: unknown section {}", id);
            return false;
        };
        if update.measures == Some(0) {
            tracing::debug!("update ignored: section {} needs at least one measure", id);
            return false;
        }

        self.materialize_section(id);
        let cells = self.cells_per_measure();
        self.commit(format!("Updated section {}", id), |store| {
            let section = &mut store.project.sections[index];
            if let Some(name) = update.name {
                section.name = name;
            }
            if let Some(notes) = update.notes {
                section.notes = notes;
            }
            if let Some(repeat) = update.repeat {
                section.repeat = repeat;
            }
            if let Some(color) = update.color {
                section.color = color;
            }
            if let Some(measures) = update.measures {
                section.measures = measures;
                for instrument in Instrument::ALL {
                    let rows = store.section_rows(id, instrument);
                    if let Some(bars) = store.tab_data.get(id, instrument) {
                        let mut bars = bars.clone();
                        bars.resize(measures, Bar::empty(rows, cells));
                        store.tab_data.insert(id, instrument, bars);
                    }
                }
            }
        });
        true
    }

    /// Move a section to a new playback position (clamped to the end)
    pub fn move_section(&mut self, id: SectionId, to: usize) -> bool {
        let Some(from) = self.project.section_index(id) else {
            return false;
        };
        let to = to.min(self.project.sections.len() - 1);
        if from == to {
            return false;
        }

        self.commit(format!("Moved section {}", id), |store| {
            let section = store.project.sections.remove(from);
            store.project.sections.insert(to, section);
        });
        true
    }

    // ---------------------------------------------------------------------
    // History and lifecycle
    // ---------------------------------------------------------------------

    pub fn undo(&mut self) -> bool {
        let Some(snapshot) = self.history.undo().cloned() else {
            return false;
        };
        self.restore(snapshot);
        true
    }

    pub fn redo(&mut self) -> bool {
        let Some(snapshot) = self.history.redo().cloned() else {
            return false;
        };
        self.restore(snapshot);
        true
    }

    /// Replace the document with a new project; history starts over
    pub fn new_document(&mut self, project: Project) {
        self.project = project;
        self.tab_data = TabData::new();
        self.normalize();
        self.replaced();
    }

    /// Replace the document from its serialized form; history starts over
    pub fn load_document(&mut self, document: &Document) -> Result<(), ProjectError> {
        let (project, tab_data) = serialization::from_document(document, self.project.id)?;
        self.project = project;
        self.tab_data = tab_data;
        self.normalize();
        self.replaced();
        Ok(())
    }

    pub fn to_document(&self) -> Document {
        serialization::to_document(&self.project, &self.tab_data)
    }

    /// Geometry of an instrument's grid, in playback order
    pub fn grid(&self, instrument: Instrument) -> GridShape {
        let sections = self
            .project
            .sections
            .iter()
            .map(|section| {
                let rows = self.section_rows(section.id, instrument);
                SectionGrid {
                    id: section.id,
                    bars: section.measures,
                    rows,
                }
            })
            .collect();

        GridShape {
            sections,
            cells_per_measure: self.cells_per_measure(),
        }
    }

    // ---------------------------------------------------------------------
    // Internals
    // ---------------------------------------------------------------------

    fn materialize(&mut self, section: SectionId, instrument: Instrument) -> Option<&mut Vec<Bar>> {
        let measures = self.project.section(section)?.measures;
        let rows = self.project.row_count(instrument);
        let cells = self.cells_per_measure();
        Some(self.tab_data.get_or_insert_with(section, instrument, || {
            vec![Bar::empty(rows, cells); measures]
        }))
    }

    /// Row count of a pair: its existing bars keep the count they were
    /// created with, new pairs use the project's current string count
    fn section_rows(&self, section: SectionId, instrument: Instrument) -> usize {
        self.tab_data
            .get(section, instrument)
            .and_then(|bars| bars.first())
            .map(Bar::row_count)
            .unwrap_or_else(|| self.project.row_count(instrument))
    }

    fn materialize_section(&mut self, section: SectionId) {
        for instrument in Instrument::ALL {
            self.materialize(section, instrument);
        }
    }

    /// Bring loaded or restored data back in line with the invariants
    fn normalize(&mut self) {
        let cells = self.cells_per_measure();
        for section in self.project.sections.clone() {
            for instrument in Instrument::ALL {
                let rows = self.project.row_count(instrument);
                if let Some(bars) = self.materialize(section.id, instrument) {
                    bars.resize(section.measures, Bar::empty(rows, cells));
                }
            }
        }
        for bar in self.tab_data.bars_mut() {
            bar.resize(cells);
        }
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            sections: self.project.sections.clone(),
            tab_data: self.tab_data.clone(),
        }
    }

    /// Run a mutation as one history step.
    /// The first commit after a reset also records the pre-mutation state so
    /// it can be undone.
    fn commit<F>(&mut self, message: String, mutate: F)
    where
        F: FnOnce(&mut Self),
    {
        if self.history.is_empty() {
            self.history.record(self.snapshot());
        }
        mutate(self);
        self.history.record(self.snapshot());
        self.notify_changed(message);
    }

    fn restore(&mut self, snapshot: Snapshot) {
        self.project.sections = snapshot.sections;
        self.tab_data = snapshot.tab_data;
        let cells = self.cells_per_measure();
        for bar in self.tab_data.bars_mut() {
            bar.resize(cells);
        }
        self.notify(NotificationKind::HistoryRestored, "Restored from history".to_string());
    }

    fn replaced(&mut self) {
        self.history.reset();
        self.notify(NotificationKind::DocumentReplaced, format!("Opened '{}'", self.project.name));
        self.dirty = false;
    }

    fn notify_changed(&mut self, message: String) {
        self.notify(NotificationKind::DocumentChanged, message);
    }

    fn notify(&mut self, kind: NotificationKind, message: String) {
        self.revision += 1;
        self.dirty = true;
        tracing::trace!("revision {}: {}", self.revision, message);

        if let Some(producer) = self.notifications.as_mut() {
            let notification = Notification::new(kind, self.revision, message);
            if producer.try_push(notification).is_err() {
                tracing::warn!("Notification channel full, change notification dropped");
            }
        }
    }
}
