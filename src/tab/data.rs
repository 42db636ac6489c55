// TabData - bar sequences keyed by (section, instrument)

use super::bar::Bar;
use super::tuning::Instrument;
use crate::project::types::SectionId;
use std::collections::BTreeMap;

/// Two-level table: section → instrument → bars
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TabData {
    sections: BTreeMap<SectionId, BTreeMap<Instrument, Vec<Bar>>>,
}

impl TabData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, section: SectionId, instrument: Instrument) -> Option<&Vec<Bar>> {
        self.sections.get(&section)?.get(&instrument)
    }

    pub fn contains(&self, section: SectionId, instrument: Instrument) -> bool {
        self.get(section, instrument).is_some()
    }

    /// Replace the whole bar array of one (section, instrument) pair
    pub fn insert(&mut self, section: SectionId, instrument: Instrument, bars: Vec<Bar>) {
        self.sections
            .entry(section)
            .or_default()
            .insert(instrument, bars);
    }

    /// Bars for a pair, creating them with `init` if absent
    pub fn get_or_insert_with(
        &mut self,
        section: SectionId,
        instrument: Instrument,
        init: impl FnOnce() -> Vec<Bar>,
    ) -> &mut Vec<Bar> {
        self.sections
            .entry(section)
            .or_default()
            .entry(instrument)
            .or_insert_with(init)
    }

    pub fn remove_section(&mut self, section: SectionId) {
        self.sections.remove(&section);
    }

    /// Every materialized (section, instrument, bars) triple
    pub fn iter(&self) -> impl Iterator<Item = (SectionId, Instrument, &Vec<Bar>)> {
        self.sections.iter().flat_map(|(section, by_instrument)| {
            by_instrument
                .iter()
                .map(move |(instrument, bars)| (*section, *instrument, bars))
        })
    }

    pub fn bars_mut(&mut self) -> impl Iterator<Item = &mut Bar> {
        self.sections
            .values_mut()
            .flat_map(|by_instrument| by_instrument.values_mut())
            .flat_map(|bars| bars.iter_mut())
    }
}
