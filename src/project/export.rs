// Plain-text tab export

use crate::project::types::Project;
use crate::tab::bar::Bar;
use crate::tab::data::TabData;
use crate::tab::tuning::{self, Instrument};
use std::fmt;

/// Width every cell is left-padded to
const CELL_WIDTH: usize = 2;

/// Render the whole document as ASCII tab.
///
/// One block per section and instrument; each line is one string or drum
/// line, bars separated by `|`. Pairs that were never materialized print as
/// all-rest bars.
pub fn export_plain_text(project: &Project, tab_data: &TabData) -> String {
    PlainText { project, tab_data }.to_string()
}

/// Display adapter behind `export_plain_text`
struct PlainText<'a> {
    project: &'a Project,
    tab_data: &'a TabData,
}

impl fmt::Display for PlainText<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let project = self.project;
        let cells_per_measure = project.cells_per_measure();

        for section in &project.sections {
            if section.repeat > 1 {
                writeln!(f, "[{}] x{}", section.name, section.repeat)?;
            } else {
                writeln!(f, "[{}]", section.name)?;
            }
            if !section.notes.is_empty() {
                writeln!(f, "{}", section.notes)?;
            }

            for instrument in Instrument::ALL {
                let fallback;
                let bars: &[Bar] = match self.tab_data.get(section.id, instrument) {
                    Some(bars) => bars,
                    None => {
                        fallback = vec![
                            Bar::empty(project.row_count(instrument), cells_per_measure);
                            section.measures
                        ];
                        &fallback
                    }
                };

                let row_count = bars
                    .first()
                    .map(Bar::row_count)
                    .unwrap_or_else(|| project.row_count(instrument));
                let labels = tuning::row_labels(instrument, row_count, project.tunings.get(instrument));
                let label_width = labels.iter().map(String::len).max().unwrap_or(0);

                writeln!(f, "{}:", instrument)?;
                for (row_index, label) in labels.iter().enumerate() {
                    write!(f, "{:<width$}|", label, width = label_width)?;
                    for bar in bars {
                        if let Some(row) = bar.rows.get(row_index) {
                            for cell in &row.cells {
                                write!(f, "{:->width$}", cell.to_string(), width = CELL_WIDTH)?;
                            }
                        }
                        f.write_str("|")?;
                    }
                    f.write_str("\n")?;
                }
                f.write_str("\n")?;
            }
        }
        Ok(())
    }
}
