// Cell addressing, selection and clipboard

pub mod clipboard;
pub mod coord;
pub mod engine;

pub use clipboard::{BarClipboard, Clipboard, ColumnClipboard, ColumnEntry};
pub use coord::{BeatPosition, CellCoord, Direction, GridShape, SectionGrid};
pub use engine::{DragState, SelectionEngine};
