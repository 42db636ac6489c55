// Editing facade: input events, cell values, clipboard and chord tools

pub mod tab_editor;

pub use tab_editor::TabEditor;
