//! User-visible notifications and change events.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Info,
    Success,
    Error,
}

/// A toast-style message for the front end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub id: u64,
    pub level: NoticeLevel,
    pub title: String,
    pub message: String,
}

/// What changed since the front end last drained events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorEvent {
    /// The template was modified
    ModelChanged,
    /// The selected variable changed
    SelectionChanged,
    /// Idle / Selected / Editing changed
    ModeChanged,
    /// A variable dialog opened, closed, or its draft changed
    ModalChanged,
    /// Grid visibility or snapping changed
    GridChanged,
    NoticeAdded(u64),
    NoticeDismissed(u64),
}
