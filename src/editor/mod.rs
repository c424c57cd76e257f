//! # Editor State Machine
//!
//! UI-agnostic editing session over one [`Template`]. The front end forwards
//! user input, then drains [`EditorEvent`]s and re-renders from
//! [`Editor::template`] and [`Editor::mode`].
//!
//! ## States
//!
//! ```text
//!            click variable                 save
//!   Idle ─────────────────────▶ Editing ─────────────▶ Selected
//!    ▲  ◀──────────────────────  (id)  ◀─────────────   (id)
//!    │          cancel / delete         click variable    │
//!    └────────────────────────────────────────────────────┘
//!                          cancel / delete
//! ```
//!
//! A variable dialog ([`Modal`]) sits on top of any state and blocks canvas
//! interaction until it is saved or closed. Saving a new variable returns
//! Idle and Selected to Idle; an Editing session stays open.
//!
//! ## Usage
//!
//! ```
//! use template_composer::editor::{Editor, Mode};
//! use template_composer::template::Template;
//!
//! let mut editor = Editor::new(Template::new());
//! editor.click_canvas(137.0, 253.0).unwrap();
//! {
//!     let draft = editor.draft_mut().unwrap();
//!     draft.title = "Customer".into();
//!     draft.value = "Ada Lovelace".into();
//! }
//! let id = editor.save_modal().unwrap();
//!
//! let var = editor.template().variable(id).unwrap();
//! assert_eq!((var.x, var.y), (125.0, 250.0));
//! assert_eq!(editor.mode(), Mode::Idle);
//! ```

mod grid;
mod modal;
mod notice;

pub use grid::{GRID_SIZE, GridLine, GridOverlay, RULER_STEP, grid_lines, snap};
pub use modal::{Modal, ModalKind, VariableDraft};
pub use notice::{EditorEvent, Notice, NoticeLevel};

use thiserror::Error;
use uuid::Uuid;

use crate::export::{self, ExportArtifact, ExportContext, ExportFormat, ImageLoader};
use crate::import::{ImportResult, Importer, file_stem};
use crate::page::{CanvasSize, PageSizeTable};
use crate::template::{
    TextAlign, Template, ValidationError, Variable, parse_hex_color, validate_position,
};

/// Where the "Add variable" button places a new variable.
pub const DEFAULT_NEW_POSITION: (f64, f64) = (100.0, 100.0);

/// Where imported text is placed.
pub const IMPORT_POSITION: (f64, f64) = (50.0, 50.0);

pub const DELETE_PROMPT: &str = "Are you sure you want to remove this variable?";

pub const CLEAR_ALL_PROMPT: &str =
    "Are you sure you want to clear all variables? This action cannot be undone.";

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EditorError {
    #[error("A variable dialog is open")]
    ModalOpen,

    #[error("No variable dialog is open")]
    NoModal,

    #[error("No variable is being edited")]
    NotEditing,

    #[error("No drag in progress")]
    NoDrag,

    #[error("Variable {0} cannot be dragged while another is being edited")]
    NotDraggable(Uuid),

    #[error("Variable {0} not found")]
    UnknownVariable(Uuid),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Selection state. Editing implies selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Idle,
    Selected(Uuid),
    Editing(Uuid),
}

impl Mode {
    pub fn selected(self) -> Option<Uuid> {
        match self {
            Mode::Idle => None,
            Mode::Selected(id) | Mode::Editing(id) => Some(id),
        }
    }

    pub fn editing(self) -> Option<Uuid> {
        match self {
            Mode::Editing(id) => Some(id),
            _ => None,
        }
    }

    fn same_kind(self, other: Mode) -> bool {
        std::mem::discriminant(&self) == std::mem::discriminant(&other)
    }
}

/// What "Cancel" does to changes made while editing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CancelPolicy {
    /// Restore the variable as it was when editing began
    #[default]
    Revert,
    /// Leave the live edits in place and only exit editing
    KeepLiveEdits,
}

/// Asks the user a yes/no question.
pub trait ConfirmPrompt {
    fn confirm(&mut self, message: &str) -> bool;
}

impl<F: FnMut(&str) -> bool> ConfirmPrompt for F {
    fn confirm(&mut self, message: &str) -> bool {
        self(message)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EditorConfig {
    pub grid_size: f64,
    pub show_grid: bool,
    pub snap_to_grid: bool,
    pub cancel_policy: CancelPolicy,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            grid_size: GRID_SIZE,
            show_grid: true,
            snap_to_grid: true,
            cancel_policy: CancelPolicy::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Drag {
    id: Uuid,
}

pub struct Editor {
    template: Template,
    page_sizes: PageSizeTable,
    config: EditorConfig,
    mode: Mode,
    modal: Option<Modal>,
    drag: Option<Drag>,
    /// Variable as it was when editing began
    snapshot: Option<Variable>,
    events: Vec<EditorEvent>,
    notices: Vec<Notice>,
    next_notice_id: u64,
}

impl Editor {
    pub fn new(template: Template) -> Self {
        Self::with_config(template, EditorConfig::default())
    }

    pub fn with_config(template: Template, config: EditorConfig) -> Self {
        Self {
            template,
            page_sizes: PageSizeTable::builtin(),
            config,
            mode: Mode::Idle,
            modal: None,
            drag: None,
            snapshot: None,
            events: Vec::new(),
            notices: Vec::new(),
            next_notice_id: 1,
        }
    }

    pub fn with_page_sizes(mut self, page_sizes: PageSizeTable) -> Self {
        self.page_sizes = page_sizes;
        self
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    pub fn template(&self) -> &Template {
        &self.template
    }

    pub fn page_sizes(&self) -> &PageSizeTable {
        &self.page_sizes
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn selected_id(&self) -> Option<Uuid> {
        self.mode.selected()
    }

    pub fn modal(&self) -> Option<&Modal> {
        self.modal.as_ref()
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    /// Canvas pixel size for the template's current page size.
    pub fn canvas_size(&self) -> CanvasSize {
        self.page_sizes.canvas_size(&self.template.page_size)
    }

    /// Grid overlay for the current canvas, empty when the grid is hidden.
    pub fn grid_overlay(&self) -> GridOverlay {
        if self.config.show_grid {
            grid_lines(self.canvas_size(), self.config.grid_size)
        } else {
            GridOverlay::default()
        }
    }

    /// Take every event queued since the last call.
    pub fn drain_events(&mut self) -> Vec<EditorEvent> {
        std::mem::take(&mut self.events)
    }

    // ========================================================================
    // INTERNAL PLUMBING
    // ========================================================================

    fn emit(&mut self, event: EditorEvent) {
        if !self.events.contains(&event) {
            self.events.push(event);
        }
    }

    fn set_mode(&mut self, mode: Mode) {
        if self.mode == mode {
            return;
        }
        if !self.mode.same_kind(mode) {
            self.emit(EditorEvent::ModeChanged);
        }
        if self.mode.selected() != mode.selected() {
            self.emit(EditorEvent::SelectionChanged);
        }
        if mode.editing().is_none() {
            self.snapshot = None;
        }
        self.mode = mode;
    }

    fn ensure_no_modal(&self) -> Result<(), EditorError> {
        if self.modal.is_some() {
            Err(EditorError::ModalOpen)
        } else {
            Ok(())
        }
    }

    fn snapped(&self, x: f64, y: f64) -> (f64, f64) {
        if self.config.snap_to_grid {
            (snap(x, self.config.grid_size), snap(y, self.config.grid_size))
        } else {
            (x, y)
        }
    }

    /// Apply `change` to the variable under edit.
    fn edit_current(
        &mut self,
        change: impl FnOnce(&mut Variable) -> Result<(), ValidationError>,
    ) -> Result<(), EditorError> {
        let id = self.mode.editing().ok_or(EditorError::NotEditing)?;
        let var = self
            .template
            .variable_mut(id)
            .ok_or(EditorError::UnknownVariable(id))?;
        change(var)?;
        self.emit(EditorEvent::ModelChanged);
        Ok(())
    }

    /// The single write path for positions.
    fn write_position(&mut self, id: Uuid, x: f64, y: f64) -> Result<(), EditorError> {
        validate_position(x, y)?;
        let var = self
            .template
            .variable_mut(id)
            .ok_or(EditorError::UnknownVariable(id))?;
        if (var.x, var.y) != (x, y) {
            var.x = x;
            var.y = y;
            self.emit(EditorEvent::ModelChanged);
        }
        Ok(())
    }

    // ========================================================================
    // NOTICES
    // ========================================================================

    /// Queue a notice and return its id.
    pub fn notify(
        &mut self,
        level: NoticeLevel,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> u64 {
        let id = self.next_notice_id;
        self.next_notice_id += 1;
        self.notices.push(Notice {
            id,
            level,
            title: title.into(),
            message: message.into(),
        });
        self.emit(EditorEvent::NoticeAdded(id));
        id
    }

    pub fn dismiss(&mut self, notice_id: u64) -> bool {
        let before = self.notices.len();
        self.notices.retain(|n| n.id != notice_id);
        let removed = self.notices.len() != before;
        if removed {
            self.emit(EditorEvent::NoticeDismissed(notice_id));
        }
        removed
    }

    // ========================================================================
    // CANVAS INTERACTION
    // ========================================================================

    /// Click on an empty canvas spot: open the create dialog there.
    ///
    /// Ignored while editing a variable.
    pub fn click_canvas(&mut self, x: f64, y: f64) -> Result<(), EditorError> {
        self.ensure_no_modal()?;
        if self.mode.editing().is_some() {
            return Ok(());
        }
        let (x, y) = self.snapped(x.max(0.0), y.max(0.0));
        self.modal = Some(Modal::create(x, y));
        self.emit(EditorEvent::ModalChanged);
        Ok(())
    }

    /// Click on a variable: start editing it.
    pub fn click_variable(&mut self, id: Uuid) -> Result<(), EditorError> {
        self.ensure_no_modal()?;
        let var = self
            .template
            .variable(id)
            .ok_or(EditorError::UnknownVariable(id))?;
        if self.mode == Mode::Editing(id) {
            return Ok(());
        }
        // Switching straight to another variable keeps the previous edits
        let snapshot = var.clone();
        self.drag = None;
        self.set_mode(Mode::Editing(id));
        self.snapshot = Some(snapshot);
        Ok(())
    }

    /// Leave editing, keeping the changes and the selection.
    pub fn save_editing(&mut self) -> Result<(), EditorError> {
        let id = self.mode.editing().ok_or(EditorError::NotEditing)?;
        self.set_mode(Mode::Selected(id));
        self.notify(
            NoticeLevel::Success,
            "Variable updated",
            "Your changes have been saved.",
        );
        Ok(())
    }

    /// Leave editing and clear the selection.
    ///
    /// Under [`CancelPolicy::Revert`] the variable is restored to how it was
    /// when editing began.
    pub fn cancel_editing(&mut self) -> Result<(), EditorError> {
        self.mode.editing().ok_or(EditorError::NotEditing)?;
        let snapshot = self.snapshot.take();
        if self.config.cancel_policy == CancelPolicy::Revert {
            if let Some(original) = snapshot {
                if let Some(var) = self.template.variable_mut(original.id) {
                    if *var != original {
                        *var = original;
                        self.emit(EditorEvent::ModelChanged);
                    }
                }
            }
        }
        self.drag = None;
        self.set_mode(Mode::Idle);
        Ok(())
    }

    // ========================================================================
    // FORMATTING (while editing)
    // ========================================================================

    pub fn toggle_bold(&mut self) -> Result<(), EditorError> {
        self.edit_current(|v| {
            v.format.toggle_bold();
            Ok(())
        })
    }

    pub fn toggle_italic(&mut self) -> Result<(), EditorError> {
        self.edit_current(|v| {
            v.format.toggle_italic();
            Ok(())
        })
    }

    pub fn toggle_underline(&mut self) -> Result<(), EditorError> {
        self.edit_current(|v| {
            v.format.toggle_underline();
            Ok(())
        })
    }

    pub fn set_font_family(&mut self, family: impl Into<String>) -> Result<(), EditorError> {
        let family = family.into();
        self.edit_current(|v| {
            v.format.font_family = family;
            Ok(())
        })
    }

    pub fn set_font_size(&mut self, size: f64) -> Result<(), EditorError> {
        self.edit_current(|v| {
            if !size.is_finite() || size <= 0.0 {
                return Err(ValidationError::InvalidFontSize(size));
            }
            v.format.font_size = size;
            Ok(())
        })
    }

    /// Set the text colour from a `#rgb` or `#rrggbb` string.
    pub fn set_color(&mut self, color: impl Into<String>) -> Result<(), EditorError> {
        let color = color.into();
        self.edit_current(|v| {
            if parse_hex_color(&color).is_none() {
                return Err(ValidationError::InvalidColor(color));
            }
            v.format.color = color;
            Ok(())
        })
    }

    pub fn set_alignment(&mut self, align: TextAlign) -> Result<(), EditorError> {
        self.edit_current(|v| {
            v.format.text_align = Some(align);
            Ok(())
        })
    }

    pub fn set_position(&mut self, x: f64, y: f64) -> Result<(), EditorError> {
        let id = self.mode.editing().ok_or(EditorError::NotEditing)?;
        self.write_position(id, x, y)
    }

    // ========================================================================
    // DRAG
    // ========================================================================

    /// Begin dragging `id`.
    ///
    /// Outside editing this selects the variable. While editing, only the
    /// edited variable can be dragged.
    pub fn drag_start(&mut self, id: Uuid) -> Result<(), EditorError> {
        self.ensure_no_modal()?;
        if !self.template.contains(id) {
            return Err(EditorError::UnknownVariable(id));
        }
        match self.mode {
            Mode::Editing(current) if current != id => return Err(EditorError::NotDraggable(id)),
            Mode::Editing(_) => {}
            Mode::Idle | Mode::Selected(_) => self.set_mode(Mode::Selected(id)),
        }
        self.drag = Some(Drag { id });
        Ok(())
    }

    /// Move the dragged variable to `(x, y)`, clamped to the canvas origin.
    pub fn drag_move(&mut self, x: f64, y: f64) -> Result<(), EditorError> {
        let drag = self.drag.ok_or(EditorError::NoDrag)?;
        self.write_position(drag.id, x.max(0.0), y.max(0.0))
    }

    /// Finish the drag, snapping to the grid when enabled.
    pub fn drag_stop(&mut self) -> Result<(), EditorError> {
        let drag = self.drag.take().ok_or(EditorError::NoDrag)?;
        let var = self
            .template
            .variable(drag.id)
            .ok_or(EditorError::UnknownVariable(drag.id))?;
        let (x, y) = self.snapped(var.x, var.y);
        self.write_position(drag.id, x, y)
    }

    // ========================================================================
    // VARIABLE DIALOG
    // ========================================================================

    /// "Add variable" button: open the create dialog at the default position.
    pub fn open_add_modal(&mut self) -> Result<(), EditorError> {
        self.ensure_no_modal()?;
        let (x, y) = DEFAULT_NEW_POSITION;
        self.modal = Some(Modal::create(x, y));
        self.emit(EditorEvent::ModalChanged);
        Ok(())
    }

    /// Open the edit dialog prefilled from `id`.
    pub fn open_edit_modal(&mut self, id: Uuid) -> Result<(), EditorError> {
        self.ensure_no_modal()?;
        let var = self
            .template
            .variable(id)
            .ok_or(EditorError::UnknownVariable(id))?;
        self.modal = Some(Modal::edit(var));
        self.emit(EditorEvent::ModalChanged);
        Ok(())
    }

    pub fn draft_mut(&mut self) -> Result<&mut VariableDraft, EditorError> {
        let modal = self.modal.as_mut().ok_or(EditorError::NoModal)?;
        modal.error = None;
        if !self.events.contains(&EditorEvent::ModalChanged) {
            self.events.push(EditorEvent::ModalChanged);
        }
        Ok(&mut modal.draft)
    }

    /// Save the dialog. Returns the id of the created or updated variable.
    ///
    /// A rejected draft leaves the dialog open with its error set and the
    /// template untouched.
    pub fn save_modal(&mut self) -> Result<Uuid, EditorError> {
        let modal = self.modal.as_mut().ok_or(EditorError::NoModal)?;
        if let Err(e) = modal.draft.validate() {
            modal.error = Some(e.to_string());
            self.emit(EditorEvent::ModalChanged);
            return Err(e.into());
        }

        let draft = modal.draft.clone();
        let kind = modal.kind;
        let title = draft.title.trim().to_string();
        let value = draft.value.trim().to_string();

        let id = match kind {
            ModalKind::Create { .. } => {
                let var = Variable::new(title.clone(), value, draft.x, draft.y);
                let id = var.id;
                self.template.add_variable(var)?;
                self.modal = None;
                // An edit in progress stays open, snapshot included
                if self.mode.editing().is_none() {
                    self.set_mode(Mode::Idle);
                }
                self.notify(
                    NoticeLevel::Success,
                    "Variable added",
                    format!("\"{title}\" has been added to the template."),
                );
                id
            }
            ModalKind::Edit { id } => {
                let var = self
                    .template
                    .variable_mut(id)
                    .ok_or(EditorError::UnknownVariable(id))?;
                var.title = title;
                var.value = value;
                var.x = draft.x;
                var.y = draft.y;
                // A committed dialog save is not undone by a later cancel
                if self.mode.editing() == Some(id) {
                    if let Some(snapshot) = self.snapshot.as_mut() {
                        snapshot.title = var.title.clone();
                        snapshot.value = var.value.clone();
                        snapshot.x = var.x;
                        snapshot.y = var.y;
                    }
                }
                self.modal = None;
                self.notify(
                    NoticeLevel::Success,
                    "Variable updated",
                    "Your changes have been saved.",
                );
                id
            }
        };

        self.emit(EditorEvent::ModelChanged);
        self.emit(EditorEvent::ModalChanged);
        Ok(id)
    }

    /// Close the dialog, discarding the draft.
    pub fn close_modal(&mut self) {
        if self.modal.take().is_some() {
            self.emit(EditorEvent::ModalChanged);
        }
    }

    // ========================================================================
    // LIST OPERATIONS
    // ========================================================================

    pub fn delete_variable(&mut self, id: Uuid) -> Result<(), EditorError> {
        self.template
            .remove_variable(id)
            .ok_or(EditorError::UnknownVariable(id))?;
        if self.mode.selected() == Some(id) {
            self.drag = None;
            self.set_mode(Mode::Idle);
        }
        if matches!(self.modal.as_ref().map(|m| m.kind), Some(ModalKind::Edit { id: m }) if m == id)
        {
            self.close_modal();
        }
        self.emit(EditorEvent::ModelChanged);
        self.notify(
            NoticeLevel::Success,
            "Variable deleted",
            "The variable has been removed from the template.",
        );
        Ok(())
    }

    /// Delete `id` once the user confirms. Returns whether it was deleted.
    pub fn confirm_delete(
        &mut self,
        id: Uuid,
        prompt: &mut impl ConfirmPrompt,
    ) -> Result<bool, EditorError> {
        if !self.template.contains(id) {
            return Err(EditorError::UnknownVariable(id));
        }
        if !prompt.confirm(DELETE_PROMPT) {
            return Ok(false);
        }
        self.delete_variable(id)?;
        Ok(true)
    }

    /// Delete whichever variable is selected or being edited.
    pub fn delete_selected(&mut self) -> Result<(), EditorError> {
        let id = self.mode.selected().ok_or(EditorError::NotEditing)?;
        self.delete_variable(id)
    }

    /// Remove every variable once the user confirms. Returns whether it happened.
    pub fn clear_all(&mut self, prompt: &mut impl ConfirmPrompt) -> bool {
        if !prompt.confirm(CLEAR_ALL_PROMPT) {
            return false;
        }
        self.template.clear_variables();
        self.drag = None;
        self.close_modal();
        self.set_mode(Mode::Idle);
        self.emit(EditorEvent::ModelChanged);
        self.notify(
            NoticeLevel::Success,
            "Variables cleared",
            "All variables have been removed from the template.",
        );
        true
    }

    // ========================================================================
    // GRID
    // ========================================================================

    pub fn set_show_grid(&mut self, show: bool) {
        if self.config.show_grid != show {
            self.config.show_grid = show;
            self.emit(EditorEvent::GridChanged);
        }
    }

    pub fn set_snap_to_grid(&mut self, snap: bool) {
        if self.config.snap_to_grid != snap {
            self.config.snap_to_grid = snap;
            self.emit(EditorEvent::GridChanged);
        }
    }

    // ========================================================================
    // TEMPLATE-LEVEL EDITS
    // ========================================================================

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.template.title = title.into();
        self.emit(EditorEvent::ModelChanged);
    }

    /// Switch page size. Variable positions are kept in canvas pixels as is.
    pub fn set_page_size(&mut self, key: impl Into<String>) {
        let key = key.into();
        if self.page_sizes.get(&key).is_none() {
            tracing::warn!(key = %key, "unknown page size, pages will render as A4");
        }
        self.template.page_size = key;
        self.emit(EditorEvent::ModelChanged);
    }

    pub fn set_background(&mut self, image: Option<String>) {
        self.template.background_image = image;
        self.emit(EditorEvent::ModelChanged);
    }

    pub fn set_show_background_in_output(&mut self, show: bool) {
        self.template.show_background_in_output = show;
        self.emit(EditorEvent::ModelChanged);
    }

    fn reset_session(&mut self) {
        self.drag = None;
        self.close_modal();
        self.set_mode(Mode::Idle);
        self.emit(EditorEvent::ModelChanged);
    }

    /// Replace the template with a fresh one.
    pub fn new_template(&mut self) {
        self.template = Template::new();
        self.reset_session();
    }

    /// Open `template`, rejecting it if invalid.
    pub fn load_template(&mut self, template: Template) -> Result<(), EditorError> {
        template.validate()?;
        self.template = template;
        self.reset_session();
        self.notify(
            NoticeLevel::Success,
            "Template loaded",
            "Your template has been loaded.",
        );
        Ok(())
    }

    // ========================================================================
    // IMPORT / EXPORT BOUNDARY
    // ========================================================================

    /// Place an import result: text becomes a new variable, an image the background.
    pub fn apply_import(
        &mut self,
        file_name: &str,
        result: ImportResult,
    ) -> Result<(), EditorError> {
        match result {
            ImportResult::Text(text) => {
                let (x, y) = IMPORT_POSITION;
                let var = Variable::new(file_stem(file_name), text, x, y);
                let title = var.title.clone();
                self.template.add_variable(var)?;
                self.emit(EditorEvent::ModelChanged);
                self.notify(
                    NoticeLevel::Success,
                    "Document imported",
                    format!("\"{title}\" has been added to the template."),
                );
            }
            ImportResult::Image(url) => {
                self.set_background(Some(url));
                self.notify(
                    NoticeLevel::Success,
                    "Background imported",
                    format!("{file_name} is now the page background."),
                );
            }
        }
        Ok(())
    }

    /// Import a file and apply it. Failures become an error notice.
    pub fn import_file(
        &mut self,
        importer: &Importer,
        file_name: &str,
        mime: &str,
        bytes: &[u8],
    ) -> bool {
        let applied = importer
            .import(file_name, mime, bytes)
            .map_err(|e| e.to_string())
            .and_then(|result| self.apply_import(file_name, result).map_err(|e| e.to_string()));
        match applied {
            Ok(()) => true,
            Err(message) => {
                tracing::error!(file_name, error = %message, "import failed");
                self.notify(NoticeLevel::Error, "Import failed", message);
                false
            }
        }
    }

    /// Export the template. Failures are logged and surfaced as a notice.
    pub fn export(
        &mut self,
        format: ExportFormat,
        images: &dyn ImageLoader,
    ) -> Option<ExportArtifact> {
        let ctx = ExportContext::new(&self.page_sizes, images);
        let label = format.extension().to_ascii_uppercase();
        match export::export(&self.template, format, &ctx) {
            Ok(artifact) => {
                self.notify(
                    NoticeLevel::Success,
                    format!("{label} exported"),
                    format!("Your template has been exported as a {label} file."),
                );
                Some(artifact)
            }
            Err(e) => {
                tracing::error!(format = %format, error = %e, "export failed");
                self.notify(
                    NoticeLevel::Error,
                    "Export failed",
                    format!("Failed to export {label}. Please try again."),
                );
                None
            }
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
