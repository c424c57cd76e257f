//! The create / edit variable dialog.

use uuid::Uuid;

use crate::template::{ValidationError, Variable, validate_position, validate_text};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ModalKind {
    /// New variable; `position` is where it was requested
    Create { position: (f64, f64) },
    /// Existing variable
    Edit { id: Uuid },
}

/// The dialog's editable fields.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct VariableDraft {
    pub title: String,
    pub value: String,
    pub x: f64,
    pub y: f64,
}

impl VariableDraft {
    pub fn at(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            ..Self::default()
        }
    }

    pub fn from_variable(var: &Variable) -> Self {
        Self {
            title: var.title.clone(),
            value: var.value.clone(),
            x: var.x,
            y: var.y,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_text(&self.title, &self.value)?;
        validate_position(self.x, self.y)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Modal {
    pub kind: ModalKind,
    pub draft: VariableDraft,
    /// Message from the last rejected save
    pub error: Option<String>,
}

impl Modal {
    pub fn create(x: f64, y: f64) -> Self {
        Self {
            kind: ModalKind::Create { position: (x, y) },
            draft: VariableDraft::at(x, y),
            error: None,
        }
    }

    pub fn edit(var: &Variable) -> Self {
        Self {
            kind: ModalKind::Edit { id: var.id },
            draft: VariableDraft::from_variable(var),
            error: None,
        }
    }
}
