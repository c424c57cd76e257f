//! # Template Data Model
//!
//! A [`Template`] owns an ordered list of [`Variable`]s. Variables have no
//! existence outside their template; every variable id is unique within it.
//!
//! ```
//! use template_composer::template::{Template, Variable};
//!
//! let mut template = Template::new();
//! let var = Variable::new("Customer", "Ada Lovelace", 100.0, 120.0);
//! let id = var.id;
//! template.add_variable(var).unwrap();
//!
//! assert_eq!(template.variable(id).unwrap().value, "Ada Lovelace");
//! assert!(template.remove_variable(id).is_some());
//! assert!(template.variables.is_empty());
//! ```

mod patch;
pub mod types;

pub use patch::{NewTemplate, TemplatePatch};
pub use types::*;

use thiserror::Error;
use uuid::Uuid;

/// Reasons a template or variable is rejected.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Title is required")]
    EmptyTitle,

    #[error("Value is required")]
    EmptyValue,

    #[error("Position must be a non-negative number (got x={x}, y={y})")]
    InvalidPosition { x: f64, y: f64 },

    #[error("Font size must be a positive number (got {0})")]
    InvalidFontSize(f64),

    #[error("Color must be a hex value like #000000 (got {0:?})")]
    InvalidColor(String),

    #[error("Duplicate variable id {0}")]
    DuplicateId(Uuid),

    #[error("Variable {0} not found")]
    UnknownVariable(Uuid),
}

impl Variable {
    /// Check the variable's own invariants.
    ///
    /// Title and value must be non-empty once trimmed, the position must be
    /// finite and non-negative, and the font size finite and positive.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_text(&self.title, &self.value)?;
        validate_position(self.x, self.y)?;
        if !self.format.font_size.is_finite() || self.format.font_size <= 0.0 {
            return Err(ValidationError::InvalidFontSize(self.format.font_size));
        }
        Ok(())
    }
}

/// Title and value checks shared with the editor's variable dialog.
pub fn validate_text(title: &str, value: &str) -> Result<(), ValidationError> {
    if title.trim().is_empty() {
        return Err(ValidationError::EmptyTitle);
    }
    if value.trim().is_empty() {
        return Err(ValidationError::EmptyValue);
    }
    Ok(())
}

pub fn validate_position(x: f64, y: f64) -> Result<(), ValidationError> {
    if !x.is_finite() || !y.is_finite() || x < 0.0 || y < 0.0 {
        return Err(ValidationError::InvalidPosition { x, y });
    }
    Ok(())
}

impl Template {
    /// Validate every variable and the id uniqueness invariant.
    pub fn validate(&self) -> Result<(), ValidationError> {
        for (i, var) in self.variables.iter().enumerate() {
            var.validate()?;
            if self.variables[..i].iter().any(|v| v.id == var.id) {
                return Err(ValidationError::DuplicateId(var.id));
            }
        }
        Ok(())
    }

    pub fn variable(&self, id: Uuid) -> Option<&Variable> {
        self.variables.iter().find(|v| v.id == id)
    }

    pub fn variable_mut(&mut self, id: Uuid) -> Option<&mut Variable> {
        self.variables.iter_mut().find(|v| v.id == id)
    }

    pub fn contains(&self, id: Uuid) -> bool {
        self.variable(id).is_some()
    }

    /// Append a variable after validating it.
    pub fn add_variable(&mut self, variable: Variable) -> Result<(), ValidationError> {
        variable.validate()?;
        if self.contains(variable.id) {
            return Err(ValidationError::DuplicateId(variable.id));
        }
        self.variables.push(variable);
        Ok(())
    }

    /// Replace the variable with the same id, keeping its list position.
    pub fn replace_variable(&mut self, variable: Variable) -> Result<(), ValidationError> {
        variable.validate()?;
        let slot = self
            .variable_mut(variable.id)
            .ok_or(ValidationError::UnknownVariable(variable.id))?;
        *slot = variable;
        Ok(())
    }

    /// Remove a variable, preserving the order of the rest.
    pub fn remove_variable(&mut self, id: Uuid) -> Option<Variable> {
        let index = self.variables.iter().position(|v| v.id == id)?;
        Some(self.variables.remove(index))
    }

    pub fn clear_variables(&mut self) {
        self.variables.clear();
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_then_remove_restores_list() {
        let mut template = Template::new();
        let a = Variable::new("A", "alpha", 0.0, 0.0);
        let b = Variable::new("B", "beta", 10.0, 10.0);
        template.add_variable(a.clone()).unwrap();
        template.add_variable(b.clone()).unwrap();
        let before = template.variables.clone();

        let c = Variable::new("C", "gamma", 5.0, 5.0);
        let c_id = c.id;
        template.add_variable(c).unwrap();
        template.remove_variable(c_id).unwrap();

        assert_eq!(template.variables, before);
    }

    #[test]
    fn test_remove_preserves_order() {
        let mut template = Template::new();
        let vars: Vec<Variable> = (0..4)
            .map(|i| Variable::new(format!("T{i}"), format!("V{i}"), 0.0, 0.0))
            .collect();
        for v in &vars {
            template.add_variable(v.clone()).unwrap();
        }
        template.remove_variable(vars[1].id);
        let titles: Vec<&str> = template.variables.iter().map(|v| v.title.as_str()).collect();
        assert_eq!(titles, ["T0", "T2", "T3"]);
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let mut template = Template::new();
        let a = Variable::new("A", "alpha", 0.0, 0.0);
        template.add_variable(a.clone()).unwrap();
        assert_eq!(
            template.add_variable(a.clone()),
            Err(ValidationError::DuplicateId(a.id))
        );
        template.variables.push(a.clone());
        assert_eq!(template.validate(), Err(ValidationError::DuplicateId(a.id)));
    }

    #[test]
    fn test_validation_rules() {
        let blank_title = Variable::new("  ", "v", 0.0, 0.0);
        assert_eq!(blank_title.validate(), Err(ValidationError::EmptyTitle));

        let blank_value = Variable::new("t", "", 0.0, 0.0);
        assert_eq!(blank_value.validate(), Err(ValidationError::EmptyValue));

        let negative = Variable::new("t", "v", -1.0, 0.0);
        assert!(matches!(
            negative.validate(),
            Err(ValidationError::InvalidPosition { .. })
        ));

        let mut tiny = Variable::new("t", "v", 0.0, 0.0);
        tiny.format.font_size = 0.0;
        assert_eq!(tiny.validate(), Err(ValidationError::InvalidFontSize(0.0)));
    }

    #[test]
    fn test_replace_keeps_position_in_list() {
        let mut template = Template::new();
        let a = Variable::new("A", "alpha", 0.0, 0.0);
        let b = Variable::new("B", "beta", 0.0, 0.0);
        template.add_variable(a.clone()).unwrap();
        template.add_variable(b).unwrap();

        let mut edited = a.clone();
        edited.value = "ALPHA".into();
        template.replace_variable(edited).unwrap();
        assert_eq!(template.variables[0].value, "ALPHA");

        let stranger = Variable::new("X", "x", 0.0, 0.0);
        assert_eq!(
            template.replace_variable(stranger.clone()),
            Err(ValidationError::UnknownVariable(stranger.id))
        );
    }
}
