//! Store-facing inputs: a template without an id, and a partial update.

use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use super::types::{DEFAULT_PAGE_SIZE, DEFAULT_TITLE, Template, Variable};

/// A template as submitted for creation. The store assigns the id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTemplate {
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default = "default_page_size")]
    pub page_size: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_image: Option<String>,
    #[serde(default = "default_true")]
    pub show_background_in_output: bool,
    #[serde(default)]
    pub variables: Vec<Variable>,
}

fn default_title() -> String {
    DEFAULT_TITLE.to_string()
}

fn default_page_size() -> String {
    DEFAULT_PAGE_SIZE.to_string()
}

fn default_true() -> bool {
    true
}

impl Default for NewTemplate {
    fn default() -> Self {
        Self {
            title: default_title(),
            page_size: default_page_size(),
            background_image: None,
            show_background_in_output: true,
            variables: Vec::new(),
        }
    }
}

impl NewTemplate {
    pub fn into_template(self, id: Uuid) -> Template {
        Template {
            id,
            title: self.title,
            page_size: self.page_size,
            background_image: self.background_image,
            show_background_in_output: self.show_background_in_output,
            variables: self.variables,
        }
    }

    /// Validate as if the template already existed.
    pub fn validate(&self) -> Result<(), super::ValidationError> {
        self.clone().into_template(Uuid::nil()).validate()
    }
}

impl From<Template> for NewTemplate {
    fn from(t: Template) -> Self {
        Self {
            title: t.title,
            page_size: t.page_size,
            background_image: t.background_image,
            show_background_in_output: t.show_background_in_output,
            variables: t.variables,
        }
    }
}

/// Shallow partial update of a stored template.
///
/// Every field is optional. `background_image` tells "absent" (keep as is)
/// apart from an explicit `null` (clear).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplatePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_size: Option<String>,
    #[serde(
        default,
        deserialize_with = "explicit_null",
        skip_serializing_if = "Option::is_none"
    )]
    pub background_image: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_background_in_output: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variables: Option<Vec<Variable>>,
}

/// Present-but-null becomes `Some(None)`; a missing field stays `None` via `default`.
fn explicit_null<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

impl TemplatePatch {
    /// Merge the set fields over `template`. The id is never touched.
    pub fn apply(self, template: &mut Template) {
        if let Some(title) = self.title {
            template.title = title;
        }
        if let Some(page_size) = self.page_size {
            template.page_size = page_size;
        }
        if let Some(background) = self.background_image {
            template.background_image = background;
        }
        if let Some(show) = self.show_background_in_output {
            template.show_background_in_output = show;
        }
        if let Some(variables) = self.variables {
            template.variables = variables;
        }
    }

    /// The template that `apply` would produce, without mutating the original.
    pub fn merged(self, template: &Template) -> Template {
        let mut next = template.clone();
        self.apply(&mut next);
        next
    }
}
