//! JSON export and import of whole templates.

use super::{ExportArtifact, ExportContext, ExportError, ExportFormat, Exporter};
use crate::template::Template;

/// Pretty-printed (2-space) JSON exporter. Lossless.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonExporter;

impl Exporter for JsonExporter {
    fn format(&self) -> ExportFormat {
        ExportFormat::Json
    }

    fn export(
        &self,
        template: &Template,
        _ctx: &ExportContext<'_>,
    ) -> Result<ExportArtifact, ExportError> {
        let json = serde_json::to_string_pretty(template)?;
        Ok(ExportArtifact {
            file_name: ExportFormat::Json.file_name(template),
            content_type: ExportFormat::Json.content_type(),
            bytes: json.into_bytes(),
        })
    }
}

/// Parse a template file previously written by [`JsonExporter`] and validate it.
pub fn import_json(text: &str) -> Result<Template, ExportError> {
    let template: Template = serde_json::from_str(text)?;
    template.validate()?;
    Ok(template)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::{TextAlign, Variable};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_json_round_trip_is_lossless() {
        let mut template = Template::new();
        template.title = "Certificate".into();
        template.page_size = "legal".into();
        template.background_image = Some("/api/uploads/image-1-2.png".into());
        let mut var = Variable::new("Name", "Grace Hopper", 140.5, 300.25);
        var.format.toggle_italic();
        var.format.text_align = Some(TextAlign::Center);
        template.variables.push(var);

        let artifact = JsonExporter
            .export(&template, &ExportContext::default())
            .unwrap();
        let text = String::from_utf8(artifact.bytes).unwrap();
        assert!(text.contains("\n  \"title\": \"Certificate\""));
        assert_eq!(import_json(&text).unwrap(), template);
    }

    #[test]
    fn test_import_rejects_invalid_template() {
        let json = r#"{"id":"6f1c0a4e-8f5b-4d52-9a3f-0a2b3c4d5e6f","variables":[
            {"id":"7f1c0a4e-8f5b-4d52-9a3f-0a2b3c4d5e6f","title":"","value":"v","x":0,"y":0}]}"#;
        assert!(matches!(import_json(json), Err(ExportError::Invalid(_))));
        assert!(matches!(import_json("not json"), Err(ExportError::Json(_))));
    }
}
