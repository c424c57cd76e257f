//! # Export Integration Tests
//!
//! End-to-end checks of the three export formats through the public API.

use pretty_assertions::assert_eq;
use std::io::{Cursor, Read};

use template_composer::{
    Template, Variable,
    export::{self, ExportContext, ExportFormat, Orientation, PdfPlan, import_json},
    import::{ImportResult, Importer, extract_docx_text},
    page::PageSizeTable,
};

fn letter_template() -> Template {
    let mut template = Template::new();
    template.title = "Letter".into();
    template.page_size = "letter".into();
    template
        .add_variable(Variable::new("Greeting", "Hello", 0.0, 0.0))
        .unwrap();
    template
}

#[test]
fn test_letter_origin_lands_at_top_left() {
    let template = letter_template();
    let plan = PdfPlan::build(&template, &PageSizeTable::builtin());

    assert_eq!(plan.orientation, Orientation::Portrait);
    assert_eq!(plan.page_points(), (612.0, 792.0));
    assert_eq!(plan.texts[0].font, "Helvetica");
    assert_eq!(plan.to_pdf_point(plan.texts[0].x, plan.texts[0].y), (0.0, 792.0));

    let artifact =
        export::export(&template, ExportFormat::Pdf, &ExportContext::default()).unwrap();
    assert_eq!(artifact.file_name, "Letter.pdf");
    assert_eq!(artifact.content_type, "application/pdf");
    assert!(artifact.bytes.starts_with(b"%PDF-"));
}

#[test]
fn test_pdf_skips_hidden_background() {
    let mut template = letter_template();
    template.background_image = Some("/api/uploads/missing.png".into());
    template.show_background_in_output = false;

    // A missing upload would fail the export if it were loaded
    let artifact =
        export::export(&template, ExportFormat::Pdf, &ExportContext::default()).unwrap();
    assert!(artifact.bytes.starts_with(b"%PDF-"));

    template.show_background_in_output = true;
    assert!(export::export(&template, ExportFormat::Pdf, &ExportContext::default()).is_err());
}

#[test]
fn test_docx_export_reads_back_as_text() {
    let mut template = letter_template();
    let mut second = Variable::new("Name", "Ada & Grace", 10.0, 37.4);
    second.format.toggle_bold();
    template.add_variable(second).unwrap();

    let artifact =
        export::export(&template, ExportFormat::Docx, &ExportContext::default()).unwrap();
    assert_eq!(artifact.file_name, "Letter.docx");

    let mut archive = zip::ZipArchive::new(Cursor::new(&artifact.bytes)).unwrap();
    let mut xml = String::new();
    archive
        .by_name("word/document.xml")
        .unwrap()
        .read_to_string(&mut xml)
        .unwrap();
    assert!(xml.contains(r#"<w:spacing w:before="75" w:after="0"/>"#));
    assert!(xml.contains("<w:b/>"));
    assert!(xml.contains("Ada &amp; Grace"));

    assert_eq!(extract_docx_text(&artifact.bytes).unwrap(), "Hello\nAda & Grace");
}

#[test]
fn test_docx_import_through_importer() {
    let artifact =
        export::export(&letter_template(), ExportFormat::Docx, &ExportContext::default()).unwrap();
    let result = Importer::new()
        .import("letter.docx", "", &artifact.bytes)
        .unwrap();
    assert_eq!(result, ImportResult::Text("Hello".into()));
}

#[test]
fn test_json_export_round_trips() {
    let mut template = letter_template();
    template.background_image = Some("data:image/png;base64,AAAA".into());
    template.variables[0].format.toggle_italic();
    template.variables[0].format.color = "#336699".into();

    let artifact =
        export::export(&template, ExportFormat::Json, &ExportContext::default()).unwrap();
    assert_eq!(artifact.file_name, "Letter.json");

    let text = String::from_utf8(artifact.bytes).unwrap();
    assert_eq!(import_json(&text).unwrap(), template);
}

#[test]
fn test_untitled_export_names() {
    let mut template = letter_template();
    template.title = String::new();
    let ctx = ExportContext::default();
    assert_eq!(
        export::export(&template, ExportFormat::Pdf, &ctx).unwrap().file_name,
        "document.pdf"
    );
    assert_eq!(
        export::export(&template, ExportFormat::Json, &ctx).unwrap().file_name,
        "template.json"
    );
}
