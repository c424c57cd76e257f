//! # DOCX Export
//!
//! Writes one paragraph per variable, in list order, into a minimal OOXML
//! package:
//!
//! ```text
//! [Content_Types].xml
//! _rels/.rels
//! word/document.xml
//! ```
//!
//! Page size and background are not carried over; the vertical position is
//! approximated with paragraph spacing (`w:before = y × 2` twentieths of a
//! point).

use std::io::{Cursor, Write};

use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use super::{ExportArtifact, ExportContext, ExportError, ExportFormat, Exporter};
use crate::template::{TextAlign, Template, Variable, parse_hex_color};

const CONTENT_TYPES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
  <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
  <Default Extension="xml" ContentType="application/xml"/>
  <Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/>
</Types>"#;

const RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/>
</Relationships>"#;

/// A single-run paragraph, already in Word units.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocxParagraph {
    pub text: String,
    pub align: TextAlign,
    pub font_family: String,
    /// Font size in half-points
    pub size: u32,
    /// RGB hex without the leading `#`
    pub color: String,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    /// Space before the paragraph, in twentieths of a point
    pub spacing_before: u32,
}

impl DocxParagraph {
    pub fn from_variable(var: &Variable) -> Self {
        let format = &var.format;
        Self {
            text: var.value.clone(),
            align: format.align(),
            font_family: format.font_family.clone(),
            size: (format.font_size * 2.0).round().max(1.0) as u32,
            color: docx_color(&format.color),
            bold: format.is_bold(),
            italic: format.is_italic(),
            underline: format.is_underline(),
            spacing_before: (var.y * 2.0).round().max(0.0) as u32,
        }
    }

    fn write_xml(&self, out: &mut String) {
        out.push_str("<w:p><w:pPr>");
        out.push_str(&format!(
            r#"<w:spacing w:before="{}" w:after="0"/>"#,
            self.spacing_before
        ));
        out.push_str(&format!(r#"<w:jc w:val="{}"/>"#, jc_value(self.align)));
        out.push_str("</w:pPr><w:r><w:rPr>");

        let font = escape_xml_attr(&self.font_family);
        out.push_str(&format!(
            r#"<w:rFonts w:ascii="{font}" w:hAnsi="{font}" w:cs="{font}"/>"#
        ));
        if self.bold {
            out.push_str("<w:b/>");
        }
        if self.italic {
            out.push_str("<w:i/>");
        }
        out.push_str(&format!(r#"<w:color w:val="{}"/>"#, self.color));
        out.push_str(&format!(r#"<w:sz w:val="{}"/>"#, self.size));
        out.push_str(&format!(r#"<w:szCs w:val="{}"/>"#, self.size));
        if self.underline {
            out.push_str(r#"<w:u w:val="single"/>"#);
        }
        out.push_str("</w:rPr>");
        out.push_str(&format!(
            r#"<w:t xml:space="preserve">{}</w:t>"#,
            escape_xml(&self.text)
        ));
        out.push_str("</w:r></w:p>");
    }
}

fn jc_value(align: TextAlign) -> &'static str {
    match align {
        TextAlign::Left => "left",
        TextAlign::Center => "center",
        TextAlign::Right => "right",
        TextAlign::Justify => "both",
    }
}

/// `#rrggbb` → `rrggbb`, `#rgb` expanded, anything unparseable → black.
fn docx_color(color: &str) -> String {
    match color.strip_prefix('#') {
        Some(hex) if hex.len() == 6 && parse_hex_color(color).is_some() => hex.to_string(),
        _ => match parse_hex_color(color) {
            Some([r, g, b]) => format!("{r:02x}{g:02x}{b:02x}"),
            None => "000000".to_string(),
        },
    }
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn escape_xml_attr(s: &str) -> String {
    escape_xml(s).replace('"', "&quot;")
}

/// The paragraphs a template exports to.
pub fn docx_paragraphs(template: &Template) -> Vec<DocxParagraph> {
    template.variables.iter().map(DocxParagraph::from_variable).collect()
}

/// Render `word/document.xml`.
pub fn document_xml(template: &Template) -> String {
    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>"#,
    );
    for paragraph in docx_paragraphs(template) {
        paragraph.write_xml(&mut xml);
    }
    xml.push_str("</w:body></w:document>");
    xml
}

/// Package `template` as a `.docx` archive.
pub fn write_docx(template: &Template) -> Result<Vec<u8>, ExportError> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options =
        SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    for (path, content) in [
        ("[Content_Types].xml", CONTENT_TYPES_XML.to_string()),
        ("_rels/.rels", RELS_XML.to_string()),
        ("word/document.xml", document_xml(template)),
    ] {
        zip.start_file(path, options)?;
        zip.write_all(content.as_bytes())?;
    }

    Ok(zip.finish()?.into_inner())
}

/// DOCX exporter.
#[derive(Debug, Clone, Copy, Default)]
pub struct DocxExporter;

impl Exporter for DocxExporter {
    fn format(&self) -> ExportFormat {
        ExportFormat::Docx
    }

    fn export(
        &self,
        template: &Template,
        _ctx: &ExportContext<'_>,
    ) -> Result<ExportArtifact, ExportError> {
        Ok(ExportArtifact {
            file_name: ExportFormat::Docx.file_name(template),
            content_type: ExportFormat::Docx.content_type(),
            bytes: write_docx(template)?,
        })
    }
}
