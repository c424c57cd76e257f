//! Plain text extraction from `word/document.xml`.

use std::io::{Cursor, Read};

use quick_xml::Reader;
use quick_xml::events::Event;

use super::ImportError;

/// Collect the text of every paragraph, one line per paragraph.
///
/// `w:tab` becomes a tab and `w:br` a newline. Empty trailing paragraphs are
/// dropped.
pub fn extract_docx_text(bytes: &[u8]) -> Result<String, ImportError> {
    let mut archive =
        zip::ZipArchive::new(Cursor::new(bytes)).map_err(|e| ImportError::Docx(e.to_string()))?;
    let mut xml = String::new();
    archive
        .by_name("word/document.xml")
        .map_err(|e| ImportError::Docx(e.to_string()))?
        .read_to_string(&mut xml)
        .map_err(|e| ImportError::Docx(e.to_string()))?;

    let mut reader = Reader::from_str(&xml);
    let mut paragraphs: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut in_text = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) if e.local_name().as_ref() == b"t" => in_text = true,
            Ok(Event::Empty(ref e)) => match e.local_name().as_ref() {
                b"tab" => current.push('\t'),
                b"br" | b"cr" => current.push('\n'),
                b"p" => paragraphs.push(String::new()),
                _ => {}
            },
            Ok(Event::Text(ref e)) if in_text => {
                let text = e.unescape().map_err(|e| ImportError::Docx(e.to_string()))?;
                current.push_str(&text);
            }
            Ok(Event::End(ref e)) => match e.local_name().as_ref() {
                b"t" => in_text = false,
                b"p" => paragraphs.push(std::mem::take(&mut current)),
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(ImportError::Docx(e.to_string())),
            _ => {}
        }
    }

    while paragraphs.last().is_some_and(|p| p.is_empty()) {
        paragraphs.pop();
    }
    Ok(paragraphs.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::docx::write_docx;
    use crate::template::{Template, Variable};

    #[test]
    fn test_reads_text_written_by_exporter() {
        let mut template = Template::new();
        template.variables.push(Variable::new("a", "First line", 0.0, 0.0));
        template.variables.push(Variable::new("b", "Fish & Chips", 0.0, 30.0));
        let bytes = write_docx(&template).unwrap();

        assert_eq!(extract_docx_text(&bytes).unwrap(), "First line\nFish & Chips");
    }

    #[test]
    fn test_rejects_non_zip() {
        assert!(matches!(
            extract_docx_text(b"plain text"),
            Err(ImportError::Docx(_))
        ));
    }
}
