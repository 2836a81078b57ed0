//! DOCX text extraction over the OOXML package

use crate::error::ReaderError;
use quick_xml::events::Event;
use std::io::Read;

/// Maximum decompressed bytes read from `word/document.xml` (zip-bomb guard).
const MAX_XML_ENTRY_BYTES: u64 = 50 * 1024 * 1024;

const DOCUMENT_XML: &str = "word/document.xml";

/// Extract paragraph text from a .docx byte buffer
///
/// Each non-blank `w:p` paragraph becomes one line; blank paragraphs are
/// dropped.
pub(crate) fn extract_docx(bytes: &[u8]) -> Result<String, ReaderError> {
    let mut archive = zip::ZipArchive::new(std::io::Cursor::new(bytes))
        .map_err(|e| ReaderError::Ooxml(e.to_string()))?;

    let entry = archive
        .by_name(DOCUMENT_XML)
        .map_err(|e| ReaderError::Ooxml(format!("{}: {}", DOCUMENT_XML, e)))?;

    let mut xml = Vec::new();
    entry
        .take(MAX_XML_ENTRY_BYTES)
        .read_to_end(&mut xml)
        .map_err(|e| ReaderError::Ooxml(e.to_string()))?;
    if xml.len() as u64 >= MAX_XML_ENTRY_BYTES {
        return Err(ReaderError::Ooxml(format!(
            "{} exceeds size limit ({} bytes)",
            DOCUMENT_XML, MAX_XML_ENTRY_BYTES
        )));
    }

    paragraphs_from_xml(&xml).map(|paragraphs| paragraphs.join("\n"))
}

fn paragraphs_from_xml(xml: &[u8]) -> Result<Vec<String>, ReaderError> {
    let mut reader = quick_xml::Reader::from_reader(xml);
    // Runs carry significant leading/trailing spaces (xml:space="preserve").
    reader.config_mut().trim_text(false);

    let mut paragraphs = Vec::new();
    let mut current = String::new();
    let mut in_text = false;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) if e.local_name().as_ref() == b"t" => in_text = true,
            Ok(Event::Text(te)) if in_text => {
                let text = te.unescape().map_err(|e| ReaderError::Ooxml(e.to_string()))?;
                current.push_str(&text);
            }
            Ok(Event::Empty(e)) => match e.local_name().as_ref() {
                b"tab" => current.push('\t'),
                b"br" | b"cr" => current.push('\n'),
                _ => {}
            },
            Ok(Event::End(e)) => match e.local_name().as_ref() {
                b"t" => in_text = false,
                b"p" => {
                    if !current.trim().is_empty() {
                        paragraphs.push(std::mem::take(&mut current));
                    } else {
                        current.clear();
                    }
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(ReaderError::Ooxml(e.to_string())),
            _ => {}
        }
        buf.clear();
    }

    Ok(paragraphs)
}
