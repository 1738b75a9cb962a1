//! Content-control extraction
//!
//! Every structured document tag (`w:sdt`) in the main document part is a
//! value region. Regions are numbered 1-based in start-tag order, whether
//! they sit at block level, inside a paragraph, inside a table cell or
//! inside another region. The tag (`w:sdtPr/w:tag/@w:val`) names the fact;
//! the text is the concatenation of the `w:t` runs in `w:sdtContent`.
//!
//! ```xml
//! <w:sdt>
//!   <w:sdtPr><w:tag w:val="revenue_2025"/></w:sdtPr>
//!   <w:sdtContent>
//!     <w:r><w:t>1 234</w:t></w:r>
//!     <w:r><w:t xml:space="preserve"> 567,89</w:t></w:r>
//!   </w:sdtContent>
//! </w:sdt>
//! ```
//!
//! yields the raw fact `revenue_2025` = `1 234 567,89`.

use std::io::Cursor;
use std::path::Path;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use tracing::{debug, info, warn};
use xbrldok_core::{BatchResult, RawFact};

use crate::archive::{read_document_part, read_part, DOCUMENT_PART};
use crate::error::{OoxmlError, Result};

/// A content control as found in the document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentControl {
    /// 1-based position among all content controls
    pub position: usize,
    /// Tag value, `None` when absent or empty
    pub tag: Option<String>,
    /// Trimmed text of the content
    pub text: String,
}

#[derive(Debug)]
struct OpenControl {
    position: usize,
    tag: Option<String>,
    in_properties: bool,
    in_content: bool,
    text: String,
}

impl OpenControl {
    fn new(position: usize) -> Self {
        Self {
            position,
            tag: None,
            in_properties: false,
            in_content: false,
            text: String::new(),
        }
    }

    fn finish(self) -> ContentControl {
        ContentControl {
            position: self.position,
            tag: self.tag.filter(|t| !t.trim().is_empty()),
            text: self.text.trim().to_string(),
        }
    }
}

fn push_text(open: &mut [OpenControl], text: &str) {
    for control in open.iter_mut().filter(|c| c.in_content) {
        control.text.push_str(text);
    }
}

fn tag_value(e: &BytesStart) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|attr| attr.key.local_name().as_ref() == b"val")
        .and_then(|attr| attr.unescape_value().ok().map(|v| v.into_owned()))
}

/// Parse all content controls from `word/document.xml` bytes
///
/// Controls are returned in position order. Text of a nested control is
/// part of its parent's text as well.
pub fn parse_content_controls(xml: &[u8]) -> Result<Vec<ContentControl>> {
    let mut reader = Reader::from_reader(xml);
    // Don't trim text - Word splits values across runs at arbitrary points
    reader.config_mut().trim_text(false);

    let mut buf = Vec::new();
    let mut open: Vec<OpenControl> = Vec::new();
    let mut controls = Vec::new();
    let mut count = 0usize;
    let mut run_depth = 0u32;
    let mut in_text = false;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => match e.local_name().as_ref() {
                b"sdt" => {
                    count += 1;
                    open.push(OpenControl::new(count));
                }
                b"sdtPr" => {
                    if let Some(control) = open.last_mut() {
                        control.in_properties = true;
                    }
                }
                b"sdtContent" => {
                    if let Some(control) = open.last_mut() {
                        control.in_content = true;
                    }
                }
                b"tag" => {
                    if let Some(control) = open.last_mut().filter(|c| c.in_properties) {
                        control.tag = tag_value(e);
                    }
                }
                b"r" => run_depth += 1,
                b"t" => in_text = true,
                _ => {}
            },
            Ok(Event::Empty(ref e)) => match e.local_name().as_ref() {
                b"sdt" => {
                    count += 1;
                    controls.push(OpenControl::new(count).finish());
                }
                b"tag" => {
                    if let Some(control) = open.last_mut().filter(|c| c.in_properties) {
                        control.tag = tag_value(e);
                    }
                }
                b"tab" if run_depth > 0 => push_text(&mut open, "\t"),
                b"br" | b"cr" if run_depth > 0 => push_text(&mut open, "\n"),
                b"noBreakHyphen" if run_depth > 0 => push_text(&mut open, "-"),
                _ => {}
            },
            Ok(Event::End(ref e)) => match e.local_name().as_ref() {
                b"sdt" => {
                    let control = open.pop().ok_or_else(|| {
                        OoxmlError::InvalidStructure("unbalanced w:sdt".to_string())
                    })?;
                    controls.push(control.finish());
                }
                b"sdtPr" => {
                    if let Some(control) = open.last_mut() {
                        control.in_properties = false;
                    }
                }
                b"sdtContent" => {
                    if let Some(control) = open.last_mut() {
                        control.in_content = false;
                    }
                }
                b"r" => run_depth = run_depth.saturating_sub(1),
                b"t" => in_text = false,
                _ => {}
            },
            Ok(Event::Text(ref e)) => {
                // Only <w:t> carries visible text; delText and instrText do not
                if in_text {
                    let text = e.unescape()?;
                    push_text(&mut open, &text);
                }
            }
            Ok(Event::CData(ref e)) => {
                if in_text {
                    push_text(&mut open, &String::from_utf8_lossy(e));
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(OoxmlError::Xml(e)),
            _ => {}
        }
        buf.clear();
    }

    if let Some(control) = open.last() {
        return Err(OoxmlError::InvalidStructure(format!(
            "content control #{} is not closed",
            control.position
        )));
    }

    controls.sort_by_key(|c| c.position);
    Ok(controls)
}

/// Turn content controls into raw facts
///
/// Untagged controls are skipped with a warning; they keep their position
/// so tagged controls are numbered as in the document.
pub fn to_raw_facts(controls: Vec<ContentControl>) -> BatchResult<RawFact> {
    let mut batch = BatchResult::new();
    for control in controls {
        match control.tag {
            Some(tag) => {
                debug!("#{} {}: '{}'", control.position, tag, control.text);
                batch.push_ok(tag.clone(), RawFact::new(tag, control.text, control.position));
            }
            None => {
                warn!("Content control #{} has no tag, skipped", control.position);
                batch.push_skipped(format!("#{}", control.position), "content control has no tag");
            }
        }
    }
    batch
}

/// Extracts tagged value regions from DOCX packages
#[derive(Debug, Default, Clone, Copy)]
pub struct ContentControlExtractor;

impl ContentControlExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Extract raw facts from in-memory package bytes
    ///
    /// Only the main document part is decompressed.
    pub fn extract_bytes(&self, bytes: &[u8]) -> Result<BatchResult<RawFact>> {
        let xml = read_part(Cursor::new(bytes), DOCUMENT_PART)?;
        Ok(to_raw_facts(parse_content_controls(&xml)?))
    }

    /// Extract raw facts from a DOCX file
    ///
    /// The file is closed before the document part is parsed; no other part
    /// of the package is read.
    pub fn extract(&self, path: &Path) -> xbrldok_core::Result<BatchResult<RawFact>> {
        let label = path.display().to_string();
        let xml = read_document_part(path).map_err(|e| e.into_pipeline_error(&label))?;
        let batch = parse_content_controls(&xml)
            .map(to_raw_facts)
            .map_err(|e| e.into_pipeline_error(&label))?;

        info!(
            "Extracted {} tagged content controls from {} ({} untagged)",
            batch.ok_count(),
            label,
            batch.skipped_count()
        );
        Ok(batch)
    }
}
