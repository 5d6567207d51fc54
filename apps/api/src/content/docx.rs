//! DOCX text extraction.
//!
//! A .docx is a zip container; body text lives in `word/document.xml` as
//! `<w:t>` runs grouped into `<w:p>` paragraphs. Styling, tables and headers
//! are flattened away.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

use super::ContentError;

const DOCUMENT_PART: &str = "word/document.xml";

/// Matches a text run (capturing its content), a paragraph end, a run tab, or
/// a line/page/carriage break. Breaks may carry attributes (`w:type="page"`).
/// Tab stops inside `<w:tabs>` always carry attributes and are skipped.
static RUN_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<w:t(?:\s[^>]*)?>(.*?)</w:t>|</w:p>|<w:tab\s*/>|<w:(?:br|cr)\b[^>]*/>")
        .expect("valid DOCX run pattern")
});

/// Hex (`&#x2019;`) or decimal (`&#8217;`) character reference, or one of the
/// five predefined XML entities.
static ENTITY_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"&(?:#[xX]([0-9a-fA-F]+)|#([0-9]+)|(lt|gt|quot|apos|amp));")
        .expect("valid entity pattern")
});

pub async fn extract_docx_text(path: &Path) -> Result<String, ContentError> {
    let path: PathBuf = path.to_path_buf();
    tokio::task::spawn_blocking(move || read_docx(&path)).await?
}

fn read_docx(path: &Path) -> Result<String, ContentError> {
    let file = std::fs::File::open(path)?;
    let mut archive =
        zip::ZipArchive::new(file).map_err(|e| ContentError::Docx(e.to_string()))?;
    let mut part = archive
        .by_name(DOCUMENT_PART)
        .map_err(|e| ContentError::Docx(format!("{DOCUMENT_PART}: {e}")))?;

    let mut xml = String::new();
    part.read_to_string(&mut xml)?;

    Ok(document_xml_to_text(&xml))
}

/// Flattens WordprocessingML body XML into plain text.
fn document_xml_to_text(xml: &str) -> String {
    let mut text = String::new();

    for caps in RUN_PATTERN.captures_iter(xml) {
        if let Some(run) = caps.get(1) {
            text.push_str(&decode_entities(run.as_str()));
            continue;
        }
        match &caps[0] {
            "</w:p>" => text.push('\n'),
            tag if tag.starts_with("<w:tab") => text.push('\t'),
            _ => text.push('\n'),
        }
    }

    text.lines()
        .map(str::trim_end)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Single pass, so `&amp;lt;` decodes to `&lt;` and not `<`.
fn decode_entities(raw: &str) -> String {
    ENTITY_PATTERN
        .replace_all(raw, |caps: &regex::Captures| {
            let decoded = if let Some(hex) = caps.get(1) {
                u32::from_str_radix(hex.as_str(), 16).ok().and_then(char::from_u32)
            } else if let Some(dec) = caps.get(2) {
                dec.as_str().parse::<u32>().ok().and_then(char::from_u32)
            } else {
                match caps.get(3).map(|m| m.as_str()) {
                    Some("lt") => Some('<'),
                    Some("gt") => Some('>'),
                    Some("quot") => Some('"'),
                    Some("apos") => Some('\''),
                    Some("amp") => Some('&'),
                    _ => None,
                }
            };
            decoded
                .map(String::from)
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}
