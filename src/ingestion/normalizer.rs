//! Document normalization: raw file bytes to plain UTF-8 text

use regex::Regex;
use std::path::Path;

use crate::error::{Error, Result};
use crate::types::Document;

/// Converts raw file bytes (PDF, txt, md) into a normalized [`Document`].
///
/// Pure transform: no side effects. PDF extraction failures surface as
/// [`Error::Extraction`] so callers can distinguish degraded files from
/// real content.
pub struct DocumentNormalizer {
    newline_runs: Regex,
    space_runs: Regex,
    glued_words: Regex,
    sentence_breaks: Regex,
    space_before_punct: Regex,
}

impl DocumentNormalizer {
    /// Create a normalizer with the PDF cleanup patterns compiled
    pub fn new() -> Self {
        Self {
            newline_runs: Regex::new(r"\n\s*\n\s*\n").unwrap(),
            space_runs: Regex::new(r" +").unwrap(),
            glued_words: Regex::new(r"([a-z])([A-Z])").unwrap(),
            sentence_breaks: Regex::new(r"([.!?])([A-Z])").unwrap(),
            space_before_punct: Regex::new(r"\s+([.,!?;:])").unwrap(),
        }
    }

    /// Convert raw file bytes into a normalized document.
    ///
    /// Routing is by extension: `pdf` goes through page-wise extraction and
    /// cleanup, `txt`/`md` are decoded as UTF-8 with a Latin-1 fallback.
    /// `docx` is rejected until a conversion path exists; everything else is
    /// [`Error::UnsupportedFormat`].
    pub fn normalize(&self, bytes: &[u8], filename: &str) -> Result<Document> {
        let extension = Path::new(filename)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        let text = match extension.as_str() {
            "pdf" => self.pdf_to_markdown(bytes, filename)?,
            "txt" | "md" => decode_text(bytes),
            "docx" => {
                return Err(Error::UnsupportedFormat(
                    "docx - no conversion path is implemented".to_string(),
                ))
            }
            "" => return Err(Error::UnsupportedFormat(format!("{} has no extension", filename))),
            other => return Err(Error::UnsupportedFormat(other.to_string())),
        };

        Ok(Document::new(filename, text))
    }

    /// Extract a PDF into markdown: a title line from the filename, then a
    /// page marker before each page's cleaned text.
    fn pdf_to_markdown(&self, data: &[u8], filename: &str) -> Result<String> {
        let pages = extract_pdf_pages(data, filename)?;
        let cleaned: Vec<(u32, String)> = pages
            .into_iter()
            .filter(|(_, raw)| !raw.trim().is_empty())
            .map(|(page_number, raw)| (page_number, self.clean_text(&raw)))
            .collect();
        Ok(render_markdown(filename, &cleaned))
    }

    /// Deterministic cleanup for PDF extraction artifacts:
    /// collapse newline and space runs, split words glued across line wraps,
    /// restore the space after sentence-ending punctuation, and strip
    /// whitespace that ended up before punctuation.
    fn clean_text(&self, text: &str) -> String {
        let text = self.newline_runs.replace_all(text, "\n\n");
        let text = self.space_runs.replace_all(&text, " ");
        let text = self.glued_words.replace_all(&text, "$1 $2");
        let text = self.sentence_breaks.replace_all(&text, "$1 $2");
        let text = self.space_before_punct.replace_all(&text, "$1");

        text.lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Default for DocumentNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Render extracted pages as markdown with a title line and page markers
fn render_markdown(filename: &str, pages: &[(u32, String)]) -> String {
    let mut out = format!("# {}\n", filename);
    for (page_number, text) in pages {
        out.push_str(&format!("\n## Page {}\n", page_number));
        out.push_str(text);
        out.push('\n');
    }
    out
}

/// Extract text page by page, falling back to whole-document extraction
/// when page-wise extraction yields nothing.
fn extract_pdf_pages(data: &[u8], filename: &str) -> Result<Vec<(u32, String)>> {
    let doc = match lopdf::Document::load_mem(data) {
        Ok(doc) => doc,
        Err(e) => {
            tracing::warn!(filename, error = %e, "lopdf failed to load PDF, trying pdf-extract");
            return extract_whole_pdf(data, filename);
        }
    };

    let mut page_numbers: Vec<u32> = doc.get_pages().keys().copied().collect();
    page_numbers.sort_unstable();

    let mut pages = Vec::with_capacity(page_numbers.len());
    for page_number in page_numbers {
        match doc.extract_text(&[page_number]) {
            Ok(text) => pages.push((page_number, text)),
            Err(e) => {
                tracing::warn!(filename, page_number, error = %e, "page extraction failed, trying pdf-extract");
                return extract_whole_pdf(data, filename);
            }
        }
    }

    if pages.iter().all(|(_, text)| text.trim().is_empty()) {
        return extract_whole_pdf(data, filename);
    }

    Ok(pages)
}

/// Whole-document fallback via pdf-extract, presented as a single page
fn extract_whole_pdf(data: &[u8], filename: &str) -> Result<Vec<(u32, String)>> {
    let text = pdf_extract::extract_text_from_mem(data)
        .map_err(|e| Error::extraction(filename, e.to_string()))?;

    if text.trim().is_empty() {
        return Err(Error::extraction(
            filename,
            "no extractable text; the PDF may be image-based or encrypted",
        ));
    }

    Ok(vec![(1, text)])
}

/// UTF-8 decode with a Latin-1 fallback. The fallback maps each byte to the
/// code point of the same value and cannot fail.
fn decode_text(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => bytes.iter().map(|&b| b as char).collect(),
    }
}
