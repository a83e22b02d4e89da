//! Text extraction from uploaded documents (PDF, DOCX, plain text).
//!
//! Extraction is fully in-memory and CPU-bound; callers run it inside
//! `tokio::task::spawn_blocking`.

use docx_rs::{
    read_docx, DocumentChild, Paragraph, ParagraphChild, RunChild, Table, TableCellContent,
    TableChild, TableRowChild,
};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Pdf,
    Docx,
    Text,
}

impl std::fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            DocumentFormat::Pdf => "PDF",
            DocumentFormat::Docx => "DOCX",
            DocumentFormat::Text => "text",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("unsupported document format ({0})")]
    UnsupportedFormat(String),

    #[error("failed to parse {format} document: {message}")]
    Corrupt {
        format: DocumentFormat,
        message: String,
    },
}

/// Extracts normalized plain text from raw document bytes.
///
/// Format resolution order: filename extension, declared content type,
/// content signature, UTF-8 probe. Output is whitespace-normalized but not
/// otherwise transformed.
pub fn extract_text(
    bytes: &[u8],
    filename: &str,
    content_type: Option<&str>,
) -> Result<String, ExtractError> {
    let format = detect_format(bytes, filename, content_type)?;
    let raw = match format {
        DocumentFormat::Pdf => extract_pdf(bytes)?,
        DocumentFormat::Docx => extract_docx(bytes)?,
        DocumentFormat::Text => decode_text(bytes),
    };
    Ok(normalize_whitespace(&raw))
}

/// Resolves the document format from the extension hint, declared content
/// type, and content signature, in that order.
pub fn detect_format(
    bytes: &[u8],
    filename: &str,
    content_type: Option<&str>,
) -> Result<DocumentFormat, ExtractError> {
    if let Some(ext) = extension(filename) {
        match ext.as_str() {
            "pdf" => return Ok(DocumentFormat::Pdf),
            "docx" => return Ok(DocumentFormat::Docx),
            "txt" | "text" | "md" => return Ok(DocumentFormat::Text),
            _ => {} // unknown extension: fall through to content checks
        }
    }

    if let Some(declared) = content_type {
        let declared = declared.to_lowercase();
        if declared.contains("pdf") {
            return Ok(DocumentFormat::Pdf);
        }
        if declared.contains("wordprocessingml") {
            return Ok(DocumentFormat::Docx);
        }
        if declared.starts_with("text/") {
            return Ok(DocumentFormat::Text);
        }
    }

    if looks_like_pdf(bytes) {
        return Ok(DocumentFormat::Pdf);
    }
    if looks_like_docx(bytes) {
        return Ok(DocumentFormat::Docx);
    }
    if std::str::from_utf8(bytes).is_ok() {
        return Ok(DocumentFormat::Text);
    }

    Err(ExtractError::UnsupportedFormat(describe_input(
        filename,
        content_type,
    )))
}

fn extension(filename: &str) -> Option<String> {
    std::path::Path::new(filename)
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
}

fn describe_input(filename: &str, content_type: Option<&str>) -> String {
    match content_type {
        Some(ct) => format!("{filename}, {ct}"),
        None => filename.to_string(),
    }
}

fn looks_like_pdf(bytes: &[u8]) -> bool {
    bytes.starts_with(b"%PDF-")
}

fn looks_like_docx(bytes: &[u8]) -> bool {
    // DOCX is a zip package
    bytes.len() > 4 && bytes.starts_with(b"PK")
}

fn extract_pdf(bytes: &[u8]) -> Result<String, ExtractError> {
    pdf_extract::extract_text_from_mem(bytes).map_err(|e| ExtractError::Corrupt {
        format: DocumentFormat::Pdf,
        message: e.to_string(),
    })
}

fn extract_docx(bytes: &[u8]) -> Result<String, ExtractError> {
    let package = read_docx(bytes).map_err(|e| ExtractError::Corrupt {
        format: DocumentFormat::Docx,
        message: e.to_string(),
    })?;

    let mut segments = Vec::new();
    for child in &package.document.children {
        match child {
            DocumentChild::Paragraph(paragraph) => {
                if let Some(text) = paragraph_text(paragraph.as_ref()) {
                    segments.push(text);
                }
            }
            DocumentChild::Table(table) => collect_table_text(table.as_ref(), &mut segments),
            _ => {}
        }
    }

    Ok(segments.join("\n"))
}

fn paragraph_text(paragraph: &Paragraph) -> Option<String> {
    let mut buffer = String::new();
    for child in &paragraph.children {
        append_paragraph_child_text(child, &mut buffer);
    }

    let trimmed = buffer.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn append_paragraph_child_text(child: &ParagraphChild, buffer: &mut String) {
    match child {
        ParagraphChild::Run(run) => {
            for run_child in &run.children {
                match run_child {
                    RunChild::Text(text) => buffer.push_str(&text.text),
                    RunChild::Break(_) => buffer.push('\n'),
                    RunChild::Tab(_) => buffer.push('\t'),
                    _ => {}
                }
            }
        }
        ParagraphChild::Hyperlink(hyperlink) => {
            for inner in &hyperlink.children {
                append_paragraph_child_text(inner, buffer);
            }
        }
        _ => {}
    }
}

fn collect_table_text(table: &Table, segments: &mut Vec<String>) {
    for row in &table.rows {
        let row = match row {
            TableChild::TableRow(row) => row,
        };
        for cell in &row.cells {
            let cell = match cell {
                TableRowChild::TableCell(cell) => cell,
            };
            for content in &cell.children {
                match content {
                    TableCellContent::Paragraph(paragraph) => {
                        if let Some(text) = paragraph_text(paragraph) {
                            segments.push(text);
                        }
                    }
                    TableCellContent::Table(inner) => collect_table_text(inner, segments),
                    _ => {}
                }
            }
        }
    }
}

fn decode_text(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

/// Collapses runs of spaces/tabs within lines and runs of blank lines,
/// trims line ends. Idempotent.
pub fn normalize_whitespace(text: &str) -> String {
    let mut lines: Vec<String> = Vec::new();
    let mut blank_pending = false;

    for line in text.lines() {
        let collapsed = line.split_whitespace().collect::<Vec<_>>().join(" ");
        if collapsed.is_empty() {
            blank_pending = !lines.is_empty();
        } else {
            if blank_pending {
                lines.push(String::new());
                blank_pending = false;
            }
            lines.push(collapsed);
        }
    }

    lines.join("\n")
}
