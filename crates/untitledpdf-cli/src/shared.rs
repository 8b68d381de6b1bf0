use std::path::Path;

use untitledpdf_core::{ExtractWarning, PdfError, Slant, StyleHint, Weight};
use untitledpdf_parse::{LopdfDocument, LopdfPage};

use crate::page_range::parse_page_range;

/// Open a PDF file with user-friendly error messages.
///
/// Returns `Err(1)` with a message printed to stderr if the file is not found
/// or cannot be parsed as a valid PDF.
pub fn open_pdf(file: &Path) -> Result<LopdfDocument, i32> {
    if !file.exists() {
        eprintln!("Error: file not found: {}", file.display());
        return Err(1);
    }

    LopdfDocument::open_file(file).map_err(|e| {
        eprintln!("Error: failed to open PDF: {}", PdfError::from(e));
        1
    })
}

/// Resolve an optional page range string into 0-indexed page indices.
///
/// If `pages` is `None`, returns all pages (0..page_count).
/// If `pages` is `Some`, parses the range string and validates against page_count.
pub fn resolve_pages(pages: Option<&str>, page_count: usize) -> Result<Vec<usize>, i32> {
    match pages {
        Some(range) => parse_page_range(range, page_count).map_err(|e| {
            eprintln!("Error: {e}");
            1
        }),
        None => Ok((0..page_count).collect()),
    }
}

/// Open page `idx`, reporting failures with its 1-based number.
pub fn open_page(doc: &LopdfDocument, idx: usize) -> Result<LopdfPage<'_>, i32> {
    doc.page(idx).map_err(|e| {
        eprintln!("Error reading page {}: {e}", idx + 1);
        1
    })
}

/// Print extraction warnings for page `idx` to stderr.
pub fn report_warnings(idx: usize, warnings: &[ExtractWarning]) {
    for warning in warnings {
        eprintln!("Warning: page {}: {warning}", idx + 1);
    }
}

/// Serialize `value` and print it on one line.
pub fn print_json(value: &serde_json::Value) -> Result<(), i32> {
    let json_str = serde_json::to_string(value).map_err(|e| {
        eprintln!("Error: failed to serialize output: {e}");
        1
    })?;
    println!("{json_str}");
    Ok(())
}

/// Escape a string for CSV output.
///
/// If the text contains commas, double quotes, or newlines, wraps it in
/// double quotes and escapes any internal double quotes by doubling them.
pub fn csv_escape(text: &str) -> String {
    if text.contains(',') || text.contains('"') || text.contains('\n') {
        format!("\"{}\"", text.replace('"', "\"\""))
    } else {
        text.to_string()
    }
}

/// Replace tabs and newlines so a value stays on one tab-separated row.
pub fn tsv_field(text: &str) -> String {
    text.replace(['\t', '\n', '\r'], " ")
}

pub fn weight_str(weight: Weight) -> &'static str {
    match weight {
        Weight::Normal => "normal",
        Weight::Bold => "bold",
    }
}

pub fn slant_str(slant: Slant) -> &'static str {
    match slant {
        Slant::Normal => "normal",
        Slant::Italic => "italic",
        Slant::Oblique => "oblique",
    }
}

pub fn hint_str(hint: StyleHint) -> &'static str {
    match hint {
        StyleHint::Serif => "serif",
        StyleHint::SansSerif => "sans-serif",
        StyleHint::Monospace => "monospace",
        StyleHint::System => "system",
    }
}
