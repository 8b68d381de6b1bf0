use std::path::Path;

use untitledpdf_core::{ExtractOptions, TextState, TextStateExtraction};
use untitledpdf_parse::{LopdfDocument, extract_text_states};

use crate::cli::OutputFormat;
use crate::shared::{csv_escape, open_page, open_pdf, print_json, report_warnings, resolve_pages};

pub fn run(
    file: &Path,
    pages: Option<&str>,
    format: &OutputFormat,
    options: &ExtractOptions,
) -> Result<(), i32> {
    let doc = open_pdf(file)?;
    let page_indices = resolve_pages(pages, doc.page_count())?;
    let extractions = extract_pages(&doc, &page_indices, options)?;

    match format {
        OutputFormat::Text => write_text(&extractions),
        OutputFormat::Json => write_json(&extractions),
        OutputFormat::Csv => write_csv(&extractions),
    }
}

fn extract_pages(
    doc: &LopdfDocument,
    page_indices: &[usize],
    options: &ExtractOptions,
) -> Result<Vec<(usize, TextStateExtraction)>, i32> {
    let mut out = Vec::with_capacity(page_indices.len());
    for &idx in page_indices {
        let page = open_page(doc, idx)?;
        let extraction = extract_text_states(&page, options);
        report_warnings(idx, &extraction.warnings);
        out.push((idx, extraction));
    }
    Ok(out)
}

/// Resource name, full name and base name, or empty strings when unset.
fn font_columns(state: &TextState) -> (&str, &str, &str) {
    match state.font.as_deref() {
        Some(font) => (&font.resource_name, &font.font_name, &font.base_name),
        None => ("", "", ""),
    }
}

fn write_text(extractions: &[(usize, TextStateExtraction)]) -> Result<(), i32> {
    println!("page\tindex\tresource\tfontname\tbasename\tsize\tscale\tcharspacing\twordspacing");

    for (idx, extraction) in extractions {
        for (i, state) in extraction.items.iter().enumerate() {
            let (resource, font_name, base_name) = font_columns(state);
            println!(
                "{}\t{}\t{}\t{}\t{}\t{:.2}\t{:.2}\t{:.2}\t{:.2}",
                idx + 1,
                i,
                resource,
                font_name,
                base_name,
                state.font_size,
                state.font_scale,
                state.char_spacing,
                state.word_spacing,
            );
        }
    }
    Ok(())
}

fn state_to_json(state: &TextState, index: usize) -> serde_json::Value {
    let font = state.font.as_deref().map(|f| {
        serde_json::json!({
            "resource": f.resource_name,
            "fontname": f.font_name,
            "basename": f.base_name,
            "subtype": f.subtype,
        })
    });
    serde_json::json!({
        "index": index,
        "font": font,
        "size": state.font_size,
        "scale": state.font_scale,
        "char_spacing": state.char_spacing,
        "word_spacing": state.word_spacing,
    })
}

fn write_json(extractions: &[(usize, TextStateExtraction)]) -> Result<(), i32> {
    let pages: Vec<serde_json::Value> = extractions
        .iter()
        .map(|(idx, extraction)| {
            let states: Vec<_> = extraction
                .items
                .iter()
                .enumerate()
                .map(|(i, s)| state_to_json(s, i))
                .collect();
            serde_json::json!({
                "page": idx + 1,
                "states": states,
                "terminated_early": extraction.terminated_early,
                "diagnostic": extraction.diagnostic,
                "warnings": extraction.warnings,
            })
        })
        .collect();

    print_json(&serde_json::Value::Array(pages))
}

fn write_csv(extractions: &[(usize, TextStateExtraction)]) -> Result<(), i32> {
    println!("page,index,resource,fontname,basename,size,scale,charspacing,wordspacing");

    for (idx, extraction) in extractions {
        for (i, state) in extraction.items.iter().enumerate() {
            let (resource, font_name, base_name) = font_columns(state);
            println!(
                "{},{},{},{},{},{:.2},{:.2},{:.2},{:.2}",
                idx + 1,
                i,
                csv_escape(resource),
                csv_escape(font_name),
                csv_escape(base_name),
                state.font_size,
                state.font_scale,
                state.char_spacing,
                state.word_spacing,
            );
        }
    }
    Ok(())
}
