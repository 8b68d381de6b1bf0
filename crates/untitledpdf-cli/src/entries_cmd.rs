use std::path::Path;

use untitledpdf_core::{ExtractOptions, TextEntry, TextEntryExtraction};
use untitledpdf_parse::{LopdfDocument, extract_text_entries};

use crate::cli::OutputFormat;
use crate::shared::{
    csv_escape, open_page, open_pdf, print_json, report_warnings, resolve_pages, tsv_field,
};

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
        OutputFormat::Text => {
            println!("page\tindex\tx\ty\tlength\ttext");
            for (idx, extraction) in &extractions {
                for (i, entry) in extraction.items.iter().enumerate() {
                    println!(
                        "{}\t{}\t{:.2}\t{:.2}\t{:.2}\t{}",
                        idx + 1,
                        i,
                        entry.x,
                        entry.y,
                        entry.length,
                        tsv_field(&entry.text),
                    );
                }
            }
            Ok(())
        }
        OutputFormat::Json => {
            let pages: Vec<_> = extractions
                .iter()
                .map(|(idx, extraction)| {
                    let entries: Vec<_> = extraction
                        .items
                        .iter()
                        .enumerate()
                        .map(|(i, e)| entry_to_json(e, i))
                        .collect();
                    serde_json::json!({
                        "page": idx + 1,
                        "entries": entries,
                        "terminated_early": extraction.terminated_early,
                        "diagnostic": extraction.diagnostic,
                        "warnings": extraction.warnings,
                    })
                })
                .collect();
            print_json(&serde_json::Value::Array(pages))
        }
        OutputFormat::Csv => {
            println!("page,index,x,y,length,text");
            for (idx, extraction) in &extractions {
                for (i, entry) in extraction.items.iter().enumerate() {
                    println!(
                        "{},{},{:.2},{:.2},{:.2},{}",
                        idx + 1,
                        i,
                        entry.x,
                        entry.y,
                        entry.length,
                        csv_escape(&entry.text),
                    );
                }
            }
            Ok(())
        }
    }
}

fn extract_pages(
    doc: &LopdfDocument,
    page_indices: &[usize],
    options: &ExtractOptions,
) -> Result<Vec<(usize, TextEntryExtraction)>, i32> {
    let mut out = Vec::with_capacity(page_indices.len());
    for &idx in page_indices {
        let page = open_page(doc, idx)?;
        let extraction = extract_text_entries(&page, options);
        report_warnings(idx, &extraction.warnings);
        out.push((idx, extraction));
    }
    Ok(out)
}

fn entry_to_json(entry: &TextEntry, index: usize) -> serde_json::Value {
    serde_json::json!({
        "index": index,
        "x": entry.x,
        "y": entry.y,
        "length": entry.length,
        "text": entry.text,
    })
}
