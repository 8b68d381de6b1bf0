use std::path::Path;

use untitledpdf_core::{
    ExtractOptions, FontDescription, OverlayLayout, PageFrame, TextOverlay, layout_overlays,
    standard_font_name,
};
use untitledpdf_parse::{LopdfDocument, extract_text_entries, extract_text_states};

use crate::cli::OutputFormat;
use crate::shared::{
    csv_escape, open_page, open_pdf, print_json, report_warnings, resolve_pages, slant_str,
    tsv_field, weight_str,
};

/// Overlays for one page together with the canvas they were laid out on.
struct PageOverlays {
    idx: usize,
    frame: PageFrame,
    layout: OverlayLayout,
}

pub fn run(
    file: &Path,
    pages: Option<&str>,
    format: &OutputFormat,
    dpi: f64,
    zoom: f64,
    options: &ExtractOptions,
) -> Result<(), i32> {
    if !(dpi > 0.0 && zoom > 0.0) {
        eprintln!("Error: --dpi and --zoom must be positive");
        return Err(1);
    }

    let doc = open_pdf(file)?;
    let page_indices = resolve_pages(pages, doc.page_count())?;

    let mut overlays = Vec::with_capacity(page_indices.len());
    for &idx in &page_indices {
        overlays.push(layout_page(&doc, idx, dpi * zoom, options)?);
    }

    match format {
        OutputFormat::Text => write_text(&overlays),
        OutputFormat::Json => write_json(&overlays),
        OutputFormat::Csv => write_csv(&overlays),
    }
}

fn layout_page(
    doc: &LopdfDocument,
    idx: usize,
    dpi: f64,
    options: &ExtractOptions,
) -> Result<PageOverlays, i32> {
    let page = open_page(doc, idx)?;
    let trim = page.trim_box().map_err(|e| {
        eprintln!("Error reading page {}: {e}", idx + 1);
        1
    })?;
    let frame = PageFrame::uniform(trim, dpi);

    let states = extract_text_states(&page, options);
    let entries = extract_text_entries(&page, options);
    // Both walkers see the same records, so their warnings repeat; report once.
    report_warnings(idx, &states.warnings);

    let layout = layout_overlays(&entries.items, &states.items, &frame);
    report_warnings(idx, &layout.warnings);

    Ok(PageOverlays { idx, frame, layout })
}

fn font_columns(font: &FontDescription) -> (&str, &'static str, &'static str) {
    (&font.family, weight_str(font.weight), slant_str(font.slant))
}

fn write_text(pages: &[PageOverlays]) -> Result<(), i32> {
    println!("page\tindex\tx\ty\twidth\theight\tfamily\tweight\tslant\tsize\ttext");

    for page in pages {
        for overlay in &page.layout.items {
            let (family, weight, slant) = font_columns(&overlay.font);
            println!(
                "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{:.2}\t{}",
                page.idx + 1,
                overlay.index,
                overlay.rect.x,
                overlay.rect.y,
                overlay.rect.width,
                overlay.rect.height,
                family,
                weight,
                slant,
                overlay.point_size,
                tsv_field(&overlay.text),
            );
        }
    }
    Ok(())
}

fn overlay_to_json(overlay: &TextOverlay) -> serde_json::Value {
    serde_json::json!({
        "index": overlay.index,
        "text": overlay.text,
        "x": overlay.rect.x,
        "y": overlay.rect.y,
        "width": overlay.rect.width,
        "height": overlay.rect.height,
        "font": overlay.font,
        "standard_font": standard_font_name(&overlay.font),
        "point_size": overlay.point_size,
        "origin": [overlay.origin.0, overlay.origin.1],
    })
}

fn write_json(pages: &[PageOverlays]) -> Result<(), i32> {
    let pages: Vec<serde_json::Value> = pages
        .iter()
        .map(|page| {
            let (width, height) = page.frame.canvas_size();
            let overlays: Vec<_> = page.layout.items.iter().map(overlay_to_json).collect();
            serde_json::json!({
                "page": page.idx + 1,
                "canvas": { "width": width, "height": height },
                "overlays": overlays,
                "warnings": page.layout.warnings,
            })
        })
        .collect();

    print_json(&serde_json::Value::Array(pages))
}

fn write_csv(pages: &[PageOverlays]) -> Result<(), i32> {
    println!("page,index,x,y,width,height,family,weight,slant,size,text");

    for page in pages {
        for overlay in &page.layout.items {
            let (family, weight, slant) = font_columns(&overlay.font);
            println!(
                "{},{},{},{},{},{},{},{},{},{:.2},{}",
                page.idx + 1,
                overlay.index,
                overlay.rect.x,
                overlay.rect.y,
                overlay.rect.width,
                overlay.rect.height,
                csv_escape(family),
                weight,
                slant,
                overlay.point_size,
                csv_escape(&overlay.text),
            );
        }
    }
    Ok(())
}
