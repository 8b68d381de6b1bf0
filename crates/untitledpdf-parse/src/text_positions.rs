//! Text-position extraction.
//!
//! Tracks the PDF text model (text and line matrices, leading, spacing,
//! horizontal scaling, rise) and the CTM with its `q`/`Q` stack, and emits
//! one [`TextEntry`] per text-showing operator. Which operators emit is
//! decided by the same [`ShowVariants`] policy as text-state extraction, so
//! for the same page and options the two lists line up index by index.

use std::sync::Arc;

use encoding_rs::WINDOWS_1252;
use tracing::{debug, trace, warn};
use untitledpdf_core::{
    ExtractOptions, FontMetrics, FontResource, Matrix, TextEntry, TextEntryExtraction,
};

use crate::backend::PageContent;
use crate::error::BackendError;
use crate::extractor::{accept, emits};
use crate::operator::{ContentRecord, Operand, PdfOperator};

/// Kerning adjustments at least this large (in em) read as a word break.
const WORD_GAP_EM: f64 = 0.2;

/// Text state parameters saved and restored by `q`/`Q`.
#[derive(Debug, Clone)]
struct TextParams {
    font: Option<Arc<FontResource>>,
    font_size: f64,
    char_spacing: f64,
    word_spacing: f64,
    /// Horizontal scaling as a fraction (1.0 = 100%).
    h_scaling: f64,
    leading: f64,
    rise: f64,
}

impl Default for TextParams {
    fn default() -> Self {
        Self {
            font: None,
            font_size: 0.0,
            char_spacing: 0.0,
            word_spacing: 0.0,
            h_scaling: 1.0,
            leading: 0.0,
            rise: 0.0,
        }
    }
}

/// Position state threaded through one walk.
#[derive(Debug, Default)]
struct Cursor {
    params: TextParams,
    ctm: Matrix,
    text_matrix: Matrix,
    line_matrix: Matrix,
    saved: Vec<(Matrix, TextParams)>,
}

impl Cursor {
    fn begin_text(&mut self) {
        self.text_matrix = Matrix::identity();
        self.line_matrix = Matrix::identity();
    }

    fn set_text_matrix(&mut self, m: Matrix) {
        self.text_matrix = m;
        self.line_matrix = m;
    }

    /// `Td`: offset from the start of the current line.
    fn move_text_position(&mut self, tx: f64, ty: f64) {
        self.line_matrix = Matrix::translation(tx, ty).concat(&self.line_matrix);
        self.text_matrix = self.line_matrix;
    }

    /// `T*`: equivalent to `0 -TL Td`.
    fn next_line(&mut self) {
        let leading = self.params.leading;
        self.move_text_position(0.0, -leading);
    }

    fn save(&mut self) {
        self.saved.push((self.ctm, self.params.clone()));
    }

    fn restore(&mut self, index: usize) {
        match self.saved.pop() {
            Some((ctm, params)) => {
                self.ctm = ctm;
                self.params = params;
            }
            None => trace!(operator_index = index, "Q without matching q"),
        }
    }

    /// Show one string run: returns the entry and advances the text matrix.
    ///
    /// `parts` are the strings and kerning adjustments of a `TJ` array, or a
    /// single string for the other show operators.
    fn show(&mut self, parts: &[Operand], fallback: &FontMetrics) -> TextEntry {
        let start_matrix = self.text_matrix.concat(&self.ctm);
        let p = &self.params;
        let metrics = p.font.as_deref().map_or(fallback, |f| &f.metrics);

        let mut advance = 0.0;
        let mut text = String::new();
        for part in parts {
            if let Some(bytes) = part.as_bytes() {
                for &b in bytes {
                    let mut w = metrics.get_width(b as u32) / 1000.0 * p.font_size + p.char_spacing;
                    if b == b' ' {
                        w += p.word_spacing;
                    }
                    advance += w * p.h_scaling;
                }
                text.push_str(&WINDOWS_1252.decode_without_bom_handling(bytes).0);
            } else if let Some(adjust) = part.as_f64() {
                let em = -adjust / 1000.0;
                advance += em * p.font_size * p.h_scaling;
                if em >= WORD_GAP_EM && !text.is_empty() && !text.ends_with(' ') {
                    text.push(' ');
                }
            }
        }

        let (x0, y0) = start_matrix.transform_point(0.0, p.rise);
        let (x1, y1) = start_matrix.transform_point(advance, p.rise);
        self.text_matrix = Matrix::translation(advance, 0.0).concat(&self.text_matrix);

        TextEntry::new(x0, y0, (x1 - x0).hypot(y1 - y0), text)
    }
}

fn matrix_from(record: &ContentRecord) -> Option<Matrix> {
    Some(Matrix::new(
        record.number(0)?,
        record.number(1)?,
        record.number(2)?,
        record.number(3)?,
        record.number(4)?,
        record.number(5)?,
    ))
}

/// Extract one [`TextEntry`] per emitting text-showing operator on `page`.
pub fn extract_text_entries<P: PageContent + ?Sized>(
    page: &P,
    options: &ExtractOptions,
) -> TextEntryExtraction {
    match page.records() {
        Ok(records) => extract_text_entries_from(records, |name| page.font(name), options),
        Err(e) => {
            warn!(error = %e, "content stream could not be opened");
            let mut out = TextEntryExtraction::default();
            out.terminate(e.to_string());
            out
        }
    }
}

/// Extract text entries from an already opened record sequence.
///
/// Stops at the first `Err` item or at `options.max_operators`, like
/// [`extract_text_states_from`](crate::extract_text_states_from).
pub fn extract_text_entries_from<I, F>(
    records: I,
    mut resolve_font: F,
    options: &ExtractOptions,
) -> TextEntryExtraction
where
    I: IntoIterator<Item = Result<ContentRecord, BackendError>>,
    F: FnMut(&str) -> Option<Arc<FontResource>>,
{
    let mut out = TextEntryExtraction::default();
    let mut cursor = Cursor::default();
    let fallback = FontMetrics::default();

    for (index, record) in records.into_iter().enumerate() {
        if options.max_operators.is_some_and(|max| index >= max) {
            warn!(limit = index, "operator limit reached, stopping");
            out.terminate(format!("operator limit of {index} reached"));
            break;
        }
        let record = match record {
            Ok(record) => record,
            Err(e) => {
                warn!(error = %e, operator_index = index, "content stream read failed");
                out.terminate(e.to_string());
                break;
            }
        };
        if !accept(&record, index, options, &mut out.warnings) {
            continue;
        }

        let ops = record.args();
        let entry = match &record.operator {
            PdfOperator::SaveState => {
                cursor.save();
                None
            }
            PdfOperator::RestoreState => {
                cursor.restore(index);
                None
            }
            PdfOperator::ConcatMatrix => {
                if let Some(m) = matrix_from(&record) {
                    cursor.ctm = m.concat(&cursor.ctm);
                }
                None
            }
            PdfOperator::BeginText => {
                cursor.begin_text();
                None
            }
            PdfOperator::SetFont => {
                if let Some(size) = record.first_number() {
                    cursor.params.font_size = size;
                }
                if let Some(name) = record.first_name() {
                    match resolve_font(name) {
                        Some(font) => cursor.params.font = Some(font),
                        None => debug!(font = name, operator_index = index, "font not found"),
                    }
                }
                None
            }
            PdfOperator::SetCharSpacing => {
                cursor.params.char_spacing = record.number(0).unwrap_or(0.0);
                None
            }
            PdfOperator::SetWordSpacing => {
                cursor.params.word_spacing = record.number(0).unwrap_or(0.0);
                None
            }
            PdfOperator::SetHorizontalScaling => {
                cursor.params.h_scaling = record.number(0).unwrap_or(100.0) / 100.0;
                None
            }
            PdfOperator::SetLeading => {
                cursor.params.leading = record.number(0).unwrap_or(0.0);
                None
            }
            PdfOperator::SetTextRise => {
                cursor.params.rise = record.number(0).unwrap_or(0.0);
                None
            }
            PdfOperator::MoveText | PdfOperator::MoveTextSetLeading => {
                if let (Some(tx), Some(ty)) = (record.number(0), record.number(1)) {
                    if record.operator == PdfOperator::MoveTextSetLeading {
                        cursor.params.leading = -ty;
                    }
                    cursor.move_text_position(tx, ty);
                }
                None
            }
            PdfOperator::SetTextMatrix => {
                if let Some(m) = matrix_from(&record) {
                    cursor.set_text_matrix(m);
                }
                None
            }
            PdfOperator::NextLine => {
                cursor.next_line();
                None
            }
            PdfOperator::ShowText => Some(cursor.show(ops, &fallback)),
            PdfOperator::ShowTextArray => match ops.first() {
                Some(Operand::Array(parts)) => Some(cursor.show(parts, &fallback)),
                _ => Some(cursor.show(&[], &fallback)),
            },
            PdfOperator::NextLineShowText => {
                cursor.next_line();
                Some(cursor.show(ops, &fallback))
            }
            PdfOperator::NextLineShowTextSpaced => {
                cursor.params.word_spacing = record.number(0).unwrap_or(0.0);
                cursor.params.char_spacing = record.number(1).unwrap_or(0.0);
                cursor.next_line();
                Some(cursor.show(ops.get(2..).unwrap_or_default(), &fallback))
            }
            _ => None,
        };

        if let Some(entry) = entry {
            if emits(&record.operator, options.show_variants) {
                out.items.push(entry);
            }
        }
    }

    debug!(
        entries = out.items.len(),
        terminated_early = out.terminated_early,
        "text position extraction finished"
    );
    out
}
