//! Text-state extraction.
//!
//! Walks a page's content stream once and records, for every text-showing
//! operator, the font state in effect at that point. The only state tracked
//! is the font and size set by `Tf`; positioning, spacing and graphics state
//! operators are recognized and left alone.
//!
//! Extraction is best-effort: it never returns an error. A stream that
//! cannot be read to the end yields the snapshots collected so far, flagged
//! with [`Extraction::terminated_early`](untitledpdf_core::Extraction).

use std::sync::Arc;

use tracing::{debug, trace, warn};
use untitledpdf_core::{
    ExtractOptions, ExtractWarning, ExtractWarningCode, FontResource, ShowVariants, TextState,
    TextStateExtraction,
};

use crate::backend::PageContent;
use crate::error::BackendError;
use crate::operator::{ContentKind, ContentRecord, PdfOperator};

/// Extract one [`TextState`] per text-showing operator on `page`.
///
/// Fonts named by `Tf` are resolved through [`PageContent::font`]. If the
/// content stream cannot be opened at all the result is empty and flagged
/// as terminated early.
pub fn extract_text_states<P: PageContent + ?Sized>(
    page: &P,
    options: &ExtractOptions,
) -> TextStateExtraction {
    match page.records() {
        Ok(records) => extract_text_states_from(records, |name| page.font(name), options),
        Err(e) => {
            warn!(error = %e, "content stream could not be opened");
            let mut out = TextStateExtraction::default();
            out.terminate(e.to_string());
            out
        }
    }
}

/// Extract text states from an already opened record sequence.
///
/// `resolve_font` maps a font resource name to its descriptor. Reading stops
/// at the first `Err` item, or once `options.max_operators` records have
/// been read.
pub fn extract_text_states_from<I, F>(
    records: I,
    mut resolve_font: F,
    options: &ExtractOptions,
) -> TextStateExtraction
where
    I: IntoIterator<Item = Result<ContentRecord, BackendError>>,
    F: FnMut(&str) -> Option<Arc<FontResource>>,
{
    let mut out = TextStateExtraction::default();
    let mut current = TextState::default();

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

        match &record.operator {
            PdfOperator::SetFont => {
                select_font(
                    &mut current,
                    &record,
                    index,
                    &mut resolve_font,
                    options,
                    &mut out.warnings,
                );
            }
            op if emits(op, options.show_variants) => out.items.push(current.clone()),
            // Positioning, spacing and state save/restore do not touch the
            // tracked font state.
            _ => {}
        }
    }

    debug!(
        states = out.items.len(),
        warnings = out.warnings.len(),
        terminated_early = out.terminated_early,
        "text state extraction finished"
    );
    out
}

/// Whether `operator` produces an element under `variants`.
///
/// Shared by every walker that must stay index-aligned with the text states.
pub fn emits(operator: &PdfOperator, variants: ShowVariants) -> bool {
    match variants {
        ShowVariants::All => operator.is_text_show(),
        ShowVariants::TjOnly => *operator == PdfOperator::ShowText,
    }
}

/// Decide whether a record takes part in the walk.
///
/// Inline images and XObject invocations are passed over. Records the
/// reader flagged as unusable are skipped and optionally reported. Records
/// with surplus operands are kept and the surplus is reported.
pub(crate) fn accept(
    record: &ContentRecord,
    index: usize,
    options: &ExtractOptions,
    warnings: &mut Vec<ExtractWarning>,
) -> bool {
    if record.kind != ContentKind::Operator {
        trace!(kind = ?record.kind, operator_index = index, "ignoring non-operator record");
        return false;
    }
    if !record.is_valid() {
        let reasons: Vec<String> = record.warnings.iter().map(ToString::to_string).collect();
        trace!(
            operator = %record.operator,
            operator_index = index,
            reasons = %reasons.join(", "),
            "skipping invalid record"
        );
        if options.collect_warnings {
            warnings.push(
                ExtractWarning::with_code(
                    ExtractWarningCode::InvalidOperator,
                    format!("skipped '{}': {}", record.operator, reasons.join(", ")),
                )
                .at_operator(index),
            );
        }
        return false;
    }
    if let Some(surplus) = record.warnings.iter().find(|w| !w.is_fatal()) {
        trace!(
            operator = %record.operator,
            operator_index = index,
            reason = %surplus,
            "ignoring leading operands"
        );
        if options.collect_warnings {
            warnings.push(
                ExtractWarning::with_code(
                    ExtractWarningCode::SurplusOperands,
                    format!("'{}': {surplus}", record.operator),
                )
                .at_operator(index),
            );
        }
    }
    true
}

fn select_font<F>(
    current: &mut TextState,
    record: &ContentRecord,
    index: usize,
    resolve_font: &mut F,
    options: &ExtractOptions,
    warnings: &mut Vec<ExtractWarning>,
) where
    F: FnMut(&str) -> Option<Arc<FontResource>>,
{
    // Operands are matched by type, so both `/F1 12 Tf` and a size-first
    // ordering work.
    if let Some(size) = record.first_number() {
        current.font_size = size;
    }
    let Some(name) = record.first_name() else {
        trace!(operator_index = index, "Tf without a font name");
        return;
    };
    match resolve_font(name) {
        Some(font) => current.font = Some(font),
        None => {
            debug!(
                font = name,
                operator_index = index,
                "font not found in page resources, keeping previous font"
            );
            if options.collect_warnings {
                warnings.push(
                    ExtractWarning::with_code(
                        ExtractWarningCode::MissingFont,
                        "font not found in page resources",
                    )
                    .at_operator(index)
                    .for_font(name),
                );
            }
        }
    }
}
