//! Layout of editable text boxes over a rendered page.
//!
//! Pairs the text entries of a page with the text states extracted from the
//! same content stream, index by index, and places one box per pair on a
//! top-left-origin pixel canvas.

use crate::error::{ExtractWarning, ExtractWarningCode};
use crate::extraction::Extraction;
use crate::font::FontMetrics;
use crate::font_mapping::FontDescription;
use crate::geometry::{PageFrame, PixelRect};
use crate::text::TextEntry;
use crate::text_state::TextState;

/// Extra horizontal room given to each box, in pixels.
pub const HORIZONTAL_MARGIN: i32 = 15;

/// Extra vertical room given to each box, in pixels.
pub const VERTICAL_MARGIN: i32 = 12;

/// Point size used when no font-selection operator preceded the text.
pub const DEFAULT_POINT_SIZE: f64 = 12.0;

/// An editable text box placed over the page.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TextOverlay {
    /// Position of the entry/state pair this box was built from.
    pub index: usize,
    pub text: String,
    /// Box on the canvas, margins included.
    pub rect: PixelRect,
    pub font: FontDescription,
    pub point_size: f64,
    /// Baseline origin of the text in user space, for writing edits back.
    pub origin: (f64, f64),
}

/// Overlays for one page plus any pairing warnings.
pub type OverlayLayout = Extraction<TextOverlay>;

/// Place one box per (entry, state) pair.
///
/// The text's baseline is at `entry.y`, so the box's top edge sits one line
/// height above it. When the two lists differ in length only the common
/// prefix is laid out and a [`ExtractWarningCode::CountMismatch`] warning
/// is recorded.
pub fn layout_overlays(
    entries: &[TextEntry],
    states: &[TextState],
    frame: &PageFrame,
) -> OverlayLayout {
    let mut layout = OverlayLayout::default();

    if entries.len() != states.len() {
        layout.warnings.push(ExtractWarning::with_code(
            ExtractWarningCode::CountMismatch,
            format!(
                "{} text entries but {} text states; pairing the first {}",
                entries.len(),
                states.len(),
                entries.len().min(states.len())
            ),
        ));
    }

    let fallback_metrics = FontMetrics::default();
    for (index, (entry, state)) in entries.iter().zip(states).enumerate() {
        let point_size = if state.has_font_size() {
            state.font_size
        } else {
            DEFAULT_POINT_SIZE
        };
        let metrics = state
            .font
            .as_deref()
            .map(|f| &f.metrics)
            .unwrap_or(&fallback_metrics);

        let width = frame.pt_to_px_x(entry.length.abs());
        let height = frame.pt_to_px_y(metrics.line_spacing(point_size).abs());
        let (x, baseline) = frame.to_canvas(entry.x, entry.y);

        layout.items.push(TextOverlay {
            index,
            text: entry.text.clone(),
            rect: PixelRect::new(
                x,
                baseline - height,
                width + HORIZONTAL_MARGIN,
                height + VERTICAL_MARGIN,
            ),
            font: state.font_description(),
            point_size,
            origin: (entry.x, entry.y),
        });
    }

    layout
}
