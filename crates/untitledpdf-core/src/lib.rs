//! untitledpdf-core: Backend-independent data types and algorithms.
//!
//! This crate provides the types shared by the content stream walkers and
//! their callers (text state snapshots, font resources, text entries,
//! page geometry) and the pure algorithms built on them: mapping PDF fonts
//! to rendering font descriptions and laying out editable text boxes.
//! It has no PDF parser of its own; see `untitledpdf-parse` for that.

pub mod error;
pub mod extraction;
pub mod font;
pub mod font_mapping;
pub mod geometry;
pub mod overlay;
pub mod text;
pub mod text_state;

pub use error::{ExtractOptions, ExtractWarning, ExtractWarningCode, PdfError, ShowVariants};
pub use extraction::{Extraction, TextEntryExtraction, TextStateExtraction};
pub use font::{FontMetrics, FontResource, base_font_name, strip_subset_prefix};
pub use font_mapping::{FontDescription, Slant, StyleHint, Weight, map_font, standard_font_name};
pub use geometry::{DEFAULT_DPI, Matrix, PageFrame, PdfRect, PixelRect};
pub use overlay::{OverlayLayout, TextOverlay, layout_overlays};
pub use text::TextEntry;
pub use text_state::{TextState, UNSET_FONT_SIZE};
