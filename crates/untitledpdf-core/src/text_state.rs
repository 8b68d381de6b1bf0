//! Font state snapshots taken at text-showing operators.

use std::sync::Arc;

use crate::font::FontResource;
use crate::font_mapping::{FontDescription, map_font};

/// Font size recorded before any font-selection operator has been seen.
pub const UNSET_FONT_SIZE: f64 = -1.0;

/// The font state in effect when a text-showing operator ran.
///
/// Produced once per text-showing operator by the text-state extractor and
/// never modified afterwards. The font is shared, not borrowed, so a
/// snapshot outlives the document it was read from.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TextState {
    /// Font selected by the most recent `Tf`, if it resolved.
    pub font: Option<Arc<FontResource>>,
    /// Size operand of the most recent `Tf`; [`UNSET_FONT_SIZE`] before any.
    pub font_size: f64,
    /// Horizontal scaling factor (1.0 = 100%).
    pub font_scale: f64,
    pub char_spacing: f64,
    pub word_spacing: f64,
}

impl Default for TextState {
    fn default() -> Self {
        Self {
            font: None,
            font_size: UNSET_FONT_SIZE,
            font_scale: 1.0,
            char_spacing: 0.0,
            word_spacing: 0.0,
        }
    }
}

impl TextState {
    /// Whether a font-selection operator has set the size.
    pub fn has_font_size(&self) -> bool {
        self.font_size != UNSET_FONT_SIZE
    }

    /// Resource name of the selected font (e.g. `F1`).
    pub fn font_resource_name(&self) -> Option<&str> {
        self.font.as_deref().map(|f| f.resource_name.as_str())
    }

    /// Map the selected font to a rendering description.
    ///
    /// Returns the default description when no font is set.
    pub fn font_description(&self) -> FontDescription {
        match self.font.as_deref() {
            Some(font) => map_font(&font.base_name, &font.font_name),
            None => FontDescription::default(),
        }
    }
}
