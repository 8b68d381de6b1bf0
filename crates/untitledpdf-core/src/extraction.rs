//! Best-effort extraction results.

use crate::error::{ExtractWarning, ExtractWarningCode};
use crate::text::TextEntry;
use crate::text_state::TextState;

/// Items collected from one page's content stream.
///
/// The walkers never fail outright. If the stream cannot be read to the end
/// they stop, keep what they already collected, set `terminated_early` and
/// record why in `diagnostic`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Extraction<T> {
    /// Items in content stream order.
    pub items: Vec<T>,
    /// True if reading stopped before the end of the stream.
    pub terminated_early: bool,
    /// Description of what stopped reading, when `terminated_early` is set.
    pub diagnostic: Option<String>,
    /// Non-fatal issues seen along the way.
    pub warnings: Vec<ExtractWarning>,
}

/// One snapshot per text-showing operator.
pub type TextStateExtraction = Extraction<TextState>;

/// One positioned string per text-showing operator.
pub type TextEntryExtraction = Extraction<TextEntry>;

impl<T> Default for Extraction<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            terminated_early: false,
            diagnostic: None,
            warnings: Vec::new(),
        }
    }
}

impl<T> Extraction<T> {
    /// Mark the extraction as stopped early.
    ///
    /// Also records a [`ExtractWarningCode::StreamTruncated`] warning.
    pub fn terminate(&mut self, diagnostic: impl Into<String>) {
        let diagnostic = diagnostic.into();
        self.warnings.push(ExtractWarning::with_code(
            ExtractWarningCode::StreamTruncated,
            diagnostic.clone(),
        ));
        self.terminated_early = true;
        self.diagnostic = Some(diagnostic);
    }

    /// True if the whole stream was read.
    pub fn is_complete(&self) -> bool {
        !self.terminated_early
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Discard the bookkeeping and keep the items.
    pub fn into_items(self) -> Vec<T> {
        self.items
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_complete_and_empty() {
        let ex: Extraction<u32> = Extraction::default();
        assert!(ex.is_complete());
        assert!(ex.is_empty());
        assert_eq!(ex.diagnostic, None);
    }

    #[test]
    fn terminate_records_diagnostic_and_warning() {
        let mut ex: Extraction<u32> = Extraction::default();
        ex.items.push(7);
        ex.terminate("unterminated string");
        assert!(!ex.is_complete());
        assert_eq!(ex.diagnostic.as_deref(), Some("unterminated string"));
        assert_eq!(ex.warnings.len(), 1);
        assert_eq!(ex.warnings[0].code, ExtractWarningCode::StreamTruncated);
        assert_eq!(ex.into_items(), vec![7]);
    }
}
