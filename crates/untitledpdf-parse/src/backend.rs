//! Page access trait.
//!
//! Defines [`PageContent`], the seam between the content stream walkers and
//! whatever parsed the document. [`LopdfPage`](crate::LopdfPage) reads
//! pages of a lopdf document; [`MemoryPage`] wraps content bytes already in
//! memory.

use std::collections::HashMap;
use std::sync::Arc;

use untitledpdf_core::FontResource;

use crate::error::BackendError;
use crate::operator::ContentRecord;
use crate::tokenizer::ContentReader;

/// Records read from one page's content stream, in order.
///
/// The iterator yields `Err` at most once, as its final item.
pub type RecordStream<'a> = Box<dyn Iterator<Item = Result<ContentRecord, BackendError>> + 'a>;

/// A page whose content stream can be walked.
///
/// # Usage
///
/// ```ignore
/// let page = doc.page(0)?;
/// let records = page.records()?;
/// let font = page.font("F1");
/// ```
pub trait PageContent {
    /// Open the page's content stream for reading.
    ///
    /// # Errors
    ///
    /// Returns an error if the content stream cannot be located or decoded.
    fn records(&self) -> Result<RecordStream<'_>, BackendError>;

    /// Resolve a font resource name (e.g. `F1`) from the page's resources.
    ///
    /// Returns `None` if the page has no font under that name.
    fn font(&self, name: &str) -> Option<Arc<FontResource>>;
}

impl<P: PageContent + ?Sized> PageContent for &P {
    fn records(&self) -> Result<RecordStream<'_>, BackendError> {
        (**self).records()
    }

    fn font(&self, name: &str) -> Option<Arc<FontResource>> {
        (**self).font(name)
    }
}

/// A page held in memory: decoded content bytes plus its fonts.
///
/// Useful for walking content streams that did not come from a parsed
/// document, such as edited or generated streams.
#[derive(Debug, Clone, Default)]
pub struct MemoryPage {
    content: Vec<u8>,
    fonts: HashMap<String, Arc<FontResource>>,
}

impl MemoryPage {
    pub fn new(content: impl Into<Vec<u8>>) -> Self {
        Self {
            content: content.into(),
            fonts: HashMap::new(),
        }
    }

    /// Register `font` under its resource name.
    pub fn with_font(mut self, font: FontResource) -> Self {
        self.fonts
            .insert(font.resource_name.clone(), Arc::new(font));
        self
    }

    pub fn content(&self) -> &[u8] {
        &self.content
    }
}

impl PageContent for MemoryPage {
    fn records(&self) -> Result<RecordStream<'_>, BackendError> {
        Ok(Box::new(ContentReader::new(&self.content)))
    }

    fn font(&self, name: &str) -> Option<Arc<FontResource>> {
        self.fonts.get(name).cloned()
    }
}
