//! lopdf-based document backend.
//!
//! Opens documents with the [lopdf](https://crates.io/crates/lopdf) crate
//! and exposes each page as a [`LopdfPage`] implementing [`PageContent`].

use std::cell::OnceCell;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use lopdf::{Dictionary, Document, Object, ObjectId};
use tracing::{debug, trace};
use untitledpdf_core::{FontResource, PdfError, PdfRect};

use crate::backend::{PageContent, RecordStream};
use crate::error::BackendError;
use crate::font_metrics::{font_resource, number, resolve};
use crate::tokenizer::ContentReader;

/// A parsed PDF document backed by lopdf.
pub struct LopdfDocument {
    inner: Document,
    /// Page object IDs in page order.
    page_ids: Vec<ObjectId>,
}

impl std::fmt::Debug for LopdfDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LopdfDocument")
            .field("page_count", &self.page_ids.len())
            .finish_non_exhaustive()
    }
}

impl LopdfDocument {
    /// Parse a document from memory.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::Parse`] if the bytes are not a readable PDF,
    /// and [`PdfError::PasswordRequired`] for encrypted documents.
    pub fn open(bytes: &[u8]) -> Result<Self, BackendError> {
        let inner = Document::load_mem(bytes)
            .map_err(|e| BackendError::Parse(format!("failed to parse PDF: {e}")))?;
        Self::from_document(inner)
    }

    /// Read and parse a document from disk.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::Io`] if the file cannot be read, otherwise as
    /// [`LopdfDocument::open`].
    pub fn open_file(path: impl AsRef<Path>) -> Result<Self, BackendError> {
        let bytes = std::fs::read(path)?;
        Self::open(&bytes)
    }

    /// Wrap an already loaded lopdf document.
    ///
    /// # Errors
    ///
    /// Returns [`PdfError::PasswordRequired`] for encrypted documents.
    pub fn from_document(inner: Document) -> Result<Self, BackendError> {
        if inner.is_encrypted() {
            return Err(BackendError::Core(PdfError::PasswordRequired));
        }
        // get_pages is keyed by 1-based page number, so values are in order
        let page_ids: Vec<ObjectId> = inner.get_pages().values().copied().collect();
        debug!(pages = page_ids.len(), "document opened");
        Ok(Self { inner, page_ids })
    }

    /// Access the underlying lopdf document.
    pub fn inner(&self) -> &Document {
        &self.inner
    }

    pub fn page_count(&self) -> usize {
        self.page_ids.len()
    }

    /// Access a page by 0-based index.
    ///
    /// Fonts in the page's resources are resolved here, once per page.
    ///
    /// # Errors
    ///
    /// Returns [`PdfError::PageOutOfRange`] if `index` is past the last page.
    pub fn page(&self, index: usize) -> Result<LopdfPage<'_>, BackendError> {
        let object_id = *self
            .page_ids
            .get(index)
            .ok_or(PdfError::PageOutOfRange {
                index,
                page_count: self.page_ids.len(),
            })?;
        let fonts = load_page_fonts(&self.inner, object_id);
        trace!(page = index, fonts = fonts.len(), "page fonts loaded");
        Ok(LopdfPage {
            doc: &self.inner,
            object_id,
            index,
            fonts,
            content: OnceCell::new(),
        })
    }

    /// All pages in order.
    pub fn pages(&self) -> impl Iterator<Item = Result<LopdfPage<'_>, BackendError>> + '_ {
        (0..self.page_count()).map(|i| self.page(i))
    }
}

/// A single page of a [`LopdfDocument`].
pub struct LopdfPage<'a> {
    doc: &'a Document,
    object_id: ObjectId,
    index: usize,
    fonts: HashMap<String, Arc<FontResource>>,
    /// Decoded content stream, read on first use.
    content: OnceCell<Vec<u8>>,
}

impl std::fmt::Debug for LopdfPage<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LopdfPage")
            .field("object_id", &self.object_id)
            .field("index", &self.index)
            .field("fonts", &self.fonts.len())
            .finish_non_exhaustive()
    }
}

impl LopdfPage<'_> {
    /// 0-based page index.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn object_id(&self) -> ObjectId {
        self.object_id
    }

    /// Resource names of the fonts on this page, sorted.
    pub fn font_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.fonts.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Decoded content stream bytes; multiple streams are joined with a space.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::Parse`] if `/Contents` is malformed or a
    /// stream cannot be decompressed.
    pub fn content(&self) -> Result<&[u8], BackendError> {
        if let Some(bytes) = self.content.get() {
            return Ok(bytes);
        }
        let bytes = page_content_bytes(self.doc, page_dict(self.doc, self.object_id)?)?;
        Ok(self.content.get_or_init(|| bytes))
    }

    /// The page's MediaBox, inherited from the page tree if needed.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::Parse`] if no MediaBox is found or it is not
    /// four numbers.
    pub fn media_box(&self) -> Result<PdfRect, BackendError> {
        self.page_box(b"MediaBox")?
            .ok_or_else(|| BackendError::Parse("MediaBox not found on page or ancestors".into()))
    }

    /// The page's TrimBox, falling back to the MediaBox.
    ///
    /// # Errors
    ///
    /// As [`LopdfPage::media_box`], or if a TrimBox is present but malformed.
    pub fn trim_box(&self) -> Result<PdfRect, BackendError> {
        match self.page_box(b"TrimBox")? {
            Some(rect) => Ok(rect),
            None => self.media_box(),
        }
    }

    fn page_box(&self, key: &[u8]) -> Result<Option<PdfRect>, BackendError> {
        let Some(obj) = resolve_inherited(self.doc, self.object_id, key)? else {
            return Ok(None);
        };
        let name = String::from_utf8_lossy(key);
        let array = resolve(self.doc, obj)
            .as_array()
            .map_err(|e| BackendError::Parse(format!("{name} is not an array: {e}")))?;
        let values: Vec<f64> = array.iter().filter_map(|o| number(self.doc, o)).collect();
        match values[..] {
            [x0, y0, x1, y1] if array.len() == 4 => Ok(Some(PdfRect::from_corners(x0, y0, x1, y1))),
            _ => Err(BackendError::Parse(format!(
                "{name} must be 4 numbers, got {array:?}"
            ))),
        }
    }
}

impl PageContent for LopdfPage<'_> {
    fn records(&self) -> Result<RecordStream<'_>, BackendError> {
        Ok(Box::new(ContentReader::new(self.content()?)))
    }

    fn font(&self, name: &str) -> Option<Arc<FontResource>> {
        self.fonts.get(name).cloned()
    }
}

fn page_dict(doc: &Document, page_id: ObjectId) -> Result<&Dictionary, BackendError> {
    doc.get_object(page_id)
        .and_then(Object::as_dict)
        .map_err(|e| BackendError::Parse(format!("failed to get page dictionary: {e}")))
}

/// Look up a key in the page dictionary, walking up the page tree via
/// /Parent if the page itself lacks it.
fn resolve_inherited<'a>(
    doc: &'a Document,
    page_id: ObjectId,
    key: &[u8],
) -> Result<Option<&'a Object>, BackendError> {
    let mut current_id = page_id;
    // Bounded so a cyclic /Parent chain cannot loop forever.
    for _ in 0..64 {
        let dict = page_dict(doc, current_id)?;
        if let Ok(value) = dict.get(key) {
            return Ok(Some(value));
        }
        match dict.get(b"Parent") {
            Ok(parent) => {
                current_id = parent
                    .as_reference()
                    .map_err(|e| BackendError::Parse(format!("invalid /Parent reference: {e}")))?;
            }
            Err(_) => return Ok(None),
        }
    }
    Err(BackendError::Parse("page tree too deep".into()))
}

/// Resolve every entry of `/Resources /Font` on the page.
///
/// Unreadable resources leave the map empty; unreadable entries are
/// skipped. Either way `Tf` lookups for them fail and are reported there.
fn load_page_fonts(doc: &Document, page_id: ObjectId) -> HashMap<String, Arc<FontResource>> {
    let mut fonts = HashMap::new();
    let resources = match resolve_inherited(doc, page_id, b"Resources") {
        Ok(Some(obj)) => resolve(doc, obj).as_dict().ok(),
        Ok(None) => None,
        Err(e) => {
            debug!(error = %e, "page resources unreadable");
            None
        }
    };
    let font_dict = resources
        .and_then(|r| r.get(b"Font").ok())
        .and_then(|o| resolve(doc, o).as_dict().ok());
    let Some(font_dict) = font_dict else {
        return fonts;
    };

    for (key, value) in font_dict.iter() {
        let name = String::from_utf8_lossy(key).into_owned();
        match resolve(doc, value).as_dict() {
            Ok(dict) => {
                let font = font_resource(doc, &name, dict);
                fonts.insert(name, Arc::new(font));
            }
            Err(_) => debug!(font = %name, "font resource is not a dictionary"),
        }
    }
    fonts
}

/// Concatenated, decoded bytes of the page's `/Contents`.
fn page_content_bytes(doc: &Document, page: &Dictionary) -> Result<Vec<u8>, BackendError> {
    let Ok(contents) = page.get(b"Contents") else {
        return Ok(Vec::new());
    };

    match resolve(doc, contents) {
        Object::Stream(stream) => decode_content_stream(stream),
        Object::Array(items) => {
            let mut content = Vec::new();
            for item in items {
                let stream = resolve(doc, item).as_stream().map_err(|e| {
                    BackendError::Parse(format!("/Contents array item is not a stream: {e}"))
                })?;
                let bytes = decode_content_stream(stream)?;
                if !content.is_empty() {
                    content.push(b' ');
                }
                content.extend_from_slice(&bytes);
            }
            Ok(content)
        }
        _ => Err(BackendError::Parse(
            "/Contents is not a stream or array".to_string(),
        )),
    }
}

fn decode_content_stream(stream: &lopdf::Stream) -> Result<Vec<u8>, BackendError> {
    if stream.dict.get(b"Filter").is_ok() {
        stream
            .decompressed_content()
            .map_err(|e| BackendError::Parse(format!("failed to decompress content stream: {e}")))
    } else {
        Ok(stream.content.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::extract_text_states;
    use crate::text_positions::extract_text_entries;
    use lopdf::{Stream, dictionary};
    use untitledpdf_core::ExtractOptions;

    /// One-page document; each `(name, base_font)` becomes a Type1 font.
    fn pdf(contents: &[&[u8]], fonts: &[(&str, &str)], page_extra: Dictionary) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let mut font_dict = Dictionary::new();
        for (name, base) in fonts {
            let id = doc.add_object(dictionary! {
                "Type" => "Font",
                "Subtype" => "Type1",
                "BaseFont" => *base,
            });
            font_dict.set(*name, id);
        }

        let content_ids: Vec<Object> = contents
            .iter()
            .map(|c| doc.add_object(Stream::new(dictionary! {}, c.to_vec())).into())
            .collect();
        let contents_obj = match content_ids.as_slice() {
            [single] => single.clone(),
            _ => Object::Array(content_ids),
        };

        let mut page = dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => contents_obj,
            "Resources" => dictionary! { "Font" => font_dict },
        };
        for (k, v) in page_extra.iter() {
            page.set(k.clone(), v.clone());
        }
        let page_id = doc.add_object(page);

        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![Object::from(page_id)],
                "Count" => 1,
                "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut buf = Vec::new();
        doc.save_to(&mut buf).unwrap();
        buf
    }

    fn simple(content: &[u8]) -> Vec<u8> {
        pdf(
            &[content],
            &[("F1", "Helvetica-Bold"), ("F2", "BAAAAA+ArialMT")],
            Dictionary::new(),
        )
    }

    #[test]
    fn open_and_count_pages() {
        let doc = LopdfDocument::open(&simple(b"BT ET")).unwrap();
        assert_eq!(doc.page_count(), 1);
        assert_eq!(doc.page(0).unwrap().index(), 0);
    }

    #[test]
    fn garbage_is_a_parse_error() {
        let err = LopdfDocument::open(b"not a pdf").unwrap_err();
        assert!(matches!(err, BackendError::Parse(_)));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = LopdfDocument::open_file("/nonexistent/file.pdf").unwrap_err();
        assert!(matches!(err, BackendError::Io(_)));
    }

    #[test]
    fn page_out_of_range() {
        let doc = LopdfDocument::open(&simple(b"")).unwrap();
        let err = doc.page(1).unwrap_err();
        let pdf_err: PdfError = err.into();
        assert_eq!(
            pdf_err,
            PdfError::PageOutOfRange {
                index: 1,
                page_count: 1
            }
        );
    }

    #[test]
    fn fonts_resolve_from_resources() {
        let doc = LopdfDocument::open(&simple(b"")).unwrap();
        let page = doc.page(0).unwrap();
        assert_eq!(page.font_names(), vec!["F1", "F2"]);

        let f1 = page.font("F1").unwrap();
        assert_eq!(f1.base_name, "Helvetica");
        assert_eq!(f1.font_name, "Helvetica-Bold");
        let f2 = page.font("F2").unwrap();
        assert_eq!(f2.base_name, "ArialMT");
        assert_eq!(f2.font_name, "BAAAAA+ArialMT");
        assert!(page.font("F3").is_none());
    }

    #[test]
    fn media_box_is_inherited_and_trim_falls_back() {
        let doc = LopdfDocument::open(&simple(b"")).unwrap();
        let page = doc.page(0).unwrap();
        assert_eq!(page.media_box().unwrap(), PdfRect::new(0.0, 0.0, 612.0, 792.0));
        assert_eq!(page.trim_box().unwrap(), PdfRect::new(0.0, 0.0, 612.0, 792.0));
    }

    #[test]
    fn explicit_trim_box() {
        let extra = dictionary! {
            "TrimBox" => vec![Object::Real(36.0), Object::Real(36.0), Object::Real(576.0), Object::Real(756.0)],
        };
        let bytes = pdf(&[b""], &[], extra);
        let doc = LopdfDocument::open(&bytes).unwrap();
        assert_eq!(
            doc.page(0).unwrap().trim_box().unwrap(),
            PdfRect::new(36.0, 36.0, 576.0, 756.0)
        );
    }

    #[test]
    fn malformed_box_is_an_error() {
        let extra = dictionary! { "TrimBox" => vec![0.into(), 0.into()] };
        let doc = LopdfDocument::open(&pdf(&[b""], &[], extra)).unwrap();
        assert!(doc.page(0).unwrap().trim_box().is_err());
    }

    #[test]
    fn content_arrays_are_joined() {
        let bytes = pdf(
            &[b"BT /F1 12 Tf", b"(a) Tj ET"],
            &[("F1", "Courier")],
            Dictionary::new(),
        );
        let doc = LopdfDocument::open(&bytes).unwrap();
        let page = doc.page(0).unwrap();
        assert_eq!(page.content().unwrap(), b"BT /F1 12 Tf (a) Tj ET");
        let states = extract_text_states(&page, &ExtractOptions::default());
        assert_eq!(states.items.len(), 1);
        assert_eq!(states.items[0].font_resource_name(), Some("F1"));
    }

    #[test]
    fn states_and_entries_from_a_document() {
        let doc = LopdfDocument::open(&simple(
            b"BT /F1 12 Tf 72 700 Td (Hello) Tj /F2 24 Tf 0 -30 Td (World) Tj ET",
        ))
        .unwrap();
        let page = doc.page(0).unwrap();
        let options = ExtractOptions::default();

        let states = extract_text_states(&page, &options);
        assert!(states.is_complete());
        assert_eq!(states.items.len(), 2);
        assert_eq!(states.items[0].font_size, 12.0);
        assert_eq!(
            states.items[0].font.as_deref().map(|f| f.font_name.as_str()),
            Some("Helvetica-Bold")
        );
        assert_eq!(states.items[1].font_size, 24.0);
        assert_eq!(
            states.items[1].font.as_deref().map(|f| f.base_name.as_str()),
            Some("ArialMT")
        );

        let entries = extract_text_entries(&page, &options);
        assert_eq!(entries.items.len(), 2);
        assert_eq!(entries.items[0].x, 72.0);
        assert_eq!(entries.items[0].y, 700.0);
        assert_eq!(entries.items[1].y, 670.0);
        assert_eq!(entries.items[1].text, "World");
    }

    #[test]
    fn states_outlive_the_document() {
        let states = {
            let doc = LopdfDocument::open(&simple(b"BT /F2 9 Tf (x) Tj ET")).unwrap();
            let page = doc.page(0).unwrap();
            extract_text_states(&page, &ExtractOptions::default())
        };
        let font = states.items[0].font.as_deref().unwrap();
        assert_eq!(font.base_name, "ArialMT");
    }

    #[test]
    fn page_without_contents_is_empty() {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), 100.into(), 100.into()],
        });
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![Object::from(page_id)],
                "Count" => 1,
            }),
        );
        let catalog_id = doc.add_object(dictionary! { "Type" => "Catalog", "Pages" => pages_id });
        doc.trailer.set("Root", catalog_id);

        let doc = LopdfDocument::from_document(doc).unwrap();
        let page = doc.page(0).unwrap();
        assert!(page.content().unwrap().is_empty());
        assert!(page.font_names().is_empty());
        let states = extract_text_states(&page, &ExtractOptions::default());
        assert!(states.items.is_empty());
        assert!(states.is_complete());
    }
}
