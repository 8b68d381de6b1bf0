//! untitledpdf-parse: content stream reading and text-state extraction.
//!
//! This crate opens documents via lopdf, tokenizes page content streams
//! into [`ContentRecord`]s and walks them to produce per-show text state
//! snapshots and positioned text entries. Shared data types live in
//! untitledpdf-core, re-exported here as [`untitledpdf_core`].

pub mod backend;
pub mod error;
pub mod extractor;
pub mod font_metrics;
pub mod lopdf_backend;
pub mod operator;
pub mod text_positions;
pub mod tokenizer;

pub use backend::{MemoryPage, PageContent, RecordStream};
pub use error::BackendError;
pub use extractor::{emits, extract_text_states, extract_text_states_from};
pub use font_metrics::{extract_font_metrics, font_resource};
pub use lopdf_backend::{LopdfDocument, LopdfPage};
pub use operator::{ContentKind, ContentRecord, Operand, PdfOperator, RecordWarning};
pub use text_positions::{extract_text_entries, extract_text_entries_from};
pub use tokenizer::{ContentReader, tokenize};
pub use untitledpdf_core;
