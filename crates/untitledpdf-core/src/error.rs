//! Error and warning types for untitledpdf.
//!
//! Provides [`PdfError`] for fatal errors that stop processing,
//! [`ExtractWarning`] for non-fatal issues collected during best-effort
//! extraction, and [`ExtractOptions`] for configuring how the content
//! stream walkers behave.

use std::fmt;

/// Fatal error types for PDF processing.
///
/// These surface from the document-load path (opening files, locating pages,
/// reading page dictionaries). The content stream walkers never return them;
/// they degrade to partial results instead.
#[derive(Debug, Clone, PartialEq)]
pub enum PdfError {
    /// Error parsing PDF structure or syntax.
    ParseError(String),
    /// I/O error reading PDF data.
    IoError(String),
    /// Error during content stream interpretation.
    InterpreterError(String),
    /// A page index outside the document was requested.
    PageOutOfRange {
        /// The requested 0-based page index.
        index: usize,
        /// Number of pages in the document.
        page_count: usize,
    },
    /// The PDF is encrypted and requires a password to open.
    PasswordRequired,
}

impl fmt::Display for PdfError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PdfError::ParseError(msg) => write!(f, "parse error: {msg}"),
            PdfError::IoError(msg) => write!(f, "I/O error: {msg}"),
            PdfError::InterpreterError(msg) => write!(f, "interpreter error: {msg}"),
            PdfError::PageOutOfRange { index, page_count } => write!(
                f,
                "page index {index} out of range (document has {page_count} pages)"
            ),
            PdfError::PasswordRequired => write!(f, "PDF is encrypted and requires a password"),
        }
    }
}

impl std::error::Error for PdfError {}

impl From<std::io::Error> for PdfError {
    fn from(err: std::io::Error) -> Self {
        PdfError::IoError(err.to_string())
    }
}

/// Machine-readable warning code for categorizing extraction issues.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(tag = "type", content = "detail")
)]
pub enum ExtractWarningCode {
    /// A font-selection operator named a font absent from page resources.
    MissingFont,
    /// The reader flagged an operator record as malformed or unrecognized.
    InvalidOperator,
    /// An operator had more operands than it takes; the extra ones were ignored.
    SurplusOperands,
    /// Text states and text entries for the same page differ in length.
    CountMismatch,
    /// The content stream could not be read to the end.
    StreamTruncated,
    /// Any other warning not covered by specific variants.
    Other(String),
}

impl ExtractWarningCode {
    /// Returns the string tag for this warning code.
    pub fn as_str(&self) -> &str {
        match self {
            ExtractWarningCode::MissingFont => "MISSING_FONT",
            ExtractWarningCode::InvalidOperator => "INVALID_OPERATOR",
            ExtractWarningCode::SurplusOperands => "SURPLUS_OPERANDS",
            ExtractWarningCode::CountMismatch => "COUNT_MISMATCH",
            ExtractWarningCode::StreamTruncated => "STREAM_TRUNCATED",
            ExtractWarningCode::Other(_) => "OTHER",
        }
    }
}

impl fmt::Display for ExtractWarningCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A non-fatal warning encountered during extraction.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExtractWarning {
    /// Machine-readable warning code.
    pub code: ExtractWarningCode,
    /// Human-readable description of the warning.
    pub description: String,
    /// Index of the record in the content stream where the warning occurred.
    pub operator_index: Option<usize>,
    /// Font resource name associated with the warning, if applicable.
    pub font_name: Option<String>,
}

impl ExtractWarning {
    /// Create a warning with a specific code and description.
    pub fn with_code(code: ExtractWarningCode, description: impl Into<String>) -> Self {
        Self {
            code,
            description: description.into(),
            operator_index: None,
            font_name: None,
        }
    }

    /// Attach the index of the offending content stream record.
    pub fn at_operator(mut self, operator_index: usize) -> Self {
        self.operator_index = Some(operator_index);
        self
    }

    /// Attach the font resource name the warning is about.
    pub fn for_font(mut self, font_name: impl Into<String>) -> Self {
        self.font_name = Some(font_name.into());
        self
    }
}

impl fmt::Display for ExtractWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.description)?;
        if let Some(ref font_name) = self.font_name {
            write!(f, " [font {font_name}]")?;
        }
        if let Some(index) = self.operator_index {
            write!(f, " [operator #{index}]")?;
        }
        Ok(())
    }
}

/// Which text-showing operators produce an output element.
///
/// `Tj` always does. The array and quote forms (`TJ`, `'`, `"`) paint text
/// too; [`ShowVariants::TjOnly`] leaves them out for callers whose other
/// per-show lists only count `Tj`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ShowVariants {
    /// Every text-showing operator (`Tj`, `TJ`, `'`, `"`) emits.
    #[default]
    All,
    /// Only the single-string `Tj` operator emits.
    TjOnly,
}

/// Options controlling the content stream walkers.
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Which text-showing operators emit an element (default: all of them).
    pub show_variants: ShowVariants,
    /// Whether to collect warnings during extraction (default: true).
    pub collect_warnings: bool,
    /// Maximum number of content stream records to read (default: None = no limit).
    ///
    /// Reaching the limit ends extraction early with a partial result.
    pub max_operators: Option<usize>,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            show_variants: ShowVariants::All,
            collect_warnings: true,
            max_operators: None,
        }
    }
}

impl ExtractOptions {
    /// Options under which only `Tj` emits.
    pub fn tj_only() -> Self {
        Self {
            show_variants: ShowVariants::TjOnly,
            ..Self::default()
        }
    }
}
