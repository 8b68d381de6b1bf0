//! Typed content stream records.
//!
//! The [`ContentReader`](crate::tokenizer::ContentReader) turns raw bytes into
//! [`ContentRecord`]s: one operator with the operands that preceded it,
//! classified by [`ContentKind`] and checked against the operator's fixed
//! operand count.

use std::fmt;

/// A PDF content stream operand value.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    /// Integer number (e.g., `42`, `-7`).
    Integer(i64),
    /// Real (floating-point) number (e.g., `3.14`, `.5`).
    Real(f64),
    /// Name object (e.g., `/F1`). Stored without the leading `/`.
    Name(String),
    /// Literal string delimited by parentheses, stored as raw bytes.
    LiteralString(Vec<u8>),
    /// Hexadecimal string delimited by angle brackets, stored as decoded bytes.
    HexString(Vec<u8>),
    /// Array of operands (e.g., `[(A) -120 (B)]`).
    Array(Vec<Operand>),
    Boolean(bool),
    Null,
    /// Dictionary object (`<< /Key value ... >>`).
    Dictionary(Vec<(String, Operand)>),
}

impl Operand {
    /// Numeric value of an integer or real operand.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Operand::Integer(i) => Some(*i as f64),
            Operand::Real(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_name(&self) -> Option<&str> {
        match self {
            Operand::Name(n) => Some(n),
            _ => None,
        }
    }

    /// Raw bytes of a literal or hex string operand.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Operand::LiteralString(b) | Operand::HexString(b) => Some(b),
            _ => None,
        }
    }
}

/// Every operator defined for PDF content streams.
///
/// Keywords the reader does not recognize are kept as [`PdfOperator::Unknown`]
/// so callers can log them; the record carrying one is flagged invalid.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PdfOperator {
    // General graphics state
    SetLineWidth,
    SetLineCap,
    SetLineJoin,
    SetMiterLimit,
    SetDashPattern,
    SetRenderingIntent,
    SetFlatness,
    SetExtGState,
    SaveState,
    RestoreState,
    ConcatMatrix,

    // Path construction
    MoveTo,
    LineTo,
    CurveTo,
    CurveToV,
    CurveToY,
    ClosePath,
    Rectangle,

    // Path painting
    Stroke,
    CloseStroke,
    Fill,
    FillObsolete,
    FillEvenOdd,
    FillStroke,
    FillStrokeEvenOdd,
    CloseFillStroke,
    CloseFillStrokeEvenOdd,
    EndPath,

    // Clipping
    Clip,
    ClipEvenOdd,

    // Text objects
    BeginText,
    EndText,

    // Text state
    SetCharSpacing,
    SetWordSpacing,
    SetHorizontalScaling,
    SetLeading,
    SetFont,
    SetRenderMode,
    SetTextRise,

    // Text positioning
    MoveText,
    MoveTextSetLeading,
    SetTextMatrix,
    NextLine,

    // Text showing
    ShowText,
    ShowTextArray,
    NextLineShowText,
    NextLineShowTextSpaced,

    // Type 3 fonts
    SetGlyphWidth,
    SetGlyphWidthAndBox,

    // Color
    SetStrokeColorSpace,
    SetFillColorSpace,
    SetStrokeColor,
    SetStrokeColorN,
    SetFillColor,
    SetFillColorN,
    SetStrokeGray,
    SetFillGray,
    SetStrokeRgb,
    SetFillRgb,
    SetStrokeCmyk,
    SetFillCmyk,

    // Shading
    PaintShading,

    // Inline images
    BeginInlineImage,
    InlineImageData,
    EndInlineImage,

    // XObjects
    PaintXObject,

    // Marked content
    MarkPoint,
    MarkPointWithProperties,
    BeginMarkedContent,
    BeginMarkedContentWithProperties,
    EndMarkedContent,

    // Compatibility
    BeginCompatibility,
    EndCompatibility,

    /// A keyword not defined by PDF.
    Unknown(String),
}

impl PdfOperator {
    /// Look up the operator for a content stream keyword.
    pub fn from_keyword(keyword: &str) -> Self {
        use PdfOperator::*;
        match keyword {
            "w" => SetLineWidth,
            "J" => SetLineCap,
            "j" => SetLineJoin,
            "M" => SetMiterLimit,
            "d" => SetDashPattern,
            "ri" => SetRenderingIntent,
            "i" => SetFlatness,
            "gs" => SetExtGState,
            "q" => SaveState,
            "Q" => RestoreState,
            "cm" => ConcatMatrix,
            "m" => MoveTo,
            "l" => LineTo,
            "c" => CurveTo,
            "v" => CurveToV,
            "y" => CurveToY,
            "h" => ClosePath,
            "re" => Rectangle,
            "S" => Stroke,
            "s" => CloseStroke,
            "f" => Fill,
            "F" => FillObsolete,
            "f*" => FillEvenOdd,
            "B" => FillStroke,
            "B*" => FillStrokeEvenOdd,
            "b" => CloseFillStroke,
            "b*" => CloseFillStrokeEvenOdd,
            "n" => EndPath,
            "W" => Clip,
            "W*" => ClipEvenOdd,
            "BT" => BeginText,
            "ET" => EndText,
            "Tc" => SetCharSpacing,
            "Tw" => SetWordSpacing,
            "Tz" => SetHorizontalScaling,
            "TL" => SetLeading,
            "Tf" => SetFont,
            "Tr" => SetRenderMode,
            "Ts" => SetTextRise,
            "Td" => MoveText,
            "TD" => MoveTextSetLeading,
            "Tm" => SetTextMatrix,
            "T*" => NextLine,
            "Tj" => ShowText,
            "TJ" => ShowTextArray,
            "'" => NextLineShowText,
            "\"" => NextLineShowTextSpaced,
            "d0" => SetGlyphWidth,
            "d1" => SetGlyphWidthAndBox,
            "CS" => SetStrokeColorSpace,
            "cs" => SetFillColorSpace,
            "SC" => SetStrokeColor,
            "SCN" => SetStrokeColorN,
            "sc" => SetFillColor,
            "scn" => SetFillColorN,
            "G" => SetStrokeGray,
            "g" => SetFillGray,
            "RG" => SetStrokeRgb,
            "rg" => SetFillRgb,
            "K" => SetStrokeCmyk,
            "k" => SetFillCmyk,
            "sh" => PaintShading,
            "BI" => BeginInlineImage,
            "ID" => InlineImageData,
            "EI" => EndInlineImage,
            "Do" => PaintXObject,
            "MP" => MarkPoint,
            "DP" => MarkPointWithProperties,
            "BMC" => BeginMarkedContent,
            "BDC" => BeginMarkedContentWithProperties,
            "EMC" => EndMarkedContent,
            "BX" => BeginCompatibility,
            "EX" => EndCompatibility,
            other => Unknown(other.to_string()),
        }
    }

    /// The keyword this operator is written as in a content stream.
    pub fn keyword(&self) -> &str {
        use PdfOperator::*;
        match self {
            SetLineWidth => "w",
            SetLineCap => "J",
            SetLineJoin => "j",
            SetMiterLimit => "M",
            SetDashPattern => "d",
            SetRenderingIntent => "ri",
            SetFlatness => "i",
            SetExtGState => "gs",
            SaveState => "q",
            RestoreState => "Q",
            ConcatMatrix => "cm",
            MoveTo => "m",
            LineTo => "l",
            CurveTo => "c",
            CurveToV => "v",
            CurveToY => "y",
            ClosePath => "h",
            Rectangle => "re",
            Stroke => "S",
            CloseStroke => "s",
            Fill => "f",
            FillObsolete => "F",
            FillEvenOdd => "f*",
            FillStroke => "B",
            FillStrokeEvenOdd => "B*",
            CloseFillStroke => "b",
            CloseFillStrokeEvenOdd => "b*",
            EndPath => "n",
            Clip => "W",
            ClipEvenOdd => "W*",
            BeginText => "BT",
            EndText => "ET",
            SetCharSpacing => "Tc",
            SetWordSpacing => "Tw",
            SetHorizontalScaling => "Tz",
            SetLeading => "TL",
            SetFont => "Tf",
            SetRenderMode => "Tr",
            SetTextRise => "Ts",
            MoveText => "Td",
            MoveTextSetLeading => "TD",
            SetTextMatrix => "Tm",
            NextLine => "T*",
            ShowText => "Tj",
            ShowTextArray => "TJ",
            NextLineShowText => "'",
            NextLineShowTextSpaced => "\"",
            SetGlyphWidth => "d0",
            SetGlyphWidthAndBox => "d1",
            SetStrokeColorSpace => "CS",
            SetFillColorSpace => "cs",
            SetStrokeColor => "SC",
            SetStrokeColorN => "SCN",
            SetFillColor => "sc",
            SetFillColorN => "scn",
            SetStrokeGray => "G",
            SetFillGray => "g",
            SetStrokeRgb => "RG",
            SetFillRgb => "rg",
            SetStrokeCmyk => "K",
            SetFillCmyk => "k",
            PaintShading => "sh",
            BeginInlineImage => "BI",
            InlineImageData => "ID",
            EndInlineImage => "EI",
            PaintXObject => "Do",
            MarkPoint => "MP",
            MarkPointWithProperties => "DP",
            BeginMarkedContent => "BMC",
            BeginMarkedContentWithProperties => "BDC",
            EndMarkedContent => "EMC",
            BeginCompatibility => "BX",
            EndCompatibility => "EX",
            Unknown(keyword) => keyword.as_str(),
        }
    }

    /// Number of operands the operator takes, or `None` when it varies
    /// (color operators whose count depends on the color space) or the
    /// operator is unknown.
    pub fn arity(&self) -> Option<usize> {
        use PdfOperator::*;
        let n = match self {
            SaveState | RestoreState | ClosePath | Stroke | CloseStroke | Fill | FillObsolete
            | FillEvenOdd | FillStroke | FillStrokeEvenOdd | CloseFillStroke
            | CloseFillStrokeEvenOdd | EndPath | Clip | ClipEvenOdd | BeginText | EndText
            | NextLine | BeginInlineImage | InlineImageData | EndInlineImage
            | EndMarkedContent | BeginCompatibility | EndCompatibility => 0,
            SetLineWidth | SetLineCap | SetLineJoin | SetMiterLimit | SetRenderingIntent
            | SetFlatness | SetExtGState | SetCharSpacing | SetWordSpacing
            | SetHorizontalScaling | SetLeading | SetRenderMode | SetTextRise | ShowText
            | ShowTextArray | NextLineShowText | SetStrokeColorSpace | SetFillColorSpace
            | SetStrokeGray | SetFillGray | PaintShading | PaintXObject | MarkPoint
            | BeginMarkedContent => 1,
            SetDashPattern | MoveTo | LineTo | SetFont | MoveText | MoveTextSetLeading
            | SetGlyphWidth | MarkPointWithProperties | BeginMarkedContentWithProperties => 2,
            NextLineShowTextSpaced | SetStrokeRgb | SetFillRgb => 3,
            CurveToV | CurveToY | Rectangle | SetStrokeCmyk | SetFillCmyk => 4,
            ConcatMatrix | CurveTo | SetTextMatrix | SetGlyphWidthAndBox => 6,
            SetStrokeColor | SetStrokeColorN | SetFillColor | SetFillColorN | Unknown(_) => {
                return None;
            }
        };
        Some(n)
    }

    /// Whether the operator paints a string (`Tj`, `TJ`, `'`, `"`).
    pub fn is_text_show(&self) -> bool {
        matches!(
            self,
            PdfOperator::ShowText
                | PdfOperator::ShowTextArray
                | PdfOperator::NextLineShowText
                | PdfOperator::NextLineShowTextSpaced
        )
    }
}

impl fmt::Display for PdfOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// What a record represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    /// An ordinary operator with its operands.
    Operator,
    /// A complete `BI ... ID ... EI` sequence.
    InlineImage,
    /// A `Do` invocation of a named XObject.
    XObject,
}

/// Why the reader flagged a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordWarning {
    /// The keyword is not a PDF operator.
    InvalidOperator,
    /// The operator takes a fixed number of operands and got fewer.
    OperandCount { expected: usize, found: usize },
    /// More operands than the operator takes. The extra leading operands are
    /// ignored and the record stays usable.
    SurplusOperands { expected: usize, found: usize },
}

impl RecordWarning {
    /// Whether the record must be skipped because of this warning.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, RecordWarning::SurplusOperands { .. })
    }
}

impl fmt::Display for RecordWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordWarning::InvalidOperator => f.write_str("unknown operator"),
            RecordWarning::OperandCount { expected, found } => {
                write!(f, "expected {expected} operands, found {found}")
            }
            RecordWarning::SurplusOperands { expected, found } => {
                let surplus = found - expected;
                write!(f, "{surplus} surplus operands, using the last {expected}")
            }
        }
    }
}

/// One content stream record: an operator and the operands before it.
#[derive(Debug, Clone, PartialEq)]
pub struct ContentRecord {
    pub kind: ContentKind,
    pub operator: PdfOperator,
    /// Operands in stream order.
    pub operands: Vec<Operand>,
    /// Problems found while reading; empty for a well-formed record.
    pub warnings: Vec<RecordWarning>,
}

impl ContentRecord {
    /// Build a record and check its operands against the operator.
    pub fn new(kind: ContentKind, operator: PdfOperator, operands: Vec<Operand>) -> Self {
        let mut warnings = Vec::new();
        if let PdfOperator::Unknown(_) = operator {
            warnings.push(RecordWarning::InvalidOperator);
        } else if kind == ContentKind::Operator || kind == ContentKind::XObject {
            if let Some(expected) = operator.arity() {
                let found = operands.len();
                if found < expected {
                    warnings.push(RecordWarning::OperandCount { expected, found });
                } else if found > expected {
                    warnings.push(RecordWarning::SurplusOperands { expected, found });
                }
            }
        }
        Self {
            kind,
            operator,
            operands,
            warnings,
        }
    }

    /// Build a record from a keyword as read from the stream.
    pub fn from_keyword(keyword: &str, operands: Vec<Operand>) -> Self {
        let operator = PdfOperator::from_keyword(keyword);
        let kind = if operator == PdfOperator::PaintXObject {
            ContentKind::XObject
        } else {
            ContentKind::Operator
        };
        Self::new(kind, operator, operands)
    }

    /// True unless the reader flagged something that makes the record unusable.
    ///
    /// Surplus operands alone do not invalidate a record.
    pub fn is_valid(&self) -> bool {
        !self.warnings.iter().any(RecordWarning::is_fatal)
    }

    /// The operands the operator consumes.
    ///
    /// For fixed-arity operators this is the last `arity` operands, the ones
    /// nearest the keyword; anything before them is stack leftovers.
    pub fn args(&self) -> &[Operand] {
        if self.kind == ContentKind::InlineImage {
            return &self.operands;
        }
        match self.operator.arity() {
            Some(n) if self.operands.len() > n => &self.operands[self.operands.len() - n..],
            _ => &self.operands,
        }
    }

    /// First numeric operand among [`args`](Self::args), whatever its position.
    pub fn first_number(&self) -> Option<f64> {
        self.args().iter().find_map(Operand::as_f64)
    }

    /// First name operand among [`args`](Self::args), whatever its position.
    pub fn first_name(&self) -> Option<&str> {
        self.args().iter().find_map(Operand::as_name)
    }

    /// Numeric operand at `index` of [`args`](Self::args).
    pub fn number(&self, index: usize) -> Option<f64> {
        self.args().get(index).and_then(Operand::as_f64)
    }
}
