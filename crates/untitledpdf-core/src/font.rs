//! Font resources resolved from a page's resource dictionary.
//!
//! A [`FontResource`] is an owned description of a `/Font` entry: its
//! resource name, base and full PDF names, and the [`FontMetrics`] needed to
//! measure strings. It does not borrow from the document it came from, so
//! text states holding one stay valid after the document is dropped.

/// Default ascent when not specified (750/1000 of text space).
pub const DEFAULT_ASCENT: f64 = 750.0;

/// Default descent when not specified (-250/1000 of text space).
pub const DEFAULT_DESCENT: f64 = -250.0;

/// Default character width when not specified (600/1000 of text space).
pub const DEFAULT_WIDTH: f64 = 600.0;

/// Glyph widths and vertical extents for one font.
///
/// Width values are in glyph space units (1/1000 of text space).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FontMetrics {
    /// Glyph widths indexed by (char_code - first_char).
    widths: Vec<f64>,
    /// First character code in the widths array.
    first_char: u32,
    /// Default width for characters outside the widths array.
    missing_width: f64,
    /// Font ascent in glyph space units (positive, above baseline).
    ascent: f64,
    /// Font descent in glyph space units (negative, below baseline).
    descent: f64,
}

impl Default for FontMetrics {
    fn default() -> Self {
        Self {
            widths: Vec::new(),
            first_char: 0,
            missing_width: DEFAULT_WIDTH,
            ascent: DEFAULT_ASCENT,
            descent: DEFAULT_DESCENT,
        }
    }
}

impl FontMetrics {
    pub fn new(
        widths: Vec<f64>,
        first_char: u32,
        missing_width: f64,
        ascent: f64,
        descent: f64,
    ) -> Self {
        Self {
            widths,
            first_char,
            missing_width,
            ascent,
            descent,
        }
    }

    /// Width of a single-byte character code in glyph space.
    pub fn get_width(&self, char_code: u32) -> f64 {
        char_code
            .checked_sub(self.first_char)
            .and_then(|i| self.widths.get(i as usize))
            .copied()
            .unwrap_or(self.missing_width)
    }

    pub fn ascent(&self) -> f64 {
        self.ascent
    }

    pub fn descent(&self) -> f64 {
        self.descent
    }

    /// Advance width of `bytes` at `font_size`, in text space units.
    pub fn string_width(&self, bytes: &[u8], font_size: f64) -> f64 {
        let glyph_units: f64 = bytes.iter().map(|&b| self.get_width(b as u32)).sum();
        glyph_units / 1000.0 * font_size
    }

    /// Distance between baselines of consecutive lines at `font_size`.
    pub fn line_spacing(&self, font_size: f64) -> f64 {
        (self.ascent - self.descent) / 1000.0 * font_size
    }
}

/// A font resource resolved from `/Resources /Font /<name>`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FontResource {
    /// Key in the page's font resource dictionary (e.g. `F1`).
    pub resource_name: String,
    /// Family part of `/BaseFont`: subset tag and style suffix removed
    /// (e.g. `ArialMT`, `Times`).
    pub base_name: String,
    /// Full font name as stored in the PDF, subset tag included
    /// (e.g. `BAAAAA+ArialMT`, `Times-BoldItalic`).
    pub font_name: String,
    /// `/Subtype` (e.g. `Type1`, `TrueType`, `Type0`).
    pub subtype: Option<String>,
    pub metrics: FontMetrics,
}

impl FontResource {
    /// Create a resource whose base name is derived from the full name.
    pub fn new(resource_name: impl Into<String>, font_name: impl Into<String>) -> Self {
        let font_name = font_name.into();
        Self {
            resource_name: resource_name.into(),
            base_name: base_font_name(&font_name).to_string(),
            font_name,
            subtype: None,
            metrics: FontMetrics::default(),
        }
    }

    pub fn with_metrics(mut self, metrics: FontMetrics) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn with_subtype(mut self, subtype: impl Into<String>) -> Self {
        self.subtype = Some(subtype.into());
        self
    }

    pub fn string_width(&self, bytes: &[u8], font_size: f64) -> f64 {
        self.metrics.string_width(bytes, font_size)
    }

    pub fn line_spacing(&self, font_size: f64) -> f64 {
        self.metrics.line_spacing(font_size)
    }
}

/// Strip a subset tag (six uppercase ASCII letters followed by `+`).
///
/// `"BAAAAA+ArialMT"` becomes `"ArialMT"`; names without a tag are returned
/// unchanged.
pub fn strip_subset_prefix(name: &str) -> &str {
    match name.split_once('+') {
        Some((tag, rest)) if tag.len() == 6 && tag.bytes().all(|b| b.is_ascii_uppercase()) => rest,
        _ => name,
    }
}

/// Style suffixes dropped from a full name to obtain its base name.
const STYLE_SUFFIXES: [&str; 6] = [
    "Bold",
    "Italic",
    "Oblique",
    "BoldItalic",
    "BoldOblique",
    "Regular",
];

/// Reduce a full font name to its base name.
///
/// Strips the subset tag, then a trailing style suffix introduced by `-` or
/// `,` (`Times-BoldItalic` → `Times`, `Arial,Bold` → `Arial`). Other suffixes
/// such as `-Roman` are part of the base name and kept.
pub fn base_font_name(font_name: &str) -> &str {
    let name = strip_subset_prefix(font_name);
    match name.rfind(['-', ',']) {
        Some(i) if i > 0 && STYLE_SUFFIXES.contains(&&name[i + 1..]) => &name[..i],
        _ => name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-10,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn width_lookup_within_range() {
        let metrics = FontMetrics::new(vec![250.0, 500.0, 750.0], 32, 0.0, 700.0, -200.0);
        assert_eq!(metrics.get_width(32), 250.0);
        assert_eq!(metrics.get_width(34), 750.0);
    }

    #[test]
    fn width_lookup_outside_range_uses_missing_width() {
        let metrics = FontMetrics::new(vec![250.0], 65, 444.0, 700.0, -200.0);
        assert_eq!(metrics.get_width(64), 444.0);
        assert_eq!(metrics.get_width(66), 444.0);
        assert_eq!(metrics.get_width(0), 444.0);
    }

    #[test]
    fn default_metrics_values() {
        let metrics = FontMetrics::default();
        assert_eq!(metrics.get_width(65), DEFAULT_WIDTH);
        assert_eq!(metrics.ascent(), DEFAULT_ASCENT);
        assert_eq!(metrics.descent(), DEFAULT_DESCENT);
    }

    #[test]
    fn string_width_scales_with_size() {
        let metrics = FontMetrics::default();
        // 5 glyphs * 600/1000 * 12
        assert_approx(metrics.string_width(b"Hello", 12.0), 36.0);
        assert_approx(metrics.string_width(b"", 12.0), 0.0);
    }

    #[test]
    fn line_spacing_uses_ascent_and_descent() {
        let metrics = FontMetrics::new(Vec::new(), 0, 600.0, 718.0, -207.0);
        assert_approx(metrics.line_spacing(10.0), 9.25);
    }

    #[test]
    fn strip_subset_prefix_removes_tag() {
        assert_eq!(strip_subset_prefix("BAAAAA+ArialMT"), "ArialMT");
        assert_eq!(strip_subset_prefix("Times-Bold"), "Times-Bold");
        assert_eq!(strip_subset_prefix("abcdef+Foo"), "abcdef+Foo");
        assert_eq!(strip_subset_prefix("ABC+Foo"), "ABC+Foo");
    }

    #[test]
    fn base_font_name_drops_style_suffix() {
        assert_eq!(base_font_name("Times-BoldItalic"), "Times");
        assert_eq!(base_font_name("Times-Roman"), "Times-Roman");
        assert_eq!(base_font_name("Helvetica-Oblique"), "Helvetica");
        assert_eq!(base_font_name("Arial,Bold"), "Arial");
        assert_eq!(base_font_name("BAAAAA+ArialMT"), "ArialMT");
        assert_eq!(base_font_name("CDEFGH+Courier-Bold"), "Courier");
        assert_eq!(base_font_name("-Bold"), "-Bold");
    }

    #[test]
    fn resource_derives_base_name() {
        let font = FontResource::new("F1", "CDEFGH+Times-BoldItalic").with_subtype("Type1");
        assert_eq!(font.resource_name, "F1");
        assert_eq!(font.base_name, "Times");
        assert_eq!(font.font_name, "CDEFGH+Times-BoldItalic");
        assert_eq!(font.subtype.as_deref(), Some("Type1"));
    }

    #[test]
    fn resource_measures_through_metrics() {
        let metrics = FontMetrics::new(vec![500.0; 95], 32, 0.0, 800.0, -200.0);
        let font = FontResource::new("F1", "Helvetica").with_metrics(metrics);
        assert_approx(font.string_width(b"ab", 10.0), 10.0);
        assert_approx(font.line_spacing(10.0), 10.0);
    }
}
