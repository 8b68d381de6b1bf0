//! Font resources and metrics read from lopdf font dictionaries.
//!
//! Parses /BaseFont, /Subtype, /Widths, /FirstChar and /FontDescriptor
//! into an owned [`FontResource`]. Missing entries fall back to the
//! defaults in [`untitledpdf_core::font`].

use lopdf::{Dictionary, Document, Object};
use untitledpdf_core::font::{DEFAULT_ASCENT, DEFAULT_DESCENT, DEFAULT_WIDTH};
use untitledpdf_core::{FontMetrics, FontResource};

/// Build a [`FontResource`] for the font stored under `resource_name`.
///
/// The full name comes from `/BaseFont`, then the descriptor's `/FontName`,
/// then the resource name itself.
pub fn font_resource(doc: &Document, resource_name: &str, font_dict: &Dictionary) -> FontResource {
    let descriptor = font_descriptor(doc, font_dict);
    let font_name = name_entry(doc, font_dict, b"BaseFont")
        .or_else(|| descriptor.and_then(|d| name_entry(doc, d, b"FontName")))
        .unwrap_or_else(|| resource_name.to_string());

    let mut font = FontResource::new(resource_name, font_name)
        .with_metrics(extract_font_metrics(doc, font_dict));
    if let Some(subtype) = name_entry(doc, font_dict, b"Subtype") {
        font = font.with_subtype(subtype);
    }
    font
}

/// Extract [`FontMetrics`] from a simple font dictionary.
///
/// Reads /Widths and /FirstChar from the font dictionary, and /Ascent,
/// /Descent and /MissingWidth from its /FontDescriptor. Composite (Type0)
/// fonts keep their widths in descendant fonts and get default widths.
pub fn extract_font_metrics(doc: &Document, font_dict: &Dictionary) -> FontMetrics {
    let first_char = font_dict
        .get(b"FirstChar")
        .ok()
        .and_then(|o| number(doc, o))
        .map(|v| v.max(0.0) as u32)
        .unwrap_or(0);

    let widths: Vec<f64> = font_dict
        .get(b"Widths")
        .ok()
        .map(|o| resolve(doc, o))
        .and_then(|o| o.as_array().ok())
        .map(|arr| arr.iter().map(|o| number(doc, o).unwrap_or(0.0)).collect())
        .unwrap_or_default();

    let descriptor = font_descriptor(doc, font_dict);
    let from_descriptor = |key: &[u8], default: f64| {
        descriptor
            .and_then(|d| d.get(key).ok())
            .and_then(|o| number(doc, o))
            .unwrap_or(default)
    };

    // Fonts with /Widths but no /MissingWidth measure unknown codes as 0,
    // as PDF readers do; fonts with neither use the default width.
    let missing_default = if widths.is_empty() { DEFAULT_WIDTH } else { 0.0 };

    let mut ascent = from_descriptor(b"Ascent", DEFAULT_ASCENT);
    let mut descent = from_descriptor(b"Descent", DEFAULT_DESCENT);
    if ascent <= descent {
        ascent = DEFAULT_ASCENT;
        descent = DEFAULT_DESCENT;
    }

    FontMetrics::new(
        widths,
        first_char,
        from_descriptor(b"MissingWidth", missing_default),
        ascent,
        descent,
    )
}

fn font_descriptor<'a>(doc: &'a Document, font_dict: &'a Dictionary) -> Option<&'a Dictionary> {
    font_dict
        .get(b"FontDescriptor")
        .ok()
        .map(|o| resolve(doc, o))
        .and_then(|o| o.as_dict().ok())
}

fn name_entry(doc: &Document, dict: &Dictionary, key: &[u8]) -> Option<String> {
    let obj = resolve(doc, dict.get(key).ok()?);
    obj.as_name()
        .ok()
        .map(|n| String::from_utf8_lossy(n).into_owned())
}

/// Resolve an indirect reference to the actual object.
pub(crate) fn resolve<'a>(doc: &'a Document, obj: &'a Object) -> &'a Object {
    match obj {
        Object::Reference(id) => doc.get_object(*id).unwrap_or(obj),
        _ => obj,
    }
}

/// Numeric value of a (possibly indirect) integer or real object.
pub(crate) fn number(doc: &Document, obj: &Object) -> Option<f64> {
    match resolve(doc, obj) {
        Object::Integer(i) => Some(*i as f64),
        Object::Real(f) => Some(*f as f64),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::{Object, dictionary};

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn bare_type1_gets_default_metrics() {
        let doc = Document::with_version("1.5");
        let dict = dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
        };
        let font = font_resource(&doc, "F1", &dict);
        assert_eq!(font.resource_name, "F1");
        assert_eq!(font.base_name, "Helvetica");
        assert_eq!(font.font_name, "Helvetica");
        assert_eq!(font.subtype.as_deref(), Some("Type1"));
        assert_eq!(font.metrics, FontMetrics::default());
    }

    #[test]
    fn widths_and_descriptor_are_read() {
        let mut doc = Document::with_version("1.5");
        let descriptor_id = doc.add_object(dictionary! {
            "Type" => "FontDescriptor",
            "FontName" => "BAAAAA+ArialMT",
            "Ascent" => 905,
            "Descent" => -212,
            "MissingWidth" => 250,
        });
        let widths_id = doc.add_object(Object::Array(vec![
            Object::Integer(667),
            Object::Real(556.0),
        ]));
        let dict = dictionary! {
            "Type" => "Font",
            "Subtype" => "TrueType",
            "BaseFont" => "BAAAAA+ArialMT",
            "FirstChar" => 65,
            "LastChar" => 66,
            "Widths" => widths_id,
            "FontDescriptor" => descriptor_id,
        };

        let font = font_resource(&doc, "TT0", &dict);
        assert_eq!(font.base_name, "ArialMT");
        assert_eq!(font.font_name, "BAAAAA+ArialMT");
        let m = &font.metrics;
        assert_eq!(m.get_width(65), 667.0);
        assert_eq!(m.get_width(66), 556.0);
        assert_eq!(m.get_width(67), 250.0);
        assert_eq!(m.ascent(), 905.0);
        assert_eq!(m.descent(), -212.0);
        assert_approx(font.string_width(b"AB", 10.0), 12.23);
    }

    #[test]
    fn widths_without_missing_width_measure_unknown_as_zero() {
        let doc = Document::with_version("1.5");
        let dict = dictionary! {
            "Subtype" => "Type1",
            "BaseFont" => "Custom",
            "FirstChar" => 32,
            "Widths" => vec![Object::Integer(278)],
        };
        let m = extract_font_metrics(&doc, &dict);
        assert_eq!(m.get_width(32), 278.0);
        assert_eq!(m.get_width(33), 0.0);
    }

    #[test]
    fn name_falls_back_to_descriptor_then_resource() {
        let mut doc = Document::with_version("1.5");
        let descriptor_id = doc.add_object(dictionary! {
            "FontName" => "Times-Bold",
        });
        let dict = dictionary! { "Subtype" => "Type3", "FontDescriptor" => descriptor_id };
        assert_eq!(font_resource(&doc, "T3", &dict).font_name, "Times-Bold");

        let empty = dictionary! {};
        let font = font_resource(&doc, "F9", &empty);
        assert_eq!(font.font_name, "F9");
        assert_eq!(font.subtype, None);
    }

    #[test]
    fn name_entries_are_read_from_name_objects_only() {
        let mut doc = Document::with_version("1.5");
        let base_id = doc.add_object(Object::Name(b"CDEFGH+Courier-Oblique".to_vec()));
        let dict = dictionary! { "BaseFont" => base_id, "Subtype" => "Type1" };
        let font = font_resource(&doc, "F3", &dict);
        assert_eq!(font.font_name, "CDEFGH+Courier-Oblique");
        assert_eq!(font.base_name, "Courier");

        // a string where a name belongs is not a font name
        let dict = dictionary! {
            "BaseFont" => Object::string_literal("Helvetica"),
            "Subtype" => Object::Integer(1),
        };
        let font = font_resource(&doc, "F4", &dict);
        assert_eq!(font.font_name, "F4");
        assert_eq!(font.subtype, None);
    }

    #[test]
    fn inverted_extents_fall_back_to_defaults() {
        let doc = Document::with_version("1.5");
        let dict = dictionary! {
            "BaseFont" => "Broken",
            "FontDescriptor" => dictionary! { "Ascent" => 0, "Descent" => 0 },
        };
        let m = extract_font_metrics(&doc, &dict);
        assert_eq!(m.ascent(), DEFAULT_ASCENT);
        assert_eq!(m.descent(), DEFAULT_DESCENT);
    }
}
