//! Mapping between PDF font names and generic font descriptions.
//!
//! [`map_font`] turns a PDF font's base name and full name into a
//! [`FontDescription`] a rendering toolkit can match against system fonts.
//! [`standard_font_name`] goes the other way, picking the standard-14 font
//! that best matches a description when edited text is written back.

/// Generic family category used when the named family is unavailable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StyleHint {
    Serif,
    SansSerif,
    Monospace,
    /// No preference; let the toolkit choose.
    #[default]
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Slant {
    #[default]
    Normal,
    Italic,
    Oblique,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Weight {
    #[default]
    Normal,
    Bold,
}

/// A toolkit-independent description of a font to render with.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FontDescription {
    /// Display family name (e.g. "Times New Roman").
    pub family: String,
    pub hint: StyleHint,
    pub slant: Slant,
    pub weight: Weight,
}

impl FontDescription {
    pub fn new(family: impl Into<String>, hint: StyleHint) -> Self {
        Self {
            family: family.into(),
            hint,
            slant: Slant::Normal,
            weight: Weight::Normal,
        }
    }

    pub fn is_bold(&self) -> bool {
        self.weight == Weight::Bold
    }

    pub fn is_slanted(&self) -> bool {
        self.slant != Slant::Normal
    }
}

impl Default for FontDescription {
    /// Description used for text whose font could not be resolved.
    fn default() -> Self {
        Self::new("Helvetica", StyleHint::SansSerif)
    }
}

/// Map a PDF font to a [`FontDescription`].
///
/// `base_name` selects the family (`"Times"`, `"ArialMT"`, ...). `font_name`
/// is the full resource name, possibly with a subset tag (`"BAAAAA+ArialMT"`)
/// and a style suffix after its last hyphen (`"Times-BoldItalic"`). A suffix
/// starting with `Bold` sets bold weight; what remains after `Bold` sets the
/// slant only if it is exactly `Italic` or `Oblique`.
///
/// Never fails: unknown base names pass through as the family with
/// [`StyleHint::System`].
pub fn map_font(base_name: &str, font_name: &str) -> FontDescription {
    let (family, hint) = match base_name {
        "Times-Roman" | "Times" => ("Times New Roman", StyleHint::Serif),
        "Helvetica" => ("Helvetica", StyleHint::SansSerif),
        "Courier" => ("Courier", StyleHint::Monospace),
        // Symbol glyphs do not shape reliably through system fonts; substitute.
        "Symbol" => ("Arial", StyleHint::SansSerif),
        "ArialMT" => ("Arial", StyleHint::SansSerif),
        other => (other, StyleHint::System),
    };

    let mut description = FontDescription::new(family, hint);

    let style = font_name
        .rfind('-')
        .map(|i| &font_name[i + 1..])
        .unwrap_or("");
    let style = match style.strip_prefix("Bold") {
        Some(rest) => {
            description.weight = Weight::Bold;
            rest
        }
        None => style,
    };
    description.slant = match style {
        "Italic" => Slant::Italic,
        "Oblique" => Slant::Oblique,
        _ => Slant::Normal,
    };

    description
}

/// Pick the standard-14 font name closest to `description`.
///
/// The family is matched by name first, then by style hint; anything
/// unrecognized falls back to Helvetica. Times uses `Roman`/`Italic`
/// naming, Helvetica and Courier use `Oblique` for any slant.
pub fn standard_font_name(description: &FontDescription) -> String {
    let family = description.family.to_ascii_lowercase();
    let base = if family.contains("times") {
        "Times"
    } else if family.contains("courier") {
        "Courier"
    } else if family.contains("helvetica") || family.contains("arial") {
        "Helvetica"
    } else {
        match description.hint {
            StyleHint::Serif => "Times",
            StyleHint::Monospace => "Courier",
            StyleHint::SansSerif | StyleHint::System => "Helvetica",
        }
    };

    let bold = description.is_bold();
    let slanted = description.is_slanted();
    let suffix = match (base, bold, slanted) {
        ("Times", false, false) => "-Roman",
        ("Times", true, false) => "-Bold",
        ("Times", false, true) => "-Italic",
        ("Times", true, true) => "-BoldItalic",
        (_, false, false) => "",
        (_, true, false) => "-Bold",
        (_, false, true) => "-Oblique",
        (_, true, true) => "-BoldOblique",
    };
    format!("{base}{suffix}")
}
