/// A run of text drawn by one text-showing operator.
///
/// Coordinates are in PDF user space (bottom-left origin) at the start of the
/// run's baseline.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TextEntry {
    pub x: f64,
    pub y: f64,
    /// Advance width of the run in user space units.
    pub length: f64,
    pub text: String,
}

impl TextEntry {
    pub fn new(x: f64, y: f64, length: f64, text: impl Into<String>) -> Self {
        Self {
            x,
            y,
            length,
            text: text.into(),
        }
    }

    /// X coordinate where the run ends.
    pub fn end_x(&self) -> f64 {
        self.x + self.length
    }
}
