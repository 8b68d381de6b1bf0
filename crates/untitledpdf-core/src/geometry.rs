/// Affine transformation matrix `[a b c d e f]` in PDF row-vector convention.
///
/// A point `(x, y)` maps to `(a*x + c*y + e, b*x + d*y + f)`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Matrix {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl Default for Matrix {
    fn default() -> Self {
        Self::identity()
    }
}

impl Matrix {
    pub fn new(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Self {
        Self { a, b, c, d, e, f }
    }

    pub fn identity() -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, 0.0, 0.0)
    }

    /// Pure translation by `(tx, ty)`.
    pub fn translation(tx: f64, ty: f64) -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, tx, ty)
    }

    /// Compute `self × other`: apply `self` first, then `other`.
    pub fn concat(&self, other: &Matrix) -> Matrix {
        Matrix {
            a: self.a * other.a + self.b * other.c,
            b: self.a * other.b + self.b * other.d,
            c: self.c * other.a + self.d * other.c,
            d: self.c * other.b + self.d * other.d,
            e: self.e * other.a + self.f * other.c + other.e,
            f: self.e * other.b + self.f * other.d + other.f,
        }
    }

    /// Transform a point.
    pub fn transform_point(&self, x: f64, y: f64) -> (f64, f64) {
        (
            self.a * x + self.c * y + self.e,
            self.b * x + self.d * y + self.f,
        )
    }
}

/// Rectangle in PDF user space (bottom-left origin), as stored in page boxes.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PdfRect {
    pub left: f64,
    pub bottom: f64,
    pub right: f64,
    pub top: f64,
}

impl PdfRect {
    pub fn new(left: f64, bottom: f64, right: f64, top: f64) -> Self {
        Self {
            left,
            bottom,
            right,
            top,
        }
    }

    /// Build from two opposite corners in any order, as page box arrays allow.
    pub fn from_corners(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self::new(x0.min(x1), y0.min(y1), x0.max(x1), y0.max(y1))
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.top - self.bottom
    }
}

/// Integer pixel rectangle with top-left origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PixelRect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl PixelRect {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// Dots per inch assumed when the caller does not know the screen's.
pub const DEFAULT_DPI: f64 = 96.0;

/// Maps page coordinates onto a top-left-origin pixel canvas.
///
/// The canvas covers the page's trim box at the given logical DPI
/// (72 points per inch). Horizontal and vertical DPI may differ.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PageFrame {
    pub trim: PdfRect,
    pub dpi_x: f64,
    pub dpi_y: f64,
}

impl PageFrame {
    pub fn new(trim: PdfRect, dpi_x: f64, dpi_y: f64) -> Self {
        Self { trim, dpi_x, dpi_y }
    }

    /// Frame with the same DPI on both axes.
    pub fn uniform(trim: PdfRect, dpi: f64) -> Self {
        Self::new(trim, dpi, dpi)
    }

    /// Convert a horizontal distance in points to whole pixels (truncating).
    pub fn pt_to_px_x(&self, pt: f64) -> i32 {
        (pt * self.dpi_x / 72.0) as i32
    }

    /// Convert a vertical distance in points to whole pixels (truncating).
    pub fn pt_to_px_y(&self, pt: f64) -> i32 {
        (pt * self.dpi_y / 72.0) as i32
    }

    /// Convert a horizontal distance in pixels back to points.
    pub fn px_to_pt_x(&self, px: i32) -> f64 {
        px as f64 * 72.0 / self.dpi_x
    }

    /// Convert a vertical distance in pixels back to points.
    pub fn px_to_pt_y(&self, px: i32) -> f64 {
        px as f64 * 72.0 / self.dpi_y
    }

    /// Canvas size in pixels `(width, height)`.
    pub fn canvas_size(&self) -> (i32, i32) {
        (
            self.pt_to_px_x(self.trim.width()),
            self.pt_to_px_y(self.trim.height()),
        )
    }

    /// Map a baseline point in user space to the canvas, top-left origin.
    pub fn to_canvas(&self, x: f64, y: f64) -> (i32, i32) {
        (
            self.pt_to_px_x(x - self.trim.left),
            self.pt_to_px_y(self.trim.top - y),
        )
    }

    /// Map a canvas point back to user space.
    pub fn to_user_space(&self, px: i32, py: i32) -> (f64, f64) {
        (
            self.trim.left + self.px_to_pt_x(px),
            self.trim.top - self.px_to_pt_y(py),
        )
    }
}
