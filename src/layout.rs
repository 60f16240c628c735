//! Page size calculations

/// Points per inch in PDF user space
const POINTS_PER_INCH: f32 = 72.0;
const MM_PER_INCH: f32 = 25.4;

/// Physical page size in points (1/72 inch)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSize {
    pub width: f32,
    pub height: f32,
}

impl PageSize {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Create a page size from millimetres
    pub fn from_mm(width_mm: f32, height_mm: f32) -> Self {
        Self {
            width: mm_to_pt(width_mm),
            height: mm_to_pt(height_mm),
        }
    }

    /// A4 size (210mm × 297mm), the fallback for filler pages
    pub fn a4() -> Self {
        Self::from_mm(210.0, 297.0)
    }

    /// US Letter size (8.5" × 11")
    pub fn letter() -> Self {
        Self::new(8.5 * POINTS_PER_INCH, 11.0 * POINTS_PER_INCH)
    }

    /// Size of a `[x0 y0 x1 y1]` rectangle, independent of corner order
    pub fn from_rect(rect: [f32; 4]) -> Self {
        let [x0, y0, x1, y1] = rect;
        Self {
            width: (x1 - x0).abs(),
            height: (y1 - y0).abs(),
        }
    }

    /// Width and height in millimetres
    pub fn to_mm(&self) -> (f32, f32) {
        (pt_to_mm(self.width), pt_to_mm(self.height))
    }

    /// A page with zero area cannot be used as a reference size
    pub fn is_degenerate(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

impl Default for PageSize {
    fn default() -> Self {
        Self::a4()
    }
}

fn mm_to_pt(mm: f32) -> f32 {
    mm * POINTS_PER_INCH / MM_PER_INCH
}

fn pt_to_mm(pt: f32) -> f32 {
    pt * MM_PER_INCH / POINTS_PER_INCH
}
