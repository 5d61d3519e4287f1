//! Shared constants for photolog layout and rendering
//!
//! Every length is in PDF points (1 inch = 72 points). Defaults describe
//! a US Letter sheet carrying two photos per page.

// =============================================================================
// Unit Conversion
// =============================================================================

/// Points per inch
pub const POINTS_PER_INCH: f32 = 72.0;

/// Convert inches to points
#[inline]
pub fn inch_to_pt(inches: f32) -> f32 {
    inches * POINTS_PER_INCH
}

// =============================================================================
// Default Page Dimensions
// =============================================================================

/// Default page width in points (US Letter: 8.5" × 11")
pub const DEFAULT_PAGE_WIDTH_PT: f32 = 612.0;

/// Default page height in points (US Letter)
pub const DEFAULT_PAGE_HEIGHT_PT: f32 = 792.0;

/// Default margin on every side (0.5")
pub const DEFAULT_MARGIN_PT: f32 = 36.0;

/// Default photo box (4.5" × 3.3")
pub const DEFAULT_PHOTO_WIDTH_PT: f32 = 324.0;
pub const DEFAULT_PHOTO_HEIGHT_PT: f32 = 237.6;

/// Default annotation box height (1.125")
pub const DEFAULT_ANNOTATION_HEIGHT_PT: f32 = 81.0;

/// Default vertical gap between two slots on one page (0.4")
pub const DEFAULT_SLOT_GAP_PT: f32 = 28.8;

/// Space reserved above the first slot for the page header (0.5")
pub const DEFAULT_HEADER_ALLOWANCE_PT: f32 = 36.0;

/// Photos per page
pub const DEFAULT_SLOTS_PER_PAGE: usize = 2;

// =============================================================================
// Header
// =============================================================================

pub const DEFAULT_HEADER_TITLE: &str = "SITE PHOTOGRAPHS";

/// Header title font size (Helvetica-Bold)
pub const HEADER_FONT_SIZE: f32 = 12.0;

/// Header title baseline, measured down from the top margin
pub const HEADER_BASELINE_DROP: f32 = 18.0;

/// Logo box (1.25" × 0.625"), its bottom edge 0.4" below the top margin
pub const LOGO_WIDTH_PT: f32 = 90.0;
pub const LOGO_HEIGHT_PT: f32 = 45.0;
pub const LOGO_BOTTOM_DROP: f32 = 28.8;

// =============================================================================
// Annotation Box
// =============================================================================

/// Horizontal inset of caption, fields and separators inside the box
pub const BOX_INSET: f32 = 10.0;

/// Caption baseline, measured down from the bottom of the photo
pub const CAPTION_BASELINE_DROP: f32 = 20.0;

/// Caption font size (Helvetica-Bold)
pub const CAPTION_FONT_SIZE: f32 = 10.0;

/// Coordinate label font size (Helvetica)
pub const COORD_FONT_SIZE: f32 = 10.0;

/// Note field geometry, offsets measured up from the bottom of the box
pub const NOTE_FIELD_HEIGHT: f32 = 15.0;
pub const NOTE_FIELD_OFFSETS: [f32; 2] = [30.0, 10.0];
pub const NOTE_FIELD_FONT_SIZE: f32 = 9.0;

/// Separator lines sit 2pt below each field's bottom edge
pub const SEPARATOR_OFFSETS: [f32; 2] = [28.0, 8.0];

/// Line width for the box border and separators
pub const STROKE_WIDTH: f32 = 1.0;

// =============================================================================
// Output
// =============================================================================

/// Name of the generated document inside the output directory
pub const OUTPUT_FILE_NAME: &str = "photolog.pdf";

/// Text drawn in place of a photo that could not be embedded
pub const PLACEHOLDER_TEXT: &str = "Image unavailable";

// =============================================================================
// Compression
// =============================================================================

pub const DEFAULT_MAX_IMAGE_WIDTH: u32 = 800;
pub const DEFAULT_MAX_IMAGE_HEIGHT: u32 = 600;
pub const DEFAULT_JPEG_QUALITY: u8 = 85;
