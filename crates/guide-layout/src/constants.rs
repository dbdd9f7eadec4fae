//! Shared constants for guide layout
//!
//! Unit conversion and font metric fallbacks used by the wrapper and the
//! PDF writer.

// =============================================================================
// Unit Conversion
// =============================================================================

/// Millimeters per point (1 inch = 72 points, 1 inch = 25.4mm)
pub const MM_PER_PT: f32 = 25.4 / 72.0;

/// Convert points to millimeters
#[inline]
pub fn pt_to_mm(pt: f32) -> f32 {
    pt * MM_PER_PT
}

/// Convert millimeters to points
#[inline]
pub fn mm_to_pt(mm: f32) -> f32 {
    mm / MM_PER_PT
}

// =============================================================================
// Builtin Font Metrics
// =============================================================================

/// Approximate character width ratio for Helvetica
pub const HELVETICA_CHAR_WIDTH_RATIO: f32 = 0.5;

/// Approximate character width ratio for Helvetica-Bold
pub const HELVETICA_BOLD_CHAR_WIDTH_RATIO: f32 = 0.55;

// =============================================================================
// Shape Approximation
// =============================================================================

/// Straight segments used to approximate a full circle
pub const CIRCLE_SEGMENTS: usize = 32;

/// Straight segments used to approximate one rounded corner
pub const CORNER_SEGMENTS: usize = 6;

// =============================================================================
// Spacing
// =============================================================================

/// Fraction of the base line height consumed by an empty input line
pub const SPACER_FRACTION: f32 = 0.5;

/// Inner padding of alert boxes (mm)
pub const ALERT_PADDING_MM: f32 = 1.5;

/// Corner radius of alert boxes (mm)
pub const ALERT_CORNER_RADIUS_MM: f32 = 2.0;

/// Width of the accent bar in front of numbered sections (mm)
pub const SECTION_BAR_WIDTH_MM: f32 = 1.5;

/// Radius of the bullet marker (mm)
pub const BULLET_RADIUS_MM: f32 = 0.9;
