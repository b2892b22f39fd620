//! Page geometry and rendering defaults, in PDF points

/// Standard A4 page width in points
pub const A4_WIDTH: f32 = 595.0;

/// Standard A4 page height in points
pub const A4_HEIGHT: f32 = 842.0;

/// US Letter page width in points
pub const LETTER_WIDTH: f32 = 612.0;

/// US Letter page height in points
pub const LETTER_HEIGHT: f32 = 792.0;

/// Default page margin in points
pub const DEFAULT_MARGIN: f32 = 50.0;

/// Average character width as a fraction of font size, used when no
/// font metrics are available
pub const DEFAULT_CHAR_WIDTH_RATIO: f32 = 0.5;

/// Default line height multiplier
pub const DEFAULT_LINE_HEIGHT_MULTIPLIER: f32 = 1.2;

/// Minimum column width in points
pub const MIN_COLUMN_WIDTH: f32 = 20.0;

/// Default cell padding in points
pub const DEFAULT_PADDING: f32 = 5.0;

/// Default table font size in points
pub const DEFAULT_FONT_SIZE: f32 = 10.0;

/// Default report title font size in points
pub const DEFAULT_TITLE_FONT_SIZE: f32 = 16.0;

/// Default border width in points
pub const DEFAULT_BORDER_WIDTH: f32 = 1.0;

/// Resource name of the regular table font
pub const FONT_REGULAR: &str = "F1";

/// Resource name of the bold table font
pub const FONT_BOLD: &str = "F1-Bold";

/// Resource name of an embedded TrueType font
pub const FONT_EMBEDDED: &str = "EF0";
