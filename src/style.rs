//! Styling for the report table, its rows and cells

use crate::constants::{DEFAULT_BORDER_WIDTH, DEFAULT_FONT_SIZE, DEFAULT_MARGIN, DEFAULT_PADDING};

/// RGB color representation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    /// Create a new RGB color (values are clamped to 0.0-1.0)
    pub fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self {
            r: r.clamp(0.0, 1.0),
            g: g.clamp(0.0, 1.0),
            b: b.clamp(0.0, 1.0),
        }
    }

    pub fn black() -> Self {
        Self::rgb(0.0, 0.0, 0.0)
    }

    pub fn gray(level: f32) -> Self {
        let l = level.clamp(0.0, 1.0);
        Self::rgb(l, l, l)
    }

    pub fn light_gray() -> Self {
        Self::gray(0.85)
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::black()
    }
}

/// Horizontal text alignment within a cell
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
}

/// Border style options
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum BorderStyle {
    None,
    #[default]
    Solid,
}

/// Padding for cells
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Padding {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl Padding {
    pub fn uniform(value: f32) -> Self {
        Self {
            top: value,
            right: value,
            bottom: value,
            left: value,
        }
    }

    pub fn symmetric(vertical: f32, horizontal: f32) -> Self {
        Self {
            top: vertical,
            bottom: vertical,
            left: horizontal,
            right: horizontal,
        }
    }

    pub fn horizontal(&self) -> f32 {
        self.left + self.right
    }

    pub fn vertical(&self) -> f32 {
        self.top + self.bottom
    }
}

impl Default for Padding {
    fn default() -> Self {
        Self::uniform(DEFAULT_PADDING)
    }
}

/// Styling for the entire table
#[derive(Debug, Clone)]
pub struct TableStyle {
    pub border_style: BorderStyle,
    pub border_width: f32,
    pub border_color: Color,
    pub padding: Padding,
    pub default_font_size: f32,
    /// Page height used for pagination
    pub page_height: f32,
    pub top_margin: f32,
    pub bottom_margin: f32,
    /// Repeat header rows on continuation pages
    pub repeat_headers: bool,
    /// Resource name of an embedded Type0 font. When set, all text is
    /// written as glyph IDs through the table's font metrics.
    pub embedded_font_resource_name: Option<String>,
}

impl Default for TableStyle {
    fn default() -> Self {
        Self {
            border_style: BorderStyle::Solid,
            border_width: DEFAULT_BORDER_WIDTH,
            border_color: Color::black(),
            padding: Padding::default(),
            default_font_size: DEFAULT_FONT_SIZE,
            page_height: crate::constants::A4_HEIGHT,
            top_margin: DEFAULT_MARGIN,
            bottom_margin: DEFAULT_MARGIN,
            repeat_headers: true,
            embedded_font_resource_name: None,
        }
    }
}

/// Styling for a cell
#[derive(Debug, Clone, Default)]
pub struct CellStyle {
    pub background_color: Option<Color>,
    pub text_color: Color,
    pub font_size: Option<f32>,
    pub bold: bool,
    pub alignment: Alignment,
}

impl CellStyle {
    /// Column header style (bold, centered, shaded)
    pub fn header() -> Self {
        Self {
            bold: true,
            alignment: Alignment::Center,
            background_color: Some(Color::light_gray()),
            ..Default::default()
        }
    }

    /// Right-aligned numeric value
    pub fn numeric() -> Self {
        Self {
            alignment: Alignment::Right,
            ..Default::default()
        }
    }
}
