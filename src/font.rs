//! Font metrics for text measurement and encoding

use crate::constants::DEFAULT_CHAR_WIDTH_RATIO;

/// Measures text and encodes it for the PDF `Tj` operator.
pub trait FontMetrics: std::fmt::Debug {
    /// Width of a single character in points at the given font size
    fn char_width(&self, ch: char, font_size: f32) -> f32;

    /// Total width of a string in points at the given font size
    fn text_width(&self, text: &str, font_size: f32) -> f32 {
        text.chars().map(|ch| self.char_width(ch, font_size)).sum()
    }

    /// Encode text as the byte string shown by `Tj`
    fn encode_text(&self, text: &str) -> Vec<u8>;

    /// Whether encoded text refers to glyph IDs of an embedded font
    fn is_embedded(&self) -> bool {
        false
    }
}

/// Fixed-ratio estimate used with the built-in Type1 fonts.
///
/// Text is encoded one byte per character. Characters whose Latin-1 code
/// means something else under WinAnsiEncoding (U+0080 to U+009F), and
/// anything past U+00FF, are replaced with `?`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinMetrics;

impl FontMetrics for BuiltinMetrics {
    fn char_width(&self, _ch: char, font_size: f32) -> f32 {
        font_size * DEFAULT_CHAR_WIDTH_RATIO
    }

    fn encode_text(&self, text: &str) -> Vec<u8> {
        text.chars()
            .map(|ch| match u8::try_from(u32::from(ch)) {
                Ok(byte @ (0x00..=0x7f | 0xa0..=0xff)) => byte,
                _ => b'?',
            })
            .collect()
    }
}

/// Vertical metrics and glyph advances of a TrueType face, in PDF glyph
/// space (1000 units per em)
#[cfg(feature = "ttf-parser")]
#[derive(Debug, Clone)]
pub struct FaceInfo {
    pub ascender: i64,
    pub descender: i64,
    pub cap_height: i64,
    /// Advance width per glyph ID
    pub widths: Vec<i64>,
}

/// TrueType font metrics using ttf-parser.
///
/// Owns the font data and parses it on demand. Embedding the font into a
/// document is done by [`crate::document::new_document`].
#[cfg(feature = "ttf-parser")]
pub struct TtfFontMetrics {
    font_data: Vec<u8>,
    units_per_em: f32,
}

#[cfg(feature = "ttf-parser")]
impl TtfFontMetrics {
    /// Validate and wrap raw TTF/TTC font data
    pub fn new(font_data: Vec<u8>) -> crate::Result<Self> {
        let face = ttf_parser::Face::parse(&font_data, 0)
            .map_err(|e| crate::error::ReportError::FontError(format!("Failed to parse font: {e}")))?;
        let units_per_em = f32::from(face.units_per_em());
        Ok(Self {
            font_data,
            units_per_em,
        })
    }

    pub fn font_data(&self) -> &[u8] {
        &self.font_data
    }

    // Parsing was validated in `new`, so this only fails on a logic error.
    fn face(&self) -> Option<ttf_parser::Face<'_>> {
        ttf_parser::Face::parse(&self.font_data, 0).ok()
    }

    fn to_glyph_space(&self, units: f32) -> i64 {
        (units * 1000.0 / self.units_per_em).round() as i64
    }

    /// Metrics needed to describe the font inside a PDF
    pub fn face_info(&self) -> crate::Result<FaceInfo> {
        let face = self.face().ok_or_else(|| {
            crate::error::ReportError::FontError("Font data no longer parses".to_string())
        })?;

        let widths = (0..face.number_of_glyphs())
            .map(|gid| {
                let advance = face
                    .glyph_hor_advance(ttf_parser::GlyphId(gid))
                    .unwrap_or(0);
                self.to_glyph_space(f32::from(advance))
            })
            .collect();

        Ok(FaceInfo {
            ascender: self.to_glyph_space(f32::from(face.ascender())),
            descender: self.to_glyph_space(f32::from(face.descender())),
            cap_height: self.to_glyph_space(f32::from(
                face.capital_height().unwrap_or(face.ascender()),
            )),
            widths,
        })
    }
}

#[cfg(feature = "ttf-parser")]
impl FontMetrics for TtfFontMetrics {
    fn char_width(&self, ch: char, font_size: f32) -> f32 {
        self.face()
            .and_then(|face| {
                face.glyph_index(ch)
                    .and_then(|gid| face.glyph_hor_advance(gid))
            })
            .map(|advance| f32::from(advance) / self.units_per_em * font_size)
            .unwrap_or(font_size * DEFAULT_CHAR_WIDTH_RATIO)
    }

    fn text_width(&self, text: &str, font_size: f32) -> f32 {
        let Some(face) = self.face() else {
            return BuiltinMetrics.text_width(text, font_size);
        };
        text.chars()
            .map(|ch| {
                face.glyph_index(ch)
                    .and_then(|gid| face.glyph_hor_advance(gid))
                    .map(|advance| f32::from(advance) / self.units_per_em * font_size)
                    .unwrap_or(font_size * DEFAULT_CHAR_WIDTH_RATIO)
            })
            .sum()
    }

    /// Two-byte big-endian glyph IDs for an Identity-H Type0 font
    fn encode_text(&self, text: &str) -> Vec<u8> {
        let face = self.face();
        let mut bytes = Vec::with_capacity(text.len() * 2);
        for ch in text.chars() {
            let glyph_id = face
                .as_ref()
                .and_then(|f| f.glyph_index(ch))
                .map(|g| g.0)
                .unwrap_or(0);
            bytes.extend_from_slice(&glyph_id.to_be_bytes());
        }
        bytes
    }

    fn is_embedded(&self) -> bool {
        true
    }
}

#[cfg(feature = "ttf-parser")]
impl std::fmt::Debug for TtfFontMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TtfFontMetrics")
            .field("units_per_em", &self.units_per_em)
            .field("font_data_len", &self.font_data.len())
            .finish()
    }
}

/// Look for a TrueType font in common system locations
pub fn find_system_font() -> Option<Vec<u8>> {
    const CANDIDATES: &[&str] = &[
        "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/TTF/DejaVuSans.ttf",
        "/System/Library/Fonts/Supplemental/Arial.ttf",
        "C:\\Windows\\Fonts\\arial.ttf",
    ];
    CANDIDATES.iter().find_map(|path| std::fs::read(path).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_width_is_ratio_of_font_size() {
        assert_eq!(BuiltinMetrics.char_width('W', 10.0), 5.0);
        assert_eq!(BuiltinMetrics.text_width("57.4", 10.0), 20.0);
    }

    #[test]
    fn test_builtin_encoding_replaces_non_latin() {
        assert_eq!(BuiltinMetrics.encode_text("28.7"), b"28.7".to_vec());
        assert_eq!(BuiltinMetrics.encode_text("\u{00e9}"), vec![0xe9]);
        assert_eq!(BuiltinMetrics.encode_text("\u{0637}x"), b"?x".to_vec());
        // C1 controls occupy WinAnsi slots of other glyphs
        assert_eq!(BuiltinMetrics.encode_text("\u{0080}\u{009f}\u{00a0}"), vec![b'?', b'?', 0xa0]);
        assert!(!BuiltinMetrics.is_embedded());
    }

    #[cfg(feature = "ttf-parser")]
    #[test]
    fn test_ttf_font_metrics_invalid_data() {
        assert!(TtfFontMetrics::new(vec![0, 1, 2, 3]).is_err());
    }

    #[cfg(feature = "ttf-parser")]
    #[test]
    fn test_ttf_metrics_with_system_font() {
        let Some(font_data) = find_system_font() else {
            eprintln!("Skipping test: no system font found");
            return;
        };
        let metrics = TtfFontMetrics::new(font_data).unwrap();

        let single = metrics.char_width('A', 12.0);
        assert!(single > 0.0);
        assert!((metrics.text_width("AAA", 12.0) - single * 3.0).abs() < 0.01);
        assert_eq!(metrics.encode_text("ABC").len(), 6);
        assert!(metrics.is_embedded());

        let info = metrics.face_info().unwrap();
        assert!(info.ascender > 0);
        assert!(!info.widths.is_empty());
    }
}
