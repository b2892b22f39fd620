//! Blank report document: page tree, catalog and font resources

use crate::Result;
use crate::constants::{FONT_BOLD, FONT_EMBEDDED, FONT_REGULAR};
use lopdf::{Dictionary, Document, Object, ObjectId, dictionary};
use tracing::debug;

#[cfg(feature = "ttf-parser")]
use crate::font::TtfFontMetrics;

/// A freshly created document and its first page
#[derive(Debug)]
pub struct NewDocument {
    pub doc: Document,
    pub page_id: ObjectId,
}

/// Create a one-page document of the given size with the built-in
/// Helvetica fonts registered as `F1` / `F1-Bold`
pub fn new_document(page_width: f32, page_height: f32) -> Result<NewDocument> {
    build_document(page_width, page_height, |_| Ok(None))
}

/// Like [`new_document`], additionally embedding a TrueType font as `EF0`
#[cfg(feature = "ttf-parser")]
pub fn new_document_with_font(
    page_width: f32,
    page_height: f32,
    font: &TtfFontMetrics,
    font_name: &str,
) -> Result<NewDocument> {
    build_document(page_width, page_height, |doc| {
        embed_ttf_font(doc, font, font_name).map(Some)
    })
}

fn build_document<F>(page_width: f32, page_height: f32, embed: F) -> Result<NewDocument>
where
    F: FnOnce(&mut Document) -> Result<Option<ObjectId>>,
{
    debug!("Creating {}x{} report document", page_width, page_height);

    let mut doc = Document::with_version("1.5");
    let media_box = Object::Array(vec![
        0.into(),
        0.into(),
        page_width.into(),
        page_height.into(),
    ]);

    let pages_id = doc.new_object_id();
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "MediaBox" => media_box.clone(),
    });

    let font_id = doc.add_object(builtin_font("Helvetica"));
    let font_bold_id = doc.add_object(builtin_font("Helvetica-Bold"));

    let mut fonts = dictionary! {
        FONT_REGULAR => font_id,
        FONT_BOLD => font_bold_id,
    };
    if let Some(embedded_id) = embed(&mut doc)? {
        fonts.set(FONT_EMBEDDED, embedded_id);
    }

    let resources_id = doc.add_object(dictionary! { "Font" => fonts });
    if let Ok(Object::Dictionary(page)) = doc.get_object_mut(page_id) {
        page.set("Resources", resources_id);
    }

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => Object::Array(vec![page_id.into()]),
            "Count" => 1,
            "MediaBox" => media_box,
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    Ok(NewDocument { doc, page_id })
}

fn builtin_font(base_font: &str) -> Dictionary {
    dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => base_font,
        "Encoding" => "WinAnsiEncoding",
    }
}

/// Embed a TrueType font as a Type0/CIDFontType2 font with Identity-H
/// encoding, matching the glyph IDs produced by `TtfFontMetrics::encode_text`
#[cfg(feature = "ttf-parser")]
fn embed_ttf_font(doc: &mut Document, font: &TtfFontMetrics, font_name: &str) -> Result<ObjectId> {
    let info = font.face_info()?;
    let data = font.font_data().to_vec();
    debug!("Embedding font {} ({} bytes)", font_name, data.len());

    let font_file_id = doc.add_object(lopdf::Stream::new(
        dictionary! { "Length1" => data.len() as i64 },
        data,
    ));

    let font_descriptor_id = doc.add_object(dictionary! {
        "Type" => "FontDescriptor",
        "FontName" => font_name,
        "Flags" => 32,
        "ItalicAngle" => 0,
        "Ascent" => info.ascender,
        "Descent" => info.descender,
        "CapHeight" => info.cap_height,
        "StemV" => 80,
        "FontBBox" => Object::Array(vec![
            0.into(),
            info.descender.into(),
            1000.into(),
            info.ascender.into(),
        ]),
        "FontFile2" => font_file_id,
    });

    let widths: Vec<Object> = info.widths.into_iter().map(Object::Integer).collect();
    let cid_font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "CIDFontType2",
        "BaseFont" => font_name,
        "CIDSystemInfo" => dictionary! {
            "Registry" => Object::string_literal("Adobe"),
            "Ordering" => Object::string_literal("Identity"),
            "Supplement" => 0,
        },
        "FontDescriptor" => font_descriptor_id,
        "CIDToGIDMap" => "Identity",
        "W" => Object::Array(vec![0.into(), Object::Array(widths)]),
    });

    Ok(doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type0",
        "BaseFont" => font_name,
        "Encoding" => "Identity-H",
        "DescendantFonts" => Object::Array(vec![cid_font_id.into()]),
    }))
}
