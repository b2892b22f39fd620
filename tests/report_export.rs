//! Export a cut list to PDF and read it back

use alu_cutlist::report::{self, DEFAULT_FILENAME};
use alu_cutlist::{Field, RawWindowSpec, ReportConfig, WindowForm, calculate};
use lopdf::Document;
use lopdf::content::Content;

/// Every string shown with `Tj`, page by page, in drawing order
fn shown_strings(doc: &Document) -> Vec<Vec<String>> {
    doc.get_pages()
        .values()
        .map(|&page_id| {
            let content = Content::decode(&doc.get_page_content(page_id).unwrap()).unwrap();
            content
                .operations
                .iter()
                .filter(|op| op.operator == "Tj")
                .map(|op| String::from_utf8(op.operands[0].as_str().unwrap().to_vec()).unwrap())
                .collect()
        })
        .collect()
}

#[test]
fn exported_rows_match_calculated_rows() {
    let rows = calculate(&[
        RawWindowSpec::new(100.0, 60.0),
        RawWindowSpec::new(50.0, 2.0),
        RawWindowSpec::new(145.5, 120.0),
    ]);

    let bytes = report::to_pdf_bytes(&rows, &ReportConfig::default()).unwrap();
    let doc = Document::load_mem(&bytes).unwrap();

    let pages = shown_strings(&doc);
    assert_eq!(pages.len(), 1);
    let strings = &pages[0];

    assert_eq!(strings[0], "Aluminum Windows Calculator");
    assert_eq!(strings[1], "Window No.");
    // title + header + five cells per window
    assert_eq!(strings.len(), 1 + 5 + rows.len() * 5);

    let body = &strings[6..];
    assert_eq!(&body[..5], ["1", "100.0", "57.4", "94.0", "28.7"]);
    assert_eq!(&body[5..10], ["2", "50.0", "-0.6", "44.0", "-0.3"]);
    assert_eq!(&body[10..], ["3", "145.5", "117.4", "139.5", "58.7"]);
}

#[test]
fn every_measurement_has_one_decimal() {
    let specs: Vec<_> = (0..12)
        .map(|i| RawWindowSpec::new(60.0 + i as f64 * 7.25, 40.0 + i as f64 * 3.3))
        .collect();
    let rows = calculate(&specs);

    let bytes = report::to_pdf_bytes(&rows, &ReportConfig::default()).unwrap();
    let doc = Document::load_mem(&bytes).unwrap();
    let strings = shown_strings(&doc).concat();

    let body = &strings[6..];
    assert_eq!(body.len(), rows.len() * 5);
    for row in body.chunks(5) {
        for value in &row[1..] {
            let (_, decimals) = value.split_once('.').unwrap();
            assert_eq!(decimals.len(), 1, "{value}");
        }
    }
}

#[test]
fn long_cut_list_repeats_header_on_each_page() {
    let rows = calculate(&vec![RawWindowSpec::new(120.0, 80.0); 75]);

    let bytes = report::to_pdf_bytes(&rows, &ReportConfig::default()).unwrap();
    let doc = Document::load_mem(&bytes).unwrap();
    let pages = shown_strings(&doc);

    assert!(pages.len() > 1);
    for (i, strings) in pages.iter().enumerate() {
        // The title only appears on the first page
        let header_at = if i == 0 { 1 } else { 0 };
        assert_eq!(strings[header_at], "Window No.");
    }

    let body_cells: usize = pages
        .iter()
        .enumerate()
        .map(|(i, s)| s.len() - 5 - usize::from(i == 0))
        .sum();
    assert_eq!(body_cells, rows.len() * 5);
}

#[test]
fn form_export_saves_fixed_filename() {
    let dir = tempfile::tempdir().unwrap();

    let mut form = WindowForm::new();
    form.set_window_count(2);
    form.set_dimension_text(0, Field::Length, "100");
    form.set_dimension_text(0, Field::Width, "60");
    form.set_dimension_text(1, Field::Length, "80");
    form.set_dimension_text(1, Field::Width, "not a number");

    let results = form.calculate().to_vec();
    let path = report::save(&results, &ReportConfig::default(), dir.path()).unwrap();

    assert_eq!(path.file_name().unwrap(), DEFAULT_FILENAME);
    let doc = Document::load(&path).unwrap();
    let strings = shown_strings(&doc).concat();
    assert_eq!(&strings[11..], ["2", "80.0", "-2.6", "74.0", "-1.3"]);
}

#[cfg(feature = "ttf-parser")]
#[test]
fn arabic_labels_export_with_embedded_font() {
    use alu_cutlist::font::find_system_font;
    use alu_cutlist::{FontMetrics, Labels, TtfFontMetrics};
    use lopdf::{Object, StringFormat};

    let Some(font_data) = find_system_font() else {
        eprintln!("Skipping test: no system font found");
        return;
    };
    let font = TtfFontMetrics::new(font_data.clone()).unwrap();
    let glyph_count = font.face_info().unwrap().widths.len();

    let rows = calculate(&[
        RawWindowSpec::new(100.0, 60.0),
        RawWindowSpec::new(80.0, 40.0),
    ]);
    let config = ReportConfig::default()
        .with_labels(Labels::arabic())
        .with_font(TtfFontMetrics::new(font_data).unwrap());
    let bytes = report::to_pdf_bytes(&rows, &config).unwrap();
    let doc = Document::load_mem(&bytes).unwrap();

    let page_id = *doc.get_pages().values().next().unwrap();
    let resources_id = doc
        .get_dictionary(page_id)
        .and_then(|page| page.get(b"Resources"))
        .and_then(Object::as_reference)
        .unwrap();
    let font_id = doc
        .get_dictionary(resources_id)
        .and_then(|res| res.get(b"Font"))
        .and_then(Object::as_dict)
        .and_then(|fonts| fonts.get(b"EF0"))
        .and_then(Object::as_reference)
        .unwrap();

    let type0 = doc.get_dictionary(font_id).unwrap();
    assert_eq!(type0.get(b"Subtype").and_then(Object::as_name).unwrap(), b"Type0");
    assert_eq!(type0.get(b"Encoding").and_then(Object::as_name).unwrap(), b"Identity-H");

    let cid_font_id = type0
        .get(b"DescendantFonts")
        .and_then(Object::as_array)
        .unwrap()[0]
        .as_reference()
        .unwrap();
    let w = doc
        .get_dictionary(cid_font_id)
        .and_then(|cid| cid.get(b"W"))
        .and_then(Object::as_array)
        .unwrap();
    assert_eq!(w[1].as_array().unwrap().len(), glyph_count);

    let content = Content::decode(&doc.get_page_content(page_id).unwrap()).unwrap();
    let shown: Vec<_> = content
        .operations
        .iter()
        .filter(|op| op.operator == "Tj")
        .map(|op| &op.operands[0])
        .collect();
    assert_eq!(shown.len(), 1 + 5 + rows.len() * 5);
    for operand in &shown {
        assert!(matches!(operand, Object::String(_, StringFormat::Hexadecimal)));
    }

    let labels = Labels::arabic();
    assert_eq!(shown[0].as_str().unwrap().to_vec(), font.encode_text(&labels.title));
    assert_eq!(shown[1].as_str().unwrap().to_vec(), font.encode_text(&labels.window));

    assert!(
        content
            .operations
            .iter()
            .filter(|op| op.operator == "Tf")
            .all(|op| op.operands[0].as_name().unwrap() == b"EF0")
    );
}
