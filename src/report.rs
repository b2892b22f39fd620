//! Cut-list report: table construction, PDF export and a plain-text view

use crate::Result;
use crate::calculator::CalculatedWindow;
use crate::constants::{
    A4_HEIGHT, A4_WIDTH, DEFAULT_FONT_SIZE, DEFAULT_MARGIN, DEFAULT_TITLE_FONT_SIZE, FONT_BOLD,
    FONT_EMBEDDED,
};
use crate::document::{self, NewDocument};
use crate::drawing::{self, TextLine};
use crate::error::ReportError;
use crate::font::{BuiltinMetrics, FontMetrics};
use crate::style::{Alignment, CellStyle, Color, TableStyle};
use crate::table::{Cell, ColumnWidth, Row, Table};
use crate::{PagedTableResult, TableDrawing};
use lopdf::Document;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, instrument};

#[cfg(feature = "ttf-parser")]
use crate::font::TtfFontMetrics;

/// File name the exported report is saved under
pub const DEFAULT_FILENAME: &str = "aluminum-windows-calculations.pdf";

/// Fixed display strings for the report
#[derive(Debug, Clone, PartialEq)]
pub struct Labels {
    pub title: String,
    pub window: String,
    pub frame_length: String,
    pub frame_width: String,
    pub sash_length: String,
    pub sash_width: String,
}

impl Labels {
    pub fn english() -> Self {
        Self {
            title: "Aluminum Windows Calculator".to_string(),
            window: "Window No.".to_string(),
            frame_length: "Frame length (cm)".to_string(),
            frame_width: "Frame width (cm)".to_string(),
            sash_length: "Sash length (cm)".to_string(),
            sash_width: "Sash width (cm)".to_string(),
        }
    }

    /// Arabic strings. The built-in PDF fonts cannot show them, so export
    /// needs an embedded TrueType font with Arabic glyphs.
    pub fn arabic() -> Self {
        Self {
            title: "حاسبة نوافذ الألمنيوم".to_string(),
            window: "رقم النافذة".to_string(),
            frame_length: "طول الحلق (سم)".to_string(),
            frame_width: "عرض الحلق (سم)".to_string(),
            sash_length: "طول الدفة (سم)".to_string(),
            sash_width: "عرض الدفة (سم)".to_string(),
        }
    }

    /// Column headers in table order
    pub fn columns(&self) -> [&str; 5] {
        [
            &self.window,
            &self.frame_length,
            &self.frame_width,
            &self.sash_length,
            &self.sash_width,
        ]
    }

    /// Whether every label can be written with the built-in fonts
    pub fn is_latin1(&self) -> bool {
        std::iter::once(self.title.as_str())
            .chain(self.columns())
            .all(|s| s.chars().all(|c| u32::from(c) <= 0xff))
    }
}

impl Default for Labels {
    fn default() -> Self {
        Self::english()
    }
}

/// Page and text settings for an exported report
#[derive(Debug, Clone)]
pub struct ReportConfig {
    pub labels: Labels,
    pub filename: String,
    pub page_width: f32,
    pub page_height: f32,
    pub margin: f32,
    pub font_size: f32,
    pub title_font_size: f32,
    /// Embedded font used for all text instead of Helvetica
    #[cfg(feature = "ttf-parser")]
    pub font: Option<Arc<TtfFontMetrics>>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            labels: Labels::default(),
            filename: DEFAULT_FILENAME.to_string(),
            page_width: A4_WIDTH,
            page_height: A4_HEIGHT,
            margin: DEFAULT_MARGIN,
            font_size: DEFAULT_FONT_SIZE,
            title_font_size: DEFAULT_TITLE_FONT_SIZE,
            #[cfg(feature = "ttf-parser")]
            font: None,
        }
    }
}

impl ReportConfig {
    pub fn with_labels(mut self, labels: Labels) -> Self {
        self.labels = labels;
        self
    }

    pub fn with_title<S: Into<String>>(mut self, title: S) -> Self {
        self.labels.title = title.into();
        self
    }

    pub fn with_filename<S: Into<String>>(mut self, filename: S) -> Self {
        self.filename = filename.into();
        self
    }

    pub fn with_page_size(mut self, width: f32, height: f32) -> Self {
        self.page_width = width;
        self.page_height = height;
        self
    }

    #[cfg(feature = "ttf-parser")]
    pub fn with_font(mut self, font: TtfFontMetrics) -> Self {
        self.font = Some(Arc::new(font));
        self
    }

    fn metrics(&self) -> Arc<dyn FontMetrics> {
        #[cfg(feature = "ttf-parser")]
        {
            if let Some(ref font) = self.font {
                return font.clone();
            }
        }
        Arc::new(BuiltinMetrics)
    }

    fn has_embedded_font(&self) -> bool {
        self.metrics().is_embedded()
    }
}

/// Format a measurement with exactly one decimal place.
///
/// Values exactly halfway between two tenths round away from zero. Only
/// odd multiples of 0.25 are exact ties in binary, everything else is left
/// to the formatter, which rounds by the exact stored value.
pub fn format_measurement(value: f64) -> String {
    let quarters = value * 4.0;
    if quarters.fract() == 0.0 && quarters % 2.0 != 0.0 {
        let rounded = (value * 10.0).round() / 10.0;
        return format!("{rounded:.1}");
    }
    format!("{value:.1}")
}

/// The formatted cells of one report row
pub fn row_values(window: &CalculatedWindow) -> [String; 5] {
    let [frame_length, frame_width, sash_length, sash_width] =
        window.measurements().map(format_measurement);
    [
        window.index.to_string(),
        frame_length,
        frame_width,
        sash_length,
        sash_width,
    ]
}

/// Build the report table: one header row, then one row per window
pub fn build_table(rows: &[CalculatedWindow], config: &ReportConfig) -> Table {
    let style = TableStyle {
        default_font_size: config.font_size,
        page_height: config.page_height,
        top_margin: config.margin,
        bottom_margin: config.margin,
        embedded_font_resource_name: config
            .has_embedded_font()
            .then(|| FONT_EMBEDDED.to_string()),
        ..Default::default()
    };

    let header = Row::new(
        config
            .labels
            .columns()
            .into_iter()
            .map(|label| Cell::new(label).with_style(CellStyle::header()))
            .collect(),
    );

    let mut table = Table::new()
        .with_style(style)
        .with_header_rows(1)
        .with_total_width(config.page_width - config.margin * 2.0)
        .with_column_widths(vec![
            ColumnWidth::Percentage(16.0),
            ColumnWidth::Percentage(21.0),
            ColumnWidth::Percentage(21.0),
            ColumnWidth::Percentage(21.0),
            ColumnWidth::Percentage(21.0),
        ])
        .with_font_metrics(config.metrics())
        .add_row(header);

    for window in rows {
        let [index, measurements @ ..] = row_values(window);
        let mut cells = vec![Cell::new(index).with_style(CellStyle {
            alignment: Alignment::Center,
            ..Default::default()
        })];
        cells.extend(
            measurements
                .into_iter()
                .map(|value| Cell::new(value).with_style(CellStyle::numeric())),
        );
        table = table.add_row(Row::new(cells));
    }

    table
}

/// A rendered report and where its table ended up
#[derive(Debug)]
pub struct RenderedReport {
    pub doc: Document,
    pub table: PagedTableResult,
}

/// Lay out the title and table in a new PDF document
#[instrument(skip_all, fields(rows = rows.len()))]
pub fn render(rows: &[CalculatedWindow], config: &ReportConfig) -> Result<RenderedReport> {
    if rows.is_empty() {
        return Err(ReportError::NotCalculated);
    }

    let NewDocument { mut doc, page_id } = new_report_document(config)?;
    let metrics = config.metrics();

    let title_font = if config.has_embedded_font() {
        FONT_EMBEDDED
    } else {
        FONT_BOLD
    };
    let title_width = metrics.text_width(&config.labels.title, config.title_font_size);
    let title_y = config.page_height - config.margin;
    let title_ops = drawing::text_line_operations(
        &TextLine {
            text: &config.labels.title,
            font_resource: title_font,
            font_size: config.title_font_size,
            color: Color::black(),
            x: (config.page_width - title_width) / 2.0,
            y: title_y,
        },
        metrics.as_ref(),
    );
    drawing::add_operations_to_page(&mut doc, page_id, title_ops)?;

    let table = build_table(rows, config);
    let table_top = title_y - config.title_font_size * 1.5;
    let result = doc.draw_table_with_pagination(page_id, table, (config.margin, table_top))?;

    info!(
        "Rendered {} windows on {} page(s)",
        rows.len(),
        result.total_pages
    );
    Ok(RenderedReport { doc, table: result })
}

fn new_report_document(config: &ReportConfig) -> Result<NewDocument> {
    #[cfg(feature = "ttf-parser")]
    {
        if let Some(ref font) = config.font {
            return document::new_document_with_font(
                config.page_width,
                config.page_height,
                font,
                "ReportFont",
            );
        }
    }
    document::new_document(config.page_width, config.page_height)
}

/// Render the report and serialize it to PDF bytes
pub fn to_pdf_bytes(rows: &[CalculatedWindow], config: &ReportConfig) -> Result<Vec<u8>> {
    let mut report = render(rows, config)?;
    let mut bytes = Vec::new();
    report.doc.save_to(&mut bytes)?;
    debug!("Serialized report to {} bytes", bytes.len());
    Ok(bytes)
}

/// Render the report and write it as `config.filename` inside `dir`
pub fn save(rows: &[CalculatedWindow], config: &ReportConfig, dir: &Path) -> Result<PathBuf> {
    let path = dir.join(&config.filename);
    let bytes = to_pdf_bytes(rows, config)?;
    std::fs::write(&path, bytes)?;
    debug!("Saved report to {}", path.display());
    Ok(path)
}

/// Plain-text table of calculated windows for terminal output
#[derive(Debug, Clone, Copy)]
pub struct CutList<'a> {
    pub rows: &'a [CalculatedWindow],
    pub labels: &'a Labels,
}

impl<'a> CutList<'a> {
    pub fn new(rows: &'a [CalculatedWindow], labels: &'a Labels) -> Self {
        Self { rows, labels }
    }
}

impl fmt::Display for CutList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let header = self.labels.columns();
        let body: Vec<[String; 5]> = self.rows.iter().map(row_values).collect();

        let mut widths = header.map(|h| h.chars().count());
        for row in &body {
            for (width, value) in widths.iter_mut().zip(row) {
                *width = (*width).max(value.chars().count());
            }
        }

        writeln!(f, "{}", self.labels.title)?;
        for (i, (label, width)) in header.iter().zip(widths).enumerate() {
            let sep = if i == 0 { "" } else { "  " };
            write!(f, "{sep}{label:<width$}")?;
        }
        writeln!(f)?;

        let rule = widths.iter().sum::<usize>() + 2 * (widths.len() - 1);
        writeln!(f, "{}", "-".repeat(rule))?;

        for row in &body {
            for (i, (value, width)) in row.iter().zip(widths).enumerate() {
                let sep = if i == 0 { "" } else { "  " };
                write!(f, "{sep}{value:>width$}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculator::{RawWindowSpec, calculate};

    fn sample_rows() -> Vec<CalculatedWindow> {
        calculate(&[
            RawWindowSpec::new(100.0, 60.0),
            RawWindowSpec::new(50.0, 2.0),
        ])
    }

    #[test]
    fn test_format_measurement() {
        assert_eq!(format_measurement(57.4), "57.4");
        assert_eq!(format_measurement(94.0), "94.0");
        assert_eq!(format_measurement((2.0 - 2.6) / 2.0), "-0.3");
        assert_eq!(format_measurement(12.345), "12.3");
    }

    #[test]
    fn test_format_measurement_rounds_ties_up() {
        assert_eq!(format_measurement(0.25), "0.3");
        assert_eq!(format_measurement(30.25), "30.3");
        assert_eq!(format_measurement(100.25), "100.3");
        assert_eq!(format_measurement(0.75), "0.8");
        assert_eq!(format_measurement(-0.25), "-0.3");
        // Close to a tie but stored below it
        assert_eq!(format_measurement(0.15), "0.1");
        assert_eq!(format_measurement(2.5), "2.5");
    }

    #[test]
    fn test_row_values_with_tied_measurements() {
        let window = &calculate(&[RawWindowSpec::new(100.25, 63.1)])[0];
        assert_eq!(row_values(window), ["1", "100.3", "60.5", "94.3", "30.3"]);
    }

    #[test]
    fn test_row_values() {
        let rows = sample_rows();
        assert_eq!(row_values(&rows[0]), ["1", "100.0", "57.4", "94.0", "28.7"]);
        assert_eq!(row_values(&rows[1]), ["2", "50.0", "-0.6", "44.0", "-0.3"]);
    }

    #[test]
    fn test_build_table_has_header_plus_one_row_per_window() {
        let rows = sample_rows();
        let table = build_table(&rows, &ReportConfig::default());

        assert_eq!(table.rows.len(), rows.len() + 1);
        assert_eq!(table.header_rows, 1);
        assert_eq!(table.body_row_count(), rows.len());
        assert_eq!(table.rows[0].cells[1].content, "Frame length (cm)");
        assert!(table.validate().is_ok());

        for row in &table.rows[1..] {
            for cell in &row.cells[1..] {
                let (_, decimals) = cell.content.split_once('.').unwrap();
                assert_eq!(decimals.len(), 1, "{}", cell.content);
            }
        }
    }

    #[test]
    fn test_render_rejects_empty_results() {
        let result = render(&[], &ReportConfig::default());
        assert!(matches!(result, Err(ReportError::NotCalculated)));
    }

    #[test]
    fn test_render_single_page() {
        let report = render(&sample_rows(), &ReportConfig::default()).unwrap();
        assert_eq!(report.table.total_pages, 1);
        assert_eq!(report.doc.get_pages().len(), 1);
    }

    #[test]
    fn test_render_many_windows_paginates() {
        let specs = vec![RawWindowSpec::new(120.0, 80.0); 60];
        let report = render(&calculate(&specs), &ReportConfig::default()).unwrap();

        assert!(report.table.total_pages > 1);
        assert_eq!(report.doc.get_pages().len(), report.table.total_pages);
    }

    #[test]
    fn test_config_builders() {
        let config = ReportConfig::default()
            .with_labels(Labels::arabic())
            .with_title("Site A")
            .with_filename("site-a.pdf");

        assert_eq!(config.labels.title, "Site A");
        assert_eq!(config.labels.window, Labels::arabic().window);
        assert_eq!(config.filename, "site-a.pdf");
        assert_eq!(ReportConfig::default().filename, DEFAULT_FILENAME);
    }

    #[test]
    fn test_latin1_labels() {
        assert!(Labels::english().is_latin1());
        assert!(!Labels::arabic().is_latin1());
    }

    #[test]
    fn test_cut_list_text() {
        let rows = sample_rows();
        let labels = Labels::english();
        let text = CutList::new(&rows, &labels).to_string();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "Aluminum Windows Calculator");
        assert!(lines[1].starts_with("Window No."));
        assert!(lines[2].chars().all(|c| c == '-'));
        assert_eq!(lines.len(), 3 + rows.len());
        assert!(lines[3].ends_with("28.7"));
        assert!(lines[4].contains("-0.6"));
    }
}
