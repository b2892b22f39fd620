//! Core table structures used by the report renderer

use crate::Result;
use crate::error::ReportError;
use crate::font::FontMetrics;
use crate::style::{CellStyle, TableStyle};
use std::sync::Arc;
use tracing::trace;

/// Width specification for a single column
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColumnWidth {
    /// Fixed width in points
    Points(f32),
    /// Share of the table's total width
    Percentage(f32),
    /// Split the remaining width in proportion to content
    Auto,
}

/// A table with rows, styling and optional font metrics
#[derive(Debug, Clone)]
pub struct Table {
    pub rows: Vec<Row>,
    pub style: TableStyle,
    /// Column width specifications (if None, sized from content)
    pub column_widths: Option<Vec<ColumnWidth>>,
    /// Total width used to resolve percentage and auto columns
    pub total_width: Option<f32>,
    /// Number of leading rows that form the header
    pub header_rows: usize,
    /// Metrics for measuring and encoding text; falls back to a fixed
    /// character-width estimate when absent
    pub font_metrics: Option<Arc<dyn FontMetrics>>,
}

impl Table {
    pub fn new() -> Self {
        Self {
            rows: Vec::new(),
            style: TableStyle::default(),
            column_widths: None,
            total_width: None,
            header_rows: 0,
            font_metrics: None,
        }
    }

    pub fn add_row(mut self, row: Row) -> Self {
        trace!("Adding row with {} cells", row.cells.len());
        self.rows.push(row);
        self
    }

    pub fn with_style(mut self, style: TableStyle) -> Self {
        self.style = style;
        self
    }

    pub fn with_column_widths(mut self, widths: Vec<ColumnWidth>) -> Self {
        self.column_widths = Some(widths);
        self
    }

    pub fn with_total_width(mut self, width: f32) -> Self {
        self.total_width = Some(width);
        self
    }

    pub fn with_header_rows(mut self, count: usize) -> Self {
        self.header_rows = count;
        self
    }

    pub fn with_font_metrics(mut self, metrics: Arc<dyn FontMetrics>) -> Self {
        self.font_metrics = Some(metrics);
        self
    }

    /// Number of columns (based on the first row)
    pub fn column_count(&self) -> usize {
        self.rows.first().map(|r| r.cells.len()).unwrap_or(0)
    }

    /// Number of rows after the header
    pub fn body_row_count(&self) -> usize {
        self.rows.len().saturating_sub(self.header_rows)
    }

    pub fn validate(&self) -> Result<()> {
        if self.rows.is_empty() {
            return Err(ReportError::InvalidTable("Table has no rows".to_string()));
        }

        let expected_cols = self.column_count();
        for (i, row) in self.rows.iter().enumerate() {
            if row.cells.len() != expected_cols {
                return Err(ReportError::InvalidTable(format!(
                    "Row {} has {} cells, expected {}",
                    i,
                    row.cells.len(),
                    expected_cols
                )));
            }
        }

        if let Some(ref widths) = self.column_widths {
            if widths.len() != expected_cols {
                return Err(ReportError::InvalidTable(format!(
                    "Column widths array has {} elements, but table has {} columns",
                    widths.len(),
                    expected_cols
                )));
            }
        }

        if self.header_rows > self.rows.len() {
            return Err(ReportError::InvalidTable(format!(
                "{} header rows requested, but table has {} rows",
                self.header_rows,
                self.rows.len()
            )));
        }

        Ok(())
    }
}

impl Default for Table {
    fn default() -> Self {
        Self::new()
    }
}

/// A row in a table
#[derive(Debug, Clone)]
pub struct Row {
    pub cells: Vec<Cell>,
    /// Explicit height (if None, sized from content)
    pub height: Option<f32>,
}

impl Row {
    pub fn new(cells: Vec<Cell>) -> Self {
        Self {
            cells,
            height: None,
        }
    }

    pub fn with_height(mut self, height: f32) -> Self {
        self.height = Some(height);
        self
    }
}

/// A single-line text cell
#[derive(Debug, Clone)]
pub struct Cell {
    pub content: String,
    pub style: Option<CellStyle>,
}

impl Cell {
    pub fn new<S: Into<String>>(content: S) -> Self {
        Self {
            content: content.into(),
            style: None,
        }
    }

    pub fn with_style(mut self, style: CellStyle) -> Self {
        self.style = Some(style);
        self
    }

    pub fn bold(mut self) -> Self {
        let mut style = self.style.unwrap_or_default();
        style.bold = true;
        self.style = Some(style);
        self
    }

    pub fn with_font_size(mut self, size: f32) -> Self {
        let mut style = self.style.unwrap_or_default();
        style.font_size = Some(size);
        self.style = Some(style);
        self
    }

    pub fn is_bold(&self) -> bool {
        self.style.as_ref().is_some_and(|s| s.bold)
    }

    /// Font size of this cell, falling back to the table default
    pub fn font_size(&self, table_style: &TableStyle) -> f32 {
        self.style
            .as_ref()
            .and_then(|s| s.font_size)
            .unwrap_or(table_style.default_font_size)
    }
}
