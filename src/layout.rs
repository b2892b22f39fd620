//! Layout calculation for tables

use crate::Result;
use crate::constants::{
    DEFAULT_LINE_HEIGHT_MULTIPLIER, DEFAULT_MARGIN, LETTER_WIDTH, MIN_COLUMN_WIDTH,
};
use crate::error::ReportError;
use crate::font::{BuiltinMetrics, FontMetrics};
use crate::table::{Cell, ColumnWidth, Table};
use tracing::{debug, trace};

/// Calculated layout information for a table
#[derive(Debug, Clone)]
pub struct TableLayout {
    pub column_widths: Vec<f32>,
    pub row_heights: Vec<f32>,
    pub total_width: f32,
    pub total_height: f32,
}

/// Metrics the table measures and encodes text with
pub(crate) fn metrics(table: &Table) -> &dyn FontMetrics {
    match table.font_metrics {
        Some(ref m) => m.as_ref(),
        None => &BuiltinMetrics,
    }
}

fn cell_text_width(table: &Table, cell: &Cell) -> f32 {
    metrics(table).text_width(&cell.content, cell.font_size(&table.style))
}

/// Calculate the layout for a table
pub fn calculate_layout(table: &Table) -> Result<TableLayout> {
    table.validate()?;

    debug!(
        "Calculating layout for table with {} rows",
        table.rows.len()
    );

    let column_widths = match table.column_widths {
        Some(ref specs) => {
            let available = table
                .total_width
                .unwrap_or(LETTER_WIDTH - DEFAULT_MARGIN * 2.0);
            resolve_column_widths(specs, available, table)
        }
        None => calculate_column_widths(table)?,
    };

    let row_heights = calculate_row_heights(table);

    let total_width = column_widths.iter().sum();
    let total_height = row_heights.iter().sum();

    trace!("Layout calculated: {}x{}", total_width, total_height);

    Ok(TableLayout {
        column_widths,
        row_heights,
        total_width,
        total_height,
    })
}

/// Resolve column widths from specifications
fn resolve_column_widths(specs: &[ColumnWidth], available_width: f32, table: &Table) -> Vec<f32> {
    let mut resolved = vec![0.0; specs.len()];
    let mut used = 0.0;
    let mut auto_columns = Vec::new();

    for (i, spec) in specs.iter().enumerate() {
        match *spec {
            ColumnWidth::Points(width) => resolved[i] = width,
            ColumnWidth::Percentage(percent) => resolved[i] = available_width * percent / 100.0,
            ColumnWidth::Auto => {
                auto_columns.push(i);
                continue;
            }
        }
        used += resolved[i];
    }

    let remaining = available_width - used;
    if !auto_columns.is_empty() {
        let content: Vec<f32> = auto_columns
            .iter()
            .map(|&col| estimate_column_content_width(table, col))
            .collect();
        let total_content: f32 = content.iter().sum();

        for (&col, &width) in auto_columns.iter().zip(&content) {
            let share = if remaining <= 0.0 {
                0.0
            } else if total_content > 0.0 {
                remaining * width / total_content
            } else {
                remaining / auto_columns.len() as f32
            };
            resolved[col] = share.max(MIN_COLUMN_WIDTH);
        }
    }

    trace!("Resolved column widths: {:?}", resolved);
    resolved
}

/// Widest content in a column, including padding
fn estimate_column_content_width(table: &Table, col_idx: usize) -> f32 {
    let max_width = table
        .rows
        .iter()
        .filter_map(|row| row.cells.get(col_idx))
        .map(|cell| cell_text_width(table, cell))
        .fold(0.0, f32::max);

    max_width + table.style.padding.horizontal()
}

/// Calculate automatic column widths based on content
fn calculate_column_widths(table: &Table) -> Result<Vec<f32>> {
    let col_count = table.column_count();
    if col_count == 0 {
        return Err(ReportError::InvalidTable("No columns in table".to_string()));
    }

    let widths: Vec<f32> = (0..col_count)
        .map(|col| estimate_column_content_width(table, col).max(MIN_COLUMN_WIDTH))
        .collect();

    trace!("Calculated column widths: {:?}", widths);
    Ok(widths)
}

/// Row heights from the tallest single-line cell in each row
fn calculate_row_heights(table: &Table) -> Vec<f32> {
    let min_height = font_size_to_height(table.style.default_font_size);

    let heights: Vec<f32> = table
        .rows
        .iter()
        .map(|row| {
            row.height.unwrap_or_else(|| {
                let text_height = row
                    .cells
                    .iter()
                    .map(|cell| font_size_to_height(cell.font_size(&table.style)))
                    .fold(0.0, f32::max);
                (text_height + table.style.padding.vertical()).max(min_height)
            })
        })
        .collect();

    trace!("Calculated row heights: {:?}", heights);
    heights
}

fn font_size_to_height(font_size: f32) -> f32 {
    font_size * DEFAULT_LINE_HEIGHT_MULTIPLIER
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Row;

    #[test]
    fn test_layout_calculation() {
        let table = Table::new()
            .add_row(Row::new(vec![
                Cell::new("Window"),
                Cell::new("Frame length (cm)"),
            ]))
            .add_row(Row::new(vec![Cell::new("1"), Cell::new("100.0")]));

        let layout = calculate_layout(&table).unwrap();

        assert_eq!(layout.column_widths.len(), 2);
        assert_eq!(layout.row_heights.len(), 2);
        // 17 chars * 10pt * 0.5 + 10pt padding
        assert_eq!(layout.column_widths[1], 95.0);
        // 10pt * 1.2 + 10pt padding
        assert!((layout.row_heights[0] - 22.0).abs() < 1e-4);
        assert!((layout.total_height - 44.0).abs() < 1e-4);
    }

    #[test]
    fn test_mixed_column_specs_fill_total_width() {
        let table = Table::new()
            .add_row(Row::new(vec![
                Cell::new("#"),
                Cell::new("short"),
                Cell::new("much longer text"),
            ]))
            .with_column_widths(vec![
                ColumnWidth::Points(50.0),
                ColumnWidth::Percentage(25.0),
                ColumnWidth::Auto,
            ])
            .with_total_width(400.0);

        let layout = calculate_layout(&table).unwrap();
        assert_eq!(layout.column_widths[0], 50.0);
        assert_eq!(layout.column_widths[1], 100.0);
        assert_eq!(layout.column_widths[2], 250.0);
        assert_eq!(layout.total_width, 400.0);
    }

    #[test]
    fn test_auto_columns_get_minimum_when_no_room() {
        let table = Table::new()
            .add_row(Row::new(vec![Cell::new("a"), Cell::new("b")]))
            .with_column_widths(vec![ColumnWidth::Points(300.0), ColumnWidth::Auto])
            .with_total_width(200.0);

        let layout = calculate_layout(&table).unwrap();
        assert_eq!(layout.column_widths[1], MIN_COLUMN_WIDTH);
    }

    #[test]
    fn test_explicit_row_height_wins() {
        let table = Table::new().add_row(Row::new(vec![Cell::new("A")]).with_height(40.0));
        let layout = calculate_layout(&table).unwrap();
        assert_eq!(layout.row_heights, vec![40.0]);
    }

    #[test]
    fn test_empty_table_is_rejected() {
        assert!(calculate_layout(&Table::new()).is_err());
    }
}
