//! PDF content generation for tables and report text

use crate::PagedTableResult;
use crate::Result;
use crate::constants::{A4_HEIGHT, A4_WIDTH, FONT_BOLD, FONT_REGULAR};
use crate::error::ReportError;
use crate::font::FontMetrics;
use crate::layout::{self, TableLayout};
use crate::style::{Alignment, BorderStyle, Color};
use crate::table::{Cell, Table};
use lopdf::{
    Document, Object, ObjectId, StringFormat,
    content::{Content, Operation},
    dictionary,
};
use tracing::{debug, trace};

/// A single line of text to place on a page
#[derive(Debug, Clone, Copy)]
pub struct TextLine<'a> {
    pub text: &'a str,
    pub font_resource: &'a str,
    pub font_size: f32,
    pub color: Color,
    /// Baseline origin
    pub x: f32,
    pub y: f32,
}

/// Operations that show one line of text
pub fn text_line_operations(line: &TextLine<'_>, metrics: &dyn FontMetrics) -> Vec<Operation> {
    if line.text.is_empty() {
        return Vec::new();
    }

    let format = if metrics.is_embedded() {
        StringFormat::Hexadecimal
    } else {
        StringFormat::Literal
    };

    vec![
        Operation::new("BT", vec![]),
        Operation::new(
            "Tf",
            vec![
                Object::Name(line.font_resource.as_bytes().to_vec()),
                line.font_size.into(),
            ],
        ),
        Operation::new(
            "rg",
            vec![line.color.r.into(), line.color.g.into(), line.color.b.into()],
        ),
        Operation::new("Td", vec![line.x.into(), line.y.into()]),
        Operation::new(
            "Tj",
            vec![Object::String(metrics.encode_text(line.text), format)],
        ),
        Operation::new("ET", vec![]),
    ]
}

fn rectangle_fill(x: f32, y: f32, width: f32, height: f32, color: Color) -> Vec<Operation> {
    vec![
        Operation::new("rg", vec![color.r.into(), color.g.into(), color.b.into()]),
        Operation::new(
            "re",
            vec![x.into(), y.into(), width.into(), height.into()],
        ),
        Operation::new("f", vec![]),
    ]
}

fn line_segment(from: (f32, f32), to: (f32, f32)) -> Vec<Operation> {
    vec![
        Operation::new("m", vec![from.0.into(), from.1.into()]),
        Operation::new("l", vec![to.0.into(), to.1.into()]),
        Operation::new("S", vec![]),
    ]
}

/// Resource name of the font a cell is drawn with
fn cell_font_resource<'a>(table: &'a Table, cell: &Cell) -> &'a str {
    match table.style.embedded_font_resource_name {
        Some(ref name) if layout::metrics(table).is_embedded() => name.as_str(),
        _ if cell.is_bold() => FONT_BOLD,
        _ => FONT_REGULAR,
    }
}

/// Text operations for a cell whose top-left corner is at (x, y)
fn cell_text_operations(
    table: &Table,
    cell: &Cell,
    x: f32,
    y: f32,
    width: f32,
    height: f32,
) -> Vec<Operation> {
    let metrics = layout::metrics(table);
    let font_size = cell.font_size(&table.style);
    let padding = &table.style.padding;
    let (alignment, color) = cell
        .style
        .as_ref()
        .map(|s| (s.alignment, s.text_color))
        .unwrap_or((Alignment::Left, Color::black()));

    let text_width = metrics.text_width(&cell.content, font_size);
    let text_x = match alignment {
        Alignment::Left => x + padding.left,
        Alignment::Center => x + (width - text_width) / 2.0,
        Alignment::Right => x + width - padding.right - text_width,
    };
    // Vertically centered, treating the glyph box as roughly 0.7 of the size
    let text_y = y - height / 2.0 - font_size * 0.35;

    text_line_operations(
        &TextLine {
            text: &cell.content,
            font_resource: cell_font_resource(table, cell),
            font_size,
            color,
            x: text_x,
            y: text_y,
        },
        metrics,
    )
}

/// Operations drawing the given rows stacked downward from `position`
fn rows_operations(
    table: &Table,
    layout: &TableLayout,
    row_indices: &[usize],
    position: (f32, f32),
) -> Vec<Operation> {
    let (start_x, start_y) = position;
    let mut operations = Vec::new();
    let mut current_y = start_y;

    for &row_idx in row_indices {
        let row = &table.rows[row_idx];
        let row_height = layout.row_heights[row_idx];

        let mut current_x = start_x;
        for (cell, &cell_width) in row.cells.iter().zip(&layout.column_widths) {
            if let Some(bg_color) = cell.style.as_ref().and_then(|s| s.background_color) {
                operations.extend(rectangle_fill(
                    current_x,
                    current_y - row_height,
                    cell_width,
                    row_height,
                    bg_color,
                ));
            }

            operations.extend(cell_text_operations(
                table, cell, current_x, current_y, cell_width, row_height,
            ));
            current_x += cell_width;
        }

        current_y -= row_height;
    }

    operations.extend(border_operations(table, layout, row_indices, position));
    operations
}

/// Outer border plus row and column separators for a run of rows
fn border_operations(
    table: &Table,
    layout: &TableLayout,
    row_indices: &[usize],
    position: (f32, f32),
) -> Vec<Operation> {
    if table.style.border_style == BorderStyle::None || row_indices.is_empty() {
        return Vec::new();
    }

    let (start_x, start_y) = position;
    let end_x = start_x + layout.total_width;
    let height: f32 = row_indices.iter().map(|&i| layout.row_heights[i]).sum();
    let color = table.style.border_color;

    let mut operations = vec![
        Operation::new("RG", vec![color.r.into(), color.g.into(), color.b.into()]),
        Operation::new("w", vec![table.style.border_width.into()]),
        Operation::new(
            "re",
            vec![
                start_x.into(),
                (start_y - height).into(),
                layout.total_width.into(),
                height.into(),
            ],
        ),
        Operation::new("S", vec![]),
    ];

    let mut current_y = start_y;
    for (idx, &row_idx) in row_indices.iter().enumerate() {
        if idx > 0 {
            operations.extend(line_segment((start_x, current_y), (end_x, current_y)));
        }
        current_y -= layout.row_heights[row_idx];
    }

    let mut current_x = start_x;
    for (col_idx, width) in layout.column_widths.iter().enumerate() {
        if col_idx > 0 {
            operations.extend(line_segment(
                (current_x, start_y),
                (current_x, start_y - height),
            ));
        }
        current_x += width;
    }

    operations
}

/// Generate operations for the whole table on a single page
pub fn generate_table_operations(
    table: &Table,
    layout: &TableLayout,
    position: (f32, f32),
) -> Vec<Operation> {
    debug!(
        "Generating operations for table at ({}, {})",
        position.0, position.1
    );

    let all_rows: Vec<usize> = (0..table.rows.len()).collect();
    let operations = rows_operations(table, layout, &all_rows, position);

    trace!("Generated {} operations", operations.len());
    operations
}

/// Append operations to a page's content
pub fn add_operations_to_page(
    doc: &mut Document,
    page_id: ObjectId,
    operations: Vec<Operation>,
) -> Result<()> {
    debug!(
        "Adding {} operations to page {:?}",
        operations.len(),
        page_id
    );

    if !matches!(doc.get_object(page_id), Ok(Object::Dictionary(_))) {
        return Err(ReportError::PageNotFound(page_id));
    }

    let content = Content { operations };
    let content_bytes = content.encode()?;
    doc.add_page_contents(page_id, content_bytes)?;

    Ok(())
}

/// Draw a table, continuing on new pages when rows pass the bottom margin.
///
/// Continuation pages start at `page_height - top_margin` and repeat the
/// header rows when `repeat_headers` is set. Each page carries at least one
/// body row, so a row taller than the page still gets drawn.
pub fn draw_table_paginated(
    doc: &mut Document,
    start_page_id: ObjectId,
    table: &Table,
    layout: &TableLayout,
    position: (f32, f32),
) -> Result<PagedTableResult> {
    debug!(
        "Drawing paginated table with {} rows, {} header rows",
        table.rows.len(),
        table.header_rows
    );

    let (start_x, start_y) = position;
    let continuation_y = table.style.page_height - table.style.top_margin;
    let bottom_margin = table.style.bottom_margin;

    let mut page_ids = vec![start_page_id];
    let mut current_page_id = start_page_id;
    let mut page_top = start_y;
    let mut current_y = start_y;
    let mut rows_on_page: Vec<usize> = Vec::new();
    let mut body_rows_on_page = 0;

    for (row_idx, &row_height) in layout.row_heights.iter().enumerate() {
        let is_header = row_idx < table.header_rows;

        if !is_header && body_rows_on_page > 0 && current_y - row_height < bottom_margin {
            add_operations_to_page(
                doc,
                current_page_id,
                rows_operations(table, layout, &rows_on_page, (start_x, page_top)),
            )?;

            current_page_id = create_new_page(doc, current_page_id)?;
            page_ids.push(current_page_id);

            page_top = continuation_y;
            current_y = continuation_y;
            rows_on_page.clear();
            body_rows_on_page = 0;

            if table.style.repeat_headers {
                for header_idx in 0..table.header_rows {
                    rows_on_page.push(header_idx);
                    current_y -= layout.row_heights[header_idx];
                }
            }
        }

        rows_on_page.push(row_idx);
        current_y -= row_height;
        if !is_header {
            body_rows_on_page += 1;
        }
    }

    if !rows_on_page.is_empty() {
        add_operations_to_page(
            doc,
            current_page_id,
            rows_operations(table, layout, &rows_on_page, (start_x, page_top)),
        )?;
    }

    Ok(PagedTableResult {
        total_pages: page_ids.len(),
        page_ids,
        final_position: (start_x, current_y),
    })
}

/// Create a page after `source_page_id` sharing its MediaBox and Resources
fn create_new_page(doc: &mut Document, source_page_id: ObjectId) -> Result<ObjectId> {
    debug!("Creating new page for table continuation");

    let Ok(Object::Dictionary(source)) = doc.get_object(source_page_id) else {
        return Err(ReportError::PageNotFound(source_page_id));
    };
    let Ok(Object::Reference(pages_id)) = source.get(b"Parent") else {
        return Err(ReportError::DrawingError(
            "Could not find parent Pages object".to_string(),
        ));
    };
    let pages_id = *pages_id;
    let media_box = source.get(b"MediaBox").ok().cloned();
    let resources = source.get(b"Resources").ok().cloned();

    let mut new_page = dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
    };
    new_page.set(
        "MediaBox",
        media_box.unwrap_or_else(|| {
            Object::Array(vec![0.into(), 0.into(), A4_WIDTH.into(), A4_HEIGHT.into()])
        }),
    );
    if let Some(resources) = resources {
        new_page.set("Resources", resources);
    }

    let new_page_id = doc.add_object(new_page);

    if let Ok(Object::Dictionary(pages)) = doc.get_object_mut(pages_id) {
        if let Ok(Object::Array(kids)) = pages.get_mut(b"Kids") {
            kids.push(new_page_id.into());
        }
        let count = match pages.get(b"Count") {
            Ok(Object::Integer(count)) => *count,
            _ => 0,
        };
        pages.set("Count", Object::Integer(count + 1));
    }

    trace!("Created new page {:?}", new_page_id);
    Ok(new_page_id)
}
