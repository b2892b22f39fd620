//! Aluminum window cut-list calculator with PDF export built on lopdf
//!
//! Window openings (length and width in centimeters) are turned into frame
//! and sash cut dimensions by [`calculator::calculate`]. The results can be
//! shown as a plain-text [`CutList`] or exported as a PDF table through
//! [`report`].
//!
//! ```
//! use alu_cutlist::{RawWindowSpec, calculate};
//!
//! let cuts = calculate(&[RawWindowSpec::new(100.0, 60.0)]);
//! assert_eq!(cuts[0].sash_length, 94.0);
//! ```

use lopdf::{Document, ObjectId};
use tracing::{debug, instrument, trace};

pub mod calculator;
pub mod constants;
pub mod document;
mod drawing;
pub mod error;
pub mod font;
pub mod form;
pub mod layout;
pub mod report;
pub mod style;
pub mod table;

pub use calculator::{CalculatedWindow, RawWindowSpec, calculate};
pub use error::{ReportError, Result};
pub use font::{BuiltinMetrics, FontMetrics};
#[cfg(feature = "ttf-parser")]
pub use font::TtfFontMetrics;
pub use form::{Field, WindowForm};
pub use report::{CutList, Labels, ReportConfig};
pub use style::{Alignment, BorderStyle, CellStyle, Color, TableStyle};
pub use table::{Cell, ColumnWidth, Row, Table};

/// Where a paginated table was drawn
#[derive(Debug, Clone)]
pub struct PagedTableResult {
    /// Pages the table touched, in order
    pub page_ids: Vec<ObjectId>,
    pub total_pages: usize,
    /// Position just below the last row drawn
    pub final_position: (f32, f32),
}

/// Extension trait for lopdf::Document to draw tables
pub trait TableDrawing {
    /// Draw a table with its top-left corner at `position` on a single page
    fn draw_table(&mut self, page_id: ObjectId, table: Table, position: (f32, f32)) -> Result<()>;

    /// Draw a table, adding pages after `page_id` as needed
    fn draw_table_with_pagination(
        &mut self,
        page_id: ObjectId,
        table: Table,
        position: (f32, f32),
    ) -> Result<PagedTableResult>;
}

impl TableDrawing for Document {
    #[instrument(skip(self, table), fields(table_rows = table.rows.len()))]
    fn draw_table(&mut self, page_id: ObjectId, table: Table, position: (f32, f32)) -> Result<()> {
        debug!("Drawing table at position {:?}", position);

        let layout = layout::calculate_layout(&table)?;
        trace!("Calculated layout: {:?}", layout);

        let operations = drawing::generate_table_operations(&table, &layout, position);
        drawing::add_operations_to_page(self, page_id, operations)
    }

    #[instrument(skip(self, table), fields(table_rows = table.rows.len()))]
    fn draw_table_with_pagination(
        &mut self,
        page_id: ObjectId,
        table: Table,
        position: (f32, f32),
    ) -> Result<PagedTableResult> {
        let layout = layout::calculate_layout(&table)?;
        trace!("Calculated layout: {:?}", layout);

        drawing::draw_table_paginated(self, page_id, &table, &layout, position)
    }
}
