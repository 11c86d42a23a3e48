//! Material placements from a 2-D cell matrix.
//!
//! A storage-box grid (`A1`, `B2`, ...) and a named-column table are read by
//! different strategies; [`detect_layout`] picks one unless the caller forces it.

use std::time::Instant;

use tracing::debug;

use crate::error::InputError;
use crate::model::{CellValue, Layout, ParseResult};

mod grid;
mod layout;
mod material_type;
mod sources;
mod tabular;

pub use grid::parse_grid;
pub use layout::{detect_layout, row_letter};
pub use material_type::{
    DEFAULT_MATERIAL_TYPE, classify_material_type, normalize_unit, parse_passage, parse_quantity,
};
pub use sources::{read_cells_file, read_delimited, read_spreadsheet, split_pasted_text};
pub use tabular::{ColumnRoles, locate_columns, normalize_coordinate, parse_tabular};

/// Parses a cell matrix, choosing the layout automatically.
pub fn parse(cells: &[Vec<CellValue>]) -> Result<ParseResult, InputError> {
    parse_with_layout(cells, None)
}

/// Parses a cell matrix. `forced` skips layout detection.
///
/// Fails only when the matrix holds no value at all.
pub fn parse_with_layout(
    cells: &[Vec<CellValue>],
    forced: Option<Layout>,
) -> Result<ParseResult, InputError> {
    let started = Instant::now();

    if cells.iter().all(|row| row.iter().all(CellValue::is_empty)) {
        return Err(InputError::EmptyMatrix);
    }

    let layout = forced.unwrap_or_else(|| detect_layout(cells));
    debug!(?layout, rows = cells.len(), forced = forced.is_some(), "parsing cell matrix");

    let detected = match layout {
        Layout::Grid => parse_grid(cells),
        Layout::Tabular => parse_tabular(cells),
    };

    Ok(ParseResult::new(
        layout,
        detected,
        started.elapsed().as_secs_f64(),
    ))
}
