use crate::model::{CellValue, Layout};

/// Grid iff the header row carries a numeric column index and some later
/// row starts with a single-letter row label. Anything else is tabular.
pub fn detect_layout(cells: &[Vec<CellValue>]) -> Layout {
    let Some(header) = cells.first() else {
        return Layout::Tabular;
    };

    let has_column_index = header.iter().any(|cell| cell.as_integer().is_some());
    let has_row_label = cells
        .iter()
        .skip(1)
        .any(|row| row.first().and_then(row_letter).is_some());

    if has_column_index && has_row_label {
        Layout::Grid
    } else {
        Layout::Tabular
    }
}

/// Uppercased row label when the cell holds exactly one ASCII letter.
pub fn row_letter(cell: &CellValue) -> Option<char> {
    let text = cell.text();
    let mut chars = text.chars();
    match (chars.next(), chars.next()) {
        (Some(letter), None) if letter.is_ascii_alphabetic() => Some(letter.to_ascii_uppercase()),
        _ => None,
    }
}
