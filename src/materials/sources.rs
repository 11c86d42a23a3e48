use std::fs;
use std::path::Path;

use calamine::{Data, Reader, open_workbook_auto};

use super::layout::row_letter;
use crate::error::InputError;
use crate::model::CellValue;

const SPREADSHEET_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xlsb", "xls", "ods"];

/// Reads a cell matrix from a spreadsheet, csv/tsv, pasted text or JSON
/// file, chosen by extension.
pub fn read_cells_file(path: &Path) -> Result<Vec<Vec<CellValue>>, InputError> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    match extension.as_str() {
        ext if SPREADSHEET_EXTENSIONS.contains(&ext) => read_spreadsheet(path),
        "csv" => read_delimited(path, b','),
        "tsv" => read_delimited(path, b'\t'),
        "txt" => read_text(path).map(|text| split_pasted_text(&text)),
        "json" => {
            let text = read_text(path)?;
            serde_json::from_str(&text).map_err(|source| InputError::Json {
                path: path.to_path_buf(),
                source,
            })
        }
        _ => Err(InputError::UnsupportedFormat {
            path: path.to_path_buf(),
        }),
    }
}

/// First worksheet of a workbook, header row at index 0.
pub fn read_spreadsheet(path: &Path) -> Result<Vec<Vec<CellValue>>, InputError> {
    let mut workbook = open_workbook_auto(path).map_err(|source| InputError::Spreadsheet {
        path: path.to_path_buf(),
        source,
    })?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| InputError::NoWorksheet {
            path: path.to_path_buf(),
        })?
        .map_err(|source| InputError::Spreadsheet {
            path: path.to_path_buf(),
            source,
        })?;

    Ok(range
        .rows()
        .map(|row| row.iter().map(cell_from_data).collect())
        .collect())
}

/// Quoted fields may hold the delimiter. Rows may differ in length.
pub fn read_delimited(path: &Path, delimiter: u8) -> Result<Vec<Vec<CellValue>>, InputError> {
    let text = read_text(path)?;
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .has_headers(false)
        .from_reader(text.as_bytes());

    reader
        .records()
        .map(|record| {
            record
                .map(|record| record.iter().map(CellValue::from_raw).collect())
                .map_err(|source| InputError::Delimited {
                    path: path.to_path_buf(),
                    source,
                })
        })
        .collect()
}

fn read_text(path: &Path) -> Result<String, InputError> {
    fs::read_to_string(path).map_err(|source| InputError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn cell_from_data(data: &Data) -> CellValue {
    match data {
        Data::Empty => CellValue::Empty,
        Data::Int(value) => CellValue::Number(*value as f64),
        Data::Float(value) => CellValue::Number(*value),
        Data::Bool(value) => CellValue::Bool(*value),
        Data::String(value) => CellValue::from_raw(value),
        other => CellValue::from_raw(&other.to_string()),
    }
}

/// Splits clipboard text into rows, then each row on tab, else comma, else
/// whitespace.
pub fn split_pasted_text(text: &str) -> Vec<Vec<CellValue>> {
    let mut rows = text
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(split_pasted_line)
        .collect::<Vec<Vec<CellValue>>>();

    restore_grid_corner(&mut rows);
    rows
}

fn split_pasted_line(line: &str) -> Vec<CellValue> {
    let line = line.trim_end_matches('\r');
    let cells = if line.contains('\t') {
        line.split('\t').collect::<Vec<&str>>()
    } else if line.contains(',') {
        line.split(',').collect::<Vec<&str>>()
    } else {
        line.split_whitespace().collect::<Vec<&str>>()
    };

    cells.into_iter().map(CellValue::from_raw).collect()
}

/// Whitespace splitting loses the empty top-left cell of a pasted box, which
/// shifts every column header one place left. Put it back when the header
/// is all column numbers and one cell shorter than the labelled rows.
fn restore_grid_corner(rows: &mut [Vec<CellValue>]) {
    let Some((header, body)) = rows.split_first_mut() else {
        return;
    };

    let header_is_numeric =
        !header.is_empty() && header.iter().all(|cell| cell.as_integer().is_some());
    let widest = body.iter().map(Vec::len).max().unwrap_or(0);
    let labelled = body
        .iter()
        .any(|row| row.first().and_then(row_letter).is_some());

    if header_is_numeric && labelled && header.len() + 1 == widest {
        header.insert(0, CellValue::Empty);
    }
}
