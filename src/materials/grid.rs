use uuid::Uuid;

use super::layout::row_letter;
use super::material_type::{
    DEFAULT_MATERIAL_TYPE, classify_material_type, parse_passage, parse_quantity,
};
use crate::model::{CellValue, DetectedMaterial, MaterialPlacement};

pub const GRID_CONFIDENCE: f64 = 0.90;
const UNLABELED_ROW_CONFIDENCE: f64 = 0.60;

/// Reads a row-letter by column-number box. Every non-empty cell right of
/// the label column becomes one record. A row without a letter label has no
/// label column, so its first cell is a record too.
pub fn parse_grid(cells: &[Vec<CellValue>]) -> Vec<DetectedMaterial> {
    let Some(header) = cells.first() else {
        return Vec::new();
    };
    let mut detected = Vec::<DetectedMaterial>::new();

    for (row_index, row) in cells.iter().enumerate().skip(1) {
        let letter = row.first().and_then(row_letter);

        let first_content_column = usize::from(letter.is_some());

        for (column_index, cell) in row.iter().enumerate().skip(first_content_column) {
            if cell.is_empty() {
                continue;
            }

            let mut warnings = Vec::<String>::new();
            let column = match header.get(column_index).and_then(CellValue::as_integer) {
                Some(value) => value,
                None => {
                    warnings.push(format!(
                        "column header is not a number; using column {column_index}"
                    ));
                    column_index as i64
                }
            };

            let (position, confidence) = match letter {
                Some(letter) => (format!("{letter}{column}"), GRID_CONFIDENCE),
                None => {
                    warnings.push(format!(
                        "row {row_index} has no single-letter label; position is synthetic"
                    ));
                    (format!("ROW{row_index}-{column}"), UNLABELED_ROW_CONFIDENCE)
                }
            };

            detected.push(grid_cell_material(position, cell.text(), confidence, warnings));
        }
    }

    detected
}

fn grid_cell_material(
    position: String,
    text: String,
    confidence: f64,
    mut warnings: Vec<String>,
) -> DetectedMaterial {
    let material_type = classify_material_type(&text).unwrap_or_else(|| {
        warnings.push(format!(
            "material type not recognised; defaulted to {DEFAULT_MATERIAL_TYPE}"
        ));
        DEFAULT_MATERIAL_TYPE
    });

    let default_unit = material_type.default_unit().to_string();
    let (amount, unit) = parse_quantity(&text)
        .or_else(|| parse_passage(&text).map(|passage| (passage, default_unit.clone())))
        .unwrap_or((1.0, default_unit));

    DetectedMaterial {
        parsed_material: Some(MaterialPlacement {
            material_id: Uuid::new_v4().to_string(),
            material_name: text.clone(),
            material_type,
            position: position.clone(),
            amount,
            unit,
            storage: material_type.default_storage().to_string(),
        }),
        position,
        text,
        confidence,
        warnings,
    }
}
