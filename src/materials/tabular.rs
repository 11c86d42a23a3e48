use std::sync::LazyLock;

use regex::Regex;
use uuid::Uuid;

use super::material_type::{
    DEFAULT_MATERIAL_TYPE, classify_material_type, normalize_unit, parse_quantity,
};
use crate::model::{CellValue, DetectedMaterial, MaterialPlacement, MaterialType};

pub const NAMED_CONFIDENCE: f64 = 0.90;
pub const UNNAMED_CONFIDENCE: f64 = 0.60;
pub const UNKNOWN_MATERIAL: &str = "Unknown Material";

static COORDINATE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(?:(?P<letter>[A-Z])\s*(?P<digits>\d{1,3})|(?P<digits_first>\d{1,3})\s*(?P<letter_last>[A-Z]))$",
    )
    .expect("valid coordinate regex")
});

static LEADING_NUMBER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?P<number>\d+(?:\.\d+)?)").expect("valid leading number regex")
});

static TRAILING_UNIT_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?P<unit>[A-Za-zµμ]+)\s*$").expect("valid trailing unit regex")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnRole {
    Position,
    Type,
    Unit,
    Amount,
    Name,
}

/// Checked in this order so `Material Type` is a type column and `Volume
/// unit` a unit column. Keywords match the start of any header word.
const ROLE_KEYWORDS: &[(ColumnRole, &[&str])] = &[
    (
        ColumnRole::Position,
        &[
            "position", "pos", "slot", "well", "tube", "loc", "grid", "coordinate",
        ],
    ),
    (ColumnRole::Type, &["type", "category", "class", "kind"]),
    (ColumnRole::Unit, &["unit", "units", "measurement"]),
    (
        ColumnRole::Amount,
        &[
            "amount", "quantity", "qty", "stock", "vol", "mass", "conc", "count",
        ],
    ),
    (
        ColumnRole::Name,
        &[
            "name", "material", "item", "product", "reagent", "clone", "construct", "sample",
            "id",
        ],
    ),
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ColumnRoles {
    pub position: Option<usize>,
    pub name: Option<usize>,
    pub material_type: Option<usize>,
    pub amount: Option<usize>,
    pub unit: Option<usize>,
}

impl ColumnRoles {
    fn slot(&mut self, role: ColumnRole) -> &mut Option<usize> {
        match role {
            ColumnRole::Position => &mut self.position,
            ColumnRole::Type => &mut self.material_type,
            ColumnRole::Unit => &mut self.unit,
            ColumnRole::Amount => &mut self.amount,
            ColumnRole::Name => &mut self.name,
        }
    }

    fn assigned(&self) -> [Option<usize>; 5] {
        [
            self.position,
            self.name,
            self.material_type,
            self.amount,
            self.unit,
        ]
    }
}

/// Assigns each header column at most one role; each role takes the first
/// column that matches it.
pub fn locate_columns(header: &[CellValue]) -> ColumnRoles {
    let mut roles = ColumnRoles::default();

    for (index, cell) in header.iter().enumerate() {
        let lowered = cell.text().to_lowercase();
        let words = lowered
            .split(|ch: char| !ch.is_alphanumeric())
            .filter(|word| !word.is_empty())
            .collect::<Vec<&str>>();

        for (role, keywords) in ROLE_KEYWORDS {
            let matches = words
                .iter()
                .any(|word| keywords.iter().any(|keyword| word.starts_with(keyword)));
            let slot = roles.slot(*role);
            if matches && slot.is_none() {
                *slot = Some(index);
                break;
            }
        }
    }

    roles
}

/// Reads a named-column table, one record per non-empty data row.
pub fn parse_tabular(cells: &[Vec<CellValue>]) -> Vec<DetectedMaterial> {
    let Some(header) = cells.first() else {
        return Vec::new();
    };
    let roles = locate_columns(header);

    cells
        .iter()
        .enumerate()
        .skip(1)
        .filter(|(_, row)| row.iter().any(|cell| !cell.is_empty()))
        .map(|(row_number, row)| parse_row(row, row_number, &roles))
        .collect()
}

fn parse_row(row: &[CellValue], row_number: usize, roles: &ColumnRoles) -> DetectedMaterial {
    let mut warnings = Vec::<String>::new();

    let (position, position_column) = match roles.position {
        Some(column) => (
            cell_text(row, column).map(|text| normalize_coordinate(&text).unwrap_or(text)),
            Some(column),
        ),
        None => match find_coordinate(row, roles) {
            Some((column, coordinate)) => (Some(coordinate), Some(column)),
            None => (None, None),
        },
    };
    let position = position.unwrap_or_else(|| {
        warnings.push(format!("no position found; assigned ROW{row_number}"));
        format!("ROW{row_number}")
    });

    let name = match roles.name {
        Some(column) => cell_text(row, column),
        None => first_name_like_cell(row, roles, position_column),
    };

    let type_label = roles.material_type.and_then(|column| cell_text(row, column));
    let labelled_type = type_label.as_deref().and_then(|label| {
        let parsed = MaterialType::from_label(label);
        if parsed.is_none() {
            warnings.push(format!("unrecognised type label '{label}'"));
        }
        parsed
    });

    let text = row
        .iter()
        .filter(|cell| !cell.is_empty())
        .map(CellValue::text)
        .collect::<Vec<String>>()
        .join(" | ");

    if name.is_none() && labelled_type.is_none() {
        warnings.push("no material name or type found".to_string());
        return DetectedMaterial {
            position,
            text,
            confidence: UNNAMED_CONFIDENCE,
            parsed_material: None,
            warnings,
        };
    }

    let confidence = if name.is_some() {
        NAMED_CONFIDENCE
    } else {
        warnings.push(format!("no material name found; using '{UNKNOWN_MATERIAL}'"));
        UNNAMED_CONFIDENCE
    };
    let material_name = name.unwrap_or_else(|| UNKNOWN_MATERIAL.to_string());

    let material_type = labelled_type
        .or_else(|| classify_material_type(&material_name))
        .unwrap_or(DEFAULT_MATERIAL_TYPE);

    let (amount, unit) = amount_and_unit(row, roles, &material_name, material_type);

    DetectedMaterial {
        parsed_material: Some(MaterialPlacement {
            material_id: Uuid::new_v4().to_string(),
            material_name,
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

fn amount_and_unit(
    row: &[CellValue],
    roles: &ColumnRoles,
    material_name: &str,
    material_type: MaterialType,
) -> (f64, String) {
    let mut amount = None;
    let mut unit = None;

    match roles.amount.and_then(|column| row.get(column)) {
        Some(CellValue::Number(value)) => amount = Some(*value),
        Some(cell) if !cell.is_empty() => {
            let text = cell.text();
            amount = LEADING_NUMBER_REGEX
                .captures(&text)
                .and_then(|captures| captures.name("number"))
                .and_then(|value| value.as_str().parse::<f64>().ok());
            if amount.is_some() {
                unit = TRAILING_UNIT_REGEX
                    .captures(&text)
                    .and_then(|captures| captures.name("unit"))
                    .map(|value| normalize_unit(value.as_str()));
            }
        }
        _ => {
            if let Some((parsed_amount, parsed_unit)) = parse_quantity(material_name) {
                amount = Some(parsed_amount);
                unit = Some(parsed_unit);
            }
        }
    }

    if let Some(explicit) = roles.unit.and_then(|column| cell_text(row, column)) {
        unit = Some(normalize_unit(&explicit));
    }

    (
        amount.unwrap_or(1.0),
        unit.unwrap_or_else(|| material_type.default_unit().to_string()),
    )
}

fn cell_text(row: &[CellValue], column: usize) -> Option<String> {
    row.get(column)
        .filter(|cell| !cell.is_empty())
        .map(CellValue::text)
}

/// Looks for a cell shaped like `A1` or `1A` outside the named columns.
fn find_coordinate(row: &[CellValue], roles: &ColumnRoles) -> Option<(usize, String)> {
    let assigned = roles.assigned();
    row.iter().enumerate().find_map(|(column, cell)| {
        if assigned.contains(&Some(column)) {
            return None;
        }
        normalize_coordinate(&cell.text()).map(|coordinate| (column, coordinate))
    })
}

/// Canonical `A1` form of a coordinate token, if the text is one.
pub fn normalize_coordinate(text: &str) -> Option<String> {
    let captures = COORDINATE_REGEX.captures(text.trim())?;
    let letter = captures
        .name("letter")
        .or_else(|| captures.name("letter_last"))?
        .as_str()
        .to_ascii_uppercase();
    let digits = captures
        .name("digits")
        .or_else(|| captures.name("digits_first"))?
        .as_str()
        .trim_start_matches('0');
    let digits = if digits.is_empty() { "0" } else { digits };
    Some(format!("{letter}{digits}"))
}

fn first_name_like_cell(
    row: &[CellValue],
    roles: &ColumnRoles,
    position_column: Option<usize>,
) -> Option<String> {
    let assigned = roles.assigned();
    row.iter()
        .enumerate()
        .filter(|(column, _)| {
            Some(*column) != position_column && !assigned.contains(&Some(*column))
        })
        .map(|(_, cell)| cell)
        .find(|cell| !cell.is_empty() && cell.as_number().is_none())
        .map(CellValue::text)
}
