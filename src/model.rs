use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// One step of an imported protocol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProtocolStep {
    pub id: u32,
    pub title: String,
    pub description: String,
    pub duration: Option<String>,
    pub critical: bool,
    pub notes: Option<String>,
    /// Start day of the step. Negative for pre-experiment prep, range start for `Day 2-4`.
    pub day: i32,
    pub stage: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProtocolCategory {
    CellCulture,
    MolecularBiology,
    ProteinAnalysis,
    #[serde(rename = "NGS")]
    Ngs,
    General,
}

impl ProtocolCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::CellCulture => "Cell Culture",
            Self::MolecularBiology => "Molecular Biology",
            Self::ProteinAnalysis => "Protein Analysis",
            Self::Ngs => "NGS",
            Self::General => "General",
        }
    }
}

impl fmt::Display for ProtocolCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    pub kind: String,
    pub value: f64,
    pub unit: String,
    pub raw_text: String,
}

/// Structured form data produced from one pasted protocol.
///
/// `materials` is never empty: a single empty string stands in when no
/// materials section was found. `steps` is never empty either.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProtocolFormData {
    pub title: String,
    pub description: String,
    pub category: ProtocolCategory,
    pub tags: Vec<String>,
    pub materials: Vec<String>,
    pub safety_notes: String,
    pub estimated_time: String,
    pub steps: Vec<ProtocolStep>,
    pub measurements: Vec<Measurement>,
    pub experiment_id: Option<String>,
    pub date: Option<String>,
    pub researcher: Option<String>,
    /// Note sections keyed by name (`methods`, `results`, `observations`, ...).
    pub sections: BTreeMap<String, String>,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaterialType {
    Plasmid,
    CellLine,
    Antibody,
    Enzyme,
    Media,
    Chemical,
    Other,
}

impl MaterialType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Plasmid => "plasmid",
            Self::CellLine => "cell_line",
            Self::Antibody => "antibody",
            Self::Enzyme => "enzyme",
            Self::Media => "media",
            Self::Chemical => "chemical",
            Self::Other => "other",
        }
    }

    /// Unit used when the source gives an amount without one.
    pub fn default_unit(self) -> &'static str {
        match self {
            Self::Plasmid => "µg",
            Self::CellLine => "vials",
            Self::Antibody => "µL",
            Self::Enzyme => "U",
            Self::Media => "mL",
            Self::Chemical => "g",
            Self::Other => "units",
        }
    }

    pub fn default_storage(self) -> &'static str {
        match self {
            Self::Plasmid | Self::Enzyme => "-20°C",
            Self::CellLine => "Liquid nitrogen",
            Self::Antibody | Self::Media => "4°C",
            Self::Chemical | Self::Other => "Room temperature",
        }
    }

    /// Maps a free-form type label from a spreadsheet column, e.g. `"Cell Line"`.
    pub fn from_label(label: &str) -> Option<Self> {
        let normalized = label
            .trim()
            .to_ascii_lowercase()
            .replace(['-', ' '], "_");

        match normalized.as_str() {
            "plasmid" | "plasmids" | "vector" | "construct" => Some(Self::Plasmid),
            "cell_line" | "cell_lines" | "cells" | "cell" | "line" => Some(Self::CellLine),
            "antibody" | "antibodies" | "ab" => Some(Self::Antibody),
            "enzyme" | "enzymes" => Some(Self::Enzyme),
            "media" | "medium" | "culture_media" => Some(Self::Media),
            "chemical" | "chemicals" | "reagent" | "buffer" => Some(Self::Chemical),
            "other" => Some(Self::Other),
            _ => None,
        }
    }
}

impl fmt::Display for MaterialType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialPlacement {
    pub material_id: String,
    pub material_name: String,
    pub material_type: MaterialType,
    pub position: String,
    pub amount: f64,
    pub unit: String,
    /// Default storage condition for the material type.
    pub storage: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectedMaterial {
    pub position: String,
    pub text: String,
    pub confidence: f64,
    pub parsed_material: Option<MaterialPlacement>,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Layout {
    Grid,
    Tabular,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseResult {
    pub detected_materials: Vec<DetectedMaterial>,
    pub processing_time: f64,
    pub total_detected: usize,
    pub successful_parsed: usize,
    pub layout: Layout,
}

impl ParseResult {
    pub fn new(
        layout: Layout,
        detected_materials: Vec<DetectedMaterial>,
        processing_time: f64,
    ) -> Self {
        let successful_parsed = detected_materials
            .iter()
            .filter(|material| material.parsed_material.is_some())
            .count();

        Self {
            total_detected: detected_materials.len(),
            successful_parsed,
            detected_materials,
            processing_time,
            layout,
        }
    }

    /// Drops records below `min_confidence` and recomputes the counts.
    pub fn retain_confident(self, min_confidence: f64) -> Self {
        let kept = self
            .detected_materials
            .into_iter()
            .filter(|material| material.confidence >= min_confidence)
            .collect();
        Self::new(self.layout, kept, self.processing_time)
    }
}

/// One cell of a pasted or imported table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum CellValue {
    #[default]
    Empty,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl CellValue {
    /// Builds a cell from raw text, treating blank text as an empty cell.
    pub fn from_raw(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            Self::Empty
        } else {
            Self::Text(trimmed.to_string())
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Text(text) => text.trim().is_empty(),
            Self::Bool(_) | Self::Number(_) => false,
        }
    }

    pub fn text(&self) -> String {
        match self {
            Self::Empty => String::new(),
            Self::Bool(value) => value.to_string(),
            Self::Number(value) if value.fract() == 0.0 && value.abs() < 1e15 => {
                format!("{}", *value as i64)
            }
            Self::Number(value) => value.to_string(),
            Self::Text(text) => text.trim().to_string(),
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(value) => Some(*value),
            Self::Text(text) => text.trim().parse::<f64>().ok(),
            Self::Empty | Self::Bool(_) => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Number(value) if value.fract() == 0.0 => Some(*value as i64),
            Self::Text(text) => text.trim().parse::<i64>().ok(),
            _ => None,
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        Self::from_raw(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        Self::Number(value as f64)
    }
}
