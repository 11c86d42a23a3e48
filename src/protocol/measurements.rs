use std::sync::LazyLock;

use regex::Regex;

use crate::model::Measurement;

struct MeasurementPattern {
    kind: &'static str,
    unit: &'static str,
    regex: Regex,
}

static MEASUREMENT_PATTERNS: LazyLock<Vec<MeasurementPattern>> = LazyLock::new(|| {
    [
        (
            "temperature",
            "°C",
            r"(?i)(?P<value>-?\b\d+(?:\.\d+)?)\s*(?:°\s*C?|degrees?\s*(?:C\b|celsius\b)?|C\b)",
        ),
        ("pH", "", r"\bpH\s*:?\s*(?P<value>\d+(?:\.\d+)?)"),
        (
            "volume",
            "mL",
            r"(?i)\b(?P<value>\d+(?:\.\d+)?)\s*(?:ml|milliliters?)\b",
        ),
        ("mass", "g", r"(?i)\b(?P<value>\d+(?:\.\d+)?)\s*(?:g|grams?)\b"),
        (
            "time",
            "min",
            r"(?i)\b(?P<value>\d+(?:\.\d+)?)\s*(?:min|mins|minutes?)\b",
        ),
        (
            "time",
            "hr",
            r"(?i)\b(?P<value>\d+(?:\.\d+)?)\s*(?:hr|hrs|hours?)\b",
        ),
        // Case-sensitive so `10 m` or `10 mM` never reads as molar.
        ("concentration", "M", r"\b(?P<value>\d+(?:\.\d+)?)\s*M\b"),
        (
            "percentage",
            "%",
            r"(?i)\b(?P<value>\d+(?:\.\d+)?)\s*(?:%|percent\b)",
        ),
    ]
    .into_iter()
    .map(|(kind, unit, pattern)| MeasurementPattern {
        kind,
        unit,
        regex: Regex::new(pattern).expect("valid measurement regex"),
    })
    .collect()
});

/// Numeric measurements anywhere in the text, grouped by pattern then in text order.
pub fn extract_measurements(text: &str) -> Vec<Measurement> {
    let mut measurements = Vec::<Measurement>::new();

    for pattern in MEASUREMENT_PATTERNS.iter() {
        for captures in pattern.regex.captures_iter(text) {
            let (Some(whole), Some(value)) = (captures.get(0), captures.name("value")) else {
                continue;
            };
            let Ok(value) = value.as_str().parse::<f64>() else {
                continue;
            };

            measurements.push(Measurement {
                kind: pattern.kind.to_string(),
                value,
                unit: pattern.unit.to_string(),
                raw_text: whole.as_str().trim().to_string(),
            });
        }
    }

    measurements
}
