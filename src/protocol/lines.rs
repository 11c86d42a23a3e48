use std::sync::LazyLock;

use regex::Regex;

pub(crate) static DAY_HEADER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(?:days?\s*(?P<day>-?\d+)(?:\s*[-–]\s*(?P<end>\d+))?|d(?P<short>-?\d+)|(?P<ordinal>\d+)(?:st|nd|rd|th)\s+day|after\s+(?P<after>\d+)\s+days?)\b",
    )
    .expect("valid day header regex")
});

static NUMBERED_STEP_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:step\s*)?(?P<marker>\d+)(?:[.)]|\s*:)\s+(?P<body>.+)$")
        .expect("valid numbered step regex")
});

static BULLETED_STEP_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:[-*]\s+|[•▪‣◦]\s*)(?P<body>.+)$").expect("valid bulleted step regex")
});

static SECTION_HEADER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<head>[A-Za-z][A-Za-z /&]*?)\s*(?::\s*(?P<rest>.*))?$")
        .expect("valid section header regex")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    Materials,
    Safety,
    Description,
    /// `Procedure:`, `Steps:` and friends. Closes whatever section was open.
    Procedure,
}

const SECTION_VOCABULARY: &[(&str, SectionKind)] = &[
    ("materials", SectionKind::Materials),
    ("material", SectionKind::Materials),
    ("materials and reagents", SectionKind::Materials),
    ("materials and equipment", SectionKind::Materials),
    ("reagents", SectionKind::Materials),
    ("reagent", SectionKind::Materials),
    ("reagents and equipment", SectionKind::Materials),
    ("equipment", SectionKind::Materials),
    ("supplies", SectionKind::Materials),
    ("you will need", SectionKind::Materials),
    ("required", SectionKind::Materials),
    ("required materials", SectionKind::Materials),
    ("safety", SectionKind::Safety),
    ("safety notes", SectionKind::Safety),
    ("safety precautions", SectionKind::Safety),
    ("caution", SectionKind::Safety),
    ("warning", SectionKind::Safety),
    ("warnings", SectionKind::Safety),
    ("description", SectionKind::Description),
    ("summary", SectionKind::Description),
    ("overview", SectionKind::Description),
    ("purpose", SectionKind::Description),
    ("procedure", SectionKind::Procedure),
    ("steps", SectionKind::Procedure),
    ("method", SectionKind::Procedure),
    ("methods", SectionKind::Procedure),
    ("instructions", SectionKind::Procedure),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    DayHeader,
    NumberedStep,
    BulletedStep,
    SectionHeader(SectionKind),
    Text,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedLine<'a> {
    /// The line as written, leading whitespace kept.
    pub raw: &'a str,
    pub text: &'a str,
    pub kind: LineKind,
}

impl<'a> ClassifiedLine<'a> {
    pub fn new(raw: &'a str) -> Self {
        let text = raw.trim();
        Self {
            raw,
            text,
            kind: classify_line(text),
        }
    }

    pub fn is_indented(&self) -> bool {
        self.raw.starts_with([' ', '\t'])
    }

    pub fn is_step_marker(&self) -> bool {
        matches!(self.kind, LineKind::NumberedStep | LineKind::BulletedStep)
    }
}

type LineRule = (fn(&str) -> bool, LineKind);

const LINE_RULES: &[LineRule] = &[
    (is_day_header, LineKind::DayHeader),
    (is_numbered_step, LineKind::NumberedStep),
    (is_bulleted_step, LineKind::BulletedStep),
    (
        is_materials_header,
        LineKind::SectionHeader(SectionKind::Materials),
    ),
    (is_safety_header, LineKind::SectionHeader(SectionKind::Safety)),
    (
        is_description_header,
        LineKind::SectionHeader(SectionKind::Description),
    ),
    (
        is_procedure_header,
        LineKind::SectionHeader(SectionKind::Procedure),
    ),
];

/// Splits text into non-empty lines and tags each one by role, in order.
pub fn classify_lines(text: &str) -> Vec<ClassifiedLine<'_>> {
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .map(ClassifiedLine::new)
        .collect()
}

pub fn classify_line(text: &str) -> LineKind {
    LINE_RULES
        .iter()
        .find(|(matches, _)| matches(text))
        .map(|(_, kind)| *kind)
        .unwrap_or(LineKind::Text)
}

/// Returns the section a header line opens plus any text after its colon.
pub fn section_header(text: &str) -> Option<(SectionKind, &str)> {
    let (head, rest) = split_header(text)?;
    let kind = SECTION_VOCABULARY
        .iter()
        .find(|(word, _)| *word == head)
        .map(|(_, kind)| *kind)?;

    Some((kind, rest))
}

/// Splits `Head: rest` into a lower-cased, space-normalized head and the
/// trimmed rest. A bare `Head` line has an empty rest.
pub(crate) fn split_header(text: &str) -> Option<(String, &str)> {
    let captures = SECTION_HEADER_REGEX.captures(text)?;
    let head = captures
        .name("head")?
        .as_str()
        .replace('&', " and ")
        .split_whitespace()
        .collect::<Vec<&str>>()
        .join(" ")
        .to_ascii_lowercase();
    let rest = captures
        .name("rest")
        .map(|value| value.as_str().trim())
        .unwrap_or_default();

    Some((head, rest))
}

/// Strips a leading number or bullet marker, if any.
pub fn list_item_body(text: &str) -> &str {
    if let Some(captures) = NUMBERED_STEP_REGEX.captures(text)
        && let Some(body) = captures.name("body")
    {
        return body.as_str().trim();
    }

    if let Some(captures) = BULLETED_STEP_REGEX.captures(text)
        && let Some(body) = captures.name("body")
    {
        return body.as_str().trim();
    }

    text.trim()
}

fn is_day_header(text: &str) -> bool {
    DAY_HEADER_REGEX.is_match(text)
}

fn is_numbered_step(text: &str) -> bool {
    NUMBERED_STEP_REGEX.is_match(text)
}

fn is_bulleted_step(text: &str) -> bool {
    BULLETED_STEP_REGEX.is_match(text)
}

fn is_materials_header(text: &str) -> bool {
    section_kind(text) == Some(SectionKind::Materials)
}

fn is_safety_header(text: &str) -> bool {
    section_kind(text) == Some(SectionKind::Safety)
}

fn is_description_header(text: &str) -> bool {
    section_kind(text) == Some(SectionKind::Description)
}

fn is_procedure_header(text: &str) -> bool {
    section_kind(text) == Some(SectionKind::Procedure)
}

fn section_kind(text: &str) -> Option<SectionKind> {
    section_header(text).map(|(kind, _)| kind)
}
