use std::collections::{BTreeMap, HashSet};
use std::sync::LazyLock;

use regex::Regex;

use super::lines::{
    ClassifiedLine, LineKind, SectionKind, list_item_body, section_header, split_header,
};
use super::steps::truncate_with_ellipsis;

pub const FALLBACK_TITLE: &str = "Imported Protocol";

const TITLE_SCAN_LINES: usize = 5;
const MAX_MATERIALS: usize = 20;
const MATERIAL_MIN_CHARS: usize = 2;
const MATERIAL_MAX_CHARS: usize = 100;
const DESCRIPTION_MIN_CHARS: usize = 20;
const DESCRIPTION_MAX_CHARS: usize = 200;

static TITLE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)^(?:protocol|procedure|method)\s*:\s*(.+)$",
        r"(?i)^title\s*:\s*(.+)$",
        r"(?i)^(.+\sprotocol)$",
        r"^(.{1,80})$",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).expect("valid title regex"))
    .collect()
});

static SAFETY_PREFIX_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(?:safety(?:\s+notes?|\s+precautions?)?|cautions?|warnings?|important|notes?)\s*[:!\-–]\s*(?P<rest>.*)$",
    )
    .expect("valid safety regex")
});

/// A dot between digits stays inside the captured time.
static TIME_PREFIX_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:total\s+time|estimated\s+time|duration|takes)\b\s*:?\s*(?P<rest>(?:\d\.\d|[^.;])+)",
    )
    .expect("valid time prefix regex")
});

static TIME_TOKEN_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b\d+(?:\.\d+)?\s*(?:hours?|hrs?|minutes?|mins?|days?)\b")
        .expect("valid time token regex")
});

static DESCRIPTION_PREFIX_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:description|summary|overview|purpose)\s*:\s*(?P<rest>.*)$")
        .expect("valid description regex")
});

static SENTENCE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:\d\.\d|[^.!?])+[.!?]*").expect("valid sentence regex"));

static EXPERIMENT_ID_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile_field_patterns(&[
        r"(?i)^(?:experiment|exp\.?)\s*(?:(?:id|no)\b\.?|#)\s*:?\s*(?P<value>[A-Z0-9][A-Z0-9_-]*)",
        r"(?i)^(?:experiment|exp\.?)\s*:\s*(?P<value>[A-Z0-9_-]*\d[A-Z0-9_-]*)$",
        r"(?i)^id\s*:\s*(?P<value>[A-Z0-9][A-Z0-9_-]*)",
    ])
});

static DATE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile_field_patterns(&[
        r"(?i)\bdate\s*:?\s*(?P<value>\d{4}-\d{2}-\d{2}|\d{1,2}[/-]\d{1,2}[/-]\d{2,4})\b",
        r"\b(?P<value>\d{4}-\d{2}-\d{2})\b",
        r"\b(?P<value>\d{1,2}[/-]\d{1,2}[/-]\d{2,4})\b",
    ])
});

static RESEARCHER_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile_field_patterns(&[
        r"(?i)^researcher\s*:\s*(?P<value>(?:dr\.?\s*)?[\w .'-]+?)\s*$",
        r"(?i)^(?:by|author|name)\s*:\s*(?P<value>(?:dr\.?\s*)?[\w .'-]+?)\s*$",
    ])
});

/// Named note sections and the header words that open them.
const NAMED_SECTIONS: &[(&str, &[&str])] = &[
    (
        "methods",
        &["method", "methods", "protocol", "experimental setup"],
    ),
    (
        "results",
        &["result", "results", "findings", "data", "outcome", "outcomes"],
    ),
    (
        "observations",
        &["observation", "observations", "note", "notes", "comment", "comments"],
    ),
    (
        "materials",
        &["material", "materials", "reagent", "reagents", "equipment", "supplies"],
    ),
    ("procedure", &["procedure", "step", "steps", "process"]),
    ("discussion", &["discussion", "analysis", "interpretation"]),
    (
        "conclusion",
        &["conclusion", "conclusions", "summary", "final thought", "final thoughts"],
    ),
];

fn compile_field_patterns(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .map(|pattern| Regex::new(pattern).expect("valid header field regex"))
        .collect()
}

pub fn extract_title(lines: &[ClassifiedLine<'_>]) -> String {
    let head = &lines[..lines.len().min(TITLE_SCAN_LINES)];
    let generic_index = TITLE_PATTERNS.len() - 1;

    for (index, pattern) in TITLE_PATTERNS.iter().enumerate() {
        for line in head {
            if index == generic_index
                && !matches!(line.kind, LineKind::Text | LineKind::SectionHeader(_))
            {
                continue;
            }

            let Some(candidate) = pattern
                .captures(line.text)
                .and_then(|captures| captures.get(1))
                .map(|value| value.as_str().trim())
            else {
                continue;
            };

            let length = candidate.chars().count();
            if length > 3 && length < 100 {
                return candidate.to_string();
            }
        }
    }

    lines
        .first()
        .map(|line| line.text.to_string())
        .unwrap_or_else(|| FALLBACK_TITLE.to_string())
}

/// Items listed under materials/reagents/equipment headers.
///
/// A section runs until a day header, a numbered step line or another
/// section header. Returns a single empty string when nothing was found.
pub fn extract_materials(lines: &[ClassifiedLine<'_>]) -> Vec<String> {
    let mut captured = Vec::<&str>::new();
    let mut in_section = false;

    for line in lines {
        if let LineKind::SectionHeader(kind) = line.kind {
            in_section = kind == SectionKind::Materials;
            if in_section
                && let Some((_, rest)) = section_header(line.text)
                && !rest.is_empty()
            {
                captured.push(rest);
            }
            continue;
        }

        if !in_section {
            continue;
        }

        match line.kind {
            LineKind::DayHeader | LineKind::NumberedStep => in_section = false,
            _ => captured.push(list_item_body(line.text)),
        }
    }

    let items = split_material_items(&captured);
    if items.is_empty() {
        vec![String::new()]
    } else {
        items
    }
}

pub fn split_material_items(chunks: &[&str]) -> Vec<String> {
    let mut seen = HashSet::<String>::new();
    let mut items = Vec::<String>::new();

    for item in chunks
        .iter()
        .flat_map(|chunk| chunk.split([',', ';', '\n']))
        .map(|item| item.trim().trim_end_matches('.').trim())
    {
        let length = item.chars().count();
        if !(MATERIAL_MIN_CHARS..=MATERIAL_MAX_CHARS).contains(&length) {
            continue;
        }
        if !seen.insert(item.to_lowercase()) {
            continue;
        }

        items.push(item.to_string());
        if items.len() == MAX_MATERIALS {
            break;
        }
    }

    items
}

/// Every safety/caution/warning/important/note remainder, joined with `. `.
pub fn extract_safety_notes(lines: &[ClassifiedLine<'_>]) -> String {
    let mut notes = Vec::<&str>::new();
    let mut in_block = false;

    for line in lines {
        let body = list_item_body(line.text);

        if let Some(captures) = SAFETY_PREFIX_REGEX.captures(body) {
            let rest = captures
                .name("rest")
                .map(|value| value.as_str().trim())
                .unwrap_or_default();
            in_block =
                rest.is_empty() && line.kind == LineKind::SectionHeader(SectionKind::Safety);
            if !rest.is_empty() {
                notes.push(rest);
            }
            continue;
        }

        if !in_block {
            continue;
        }

        match line.kind {
            LineKind::BulletedStep | LineKind::Text => notes.push(body),
            _ => in_block = false,
        }
    }

    notes
        .iter()
        .map(|note| note.trim_end_matches('.').trim())
        .filter(|note| !note.is_empty())
        .collect::<Vec<&str>>()
        .join(". ")
}

pub fn extract_estimated_time(lines: &[ClassifiedLine<'_>]) -> String {
    for line in lines {
        if let Some(rest) = TIME_PREFIX_REGEX
            .captures(line.text)
            .and_then(|captures| captures.name("rest"))
        {
            let rest = rest.as_str().trim();
            if !rest.is_empty() {
                return rest.to_string();
            }
        }

        if let Some(token) = TIME_TOKEN_REGEX.find(line.text) {
            return token.as_str().to_string();
        }
    }

    String::new()
}

pub fn extract_description(lines: &[ClassifiedLine<'_>]) -> String {
    for (index, line) in lines.iter().enumerate() {
        let Some(rest) = DESCRIPTION_PREFIX_REGEX
            .captures(line.text)
            .and_then(|captures| captures.name("rest"))
            .map(|value| value.as_str().trim())
        else {
            continue;
        };

        if !rest.is_empty() {
            return rest.to_string();
        }

        let body = lines[index + 1..]
            .iter()
            .take_while(|next| matches!(next.kind, LineKind::Text | LineKind::BulletedStep))
            .map(|next| list_item_body(next.text))
            .collect::<Vec<&str>>()
            .join(" ");
        if !body.is_empty() {
            return body;
        }
    }

    fallback_description(lines)
}

/// First one or two sentences of the free text, skipping the title line.
fn fallback_description(lines: &[ClassifiedLine<'_>]) -> String {
    let joined = lines
        .iter()
        .skip(1)
        .filter(|line| line.kind == LineKind::Text)
        .map(|line| line.text)
        .collect::<Vec<&str>>()
        .join(" ");

    let mut sentences = SENTENCE_REGEX
        .find_iter(&joined)
        .map(|value| value.as_str().trim())
        .filter(|sentence| !sentence.is_empty());

    let Some(first) = sentences.next() else {
        return String::new();
    };

    let mut description = first.to_string();
    if description.chars().count() < DESCRIPTION_MIN_CHARS
        && let Some(second) = sentences.next()
    {
        description.push(' ');
        description.push_str(second);
    }

    if description.chars().count() < DESCRIPTION_MIN_CHARS {
        return String::new();
    }

    truncate_with_ellipsis(&description, DESCRIPTION_MAX_CHARS)
}

/// Experiment identifier from an `Experiment ID:`, `Exp #` or `ID:` line.
pub fn extract_experiment_id(lines: &[ClassifiedLine<'_>]) -> Option<String> {
    first_field_match(&EXPERIMENT_ID_PATTERNS, lines)
}

/// A `Date:` value, else the first ISO or slash/dash date anywhere.
pub fn extract_date(lines: &[ClassifiedLine<'_>]) -> Option<String> {
    first_field_match(&DATE_PATTERNS, lines)
}

pub fn extract_researcher(lines: &[ClassifiedLine<'_>]) -> Option<String> {
    first_field_match(&RESEARCHER_PATTERNS, lines)
}

/// Patterns are tried in priority order, each over every line.
fn first_field_match(patterns: &[Regex], lines: &[ClassifiedLine<'_>]) -> Option<String> {
    patterns.iter().find_map(|pattern| {
        lines.iter().find_map(|line| {
            pattern
                .captures(line.text)
                .and_then(|captures| captures.name("value"))
                .map(|value| value.as_str().trim().to_string())
                .filter(|value| !value.is_empty())
        })
    })
}

/// Groups lines under named note headers (`Methods:`, `Results:`, ...).
///
/// A section runs until the next named header and keeps any inline text
/// after its colon. Sections with no content are left out; a repeated
/// section keeps its last occurrence.
pub fn extract_named_sections(lines: &[ClassifiedLine<'_>]) -> BTreeMap<String, String> {
    let mut sections = BTreeMap::<String, String>::new();
    let mut current: Option<(&'static str, Vec<&str>)> = None;

    for line in lines {
        if let Some((name, rest)) = named_section(line.text) {
            if let Some((open, body)) = current.take() {
                store_section(&mut sections, open, &body);
            }
            let body = if rest.is_empty() { Vec::new() } else { vec![rest] };
            current = Some((name, body));
            continue;
        }

        if let Some((_, body)) = current.as_mut() {
            body.push(line.text);
        }
    }

    if let Some((open, body)) = current {
        store_section(&mut sections, open, &body);
    }

    sections
}

fn named_section(text: &str) -> Option<(&'static str, &str)> {
    let (head, rest) = split_header(text)?;
    NAMED_SECTIONS
        .iter()
        .find(|(_, heads)| heads.contains(&head.as_str()))
        .map(|(name, _)| (*name, rest))
}

fn store_section(sections: &mut BTreeMap<String, String>, name: &str, body: &[&str]) {
    if !body.is_empty() {
        sections.insert(name.to_string(), body.join("\n"));
    }
}
