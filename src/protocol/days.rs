use super::lines::{ClassifiedLine, DAY_HEADER_REGEX, LineKind, SectionKind, section_header};

pub const DEFAULT_DAY: i32 = 0;

/// A day header resolved into its canonical day and stage label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayHeader<'a> {
    pub day: i32,
    pub range_end: Option<i32>,
    pub label: String,
    pub description: Option<&'a str>,
    /// Same-line text that is not introduced by `:` or `-`.
    pub trailing: Option<&'a str>,
}

/// Content lines of one resolved day, in input order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayBucket<'a> {
    pub day: i32,
    pub stage: String,
    pub description: Option<&'a str>,
    /// Candidate step lines.
    pub lines: Vec<ClassifiedLine<'a>>,
    /// Headers, preamble and non-procedure section bodies. Never steps.
    pub section_lines: Vec<&'a str>,
    pub explicit: bool,
}

impl<'a> DayBucket<'a> {
    fn implicit() -> Self {
        Self {
            day: DEFAULT_DAY,
            stage: day_label(DEFAULT_DAY, None),
            description: None,
            lines: Vec::new(),
            section_lines: Vec::new(),
            explicit: false,
        }
    }

    /// The header line is absorbed either as the first content line (its
    /// trailing text) or as a section line, never both.
    fn from_header(header: &DayHeader<'a>, header_line: &'a str) -> Self {
        let (lines, section_lines) = match header.trailing {
            Some(rest) => (vec![ClassifiedLine::new(rest)], Vec::new()),
            None => (Vec::new(), vec![header_line]),
        };

        Self {
            day: header.day,
            stage: header.label.clone(),
            description: header.description,
            lines,
            section_lines,
            explicit: true,
        }
    }

    pub fn line_count(&self) -> usize {
        self.lines.len() + self.section_lines.len()
    }
}

pub fn parse_day_header(text: &str) -> Option<DayHeader<'_>> {
    let captures = DAY_HEADER_REGEX.captures(text)?;
    let whole = captures.get(0)?;

    let day = ["day", "short", "ordinal", "after"]
        .iter()
        .find_map(|name| captures.name(name))
        .and_then(|value| value.as_str().parse::<i32>().ok())?;
    let range_end = captures
        .name("end")
        .and_then(|value| value.as_str().parse::<i32>().ok());

    let mut label = day_label(day, range_end);
    let mut description = None;
    let mut trailing = None;

    let rest = text[whole.end()..].trim();
    if let Some(stripped) = rest.strip_prefix([':', '-', '–']) {
        let stripped = stripped.trim();
        if !stripped.is_empty() {
            label = format!("{label} - {stripped}");
            description = Some(stripped);
        }
    } else if !rest.is_empty() {
        trailing = Some(rest);
    }

    Some(DayHeader {
        day,
        range_end,
        label,
        description,
        trailing,
    })
}

pub fn day_label(day: i32, range_end: Option<i32>) -> String {
    match range_end {
        Some(end) => format!("Day {day}-{end}"),
        None => format!("Day {day}"),
    }
}

/// Assigns every classified line to exactly one day bucket.
///
/// Lines before the first header land in an implicit Day 0 bucket. When the
/// document has explicit headers, free text in that implicit bucket is
/// treated as preamble rather than step content.
pub fn group_by_day<'a>(lines: &[ClassifiedLine<'a>]) -> Vec<DayBucket<'a>> {
    let has_headers = lines.iter().any(|line| line.kind == LineKind::DayHeader);
    let mut buckets = Vec::<DayBucket<'a>>::new();
    let mut current: Option<DayBucket<'a>> = None;
    let mut open_section: Option<SectionKind> = None;

    for line in lines {
        match line.kind {
            LineKind::DayHeader => {
                let Some(header) = parse_day_header(line.text) else {
                    current
                        .get_or_insert_with(DayBucket::implicit)
                        .lines
                        .push(line.clone());
                    continue;
                };

                if let Some(bucket) = current.take() {
                    buckets.push(bucket);
                }
                open_section = None;
                current = Some(DayBucket::from_header(&header, line.text));
            }
            LineKind::SectionHeader(kind) => {
                current
                    .get_or_insert_with(DayBucket::implicit)
                    .section_lines
                    .push(line.text);
                open_section = opens_block(kind, line.text).then_some(kind);
            }
            LineKind::NumberedStep => {
                open_section = None;
                current
                    .get_or_insert_with(DayBucket::implicit)
                    .lines
                    .push(line.clone());
            }
            LineKind::BulletedStep | LineKind::Text => {
                let bucket = current.get_or_insert_with(DayBucket::implicit);
                let preamble = has_headers && !bucket.explicit && line.kind == LineKind::Text;
                if open_section.is_some() || preamble {
                    bucket.section_lines.push(line.text);
                } else {
                    bucket.lines.push(line.clone());
                }
            }
        }
    }

    if let Some(bucket) = current {
        buckets.push(bucket);
    }

    buckets
}

/// Whether lines after this header belong to its section. Safety and
/// description headers with inline text are one-liners; a materials header
/// keeps collecting items either way.
fn opens_block(kind: SectionKind, text: &str) -> bool {
    match kind {
        SectionKind::Procedure => false,
        SectionKind::Materials => true,
        SectionKind::Safety | SectionKind::Description => {
            section_header(text).is_none_or(|(_, rest)| rest.is_empty())
        }
    }
}
