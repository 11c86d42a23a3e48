use std::sync::LazyLock;

use regex::Regex;

use super::days::{DEFAULT_DAY, DayBucket, day_label};
use super::lines::list_item_body;
use crate::model::ProtocolStep;

const MIN_UNSTRUCTURED_CHARS: usize = 20;
const TITLE_MAX_CHARS: usize = 60;
const TITLE_MAX_WORDS: usize = 5;

static DURATION_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b\d+(?:\.\d+)?\s*(?:hours?|hrs?|minutes?|mins?|seconds?|secs?|days?)\b",
    )
    .expect("valid duration regex")
});

static CRITICAL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:very critical|critical|important|essential|crucial|must|do not skip)\b")
        .expect("valid critical regex")
});

static SENTENCE_BREAK_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.!?]+(?:\s+|$)").expect("valid sentence break regex"));

static STEP_NOTE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:notes?|tips?)\s*:\s*(?P<body>.+)$").expect("valid step note regex")
});

const STAGE_KEYWORDS: &[(&str, &[&str])] = &[
    (
        "Preparation",
        &[
            "prepar", "seed", "plate", "thaw", "coat", "dilut", "mix", "design", "make",
        ],
    ),
    (
        "Treatment",
        &[
            "treat", "transfect", "add", "incubat", "electroporat", "infect", "transduc",
            "stimulat", "induc",
        ],
    ),
    (
        "Collection",
        &[
            "harvest", "collect", "lyse", "lysis", "centrifug", "pellet", "wash", "detach",
            "trypsin",
        ],
    ),
    (
        "Analysis",
        &[
            "analy", "measur", "imag", "quantif", "assay", "sequenc", "stain", "western",
            "flow",
        ],
    ),
    (
        "Maintenance",
        &["feed", "passag", "split", "maintain", "refresh", "replac", "chang"],
    ),
];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct StepDraft {
    text: String,
    notes: Vec<String>,
}

impl StepDraft {
    fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
            notes: Vec::new(),
        }
    }

    fn append(&mut self, line: &str) {
        if let Some(captures) = STEP_NOTE_REGEX.captures(line)
            && let Some(body) = captures.name("body")
        {
            self.notes.push(body.as_str().trim().to_string());
            return;
        }

        if !self.text.is_empty() {
            self.text.push(' ');
        }
        self.text.push_str(line);
    }
}

/// Extracts steps from every bucket in bucket order. Ids are left at zero;
/// [`order_steps`] assigns them after sorting.
pub fn extract_steps(buckets: &[DayBucket<'_>]) -> Vec<ProtocolStep> {
    buckets
        .iter()
        .flat_map(|bucket| {
            split_bucket(bucket)
                .into_iter()
                .map(move |draft| build_step(draft, bucket))
        })
        .collect()
}

/// Stable-sorts by day and renumbers ids 1..N.
pub fn order_steps(mut steps: Vec<ProtocolStep>) -> Vec<ProtocolStep> {
    steps.sort_by_key(|step| step.day);
    for (index, step) in steps.iter_mut().enumerate() {
        step.id = (index + 1) as u32;
    }
    steps
}

pub fn placeholder_step() -> ProtocolStep {
    ProtocolStep {
        id: 1,
        title: "Review imported protocol".to_string(),
        description: "No structured steps were detected in the imported text. Add steps manually."
            .to_string(),
        duration: None,
        critical: false,
        notes: None,
        day: DEFAULT_DAY,
        stage: day_label(DEFAULT_DAY, None),
    }
}

fn split_bucket(bucket: &DayBucket<'_>) -> Vec<StepDraft> {
    let structured = bucket.lines.iter().any(|line| line.is_step_marker());
    if !structured {
        return split_unstructured(bucket).into_iter().collect();
    }

    let mut drafts = Vec::<StepDraft>::new();
    let mut active: Option<StepDraft> = None;

    for line in &bucket.lines {
        if line.is_step_marker() {
            if let Some(draft) = active.take() {
                drafts.push(draft);
            }
            active = Some(StepDraft::new(list_item_body(line.text)));
            continue;
        }

        // Free text ahead of the first marker reads as a heading.
        let Some(draft) = active.as_mut() else {
            continue;
        };

        if line.is_indented() || !is_critical(&draft.text) {
            draft.append(line.text);
        } else {
            let finished = std::mem::replace(draft, StepDraft::new(line.text));
            drafts.push(finished);
        }
    }

    if let Some(draft) = active.take() {
        drafts.push(draft);
    }

    drafts.retain(|draft| !draft.text.trim().is_empty());
    drafts
}

fn split_unstructured(bucket: &DayBucket<'_>) -> Option<StepDraft> {
    let joined = bucket
        .lines
        .iter()
        .map(|line| line.text)
        .collect::<Vec<&str>>()
        .join(" ");

    if joined.is_empty() {
        return bucket.description.map(StepDraft::new);
    }

    if joined.chars().count() > MIN_UNSTRUCTURED_CHARS {
        return Some(StepDraft::new(&joined));
    }

    bucket
        .description
        .map(|description| StepDraft::new(&format!("{description}. {joined}")))
}

fn build_step(draft: StepDraft, bucket: &DayBucket<'_>) -> ProtocolStep {
    let text = draft.text.trim().to_string();
    let notes = (!draft.notes.is_empty()).then(|| draft.notes.join(" "));

    ProtocolStep {
        id: 0,
        title: derive_title(&text),
        duration: extract_duration(&text),
        critical: is_critical(&text),
        notes,
        day: bucket.day,
        stage: stage_label(&bucket.stage, &text),
        description: text,
    }
}

/// First duration token in the text. Later tokens are ignored.
pub fn extract_duration(text: &str) -> Option<String> {
    DURATION_REGEX
        .find(text)
        .map(|value| value.as_str().trim().to_string())
}

pub fn is_critical(text: &str) -> bool {
    CRITICAL_REGEX.is_match(text)
}

pub fn derive_title(text: &str) -> String {
    let sentences = SENTENCE_BREAK_REGEX
        .split(text)
        .map(str::trim)
        .filter(|sentence| !sentence.is_empty())
        .collect::<Vec<&str>>();

    let base = if sentences.len() > 1 {
        sentences[0].to_string()
    } else {
        text.split_whitespace()
            .take(TITLE_MAX_WORDS)
            .collect::<Vec<&str>>()
            .join(" ")
    };

    truncate_with_ellipsis(&base, TITLE_MAX_CHARS)
}

pub fn truncate_with_ellipsis(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }

    let kept = text
        .chars()
        .take(max_chars.saturating_sub(3))
        .collect::<String>();
    format!("{}...", kept.trim_end())
}

/// Appends the winning stage category unless the day label is already qualified.
pub fn stage_label(day_stage: &str, text: &str) -> String {
    if day_stage.contains('-') {
        return day_stage.to_string();
    }

    match stage_category(text) {
        Some(category) => format!("{day_stage} - {category}"),
        None => day_stage.to_string(),
    }
}

pub fn stage_category(text: &str) -> Option<&'static str> {
    let lowered = text.to_lowercase();
    let words = lowered
        .split(|ch: char| !ch.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .collect::<Vec<&str>>();

    let mut best: Option<(&'static str, usize)> = None;
    for (category, keywords) in STAGE_KEYWORDS {
        let score = words
            .iter()
            .filter(|word| keywords.iter().any(|keyword| word.starts_with(keyword)))
            .count();
        if score == 0 {
            continue;
        }
        if best.is_none_or(|(_, best_score)| score > best_score) {
            best = Some((*category, score));
        }
    }

    best.map(|(category, _)| category)
}
