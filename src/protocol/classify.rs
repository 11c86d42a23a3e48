use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::model::ProtocolCategory;

const MAX_TAGS: usize = 5;
const MAX_SUFFIX_TAGS: usize = 3;

const CATEGORY_KEYWORDS: &[(ProtocolCategory, &[&str])] = &[
    (
        ProtocolCategory::CellCulture,
        &[
            "cell culture", "cells", "passage", "passaging", "media", "medium", "dmem", "rpmi",
            "fbs", "trypsin", "confluent", "confluency", "seeding", "flask", "incubator",
            "hek293", "hela",
        ],
    ),
    (
        ProtocolCategory::MolecularBiology,
        &[
            "pcr", "dna", "rna", "plasmid", "cloning", "crispr", "cas9", "sgrna", "grna",
            "primer", "primers", "ligation", "transformation", "transfect", "transfection",
            "gene", "restriction", "miniprep", "agarose",
        ],
    ),
    (
        ProtocolCategory::ProteinAnalysis,
        &[
            "protein", "western", "blot", "sds-page", "antibody", "elisa",
            "immunoprecipitation", "bradford", "bca", "lysate", "coomassie", "membrane",
        ],
    ),
    (
        ProtocolCategory::Ngs,
        &[
            "ngs", "library prep", "library", "illumina", "sequencing", "reads", "adapter",
            "adapters", "fastq", "miseq", "nextseq", "novaseq",
        ],
    ),
];

const TAG_TERMS: &[&str] = &[
    "PCR",
    "qPCR",
    "DNA",
    "RNA",
    "mRNA",
    "protein",
    "CRISPR",
    "electroporation",
    "transfection",
    "Western blot",
    "ELISA",
    "sequencing",
    "cloning",
];

/// Everyday words that happen to end in `-ase`, `-ine` or `-ide`.
const SUFFIX_STOPWORDS: &[&str] = &[
    "please", "phase", "phrase", "because", "increase", "decrease", "release", "purchase",
    "database", "disease", "erase", "lease", "chase", "cease", "routine", "determine",
    "examine", "combine", "machine", "online", "outline", "baseline", "pipeline", "timeline",
    "medicine", "engine", "imagine", "define", "refine", "decline", "genuine", "guide", "inside",
    "outside", "beside", "aside", "provide", "decide", "divide", "override", "alongside",
    "slide", "wide", "worldwide",
];

static CATEGORY_PATTERNS: LazyLock<Vec<(ProtocolCategory, Regex)>> = LazyLock::new(|| {
    CATEGORY_KEYWORDS
        .iter()
        .map(|(category, keywords)| (*category, whole_word_regex(keywords)))
        .collect()
});

static TAG_PATTERNS: LazyLock<Vec<(&'static str, Regex)>> = LazyLock::new(|| {
    TAG_TERMS
        .iter()
        .map(|term| (*term, whole_word_regex(&[*term])))
        .collect()
});

static SUFFIX_WORD_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b[A-Za-z][A-Za-z0-9]+(?:ase|ine|ide)\b").expect("valid suffix regex")
});

fn whole_word_regex(words: &[&str]) -> Regex {
    let alternation = words
        .iter()
        .map(|word| regex::escape(word))
        .collect::<Vec<String>>()
        .join("|");
    Regex::new(&format!(r"(?i)\b(?:{alternation})\b")).expect("escaped keyword regex")
}

/// Highest whole-word keyword score wins. Ties and zero scores are `General`.
pub fn classify_category(text: &str) -> ProtocolCategory {
    let scores = category_scores(text);
    let best = scores.iter().map(|(_, score)| *score).max().unwrap_or(0);
    if best == 0 {
        return ProtocolCategory::General;
    }

    let mut leaders = scores.iter().filter(|(_, score)| *score == best);
    match (leaders.next(), leaders.next()) {
        (Some((category, _)), None) => *category,
        _ => ProtocolCategory::General,
    }
}

pub fn category_scores(text: &str) -> Vec<(ProtocolCategory, usize)> {
    CATEGORY_PATTERNS
        .iter()
        .map(|(category, pattern)| (*category, pattern.find_iter(text).count()))
        .collect()
}

/// Known scientific terms first, then up to three `-ase`/`-ine`/`-ide` words.
pub fn generate_tags(text: &str) -> Vec<String> {
    let mut seen = HashSet::<String>::new();
    let mut tags = Vec::<String>::new();

    for (term, pattern) in TAG_PATTERNS.iter() {
        if pattern.is_match(text) && seen.insert(term.to_lowercase()) {
            tags.push((*term).to_string());
        }
    }

    let mut suffix_tags = 0usize;
    for word in SUFFIX_WORD_REGEX.find_iter(text) {
        if suffix_tags == MAX_SUFFIX_TAGS {
            break;
        }

        let lowered = word.as_str().to_lowercase();
        if SUFFIX_STOPWORDS.contains(&lowered.as_str()) {
            continue;
        }
        if seen.insert(lowered.clone()) {
            tags.push(lowered);
            suffix_tags += 1;
        }
    }

    tags.truncate(MAX_TAGS);
    tags
}
