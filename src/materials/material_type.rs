use std::sync::LazyLock;

use regex::Regex;

use crate::model::MaterialType;

/// Type used by both the grid and tabular pipelines when no rule matches.
pub const DEFAULT_MATERIAL_TYPE: MaterialType = MaterialType::Other;

static PLASMID_NAME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^p[A-Z0-9]").expect("valid plasmid name regex"));

static PLASMID_KEYWORD_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(?:plasmid|vector|^(?:pcmv|pcdna|plenti|plv|plko|puc|pet|pgex|paav|pspcas|px\d|pmd2|pspax|pegfp|pbabe|pcag|pgl\d|prk))",
    )
    .expect("valid plasmid keyword regex")
});

static CELL_LINE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(?:\bhek|\bhela|293|\bips|\bcftr|\bcho\b|\bjurkat|\bk562|\bcells?\b|\bcell[\s_-]?lines?\b|\blines?\b)",
    )
    .expect("valid cell line regex")
});

static ANTIBODY_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(?:antibod|\banti-|\big[gma]\d?\b|\bmonoclonal|\bpolyclonal|\b(?:mouse|rabbit|goat|rat|donkey|chicken|sheep)\b)",
    )
    .expect("valid antibody regex")
});

static ENZYME_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(?:\b(?:ecori|ecorv|bamhi|hindiii|noti|xhoi|xbai|ncoi|ndei|kpni|saci|sali|psti|bsai|bbsi|bsmbi|dpni|cas9|taq)\b|\w{3,}ase\b|\benzymes?\b)",
    )
    .expect("valid enzyme regex")
});

static MEDIA_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:\bdmem|\brpmi|\bfbs\b|serum|\bmedia\b|\bmedium\b|opti-?mem|\bmem\b|\bbroth\b|\blb\b)")
        .expect("valid media regex")
});

static CHEMICAL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(?:\bnacl\b|\bkcl\b|\bpbs\b|\btris\b|\bedta\b|\bhepes\b|\bglycerol|\bethanol|\bmethanol|\bdmso\b|\bsds\b|\btween|\btriton|\bmgcl2\b|\bcacl2\b|\bbsa\b|\bbuffer|\bacid\b|\bsodium|\bpotassium|\bchloride|\bpipes\b)",
    )
    .expect("valid chemical regex")
});

static QUANTITY_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(?P<amount>\d+(?:\.\d+)?)\s*(?P<unit>µg|μg|ug|mg|ng|kg|g|µl|μl|ul|ml|l|units?|mm|µm|μm|um|nm|u|vials?|tubes?)\b",
    )
    .expect("valid quantity regex")
});

static PASSAGE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bP(?P<passage>\d+)\b").expect("valid passage regex"));

type MaterialRule = (fn(&str) -> bool, MaterialType);

/// Evaluated in order; the first matching rule decides the type.
const MATERIAL_RULES: &[MaterialRule] = &[
    (is_plasmid, MaterialType::Plasmid),
    (is_cell_line, MaterialType::CellLine),
    (is_antibody, MaterialType::Antibody),
    (is_enzyme, MaterialType::Enzyme),
    (is_media, MaterialType::Media),
    (is_chemical, MaterialType::Chemical),
];

pub fn classify_material_type(name: &str) -> Option<MaterialType> {
    let name = name.trim();
    MATERIAL_RULES
        .iter()
        .find(|(matches, _)| matches(name))
        .map(|(_, material_type)| *material_type)
}

fn is_plasmid(name: &str) -> bool {
    (PLASMID_NAME_REGEX.is_match(name) && !name.starts_with("pH"))
        || PLASMID_KEYWORD_REGEX.is_match(name)
}

fn is_cell_line(name: &str) -> bool {
    CELL_LINE_REGEX.is_match(name)
}

fn is_antibody(name: &str) -> bool {
    ANTIBODY_REGEX.is_match(name)
}

fn is_enzyme(name: &str) -> bool {
    ENZYME_REGEX.is_match(name)
}

fn is_media(name: &str) -> bool {
    MEDIA_REGEX.is_match(name)
}

fn is_chemical(name: &str) -> bool {
    CHEMICAL_REGEX.is_match(name)
}

/// First `<number><unit>` token in the text, with the unit normalized.
pub fn parse_quantity(text: &str) -> Option<(f64, String)> {
    let captures = QUANTITY_REGEX.captures(text)?;
    let amount = captures.name("amount")?.as_str().parse::<f64>().ok()?;
    let unit = normalize_unit(captures.name("unit")?.as_str());
    Some((amount, unit))
}

/// Passage number from a `P<int>` token, e.g. `HEK293T P45`.
pub fn parse_passage(text: &str) -> Option<f64> {
    PASSAGE_REGEX
        .captures(text)?
        .name("passage")?
        .as_str()
        .parse::<f64>()
        .ok()
}

pub fn normalize_unit(raw: &str) -> String {
    let lowered = raw.trim().to_lowercase();
    let canonical = match lowered.as_str() {
        "µg" | "μg" | "ug" => "µg",
        "mg" => "mg",
        "ng" => "ng",
        "kg" => "kg",
        "g" => "g",
        "µl" | "μl" | "ul" => "µL",
        "ml" => "mL",
        "l" => "L",
        "u" | "unit" | "units" => "U",
        "mm" => "mM",
        "µm" | "μm" | "um" => "µM",
        "nm" => "nM",
        "vial" | "vials" => "vials",
        "tube" | "tubes" => "tubes",
        _ => return raw.trim().to_string(),
    };
    canonical.to_string()
}
