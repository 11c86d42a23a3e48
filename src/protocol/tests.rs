use super::*;
use crate::model::ProtocolCategory;

const CRISPR_PROTOCOL: &str = "CRISPR Gene Editing Protocol\nDay 1: Design sgRNA and prepare cells\nDay 2: Transfect with Cas9 (critical step)\nMaterials: Cas9 protein, sgRNA";

#[test]
fn parse_crispr_protocol_scenario() {
    let data = parse(CRISPR_PROTOCOL);

    assert_eq!(data.title, "CRISPR Gene Editing Protocol");
    assert_eq!(data.category, ProtocolCategory::MolecularBiology);
    assert_eq!(data.materials, vec!["Cas9 protein", "sgRNA"]);
    assert_eq!(data.steps.len(), 2);
    assert_eq!(data.steps[0].day, 1);
    assert_eq!(data.steps[1].day, 2);
    assert!(!data.steps[0].critical);
    assert!(data.steps[1].critical);
    assert_eq!(data.steps[0].stage, "Day 1 - Design sgRNA and prepare cells");
    assert!(data.tags.iter().any(|tag| tag == "CRISPR"));
}

#[test]
fn classify_line_applies_rules_in_priority_order() {
    assert_eq!(classify_line("Day -2"), LineKind::DayHeader);
    assert_eq!(classify_line("D0"), LineKind::DayHeader);
    assert_eq!(classify_line("3rd day"), LineKind::DayHeader);
    assert_eq!(classify_line("after 2 days"), LineKind::DayHeader);
    assert_eq!(classify_line("1) Spin down"), LineKind::NumberedStep);
    assert_eq!(classify_line("2. Wash twice"), LineKind::NumberedStep);
    assert_eq!(classify_line("• Gloves"), LineKind::BulletedStep);
    assert_eq!(classify_line("* Gloves"), LineKind::BulletedStep);
    assert_eq!(
        classify_line("Reagents:"),
        LineKind::SectionHeader(SectionKind::Materials)
    );
    assert_eq!(
        classify_line("Safety notes: wear gloves"),
        LineKind::SectionHeader(SectionKind::Safety)
    );
    assert_eq!(
        classify_line("Overview:"),
        LineKind::SectionHeader(SectionKind::Description)
    );
    assert_eq!(
        classify_line("Procedure"),
        LineKind::SectionHeader(SectionKind::Procedure)
    );
    assert_eq!(classify_line("Reagents were thawed on ice"), LineKind::Text);
    assert_eq!(classify_line("Incubate overnight"), LineKind::Text);
}

#[test]
fn classify_lines_drops_blank_lines_and_keeps_indentation() {
    let lines = classify_lines("1. Add media\n\n   gently\n  \n");

    assert_eq!(lines.len(), 2);
    assert_eq!(lines[1].text, "gently");
    assert!(lines[1].is_indented());
}

#[test]
fn parse_day_header_resolves_supported_forms() {
    assert_eq!(parse_day_header("D0").map(|header| header.day), Some(0));
    assert_eq!(parse_day_header("2nd day").map(|header| header.day), Some(2));
    assert_eq!(
        parse_day_header("after 3 days").map(|header| header.day),
        Some(3)
    );

    let range = parse_day_header("Day 2-4").expect("range header");
    assert_eq!(range.day, 2);
    assert_eq!(range.range_end, Some(4));
    assert_eq!(range.label, "Day 2-4");

    let described = parse_day_header("Day 1 - Seed cells").expect("described header");
    assert_eq!(described.label, "Day 1 - Seed cells");
    assert_eq!(described.description, Some("Seed cells"));
    assert_eq!(described.trailing, None);

    let trailing = parse_day_header("Day 3 cells look confluent").expect("trailing header");
    assert_eq!(trailing.label, "Day 3");
    assert_eq!(trailing.trailing, Some("cells look confluent"));
}

#[test]
fn negative_day_ordering_is_independent_of_input_order() {
    let text = "Day 2-4: Selection\n1. Add puromycin to transfected cells\nDay -2\n1. Thaw HEK293T cells into a T75 flask\nDay 0\n1. Transfect cells with plasmid DNA";
    let data = parse(text);

    let days = data.steps.iter().map(|step| step.day).collect::<Vec<i32>>();
    assert_eq!(days, vec![-2, 0, 2]);

    let ids = data.steps.iter().map(|step| step.id).collect::<Vec<u32>>();
    assert_eq!(ids, vec![1, 2, 3]);

    assert_eq!(data.steps[0].stage, "Day -2");
    assert_eq!(data.steps[1].stage, "Day 0 - Treatment");
    assert_eq!(data.steps[2].stage, "Day 2-4 - Selection");
}

#[test]
fn reparsing_sorted_steps_keeps_the_same_order() {
    let first = parse("Day 3\n1. Image the plate\nDay -1\n1. Coat wells with matrigel\n2. Thaw the vial\nDay 0\n1. Seed the cells");
    let rendered = first
        .steps
        .iter()
        .map(|step| format!("Day {}\n1. {}", step.day, step.description))
        .collect::<Vec<String>>()
        .join("\n");
    let second = parse(&rendered);

    let summarize = |data: &crate::model::ProtocolFormData| {
        data.steps
            .iter()
            .map(|step| (step.day, step.description.clone()))
            .collect::<Vec<(i32, String)>>()
    };
    assert_eq!(summarize(&first), summarize(&second));
}

#[test]
fn every_line_lands_in_exactly_one_bucket() {
    let text = "Title line\nMaterials: A, B\nDay 1: Seed\n1. Seed cells\n- extra\nSafety:\n- gloves\nDay 2 harvest all cells now";
    let lines = classify_lines(text);
    let buckets = group_by_day(&lines);

    let absorbed = buckets.iter().map(DayBucket::line_count).sum::<usize>();
    assert_eq!(absorbed, lines.len());
    assert_eq!(buckets.len(), 3);
    assert!(!buckets[0].explicit);
    assert_eq!(buckets[1].lines.len(), 2);
    assert_eq!(buckets[2].lines[0].text, "harvest all cells now");
}

#[test]
fn continuation_lines_attach_to_the_previous_step() {
    let text = "1. Add media to the dish\n   gently, along the wall\nplain line appended here\n2. This step is critical: cells must not dry out\nNext plain line starts a new step";
    let data = parse(text);

    assert_eq!(data.steps.len(), 3);
    assert_eq!(
        data.steps[0].description,
        "Add media to the dish gently, along the wall plain line appended here"
    );
    assert!(data.steps[1].critical);
    assert_eq!(data.steps[2].description, "Next plain line starts a new step");
    assert!(!data.steps[2].critical);
}

#[test]
fn unstructured_text_becomes_a_single_step() {
    let data = parse("Incubate the plate overnight at 37 degrees");

    assert_eq!(data.steps.len(), 1);
    assert_eq!(data.steps[0].day, 0);
    assert!(
        data.warnings
            .iter()
            .any(|warning| warning.contains("no day headers"))
    );
}

#[test]
fn empty_or_trivial_input_still_yields_one_step() {
    for text in ["", "Short note", "\n\n  \n"] {
        let data = parse(text);
        assert_eq!(data.steps.len(), 1, "input: {text:?}");
        assert_eq!(data.steps[0].id, 1);
        assert_eq!(data.materials, vec![String::new()]);
    }

    assert_eq!(parse("").title, "Imported Protocol");
}

#[test]
fn short_day_description_becomes_the_step() {
    let data = parse("Day 1: Seed cells");

    assert_eq!(data.steps.len(), 1);
    assert_eq!(data.steps[0].title, "Seed cells");
    assert_eq!(data.steps[0].stage, "Day 1 - Seed cells");
}

#[test]
fn step_notes_are_split_from_the_description() {
    let data = parse("1. Spin down the cells\nNote: keep on ice");

    assert_eq!(data.steps.len(), 1);
    assert_eq!(data.steps[0].description, "Spin down the cells");
    assert_eq!(data.steps[0].notes.as_deref(), Some("keep on ice"));
}

#[test]
fn derive_title_prefers_first_sentence_then_first_words() {
    assert_eq!(
        derive_title("Wash the cells. Then add trypsin and wait."),
        "Wash the cells"
    );
    assert_eq!(
        derive_title("Add the transfection mix dropwise onto the cells"),
        "Add the transfection mix dropwise"
    );

    let long = format!("{}. Second sentence.", "a".repeat(80));
    let title = derive_title(&long);
    assert_eq!(title.chars().count(), 60);
    assert!(title.ends_with("..."));
}

#[test]
fn duration_keeps_only_the_first_match() {
    assert_eq!(
        extract_duration("Incubate 30 min then wash for 10 minutes").as_deref(),
        Some("30 min")
    );
    assert_eq!(
        extract_duration("Spin at 300 g for 5 minutes").as_deref(),
        Some("5 minutes")
    );
    assert_eq!(extract_duration("Aspirate the media"), None);
}

#[test]
fn critical_vocabulary_is_matched_on_whole_words() {
    assert!(is_critical("Do not skip the DNase treatment"));
    assert!(is_critical("It is essential to pre-warm media"));
    assert!(!is_critical("Add mustard-free buffer"));
}

#[test]
fn stage_label_appends_category_only_for_unqualified_days() {
    assert_eq!(
        steps::stage_label("Day 0", "Harvest and centrifuge cells"),
        "Day 0 - Collection"
    );
    assert_eq!(
        steps::stage_label("Day 2-4", "Harvest and centrifuge cells"),
        "Day 2-4"
    );
    assert_eq!(steps::stage_label("Day 5", "Wait"), "Day 5");
}

#[test]
fn materials_section_ends_at_numbered_steps() {
    let data = parse("Materials:\n- DMEM\n- FBS; PBS\n- DMEM\n1. Thaw the cells quickly");

    assert_eq!(data.materials, vec!["DMEM", "FBS", "PBS"]);
    assert_eq!(data.steps.len(), 1);
    assert_eq!(data.steps[0].description, "Thaw the cells quickly");
}

#[test]
fn material_items_are_filtered_and_capped() {
    let chunk = (0..30)
        .map(|index| format!("Reagent {index}"))
        .collect::<Vec<String>>()
        .join(", ");
    let items = sections::split_material_items(&[chunk.as_str(), "x", &"y".repeat(120)]);

    assert_eq!(items.len(), 20);
    assert_eq!(items[0], "Reagent 0");
}

#[test]
fn safety_notes_collect_prefixes_and_blocks() {
    let lines = classify_lines(
        "Caution: wear gloves\nWarning - toxic.\nSafety:\n- Work in a hood\n1. Mix reagents",
    );

    assert_eq!(
        extract_safety_notes(&lines),
        "wear gloves. toxic. Work in a hood"
    );
}

#[test]
fn estimated_time_prefers_the_first_hit() {
    let lines = classify_lines("Total time: 3 days\nIncubate 2 hours");
    assert_eq!(extract_estimated_time(&lines), "3 days");

    let lines = classify_lines("Seed cells\nIncubate 2 hours, then 30 minutes");
    assert_eq!(extract_estimated_time(&lines), "2 hours");

    assert_eq!(extract_estimated_time(&classify_lines("No timing")), "");
}

#[test]
fn estimated_time_keeps_decimal_values() {
    let lines = classify_lines("Total time: 1.5 hours");
    assert_eq!(extract_estimated_time(&lines), "1.5 hours");

    let lines = classify_lines("Duration: 2.5 h. Then rest on ice");
    assert_eq!(extract_estimated_time(&lines), "2.5 h");
}

#[test]
fn inline_description_header_leaves_following_text_as_a_step() {
    let data =
        parse("Description: Quick thaw.\nIncubate the cells overnight at 37C with gentle shaking.");

    assert_eq!(data.description, "Quick thaw.");
    assert_eq!(data.steps.len(), 1);
    assert_eq!(
        data.steps[0].description,
        "Incubate the cells overnight at 37C with gentle shaking."
    );
}

#[test]
fn inline_safety_header_leaves_following_text_as_a_step() {
    let data = parse("Safety: Wear gloves and goggles\nThaw the vial quickly in a 37C water bath.");

    assert_eq!(data.safety_notes, "Wear gloves and goggles");
    assert_eq!(data.steps.len(), 1);
    assert_eq!(
        data.steps[0].description,
        "Thaw the vial quickly in a 37C water bath."
    );
}

#[test]
fn bare_safety_header_still_collects_a_block() {
    let data = parse("Safety:\nWear gloves at all times\n1. Thaw the vial");

    assert_eq!(data.safety_notes, "Wear gloves at all times");
    assert_eq!(data.steps.len(), 1);
    assert_eq!(data.steps[0].description, "Thaw the vial");
}

#[test]
fn description_uses_prefix_then_sentence_fallback() {
    let lines = classify_lines("My Protocol\nSummary: Knock out gene X in HEK293 cells.");
    assert_eq!(
        extract_description(&lines),
        "Knock out gene X in HEK293 cells."
    );

    let lines = classify_lines(
        "Lentivirus titration\nThis protocol describes a quick lentivirus titration. It uses HEK293T cells.\n1. Seed cells",
    );
    assert_eq!(
        extract_description(&lines),
        "This protocol describes a quick lentivirus titration."
    );

    assert_eq!(extract_description(&classify_lines(CRISPR_PROTOCOL)), "");
}

#[test]
fn description_fallback_keeps_decimals_inside_a_sentence() {
    let lines = classify_lines("Buffer prep\nAdd 1.5 mL of buffer to each tube. Spin briefly.");
    assert_eq!(
        extract_description(&lines),
        "Add 1.5 mL of buffer to each tube."
    );
}

#[test]
fn header_fields_are_read_from_lab_note_lines() {
    let data = parse(
        "Experiment ID: EXP-2024-007\nDate: 2024-03-15\nResearcher: Dr. Jane Smith\nPCR amplification protocol\n1. Mix primers",
    );

    assert_eq!(data.experiment_id.as_deref(), Some("EXP-2024-007"));
    assert_eq!(data.date.as_deref(), Some("2024-03-15"));
    assert_eq!(data.researcher.as_deref(), Some("Dr. Jane Smith"));
    assert_eq!(data.title, "PCR amplification protocol");

    let plain = parse(CRISPR_PROTOCOL);
    assert_eq!(plain.experiment_id, None);
    assert_eq!(plain.date, None);
    assert_eq!(plain.researcher, None);
}

#[test]
fn header_field_patterns_need_a_real_value() {
    assert_eq!(
        extract_experiment_id(&classify_lines("Exp #12")).as_deref(),
        Some("12")
    );
    assert_eq!(
        extract_experiment_id(&classify_lines("Experiment: CRISPR knockout")),
        None
    );
    assert_eq!(
        extract_experiment_id(&classify_lines("Experiment notes: fine")),
        None
    );
    assert_eq!(
        extract_date(&classify_lines("Harvested on 3/14/24")).as_deref(),
        Some("3/14/24")
    );
    assert_eq!(
        extract_researcher(&classify_lines("Author: A. Lovelace")).as_deref(),
        Some("A. Lovelace")
    );
}

#[test]
fn named_sections_run_until_the_next_named_header() {
    let lines = classify_lines(
        "Plasmid prep\nMethods: Standard miniprep\nSpin 1 min\nResults:\nYield 250 ng/uL\nNotes: Repeat tomorrow\nDiscussion:",
    );
    let sections = extract_named_sections(&lines);

    assert_eq!(sections.len(), 3);
    assert_eq!(sections["methods"], "Standard miniprep\nSpin 1 min");
    assert_eq!(sections["results"], "Yield 250 ng/uL");
    assert_eq!(sections["observations"], "Repeat tomorrow");
    assert!(!sections.contains_key("discussion"));
}

#[test]
fn title_patterns_win_over_the_generic_line() {
    let lines = classify_lines("Lab notebook page 4\nTitle: Plasmid miniprep\nDay 1");
    assert_eq!(extract_title(&lines), "Plasmid miniprep");

    let lines = classify_lines("Procedure: Western blot for GAPDH");
    assert_eq!(extract_title(&lines), "Western blot for GAPDH");

    let lines = classify_lines("Day 1\nSeed the cells in a plate");
    assert_eq!(extract_title(&lines), "Seed the cells in a plate");
}

#[test]
fn category_ties_and_empty_scores_default_to_general() {
    assert_eq!(classify_category("PCR and western"), ProtocolCategory::General);
    assert_eq!(classify_category("Hello world"), ProtocolCategory::General);
    assert_eq!(
        classify_category("Prepare the library for Illumina sequencing and check reads"),
        ProtocolCategory::Ngs
    );
    assert_eq!(
        classify_category("Split cells at 80% confluency in DMEM with FBS"),
        ProtocolCategory::CellCulture
    );
}

#[test]
fn tags_are_deduplicated_and_capped() {
    let tags = generate_tags("PCR DNA RNA protein CRISPR qPCR pcr");
    assert_eq!(tags, vec!["PCR", "qPCR", "DNA", "RNA", "protein"]);

    let tags = generate_tags("Add ligase and kinase with glycine and chloride");
    assert_eq!(tags, vec!["ligase", "kinase", "glycine"]);

    assert!(generate_tags("Increase the routine dose").is_empty());

    let tags = generate_tags("Treat with DNase, then please check the database");
    assert_eq!(tags, vec!["dnase"]);
}

#[test]
fn measurements_cover_the_common_units() {
    let measurements = extract_measurements("Incubate at 37°C for 30 min in 10 ml PBS at pH 7.4");

    let find = |kind: &str| {
        measurements
            .iter()
            .find(|measurement| measurement.kind == kind)
            .map(|measurement| measurement.value)
    };
    assert_eq!(find("temperature"), Some(37.0));
    assert_eq!(find("pH"), Some(7.4));
    assert_eq!(find("volume"), Some(10.0));
    assert_eq!(find("time"), Some(30.0));
    assert_eq!(find("concentration"), None);
}
