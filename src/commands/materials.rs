use anyhow::{Context, Result};
use tracing::{info, warn};

use super::{ExtractionManifest, emit};
use crate::cli::MaterialsArgs;

pub fn run(args: MaterialsArgs) -> Result<()> {
    let cells = labparse::materials::read_cells_file(&args.input)?;
    let parsed = labparse::materials::parse_with_layout(&cells, args.layout.forced())
        .with_context(|| format!("failed to parse materials from {}", args.input.display()))?;

    let flagged = parsed
        .detected_materials
        .iter()
        .filter(|material| !material.warnings.is_empty())
        .count();
    if flagged > 0 {
        warn!(flagged, "some detected materials need review");
    }

    let detected_before_filter = parsed.total_detected;
    let result = parsed.retain_confident(args.min_confidence);
    info!(
        layout = ?result.layout,
        requested_layout = args.layout.as_str(),
        detected = detected_before_filter,
        kept = result.total_detected,
        parsed = result.successful_parsed,
        "materials parsed"
    );

    let manifest = ExtractionManifest::for_source(&args.input, "materials", result)?;
    emit(&manifest, args.output.as_deref())
}
