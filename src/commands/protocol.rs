use anyhow::Result;
use tracing::{info, warn};

use super::{ExtractionManifest, emit};
use crate::cli::ProtocolArgs;
use crate::util::read_text_file;

pub fn run(args: ProtocolArgs) -> Result<()> {
    let text = read_text_file(&args.input)?;
    let form = labparse::protocol::parse(&text);

    for warning in &form.warnings {
        warn!(source = %args.input.display(), "{warning}");
    }
    info!(
        title = %form.title,
        category = %form.category,
        steps = form.steps.len(),
        measurements = form.measurements.len(),
        "protocol parsed"
    );

    let manifest = ExtractionManifest::for_source(&args.input, "protocol", form)?;
    emit(&manifest, args.output.as_deref())
}
