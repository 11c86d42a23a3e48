//! Subcommand runners. Each reads its input, calls the engine and writes an
//! [`ExtractionManifest`] to a file or stdout.

use std::path::Path;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::util::{now_utc_string, print_json_pretty, sha256_file, write_json_pretty};

pub mod materials;
pub mod protocol;

const MANIFEST_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionManifest<T> {
    pub manifest_version: u32,
    pub generated_at: String,
    pub source_path: String,
    pub source_sha256: String,
    pub command: String,
    pub result: T,
}

impl<T> ExtractionManifest<T> {
    pub fn for_source(source: &Path, command: &str, result: T) -> Result<Self> {
        Ok(Self {
            manifest_version: MANIFEST_VERSION,
            generated_at: now_utc_string(),
            source_path: source.display().to_string(),
            source_sha256: sha256_file(source)?,
            command: command.to_string(),
            result,
        })
    }
}

pub fn emit<T: Serialize>(
    manifest: &ExtractionManifest<T>,
    output: Option<&Path>,
) -> Result<()> {
    match output {
        Some(path) => {
            write_json_pretty(path, manifest)?;
            info!(path = %path.display(), command = %manifest.command, "wrote extraction manifest");
        }
        None => print_json_pretty(manifest)?,
    }

    Ok(())
}
