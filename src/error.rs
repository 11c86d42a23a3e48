use std::path::PathBuf;

use thiserror::Error;

/// Structurally invalid input handed to the table pipeline.
///
/// Content problems (unknown names, missing positions, odd headers) never end
/// up here; they degrade into warnings on the individual records.
#[derive(Error, Debug)]
pub enum InputError {
    #[error("cell matrix is empty")]
    EmptyMatrix,

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read spreadsheet {}: {source}", path.display())]
    Spreadsheet {
        path: PathBuf,
        #[source]
        source: calamine::Error,
    },

    #[error("failed to read delimited file {}: {source}", path.display())]
    Delimited {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("workbook has no worksheet: {}", path.display())]
    NoWorksheet { path: PathBuf },

    #[error("unsupported input format: {}", path.display())]
    UnsupportedFormat { path: PathBuf },

    #[error("failed to parse cell matrix json {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
