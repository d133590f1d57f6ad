use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum FetchError {
    #[error("invalid genome accession: {0}")]
    InvalidGenomeAccession(String),

    #[error("failed to read accession list at {0}")]
    ManifestRead(PathBuf),

    #[error("required tool not found: {0}")]
    MissingTool(String),

    #[error("failed to invoke datasets: {0}")]
    ToolInvocation(String),

    #[error("download failed for {accession}: {stderr}")]
    DownloadFailed { accession: String, stderr: String },

    #[error("no sequence file (.fna) in archive for {0}")]
    MissingSequence(String),

    #[error("filesystem error: {0}")]
    Filesystem(String),
}
