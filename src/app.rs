use std::fs;
use std::time::{Duration, Instant};

use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};

use crate::datasets::DatasetsClient;
use crate::domain::GenomeAccession;
use crate::error::FetchError;
use crate::fs_util;
use crate::manifest::Manifest;
use crate::store::{self, OutputDir};

#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub input: Utf8PathBuf,
    pub output: Utf8PathBuf,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchResult {
    pub attempted: usize,
    pub failed: usize,
    pub items: Vec<AccessionOutcome>,
}

impl BatchResult {
    pub fn succeeded(&self) -> usize {
        self.attempted - self.failed
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessionOutcome {
    pub accession: String,
    pub action: String,
    pub sequence_files: Vec<String>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub tool: String,
    pub finished_at: String,
    pub attempted: usize,
    pub failed: usize,
    pub items: Vec<AccessionOutcome>,
}

#[derive(Debug, Clone)]
pub struct ProgressEvent {
    pub message: String,
    pub elapsed: Option<Duration>,
}

pub trait ProgressSink {
    fn event(&self, event: ProgressEvent);
}

#[derive(Clone)]
pub struct App<D: DatasetsClient> {
    datasets: D,
}

impl<D: DatasetsClient> App<D> {
    pub fn new(datasets: D) -> Self {
        Self { datasets }
    }

    pub fn run(
        &self,
        config: &FetchConfig,
        sink: &dyn ProgressSink,
    ) -> Result<BatchResult, FetchError> {
        let input = store::absolute(&config.input)?;
        let output = OutputDir::new(store::absolute(&config.output)?);
        output.ensure()?;

        let manifest = Manifest::load(&input)?;
        let total = manifest.len();
        sink.event(ProgressEvent {
            message: format!("found {total} assembly accessions"),
            elapsed: None,
        });

        let mut items = Vec::with_capacity(total);
        let mut failed = 0usize;
        for (index, accession) in manifest.accessions.iter().enumerate() {
            sink.event(ProgressEvent {
                message: format!("downloading {accession} ({}/{total})", index + 1),
                elapsed: None,
            });
            match self.fetch_one(accession, &output, sink) {
                Ok(sequence_files) => {
                    sink.event(ProgressEvent {
                        message: format!("{accession} downloaded"),
                        elapsed: None,
                    });
                    items.push(AccessionOutcome {
                        accession: accession.as_str().to_string(),
                        action: "downloaded".to_string(),
                        sequence_files,
                        error: None,
                    });
                }
                Err(FetchError::DownloadFailed { stderr, .. }) => {
                    tracing::warn!(accession = accession.as_str(), "download failed");
                    sink.event(ProgressEvent {
                        message: format!("ERROR: {stderr}"),
                        elapsed: None,
                    });
                    failed += 1;
                    items.push(AccessionOutcome {
                        accession: accession.as_str().to_string(),
                        action: "failed".to_string(),
                        sequence_files: Vec::new(),
                        error: Some(stderr),
                    });
                }
                Err(other) => return Err(other),
            }
        }

        let archived = output.archive_input(&input)?;
        sink.event(ProgressEvent {
            message: format!("input list moved to {archived}"),
            elapsed: None,
        });

        let result = BatchResult {
            attempted: total,
            failed,
            items,
        };
        store::write_json_atomic(&output.report_path(), &build_report(&result))?;
        Ok(result)
    }

    fn fetch_one(
        &self,
        accession: &GenomeAccession,
        output: &OutputDir,
        sink: &dyn ProgressSink,
    ) -> Result<Vec<String>, FetchError> {
        let scratch = output.scratch()?;
        let zip_path = scratch.path().join("ncbi_dataset.zip");

        sink.event(ProgressEvent {
            message: "datasets.request".to_string(),
            elapsed: None,
        });
        let start = Instant::now();
        self.datasets.download_genome(accession, &zip_path)?;
        let latency = start.elapsed().as_millis();
        sink.event(ProgressEvent {
            message: format!("datasets.response latency_ms={latency}"),
            elapsed: None,
        });

        if !zip_path.exists() {
            return Err(FetchError::Filesystem(format!(
                "datasets did not produce {}",
                zip_path.display()
            )));
        }

        sink.event(ProgressEvent {
            message: "unpacking and relocating sequence files".to_string(),
            elapsed: None,
        });
        fs_util::validate_zip(&zip_path)?;
        let extract_dir = scratch.path().join("extract");
        fs::create_dir_all(&extract_dir).map_err(|err| FetchError::Filesystem(err.to_string()))?;
        fs_util::extract_zip(&zip_path, &extract_dir)?;

        let sequences = fs_util::find_files_with_extension(&extract_dir, "fna");
        if sequences.is_empty() {
            return Err(FetchError::MissingSequence(accession.as_str().to_string()));
        }

        let data_dir = output.data_dir();
        let mut moved = Vec::with_capacity(sequences.len());
        for source in sequences {
            let name = source.file_name().ok_or_else(|| {
                FetchError::Filesystem(format!(
                    "sequence file without a name: {}",
                    source.display()
                ))
            })?;
            let dest = data_dir.as_std_path().join(name);
            store::move_file(&source, &dest)?;
            let dest = Utf8PathBuf::from_path_buf(dest)
                .map_err(|_| FetchError::Filesystem("non-utf8 sequence file name".to_string()))?;
            moved.push(dest.into_string());
        }
        Ok(moved)
    }
}

fn build_report(result: &BatchResult) -> RunReport {
    RunReport {
        tool: format!("asm-fetch/{}", env!("CARGO_PKG_VERSION")),
        finished_at: iso_timestamp(),
        attempted: result.attempted,
        failed: result.failed,
        items: result.items.clone(),
    }
}

fn iso_timestamp() -> String {
    chrono::Utc::now().to_rfc3339()
}
