use std::path::{Path, PathBuf};
use std::process::Command;

use serde::Serialize;

use crate::domain::GenomeAccession;
use crate::error::FetchError;

#[derive(Debug, Clone, Serialize)]
pub struct ToolInfo {
    pub datasets: Option<String>,
}

pub trait DatasetsClient: Send + Sync {
    fn download_genome(
        &self,
        accession: &GenomeAccession,
        destination: &Path,
    ) -> Result<(), FetchError>;
    fn tool_info(&self) -> ToolInfo;
}

#[derive(Clone)]
pub struct SystemDatasetsClient {
    datasets: Option<PathBuf>,
}

impl SystemDatasetsClient {
    pub fn new() -> Self {
        Self {
            datasets: find_in_path("datasets"),
        }
    }

    fn require_datasets(&self) -> Result<&PathBuf, FetchError> {
        self.datasets
            .as_ref()
            .ok_or_else(|| FetchError::MissingTool("datasets".to_string()))
    }
}

impl DatasetsClient for SystemDatasetsClient {
    fn download_genome(
        &self,
        accession: &GenomeAccession,
        destination: &Path,
    ) -> Result<(), FetchError> {
        let datasets = self.require_datasets()?;
        let output = Command::new(datasets)
            .arg("download")
            .arg("genome")
            .arg("accession")
            .arg(accession.as_str())
            .arg("--include")
            .arg("genome")
            .arg("--filename")
            .arg(destination)
            .output()
            .map_err(|err| FetchError::ToolInvocation(err.to_string()))?;
        if output.status.success() {
            return Ok(());
        }
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        let stderr = if stderr.is_empty() {
            format!("datasets exited with {}", output.status)
        } else {
            stderr
        };
        Err(FetchError::DownloadFailed {
            accession: accession.as_str().to_string(),
            stderr,
        })
    }

    fn tool_info(&self) -> ToolInfo {
        ToolInfo {
            datasets: self
                .datasets
                .as_ref()
                .and_then(|path| tool_version(path, &["--version"])),
        }
    }
}

fn find_in_path(name: &str) -> Option<PathBuf> {
    let path_var = std::env::var_os("PATH")?;
    for path in std::env::split_paths(&path_var) {
        let exe = path.join(format!("{name}.exe"));
        if exe.exists() {
            return Some(exe);
        }
        let plain = path.join(name);
        if plain.exists() {
            return Some(plain);
        }
    }
    None
}

fn tool_version(path: &Path, args: &[&str]) -> Option<String> {
    let output = Command::new(path).args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if stdout.is_empty() { None } else { Some(stdout) }
}
