use std::fs;
use std::io;
use std::path::Path;

use camino::{Utf8Path, Utf8PathBuf};
use serde::Serialize;
use tempfile::TempDir;

use crate::error::FetchError;

#[derive(Debug, Clone)]
pub struct OutputDir {
    root: Utf8PathBuf,
}

impl OutputDir {
    pub fn new(root: Utf8PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    pub fn data_dir(&self) -> Utf8PathBuf {
        self.root.join("data")
    }

    pub fn report_path(&self) -> Utf8PathBuf {
        self.root.join("fetch-report.json")
    }

    pub fn ensure(&self) -> Result<(), FetchError> {
        fs::create_dir_all(self.data_dir().as_std_path())
            .map_err(|err| FetchError::Filesystem(err.to_string()))
    }

    pub fn scratch(&self) -> Result<TempDir, FetchError> {
        tempfile::Builder::new()
            .prefix("asm-fetch")
            .tempdir_in(self.root.as_std_path())
            .map_err(|err| FetchError::Filesystem(err.to_string()))
    }

    pub fn archive_input(&self, input: &Utf8Path) -> Result<Utf8PathBuf, FetchError> {
        let name = input
            .file_name()
            .ok_or_else(|| FetchError::Filesystem(format!("invalid input path: {input}")))?;
        let dest = self.root.join(name);
        move_file(input.as_std_path(), dest.as_std_path())?;
        Ok(dest)
    }
}

pub fn absolute(path: &Utf8Path) -> Result<Utf8PathBuf, FetchError> {
    let resolved = std::path::absolute(path.as_std_path())
        .map_err(|err| FetchError::Filesystem(err.to_string()))?;
    Utf8PathBuf::from_path_buf(resolved)
        .map_err(|_| FetchError::Filesystem(format!("non-utf8 path: {path}")))
}

pub fn move_file(source: &Path, dest: &Path) -> Result<(), FetchError> {
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent).map_err(|err| FetchError::Filesystem(err.to_string()))?;
    }
    match fs::rename(source, dest) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == io::ErrorKind::CrossesDevices => {
            fs::copy(source, dest).map_err(|err| FetchError::Filesystem(err.to_string()))?;
            fs::remove_file(source).map_err(|err| FetchError::Filesystem(err.to_string()))?;
            Ok(())
        }
        Err(err) => Err(FetchError::Filesystem(format!(
            "move {} -> {}: {err}",
            source.display(),
            dest.display()
        ))),
    }
}

pub fn write_json_atomic<T: Serialize>(path: &Utf8Path, value: &T) -> Result<(), FetchError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent.as_std_path())
            .map_err(|err| FetchError::Filesystem(err.to_string()))?;
    }
    let tmp_path = path.with_extension("json.tmp");
    let content =
        serde_json::to_vec_pretty(value).map_err(|err| FetchError::Filesystem(err.to_string()))?;
    fs::write(tmp_path.as_std_path(), &content)
        .map_err(|err| FetchError::Filesystem(err.to_string()))?;
    fs::rename(tmp_path.as_std_path(), path.as_std_path())
        .map_err(|err| FetchError::Filesystem(err.to_string()))?;
    Ok(())
}
