use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use zip::ZipArchive;

use crate::error::FetchError;

fn fs_err(err: impl std::fmt::Display) -> FetchError {
    FetchError::Filesystem(err.to_string())
}

pub fn validate_zip(zip_path: &Path) -> Result<(), FetchError> {
    let file = fs::File::open(zip_path)
        .map_err(|err| FetchError::Filesystem(format!("open zip {}: {err}", zip_path.display())))?;
    let mut archive = ZipArchive::new(file).map_err(fs_err)?;

    for index in 0..archive.len() {
        let mut entry = archive.by_index(index).map_err(fs_err)?;
        if entry.is_dir() {
            continue;
        }
        io::copy(&mut entry, &mut io::sink()).map_err(fs_err)?;
    }
    Ok(())
}

pub fn extract_zip(zip_path: &Path, target_dir: &Path) -> Result<(), FetchError> {
    let file = fs::File::open(zip_path)
        .map_err(|err| FetchError::Filesystem(format!("open zip {}: {err}", zip_path.display())))?;
    let mut archive = ZipArchive::new(file).map_err(fs_err)?;

    for index in 0..archive.len() {
        let mut entry = archive.by_index(index).map_err(fs_err)?;
        let Some(relative) = entry.enclosed_name() else {
            return Err(FetchError::Filesystem(
                "zip entry path traversal detected".to_string(),
            ));
        };
        let entry_path = target_dir.join(relative);

        if entry.is_dir() {
            fs::create_dir_all(&entry_path).map_err(fs_err)?;
            continue;
        }

        if let Some(parent) = entry_path.parent() {
            fs::create_dir_all(parent).map_err(fs_err)?;
        }
        let mut outfile = fs::File::create(&entry_path).map_err(fs_err)?;
        io::copy(&mut entry, &mut outfile).map_err(fs_err)?;
    }
    Ok(())
}

pub fn find_files_with_extension(root: &Path, ext: &str) -> Vec<PathBuf> {
    let mut found = Vec::new();
    let mut stack = vec![root.to_path_buf()];
    while let Some(dir) = stack.pop() {
        let Ok(entries) = fs::read_dir(&dir) else {
            continue;
        };
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                stack.push(path);
            } else if path
                .extension()
                .and_then(|value| value.to_str())
                .map(|value| value.eq_ignore_ascii_case(ext))
                .unwrap_or(false)
            {
                found.push(path);
            }
        }
    }
    found.sort();
    found
}
