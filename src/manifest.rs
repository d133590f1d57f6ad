use std::fs;

use camino::Utf8Path;

use crate::domain::GenomeAccession;
use crate::error::FetchError;

#[derive(Debug, Clone)]
pub struct Manifest {
    pub accessions: Vec<GenomeAccession>,
}

impl Manifest {
    pub fn load(path: &Utf8Path) -> Result<Self, FetchError> {
        let content = fs::read_to_string(path.as_std_path())
            .map_err(|_| FetchError::ManifestRead(path.as_std_path().to_path_buf()))?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, FetchError> {
        let accessions = content
            .lines()
            .skip(1)
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::parse)
            .collect::<Result<Vec<GenomeAccession>, FetchError>>()?;
        Ok(Self { accessions })
    }

    pub fn len(&self) -> usize {
        self.accessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accessions.is_empty()
    }
}
