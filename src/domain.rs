use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::FetchError;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GenomeAccession(String);

impl GenomeAccession {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GenomeAccession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for GenomeAccession {
    type Err = FetchError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_string();
        let has_prefix = normalized.starts_with("GCF_") || normalized.starts_with("GCA_");
        let parts = normalized.split('.').collect::<Vec<_>>();
        let has_numeric = parts
            .first()
            .map(|prefix| prefix.trim_start_matches("GCF_").trim_start_matches("GCA_"))
            .map(|rest| rest.chars().all(|ch| ch.is_ascii_digit()) && !rest.is_empty())
            .unwrap_or(false);
        let version_ok = parts.len() <= 2
            && parts
                .get(1)
                .map(|version| version.chars().all(|ch| ch.is_ascii_digit()) && !version.is_empty())
                .unwrap_or(true);
        if !has_prefix || !has_numeric || !version_ok {
            return Err(FetchError::InvalidGenomeAccession(value.to_string()));
        }
        Ok(Self(normalized))
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn parse_genome_accession_valid() {
        let acc: GenomeAccession = "GCF_000005845.2".parse().unwrap();
        assert_eq!(acc.as_str(), "GCF_000005845.2");
    }

    #[test]
    fn parse_genome_accession_unversioned() {
        let acc: GenomeAccession = "GCA_000001405".parse().unwrap();
        assert_eq!(acc.as_str(), "GCA_000001405");
    }

    #[test]
    fn parse_genome_accession_trims_whitespace() {
        let acc: GenomeAccession = "  GCF_000005845.2\t".parse().unwrap();
        assert_eq!(acc.as_str(), "GCF_000005845.2");
    }

    #[test]
    fn parse_genome_accession_invalid_prefix() {
        let err = "ABC_123".parse::<GenomeAccession>().unwrap_err();
        assert_matches!(err, FetchError::InvalidGenomeAccession(_));
    }

    #[test]
    fn parse_genome_accession_rejects_shell_metacharacters() {
        let err = "GCF_000005845.2; rm -rf /".parse::<GenomeAccession>().unwrap_err();
        assert_matches!(err, FetchError::InvalidGenomeAccession(_));
    }

    #[test]
    fn parse_genome_accession_rejects_empty_numeric_part() {
        let err = "GCF_".parse::<GenomeAccession>().unwrap_err();
        assert_matches!(err, FetchError::InvalidGenomeAccession(_));
    }
}
