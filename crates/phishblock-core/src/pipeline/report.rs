//! Per-source outcomes of a pipeline run.

use std::collections::BTreeMap;
use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::fetch::FetchError;
use crate::normalize::Rejection;

/// Why a source produced no blocklist this run. Its previous output file is untouched.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("writing {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Counts of records skipped by the normalizer, keyed by [`Rejection::code`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RejectionCounts(BTreeMap<&'static str, usize>);

impl RejectionCounts {
    pub fn record(&mut self, rejection: &Rejection) {
        *self.0.entry(rejection.code()).or_insert(0) += 1;
    }

    pub fn get(&self, code: &str) -> usize {
        self.0.get(code).copied().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.0.values().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, usize)> + '_ {
        self.0.iter().map(|(k, v)| (*k, *v))
    }
}

impl fmt::Display for RejectionCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (code, n) in self.iter() {
            if !first {
                f.write_str(", ")?;
            }
            write!(f, "{}={}", code, n)?;
            first = false;
        }
        Ok(())
    }
}

/// A source that fetched and wrote successfully.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceReport {
    pub name: String,
    pub output: PathBuf,
    /// Candidate records handed to the normalizer.
    pub records: usize,
    /// Unique domains written.
    pub domains: usize,
    pub rejected: RejectionCounts,
    /// SHA-256 (hex) of the file as written.
    pub sha256: String,
}

#[derive(Debug)]
pub struct SourceOutcome {
    pub name: String,
    pub result: Result<SourceReport, SourceError>,
}

/// Everything one run did, in source order.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub outcomes: Vec<SourceOutcome>,
}

impl RunSummary {
    pub fn succeeded(&self) -> impl Iterator<Item = &SourceReport> {
        self.outcomes.iter().filter_map(|o| o.result.as_ref().ok())
    }

    pub fn failed(&self) -> impl Iterator<Item = (&str, &SourceError)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().err().map(|e| (o.name.as_str(), e)))
    }

    pub fn all_ok(&self) -> bool {
        self.outcomes.iter().all(|o| o.result.is_ok())
    }
}
