//! Deduplicated, sorted hosts blocklist and its on-disk form.
//!
//! Output is one `0.0.0.0 <domain>` line per unique domain, ascending, joined
//! by `\n` with nothing after the last line. Files are written to a `.part`
//! sibling first and renamed over the target, so a failed run never leaves a
//! truncated list behind.

use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::normalize::Domain;

/// Temporary file suffix used before atomic rename.
pub const TEMP_SUFFIX: &str = ".part";

/// Path for the temp file: appends `.part` to the final path (e.g. `hosts.txt` → `hosts.txt.part`).
pub fn temp_path(final_path: &Path) -> PathBuf {
    let mut o = final_path.as_os_str().to_owned();
    o.push(TEMP_SUFFIX);
    PathBuf::from(o)
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Blocklist {
    domains: BTreeSet<Domain>,
}

impl Blocklist {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a domain; returns false if it was already present.
    pub fn insert(&mut self, domain: Domain) -> bool {
        self.domains.insert(domain)
    }

    pub fn len(&self) -> usize {
        self.domains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }

    pub fn domains(&self) -> impl Iterator<Item = &Domain> {
        self.domains.iter()
    }

    /// Hosts lines in ascending domain order.
    pub fn lines(&self) -> impl Iterator<Item = String> + '_ {
        self.domains.iter().map(Domain::hosts_line)
    }

    /// The full file body.
    pub fn render(&self) -> String {
        self.lines().collect::<Vec<_>>().join("\n")
    }

    /// Writes the rendered list to `path`, replacing any previous contents.
    /// Returns the bytes written so the caller can digest them.
    pub fn write_to(&self, path: &Path) -> io::Result<Vec<u8>> {
        let body = self.render().into_bytes();
        write_atomic(path, &body)?;
        Ok(body)
    }
}

impl Extend<Domain> for Blocklist {
    fn extend<T: IntoIterator<Item = Domain>>(&mut self, iter: T) {
        self.domains.extend(iter);
    }
}

impl FromIterator<Domain> for Blocklist {
    fn from_iter<T: IntoIterator<Item = Domain>>(iter: T) -> Self {
        Self {
            domains: iter.into_iter().collect(),
        }
    }
}

/// Write `data` to `<path>.part`, then rename over `path`. Creates parent dirs.
fn write_atomic(path: &Path, data: &[u8]) -> io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let tp = temp_path(path);
    if let Err(e) = fs::write(&tp, data).and_then(|()| fs::rename(&tp, path)) {
        let _ = fs::remove_file(&tp);
        return Err(e);
    }
    Ok(())
}
