//! Domain normalization for feed records.
//!
//! Turns one raw record (a bare domain, an `http(s)://` URL, or a CSV field)
//! into a canonical [`Domain`], or a [`Rejection`] saying why it was skipped:
//!
//! - surrounding whitespace is trimmed; blank and `#` comment records are rejected
//! - URLs contribute their host only (no credentials, port, path)
//! - leading `www.` labels are stripped and the result is folded to lowercase
//! - IP literals are rejected explicitly
//! - the remainder must look like `label(.label)*.tld` with an alphabetic TLD of 2+ chars
//!
//! In domain-only mode a URL that carries a path, query or fragment is rejected
//! outright instead of being reduced to its host.

mod rejection;

pub use rejection::Rejection;

use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use std::net::IpAddr;
use url::{Host, Url};

/// Address every blocked domain is pointed at in the hosts file.
pub const SINKHOLE_ADDR: &str = "0.0.0.0";

static DOMAIN_SHAPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").unwrap());

const WWW_PREFIX: &str = "www.";

/// A validated, lowercase domain name with no scheme, `www.` prefix, path or port.
///
/// Only [`normalize`] constructs these, so holding one means validation passed.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Domain(String);

impl Domain {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// The hosts-file line for this domain: `0.0.0.0 <domain>`.
    pub fn hosts_line(&self) -> String {
        format!("{} {}", SINKHOLE_ADDR, self.0)
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Domain {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Normalizes one raw feed record into a domain.
///
/// `domain_only` enables strict mode: URLs with a non-empty path, query or
/// fragment are rejected rather than reduced to their host.
pub fn normalize(raw: &str, domain_only: bool) -> Result<Domain, Rejection> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(Rejection::Empty);
    }
    if trimmed.starts_with('#') {
        return Err(Rejection::Comment);
    }

    let candidate = if has_http_scheme(trimmed) {
        host_from_url(trimmed, domain_only)?
    } else {
        trimmed.to_string()
    };

    let lowered = candidate.to_ascii_lowercase();
    let mut domain = lowered.as_str();
    while let Some(rest) = domain.strip_prefix(WWW_PREFIX) {
        domain = rest;
    }

    validate(domain)?;
    Ok(Domain(domain.to_string()))
}

fn has_http_scheme(s: &str) -> bool {
    let starts_with = |prefix: &str| {
        s.get(..prefix.len())
            .map(|head| head.eq_ignore_ascii_case(prefix))
            .unwrap_or(false)
    };
    starts_with("http://") || starts_with("https://")
}

fn host_from_url(input: &str, domain_only: bool) -> Result<String, Rejection> {
    let url = Url::parse(input).map_err(Rejection::InvalidUrl)?;
    let host = match url.host() {
        Some(Host::Domain(d)) => d.to_string(),
        Some(Host::Ipv4(_)) | Some(Host::Ipv6(_)) => return Err(Rejection::IpLiteral),
        None => return Err(Rejection::MissingHost),
    };
    if domain_only && has_trailing_structure(&url) {
        return Err(Rejection::NotDomainOnly);
    }
    Ok(host)
}

/// True if the URL has anything after the authority besides a bare `/`.
fn has_trailing_structure(url: &Url) -> bool {
    let path = !matches!(url.path(), "" | "/");
    let query = url.query().map(|q| !q.is_empty()).unwrap_or(false);
    let fragment = url.fragment().map(|f| !f.is_empty()).unwrap_or(false);
    path || query || fragment
}

fn validate(candidate: &str) -> Result<(), Rejection> {
    if candidate.is_empty() {
        return Err(Rejection::Empty);
    }
    if candidate.parse::<IpAddr>().is_ok() {
        return Err(Rejection::IpLiteral);
    }
    if candidate.split('.').any(str::is_empty) {
        return Err(Rejection::EmptyLabel);
    }
    if !DOMAIN_SHAPE.is_match(candidate) {
        return Err(Rejection::Pattern);
    }
    Ok(())
}
