//! Why a feed record did not yield a domain.

use thiserror::Error;

/// A record the normalizer skipped. Never fatal; the pipeline counts these by [`Rejection::code`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("empty record")]
    Empty,

    #[error("comment line")]
    Comment,

    #[error("malformed URL: {0}")]
    InvalidUrl(url::ParseError),

    #[error("URL has no host")]
    MissingHost,

    #[error("IP address literal")]
    IpLiteral,

    #[error("domain has an empty label")]
    EmptyLabel,

    #[error("not a domain name")]
    Pattern,

    #[error("URL is not domain-only")]
    NotDomainOnly,
}

impl Rejection {
    /// Stable short code used as a counter key in run reports and logs.
    pub fn code(&self) -> &'static str {
        match self {
            Rejection::Empty => "empty",
            Rejection::Comment => "comment",
            Rejection::InvalidUrl(_) => "invalid_url",
            Rejection::MissingHost => "missing_host",
            Rejection::IpLiteral => "ip_literal",
            Rejection::EmptyLabel => "empty_label",
            Rejection::Pattern => "pattern",
            Rejection::NotDomainOnly => "not_domain_only",
        }
    }
}
