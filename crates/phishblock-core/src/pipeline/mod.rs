//! Sequential feed pipeline: fetch → split → normalize → dedupe → sort → write.
//!
//! Sources run one after another, each with its own result set. A source that
//! fails to fetch or write is reported and skipped; the others still run.

mod report;

pub use report::{RejectionCounts, RunSummary, SourceError, SourceOutcome, SourceReport};

use crate::blocklist::Blocklist;
use crate::checksum;
use crate::config::{FeedConfig, FeedFormat, FeedSource};
use crate::fetch::Fetch;
use crate::normalize::normalize;
use crate::select;

/// Domains collected from one feed body before writing.
#[derive(Debug, Default)]
pub struct Collected {
    pub blocklist: Blocklist,
    pub records: usize,
    pub rejected: RejectionCounts,
}

/// Splits `body` per `source.format` and normalizes every candidate record.
pub fn collect(body: &str, source: &FeedSource) -> Collected {
    match source.format {
        FeedFormat::Plaintext => collect_candidates(body.lines(), source.domain_only),
        FeedFormat::Csv(columns) => collect_candidates(
            select::select(select::read_rows(body), columns),
            source.domain_only,
        ),
    }
}

fn collect_candidates<I, S>(candidates: I, domain_only: bool) -> Collected
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out = Collected::default();
    for raw in candidates {
        out.records += 1;
        match normalize(raw.as_ref(), domain_only) {
            Ok(domain) => {
                out.blocklist.insert(domain);
            }
            Err(rejection) => {
                tracing::trace!("skipped {:?}: {}", raw.as_ref(), rejection);
                out.rejected.record(&rejection);
            }
        }
    }
    out
}

/// Fetches one source and overwrites its blocklist file.
///
/// On error nothing is written and the previous file stays as it was.
pub fn run_source<F: Fetch>(
    cfg: &FeedConfig,
    source: &FeedSource,
    fetcher: &F,
) -> Result<SourceReport, SourceError> {
    tracing::info!("source {}: fetching {}", source.name, source.url);
    let body = fetcher.fetch(&source.url)?;

    let collected = collect(&body, source);
    tracing::debug!(
        "source {}: {} records, {} unique domains, rejected [{}]",
        source.name,
        collected.records,
        collected.blocklist.len(),
        collected.rejected
    );

    let output = cfg.output_path(source);
    let written = collected
        .blocklist
        .write_to(&output)
        .map_err(|e| SourceError::Write {
            path: output.clone(),
            source: e,
        })?;

    let report = SourceReport {
        name: source.name.clone(),
        output,
        records: collected.records,
        domains: collected.blocklist.len(),
        rejected: collected.rejected,
        sha256: checksum::sha256_bytes(&written),
    };
    tracing::info!(
        "source {}: wrote {} domains to {}",
        report.name,
        report.domains,
        report.output.display()
    );
    Ok(report)
}

/// Runs `sources` in order. Never stops early on a per-source failure.
pub fn run<F: Fetch>(cfg: &FeedConfig, sources: &[&FeedSource], fetcher: &F) -> RunSummary {
    let mut summary = RunSummary::default();
    for source in sources {
        let result = run_source(cfg, source, fetcher);
        if let Err(e) = &result {
            match e {
                SourceError::Fetch(fe) => tracing::warn!(
                    "source {}: fetch failed ({}): {}",
                    source.name,
                    fe.kind(),
                    fe
                ),
                SourceError::Write { .. } => tracing::error!("source {}: {}", source.name, e),
            }
        }
        summary.outcomes.push(SourceOutcome {
            name: source.name.clone(),
            result,
        });
    }
    summary
}

/// Runs every configured source.
pub fn run_all<F: Fetch>(cfg: &FeedConfig, fetcher: &F) -> RunSummary {
    let sources: Vec<&FeedSource> = cfg.sources.iter().collect();
    run(cfg, &sources, fetcher)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::FetchError;
    use crate::select::CsvColumns;
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::fs;
    use std::path::PathBuf;

    /// Serves canned bodies by URL; unknown URLs fail with HTTP 404.
    #[derive(Default)]
    struct StubFetcher {
        bodies: HashMap<String, String>,
        calls: RefCell<Vec<String>>,
    }

    impl StubFetcher {
        fn with(mut self, url: &str, body: &str) -> Self {
            self.bodies.insert(url.to_string(), body.to_string());
            self
        }
    }

    impl Fetch for StubFetcher {
        fn fetch(&self, url: &str) -> Result<String, FetchError> {
            self.calls.borrow_mut().push(url.to_string());
            self.bodies.get(url).cloned().ok_or(FetchError::Http {
                url: url.to_string(),
                status: 404,
            })
        }
    }

    fn plaintext(name: &str) -> FeedSource {
        FeedSource {
            name: name.to_string(),
            url: format!("http://feeds.test/{}.txt", name),
            output: PathBuf::from(format!("{}.hosts", name)),
            domain_only: false,
            format: FeedFormat::Plaintext,
        }
    }

    fn csv_strict(name: &str) -> FeedSource {
        FeedSource {
            name: name.to_string(),
            url: format!("http://feeds.test/{}.csv", name),
            output: PathBuf::from(format!("{}.hosts", name)),
            domain_only: true,
            format: FeedFormat::Csv(CsvColumns {
                url_column: 1,
                verified_column: Some(4),
            }),
        }
    }

    fn config_in(dir: &std::path::Path, sources: Vec<FeedSource>) -> FeedConfig {
        FeedConfig {
            output_dir: Some(dir.to_path_buf()),
            sources,
            ..FeedConfig::default()
        }
    }

    #[test]
    fn plaintext_dedupes_and_skips_noise() {
        let body = "# header comment\n\nhttp://a.com\na.com\nhttp://www.a.com\n192.168.1.1\nb.com/path\n";
        let c = collect(body, &plaintext("p"));
        assert_eq!(c.blocklist.render(), "0.0.0.0 a.com");
        assert_eq!(c.records, 7);
        assert_eq!(c.rejected.get("comment"), 1);
        assert_eq!(c.rejected.get("empty"), 1);
        assert_eq!(c.rejected.get("ip_literal"), 1);
        assert_eq!(c.rejected.get("pattern"), 1);
    }

    #[test]
    fn csv_header_counts_as_no_candidate() {
        let body = "phish_id,url,phish_detail_url,submission_time,verified\n\
                    1,https://one.example.com,d,t,yes\n";
        let c = collect(body, &csv_strict("t"));
        assert_eq!(c.records, 1);
        assert_eq!(c.blocklist.render(), "0.0.0.0 one.example.com");
    }

    #[test]
    fn csv_strict_rejects_verified_path_urls() {
        let body = "h\n\
                    1,https://bank.example.com/login,d,t,yes\n\
                    2,https://ok.example.com/,d,t,yes\n\
                    3,https://unverified.example.com,d,t,no\n";
        let c = collect(body, &csv_strict("t"));
        assert_eq!(c.records, 2);
        assert_eq!(c.rejected.get("not_domain_only"), 1);
        assert_eq!(c.blocklist.render(), "0.0.0.0 ok.example.com");
    }

    #[test]
    fn output_sorted() {
        let c = collect("z.com\na.com\nm.com\n", &plaintext("p"));
        assert_eq!(
            c.blocklist.render(),
            "0.0.0.0 a.com\n0.0.0.0 m.com\n0.0.0.0 z.com"
        );
    }

    #[test]
    fn run_writes_each_source_and_reports() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = config_in(dir.path(), vec![plaintext("one"), csv_strict("two")]);
        let fetcher = StubFetcher::default()
            .with("http://feeds.test/one.txt", "b.com\na.com\n")
            .with(
                "http://feeds.test/two.csv",
                "h\n1,https://x.example.org,d,t,yes\n",
            );

        let summary = run_all(&cfg, &fetcher);
        assert!(summary.all_ok());

        let one = fs::read_to_string(dir.path().join("one.hosts")).unwrap();
        assert_eq!(one, "0.0.0.0 a.com\n0.0.0.0 b.com");
        let two = fs::read_to_string(dir.path().join("two.hosts")).unwrap();
        assert_eq!(two, "0.0.0.0 x.example.org");

        let reports: Vec<_> = summary.succeeded().collect();
        assert_eq!(reports[0].domains, 2);
        assert_eq!(reports[0].sha256, checksum::sha256_bytes(one.as_bytes()));
        assert_eq!(reports[1].output, dir.path().join("two.hosts"));
    }

    #[test]
    fn fetch_failure_is_isolated_and_leaves_file_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = config_in(dir.path(), vec![plaintext("down"), plaintext("up")]);
        let stale = dir.path().join("down.hosts");
        fs::write(&stale, "0.0.0.0 previous.com").unwrap();

        let fetcher = StubFetcher::default().with("http://feeds.test/up.txt", "c.com\n");
        let summary = run_all(&cfg, &fetcher);

        assert_eq!(
            *fetcher.calls.borrow(),
            vec!["http://feeds.test/down.txt", "http://feeds.test/up.txt"]
        );
        assert_eq!(fs::read_to_string(&stale).unwrap(), "0.0.0.0 previous.com");
        assert_eq!(
            fs::read_to_string(dir.path().join("up.hosts")).unwrap(),
            "0.0.0.0 c.com"
        );

        let failed: Vec<_> = summary.failed().collect();
        assert_eq!(failed.len(), 1);
        assert_eq!(failed[0].0, "down");
        assert!(matches!(
            failed[0].1,
            SourceError::Fetch(FetchError::Http { status: 404, .. })
        ));
    }

    #[test]
    fn empty_feed_writes_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = config_in(dir.path(), vec![plaintext("quiet")]);
        let path = dir.path().join("quiet.hosts");
        fs::write(&path, "0.0.0.0 stale.com").unwrap();

        let fetcher = StubFetcher::default().with("http://feeds.test/quiet.txt", "# nothing\n");
        let summary = run_all(&cfg, &fetcher);

        assert!(summary.all_ok());
        assert_eq!(fs::read_to_string(&path).unwrap(), "");
    }

    #[test]
    fn write_failure_is_reported_per_source() {
        let dir = tempfile::tempdir().unwrap();
        let mut blocked = plaintext("blocked");
        blocked.output = PathBuf::from("occupied");
        fs::create_dir(dir.path().join("occupied")).unwrap();
        fs::write(dir.path().join("occupied").join("f"), "x").unwrap();
        let cfg = config_in(dir.path(), vec![blocked, plaintext("fine")]);

        let fetcher = StubFetcher::default()
            .with("http://feeds.test/blocked.txt", "a.com\n")
            .with("http://feeds.test/fine.txt", "b.com\n");
        let summary = run_all(&cfg, &fetcher);

        let failed: Vec<_> = summary.failed().collect();
        assert_eq!(failed.len(), 1);
        assert!(matches!(failed[0].1, SourceError::Write { .. }));
        assert_eq!(summary.succeeded().count(), 1);
    }
}
