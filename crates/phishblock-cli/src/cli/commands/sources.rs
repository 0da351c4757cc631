//! Sources command: list configured feeds.

use phishblock_core::config::{FeedConfig, FeedFormat, FeedSource};

fn format_label(source: &FeedSource) -> String {
    let mut label = match source.format {
        FeedFormat::Plaintext => "plaintext".to_string(),
        FeedFormat::Csv(cols) => match cols.verified_column {
            Some(v) => format!("csv url=#{} verified=#{}", cols.url_column, v),
            None => format!("csv url=#{}", cols.url_column),
        },
    };
    if source.domain_only {
        label.push_str(" domain-only");
    }
    label
}

pub fn run_sources(cfg: &FeedConfig) {
    for source in &cfg.sources {
        println!(
            "{}\t{}\t{}\t{}",
            source.name,
            format_label(source),
            source.url,
            cfg.output_path(source).display()
        );
    }
}
