//! Check command: show what the normalizer makes of each input.

use phishblock_core::normalize::normalize;

/// One output line for `input`.
pub(crate) fn describe(input: &str, domain_only: bool) -> String {
    match normalize(input, domain_only) {
        Ok(domain) => format!("{}\t{}", input, domain.hosts_line()),
        Err(rejection) => format!("{}\trejected ({}): {}", input, rejection.code(), rejection),
    }
}

pub fn run_check(inputs: &[String], domain_only: bool) {
    for input in inputs {
        println!("{}", describe(input, domain_only));
    }
}
