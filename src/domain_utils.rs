use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref DOTTED_QUAD: Regex = Regex::new(r"^[0-9]+\.[0-9]+\.[0-9]+\.[0-9]+$").unwrap();
}

/// Minimal host utilities
pub struct DomainUtils;

impl DomainUtils {
    /// True when the host is a literal `N.N.N.N` address
    pub fn is_ip_literal(host: &str) -> bool {
        DOTTED_QUAD.is_match(host)
    }

    /// Number of dot-separated labels in a host
    pub fn label_count(host: &str) -> usize {
        host.split('.').count()
    }

    /// Labels beyond the registrable `name.tld` pair. Negative for single-label hosts.
    pub fn subdomain_count(host: &str) -> i64 {
        Self::label_count(host) as i64 - 2
    }

    /// Check if any list entry occurs anywhere in the host
    pub fn contains_any(host: &str, list: &[&str]) -> bool {
        list.iter().any(|entry| host.contains(entry))
    }

    /// Check if the host ends with any list entry
    pub fn ends_with_any(host: &str, list: &[&str]) -> bool {
        list.iter().any(|entry| host.ends_with(entry))
    }
}
