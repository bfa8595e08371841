use crate::domain_utils::DomainUtils;

/// TLDs with cheap or free registration and high abuse rates
pub const SUSPICIOUS_TLDS: &[&str] = &[
    ".tk", ".ml", ".ga", ".cf", ".gq", ".top", ".work", ".click", ".link", ".xyz", ".pw", ".cc",
    ".ws", ".buzz", ".surf", ".rest", ".fit",
];

pub struct TldRiskAnalyzer;

impl TldRiskAnalyzer {
    pub fn is_suspicious_tld(domain: &str) -> bool {
        DomainUtils::ends_with_any(domain, SUSPICIOUS_TLDS)
    }
}
