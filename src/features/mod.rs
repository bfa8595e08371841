pub mod link_analyzer;
pub mod phishing_keywords;
pub mod tld_risk;
pub mod unicode_obfuscation;

use crate::domain_utils::DomainUtils;
use crate::parser::ParsedUrl;
use link_analyzer::LinkAnalyzer;
use phishing_keywords::PhishingKeywordAnalyzer;
use serde::{Deserialize, Serialize};
use tld_risk::TldRiskAnalyzer;
use unicode_obfuscation::HomographAnalyzer;

/// Hosts with more labels than `name.tld` plus this many are flagged
const MAX_SUBDOMAINS: i64 = 3;

/// Extra weight per matched phishing keyword
pub const PER_KEYWORD_WEIGHT: u32 = 3;

/// Number of matched keywords quoted in the threat message
const KEYWORDS_IN_MESSAGE: usize = 3;

/// Every detector, in evaluation order. Threat messages are emitted in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Detector {
    IpAddress,
    InsecureProtocol,
    Shortener,
    SuspiciousExtension,
    PhishingKeywords,
    SuspiciousTld,
    ExcessiveSubdomains,
    EncodedCharacters,
    NonStandardPort,
    SuspiciousPattern,
    RedirectParameter,
    Homograph,
    ExcessiveLength,
}

impl Detector {
    pub const ALL: [Detector; 13] = [
        Detector::IpAddress,
        Detector::InsecureProtocol,
        Detector::Shortener,
        Detector::SuspiciousExtension,
        Detector::PhishingKeywords,
        Detector::SuspiciousTld,
        Detector::ExcessiveSubdomains,
        Detector::EncodedCharacters,
        Detector::NonStandardPort,
        Detector::SuspiciousPattern,
        Detector::RedirectParameter,
        Detector::Homograph,
        Detector::ExcessiveLength,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Detector::IpAddress => "ip_address",
            Detector::InsecureProtocol => "insecure_protocol",
            Detector::Shortener => "shortener",
            Detector::SuspiciousExtension => "suspicious_extension",
            Detector::PhishingKeywords => "phishing_keywords",
            Detector::SuspiciousTld => "suspicious_tld",
            Detector::ExcessiveSubdomains => "excessive_subdomains",
            Detector::EncodedCharacters => "encoded_characters",
            Detector::NonStandardPort => "non_standard_port",
            Detector::SuspiciousPattern => "suspicious_pattern",
            Detector::RedirectParameter => "redirect_parameter",
            Detector::Homograph => "homograph",
            Detector::ExcessiveLength => "excessive_length",
        }
    }

    /// Fixed contribution when the detector fires. Keyword matches add on top.
    pub fn base_weight(self) -> u32 {
        match self {
            Detector::IpAddress => 35,
            Detector::InsecureProtocol => 15,
            Detector::Shortener => 20,
            Detector::SuspiciousExtension => 40,
            Detector::PhishingKeywords => 15,
            Detector::SuspiciousTld => 15,
            Detector::ExcessiveSubdomains => 20,
            Detector::EncodedCharacters => 10,
            Detector::NonStandardPort => 15,
            Detector::SuspiciousPattern => 25,
            Detector::RedirectParameter => 15,
            Detector::Homograph => 45,
            Detector::ExcessiveLength => 10,
        }
    }
}

/// Raw detector outcomes for one URL. Scoring and messages are derived from this.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UrlFeatures {
    pub has_ip_address: bool,
    pub insecure_protocol: bool,
    pub is_shortened: bool,
    pub has_suspicious_extension: bool,
    /// Matched keywords in keyword-list order
    pub phishing_keywords: Vec<&'static str>,
    pub has_suspicious_tld: bool,
    pub has_excessive_subdomains: bool,
    pub has_encoded_characters: bool,
    /// Set only for an explicit port other than 80 or 443
    pub non_standard_port: Option<u16>,
    pub has_suspicious_patterns: bool,
    pub has_redirects: bool,
    pub has_homograph: bool,
    pub is_excessively_long: bool,
}

impl UrlFeatures {
    pub fn has_phishing_keywords(&self) -> bool {
        !self.phishing_keywords.is_empty()
    }

    pub fn has_port_number(&self) -> bool {
        self.non_standard_port.is_some()
    }

    pub fn triggered(&self, detector: Detector) -> bool {
        match detector {
            Detector::IpAddress => self.has_ip_address,
            Detector::InsecureProtocol => self.insecure_protocol,
            Detector::Shortener => self.is_shortened,
            Detector::SuspiciousExtension => self.has_suspicious_extension,
            Detector::PhishingKeywords => self.has_phishing_keywords(),
            Detector::SuspiciousTld => self.has_suspicious_tld,
            Detector::ExcessiveSubdomains => self.has_excessive_subdomains,
            Detector::EncodedCharacters => self.has_encoded_characters,
            Detector::NonStandardPort => self.has_port_number(),
            Detector::SuspiciousPattern => self.has_suspicious_patterns,
            Detector::RedirectParameter => self.has_redirects,
            Detector::Homograph => self.has_homograph,
            Detector::ExcessiveLength => self.is_excessively_long,
        }
    }

    /// Score contribution of a detector, zero when it did not fire
    pub fn weight(&self, detector: Detector) -> u32 {
        if !self.triggered(detector) {
            return 0;
        }
        match detector {
            Detector::PhishingKeywords => {
                detector.base_weight() + PER_KEYWORD_WEIGHT * self.phishing_keywords.len() as u32
            }
            _ => detector.base_weight(),
        }
    }

    pub fn message(&self, detector: Detector) -> String {
        match detector {
            Detector::IpAddress => "URL uses IP address instead of domain name".to_string(),
            Detector::InsecureProtocol => "Insecure HTTP connection (no encryption)".to_string(),
            Detector::Shortener => "URL shortener detected - destination hidden".to_string(),
            Detector::SuspiciousExtension => "Suspicious file extension detected".to_string(),
            Detector::PhishingKeywords => {
                let shown: Vec<&str> = self
                    .phishing_keywords
                    .iter()
                    .take(KEYWORDS_IN_MESSAGE)
                    .copied()
                    .collect();
                format!("Phishing keywords detected: {}", shown.join(", "))
            }
            Detector::SuspiciousTld => "Suspicious top-level domain (TLD)".to_string(),
            Detector::ExcessiveSubdomains => {
                "Excessive subdomains (potential subdomain attack)".to_string()
            }
            Detector::EncodedCharacters => "URL contains encoded characters".to_string(),
            Detector::NonStandardPort => match self.non_standard_port {
                Some(port) => format!("Non-standard port: {}", port),
                None => "Non-standard port".to_string(),
            },
            Detector::SuspiciousPattern => "Suspicious URL pattern detected".to_string(),
            Detector::RedirectParameter => "URL redirect parameter detected".to_string(),
            Detector::Homograph => "Potential homograph attack (look-alike characters)".to_string(),
            Detector::ExcessiveLength => "Unusually long URL".to_string(),
        }
    }

    /// Detectors that fired, in evaluation order
    pub fn triggered_detectors(&self) -> Vec<Detector> {
        Detector::ALL
            .iter()
            .copied()
            .filter(|d| self.triggered(*d))
            .collect()
    }
}

/// Run the full detector battery over a parsed URL.
pub fn extract_features(parsed: &ParsedUrl) -> UrlFeatures {
    let domain = parsed.domain.as_str();
    let full_url = parsed.full_url.as_str();

    UrlFeatures {
        has_ip_address: DomainUtils::is_ip_literal(domain),
        insecure_protocol: parsed.scheme == "http",
        is_shortened: LinkAnalyzer::is_shortener(domain),
        has_suspicious_extension: LinkAnalyzer::has_suspicious_extension(&parsed.path),
        phishing_keywords: PhishingKeywordAnalyzer::find_keywords(full_url),
        has_suspicious_tld: TldRiskAnalyzer::is_suspicious_tld(domain),
        has_excessive_subdomains: DomainUtils::subdomain_count(domain) > MAX_SUBDOMAINS,
        has_encoded_characters: LinkAnalyzer::has_encoded_characters(full_url),
        non_standard_port: LinkAnalyzer::non_standard_port(parsed.port),
        has_suspicious_patterns: LinkAnalyzer::matches_suspicious_pattern(full_url),
        has_redirects: LinkAnalyzer::has_redirect_parameter(full_url),
        has_homograph: HomographAnalyzer::has_confusable(&parsed.unicode_host),
        is_excessively_long: LinkAnalyzer::is_excessively_long(full_url),
    }
}
