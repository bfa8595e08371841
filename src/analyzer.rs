use crate::features::{extract_features, UrlFeatures};
use crate::normalization::UrlNormalizer;
use crate::parser::ParsedUrl;
use crate::scoring::{RiskScorer, ScoreContribution, ThreatLevel, MAX_RISK_SCORE};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const NO_THREATS_MESSAGE: &str = "No threats detected";
pub const INVALID_URL_MESSAGE: &str = "Invalid URL format - potential obfuscation attempt";
pub const INVALID_DOMAIN: &str = "INVALID";
pub const UNKNOWN_PROTOCOL: &str = "unknown";

/// Extracted URL fields and raw detector flags
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UrlDetails {
    pub domain: String,
    pub protocol: String,
    pub path: String,
    #[serde(rename = "hasIPAddress")]
    pub has_ip_address: bool,
    pub has_suspicious_patterns: bool,
    pub has_redirects: bool,
    pub has_suspicious_extension: bool,
    pub is_shortened: bool,
    pub has_phishing_keywords: bool,
    pub has_excessive_subdomains: bool,
    pub has_encoded_characters: bool,
    pub has_port_number: bool,
}

impl UrlDetails {
    fn from_features(parsed: &ParsedUrl, features: &UrlFeatures) -> Self {
        Self {
            domain: parsed.domain.clone(),
            protocol: parsed.scheme.clone(),
            path: parsed.path.clone(),
            has_ip_address: features.has_ip_address,
            has_suspicious_patterns: features.has_suspicious_patterns,
            has_redirects: features.has_redirects,
            has_suspicious_extension: features.has_suspicious_extension,
            is_shortened: features.is_shortened,
            has_phishing_keywords: features.has_phishing_keywords(),
            has_excessive_subdomains: features.has_excessive_subdomains,
            has_encoded_characters: features.has_encoded_characters,
            has_port_number: features.has_port_number(),
        }
    }

    fn invalid() -> Self {
        Self {
            domain: INVALID_DOMAIN.to_string(),
            protocol: UNKNOWN_PROTOCOL.to_string(),
            path: String::new(),
            has_ip_address: false,
            has_suspicious_patterns: true,
            has_redirects: false,
            has_suspicious_extension: false,
            is_shortened: false,
            has_phishing_keywords: false,
            has_excessive_subdomains: false,
            has_encoded_characters: false,
            has_port_number: false,
        }
    }
}

/// Risk assessment of a single scanned string
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    /// The input exactly as received
    pub url: String,
    pub threat_level: ThreatLevel,
    pub risk_score: u8,
    /// Never empty
    pub threats: Vec<String>,
    pub details: UrlDetails,
    pub timestamp: DateTime<Utc>,
}

impl AnalysisResult {
    /// Same verdict ignoring when it was produced
    pub fn same_verdict(&self, other: &AnalysisResult) -> bool {
        self.url == other.url
            && self.threat_level == other.threat_level
            && self.risk_score == other.risk_score
            && self.threats == other.threats
            && self.details == other.details
    }
}

/// Offline URL threat scoring: normalize, parse, extract, score, classify.
///
/// Stateless; every table it reads is a process-wide constant, so one
/// analyzer (or none, via [`analyze_url`]) can serve any number of threads.
#[derive(Debug, Default, Clone, Copy)]
pub struct UrlAnalyzer;

impl UrlAnalyzer {
    pub fn new() -> Self {
        Self
    }

    pub fn analyze(&self, raw: &str) -> AnalysisResult {
        let normalized = UrlNormalizer::normalize(raw);

        let parsed = match ParsedUrl::parse(&normalized) {
            Ok(parsed) => parsed,
            Err(e) => {
                log::warn!("Unparseable URL {:?}: {}", normalized, e);
                return Self::invalid_result(raw);
            }
        };

        log::debug!(
            "Analyzing {} (host: {}, scheme: {})",
            parsed.full_url,
            parsed.domain,
            parsed.scheme
        );

        let features = extract_features(&parsed);
        let risk_score = RiskScorer::score(&features);
        let threat_level = ThreatLevel::from_score(risk_score);

        let mut threats: Vec<String> = features
            .triggered_detectors()
            .into_iter()
            .map(|d| features.message(d))
            .collect();
        if threats.is_empty() {
            threats.push(NO_THREATS_MESSAGE.to_string());
        }

        log::debug!(
            "Scored {} at {} ({}) with {} indicator(s)",
            parsed.domain,
            risk_score,
            threat_level,
            features.triggered_detectors().len()
        );

        AnalysisResult {
            url: raw.to_string(),
            threat_level,
            risk_score,
            threats,
            details: UrlDetails::from_features(&parsed, &features),
            timestamp: Utc::now(),
        }
    }

    /// Per-detector score contributions, or `None` when the input does not parse
    pub fn explain(&self, raw: &str) -> Option<Vec<ScoreContribution>> {
        let parsed = ParsedUrl::parse(&UrlNormalizer::normalize(raw)).ok()?;
        Some(RiskScorer::breakdown(&extract_features(&parsed)))
    }

    /// Malformed input is scored as a worst case rather than reported as an error.
    fn invalid_result(raw: &str) -> AnalysisResult {
        AnalysisResult {
            url: raw.to_string(),
            threat_level: ThreatLevel::Malicious,
            risk_score: MAX_RISK_SCORE,
            threats: vec![INVALID_URL_MESSAGE.to_string()],
            details: UrlDetails::invalid(),
            timestamp: Utc::now(),
        }
    }
}

/// Analyze a raw string with the default analyzer.
pub fn analyze_url(raw: &str) -> AnalysisResult {
    UrlAnalyzer::new().analyze(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_invariants(result: &AnalysisResult) {
        assert!(result.risk_score <= 100);
        assert_eq!(result.threat_level, ThreatLevel::from_score(result.risk_score));
        assert!(!result.threats.is_empty());
    }

    #[test]
    fn test_ip_address_host() {
        let result = analyze_url("192.168.1.1");
        assert_eq!(result.url, "192.168.1.1");
        assert_eq!(result.threat_level, ThreatLevel::Malicious);
        assert!(result.details.has_ip_address);
        assert!(result.details.has_suspicious_patterns);
        assert_eq!(result.details.protocol, "http");
        assert_eq!(result.details.domain, "192.168.1.1");
        // IP host (35) + plain http (15) + IP inside the pattern set (25)
        assert_eq!(result.risk_score, 75);
        assert_eq!(
            result.threats,
            vec![
                "URL uses IP address instead of domain name",
                "Insecure HTTP connection (no encryption)",
                "Suspicious URL pattern detected",
            ]
        );
    }

    #[test]
    fn test_shortener_hits_suspicious_boundary() {
        let result = analyze_url("https://bit.ly/xyz123");
        assert_eq!(result.risk_score, 20);
        assert_eq!(result.threat_level, ThreatLevel::Suspicious);
        assert!(result.details.is_shortened);
        assert_eq!(
            result.threats,
            vec!["URL shortener detected - destination hidden"]
        );
    }

    #[test]
    fn test_clean_url() {
        let result = analyze_url("https://example.com");
        assert_eq!(result.risk_score, 0);
        assert_eq!(result.threat_level, ThreatLevel::Safe);
        assert_eq!(result.threats, vec![NO_THREATS_MESSAGE]);
        assert_eq!(result.details.domain, "example.com");
        assert_eq!(result.details.protocol, "https");
        assert_eq!(result.details.path, "/");
        assert!(result.threat_level.allows_navigation());
    }

    #[test]
    fn test_phishing_domain() {
        let result = analyze_url("http://paypal-login-verify.tk/account");
        assert_eq!(result.risk_score, 57);
        assert_eq!(result.threat_level, ThreatLevel::Malicious);
        assert!(result.details.has_phishing_keywords);
        assert!(!result.details.has_redirects);
        assert_eq!(
            result.threats,
            vec![
                "Insecure HTTP connection (no encryption)",
                "Phishing keywords detected: login, verify, account",
                "Suspicious top-level domain (TLD)",
            ]
        );
    }

    #[test]
    fn test_unparseable_input() {
        let result = analyze_url("not a url at all ??");
        assert_eq!(result.url, "not a url at all ??");
        assert_eq!(result.risk_score, 100);
        assert_eq!(result.threat_level, ThreatLevel::Malicious);
        assert_eq!(result.threats, vec![INVALID_URL_MESSAGE]);
        assert_eq!(result.details, UrlDetails::invalid());
        assert_eq!(result.details.domain, "INVALID");
        assert_eq!(result.details.protocol, "unknown");
        assert!(result.details.has_suspicious_patterns);
    }

    #[test]
    fn test_parse_failure_fixpoint() {
        for input in ["http://[", "", "   ", "javascript:alert(1)", "http://exa mple.com"] {
            let result = analyze_url(input);
            assert_eq!(result.risk_score, 100, "input {:?}", input);
            assert_eq!(result.threat_level, ThreatLevel::Malicious);
            assert_eq!(result.details.domain, INVALID_DOMAIN);
        }
    }

    #[test]
    fn test_homograph_attack() {
        let result = analyze_url("http://\u{0430}pple.com");
        // homograph (45) + plain http (15)
        assert_eq!(result.risk_score, 60);
        assert!(result
            .threats
            .contains(&"Potential homograph attack (look-alike characters)".to_string()));
    }

    #[test]
    fn test_homograph_spellings_score_alike() {
        let literal = analyze_url("http://\u{0430}pple.com/");
        let encoded = analyze_url("http://%D0%B0pple.com/");
        assert_eq!(encoded.details.domain, literal.details.domain);
        assert_eq!(encoded.risk_score, 60);
        assert!(encoded.same_verdict(&AnalysisResult {
            url: encoded.url.clone(),
            ..literal
        }));

        let upper = analyze_url("http://\u{0415}XAMPLE.com");
        assert_eq!(upper.risk_score, 60);
        assert_eq!(upper.threat_level, ThreatLevel::Malicious);
    }

    #[test]
    fn test_executable_download_on_port() {
        let result = analyze_url("https://files.example.com:8080/setup.exe");
        assert!(result.details.has_suspicious_extension);
        assert!(result.details.has_port_number);
        // extension (40) + port (15)
        assert_eq!(result.risk_score, 55);
        assert_eq!(
            result.threats,
            vec!["Suspicious file extension detected", "Non-standard port: 8080"]
        );
    }

    #[test]
    fn test_redirect_compounds_with_pattern() {
        let result = analyze_url("https://example.com/out?goto=elsewhere");
        assert!(result.details.has_redirects);
        assert!(result.details.has_suspicious_patterns);
        // pattern (25) + redirect (15)
        assert_eq!(result.risk_score, 40);
        assert_eq!(result.threat_level, ThreatLevel::Suspicious);
    }

    #[test]
    fn test_encoded_and_long_url() {
        let input = format!("https://example.com/{}%2f", "a".repeat(200));
        let result = analyze_url(&input);
        assert!(result.details.has_encoded_characters);
        // encoded (10) + pattern (25) + length (10)
        assert_eq!(result.risk_score, 45);
        assert_eq!(result.threats.last().unwrap(), "Unusually long URL");
    }

    #[test]
    fn test_length_boundary_scores() {
        let at_limit = analyze_url(&format!("https://example.com/{}", "a".repeat(180)));
        assert_eq!(at_limit.risk_score, 0);
        assert_eq!(at_limit.threats, vec![NO_THREATS_MESSAGE]);

        let over_limit = analyze_url(&format!("https://example.com/{}", "a".repeat(181)));
        assert_eq!(over_limit.risk_score, 10);
        assert_eq!(over_limit.threats, vec!["Unusually long URL"]);
    }

    #[test]
    fn test_excessive_subdomains() {
        let result = analyze_url("https://a.b.c.d.example.com/");
        assert!(result.details.has_excessive_subdomains);
        assert_eq!(result.risk_score, 20);
    }

    #[test]
    fn test_score_is_capped() {
        let result = analyze_url(
            "http://user@10.0.0.1:8080/login/verify/account/redirect?url=x/payload.exe",
        );
        assert_eq!(result.risk_score, 100);
        assert_invariants(&result);
    }

    #[test]
    fn test_explain_matches_score() {
        let analyzer = UrlAnalyzer::new();
        let input = "http://paypal-login-verify.tk/account";
        let breakdown = analyzer.explain(input).unwrap();
        let total: u32 = breakdown.iter().map(|c| c.weight).sum();
        assert_eq!(total, analyzer.analyze(input).risk_score as u32);
        assert!(analyzer.explain("http://[").is_none());
    }

    #[test]
    fn test_case_insensitive_scheme() {
        let result = analyze_url("  HTTPS://Example.com  ");
        assert_eq!(result.url, "  HTTPS://Example.com  ");
        assert_eq!(result.details.protocol, "https");
        assert_eq!(result.risk_score, 0);
    }

    #[test]
    fn test_determinism() {
        let inputs = [
            "https://bit.ly/xyz123",
            "http://paypal-login-verify.tk/account",
            "not a url at all ??",
        ];
        for input in inputs {
            let first = analyze_url(input);
            let second = analyze_url(input);
            assert!(first.same_verdict(&second));
        }
    }

    #[test]
    fn test_invariants_over_assorted_inputs() {
        let inputs = [
            "",
            "example.com",
            "https://www.google.com/search?q=rust",
            "http://free-bitcoin-prize.xyz/claim?redirect=http://x",
            "https://tinyurl.com/abc",
            "ftp://files.example.com/readme.txt",
            "http://127.0.0.1:3000/",
            "https://[::1]/",
            "\u{0000}\u{0007}",
            "https://example.com/%00%ff",
            "http://a.b.c.d.e.f.g.h.example.click/app.apk",
        ];
        for input in inputs {
            assert_invariants(&analyze_url(input));
        }
    }

    #[test]
    fn test_json_shape() {
        let result = analyze_url("https://example.com");
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["threatLevel"], "safe");
        assert_eq!(json["riskScore"], 0);
        assert_eq!(json["details"]["hasIPAddress"], false);
        assert_eq!(json["details"]["isShortened"], false);
        assert!(json["timestamp"].is_string());

        let back: AnalysisResult = serde_json::from_value(json).unwrap();
        assert_eq!(back, result);
    }

    #[test]
    fn test_concurrent_use() {
        let analyzer = UrlAnalyzer::new();
        let handles: Vec<_> = (0..4)
            .map(|_| {
                std::thread::spawn(move || analyzer.analyze("https://bit.ly/xyz123").risk_score)
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), 20);
        }
    }
}
