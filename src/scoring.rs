use crate::features::{Detector, UrlFeatures};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const MAX_RISK_SCORE: u8 = 100;
pub const SUSPICIOUS_THRESHOLD: u8 = 20;
pub const MALICIOUS_THRESHOLD: u8 = 50;

/// Threat tier, ordered by ascending risk
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThreatLevel {
    Safe,
    Suspicious,
    Malicious,
}

impl ThreatLevel {
    /// Lower bounds are inclusive: 20 is suspicious, 50 is malicious.
    pub fn from_score(score: u8) -> Self {
        match score {
            score if score >= MALICIOUS_THRESHOLD => ThreatLevel::Malicious,
            score if score >= SUSPICIOUS_THRESHOLD => ThreatLevel::Suspicious,
            _ => ThreatLevel::Safe,
        }
    }

    /// Whether a front end may offer to open or copy the URL
    pub fn allows_navigation(self) -> bool {
        self == ThreatLevel::Safe
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ThreatLevel::Safe => "safe",
            ThreatLevel::Suspicious => "suspicious",
            ThreatLevel::Malicious => "malicious",
        }
    }
}

impl fmt::Display for ThreatLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ThreatLevel {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "safe" => Ok(ThreatLevel::Safe),
            "suspicious" => Ok(ThreatLevel::Suspicious),
            "malicious" => Ok(ThreatLevel::Malicious),
            other => Err(anyhow::anyhow!(
                "Unknown threat level: {} (expected safe, suspicious or malicious)",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoreContribution {
    pub detector: Detector,
    pub weight: u32,
}

pub struct RiskScorer;

impl RiskScorer {
    /// Per-detector contributions in evaluation order
    pub fn breakdown(features: &UrlFeatures) -> Vec<ScoreContribution> {
        Detector::ALL
            .iter()
            .filter(|d| features.triggered(**d))
            .map(|d| ScoreContribution {
                detector: *d,
                weight: features.weight(*d),
            })
            .collect()
    }

    /// Sum of all contributions, clamped to 0..=100. No detector suppresses another.
    pub fn score(features: &UrlFeatures) -> u8 {
        let total: u32 = Detector::ALL.iter().map(|d| features.weight(*d)).sum();
        total.min(MAX_RISK_SCORE as u32) as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_boundaries() {
        assert_eq!(ThreatLevel::from_score(0), ThreatLevel::Safe);
        assert_eq!(ThreatLevel::from_score(19), ThreatLevel::Safe);
        assert_eq!(ThreatLevel::from_score(20), ThreatLevel::Suspicious);
        assert_eq!(ThreatLevel::from_score(49), ThreatLevel::Suspicious);
        assert_eq!(ThreatLevel::from_score(50), ThreatLevel::Malicious);
        assert_eq!(ThreatLevel::from_score(100), ThreatLevel::Malicious);
    }

    #[test]
    fn test_ordering_and_policy() {
        assert!(ThreatLevel::Safe < ThreatLevel::Suspicious);
        assert!(ThreatLevel::Suspicious < ThreatLevel::Malicious);
        assert!(ThreatLevel::Safe.allows_navigation());
        assert!(!ThreatLevel::Suspicious.allows_navigation());
        assert!(!ThreatLevel::Malicious.allows_navigation());
    }

    #[test]
    fn test_parse_threat_level() {
        assert_eq!("Safe".parse::<ThreatLevel>().unwrap(), ThreatLevel::Safe);
        assert_eq!(
            " malicious ".parse::<ThreatLevel>().unwrap(),
            ThreatLevel::Malicious
        );
        assert!("dangerous".parse::<ThreatLevel>().is_err());
        assert_eq!(ThreatLevel::Suspicious.to_string(), "suspicious");
    }

    #[test]
    fn test_score_sums_weights() {
        let features = UrlFeatures {
            is_shortened: true,
            ..Default::default()
        };
        assert_eq!(RiskScorer::score(&features), 20);

        let features = UrlFeatures {
            insecure_protocol: true,
            has_suspicious_tld: true,
            phishing_keywords: vec!["login", "verify"],
            ..Default::default()
        };
        // 15 + 15 + (15 + 2 * 3)
        assert_eq!(RiskScorer::score(&features), 51);
    }

    #[test]
    fn test_score_is_clamped() {
        let features = UrlFeatures {
            has_ip_address: true,
            insecure_protocol: true,
            has_suspicious_extension: true,
            has_homograph: true,
            has_suspicious_patterns: true,
            ..Default::default()
        };
        assert_eq!(RiskScorer::score(&features), 100);
    }

    #[test]
    fn test_breakdown_order() {
        let features = UrlFeatures {
            has_ip_address: true,
            insecure_protocol: true,
            has_suspicious_patterns: true,
            ..Default::default()
        };
        let breakdown = RiskScorer::breakdown(&features);
        assert_eq!(
            breakdown,
            vec![
                ScoreContribution {
                    detector: Detector::IpAddress,
                    weight: 35
                },
                ScoreContribution {
                    detector: Detector::InsecureProtocol,
                    weight: 15
                },
                ScoreContribution {
                    detector: Detector::SuspiciousPattern,
                    weight: 25
                },
            ]
        );
    }

    #[test]
    fn test_no_detectors_scores_zero() {
        assert_eq!(RiskScorer::score(&UrlFeatures::default()), 0);
        assert!(RiskScorer::breakdown(&UrlFeatures::default()).is_empty());
    }
}
