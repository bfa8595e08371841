/// Words common in credential-harvesting and urgency-bait URLs.
/// Matched as plain substrings, so short entries like `eth` also hit inside longer words.
pub const PHISHING_KEYWORDS: &[&str] = &[
    "login",
    "signin",
    "sign-in",
    "verify",
    "verification",
    "update",
    "secure",
    "account",
    "password",
    "credential",
    "banking",
    "paypal",
    "amazon",
    "apple",
    "microsoft",
    "google",
    "facebook",
    "netflix",
    "confirm",
    "suspend",
    "locked",
    "urgent",
    "immediately",
    "expired",
    "validate",
    "authenticate",
    "wallet",
    "crypto",
    "bitcoin",
    "eth",
    "reward",
    "winner",
    "prize",
    "free",
    "gift",
];

pub struct PhishingKeywordAnalyzer;

impl PhishingKeywordAnalyzer {
    /// Keywords found in the URL, in list order. Each keyword counts once.
    pub fn find_keywords(full_url: &str) -> Vec<&'static str> {
        let url_lower = full_url.to_lowercase();
        PHISHING_KEYWORDS
            .iter()
            .copied()
            .filter(|keyword| url_lower.contains(keyword))
            .collect()
    }
}
