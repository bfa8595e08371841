use crate::domain_utils::DomainUtils;
use lazy_static::lazy_static;
use regex::Regex;

/// Known URL shortening services, matched as substrings of the host
pub const URL_SHORTENERS: &[&str] = &[
    "bit.ly",
    "tinyurl.com",
    "goo.gl",
    "t.co",
    "ow.ly",
    "is.gd",
    "buff.ly",
    "adf.ly",
    "j.mp",
    "rb.gy",
    "cutt.ly",
    "shorturl.at",
    "tiny.cc",
    "bc.vc",
    "v.gd",
    "clck.ru",
    "shorte.st",
    "cli.re",
    "short.io",
];

/// Executable, installer and script extensions
pub const SUSPICIOUS_EXTENSIONS: &[&str] = &[
    ".exe",
    ".bat",
    ".cmd",
    ".scr",
    ".pif",
    ".msi",
    ".jar",
    ".vbs",
    ".js",
    ".ws",
    ".wsf",
    ".ps1",
    ".hta",
    ".cpl",
    ".msc",
    ".gadget",
    ".application",
    ".scf",
    ".lnk",
    ".inf",
    ".reg",
    ".dll",
    ".apk",
    ".dmg",
    ".iso",
];

const STANDARD_PORTS: [u16; 2] = [80, 443];

/// URLs longer than this are treated as possible obfuscation
pub const MAX_URL_LENGTH: usize = 200;

lazy_static! {
    static ref PERCENT_ENCODED: Regex = Regex::new(r"(?i)%[0-9a-f]{2}").unwrap();
    static ref REDIRECT_PARAMETER: Regex =
        Regex::new(r"(?i)redirect|redir|url=|goto|return|next=").unwrap();

    // Any single match marks the URL as carrying a suspicious pattern
    static ref SUSPICIOUS_PATTERNS: Vec<Regex> = vec![
        Regex::new(r"[0-9]+\.[0-9]+\.[0-9]+\.[0-9]+").unwrap(),
        Regex::new(r"@").unwrap(),
        Regex::new(r"(?i)data:").unwrap(),
        Regex::new(r"(?i)javascript:").unwrap(),
        Regex::new(r"(?i)vbscript:").unwrap(),
        Regex::new(r"(?i)%[0-9a-f]{2}").unwrap(),
        Regex::new(r"(?i)\.(php|asp|aspx|jsp|cgi)\?").unwrap(),
        Regex::new(r"(?i)redirect|redir|url=|goto|return|next=").unwrap(),
        Regex::new(r"(?i)base64").unwrap(),
        Regex::new(r"(?i)eval|exec|system|cmd").unwrap(),
    ];
}

/// Structural checks over the host, path and full URL string.
pub struct LinkAnalyzer;

impl LinkAnalyzer {
    pub fn is_shortener(domain: &str) -> bool {
        DomainUtils::contains_any(domain, URL_SHORTENERS)
    }

    /// `path` is the path plus query; matching ignores case
    pub fn has_suspicious_extension(path: &str) -> bool {
        let path_lower = path.to_lowercase();
        SUSPICIOUS_EXTENSIONS
            .iter()
            .any(|ext| path_lower.ends_with(ext))
    }

    pub fn has_encoded_characters(full_url: &str) -> bool {
        PERCENT_ENCODED.is_match(full_url)
    }

    pub fn non_standard_port(port: Option<u16>) -> Option<u16> {
        port.filter(|p| !STANDARD_PORTS.contains(p))
    }

    pub fn matches_suspicious_pattern(full_url: &str) -> bool {
        SUSPICIOUS_PATTERNS
            .iter()
            .any(|pattern| pattern.is_match(full_url))
    }

    pub fn has_redirect_parameter(full_url: &str) -> bool {
        REDIRECT_PARAMETER.is_match(full_url)
    }

    pub fn is_excessively_long(full_url: &str) -> bool {
        full_url.chars().count() > MAX_URL_LENGTH
    }
}
