use url::Url;

/// A normalized URL broken into the fields the detectors look at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedUrl {
    /// Scheme without the trailing colon, e.g. `https`
    pub scheme: String,
    /// Lowercase host as serialized by the URL parser (IDNA hosts are punycode)
    pub domain: String,
    /// The parsed host with punycode labels decoded back to Unicode
    pub unicode_host: String,
    /// Path plus `?query` when the query is non-empty
    pub path: String,
    /// Explicit port, `None` when absent or the scheme default
    pub port: Option<u16>,
    /// The whole serialized URL, lowercased
    pub full_url: String,
}

impl ParsedUrl {
    pub fn parse(normalized: &str) -> Result<Self, url::ParseError> {
        let parsed = Url::parse(normalized)?;

        let domain = parsed
            .host_str()
            .map(|h| h.to_lowercase())
            .unwrap_or_default();

        let mut path = parsed.path().to_string();
        if let Some(query) = parsed.query() {
            if !query.is_empty() {
                path.push('?');
                path.push_str(query);
            }
        }

        let (unicode_host, _) = idna::domain_to_unicode(&domain);

        Ok(Self {
            scheme: parsed.scheme().to_string(),
            domain,
            unicode_host,
            path,
            port: parsed.port(),
            full_url: parsed.as_str().to_lowercase(),
        })
    }
}
