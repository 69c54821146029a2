//! Canonical and redirection rules for URLs.
//!
//! The input is validated against the WHATWG URL grammar, but the output is
//! reassembled from the caller's own text: under the canonical rule alone, the
//! host, percent-encoding and letter case come back exactly as they were sent.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Host written by the redirection rule unless configured otherwise.
pub const DEFAULT_REDIRECT_HOST: &str = "www.byfood.com";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NormalizeError {
    #[error("invalid url: {reason}")]
    InvalidUrl { reason: String },
    #[error("invalid operation '{0}': expected one of canonical, redirection, all")]
    InvalidOperation(String),
}

impl NormalizeError {
    fn invalid_url(reason: impl Into<String>) -> Self {
        Self::InvalidUrl {
            reason: reason.into(),
        }
    }
}

/// Which rules to apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrlOperation {
    Canonical,
    Redirection,
    All,
}

impl UrlOperation {
    fn canonicalizes(self) -> bool {
        matches!(self, Self::Canonical | Self::All)
    }

    fn redirects(self) -> bool {
        matches!(self, Self::Redirection | Self::All)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Canonical => "canonical",
            Self::Redirection => "redirection",
            Self::All => "all",
        }
    }
}

impl FromStr for UrlOperation {
    type Err = NormalizeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "canonical" => Ok(Self::Canonical),
            "redirection" => Ok(Self::Redirection),
            "all" => Ok(Self::All),
            other => Err(NormalizeError::InvalidOperation(other.to_string())),
        }
    }
}

impl fmt::Display for UrlOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A hierarchical URL split into borrowed components.
#[derive(Debug, Clone, PartialEq, Eq)]
struct UrlParts<'a> {
    scheme: &'a str,
    authority: &'a str,
    path: &'a str,
    query: Option<&'a str>,
    fragment: Option<&'a str>,
}

impl<'a> UrlParts<'a> {
    fn parse(raw: &'a str) -> Result<Self, NormalizeError> {
        if raw.is_empty() {
            return Err(NormalizeError::invalid_url("url is empty"));
        }
        if raw.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(NormalizeError::invalid_url(
                "url contains whitespace or control characters",
            ));
        }
        // The WHATWG parser reads `\` as `/` for special schemes; the raw split below does not.
        if raw.contains('\\') {
            return Err(NormalizeError::invalid_url("url contains a backslash"));
        }
        url::Url::parse(raw).map_err(|err| NormalizeError::invalid_url(err.to_string()))?;

        let (scheme, rest) = raw
            .split_once(':')
            .ok_or_else(|| NormalizeError::invalid_url("missing scheme"))?;
        let rest = rest
            .strip_prefix("//")
            .ok_or_else(|| NormalizeError::invalid_url("missing authority"))?;

        let (rest, fragment) = match rest.split_once('#') {
            Some((rest, fragment)) => (rest, Some(fragment)),
            None => (rest, None),
        };
        let (rest, query) = match rest.split_once('?') {
            Some((rest, query)) => (rest, Some(query)),
            None => (rest, None),
        };
        let (authority, path) = rest.split_at(rest.find('/').unwrap_or(rest.len()));

        Ok(Self {
            scheme,
            authority,
            path,
            query,
            fragment,
        })
    }

    /// Drop the query and at most one trailing slash.
    fn canonicalize(&mut self) {
        self.query = None;
        self.path = self.path.strip_suffix('/').unwrap_or(self.path);
    }
}

impl fmt::Display for UrlParts<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}{}", self.scheme, self.authority, self.path)?;
        if let Some(query) = self.query {
            write!(f, "?{query}")?;
        }
        if let Some(fragment) = self.fragment {
            write!(f, "#{fragment}")?;
        }
        Ok(())
    }
}

/// Applies the canonical and redirection rules. Stateless apart from the
/// configured redirect host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlNormalizer {
    redirect_host: String,
}

impl UrlNormalizer {
    pub fn new(redirect_host: impl Into<String>) -> Self {
        Self {
            redirect_host: redirect_host.into(),
        }
    }

    pub fn redirect_host(&self) -> &str {
        &self.redirect_host
    }

    /// Run `operation` over `raw`.
    ///
    /// `redirection` and `all` lower-case the whole result, scheme and path
    /// included; `canonical` never changes case.
    pub fn process(&self, raw: &str, operation: UrlOperation) -> Result<String, NormalizeError> {
        let mut parts = UrlParts::parse(raw)?;

        if operation.canonicalizes() {
            parts.canonicalize();
        }
        if operation.redirects() {
            parts.authority = self.redirect_host.as_str();
        }

        let processed = parts.to_string();
        Ok(if operation.redirects() {
            processed.to_lowercase()
        } else {
            processed
        })
    }
}

impl Default for UrlNormalizer {
    fn default() -> Self {
        Self::new(DEFAULT_REDIRECT_HOST)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(raw: &str, operation: UrlOperation) -> String {
        UrlNormalizer::default().process(raw, operation).unwrap()
    }

    #[test]
    fn canonical_strips_query_and_one_trailing_slash() {
        assert_eq!(
            run("https://BYFOOD.com/Path/?query=123#Fragment", UrlOperation::Canonical),
            "https://BYFOOD.com/Path#Fragment"
        );
        assert_eq!(
            run("https://example.com/a/b//", UrlOperation::Canonical),
            "https://example.com/a/b/"
        );
        assert_eq!(
            run("https://example.com/", UrlOperation::Canonical),
            "https://example.com"
        );
    }

    #[test]
    fn canonical_leaves_empty_path_and_missing_query_alone() {
        assert_eq!(
            run("https://example.com", UrlOperation::Canonical),
            "https://example.com"
        );
        assert_eq!(
            run("http://example.com:8080/Menu/Sushi", UrlOperation::Canonical),
            "http://example.com:8080/Menu/Sushi"
        );
    }

    #[test]
    fn canonical_is_idempotent() {
        let once = run("https://Example.com/Tokyo/Ramen/?page=2", UrlOperation::Canonical);
        assert_eq!(once, "https://Example.com/Tokyo/Ramen");
        assert_eq!(run(&once, UrlOperation::Canonical), once);
    }

    #[test]
    fn canonical_preserves_encoding() {
        assert_eq!(
            run("https://example.com/caf%C3%A9/?x=1", UrlOperation::Canonical),
            "https://example.com/caf%C3%A9"
        );
    }

    #[test]
    fn redirection_replaces_host_and_lowercases_everything() {
        assert_eq!(
            run("HTTPS://Example.COM:8443/Food/Tokyo/?Q=Sushi#Top", UrlOperation::Redirection),
            "https://www.byfood.com/food/tokyo/?q=sushi#top"
        );
        assert_eq!(
            run("https://user:pw@example.com", UrlOperation::Redirection),
            "https://www.byfood.com"
        );
    }

    #[test]
    fn all_is_canonical_then_redirection() {
        let raw = "https://BYFOOD.com/Path/?query=123#Fragment";
        assert_eq!(
            run(raw, UrlOperation::All),
            "https://www.byfood.com/path#fragment"
        );

        let composed = run(&run(raw, UrlOperation::Canonical), UrlOperation::Redirection);
        assert_eq!(run(raw, UrlOperation::All), composed);
    }

    #[test]
    fn configured_redirect_host_is_used() {
        let normalizer = UrlNormalizer::new("cdn.byfood.com");
        assert_eq!(
            normalizer
                .process("https://example.com/a?b=c", UrlOperation::All)
                .unwrap(),
            "https://cdn.byfood.com/a"
        );
    }

    #[test]
    fn invalid_urls_are_rejected() {
        let normalizer = UrlNormalizer::default();
        for raw in [
            "",
            "not a url",
            "example.com/path",
            "https://exa mple.com",
            "https://[::1",
            "http://example.com:99999",
            "mailto:someone@example.com",
            "https://example.com\\Food\\Tokyo",
            "https://example.com\\a\\",
            "https://example.com/a\\b?q=1",
        ] {
            assert!(
                matches!(
                    normalizer.process(raw, UrlOperation::Canonical),
                    Err(NormalizeError::InvalidUrl { .. })
                ),
                "expected {raw:?} to be rejected"
            );
        }
    }

    #[test]
    fn operations_parse_from_their_names() {
        for operation in [UrlOperation::Canonical, UrlOperation::Redirection, UrlOperation::All] {
            assert_eq!(operation.as_str().parse::<UrlOperation>(), Ok(operation));
        }
        assert_eq!(
            "foo".parse::<UrlOperation>(),
            Err(NormalizeError::InvalidOperation("foo".to_string()))
        );
        assert!("Canonical".parse::<UrlOperation>().is_err());
    }
}
