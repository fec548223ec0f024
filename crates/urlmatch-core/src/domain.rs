//! Registrable-domain extraction.
//!
//! Structural only: strips scheme, userinfo and a leading `www.`, then cuts at
//! the first `:`, `/` or `?`. No public-suffix lookup and no lowercasing.

use regex::Regex;
use std::sync::OnceLock;

const DOMAIN_PATTERN: &str = r"^(?:https?://)?(?:[^@\n]+@)?(?:www\.)?([^:/\n?]+)";

fn domain_regex() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(DOMAIN_PATTERN).ok()).as_ref()
}

/// Extracts the host part used for comparison.
///
/// Never fails: input that does not look like a URL yields `""`.
///
/// # Examples
///
/// - `extract_domain("https://www.example.com/a?b=1")` → `"example.com"`
/// - `extract_domain("user@host.test:8080")` → `"host.test"`
/// - `extract_domain("/relative")` → `""`
pub fn extract_domain(url: &str) -> String {
    domain_regex()
        .and_then(|re| re.captures(url))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}
