//! Syntax checks shared by the resource definitions.
//!
//! Each check returns the reason a value is rejected, or `None`/`Ok` when it
//! is acceptable. Callers wrap the reason in the right `ConfigurationError`.

use url::{Host, Url};

/// Words the provider refuses inside a hosted domain prefix.
const RESERVED_PREFIX_WORDS: &[&str] = &["aws", "amazon", "cognito"];

const MAX_DOMAIN_PREFIX_LEN: usize = 63;

const MAX_NAME_LEN: usize = 128;

/// Kind of redirect URL accepted by [`check_redirect_url`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectUrl {
    /// Anything other than plain http.
    Secure,
    /// Plain http to a loopback host; accepted for local development.
    Loopback,
}

/// Validate an OAuth callback or logout URL.
///
/// The URL must be absolute, survive a parse/serialize round trip
/// unchanged, carry no fragment, and use https unless it points at a
/// loopback host.
pub fn check_redirect_url(url: &str) -> Result<RedirectUrl, String> {
    let parsed = Url::parse(url).map_err(|e| format!("not an absolute URI ({e})"))?;

    if parsed.as_str() != url {
        return Err(format!("not in canonical form, expected '{parsed}'"));
    }
    if parsed.cannot_be_a_base() {
        return Err("not a hierarchical URI".into());
    }
    if parsed.fragment().is_some() {
        return Err("must not contain a fragment".into());
    }

    let is_loopback = match parsed.host() {
        Some(Host::Domain(h)) => h == "localhost",
        Some(Host::Ipv4(ip)) => ip.is_loopback(),
        Some(Host::Ipv6(ip)) => ip.is_loopback(),
        None => false,
    };

    match parsed.scheme() {
        "http" if is_loopback => Ok(RedirectUrl::Loopback),
        "http" => Err("must use https (http is only allowed for loopback hosts)".into()),
        _ => Ok(RedirectUrl::Secure),
    }
}

/// Reason a hosted domain prefix is rejected.
pub fn domain_prefix_violation(prefix: &str) -> Option<&'static str> {
    if prefix.is_empty() {
        return Some("must not be empty");
    }
    if prefix.len() > MAX_DOMAIN_PREFIX_LEN {
        return Some("must be at most 63 characters");
    }
    if !prefix
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    {
        return Some("may only contain lowercase letters, digits and hyphens");
    }
    if prefix.starts_with('-') || prefix.ends_with('-') {
        return Some("must not start or end with a hyphen");
    }
    if RESERVED_PREFIX_WORDS.iter().any(|w| prefix.contains(w)) {
        return Some("must not contain the reserved words aws, amazon or cognito");
    }
    None
}

/// Region names look like `us-east-1` or `us-gov-west-1`.
pub fn is_valid_region(region: &str) -> bool {
    let parts: Vec<&str> = region.split('-').collect();
    if parts.len() < 3 {
        return false;
    }
    let (first, rest) = (parts[0], &parts[1..]);
    let last = parts[parts.len() - 1];

    first.len() == 2
        && first.chars().all(|c| c.is_ascii_lowercase())
        && rest
            .iter()
            .all(|p| !p.is_empty() && p.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()))
        && last.chars().all(|c| c.is_ascii_digit())
}

/// Directory names: word characters, whitespace and `+=,.@-`.
pub fn is_valid_directory_name(name: &str) -> bool {
    !name.trim().is_empty()
        && name.len() <= MAX_NAME_LEN
        && name
            .chars()
            .all(|c| c.is_alphanumeric() || c == '_' || c.is_whitespace() || "+=,.@-".contains(c))
}

/// Federation names: word characters and spaces.
pub fn is_valid_federation_name(name: &str) -> bool {
    !name.trim().is_empty()
        && name.len() <= MAX_NAME_LEN
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == ' ')
}

/// OAuth scope tokens: printable, no whitespace, no quotes or backslashes.
pub fn is_valid_scope(scope: &str) -> bool {
    !scope.is_empty()
        && scope
            .chars()
            .all(|c| c.is_ascii_graphic() && c != '"' && c != '\\')
}
