//! Inherited validation rules and JSON helpers.

use serde::de::DeserializeOwned;
use serde::Serialize;

/// Text values must contain something other than whitespace.
#[must_use]
pub fn is_valid_text(value: &str) -> bool {
    !value.trim().is_empty()
}

/// An absolute URL: `scheme://[userinfo@]host[:port][/path...]` with no
/// whitespace. The port, when present, must fit in 16 bits.
///
/// # Examples
///
/// ```
/// use aircon::runtime::is_valid_url;
///
/// assert!(is_valid_url("https://example.com/path?q=1"));
/// assert!(!is_valid_url("example.com"));
/// assert!(!is_valid_url("https:// spaced.com"));
/// assert!(!is_valid_url("https://example.com:http"));
/// ```
#[must_use]
pub fn is_valid_url(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((scheme, rest)) = value.split_once("://") else {
        return false;
    };
    let mut chars = scheme.chars();
    let scheme_ok = chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
    let authority = rest.split(['/', '?', '#']).next().unwrap_or_default();
    let host_port = authority.rsplit_once('@').map_or(authority, |(_, hp)| hp);
    scheme_ok
        && split_host(host_port).is_some_and(|(host, port)| host_ok(host) && port_ok(port))
}

/// Splits `host[:port]`, keeping bracketed IPv6 addresses whole.
fn split_host(host_port: &str) -> Option<(&str, Option<&str>)> {
    if let Some(v6) = host_port.strip_prefix('[') {
        let (addr, tail) = v6.split_once(']')?;
        if !addr.chars().all(|c| c.is_ascii_hexdigit() || matches!(c, ':' | '.')) {
            return None;
        }
        return match tail {
            "" => Some((host_port, None)),
            _ => tail.strip_prefix(':').map(|port| (host_port, Some(port))),
        };
    }
    Some(match host_port.split_once(':') {
        Some((host, port)) => (host, Some(port)),
        None => (host_port, None),
    })
}

fn host_ok(host: &str) -> bool {
    host.starts_with('[')
        || (!host.is_empty()
            && host
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '.' | '_' | '~' | '%')))
}

fn port_ok(port: Option<&str>) -> bool {
    match port {
        None | Some("") => true,
        Some(port) => port.bytes().all(|b| b.is_ascii_digit()) && port.parse::<u16>().is_ok(),
    }
}

/// Decodes a JSON document, `None` when it does not fit `T`.
#[must_use]
pub fn from_json<T: DeserializeOwned>(text: &str) -> Option<T> {
    serde_json::from_str(text).ok()
}

/// Encodes a value for storage in a string source.
#[must_use]
pub fn to_json<T: Serialize>(value: &T) -> Option<String> {
    serde_json::to_string(value).ok()
}

/// Decodes a literal JSON default, falling back to `T::default()`.
#[must_use]
pub fn json_default<T: DeserializeOwned + Default>(text: &str) -> T {
    from_json(text).unwrap_or_default()
}
