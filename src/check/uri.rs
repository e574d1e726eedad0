use thiserror::Error;
use url::Host;

/// Errors produced when a string is not a syntactically valid URI reference.
///
/// The `Display` text of each variant is reported verbatim as a validation
/// issue, so messages name the offending fragment.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UriError {
    /// A bracketed IP literal the `url` host parser rejected.
    #[error("invalid URL {reference:?}: {source}")]
    Parse {
        reference: String,
        #[source]
        source: url::ParseError,
    },
    /// A `%` not followed by two hexadecimal digits.
    #[error("invalid URL escape {0:?}")]
    InvalidEscape(String),
    /// A character not allowed where it appears.
    #[error("invalid character {0:?} in URL")]
    InvalidCharacter(char),
    /// The text before the first `:` is not a scheme.
    #[error("invalid URL scheme {0:?}")]
    InvalidScheme(String),
    /// A port that is not a run of digits.
    #[error("invalid port {0:?} in URL")]
    InvalidPort(String),
}

/// Checks that `reference` is a syntactically valid URI reference.
///
/// Both absolute URIs (`http://example.com/feed`, `urn:uuid:...`,
/// `tag:example.com,2005:1`) and relative references (`/blog`, `../logo.png`,
/// `#top`, `//`) are accepted. The reference is judged against the RFC 3986
/// grammar, not a browser URL parser, so `http://` and
/// `http://example.com:99999/` pass. No scheme or host policy is applied:
/// Atom identifiers are frequently non-HTTP. Non-ASCII characters are
/// allowed outside the scheme and port, as in IRIs.
///
/// # Errors
///
/// Returns [`UriError`] if:
/// - A percent sign is not followed by two hex digits ([`UriError::InvalidEscape`])
/// - The reference contains whitespace, controls or one of `<>"{}|\^`` ` ``,
///   or a delimiter where the grammar forbids it ([`UriError::InvalidCharacter`])
/// - A `:` in the first segment does not follow a valid scheme
///   ([`UriError::InvalidScheme`])
/// - The port is not all digits ([`UriError::InvalidPort`])
/// - A bracketed IP literal is malformed ([`UriError::Parse`])
///
/// # Examples
///
/// ```
/// use atomfeed::check::check_uri_reference;
///
/// assert!(check_uri_reference("http://example.org/2003/12/13/atom03").is_ok());
/// assert!(check_uri_reference("/relative/path?q=1").is_ok());
/// assert!(check_uri_reference("http://example.org/%zz").is_err());
/// ```
pub fn check_uri_reference(reference: &str) -> Result<(), UriError> {
    check_escapes(reference)?;

    if let Some(c) = reference.chars().find(|&c| is_disallowed(c)) {
        return Err(UriError::InvalidCharacter(c));
    }

    let (rest, fragment) = match reference.split_once('#') {
        Some((rest, fragment)) => (rest, Some(fragment)),
        None => (reference, None),
    };
    let (rest, query) = match rest.split_once('?') {
        Some((rest, query)) => (rest, Some(query)),
        None => (rest, None),
    };

    let rest = strip_scheme(rest)?;
    let path = match rest.strip_prefix("//") {
        Some(after) => {
            let end = after.find('/').unwrap_or(after.len());
            check_authority(reference, &after[..end])?;
            &after[end..]
        }
        None => rest,
    };

    check_chars(path, |c| !matches!(c, '[' | ']'))?;
    if let Some(query) = query {
        check_chars(query, |c| !matches!(c, '[' | ']'))?;
    }
    if let Some(fragment) = fragment {
        check_chars(fragment, |c| !matches!(c, '[' | ']' | '#'))?;
    }
    Ok(())
}

/// Removes `scheme:` from the front of `hier`, which holds no `?` or `#`.
///
/// Without a scheme the first path segment may not contain `:`.
fn strip_scheme(hier: &str) -> Result<&str, UriError> {
    let first_segment = hier.split('/').next().unwrap_or_default();
    let Some((scheme, _)) = first_segment.split_once(':') else {
        return Ok(hier);
    };

    let mut chars = scheme.chars();
    let valid = chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
    if !valid {
        return Err(UriError::InvalidScheme(scheme.to_owned()));
    }
    Ok(&hier[scheme.len() + 1..])
}

/// `authority = [ userinfo "@" ] host [ ":" port ]`
fn check_authority(reference: &str, authority: &str) -> Result<(), UriError> {
    let host_port = match authority.split_once('@') {
        Some((userinfo, host_port)) => {
            check_chars(userinfo, |c| !matches!(c, '[' | ']'))?;
            host_port
        }
        None => authority,
    };

    let port = if host_port.starts_with('[') {
        let close = host_port.find(']').map_or(host_port.len(), |i| i + 1);
        check_ip_literal(reference, &host_port[..close])?;
        match &host_port[close..] {
            "" => None,
            after => match after.strip_prefix(':') {
                Some(port) => Some(port),
                None => return Err(invalid_first(after)),
            },
        }
    } else {
        let (host, port) = match host_port.split_once(':') {
            Some((host, port)) => (host, Some(port)),
            None => (host_port, None),
        };
        check_chars(host, |c| !matches!(c, '[' | ']' | '@'))?;
        port
    };

    match port {
        Some(port) if !port.bytes().all(|b| b.is_ascii_digit()) => {
            Err(UriError::InvalidPort(port.to_owned()))
        }
        _ => Ok(()),
    }
}

/// `IP-literal = "[" ( IPv6address / IPvFuture ) "]"`
fn check_ip_literal(reference: &str, literal: &str) -> Result<(), UriError> {
    let future = literal
        .strip_prefix("[v")
        .or_else(|| literal.strip_prefix("[V"))
        .and_then(|rest| rest.strip_suffix(']'));
    if let Some(future) = future {
        let Some((version, address)) = future.split_once('.') else {
            return Err(invalid_first(future));
        };
        if version.is_empty() || !version.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(invalid_first(version));
        }
        if address.is_empty() {
            return Err(UriError::InvalidCharacter(']'));
        }
        return check_chars(address, |c| {
            c.is_ascii_alphanumeric() || "-._~!$&'()*+,;=:".contains(c)
        });
    }

    Host::parse(literal)
        .map(|_| ())
        .map_err(|source| UriError::Parse {
            reference: reference.to_owned(),
            source,
        })
}

fn check_chars(part: &str, allowed: impl Fn(char) -> bool) -> Result<(), UriError> {
    match part.chars().find(|&c| !allowed(c)) {
        Some(c) => Err(UriError::InvalidCharacter(c)),
        None => Ok(()),
    }
}

/// Names the first character of a fragment that should not be there.
fn invalid_first(part: &str) -> UriError {
    UriError::InvalidCharacter(part.chars().next().unwrap_or(']'))
}

fn check_escapes(reference: &str) -> Result<(), UriError> {
    let bytes = reference.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let valid = bytes.len() > i + 2
                && bytes[i + 1].is_ascii_hexdigit()
                && bytes[i + 2].is_ascii_hexdigit();
            if !valid {
                // `%` is ASCII, so `i` is a char boundary
                let escape: String = reference[i..].chars().take(3).collect();
                return Err(UriError::InvalidEscape(escape));
            }
            i += 3;
        } else {
            i += 1;
        }
    }
    Ok(())
}

fn is_disallowed(c: char) -> bool {
    c.is_control()
        || c.is_whitespace()
        || matches!(c, '<' | '>' | '"' | '{' | '}' | '|' | '\\' | '^' | '`')
}
