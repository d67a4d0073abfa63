use thiserror::Error;
use url::{ParseError, Url};

use crate::normalize::normalize_scheme;
use crate::whitelist::Tagdef;

/// Why an attribute value was rejected by a protocol policy. The attribute is dropped, the
/// rest of the element is kept.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProtocolError {
    #[error("invalid URL: {0}")]
    InvalidUrl(ParseError),
    #[error("relative links are not allowed")]
    RelativeLinkDisallowed,
    #[error("protocol `{0}` is not allowed")]
    InvalidProtocol(String),
}

/// Checks `value` against the protocol policy `tagdef` has for `key`.
///
/// Values of attributes without a policy pass through untouched. Otherwise the value must
/// parse as a URL whose scheme is in the allowed set, or be a relative reference on a tag that
/// allows relative links. Accepted values are returned the way the URL parser sees them:
/// surrounding C0 controls and spaces trimmed, tabs and newlines removed.
pub fn enforce_protocol(tagdef: &Tagdef, key: &str, value: &str) -> Result<String, ProtocolError> {
    let allowed_protocols = match tagdef.protocols_for(key) {
        Some(allowed_protocols) => allowed_protocols,
        None => return Ok(value.to_owned()),
    };

    match Url::parse(value) {
        Ok(url) => match normalize_scheme(url.scheme()) {
            Some(ref scheme) if allowed_protocols.contains(scheme) => Ok(canonicalize(value)),
            _ => Err(ProtocolError::InvalidProtocol(url.scheme().to_owned())),
        },
        Err(ParseError::RelativeUrlWithoutBase) => {
            if tagdef.allows_relative_links() {
                Ok(canonicalize(value))
            } else {
                Err(ProtocolError::RelativeLinkDisallowed)
            }
        }
        Err(err) => Err(ProtocolError::InvalidUrl(err)),
    }
}

fn canonicalize(value: &str) -> String {
    value
        .trim_matches(|c: char| c <= ' ')
        .chars()
        .filter(|c| !matches!(c, '\t' | '\n' | '\r'))
        .collect()
}

#[cfg(test)]
mod test {
    use super::*;

    fn link_tagdef() -> Tagdef {
        Tagdef::new(local_name!("a"), &["href", "title"])
            .enforce_protocols("href", &["http", "https", "mailto"])
    }

    #[test]
    fn passes_through_attrs_without_policy() {
        assert_eq!(
            enforce_protocol(&link_tagdef(), "title", "javascript:alert(1)"),
            Ok("javascript:alert(1)".to_owned())
        );
    }

    #[test]
    fn accepts_allowed_schemes() {
        let tagdef = link_tagdef();
        assert_eq!(
            enforce_protocol(&tagdef, "href", "http://e.com"),
            Ok("http://e.com".to_owned())
        );
        assert_eq!(
            enforce_protocol(&tagdef, "href", "mailto:someone@example.com"),
            Ok("mailto:someone@example.com".to_owned())
        );
    }

    #[test]
    fn compares_schemes_case_insensitively() {
        assert_eq!(
            enforce_protocol(&link_tagdef(), "href", "HTTPS://E.COM/path"),
            Ok("HTTPS://E.COM/path".to_owned())
        );
    }

    #[test]
    fn rejects_disallowed_schemes() {
        let tagdef = link_tagdef();
        for value in &[
            "javascript:alert(1)",
            " javascript:alert(1)",
            "java\tscript:alert(1)",
            "JaVaScRiPt:alert(1)",
            "ftp://e.com/file",
            "data:text/html;base64,PHNjcmlwdD4=",
        ] {
            assert!(
                matches!(
                    enforce_protocol(&tagdef, "href", value),
                    Err(ProtocolError::InvalidProtocol(_))
                ),
                "{:?} should be rejected",
                value
            );
        }
    }

    #[test]
    fn rejects_relative_links_by_default() {
        assert_eq!(
            enforce_protocol(&link_tagdef(), "href", "/local/path"),
            Err(ProtocolError::RelativeLinkDisallowed)
        );
        assert_eq!(
            enforce_protocol(&link_tagdef(), "href", ""),
            Err(ProtocolError::RelativeLinkDisallowed)
        );
    }

    #[test]
    fn accepts_relative_links_when_allowed() {
        let tagdef = link_tagdef().allow_relative_links();
        assert_eq!(
            enforce_protocol(&tagdef, "href", " /local/path\n"),
            Ok("/local/path".to_owned())
        );
        assert_eq!(
            enforce_protocol(&tagdef, "href", "page.html#top"),
            Ok("page.html#top".to_owned())
        );
    }

    #[test]
    fn relative_links_do_not_bypass_scheme_checks() {
        let tagdef = link_tagdef().allow_relative_links();
        assert!(matches!(
            enforce_protocol(&tagdef, "href", "javascript:alert(1)"),
            Err(ProtocolError::InvalidProtocol(_))
        ));
    }

    #[test]
    fn rejects_unparseable_urls() {
        assert!(matches!(
            enforce_protocol(&link_tagdef(), "href", "http://[::1"),
            Err(ProtocolError::InvalidUrl(_))
        ));
    }

    #[test]
    fn empty_policy_rejects_everything_absolute() {
        let tagdef = Tagdef::new(local_name!("img"), &["src"]).enforce_protocols("src", &[]);
        assert!(matches!(
            enforce_protocol(&tagdef, "src", "https://e.com/a.png"),
            Err(ProtocolError::InvalidProtocol(_))
        ));
    }
}
