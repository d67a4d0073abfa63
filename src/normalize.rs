/// Canonicalizes an attribute key before it is compared against a whitelist.
///
/// The key is lower-cased and every character a browser may tolerate inside or around an
/// attribute name (whitespace, `/`, `>`, quotes, `=` and NUL) is removed wherever it appears.
pub fn normalize_key(raw: &str) -> String {
    raw.to_lowercase()
        .chars()
        .filter(|c| !matches!(c, '\n' | '\r' | '\t' | ' ' | '/' | '>' | '"' | '=' | '\'' | '\0'))
        .collect()
}

/// Canonicalizes a URI scheme. Returns `None` when nothing usable is left or when the result
/// does not start with a letter.
pub fn normalize_scheme(raw: &str) -> Option<String> {
    let scheme = raw
        .to_lowercase()
        .chars()
        .filter(|c| matches!(c, 'a'..='z' | '0'..='9' | '+' | '-' | '.'))
        .collect::<String>();

    match scheme.chars().next() {
        Some('a'..='z') => Some(scheme),
        _ => None,
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn strips_separators_from_keys() {
        let dirty_key = "  key/\r\n\t >\"'=name\u{0}バナナ \t";
        assert_eq!(normalize_key(dirty_key), "keynameバナナ");
    }

    #[test]
    fn lowercases_keys() {
        assert_eq!(normalize_key("OnClicK"), "onclick");
        assert_eq!(normalize_key("ID"), "id");
    }

    #[test]
    fn keeps_other_punctuation_in_keys() {
        assert_eq!(
            normalize_key("!@#$a%^&*(b)_+-=|}{\\][\":';?>c<,./~`'\"d}"),
            "!@#$a%^&*(b)_+-|}{\\][:;?c<,.~`d}"
        );
    }

    #[test]
    fn normalizes_schemes() {
        let cases = vec![
            ("HTTP", Some("http")),
            ("Https", Some("https")),
            ("jav&#x09;ascript:", Some("javx09ascript")),
            ("", None),
            ("###", None),
            ("8chan", None),
            ("+http", None),
            ("a", Some("a")),
            ("A", Some("a")),
            ("Z", Some("z")),
            ("foo:", Some("foo")),
            ("svn+ssh", Some("svn+ssh")),
        ];

        for (raw, expected) in cases {
            assert_eq!(
                normalize_scheme(raw).as_deref(),
                expected,
                "normalizing {:?}",
                raw
            );
        }
    }
}
