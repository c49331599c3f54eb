use regex::Regex;

/// Marker GitHub puts in API response bodies once the unauthenticated
/// request quota is exhausted.
const RATE_LIMIT_MARKER: &str = "rate limit exceeded";

/// Compiled capture patterns for the handful of payload shapes the crawler
/// consumes. Patterns run over raw bodies; no JSON or HTML parsing is done.
pub struct Extractor {
    email_field: Regex,
    mailto_link: Regex,
    repo_full_name: Regex,
    listing_user: Regex,
}

impl Extractor {
    pub fn new() -> Self {
        Extractor {
            // "email": "user@example.com",
            email_field: Regex::new(r#""email": "([^"]+)","#).unwrap(),
            // href="mailto:..." links on profile pages, obfuscated with
            // HTML hex entities
            mailto_link: Regex::new(r#""mailto:([^"]+)""#).unwrap(),
            // "full_name": "owner/repo",
            repo_full_name: Regex::new(r#""full_name": "([^"]+)","#).unwrap(),
            // avatar captions on followers/following listing pages
            listing_user: Regex::new(r#"<img alt="@([^"]+)""#).unwrap(),
        }
    }

    /// First non-empty email field in an API body.
    pub fn email_field(&self, body: &str) -> Option<String> {
        self.email_field
            .captures(body)
            .map(|cap| cap[1].to_string())
            .filter(|email| !email.is_empty())
    }

    /// Every email field in a commit listing, in document order. Commits may
    /// carry several distinct author identities and co-authors.
    pub fn all_email_fields(&self, body: &str) -> Vec<String> {
        self.email_field
            .captures_iter(body)
            .map(|cap| cap[1].to_string())
            .collect()
    }

    /// Raw (still encoded) capture of a profile page mailto link.
    pub fn mailto_link(&self, body: &str) -> Option<String> {
        self.mailto_link
            .captures(body)
            .map(|cap| cap[1].to_string())
            .filter(|link| !link.is_empty())
    }

    /// Fully-qualified name of the first repository in an owner-repos body.
    pub fn repo_full_name(&self, body: &str) -> Option<String> {
        self.repo_full_name
            .captures(body)
            .map(|cap| cap[1].to_string())
            .filter(|name| !name.is_empty())
    }

    /// Every username captioned on a followers/following listing page.
    /// Duplicates are returned as-is.
    pub fn listing_usernames(&self, body: &str) -> Vec<String> {
        self.listing_user
            .captures_iter(body)
            .map(|cap| cap[1].to_string())
            .collect()
    }

    pub fn is_rate_limited(&self, body: &str) -> bool {
        body.contains(RATE_LIMIT_MARKER)
    }
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Decode an obfuscated mailto capture: GitHub splices `;` separators into
/// the href and spells percent escapes as `&#x` hex entities. Strip the
/// separators, rewrite the entity markers back to `%`, then percent-decode.
/// Malformed escapes yield `None` rather than a partial address.
pub fn decode_mailto(raw: &str) -> Option<String> {
    let cleaned = raw.replace(';', "").replace("&#x", "%");

    // urlencoding passes malformed escapes through untouched; reject them
    // up front so a broken link never surfaces as a mangled address.
    let bytes = cleaned.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            if i + 2 >= bytes.len()
                || !bytes[i + 1].is_ascii_hexdigit()
                || !bytes[i + 2].is_ascii_hexdigit()
            {
                return None;
            }
            i += 3;
        } else {
            i += 1;
        }
    }

    urlencoding::decode(&cleaned).ok().map(|cow| cow.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_field_captures_first_match() {
        let extractor = Extractor::new();
        let body = r#"{"login": "octocat", "email": "octo@example.com", "bio": null}"#;
        assert_eq!(
            extractor.email_field(body),
            Some("octo@example.com".to_string())
        );
        assert_eq!(extractor.email_field(r#"{"login": "octocat"}"#), None);
    }

    #[test]
    fn all_email_fields_collects_every_author() {
        let extractor = Extractor::new();
        let body = r#"[
            {"commit": {"author": {"email": "a@x.com", "name": "A"}}},
            {"commit": {"author": {"email": "b@x.com", "name": "B"}}},
            {"commit": {"author": {"email": "a@x.com", "name": "A"}}}
        ]"#;
        assert_eq!(
            extractor.all_email_fields(body),
            vec!["a@x.com", "b@x.com", "a@x.com"]
        );
    }

    #[test]
    fn listing_usernames_keeps_duplicates() {
        let extractor = Extractor::new();
        let body = r#"<img alt="@alice" src="a.png"><img alt="@bob"><img alt="@alice">"#;
        assert_eq!(extractor.listing_usernames(body), vec!["alice", "bob", "alice"]);
    }

    #[test]
    fn rate_limit_marker_is_detected() {
        let extractor = Extractor::new();
        assert!(extractor.is_rate_limited(r#"{"message": "API rate limit exceeded for ..."}"#));
        assert!(!extractor.is_rate_limited(r#"{"login": "octocat"}"#));
    }

    #[test]
    fn decode_mailto_strips_separators_and_entities() {
        assert_eq!(
            decode_mailto("foo%40example&#x2e;com;"),
            Some("foo@example.com".to_string())
        );
        assert_eq!(
            decode_mailto("f;o;o&#x40;example.com"),
            Some("foo@example.com".to_string())
        );
        assert_eq!(decode_mailto("plain@example.com"), Some("plain@example.com".to_string()));
    }

    #[test]
    fn decode_mailto_rejects_malformed_escapes() {
        assert_eq!(decode_mailto("foo%4"), None);
        assert_eq!(decode_mailto("foo%zz@example.com"), None);
        assert_eq!(decode_mailto("trailing&#x"), None);
    }
}
