//! Field validation helpers shared by the wizards.

use url::Url;
use validator::ValidateEmail;

/// Whether a string is a valid six-digit Indian postal code.
pub fn is_valid_pincode(s: &str) -> bool {
    s.len() == 6 && s.bytes().all(|b| b.is_ascii_digit())
}

/// Whether a string is a well-formed email address.
pub fn is_valid_email(s: &str) -> bool {
    s.validate_email()
}

/// Whether a string is an absolute http(s) URL.
///
/// External application and course links must be complete, not bare
/// hostnames or relative paths.
pub fn is_valid_http_url(s: &str) -> bool {
    match Url::parse(s) {
        Ok(url) => matches!(url.scheme(), "http" | "https"),
        Err(_) => false,
    }
}

/// Whether every entry in a list is a well-formed email address.
///
/// An empty list is fine; notification emails are optional.
pub fn all_valid_emails(emails: &[String]) -> bool {
    emails.iter().all(|e| e.validate_email())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pincode_accepts_six_digits() {
        assert!(is_valid_pincode("400053"));
        assert!(is_valid_pincode("110001"));
    }

    #[test]
    fn test_pincode_rejects_bad_shapes() {
        assert!(!is_valid_pincode(""));
        assert!(!is_valid_pincode("4000"));
        assert!(!is_valid_pincode("4000531"));
        assert!(!is_valid_pincode("40005a"));
        assert!(!is_valid_pincode("40 053"));
        // Unicode digits are not ASCII digits
        assert!(!is_valid_pincode("４０００５３"));
    }

    #[test]
    fn test_email_validation() {
        assert!(is_valid_email("hiring@store.example"));
        assert!(is_valid_email("a.b+tag@sub.domain.co"));
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("missing@tld@twice"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn test_all_valid_emails() {
        assert!(all_valid_emails(&[]));
        assert!(all_valid_emails(&["a@b.co".to_string(), "c@d.co".to_string()]));
        assert!(!all_valid_emails(&["a@b.co".to_string(), "junk".to_string()]));
    }

    #[test]
    fn test_http_url_validation() {
        assert!(is_valid_http_url("https://careers.example.com/apply"));
        assert!(is_valid_http_url("http://example.com"));
        assert!(!is_valid_http_url("careers.example.com/apply"));
        assert!(!is_valid_http_url("ftp://example.com/file"));
        assert!(!is_valid_http_url("javascript:alert(1)"));
        assert!(!is_valid_http_url(""));
    }
}
