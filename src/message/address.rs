//! # Subscriber address: validated two-segment identifier.
//!
//! An [`Address`] names the subscriber a message is intended for. The syntax
//! is `segment.segment` — exactly two dot-separated tokens, each built from
//! ASCII alphanumerics and hyphens. Matching is case-insensitive: parsing
//! normalizes to lowercase, so `My-App.Inbox` and `my-app.inbox` compare and
//! hash equal.
//!
//! ## Rules
//! - Exactly two segments; each segment is non-empty.
//! - Segment charset: `[A-Za-z0-9-]`.
//! - A target that fails this syntax is **not an error at the routing
//!   boundary** — it signals "not mine to handle" and `route` returns `false`.

use std::fmt;
use std::sync::Arc;

use crate::error::AddressError;

/// Lowercase-normalized subscriber identifier (`segment.segment`).
///
/// Cheap to clone (backed by `Arc<str>`); equality and hashing operate on
/// the normalized form.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Address(Arc<str>);

impl Address {
    /// Parses and normalizes a raw target identifier.
    ///
    /// # Example
    /// ```
    /// use postbox::Address;
    ///
    /// let a = Address::parse("My-App.Inbox").unwrap();
    /// let b = Address::parse("my-app.inbox").unwrap();
    /// assert_eq!(a, b);
    /// assert_eq!(a.as_str(), "my-app.inbox");
    ///
    /// assert!(Address::parse("not-an-address").is_err());
    /// ```
    pub fn parse(raw: &str) -> Result<Self, AddressError> {
        let Some((first, second)) = raw.split_once('.') else {
            return Err(AddressError::SegmentCount { raw: raw.to_string() });
        };
        if second.contains('.') {
            return Err(AddressError::SegmentCount { raw: raw.to_string() });
        }
        if !is_segment(first) || !is_segment(second) {
            return Err(AddressError::InvalidSegment { raw: raw.to_string() });
        }
        Ok(Self(raw.to_ascii_lowercase().into()))
    }

    /// Returns the normalized (lowercase) textual form.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Address {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

fn is_segment(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_two_segments() {
        let addr = Address::parse("foo.bar").expect("valid address");
        assert_eq!(addr.as_str(), "foo.bar");
    }

    #[test]
    fn test_parse_allows_digits_and_hyphens() {
        assert!(Address::parse("pub-1.sub-2").is_ok());
        assert!(Address::parse("0.0").is_ok());
    }

    #[test]
    fn test_parse_normalizes_case() {
        let upper = Address::parse("My-App.Inbox").expect("valid address");
        let lower = Address::parse("my-app.inbox").expect("valid address");
        assert_eq!(upper, lower);
        assert_eq!(upper.as_str(), "my-app.inbox");
    }

    #[test]
    fn test_parse_rejects_wrong_segment_count() {
        assert!(matches!(
            Address::parse("single"),
            Err(AddressError::SegmentCount { .. })
        ));
        assert!(matches!(
            Address::parse("a.b.c"),
            Err(AddressError::SegmentCount { .. })
        ));
    }

    #[test]
    fn test_parse_rejects_empty_segments() {
        assert!(Address::parse(".bar").is_err());
        assert!(Address::parse("foo.").is_err());
        assert!(Address::parse(".").is_err());
    }

    #[test]
    fn test_parse_rejects_invalid_characters() {
        assert!(Address::parse("foo_bar.baz").is_err());
        assert!(Address::parse("foo.b az").is_err());
        assert!(Address::parse("föö.bar").is_err());
        assert!(Address::parse("foo.bar!").is_err());
    }

    #[test]
    fn test_display_matches_normalized_form() {
        let addr = Address::parse("Foo.BAR").expect("valid address");
        assert_eq!(addr.to_string(), "foo.bar");
    }
}
