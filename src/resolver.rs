//! Paragraph reference resolution.
//!
//! The same input box accepts paragraph lookups and natural-language
//! queries, so a token that fails to parse or validate is classified, not
//! rejected: the search path falls back to free-text search, while the
//! dedicated lookup endpoint turns the classification into a 400.

use regex::Regex;
use std::sync::OnceLock;

use crate::error::InvalidReference;
use crate::models::ReferenceSpec;

/// Outcome of classifying one token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// A validated single-paragraph or range reference.
    Reference(ReferenceSpec),
    /// Matched a reference shape but failed bounds or span validation.
    Invalid(InvalidReference),
    /// Not shaped like a reference at all; treat as a search query.
    NotAReference,
}

/// Recognized shapes: `283`, `283-284`, `CCC 283`, `paragraph 283`,
/// `para 283-284`, `p 283`, `#283`. Case-insensitive, tolerant of
/// whitespace around the hyphen.
fn reference_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)^(?:(?:ccc|paragraphs?|para|p)\s+|#\s*)?(\d+)(?:\s*-\s*(\d+))?$")
            .expect("reference regex is valid")
    })
}

/// Classify `token` against a corpus of `corpus_size` paragraphs, allowing
/// ranges spanning at most `max_span` paragraphs.
pub fn resolve(token: &str, corpus_size: u32, max_span: u32) -> Resolution {
    let token = token.trim();

    let Some(caps) = reference_re().captures(token) else {
        return Resolution::NotAReference;
    };

    // Numbers too large for u32 are not references either
    let Ok(start) = caps[1].parse::<u32>() else {
        return Resolution::NotAReference;
    };
    let end = match caps.get(2) {
        Some(m) => match m.as_str().parse::<u32>() {
            Ok(n) => n,
            Err(_) => return Resolution::NotAReference,
        },
        None => start,
    };

    if start == 0 {
        return Resolution::Invalid(InvalidReference::OutOfRange {
            number: start,
            corpus_size,
        });
    }
    if end > corpus_size {
        return Resolution::Invalid(InvalidReference::OutOfRange {
            number: end,
            corpus_size,
        });
    }
    if start > end {
        return Resolution::Invalid(InvalidReference::Reversed { start, end });
    }
    if end - start + 1 > max_span {
        return Resolution::Invalid(InvalidReference::SpanTooLarge {
            start,
            end,
            max_span,
        });
    }

    Resolution::Reference(ReferenceSpec { start, end })
}

#[cfg(test)]
mod tests {
    use super::*;

    const N: u32 = 2865;
    const SPAN: u32 = 10;

    fn reference(token: &str) -> ReferenceSpec {
        match resolve(token, N, SPAN) {
            Resolution::Reference(spec) => spec,
            other => panic!("expected {token:?} to resolve, got {other:?}"),
        }
    }

    #[test]
    fn test_bare_single() {
        assert_eq!(reference("283"), ReferenceSpec { start: 283, end: 283 });
    }

    #[test]
    fn test_bare_range() {
        assert_eq!(reference("283-284"), ReferenceSpec { start: 283, end: 284 });
    }

    #[test]
    fn test_prefixed_shapes() {
        assert_eq!(reference("CCC 283"), ReferenceSpec { start: 283, end: 283 });
        assert_eq!(reference("ccc 283-284"), ReferenceSpec { start: 283, end: 284 });
        assert_eq!(reference("paragraph 283"), ReferenceSpec { start: 283, end: 283 });
        assert_eq!(reference("para 283-284"), ReferenceSpec { start: 283, end: 284 });
        assert_eq!(reference("p 283"), ReferenceSpec { start: 283, end: 283 });
        assert_eq!(reference("#283"), ReferenceSpec { start: 283, end: 283 });
        assert_eq!(reference("#283-284"), ReferenceSpec { start: 283, end: 284 });
    }

    #[test]
    fn test_whitespace_tolerance() {
        assert_eq!(reference("  283 - 284  "), ReferenceSpec { start: 283, end: 284 });
        assert_eq!(reference("CCC 283 -284"), ReferenceSpec { start: 283, end: 284 });
    }

    #[test]
    fn test_zero_is_out_of_range() {
        assert!(matches!(
            resolve("0", N, SPAN),
            Resolution::Invalid(InvalidReference::OutOfRange { number: 0, .. })
        ));
    }

    #[test]
    fn test_past_corpus_end_is_out_of_range() {
        assert!(matches!(
            resolve("2866", N, SPAN),
            Resolution::Invalid(InvalidReference::OutOfRange { number: 2866, .. })
        ));
        assert_eq!(reference("2865"), ReferenceSpec { start: 2865, end: 2865 });
    }

    #[test]
    fn test_span_of_eleven_rejected() {
        assert!(matches!(
            resolve("283-293", N, SPAN),
            Resolution::Invalid(InvalidReference::SpanTooLarge { .. })
        ));
        // Ten paragraphs exactly is allowed
        assert_eq!(reference("283-292"), ReferenceSpec { start: 283, end: 292 });
    }

    #[test]
    fn test_reversed_range_rejected() {
        assert!(matches!(
            resolve("290-283", N, SPAN),
            Resolution::Invalid(InvalidReference::Reversed { start: 290, end: 283 })
        ));
    }

    #[test]
    fn test_free_text_is_not_a_reference() {
        assert_eq!(resolve("what is prayer?", N, SPAN), Resolution::NotAReference);
        assert_eq!(resolve("283 extra words", N, SPAN), Resolution::NotAReference);
        assert_eq!(resolve("", N, SPAN), Resolution::NotAReference);
        assert_eq!(resolve("p283", N, SPAN), Resolution::NotAReference);
    }

    #[test]
    fn test_overflowing_number_is_not_a_reference() {
        assert_eq!(
            resolve("99999999999999999999", N, SPAN),
            Resolution::NotAReference
        );
    }

    #[test]
    fn test_corpus_size_is_injected_not_hardcoded() {
        assert!(matches!(
            resolve("50", 40, SPAN),
            Resolution::Invalid(InvalidReference::OutOfRange { .. })
        ));
        assert!(matches!(resolve("50", 60, SPAN), Resolution::Reference(_)));
    }
}
