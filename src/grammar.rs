//! The link grammar parser: turns a raw string plus a delimiter
//! configuration into a [`ParsedLink`] or a typed error.
//!
//! Grammar, anchored start to end:
//!
//! ```text
//! link := path HASH{1,2} LINE digits (POS digits)? (RANGE LINE digits (POS digits)?)?
//! ```

use regex::Regex;

use crate::delimiters::DelimiterConfig;
use crate::error::{Error, PositionField};
use crate::formatter;
use crate::types::{LinkKind, LinkPosition, ParsedLink, SelectionKind};

/// Maximum accepted raw link length in characters. Anything longer is
/// rejected before any parsing work.
pub const MAX_LINK_LENGTH: usize = 3000;

/// Parse a raw link under the given delimiters.
///
/// Convenience wrapper that compiles the grammar per call; callers
/// parsing in a loop should hold a [`LinkGrammar`] instead.
///
/// # Errors
///
/// Returns any of the parse-category errors: `LINK_TOO_LONG`,
/// `EMPTY_LINK`, `URL_NOT_SUPPORTED`, `NO_HASH_SEPARATOR`, `EMPTY_PATH`,
/// `INVALID_RANGE_FORMAT`, `LINE_BELOW_MINIMUM`, `LINE_BACKWARD`,
/// `CHAR_BELOW_MINIMUM`, `CHAR_BACKWARD_SAME_LINE`.
pub fn parse(raw: &str, delimiters: &DelimiterConfig) -> Result<ParsedLink, Error> {
    return LinkGrammar::new(delimiters).parse(raw);
}

/// Parse a raw link, honoring an embedded portable-delimiter trailer.
///
/// If the raw string ends with a well-formed BYOD trailer, the body is
/// parsed under the embedded delimiters (falling back to `fallback` for
/// the position token when the trailer has only three fields) and the
/// result is tagged [`LinkKind::Portable`]. Otherwise the whole string
/// is parsed under `fallback`.
///
/// # Errors
///
/// Returns parse-category errors, or delimiter-configuration errors when
/// the trailer's embedded tokens are invalid.
pub fn parse_portable(raw: &str, fallback: &DelimiterConfig) -> Result<ParsedLink, Error> {
    let Some((body, tokens)) = formatter::split_portable_metadata(raw) else {
        return parse(raw, fallback);
    };

    let position = tokens.position.as_deref().unwrap_or(fallback.position());
    let embedded = DelimiterConfig::new(&tokens.line, position, &tokens.hash, &tokens.range)?;

    let mut parsed = LinkGrammar::new(&embedded).parse(body)?;
    parsed.link_kind = LinkKind::Portable;
    return Ok(parsed);
}

/// A compiled link grammar for one delimiter configuration. Compile
/// once, parse many — the scanner parses every candidate match through
/// a single instance.
pub struct LinkGrammar {
    /// Anchored pattern for the text after the hash separator.
    anchor: Regex,
    /// The configured hash token.
    hash: String,
}

impl LinkGrammar {
    /// Compile the grammar for a delimiter configuration.
    ///
    /// # Panics
    ///
    /// Panics if the anchor pattern fails to compile, which cannot
    /// happen for a validated `DelimiterConfig` (all tokens are escaped).
    pub fn new(delimiters: &DelimiterConfig) -> Self {
        let anchor = Regex::new(&anchor_pattern(delimiters)).expect("valid anchor pattern");
        return Self {
            anchor,
            hash: delimiters.hash().to_string(),
        };
    }

    /// Parse a raw link string.
    ///
    /// # Errors
    ///
    /// See [`parse`].
    pub fn parse(&self, raw: &str) -> Result<ParsedLink, Error> {
        let length = raw.chars().count();
        if length > MAX_LINK_LENGTH {
            return Err(Error::LinkTooLong {
                length,
                max: MAX_LINK_LENGTH,
            });
        }

        if raw.trim().is_empty() {
            return Err(Error::EmptyLink);
        }

        reject_url_schemes(raw)?;

        let (path, anchor, selection_kind) =
            split_path_and_anchor(raw, &self.hash).ok_or(Error::NoHashSeparator)?;

        if path.is_empty() {
            return Err(Error::EmptyPath);
        }

        let caps = self.anchor.captures(anchor).ok_or_else(|| {
            return Error::InvalidRangeFormat {
                anchor: anchor.to_string(),
            };
        })?;

        let start_line = capture_number(&caps, 1, anchor)?.ok_or_else(|| {
            return Error::InvalidRangeFormat {
                anchor: anchor.to_string(),
            };
        })?;
        let start_char = capture_number(&caps, 2, anchor)?;
        let end_segment_line = capture_number(&caps, 3, anchor)?;
        let end_segment_char = capture_number(&caps, 4, anchor)?;

        let (start, end) = resolve_positions(start_line, start_char, end_segment_line, end_segment_char)?;

        return Ok(ParsedLink {
            path: path.to_string(),
            start,
            end,
            link_kind: LinkKind::Regular,
            selection_kind,
        });
    }
}

/// Apply the numeric rules to the four captured fields.
///
/// No end segment: the end copies the start line, and the end character
/// copies the start character (same-line shorthand). An end line without
/// an end character is a whole-line end — the character is absent, not
/// copied.
///
/// # Errors
///
/// Returns `LINE_BELOW_MINIMUM`, `CHAR_BELOW_MINIMUM` (with a start/end
/// discriminant), `LINE_BACKWARD`, or `CHAR_BACKWARD_SAME_LINE`.
fn resolve_positions(
    start_line: u32,
    start_char: Option<u32>,
    end_segment_line: Option<u32>,
    end_segment_char: Option<u32>,
) -> Result<(LinkPosition, LinkPosition), Error> {
    if start_line < 1 {
        return Err(Error::LineBelowMinimum { line: start_line });
    }
    if let Some(value) = start_char
        && value < 1
    {
        return Err(Error::CharBelowMinimum {
            position: PositionField::Start,
            value,
        });
    }

    let (end_line, end_char) = match end_segment_line {
        None => (start_line, start_char),
        Some(line) => (line, end_segment_char),
    };

    if end_line < 1 {
        return Err(Error::LineBelowMinimum { line: end_line });
    }
    if let Some(value) = end_char
        && value < 1
    {
        return Err(Error::CharBelowMinimum {
            position: PositionField::End,
            value,
        });
    }

    if end_line < start_line {
        return Err(Error::LineBackward {
            start: start_line,
            end: end_line,
        });
    }

    // Backward characters are only an error on one line; across lines
    // end-before-start characters are legal reading order.
    if end_line == start_line
        && let (Some(s), Some(e)) = (start_char, end_char)
        && e < s
    {
        return Err(Error::CharBackwardSameLine {
            line: start_line,
            start: s,
            end: e,
        });
    }

    return Ok((
        LinkPosition {
            line: start_line,
            character: start_char,
        },
        LinkPosition {
            line: end_line,
            character: end_char,
        },
    ));
}

/// Reject URL-scheme strings, except `file://`, so web links are never
/// hijacked as range links.
fn reject_url_schemes(raw: &str) -> Result<(), Error> {
    let Some(idx) = raw.find("://") else {
        return Ok(());
    };
    if raw.starts_with("file://") {
        return Ok(());
    }
    return Err(Error::UrlNotSupported {
        scheme: raw.get(..idx).unwrap_or("").to_string(),
    });
}

/// Split the raw text at the hash token into path, anchor, and the
/// selection kind implied by single vs doubled hash.
///
/// The hash token is always a single character (the delimiter validator
/// enforces this), so the split happens at the last occurrence. A valid
/// anchor cannot itself contain the hash token, which means the last
/// occurrence is the only split that can parse and the hash character
/// may freely appear inside the path (`file#1.ts#L10`).
fn split_path_and_anchor<'a>(
    raw: &'a str,
    hash: &str,
) -> Option<(&'a str, &'a str, SelectionKind)> {
    let token_len = hash.len();
    let idx = raw.rfind(hash)?;
    let anchor = raw.get(idx.saturating_add(token_len)..)?;

    if let Some(prev) = idx.checked_sub(token_len)
        && raw.get(prev..idx) == Some(hash)
    {
        return Some((raw.get(..prev)?, anchor, SelectionKind::Rectangular));
    }
    return Some((raw.get(..idx)?, anchor, SelectionKind::Normal));
}

/// Extract an optional numeric capture group.
///
/// # Errors
///
/// Returns `INVALID_RANGE_FORMAT` if the digits overflow a `u32`.
fn capture_number(
    caps: &regex::Captures<'_>,
    group: usize,
    anchor: &str,
) -> Result<Option<u32>, Error> {
    let Some(m) = caps.get(group) else {
        return Ok(None);
    };
    let value = m.as_str().parse::<u32>().map_err(|_| {
        return Error::InvalidRangeFormat {
            anchor: anchor.to_string(),
        };
    })?;
    return Ok(Some(value));
}

/// The anchored pattern for everything after the hash separator:
/// `^LINE(\d+)(?:POS(\d+))?(?:RANGE LINE(\d+)(?:POS(\d+))?)?$`.
fn anchor_pattern(delimiters: &DelimiterConfig) -> String {
    let line = regex::escape(delimiters.line());
    let position = regex::escape(delimiters.position());
    let range = regex::escape(delimiters.range());
    return format!(r"^{line}(\d+)(?:{position}(\d+))?(?:{range}{line}(\d+)(?:{position}(\d+))?)?$");
}

/// The unanchored pattern the scanner runs over free text: a
/// whitespace/quote-free path followed by the anchor grammar. The path
/// class admits the hash character, so hash-in-filename links are found
/// in the unquoted pass too.
pub(crate) fn scan_pattern(delimiters: &DelimiterConfig) -> String {
    let hash = regex::escape(delimiters.hash());
    let line = regex::escape(delimiters.line());
    let position = regex::escape(delimiters.position());
    let range = regex::escape(delimiters.range());
    return format!(
        r#"[^\s'"]+(?:{hash}){{1,2}}{line}\d+(?:{position}\d+)?(?:{range}{line}\d+(?:{position}\d+)?)?"#
    );
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc)]
mod tests {
    use super::*;
    use crate::formatter::compose_portable_metadata;

    fn defaults() -> DelimiterConfig {
        return DelimiterConfig::default();
    }

    #[test]
    fn single_line_reference() {
        let parsed = parse("src/auth.ts#L10", &defaults()).unwrap();
        assert_eq!(parsed.path, "src/auth.ts");
        assert_eq!(parsed.start, LinkPosition::whole_line(10));
        assert_eq!(parsed.end, LinkPosition::whole_line(10));
        assert_eq!(parsed.selection_kind, SelectionKind::Normal);
        assert_eq!(parsed.link_kind, LinkKind::Regular);
    }

    #[test]
    fn hash_in_filename_resolves_to_last_anchor() {
        let parsed = parse("file#1.ts#L10", &defaults()).unwrap();
        assert_eq!(parsed.path, "file#1.ts");
        assert_eq!(parsed.start, LinkPosition::whole_line(10));
    }

    #[test]
    fn double_hash_is_rectangular() {
        let parsed = parse("file.ts##L10C5-L20C10", &defaults()).unwrap();
        assert_eq!(parsed.selection_kind, SelectionKind::Rectangular);
        assert_eq!(parsed.path, "file.ts");
        assert_eq!(parsed.start, LinkPosition::at(10, 5));
        assert_eq!(parsed.end, LinkPosition::at(20, 10));
    }

    #[test]
    fn full_range_with_positions() {
        let parsed = parse("src/auth.ts#L42C10-L58C25", &defaults()).unwrap();
        assert_eq!(parsed.start, LinkPosition::at(42, 10));
        assert_eq!(parsed.end, LinkPosition::at(58, 25));
    }

    #[test]
    fn same_line_shorthand_copies_start_character() {
        let parsed = parse("a.rs#L7C3", &defaults()).unwrap();
        assert_eq!(parsed.start, LinkPosition::at(7, 3));
        assert_eq!(parsed.end, LinkPosition::at(7, 3));
    }

    #[test]
    fn end_line_without_character_is_whole_line() {
        let parsed = parse("a.rs#L7C3-L9", &defaults()).unwrap();
        assert_eq!(parsed.start, LinkPosition::at(7, 3));
        assert_eq!(parsed.end, LinkPosition::whole_line(9));
    }

    #[test]
    fn empty_input_rejected() {
        assert_eq!(parse("", &defaults()).unwrap_err().code(), "EMPTY_LINK");
        assert_eq!(parse("   ", &defaults()).unwrap_err().code(), "EMPTY_LINK");
    }

    #[test]
    fn over_length_input_rejected_before_parsing() {
        let raw = format!("{}#L1", "x".repeat(MAX_LINK_LENGTH));
        assert_eq!(parse(&raw, &defaults()).unwrap_err().code(), "LINK_TOO_LONG");
    }

    #[test]
    fn web_urls_rejected_file_urls_allowed() {
        let err = parse("https://example.com#L10", &defaults()).unwrap_err();
        assert_eq!(err.code(), "URL_NOT_SUPPORTED");
        assert!(parse("file:///tmp/a.rs#L10", &defaults()).is_ok());
    }

    #[test]
    fn missing_hash_rejected() {
        let err = parse("src/auth.ts", &defaults()).unwrap_err();
        assert_eq!(err.code(), "NO_HASH_SEPARATOR");
    }

    #[test]
    fn empty_path_rejected_for_single_and_double_hash() {
        assert_eq!(parse("#L10", &defaults()).unwrap_err().code(), "EMPTY_PATH");
        assert_eq!(parse("##L10", &defaults()).unwrap_err().code(), "EMPTY_PATH");
        // Empty path wins over an unparseable anchor.
        assert_eq!(parse("#zzz", &defaults()).unwrap_err().code(), "EMPTY_PATH");
    }

    #[test]
    fn malformed_anchor_rejected() {
        let err = parse("a.rs#L10x", &defaults()).unwrap_err();
        assert_eq!(err.code(), "INVALID_RANGE_FORMAT");
        let err = parse("a.rs#C5", &defaults()).unwrap_err();
        assert_eq!(err.code(), "INVALID_RANGE_FORMAT");
    }

    #[test]
    fn line_zero_rejected_line_one_accepted() {
        let err = parse("a.rs#L0", &defaults()).unwrap_err();
        assert_eq!(err.code(), "LINE_BELOW_MINIMUM");
        assert!(parse("a.rs#L1", &defaults()).is_ok());
    }

    #[test]
    fn character_zero_rejected_with_position_detail() {
        let err = parse("a.rs#L5C0", &defaults()).unwrap_err();
        assert!(matches!(
            err,
            Error::CharBelowMinimum {
                position: PositionField::Start,
                value: 0,
            }
        ));
        let err = parse("a.rs#L5C2-L5C0", &defaults()).unwrap_err();
        assert!(matches!(
            err,
            Error::CharBelowMinimum {
                position: PositionField::End,
                value: 0,
            }
        ));
    }

    #[test]
    fn backward_lines_rejected() {
        let err = parse("a.rs#L9-L5", &defaults()).unwrap_err();
        assert_eq!(err.code(), "LINE_BACKWARD");
    }

    #[test]
    fn backward_characters_only_rejected_on_same_line() {
        let err = parse("a.rs#L5C9-L5C3", &defaults()).unwrap_err();
        assert_eq!(err.code(), "CHAR_BACKWARD_SAME_LINE");
        // Across lines this is legal reading order.
        assert!(parse("a.rs#L5C9-L8C3", &defaults()).is_ok());
    }

    #[test]
    fn custom_delimiters_parse() {
        let custom = DelimiterConfig::new("line", "col", "%", "to").unwrap();
        let parsed = parse("a.rs%line10col2toline12col4", &custom).unwrap();
        assert_eq!(parsed.start, LinkPosition::at(10, 2));
        assert_eq!(parsed.end, LinkPosition::at(12, 4));
    }

    #[test]
    fn portable_trailer_parses_under_foreign_config() {
        let trailer = compose_portable_metadata(&defaults(), true);
        let raw = format!("src/a.rs#L4C2-L6C3{trailer}");
        // The recipient's own delimiters differ entirely.
        let foreign = DelimiterConfig::new("ln", "cl", "%", "to").unwrap();
        let parsed = parse_portable(&raw, &foreign).unwrap();
        assert_eq!(parsed.link_kind, LinkKind::Portable);
        assert_eq!(parsed.path, "src/a.rs");
        assert_eq!(parsed.start, LinkPosition::at(4, 2));
        assert_eq!(parsed.end, LinkPosition::at(6, 3));
    }

    #[test]
    fn plain_link_passes_through_parse_portable() {
        let parsed = parse_portable("src/a.rs#L4", &defaults()).unwrap();
        assert_eq!(parsed.link_kind, LinkKind::Regular);
    }
}
