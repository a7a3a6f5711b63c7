//! Crate-level error types for rangelink.
//!
//! Every domain-rule violation is a typed variant carrying structured
//! detail fields, and every variant maps to a stable machine-readable
//! code string via [`Error::code`]. Message text is informational only;
//! callers branching on failures must use the code or the variant.

/// Which end of a range a positional error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionField {
    /// The start position of the range.
    Start,
    /// The end position of the range.
    End,
}

impl std::fmt::Display for PositionField {
    /// Render as `start` or `end` for error messages.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        return match self {
            PositionField::Start => write!(f, "start"),
            PositionField::End => write!(f, "end"),
        };
    }
}

/// All errors in rangelink carry enough context to produce a useful
/// diagnostic without a debugger. Variants are grouped by the stage that
/// raises them: link parsing, selection validation, delimiter
/// configuration, and ambient I/O for the CLI.
#[allow(clippy::error_impl_error, reason = "crate-internal error type")]
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Same-line selection with the end character before the start.
    #[error("selection on line {line} has end character {end} before start character {start}")]
    BackwardCharacter {
        /// 0-indexed end character.
        end: i32,
        /// 0-indexed line shared by both ends.
        line: i32,
        /// 0-indexed start character.
        start: i32,
    },

    /// Selection with the end line before the start line.
    #[error("selection end line {end} is before start line {start}")]
    BackwardLine {
        /// 0-indexed end line.
        end: i32,
        /// 0-indexed start line.
        start: i32,
    },

    /// Same-line link range with the end character before the start.
    #[error("end character {end} is before start character {start} on line {line}")]
    CharBackwardSameLine {
        /// 1-indexed end character.
        end: u32,
        /// 1-indexed line shared by both ends.
        line: u32,
        /// 1-indexed start character.
        start: u32,
    },

    /// A character value in a link is below 1.
    #[error("{position} character {value} is below the minimum of 1")]
    CharBelowMinimum {
        /// Which end of the range carried the bad value.
        position: PositionField,
        /// The offending character value.
        value: u32,
    },

    /// A delimiter token contains a digit.
    #[error("delimiter `{field}` token `{token}` contains a digit")]
    DelimiterDigits {
        /// Configuration field name (`line`, `position`, `hash`, `range`).
        field: &'static str,
        /// The offending token.
        token: String,
    },

    /// A delimiter token is empty.
    #[error("delimiter `{field}` token is empty")]
    DelimiterEmpty {
        /// Configuration field name.
        field: &'static str,
    },

    /// Two delimiter tokens are equal (case-insensitively).
    #[error("delimiters `{first}` and `{second}` use the same token")]
    DelimiterNotUnique {
        /// First conflicting field name.
        first: &'static str,
        /// Second conflicting field name.
        second: &'static str,
    },

    /// A delimiter token contains a reserved character.
    #[error("delimiter `{field}` token `{token}` contains reserved character `{reserved}`")]
    DelimiterReserved {
        /// Configuration field name.
        field: &'static str,
        /// The reserved character found in the token.
        reserved: char,
        /// The offending token.
        token: String,
    },

    /// One delimiter token is a case-insensitive substring of another.
    #[error("delimiter `{contained}` token is a substring of `{container}`")]
    DelimiterSubstringConflict {
        /// Field whose token contains the other.
        contained: &'static str,
        /// Field whose token is contained.
        container: &'static str,
    },

    /// A delimiter token contains whitespace.
    #[error("delimiter `{field}` token `{token}` contains whitespace")]
    DelimiterWhitespace {
        /// Configuration field name.
        field: &'static str,
        /// The offending token.
        token: String,
    },

    /// The raw link is empty or whitespace-only.
    #[error("link is empty")]
    EmptyLink,

    /// The raw link starts with the hash token and has no path.
    #[error("link has no path before the hash separator")]
    EmptyPath,

    /// The configured hash token is not exactly one character.
    #[error("hash delimiter `{token}` must be exactly one character")]
    HashNotSingleChar {
        /// The offending token.
        token: String,
    },

    /// A hash separator is present but the range anchor does not match
    /// the grammar.
    #[error("invalid range format after hash separator: `{anchor}`")]
    InvalidRangeFormat {
        /// The anchor text that failed to match.
        anchor: String,
    },

    /// Underlying I/O error from the filesystem (CLI only).
    #[error("io: {0}")]
    Io(
        /// The wrapped I/O error.
        #[from]
        std::io::Error,
    ),

    /// JSON serialization failed (CLI output only).
    #[error("json serialize: {0}")]
    Json(
        /// The wrapped JSON error.
        #[from]
        serde_json::Error,
    ),

    /// A link range with the end line before the start line.
    #[error("end line {end} is before start line {start}")]
    LineBackward {
        /// 1-indexed end line.
        end: u32,
        /// 1-indexed start line.
        start: u32,
    },

    /// A line value in a link is below 1.
    #[error("line {line} is below the minimum of 1")]
    LineBelowMinimum {
        /// The offending line value.
        line: u32,
    },

    /// The raw link exceeds the maximum accepted length.
    #[error("link is {length} characters (max {max})")]
    LinkTooLong {
        /// Actual length in characters.
        length: usize,
        /// Maximum accepted length.
        max: usize,
    },

    /// A selection carries a negative line or character coordinate.
    #[error("selection {index} has negative coordinates ({line}, {character})")]
    NegativeCoordinates {
        /// 0-indexed character offset.
        character: i32,
        /// Position of the selection in the input list.
        index: usize,
        /// 0-indexed line number.
        line: i32,
    },

    /// The raw link contains no hash separator at all.
    #[error("link has no hash separator")]
    NoHashSeparator,

    /// Normal mode received more than one selection.
    #[error("normal selection mode requires exactly one selection, got {count}")]
    NormalMultiple {
        /// Number of selections supplied.
        count: usize,
    },

    /// A rectangular selection's column span differs from the first.
    #[error(
        "rectangular selection {index} spans characters {start}..{end}, expected {expected_start}..{expected_end}"
    )]
    RectangularMismatchedColumns {
        /// 0-indexed end character of the offending selection.
        end: i32,
        /// 0-indexed end character of the first selection.
        expected_end: i32,
        /// 0-indexed start character of the first selection.
        expected_start: i32,
        /// Position of the offending selection in the input list.
        index: usize,
        /// 0-indexed start character of the offending selection.
        start: i32,
    },

    /// A rectangular selection spans more than one line.
    #[error("rectangular selection {index} spans lines {start_line}..{end_line}")]
    RectangularMultiline {
        /// 0-indexed end line of the offending selection.
        end_line: i32,
        /// Position of the offending selection in the input list.
        index: usize,
        /// 0-indexed start line of the offending selection.
        start_line: i32,
    },

    /// Consecutive rectangular selections skip one or more lines.
    #[error("rectangular selection {index} leaves a gap of {gap} line(s)")]
    RectangularNonContiguous {
        /// Number of skipped lines between this selection and the previous.
        gap: i64,
        /// Position of the offending selection in the input list.
        index: usize,
    },

    /// A rectangular selection's line does not ascend past its predecessor.
    #[error("rectangular selection {index} on line {line} does not ascend past line {previous_line}")]
    RectangularUnsorted {
        /// Position of the offending selection in the input list.
        index: usize,
        /// 0-indexed line of the offending selection.
        line: i32,
        /// 0-indexed line of the immediately preceding selection.
        previous_line: i32,
    },

    /// The selections list is empty.
    #[error("no selections supplied")]
    SelectionEmpty,

    /// TOML deserialization failed (CLI config only).
    #[error("toml deserialize: {0}")]
    TomlDe(
        /// The wrapped TOML deserialization error.
        #[from]
        toml::de::Error,
    ),

    /// The raw link is a non-`file://` URL.
    #[error("URL scheme `{scheme}://` is not supported")]
    UrlNotSupported {
        /// The rejected scheme.
        scheme: String,
    },

    /// A selection's start and end are the same position.
    #[error("selection at line {line}, character {character} is zero-width")]
    ZeroWidth {
        /// 0-indexed character offset shared by both ends.
        character: i32,
        /// 0-indexed line shared by both ends.
        line: i32,
    },
}

impl Error {
    /// Stable machine-readable code for this error. These identifiers
    /// never change; message text may.
    pub fn code(&self) -> &'static str {
        return match self {
            Error::BackwardCharacter { .. } => "BACKWARD_CHARACTER",
            Error::BackwardLine { .. } => "BACKWARD_LINE",
            Error::CharBackwardSameLine { .. } => "CHAR_BACKWARD_SAME_LINE",
            Error::CharBelowMinimum { .. } => "CHAR_BELOW_MINIMUM",
            Error::DelimiterDigits { .. } => "DELIMITER_DIGITS",
            Error::DelimiterEmpty { .. } => "DELIMITER_EMPTY",
            Error::DelimiterNotUnique { .. } => "DELIMITER_NOT_UNIQUE",
            Error::DelimiterReserved { .. } => "DELIMITER_RESERVED",
            Error::DelimiterSubstringConflict { .. } => "DELIMITER_SUBSTRING_CONFLICT",
            Error::DelimiterWhitespace { .. } => "DELIMITER_WHITESPACE",
            Error::EmptyLink => "EMPTY_LINK",
            Error::EmptyPath => "EMPTY_PATH",
            Error::HashNotSingleChar { .. } => "HASH_NOT_SINGLE_CHAR",
            Error::InvalidRangeFormat { .. } => "INVALID_RANGE_FORMAT",
            Error::Io(_) => "IO_ERROR",
            Error::Json(_) => "JSON_ERROR",
            Error::LineBackward { .. } => "LINE_BACKWARD",
            Error::LineBelowMinimum { .. } => "LINE_BELOW_MINIMUM",
            Error::LinkTooLong { .. } => "LINK_TOO_LONG",
            Error::NegativeCoordinates { .. } => "NEGATIVE_COORDINATES",
            Error::NoHashSeparator => "NO_HASH_SEPARATOR",
            Error::NormalMultiple { .. } => "NORMAL_MULTIPLE",
            Error::RectangularMismatchedColumns { .. } => "RECTANGULAR_MISMATCHED_COLUMNS",
            Error::RectangularMultiline { .. } => "RECTANGULAR_MULTILINE",
            Error::RectangularNonContiguous { .. } => "RECTANGULAR_NON_CONTIGUOUS",
            Error::RectangularUnsorted { .. } => "RECTANGULAR_UNSORTED",
            Error::SelectionEmpty => "SELECTION_EMPTY",
            Error::TomlDe(_) => "CONFIG_INVALID",
            Error::UrlNotSupported { .. } => "URL_NOT_SUPPORTED",
            Error::ZeroWidth { .. } => "ZERO_WIDTH",
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_stable_identifiers() {
        assert_eq!(Error::EmptyLink.code(), "EMPTY_LINK");
        assert_eq!(
            Error::LineBelowMinimum { line: 0 }.code(),
            "LINE_BELOW_MINIMUM"
        );
        assert_eq!(
            Error::CharBelowMinimum {
                position: PositionField::End,
                value: 0,
            }
            .code(),
            "CHAR_BELOW_MINIMUM"
        );
    }

    #[test]
    fn messages_carry_detail_fields() {
        let e = Error::RectangularNonContiguous { index: 1, gap: 1 };
        assert!(e.to_string().contains("gap of 1"));
    }
}
