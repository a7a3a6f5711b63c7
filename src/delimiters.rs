//! Delimiter configuration: the four tokens that shape the link grammar,
//! plus the validators that keep them unambiguous.

use serde::Serialize;

use crate::error::Error;

/// Characters that may never appear in a delimiter token. They are
/// reserved for the portable-metadata trailer and path disambiguation.
pub const RESERVED_DELIMITER_CHARS: [char; 7] = ['~', '|', '/', '\\', ':', ',', '@'];

/// The separator used by the portable-metadata trailer. Fixed; not
/// configurable, which is why it is reserved above.
pub const PORTABLE_SEPARATOR: char = '~';

/// The four delimiter tokens of the link grammar. Immutable once
/// constructed; [`DelimiterConfig::new`] runs every validator, so any
/// instance in hand is known-consistent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DelimiterConfig {
    hash: String,
    line: String,
    position: String,
    range: String,
}

impl Default for DelimiterConfig {
    /// The conventional `path#L10C5-L20C10` delimiters.
    fn default() -> Self {
        return Self {
            hash: "#".to_string(),
            line: "L".to_string(),
            position: "C".to_string(),
            range: "-".to_string(),
        };
    }
}

impl DelimiterConfig {
    /// Build a validated configuration from the four tokens.
    ///
    /// # Errors
    ///
    /// Returns the first violated rule, checked in order: per-token
    /// emptiness, digits, whitespace, reserved characters; then the hash
    /// single-character rule; then pairwise uniqueness and substring
    /// conflicts (both case-insensitive).
    pub fn new(line: &str, position: &str, hash: &str, range: &str) -> Result<Self, Error> {
        let fields: [(&'static str, &str); 4] = [
            ("line", line),
            ("position", position),
            ("hash", hash),
            ("range", range),
        ];

        for (field, token) in fields {
            validate_token(field, token)?;
        }

        if hash.chars().count() != 1 {
            return Err(Error::HashNotSingleChar {
                token: hash.to_string(),
            });
        }

        validate_pairwise(&fields)?;

        return Ok(Self {
            line: line.to_string(),
            position: position.to_string(),
            hash: hash.to_string(),
            range: range.to_string(),
        });
    }

    /// The line token (default `L`).
    pub fn line(&self) -> &str {
        return &self.line;
    }

    /// The position token (default `C`).
    pub fn position(&self) -> &str {
        return &self.position;
    }

    /// The hash token (default `#`). Always one character for the
    /// default configuration; custom configurations are held to the same
    /// rule by `new`.
    pub fn hash(&self) -> &str {
        return &self.hash;
    }

    /// The range token (default `-`).
    pub fn range(&self) -> &str {
        return &self.range;
    }
}

/// Quick plausibility check for a token recovered from a portable
/// trailer: non-empty and free of digits, whitespace, and reserved
/// characters. Full validation happens when the token set is assembled
/// into a [`DelimiterConfig`].
pub(crate) fn token_is_plausible(token: &str) -> bool {
    return !token.is_empty()
        && token.chars().all(|c| {
            return !c.is_ascii_digit()
                && !c.is_whitespace()
                && !RESERVED_DELIMITER_CHARS.contains(&c);
        });
}

/// Check a single token for emptiness, digits, whitespace, and reserved
/// characters, in that order.
fn validate_token(field: &'static str, token: &str) -> Result<(), Error> {
    if token.is_empty() {
        return Err(Error::DelimiterEmpty { field });
    }

    if token.chars().any(|c| c.is_ascii_digit()) {
        return Err(Error::DelimiterDigits {
            field,
            token: token.to_string(),
        });
    }

    if token.chars().any(char::is_whitespace) {
        return Err(Error::DelimiterWhitespace {
            field,
            token: token.to_string(),
        });
    }

    if let Some(reserved) = token.chars().find(|c| RESERVED_DELIMITER_CHARS.contains(c)) {
        return Err(Error::DelimiterReserved {
            field,
            token: token.to_string(),
            reserved,
        });
    }

    return Ok(());
}

/// Check every token pair for case-insensitive equality, then for
/// case-insensitive substring containment.
fn validate_pairwise(fields: &[(&'static str, &str); 4]) -> Result<(), Error> {
    for (i, (first_field, first_token)) in fields.iter().enumerate() {
        for (second_field, second_token) in fields.iter().skip(i.saturating_add(1)) {
            let a = first_token.to_lowercase();
            let b = second_token.to_lowercase();

            if a == b {
                return Err(Error::DelimiterNotUnique {
                    first: first_field,
                    second: second_field,
                });
            }

            if a.contains(&b) {
                return Err(Error::DelimiterSubstringConflict {
                    container: first_field,
                    contained: second_field,
                });
            }
            if b.contains(&a) {
                return Err(Error::DelimiterSubstringConflict {
                    container: second_field,
                    contained: first_field,
                });
            }
        }
    }

    return Ok(());
}
