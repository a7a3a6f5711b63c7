//! Render errors as markdown diagnostics for the CLI.

use crate::error::Error;

const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

/// Render an error as valid markdown with bold headings and print to
/// stderr.
pub fn print_error(e: &Error) {
    let md = render_error(e);
    for line in md.lines() {
        if line.starts_with('#') {
            eprintln!("{BOLD}{line}{RESET}");
        } else {
            eprintln!("{line}");
        }
    }
}

/// Render an error as a structured markdown diagnostic.
///
/// Each block carries the stable error code, what happened, and — where
/// there is an obvious user action — how to fix it. Designed to be
/// readable by both humans and LLM agents.
pub fn render_error(e: &Error) -> String {
    return match e {
        Error::NoHashSeparator => render_no_hash_separator(),
        Error::UrlNotSupported { scheme } => render_url_not_supported(scheme),
        Error::InvalidRangeFormat { anchor } => render_invalid_range_format(anchor),
        Error::LinkTooLong { length, max } => render_link_too_long(*length, *max),
        Error::DelimiterDigits { .. }
        | Error::DelimiterEmpty { .. }
        | Error::DelimiterNotUnique { .. }
        | Error::DelimiterReserved { .. }
        | Error::DelimiterSubstringConflict { .. }
        | Error::DelimiterWhitespace { .. }
        | Error::HashNotSingleChar { .. } => render_delimiter_error(e),
        _ => render_generic(e),
    };
}

fn render_generic(e: &Error) -> String {
    return format!(
        "\
# Error: {}

{e}
",
        e.code()
    );
}

fn render_no_hash_separator() -> String {
    return "\
# Error: NO_HASH_SEPARATOR

The link has no hash separator.

## Fix

A range link needs an anchor after the path:

    src/main.rs#L10
    src/main.rs#L10C5-L20C10
"
    .to_string();
}

fn render_url_not_supported(scheme: &str) -> String {
    return format!(
        "\
# Error: URL_NOT_SUPPORTED

`{scheme}://` URLs are not range links. Only `file://` is accepted.
"
    );
}

fn render_invalid_range_format(anchor: &str) -> String {
    return format!(
        "\
# Error: INVALID_RANGE_FORMAT

The text after the hash separator is not a valid range: `{anchor}`

## Expected

    L<line>
    L<line>C<char>
    L<line>-L<line>
    L<line>C<char>-L<line>C<char>

(with your configured delimiter tokens in place of `L`, `C`, `-`.)
"
    );
}

fn render_link_too_long(length: usize, max: usize) -> String {
    return format!(
        "\
# Error: LINK_TOO_LONG

The input is {length} characters; links longer than {max} are rejected
before parsing.
"
    );
}

fn render_delimiter_error(e: &Error) -> String {
    return format!(
        "\
# Error: {}

{e}

## Fix

Edit the `[delimiters]` table in `.rangelink.toml`. Tokens must be
non-empty, contain no digits, whitespace, or reserved characters
(`~ | / \\ : , @`), must not contain each other, and the hash token
must be a single character.
",
        e.code()
    );
}
