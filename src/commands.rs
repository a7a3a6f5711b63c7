//! Core CLI commands for rangelink: parse, scan, format.

use std::io::Read as _;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::config;
use crate::error::Error;
use crate::formatter;
use crate::grammar;
use crate::logging::{LinkLogger, LogContext, LogLevel, NoopLogger, StderrLogger};
use crate::resolver;
use crate::scanner::{self, NeverCancelled};
use crate::types::{
    Coverage, CursorPosition, InputSelection, LinkKind, RangeNotation, Selection,
};

/// A 1-indexed `LINE[:CHAR]` position argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CliPosition {
    /// 1-indexed line number.
    pub line: u32,
    /// 1-indexed character, if given.
    pub character: Option<u32>,
}

/// Parse a `LINE[:CHAR]` argument. Used as a clap value parser, so the
/// error is a plain message.
///
/// # Errors
///
/// Returns a usage message for non-numeric or zero values.
pub fn parse_cli_position(raw: &str) -> Result<CliPosition, String> {
    let (line_part, char_part) = match raw.split_once(':') {
        Some((l, c)) => (l, Some(c)),
        None => (raw, None),
    };

    let line: u32 = line_part
        .parse()
        .map_err(|_| return format!("invalid line number `{line_part}`"))?;
    if line < 1 {
        return Err("line numbers start at 1".to_string());
    }

    let character = match char_part {
        None => None,
        Some(c) => {
            let value: u32 = c
                .parse()
                .map_err(|_| return format!("invalid character `{c}`"))?;
            if value < 1 {
                return Err("characters start at 1".to_string());
            }
            Some(value)
        },
    };

    return Ok(CliPosition { line, character });
}

/// Parse one link and print it as JSON. Portable trailers are honored.
///
/// # Errors
///
/// Returns config-loading or parse errors.
pub fn parse(raw: &str) -> Result<ExitCode, Error> {
    let delimiters = config::load(Path::new("."))?;
    let parsed = grammar::parse_portable(raw, &delimiters)?;
    println!("{}", serde_json::to_string_pretty(&parsed)?);
    return Ok(ExitCode::SUCCESS);
}

/// Scan a file (or stdin when no path is given) and print every
/// detected link as JSON.
///
/// # Errors
///
/// Returns config-loading or I/O errors. Malformed links in the text
/// are not errors; they are simply not links.
pub fn scan(file: Option<&PathBuf>, verbose: bool) -> Result<ExitCode, Error> {
    let delimiters = config::load(Path::new("."))?;
    let text = read_scan_input(file)?;

    let links = if verbose {
        let logger = StderrLogger::with_min_level(LogLevel::Debug);
        scanner::scan(&text, &delimiters, &logger, &NeverCancelled)
    } else {
        scanner::scan_text(&text, &delimiters)
    };

    println!("{}", serde_json::to_string_pretty(&links)?);
    return Ok(ExitCode::SUCCESS);
}

/// Build a link for a path and a 1-indexed position pair and print it.
///
/// Characters are optional; a request without characters is a full-line
/// reference. The end position defaults to the start line.
///
/// # Errors
///
/// Returns config-loading, validation, or resolution errors.
pub fn format(
    path: &str,
    start: CliPosition,
    end: Option<CliPosition>,
    notation: RangeNotation,
    portable: bool,
    verbose: bool,
) -> Result<ExitCode, Error> {
    let delimiters = config::load(Path::new("."))?;
    let input = selection_from_cli_positions(start, end);

    let computed = resolver::compute_range(&input, notation)?;
    let link_kind = if portable {
        LinkKind::Portable
    } else {
        LinkKind::Regular
    };

    let generated = if verbose {
        let logger = StderrLogger::with_min_level(LogLevel::Debug);
        finalize(path, &computed, link_kind, &delimiters, &logger)
    } else {
        finalize(path, &computed, link_kind, &delimiters, &NoopLogger)
    };

    println!("{}", generated.link);
    return Ok(ExitCode::SUCCESS);
}

/// Shared finalization for the format command.
fn finalize(
    path: &str,
    computed: &crate::types::ComputedSelection,
    link_kind: LinkKind,
    delimiters: &crate::delimiters::DelimiterConfig,
    logger: &dyn LinkLogger,
) -> formatter::GeneratedLink {
    let mut context = LogContext::new();
    context.insert("command".to_string(), "format".to_string());
    return formatter::finalize_link_generation(
        path,
        computed,
        crate::types::SelectionKind::Normal,
        link_kind,
        delimiters,
        &context,
        logger,
    );
}

/// Translate 1-indexed CLI positions into a 0-indexed normal selection.
///
/// Coverage is full-line exactly when no character was given anywhere.
/// An omitted end defaults to the start line with no character, so any
/// same-line request without an explicit end character synthesizes a
/// one-character span and the selection is never zero-width.
fn selection_from_cli_positions(start: CliPosition, end: Option<CliPosition>) -> InputSelection {
    let end = end.unwrap_or(CliPosition {
        line: start.line,
        character: None,
    });
    let full_line = start.character.is_none() && end.character.is_none();

    let start_char = start.character.unwrap_or(1);
    let end_char = match end.character {
        Some(c) => c,
        // Same-line default: one character past the start.
        None if end.line == start.line => start_char.saturating_add(1),
        None => 1,
    };

    let to_zero = |v: u32| return i32::try_from(v.saturating_sub(1)).unwrap_or(i32::MAX);
    let coverage = if full_line {
        Coverage::FullLine
    } else {
        Coverage::PartialLine
    };

    return InputSelection::normal(Selection::new(
        CursorPosition::new(to_zero(start.line), to_zero(start_char)),
        CursorPosition::new(to_zero(end.line), to_zero(end_char)),
        coverage,
    ));
}

/// Read the scan input from a file or stdin.
fn read_scan_input(file: Option<&PathBuf>) -> Result<String, Error> {
    let Some(path) = file else {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text)?;
        return Ok(text);
    };
    return Ok(std::fs::read_to_string(path)?);
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc)]
mod tests {
    use super::*;
    use crate::types::SelectionKind;

    #[test]
    fn cli_position_with_and_without_character() {
        assert_eq!(
            parse_cli_position("10").unwrap(),
            CliPosition {
                line: 10,
                character: None,
            }
        );
        assert_eq!(
            parse_cli_position("10:5").unwrap(),
            CliPosition {
                line: 10,
                character: Some(5),
            }
        );
    }

    #[test]
    fn cli_position_rejects_zero_and_garbage() {
        assert!(parse_cli_position("0").is_err());
        assert!(parse_cli_position("10:0").is_err());
        assert!(parse_cli_position("x").is_err());
        assert!(parse_cli_position("10:y").is_err());
    }

    #[test]
    fn line_only_positions_become_full_line_selection() {
        let input = selection_from_cli_positions(
            CliPosition {
                line: 10,
                character: None,
            },
            None,
        );
        assert_eq!(input.kind, SelectionKind::Normal);
        let sel = input.selections.first().unwrap();
        assert_eq!(sel.coverage, Coverage::FullLine);
        assert_eq!(sel.start.line, 9);
        assert!(sel.start != sel.end, "selection must not be zero-width");
    }

    #[test]
    fn character_start_without_end_spans_one_character() {
        let input = selection_from_cli_positions(
            CliPosition {
                line: 10,
                character: Some(5),
            },
            None,
        );
        let sel = input.selections.first().unwrap();
        assert_eq!(sel.coverage, Coverage::PartialLine);
        assert_eq!(sel.start, CursorPosition::new(9, 4));
        assert_eq!(sel.end, CursorPosition::new(9, 5));
        crate::selection::validate(&input).unwrap();
    }

    #[test]
    fn character_positions_become_partial_selection() {
        let input = selection_from_cli_positions(
            CliPosition {
                line: 10,
                character: Some(5),
            },
            Some(CliPosition {
                line: 20,
                character: Some(10),
            }),
        );
        let sel = input.selections.first().unwrap();
        assert_eq!(sel.coverage, Coverage::PartialLine);
        assert_eq!(sel.start, CursorPosition::new(9, 4));
        assert_eq!(sel.end, CursorPosition::new(19, 9));
    }
}
