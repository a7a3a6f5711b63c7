//! Link formatting: pure functions that render a computed range, path,
//! and delimiter configuration into a canonical link string, plus the
//! portable (BYOD) metadata trailer.
//!
//! The formatter always chooses the shortest unambiguous rendering:
//! whole-line shorthand over a line-only range over positions.

use serde::Serialize;

use crate::delimiters::{DelimiterConfig, PORTABLE_SEPARATOR, token_is_plausible};
use crate::logging::{LinkLogger, LogContext, LogLevel};
use crate::types::{ComputedSelection, LinkKind, RangeFormat, SelectionKind};

/// Render the anchor portion (everything after the hash separator).
///
/// `WithPositions` renders both ends with positions, defaulting any
/// missing position to `1`. `LineOnly` renders both lines with no
/// position tokens.
pub fn build_anchor(computed: &ComputedSelection, delimiters: &DelimiterConfig) -> String {
    let line = delimiters.line();
    let position = delimiters.position();
    let range = delimiters.range();

    return match computed.range_format {
        RangeFormat::WithPositions => {
            let start_pos = computed.start_position.unwrap_or(1);
            let end_pos = computed.end_position.unwrap_or(1);
            format!(
                "{line}{}{position}{start_pos}{range}{line}{}{position}{end_pos}",
                computed.start_line, computed.end_line
            )
        },
        RangeFormat::LineOnly => format!(
            "{line}{}{range}{line}{}",
            computed.start_line, computed.end_line
        ),
    };
}

/// Prefix an anchor with one hash token (normal) or the hash token
/// doubled (rectangular).
pub fn join_with_hash(
    anchor: &str,
    selection_kind: SelectionKind,
    delimiters: &DelimiterConfig,
) -> String {
    let hash = delimiters.hash();
    return match selection_kind {
        SelectionKind::Normal => format!("{hash}{anchor}"),
        SelectionKind::Rectangular => format!("{hash}{hash}{anchor}"),
    };
}

/// The whole-line shorthand `path{hash}{line}{N}`.
pub fn format_simple_line_reference(path: &str, line: u32, delimiters: &DelimiterConfig) -> String {
    return format!("{path}{}{}{line}", delimiters.hash(), delimiters.line());
}

/// Render a complete link, choosing the shortest unambiguous form.
///
/// A line-only normal range collapsing to a single line uses the
/// whole-line shorthand; everything else gets the full anchor.
pub fn format_link(
    path: &str,
    computed: &ComputedSelection,
    selection_kind: SelectionKind,
    delimiters: &DelimiterConfig,
) -> String {
    if computed.range_format == RangeFormat::LineOnly
        && computed.start_line == computed.end_line
        && selection_kind == SelectionKind::Normal
    {
        return format_simple_line_reference(path, computed.start_line, delimiters);
    }

    let anchor = build_anchor(computed, delimiters);
    return format!(
        "{path}{}",
        join_with_hash(&anchor, selection_kind, delimiters)
    );
}

/// The delimiter tokens recovered from a portable trailer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortableTokens {
    /// Hash token.
    pub hash: String,
    /// Line token.
    pub line: String,
    /// Position token, present only in four-field trailers.
    pub position: Option<String>,
    /// Range token.
    pub range: String,
}

/// Render the portable-metadata trailer echoing the delimiter set:
/// `~hash~line~range~` (three fields) or `~hash~line~range~position~`
/// (four fields, when the link format included positions).
pub fn compose_portable_metadata(delimiters: &DelimiterConfig, include_position: bool) -> String {
    let s = PORTABLE_SEPARATOR;
    let hash = delimiters.hash();
    let line = delimiters.line();
    let range = delimiters.range();

    if include_position {
        let position = delimiters.position();
        return format!("{s}{hash}{s}{line}{s}{range}{s}{position}{s}");
    }
    return format!("{s}{hash}{s}{line}{s}{range}{s}");
}

/// Split a raw string into its link body and portable trailer, if one is
/// present. Tolerates both three- and four-field trailers. The body may
/// itself contain the separator character (paths can), so fields are
/// taken from the right and sanity-checked as delimiter tokens.
pub fn split_portable_metadata(raw: &str) -> Option<(&str, PortableTokens)> {
    if !raw.ends_with(PORTABLE_SEPARATOR) {
        return None;
    }

    if let Some(found) = try_split_fields(raw, 4) {
        return Some(found);
    }
    return try_split_fields(raw, 3);
}

/// Try to peel `fields` trailer fields off the right-hand end.
fn try_split_fields(raw: &str, fields: usize) -> Option<(&str, PortableTokens)> {
    // One extra split for the empty segment after the final separator,
    // one for the remaining body.
    let mut parts: Vec<&str> = raw
        .rsplitn(fields.saturating_add(2), PORTABLE_SEPARATOR)
        .collect();
    if parts.len() != fields.saturating_add(2) {
        return None;
    }
    if parts.first() != Some(&"") {
        return None;
    }

    let body = parts.pop()?;
    // parts now holds ["", t_n, ..., t_1] right-to-left.
    let tokens: Vec<&str> = parts.iter().skip(1).rev().copied().collect();
    if tokens.iter().any(|t| return !token_is_plausible(t)) {
        return None;
    }
    if body.is_empty() {
        return None;
    }

    let (hash, line, range, position) = match tokens.as_slice() {
        [h, l, r] => (*h, *l, *r, None),
        [h, l, r, p] => (*h, *l, *r, Some((*p).to_string())),
        _ => return None,
    };

    return Some((
        body,
        PortableTokens {
            hash: hash.to_string(),
            line: line.to_string(),
            range: range.to_string(),
            position,
        },
    ));
}

/// The outward-facing result of link generation.
#[derive(Debug, Clone, Serialize)]
pub struct GeneratedLink {
    /// The computed range the link renders.
    pub computed: ComputedSelection,
    /// The delimiter configuration the link was rendered with.
    pub delimiters: DelimiterConfig,
    /// The final link string, trailer included for portable links.
    pub link: String,
    /// Regular or portable.
    pub link_kind: LinkKind,
    /// Normal or rectangular.
    pub selection_kind: SelectionKind,
}

/// Assemble the final link, appending the portable trailer when asked,
/// and emit one debug event describing it.
///
/// The caller may pass auxiliary logging context; the formatter's own
/// fields (`function`, `link`, `link_length`) are inserted afterwards,
/// so caller keys can never overwrite them.
pub fn finalize_link_generation(
    path: &str,
    computed: &ComputedSelection,
    selection_kind: SelectionKind,
    link_kind: LinkKind,
    delimiters: &DelimiterConfig,
    extra_context: &LogContext,
    logger: &dyn LinkLogger,
) -> GeneratedLink {
    let mut link = format_link(path, computed, selection_kind, delimiters);
    if link_kind == LinkKind::Portable {
        let include_position = computed.range_format == RangeFormat::WithPositions;
        link.push_str(&compose_portable_metadata(delimiters, include_position));
    }

    let mut context = extra_context.clone();
    context.insert("function".to_string(), "finalize_link_generation".to_string());
    context.insert("link".to_string(), link.clone());
    context.insert("link_length".to_string(), link.len().to_string());
    logger.log(LogLevel::Debug, &context, "generated link");

    return GeneratedLink {
        computed: *computed,
        delimiters: delimiters.clone(),
        link,
        link_kind,
        selection_kind,
    };
}
