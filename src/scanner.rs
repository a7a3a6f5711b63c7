//! The detection engine: finds range links embedded in arbitrary text.
//!
//! Two passes over the input. Pass 1 runs the scan pattern over the raw
//! text and validates each candidate through the grammar parser. Pass 2
//! looks at quoted segments — the only way a path containing spaces can
//! be written — and reconciles them against pass-1 matches with an
//! interval-overlap classification: a quoted match that fully contains
//! earlier matches evicts them (it resolves ambiguity pass 1 cannot),
//! while a partial overlap is ambiguous and is skipped outright.
//!
//! With the built-in quote pattern, partial overlap cannot actually
//! occur: the pass-1 path class excludes both quote characters, so a
//! pass-1 match is either disjoint from a quoted segment or contained
//! by it. The classifier still handles the partial case so its contract
//! holds for any set of occupied ranges.

use regex::Regex;

use crate::delimiters::DelimiterConfig;
use crate::grammar::{self, LinkGrammar};
use crate::logging::{LinkLogger, LogContext, LogLevel, NoopLogger};
use crate::types::DetectedLink;

/// A text-offset interval already claimed by a detected link. Scan-local
/// bookkeeping; discarded when the scan returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OccupiedRange {
    /// Inclusive start offset.
    pub start: usize,
    /// Exclusive end offset.
    pub end: usize,
}

/// How a candidate interval relates to the set of occupied ranges.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Overlap {
    /// No intersection with any occupied range.
    None,
    /// Intersects at least one occupied range without containing it.
    /// Ambiguous; the candidate must be skipped.
    Partial,
    /// Fully contains the occupied ranges at these indices and
    /// intersects nothing else.
    Encompassing(Vec<usize>),
}

/// Cooperative cancellation: queried between matches of both passes,
/// never mid-match. Advisory and coarse-grained.
pub trait CancellationCheck {
    /// Whether the caller wants the scan abandoned.
    fn is_cancelled(&self) -> bool;
}

/// A cancellation check that never fires.
#[derive(Debug, Clone, Copy, Default)]
pub struct NeverCancelled;

impl CancellationCheck for NeverCancelled {
    /// Always `false`.
    fn is_cancelled(&self) -> bool {
        return false;
    }
}

/// Counters accumulated during a scan, emitted at debug level. They
/// never affect the returned link list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanStats {
    /// Quoted segments considered in pass 2.
    pub quoted_candidates: u32,
    /// Quoted candidates that failed to parse as links.
    pub quoted_parse_failures: u32,
    /// Pass-1 matches evicted by an encompassing quoted match.
    pub replacements: u32,
    /// Raw pattern matches in pass 1.
    pub unquoted_matches: u32,
    /// Pass-1 matches that failed to parse as links.
    pub unquoted_parse_failures: u32,
}

impl ScanStats {
    /// Render the counters as a log context.
    fn to_context(self) -> LogContext {
        let mut context = LogContext::new();
        context.insert("quoted_candidates".to_string(), self.quoted_candidates.to_string());
        context.insert(
            "quoted_parse_failures".to_string(),
            self.quoted_parse_failures.to_string(),
        );
        context.insert("replacements".to_string(), self.replacements.to_string());
        context.insert("unquoted_matches".to_string(), self.unquoted_matches.to_string());
        context.insert(
            "unquoted_parse_failures".to_string(),
            self.unquoted_parse_failures.to_string(),
        );
        return context;
    }
}

/// Scan free text for range links with a no-op logger and no
/// cancellation.
pub fn scan_text(text: &str, delimiters: &DelimiterConfig) -> Vec<DetectedLink> {
    return scan(text, delimiters, &NoopLogger, &NeverCancelled);
}

/// Scan free text for range links.
///
/// Malformed candidates are counted and discarded — text that looks
/// almost like a link is simply not a link. Cancellation is honored
/// between matches; a cancelled scan returns what it has found so far.
///
/// # Panics
///
/// Panics if the scan or quote patterns fail to compile, which cannot
/// happen for a validated `DelimiterConfig`.
pub fn scan(
    text: &str,
    delimiters: &DelimiterConfig,
    logger: &dyn LinkLogger,
    cancel: &dyn CancellationCheck,
) -> Vec<DetectedLink> {
    let grammar = LinkGrammar::new(delimiters);
    let pattern = Regex::new(&grammar::scan_pattern(delimiters)).expect("valid scan pattern");
    let quoted = Regex::new(r#"'[^']*'|"[^"]*""#).expect("valid quote pattern");

    let mut detected: Vec<DetectedLink> = Vec::new();
    let mut occupied: Vec<OccupiedRange> = Vec::new();
    let mut stats = ScanStats::default();

    run_unquoted_pass(
        text, &pattern, &grammar, cancel, &mut detected, &mut occupied, &mut stats,
    );
    run_quoted_pass(
        text, &quoted, &grammar, cancel, &mut detected, &mut occupied, &mut stats,
    );

    logger.log(LogLevel::Debug, &stats.to_context(), "scan complete");
    return detected;
}

/// Pass 1: raw pattern matches over the whole text.
fn run_unquoted_pass(
    text: &str,
    pattern: &Regex,
    grammar: &LinkGrammar,
    cancel: &dyn CancellationCheck,
    detected: &mut Vec<DetectedLink>,
    occupied: &mut Vec<OccupiedRange>,
    stats: &mut ScanStats,
) {
    for m in pattern.find_iter(text) {
        if cancel.is_cancelled() {
            return;
        }
        stats.unquoted_matches = stats.unquoted_matches.saturating_add(1);

        match grammar.parse(m.as_str()) {
            Ok(parsed) => {
                detected.push(DetectedLink {
                    link_text: m.as_str().to_string(),
                    start_index: m.start(),
                    length: m.len(),
                    parsed,
                });
                occupied.push(OccupiedRange {
                    start: m.start(),
                    end: m.end(),
                });
            },
            Err(_) => {
                stats.unquoted_parse_failures = stats.unquoted_parse_failures.saturating_add(1);
            },
        }
    }
}

/// Pass 2: quoted segments, reconciled against pass-1 matches.
///
/// `detected` and `occupied` stay index-aligned throughout: every
/// detection pushes exactly one occupied range, so the indices returned
/// by the classifier address both lists.
fn run_quoted_pass(
    text: &str,
    quoted: &Regex,
    grammar: &LinkGrammar,
    cancel: &dyn CancellationCheck,
    detected: &mut Vec<DetectedLink>,
    occupied: &mut Vec<OccupiedRange>,
    stats: &mut ScanStats,
) {
    for m in quoted.find_iter(text) {
        if cancel.is_cancelled() {
            return;
        }
        stats.quoted_candidates = stats.quoted_candidates.saturating_add(1);

        let encompassed = match classify_overlap(m.start(), m.end(), occupied) {
            // Unreachable for pass-1 ranges (the pass-1 pattern admits
            // no quote characters); kept for the classifier contract.
            Overlap::Partial => continue,
            Overlap::None => Vec::new(),
            Overlap::Encompassing(indices) => indices,
        };

        // Drop the surrounding quote characters.
        let inner_start = m.start().saturating_add(1);
        let inner_end = m.end().saturating_sub(1);
        let Some(inner) = text.get(inner_start..inner_end) else {
            continue;
        };

        let parsed = match grammar.parse(inner) {
            Ok(parsed) => parsed,
            Err(_) => {
                stats.quoted_parse_failures = stats.quoted_parse_failures.saturating_add(1);
                continue;
            },
        };

        // A quoted match outranks the pass-1 matches it contains: it
        // resolves spaces-in-path ambiguity pass 1 cannot see.
        for index in encompassed.iter().rev() {
            detected.remove(*index);
            occupied.remove(*index);
            stats.replacements = stats.replacements.saturating_add(1);
        }

        detected.push(DetectedLink {
            link_text: inner.to_string(),
            start_index: inner_start,
            length: inner.len(),
            parsed,
        });
        occupied.push(OccupiedRange {
            start: m.start(),
            end: m.end(),
        });
    }
}

/// Classify a candidate interval `[cs, ce)` against the occupied ranges.
///
/// A single left-to-right pass: ranges fully contained by the candidate
/// accumulate as encompassed; the first partially-overlapping range
/// short-circuits to [`Overlap::Partial`], discarding anything
/// accumulated so far — partial always wins over encompassing.
pub fn classify_overlap(cs: usize, ce: usize, ranges: &[OccupiedRange]) -> Overlap {
    let mut encompassed: Vec<usize> = Vec::new();

    for (index, range) in ranges.iter().enumerate() {
        let intersects = cs < range.end && ce > range.start;
        if !intersects {
            continue;
        }
        if cs <= range.start && ce >= range.end {
            encompassed.push(index);
            continue;
        }
        return Overlap::Partial;
    }

    if encompassed.is_empty() {
        return Overlap::None;
    }
    return Overlap::Encompassing(encompassed);
}
