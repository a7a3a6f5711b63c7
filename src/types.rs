//! Core domain types for range links: parsed links, editor selections,
//! computed ranges, and the closed enums that tag them.

use serde::Serialize;

/// Whether a selection (or link) is a single contiguous range or a
/// column/block selection built from stacked single-line selections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SelectionKind {
    /// One contiguous text range.
    Normal,
    /// A column selection: multiple single-line selections sharing one
    /// character span on contiguous lines.
    Rectangular,
}

/// Whether a link carries an embedded delimiter trailer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LinkKind {
    /// Plain link, parseable only under the delimiters it was written with.
    Regular,
    /// Link with a delimiter-echo trailer appended, parseable under any
    /// configuration.
    Portable,
}

/// Caller-asserted fact about whether a selection spans its logical line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Coverage {
    /// The selection covers the whole line.
    FullLine,
    /// The selection covers part of the line.
    PartialLine,
}

/// How a computed range is rendered: line numbers only, or with
/// character positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RangeFormat {
    /// Render line numbers only.
    LineOnly,
    /// Render line numbers and character positions.
    WithPositions,
}

/// Policy for deciding whether positions appear in a formatted link.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum RangeNotation {
    /// Line-only when every selection covers its full line, positions
    /// otherwise.
    #[default]
    Auto,
    /// Always line-only, even for partial selections.
    EnforceFullLine,
    /// Always with positions, even for full-line selections.
    EnforcePositions,
}

/// A 1-indexed position inside a link. An absent character means the
/// reference is to the whole line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LinkPosition {
    /// 1-indexed line number.
    pub line: u32,
    /// 1-indexed character, or `None` for a whole-line reference.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub character: Option<u32>,
}

impl LinkPosition {
    /// A whole-line position with no character component.
    pub fn whole_line(line: u32) -> Self {
        return Self {
            line,
            character: None,
        };
    }

    /// A position with both line and character.
    pub fn at(line: u32, character: u32) -> Self {
        return Self {
            line,
            character: Some(character),
        };
    }
}

/// A successfully parsed range link. Produced only by the grammar parser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedLink {
    /// The file path portion, exactly as written.
    pub path: String,
    /// Start of the referenced range.
    pub start: LinkPosition,
    /// End of the referenced range.
    pub end: LinkPosition,
    /// Whether the link carried a portable delimiter trailer.
    pub link_kind: LinkKind,
    /// Normal (single hash) or rectangular (doubled hash) selection.
    pub selection_kind: SelectionKind,
}

/// A 0-indexed editor cursor position. Signed so the validator can
/// observe and reject negative coordinates from foreign editor layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CursorPosition {
    /// 0-indexed line number.
    pub line: i32,
    /// 0-indexed character offset.
    pub character: i32,
}

impl CursorPosition {
    /// Construct a cursor position from 0-indexed coordinates.
    pub fn new(line: i32, character: i32) -> Self {
        return Self { line, character };
    }
}

/// One editor selection with its line-coverage tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    /// Selection start (0-indexed).
    pub start: CursorPosition,
    /// Selection end (0-indexed).
    pub end: CursorPosition,
    /// Whether the selection spans the logical whole line.
    pub coverage: Coverage,
}

impl Selection {
    /// Construct a selection from 0-indexed coordinates and a coverage tag.
    pub fn new(start: CursorPosition, end: CursorPosition, coverage: Coverage) -> Self {
        return Self {
            start,
            end,
            coverage,
        };
    }
}

/// The caller-supplied selection set. Order matters for rectangular
/// selections: the list must ascend line by line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputSelection {
    /// The ordered selections.
    pub selections: Vec<Selection>,
    /// Normal or rectangular mode.
    pub kind: SelectionKind,
}

impl InputSelection {
    /// Wrap a single selection as a normal-mode input.
    pub fn normal(selection: Selection) -> Self {
        return Self {
            selections: vec![selection],
            kind: SelectionKind::Normal,
        };
    }

    /// Wrap stacked single-line selections as a rectangular-mode input.
    pub fn rectangular(selections: Vec<Selection>) -> Self {
        return Self {
            selections,
            kind: SelectionKind::Rectangular,
        };
    }
}

/// A validated, 1-indexed range derived from an `InputSelection`.
/// Positions are present exactly when `range_format` is `WithPositions`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ComputedSelection {
    /// 1-indexed start line.
    pub start_line: u32,
    /// 1-indexed end line.
    pub end_line: u32,
    /// 1-indexed start character, absent for line-only ranges.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_position: Option<u32>,
    /// 1-indexed end character, absent for line-only ranges.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_position: Option<u32>,
    /// Whether positions participate in the rendered link.
    pub range_format: RangeFormat,
}

/// One link found while scanning free text. Rebuilt on every scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetectedLink {
    /// The matched link text, without surrounding quotes.
    pub link_text: String,
    /// Byte offset of the link text in the scanned input.
    pub start_index: usize,
    /// Byte length of the link text.
    pub length: usize,
    /// The parsed form of the link.
    pub parsed: ParsedLink,
}
