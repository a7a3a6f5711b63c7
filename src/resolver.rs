//! Range-notation resolution: converts validated 0-indexed selections
//! into 1-indexed computed ranges under a notation policy.

use crate::error::Error;
use crate::selection;
use crate::types::{
    ComputedSelection, Coverage, InputSelection, RangeFormat, RangeNotation, Selection,
    SelectionKind,
};

/// Validate the input and compute its 1-indexed range.
///
/// Rectangular selections always carry positions: the range runs from
/// the first selection's start line to the last selection's start line
/// (each selection is single-line, so the start line is authoritative),
/// with the shared column span of the first selection. Normal selections
/// follow the notation policy.
///
/// # Errors
///
/// Returns any selection-validation error unchanged.
pub fn compute_range(
    input: &InputSelection,
    notation: RangeNotation,
) -> Result<ComputedSelection, Error> {
    selection::validate(input)?;

    return match input.kind {
        SelectionKind::Normal => compute_normal(&input.selections, notation),
        SelectionKind::Rectangular => compute_rectangular(&input.selections),
    };
}

/// Compute the range of a single normal selection.
fn compute_normal(
    selections: &[Selection],
    notation: RangeNotation,
) -> Result<ComputedSelection, Error> {
    let Some(sel) = selections.first() else {
        return Err(Error::SelectionEmpty);
    };

    let with_positions = match notation {
        RangeNotation::EnforceFullLine => false,
        RangeNotation::EnforcePositions => true,
        RangeNotation::Auto => selections.iter().any(|s| s.coverage == Coverage::PartialLine),
    };

    if with_positions {
        return Ok(ComputedSelection {
            start_line: to_one_indexed(sel.start.line),
            end_line: to_one_indexed(sel.end.line),
            start_position: Some(to_one_indexed(sel.start.character)),
            end_position: Some(to_one_indexed(sel.end.character)),
            range_format: RangeFormat::WithPositions,
        });
    }

    return Ok(ComputedSelection {
        start_line: to_one_indexed(sel.start.line),
        end_line: to_one_indexed(sel.end.line),
        start_position: None,
        end_position: None,
        range_format: RangeFormat::LineOnly,
    });
}

/// Compute the range of a rectangular selection stack.
fn compute_rectangular(selections: &[Selection]) -> Result<ComputedSelection, Error> {
    let (Some(first), Some(last)) = (selections.first(), selections.last()) else {
        return Err(Error::SelectionEmpty);
    };

    return Ok(ComputedSelection {
        start_line: to_one_indexed(first.start.line),
        end_line: to_one_indexed(last.start.line),
        start_position: Some(to_one_indexed(first.start.character)),
        end_position: Some(to_one_indexed(first.end.character)),
        range_format: RangeFormat::WithPositions,
    });
}

/// Convert a validated 0-indexed coordinate to 1-indexed. Validation has
/// already rejected negatives, so the fallback is never taken.
fn to_one_indexed(value: i32) -> u32 {
    return u32::try_from(value).unwrap_or(0).saturating_add(1);
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc)]
mod tests {
    use super::*;
    use crate::types::CursorPosition;

    fn partial(start: (i32, i32), end: (i32, i32)) -> Selection {
        return Selection::new(
            CursorPosition::new(start.0, start.1),
            CursorPosition::new(end.0, end.1),
            Coverage::PartialLine,
        );
    }

    fn full_line(line: i32, end_char: i32) -> Selection {
        return Selection::new(
            CursorPosition::new(line, 0),
            CursorPosition::new(line, end_char),
            Coverage::FullLine,
        );
    }

    #[test]
    fn validation_failure_short_circuits() {
        let input = InputSelection {
            selections: Vec::new(),
            kind: SelectionKind::Normal,
        };
        let err = compute_range(&input, RangeNotation::Auto).unwrap_err();
        assert_eq!(err.code(), "SELECTION_EMPTY");
    }

    #[test]
    fn auto_full_line_coverage_drops_positions() {
        let input = InputSelection::normal(full_line(9, 30));
        let computed = compute_range(&input, RangeNotation::Auto).unwrap();
        assert_eq!(computed.range_format, RangeFormat::LineOnly);
        assert_eq!(computed.start_line, 10);
        assert_eq!(computed.end_line, 10);
        assert_eq!(computed.start_position, None);
        assert_eq!(computed.end_position, None);
    }

    #[test]
    fn auto_partial_coverage_keeps_positions() {
        let input = InputSelection::normal(partial((9, 4), (11, 8)));
        let computed = compute_range(&input, RangeNotation::Auto).unwrap();
        assert_eq!(computed.range_format, RangeFormat::WithPositions);
        assert_eq!(computed.start_position, Some(5));
        assert_eq!(computed.end_position, Some(9));
    }

    #[test]
    fn enforce_full_line_drops_positions_even_for_partial() {
        let input = InputSelection::normal(partial((9, 4), (11, 8)));
        let computed = compute_range(&input, RangeNotation::EnforceFullLine).unwrap();
        assert_eq!(computed.range_format, RangeFormat::LineOnly);
        assert_eq!(computed.start_position, None);
    }

    #[test]
    fn enforce_positions_synthesizes_from_raw_offsets() {
        // Full-line coverage: positions come from the raw offsets + 1,
        // not from a default of 1.
        let input = InputSelection::normal(full_line(9, 30));
        let computed = compute_range(&input, RangeNotation::EnforcePositions).unwrap();
        assert_eq!(computed.range_format, RangeFormat::WithPositions);
        assert_eq!(computed.start_position, Some(1));
        assert_eq!(computed.end_position, Some(31));
    }

    #[test]
    fn rectangular_uses_start_lines_and_first_columns() {
        let columns = |line: i32| {
            return Selection::new(
                CursorPosition::new(line, 2),
                CursorPosition::new(line, 6),
                Coverage::PartialLine,
            );
        };
        let input = InputSelection::rectangular(vec![columns(9), columns(10), columns(11)]);
        let computed = compute_range(&input, RangeNotation::Auto).unwrap();
        assert_eq!(computed.start_line, 10);
        assert_eq!(computed.end_line, 12);
        assert_eq!(computed.start_position, Some(3));
        assert_eq!(computed.end_position, Some(7));
        assert_eq!(computed.range_format, RangeFormat::WithPositions);
    }
}
