//! Selection validation: the ordered, fail-fast checks that turn a
//! caller-supplied selection set into a trusted one.
//!
//! Structural checks run first on every selection; mode checks follow.
//! The first violation wins, and the order is deterministic, so a given
//! bad input always produces the same error.

use crate::error::Error;
use crate::types::{InputSelection, Selection, SelectionKind};

/// Validate a selection set against the structural and mode invariants.
///
/// Validation is idempotent: validating an already-valid input any
/// number of times never fails.
///
/// # Errors
///
/// Returns the first violated rule: `SELECTION_EMPTY`,
/// `NEGATIVE_COORDINATES`, `BACKWARD_LINE`, `BACKWARD_CHARACTER`,
/// `ZERO_WIDTH`, then mode-specific `NORMAL_MULTIPLE`,
/// `RECTANGULAR_MULTILINE`, `RECTANGULAR_MISMATCHED_COLUMNS`,
/// `RECTANGULAR_UNSORTED`, `RECTANGULAR_NON_CONTIGUOUS`.
pub fn validate(input: &InputSelection) -> Result<(), Error> {
    if input.selections.is_empty() {
        return Err(Error::SelectionEmpty);
    }

    for (index, selection) in input.selections.iter().enumerate() {
        check_structure(index, selection)?;
    }

    return match input.kind {
        SelectionKind::Normal => check_normal(&input.selections),
        SelectionKind::Rectangular => check_rectangular(&input.selections),
    };
}

/// Structural checks applied to every selection regardless of mode:
/// negative coordinates, backward line, same-line backward character,
/// zero-width.
fn check_structure(index: usize, selection: &Selection) -> Result<(), Error> {
    for position in [selection.start, selection.end] {
        if position.line < 0 || position.character < 0 {
            return Err(Error::NegativeCoordinates {
                index,
                line: position.line,
                character: position.character,
            });
        }
    }

    if selection.start.line > selection.end.line {
        return Err(Error::BackwardLine {
            start: selection.start.line,
            end: selection.end.line,
        });
    }

    if selection.start.line == selection.end.line
        && selection.start.character > selection.end.character
    {
        return Err(Error::BackwardCharacter {
            line: selection.start.line,
            start: selection.start.character,
            end: selection.end.character,
        });
    }

    // A caret is not a range.
    if selection.start == selection.end {
        return Err(Error::ZeroWidth {
            line: selection.start.line,
            character: selection.start.character,
        });
    }

    return Ok(());
}

/// Normal mode accepts exactly one selection. Multi-range normal
/// selections are not supported.
fn check_normal(selections: &[Selection]) -> Result<(), Error> {
    if selections.len() != 1 {
        return Err(Error::NormalMultiple {
            count: selections.len(),
        });
    }
    return Ok(());
}

/// Rectangular mode: every selection single-line, identical column span
/// to the first, strictly ascending versus the immediate predecessor,
/// and contiguous (line step of exactly one).
///
/// The sort check compares only to the previous selection; together with
/// the contiguity check this is equivalent to requiring globally sorted,
/// gap-free lines.
fn check_rectangular(selections: &[Selection]) -> Result<(), Error> {
    let Some(first) = selections.first() else {
        return Err(Error::SelectionEmpty);
    };
    let expected = (first.start.character, first.end.character);

    let mut previous: Option<&Selection> = None;
    for (index, selection) in selections.iter().enumerate() {
        if selection.start.line != selection.end.line {
            return Err(Error::RectangularMultiline {
                index,
                start_line: selection.start.line,
                end_line: selection.end.line,
            });
        }

        let span = (selection.start.character, selection.end.character);
        if span != expected {
            return Err(Error::RectangularMismatchedColumns {
                index,
                expected_start: expected.0,
                expected_end: expected.1,
                start: span.0,
                end: span.1,
            });
        }

        if let Some(prev) = previous {
            if selection.start.line <= prev.start.line {
                return Err(Error::RectangularUnsorted {
                    index,
                    previous_line: prev.start.line,
                    line: selection.start.line,
                });
            }

            let step = i64::from(selection.start.line).saturating_sub(i64::from(prev.start.line));
            if step != 1 {
                return Err(Error::RectangularNonContiguous {
                    index,
                    gap: step.saturating_sub(1),
                });
            }
        }

        previous = Some(selection);
    }

    return Ok(());
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc)]
mod tests {
    use super::*;
    use crate::types::{Coverage, CursorPosition, SelectionKind};

    fn sel(start: (i32, i32), end: (i32, i32)) -> Selection {
        return Selection::new(
            CursorPosition::new(start.0, start.1),
            CursorPosition::new(end.0, end.1),
            Coverage::PartialLine,
        );
    }

    fn column(line: i32, start_char: i32, end_char: i32) -> Selection {
        return sel((line, start_char), (line, end_char));
    }

    #[test]
    fn empty_selection_list_rejected() {
        let input = InputSelection {
            selections: Vec::new(),
            kind: SelectionKind::Normal,
        };
        assert_eq!(validate(&input).unwrap_err().code(), "SELECTION_EMPTY");
    }

    #[test]
    fn negative_coordinates_rejected() {
        let input = InputSelection::normal(sel((-1, 0), (2, 3)));
        assert_eq!(validate(&input).unwrap_err().code(), "NEGATIVE_COORDINATES");
    }

    #[test]
    fn backward_line_rejected() {
        let input = InputSelection::normal(sel((5, 0), (3, 0)));
        assert_eq!(validate(&input).unwrap_err().code(), "BACKWARD_LINE");
    }

    #[test]
    fn backward_character_on_same_line_rejected() {
        let input = InputSelection::normal(sel((5, 9), (5, 3)));
        assert_eq!(validate(&input).unwrap_err().code(), "BACKWARD_CHARACTER");
    }

    #[test]
    fn zero_width_rejected_regardless_of_character() {
        let input = InputSelection::normal(sel((5, 7), (5, 7)));
        assert_eq!(validate(&input).unwrap_err().code(), "ZERO_WIDTH");
    }

    #[test]
    fn multiple_normal_selections_rejected_with_count() {
        let input = InputSelection {
            selections: vec![sel((1, 0), (2, 0)), sel((4, 0), (5, 0))],
            kind: SelectionKind::Normal,
        };
        let err = validate(&input).unwrap_err();
        assert!(matches!(err, Error::NormalMultiple { count: 2 }));
    }

    #[test]
    fn valid_normal_selection_is_idempotent() {
        let input = InputSelection::normal(sel((1, 0), (4, 12)));
        validate(&input).unwrap();
        validate(&input).unwrap();
    }

    #[test]
    fn rectangular_multiline_selection_rejected() {
        let input = InputSelection::rectangular(vec![column(3, 2, 6), sel((4, 2), (5, 6))]);
        assert_eq!(validate(&input).unwrap_err().code(), "RECTANGULAR_MULTILINE");
    }

    #[test]
    fn rectangular_mismatched_columns_rejected() {
        let input = InputSelection::rectangular(vec![column(3, 2, 6), column(4, 2, 7)]);
        let err = validate(&input).unwrap_err();
        assert_eq!(err.code(), "RECTANGULAR_MISMATCHED_COLUMNS");
    }

    #[test]
    fn rectangular_descending_lines_rejected_as_unsorted() {
        let input = InputSelection::rectangular(vec![column(5, 2, 6), column(4, 2, 6)]);
        assert_eq!(validate(&input).unwrap_err().code(), "RECTANGULAR_UNSORTED");
    }

    #[test]
    fn rectangular_gap_rejected_with_gap_size() {
        let input = InputSelection::rectangular(vec![column(10, 2, 6), column(12, 2, 6)]);
        let err = validate(&input).unwrap_err();
        assert!(matches!(
            err,
            Error::RectangularNonContiguous { index: 1, gap: 1 }
        ));
    }

    #[test]
    fn contiguous_rectangular_selection_accepted() {
        let input = InputSelection::rectangular(vec![
            column(10, 2, 6),
            column(11, 2, 6),
            column(12, 2, 6),
        ]);
        validate(&input).unwrap();
    }

    #[test]
    fn single_line_rectangular_selection_accepted() {
        let input = InputSelection::rectangular(vec![column(10, 2, 6)]);
        validate(&input).unwrap();
    }
}
