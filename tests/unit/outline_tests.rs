/*!
 * Tests for outline moves
 */

use scriptpage::errors::ScriptError;
use scriptpage::screenplay::{demote_section, promote_section, shift_block, Script, ShiftDirection};
use crate::common;

const ACT: &str = "# Act\n\nINT. A - DAY\n\nFirst.\n\nINT. B - DAY\n\nSecond.\n";

fn shift(text: &str, line: usize, direction: ShiftDirection) -> Result<String, ScriptError> {
    let script = Script::new(text);
    let elements = common::classify(&script);
    Ok(shift_block(&script, &elements, line, direction)?.apply(script.text()))
}

/// Test swapping two scenes inside a section
#[test]
fn test_shift_block_down_withSiblingScene_shouldSwap() {
    let shifted = shift(ACT, 4, ShiftDirection::Down).unwrap();
    assert_eq!(shifted, "# Act\n\nINT. B - DAY\n\nSecond.\n\nINT. A - DAY\n\nFirst.\n");
}

/// Test that shifting down then up restores the text
#[test]
fn test_shift_block_downThenUp_shouldRestoreText() {
    let shifted = shift(ACT, 2, ShiftDirection::Down).unwrap();
    let restored = shift(&shifted, 6, ShiftDirection::Up).unwrap();
    assert_eq!(restored, ACT);
}

/// Test that the first scene of a section cannot move above it
#[test]
fn test_shift_block_up_pastSectionHeading_shouldFail() {
    assert_eq!(
        shift(ACT, 2, ShiftDirection::Up).unwrap_err(),
        ScriptError::CannotShiftPastHigherLevel { line: 3 }
    );
    assert_eq!(
        shift(ACT, 8, ShiftDirection::Down).unwrap_err(),
        ScriptError::CannotShiftPastHigherLevel { line: 9 }
    );
}

/// Test level limits of section moves
#[test]
fn test_change_level_atLimits_shouldFail() {
    let script = Script::new("##### Deep\n");
    let elements = common::classify(&script);
    assert_eq!(
        demote_section(&script, &elements, 0).unwrap_err(),
        ScriptError::CannotShiftPastHigherLevel { line: 1 }
    );

    let script = Script::new("Action.\n");
    let elements = common::classify(&script);
    assert_eq!(
        promote_section(&script, &elements, 0).unwrap_err(),
        ScriptError::NotMoveable { line: 1 }
    );
}

/// Test promoting a nested section with its children
#[test]
fn test_promote_section_withChildren_shouldRaiseAll() {
    let script = Script::new("# One\n\n## Two\n\n### Three\n\n## Four\n");
    let elements = common::classify(&script);
    let promoted = promote_section(&script, &elements, 2).unwrap().apply(script.text());
    assert_eq!(promoted, "# One\n\n# Two\n\n## Three\n\n## Four\n");
}
