/*!
 * Tests for scene numbers and scene numbering
 */

use scriptpage::app_config::{NumberingConfig, RevisionPlacement};
use scriptpage::errors::ScriptError;
use scriptpage::screenplay::scene_number::{revision_letters, revision_value};
use scriptpage::screenplay::{SceneNumber, SceneNumbering, Script};
use crate::common;

fn prefix_config() -> NumberingConfig {
    NumberingConfig {
        placement: RevisionPlacement::Prefix,
        ..NumberingConfig::default()
    }
}

/// Test revision letter sequence past Z
#[test]
fn test_revision_letters_withLargeValues_shouldContinueBijectively() {
    assert_eq!(revision_letters(1), "A");
    assert_eq!(revision_letters(26), "Z");
    assert_eq!(revision_letters(27), "AA");
    assert_eq!(revision_value("aa"), Some(27));
    assert_eq!(revision_value("A1"), None);
}

/// Test scene number ordering
#[test]
fn test_scene_number_ordering_withRevisions_shouldSortBetweenBases() {
    let ten = SceneNumber::new(10);
    let ten_a = SceneNumber::with_revision(10, vec![1]);
    let ten_b = SceneNumber::with_revision(10, vec![2]);
    let eleven = SceneNumber::new(11);

    assert!(ten < ten_a);
    assert!(ten_a < ten_b);
    assert!(ten_b < eleven);
    assert_eq!(ten_a.next_revision(), ten_b);
    assert_eq!(ten_a.next_base(), eleven);
}

/// Test formatting and parsing in both placements
#[test]
fn test_scene_number_format_withPlacements_shouldMatchStyle() {
    let suffix = NumberingConfig::default();
    let number = SceneNumber::with_revision(10, vec![1]);
    assert_eq!(number.format(&suffix), "10A");
    assert_eq!(number.format(&prefix_config()), "A11");

    assert_eq!(SceneNumber::parse("10A", &suffix), Some(number.clone()));
    assert_eq!(SceneNumber::parse("A11", &prefix_config()), Some(number));
    assert_eq!(SceneNumber::parse("0", &suffix), None);
    assert_eq!(SceneNumber::parse("ten", &suffix), None);
}

/// Test the scene between two anchors gets a revision letter
#[test]
fn test_add_numbers_withAnchors_shouldInsertRevision() {
    let script = Script::new(common::SAMPLE_SCRIPT);
    let elements = common::classify(&script);
    let numbering = SceneNumbering::new(&NumberingConfig::default());

    let edits = numbering
        .add_numbers_to_document(&script, &elements, |_, _| {})
        .unwrap();
    assert_eq!(edits.len(), 1);

    let numbered = edits.apply_to(&script);
    assert_eq!(numbered.line(8), "EXT. GARDEN - DAY #10A#");
}

/// Test that an opening heading with a clock time gets the first number
#[test]
fn test_add_numbers_withTimeInFirstHeading_shouldNumberIt() {
    let script = Script::new("INT. OFFICE - 9:00 AM\n\nJOHN\nHi.\n\nEXT. STREET - DAY\n");
    let elements = common::classify(&script);
    let numbering = SceneNumbering::new(&NumberingConfig::default());

    let numbered = numbering
        .add_numbers_to_document(&script, &elements, |_, _| {})
        .unwrap()
        .apply_to(&script);
    assert_eq!(numbered.line(0), "INT. OFFICE - 9:00 AM #1#");
    assert_eq!(numbered.line(5), "EXT. STREET - DAY #2#");
}

/// Test prefix placement for the same document
#[test]
fn test_add_numbers_withPrefixPlacement_shouldUseLeadingLetters() {
    let script = Script::new(common::SAMPLE_SCRIPT);
    let elements = common::classify(&script);
    let numbering = SceneNumbering::new(&prefix_config());

    let numbered = numbering
        .add_numbers_to_document(&script, &elements, |_, _| {})
        .unwrap()
        .apply_to(&script);
    assert_eq!(numbered.line(8), "EXT. GARDEN - DAY #A11#");
}

/// Test removing then adding gives sequential numbers
#[test]
fn test_renumber_withExistingNumbers_shouldBeSequential() {
    let script = Script::new(common::SAMPLE_SCRIPT);
    let numbering = SceneNumbering::new(&NumberingConfig::default());

    let elements = common::classify(&script);
    let stripped = numbering
        .remove_numbers_from_document(&script, &elements)
        .apply_to(&script);
    assert!(!stripped.text().contains("#10#"));

    let elements = common::classify(&stripped);
    let numbered = numbering
        .add_numbers_to_document(&stripped, &elements, |_, _| {})
        .unwrap()
        .apply_to(&stripped);
    assert_eq!(numbered.line(3), "INT. HOUSE - DAY #1#");
    assert_eq!(numbered.line(8), "EXT. GARDEN - DAY #2#");
    assert_eq!(numbered.line(13), "INT. HOUSE - NIGHT #3#");
}

/// Test that progress reaches the total
#[test]
fn test_resolve_all_withProgress_shouldReportEveryScene() {
    let script = Script::new(common::SAMPLE_SCRIPT);
    let elements = common::classify(&script);
    let numbering = SceneNumbering::new(&NumberingConfig::default());

    let mut last = (0, 0);
    let scenes = numbering
        .resolve_all(&script, &elements, |done, total| last = (done, total))
        .unwrap();
    assert_eq!(scenes.len(), 3);
    assert_eq!(last, (3, 3));
    assert_eq!(scenes[0].explicit, Some(SceneNumber::new(10)));
    assert!(scenes[1].explicit.is_none());
    assert_eq!(scenes[1].number, SceneNumber::with_revision(10, vec![1]));
}

/// Test that no edits are made when numbering fails
#[test]
fn test_add_numbers_withOutOfOrderAnchors_shouldFailWithoutEdits() {
    let script = Script::new("INT. A - DAY #5#\n\nEXT. B - DAY\n\nINT. C - DAY #5#\n");
    let elements = common::classify(&script);
    let numbering = SceneNumbering::new(&NumberingConfig::default());

    let error = numbering
        .add_numbers_to_document(&script, &elements, |_, _| {})
        .unwrap_err();
    assert!(matches!(error, ScriptError::OutOfOrderSceneNumber { line: 5, .. }));
}
