/*!
 * Tests for page simulation and page break insertion
 */

use scriptpage::app_config::PaginationConfig;
use scriptpage::screenplay::{
    BreakKind, BreakPoint, DualSide, ElementKind, LineBudget, PageCursor, PageEnd, Paginator, Script,
};
use crate::common;

fn paginator(lines_per_page: usize) -> Paginator {
    Paginator::new(&PaginationConfig {
        lines_per_page: Some(lines_per_page),
        ..PaginationConfig::default()
    })
}

/// Test that a dual pair charges the longer column only
#[test]
fn test_line_budget_withDualColumns_shouldChargeFiveNotEight() {
    let mut budget = LineBudget::default();
    budget.add(5, Some(DualSide::Left));
    budget.add_blank();
    budget.add(3, Some(DualSide::Right));
    budget.fold();

    assert_eq!(budget.consumed, 5);
}

/// Test measuring a dual dialogue pair from markup
#[test]
fn test_measure_withDualDialogue_shouldFoldColumns() {
    let script = Script::new("BRICK\nOne.\nTwo.\nThree.\nFour.\n\nSTEEL ^\nOne.\nTwo.\n");
    let elements = common::classify(&script);
    assert_eq!(paginator(55).measure(&script, &elements, 0..9), 5);

    // Without the caret the same lines stack
    let script = Script::new("BRICK\nOne.\nTwo.\nThree.\nFour.\n\nSTEEL\nOne.\nTwo.\n");
    let elements = common::classify(&script);
    assert_eq!(paginator(55).measure(&script, &elements, 0..9), 9);
}

/// Test the dialogue split text with continuation markers
#[test]
fn test_paginate_document_withLongDialogue_shouldSplitWithMarkers() {
    let mut config = PaginationConfig {
        lines_per_page: Some(5),
        ..PaginationConfig::default()
    };
    config.widths.dialogue = 12;
    let paginator = Paginator::new(&config);

    let script = Script::new("Action.\n\nMARY\nHello there. Goodbye now. See you.\n");
    let elements = common::classify(&script);
    let edits = paginator.paginate_document(&script, &elements, |_, _| {});

    assert_eq!(
        edits.apply(script.text()),
        "Action.\n\nMARY\nHello there.\n(MORE)\n\n===\n\nMARY (CONT'D)\nGoodbye now. See you.\n"
    );
}

/// Test that a forced cue is restated with its sigil
#[test]
fn test_break_edit_withForcedCue_shouldKeepSigil() {
    let script = Script::new("@hal\nOpen the doors. Now please.\n");
    let elements = common::classify(&script);
    let point = BreakPoint {
        line: 1,
        column: 16,
        kind: BreakKind::DialogueSplit,
    };

    let edits = paginator(55).break_edit(&script, &elements, &point, None);
    assert_eq!(
        edits.apply(script.text()),
        "@hal\nOpen the doors.\n(MORE)\n\n===\n\n@hal (CONT'D)\nNow please.\n"
    );
}

/// Test custom markers from configuration
#[test]
fn test_break_edit_withCustomMarkers_shouldUseConfiguredText() {
    let config = PaginationConfig {
        more_marker: "(MEHR)".to_string(),
        continued_marker: "(WEITER)".to_string(),
        page_break_marker: "=====".to_string(),
        ..PaginationConfig::default()
    };
    let script = Script::new("JOHN\nHello there. Goodbye now.\n");
    let elements = common::classify(&script);
    let point = BreakPoint {
        line: 1,
        column: 13,
        kind: BreakKind::DialogueSplit,
    };

    let edits = Paginator::new(&config).break_edit(&script, &elements, &point, None);
    assert_eq!(
        edits.apply(script.text()),
        "JOHN\nHello there.\n(MEHR)\n\n=====\n\nJOHN (WEITER)\nGoodbye now.\n"
    );
}

/// Test forced breaks and trailing empty pages
#[test]
fn test_page_breaks_withForcedBreaks_shouldSkipTrailingEmptyPage() {
    let paginator = paginator(55);

    let script = Script::new("One.\n\n===\n\nTwo.\n");
    let elements = common::classify(&script);
    assert_eq!(
        paginator.page_breaks(&script, &elements, |_, _| {}),
        vec![PageEnd::Forced { line: 2 }]
    );
    assert_eq!(paginator.locate_current_page(&script, &elements, 4), (2, 2));

    let script = Script::new("One.\n\n===\n");
    let elements = common::classify(&script);
    assert!(paginator.page_breaks(&script, &elements, |_, _| {}).is_empty());
    assert_eq!(paginator.locate_current_page(&script, &elements, 0), (1, 1));
}

/// Test a numbered manual break
#[test]
fn test_page_break_at_withPageNumbers_shouldNumberMarker() {
    let paginator = Paginator::new(&PaginationConfig {
        number_pages: true,
        ..PaginationConfig::default()
    });
    let script = Script::new("One.\n\nTwo.\n");
    let elements = common::classify(&script);

    let edits = paginator.page_break_at(&script, &elements, 2).unwrap();
    assert_eq!(edits.apply(script.text()), "One.\n\n=== 2\n\nTwo.\n");
}

/// Test that a short document needs no breaks
#[test]
fn test_paginate_document_withShortScript_shouldMakeNoEdits() {
    let script = Script::new(common::SAMPLE_SCRIPT);
    let elements = common::classify(&script);
    let edits = paginator(55).paginate_document(&script, &elements, |_, _| {});
    assert!(edits.is_empty());
}

/// Test that an unsplittable speech still continues its cue on the next page
#[test]
fn test_paginate_document_withOverlongSpeech_shouldKeepDialogueMarkers() {
    let mut config = PaginationConfig {
        lines_per_page: Some(3),
        ..PaginationConfig::default()
    };
    config.widths.dialogue = 12;
    let paginator = Paginator::new(&config);

    let script = Script::new("JOHN\nthis line of talk runs on and on without stopping\nSecond line of talk.\n");
    let elements = common::classify(&script);
    assert_eq!(
        paginator.advance_one_page(&script, &elements, PageCursor::default()),
        PageEnd::Break(BreakPoint {
            line: 2,
            column: 0,
            kind: BreakKind::DialogueSplit,
        })
    );

    let paginated = paginator
        .paginate_document(&script, &elements, |_, _| {})
        .apply_to(&script);
    assert_eq!(
        paginated.text(),
        "JOHN\nthis line of talk runs on and on without stopping\n(MORE)\n\n===\n\nJOHN (CONT'D)\nSecond line of talk.\n"
    );
    let reclassified = common::classify(&paginated);
    assert_eq!(reclassified.last().map(|element| element.kind), Some(ElementKind::Dialogue));
}

/// Test that a split before a parenthetical leaves room for the more marker
#[test]
fn test_find_break_point_beforeParentheticalOnFullPage_shouldReserveMoreLine() {
    let mut config = PaginationConfig::default();
    config.widths.dialogue = 12;
    let paginator = Paginator::new(&config);

    let script = Script::new("JOHN\nHello there. Goodbye now.\n(quietly)\nBye.\n");
    let elements = common::classify(&script);
    assert_eq!(elements[2].kind, ElementKind::Parenthetical);

    assert_eq!(
        paginator.find_break_point(&script, &elements, 2, 1, PageCursor::default()),
        BreakPoint {
            line: 2,
            column: 0,
            kind: BreakKind::DialogueSplit,
        }
    );
    assert_eq!(
        paginator.find_break_point(&script, &elements, 2, 0, PageCursor::default()),
        BreakPoint {
            line: 1,
            column: 13,
            kind: BreakKind::DialogueSplit,
        }
    );
}
