/*!
 * Page simulation.
 *
 * Pages are filled by walking the classified elements and charging each
 * printed element its word-wrapped line count against a fixed line budget.
 * When a page overflows, the break is moved back to a legal position:
 * before a block, at a sentence boundary of action, or inside dialogue
 * using the "more"/"continued" convention. Dual-dialogue columns are
 * charged separately and folded into the page total by their maximum.
 */

use std::collections::HashSet;
use std::ops::Range;

use log::{debug, info, warn};
use serde::Serialize;

use crate::app_config::{FillWidths, PaginationConfig};
use crate::errors::ScriptError;
use crate::screenplay::blocks::{block_at, dialogue_block};
use crate::screenplay::document::{EditScript, Script};
use crate::screenplay::dual::{dual_side, left_cue, DualSide};
use crate::screenplay::element::{Element, ElementKind};
use crate::screenplay::markup::{display_text, sentence_boundaries, wrapped_line_count};

/// Lines charged against the current page
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LineBudget {
    /// Lines of single-column content
    pub consumed: usize,
    /// Lines of the open left dual-dialogue column
    pub left: usize,
    /// Lines of the open right dual-dialogue column
    pub right: usize,
}

impl LineBudget {
    /// Lines used so far, counting open dual columns by the longer one
    pub fn total(&self) -> usize {
        self.consumed + self.left.max(self.right)
    }

    /// Close any open dual-dialogue pair
    pub fn fold(&mut self) {
        self.consumed += self.left.max(self.right);
        self.left = 0;
        self.right = 0;
    }

    /// Charge an element, to its column when it is dual dialogue
    pub fn add(&mut self, lines: usize, side: Option<DualSide>) {
        match side {
            Some(DualSide::Left) => self.left += lines,
            Some(DualSide::Right) => self.right += lines,
            None => {
                self.fold();
                self.consumed += lines;
            }
        }
    }

    /// Charge a blank line. The blank between the two columns of a pair is
    /// free; the blank closing the right column folds the pair.
    pub fn add_blank(&mut self) {
        if self.right > 0 {
            self.fold();
            self.consumed += 1;
        } else if self.left == 0 {
            self.consumed += 1;
        }
    }
}

/// Position a page starts at
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct PageCursor {
    pub line: usize,
    /// Byte column within the line, non-zero after a sentence split
    pub column: usize,
    /// Page opens with a restated "continued" character cue
    pub continued: bool,
}

impl PageCursor {
    fn position(&self) -> (usize, usize) {
        (self.line, self.column)
    }
}

/// How a computed break divides the text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BreakKind {
    /// Before a line, or at a sentence boundary of action
    Clean,
    /// Inside dialogue, with "more" and a restated cue
    DialogueSplit,
}

/// Computed page break position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BreakPoint {
    pub line: usize,
    pub column: usize,
    pub kind: BreakKind,
}

impl BreakPoint {
    pub fn before(line: usize) -> Self {
        Self {
            line,
            column: 0,
            kind: BreakKind::Clean,
        }
    }
}

/// Why a page ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PageEnd {
    /// Budget exhausted, the next page starts at the break
    Break(BreakPoint),
    /// Forced page break marker at this line
    Forced { line: usize },
    EndOfDocument,
}

impl PageEnd {
    /// Start of the following page
    pub fn next_start(&self) -> Option<PageCursor> {
        match self {
            Self::Break(point) => Some(PageCursor {
                line: point.line,
                column: point.column,
                continued: point.kind == BreakKind::DialogueSplit,
            }),
            Self::Forced { line } => Some(PageCursor {
                line: line + 1,
                column: 0,
                continued: false,
            }),
            Self::EndOfDocument => None,
        }
    }
}

/// Page simulator for one pagination configuration
#[derive(Debug, Clone)]
pub struct Paginator {
    config: PaginationConfig,
    budget: usize,
    export: HashSet<ElementKind>,
}

impl Paginator {
    pub fn new(config: &PaginationConfig) -> Self {
        Self {
            config: config.clone(),
            budget: config.page_line_budget(),
            export: config.export_elements.iter().copied().collect(),
        }
    }

    /// Page line budget
    pub fn budget(&self) -> usize {
        self.budget
    }

    fn exported(&self, kind: ElementKind) -> bool {
        self.export.contains(&kind)
    }

    fn widths(&self, dual: bool) -> &FillWidths {
        if dual {
            &self.config.dual_widths
        } else {
            &self.config.widths
        }
    }

    /// Printed lines of an element, starting at a byte column of its line
    fn element_lines(&self, script: &Script, elements: &[Element], index: usize, column: usize) -> usize {
        let element = &elements[index];
        let line = script.line(index);
        let body = &element.spans.body;
        let start = body.start.max(column);
        let text = line.get(start..body.end.max(start)).unwrap_or("");
        let dual = element.kind.is_dialogue_part() && dual_side(elements, index).is_some();
        let width = self.widths(dual).width_for(element.kind);
        wrapped_line_count(&display_text(text), width)
    }

    fn is_content(&self, element: &Element) -> bool {
        !element.kind.is_separator()
            && !matches!(element.kind, ElementKind::Metadata | ElementKind::PageBreak)
            && self.exported(element.kind)
    }

    fn next_content(&self, elements: &[Element], after: usize) -> Option<usize> {
        (after + 1..elements.len()).find(|index| {
            let element = &elements[*index];
            element.kind == ElementKind::PageBreak || self.is_content(element)
        })
    }

    fn previous_content(&self, elements: &[Element], before: usize) -> Option<usize> {
        (0..before).rev().find(|index| {
            let kind = elements[*index].kind;
            !kind.is_separator() && kind != ElementKind::Metadata
        })
    }

    /// Fill one page from `start` and report where it ends
    pub fn advance_one_page(&self, script: &Script, elements: &[Element], start: PageCursor) -> PageEnd {
        let mut budget = LineBudget::default();
        if start.continued {
            budget.consumed += 1;
        }

        let mut index = start.line;
        let mut column = start.column;
        if column == 0 {
            while elements.get(index).is_some_and(|element| {
                matches!(
                    element.kind,
                    ElementKind::Metadata
                        | ElementKind::Blank
                        | ElementKind::Boneyard
                        | ElementKind::PageBreak
                )
            }) {
                index += 1;
            }
        }
        let page_start = PageCursor {
            line: index,
            column,
            continued: start.continued,
        };

        while index < elements.len() {
            let element = &elements[index];
            match element.kind {
                ElementKind::Blank => {
                    budget.add_blank();
                    if budget.total() >= self.budget {
                        return self.break_before_next(script, elements, index, page_start);
                    }
                }
                ElementKind::Boneyard => {}
                ElementKind::PageBreak => return PageEnd::Forced { line: index },
                kind if !self.exported(kind) => {}
                kind => {
                    let lines = self.element_lines(script, elements, index, column);
                    let side = if kind.is_dialogue_part() {
                        dual_side(elements, index)
                    } else {
                        None
                    };
                    let before = budget.total();
                    budget.add(lines, side);

                    if budget.total() > self.budget {
                        let available = self.budget.saturating_sub(before);
                        let point = self.find_break_point(script, elements, index, available, page_start);
                        return self.checked_break(elements, point, index, page_start);
                    }
                    if budget.total() == self.budget {
                        return self.break_before_next(script, elements, index, page_start);
                    }
                }
            }
            column = 0;
            index += 1;
        }

        PageEnd::EndOfDocument
    }

    /// Page is exactly full after `index`: break at the next content
    fn break_before_next(
        &self,
        script: &Script,
        elements: &[Element],
        index: usize,
        page_start: PageCursor,
    ) -> PageEnd {
        match self.next_content(elements, index) {
            None => PageEnd::EndOfDocument,
            Some(next) if elements[next].kind == ElementKind::PageBreak => PageEnd::Forced { line: next },
            Some(next) => {
                let point = self.find_break_point(script, elements, next, 0, page_start);
                self.checked_break(elements, point, next, page_start)
            }
        }
    }

    /// Guarantee the page holds something: a break not after the page
    /// start falls back to breaking after the element that overflowed
    fn checked_break(
        &self,
        elements: &[Element],
        point: BreakPoint,
        index: usize,
        page_start: PageCursor,
    ) -> PageEnd {
        if (point.line, point.column) > page_start.position() {
            return PageEnd::Break(point);
        }

        debug!(
            "Break at line {} does not advance past page start {}, breaking after it",
            point.line + 1,
            page_start.line + 1
        );
        match self.next_content(elements, index) {
            Some(next) if elements[next].kind == ElementKind::PageBreak => PageEnd::Forced { line: next },
            Some(next) if continues_dialogue(elements, index, next) => PageEnd::Break(BreakPoint {
                line: next,
                column: 0,
                kind: BreakKind::DialogueSplit,
            }),
            Some(next) => PageEnd::Break(BreakPoint::before(next)),
            None => PageEnd::EndOfDocument,
        }
    }

    /// Split dialogue before `index`, keeping a line free for the "more"
    /// marker; without one the split moves up into the element above
    fn split_before(
        &self,
        script: &Script,
        elements: &[Element],
        index: usize,
        available: usize,
        page_start: PageCursor,
    ) -> BreakPoint {
        if available >= 1 {
            return BreakPoint {
                line: index,
                column: 0,
                kind: BreakKind::DialogueSplit,
            };
        }
        match index.checked_sub(1) {
            Some(previous) if previous >= page_start.line && elements[previous].kind.is_dialogue_part() => {
                let column = if previous == page_start.line { page_start.column } else { 0 };
                let lines = self.element_lines(script, elements, previous, column);
                self.find_break_point(script, elements, previous, available + lines, page_start)
            }
            _ => BreakPoint::before(index),
        }
    }

    /// Move a break at element `index` back to a legal position, given the
    /// lines still available on the page
    pub fn find_break_point(
        &self,
        script: &Script,
        elements: &[Element],
        index: usize,
        available: usize,
        page_start: PageCursor,
    ) -> BreakPoint {
        let element = &elements[index];
        if !self.exported(element.kind) {
            return BreakPoint::before(index);
        }
        if element.kind.is_dialogue_part() {
            if let Some(cue) = left_cue(elements, index) {
                return BreakPoint::before(cue);
            }
        }

        let line = script.line(index);
        let body = &element.spans.body;
        let text_start = if index == page_start.line {
            body.start.max(page_start.column)
        } else {
            body.start
        };
        let width = self.config.widths.width_for(element.kind);
        let lines_before = |boundary: usize| {
            let text = line.get(text_start..boundary).unwrap_or("");
            wrapped_line_count(&display_text(text), width)
        };

        match element.kind {
            ElementKind::SectionHeading | ElementKind::SceneHeading | ElementKind::Character => {
                BreakPoint::before(index)
            }
            ElementKind::Parenthetical => match index.checked_sub(1) {
                Some(previous) if elements[previous].kind == ElementKind::Character => {
                    self.find_break_point(script, elements, previous, available, page_start)
                }
                _ => self.split_before(script, elements, index, available, page_start),
            },
            ElementKind::Dialogue => {
                // One line stays reserved for the "more" marker
                let fitting = sentence_boundaries(line, text_start, body.end)
                    .into_iter()
                    .rev()
                    .find(|boundary| lines_before(*boundary) + 1 <= available);
                if let Some(boundary) = fitting {
                    return BreakPoint {
                        line: index,
                        column: boundary,
                        kind: BreakKind::DialogueSplit,
                    };
                }
                match index.checked_sub(1) {
                    Some(previous)
                        if matches!(
                            elements[previous].kind,
                            ElementKind::Character | ElementKind::Parenthetical
                        ) =>
                    {
                        self.find_break_point(script, elements, previous, available, page_start)
                    }
                    _ => self.split_before(script, elements, index, available, page_start),
                }
            }
            ElementKind::Transition | ElementKind::Centered => {
                match self.previous_content(elements, index) {
                    Some(previous) => {
                        // Carry at least the end of the previous element along
                        let lines = self.element_lines(script, elements, previous, 0);
                        self.find_break_point(
                            script,
                            elements,
                            previous,
                            lines.saturating_sub(1),
                            page_start,
                        )
                    }
                    None => BreakPoint::before(index),
                }
            }
            ElementKind::Action => {
                let fitting = sentence_boundaries(line, text_start, body.end)
                    .into_iter()
                    .rev()
                    .find(|boundary| lines_before(*boundary) <= available);
                if let Some(boundary) = fitting {
                    return BreakPoint {
                        line: index,
                        column: boundary,
                        kind: BreakKind::Clean,
                    };
                }
                match self.previous_content(elements, index) {
                    Some(previous) if elements[previous].kind == ElementKind::SceneHeading => {
                        self.find_break_point(script, elements, previous, available, page_start)
                    }
                    _ => BreakPoint::before(index),
                }
            }
            _ => BreakPoint::before(index),
        }
    }

    fn has_content_from(&self, elements: &[Element], line: usize) -> bool {
        elements
            .get(line..)
            .is_some_and(|rest| rest.iter().any(|element| self.is_content(element)))
    }

    /// Every page end of the document in order, excluding the end of the
    /// document itself
    pub fn page_breaks<F>(&self, script: &Script, elements: &[Element], mut progress: F) -> Vec<PageEnd>
    where
        F: FnMut(usize, usize),
    {
        let total = elements.len();
        let mut ends = Vec::new();
        let mut cursor = PageCursor::default();

        loop {
            let end = self.advance_one_page(script, elements, cursor);
            let Some(next) = end.next_start() else {
                break;
            };
            if next.position() <= cursor.position() {
                warn!("Pagination stalled at line {}", cursor.line + 1);
                break;
            }
            if !self.has_content_from(elements, next.line) {
                break;
            }

            ends.push(end);
            cursor = next;
            progress(cursor.line.min(total), total);
        }

        progress(total, total);
        ends
    }

    /// Insert page break markers at every computed break
    pub fn paginate_document<F>(&self, script: &Script, elements: &[Element], progress: F) -> EditScript
    where
        F: FnMut(usize, usize),
    {
        let ends = self.page_breaks(script, elements, progress);
        let mut edits = EditScript::new();

        for (index, end) in ends.iter().enumerate() {
            let page = index + 2;
            match end {
                PageEnd::Break(point) => edits.extend(self.break_edit(script, elements, point, Some(page))),
                PageEnd::Forced { line } if self.config.number_pages => {
                    let element = &elements[*line];
                    let text = script.line(*line);
                    let marks = element.spans.prefix.clone().unwrap_or(0..0);
                    let start = script.line_start(*line);
                    edits.replace(
                        start + marks.start..start + text.trim_end().len(),
                        format!("{} {}", &text[marks], page),
                    );
                }
                _ => {}
            }
        }

        info!("Paginated into {} pages", ends.len() + 1);
        edits
    }

    /// Current page of `line` and the total number of pages
    pub fn locate_current_page(&self, script: &Script, elements: &[Element], line: usize) -> (usize, usize) {
        let starts: Vec<PageCursor> = self
            .page_breaks(script, elements, |_, _| {})
            .iter()
            .filter_map(PageEnd::next_start)
            .collect();

        let current = 1 + starts
            .iter()
            .filter(|start| start.line < line || (start.line == line && start.column == 0))
            .count();
        (current, starts.len() + 1)
    }

    /// Insert a break before the block enclosing `line`
    pub fn page_break_at(
        &self,
        script: &Script,
        elements: &[Element],
        line: usize,
    ) -> Result<EditScript, ScriptError> {
        let block = block_at(elements, line).ok_or(ScriptError::NotMoveable { line: line + 1 })?;
        let page = if self.config.number_pages {
            Some(self.locate_current_page(script, elements, block.begin).0 + 1)
        } else {
            None
        };
        Ok(self.break_edit(script, elements, &BreakPoint::before(block.begin), page))
    }

    /// Printed lines of a line range with dual columns folded
    pub fn measure(&self, script: &Script, elements: &[Element], lines: Range<usize>) -> usize {
        let mut budget = LineBudget::default();
        for index in lines.start..lines.end.min(elements.len()) {
            let kind = elements[index].kind;
            match kind {
                ElementKind::Blank => budget.add_blank(),
                ElementKind::Boneyard | ElementKind::Metadata | ElementKind::PageBreak => {}
                kind if !self.exported(kind) => {}
                kind => {
                    let side = if kind.is_dialogue_part() {
                        dual_side(elements, index)
                    } else {
                        None
                    };
                    budget.add(self.element_lines(script, elements, index, 0), side);
                }
            }
        }
        budget.fold();
        budget.consumed
    }

    /// Edit inserting a page break at a break point. `page` is the number
    /// of the page that follows, written when page numbering is on.
    pub fn break_edit(
        &self,
        script: &Script,
        elements: &[Element],
        point: &BreakPoint,
        page: Option<usize>,
    ) -> EditScript {
        let marker = match page {
            Some(page) if self.config.number_pages => {
                format!("{} {}", self.config.page_break_marker, page)
            }
            _ => self.config.page_break_marker.clone(),
        };

        let start = script.line_start(point.line);
        let line = script.line(point.line);
        let mut edits = EditScript::new();

        match point.kind {
            BreakKind::Clean if point.column == 0 => {
                let after_blank = point.line == 0
                    || elements
                        .get(point.line - 1)
                        .is_some_and(|element| element.kind == ElementKind::Blank);
                if after_blank {
                    edits.insert(start, format!("{}\n\n", marker));
                } else {
                    edits.insert(start, format!("\n{}\n\n", marker));
                }
            }
            BreakKind::Clean => {
                let gap = whitespace_before(line, point.column);
                edits.replace(start + gap.start..start + gap.end, format!("\n\n{}\n\n", marker));
            }
            BreakKind::DialogueSplit => {
                let cue = self.restated_cue(script, elements, point.line);
                let more = &self.config.more_marker;
                if point.column == 0 {
                    edits.insert(start, format!("{}\n\n{}\n\n{}\n", more, marker, cue));
                } else {
                    let gap = whitespace_before(line, point.column);
                    edits.replace(
                        start + gap.start..start + gap.end,
                        format!("\n{}\n\n{}\n\n{}\n", more, marker, cue),
                    );
                }
            }
        }

        edits
    }

    /// Character name with the "continued" marker for the dialogue at `line`
    fn restated_cue(&self, script: &Script, elements: &[Element], line: usize) -> String {
        let continued = &self.config.continued_marker;
        let Some(block) = dialogue_block(elements, line) else {
            return continued.clone();
        };

        let element = &elements[block.begin];
        let text = script.line(block.begin);
        let name = element.cue_name(text).unwrap_or("");
        let sigil = if element.forced { "@" } else { "" };
        format!("{}{} {}", sigil, name, continued)
    }
}

/// `next` is a later dialogue or parenthetical line of the block at `index`
fn continues_dialogue(elements: &[Element], index: usize, next: usize) -> bool {
    matches!(elements[next].kind, ElementKind::Dialogue | ElementKind::Parenthetical)
        && dialogue_block(elements, index).is_some_and(|block| block.contains(next))
}

fn whitespace_before(line: &str, column: usize) -> Range<usize> {
    let head = line.get(..column).unwrap_or(line);
    head.trim_end().len()..head.len()
}
