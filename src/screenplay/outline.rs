/*!
 * Outline moves: shifting scenes and sections past their siblings and
 * changing section levels. All moves are returned as edit scripts against
 * the snapshot they were computed on.
 */

use std::fmt;

use log::debug;

use crate::errors::ScriptError;
use crate::screenplay::blocks::{outline_block, scene_block, section_block, Block, BlockKind};
use crate::screenplay::document::{EditScript, Script};
use crate::screenplay::element::{Element, ElementKind};

/// Direction of a block shift
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShiftDirection {
    Up,
    Down,
}

impl fmt::Display for ShiftDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Up => write!(f, "up"),
            Self::Down => write!(f, "down"),
        }
    }
}

/// Swap the scene or section enclosing `line` with its sibling
pub fn shift_block(
    script: &Script,
    elements: &[Element],
    line: usize,
    direction: ShiftDirection,
) -> Result<EditScript, ScriptError> {
    let block = outline_block(elements, line).ok_or(ScriptError::NotMoveable { line: line + 1 })?;
    let blocked = ScriptError::CannotShiftPastHigherLevel { line: line + 1 };

    let (upper, lower) = match direction {
        ShiftDirection::Down => {
            let sibling = next_sibling(elements, &block).ok_or(blocked)?;
            (block, sibling)
        }
        ShiftDirection::Up => {
            let sibling = previous_sibling(elements, &block).ok_or(blocked)?;
            (sibling, block)
        }
    };

    let upper_range = script.span_range(upper.begin..upper.end);
    let lower_range = script.span_range(lower.begin..lower.end);
    let rising = &script.text()[lower_range.clone()];
    let sinking = &script.text()[upper_range.clone()];

    // Newline runs stay in place so the gap between the blocks survives
    let rising_body = rising.trim_end_matches('\n');
    let sinking_body = sinking.trim_end_matches('\n');
    let replacement = format!(
        "{}{}{}{}",
        rising_body,
        &sinking[sinking_body.len()..],
        sinking_body,
        &rising[rising_body.len()..]
    );

    debug!(
        "Shifting {:?} block at lines {}-{} {}",
        block.kind,
        block.begin + 1,
        block.end,
        direction
    );

    let mut edits = EditScript::new();
    edits.replace(upper_range.start..lower_range.end, replacement);
    Ok(edits)
}

/// Raise the section enclosing `line` and its nested sections one level
pub fn promote_section(
    script: &Script,
    elements: &[Element],
    line: usize,
) -> Result<EditScript, ScriptError> {
    change_level(script, elements, line, false)
}

/// Lower the section enclosing `line` and its nested sections one level
pub fn demote_section(
    script: &Script,
    elements: &[Element],
    line: usize,
) -> Result<EditScript, ScriptError> {
    change_level(script, elements, line, true)
}

fn change_level(
    script: &Script,
    elements: &[Element],
    line: usize,
    demote: bool,
) -> Result<EditScript, ScriptError> {
    let block = section_block(elements, line).ok_or(ScriptError::NotMoveable { line: line + 1 })?;
    let sections: Vec<&Element> = elements[block.begin..block.end]
        .iter()
        .filter(|element| element.kind == ElementKind::SectionHeading)
        .collect();

    let out_of_range = sections.iter().any(|element| {
        let level = element.level.unwrap_or(1);
        if demote { level >= 5 } else { level <= 1 }
    });
    if out_of_range {
        return Err(ScriptError::CannotShiftPastHigherLevel { line: line + 1 });
    }

    let mut edits = EditScript::new();
    for element in sections {
        let marks = element.spans.prefix.clone().unwrap_or(0..0);
        let at = script.line_start(element.line) + marks.start;
        if demote {
            edits.insert(at, "#");
        } else {
            edits.delete(at..at + 1);
        }
    }
    Ok(edits)
}

fn next_sibling(elements: &[Element], block: &Block) -> Option<Block> {
    let heading = elements.get(block.end)?;
    match block.kind {
        BlockKind::Scene if heading.kind == ElementKind::SceneHeading => {
            scene_block(elements, block.end)
        }
        BlockKind::Section
            if heading.kind == ElementKind::SectionHeading && heading.level == block.level =>
        {
            section_block(elements, block.end)
        }
        _ => None,
    }
}

fn previous_sibling(elements: &[Element], block: &Block) -> Option<Block> {
    let before = block.begin.checked_sub(1)?;
    match block.kind {
        BlockKind::Scene => {
            let sibling = outline_block(elements, before)?;
            (sibling.kind == BlockKind::Scene && sibling.end == block.begin).then_some(sibling)
        }
        BlockKind::Section => {
            let level = block.level.unwrap_or(1);
            let heading = (0..=before).rev().find(|index| {
                let element = &elements[*index];
                element.kind == ElementKind::SectionHeading && element.level.unwrap_or(1) <= level
            })?;
            if elements[heading].level.unwrap_or(1) < level {
                return None;
            }
            section_block(elements, heading)
        }
        _ => None,
    }
}
