/*!
 * Dual-dialogue detection.
 *
 * A cue ending in `^` is the right column of a pair; the dialogue block
 * just before it (separated only by blank or comment lines) is the left
 * column. The side is recomputed on every query.
 */

use serde::Serialize;

use crate::screenplay::blocks::dialogue_block;
use crate::screenplay::element::{Element, ElementKind};

/// Column of a dual-dialogue pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DualSide {
    Left,
    Right,
}

fn is_dual_cue(element: &Element) -> bool {
    element.kind == ElementKind::Character && element.cue.as_ref().is_some_and(|cue| cue.dual)
}

/// Side of the dialogue block containing `line`, if it is part of a pair
pub fn dual_side(elements: &[Element], line: usize) -> Option<DualSide> {
    let block = dialogue_block(elements, line)?;

    let next = elements[block.end..]
        .iter()
        .find(|element| !element.kind.is_separator());
    if next.is_some_and(is_dual_cue) {
        return Some(DualSide::Left);
    }

    if is_dual_cue(&elements[block.begin]) {
        return Some(DualSide::Right);
    }

    None
}

/// Cue line of the left column of the pair containing `line`
pub fn left_cue(elements: &[Element], line: usize) -> Option<usize> {
    let block = dialogue_block(elements, line)?;
    match dual_side(elements, line)? {
        DualSide::Left => Some(block.begin),
        DualSide::Right => {
            let previous = (0..block.begin)
                .rev()
                .find(|index| !elements[*index].kind.is_separator());
            match previous {
                Some(index) if elements[index].kind.is_dialogue_part() => {
                    dialogue_block(elements, index).map(|left| left.begin)
                }
                _ => Some(block.begin),
            }
        }
    }
}
