/*!
 * Block boundaries.
 *
 * A block is the contiguous run of lines forming one structural unit: a
 * section, a scene, a character cue with its dialogue, or a paragraph of
 * same-kind lines. Blocks are computed from a classified element sequence
 * and are half-open line ranges `[begin, end)`.
 */

use serde::Serialize;

use crate::screenplay::element::{Element, ElementKind};

/// Kind of structural unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockKind {
    Section,
    Scene,
    Dialogue,
    Paragraph,
}

/// Line range of one structural unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Block {
    pub kind: BlockKind,
    /// First line
    pub begin: usize,
    /// One past the last line
    pub end: usize,
    /// Section level, for section blocks
    pub level: Option<u8>,
}

impl Block {
    pub fn len(&self) -> usize {
        self.end - self.begin
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.begin
    }

    pub fn contains(&self, line: usize) -> bool {
        line >= self.begin && line < self.end
    }
}

fn kind_at(elements: &[Element], line: usize) -> Option<ElementKind> {
    elements.get(line).map(|element| element.kind)
}

/// Character cue plus its following parentheticals and dialogue
pub fn dialogue_block(elements: &[Element], line: usize) -> Option<Block> {
    if !kind_at(elements, line)?.is_dialogue_part() {
        return None;
    }

    let mut begin = line;
    while elements[begin].kind != ElementKind::Character {
        if begin == 0 || !elements[begin - 1].kind.is_dialogue_part() {
            return None;
        }
        begin -= 1;
    }

    let mut end = begin + 1;
    while matches!(
        kind_at(elements, end),
        Some(ElementKind::Dialogue | ElementKind::Parenthetical)
    ) {
        end += 1;
    }

    Some(Block {
        kind: BlockKind::Dialogue,
        begin,
        end,
        level: None,
    })
}

/// Maximal run of lines sharing the kind of `line`
pub fn paragraph_block(elements: &[Element], line: usize) -> Option<Block> {
    let kind = kind_at(elements, line)?;

    let mut begin = line;
    while begin > 0 && elements[begin - 1].kind == kind {
        begin -= 1;
    }
    let mut end = line + 1;
    while kind_at(elements, end) == Some(kind) {
        end += 1;
    }

    Some(Block {
        kind: BlockKind::Paragraph,
        begin,
        end,
        level: None,
    })
}

/// Scene containing `line`: from its heading to the next scene or section
/// heading. `None` when a section heading comes before any scene heading.
pub fn scene_block(elements: &[Element], line: usize) -> Option<Block> {
    let last = line.min(elements.len().checked_sub(1)?);
    let begin = (0..=last)
        .rev()
        .find(|index| elements[*index].kind.is_heading())
        .filter(|index| elements[*index].kind == ElementKind::SceneHeading)?;

    let end = (begin + 1..elements.len())
        .find(|index| elements[*index].kind.is_heading())
        .unwrap_or(elements.len());

    Some(Block {
        kind: BlockKind::Scene,
        begin,
        end,
        level: None,
    })
}

/// Section containing `line`: from its heading to the next section heading
/// of the same or a higher level
pub fn section_block(elements: &[Element], line: usize) -> Option<Block> {
    let last = line.min(elements.len().checked_sub(1)?);
    let begin = (0..=last)
        .rev()
        .find(|index| elements[*index].kind == ElementKind::SectionHeading)?;
    let level = elements[begin].level.unwrap_or(1);

    let end = (begin + 1..elements.len())
        .find(|index| {
            let element = &elements[*index];
            element.kind == ElementKind::SectionHeading && element.level.unwrap_or(1) <= level
        })
        .unwrap_or(elements.len());

    Some(Block {
        kind: BlockKind::Section,
        begin,
        end,
        level: Some(level),
    })
}

/// Block of the unit `line` belongs to, by the kind of that line
pub fn block_at(elements: &[Element], line: usize) -> Option<Block> {
    match kind_at(elements, line)? {
        ElementKind::Blank | ElementKind::Boneyard | ElementKind::Metadata => None,
        ElementKind::SectionHeading => section_block(elements, line),
        ElementKind::SceneHeading => scene_block(elements, line),
        ElementKind::Character | ElementKind::Dialogue | ElementKind::Parenthetical => {
            dialogue_block(elements, line)
        }
        _ => paragraph_block(elements, line),
    }
}

/// Enclosing scene or section of `line`, whichever heading is nearer
pub fn outline_block(elements: &[Element], line: usize) -> Option<Block> {
    let last = line.min(elements.len().checked_sub(1)?);
    let heading = (0..=last)
        .rev()
        .find(|index| elements[*index].kind.is_heading())?;

    match elements[heading].kind {
        ElementKind::SceneHeading => scene_block(elements, heading),
        _ => section_block(elements, heading),
    }
}
