/*!
 * Screenplay markup model.
 *
 * Classification, block structure, dual dialogue, scene numbering,
 * outline moves, pagination and template expansion over a `Script`
 * snapshot. Operations that change text return an `EditScript`.
 */

pub mod blocks;
pub mod classifier;
pub mod document;
pub mod dual;
pub mod element;
pub mod markup;
pub mod numbering;
pub mod outline;
pub mod pagination;
pub mod scene_number;
pub mod template;

pub use blocks::{block_at, outline_block, Block, BlockKind};
pub use classifier::{Classifier, LineContext};
pub use document::{Edit, EditScript, Script};
pub use dual::{dual_side, DualSide};
pub use element::{CharacterCue, Element, ElementKind, SceneHeading, Spans};
pub use numbering::{NumberedScene, SceneNumbering};
pub use outline::{demote_section, promote_section, shift_block, ShiftDirection};
pub use pagination::{BreakKind, BreakPoint, LineBudget, PageCursor, PageEnd, Paginator};
pub use scene_number::SceneNumber;
pub use template::{expand_templates, TemplateValues};
