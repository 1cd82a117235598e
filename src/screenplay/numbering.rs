/*!
 * Scene number resolution and annotation.
 *
 * Explicit `#N#` annotations on scene headings are fixed anchors. Headings
 * without an annotation get a number derived from the preceding scene and
 * bounded by the next anchor: the next plain number when it fits, else the
 * next revision of the preceding number. A number that cannot be placed
 * between its neighbours is an out-of-order fault; nothing is repaired.
 */

use log::{debug, info};

use crate::app_config::NumberingConfig;
use crate::errors::ScriptError;
use crate::screenplay::document::{EditScript, Script};
use crate::screenplay::element::{Element, ElementKind};
use crate::screenplay::scene_number::SceneNumber;

/// Resolved number of one scene heading
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberedScene {
    /// 0-based line of the heading
    pub line: usize,
    /// Number written in the heading, if any
    pub explicit: Option<SceneNumber>,
    /// Explicit or derived number
    pub number: SceneNumber,
}

/// Scene number resolver for one numbering style
#[derive(Debug, Clone)]
pub struct SceneNumbering {
    config: NumberingConfig,
}

impl SceneNumbering {
    pub fn new(config: &NumberingConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    /// Text form of a number in the configured style
    pub fn format(&self, number: &SceneNumber) -> String {
        number.format(&self.config)
    }

    /// Scene headings in document order with their explicit numbers
    pub fn collect(
        &self,
        script: &Script,
        elements: &[Element],
    ) -> Result<Vec<(usize, Option<SceneNumber>)>, ScriptError> {
        elements
            .iter()
            .filter(|element| element.kind == ElementKind::SceneHeading)
            .map(|element| {
                let line = script.line(element.line);
                let explicit = match element.scene_number_text(line) {
                    Some(text) => Some(SceneNumber::parse(text, &self.config).ok_or_else(|| {
                        ScriptError::MalformedSceneNumber {
                            line: element.line + 1,
                            text: text.to_string(),
                        }
                    })?),
                    None => None,
                };
                Ok((element.line, explicit))
            })
            .collect()
    }

    /// Number every scene heading, reporting `(done, total)` per heading
    pub fn resolve_all<F>(
        &self,
        script: &Script,
        elements: &[Element],
        mut progress: F,
    ) -> Result<Vec<NumberedScene>, ScriptError>
    where
        F: FnMut(usize, usize),
    {
        let headings = self.collect(script, elements)?;
        let total = headings.len();

        let mut previous_anchor: Option<&SceneNumber> = None;
        for (line, explicit) in &headings {
            if let Some(anchor) = explicit {
                if let Some(previous) = previous_anchor {
                    if anchor <= previous {
                        return Err(self.out_of_order(*line, anchor, previous));
                    }
                }
                previous_anchor = Some(anchor);
            }
        }

        if previous_anchor.is_none() {
            debug!("No explicit scene numbers, numbering {} scenes sequentially", total);
            let mut scenes = Vec::with_capacity(total);
            for (index, (line, _)) in headings.into_iter().enumerate() {
                scenes.push(NumberedScene {
                    line,
                    explicit: None,
                    number: SceneNumber::new(index as u32 + 1),
                });
                progress(index + 1, total);
            }
            return Ok(scenes);
        }

        // Index of the next anchored heading at or after each position
        let mut next_anchor = vec![None; total];
        let mut upcoming = None;
        for index in (0..total).rev() {
            if headings[index].1.is_some() {
                upcoming = Some(index);
            }
            next_anchor[index] = upcoming;
        }

        let mut scenes = Vec::with_capacity(total);
        let mut previous = SceneNumber::new(0);
        for (index, (line, explicit)) in headings.iter().enumerate() {
            let number = match explicit {
                Some(anchor) => anchor.clone(),
                None => {
                    let bound = next_anchor[index].map(|anchor| {
                        let (anchor_line, anchor_number) = &headings[anchor];
                        (*anchor_line, anchor_number.as_ref().unwrap_or(&previous))
                    });
                    self.candidate(&previous, bound)?
                }
            };

            previous = number.clone();
            scenes.push(NumberedScene {
                line: *line,
                explicit: explicit.clone(),
                number,
            });
            progress(index + 1, total);
        }

        Ok(scenes)
    }

    /// Number of the scene heading at `scene_index` (0-based, document
    /// order), or `None` if there are fewer headings
    pub fn resolve(
        &self,
        script: &Script,
        elements: &[Element],
        scene_index: usize,
    ) -> Result<Option<SceneNumber>, ScriptError> {
        let scenes = self.resolve_all(script, elements, |_, _| {})?;
        Ok(scenes.into_iter().nth(scene_index).map(|scene| scene.number))
    }

    /// Write ` #N#` after every heading that has no number yet
    pub fn add_numbers_to_document<F>(
        &self,
        script: &Script,
        elements: &[Element],
        progress: F,
    ) -> Result<EditScript, ScriptError>
    where
        F: FnMut(usize, usize),
    {
        let scenes = self.resolve_all(script, elements, progress)?;

        let mut edits = EditScript::new();
        for scene in scenes.iter().filter(|scene| scene.explicit.is_none()) {
            let line = script.line(scene.line);
            let at = script.line_start(scene.line) + line.trim_end().len();
            edits.insert(at, format!(" #{}#", self.format(&scene.number)));
        }

        info!("Adding {} scene numbers", edits.len());
        Ok(edits)
    }

    /// Strip every scene number annotation with its leading whitespace
    pub fn remove_numbers_from_document(&self, script: &Script, elements: &[Element]) -> EditScript {
        let mut edits = EditScript::new();
        for element in elements {
            let annotation = element
                .heading
                .as_ref()
                .and_then(|heading| heading.annotation.clone());
            if let Some(range) = annotation {
                let start = script.line_start(element.line);
                edits.delete(start + range.start..start + range.end);
            }
        }

        info!("Removing {} scene numbers", edits.len());
        edits
    }

    fn candidate(
        &self,
        previous: &SceneNumber,
        bound: Option<(usize, &SceneNumber)>,
    ) -> Result<SceneNumber, ScriptError> {
        let base = previous.next_base();
        let Some((anchor_line, next)) = bound else {
            return Ok(base);
        };
        if base < *next {
            return Ok(base);
        }

        if previous.base > 0 {
            let revision = previous.next_revision();
            if revision < *next {
                return Ok(revision);
            }
            return Err(self.out_of_order(anchor_line, next, &revision));
        }

        Err(self.out_of_order(anchor_line, next, &base))
    }

    fn out_of_order(&self, line: usize, number: &SceneNumber, previous: &SceneNumber) -> ScriptError {
        ScriptError::OutOfOrderSceneNumber {
            line: line + 1,
            number: self.format(number),
            previous: self.format(previous),
        }
    }
}
