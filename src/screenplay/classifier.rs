/*!
 * Line classification.
 *
 * Every line is classified by a priority cascade over its own text and a
 * small, explicit summary of its neighbours (`LineContext`). The summaries
 * are produced by a single forward scan, so classification never recurses
 * and never needs anything beyond the current scan.
 *
 * The keyword-driven rules (scene heading prefixes, transition suffixes) are
 * compiled once from a `ClassifierConfig`; reconfiguring means building a
 * new `Classifier`.
 */

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::app_config::ClassifierConfig;
use crate::errors::ScriptError;
use crate::screenplay::document::Script;
use crate::screenplay::element::{CharacterCue, Element, ElementKind, SceneHeading, Spans};
use crate::screenplay::markup::{is_blank, is_comment_line, is_forced_blank, scan_delimited};

static METADATA_ENTRY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([^\s:][^:]*):(?:[ \t]+(.*))?$").unwrap());

static METADATA_CONTINUATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[ \t]+([^\s:][^:]*)$").unwrap());

static SECTION: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(#{1,5})([^#].*)$").unwrap());

static FORCED_SCENE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\.([^.\s].*)$").unwrap());

static SCENE_ANNOTATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(.*\S)[ \t]*#([\w.\-]+)#[ \t]*$").unwrap());

static SCENE_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(.*\S)([ \t]+-+[ \t]+)(\S.*)$").unwrap());

static CENTERED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[ \t]*(>)[ \t]*(.*?)[ \t]*(<)[ \t]*$").unwrap());

static PAGE_BREAK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[ \t]*(={3,})[ \t]*([^\s=]*)[ \t]*$").unwrap());

/// Characters that can never start a heuristic character cue
const FORBIDDEN_CUE_LEADERS: &[char] =
    &['!', '#', '@', '.', '>', '=', '[', '~', '*', '(', '/', '_', '\\'];

/// Summary of the neighbours of a line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineContext {
    /// 0-based line index
    pub index: usize,

    /// Kind of the line before, `None` at document start
    pub previous: Option<ElementKind>,

    /// Next line is blank, a comment, or missing
    pub next_separator: bool,

    /// Every line before this one is Metadata
    pub metadata_run: bool,

    /// A `[[` note is unterminated before this line
    pub note_open: bool,

    /// A `/*` boneyard block is unterminated before this line
    pub boneyard_open: bool,
}

impl LineContext {
    /// Context of the first line of a document
    pub fn start() -> Self {
        Self {
            index: 0,
            previous: None,
            next_separator: true,
            metadata_run: true,
            note_open: false,
            boneyard_open: false,
        }
    }

    /// Previous line is blank, a comment, or missing
    pub fn previous_separator(&self) -> bool {
        self.previous.is_none_or(|kind| kind.is_separator())
    }
}

/// Screenplay line classifier built from keyword configuration
#[derive(Debug, Clone)]
pub struct Classifier {
    scene_prefix: Regex,
    transition: Regex,
}

impl Classifier {
    /// Compile the keyword rules of a configuration
    pub fn new(config: &ClassifierConfig) -> Result<Self, ScriptError> {
        let prefixes = alternation(&config.scene_heading_prefixes).ok_or_else(|| {
            ScriptError::InvalidConfig("no scene heading prefixes configured".to_string())
        })?;
        let suffixes = alternation(&config.transition_suffixes).ok_or_else(|| {
            ScriptError::InvalidConfig("no transition suffixes configured".to_string())
        })?;

        let scene_prefix = Regex::new(&format!(
            r"^(?i:({}))(?:\.[ \t]*|[ \t]+)(\S.*)$",
            prefixes
        ))
        .map_err(|e| ScriptError::InvalidConfig(e.to_string()))?;

        let transition = Regex::new(&format!(r"^[ \t]*(\P{{Ll}}*?(?:{}))[ \t]*$", suffixes))
            .map_err(|e| ScriptError::InvalidConfig(e.to_string()))?;

        debug!(
            "Built classifier with {} scene prefixes and {} transition suffixes",
            config.scene_heading_prefixes.len(),
            config.transition_suffixes.len()
        );

        Ok(Self {
            scene_prefix,
            transition,
        })
    }

    /// Classify one line given its context. Never fails; Action is the
    /// fallback.
    pub fn classify(&self, line: &str, context: &LineContext) -> Element {
        let index = context.index;
        let end = line.trim_end().len();

        if context.boneyard_open || is_comment_line(line) {
            return Element::new(index, ElementKind::Boneyard, Spans::body(0..line.len()));
        }

        if context.metadata_run {
            if let Some(element) = metadata(line, context) {
                return element;
            }
        }

        if is_blank(line) {
            return Element::blank(index, line.len());
        }
        if is_forced_blank(line) {
            let kind = match context.previous {
                Some(previous) if previous.is_dialogue_part() => ElementKind::Dialogue,
                _ => ElementKind::Blank,
            };
            return Element::new(index, kind, Spans::body(0..line.len()));
        }

        let start = line.len() - line.trim_start().len();
        let trimmed = &line[start..end];

        if trimmed.starts_with('!') {
            return Element::new(index, ElementKind::Action, Spans::body(start + 1..end))
                .forced(start..start + 1);
        }

        if context.note_open {
            return Element::new(index, ElementKind::Note, Spans::body(0..end));
        }

        if let Some(captures) = SECTION.captures(line) {
            let (marks, text) = (group(&captures, 1), group(&captures, 2));
            let body_start = text.start + (line[text.clone()].len() - line[text.clone()].trim_start().len());
            let mut element = Element::new(
                index,
                ElementKind::SectionHeading,
                Spans {
                    prefix: Some(marks.clone()),
                    body: body_start..end.max(body_start),
                    suffix: None,
                },
            );
            element.level = Some(marks.len() as u8);
            return element;
        }

        if context.previous_separator() {
            if let Some(element) = self.scene_heading(line, index) {
                return element;
            }

            if !context.next_separator {
                if let Some(element) = character_cue(line, index) {
                    return element;
                }
            }
        }

        if let Some(previous) = context.previous {
            if previous.is_dialogue_part() {
                let parenthetical = trimmed.starts_with('(') && trimmed.ends_with(')');
                let kind = match previous {
                    ElementKind::Character | ElementKind::Dialogue if parenthetical => {
                        ElementKind::Parenthetical
                    }
                    _ => ElementKind::Dialogue,
                };
                return Element::new(index, kind, Spans::body(start..end));
            }
        }

        if trimmed.starts_with('>') && !trimmed.ends_with('<') {
            let body_start = start + 1 + (trimmed[1..].len() - trimmed[1..].trim_start().len());
            return Element::new(index, ElementKind::Transition, Spans::body(body_start..end))
                .forced(start..start + 1);
        }
        if context.previous_separator() && context.next_separator {
            if let Some(captures) = self.transition.captures(line) {
                let body = group(&captures, 1);
                return Element::new(index, ElementKind::Transition, Spans::body(body));
            }
        }

        if let Some(captures) = CENTERED.captures(line) {
            return Element::new(
                index,
                ElementKind::Centered,
                Spans {
                    prefix: Some(group(&captures, 1)),
                    body: group(&captures, 2),
                    suffix: Some(group(&captures, 3)),
                },
            );
        }

        if trimmed.starts_with('=') && !trimmed.starts_with("===") {
            let rest = &trimmed[1..];
            let body_start = start + 1 + (rest.len() - rest.trim_start().len());
            return Element::new(index, ElementKind::Synopsis, Spans::body(body_start..end))
                .forced(start..start + 1);
        }

        if let Some(captures) = PAGE_BREAK.captures(line) {
            return Element::new(
                index,
                ElementKind::PageBreak,
                Spans {
                    prefix: Some(group(&captures, 1)),
                    body: group(&captures, 2),
                    suffix: None,
                },
            );
        }

        if trimmed.starts_with("[[") {
            let body_end = trimmed
                .find("]]")
                .map(|position| start + position)
                .unwrap_or(end);
            return Element::new(
                index,
                ElementKind::Note,
                Spans {
                    prefix: Some(start..start + 2),
                    body: start + 2..body_end.max(start + 2),
                    suffix: (body_end < end).then(|| body_end..body_end + 2),
                },
            );
        }

        Element::new(index, ElementKind::Action, Spans::body(start..end))
    }

    /// Classify every line in document order
    pub fn classify_lines(&self, lines: &[&str]) -> Vec<Element> {
        let mut elements = Vec::with_capacity(lines.len());
        let mut context = LineContext::start();

        for (index, line) in lines.iter().enumerate() {
            let boneyard_after = scan_delimited(line, context.boneyard_open, "/*", "*/");
            context.index = index;
            context.next_separator = match lines.get(index + 1) {
                None => true,
                Some(next) => boneyard_after || is_blank(next) || is_comment_line(next),
            };

            let element = self.classify(line, &context);

            context.note_open = match element.kind {
                ElementKind::Blank => false,
                ElementKind::Boneyard => context.note_open,
                _ => scan_delimited(line, context.note_open, "[[", "]]"),
            };
            context.boneyard_open = boneyard_after;
            context.metadata_run = context.metadata_run && element.kind == ElementKind::Metadata;
            context.previous = Some(element.kind);

            elements.push(element);
        }

        elements
    }

    /// Classify every line of a script
    pub fn classify_script(&self, script: &Script) -> Vec<Element> {
        let lines: Vec<&str> = script.lines().collect();
        self.classify_lines(&lines)
    }

    /// Classify a single line by scanning up to it
    pub fn classify_at(&self, lines: &[&str], index: usize) -> Option<Element> {
        if index >= lines.len() {
            return None;
        }
        let window = &lines[..(index + 2).min(lines.len())];
        self.classify_lines(window).into_iter().nth(index)
    }

    fn scene_heading(&self, line: &str, index: usize) -> Option<Element> {
        let (forced, keyword, rest_start) = if let Some(captures) = FORCED_SCENE.captures(line) {
            (true, None, group(&captures, 1).start)
        } else if let Some(captures) = self.scene_prefix.captures(line) {
            (false, Some(group(&captures, 1)), group(&captures, 2).start)
        } else {
            return None;
        };

        let (content_end, number, annotation) = match SCENE_ANNOTATION.captures(line) {
            Some(captures) if group(&captures, 1).end > rest_start => {
                let content = group(&captures, 1);
                (content.end, Some(group(&captures, 2)), Some(content.end..line.len()))
            }
            _ => (line.trim_end().len(), None, None),
        };

        let rest = &line[rest_start..content_end];
        let (location, separator, suffix) = match SCENE_SUFFIX.captures(rest) {
            Some(captures) => {
                let shift = |range: std::ops::Range<usize>| rest_start + range.start..rest_start + range.end;
                (
                    shift(group(&captures, 1)),
                    Some(shift(group(&captures, 2))),
                    Some(shift(group(&captures, 3))),
                )
            }
            None => (rest_start..content_end, None, None),
        };

        let body_start = if forced { 1 } else { 0 };
        let mut element = Element::new(
            index,
            ElementKind::SceneHeading,
            Spans {
                prefix: None,
                body: body_start..content_end,
                suffix: annotation.clone(),
            },
        );
        if forced {
            element = element.forced(0..1);
        }
        element.heading = Some(SceneHeading {
            prefix: keyword,
            location,
            separator,
            suffix,
            number,
            annotation,
        });
        Some(element)
    }
}

fn metadata(line: &str, context: &LineContext) -> Option<Element> {
    if let Some(captures) = METADATA_ENTRY.captures(line) {
        // A bare `Key:` has an empty value at the end of the line
        let value = captures.get(2).map(|m| m.range()).unwrap_or(line.len()..line.len());
        let value_end = value.start + line[value.clone()].trim_end().len();
        return Some(Element::new(
            context.index,
            ElementKind::Metadata,
            Spans {
                prefix: Some(group(&captures, 1)),
                body: value.start..value_end,
                suffix: None,
            },
        ));
    }

    if context.index > 0 {
        if let Some(captures) = METADATA_CONTINUATION.captures(line) {
            let value = group(&captures, 1);
            let value_end = value.start + line[value.clone()].trim_end().len();
            return Some(Element::new(
                context.index,
                ElementKind::Metadata,
                Spans::body(value.start..value_end),
            ));
        }
    }

    None
}

fn character_cue(line: &str, index: usize) -> Option<Element> {
    let start = line.len() - line.trim_start().len();
    let mut end = line.trim_end().len();
    if start >= end {
        return None;
    }

    let forced = line[start..].starts_with('@');
    let name_start = if forced { start + 1 } else { start };

    let dual = line[..end].ends_with('^');
    let marker = if dual {
        end -= 1;
        let marker = end..end + 1;
        end = line[..end].trim_end().len();
        Some(marker)
    } else {
        None
    };

    let mut name_end = end;
    let mut extension = None;
    if line[..end].ends_with(')') {
        if let Some(open) = line[name_start..end].rfind('(') {
            let open = name_start + open;
            extension = Some(open..end);
            name_end = line[..open].trim_end().len();
        }
    }
    if name_end <= name_start {
        return None;
    }

    let name = &line[name_start..name_end];
    if !forced {
        let leader_ok = name
            .chars()
            .next()
            .is_some_and(|c| !FORBIDDEN_CUE_LEADERS.contains(&c));
        let uppercase = name.chars().any(char::is_uppercase);
        let lowercase = name.chars().any(char::is_lowercase);
        if !leader_ok || !uppercase || lowercase {
            return None;
        }
    }

    let mut element = Element::new(
        index,
        ElementKind::Character,
        Spans {
            prefix: None,
            body: name_start..end,
            suffix: marker,
        },
    );
    if forced {
        element = element.forced(start..start + 1);
    }
    element.cue = Some(CharacterCue {
        name: name_start..name_end,
        extension,
        dual,
    });
    Some(element)
}

fn alternation(keywords: &[String]) -> Option<String> {
    let mut keywords: Vec<&str> = keywords
        .iter()
        .map(|keyword| keyword.trim())
        .filter(|keyword| !keyword.is_empty())
        .collect();
    if keywords.is_empty() {
        return None;
    }
    keywords.sort_by(|a, b| b.len().cmp(&a.len()).then(a.cmp(b)));
    keywords.dedup();

    Some(
        keywords
            .iter()
            .map(|keyword| regex::escape(keyword))
            .collect::<Vec<_>>()
            .join("|"),
    )
}

fn group(captures: &regex::Captures, index: usize) -> std::ops::Range<usize> {
    captures.get(index).map(|m| m.range()).unwrap_or(0..0)
}
