/*!
 * Classified screenplay elements.
 *
 * Every line of a script classifies to exactly one `Element`. Spans are
 * byte ranges into the line the element was classified from.
 */

use std::fmt;
use std::ops::Range;
use std::str::FromStr;

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

/// Kind of a classified line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementKind {
    /// Empty or whitespace-only line
    Blank,
    /// Comment line (`//`, `/* */`), never printed
    Boneyard,
    Metadata,
    SectionHeading,
    SceneHeading,
    Action,
    Character,
    Dialogue,
    Parenthetical,
    Transition,
    Centered,
    Synopsis,
    PageBreak,
    Note,
}

impl ElementKind {
    // @returns: Lowercase identifier used in config and CLI output
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Blank => "blank",
            Self::Boneyard => "boneyard",
            Self::Metadata => "metadata",
            Self::SectionHeading => "section_heading",
            Self::SceneHeading => "scene_heading",
            Self::Action => "action",
            Self::Character => "character",
            Self::Dialogue => "dialogue",
            Self::Parenthetical => "parenthetical",
            Self::Transition => "transition",
            Self::Centered => "centered",
            Self::Synopsis => "synopsis",
            Self::PageBreak => "page_break",
            Self::Note => "note",
        }
    }

    /// Character cue, dialogue or parenthetical
    pub fn is_dialogue_part(&self) -> bool {
        matches!(self, Self::Character | Self::Dialogue | Self::Parenthetical)
    }

    /// Blank or comment line; these separate blocks
    pub fn is_separator(&self) -> bool {
        matches!(self, Self::Blank | Self::Boneyard)
    }

    /// Scene or section heading
    pub fn is_heading(&self) -> bool {
        matches!(self, Self::SceneHeading | Self::SectionHeading)
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for ElementKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_lowercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "blank" => Ok(Self::Blank),
            "boneyard" | "comment" => Ok(Self::Boneyard),
            "metadata" => Ok(Self::Metadata),
            "section_heading" | "section" => Ok(Self::SectionHeading),
            "scene_heading" | "scene" => Ok(Self::SceneHeading),
            "action" => Ok(Self::Action),
            "character" => Ok(Self::Character),
            "dialogue" => Ok(Self::Dialogue),
            "parenthetical" => Ok(Self::Parenthetical),
            "transition" => Ok(Self::Transition),
            "centered" | "center" => Ok(Self::Centered),
            "synopsis" => Ok(Self::Synopsis),
            "page_break" => Ok(Self::PageBreak),
            "note" => Ok(Self::Note),
            _ => Err(anyhow!("Invalid element kind: {}", s)),
        }
    }
}

/// Sub-ranges of a line: prefix marks, body text, suffix marks
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Spans {
    pub prefix: Option<Range<usize>>,
    pub body: Range<usize>,
    pub suffix: Option<Range<usize>>,
}

impl Spans {
    /// Spans with only a body
    pub fn body(body: Range<usize>) -> Self {
        Self {
            prefix: None,
            body,
            suffix: None,
        }
    }
}

/// Parts of a scene heading
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SceneHeading {
    /// Prefix keyword such as `INT` (absent when forced)
    pub prefix: Option<Range<usize>>,
    pub location: Range<usize>,
    /// Separator between location and suffix, e.g. ` - `
    pub separator: Option<Range<usize>>,
    /// Suffix such as `DAY`
    pub suffix: Option<Range<usize>>,
    /// Text between the `#` marks of a scene number annotation
    pub number: Option<Range<usize>>,
    /// Whole annotation including its leading whitespace
    pub annotation: Option<Range<usize>>,
}

/// Parts of a character cue
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CharacterCue {
    pub name: Range<usize>,
    /// Parenthetical extension such as `(V.O.)`
    pub extension: Option<Range<usize>>,
    /// Trailing `^` marking the right column of dual dialogue
    pub dual: bool,
}

/// One classified line
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Element {
    /// 0-based line index
    pub line: usize,
    pub kind: ElementKind,
    /// An explicit sigil overrode heuristic detection
    pub forced: bool,
    pub spans: Spans,
    /// Section nesting level, 1-5
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heading: Option<SceneHeading>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cue: Option<CharacterCue>,
}

impl Element {
    /// Create an element with default attributes
    pub fn new(line: usize, kind: ElementKind, spans: Spans) -> Self {
        Self {
            line,
            kind,
            forced: false,
            spans,
            level: None,
            heading: None,
            cue: None,
        }
    }

    /// Blank line element
    pub fn blank(line: usize, length: usize) -> Self {
        Self::new(line, ElementKind::Blank, Spans::body(0..length))
    }

    /// Mark the element as forced by a sigil
    pub fn forced(mut self, prefix: Range<usize>) -> Self {
        self.forced = true;
        self.spans.prefix = Some(prefix);
        self
    }

    /// Body text of the element within its source line
    pub fn body<'a>(&self, line: &'a str) -> &'a str {
        slice(line, &self.spans.body)
    }

    /// Character name of a cue, if this element is one
    pub fn cue_name<'a>(&self, line: &'a str) -> Option<&'a str> {
        self.cue.as_ref().map(|cue| slice(line, &cue.name))
    }

    /// Scene number annotation text of a heading, if present
    pub fn scene_number_text<'a>(&self, line: &'a str) -> Option<&'a str> {
        self.heading
            .as_ref()
            .and_then(|heading| heading.number.as_ref())
            .map(|range| slice(line, range))
    }
}

/// Slice a line by a span, tolerating spans from a different line
pub fn slice<'a>(line: &'a str, range: &Range<usize>) -> &'a str {
    line.get(range.clone()).unwrap_or("")
}
