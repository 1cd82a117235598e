/*!
 * Script snapshots and edit scripts.
 *
 * A `Script` is an immutable view over the markup text with a line index.
 * Operations never mutate a script in place: they compute an `EditScript`
 * of byte-range replacements against a snapshot, which is then applied in
 * one step to produce the new text. Text outside the edited ranges is
 * carried over byte for byte.
 */

use std::fmt;
use std::ops::Range;

/// Immutable screenplay text with a line index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Script {
    text: String,
    line_starts: Vec<usize>,
}

impl Script {
    /// Create a script snapshot from markup text
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let mut line_starts = Vec::new();

        // Same line model as `str::lines`: a trailing newline does not open
        // an extra empty line.
        if !text.is_empty() {
            line_starts.push(0);
        }
        for (index, byte) in text.bytes().enumerate() {
            if byte == b'\n' && index + 1 < text.len() {
                line_starts.push(index + 1);
            }
        }

        Self { text, line_starts }
    }

    /// Full markup text
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Number of lines
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Check whether the script has no lines
    pub fn is_empty(&self) -> bool {
        self.line_starts.is_empty()
    }

    /// Byte offset where a line starts. `index == line_count()` maps to the
    /// end of the text.
    pub fn line_start(&self, index: usize) -> usize {
        self.line_starts
            .get(index)
            .copied()
            .unwrap_or(self.text.len())
    }

    /// Byte range of a line's content, without its newline or carriage return
    pub fn line_range(&self, index: usize) -> Range<usize> {
        let start = self.line_start(index);
        let mut end = match self.line_starts.get(index + 1) {
            Some(next) => next - 1,
            None if self.text.ends_with('\n') => self.text.len() - 1,
            None => self.text.len(),
        };
        if end > start && self.text.as_bytes()[end - 1] == b'\r' {
            end -= 1;
        }
        start..end.max(start)
    }

    /// Content of a line
    pub fn line(&self, index: usize) -> &str {
        if index >= self.line_count() {
            return "";
        }
        &self.text[self.line_range(index)]
    }

    /// Iterate over all lines
    pub fn lines(&self) -> impl Iterator<Item = &str> + '_ {
        (0..self.line_count()).map(move |index| self.line(index))
    }

    /// Byte range covering whole lines `[begin, end)` including newlines
    pub fn span_range(&self, lines: Range<usize>) -> Range<usize> {
        self.line_start(lines.start)..self.line_start(lines.end)
    }

    /// Map a byte offset to its 0-based line index
    pub fn line_of_offset(&self, offset: usize) -> usize {
        match self.line_starts.binary_search(&offset) {
            Ok(index) => index,
            Err(index) => index.saturating_sub(1),
        }
    }
}

impl fmt::Display for Script {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// A single replacement of a byte range
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    /// Byte range in the snapshot being replaced
    pub range: Range<usize>,

    /// Text written in place of the range
    pub replacement: String,
}

/// Ordered set of non-overlapping edits against one snapshot
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditScript {
    edits: Vec<Edit>,
}

impl EditScript {
    /// Create an empty edit script
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert text at a byte offset
    pub fn insert(&mut self, at: usize, text: impl Into<String>) {
        self.replace(at..at, text);
    }

    /// Replace a byte range
    pub fn replace(&mut self, range: Range<usize>, text: impl Into<String>) {
        self.edits.push(Edit {
            range,
            replacement: text.into(),
        });
    }

    /// Delete a byte range
    pub fn delete(&mut self, range: Range<usize>) {
        self.replace(range, String::new());
    }

    /// Append all edits of another script
    pub fn extend(&mut self, other: EditScript) {
        self.edits.extend(other.edits);
    }

    /// Recorded edits in insertion order
    pub fn edits(&self) -> &[Edit] {
        &self.edits
    }

    pub fn len(&self) -> usize {
        self.edits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    /// Apply all edits to the snapshot text they were computed against.
    ///
    /// Edits are applied in offset order; insertions at the same offset keep
    /// the order they were recorded in.
    pub fn apply(&self, text: &str) -> String {
        let mut ordered: Vec<&Edit> = self.edits.iter().collect();
        ordered.sort_by_key(|edit| (edit.range.start, edit.range.end));

        let added: usize = ordered.iter().map(|edit| edit.replacement.len()).sum();
        let mut output = String::with_capacity(text.len() + added);
        let mut cursor = 0;

        for edit in ordered {
            let start = edit.range.start.clamp(cursor, text.len());
            let end = edit.range.end.clamp(start, text.len());
            output.push_str(&text[cursor..start]);
            output.push_str(&edit.replacement);
            cursor = end;
        }
        output.push_str(&text[cursor..]);
        output
    }

    /// Apply all edits and return a fresh snapshot
    pub fn apply_to(&self, script: &Script) -> Script {
        Script::new(self.apply(script.text()))
    }
}
