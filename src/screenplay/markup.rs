/*!
 * Low-level markup helpers shared by the classifier and the paginator.
 */

use once_cell::sync::Lazy;
use regex::Regex;
use unicode_segmentation::UnicodeSegmentation;

// Sentence end: terminal punctuation, optional closing quotes/brackets or
// emphasis marks, then whitespace.
static SENTENCE_END: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"[.!?]+["')\]*_]*[ \t]+"#).unwrap());

static INLINE_BONEYARD: Lazy<Regex> = Lazy::new(|| Regex::new(r"/\*.*?\*/").unwrap());

static INLINE_NOTE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[\[.*?\]\]").unwrap());

/// Empty or whitespace-only, excluding the two-space forced blank
pub fn is_blank(line: &str) -> bool {
    line.trim().is_empty() && !is_forced_blank(line)
}

/// Exactly two spaces: a blank line that stays inside dialogue
pub fn is_forced_blank(line: &str) -> bool {
    line == "  "
}

/// Line opening a `//` comment or a `/*` boneyard block
pub fn is_comment_line(line: &str) -> bool {
    let trimmed = line.trim_start();
    trimmed.starts_with("//") || trimmed.starts_with("/*")
}

/// Scan a line for open/close delimiters and return whether the delimited
/// region is still open at the end of the line.
pub fn scan_delimited(line: &str, open: bool, opener: &str, closer: &str) -> bool {
    let mut open = open;
    let mut rest = line;
    loop {
        let needle = if open { closer } else { opener };
        match rest.find(needle) {
            Some(position) => {
                open = !open;
                rest = &rest[position + needle.len()..];
            }
            None => return open,
        }
    }
}

/// Printable text of a line: inline comments and notes removed, emphasis
/// markers stripped, backslash escapes resolved
pub fn display_text(line: &str) -> String {
    let without_boneyard = INLINE_BONEYARD.replace_all(line, "");
    let without_notes = INLINE_NOTE.replace_all(&without_boneyard, "");

    let mut output = String::with_capacity(without_notes.len());
    let mut escaped = false;
    for c in without_notes.chars() {
        if escaped {
            output.push(c);
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '*' | '_' => {}
            _ => output.push(c),
        }
    }
    output
}

/// Byte offsets where a new sentence starts in `line`, strictly between
/// `floor` and `end`
pub fn sentence_boundaries(line: &str, floor: usize, end: usize) -> Vec<usize> {
    let end = end.min(line.len());
    SENTENCE_END
        .find_iter(&line[..end])
        .map(|m| m.end())
        .filter(|boundary| *boundary > floor && *boundary < end)
        .collect()
}

/// Number of lines `text` occupies when word-wrapped at `width` graphemes.
/// Words longer than the width are hard-broken; empty text takes one line.
pub fn wrapped_line_count(text: &str, width: usize) -> usize {
    let width = width.max(1);
    let mut lines = 0;
    let mut current = 0;

    for word in text.split_whitespace() {
        let mut length = word.graphemes(true).count();

        if current > 0 && current + 1 + length <= width {
            current += 1 + length;
            continue;
        }
        if current > 0 {
            lines += 1;
        }
        while length > width {
            lines += 1;
            length -= width;
        }
        current = length;
    }

    if current > 0 {
        lines += 1;
    }
    lines.max(1)
}
