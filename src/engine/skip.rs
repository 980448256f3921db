//! Positions of a snippet that are auto-advanced instead of typed.
//!
//! Two kinds of characters never need a keystroke: the leading indentation of
//! a line, and every character of a full-line `//` comment (its terminating
//! newline included). A `//` that follows code on the same line is typed like
//! anything else.

fn is_indent(ch: char) -> bool {
    ch == ' ' || ch == '\t'
}

/// Decide whether `text[i]` is a skip position.
///
/// Pure and O(line length). Positions past the end are never skipped.
pub fn is_skipped(text: &[char], i: usize) -> bool {
    if i >= text.len() {
        return false;
    }

    // First column indentation needs no line scan.
    if (i == 0 || text[i - 1] == '\n') && is_indent(text[i]) {
        return true;
    }

    let mut line_start = i;
    while line_start > 0 && text[line_start - 1] != '\n' {
        line_start -= 1;
    }

    let mut first_blank = line_start;
    while first_blank < text.len() && is_indent(text[first_blank]) {
        first_blank += 1;
    }

    if i < first_blank {
        return true;
    }

    starts_comment(text, first_blank)
}

fn starts_comment(text: &[char], at: usize) -> bool {
    at + 1 < text.len() && text[at] == '/' && text[at + 1] == '/'
}

/// Skip flags for every position of a text, built in one pass.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SkipMask {
    flags: Vec<bool>,
}

impl SkipMask {
    pub fn new(text: &[char]) -> Self {
        let mut flags = vec![false; text.len()];
        let mut line_start = 0;

        while line_start < text.len() {
            let mut line_end = line_start;
            while line_end < text.len() && text[line_end] != '\n' {
                line_end += 1;
            }

            let mut first_blank = line_start;
            while first_blank < line_end && is_indent(text[first_blank]) {
                first_blank += 1;
            }

            if starts_comment(text, first_blank) {
                // The newline closing a comment line is skipped with it.
                let upto = (line_end + 1).min(text.len());
                flags[line_start..upto].fill(true);
            } else {
                flags[line_start..first_blank].fill(true);
            }

            line_start = line_end + 1;
        }

        Self { flags }
    }

    pub fn is_skipped(&self, i: usize) -> bool {
        self.flags.get(i).copied().unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.flags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }

    /// First position at or after `from` that needs a keystroke, or the text
    /// length if none is left.
    pub fn next_typeable(&self, from: usize) -> usize {
        let mut i = from;
        while i < self.flags.len() && self.flags[i] {
            i += 1;
        }
        i
    }

    /// Last position strictly before `before` that needs a keystroke.
    pub fn prev_typeable(&self, before: usize) -> Option<usize> {
        (0..before.min(self.flags.len()))
            .rev()
            .find(|&i| !self.flags[i])
    }

    /// Number of positions that need a keystroke.
    pub fn typeable_count(&self) -> usize {
        self.flags.iter().filter(|&&f| !f).count()
    }
}
