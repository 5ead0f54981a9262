/*!
 * Reconstruction of the logical source text of one `msgid` block.
 */

use super::line::{split_terminator, EMPTY_SOURCE};

/// Collects the unescaped source text while a `msgid` block is open
#[derive(Debug, Default)]
pub struct SourceAccumulator {
    collecting: bool,
    buffer: String,
}

impl SourceAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a `msgid` block is open
    pub fn is_collecting(&self) -> bool {
        self.collecting
    }

    /// Source text gathered so far; empty when not collecting
    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    /// Open a block from a `msgid` line
    pub fn start(&mut self, line: &str) {
        let (body, _) = split_terminator(line);
        self.collecting = true;
        self.buffer.clear();

        if body != EMPTY_SOURCE {
            let declared = body.strip_prefix("msgid").unwrap_or(body);
            self.buffer.push_str(&quoted_text(declared));
        }
    }

    /// Fold one continuation line into the buffer
    ///
    /// A `\n` escape ending the line and the physical line break together
    /// become a single space between words, unless the text already has
    /// whitespace at the seam. `\n` escapes elsewhere are kept as written.
    pub fn push_continuation(&mut self, line: &str) {
        let (body, _) = split_terminator(line);
        let text = quoted_text(body);
        let piece = strip_line_break_escape(&text);
        if piece.is_empty() {
            return;
        }

        let needs_space = !self.buffer.is_empty()
            && !self.buffer.ends_with(char::is_whitespace)
            && !piece.starts_with(char::is_whitespace);
        if needs_space {
            self.buffer.push(' ');
        }
        self.buffer.push_str(piece);
    }

    /// Close the block, returning its text and resetting to idle
    pub fn finish(&mut self) -> String {
        self.collecting = false;
        std::mem::take(&mut self.buffer)
    }
}

/// Text of a quoted catalog string: trimmed, unquoted and unescaped
fn quoted_text(raw: &str) -> String {
    let trimmed = raw.trim();
    let inner = trimmed.strip_prefix('"').unwrap_or(trimmed);
    let inner = inner.strip_suffix('"').unwrap_or(inner);

    unescape(inner)
}

/// Drop one trailing `\n` escape, leaving an escaped backslash before `n` alone
fn strip_line_break_escape(text: &str) -> &str {
    if let Some(prefix) = text.strip_suffix("\\n") {
        let backslashes = prefix.chars().rev().take_while(|c| *c == '\\').count();
        if backslashes % 2 == 0 {
            return prefix;
        }
    }
    text
}

/// Undo catalog quote escaping
///
/// Only `\"` becomes `"`. Every other escape, `\n` included, is kept as
/// written so that re-escaping only has to deal with quotes.
pub fn unescape(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut chars = text.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            result.push(c);
            continue;
        }
        match chars.next() {
            Some('"') => result.push('"'),
            Some(other) => {
                result.push('\\');
                result.push(other);
            }
            None => result.push('\\'),
        }
    }

    result
}
