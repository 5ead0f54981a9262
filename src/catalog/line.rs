/*!
 * Line classification for gettext catalogs.
 *
 * Classification only needs the physical line and whether a `msgid` block is
 * currently open. It never fails: anything unrecognised is `Other` and is
 * copied through untouched by the rewriter.
 */

/// Empty source marker opening a multi-line `msgid`
pub const EMPTY_SOURCE: &str = "msgid \"\"";

/// Empty translation placeholder closing a `msgid` block
pub const EMPTY_TARGET: &str = "msgstr \"\"";

/// Review flag written by the init and merge tools
pub const FUZZY_MARKER: &str = "#, fuzzy";

/// Keyword and opening quote of a source declaration
pub const SOURCE_PREFIX: &str = "msgid \"";

/// Category of one physical catalog line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// `msgid ""` or `msgid "<text>"`
    StartOfSource,
    /// Any line seen while a `msgid` block is open
    Continuation,
    /// The `msgstr ""` placeholder
    StartOfTarget,
    /// The `#, fuzzy` annotation
    FuzzyMarker,
    /// Everything else
    Other,
}

/// Split a line into its content and its terminator (`"\r\n"`, `"\n"` or `""`)
pub fn split_terminator(line: &str) -> (&str, &str) {
    if let Some(body) = line.strip_suffix("\r\n") {
        (body, "\r\n")
    } else if let Some(body) = line.strip_suffix('\n') {
        (body, "\n")
    } else {
        (line, "")
    }
}

/// Classify `line` given whether a source block is open
pub fn classify(line: &str, collecting: bool) -> LineKind {
    let (body, _) = split_terminator(line);

    if collecting {
        return if body == EMPTY_TARGET {
            LineKind::StartOfTarget
        } else {
            LineKind::Continuation
        };
    }

    if body == EMPTY_SOURCE || body.starts_with(SOURCE_PREFIX) {
        LineKind::StartOfSource
    } else if body == FUZZY_MARKER {
        LineKind::FuzzyMarker
    } else if body == EMPTY_TARGET {
        LineKind::StartOfTarget
    } else {
        LineKind::Other
    }
}

/// Whether a line carries a `msgid*` or `msgstr*` keyword
///
/// Inside an open block such a line means the previous entry was never closed
/// by an empty `msgstr ""`, e.g. a plural or already translated entry.
pub fn has_entry_keyword(line: &str) -> bool {
    let body = split_terminator(line).0.trim_start();
    body.starts_with("msgid") || body.starts_with("msgstr")
}
