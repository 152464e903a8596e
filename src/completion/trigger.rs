pub const MARKER: &str = "@@";
const MARKER_LEN: usize = 2;

/// Characters that close the completion popup when typed.
pub const CLOSE_CHARS: &str = "()[]{};:>,";

// How far back from the cursor a marker is looked for.
const MAX_LOOKBEHIND: usize = 250;

/// Document range replaced when a candidate is applied: from the first `@` of
/// the marker up to the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriggerSpan {
    pub start: usize,
    pub end: usize,
}

impl TriggerSpan {
    /// Offset where the typed prefix begins (just past the marker).
    pub fn prefix_start(&self) -> usize {
        self.start + MARKER_LEN
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.end == self.start
    }

    pub fn prefix(&self, chars: &[char]) -> String {
        chars[self.prefix_start()..self.end].iter().collect()
    }
}

pub fn is_terminator(ch: char) -> bool {
    ch == '\n' || CLOSE_CHARS.contains(ch)
}

/// Finds the live trigger span ending at `cursor`, if any.
///
/// The run of non-terminator characters immediately before the cursor is
/// scanned and its leftmost `@@` starts the span, so `@@meeting notes` keeps
/// matching as the user types spaces, while `@@a, b` does not.
pub fn detect_trigger(chars: &[char], cursor: usize) -> Option<TriggerSpan> {
    if cursor > chars.len() || cursor < MARKER_LEN {
        return None;
    }

    let mut run_start = cursor;
    while run_start > 0
        && cursor - run_start < MAX_LOOKBEHIND
        && !is_terminator(chars[run_start - 1])
    {
        run_start -= 1;
    }

    (run_start..=cursor - MARKER_LEN)
        .find(|&i| chars[i] == '@' && chars[i + 1] == '@')
        .map(|start| TriggerSpan { start, end: cursor })
}
