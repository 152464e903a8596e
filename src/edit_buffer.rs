/// Character buffer with a cursor and an optional selection.
///
/// All offsets are character indices, never byte indices.
#[derive(Debug, Clone, PartialEq)]
pub struct EditBuffer {
    pub chars: Vec<char>,
    pub cursor: usize,
    /// Anchor of the active selection; the head is always `cursor`.
    pub anchor: Option<usize>,
}

impl EditBuffer {
    pub fn new(text: &str) -> Self {
        let chars: Vec<char> = text.chars().collect();
        let cursor = chars.len();
        Self {
            chars,
            cursor,
            anchor: None,
        }
    }

    pub fn new_empty() -> Self {
        Self {
            chars: Vec::new(),
            cursor: 0,
            anchor: None,
        }
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn text(&self) -> String {
        self.chars.iter().collect()
    }

    pub fn slice(&self, start: usize, end: usize) -> String {
        let end = end.min(self.chars.len());
        let start = start.min(end);
        self.chars[start..end].iter().collect()
    }

    /// Selected range as `(start, end)` with `start <= end`.
    pub fn selection(&self) -> Option<(usize, usize)> {
        let anchor = self.anchor?;
        if anchor == self.cursor {
            return None;
        }
        Some((anchor.min(self.cursor), anchor.max(self.cursor)))
    }

    pub fn selected_text(&self) -> Option<String> {
        self.selection().map(|(start, end)| self.slice(start, end))
    }

    pub fn set_selection(&mut self, anchor: usize, head: usize) {
        let len = self.chars.len();
        self.anchor = Some(anchor.min(len));
        self.cursor = head.min(len);
    }

    pub fn clear_selection(&mut self) {
        self.anchor = None;
    }

    fn delete_selection(&mut self) -> bool {
        match self.selection() {
            Some((start, end)) => {
                self.chars.drain(start..end);
                self.cursor = start;
                self.anchor = None;
                true
            }
            None => {
                self.anchor = None;
                false
            }
        }
    }

    /// Inserts at the cursor, replacing the selection if there is one.
    pub fn insert_char(&mut self, ch: char) {
        self.delete_selection();
        self.chars.insert(self.cursor, ch);
        self.cursor += 1;
    }

    pub fn delete_back(&mut self) {
        if self.delete_selection() {
            return;
        }
        if self.cursor > 0 {
            self.cursor -= 1;
            self.chars.remove(self.cursor);
        }
    }

    pub fn delete_forward(&mut self) {
        if self.delete_selection() {
            return;
        }
        if self.cursor < self.chars.len() {
            self.chars.remove(self.cursor);
        }
    }

    pub fn move_left(&mut self) {
        self.anchor = None;
        if self.cursor > 0 {
            self.cursor -= 1;
        }
    }

    pub fn move_right(&mut self) {
        self.anchor = None;
        if self.cursor < self.chars.len() {
            self.cursor += 1;
        }
    }

    pub fn move_line_start(&mut self) {
        self.anchor = None;
        self.cursor = self.line_start(self.cursor);
    }

    pub fn move_line_end(&mut self) {
        self.anchor = None;
        self.cursor = self.line_end(self.cursor);
    }

    pub fn move_up(&mut self) {
        self.anchor = None;
        let current_line_start = self.line_start(self.cursor);

        if current_line_start == 0 {
            self.cursor = 0;
            return;
        }

        let col = self.cursor - current_line_start;
        let prev_line_end = current_line_start - 1; // the \n before current line
        let prev_line_start = self.line_start(prev_line_end);
        let prev_line_len = prev_line_end - prev_line_start;
        self.cursor = prev_line_start + col.min(prev_line_len);
    }

    pub fn move_down(&mut self) {
        self.anchor = None;
        let current_line_start = self.line_start(self.cursor);
        let current_line_end = self.line_end(self.cursor);

        if current_line_end >= self.chars.len() {
            self.cursor = self.chars.len();
            return;
        }

        let col = self.cursor - current_line_start;
        let next_line_start = current_line_end + 1;
        let next_line_len = self.line_end(next_line_start) - next_line_start;
        self.cursor = next_line_start + col.min(next_line_len);
    }

    /// Replaces `[start, end)` and leaves the cursor after the inserted text.
    pub fn replace_range(&mut self, start: usize, end: usize, replacement: &str) {
        let new_chars: Vec<char> = replacement.chars().collect();
        let new_len = new_chars.len();
        self.chars.splice(start..end, new_chars);
        self.cursor = start + new_len;
        self.anchor = None;
    }

    fn line_start(&self, offset: usize) -> usize {
        self.chars[..offset]
            .iter()
            .rposition(|&c| c == '\n')
            .map(|p| p + 1)
            .unwrap_or(0)
    }

    fn line_end(&self, offset: usize) -> usize {
        self.chars[offset..]
            .iter()
            .position(|&c| c == '\n')
            .map(|p| offset + p)
            .unwrap_or(self.chars.len())
    }

    /// Zero-based `(line, column)` of a character offset.
    pub fn line_col(&self, offset: usize) -> (usize, usize) {
        let offset = offset.min(self.chars.len());
        let line = self.chars[..offset].iter().filter(|&&c| c == '\n').count();
        (line, offset - self.line_start(offset))
    }

    /// Character offset of a `(line, column)` pair, clamped to the document
    /// and to the line's length.
    pub fn offset_of(&self, line: usize, col: usize) -> usize {
        let mut start = 0;
        for _ in 0..line {
            match self.chars[start..].iter().position(|&c| c == '\n') {
                Some(p) => start += p + 1,
                None => return self.chars.len(),
            }
        }
        let line_len = self.line_end(start) - start;
        start + col.min(line_len)
    }
}
