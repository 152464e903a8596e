//! Editor bindings.
//!
//! The completion core works in flat character offsets. Editors address text
//! either the same way or as line/column pairs; a binding translates between
//! the two so the applier stays single-sourced.

use crate::completion::apply::LinkEdit;
use crate::edit_buffer::EditBuffer;

pub trait EditorBinding {
    type Position: Copy + PartialEq + std::fmt::Debug;

    fn buffer(&self) -> &EditBuffer;
    fn buffer_mut(&mut self) -> &mut EditBuffer;

    fn to_offset(&self, pos: Self::Position) -> usize;
    fn to_position(&self, offset: usize) -> Self::Position;

    fn cursor(&self) -> Self::Position {
        self.to_position(self.buffer().cursor)
    }

    fn replace_range(&mut self, from: Self::Position, to: Self::Position, text: &str) {
        let (from, to) = (self.to_offset(from), self.to_offset(to));
        self.buffer_mut().replace_range(from, to, text);
    }

    fn set_selection(&mut self, anchor: Self::Position, head: Self::Position) {
        let (anchor, head) = (self.to_offset(anchor), self.to_offset(head));
        self.buffer_mut().set_selection(anchor, head);
    }

    fn chars(&self) -> &[char] {
        &self.buffer().chars
    }

    fn cursor_offset(&self) -> usize {
        self.buffer().cursor
    }

    /// Performs the replacement in one step, then selects the title if asked.
    fn apply_link_edit(&mut self, edit: &LinkEdit) {
        let from = self.to_position(edit.from);
        let to = self.to_position(edit.to);
        self.replace_range(from, to, &edit.text);

        // positions are resolved against the edited document
        if let Some((start, end)) = edit.selection {
            let anchor = self.to_position(start);
            let head = self.to_position(end);
            self.set_selection(anchor, head);
        }
    }
}

/// Binding for editors that address text by flat character offset.
#[derive(Debug, Clone, PartialEq)]
pub struct OffsetEditor {
    buffer: EditBuffer,
}

impl OffsetEditor {
    pub fn new(buffer: EditBuffer) -> Self {
        Self { buffer }
    }
}

impl EditorBinding for OffsetEditor {
    type Position = usize;

    fn buffer(&self) -> &EditBuffer {
        &self.buffer
    }

    fn buffer_mut(&mut self) -> &mut EditBuffer {
        &mut self.buffer
    }

    fn to_offset(&self, pos: usize) -> usize {
        pos.min(self.buffer.len())
    }

    fn to_position(&self, offset: usize) -> usize {
        offset.min(self.buffer.len())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineCol {
    pub line: usize,
    pub ch: usize,
}

/// Binding for editors that address text by line and column.
#[derive(Debug, Clone, PartialEq)]
pub struct LineColumnEditor {
    buffer: EditBuffer,
}

impl LineColumnEditor {
    pub fn new(buffer: EditBuffer) -> Self {
        Self { buffer }
    }
}

impl EditorBinding for LineColumnEditor {
    type Position = LineCol;

    fn buffer(&self) -> &EditBuffer {
        &self.buffer
    }

    fn buffer_mut(&mut self) -> &mut EditBuffer {
        &mut self.buffer
    }

    fn to_offset(&self, pos: LineCol) -> usize {
        self.buffer.offset_of(pos.line, pos.ch)
    }

    fn to_position(&self, offset: usize) -> LineCol {
        let (line, ch) = self.buffer.line_col(offset);
        LineCol { line, ch }
    }
}
