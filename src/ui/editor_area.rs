use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Widget;

use quick_links::completion::TriggerSpan;
use quick_links::edit_buffer::EditBuffer;

/// First visible line and column, chosen so the cursor stays on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub top: usize,
    pub left: usize,
}

impl Viewport {
    pub fn follow_cursor(buffer: &EditBuffer, area: Rect) -> Self {
        let (line, col) = buffer.line_col(buffer.cursor);
        let height = (area.height as usize).max(1);
        let width = (area.width as usize).max(1);
        Self {
            top: line.saturating_sub(height - 1),
            left: col.saturating_sub(width - 1),
        }
    }

    /// Screen cell of the cursor.
    pub fn cursor_cell(&self, buffer: &EditBuffer, area: Rect) -> (u16, u16) {
        let (line, col) = buffer.line_col(buffer.cursor);
        (
            area.x + (col - self.left) as u16,
            area.y + (line - self.top) as u16,
        )
    }
}

pub struct EditorArea<'a> {
    pub buffer: &'a EditBuffer,
    /// Live `@@` span, underlined while completion is active.
    pub trigger: Option<TriggerSpan>,
}

impl<'a> EditorArea<'a> {
    fn style_at(&self, offset: usize, selection: Option<(usize, usize)>) -> Style {
        let base = Style::default().fg(Color::Gray);
        if offset == self.buffer.cursor {
            return Style::default().fg(Color::Black).bg(Color::White);
        }
        if selection.is_some_and(|(s, e)| offset >= s && offset < e) {
            return Style::default().fg(Color::White).bg(Color::Blue);
        }
        if self
            .trigger
            .is_some_and(|t| offset >= t.start && offset < t.end)
        {
            return base.fg(Color::Cyan).add_modifier(Modifier::UNDERLINED);
        }
        base
    }

    fn render_line(
        &self,
        line_start: usize,
        line_chars: &[char],
        left: usize,
        width: usize,
    ) -> Line<'static> {
        let selection = self.buffer.selection();
        let mut spans: Vec<Span<'static>> = Vec::new();
        let mut run = String::new();
        let mut run_style: Option<Style> = None;

        let visible_end = (left + width).min(line_chars.len() + 1);
        for col in left..visible_end {
            let offset = line_start + col;
            // one past the last char is where an end-of-line cursor is drawn
            let ch = line_chars.get(col).copied().unwrap_or(' ');
            if col == line_chars.len() && offset != self.buffer.cursor {
                break;
            }
            let style = self.style_at(offset, selection);
            if run_style.is_some_and(|s| s != style) {
                spans.push(Span::styled(
                    std::mem::take(&mut run),
                    run_style.unwrap_or_default(),
                ));
            }
            run_style = Some(style);
            run.push(ch);
        }
        if !run.is_empty() {
            spans.push(Span::styled(run, run_style.unwrap_or_default()));
        }
        Line::from(spans)
    }
}

impl<'a> Widget for EditorArea<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let viewport = Viewport::follow_cursor(self.buffer, area);
        let chars = &self.buffer.chars;
        let width = area.width as usize;

        let mut line_start = 0;
        for (line_idx, line) in chars.split(|c| *c == '\n').enumerate() {
            if line_idx >= viewport.top {
                let row = line_idx - viewport.top;
                if row >= area.height as usize {
                    break;
                }
                let rendered = self.render_line(line_start, line, viewport.left, width);
                let line_area = Rect::new(area.x, area.y + row as u16, area.width, 1);
                rendered.render(line_area, buf);
            }
            line_start += line.len() + 1;
        }
    }
}
