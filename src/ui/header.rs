use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Widget;

pub struct Header<'a> {
    pub note_title: &'a str,
    pub dirty: bool,
}

impl<'a> Widget for Header<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let title = Span::styled(
            " quick-links ",
            Style::default()
                .fg(Color::White)
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        );

        let note = Span::styled(
            format!(" {} ", self.note_title),
            Style::default().fg(Color::Cyan).bg(Color::DarkGray),
        );

        let marker = if self.dirty { "[modified] " } else { "" };
        let spacer_len = area.width.saturating_sub(
            title.width() as u16 + note.width() as u16 + marker.len() as u16,
        );
        let bg = Style::default().bg(Color::DarkGray);
        let spacer = Span::styled(" ".repeat(spacer_len as usize), bg);
        let marker = Span::styled(marker, Style::default().fg(Color::Yellow).bg(Color::DarkGray));

        let line = Line::from(vec![title, note, spacer, marker]);
        line.render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn content(buf: &Buffer, width: u16) -> String {
        (0..width)
            .map(|x| {
                buf.cell((x, 0))
                    .unwrap()
                    .symbol()
                    .chars()
                    .next()
                    .unwrap_or(' ')
            })
            .collect()
    }

    #[test]
    fn header_renders_note_title() {
        let area = Rect::new(0, 0, 60, 1);
        let mut buf = Buffer::empty(area);

        Header {
            note_title: "Journal",
            dirty: false,
        }
        .render(area, &mut buf);

        let content = content(&buf, area.width);
        assert!(content.contains("quick-links"));
        assert!(content.contains("Journal"));
        assert!(!content.contains("modified"));
    }

    #[test]
    fn header_marks_unsaved_changes() {
        let area = Rect::new(0, 0, 60, 1);
        let mut buf = Buffer::empty(area);

        Header {
            note_title: "Journal",
            dirty: true,
        }
        .render(area, &mut buf);

        assert!(content(&buf, area.width).contains("[modified]"));
    }
}
