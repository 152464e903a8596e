pub mod editor_area;
pub mod header;
pub mod status_bar;

use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block as WidgetBlock, BorderType, Borders, Clear};
use ratatui::Frame;

use quick_links::completion::{Candidate, CompletionSession};
use quick_links::editor::EditorBinding;
use quick_links::error::ErrorPopup;

use crate::app::AppState;

use editor_area::{EditorArea, Viewport};
use header::Header;
use status_bar::StatusBar;

const MAX_POPUP_ITEMS: usize = 10;

pub fn render<E: EditorBinding>(frame: &mut Frame, state: &AppState<E>) {
    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(1),
        Constraint::Length(1),
    ])
    .split(frame.area());

    let header = Header {
        note_title: &state.note_title,
        dirty: state.dirty,
    };
    frame.render_widget(header, chunks[0]);

    let buffer = state.editor.buffer();
    let body = EditorArea {
        buffer,
        trigger: state.session.span().filter(|_| state.session.is_active()),
    };
    frame.render_widget(body, chunks[1]);

    if state.session.popup_visible() {
        let viewport = Viewport::follow_cursor(buffer, chunks[1]);
        let anchor = viewport.cursor_cell(buffer, chunks[1]);
        render_completion_popup(frame, &state.session, anchor, chunks[1]);
    }

    if let Some(err) = &state.error_popup {
        render_error_popup(frame, err, chunks[1]);
    }

    let status = StatusBar {
        hints: &state.hints,
        message: state.status_message.as_deref(),
        popup_open: state.session.popup_visible(),
    };
    frame.render_widget(status, chunks[2]);
}

/// Places the popup under the cursor row, or above it when there is no room.
fn popup_area(anchor: (u16, u16), width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    let (cx, cy) = anchor;
    let x = cx.min(area.x + area.width.saturating_sub(width));
    let below = cy + 1;
    let y = if below + height <= area.y + area.height {
        below
    } else {
        cy.saturating_sub(height).max(area.y)
    };
    Rect::new(x, y, width, height)
}

fn candidate_row(candidate: &Candidate, width: usize) -> (String, String) {
    let detail = candidate.detail().unwrap_or_default();
    let detail_width = detail.chars().count();
    let label_width = width.saturating_sub(detail_width + 1);
    let label: String = candidate.label.chars().take(label_width).collect();
    let padding = width.saturating_sub(label.chars().count() + detail_width);
    (format!("{}{}", label, " ".repeat(padding)), detail)
}

fn render_completion_popup(
    frame: &mut Frame,
    session: &CompletionSession,
    anchor: (u16, u16),
    area: Rect,
) {
    let candidates = session.candidates();
    let max_items = MAX_POPUP_ITEMS.min(candidates.len());
    let widest = candidates
        .iter()
        .map(|c| c.label.chars().count() + c.detail().map_or(0, |d| d.chars().count() + 2))
        .max()
        .unwrap_or(0);
    let popup_width = u16::try_from(widest)
        .unwrap_or(u16::MAX)
        .saturating_add(2)
        .max(30);
    let popup_height = (max_items + 2) as u16; // +2 for borders

    let popup_area = popup_area(anchor, popup_width, popup_height, area);
    frame.render_widget(Clear, popup_area);

    let block = WidgetBlock::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" Link to note ");

    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    // Scroll window: keep selected item visible
    let selected = session.selected();
    let scroll_offset = if selected >= max_items {
        selected - max_items + 1
    } else {
        0
    };

    for (i, candidate) in candidates
        .iter()
        .skip(scroll_offset)
        .take(max_items)
        .enumerate()
    {
        if i as u16 >= inner.height {
            break;
        }
        let is_selected = (i + scroll_offset) == selected;
        let (label_style, detail_style) = if is_selected {
            (
                Style::default().fg(Color::White).bg(Color::DarkGray),
                Style::default().fg(Color::Gray).bg(Color::DarkGray),
            )
        } else if candidate.is_create() {
            (
                Style::default().fg(Color::Green),
                Style::default().fg(Color::DarkGray),
            )
        } else {
            (
                Style::default().fg(Color::Gray),
                Style::default().fg(Color::DarkGray),
            )
        };

        let (label, detail) = candidate_row(candidate, inner.width as usize);
        let line = Line::from(vec![
            Span::styled(label, label_style),
            Span::styled(detail, detail_style),
        ]);
        let line_area = Rect::new(inner.x, inner.y + i as u16, inner.width, 1);
        frame.render_widget(line, line_area);
    }
}

fn render_error_popup(frame: &mut Frame, popup: &ErrorPopup, area: Rect) {
    let popup_width = (area.width * 50 / 100).max(30).min(area.width);
    let inner_width = popup_width.saturating_sub(2) as usize; // -2 for borders

    let msg_lines = wrap_text(&popup.message, inner_width);
    // 1 blank top + msg lines + 1 blank + 1 hint + 1 blank + 1 footer
    let content_height = 1 + msg_lines.len() + 1 + 1 + 1 + 1;
    let popup_height = (content_height + 2).min(area.height as usize) as u16; // +2 borders

    let x = area.x + (area.width.saturating_sub(popup_width)) / 2;
    let y = area.y + (area.height.saturating_sub(popup_height)) / 2;

    let popup_area = Rect::new(x, y, popup_width, popup_height);
    frame.render_widget(Clear, popup_area);

    let title = format!(" ! {} ", popup.title);
    let block = WidgetBlock::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::Red))
        .title(title);

    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let mut row: u16 = 1;

    for line_text in &msg_lines {
        if row >= inner.height.saturating_sub(1) {
            break;
        }
        let line = Line::from(Span::styled(
            line_text.clone(),
            Style::default().fg(Color::White),
        ));
        let line_area = Rect::new(inner.x, inner.y + row, inner.width, 1);
        frame.render_widget(line, line_area);
        row += 1;
    }

    row += 1;

    if row < inner.height.saturating_sub(1) {
        let hint = Line::from(Span::styled(
            popup.hint.clone(),
            Style::default().fg(Color::DarkGray),
        ));
        let hint_area = Rect::new(inner.x, inner.y + row, inner.width, 1);
        frame.render_widget(hint, hint_area);
        row += 1;
    }

    row += 1;

    if row < inner.height {
        let footer = Line::styled(
            "Press any key to close",
            Style::default().fg(Color::DarkGray),
        );
        let footer_area = Rect::new(inner.x, inner.y + row, inner.width, 1);
        frame.render_widget(footer, footer_area);
    }
}

fn wrap_text(text: &str, max_width: usize) -> Vec<String> {
    if max_width == 0 {
        return vec![text.to_string()];
    }
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.is_empty() {
            current = word.to_string();
        } else if current.chars().count() + 1 + word.chars().count() <= max_width {
            current.push(' ');
            current.push_str(word);
        } else {
            lines.push(current);
            current = word.to_string();
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}
