use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use quick_links::completion::{Accept, SessionEffect, SessionPhase};
use quick_links::editor::EditorBinding;

use super::state::{AppState, Command};

pub(super) fn handle_key<E: EditorBinding>(state: &mut AppState<E>, key: &KeyEvent) -> Option<Command> {
    if state.error_popup.is_some() {
        state.error_popup = None;
        return None;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return handle_control_key(state, key.code);
    }

    if state.session.popup_visible() {
        if let Some(cmd) = handle_popup_key(state, key.code) {
            return cmd;
        }
    }

    // a newline here would end the span the created note is linked into
    if key.code == KeyCode::Enter
        && matches!(state.session.phase(), SessionPhase::Applying { .. })
    {
        return None;
    }

    handle_edit_key(state, key)
}

fn handle_control_key<E: EditorBinding>(state: &mut AppState<E>, code: KeyCode) -> Option<Command> {
    match code {
        KeyCode::Char('q') => {
            state.should_quit = true;
            None
        }
        KeyCode::Char('s') => Some(Command::Save),
        KeyCode::Char('r') => Some(Command::ReloadSettings),
        KeyCode::Char(' ') => {
            let cursor = state.editor.cursor_offset();
            state
                .session
                .request_explicit(state.editor.chars(), cursor)
                .map(Command::Session)
        }
        _ => None,
    }
}

/// `Some(cmd)` when the popup consumed the key.
fn handle_popup_key<E: EditorBinding>(
    state: &mut AppState<E>,
    code: KeyCode,
) -> Option<Option<Command>> {
    match code {
        KeyCode::Up => state.session.select_prev(),
        KeyCode::Down | KeyCode::Tab => state.session.select_next(),
        KeyCode::Esc => state.session.dismiss(),
        KeyCode::Enter => {
            return Some(match state.session.accept(&mut state.editor) {
                Accept::Inserted => {
                    state.dirty = true;
                    None
                }
                Accept::Create(SessionEffect::Notice(info)) => {
                    state.show_error(&info);
                    None
                }
                Accept::Create(effect) => {
                    state.status_message = Some("Creating note...".into());
                    Some(Command::Session(effect))
                }
                Accept::Waiting | Accept::Ignored => None,
            });
        }
        _ => return None,
    }
    Some(None)
}

fn handle_edit_key<E: EditorBinding>(state: &mut AppState<E>, key: &KeyEvent) -> Option<Command> {
    let buffer = state.editor.buffer_mut();
    match key.code {
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::ALT) => {
            buffer.insert_char(c);
            state.dirty = true;
        }
        KeyCode::Enter => {
            buffer.insert_char('\n');
            state.dirty = true;
        }
        KeyCode::Backspace => {
            buffer.delete_back();
            state.dirty = true;
        }
        KeyCode::Delete => {
            buffer.delete_forward();
            state.dirty = true;
        }
        KeyCode::Left => buffer.move_left(),
        KeyCode::Right => buffer.move_right(),
        KeyCode::Up => buffer.move_up(),
        KeyCode::Down => buffer.move_down(),
        KeyCode::Home => buffer.move_line_start(),
        KeyCode::End => buffer.move_line_end(),
        KeyCode::Esc => {
            state.session.dismiss();
            return None;
        }
        _ => return None,
    }

    state.status_message = None;
    let cursor = state.editor.cursor_offset();
    state
        .session
        .on_edit(state.editor.chars(), cursor)
        .map(Command::Session)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::test_helpers::*;
    use quick_links::completion::{Candidate, CompletionList};

    #[test]
    fn typing_marker_and_prefix_issues_query() {
        let mut state = test_state("");
        let mut last = None;
        for c in "see @@pl".chars() {
            last = handle_key(&mut state, &key(KeyCode::Char(c)));
        }
        match last {
            Some(Command::Session(SessionEffect::Query { prefix, explicit, .. })) => {
                assert_eq!(prefix, "pl");
                assert!(!explicit);
            }
            other => panic!("Expected query, got {:?}", other),
        }
        assert!(state.dirty);
        assert_eq!(state.editor.buffer().text(), "see @@pl");
    }

    #[test]
    fn bare_marker_waits_for_prefix() {
        let mut state = test_state("");
        type_text(&mut state, "@@");
        assert_eq!(state.session.phase(), &SessionPhase::Triggered);
    }

    #[test]
    fn ctrl_space_requests_explicit_completion() {
        let mut state = test_state("");
        type_text(&mut state, "@@");
        let cmd = handle_key(&mut state, &ctrl(' '));
        assert!(matches!(
            cmd,
            Some(Command::Session(SessionEffect::Query { explicit: true, .. }))
        ));
    }

    #[test]
    fn popup_navigation_and_enter_inserts_link() {
        let mut state = test_state("");
        type_text(&mut state, "@@pl");
        let seq = state.session.query_seq().current();
        assert!(state
            .session
            .on_results(seq, list(&[("n1", "Plan"), ("n2", "Plot")])));

        handle_key(&mut state, &key(KeyCode::Down));
        assert_eq!(state.session.selected(), 1);
        handle_key(&mut state, &key(KeyCode::Up));
        handle_key(&mut state, &key(KeyCode::Tab));
        assert_eq!(state.session.selected(), 1);

        let cmd = handle_key(&mut state, &key(KeyCode::Enter));
        assert_eq!(cmd, None);
        assert_eq!(state.editor.buffer().text(), "[Plot](:/n2)");
        assert!(!state.session.is_active());
    }

    #[test]
    fn enter_on_new_note_asks_for_creation() {
        let mut state = test_state("");
        type_text(&mut state, "@@draft");
        let seq = state.session.query_seq().current();
        let mut l = list(&[]);
        l.candidates.push(Candidate::new_note("draft"));
        state.session.on_results(seq, l);

        let cmd = handle_key(&mut state, &key(KeyCode::Enter));
        assert!(matches!(
            cmd,
            Some(Command::Session(SessionEffect::CreateNote { todo: false, .. }))
        ));
        // text untouched until the host answers
        assert_eq!(state.editor.buffer().text(), "@@draft");
    }

    #[test]
    fn enter_while_new_prefix_is_querying_keeps_typed_text() {
        let mut state = test_state("");
        type_text(&mut state, "@@draft");
        let seq = state.session.query_seq().current();
        let mut l = list(&[]);
        l.candidates.push(Candidate::new_note("draft"));
        state.session.on_results(seq, l);
        type_text(&mut state, "s");
        state.dirty = false;

        assert_eq!(handle_key(&mut state, &key(KeyCode::Enter)), None);
        assert_eq!(state.editor.buffer().text(), "@@drafts");
        assert_eq!(state.session.phase(), &SessionPhase::Querying);
        assert!(!state.dirty);
    }

    #[test]
    fn enter_during_note_creation_is_swallowed() {
        let mut state = test_state("");
        type_text(&mut state, "@@draft");
        let seq = state.session.query_seq().current();
        let mut l = list(&[]);
        l.candidates.push(Candidate::new_note("draft"));
        state.session.on_results(seq, l);
        handle_key(&mut state, &key(KeyCode::Enter));
        assert!(matches!(state.session.phase(), SessionPhase::Applying { .. }));

        assert_eq!(handle_key(&mut state, &key(KeyCode::Enter)), None);
        assert_eq!(state.editor.buffer().text(), "@@draft");
        assert!(matches!(state.session.phase(), SessionPhase::Applying { .. }));
    }

    #[test]
    fn esc_dismisses_popup() {
        let mut state = test_state("");
        type_text(&mut state, "@@pl");
        let seq = state.session.query_seq().current();
        state.session.on_results(seq, list(&[("n1", "Plan")]));

        handle_key(&mut state, &key(KeyCode::Esc));
        assert!(!state.session.is_active());
        assert_eq!(state.editor.buffer().text(), "@@pl");
    }

    #[test]
    fn enter_without_popup_inserts_newline() {
        let mut state = test_state("ab");
        handle_key(&mut state, &key(KeyCode::Enter));
        assert_eq!(state.editor.buffer().text(), "ab\n");
    }

    #[test]
    fn typing_a_close_char_ends_the_session() {
        let mut state = test_state("");
        type_text(&mut state, "@@pl");
        assert!(state.session.is_active());
        handle_key(&mut state, &key(KeyCode::Char(')')));
        assert!(!state.session.is_active());
    }

    #[test]
    fn control_keys() {
        let mut state = test_state("");
        assert_eq!(handle_key(&mut state, &ctrl('s')), Some(Command::Save));
        assert_eq!(handle_key(&mut state, &ctrl('r')), Some(Command::ReloadSettings));
        assert!(!state.should_quit);
        handle_key(&mut state, &ctrl('q'));
        assert!(state.should_quit);
    }

    #[test]
    fn any_key_closes_error_popup_first() {
        let mut state = test_state("");
        state.show_error(&quick_links::error::ErrorInfo::Save("offline".into()));
        handle_key(&mut state, &key(KeyCode::Char('x')));
        assert!(state.error_popup.is_none());
        assert_eq!(state.editor.buffer().text(), "");
    }

    #[test]
    fn stale_results_do_not_replace_newer_prefix() {
        let mut state = test_state("");
        type_text(&mut state, "@@p");
        let first = state.session.query_seq().current();
        type_text(&mut state, "l");

        assert!(!state.session.on_results(first, list(&[("n1", "Pizza")])));
        assert!(state.session.candidates().is_empty());
        assert!(state.session.on_results(
            state.session.query_seq().current(),
            CompletionList::default()
        ));
    }
}
