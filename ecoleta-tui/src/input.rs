use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::{App, Focus, POSITION_STEP, Step};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Action {
    None,
    Quit,
    /// Validate the form and run `service.register`(...)
    Submit,
    /// Re-issue every load whose last attempt failed
    ReloadFailed,
}

pub(crate) fn handle_key_event(key: KeyEvent, app: &mut App) -> Action {
    use KeyCode::{BackTab, Backspace, Char, Down, Enter, Esc, Left, Right, Tab, Up};

    // Global shortcuts
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            Char('c') => Action::Quit,
            Char('r') => Action::ReloadFailed,
            _ => Action::None,
        };
    }
    match key.code {
        Esc => return Action::Quit,
        Tab => {
            app.focus = app.focus.next();
            return Action::None;
        }
        BackTab => {
            app.focus = app.focus.prev();
            return Action::None;
        }
        _ => {}
    }

    let mut action = Action::None;

    match app.focus {
        Focus::Counter => match key.code {
            Enter | Char(' ' | '+') => app.increment_counter(),
            Down => app.focus = app.focus.next(),
            _ => {}
        },

        Focus::Name | Focus::Email | Focus::Whatsapp => match key.code {
            Up => app.focus = app.focus.prev(),
            Down | Enter => app.focus = app.focus.next(),
            Backspace => {
                if let Some(text) = app.focused_text_mut() {
                    text.pop();
                }
            }
            Char(character) => {
                if !key.modifiers.contains(KeyModifiers::ALT)
                    && let Some(text) = app.focused_text_mut()
                {
                    text.push(character);
                }
            }
            _ => {}
        },

        Focus::Position => match key.code {
            Up => app.nudge_position(POSITION_STEP, 0.0),
            Down => app.nudge_position(-POSITION_STEP, 0.0),
            Left => app.nudge_position(0.0, -POSITION_STEP),
            Right => app.nudge_position(0.0, POSITION_STEP),
            _ => {}
        },

        Focus::Province => match key.code {
            Up | Char('k') => app.step_province(Step::Prev),
            Down | Char('j') => app.step_province(Step::Next),
            _ => {}
        },

        Focus::City => match key.code {
            Up | Char('k') => app.step_city(Step::Prev),
            Down | Char('j') => app.step_city(Step::Next),
            _ => {}
        },

        Focus::Items => match key.code {
            Left | Up | Char('h') => app.move_item_cursor(Step::Prev),
            Right | Down | Char('l') => app.move_item_cursor(Step::Next),
            Enter | Char(' ') => app.toggle_current_item(),
            _ => {}
        },

        Focus::Submit => {
            if matches!(key.code, Enter | Char(' ')) {
                action = Action::Submit;
            }
        }
    }
    action
}
