//! Terminal input handling.

use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};

use crate::app::App;

/// Poll for events with a timeout
pub fn poll_event(timeout: Duration) -> Result<Option<Event>> {
    if event::poll(timeout)? {
        Ok(Some(event::read()?))
    } else {
        Ok(None)
    }
}

/// Handle a key event
pub fn handle_key_event(app: &mut App, key: KeyEvent) {
    // If help is shown, any key closes it
    if app.show_help {
        app.show_help = false;
        return;
    }

    // If the advice input is active, keystrokes go into the draft
    if app.advice_active {
        handle_advice_input(app, key);
        return;
    }

    match key.code {
        // Quit
        KeyCode::Char('q') => app.quit(),

        // Refresh now (same fetch the periodic trigger runs)
        KeyCode::Char('r') => app.request_refresh(),

        // Patient selection
        KeyCode::Right | KeyCode::Char('l') | KeyCode::Tab => app.select_next_patient(),
        KeyCode::Left | KeyCode::Char('h') | KeyCode::BackTab => app.select_prev_patient(),

        // Start typing advice (gated on the current verdict)
        KeyCode::Char('a') | KeyCode::Char('i') => app.start_advice(),

        // Help
        KeyCode::Char('?') => app.toggle_help(),

        _ => {}
    }
}

/// Handle key input while the advice draft is active
fn handle_advice_input(app: &mut App, key: KeyEvent) {
    match key.code {
        // Submit; misuse rejections become a status message, no network call
        KeyCode::Enter => {
            if let Err(e) = app.submit_advice() {
                app.set_status_message(e.to_string());
            }
        }

        // Leave input mode (draft is kept)
        KeyCode::Esc => app.cancel_advice(),

        // Clear the draft
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.advice_text.clear();
        }

        // Backspace
        KeyCode::Backspace => app.advice_pop(),

        // Type characters
        KeyCode::Char(c) => app.advice_push(c),

        _ => {}
    }
}
