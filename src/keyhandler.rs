//! Input handling for thermoconv
//!
//! Routes crossterm key events to whichever layer has focus:
//! - the open dialog, which only waits to be dismissed
//! - the overflow menu
//! - the converter form (text input and unit selector)

use std::time::Instant;

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use log::debug;

use crate::App;
use crate::commands::{
    Overlay, activate_selected, close_overlay, menu_next, menu_previous, open_menu,
};

/// Dispatches a terminal event to the focused layer
pub fn handle_input_event(app: &mut App, event: &Event, now: Instant) {
    let Event::Key(key_event) = event else {
        return; // Ignore non-keyboard events
    };
    if key_event.kind == KeyEventKind::Release {
        return;
    }

    if is_ctrl(key_event, 'c') {
        app.should_quit = true;
        return;
    }

    match app.overlay {
        Overlay::Dialog(_) => handle_dialog_keys(app, key_event.code),
        Overlay::Menu { .. } => handle_menu_keys(app, key_event.code),
        Overlay::None => handle_form_keys(app, key_event, event, now),
    }
}

fn is_ctrl(key_event: &KeyEvent, c: char) -> bool {
    key_event.modifiers.contains(KeyModifiers::CONTROL) && key_event.code == KeyCode::Char(c)
}

fn handle_dialog_keys(app: &mut App, key_code: KeyCode) {
    if matches!(key_code, KeyCode::Enter | KeyCode::Esc) {
        close_overlay(app);
    }
}

fn handle_menu_keys(app: &mut App, key_code: KeyCode) {
    match key_code {
        KeyCode::Up => menu_previous(app),
        KeyCode::Down => menu_next(app),
        KeyCode::Enter => activate_selected(app),
        KeyCode::Esc | KeyCode::F(2) => close_overlay(app),
        _ => {}
    }
}

fn handle_form_keys(app: &mut App, key_event: &KeyEvent, event: &Event, now: Instant) {
    if is_ctrl(key_event, 'o') {
        open_menu(app);
        return;
    }

    match key_event.code {
        // Unit selector
        KeyCode::Up | KeyCode::BackTab => app.converter.select_previous_unit(now),
        KeyCode::Down | KeyCode::Tab => app.converter.select_next_unit(now),

        KeyCode::Enter => {
            app.converter.recompute_now();
            debug!(
                "Enter pressed, canonical value now {:.2} °C",
                app.converter.reading().celsius()
            );
        }
        KeyCode::F(2) => open_menu(app),
        KeyCode::Esc => app.should_quit = true,

        // Everything else edits the text field
        _ => {
            app.converter.handle_input_event(event, now);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::Dialog;
    use crate::config::AppConfig;
    use crate::temperature::Unit;
    use std::time::Duration;

    fn press(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn ctrl(c: char) -> Event {
        Event::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL))
    }

    fn type_text(app: &mut App, text: &str, now: Instant) {
        for c in text.chars() {
            handle_input_event(app, &press(KeyCode::Char(c)), now);
        }
    }

    #[test]
    fn test_typing_then_waiting_updates_values() {
        let mut app = App::new(&AppConfig::default());
        let now = Instant::now();
        type_text(&mut app, "212", now);
        handle_input_event(&mut app, &press(KeyCode::Down), now);
        handle_input_event(&mut app, &press(KeyCode::Down), now);
        assert_eq!(app.converter.selected_unit(), Unit::Fahrenheit);

        assert!(app.converter.on_tick(now + Duration::from_millis(1000)));
        assert!((app.converter.reading().celsius() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_enter_recomputes_immediately() {
        let mut app = App::new(&AppConfig::default());
        let now = Instant::now();
        type_text(&mut app, "33", now);
        handle_input_event(&mut app, &press(KeyCode::BackTab), now);
        handle_input_event(&mut app, &press(KeyCode::BackTab), now);
        handle_input_event(&mut app, &press(KeyCode::BackTab), now);
        assert_eq!(app.converter.selected_unit(), Unit::Newton);

        handle_input_event(&mut app, &press(KeyCode::Enter), now);
        assert!(!app.converter.is_pending());
        assert!((app.converter.reading().celsius() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_menu_keys() {
        let mut app = App::new(&AppConfig::default());
        let now = Instant::now();

        handle_input_event(&mut app, &ctrl('o'), now);
        assert_eq!(app.overlay, Overlay::Menu { selected: 0 });

        // Keys go to the menu, not the input field
        handle_input_event(&mut app, &press(KeyCode::Char('5')), now);
        assert_eq!(app.converter.input_value(), "");

        handle_input_event(&mut app, &press(KeyCode::Up), now);
        handle_input_event(&mut app, &press(KeyCode::Enter), now);
        assert!(app.night_mode);
        assert_eq!(app.overlay, Overlay::None);

        handle_input_event(&mut app, &press(KeyCode::F(2)), now);
        handle_input_event(&mut app, &press(KeyCode::Enter), now);
        assert_eq!(app.overlay, Overlay::Dialog(Dialog::About));

        // Esc dismisses the dialog without quitting
        handle_input_event(&mut app, &press(KeyCode::Esc), now);
        assert_eq!(app.overlay, Overlay::None);
        assert!(!app.should_quit);
    }

    #[test]
    fn test_quit_keys() {
        let mut app = App::new(&AppConfig::default());
        handle_input_event(&mut app, &press(KeyCode::Esc), Instant::now());
        assert!(app.should_quit);

        let mut app = App::new(&AppConfig::default());
        handle_input_event(&mut app, &ctrl('o'), Instant::now());
        handle_input_event(&mut app, &ctrl('c'), Instant::now());
        assert!(app.should_quit);
    }

    #[test]
    fn test_release_events_are_ignored() {
        let mut app = App::new(&AppConfig::default());
        let mut release = KeyEvent::new(KeyCode::Char('7'), KeyModifiers::NONE);
        release.kind = KeyEventKind::Release;
        handle_input_event(&mut app, &Event::Key(release), Instant::now());
        assert_eq!(app.converter.input_value(), "");
    }
}
