//! Overflow menu actions for thermoconv. Translates menu selections into
//! dialogs and the night-mode toggle.

use log::info;

use crate::App;

/// An entry of the overflow menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    About,
    Share,
    ToggleNightMode,
}

impl MenuAction {
    /// Menu entries in display order
    pub const ALL: [Self; 3] = [Self::About, Self::Share, Self::ToggleNightMode];

    /// Label shown in the menu. The night-mode entry names the state the
    /// toggle switches to.
    pub const fn label(self, night_mode: bool) -> &'static str {
        match self {
            Self::About => "About App",
            Self::Share => "Share App",
            Self::ToggleNightMode => {
                if night_mode {
                    "Night mode Off"
                } else {
                    "Night mode On"
                }
            }
        }
    }
}

/// A modal message box
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialog {
    About,
    Share,
}

impl Dialog {
    pub const fn title(self) -> &'static str {
        match self {
            Self::About => "About App",
            Self::Share => "Share App",
        }
    }

    pub const fn body(self) -> &'static str {
        match self {
            Self::About => "This is a temperature conversion app.",
            Self::Share => "Share this app with your friends!",
        }
    }
}

/// What is drawn on top of the converter form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Overlay {
    /// Only the form is visible and receives keys
    #[default]
    None,
    /// The overflow menu is open with the given entry highlighted
    Menu { selected: usize },
    /// A dialog is shown until dismissed
    Dialog(Dialog),
}

/// Opens the overflow menu with the first entry highlighted
pub fn open_menu(app: &mut App) {
    app.overlay = Overlay::Menu { selected: 0 };
}

/// Closes the menu or dismisses the dialog
pub fn close_overlay(app: &mut App) {
    app.overlay = Overlay::None;
}

/// Moves the menu highlight down, wrapping to the top
pub fn menu_next(app: &mut App) {
    if let Overlay::Menu { selected } = app.overlay {
        app.overlay = Overlay::Menu {
            selected: (selected + 1) % MenuAction::ALL.len(),
        };
    }
}

/// Moves the menu highlight up, wrapping to the bottom
pub fn menu_previous(app: &mut App) {
    if let Overlay::Menu { selected } = app.overlay {
        app.overlay = Overlay::Menu {
            selected: (selected + MenuAction::ALL.len() - 1) % MenuAction::ALL.len(),
        };
    }
}

/// Runs the highlighted menu entry
pub fn activate_selected(app: &mut App) {
    if let Overlay::Menu { selected } = app.overlay {
        if let Some(action) = MenuAction::ALL.get(selected).copied() {
            execute_menu_action(app, action);
        }
    }
}

/// Applies a menu action to the application state.
///
/// ### Arguments
/// * `app` - Mutable reference to the application state
/// * `action` - The selected menu entry
///
/// About and Share replace the menu with their dialog. Night mode flips the
/// process-local flag and closes the menu.
pub fn execute_menu_action(app: &mut App, action: MenuAction) {
    info!("Menu action: {}", action.label(app.night_mode));
    match action {
        MenuAction::About => app.overlay = Overlay::Dialog(Dialog::About),
        MenuAction::Share => app.overlay = Overlay::Dialog(Dialog::Share),
        MenuAction::ToggleNightMode => {
            app.night_mode = !app.night_mode;
            app.overlay = Overlay::None;
        }
    }
}
