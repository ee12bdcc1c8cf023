#![allow(clippy::cast_possible_truncation)]

//! Terminal user interface implementation using ratatui. Manages terminal setup,
//! teardown, and rendering of the converter form, the overflow menu and dialogs.

use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};
use std::io;

use crate::App;
use crate::commands::{Dialog, MenuAction, Overlay};
use crate::temperature::{Conversions, Unit};
use crate::theme::Palette;

/// Title shown in the header bar
const TITLE: &str = "Conversion de Température";

/// Width of the value input box, borders included
const INPUT_WIDTH: u16 = 22;

/// Initializes the terminal for TUI operation.
///
/// ### Returns
/// * `Ok(Terminal)` - Configured terminal instance ready for TUI
/// * `Err(io::Error)` - If terminal setup fails
///
/// Sets up:
/// * Raw mode for immediate character input
/// * Alternate screen to preserve original terminal content
/// * Mouse capture so clicks do not leak escape sequences into the input
pub fn setup_terminal() -> io::Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    Terminal::new(CrosstermBackend::new(stdout))
}

/// Restores the terminal to its original state.
///
/// ### Returns
/// * `Ok(())` - Terminal successfully restored
/// * `Err(io::Error)` - If cleanup fails
pub fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> io::Result<()> {
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    Ok(())
}

/// Formats a converted value with a fixed number of decimals.
/// Negative zero is shown without its sign.
pub fn format_value(value: f64, decimals: usize) -> String {
    let formatted = format!("{value:.decimals$}");
    match formatted.strip_prefix('-') {
        Some(unsigned) if unsigned.chars().all(|c| c == '0' || c == '.') => unsigned.to_string(),
        _ => formatted,
    }
}

/// Create the header bar: title on the left, menu hint on the right
fn create_header_widget(palette: &Palette) -> Paragraph<'static> {
    Paragraph::new(Line::from(vec![
        Span::styled(TITLE, palette.header()),
        Span::styled("   ⋮ F2", palette.header()),
    ]))
    .alignment(Alignment::Center)
    .style(palette.header())
    .block(Block::default().style(palette.header()))
}

/// Create the unit selector showing the selected unit between arrows
fn create_selector_widget(unit: Unit, palette: &Palette) -> Paragraph<'static> {
    Paragraph::new(Line::from(vec![
        Span::styled("◀ ", palette.selector()),
        Span::styled(
            format!("{} ({})", unit.display_name(), unit.symbol()),
            palette.selector().add_modifier(Modifier::BOLD),
        ),
        Span::styled(" ▶", palette.selector()),
    ]))
    .style(palette.selector())
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(palette.border())
            .title("Unit"),
    )
}

/// Create the value input box, scrolled so the cursor stays visible
fn create_input_widget<'a>(value: &'a str, scroll: u16, palette: &Palette) -> Paragraph<'a> {
    Paragraph::new(value).scroll((0, scroll)).style(palette.base()).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(palette.border())
            .title("Value"),
    )
}

/// Build one labelled row per unit, separated by thin rules.
/// Labels are left aligned and values right aligned within `width`.
fn create_output_lines(
    conversions: &Conversions,
    decimals: usize,
    width: usize,
    palette: &Palette,
) -> Vec<Line<'static>> {
    let mut lines = Vec::with_capacity(Unit::ALL.len() * 2);
    for (i, (unit, value)) in conversions.iter().enumerate() {
        if i > 0 {
            lines.push(Line::from(Span::styled("─".repeat(width), palette.border())));
        }
        let label = unit.display_name();
        let value = format!("{} {}", format_value(value, decimals), unit.symbol());
        let padding = width.saturating_sub(label.chars().count() + value.chars().count());
        lines.push(Line::from(vec![
            Span::styled(label, palette.base()),
            Span::styled(" ".repeat(padding), palette.base()),
            Span::styled(value, palette.value()),
        ]));
    }
    lines
}

/// Create the status line: a validation message, a pending marker, or nothing
fn create_status_widget(app: &App, palette: &Palette) -> Paragraph<'static> {
    let line = if let Some(message) = app.converter.validation_message() {
        Line::from(Span::styled(message.to_string(), palette.error()))
    } else if app.converter.is_pending() {
        Line::from(Span::styled("…", palette.muted()))
    } else {
        Line::from("")
    };
    Paragraph::new(line).style(palette.base())
}

/// Create the key help line
fn create_help_widget(palette: &Palette) -> Paragraph<'static> {
    let key = palette.muted().add_modifier(Modifier::BOLD);
    Paragraph::new(Line::from(vec![
        Span::styled("tab/↑↓", key),
        Span::styled(" unit  ", palette.muted()),
        Span::styled("enter", key),
        Span::styled(" convert  ", palette.muted()),
        Span::styled("F2", key),
        Span::styled(" menu  ", palette.muted()),
        Span::styled("esc", key),
        Span::styled(" quit", palette.muted()),
    ]))
    .style(palette.base())
}

/// Rectangle of at most `width` x `height` centered in `area`
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

/// Rectangle anchored below the header at the right edge, for the menu
fn menu_rect(area: Rect) -> Rect {
    let width = 20.min(area.width);
    let height = (MenuAction::ALL.len() as u16 + 2).min(area.height.saturating_sub(1));
    Rect {
        x: area.x + area.width - width,
        y: area.y + 1.min(area.height),
        width,
        height,
    }
}

fn draw_menu(frame: &mut Frame, selected: usize, night_mode: bool, palette: &Palette) {
    let area = menu_rect(frame.size());
    frame.render_widget(Clear, area);

    let lines: Vec<Line> = MenuAction::ALL
        .iter()
        .enumerate()
        .map(|(i, action)| {
            let style = if i == selected {
                palette.base().patch(palette.highlight())
            } else {
                palette.base()
            };
            Line::from(Span::styled(format!(" {} ", action.label(night_mode)), style))
        })
        .collect();

    let menu = Paragraph::new(lines).style(palette.base()).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(palette.border())
            .style(palette.base()),
    );
    frame.render_widget(menu, area);
}

fn draw_dialog(frame: &mut Frame, dialog: Dialog, palette: &Palette) {
    let area = centered_rect(44, 7, frame.size());
    frame.render_widget(Clear, area);

    let body = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(dialog.body(), palette.base())),
        Line::from(""),
        Line::from(Span::styled("[ OK ]", palette.value())),
    ])
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true })
    .style(palette.base())
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(palette.border())
            .title(dialog.title())
            .style(palette.base()),
    );
    frame.render_widget(body, area);
}

/// Draws the application UI.
///
/// ### Layout
/// * Header bar with the title and the menu hint
/// * Unit selector and value input side by side
/// * The six converted values
/// * Status line and key help
/// * Menu or dialog on top, if one is open
pub fn draw(frame: &mut Frame, app: &App) {
    let palette = Palette::for_mode(app.night_mode);
    let area = frame.size();
    frame.render_widget(Block::default().style(palette.base()), area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Header
            Constraint::Length(1), // Spacer
            Constraint::Length(3), // Selector and input
            Constraint::Length(1), // Spacer
            Constraint::Min(1),    // Outputs
            Constraint::Length(1), // Status
            Constraint::Length(1), // Help
        ])
        .split(area);

    frame.render_widget(create_header_widget(&palette), chunks[0]);

    let input_row = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(10), Constraint::Length(INPUT_WIDTH)])
        .split(chunks[2]);
    frame.render_widget(
        create_selector_widget(app.converter.selected_unit(), &palette),
        input_row[0],
    );
    let input_width = input_row[1].width.saturating_sub(2);
    let input_scroll = app.converter.input_scroll(input_width as usize) as u16;
    frame.render_widget(
        create_input_widget(app.converter.input_value(), input_scroll, &palette),
        input_row[1],
    );

    let outputs = create_output_lines(
        &app.converter.conversions(),
        app.decimals,
        chunks[4].width as usize,
        &palette,
    );
    frame.render_widget(Paragraph::new(outputs).style(palette.base()), chunks[4]);

    frame.render_widget(create_status_widget(app, &palette), chunks[5]);
    frame.render_widget(create_help_widget(&palette), chunks[6]);

    match app.overlay {
        Overlay::None => {
            let cursor = (app.converter.input_cursor() as u16).saturating_sub(input_scroll);
            let cursor = cursor.min(input_width.saturating_sub(1));
            frame.set_cursor(input_row[1].x + 1 + cursor, input_row[1].y + 1);
        }
        Overlay::Menu { selected } => draw_menu(frame, selected, app.night_mode, &palette),
        Overlay::Dialog(dialog) => draw_dialog(frame, dialog, &palette),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::temperature::Reading;
    use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
    use ratatui::backend::TestBackend;
    use std::time::Instant;

    fn line_text(line: &Line) -> String {
        line.spans.iter().map(|span| &span.content[..]).collect()
    }

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(212.0, 2), "212.00");
        assert_eq!(format_value(-90.1395, 2), "-90.14");
        assert_eq!(format_value(373.149_999, 2), "373.15");
        assert_eq!(format_value(-0.001, 2), "0.00");
        assert_eq!(format_value(1.5, 0), "2");
    }

    #[test]
    fn test_create_output_lines() {
        let conversions = Reading::from_unit(100.0, Unit::Celsius).conversions();
        let lines = create_output_lines(&conversions, 2, 30, &Palette::day());

        // Six rows plus five separators
        assert_eq!(lines.len(), 11);

        let first = line_text(&lines[0]);
        assert!(first.starts_with("Celsius"));
        assert!(first.ends_with("100.00 °C"));
        assert_eq!(first.chars().count(), 30);

        assert!(line_text(&lines[1]).chars().all(|c| c == '─'));
        assert!(line_text(&lines[4]).ends_with("212.00 °F"));
        assert!(line_text(&lines[6]).ends_with("33.00 °N"));
        assert!(line_text(&lines[8]).ends_with("671.67 °R"));
        assert!(line_text(&lines[10]).starts_with("Réaumur"));
        assert!(line_text(&lines[10]).ends_with("80.00 °Ré"));
    }

    #[test]
    fn test_centered_rect() {
        let area = Rect::new(0, 0, 100, 40);
        assert_eq!(centered_rect(40, 10, area), Rect::new(30, 15, 40, 10));

        // Clamped to the available area
        let small = Rect::new(0, 0, 20, 5);
        assert_eq!(centered_rect(40, 10, small), small);
    }

    #[test]
    fn test_menu_rect_hugs_right_edge() {
        let area = Rect::new(0, 0, 80, 24);
        let rect = menu_rect(area);
        assert_eq!(rect.x + rect.width, 80);
        assert_eq!(rect.height, 5);
    }

    /// Text of one buffer row
    fn row_text(terminal: &Terminal<TestBackend>, y: u16) -> String {
        let buffer = terminal.backend().buffer();
        (0..buffer.area.width)
            .map(|x| buffer.get(x, y).symbol())
            .collect()
    }

    fn type_into(app: &mut App, text: &str) {
        let now = Instant::now();
        for c in text.chars() {
            let event = Event::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE));
            crate::keyhandler::handle_input_event(app, &event, now);
        }
    }

    #[test]
    fn test_short_input_is_drawn_from_the_start() {
        let mut app = App::new(&AppConfig::default());
        type_into(&mut app, "36.6");

        let mut terminal = Terminal::new(TestBackend::new(60, 20)).unwrap();
        terminal.draw(|f| draw(f, &app)).unwrap();

        // Input row sits below the header and spacer, inside the box border
        assert!(row_text(&terminal, 3).contains("│36.6"));
        let (x, y) = terminal.get_cursor().unwrap();
        assert_eq!((x, y), (60 - INPUT_WIDTH + 1 + 4, 3));
    }

    #[test]
    fn test_long_input_scrolls_to_keep_the_tail_visible() {
        let mut app = App::new(&AppConfig::default());
        type_into(&mut app, "12345678901234567890123.75");

        let mut terminal = Terminal::new(TestBackend::new(60, 20)).unwrap();
        terminal.draw(|f| draw(f, &app)).unwrap();

        let row = row_text(&terminal, 3);
        assert!(row.contains("3.75"), "typed tail should be visible: {row:?}");
        assert!(!row.contains("│1234"), "head should scroll out: {row:?}");

        // Cursor stays inside the box, right after the last character
        let (x, y) = terminal.get_cursor().unwrap();
        let inner_right = 60 - 2;
        assert_eq!(y, 3);
        assert!(x <= inner_right, "cursor at {x} is on the border");
        assert_eq!(row.chars().nth(usize::from(x) - 1), Some('5'));
    }
}
