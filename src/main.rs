mod commands;
mod config;
mod converter_state;
mod debounce;
mod keyhandler;
mod logging;
mod temperature;
mod theme;
mod ui;

use std::io;
use std::process::ExitCode;
use std::time::{Duration, Instant};

use crossterm::event;
use log::{error, info};
use ratatui::prelude::{Backend, Terminal};

use commands::Overlay;
use crate::config::AppConfig;
use converter_state::ConverterState;
use debounce::Debouncer;
use temperature::{Reading, Unit, parse_input};

/// Longest time the event loop blocks when no recompute is pending
const IDLE_POLL: Duration = Duration::from_millis(250);

// App holds the state of our application
pub struct App {
    pub converter: ConverterState, // Input field, selected unit and canonical reading
    pub overlay: Overlay,          // Menu or dialog drawn over the form
    pub night_mode: bool,          // Process-local display toggle, never persisted
    pub decimals: usize,           // Decimal places for the output rows
    pub should_quit: bool,
}

impl App {
    fn new(config: &AppConfig) -> Self {
        Self {
            converter: ConverterState::new(
                config.initial_unit(),
                Debouncer::from_millis(config.debounce_ms),
            ),
            overlay: Overlay::None,
            night_mode: false,
            decimals: config.decimals,
            should_quit: false,
        }
    }
}

/// Renders all six values of a reading, one `Name: value symbol` line each
fn conversion_report(reading: Reading, decimals: usize) -> Vec<String> {
    reading
        .conversions()
        .iter()
        .map(|(unit, value)| {
            format!(
                "{}: {} {}",
                unit.display_name(),
                ui::format_value(value, decimals),
                unit.symbol()
            )
        })
        .collect()
}

const USAGE: &str = "Usage: thermoconv [<value> [unit]]

Without arguments the interactive converter is started.
Units: Celsius, Kelvin, Fahrenheit, Newton, Rankine, Réaumur (default: Celsius)";

/// One-shot conversion for `thermoconv <value> [unit]`
fn run_once(args: &[String], config: &AppConfig) -> ExitCode {
    if args.len() > 2 {
        eprintln!("thermoconv: unexpected argument '{}'", args[2]);
        eprintln!("{USAGE}");
        return ExitCode::from(2);
    }

    let unit = match args.get(1) {
        Some(name) => match Unit::from_name(name) {
            Ok(unit) => unit,
            Err(e) => {
                eprintln!("thermoconv: {e}");
                return ExitCode::from(2);
            }
        },
        None => config.initial_unit(),
    };

    match parse_input(&args[0], unit) {
        Ok(Some(reading)) => {
            for line in conversion_report(reading, config.decimals) {
                println!("{line}");
            }
            ExitCode::SUCCESS
        }
        Ok(None) => {
            eprintln!("thermoconv: no value given");
            ExitCode::from(2)
        }
        Err(e) => {
            eprintln!("thermoconv: {e}");
            ExitCode::from(2)
        }
    }
}

/// Draws, waits for input or the debounce deadline, and dispatches events
/// until the user quits.
fn event_loop<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    while !app.should_quit {
        terminal.draw(|f| ui::draw(f, app))?;

        let timeout = app
            .converter
            .time_until_due(Instant::now())
            .map_or(IDLE_POLL, |due| due.min(IDLE_POLL));
        if event::poll(timeout)? {
            let event = event::read()?;
            keyhandler::handle_input_event(app, &event, Instant::now());
        }

        app.converter.on_tick(Instant::now());
    }
    Ok(())
}

fn run_tui(config: &AppConfig) -> io::Result<()> {
    // Set up terminal
    let mut terminal = ui::setup_terminal()?;

    let mut app = App::new(config);
    let result = event_loop(&mut terminal, &mut app);

    // Restore terminal even if the loop failed
    ui::restore_terminal(&mut terminal)?;
    result
}

fn main() -> io::Result<ExitCode> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|arg| arg == "-h" || arg == "--help") {
        println!("{USAGE}");
        return Ok(ExitCode::SUCCESS);
    }

    let config = crate::config::get_config();
    if !args.is_empty() {
        return Ok(run_once(&args, config));
    }

    let log_path = config.log_path();
    if let Err(e) = logging::init(&log_path) {
        eprintln!("Failed to initialize log file {}: {e}", log_path.display());
    }
    info!(
        "Starting thermoconv (unit: {}, debounce: {}ms, decimals: {})",
        config.initial_unit(),
        config.debounce_ms,
        config.decimals
    );

    if let Err(e) = run_tui(config) {
        error!("Terminal error: {e}");
        return Err(e);
    }

    info!("Exiting thermoconv");
    Ok(ExitCode::SUCCESS)
}
