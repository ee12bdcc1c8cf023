//! State of the conversion form: the text input, the selected source unit,
//! and the canonical reading every output row is derived from.
//!
//! Edits and unit changes never recompute directly. They arm the debouncer,
//! and `on_tick` performs the recompute once the input has been quiet.

use std::time::{Duration, Instant};

use crossterm::event::Event;
use log::debug;
use tui_input::Input;
use tui_input::backend::crossterm::EventHandler;

use crate::debounce::Debouncer;
use crate::temperature::{Conversions, Reading, Unit, parse_input};

/// Form state for the single converter screen.
#[derive(Debug)]
pub struct ConverterState {
    /// Text field holding the raw value
    input: Input,
    /// Unit the input text is expressed in
    selected_unit: Unit,
    /// Canonical value; displayed rows are derived from it on demand
    reading: Reading,
    /// Pending deferred recompute
    debouncer: Debouncer,
    /// Why the last recompute was skipped, if the input was unusable
    validation_message: Option<String>,
}

impl Default for ConverterState {
    fn default() -> Self {
        Self::new(Unit::Celsius, Debouncer::default())
    }
}

impl ConverterState {
    pub fn new(selected_unit: Unit, debouncer: Debouncer) -> Self {
        Self {
            input: Input::default(),
            selected_unit,
            reading: Reading::from_celsius(0.0),
            debouncer,
            validation_message: None,
        }
    }

    /// Current text of the input field
    pub fn input_value(&self) -> &str {
        self.input.value()
    }

    /// Cursor column inside the input field
    pub fn input_cursor(&self) -> usize {
        self.input.visual_cursor()
    }

    /// Horizontal scroll that keeps the cursor inside a field `width` columns wide
    pub fn input_scroll(&self, width: usize) -> usize {
        self.input.visual_scroll(width.saturating_sub(1))
    }

    /// Replaces the input text and schedules a recompute
    #[cfg(test)]
    pub fn set_input(&mut self, text: &str, now: Instant) {
        self.input = Input::new(text.to_string());
        self.debouncer.trigger(now);
    }

    /// Feeds a terminal event to the input field.
    /// Returns true if the text changed, in which case a recompute is scheduled.
    pub fn handle_input_event(&mut self, event: &Event, now: Instant) -> bool {
        match self.input.handle_event(event) {
            Some(changed) if changed.value => {
                self.debouncer.trigger(now);
                true
            }
            _ => false,
        }
    }

    pub const fn selected_unit(&self) -> Unit {
        self.selected_unit
    }

    /// Changes the source unit. The entered text is reinterpreted in the new
    /// unit once the debounce elapses.
    pub fn select_unit(&mut self, unit: Unit, now: Instant) {
        if unit != self.selected_unit {
            debug!("Source unit changed: {} -> {unit}", self.selected_unit);
            self.selected_unit = unit;
            self.debouncer.trigger(now);
        }
    }

    pub fn select_next_unit(&mut self, now: Instant) {
        self.select_unit(self.selected_unit.next(), now);
    }

    pub fn select_previous_unit(&mut self, now: Instant) {
        self.select_unit(self.selected_unit.previous(), now);
    }

    /// The canonical reading behind the displayed values
    pub const fn reading(&self) -> Reading {
        self.reading
    }

    /// The six displayed values
    pub fn conversions(&self) -> Conversions {
        self.reading.conversions()
    }

    pub fn validation_message(&self) -> Option<&str> {
        self.validation_message.as_deref()
    }

    /// Returns true while a recompute is waiting for the quiet period
    pub const fn is_pending(&self) -> bool {
        self.debouncer.is_pending()
    }

    /// How long the event loop may block before the pending recompute is due
    pub fn time_until_due(&self, now: Instant) -> Option<Duration> {
        self.debouncer.time_until_due(now)
    }

    /// Runs the deferred recompute if its quiet period has elapsed.
    /// Returns true if a recompute was attempted.
    pub fn on_tick(&mut self, now: Instant) -> bool {
        if self.debouncer.poll(now) {
            self.recompute();
            true
        } else {
            false
        }
    }

    /// Recomputes immediately, dropping any pending deferred recompute
    pub fn recompute_now(&mut self) {
        self.debouncer.cancel();
        self.recompute();
    }

    /// Parses the input under the selected unit and updates the canonical
    /// reading. Blank or unusable input leaves the previous reading in place.
    fn recompute(&mut self) {
        match parse_input(self.input.value(), self.selected_unit) {
            Ok(None) => {
                debug!("Blank input, keeping previous values");
                self.validation_message = None;
            }
            Ok(Some(reading)) => {
                debug!(
                    "Recomputed {} {} -> {:.2} °C",
                    self.input.value().trim(),
                    self.selected_unit.symbol(),
                    reading.celsius()
                );
                self.reading = reading;
                self.validation_message = None;
            }
            Err(e) => {
                debug!("Rejected input: {e}");
                self.validation_message = Some(e.to_string());
            }
        }
    }
}
