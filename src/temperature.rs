//! Core temperature model for thermoconv. Every displayed value is derived
//! from a single canonical reading held in Celsius.

use std::borrow::Cow;
use std::fmt;
use std::ops::Index;
use std::str::FromStr;

use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;
use thiserror::Error;

/// Offset between the Celsius and Kelvin scales
const KELVIN_OFFSET: f64 = 273.15;

/// Rankine value of the freezing point of water
const RANKINE_FREEZING: f64 = 491.67;

/// Shortest query that is matched fuzzily rather than only exactly
const MIN_FUZZY_QUERY_LEN: usize = 3;

/// A temperature scale the converter understands.
///
/// The variant order is the order of the unit selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Unit {
    Celsius,
    Kelvin,
    Fahrenheit,
    Newton,
    Rankine,
    Reaumur,
}

impl Unit {
    /// All units in selector order
    pub const ALL: [Self; 6] = [
        Self::Celsius,
        Self::Kelvin,
        Self::Fahrenheit,
        Self::Newton,
        Self::Rankine,
        Self::Reaumur,
    ];

    /// Returns the human-readable name shown in the UI
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Celsius => "Celsius",
            Self::Kelvin => "Kelvin",
            Self::Fahrenheit => "Fahrenheit",
            Self::Newton => "Newton",
            Self::Rankine => "Rankine",
            Self::Reaumur => "Réaumur",
        }
    }

    /// Returns the unit symbol
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Celsius => "°C",
            Self::Kelvin => "K",
            Self::Fahrenheit => "°F",
            Self::Newton => "°N",
            Self::Rankine => "°R",
            Self::Reaumur => "°Ré",
        }
    }

    /// Short ASCII codes and spellings accepted when parsing unit names
    const fn aliases(self) -> &'static [&'static str] {
        match self {
            Self::Celsius => &["c", "centigrade"],
            Self::Kelvin => &["k"],
            Self::Fahrenheit => &["f"],
            Self::Newton => &["n"],
            Self::Rankine => &["r", "ra"],
            Self::Reaumur => &["re", "reaumur"],
        }
    }

    /// Position of the unit in the selector
    pub const fn index(self) -> usize {
        match self {
            Self::Celsius => 0,
            Self::Kelvin => 1,
            Self::Fahrenheit => 2,
            Self::Newton => 3,
            Self::Rankine => 4,
            Self::Reaumur => 5,
        }
    }

    /// The next unit in selector order, wrapping at the end
    pub const fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    /// The previous unit in selector order, wrapping at the start
    pub const fn previous(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    /// Converts a value expressed in this unit to Celsius
    pub fn to_celsius(self, value: f64) -> f64 {
        match self {
            Self::Celsius => value,
            Self::Kelvin => value - KELVIN_OFFSET,
            Self::Fahrenheit => (value - 32.0) * 5.0 / 9.0,
            Self::Newton => value * 100.0 / 33.0,
            Self::Rankine => (value - RANKINE_FREEZING) * 5.0 / 9.0,
            Self::Reaumur => value * 5.0 / 4.0,
        }
    }

    /// Expresses a Celsius value in this unit
    pub fn of_celsius(self, celsius: f64) -> f64 {
        match self {
            Self::Celsius => celsius,
            Self::Kelvin => celsius + KELVIN_OFFSET,
            Self::Fahrenheit => celsius * 9.0 / 5.0 + 32.0,
            Self::Newton => celsius * 33.0 / 100.0,
            Self::Rankine => (celsius + KELVIN_OFFSET) * 9.0 / 5.0,
            Self::Reaumur => celsius * 4.0 / 5.0,
        }
    }

    /// Resolves a user-supplied unit name.
    ///
    /// Matching order:
    /// * Exact, case insensitive match on the name, the symbol or an alias
    /// * Fuzzy match for queries of three or more characters ("fahr", "kel")
    ///
    /// A fuzzy query that scores equally well for two units is rejected as
    /// ambiguous.
    pub fn from_name(name: &str) -> Result<Self, UnitParseError> {
        let query = name.trim();
        if query.is_empty() {
            return Err(UnitParseError::Unknown(String::new()));
        }

        let lowered = query.to_lowercase();
        let exact = Self::ALL.into_iter().find(|unit| {
            unit.display_name().to_lowercase() == lowered
                || unit.symbol().to_lowercase() == lowered
                || unit.aliases().contains(&lowered.as_str())
        });
        if let Some(unit) = exact {
            return Ok(unit);
        }

        if query.chars().count() < MIN_FUZZY_QUERY_LEN {
            return Err(UnitParseError::Unknown(query.to_string()));
        }

        let matcher = SkimMatcherV2::default().ignore_case();
        let mut scored: Vec<(Self, i64)> = Self::ALL
            .into_iter()
            .filter_map(|unit| {
                std::iter::once(unit.display_name())
                    .chain(unit.aliases().iter().copied())
                    .filter_map(|candidate| matcher.fuzzy_match(candidate, query))
                    .max()
                    .map(|score| (unit, score))
            })
            .collect();
        scored.sort_by(|a, b| b.1.cmp(&a.1));

        match scored.as_slice() {
            [] => Err(UnitParseError::Unknown(query.to_string())),
            [(unit, _)] => Ok(*unit),
            [(unit, best), (_, runner_up), ..] if best > runner_up => Ok(*unit),
            _ => Err(UnitParseError::Ambiguous(query.to_string())),
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for Unit {
    type Err = UnitParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s)
    }
}

/// Failure to resolve a unit name
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UnitParseError {
    #[error("unknown temperature unit '{0}'")]
    Unknown(String),
    #[error("'{0}' matches more than one temperature unit")]
    Ambiguous(String),
}

/// Failure to turn the input text into a reading
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("'{0}' is not a number")]
    NotANumber(String),
    #[error("'{0}' is not a finite number")]
    NotFinite(String),
    #[error("'{0}' is out of range")]
    OutOfRange(String),
}

/// The canonical temperature, held in Celsius.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Reading {
    celsius: f64,
}

impl Reading {
    /// Creates a reading from a Celsius value
    pub const fn from_celsius(celsius: f64) -> Self {
        Self { celsius }
    }

    /// Creates a reading from a value expressed in `unit`
    pub fn from_unit(value: f64, unit: Unit) -> Self {
        Self {
            celsius: unit.to_celsius(value),
        }
    }

    /// Returns the canonical Celsius value
    pub const fn celsius(&self) -> f64 {
        self.celsius
    }

    /// Expresses the reading in `unit`
    pub fn in_unit(&self, unit: Unit) -> f64 {
        unit.of_celsius(self.celsius)
    }

    /// Derives all six unit values from the canonical value
    pub fn conversions(&self) -> Conversions {
        Conversions {
            values: Unit::ALL.map(|unit| self.in_unit(unit)),
        }
    }
}

/// The six values shown to the user, all derived from one reading
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Conversions {
    values: [f64; 6],
}

impl Conversions {
    /// Iterates over `(unit, value)` pairs in selector order
    pub fn iter(&self) -> impl Iterator<Item = (Unit, f64)> + '_ {
        Unit::ALL.into_iter().zip(self.values.iter().copied())
    }

    fn all_finite(&self) -> bool {
        self.values.iter().all(|value| value.is_finite())
    }
}

impl Default for Conversions {
    fn default() -> Self {
        Reading::default().conversions()
    }
}

impl Index<Unit> for Conversions {
    type Output = f64;

    fn index(&self, unit: Unit) -> &Self::Output {
        &self.values[unit.index()]
    }
}

/// Accepts a lone comma as the decimal separator ("21,5")
fn normalize_decimal_separator(text: &str) -> Cow<'_, str> {
    if text.matches(',').count() == 1 && !text.contains('.') {
        Cow::Owned(text.replacen(',', ".", 1))
    } else {
        Cow::Borrowed(text)
    }
}

/// Parses the raw input text as a value in `unit`.
///
/// ### Returns
/// * `Ok(None)` - The input is blank; nothing should be recomputed
/// * `Ok(Some(reading))` - The canonical reading for the input
/// * `Err(InputError)` - The text is not a usable number
pub fn parse_input(raw: &str, unit: Unit) -> Result<Option<Reading>, InputError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let value: f64 = normalize_decimal_separator(trimmed)
        .parse()
        .map_err(|_| InputError::NotANumber(trimmed.to_string()))?;
    if !value.is_finite() {
        return Err(InputError::NotFinite(trimmed.to_string()));
    }

    let reading = Reading::from_unit(value, unit);
    if !reading.conversions().all_finite() {
        return Err(InputError::OutOfRange(trimmed.to_string()));
    }
    Ok(Some(reading))
}
