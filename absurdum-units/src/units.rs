//! Pattern table - ordered unit notations per category
//!
//! Order inside a category is significant: earlier notations claim their
//! text first, so longer spellings must be registered before shorter ones
//! that could match a piece of them.

use std::sync::LazyLock;
use regex::Regex;
use absurdum_core::Number;
use crate::{Category, Unit};

/// Global pattern table
pub static PATTERNS: LazyLock<PatternTable> = LazyLock::new(PatternTable::new);

/// Leading numeric token: thousands grouped by comma, space or apostrophe,
/// optional dot decimals. Repetitions are capped.
pub const RE_NUM: &str = r"\b((?:\d{1,3}(?:[ ,']\d{3}){1,12}|\d{1,30})(?:\.\d{1,30})?)";

/// Rejects a length/distance match that is really the numerator of a speed
const RATE_SUFFIX: &str = r"^(?:\s?per\b|\s+an\b|\s?/)";

/// Rejects a foot tick that is part of a word ("90's") or of an
/// apostrophe-grouped number ("80'018")
const TICK_SUFFIX: &str = r"^(?:[a-z]|\d{3}(?:\D|$))";

/// Applies a combining function to every numeric group of a match
pub type Combiner = fn(&[Number]) -> Number;

/// How a matched value reaches the category's base unit
#[derive(Debug, Clone)]
pub enum Conversion {
    /// Multiply the single captured value by a fixed factor
    Linear(Number),
    /// Several captured values, one per unit of `parts`, folded by `combine`
    Combined {
        parts: &'static [Unit],
        combine: Combiner,
    },
}

impl Conversion {
    /// Convert captured values to the base unit
    pub fn apply(&self, groups: &[Number]) -> Number {
        match self {
            Conversion::Linear(factor) => groups
                .first()
                .map(|value| value.mul(factor))
                .unwrap_or_else(|| Number::from_i64(0)),
            Conversion::Combined { combine, .. } => combine(groups),
        }
    }
}

/// One recognizable notation for a unit
#[derive(Debug)]
pub struct UnitDefinition {
    /// Canonical unit the notation resolves to
    pub unit: Unit,
    /// Numeric token(s) plus unit spelling
    pub pattern: Regex,
    /// Text directly after a match that disqualifies it
    pub reject_suffix: Option<Regex>,
    pub conversion: Conversion,
}

impl UnitDefinition {
    pub fn category(&self) -> Category {
        self.unit.category()
    }

    /// Whether the text following a match disqualifies it
    pub fn rejects(&self, rest: &str) -> bool {
        self.reject_suffix.as_ref().is_some_and(|re| re.is_match(rest))
    }

    /// Whether the notation captures several numbers at once (`5'7"`)
    pub fn is_combined(&self) -> bool {
        matches!(self.conversion, Conversion::Combined { .. })
    }
}

/// Registry of all notations, grouped by category in scan order
pub struct PatternTable {
    categories: Vec<(Category, Vec<UnitDefinition>)>,
}

impl PatternTable {
    pub fn new() -> Self {
        let mut table = PatternTable {
            categories: Category::ALL.iter().map(|c| (*c, Vec::new())).collect(),
        };
        table.register_all_units();
        table
    }

    /// Notations of a category, in priority order
    pub fn definitions(&self, category: Category) -> &[UnitDefinition] {
        self.categories
            .iter()
            .find(|(c, _)| *c == category)
            .map(|(_, defs)| defs.as_slice())
            .unwrap_or(&[])
    }

    /// The notation registered for a unit
    pub fn definition(&self, unit: Unit) -> Option<&UnitDefinition> {
        self.definitions(unit.category())
            .iter()
            .find(|d| d.unit == unit)
    }

    /// Conversion to the base unit for a unit
    pub fn conversion(&self, unit: Unit) -> Option<&Conversion> {
        self.definition(unit).map(|d| &d.conversion)
    }

    fn push(&mut self, definition: UnitDefinition) {
        let category = definition.category();
        if let Some((_, defs)) = self.categories.iter_mut().find(|(c, _)| *c == category) {
            defs.push(definition);
        }
    }

    /// Register a single-number notation: `RE_NUM` followed by `suffix`
    fn register(&mut self, unit: Unit, suffix: &str, factor: &str) {
        self.push(UnitDefinition {
            unit,
            pattern: numeric_pattern(suffix),
            reject_suffix: None,
            conversion: Conversion::Linear(literal_factor(factor)),
        });
    }

    /// Register a single-number notation that is dropped when followed by `guard`
    fn register_guarded(&mut self, unit: Unit, suffix: &str, factor: &str, guard: &str) {
        self.push(UnitDefinition {
            unit,
            pattern: numeric_pattern(suffix),
            reject_suffix: Some(compile(&format!("(?i){}", guard))),
            conversion: Conversion::Linear(literal_factor(factor)),
        });
    }

    /// Register a multi-number notation with its own complete pattern
    fn register_combined(&mut self, unit: Unit, pattern: &str, parts: &'static [Unit], combine: Combiner) {
        self.push(UnitDefinition {
            unit,
            pattern: compile(&format!("(?i){}", pattern)),
            reject_suffix: None,
            conversion: Conversion::Combined { parts, combine },
        });
    }

    fn register_all_units(&mut self) {
        self.register_length_units();
        self.register_mass_units();
        self.register_volume_units();
        self.register_velocity_units();
        self.register_time_units();
        self.register_power_units();
    }

    fn register_length_units(&mut self) {
        // normalize to meter
        self.register_combined(
            Unit::FeetInches,
            r#"\b(\d{1,2})' ?(\d{1,2}(?:\.\d{1,3})?)""#,
            &[Unit::Feet, Unit::Inches],
            feet_and_inches,
        );
        self.register_guarded(Unit::Kilometers, r" ?(?:km|kilomet(?:er|re)s?)\b", "1000", RATE_SUFFIX);
        self.register_guarded(Unit::Meters, r" ?met(?:er|re)s?\b", "1", RATE_SUFFIX);
        self.register_guarded(Unit::Miles, r" ?mi(?:les?)?\b", "1609.34", RATE_SUFFIX);
        self.register(Unit::Yards, r" ?(?:yards?|yd)\b", "0.9144");
        self.register_guarded(Unit::Feet, r"(?:'| ?(?:feet|foot|ft)\b)", "0.3048", TICK_SUFFIX);
        self.register(Unit::Inches, r#"(?:"| ?inch(?:es)?\b|in\b)"#, "0.0254");
    }

    fn register_mass_units(&mut self) {
        // normalize to kilogram
        self.register(Unit::Kilograms, r" ?(?:kg|kilogram(?:me)?s?|kilos?)\b", "1");
        self.register(Unit::Pounds, r" ?(?:lbs?|pounds?)\b", "0.453592");
    }

    fn register_volume_units(&mut self) {
        // normalize to cubic meter
        self.register(Unit::CubicMeters, r" ?(?:(?:m3|m\^3|cubic met(?:er|re)s?)\b|m³)", "1");
        self.register(Unit::Liters, r"(?:l| ?lit(?:er|re)s?)\b", "0.001");
        self.register(
            Unit::FluidOunces,
            r" ?(?:oz\.?|fl\.? ?oz\.?|ounces?|fl\.? ?ounces?|fluid ?oz\.?|fluid ?ounces?)\b",
            "0.0000295735",
        );
        self.register(Unit::Gallons, r" ?gal(?:lons?)?\b", "0.00378541");
    }

    fn register_velocity_units(&mut self) {
        // normalize to meters per second
        self.register(
            Unit::MetersPerSecond,
            r" ?(?:m/s|met(?:er|re)s? ?/ ?s(?:ec(?:ond)?)?|met(?:er|re)s? (?:per|a) second)\b",
            "1",
        );
        self.register(
            Unit::KilometersPerHour,
            r" ?(?:kilomet(?:er|re)s? (?:per|an) hour|kph|km ?/ ?h|kmh)\b",
            "0.277778",
        );
        self.register(Unit::MilesPerHour, r" ?(?:miles? (?:per|an) hour|mph)\b", "0.44704");
    }

    fn register_time_units(&mut self) {
        // normalize to seconds
        self.register(Unit::Months, r" ?months?\b", "2592000");
        self.register(Unit::Weeks, r" ?(?:weeks?|wks?)\b", "604800");
        self.register(Unit::Days, r" ?days?\b", "86400");
        self.register(Unit::Hours, r" ?(?:hours?|hrs?)\b", "3600");
        self.register(Unit::Minutes, r" ?(?:minutes?|mins?)\b", "60");
        self.register(Unit::Seconds, r" ?(?:seconds?|secs?)\b", "1");
    }

    fn register_power_units(&mut self) {
        // normalize to kilowatts
        self.register(Unit::Kilowatts, r" ?(?:kw|kilowatts?)\b", "1");
        self.register(Unit::Watts, r" ?watts?\b", "0.001");
        self.register(Unit::Horsepower, r" ?(?:hp|bhp|whp|horse ?power)\b", "0.745699872");
    }
}

impl Default for PatternTable {
    fn default() -> Self {
        Self::new()
    }
}

/// `5'7"` to meters: feet and inches summed
fn feet_and_inches(groups: &[Number]) -> Number {
    let factors = [Number::from_scaled(3048, 4), Number::from_scaled(254, 4)];
    groups
        .iter()
        .zip(factors.iter())
        .fold(Number::from_i64(0), |total, (value, factor)| total.add(&value.mul(factor)))
}

fn numeric_pattern(suffix: &str) -> Regex {
    compile(&format!("(?i){}{}", RE_NUM, suffix))
}

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("unit pattern literal should be a valid regex")
}

fn literal_factor(factor: &str) -> Number {
    Number::from_str(factor).expect("conversion factor literal should be a valid decimal")
}
