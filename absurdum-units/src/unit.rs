//! Canonical units recognized in text

use std::fmt;
use serde::{Serialize, Serializer};
use crate::Category;

/// A canonical unit symbol a pattern resolves to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Unit {
    // Length
    Kilometers,
    Meters,
    Miles,
    Yards,
    Feet,
    Inches,
    /// Tick-mark notation `5'7"`, only ever a combination of feet and inches
    FeetInches,

    // Mass
    Kilograms,
    Pounds,

    // Volume
    CubicMeters,
    Liters,
    FluidOunces,
    Gallons,

    // Velocity
    MetersPerSecond,
    KilometersPerHour,
    MilesPerHour,

    // Time
    Months,
    Weeks,
    Days,
    Hours,
    Minutes,
    Seconds,

    // Power
    Kilowatts,
    Watts,
    Horsepower,
}

impl Unit {
    /// The canonical symbol (e.g., "kilometers", "m/s", "fl oz")
    pub fn symbol(&self) -> &'static str {
        match self {
            Unit::Kilometers => "kilometers",
            Unit::Meters => "meters",
            Unit::Miles => "miles",
            Unit::Yards => "yards",
            Unit::Feet => "feet",
            Unit::Inches => "inches",
            Unit::FeetInches => "feet-inches",
            Unit::Kilograms => "kilograms",
            Unit::Pounds => "pounds",
            Unit::CubicMeters => "cubic meters",
            Unit::Liters => "liters",
            Unit::FluidOunces => "fl oz",
            Unit::Gallons => "gallons",
            Unit::MetersPerSecond => "m/s",
            Unit::KilometersPerHour => "kph",
            Unit::MilesPerHour => "mph",
            Unit::Months => "months",
            Unit::Weeks => "weeks",
            Unit::Days => "days",
            Unit::Hours => "hours",
            Unit::Minutes => "minutes",
            Unit::Seconds => "seconds",
            Unit::Kilowatts => "kilowatts",
            Unit::Watts => "watts",
            Unit::Horsepower => "hp",
        }
    }

    /// Category the unit belongs to
    pub fn category(&self) -> Category {
        match self {
            Unit::Kilometers | Unit::Meters | Unit::Miles | Unit::Yards
            | Unit::Feet | Unit::Inches | Unit::FeetInches => Category::Length,
            Unit::Kilograms | Unit::Pounds => Category::Mass,
            Unit::CubicMeters | Unit::Liters | Unit::FluidOunces | Unit::Gallons => Category::Volume,
            Unit::MetersPerSecond | Unit::KilometersPerHour | Unit::MilesPerHour => Category::Velocity,
            Unit::Months | Unit::Weeks | Unit::Days | Unit::Hours
            | Unit::Minutes | Unit::Seconds => Category::Time,
            Unit::Kilowatts | Unit::Watts | Unit::Horsepower => Category::Power,
        }
    }

    /// Display suffixes used when re-rendering a value in this unit.
    ///
    /// A leading space is part of the name: `5 meters` but `5m`.
    pub fn names(&self) -> &'static [&'static str] {
        match self {
            Unit::Kilometers => &[" kilometers", "km"],
            Unit::Meters => &[" meters", "m"],
            Unit::Miles => &[" miles", "mi"],
            Unit::Yards => &[" yards", "yd"],
            Unit::Feet => &[" feet", "ft"],
            Unit::Inches => &[" inches", "in"],
            Unit::FeetInches => &[" feet and inches"],
            Unit::Kilograms => &[" kilograms", "kg"],
            Unit::Pounds => &[" pounds", "lb"],
            Unit::CubicMeters => &[" cubic meters", "m^3"],
            Unit::Liters => &[" liters", "l"],
            Unit::FluidOunces => &[" fl oz", " fluid ounces", "fl.oz", " fl.oz."],
            Unit::Gallons => &[" gallons", "gal"],
            Unit::MetersPerSecond => &["m/s", " meters per second"],
            Unit::KilometersPerHour => &["kph", "km/h", " kilometers per hour"],
            Unit::MilesPerHour => &["mph", " miles per hour"],
            Unit::Months => &[" months"],
            Unit::Weeks => &[" weeks", "wks"],
            Unit::Days => &[" days"],
            Unit::Hours => &[" hours", "hrs"],
            Unit::Minutes => &[" minutes", "mins"],
            Unit::Seconds => &[" seconds", "secs"],
            Unit::Kilowatts => &[" kilowatts", "kW"],
            Unit::Watts => &[" watts", "W"],
            Unit::Horsepower => &["hp", " horsepower"],
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

impl Serialize for Unit {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.symbol())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbols() {
        assert_eq!(Unit::Kilometers.symbol(), "kilometers");
        assert_eq!(Unit::MetersPerSecond.to_string(), "m/s");
        assert_eq!(Unit::FluidOunces.symbol(), "fl oz");
    }

    #[test]
    fn test_categories() {
        assert_eq!(Unit::FeetInches.category(), Category::Length);
        assert_eq!(Unit::MilesPerHour.category(), Category::Velocity);
        assert_eq!(Unit::Watts.category(), Category::Power);
    }

    #[test]
    fn test_every_unit_has_a_name() {
        let units = [
            Unit::Kilometers, Unit::Meters, Unit::Miles, Unit::Yards, Unit::Feet,
            Unit::Inches, Unit::FeetInches, Unit::Kilograms, Unit::Pounds,
            Unit::CubicMeters, Unit::Liters, Unit::FluidOunces, Unit::Gallons,
            Unit::MetersPerSecond, Unit::KilometersPerHour, Unit::MilesPerHour,
            Unit::Months, Unit::Weeks, Unit::Days, Unit::Hours, Unit::Minutes,
            Unit::Seconds, Unit::Kilowatts, Unit::Watts, Unit::Horsepower,
        ];
        for unit in units {
            assert!(!unit.names().is_empty(), "{} has no display name", unit);
        }
    }

    #[test]
    fn test_serialize_as_symbol() {
        let json = serde_json::to_string(&Unit::KilometersPerHour).unwrap();
        assert_eq!(json, "\"kph\"");
    }
}
