//! Physical categories a mention can belong to
//!
//! The set is closed: every pattern, chain and useless unit is registered
//! under exactly one of these, and each has a single base unit that all
//! normalized values are expressed in.

use std::fmt;
use std::str::FromStr;
use serde::{Serialize, Deserialize};
use crate::UnitsError;

/// A physical dimension with its own base unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Normalizes to meters
    Length,
    /// Normalizes to kilograms
    Mass,
    /// Normalizes to cubic meters
    Volume,
    /// Normalizes to meters per second
    Velocity,
    /// Normalizes to seconds
    Time,
    /// Normalizes to kilowatts
    Power,
}

impl Category {
    /// All categories in scan order
    pub const ALL: [Category; 6] = [
        Category::Length,
        Category::Mass,
        Category::Volume,
        Category::Velocity,
        Category::Time,
        Category::Power,
    ];

    /// Lower-case category name
    pub fn name(&self) -> &'static str {
        match self {
            Category::Length => "length",
            Category::Mass => "mass",
            Category::Volume => "volume",
            Category::Velocity => "velocity",
            Category::Time => "time",
            Category::Power => "power",
        }
    }

    /// Name of the unit normalized values are expressed in
    pub fn base_unit(&self) -> &'static str {
        match self {
            Category::Length => "meters",
            Category::Mass => "kilograms",
            Category::Volume => "cubic meters",
            Category::Velocity => "m/s",
            Category::Time => "seconds",
            Category::Power => "kilowatts",
        }
    }
}

impl FromStr for Category {
    type Err = UnitsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Category::ALL
            .iter()
            .copied()
            .find(|c| c.name() == wanted)
            .ok_or_else(|| UnitsError::InvalidCategory(s.to_string()))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_category() {
        assert_eq!("length".parse::<Category>().unwrap(), Category::Length);
        assert_eq!(" Power ".parse::<Category>().unwrap(), Category::Power);
    }

    #[test]
    fn test_unknown_category() {
        let err = "temperature".parse::<Category>().unwrap_err();
        assert!(matches!(err, UnitsError::InvalidCategory(ref name) if name == "temperature"));
    }

    #[test]
    fn test_display_round_trips_name() {
        for category in Category::ALL {
            assert_eq!(category.to_string().parse::<Category>().unwrap(), category);
        }
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&Category::Velocity).unwrap();
        assert_eq!(json, "\"velocity\"");
    }
}
