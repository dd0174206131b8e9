//! Useless units - whimsical renderings of base-unit values

use std::sync::LazyLock;
use rand::Rng;
use serde::Deserialize;
use tracing::warn;
use absurdum_core::Number;
use crate::Category;
use crate::pretty::{prettify_with, PrettyConfig};

/// Global useless unit table
pub static USELESS_UNITS: LazyLock<UselessTable> = LazyLock::new(UselessTable::new);

/// How a base value relates to a useless unit
#[derive(Debug, Clone, PartialEq)]
pub enum Rate {
    /// `rate` useless units per base unit
    Times(Number),
    /// `rate` base units per useless unit
    Per(Number),
}

impl Rate {
    pub fn convert(&self, base: &Number) -> Result<Number, absurdum_core::NumberError> {
        match self {
            Rate::Times(rate) => Ok(base.mul(rate)),
            Rate::Per(rate) => base.checked_div(rate),
        }
    }
}

#[derive(Debug, Clone)]
pub struct UselessUnit {
    pub category: Category,
    /// Interchangeable spellings; one is chosen at render time
    pub names: &'static [&'static str],
    pub rate: Rate,
}

impl UselessUnit {
    pub fn convert(&self, base: &Number) -> Result<Number, absurdum_core::NumberError> {
        self.rate.convert(base)
    }
}

/// Source of the random choices made while rendering
pub trait Picker {
    /// An index in `0..len`; `len` is never zero
    fn pick(&mut self, len: usize) -> usize;
}

/// Picker backed by any `rand` generator
pub struct RngPicker<R: Rng>(pub R);

impl<R: Rng> Picker for RngPicker<R> {
    fn pick(&mut self, len: usize) -> usize {
        self.0.gen_range(0..len)
    }
}

/// Options for `UselessTable::render`
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub pretty: PrettyConfig,
    /// Converted values below this are not rendered
    pub min_display: Option<Number>,
    /// Categories the floor does not apply to
    pub min_display_exempt: Vec<Category>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        RenderConfig {
            pretty: PrettyConfig::default(),
            min_display: None,
            min_display_exempt: Vec::new(),
        }
    }
}

impl RenderConfig {
    fn allows(&self, category: Category, value: &Number) -> bool {
        match &self.min_display {
            Some(floor) => self.min_display_exempt.contains(&category) || value >= floor,
            None => true,
        }
    }
}

/// Useless units grouped by category
pub struct UselessTable {
    units: Vec<UselessUnit>,
}

impl UselessTable {
    pub fn new() -> Self {
        let mut table = UselessTable { units: Vec::new() };
        table.register_all();
        table
    }

    /// Units of a category
    pub fn for_category(&self, category: Category) -> Vec<&UselessUnit> {
        self.units.iter().filter(|u| u.category == category).collect()
    }

    /// Render `base` (in the category's base unit) as a randomly chosen
    /// useless unit: `"<pretty value> <name>"`.
    ///
    /// Returns `None` when the category has no useless units, the conversion
    /// fails, or the result is below the configured floor.
    pub fn render(
        &self,
        category: Category,
        base: &Number,
        config: &RenderConfig,
        picker: &mut dyn Picker,
    ) -> Option<String> {
        let candidates = self.for_category(category);
        if candidates.is_empty() {
            return None;
        }
        let unit = candidates.get(picker.pick(candidates.len()))?;

        let value = match unit.convert(base) {
            Ok(value) => value,
            Err(err) => {
                warn!(category = %category, error = %err, "useless conversion failed");
                return None;
            }
        };

        if !config.allows(category, &value) {
            return None;
        }

        let name = unit.names.get(picker.pick(unit.names.len()))?;
        Some(format!("{} {}", prettify_with(&value, &config.pretty), name))
    }

    fn add(&mut self, category: Category, names: &'static [&'static str], rate: Rate) {
        self.units.push(UselessUnit { category, names, rate });
    }

    fn times(&mut self, category: Category, names: &'static [&'static str], rate: &str) {
        self.add(category, names, Rate::Times(literal_rate(rate)));
    }

    fn per(&mut self, category: Category, names: &'static [&'static str], rate: &str) {
        self.add(category, names, Rate::Per(literal_rate(rate)));
    }

    fn register_all(&mut self) {
        use Category::*;

        // per meter
        self.times(Length, &["beard-minutes"], "1666666.66667");
        self.times(Length, &["beard-hours"], "27777.7777778");
        self.times(Length, &["attoparsec", "attoParsecs"], "32.4077929");
        self.per(Length, &["pico light seconds"], "0.0002998");
        self.times(Length, &["smoot"], "0.587613116");

        // per kilogram
        self.times(Mass, &["zepto-jupiters", "zepto jupiter mass"], "0.00000052665");
        self.times(Mass, &["dynes"], "980665");
        self.per(Mass, &["cement bags"], "42.6");

        // per cubic meter
        self.times(Volume, &["barn megaparsecs", "barn-megaparsec"], "324078");
        self.times(Volume, &["Hubble-barn"], "76.6");
        self.times(Volume, &["acre-feet"], "0.000810713194");

        // per meter per second
        self.times(Velocity, &["attoParsecs / microfortnight", "attoparsec per microfortnight"], "39.2004663");
        self.times(Velocity, &["smoots / nanocentury", "smoot per nanocentury"], "1.854");
        self.times(Velocity, &["light seconds / dog year", "light-seconds per dog year"], "0.01503");

        // per second
        self.per(Time, &["microcenturies"], "3155.69");
        self.per(Time, &["nanocenturies"], "3.155");
        self.times(Time, &["microfortnights"], "0.8267");
        self.per(Time, &["dog years"], "4505160");

        // per kilowatt
        self.times(Power, &["donkey power", "brake donkey power"], "4");
    }
}

impl Default for UselessTable {
    fn default() -> Self {
        Self::new()
    }
}

fn literal_rate(rate: &str) -> Number {
    Number::from_str(rate).expect("useless rate literal should be a valid decimal")
}
