//! Absurdum Units - quantity mentions in free text
//!
//! Scans prose for physical quantities, normalizes them to a base unit per
//! category, and re-renders them in deliberately useless units.
//!
//! Categories:
//! - Length (km, m, mi, yd, ft, in, `5'7"`) in meters
//! - Mass (kg, lb) in kilograms
//! - Volume (m³, l, fl oz, gal) in cubic meters
//! - Velocity (m/s, kph, mph) in meters per second
//! - Time (months down to seconds) in seconds
//! - Power (kW, W, hp) in kilowatts

mod category;
mod chain;
mod denylist;
mod error;
mod pretty;
mod quantity;
mod scan;
mod unit;
mod units;
mod useless;

use std::collections::VecDeque;
use absurdum_core::Number;

pub use category::Category;
pub use chain::{assemble, is_adjacent, valid_chain, Chain, CHAINS, CHAIN_WORDS};
pub use denylist::{is_denied, DENYLIST};
pub use error::UnitsError;
pub use pretty::{prettify, prettify_with, PrettyConfig};
pub use quantity::{CompoundQuantity, Mention, Quantity, Source};
pub use scan::{scan, scan_category, Occurrence};
pub use unit::Unit;
pub use units::{Combiner, Conversion, PatternTable, UnitDefinition, PATTERNS, RE_NUM};
pub use useless::{Picker, Rate, RenderConfig, RngPicker, UselessTable, UselessUnit, USELESS_UNITS};

/// Lazy stream of mentions, one category at a time.
///
/// Ordered by category, then by notation within the category, then
/// leftmost first; a compound takes the place of its first part.
#[derive(Clone)]
pub struct Mentions<'t> {
    text: &'t str,
    categories: std::slice::Iter<'static, Category>,
    pending: VecDeque<Mention>,
}

impl<'t> Iterator for Mentions<'t> {
    type Item = Mention;

    fn next(&mut self) -> Option<Mention> {
        loop {
            if let Some(mention) = self.pending.pop_front() {
                return Some(mention);
            }
            let category = self.categories.next()?;
            self.pending.extend(assemble(self.text, scan_category(self.text, *category)));
        }
    }
}

/// Every mention in `text`
pub fn find_all(text: &str) -> Mentions<'_> {
    Mentions {
        text,
        categories: Category::ALL.iter(),
        pending: VecDeque::new(),
    }
}

/// The first mention `find_all` would yield
pub fn find_first(text: &str) -> Option<Mention> {
    find_all(text).next()
}

/// Every mention, converted to its category's base unit
pub fn find_normalized(text: &str) -> impl Iterator<Item = Quantity> + '_ {
    find_all(text).map(|mention| mention.to_normal())
}

/// Render a base-unit value as a randomly chosen useless unit
pub fn render_useless(category: Category, base: &Number) -> Option<String> {
    let mut picker = thread_picker();
    render_useless_with(category, base, &RenderConfig::default(), &mut picker)
}

/// Picker drawing from the thread-local generator
pub fn thread_picker() -> RngPicker<rand::rngs::ThreadRng> {
    RngPicker(rand::thread_rng())
}

/// `render_useless` with explicit options and randomness
pub fn render_useless_with(
    category: Category,
    base: &Number,
    config: &RenderConfig,
    picker: &mut dyn Picker,
) -> Option<String> {
    USELESS_UNITS.render(category, base, config, picker)
}

/// The mention with the largest written number, regardless of unit or
/// category. Ties keep the earliest.
pub fn largest_raw<I>(mentions: I) -> Option<Mention>
where
    I: IntoIterator<Item = Mention>,
{
    mentions.into_iter().reduce(|best, next| {
        if next.raw_magnitude() > best.raw_magnitude() { next } else { best }
    })
}

/// Parse a user-supplied amount such as `"1,234.5"`
pub fn parse_amount(s: &str) -> Result<Number, UnitsError> {
    Ok(Number::from_grouped(s.trim())?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn num(s: &str) -> Number {
        Number::from_str(s).unwrap()
    }

    fn single(text: &str) -> Quantity {
        let found: Vec<Mention> = find_all(text).collect();
        assert_eq!(found.len(), 1, "expected one mention in {:?}, got {:?}", text, found);
        found[0].as_single().cloned().unwrap()
    }

    const VALUES: [(&str, &str); 6] = [
        ("42", "42"),
        ("1234", "1234"),
        ("60,018", "60018"),
        ("70 018", "70018"),
        ("80'018", "80018"),
        ("43,778,147.0000016", "43778147.0000016"),
    ];

    fn assert_detected(format: &str, unit: Unit) {
        for (written, parsed) in VALUES {
            let text = format!("blah {} blah", format.replace("{}", written));
            let quantity = single(&text);
            assert_eq!(quantity.unit, Some(unit), "in {:?}", text);
            assert_eq!(quantity.value.to_plain_string(), parsed, "in {:?}", text);
        }
    }

    mod detection_tests {
        use super::*;

        #[test]
        fn test_length_formats() {
            assert_detected("{} km", Unit::Kilometers);
            assert_detected("{}km", Unit::Kilometers);
            assert_detected("{} kilometers", Unit::Kilometers);
            assert_detected("{} meters", Unit::Meters);
            assert_detected("{} metres", Unit::Meters);
            assert_detected("{} miles", Unit::Miles);
            assert_detected("{} yards", Unit::Yards);
            assert_detected("{} feet", Unit::Feet);
            assert_detected("{}ft", Unit::Feet);
            assert_detected("{} inches", Unit::Inches);
        }

        #[test]
        fn test_mass_formats() {
            assert_detected("{} kg", Unit::Kilograms);
            assert_detected("{} kilograms", Unit::Kilograms);
            assert_detected("{} lbs", Unit::Pounds);
            assert_detected("{} pounds", Unit::Pounds);
        }

        #[test]
        fn test_volume_formats() {
            assert_detected("{} liters", Unit::Liters);
            assert_detected("{}l", Unit::Liters);
            assert_detected("{} gallons", Unit::Gallons);
            assert_detected("{} fl oz", Unit::FluidOunces);
            assert_detected("{} m3", Unit::CubicMeters);
        }

        #[test]
        fn test_velocity_formats() {
            assert_detected("{} mph", Unit::MilesPerHour);
            assert_detected("{} miles per hour", Unit::MilesPerHour);
            assert_detected("{} kph", Unit::KilometersPerHour);
            assert_detected("{} km/h", Unit::KilometersPerHour);
            assert_detected("{} m/s", Unit::MetersPerSecond);
        }

        #[test]
        fn test_time_formats() {
            assert_detected("{} weeks", Unit::Weeks);
            assert_detected("{} hours", Unit::Hours);
            assert_detected("{} minutes", Unit::Minutes);
            assert_detected("{} secs", Unit::Seconds);
        }

        #[test]
        fn test_power_formats() {
            assert_detected("{} kW", Unit::Kilowatts);
            assert_detected("{} watts", Unit::Watts);
            assert_detected("{} hp", Unit::Horsepower);
            assert_detected("{} horsepower", Unit::Horsepower);
        }
    }

    #[test]
    fn test_every_notation_detected() {
        let examples = [
            ("12km", Unit::Kilometers),
            ("12 kilometres", Unit::Kilometers),
            ("3 meters", Unit::Meters),
            ("3 mi", Unit::Miles),
            ("3 yd", Unit::Yards),
            ("3 ft", Unit::Feet),
            ("3in", Unit::Inches),
            ("3 kilos", Unit::Kilograms),
            ("3 lb", Unit::Pounds),
            ("3 m^3", Unit::CubicMeters),
            ("3 litres", Unit::Liters),
            ("3 oz", Unit::FluidOunces),
            ("3 gal", Unit::Gallons),
            ("3 m/s", Unit::MetersPerSecond),
            ("3 kmh", Unit::KilometersPerHour),
            ("3 mph", Unit::MilesPerHour),
            ("3 months", Unit::Months),
            ("3 wks", Unit::Weeks),
            ("3 days", Unit::Days),
            ("3 hrs", Unit::Hours),
            ("3 mins", Unit::Minutes),
            ("3 seconds", Unit::Seconds),
            ("3 kilowatts", Unit::Kilowatts),
            ("3 watts", Unit::Watts),
            ("3 bhp", Unit::Horsepower),
        ];
        for (text, unit) in examples {
            let quantity = single(text);
            assert_eq!(quantity.unit, Some(unit), "in {:?}", text);
            assert_eq!(quantity.category, unit.category(), "in {:?}", text);
        }
    }

    #[test]
    fn test_separator_styles() {
        for text in ["1,234 km", "1 234 km", "1'234 km"] {
            assert_eq!(single(text).value, num("1234"), "in {:?}", text);
        }
    }

    #[test]
    fn test_denylisted_phrases() {
        assert!(find_first("8 mile").is_none());
        assert!(find_first("the whole 9 yards").is_none());
        assert!(find_first("open 24 hours").is_none());
    }

    #[test]
    fn test_tick_notation() {
        let found: Vec<Mention> = find_all(r#"he is 5'7""#).collect();
        assert_eq!(found.len(), 1);
        let compound = found[0].as_compound().unwrap();
        assert_eq!(compound.units(), vec![Unit::Feet, Unit::Inches]);
        assert_eq!(compound.parts[0].value, num("5"));
        assert_eq!(compound.parts[1].value, num("7"));
    }

    #[test]
    fn test_chained_time() {
        let found: Vec<Mention> = find_all("2 hours and 7 minutes").collect();
        assert_eq!(found.len(), 1);
        assert!(found[0].is_compound());
        assert_eq!(found[0].category(), Category::Time);
    }

    #[test]
    fn test_mixed_text_order() {
        let found: Vec<Mention> = find_all("I walked 12 miles to have 5 minutes of peace.").collect();
        assert_eq!(found.len(), 2);
        let miles = found[0].as_single().unwrap();
        assert_eq!(miles.unit, Some(Unit::Miles));
        assert_eq!(miles.value, num("12"));
        let minutes = found[1].as_single().unwrap();
        assert_eq!(minutes.unit, Some(Unit::Minutes));
        assert_eq!(minutes.value, num("5"));
    }

    #[test]
    fn test_find_first() {
        let first = find_first("5 minutes then 12 miles").unwrap();
        assert_eq!(first.category(), Category::Length);
        assert!(find_first("you might as well go 0 mph").is_none());
        assert!(find_first("nothing to see here").is_none());
    }

    #[test]
    fn test_find_normalized() {
        let normal: Vec<Quantity> = find_normalized("300 km, or 25 yards").collect();
        assert_eq!(normal.len(), 2);
        assert_eq!(normal[0], Quantity::normalized(Category::Length, num("300000")));
        assert_eq!(normal[1].value, num("22.86"));
        assert!(normal.iter().all(|q| q.is_normal()));
        assert_eq!(normal[0].original_text(), "300 km");
    }

    #[test]
    fn test_largest_raw() {
        let largest = largest_raw(find_all("3 km and 400 seconds and 12 kg")).unwrap();
        assert_eq!(largest.category(), Category::Time);
        assert!(largest_raw(find_all("")).is_none());

        let tie = largest_raw(find_all("5 km, 5 kg")).unwrap();
        assert_eq!(tie.category(), Category::Length);
    }

    #[test]
    fn test_render_useless() {
        let rendered = render_useless(Category::Power, &num("10")).unwrap();
        assert!(rendered.starts_with("40 "), "{}", rendered);
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("1,234.5").unwrap(), num("1234.5"));
        assert!(matches!(parse_amount("abc"), Err(UnitsError::NumberParse(_))));
    }

    #[test]
    fn test_mentions_iterator_is_lazy_and_cloneable() {
        let mut mentions = find_all("1 kg and 2 kg");
        let snapshot = mentions.clone();
        assert!(mentions.next().is_some());
        assert_eq!(snapshot.count(), 2);
    }
}
