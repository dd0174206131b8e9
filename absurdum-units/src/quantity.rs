//! Quantity types - recognized mentions and their normalized values

use std::fmt;
use serde::Serialize;
use absurdum_core::Number;
use crate::{Category, Unit};
use crate::pretty::prettify;
use crate::units::{Combiner, PATTERNS};
use crate::useless::{Picker, RenderConfig, USELESS_UNITS};

/// Where a mention came from in the scanned text
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Source {
    /// Byte offset of the first matched character
    pub start: usize,
    /// Byte offset just past the match
    pub end: usize,
    /// The matched text, verbatim
    pub text: String,
}

impl Source {
    pub fn new(start: usize, end: usize, text: impl Into<String>) -> Self {
        Source { start, end, text: text.into() }
    }

    /// Span covering `text[start..end]`, or `None` if the range is not a
    /// valid slice of `text`
    pub fn slice(text: &str, start: usize, end: usize) -> Option<Self> {
        text.get(start..end).map(|s| Source::new(start, end, s))
    }
}

/// A single value in a category.
///
/// With a unit, `value` is in that unit's own scale. Without one, `value` is
/// already in the category's base unit.
#[derive(Debug, Clone, Serialize)]
pub struct Quantity {
    pub category: Category,
    pub value: Number,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<Unit>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<Source>,
}

impl Quantity {
    /// A raw value in `unit`
    pub fn new(value: Number, unit: Unit) -> Self {
        Quantity {
            category: unit.category(),
            value,
            unit: Some(unit),
            source: None,
        }
    }

    /// A value already expressed in the category's base unit
    pub fn normalized(category: Category, value: Number) -> Self {
        Quantity { category, value, unit: None, source: None }
    }

    /// Attach the text the value was read from
    pub fn with_source(mut self, source: Source) -> Self {
        self.source = Some(source);
        self
    }

    pub fn is_normal(&self) -> bool {
        self.unit.is_none()
    }

    /// Convert to the category's base unit. Normalized values come back
    /// unchanged.
    pub fn to_normal(&self) -> Quantity {
        let Some(unit) = self.unit else {
            return self.clone();
        };

        let value = match PATTERNS.conversion(unit) {
            Some(conversion) => conversion.apply(std::slice::from_ref(&self.value)),
            None => self.value.clone(),
        };

        Quantity {
            category: self.category,
            value,
            unit: None,
            source: self.source.clone(),
        }
    }

    /// Equality after normalization, at the coarser of the two precisions.
    ///
    /// A value that quantizes to zero equals nothing, not even another zero.
    pub fn quantized_eq(&self, other: &Quantity) -> bool {
        let normal = self.to_normal();
        let other = other.to_normal();
        if normal.category != other.category {
            return false;
        }

        let places = normal.value.fractional_digits().min(other.value.fractional_digits());
        let normal_val = normal.value.quantize(places);
        let other_val = other.value.quantize(places);

        if normal_val.is_zero() {
            return false;
        }
        normal_val == other_val
    }

    /// Pretty value followed by a randomly chosen name of the unit
    pub fn format_unit(&self, picker: &mut dyn Picker) -> String {
        match self.unit {
            Some(unit) => {
                let names = unit.names();
                let name = names.get(picker.pick(names.len())).copied().unwrap_or("");
                format!("{}{}", prettify(&self.value), name)
            }
            None => self.to_string(),
        }
    }

    /// The text this value was read from, or a best-effort rendering
    pub fn original_text(&self) -> String {
        match (&self.source, self.unit) {
            (Some(source), _) => source.text.clone(),
            (None, Some(_)) => self.to_string(),
            (None, None) => format!("[unknown] {} {}", self.value, self.category),
        }
    }

    /// Render in a randomly chosen useless unit of the same category
    pub fn to_useless(&self, picker: &mut dyn Picker) -> Option<String> {
        let normal = self.to_normal();
        USELESS_UNITS.render(normal.category, &normal.value, &RenderConfig::default(), picker)
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.unit {
            Some(unit) => {
                let name = unit.names().first().copied().unwrap_or("");
                write!(f, "{}{}", prettify(&self.value), name)
            }
            None => write!(f, "{} ({})", self.value, self.category),
        }
    }
}

impl PartialEq for Quantity {
    fn eq(&self, other: &Self) -> bool {
        self.quantized_eq(other)
    }
}

/// One measurement split across the units of a chain (`5 feet 7 inches`)
#[derive(Debug, Clone, Serialize)]
pub struct CompoundQuantity {
    pub category: Category,
    /// Parts in the chain's declared order
    pub parts: Vec<Quantity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<Source>,
    /// Present when the whole chain came from one multi-number notation
    #[serde(skip)]
    combine: Option<Combiner>,
}

impl CompoundQuantity {
    /// Parts found as separate, adjacent matches
    pub(crate) fn chained(category: Category, parts: Vec<Quantity>, source: Option<Source>) -> Self {
        debug_assert!(parts_fit(category, &parts), "chain parts must share {}", category);
        CompoundQuantity {
            category,
            parts,
            source,
            combine: None,
        }
    }

    /// Parts captured together by one notation and folded by `combine`
    pub(crate) fn combined(
        category: Category,
        parts: Vec<Quantity>,
        combine: Combiner,
        source: Option<Source>,
    ) -> Self {
        debug_assert!(parts_fit(category, &parts), "notation parts must share {}", category);
        CompoundQuantity {
            category,
            parts,
            source,
            combine: Some(combine),
        }
    }

    /// Units of the parts, in order
    pub fn units(&self) -> Vec<Unit> {
        self.parts.iter().filter_map(|p| p.unit).collect()
    }

    /// Whether this came from a single multi-number notation
    pub fn is_combined(&self) -> bool {
        self.combine.is_some()
    }

    /// Base-unit value of the whole chain
    pub fn to_normal(&self) -> Quantity {
        let value = match self.combine {
            Some(combine) => {
                let raw: Vec<Number> = self.parts.iter().map(|p| p.value.clone()).collect();
                combine(&raw)
            }
            None => self.parts
                .iter()
                .fold(Number::from_i64(0), |total, part| total.add(&part.to_normal().value)),
        };

        Quantity {
            category: self.category,
            value,
            unit: None,
            source: self.source.clone(),
        }
    }

    pub fn original_text(&self) -> String {
        match &self.source {
            Some(source) => source.text.clone(),
            None => self.parts
                .iter()
                .map(|p| p.original_text())
                .collect::<Vec<_>>()
                .join(" "),
        }
    }
}

impl fmt::Display for CompoundQuantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self.parts.iter().map(|p| p.to_string()).collect();
        write!(f, "{}", rendered.join(" "))
    }
}

/// A compound needs at least two parts, all in `category`
fn parts_fit(category: Category, parts: &[Quantity]) -> bool {
    parts.len() >= 2 && parts.iter().all(|p| p.category == category)
}

/// Anything the scanner reports: a lone value or a chain of them
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Mention {
    Single(Quantity),
    Compound(CompoundQuantity),
}

impl Mention {
    pub fn category(&self) -> Category {
        match self {
            Mention::Single(q) => q.category,
            Mention::Compound(c) => c.category,
        }
    }

    pub fn is_compound(&self) -> bool {
        matches!(self, Mention::Compound(_))
    }

    pub fn as_single(&self) -> Option<&Quantity> {
        match self {
            Mention::Single(q) => Some(q),
            Mention::Compound(_) => None,
        }
    }

    pub fn as_compound(&self) -> Option<&CompoundQuantity> {
        match self {
            Mention::Single(_) => None,
            Mention::Compound(c) => Some(c),
        }
    }

    /// Base-unit value
    pub fn to_normal(&self) -> Quantity {
        match self {
            Mention::Single(q) => q.to_normal(),
            Mention::Compound(c) => c.to_normal(),
        }
    }

    /// Largest number written in the mention, ignoring units entirely
    pub fn raw_magnitude(&self) -> Number {
        match self {
            Mention::Single(q) => q.value.clone(),
            Mention::Compound(c) => c.parts
                .iter()
                .map(|p| p.value.clone())
                .max()
                .unwrap_or_else(|| Number::from_i64(0)),
        }
    }

    pub fn original_text(&self) -> String {
        match self {
            Mention::Single(q) => q.original_text(),
            Mention::Compound(c) => c.original_text(),
        }
    }

    /// Render the base value in a randomly chosen useless unit
    pub fn to_useless(&self, picker: &mut dyn Picker) -> Option<String> {
        self.to_normal().to_useless(picker)
    }
}

impl fmt::Display for Mention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mention::Single(q) => write!(f, "{}", q),
            Mention::Compound(c) => write!(f, "{}", c),
        }
    }
}

impl PartialEq for Mention {
    fn eq(&self, other: &Self) -> bool {
        self.to_normal().quantized_eq(&other.to_normal())
    }
}
