//! Scanner - find every unit notation of a category in free text

use std::ops::Range;
use regex::Captures;
use tracing::{debug, trace, warn};
use absurdum_core::{Number, NumberError};
use crate::{Category, Unit};
use crate::denylist::is_denied;
use crate::quantity::{CompoundQuantity, Mention, Quantity, Source};
use crate::units::{Conversion, UnitDefinition, PATTERNS};

/// One accepted match of a notation
#[derive(Debug, Clone)]
pub struct Occurrence<'t> {
    pub definition: &'static UnitDefinition,
    /// Byte range of the match in the scanned text
    pub span: Range<usize>,
    /// The matched text
    pub text: &'t str,
    /// Parsed numeric groups, in capture order
    pub groups: Vec<Number>,
}

impl<'t> Occurrence<'t> {
    pub fn unit(&self) -> Unit {
        self.definition.unit
    }

    pub fn category(&self) -> Category {
        self.definition.category()
    }

    pub fn source(&self) -> Source {
        Source::new(self.span.start, self.span.end, self.text)
    }

    /// The occurrence as a lone raw value
    pub fn to_quantity(&self) -> Quantity {
        let value = self.groups.first().cloned().unwrap_or_else(|| Number::from_i64(0));
        Quantity::new(value, self.unit()).with_source(self.source())
    }

    /// The occurrence as a reported mention. A multi-number notation becomes
    /// a compound whose parts are the notation's units.
    pub fn into_mention(self) -> Mention {
        match &self.definition.conversion {
            Conversion::Linear(_) => Mention::Single(self.to_quantity()),
            Conversion::Combined { parts, combine } => {
                let quantities = parts
                    .iter()
                    .zip(self.groups.iter())
                    .map(|(unit, value)| Quantity::new(value.clone(), *unit))
                    .collect();
                Mention::Compound(CompoundQuantity::combined(
                    self.category(),
                    quantities,
                    *combine,
                    Some(self.source()),
                ))
            }
        }
    }
}

/// All occurrences of `category` in `text`, in notation order and leftmost
/// first within a notation.
///
/// A match is dropped when it overlaps text already claimed by an earlier
/// notation, is followed by its notation's reject suffix, is a denylisted
/// phrase, has a numeric token that does not parse, or is not a positive
/// amount.
pub fn scan_category(text: &str, category: Category) -> Vec<Occurrence<'_>> {
    scan_definitions(text, PATTERNS.definitions(category))
}

/// `scan_category` over an explicit list of notations, in list order
pub(crate) fn scan_definitions<'t>(
    text: &'t str,
    definitions: &'static [UnitDefinition],
) -> Vec<Occurrence<'t>> {
    let mut claimed: Vec<Range<usize>> = Vec::new();
    let mut found = Vec::new();

    for definition in definitions {
        for caps in definition.pattern.captures_iter(text) {
            let Some(whole) = caps.get(0) else {
                continue;
            };
            let span = whole.range();
            let matched = whole.as_str();

            if claimed.iter().any(|c| overlaps(c, &span)) {
                debug!(unit = %definition.unit, matched, "skipping overlapped match");
                continue;
            }
            if definition.rejects(&text[span.end..]) {
                debug!(unit = %definition.unit, matched, "skipping match with rejected suffix");
                continue;
            }
            if is_denied(matched) {
                debug!(unit = %definition.unit, matched, "skipping denylisted phrase");
                continue;
            }

            let groups = match parse_groups(&caps) {
                Ok(groups) => groups,
                Err(err) => {
                    warn!(unit = %definition.unit, matched, error = %err, "unparseable numeric token");
                    continue;
                }
            };

            if !definition.conversion.apply(&groups).is_positive() {
                debug!(unit = %definition.unit, matched, "skipping non-positive amount");
                continue;
            }

            trace!(unit = %definition.unit, matched, start = span.start, "accepted");
            claimed.push(span.clone());
            found.push(Occurrence {
                definition,
                span,
                text: matched,
                groups,
            });
        }
    }

    found
}

/// Occurrences of every category, in category order
pub fn scan(text: &str) -> Vec<Occurrence<'_>> {
    Category::ALL
        .iter()
        .flat_map(|category| scan_category(text, *category))
        .collect()
}

fn parse_groups(caps: &Captures<'_>) -> Result<Vec<Number>, NumberError> {
    caps.iter()
        .skip(1)
        .flatten()
        .map(|m| Number::from_grouped(m.as_str()))
        .collect()
}

fn overlaps(a: &Range<usize>, b: &Range<usize>) -> bool {
    a.start < b.end && b.start < a.end
}
