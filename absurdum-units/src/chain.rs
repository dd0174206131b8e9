//! Chain assembly - merge adjacent mentions like "5 feet 7 inches"
//!
//! A chain is an ordered list of units of one category. Occurrences of
//! consecutive units of a chain, separated only by whitespace or a chain
//! word, form a single compound mention.

use std::ops::Range;
use tracing::debug;
use crate::{Category, Unit};
use crate::quantity::{CompoundQuantity, Mention, Source};
use crate::scan::Occurrence;

/// An ordered unit sequence that may be written as one measurement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chain {
    pub category: Category,
    pub units: &'static [Unit],
}

impl Chain {
    pub fn starts_with(&self, unit: Unit) -> bool {
        self.units.first() == Some(&unit)
    }
}

/// Known chains
pub static CHAINS: [Chain; 3] = [
    Chain { category: Category::Length, units: &[Unit::Feet, Unit::Inches] },
    Chain { category: Category::Time, units: &[Unit::Minutes, Unit::Seconds] },
    Chain { category: Category::Time, units: &[Unit::Hours, Unit::Minutes, Unit::Seconds] },
];

/// Words allowed between two links of a chain, besides whitespace
pub const CHAIN_WORDS: [&str; 2] = ["and", ","];

/// First chain of `category` whose leading unit is `unit`
pub fn chain_starting_with(category: Category, unit: Unit) -> Option<&'static Chain> {
    CHAINS
        .iter()
        .find(|chain| chain.category == category && chain.starts_with(unit))
}

/// Whether the text between two spans is empty, whitespace, or a chain word.
///
/// Links only run forward: `next_start` before `prev_end` is never adjacent.
pub fn is_adjacent(text: &str, prev_end: usize, next_start: usize) -> bool {
    if next_start < prev_end {
        return false;
    }
    match text.get(prev_end..next_start) {
        Some(gap) => {
            let gap = gap.trim().to_lowercase();
            gap.is_empty() || CHAIN_WORDS.contains(&gap.as_str())
        }
        None => false,
    }
}

/// Whether spans, in order, form a valid chain: at least two, each adjacent
/// to the one before it
pub fn valid_chain(text: &str, spans: &[Range<usize>]) -> bool {
    spans.len() >= 2
        && spans.windows(2).all(|pair| is_adjacent(text, pair[0].end, pair[1].start))
}

/// A chain being filled while walking the occurrences
struct Candidate<'t> {
    chain: &'static Chain,
    links: Vec<(usize, Occurrence<'t>)>,
}

impl<'t> Candidate<'t> {
    fn expects(&self) -> Option<Unit> {
        self.chain.units.get(self.links.len()).copied()
    }

    fn tail_end(&self) -> usize {
        self.links.last().map_or(0, |(_, tail)| tail.span.end)
    }

    /// Next unit in chain order, somewhere after the current tail.
    ///
    /// Adjacency is not checked here; `close` validates the finished chain.
    fn accepts(&self, occurrence: &Occurrence<'_>) -> bool {
        self.expects() == Some(occurrence.unit()) && self.tail_end() <= occurrence.span.start
    }
}

/// Turn one category's occurrences into mentions.
///
/// Occurrences join the nearest open chain expecting their unit. A chain
/// whose links are all adjacent becomes a compound; otherwise every link is
/// reported on its own, as is everything outside a chain. Mentions keep the
/// order their first occurrence had in the input.
pub fn assemble<'t>(text: &'t str, occurrences: Vec<Occurrence<'t>>) -> Vec<Mention> {
    let mut mentions: Vec<(usize, Mention)> = Vec::new();
    let mut candidates: Vec<Candidate<'t>> = Vec::new();

    for (index, occurrence) in occurrences.into_iter().enumerate() {
        if occurrence.definition.is_combined() {
            mentions.push((index, occurrence.into_mention()));
            continue;
        }

        let nearest = candidates
            .iter_mut()
            .filter(|c| c.accepts(&occurrence))
            .max_by_key(|c| c.tail_end());
        if let Some(candidate) = nearest {
            candidate.links.push((index, occurrence));
            continue;
        }

        match chain_starting_with(occurrence.category(), occurrence.unit()) {
            Some(chain) => candidates.push(Candidate {
                chain,
                links: vec![(index, occurrence)],
            }),
            None => mentions.push((index, occurrence.into_mention())),
        }
    }

    for candidate in candidates {
        mentions.extend(close(text, candidate));
    }

    mentions.sort_by_key(|(index, _)| *index);
    mentions.into_iter().map(|(_, mention)| mention).collect()
}

/// Finish a candidate: a compound when it is a valid chain, otherwise each
/// link on its own
fn close(text: &str, candidate: Candidate<'_>) -> Vec<(usize, Mention)> {
    let spans: Vec<Range<usize>> = candidate.links.iter().map(|(_, o)| o.span.clone()).collect();

    if !valid_chain(text, &spans) {
        if candidate.links.len() > 1 {
            debug!(chain = ?candidate.chain.units, "chain fell back to single mentions");
        }
        return candidate
            .links
            .into_iter()
            .map(|(index, occurrence)| (index, occurrence.into_mention()))
            .collect();
    }

    let first_index = candidate.links[0].0;
    let start = spans[0].start;
    let end = spans[spans.len() - 1].end;
    let parts = candidate.links.iter().map(|(_, o)| o.to_quantity()).collect();
    let source = Source::slice(text, start, end);
    let compound = CompoundQuantity::chained(candidate.chain.category, parts, source);
    vec![(first_index, Mention::Compound(compound))]
}
