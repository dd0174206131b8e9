//! Idiomatic phrases that look like quantities but are not

/// Literal lower-cased phrases never treated as a mention
pub const DENYLIST: [&str; 16] = [
    "1ft",
    "1 ft",
    "10ft",      // 10-foot pole
    "10 foot",
    "2 feet",
    "9 yards",   // whole nine yards
    "1000 yard", // thousand-yard stare
    "8 mile",    // another movie
    "12oz",
    "24 hour",
    "24 hours",
    "1 day",
    "7 days",
    "30 days",
    "365 days",
    "12 months",
];

/// Whether a matched span is a known false positive.
///
/// The span is compared after lower-casing and trimming; only an exact
/// phrase match counts.
pub fn is_denied(matched: &str) -> bool {
    let normalized = matched.trim().to_lowercase();
    DENYLIST.contains(&normalized.as_str())
}
