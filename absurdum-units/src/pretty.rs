//! Human-friendly rendering of exact decimals
//!
//! Precision shrinks as the value grows: small values keep their decimals,
//! medium ones are whole numbers, huge ones are counted in millions.

use serde::Deserialize;
use absurdum_core::Number;

/// Rendering options for `prettify_with`
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PrettyConfig {
    /// Fractional digits computed before compaction
    pub places: usize,
    /// Values above this are rendered in millions
    pub million_threshold: i64,
    pub separator: String,
    pub decimal_point: String,
    pub positive: String,
    pub negative: String,
}

impl Default for PrettyConfig {
    fn default() -> Self {
        PrettyConfig {
            places: 6,
            million_threshold: 900_000_000,
            separator: ",".to_string(),
            decimal_point: ".".to_string(),
            positive: String::new(),
            negative: "-".to_string(),
        }
    }
}

/// Render with the default configuration
pub fn prettify(value: &Number) -> String {
    prettify_with(value, &PrettyConfig::default())
}

/// Render `value` for display.
///
/// The value is rounded half-even to `places` digits, then compacted:
/// below 1 it keeps every digit, below 10 two decimals, above the
/// threshold whole millions, otherwise the integer part. Trailing
/// fractional zeros and a dangling decimal point are removed.
pub fn prettify_with(value: &Number, config: &PrettyConfig) -> String {
    let (negative, digits) = value.scaled_digits(config.places);

    let split = digits.len().saturating_sub(config.places);
    let (int_digits, frac_digits) = digits.split_at(split);
    let int_digits = if int_digits.is_empty() { "0" } else { int_digits };
    let frac_digits = format!("{:0>width$}", frac_digits, width = config.places);

    let sign = if negative { &config.negative } else { &config.positive };

    let one = Number::from_i64(1);
    let ten = Number::from_i64(10);
    let threshold = Number::from_i64(config.million_threshold);

    let body = if *value < one {
        with_fraction(&group(int_digits, &config.separator), &config.decimal_point, &frac_digits)
    } else if *value < ten {
        let kept = &frac_digits[..frac_digits.len().min(2)];
        with_fraction(int_digits, &config.decimal_point, kept)
    } else if *value > threshold {
        let millions = &int_digits[..int_digits.len().saturating_sub(6)];
        let millions = if millions.is_empty() { "0" } else { millions };
        format!("{} million", group(millions, &config.separator))
    } else {
        group(int_digits, &config.separator)
    };

    format!("{}{}", sign, strip_fraction(body, &config.decimal_point))
}

/// Insert `separator` between groups of three digits
fn group(digits: &str, separator: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 * separator.len());
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push_str(separator);
        }
        out.push(ch);
    }
    out
}

fn with_fraction(int_part: &str, point: &str, frac: &str) -> String {
    if frac.is_empty() {
        int_part.to_string()
    } else {
        format!("{}{}{}", int_part, point, frac)
    }
}

/// Drop trailing zeros after the decimal point, then the point itself if
/// nothing follows it
fn strip_fraction(body: String, point: &str) -> String {
    if point.is_empty() || !body.contains(point) {
        return body;
    }
    let trimmed = body.trim_end_matches('0');
    trimmed.strip_suffix(point).unwrap_or(trimmed).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pretty(s: &str) -> String {
        prettify(&Number::from_str(s).unwrap())
    }

    #[test]
    fn test_small_values_keep_decimals() {
        assert_eq!(pretty("0.5"), "0.5");
        assert_eq!(pretty("0"), "0");
        assert_eq!(pretty("0.1234567"), "0.123457");
        assert_eq!(pretty("0.0000001"), "0");
    }

    #[test]
    fn test_single_digit_values_keep_two_decimals() {
        assert_eq!(pretty("5.678"), "5.67");
        assert_eq!(pretty("5"), "5");
        assert_eq!(pretty("5.5"), "5.5");
    }

    #[test]
    fn test_medium_values_are_whole() {
        assert_eq!(pretty("12345.678"), "12,345");
        assert_eq!(pretty("1234567"), "1,234,567");
        assert_eq!(pretty("900000000"), "900,000,000");
    }

    #[test]
    fn test_huge_values_in_millions() {
        assert_eq!(pretty("1234567890"), "1,234 million");
        assert_eq!(pretty("43778147000000"), "43,778,147 million");
    }

    #[test]
    fn test_negative_values() {
        assert_eq!(pretty("-5"), "-5");
        assert_eq!(pretty("-0.25"), "-0.25");
    }

    #[test]
    fn test_custom_config() {
        let config = PrettyConfig {
            places: 2,
            million_threshold: 99_000_000,
            separator: " ".to_string(),
            ..PrettyConfig::default()
        };
        let render = |s: &str| prettify_with(&Number::from_str(s).unwrap(), &config);
        assert_eq!(render("0.125"), "0.12");
        assert_eq!(render("123456789"), "123 million");
        assert_eq!(render("54321"), "54 321");
    }

    #[test]
    fn test_config_from_json() {
        let config: PrettyConfig = serde_json::from_str(r#"{"places": 3}"#).unwrap();
        assert_eq!(config.places, 3);
        assert_eq!(config.million_threshold, 900_000_000);
        assert_eq!(config.separator, ",");
    }

    #[test]
    fn test_group() {
        assert_eq!(group("1", ","), "1");
        assert_eq!(group("123", ","), "123");
        assert_eq!(group("1234", ","), "1,234");
        assert_eq!(group("123456", ","), "123,456");
    }
}
