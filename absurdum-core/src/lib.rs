//! Absurdum Core - Fundamental types
//!
//! This crate provides the exact decimal `Number` used throughout Absurdum.
//! Every value that flows from a matched numeric token to a rendered string
//! stays decimal; nothing is routed through binary floating point.

mod number;

pub use number::{Number, NumberError};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{Number, NumberError};
}

#[cfg(test)]
mod tests {
    use super::*;

    mod number_tests {
        use super::*;

        #[test]
        fn test_from_i64() {
            let n = Number::from_i64(42);
            assert_eq!(n.to_i64(), Some(42));
        }

        #[test]
        fn test_from_str_integer() {
            let n = Number::from_str("123").unwrap();
            assert_eq!(n.to_i64(), Some(123));
        }

        #[test]
        fn test_from_str_decimal() {
            let n = Number::from_str("3.14").unwrap();
            assert!(!n.is_integer());
            assert_eq!(n.to_i64(), None);
        }

        #[test]
        fn test_from_str_invalid() {
            assert!(Number::from_str("abc").is_err());
            assert!(Number::from_str("").is_err());
        }

        #[test]
        fn test_ordering() {
            let small = Number::from_str("0.9144").unwrap();
            let large = Number::from_str("1609.34").unwrap();
            assert!(small < large);
            assert_eq!(small.clone().max(large.clone()), large);
        }
    }
}
