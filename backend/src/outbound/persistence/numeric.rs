//! Conversion between [`Rating`] and the `numeric(2,1)` column.

use bigdecimal::num_bigint::BigInt;
use bigdecimal::{BigDecimal, ToPrimitive};

use crate::domain::Rating;

/// Exact decimal for a rating, e.g. 45 tenths → `4.5`.
pub(crate) fn rating_to_decimal(rating: Rating) -> BigDecimal {
    BigDecimal::new(BigInt::from(rating.tenths()), 1)
}

/// Rating for a stored decimal; `None` when the value is outside the valid
/// range.
pub(crate) fn decimal_to_rating(value: &BigDecimal) -> Option<Rating> {
    value.to_f64().and_then(|value| Rating::from_f64(value).ok())
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(5, "0.5")]
    #[case(45, "4.5")]
    #[case(50, "5.0")]
    fn ratings_become_one_digit_decimals(#[case] tenths: u8, #[case] expected: &str) {
        let rating = Rating::from_tenths(tenths).expect("valid rating");
        let decimal = rating_to_decimal(rating);
        assert_eq!(decimal, BigDecimal::from_str(expected).expect("decimal"));
        assert_eq!(decimal.to_string(), expected);
    }

    #[rstest]
    #[case("3.5", Some(35))]
    #[case("5.0", Some(50))]
    #[case("0.0", None)]
    fn decimals_become_ratings(#[case] stored: &str, #[case] expected: Option<u8>) {
        let decimal = BigDecimal::from_str(stored).expect("decimal");
        assert_eq!(decimal_to_rating(&decimal).map(Rating::tenths), expected);
    }
}
