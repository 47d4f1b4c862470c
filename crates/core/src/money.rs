//! Money value objects.
//!
//! Prices are decimal values with three fractional digits (the marketplace
//! currency carries millime precision); royalties are percentages bounded to
//! [1, 50]. Both are validated on construction so downstream code never sees
//! an out-of-range value.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::value_object::ValueObject;

/// Number of fractional digits a price carries.
pub const PRICE_SCALE: u32 = 3;

/// A sale price. Always strictly positive, normalized to [`PRICE_SCALE`]
/// fractional digits.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    pub fn new(value: Decimal) -> DomainResult<Self> {
        if value <= Decimal::ZERO {
            return Err(DomainError::validation("price", "must be greater than zero"));
        }
        let mut normalized = value.round_dp(PRICE_SCALE);
        normalized.rescale(PRICE_SCALE);
        Ok(Self(normalized))
    }

    pub fn amount(&self) -> Decimal {
        self.0
    }
}

impl core::fmt::Display for Price {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl ValueObject for Price {}

/// Designer royalty percentage. Bounded to [1, 50]; the standard rate is 10%.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoyaltyPercent(Decimal);

impl RoyaltyPercent {
    pub fn new(value: Decimal) -> DomainResult<Self> {
        if value < Decimal::ONE || value > Decimal::from(50u32) {
            return Err(DomainError::validation(
                "royalty",
                "must be between 1 and 50 percent",
            ));
        }
        Ok(Self(value))
    }

    /// The standard marketplace rate applied when a designer does not request
    /// a custom royalty.
    pub fn standard() -> Self {
        Self(Decimal::from(10u32))
    }

    pub fn percent(&self) -> Decimal {
        self.0
    }
}

impl core::fmt::Display for RoyaltyPercent {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}%", self.0)
    }
}

impl ValueObject for RoyaltyPercent {}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn price_must_be_positive() {
        assert!(Price::new(dec("0")).is_err());
        assert!(Price::new(dec("-1.5")).is_err());
        assert!(Price::new(dec("0.001")).is_ok());
    }

    #[test]
    fn price_is_normalized_to_three_fractional_digits() {
        let price = Price::new(dec("45.5")).unwrap();
        assert_eq!(price.to_string(), "45.500");

        let rounded = Price::new(dec("12.34567")).unwrap();
        assert_eq!(rounded.to_string(), "12.346");
    }

    #[test]
    fn royalty_boundaries_are_inclusive() {
        assert!(RoyaltyPercent::new(dec("1")).is_ok());
        assert!(RoyaltyPercent::new(dec("50")).is_ok());

        let low = RoyaltyPercent::new(dec("0.9")).unwrap_err();
        assert!(matches!(low, DomainError::Validation { ref field, .. } if field == "royalty"));

        let high = RoyaltyPercent::new(dec("50.1")).unwrap_err();
        assert!(matches!(high, DomainError::Validation { ref field, .. } if field == "royalty"));
    }

    #[test]
    fn standard_royalty_is_ten_percent() {
        assert_eq!(RoyaltyPercent::standard().percent(), Decimal::from(10u32));
    }
}
