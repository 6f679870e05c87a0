//! [`Percent`]-related definitions.

use std::str::FromStr;

use derive_more::Display;
use rust_decimal::Decimal;
use serde::{de, Deserialize, Deserializer, Serialize};

/// Decimal percentage in the `[0; 100]` range.
#[derive(
    Clone, Copy, Debug, Display, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize,
)]
#[serde(transparent)]
pub struct Percent(Decimal);

impl Percent {
    /// Zero [`Percent`].
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Creates a new [`Percent`] by checking the provided value is not less
    /// than `0` and not greater than `100`.
    #[must_use]
    pub fn new(val: Decimal) -> Option<Self> {
        if val < Decimal::ZERO || val > Decimal::ONE_HUNDRED {
            None
        } else {
            // SAFETY: Invariants are checked above.
            #[expect(unsafe_code, reason = "invariants checked already")]
            let percent = unsafe { Self::new_unchecked(val) };
            Some(percent)
        }
    }

    /// Creates a new [`Percent`] without performing any validation.
    ///
    /// # Safety
    ///
    /// The provided value must not be less than `0` and not greater than
    /// `100`.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub const unsafe fn new_unchecked(val: Decimal) -> Self {
        Self(val)
    }

    /// Returns the numeric value of this [`Percent`].
    #[must_use]
    pub const fn value(self) -> Decimal {
        self.0
    }

    /// Calculates this [`Percent`] of the provided `amount`.
    ///
    /// Divides first whenever the exact product doesn't fit into a
    /// [`Decimal`], saturating at its bounds only if the result itself
    /// doesn't fit.
    #[must_use]
    pub fn of(self, amount: Decimal) -> Decimal {
        amount.checked_mul(self.0).map_or_else(
            || (amount / Decimal::ONE_HUNDRED).saturating_mul(self.0),
            |v| v / Decimal::ONE_HUNDRED,
        )
    }
}

impl FromStr for Percent {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Decimal::from_str(s)
            .ok()
            .and_then(Self::new)
            .ok_or("invalid percent value")
    }
}

impl<'de> Deserialize<'de> for Percent {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let val = <Decimal as Deserialize>::deserialize(deserializer)?;
        Self::new(val).ok_or_else(|| {
            de::Error::custom(format!("`{val}` is out of `[0; 100]` range"))
        })
    }
}

#[cfg(test)]
mod spec {
    use std::str::FromStr as _;

    use rust_decimal::Decimal;

    use super::Percent;

    fn decimal(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn bounds() {
        assert!(Percent::new(decimal("0")).is_some());
        assert!(Percent::new(decimal("100")).is_some());
        assert!(Percent::new(decimal("12.5")).is_some());

        assert!(Percent::new(decimal("-0.01")).is_none());
        assert!(Percent::new(decimal("100.01")).is_none());

        assert!(Percent::from_str("42").is_ok());
        assert!(Percent::from_str("101").is_err());
        assert!(Percent::from_str("abc").is_err());
    }

    #[test]
    fn of() {
        let p = Percent::from_str("30").unwrap();
        assert_eq!(p.of(decimal("5000")), decimal("1500"));

        let p = Percent::from_str("12.5").unwrap();
        assert_eq!(p.of(decimal("200")), decimal("25"));

        assert_eq!(Percent::ZERO.of(decimal("5000")), Decimal::ZERO);
    }

    #[test]
    fn of_large_amount_is_exact() {
        let p = Percent::from_str("30").unwrap();
        assert_eq!(
            p.of(decimal("10000000000000000000000000000")),
            decimal("3000000000000000000000000000"),
        );

        let p = Percent::from_str("100").unwrap();
        assert_eq!(p.of(Decimal::MAX), Decimal::MAX);
        assert_eq!(p.of(Decimal::MIN), Decimal::MIN);
    }

    #[test]
    fn deserialization_validates_range() {
        assert_eq!(
            serde_json::from_str::<Percent>("30").unwrap(),
            Percent::from_str("30").unwrap(),
        );
        assert!(serde_json::from_str::<Percent>("150").is_err());
        assert!(serde_json::from_str::<Percent>("-1").is_err());
    }
}
