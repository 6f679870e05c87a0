//! Savings [`forecast`] under monthly compounding.

use std::str::FromStr;

use derive_more::Display;
use rust_decimal::Decimal;
use serde::{de, Deserialize, Deserializer, Serialize};

/// Horizons (in months) forecasted by default.
pub const DEFAULT_HORIZONS: [u32; 4] = [3, 6, 12, 24];

/// Annual interest rate assumed by default (`1.5%`).
pub const DEFAULT_ANNUAL_RATE: InterestRate =
    InterestRate(Decimal::from_parts(15, 0, 0, false, 1));

/// Number of months in a year.
const MONTHS_PER_YEAR: Decimal = Decimal::from_parts(12, 0, 0, false, 0);

/// Annual interest rate, in percents.
///
/// Never negative, but not bounded from above: `150` is a valid rate.
#[derive(Clone, Copy, Debug, Display, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct InterestRate(Decimal);

impl InterestRate {
    /// Zero [`InterestRate`].
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Creates a new [`InterestRate`] if the provided percents are not
    /// negative.
    #[must_use]
    pub fn new(percents: Decimal) -> Option<Self> {
        (percents >= Decimal::ZERO).then_some(Self(percents))
    }

    /// Returns the rate in percents.
    #[must_use]
    pub const fn percents(self) -> Decimal {
        self.0
    }

    /// Returns the monthly rate as a fraction (`annual / 12 / 100`).
    fn monthly(self) -> Decimal {
        self.0 / MONTHS_PER_YEAR / Decimal::ONE_HUNDRED
    }
}

impl FromStr for InterestRate {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Decimal::from_str(s)
            .ok()
            .and_then(Self::new)
            .ok_or("invalid interest rate")
    }
}

impl<'de> Deserialize<'de> for InterestRate {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let val = <Decimal as Deserialize>::deserialize(deserializer)?;
        Self::new(val).ok_or_else(|| {
            de::Error::custom(format!("`{val}` interest rate is negative"))
        })
    }
}

/// Projected savings total at some horizon.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastPoint {
    /// Number of months being forecasted.
    pub horizon_months: u32,

    /// Projected total of savings after [`ForecastPoint::horizon_months`].
    pub projected_total: Decimal,
}

/// Forecasts the total of savings after depositing `monthly_savings` for the
/// provided number of `months` under the provided `annual_rate`.
///
/// Each month the deposit is made first and then the running total is
/// compounded with the monthly rate (`annual_rate / 12`). A zero rate yields
/// the plain sum of deposits.
///
/// Saturates at the [`Decimal`] bounds instead of overflowing, so the result
/// stays monotonically non-decreasing in `months` for non-negative savings.
#[must_use]
pub fn forecast(
    monthly_savings: Decimal,
    months: u32,
    annual_rate: InterestRate,
) -> Decimal {
    let monthly_rate = annual_rate.monthly();
    if monthly_rate.is_zero() {
        return monthly_savings.saturating_mul(Decimal::from(months));
    }

    let growth = Decimal::ONE + monthly_rate;
    (0..months).fold(Decimal::ZERO, |total, _| {
        total.saturating_add(monthly_savings).saturating_mul(growth)
    })
}

/// Forecasts savings for each of the provided `horizons`, in their order.
#[must_use]
pub fn schedule(
    monthly_savings: Decimal,
    annual_rate: InterestRate,
    horizons: &[u32],
) -> Vec<ForecastPoint> {
    horizons
        .iter()
        .map(|&horizon_months| ForecastPoint {
            horizon_months,
            projected_total: forecast(
                monthly_savings,
                horizon_months,
                annual_rate,
            ),
        })
        .collect()
}
