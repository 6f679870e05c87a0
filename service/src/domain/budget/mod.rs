//! [`Budget`] definitions.
//!
//! Everything here is pure: the [`Budget`] is passed around explicitly and is
//! never stored.

pub mod allocation;
pub mod forecast;

use common::{Currency, DateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub use self::{
    allocation::{AllocationSuggestion, ExpenseCategory, PercentageTable},
    forecast::{ForecastPoint, InterestRate},
};

/// Monthly budget of a user.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Budget {
    /// [`Currency`] label of all the amounts in this [`Budget`].
    #[serde(default)]
    pub currency: Currency,

    /// Monthly income.
    pub income: Decimal,

    /// Recorded [`Expense`]s.
    #[serde(default)]
    pub expenses: Vec<Expense>,
}

impl Budget {
    /// Returns the sum of all the [`Expense`]s of this [`Budget`].
    #[must_use]
    pub fn total_expenses(&self) -> Decimal {
        self.expenses
            .iter()
            .fold(Decimal::ZERO, |sum, e| sum.saturating_add(e.amount))
    }

    /// Returns the part of the income left after all the [`Expense`]s.
    #[must_use]
    pub fn savings(&self) -> Decimal {
        self.income.saturating_sub(self.total_expenses())
    }

    /// Returns the current balance of this [`Budget`].
    ///
    /// There are no accounts to track, so it's the same as
    /// [`Budget::savings()`].
    #[must_use]
    pub fn balance(&self) -> Decimal {
        self.savings()
    }

    /// Iterates over the [`Expense`]s made in the same calendar month as the
    /// provided [`DateTime`].
    pub fn monthly_expenses(
        &self,
        now: DateTime,
    ) -> impl Iterator<Item = &Expense> + '_ {
        self.expenses
            .iter()
            .filter(move |e| e.date.is_same_month(&now))
    }

    /// Suggests allocations of the income by the default
    /// [`PercentageTable`].
    #[must_use]
    pub fn allocations(&self) -> Vec<AllocationSuggestion> {
        allocation::generate(self.income, &allocation::DEFAULT_TABLE)
    }

    /// Forecasts [`Budget::savings()`] with the default horizons and interest
    /// rate.
    ///
    /// Negative savings are forecasted as zero ones.
    #[must_use]
    pub fn forecast(&self) -> Vec<ForecastPoint> {
        forecast::schedule(
            self.savings().max(Decimal::ZERO),
            forecast::DEFAULT_ANNUAL_RATE,
            &forecast::DEFAULT_HORIZONS,
        )
    }
}

/// Single spending of money.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Expense {
    /// Spent amount.
    pub amount: Decimal,

    /// [`ExpenseCategory`] of this [`Expense`].
    pub category: ExpenseCategory,

    /// [`DateTime`] when this [`Expense`] was made.
    pub date: DateTime,

    /// Free-form description.
    #[serde(default)]
    pub description: String,
}
