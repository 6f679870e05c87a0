//! Budget calculation HTTP endpoints.
//!
//! Available to authenticated clients only.

use axum::{extract::rejection::JsonRejection, Json};
use common::{Currency, DateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use service::domain::{
    budget::{
        allocation, forecast, AllocationSuggestion, Expense, ForecastPoint,
        InterestRate, PercentageTable,
    },
    Budget,
};

use crate::{define_error, AsError, Context, Error};

/// Maximum forecasted horizon, in months.
pub const MAX_HORIZON_MONTHS: u32 = 100 * 12;

/// Request of [`allocations()`].
#[derive(Clone, Debug, Deserialize)]
pub struct AllocationsRequest {
    /// Monthly income to allocate.
    pub income: Decimal,

    /// Custom [`PercentageTable`], if any.
    #[serde(default)]
    pub percentages: Option<PercentageTable>,
}

/// Request of [`forecast()`].
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastRequest {
    /// Amount saved monthly.
    pub monthly_savings: Decimal,

    /// Annual interest rate in percents, if not the default one.
    #[serde(default)]
    pub interest_rate: Option<InterestRate>,

    /// Horizons to forecast, if not the default ones.
    #[serde(default)]
    pub months: Option<Vec<u32>>,
}

/// Summary of a [`Budget`].
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    /// [`Currency`] of the [`Budget`].
    pub currency: Currency,

    /// Monthly income.
    pub income: Decimal,

    /// Sum of all the [`Expense`]s.
    pub total_expenses: Decimal,

    /// Income left after all the [`Expense`]s.
    pub savings: Decimal,

    /// Current balance.
    pub balance: Decimal,

    /// [`Expense`]s of the current month.
    pub monthly_expenses: Vec<Expense>,

    /// Suggested allocations of the income.
    pub allocations: Vec<AllocationSuggestion>,

    /// Forecast of the savings.
    pub forecast: Vec<ForecastPoint>,
}

/// Suggests allocations of an income.
///
/// # Errors
///
/// Errors if:
/// - the client is not authenticated;
/// - the income is negative;
/// - the request body is malformed.
#[tracing::instrument(
    skip_all,
    fields(http.route = "/api/allocations"),
)]
pub async fn allocations(
    ctx: Context,
    body: Result<Json<AllocationsRequest>, JsonRejection>,
) -> Result<Json<Vec<AllocationSuggestion>>, Error> {
    drop(ctx.authenticated().await?);
    let Json(AllocationsRequest {
        income,
        percentages,
    }) = body.map_err(AsError::into_error)?;
    non_negative(income)?;

    let table = percentages
        .as_ref()
        .unwrap_or_else(|| &*allocation::DEFAULT_TABLE);
    Ok(Json(allocation::generate(income, table)))
}

/// Forecasts savings over several horizons.
///
/// # Errors
///
/// Errors if:
/// - the client is not authenticated;
/// - the monthly savings are negative;
/// - any horizon is zero or exceeds [`MAX_HORIZON_MONTHS`];
/// - the request body is malformed.
#[tracing::instrument(
    skip_all,
    fields(http.route = "/api/forecast"),
)]
pub async fn forecast(
    ctx: Context,
    body: Result<Json<ForecastRequest>, JsonRejection>,
) -> Result<Json<Vec<ForecastPoint>>, Error> {
    drop(ctx.authenticated().await?);
    let Json(ForecastRequest {
        monthly_savings,
        interest_rate,
        months,
    }) = body.map_err(AsError::into_error)?;
    non_negative(monthly_savings)?;

    let horizons =
        months.unwrap_or_else(|| forecast::DEFAULT_HORIZONS.into());
    if horizons.iter().any(|&m| m == 0 || m > MAX_HORIZON_MONTHS) {
        return Err(BudgetError::InvalidMonths.into());
    }

    Ok(Json(forecast::schedule(
        monthly_savings,
        interest_rate.unwrap_or(forecast::DEFAULT_ANNUAL_RATE),
        &horizons,
    )))
}

/// Summarizes a [`Budget`].
///
/// # Errors
///
/// Errors if:
/// - the client is not authenticated;
/// - the income or any [`Expense`] amount is negative;
/// - the request body is malformed.
#[tracing::instrument(
    skip_all,
    fields(http.route = "/api/budget"),
)]
pub async fn summary(
    ctx: Context,
    body: Result<Json<Budget>, JsonRejection>,
) -> Result<Json<Summary>, Error> {
    drop(ctx.authenticated().await?);
    let Json(budget) = body.map_err(AsError::into_error)?;
    non_negative(budget.income)?;
    for e in &budget.expenses {
        non_negative(e.amount)?;
    }

    Ok(Json(Summary {
        currency: budget.currency,
        income: budget.income,
        total_expenses: budget.total_expenses(),
        savings: budget.savings(),
        balance: budget.balance(),
        monthly_expenses: budget
            .monthly_expenses(DateTime::now())
            .cloned()
            .collect(),
        allocations: budget.allocations(),
        forecast: budget.forecast(),
    }))
}

/// Checks the provided `amount` not being negative.
fn non_negative(amount: Decimal) -> Result<(), Error> {
    if amount < Decimal::ZERO {
        return Err(BudgetError::InvalidAmount.into());
    }
    Ok(())
}

define_error! {
    enum BudgetError {
        #[code = "INVALID_AMOUNT"]
        #[status = BAD_REQUEST]
        #[message = "Invalid amount"]
        InvalidAmount,

        #[code = "INVALID_MONTHS"]
        #[status = BAD_REQUEST]
        #[message = "Invalid months"]
        InvalidMonths,
    }
}
