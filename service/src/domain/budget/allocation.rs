//! Allocation of an income across [`ExpenseCategory`]s.

use std::{fmt, sync::LazyLock};

use common::{define_kind, Percent};
use rust_decimal::Decimal;
use serde::{
    de::{MapAccess, Visitor},
    Deserialize, Deserializer, Serialize,
};

define_kind! {
    #[doc = "Category of an expense."]
    #[case = "lowercase"]
    enum ExpenseCategory {
        #[doc = "Rent, mortgage and other housing costs."]
        Housing = 1,

        #[doc = "Electricity, water, internet and similar bills."]
        Utilities = 2,

        #[doc = "Groceries and eating out."]
        Food = 3,

        #[doc = "Public transport, fuel and car maintenance."]
        Transportation = 4,

        #[doc = "Medical care and insurance."]
        Healthcare = 5,

        #[doc = "Leisure and hobbies."]
        Entertainment = 6,

        #[doc = "Courses, books and tuition."]
        Education = 7,

        #[doc = "Clothes and other purchases."]
        Shopping = 8,

        #[doc = "Money put aside."]
        Savings = 9,

        #[doc = "Anything else."]
        Other = 10,
    }
}

/// Suggested amount of an income to spend on an [`ExpenseCategory`].
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub struct AllocationSuggestion {
    /// [`ExpenseCategory`] this [`AllocationSuggestion`] is about.
    pub category: ExpenseCategory,

    /// [`Percent`] of the income allocated to the [`ExpenseCategory`].
    pub percentage: Percent,

    /// Allocated amount.
    pub amount: Decimal,
}

/// Ordered table of [`Percent`]s per [`ExpenseCategory`].
///
/// Each [`ExpenseCategory`] appears at most once. The order of insertion is
/// preserved and used to break ties between equal allocations.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct PercentageTable(Vec<(ExpenseCategory, Percent)>);

impl PercentageTable {
    /// Creates a new empty [`PercentageTable`].
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Sets the [`Percent`] of the provided [`ExpenseCategory`].
    ///
    /// Overwrites the previous value in place, keeping its position.
    pub fn set(&mut self, category: ExpenseCategory, percentage: Percent) {
        if let Some((_, p)) = self.0.iter_mut().find(|(c, _)| *c == category)
        {
            *p = percentage;
        } else {
            self.0.push((category, percentage));
        }
    }

    /// Returns the [`Percent`] of the provided [`ExpenseCategory`], if any.
    #[must_use]
    pub fn get(&self, category: ExpenseCategory) -> Option<Percent> {
        self.0
            .iter()
            .find_map(|(c, p)| (*c == category).then_some(*p))
    }

    /// Iterates over the entries of this [`PercentageTable`] in order.
    pub fn iter(
        &self,
    ) -> impl ExactSizeIterator<Item = (ExpenseCategory, Percent)> + '_ {
        self.0.iter().copied()
    }

    /// Returns the number of entries in this [`PercentageTable`].
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Indicates whether this [`PercentageTable`] has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the sum of all the [`Percent`]s in this [`PercentageTable`].
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.iter().map(|(_, p)| p.value()).sum()
    }
}

impl FromIterator<(ExpenseCategory, Percent)> for PercentageTable {
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = (ExpenseCategory, Percent)>,
    {
        let mut table = Self::new();
        for (category, percentage) in iter {
            table.set(category, percentage);
        }
        table
    }
}

impl<'de> Deserialize<'de> for PercentageTable {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        /// [`Visitor`] collecting map entries in their original order.
        struct TableVisitor;

        impl<'de> Visitor<'de> for TableVisitor {
            type Value = PercentageTable;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of expense categories to percentages")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut table = PercentageTable::new();
                while let Some((category, percentage)) = map.next_entry()? {
                    table.set(category, percentage);
                }
                Ok(table)
            }
        }

        deserializer.deserialize_map(TableVisitor)
    }
}

/// Recommended [`PercentageTable`] used when no custom one is provided.
///
/// Sums up to `100`.
pub static DEFAULT_TABLE: LazyLock<PercentageTable> = LazyLock::new(|| {
    use ExpenseCategory as C;

    [
        (C::Housing, 30),
        (C::Utilities, 10),
        (C::Food, 15),
        (C::Transportation, 10),
        (C::Healthcare, 10),
        (C::Entertainment, 5),
        (C::Education, 5),
        (C::Shopping, 5),
        (C::Savings, 10),
        (C::Other, 0),
    ]
    .into_iter()
    .map(|(category, val)| {
        let percentage =
            Percent::new(Decimal::from(val)).expect("valid percent");
        (category, percentage)
    })
    .collect()
});

/// Generates [`AllocationSuggestion`]s of the provided `income` according to
/// the provided [`PercentageTable`].
///
/// Every entry of the table produces exactly one suggestion, including zero
/// ones. Suggestions are sorted by their amount in descending order, keeping
/// the table order for equal amounts.
///
/// The `income` is used as given, so validating it is up to the caller.
#[must_use]
pub fn generate(
    income: Decimal,
    table: &PercentageTable,
) -> Vec<AllocationSuggestion> {
    let mut suggestions = table
        .iter()
        .map(|(category, percentage)| AllocationSuggestion {
            category,
            percentage,
            amount: percentage.of(income),
        })
        .collect::<Vec<_>>();
    suggestions.sort_by(|a, b| b.amount.cmp(&a.amount));
    suggestions
}
