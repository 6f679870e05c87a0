//! [`Currency`] definitions.
//!
//! No conversion between currencies is ever performed: a [`Currency`] is only
//! a label attached to amounts for displaying.

use crate::define_kind;

define_kind! {
    #[doc = "Currency label of displayed amounts."]
    #[case = "UPPERCASE"]
    enum Currency {
        #[doc = "Iraqi Dinar."]
        Iqd = 1,

        #[doc = "US Dollar."]
        Usd = 2,
    }
}

impl Default for Currency {
    fn default() -> Self {
        Self::Iqd
    }
}
