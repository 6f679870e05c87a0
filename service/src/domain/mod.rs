//! Domain definitions.

pub mod budget;
pub mod user;

pub use self::{budget::Budget, user::User};
