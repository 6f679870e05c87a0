//! [`User`] definitions.

pub mod session;

use std::str::FromStr;

use derive_more::{AsRef, Display, From, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use secrecy::{zeroize::Zeroize, CloneableSecret};
use serde::{Deserialize, Serialize};

pub use self::session::Session;

/// Registered user of the dashboard.
#[derive(Clone, Debug)]
pub struct User {
    /// ID of this [`User`].
    pub id: Id,

    /// [`Email`] of this [`User`].
    pub email: Email,

    /// [`PasswordHash`] of this [`User`].
    pub password_hash: PasswordHash,
}

/// Data of a [`User`] to be registered.
///
/// Its [`Id`] is assigned by the storage on insertion.
#[derive(Clone, Debug)]
pub struct Draft {
    /// [`Email`] of a new [`User`].
    pub email: Email,

    /// [`PasswordHash`] of a new [`User`].
    pub password_hash: PasswordHash,
}

/// ID of a [`User`].
#[derive(
    Clone,
    Copy,
    Debug,
    Deserialize,
    Display,
    Eq,
    From,
    Hash,
    Into,
    Ord,
    PartialEq,
    PartialOrd,
    Serialize,
)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Id(i64);

/// Email address of a [`User`].
///
/// Treated as an opaque case-sensitive string: the only requirement is being
/// non-empty.
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[as_ref(str)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Email(String);

impl Email {
    /// Creates a new [`Email`] if the given `address` is valid.
    #[must_use]
    pub fn new(address: impl Into<String>) -> Option<Self> {
        let address = address.into();
        Self::check(&address).then_some(Self(address))
    }

    /// Checks whether the given `address` is a valid [`Email`].
    fn check(address: impl AsRef<str>) -> bool {
        !address.as_ref().is_empty()
    }
}

impl FromStr for Email {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Email`")
    }
}

/// Password of a [`User`].
#[derive(AsRef, Clone, Debug, Eq, PartialEq)]
#[as_ref(str)]
pub struct Password(String);

impl Password {
    /// Creates a new [`Password`] if the given `password` is valid.
    #[must_use]
    pub fn new(password: impl Into<String>) -> Option<Self> {
        let password = password.into();
        Self::check(&password).then_some(Self(password))
    }

    /// Checks whether the given `password` is a valid [`Password`].
    fn check(password: impl AsRef<str>) -> bool {
        !password.as_ref().is_empty()
    }
}

impl FromStr for Password {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Password`")
    }
}

impl CloneableSecret for Password {}
impl Zeroize for Password {
    fn zeroize(&mut self) {
        self.0.zeroize();
    }
}

/// Salted [bcrypt] hash of a [`User`]'s [`Password`].
///
/// [bcrypt]: https://en.wikipedia.org/wiki/Bcrypt
#[derive(Clone, Debug, Display, Eq, PartialEq)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Default cost of hashing a [`Password`].
    pub const DEFAULT_COST: u32 = 10;

    /// Hashes the given [`Password`] with a fresh random salt and the
    /// provided work `cost`.
    ///
    /// This is a CPU-heavy blocking operation.
    ///
    /// # Errors
    ///
    /// If the `cost` is out of the range supported by [bcrypt].
    ///
    /// [bcrypt]: https://en.wikipedia.org/wiki/Bcrypt
    pub fn new(
        password: &Password,
        cost: u32,
    ) -> Result<Self, bcrypt::BcryptError> {
        bcrypt::hash(password.as_ref(), cost).map(Self)
    }

    /// Checks whether the provided [`Password`] matches this [`PasswordHash`].
    ///
    /// This is a CPU-heavy blocking operation.
    ///
    /// # Errors
    ///
    /// If this [`PasswordHash`] is malformed.
    pub fn verify(
        &self,
        password: &Password,
    ) -> Result<bool, bcrypt::BcryptError> {
        bcrypt::verify(password.as_ref(), &self.0)
    }
}
