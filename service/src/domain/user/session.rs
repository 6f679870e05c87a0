//! [`Session`] definitions.

use std::{str::FromStr, time::Duration};

#[cfg(doc)]
use common::DateTime;
use common::{unit, DateTimeOf};
use derive_more::{AsRef, Display};
use rand::{rngs::OsRng, RngCore as _};

#[cfg(doc)]
use crate::domain::User;
use crate::domain::user;

/// Server-side session of an authenticated [`User`].
///
/// Refers to its [`User`] by ID only, so a [`Session`] of a vanished [`User`]
/// is simply considered invalid.
#[derive(Clone, Debug)]
pub struct Session {
    /// [`Token`] identifying this [`Session`].
    pub token: Token,

    /// ID of the [`User`] this [`Session`] belongs to.
    pub user_id: user::Id,

    /// [`DateTime`] when this [`Session`] was created.
    pub created_at: CreationDateTime,

    /// [`DateTime`] when this [`Session`] expires.
    pub expires_at: ExpirationDateTime,
}

impl Session {
    /// Default lifetime of a [`Session`].
    pub const DEFAULT_TTL: Duration = Duration::from_secs(24 * 60 * 60);

    /// Starts a new [`Session`] of the [`User`] with the provided ID, expiring
    /// after the provided `ttl` since now.
    #[must_use]
    pub fn start(user_id: user::Id, ttl: Duration) -> Self {
        let created_at = CreationDateTime::now();
        Self {
            token: Token::generate(),
            user_id,
            created_at,
            expires_at: (created_at + ttl).coerce(),
        }
    }

    /// Indicates whether this [`Session`] is expired at the provided moment.
    #[must_use]
    pub fn is_expired_at(&self, now: ExpirationDateTime) -> bool {
        self.expires_at <= now
    }
}

/// Opaque identifier of a [`Session`].
///
/// Consists of [`Token::BYTES`] random bytes encoded as lowercase hex.
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[as_ref(str)]
pub struct Token(String);

impl Token {
    /// Number of random bytes in a [`Token`].
    pub const BYTES: usize = 32;

    /// Generates a new random [`Token`] using the OS cryptographically secure
    /// random number generator.
    #[must_use]
    pub fn generate() -> Self {
        let mut bytes = [0; Self::BYTES];
        OsRng.fill_bytes(&mut bytes);
        Self(hex::encode(bytes))
    }

    /// Checks whether the given `token` has a valid [`Token`] format.
    fn check(token: impl AsRef<str>) -> bool {
        let token = token.as_ref();
        token.len() == Self::BYTES * 2
            && token
                .bytes()
                .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
    }
}

impl FromStr for Token {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::check(s)
            .then(|| Self(s.to_owned()))
            .ok_or("invalid `session::Token`")
    }
}

/// [`DateTime`] when a [`Session`] was created.
pub type CreationDateTime = DateTimeOf<(Session, unit::Creation)>;

/// [`DateTime`] when a [`Session`] expires.
pub type ExpirationDateTime = DateTimeOf<(Session, unit::Expiration)>;
