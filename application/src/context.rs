//! [`Context`]-related definitions.

use std::{str::FromStr as _, time::Duration};

use axum::{async_trait, extract::FromRequestParts};
use axum_extra::extract::{
    cookie::{Cookie, Key, SameSite},
    SignedCookieJar,
};
use derive_more::Debug;
use service::{
    command::{self, create_user_session::Output, Command as _},
    domain::user::{session, Session},
};
use sha2::{Digest as _, Sha512};

use crate::{define_error, AsError, Error, Service};

/// Settings of the cookie carrying a [`session::Token`].
#[derive(Clone, Debug)]
pub struct SessionCookies {
    /// [`Key`] signing the cookie.
    #[debug(skip)]
    key: Key,

    /// Name of the cookie.
    name: String,

    /// Whether the cookie is sent over HTTPS only.
    secure: bool,

    /// Max age of the cookie.
    max_age: time::Duration,
}

impl SessionCookies {
    /// Creates new [`SessionCookies`] signed with a [`Key`] derived from the
    /// provided `secret` and living for the provided `ttl`.
    #[must_use]
    pub fn new(
        secret: impl AsRef<[u8]>,
        name: impl Into<String>,
        secure: bool,
        ttl: Duration,
    ) -> Self {
        Self {
            key: Key::from(Sha512::digest(secret.as_ref()).as_slice()),
            name: name.into(),
            secure,
            max_age: time::Duration::try_from(ttl)
                .unwrap_or(time::Duration::MAX),
        }
    }

    /// Builds a cookie carrying the provided [`session::Token`].
    fn cookie(&self, token: &session::Token) -> Cookie<'static> {
        Cookie::build((self.name.clone(), token.to_string()))
            .http_only(true)
            .same_site(SameSite::Lax)
            .path("/")
            .secure(self.secure)
            .max_age(self.max_age)
            .build()
    }

    /// Builds a cookie removing the session one.
    fn removal(&self) -> Cookie<'static> {
        let mut cookie = Cookie::build((self.name.clone(), ""))
            .http_only(true)
            .same_site(SameSite::Lax)
            .path("/")
            .secure(self.secure)
            .build();
        cookie.make_removal();
        cookie
    }
}

/// Application context of an HTTP request.
#[derive(Debug)]
pub struct Context {
    /// [`Service`] instance.
    service: Service,

    /// [`SessionCookies`] settings.
    cookies: SessionCookies,

    /// Signed cookies of the HTTP request.
    #[debug(skip)]
    jar: SignedCookieJar,
}

impl Context {
    /// Returns [`Service`] instance of this [`Context`].
    #[must_use]
    pub fn service(&self) -> &Service {
        &self.service
    }

    /// Returns the [`session::Token`] provided with the HTTP request, if any.
    ///
    /// Cookies with a broken signature or a malformed value are ignored.
    #[must_use]
    pub fn session_token(&self) -> Option<session::Token> {
        let cookie = self.jar.get(&self.cookies.name)?;
        session::Token::from_str(cookie.value()).ok()
    }

    /// Returns the current [`Session`] along with its [`User`], if any.
    ///
    /// # Errors
    ///
    /// If failed to authorize the [`Session`].
    ///
    /// [`User`]: service::domain::User
    pub async fn current_session(&self) -> Result<Option<Output>, Error> {
        let Some(token) = self.session_token() else {
            return Ok(None);
        };
        self.service
            .execute(command::AuthorizeUserSession { token })
            .await
            .map_err(AsError::into_error)
    }

    /// Returns the current [`Session`] along with its [`User`].
    ///
    /// # Errors
    ///
    /// Errors if:
    /// - the current HTTP request is not authenticated;
    /// - failed to authorize the [`Session`].
    ///
    /// [`User`]: service::domain::User
    pub async fn authenticated(&self) -> Result<Output, Error> {
        self.current_session()
            .await?
            .ok_or_else(|| AuthError::NotAuthenticated.into())
    }

    /// Returns cookies to respond with for binding the provided [`Session`]
    /// to the client.
    #[must_use]
    pub fn start_session(&self, session: &Session) -> SignedCookieJar {
        self.jar.clone().add(self.cookies.cookie(&session.token))
    }

    /// Returns cookies to respond with for unbinding any [`Session`] from the
    /// client.
    ///
    /// The removal cookie is sent even if the client provided no valid one.
    #[must_use]
    pub fn end_session(&self) -> SignedCookieJar {
        self.jar.clone().add(self.cookies.removal())
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Context
where
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(
        parts: &mut http::request::Parts,
        _: &S,
    ) -> Result<Self, Self::Rejection> {
        let service = parts.extensions.get::<Service>().cloned().ok_or_else(
            || Error::internal(&"missing `Service` extension"),
        )?;
        let cookies = parts
            .extensions
            .get::<SessionCookies>()
            .cloned()
            .ok_or_else(|| {
                Error::internal(&"missing `SessionCookies` extension")
            })?;
        let jar = SignedCookieJar::from_headers(
            &parts.headers,
            cookies.key.clone(),
        );

        Ok(Self {
            service,
            cookies,
            jar,
        })
    }
}

impl AsError for command::authorize_user_session::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
        }
    }
}

impl AsError for command::delete_user_session::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
        }
    }
}

define_error! {
    enum AuthError {
        #[code = "NOT_AUTHENTICATED"]
        #[status = UNAUTHORIZED]
        #[message = "Not authenticated"]
        NotAuthenticated,
    }
}

#[cfg(test)]
mod spec {
    use std::time::Duration;

    use axum_extra::extract::cookie::SameSite;
    use service::domain::user::session;

    use super::SessionCookies;

    #[test]
    fn builds_hardened_cookie() {
        let cookies = SessionCookies::new(
            "secret",
            "session",
            true,
            Duration::from_secs(24 * 60 * 60),
        );
        let token = session::Token::generate();

        let cookie = cookies.cookie(&token);

        assert_eq!(cookie.name(), "session");
        assert_eq!(cookie.value(), token.as_ref());
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.max_age(), Some(time::Duration::hours(24)));
    }

    #[test]
    fn builds_expired_removal_cookie() {
        let cookies = SessionCookies::new(
            "secret",
            "session",
            false,
            Duration::from_secs(60),
        );

        let cookie = cookies.removal();

        assert_eq!(cookie.name(), "session");
        assert_eq!(cookie.value(), "");
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.max_age(), Some(time::Duration::ZERO));
    }
}
