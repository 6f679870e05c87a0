//! Session-related HTTP endpoints.

use axum::{extract::rejection::JsonRejection, Json};
use axum_extra::extract::SignedCookieJar;
use derive_more::Debug;
use secrecy::SecretBox;
use serde::{Deserialize, Serialize};
use service::{
    command::{self, Command as _},
    domain::user,
};
use tracing as log;

use crate::{define_error, AsError, Context, Error};

/// Credentials of a user.
#[derive(Debug, Default, Deserialize)]
pub struct Credentials {
    /// Email of the user.
    #[serde(default)]
    pub email: String,

    /// Password of the user.
    #[debug(skip)]
    #[serde(default)]
    pub password: String,
}

/// Successful outcome of an operation.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct Success {
    /// Always `true`.
    pub success: bool,
}

impl Success {
    /// The only [`Success`] value.
    pub const OK: Self = Self { success: true };
}

/// Status of the current session.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Status {
    /// Whether the client is logged in.
    pub logged_in: bool,

    /// Email of the logged in user.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl Status {
    /// [`Status`] of an anonymous client.
    const ANONYMOUS: Self = Self {
        logged_in: false,
        email: None,
    };
}

/// Registers a new user and logs it in.
///
/// # Errors
///
/// Errors if:
/// - `email` or `password` is missing (`Missing fields`);
/// - `email` is occupied by another user (`User exists`).
#[tracing::instrument(
    skip_all,
    fields(http.route = "/api/signup"),
)]
pub async fn sign_up(
    ctx: Context,
    body: Result<Json<Credentials>, JsonRejection>,
) -> Result<(SignedCookieJar, Json<Success>), Error> {
    let Json(Credentials { email, password }) =
        body.map_err(|_| Error::from(SignUpError::MissingFields))?;
    let email = user::Email::new(email)
        .ok_or_else(|| Error::from(SignUpError::MissingFields))?;
    let password = user::Password::new(password)
        .ok_or_else(|| Error::from(SignUpError::MissingFields))?;

    let user = ctx
        .service()
        .execute(command::CreateUser {
            email,
            password: SecretBox::init_with(move || password),
        })
        .await
        .map_err(AsError::into_error)?;
    let output = ctx
        .service()
        .execute(command::CreateUserSession::ByUserId(user.id))
        .await
        .map_err(AsError::into_error)?;

    Ok((ctx.start_session(&output.session), Json(Success::OK)))
}

/// Logs in a user by its credentials.
///
/// # Errors
///
/// Errors with `Invalid credentials` if the credentials don't match any user.
#[tracing::instrument(
    skip_all,
    fields(http.route = "/api/login"),
)]
pub async fn log_in(
    ctx: Context,
    body: Result<Json<Credentials>, JsonRejection>,
) -> Result<(SignedCookieJar, Json<Success>), Error> {
    let invalid = || Error::from(LogInError::InvalidCredentials);

    let Json(Credentials { email, password }) =
        body.map_err(|_| invalid())?;
    let email = user::Email::new(email).ok_or_else(invalid)?;
    let password = user::Password::new(password).ok_or_else(invalid)?;

    let output = ctx
        .service()
        .execute(command::CreateUserSession::ByCredentials {
            email,
            password: SecretBox::init_with(move || password),
        })
        .await
        .map_err(AsError::into_error)?;

    Ok((ctx.start_session(&output.session), Json(Success::OK)))
}

/// Reports whether the client is logged in.
///
/// Never fails: any failure is logged and reported as being logged out.
pub async fn status(ctx: Context) -> Json<Status> {
    let status = ctx
        .current_session()
        .await
        .unwrap_or_else(|e| {
            log::error!("failed to check session: {e}");
            None
        })
        .map_or(Status::ANONYMOUS, |out| Status {
            logged_in: true,
            email: Some(out.user.email.as_ref().to_owned()),
        });
    Json(status)
}

/// Logs out the client, clearing its session cookie.
///
/// Never fails: any failure is logged and the cookie is cleared anyway.
pub async fn log_out(ctx: Context) -> (SignedCookieJar, Json<Success>) {
    if let Some(token) = ctx.session_token() {
        if let Err(e) = ctx
            .service()
            .execute(command::DeleteUserSession { token })
            .await
            .map_err(AsError::into_error)
        {
            log::error!("failed to end session: {e}");
        }
    } else {
        log::debug!("logout without session cookie");
    }

    (ctx.end_session(), Json(Success::OK))
}

define_error! {
    enum SignUpError {
        #[code = "MISSING_FIELDS"]
        #[status = BAD_REQUEST]
        #[message = "Missing fields"]
        MissingFields,

        #[code = "USER_EXISTS"]
        #[status = BAD_REQUEST]
        #[message = "User exists"]
        UserExists,
    }
}

define_error! {
    enum LogInError {
        #[code = "INVALID_CREDENTIALS"]
        #[status = BAD_REQUEST]
        #[message = "Invalid credentials"]
        InvalidCredentials,
    }
}

impl AsError for command::create_user::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::Hashing(_) | Self::Join(_) => None,
            Self::EmailOccupied(_) => Some(SignUpError::UserExists.into()),
        }
    }
}

impl AsError for command::create_user_session::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::Hashing(_) | Self::Join(_) | Self::UserNotExists(_) => None,
            Self::WrongCredentials => {
                Some(LogInError::InvalidCredentials.into())
            }
        }
    }
}
