//! [`Command`] for authorizing a [`User`] by its [`Session`].

use common::operations::{By, Delete, Select};
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{
        user::{self, session, Session},
        User,
    },
    infra::{database, Database},
    Service,
};

use super::{create_user_session::Output, Command};

/// [`Command`] for authorizing a [`User`] by its [`Session`].
///
/// Yields [`None`] if the [`Session`] is unknown, expired or belongs to a
/// [`User`] that doesn't exist anymore. Expired [`Session`]s are deleted.
#[derive(Clone, Debug, From)]
pub struct AuthorizeUserSession {
    /// [`Session`] token to authorize.
    pub token: session::Token,
}

impl<Db> Command<AuthorizeUserSession> for Service<Db>
where
    Db: Database<
            Select<By<Option<User>, user::Id>>,
            Ok = Option<User>,
            Err = Traced<database::Error>,
        > + for<'t> Database<
            Select<By<Option<Session>, &'t session::Token>>,
            Ok = Option<Session>,
            Err = Traced<database::Error>,
        > + for<'t> Database<
            Delete<By<Session, &'t session::Token>>,
            Ok = (),
            Err = Traced<database::Error>,
        >,
{
    type Ok = Option<Output>;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: AuthorizeUserSession,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let AuthorizeUserSession { token } = cmd;

        let Some(session) = self
            .database()
            .execute(Select(By::new(&token)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
        else {
            return Ok(None);
        };

        if session.is_expired_at(session::ExpirationDateTime::now()) {
            self.database()
                .execute(Delete(By::new(&token)))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?;
            return Ok(None);
        }

        let Some(user) = self
            .database()
            .execute(Select(By::new(session.user_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
        else {
            log::warn!(
                "`Session` refers to missing `User(id: {})`",
                session.user_id,
            );
            self.database()
                .execute(Delete(By::new(&token)))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?;
            return Ok(None);
        };

        Ok(Some(Output { session, user }))
    }
}

/// Error of [`AuthorizeUserSession`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),
}

#[cfg(test)]
mod spec {
    use std::time::Duration;

    use common::operations::{By, Insert, Select};

    use crate::{
        command::{
            create_user::spec::{cmd, service},
            CreateUserSession,
        },
        domain::user::{self, session, Session},
        infra::Database as _,
        Command as _,
    };

    use super::AuthorizeUserSession;

    #[tokio::test]
    async fn authorizes_active_session() {
        let svc = service();
        let user = svc.execute(cmd("jane@x.io", "hunter2")).await.unwrap();
        let created = svc
            .execute(CreateUserSession::ByUserId(user.id))
            .await
            .unwrap();

        let out = svc
            .execute(AuthorizeUserSession {
                token: created.session.token.clone(),
            })
            .await
            .unwrap()
            .unwrap();

        assert_eq!(out.user.id, user.id);
        assert_eq!(out.session.token, created.session.token);
    }

    #[tokio::test]
    async fn keeps_session_expiration_unchanged() {
        let svc = service();
        let user = svc.execute(cmd("jane@x.io", "hunter2")).await.unwrap();
        let created = svc
            .execute(CreateUserSession::ByUserId(user.id))
            .await
            .unwrap();

        for _ in 0..2 {
            tokio::time::sleep(Duration::from_millis(10)).await;
            let out = svc
                .execute(AuthorizeUserSession {
                    token: created.session.token.clone(),
                })
                .await
                .unwrap()
                .unwrap();

            assert!(out.session.expires_at == created.session.expires_at);
        }

        let stored: Option<Session> = svc
            .database()
            .execute(Select(By::new(&created.session.token)))
            .await
            .unwrap();
        assert!(stored.unwrap().expires_at == created.session.expires_at);
    }

    #[tokio::test]
    async fn rejects_unknown_token() {
        let svc = service();

        let out = svc
            .execute(AuthorizeUserSession {
                token: session::Token::generate(),
            })
            .await
            .unwrap();

        assert!(out.is_none());
    }

    #[tokio::test]
    async fn rejects_and_deletes_expired_session() {
        let svc = service();
        let user = svc.execute(cmd("jane@x.io", "hunter2")).await.unwrap();
        let expired = Session::start(user.id, Duration::ZERO);
        let token = expired.token.clone();
        svc.database().execute(Insert(expired)).await.unwrap();

        let out = svc
            .execute(AuthorizeUserSession {
                token: token.clone(),
            })
            .await
            .unwrap();

        assert!(out.is_none());
        let stored: Option<Session> = svc
            .database()
            .execute(Select(By::new(&token)))
            .await
            .unwrap();
        assert!(stored.is_none());
    }

    #[tokio::test]
    async fn rejects_session_of_missing_user() {
        let svc = service();
        let orphan = Session::start(user::Id::from(99), Session::DEFAULT_TTL);
        let token = orphan.token.clone();
        svc.database().execute(Insert(orphan)).await.unwrap();

        let out = svc.execute(AuthorizeUserSession { token }).await.unwrap();

        assert!(out.is_none());
    }
}
