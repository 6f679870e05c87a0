//! [`Command`] for deleting a [`Session`].

use common::operations::{By, Delete};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::user::{session, Session},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for deleting a [`Session`].
///
/// Deleting an unknown [`Session`] is not an error.
#[derive(Clone, Debug, From)]
pub struct DeleteUserSession {
    /// Token of the [`Session`] to delete.
    pub token: session::Token,
}

impl<Db> Command<DeleteUserSession> for Service<Db>
where
    Db: for<'t> Database<
        Delete<By<Session, &'t session::Token>>,
        Ok = (),
        Err = Traced<database::Error>,
    >,
{
    type Ok = ();
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: DeleteUserSession,
    ) -> Result<Self::Ok, Self::Err> {
        let DeleteUserSession { token } = cmd;

        self.database()
            .execute(Delete(By::new(&token)))
            .await
            .map_err(tracerr::map_from_and_wrap!())
    }
}

/// Error of [`DeleteUserSession`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),
}

#[cfg(test)]
mod spec {
    use crate::{
        command::{
            create_user::spec::{cmd, service},
            AuthorizeUserSession, CreateUserSession,
        },
        domain::user::session,
        Command as _,
    };

    use super::DeleteUserSession;

    #[tokio::test]
    async fn invalidates_session() {
        let svc = service();
        let user = svc.execute(cmd("jane@x.io", "hunter2")).await.unwrap();
        let token = svc
            .execute(CreateUserSession::ByUserId(user.id))
            .await
            .unwrap()
            .session
            .token;

        svc.execute(DeleteUserSession {
            token: token.clone(),
        })
        .await
        .unwrap();

        let out = svc.execute(AuthorizeUserSession { token }).await.unwrap();
        assert!(out.is_none());
    }

    #[tokio::test]
    async fn ignores_unknown_session() {
        let svc = service();

        svc.execute(DeleteUserSession {
            token: session::Token::generate(),
        })
        .await
        .unwrap();
    }
}
