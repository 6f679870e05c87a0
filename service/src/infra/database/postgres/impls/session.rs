//! [`Session`]-related [`Database`] implementations.
//!
//! [`Session`]s are kept in the in-process storage of [`Postgres`].

use common::operations::{By, Delete, Insert, Select};
use tracerr::Traced;

use crate::{
    domain::user::{session, Session},
    infra::{
        database::{self, Postgres},
        Database,
    },
};

impl Database<Insert<Session>> for Postgres {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        op: Insert<Session>,
    ) -> Result<Self::Ok, Self::Err> {
        self.sessions.execute(op).await.map_err(tracerr::wrap!())
    }
}

impl<'t> Database<Select<By<Option<Session>, &'t session::Token>>>
    for Postgres
{
    type Ok = Option<Session>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        op: Select<By<Option<Session>, &'t session::Token>>,
    ) -> Result<Self::Ok, Self::Err> {
        self.sessions.execute(op).await.map_err(tracerr::wrap!())
    }
}

impl<'t> Database<Delete<By<Session, &'t session::Token>>> for Postgres {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        op: Delete<By<Session, &'t session::Token>>,
    ) -> Result<Self::Ok, Self::Err> {
        self.sessions.execute(op).await.map_err(tracerr::wrap!())
    }
}

impl Database<Delete<By<Session, session::ExpirationDateTime>>> for Postgres {
    type Ok = usize;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        op: Delete<By<Session, session::ExpirationDateTime>>,
    ) -> Result<Self::Ok, Self::Err> {
        self.sessions.execute(op).await.map_err(tracerr::wrap!())
    }
}
