//! [`User`]-related [`Database`] implementations.

use common::operations::{By, Insert, Select};
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::{user, User},
    infra::{
        database::{self, postgres::Connection as _, Postgres},
        Database,
    },
};

/// Builds a [`User`] out of the provided `users` table [`Row`].
fn from_row(row: &Row) -> User {
    User {
        id: row.get("id"),
        email: row.get("email"),
        password_hash: row.get("password_hash"),
    }
}

impl Database<Select<By<Option<User>, user::Id>>> for Postgres {
    type Ok = Option<User>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<User>, user::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();

        const SQL: &str = "\
            SELECT id, email, password_hash \
            FROM users \
            WHERE id = $1::INT8";
        Ok(self
            .connection()
            .await
            .map_err(tracerr::wrap!())?
            .query_opt(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())?
            .as_ref()
            .map(from_row))
    }
}

impl<'e> Database<Select<By<Option<User>, &'e user::Email>>> for Postgres {
    type Ok = Option<User>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<User>, &'e user::Email>>,
    ) -> Result<Self::Ok, Self::Err> {
        let email = by.into_inner();

        const SQL: &str = "\
            SELECT id, email, password_hash \
            FROM users \
            WHERE email = $1::VARCHAR";
        Ok(self
            .connection()
            .await
            .map_err(tracerr::wrap!())?
            .query_opt(SQL, &[email])
            .await
            .map_err(tracerr::wrap!())?
            .as_ref()
            .map(from_row))
    }
}

impl Database<Insert<user::Draft>> for Postgres {
    /// [`None`] if the [`user::Email`] is occupied already.
    type Ok = Option<User>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(draft): Insert<user::Draft>,
    ) -> Result<Self::Ok, Self::Err> {
        let user::Draft {
            email,
            password_hash,
        } = draft;

        const SQL: &str = "\
            INSERT INTO users (email, password_hash) \
            VALUES ($1::VARCHAR, $2::VARCHAR) \
            ON CONFLICT (email) DO NOTHING \
            RETURNING id, email, password_hash";
        Ok(self
            .connection()
            .await
            .map_err(tracerr::wrap!())?
            .query_opt(SQL, &[&email, &password_hash])
            .await
            .map_err(tracerr::wrap!())?
            .as_ref()
            .map(from_row))
    }
}
