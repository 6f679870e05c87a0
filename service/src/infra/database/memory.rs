//! In-process [`Memory`] [`Database`] implementation.

use std::{collections::HashMap, sync::Arc};

use common::operations::{By, Delete, Insert, Select};
use tokio::sync::Mutex;
use tracerr::Traced;

use crate::{
    domain::{
        user::{self, session, Session},
        User,
    },
    infra::{database, Database},
};

/// In-process [`Database`] keeping everything in memory.
///
/// Cheap to clone: clones share the same state.
#[derive(Clone, Debug, Default)]
pub struct Memory {
    /// Registered [`User`]s.
    users: Arc<Mutex<Users>>,

    /// Active [`Session`]s by their [`session::Token`]s.
    sessions: Arc<Mutex<HashMap<session::Token, Session>>>,
}

/// [`User`]s table of a [`Memory`] storage.
#[derive(Debug, Default)]
struct Users {
    /// Last assigned [`user::Id`].
    last_id: i64,

    /// [`User`]s by their IDs.
    by_id: HashMap<user::Id, User>,

    /// Index of [`user::Id`]s by [`user::Email`]s.
    by_email: HashMap<user::Email, user::Id>,
}

impl Database<Select<By<Option<User>, user::Id>>> for Memory {
    type Ok = Option<User>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<User>, user::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        Ok(self.users.lock().await.by_id.get(&id).cloned())
    }
}

impl<'e> Database<Select<By<Option<User>, &'e user::Email>>> for Memory {
    type Ok = Option<User>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<User>, &'e user::Email>>,
    ) -> Result<Self::Ok, Self::Err> {
        let email = by.into_inner();
        let users = self.users.lock().await;
        Ok(users
            .by_email
            .get(email)
            .and_then(|id| users.by_id.get(id))
            .cloned())
    }
}

impl Database<Insert<user::Draft>> for Memory {
    /// [`None`] if the [`user::Email`] is occupied already.
    type Ok = Option<User>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(draft): Insert<user::Draft>,
    ) -> Result<Self::Ok, Self::Err> {
        let mut users = self.users.lock().await;
        if users.by_email.contains_key(&draft.email) {
            return Ok(None);
        }

        users.last_id += 1;
        let user = User {
            id: user::Id::from(users.last_id),
            email: draft.email,
            password_hash: draft.password_hash,
        };
        _ = users.by_email.insert(user.email.clone(), user.id);
        drop(users.by_id.insert(user.id, user.clone()));

        Ok(Some(user))
    }
}

impl Database<Insert<Session>> for Memory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(session): Insert<Session>,
    ) -> Result<Self::Ok, Self::Err> {
        drop(
            self.sessions
                .lock()
                .await
                .insert(session.token.clone(), session),
        );
        Ok(())
    }
}

impl<'t> Database<Select<By<Option<Session>, &'t session::Token>>> for Memory {
    type Ok = Option<Session>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Session>, &'t session::Token>>,
    ) -> Result<Self::Ok, Self::Err> {
        let token = by.into_inner();
        Ok(self.sessions.lock().await.get(token).cloned())
    }
}

impl<'t> Database<Delete<By<Session, &'t session::Token>>> for Memory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<Session, &'t session::Token>>,
    ) -> Result<Self::Ok, Self::Err> {
        let token = by.into_inner();
        drop(self.sessions.lock().await.remove(token));
        Ok(())
    }
}

impl Database<Delete<By<Session, session::ExpirationDateTime>>> for Memory {
    /// Number of deleted [`Session`]s.
    type Ok = usize;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<Session, session::ExpirationDateTime>>,
    ) -> Result<Self::Ok, Self::Err> {
        let now = by.into_inner();
        let mut sessions = self.sessions.lock().await;
        let before = sessions.len();
        sessions.retain(|_, s| !s.is_expired_at(now));
        Ok(before - sessions.len())
    }
}

#[cfg(test)]
mod spec {
    use std::time::Duration;

    use common::operations::{By, Delete, Insert, Select};

    use crate::{
        domain::user::{self, session, Session},
        infra::Database as _,
    };

    use super::Memory;

    fn draft(email: &str) -> user::Draft {
        user::Draft {
            email: user::Email::new(email).unwrap(),
            password_hash: user::PasswordHash::new(
                &user::Password::new("secret").unwrap(),
                4,
            )
            .unwrap(),
        }
    }

    #[tokio::test]
    async fn assigns_sequential_ids() {
        let db = Memory::default();

        let first = db.execute(Insert(draft("a@x.io"))).await.unwrap().unwrap();
        let second = db.execute(Insert(draft("b@x.io"))).await.unwrap().unwrap();

        assert_eq!(i64::from(first.id), 1);
        assert_eq!(i64::from(second.id), 2);
    }

    #[tokio::test]
    async fn rejects_occupied_email() {
        let db = Memory::default();
        let original = db.execute(Insert(draft("a@x.io"))).await.unwrap().unwrap();

        assert!(db.execute(Insert(draft("a@x.io"))).await.unwrap().is_none());
        assert!(db.execute(Insert(draft("A@x.io"))).await.unwrap().is_some());

        let found = db
            .execute(Select(By::new(&original.email)))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.id, original.id);
        assert_eq!(found.password_hash, original.password_hash);
    }

    #[tokio::test]
    async fn concurrent_inserts_of_same_email_create_one_user() {
        let db = Memory::default();

        let results = futures::future::join_all(
            (0..8).map(|_| db.execute(Insert(draft("same@x.io")))),
        )
        .await;

        assert_eq!(
            results.into_iter().filter(|r| matches!(r, Ok(Some(_)))).count(),
            1,
        );
    }

    #[tokio::test]
    async fn selects_users_by_id() {
        let db = Memory::default();
        let user = db.execute(Insert(draft("a@x.io"))).await.unwrap().unwrap();

        let found = db.execute(Select(By::new(user.id))).await.unwrap();
        assert_eq!(found.map(|u| u.email), Some(user.email));

        let missing = db
            .execute(Select(By::new(user::Id::from(42))))
            .await
            .unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn stores_and_deletes_sessions() {
        let db = Memory::default();
        let session = Session::start(user::Id::from(1), Session::DEFAULT_TTL);
        let token = session.token.clone();

        db.execute(Insert(session)).await.unwrap();
        let found: Option<Session> =
            db.execute(Select(By::new(&token))).await.unwrap();
        assert_eq!(found.map(|s| s.user_id), Some(user::Id::from(1)));

        db.execute(Delete(By::new(&token))).await.unwrap();
        db.execute(Delete(By::new(&token))).await.unwrap();
        let found: Option<Session> =
            db.execute(Select(By::new(&token))).await.unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn deletes_only_expired_sessions() {
        let db = Memory::default();
        let alive = Session::start(user::Id::from(1), Session::DEFAULT_TTL);
        let expired = Session::start(user::Id::from(2), Duration::ZERO);
        let (alive_token, expired_token) =
            (alive.token.clone(), expired.token.clone());
        db.execute(Insert(alive)).await.unwrap();
        db.execute(Insert(expired)).await.unwrap();

        let deleted = db
            .execute(Delete(By::new(session::ExpirationDateTime::now())))
            .await
            .unwrap();

        assert_eq!(deleted, 1);
        let found: Option<Session> =
            db.execute(Select(By::new(&alive_token))).await.unwrap();
        assert!(found.is_some());
        let found: Option<Session> =
            db.execute(Select(By::new(&expired_token))).await.unwrap();
        assert!(found.is_none());
    }
}
