//! [`Background`] environment for running [`Task`]s.

use std::{
    error::Error,
    future::{Future, IntoFuture},
    iter,
};

use futures::{
    future::{self, LocalBoxFuture},
    FutureExt as _, TryFutureExt as _,
};
use tokio::task;

#[cfg(doc)]
use crate::Task;

/// Type-erased error of a [`Task`].
type TaskError = Box<dyn Error + 'static>;

/// Background environment for running [`Task`]s.
///
/// Spawned [`Task`]s are run on the current thread once this [`Background`]
/// is awaited, which resolves with the first [`Task`] failure.
#[derive(Debug, Default)]
pub struct Background {
    /// Local set of [`Task`]s.
    set: task::LocalSet,

    /// Handles of spawned [`Task`]s.
    handles: Vec<task::JoinHandle<Result<(), TaskError>>>,
}

impl Background {
    /// Spawns a new [`Task`] inside this [`Background`] environment.
    pub fn spawn<F, E>(&mut self, future: F)
    where
        F: Future<Output = Result<(), E>> + 'static,
        E: Error + 'static,
    {
        self.handles.push(
            self.set
                .spawn_local(future.map_err(TaskError::from)),
        );
    }
}

/// Flattens the outcome of a spawned [`Task`] into its [`TaskError`].
fn flatten(
    res: Result<Result<(), TaskError>, task::JoinError>,
) -> Result<(), TaskError> {
    res.map_err(TaskError::from)?
}

impl IntoFuture for Background {
    type Output = Result<(), TaskError>;
    type IntoFuture = LocalBoxFuture<'static, Self::Output>;

    fn into_future(self) -> Self::IntoFuture {
        let Self { set, handles } = self;
        let set = set.map(Ok).boxed_local();
        let tasks = handles.into_iter().map(|h| h.map(flatten).boxed_local());
        future::try_join_all(iter::once(set).chain(tasks))
            .map_ok(drop)
            .boxed_local()
    }
}
