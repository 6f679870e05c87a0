//! Operation markers dispatched through [`Handler`]s.
//!
//! [`Handler`]: crate::Handler

use std::marker::PhantomData;

/// Storing a new `T`.
#[derive(Clone, Copy, Debug)]
pub struct Insert<T>(pub T);

/// Removing a `T`, usually described with [`By`].
#[derive(Clone, Copy, Debug)]
pub struct Delete<T>(pub T);

/// Looking up a `T`, usually described with [`By`].
#[derive(Clone, Copy, Debug)]
pub struct Select<T>(pub T);

/// Launching a long-running `T`, such as a periodic task.
#[derive(Clone, Copy, Debug)]
pub struct Start<T>(pub T);

/// Running a single iteration of `T`.
#[derive(Clone, Copy, Debug)]
pub struct Perform<T>(pub T);

/// Selector of `W` by a key `B`.
///
/// `W` only tags the operation, so the same key type may select different
/// things.
#[derive(Clone, Copy, Debug)]
pub struct By<W, B> {
    /// What is selected.
    _what: PhantomData<W>,

    /// Key to select by.
    by: B,
}

impl<W, B> By<W, B> {
    /// Wraps the provided key.
    #[must_use]
    pub fn new(by: B) -> Self {
        Self {
            _what: PhantomData,
            by,
        }
    }

    /// Unwraps the key.
    #[must_use]
    pub fn into_inner(self) -> B {
        self.by
    }
}
