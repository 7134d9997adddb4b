//! Outcome of a create-or-fetch operation.

use serde::Serialize;

/// Either the entity this call created, or the state that already occupied
/// its unique key.
///
/// `Existing` is the conflict signal: the delivery layer answers it with 409
/// and the carried state, so clients can reconcile without another read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Created<T, C = T> {
    New(T),
    Existing(C),
}

impl<T, C> Created<T, C> {
    pub fn is_new(&self) -> bool {
        matches!(self, Created::New(_))
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, Created::Existing(_))
    }

    /// 201 for a new entity, 409 for an existing one.
    pub fn status_code(&self) -> u16 {
        match self {
            Created::New(_) => 201,
            Created::Existing(_) => 409,
        }
    }

    pub fn existing(self) -> Option<C> {
        match self {
            Created::New(_) => None,
            Created::Existing(value) => Some(value),
        }
    }
}

impl<T> Created<T, T> {
    /// The entity, whichever way it was obtained.
    pub fn into_inner(self) -> T {
        match self {
            Created::New(value) | Created::Existing(value) => value,
        }
    }
}
