use std::{fmt, io};

/// Returned by [`Queue::try_enqueue`](crate::Queue::try_enqueue) when the element was not stored.
#[derive(PartialEq, Eq)]
pub enum EnqueueError<T> {
    /// An equivalent element is already queued. Holds the rejected element.
    Duplicate(T),
}

impl<T> EnqueueError<T> {
    pub fn into_inner(self) -> T {
        match self {
            EnqueueError::Duplicate(element) => element,
        }
    }
}

impl<T> fmt::Debug for EnqueueError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnqueueError::Duplicate(_) => f.write_str("EnqueueError::Duplicate(..)"),
        }
    }
}

impl<T> fmt::Display for EnqueueError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnqueueError::Duplicate(_) => f.write_str("equivalent element is already queued"),
        }
    }
}

impl<T> std::error::Error for EnqueueError<T> {}

impl<T> From<EnqueueError<T>> for io::Error {
    fn from(err: EnqueueError<T>) -> Self {
        let source = format!("{err}");
        match err {
            EnqueueError::Duplicate(_) => io::Error::new(io::ErrorKind::AlreadyExists, source),
        }
    }
}
