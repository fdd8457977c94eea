use crate::RecordId;
use std::{error::Error as StdError, fmt, sync::Arc};
use thiserror::Error;

/// A cloneable transport error.
///
/// Results of deduplicated operations are fanned out to every waiter, so the error has to be
/// shareable. Any `std::error::Error` converts into it with `?`.
#[derive(Clone, Debug)]
pub struct QueryError {
    inner: Arc<Box<dyn StdError + Send + Sync>>
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.inner)
    }
}

impl<T: StdError + Send + Sync + 'static> From<T> for QueryError {
    fn from(e: T) -> Self {
        QueryError {
            inner: Arc::new(Box::new(e))
        }
    }
}

/// Why a call against a [RemoteDataSource](./source/trait.RemoteDataSource.html) failed.
#[derive(Debug, Clone, Error)]
pub enum SourceError {
    #[error("{0}")]
    Transport(QueryError),
    #[error("server returned errors: {}", join_messages(.0))]
    Server(Vec<crate::Error>),
    #[error("response is missing `{0}`")]
    MissingData(&'static str)
}

impl From<QueryError> for SourceError {
    fn from(e: QueryError) -> Self {
        SourceError::Transport(e)
    }
}

fn join_messages(errors: &[crate::Error]) -> String {
    errors
        .iter()
        .map(|error| error.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

/// A failed request, as surfaced to the presentation layer.
///
/// Each variant is terminal for the request that produced it. Nothing is retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MirrorError {
    #[error("could not load users: {reason}")]
    FetchFailed { reason: String },
    #[error("could not update user {id}: {reason}")]
    UpdateFailed { id: RecordId, reason: String },
    #[error("could not delete user {id}: {reason}")]
    DeleteFailed { id: RecordId, reason: String }
}

impl MirrorError {
    pub fn reason(&self) -> &str {
        match self {
            MirrorError::FetchFailed { reason }
            | MirrorError::UpdateFailed { reason, .. }
            | MirrorError::DeleteFailed { reason, .. } => reason
        }
    }
}
