use std::marker::PhantomData;

use axum::{
    async_trait,
    extract::{FromRequestParts, Path},
    http::request::Parts,
    response::IntoResponse,
};
use shared::{
    api::{
        error::ServerError,
        response_errors::{AnalyticsError, ProgramError},
    },
    types::Uuid,
};
use tracing::debug;

/// Error a route reports when its `:id` names no record
pub trait MissingRecord {
    fn missing() -> Self;
}

impl MissingRecord for AnalyticsError {
    fn missing() -> Self {
        AnalyticsError::ExerciseNotFound
    }
}

impl MissingRecord for ProgramError {
    fn missing() -> Self {
        ProgramError::ProgramNotFound
    }
}

/// The `:id` path segment. Anything that isn't a uuid can't name a stored
/// record and is rejected with the route's not found error.
#[derive(Debug)]
pub struct RecordId<E>(pub Uuid, pub PhantomData<E>);

#[async_trait]
impl<S, E> FromRequestParts<S> for RecordId<E>
where
    S: Send + Sync,
    E: MissingRecord + Send + 'static,
    ServerError<E>: From<E> + IntoResponse,
{
    type Rejection = ServerError<E>;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Path::<Uuid>::from_request_parts(parts, state).await {
            Ok(Path(id)) => Ok(RecordId(id, PhantomData)),
            Err(rejection) => {
                debug!(path = %parts.uri.path(), "Rejected record id: {}", rejection.body_text());
                Err(E::missing().into())
            },
        }
    }
}
