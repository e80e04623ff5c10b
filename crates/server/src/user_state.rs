use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use deadpool_sqlite::Pool;
use shared::{
    api::{
        error::{Nothing, ServerError},
        USER_ID_HEADER,
    },
    model::{User, UserId},
    types::Uuid,
    unauthorized_error,
};
use tracing::debug;

/// The authenticated caller. The id comes from the header set by the upstream
/// authenticator and must belong to a known user.
#[derive(Debug, Clone)]
pub struct UserState {
    pub id: UserId,
}

#[async_trait]
impl<S> FromRequestParts<S> for UserState
where
    S: Send + Sync,
    Pool: FromRef<S>,
{
    type Rejection = ServerError<Nothing>;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Some(header) = parts.headers.get(USER_ID_HEADER) else {
            return Err(unauthorized_error!("Missing {} header", USER_ID_HEADER));
        };
        let Some(id) = header.to_str().ok().and_then(|v| Uuid::parse(v.trim()).ok()) else {
            return Err(unauthorized_error!("Invalid {} header", USER_ID_HEADER));
        };

        let conn = Pool::from_ref(state).get().await?;
        let user = conn.interact(move |conn| User::fetch_maybe(conn, &id)).await??;

        match user {
            Some(user) => Ok(Self { id: (&user).into() }),
            None => {
                debug!(%id, "Unknown user");
                Err(unauthorized_error!("Unknown user"))
            },
        }
    }
}
