use axum::{extract::FromRef, http::StatusCode, routing::get, Json, Router};
use deadpool_sqlite::Pool;
use shared::{
    api::{
        error::ServerError,
        response_errors::{FetchError, UserError},
        Object,
    },
    model::{NewUser, User, ValidateModel},
};
use tracing::instrument;

use crate::{db::DatabaseConnection, Payload, UserState};

pub fn router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
    Pool: FromRef<S>,
{
    Router::new().route(Object::User.path(), get(fetch_user).post(create_user))
}

#[instrument(skip(conn))]
async fn create_user(
    DatabaseConnection(conn): DatabaseConnection,
    Payload(new_user): Payload<NewUser>,
) -> Result<(StatusCode, Json<User>), ServerError<UserError>> {
    new_user.validate()?;
    let user = conn.interact(move |conn| User::create(conn, new_user)).await??;
    Ok((StatusCode::CREATED, Json(user)))
}

#[instrument(skip(conn))]
async fn fetch_user(
    DatabaseConnection(conn): DatabaseConnection,
    user_state: UserState,
) -> Result<Json<User>, ServerError<FetchError>> {
    let user = conn
        .interact(move |conn| user_state.id.fetch_full_user(conn))
        .await??;
    Ok(Json(user))
}
