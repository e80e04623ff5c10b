use axum::{extract::FromRef, http::StatusCode, routing::get, Json, Router};
use deadpool_sqlite::Pool;
use shared::{
    api::{error::ServerError, response_errors::ProfileError, Object},
    model::{Profile, ProfileFields, ProfilePatch, ProfileView, ValidateModel},
};
use tracing::instrument;

use crate::{db::DatabaseConnection, Payload, UserState};

pub fn router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
    Pool: FromRef<S>,
{
    Router::new()
        .route(
            Object::Profile.path(),
            get(fetch_current)
                .post(create_profile)
                .put(update_profile)
                .patch(update_profile),
        )
        .route(Object::ProfileHistory.path(), get(fetch_history))
}

#[instrument(skip(conn))]
async fn fetch_current(
    DatabaseConnection(conn): DatabaseConnection,
    user_state: UserState,
) -> Result<Json<ProfileView>, ServerError<ProfileError>> {
    let profile = conn
        .interact(move |conn| Profile::fetch_current(conn, &user_state.id))
        .await??
        .ok_or(ProfileError::NoCurrentProfile)?;
    Ok(Json(ProfileView::from(&profile)))
}

#[instrument(skip(conn))]
async fn create_profile(
    DatabaseConnection(conn): DatabaseConnection,
    user_state: UserState,
    Payload(fields): Payload<ProfileFields>,
) -> Result<(StatusCode, Json<ProfileView>), ServerError<ProfileError>> {
    fields.validate()?;
    let profile = conn
        .interact(move |conn| Profile::create_current(conn, &user_state.id, fields))
        .await??;
    Ok((StatusCode::CREATED, Json(ProfileView::from(&profile))))
}

/// PUT and PATCH both roll a new version from the current profile with the
/// supplied fields merged in
#[instrument(skip(conn))]
async fn update_profile(
    DatabaseConnection(conn): DatabaseConnection,
    user_state: UserState,
    Payload(patch): Payload<ProfilePatch>,
) -> Result<Json<ProfileView>, ServerError<ProfileError>> {
    patch.validate()?;
    let profile = conn
        .interact(move |conn| Profile::update_current(conn, &user_state.id, patch))
        .await??;
    Ok(Json(ProfileView::from(&profile)))
}

#[instrument(skip(conn))]
async fn fetch_history(
    DatabaseConnection(conn): DatabaseConnection,
    user_state: UserState,
) -> Result<Json<Vec<ProfileView>>, ServerError<ProfileError>> {
    let profiles = conn
        .interact(move |conn| Profile::fetch_history(conn, &user_state.id))
        .await??;
    Ok(Json(profiles.iter().map(ProfileView::from).collect()))
}
