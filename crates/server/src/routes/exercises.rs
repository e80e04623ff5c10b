use axum::{extract::FromRef, http::StatusCode, routing::post, Json, Router};
use deadpool_sqlite::Pool;
use shared::{
    api::{error::ServerError, response_errors::ExerciseError, Object},
    model::{Exercise, NewExercise},
};
use tracing::instrument;

use crate::{db::DatabaseConnection, Payload, UserState};

pub fn router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
    Pool: FromRef<S>,
{
    Router::new().route(Object::Exercise.path(), post(create_exercise))
}

#[instrument(skip(conn))]
async fn create_exercise(
    DatabaseConnection(conn): DatabaseConnection,
    user_state: UserState,
    Payload(new_exercise): Payload<NewExercise>,
) -> Result<(StatusCode, Json<Exercise>), ServerError<ExerciseError>> {
    let exercise = conn
        .interact(move |conn| Exercise::create(conn, &user_state.id, new_exercise))
        .await??;
    Ok((StatusCode::CREATED, Json(exercise)))
}
