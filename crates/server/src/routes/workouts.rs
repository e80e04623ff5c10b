use axum::{
    extract::{FromRef, Query},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use deadpool_sqlite::Pool;
use shared::{
    api::{
        error::ServerError,
        response_errors::{FetchError, TrainingSessionError, WorkoutLogError},
        Object,
    },
    model::{
        NewTrainingSession, NewWorkoutLog, TrainingSession, TrainingSessionFilter, WorkoutLog,
        WorkoutLogFilter, WorkoutLogView,
    },
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
            Object::TrainingSession.path(),
            get(fetch_sessions).post(create_session),
        )
        .route(Object::WorkoutLog.path(), get(fetch_logs).post(create_log))
}

#[instrument(skip(conn))]
async fn create_session(
    DatabaseConnection(conn): DatabaseConnection,
    user_state: UserState,
    Payload(new_session): Payload<NewTrainingSession>,
) -> Result<(StatusCode, Json<TrainingSession>), ServerError<TrainingSessionError>> {
    let session = conn
        .interact(move |conn| TrainingSession::create(conn, &user_state.id, new_session))
        .await??;
    Ok((StatusCode::CREATED, Json(session)))
}

#[instrument(skip(conn))]
async fn fetch_sessions(
    DatabaseConnection(conn): DatabaseConnection,
    user_state: UserState,
    Query(filter): Query<TrainingSessionFilter>,
) -> Result<Json<Vec<TrainingSession>>, ServerError<FetchError>> {
    let sessions = conn
        .interact(move |conn| {
            TrainingSession::fetch_for_user(conn, &user_state.id, filter.program_id.as_ref())
        })
        .await??;
    Ok(Json(sessions))
}

#[instrument(skip(conn))]
async fn create_log(
    DatabaseConnection(conn): DatabaseConnection,
    user_state: UserState,
    Payload(new_log): Payload<NewWorkoutLog>,
) -> Result<(StatusCode, Json<WorkoutLog>), ServerError<WorkoutLogError>> {
    let log = conn
        .interact(move |conn| WorkoutLog::create(conn, &user_state.id, new_log))
        .await??;
    Ok((StatusCode::CREATED, Json(log)))
}

#[instrument(skip(conn))]
async fn fetch_logs(
    DatabaseConnection(conn): DatabaseConnection,
    user_state: UserState,
    Query(filter): Query<WorkoutLogFilter>,
) -> Result<Json<Vec<WorkoutLogView>>, ServerError<FetchError>> {
    let logs = conn
        .interact(move |conn| WorkoutLog::fetch_for_user(conn, &user_state.id, &filter))
        .await??;
    Ok(Json(logs))
}
