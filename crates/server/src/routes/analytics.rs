use axum::{
    extract::{FromRef, Query},
    routing::get,
    Json, Router,
};
use chrono::Utc;
use deadpool_sqlite::Pool;
use shared::{
    analytics::{BmiReport, ExerciseReport, WeightReport, WindowQuery},
    api::{error::ServerError, response_errors::AnalyticsError, Analytics},
    model::{Exercise, Profile, WorkoutLog},
};
use tracing::instrument;

use crate::{db::DatabaseConnection, RecordId, UserState};

pub fn router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
    Pool: FromRef<S>,
{
    Router::new()
        .route(Analytics::Weight.path(), get(weight_report))
        .route(Analytics::Bmi.path(), get(bmi_report))
        .route(Analytics::Exercise.path(), get(exercise_report))
}

#[instrument(skip(conn))]
async fn weight_report(
    DatabaseConnection(conn): DatabaseConnection,
    user_state: UserState,
    Query(query): Query<WindowQuery>,
) -> Result<Json<WeightReport>, ServerError<AnalyticsError>> {
    let window = query.resolve(Utc::now())?;
    let profiles = conn
        .interact(move |conn| Profile::fetch_in_window(conn, &user_state.id, &window))
        .await??;
    Ok(Json(WeightReport::build(&window, &profiles)?))
}

#[instrument(skip(conn))]
async fn bmi_report(
    DatabaseConnection(conn): DatabaseConnection,
    user_state: UserState,
    Query(query): Query<WindowQuery>,
) -> Result<Json<BmiReport>, ServerError<AnalyticsError>> {
    let window = query.resolve(Utc::now())?;
    let profiles = conn
        .interact(move |conn| Profile::fetch_in_window(conn, &user_state.id, &window))
        .await??;
    Ok(Json(BmiReport::build(&window, &profiles)?))
}

#[instrument(skip(conn))]
async fn exercise_report(
    DatabaseConnection(conn): DatabaseConnection,
    user_state: UserState,
    RecordId(exercise_id, _): RecordId<AnalyticsError>,
    Query(query): Query<WindowQuery>,
) -> Result<Json<ExerciseReport>, ServerError<AnalyticsError>> {
    let window = query.resolve(Utc::now())?;
    let (exercise, entries) = conn
        .interact(move |conn| {
            let Some(exercise) = Exercise::fetch_owned(conn, &exercise_id, &user_state.id)? else {
                return Err(AnalyticsError::ExerciseNotFound.into());
            };
            let entries =
                WorkoutLog::fetch_exercise_entries(conn, &user_state.id, &exercise.id, &window)?;
            Ok::<_, ServerError<AnalyticsError>>((exercise, entries))
        })
        .await??;
    Ok(Json(ExerciseReport::build(&window, &exercise.name, &entries)?))
}
