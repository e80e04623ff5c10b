use axum::{
    extract::FromRef,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use deadpool_sqlite::Pool;
use shared::{
    api::{error::ServerError, response_errors::ProgramError, Object},
    model::{ExerciseProgram, NewExerciseProgram, NewProgramExercise, ProgramExercise, ProgramExerciseView},
};
use tracing::instrument;

use crate::{db::DatabaseConnection, Payload, RecordId, UserState};

pub fn router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
    Pool: FromRef<S>,
{
    Router::new()
        .route(Object::Program.path(), post(create_program))
        .route(
            Object::ProgramExercises.path(),
            get(fetch_program_exercises).post(add_program_exercise),
        )
}

#[instrument(skip(conn))]
async fn create_program(
    DatabaseConnection(conn): DatabaseConnection,
    user_state: UserState,
    Payload(new_program): Payload<NewExerciseProgram>,
) -> Result<(StatusCode, Json<ExerciseProgram>), ServerError<ProgramError>> {
    let program = conn
        .interact(move |conn| ExerciseProgram::create(conn, &user_state.id, new_program))
        .await??;
    Ok((StatusCode::CREATED, Json(program)))
}

#[instrument(skip(conn))]
async fn add_program_exercise(
    DatabaseConnection(conn): DatabaseConnection,
    user_state: UserState,
    RecordId(program_id, _): RecordId<ProgramError>,
    Payload(new_entry): Payload<NewProgramExercise>,
) -> Result<(StatusCode, Json<ProgramExercise>), ServerError<ProgramError>> {
    let entry = conn
        .interact(move |conn| ProgramExercise::add(conn, &user_state.id, &program_id, new_entry))
        .await??;
    Ok((StatusCode::CREATED, Json(entry)))
}

#[instrument(skip(conn))]
async fn fetch_program_exercises(
    DatabaseConnection(conn): DatabaseConnection,
    user_state: UserState,
    RecordId(program_id, _): RecordId<ProgramError>,
) -> Result<Json<Vec<ProgramExerciseView>>, ServerError<ProgramError>> {
    let entries = conn
        .interact(move |conn| ProgramExercise::fetch_for_program(conn, &user_state.id, &program_id))
        .await??;
    Ok(Json(entries))
}
