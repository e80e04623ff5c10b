mod program_exercise;
pub use program_exercise::*;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
#[cfg(feature = "backend")]
use {
    crate::api::{error::ServerError, response_errors::ProgramError},
    exemplar::Model,
    rusqlite::{Connection, OptionalExtension},
    sea_query::{enum_def, Expr, Query, SelectStatement, SqliteQueryBuilder},
    sea_query_rusqlite::RusqliteBinder,
    tracing::info,
};

use crate::{
    api::error::ValidationError,
    model::{constants::PROGRAM_NAME_MAX_LENGTH, ValidateModel},
    types::Uuid,
};

/// Named collection of a user's exercises
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "backend", derive(Model))]
#[cfg_attr(feature = "backend", table("exercise_program"))]
#[cfg_attr(feature = "backend", enum_def)]
pub struct ExerciseProgram {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(feature = "backend")]
const EXERCISE_PROGRAM_STAR: [ExerciseProgramIden; 6] = [
    ExerciseProgramIden::Id,
    ExerciseProgramIden::UserId,
    ExerciseProgramIden::Name,
    ExerciseProgramIden::Description,
    ExerciseProgramIden::CreatedAt,
    ExerciseProgramIden::UpdatedAt,
];

#[cfg(feature = "backend")]
impl ExerciseProgram {
    fn select_star() -> SelectStatement {
        Query::select()
            .columns(EXERCISE_PROGRAM_STAR)
            .from(ExerciseProgramIden::Table)
            .to_owned()
    }

    pub fn fetch_maybe(conn: &Connection, id: &Uuid) -> Result<Option<ExerciseProgram>, rusqlite::Error> {
        let (sql, values) = Self::select_star()
            .and_where(Expr::col(ExerciseProgramIden::Id).eq(id))
            .limit(1)
            .build_rusqlite(SqliteQueryBuilder);

        let mut stmt = conn.prepare_cached(&sql)?;
        let res = stmt.query_row(&*values.as_params(), ExerciseProgram::from_row).optional()?;
        Ok(res)
    }

    pub fn create(
        conn: &Connection,
        user_id: &Uuid,
        new_program: NewExerciseProgram,
    ) -> Result<ExerciseProgram, ServerError<ProgramError>> {
        new_program.validate()?;

        let now = Utc::now();
        let program = ExerciseProgram {
            id: Uuid::new_v4(),
            user_id: *user_id,
            name: new_program.name,
            description: new_program.description,
            created_at: now,
            updated_at: now,
        };
        program.insert(conn)?;

        info!(%user_id, program_id = %program.id, "Created program");
        Ok(program)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewExerciseProgram {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

impl ValidateModel for NewExerciseProgram {
    fn validate(&self) -> Result<(), ValidationError> {
        let mut e = ValidationError::new();
        if self.name.trim().is_empty() {
            e.add_field("name", "Name is required");
        } else if self.name.chars().count() > PROGRAM_NAME_MAX_LENGTH {
            e.add_field(
                "name",
                format!("Name can be at most {PROGRAM_NAME_MAX_LENGTH} characters"),
            );
        }
        e.into_result()
    }
}
