use serde::{Deserialize, Serialize};
#[cfg(feature = "backend")]
use {
    super::ExerciseProgram,
    crate::{
        api::{error::ServerError, response_errors::ProgramError},
        model::{Exercise, ExerciseIden},
        permissions::{authorize, Action},
    },
    exemplar::Model,
    rusqlite::{Connection, Row, TransactionBehavior},
    sea_query::{enum_def, Alias, Expr, Order, Query, SqliteQueryBuilder},
    sea_query_rusqlite::RusqliteBinder,
    tracing::info,
};

use crate::{
    api::error::ValidationError,
    model::{
        constants::{PROGRAM_EXERCISE_DEFAULT_REPS, PROGRAM_EXERCISE_DEFAULT_SETS},
        ValidateModel,
    },
    types::Uuid,
};

/// Membership of an exercise in a program with the defaults used when the
/// program is performed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "backend", derive(Model))]
#[cfg_attr(feature = "backend", table("program_exercise"))]
#[cfg_attr(feature = "backend", enum_def)]
pub struct ProgramExercise {
    pub id: Uuid,
    pub program_id: Uuid,
    pub exercise_id: Uuid,
    pub default_sets: u16,
    pub default_reps: u16,
    /// Seconds
    pub default_rest_time: Option<u16>,
    #[serde(rename = "order")]
    pub sort_order: u16,
}

fn default_sets() -> u16 {
    PROGRAM_EXERCISE_DEFAULT_SETS
}

fn default_reps() -> u16 {
    PROGRAM_EXERCISE_DEFAULT_REPS
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewProgramExercise {
    pub exercise_id: Uuid,
    #[serde(default = "default_sets")]
    pub default_sets: u16,
    #[serde(default = "default_reps")]
    pub default_reps: u16,
    #[serde(default)]
    pub default_rest_time: Option<u16>,
    #[serde(default)]
    pub order: u16,
}

impl NewProgramExercise {
    pub fn new(exercise_id: Uuid) -> Self {
        Self {
            exercise_id,
            default_sets: PROGRAM_EXERCISE_DEFAULT_SETS,
            default_reps: PROGRAM_EXERCISE_DEFAULT_REPS,
            default_rest_time: None,
            order: 0,
        }
    }
}

impl ValidateModel for NewProgramExercise {
    fn validate(&self) -> Result<(), ValidationError> {
        let mut e = ValidationError::new();
        if self.default_sets == 0 {
            e.add_field("default_sets", "Sets must be greater than 0");
        }
        if self.default_reps == 0 {
            e.add_field("default_reps", "Reps must be greater than 0");
        }
        e.into_result()
    }
}

/// A program entry together with the name of its exercise
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgramExerciseView {
    pub id: Uuid,
    pub exercise_id: Uuid,
    pub exercise_name: String,
    pub default_sets: u16,
    pub default_reps: u16,
    pub default_rest_time: Option<u16>,
    pub order: u16,
}

#[cfg(feature = "backend")]
impl ProgramExerciseView {
    fn from_row(row: &Row<'_>) -> Result<Self, rusqlite::Error> {
        Ok(Self {
            id: row.get(0)?,
            exercise_id: row.get(1)?,
            default_sets: row.get(2)?,
            default_reps: row.get(3)?,
            default_rest_time: row.get(4)?,
            order: row.get(5)?,
            exercise_name: row.get(6)?,
        })
    }
}

#[cfg(feature = "backend")]
impl ProgramExercise {
    pub fn exists(conn: &Connection, program_id: &Uuid, exercise_id: &Uuid) -> Result<bool, rusqlite::Error> {
        let (sql, values) = Query::select()
            .expr(Expr::val(1))
            .from(ProgramExerciseIden::Table)
            .and_where(Expr::col(ProgramExerciseIden::ProgramId).eq(program_id))
            .and_where(Expr::col(ProgramExerciseIden::ExerciseId).eq(exercise_id))
            .limit(1)
            .build_rusqlite(SqliteQueryBuilder);

        let mut stmt = conn.prepare_cached(&sql)?;
        stmt.exists(&*values.as_params())
    }

    /// Adds an exercise to a program on behalf of `actor`. Everything is
    /// checked before the insert: the program must exist and be the actor's,
    /// the exercise must exist and share the program's owner, and the pair
    /// must not already be present.
    pub fn add(
        conn: &mut Connection,
        actor: &Uuid,
        program_id: &Uuid,
        new_entry: NewProgramExercise,
    ) -> Result<ProgramExercise, ServerError<ProgramError>> {
        new_entry.validate()?;

        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let Some(program) = ExerciseProgram::fetch_maybe(&tx, program_id)? else {
            return Err(ProgramError::ProgramNotFound.into());
        };
        if !authorize(actor, &program, Action::Update).is_allowed() {
            return Err(ProgramError::NotProgramOwner.into());
        }
        let Some(exercise) = Exercise::fetch_maybe(&tx, &new_entry.exercise_id)? else {
            return Err(ProgramError::ExerciseNotFound.into());
        };
        if exercise.user_id != program.user_id {
            return Err(ProgramError::OwnerMismatch.into());
        }
        if ProgramExercise::exists(&tx, &program.id, &exercise.id)? {
            return Err(ProgramError::AlreadyInProgram.into());
        }

        let entry = ProgramExercise {
            id: Uuid::new_v4(),
            program_id: program.id,
            exercise_id: exercise.id,
            default_sets: new_entry.default_sets,
            default_reps: new_entry.default_reps,
            default_rest_time: new_entry.default_rest_time,
            sort_order: new_entry.order,
        };
        entry.insert(&tx)?;
        tx.commit()?;

        info!(program_id = %program.id, exercise_id = %exercise.id, "Added exercise to program");
        Ok(entry)
    }

    /// Exercises of a program the actor owns, by `order` then insertion
    pub fn fetch_for_program(
        conn: &Connection,
        actor: &Uuid,
        program_id: &Uuid,
    ) -> Result<Vec<ProgramExerciseView>, ServerError<ProgramError>> {
        let Some(program) = ExerciseProgram::fetch_maybe(conn, program_id)? else {
            return Err(ProgramError::ProgramNotFound.into());
        };
        if !authorize(actor, &program, Action::Read).is_allowed() {
            return Err(ProgramError::NotProgramOwner.into());
        }

        let (sql, values) = Query::select()
            .columns([
                (ProgramExerciseIden::Table, ProgramExerciseIden::Id),
                (ProgramExerciseIden::Table, ProgramExerciseIden::ExerciseId),
                (ProgramExerciseIden::Table, ProgramExerciseIden::DefaultSets),
                (ProgramExerciseIden::Table, ProgramExerciseIden::DefaultReps),
                (ProgramExerciseIden::Table, ProgramExerciseIden::DefaultRestTime),
                (ProgramExerciseIden::Table, ProgramExerciseIden::SortOrder),
            ])
            .column((ExerciseIden::Table, ExerciseIden::Name))
            .from(ProgramExerciseIden::Table)
            .inner_join(
                ExerciseIden::Table,
                Expr::col((ExerciseIden::Table, ExerciseIden::Id))
                    .equals((ProgramExerciseIden::Table, ProgramExerciseIden::ExerciseId)),
            )
            .and_where(Expr::col((ProgramExerciseIden::Table, ProgramExerciseIden::ProgramId)).eq(program.id))
            .order_by((ProgramExerciseIden::Table, ProgramExerciseIden::SortOrder), Order::Asc)
            .order_by((ProgramExerciseIden::Table, Alias::new("rowid")), Order::Asc)
            .build_rusqlite(SqliteQueryBuilder);

        let mut stmt = conn.prepare_cached(&sql)?;
        let res = stmt
            .query_map(&*values.as_params(), ProgramExerciseView::from_row)?
            .collect::<Result<_, _>>()?;
        Ok(res)
    }
}
