use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
#[cfg(feature = "backend")]
use {
    super::{TrainingSession, TrainingSessionIden},
    crate::{
        analytics::{ExerciseLogEntry, TimeWindow},
        api::{error::ServerError, response_errors::WorkoutLogError},
        model::{Exercise, ExerciseIden},
        permissions::{authorize, Action},
    },
    exemplar::Model,
    rusqlite::{Connection, Row, TransactionBehavior},
    sea_query::{enum_def, Alias, Expr, Order, Query, SelectStatement, SqliteQueryBuilder},
    sea_query_rusqlite::RusqliteBinder,
    tracing::info,
};

use crate::{
    api::error::ValidationError,
    model::{constants::WORKOUT_WEIGHT_MAX_KG, ValidateModel},
    types::Uuid,
};

/// One exercise performed during a training session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "backend", derive(Model))]
#[cfg_attr(feature = "backend", table("workout_log"))]
#[cfg_attr(feature = "backend", enum_def)]
pub struct WorkoutLog {
    pub id: Uuid,
    pub session_id: Uuid,
    pub exercise_id: Uuid,
    pub sets: u16,
    pub reps: u16,
    /// Kilograms
    pub weight: Option<f64>,
    /// Seconds
    pub rest_time: Option<u16>,
    pub notes: Option<String>,
}

/// Load volume shown next to a log. A log without weight has no load.
pub fn display_volume(sets: u16, reps: u16, weight: Option<f64>) -> f64 {
    f64::from(sets) * f64::from(reps) * weight.unwrap_or(0.0)
}

impl WorkoutLog {
    pub fn volume(&self) -> f64 {
        display_volume(self.sets, self.reps, self.weight)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewWorkoutLog {
    pub session_id: Uuid,
    pub exercise_id: Uuid,
    pub sets: u16,
    pub reps: u16,
    #[serde(default)]
    pub weight: Option<f64>,
    #[serde(default)]
    pub rest_time: Option<u16>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl ValidateModel for NewWorkoutLog {
    fn validate(&self) -> Result<(), ValidationError> {
        let mut e = ValidationError::new();
        if self.sets == 0 {
            e.add_field("sets", "Sets must be greater than 0");
        }
        if self.reps == 0 {
            e.add_field("reps", "Reps must be greater than 0");
        }
        if let Some(weight) = self.weight {
            if !(0.0..=WORKOUT_WEIGHT_MAX_KG).contains(&weight) {
                e.add_field(
                    "weight",
                    format!("Weight must be between 0 and {WORKOUT_WEIGHT_MAX_KG} kg"),
                );
            }
        }
        e.into_result()
    }
}

/// Query string filter for listing logs
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkoutLogFilter {
    pub session_id: Option<Uuid>,
    pub exercise_id: Option<Uuid>,
}

/// A log as returned by the API, with its session date, exercise name and
/// load volume
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutLogView {
    pub id: Uuid,
    pub session_id: Uuid,
    pub session_date: NaiveDate,
    pub exercise_id: Uuid,
    pub exercise_name: String,
    pub sets: u16,
    pub reps: u16,
    pub weight: Option<f64>,
    pub rest_time: Option<u16>,
    pub volume: f64,
    pub notes: Option<String>,
}

#[cfg(feature = "backend")]
impl WorkoutLogView {
    fn from_row(row: &Row<'_>) -> Result<Self, rusqlite::Error> {
        let sets = row.get(3)?;
        let reps = row.get(4)?;
        let weight = row.get(5)?;
        Ok(Self {
            id: row.get(0)?,
            session_id: row.get(1)?,
            exercise_id: row.get(2)?,
            sets,
            reps,
            weight,
            rest_time: row.get(6)?,
            notes: row.get(7)?,
            session_date: row.get(8)?,
            exercise_name: row.get(9)?,
            volume: display_volume(sets, reps, weight),
        })
    }
}

#[cfg(feature = "backend")]
const WORKOUT_LOG_STAR: [WorkoutLogIden; 8] = [
    WorkoutLogIden::Id,
    WorkoutLogIden::SessionId,
    WorkoutLogIden::ExerciseId,
    WorkoutLogIden::Sets,
    WorkoutLogIden::Reps,
    WorkoutLogIden::Weight,
    WorkoutLogIden::RestTime,
    WorkoutLogIden::Notes,
];

#[cfg(feature = "backend")]
impl WorkoutLog {
    /// Logs joined to sessions owned by `user_id`, ordered by session date
    /// then insertion
    fn select_owned(user_id: &Uuid) -> SelectStatement {
        Query::select()
            .from(WorkoutLogIden::Table)
            .inner_join(
                TrainingSessionIden::Table,
                Expr::col((TrainingSessionIden::Table, TrainingSessionIden::Id))
                    .equals((WorkoutLogIden::Table, WorkoutLogIden::SessionId)),
            )
            .and_where(Expr::col((TrainingSessionIden::Table, TrainingSessionIden::UserId)).eq(user_id))
            .order_by((TrainingSessionIden::Table, TrainingSessionIden::Date), Order::Asc)
            .order_by((WorkoutLogIden::Table, Alias::new("rowid")), Order::Asc)
            .to_owned()
    }

    pub fn create(
        conn: &mut Connection,
        actor: &Uuid,
        new_log: NewWorkoutLog,
    ) -> Result<WorkoutLog, ServerError<WorkoutLogError>> {
        new_log.validate()?;

        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let Some(session) = TrainingSession::fetch_maybe(&tx, &new_log.session_id)? else {
            return Err(WorkoutLogError::SessionNotFound.into());
        };
        if !authorize(actor, &session, Action::Update).is_allowed() {
            return Err(WorkoutLogError::NotSessionOwner.into());
        }
        let Some(exercise) = Exercise::fetch_maybe(&tx, &new_log.exercise_id)? else {
            return Err(WorkoutLogError::ExerciseNotFound.into());
        };
        if exercise.user_id != session.user_id {
            return Err(WorkoutLogError::OwnerMismatch.into());
        }

        let log = WorkoutLog {
            id: Uuid::new_v4(),
            session_id: session.id,
            exercise_id: exercise.id,
            sets: new_log.sets,
            reps: new_log.reps,
            weight: new_log.weight,
            rest_time: new_log.rest_time,
            notes: new_log.notes,
        };
        log.insert(&tx)?;
        tx.commit()?;

        info!(session_id = %session.id, exercise_id = %exercise.id, log_id = %log.id, "Logged exercise");
        Ok(log)
    }

    pub fn fetch_for_user(
        conn: &Connection,
        user_id: &Uuid,
        filter: &WorkoutLogFilter,
    ) -> Result<Vec<WorkoutLogView>, rusqlite::Error> {
        let mut query = Self::select_owned(user_id);
        query
            .columns(WORKOUT_LOG_STAR.map(|c| (WorkoutLogIden::Table, c)))
            .column((TrainingSessionIden::Table, TrainingSessionIden::Date))
            .column((ExerciseIden::Table, ExerciseIden::Name))
            .inner_join(
                ExerciseIden::Table,
                Expr::col((ExerciseIden::Table, ExerciseIden::Id))
                    .equals((WorkoutLogIden::Table, WorkoutLogIden::ExerciseId)),
            );
        if let Some(session_id) = &filter.session_id {
            query.and_where(Expr::col((WorkoutLogIden::Table, WorkoutLogIden::SessionId)).eq(session_id));
        }
        if let Some(exercise_id) = &filter.exercise_id {
            query.and_where(Expr::col((WorkoutLogIden::Table, WorkoutLogIden::ExerciseId)).eq(exercise_id));
        }
        let (sql, values) = query.build_rusqlite(SqliteQueryBuilder);

        let mut stmt = conn.prepare_cached(&sql)?;
        let res = stmt
            .query_map(&*values.as_params(), WorkoutLogView::from_row)?
            .collect::<Result<_, _>>()?;
        Ok(res)
    }

    /// Logs of one exercise whose session date falls inside the window
    pub fn fetch_exercise_entries(
        conn: &Connection,
        user_id: &Uuid,
        exercise_id: &Uuid,
        window: &TimeWindow,
    ) -> Result<Vec<ExerciseLogEntry>, rusqlite::Error> {
        let (sql, values) = Self::select_owned(user_id)
            .columns([
                (WorkoutLogIden::Table, WorkoutLogIden::SessionId),
                (WorkoutLogIden::Table, WorkoutLogIden::Sets),
                (WorkoutLogIden::Table, WorkoutLogIden::Reps),
                (WorkoutLogIden::Table, WorkoutLogIden::Weight),
            ])
            .column((TrainingSessionIden::Table, TrainingSessionIden::Date))
            .and_where(Expr::col((WorkoutLogIden::Table, WorkoutLogIden::ExerciseId)).eq(exercise_id))
            .and_where(
                Expr::col((TrainingSessionIden::Table, TrainingSessionIden::Date))
                    .between(window.start.date_naive(), window.end.date_naive()),
            )
            .build_rusqlite(SqliteQueryBuilder);

        let mut stmt = conn.prepare_cached(&sql)?;
        let res = stmt
            .query_map(&*values.as_params(), |row| {
                Ok(ExerciseLogEntry {
                    session_id: row.get(0)?,
                    sets: row.get(1)?,
                    reps: row.get(2)?,
                    weight: row.get(3)?,
                    session_date: row.get(4)?,
                })
            })?
            .collect::<Result<_, _>>()?;
        Ok(res)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_log(sets: u16, reps: u16, weight: Option<f64>) -> NewWorkoutLog {
        NewWorkoutLog {
            session_id: Uuid::new_v4(),
            exercise_id: Uuid::new_v4(),
            sets,
            reps,
            weight,
            rest_time: None,
            notes: None,
        }
    }

    #[test]
    fn volume_treats_missing_weight_as_zero() {
        assert_eq!(display_volume(3, 10, Some(50.0)), 1500.0);
        assert_eq!(display_volume(3, 10, None), 0.0);
    }

    #[test]
    fn log_validation() {
        assert!(new_log(3, 10, Some(50.0)).validate().is_ok());
        assert!(new_log(3, 10, None).validate().is_ok());
        assert!(new_log(3, 10, Some(999.99)).validate().is_ok());

        let err = new_log(0, 0, Some(1000.0)).validate().unwrap_err();
        assert_eq!(err.field_errors.len(), 3);
        assert!(new_log(1, 1, Some(-1.0)).validate().is_err());
    }
}
