use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
#[cfg(feature = "backend")]
use {
    crate::{
        api::{error::ServerError, response_errors::TrainingSessionError},
        model::ExerciseProgram,
        permissions::{authorize, Action},
    },
    exemplar::Model,
    rusqlite::{Connection, OptionalExtension},
    sea_query::{enum_def, Expr, Order, Query, SelectStatement, SqliteQueryBuilder},
    sea_query_rusqlite::RusqliteBinder,
    tracing::info,
};

use crate::{api::error::ValidationError, model::ValidateModel, types::Uuid};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "backend", derive(Model))]
#[cfg_attr(feature = "backend", table("training_session"))]
#[cfg_attr(feature = "backend", enum_def)]
pub struct TrainingSession {
    pub id: Uuid,
    pub user_id: Uuid,
    pub program_id: Option<Uuid>,
    pub date: NaiveDate,
    /// Minutes
    pub duration: u32,
    pub notes: String,
    pub created_at: DateTime<Utc>,
}

#[cfg(feature = "backend")]
const TRAINING_SESSION_STAR: [TrainingSessionIden; 7] = [
    TrainingSessionIden::Id,
    TrainingSessionIden::UserId,
    TrainingSessionIden::ProgramId,
    TrainingSessionIden::Date,
    TrainingSessionIden::Duration,
    TrainingSessionIden::Notes,
    TrainingSessionIden::CreatedAt,
];

#[cfg(feature = "backend")]
impl TrainingSession {
    fn select_star() -> SelectStatement {
        Query::select()
            .columns(TRAINING_SESSION_STAR)
            .from(TrainingSessionIden::Table)
            .to_owned()
    }

    pub fn fetch_maybe(conn: &Connection, id: &Uuid) -> Result<Option<TrainingSession>, rusqlite::Error> {
        let (sql, values) = Self::select_star()
            .and_where(Expr::col(TrainingSessionIden::Id).eq(id))
            .limit(1)
            .build_rusqlite(SqliteQueryBuilder);

        let mut stmt = conn.prepare_cached(&sql)?;
        let res = stmt.query_row(&*values.as_params(), TrainingSession::from_row).optional()?;
        Ok(res)
    }

    /// The user's sessions, newest first
    pub fn fetch_for_user(
        conn: &Connection,
        user_id: &Uuid,
        program_id: Option<&Uuid>,
    ) -> Result<Vec<TrainingSession>, rusqlite::Error> {
        let mut query = Self::select_star();
        query.and_where(Expr::col(TrainingSessionIden::UserId).eq(user_id));
        if let Some(program_id) = program_id {
            query.and_where(Expr::col(TrainingSessionIden::ProgramId).eq(program_id));
        }
        let (sql, values) = query
            .order_by(TrainingSessionIden::Date, Order::Desc)
            .order_by(TrainingSessionIden::CreatedAt, Order::Desc)
            .build_rusqlite(SqliteQueryBuilder);

        let mut stmt = conn.prepare_cached(&sql)?;
        let res = stmt
            .query_map(&*values.as_params(), TrainingSession::from_row)?
            .collect::<Result<_, _>>()?;
        Ok(res)
    }

    pub fn create(
        conn: &Connection,
        actor: &Uuid,
        new_session: NewTrainingSession,
    ) -> Result<TrainingSession, ServerError<TrainingSessionError>> {
        new_session.validate()?;

        if let Some(program_id) = &new_session.program_id {
            let Some(program) = ExerciseProgram::fetch_maybe(conn, program_id)? else {
                return Err(TrainingSessionError::ProgramNotFound.into());
            };
            if !authorize(actor, &program, Action::Create).is_allowed() {
                return Err(TrainingSessionError::NotProgramOwner.into());
            }
        }

        let session = TrainingSession {
            id: Uuid::new_v4(),
            user_id: *actor,
            program_id: new_session.program_id,
            date: new_session.date,
            duration: new_session.duration,
            notes: new_session.notes,
            created_at: Utc::now(),
        };
        session.insert(conn)?;

        info!(user_id = %actor, session_id = %session.id, date = %session.date, "Created training session");
        Ok(session)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTrainingSession {
    #[serde(default)]
    pub program_id: Option<Uuid>,
    pub date: NaiveDate,
    pub duration: u32,
    #[serde(default)]
    pub notes: String,
}

impl ValidateModel for NewTrainingSession {
    fn validate(&self) -> Result<(), ValidationError> {
        let mut e = ValidationError::new();
        if self.duration == 0 {
            e.add_field("duration", "Duration must be greater than 0 minutes");
        }
        e.into_result()
    }
}

/// Query string filter for listing sessions
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrainingSessionFilter {
    pub program_id: Option<Uuid>,
}
