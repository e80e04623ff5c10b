use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
#[cfg(feature = "backend")]
use {
    crate::api::{error::ServerError, response_errors::ExerciseError},
    exemplar::Model,
    rusqlite::{Connection, OptionalExtension, TransactionBehavior},
    sea_query::{enum_def, Expr, Query, SelectStatement, SqliteQueryBuilder},
    sea_query_rusqlite::RusqliteBinder,
    tracing::info,
};

use crate::{
    api::error::ValidationError,
    model::{constants::EXERCISE_NAME_MAX_LENGTH, ValidateModel},
    types::Uuid,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "backend", derive(Model))]
#[cfg_attr(feature = "backend", table("exercise"))]
#[cfg_attr(feature = "backend", enum_def)]
pub struct Exercise {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub category: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(feature = "backend")]
const EXERCISE_STAR: [ExerciseIden; 7] = [
    ExerciseIden::Id,
    ExerciseIden::UserId,
    ExerciseIden::Name,
    ExerciseIden::Category,
    ExerciseIden::Description,
    ExerciseIden::CreatedAt,
    ExerciseIden::UpdatedAt,
];

#[cfg(feature = "backend")]
impl Exercise {
    fn select_star() -> SelectStatement {
        Query::select().columns(EXERCISE_STAR).from(ExerciseIden::Table).to_owned()
    }

    pub fn fetch_maybe(conn: &Connection, id: &Uuid) -> Result<Option<Exercise>, rusqlite::Error> {
        let (sql, values) = Self::select_star()
            .and_where(Expr::col(ExerciseIden::Id).eq(id))
            .limit(1)
            .build_rusqlite(SqliteQueryBuilder);

        let mut stmt = conn.prepare_cached(&sql)?;
        let res = stmt.query_row(&*values.as_params(), Exercise::from_row).optional()?;
        Ok(res)
    }

    /// The exercise if it exists and belongs to `user_id`. Other users'
    /// exercises are indistinguishable from missing ones.
    pub fn fetch_owned(
        conn: &Connection,
        id: &Uuid,
        user_id: &Uuid,
    ) -> Result<Option<Exercise>, rusqlite::Error> {
        let (sql, values) = Self::select_star()
            .and_where(Expr::col(ExerciseIden::Id).eq(id))
            .and_where(Expr::col(ExerciseIden::UserId).eq(user_id))
            .limit(1)
            .build_rusqlite(SqliteQueryBuilder);

        let mut stmt = conn.prepare_cached(&sql)?;
        let res = stmt.query_row(&*values.as_params(), Exercise::from_row).optional()?;
        Ok(res)
    }

    pub fn exists_for(
        conn: &Connection,
        user_id: &Uuid,
        name: &str,
        category: &str,
    ) -> Result<bool, rusqlite::Error> {
        let (sql, values) = Query::select()
            .expr(Expr::val(1))
            .from(ExerciseIden::Table)
            .and_where(Expr::col(ExerciseIden::UserId).eq(user_id))
            .and_where(Expr::col(ExerciseIden::Name).eq(name))
            .and_where(Expr::col(ExerciseIden::Category).eq(category))
            .limit(1)
            .build_rusqlite(SqliteQueryBuilder);

        let mut stmt = conn.prepare_cached(&sql)?;
        stmt.exists(&*values.as_params())
    }

    pub fn create(
        conn: &mut Connection,
        user_id: &Uuid,
        new_exercise: NewExercise,
    ) -> Result<Exercise, ServerError<ExerciseError>> {
        new_exercise.validate()?;

        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        if Exercise::exists_for(&tx, user_id, &new_exercise.name, &new_exercise.category)? {
            return Err(ExerciseError::AlreadyExists.into());
        }

        let now = Utc::now();
        let exercise = Exercise {
            id: Uuid::new_v4(),
            user_id: *user_id,
            name: new_exercise.name,
            category: new_exercise.category,
            description: new_exercise.description,
            created_at: now,
            updated_at: now,
        };
        exercise.insert(&tx)?;
        tx.commit()?;

        info!(%user_id, exercise_id = %exercise.id, "Created exercise");
        Ok(exercise)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewExercise {
    pub name: String,
    pub category: String,
    #[serde(default)]
    pub description: String,
}

impl ValidateModel for NewExercise {
    fn validate(&self) -> Result<(), ValidationError> {
        let mut e = ValidationError::new();
        if self.name.trim().is_empty() {
            e.add_field("name", "Name is required");
        } else if self.name.chars().count() > EXERCISE_NAME_MAX_LENGTH {
            e.add_field(
                "name",
                format!("Name can be at most {EXERCISE_NAME_MAX_LENGTH} characters"),
            );
        }
        if self.category.trim().is_empty() {
            e.add_field("category", "Category is required");
        }
        e.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_and_category_are_required() {
        let err = NewExercise::default().validate().unwrap_err();
        assert!(err.field_errors.contains_key("name"));
        assert!(err.field_errors.contains_key("category"));

        let long = NewExercise {
            name: "a".repeat(101),
            category: "strength".to_string(),
            description: String::new(),
        };
        assert_eq!(long.validate().unwrap_err().field_errors.len(), 1);

        let ok = NewExercise {
            name: "Bench press".to_string(),
            category: "strength".to_string(),
            description: String::new(),
        };
        assert!(ok.validate().is_ok());
    }
}
