use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
#[cfg(feature = "backend")]
use {
    crate::{
        api::{error::ServerError, response_errors::UserError},
        model::NewUser,
    },
    exemplar::Model,
    rusqlite::{Connection, OptionalExtension, TransactionBehavior},
    sea_query::{enum_def, Expr, Query, SqliteQueryBuilder},
    sea_query_rusqlite::RusqliteBinder,
    tracing::info,
};

use crate::types::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "backend", derive(Model))]
#[cfg_attr(feature = "backend", table("user"))]
#[cfg_attr(feature = "backend", enum_def)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: Option<String>,
    pub registration_date: DateTime<Utc>,
}

#[cfg(feature = "backend")]
const USER_STAR: [UserIden; 4] = [
    UserIden::Id,
    UserIden::Username,
    UserIden::Email,
    UserIden::RegistrationDate,
];

#[cfg(feature = "backend")]
impl User {
    pub fn fetch_by_id(conn: &Connection, id: &Uuid) -> Result<User, rusqlite::Error> {
        let (sql, values) = Query::select()
            .columns(USER_STAR)
            .from(UserIden::Table)
            .and_where(Expr::col(UserIden::Id).eq(id))
            .limit(1)
            .build_rusqlite(SqliteQueryBuilder);

        let mut stmt = conn.prepare_cached(&sql)?;
        let user = stmt.query_row(&*values.as_params(), User::from_row)?;
        Ok(user)
    }

    pub fn fetch_maybe(conn: &Connection, id: &Uuid) -> Result<Option<User>, rusqlite::Error> {
        let (sql, values) = Query::select()
            .columns(USER_STAR)
            .from(UserIden::Table)
            .and_where(Expr::col(UserIden::Id).eq(id))
            .limit(1)
            .build_rusqlite(SqliteQueryBuilder);

        let mut stmt = conn.prepare_cached(&sql)?;
        let user = stmt.query_row(&*values.as_params(), User::from_row).optional()?;
        Ok(user)
    }

    pub fn fetch_by_username<T: AsRef<str>>(
        conn: &Connection,
        username: T,
    ) -> Result<Option<User>, rusqlite::Error> {
        let (sql, values) = Query::select()
            .columns(USER_STAR)
            .from(UserIden::Table)
            .and_where(Expr::col(UserIden::Username).eq(username.as_ref()))
            .limit(1)
            .build_rusqlite(SqliteQueryBuilder);

        let mut stmt = conn.prepare_cached(&sql)?;
        let user = stmt.query_row(&*values.as_params(), User::from_row).optional()?;
        Ok(user)
    }

    pub fn create(conn: &mut Connection, new_user: NewUser) -> Result<User, ServerError<UserError>> {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        if User::fetch_by_username(&tx, &new_user.username)?.is_some() {
            return Err(UserError::UsernameUnavailable.into());
        }

        let user = User {
            id: Uuid::new_v4(),
            username: new_user.username,
            email: new_user.email,
            registration_date: Utc::now(),
        };
        user.insert(&tx)?;
        tx.commit()?;

        info!(user_id = %user.id, username = %user.username, "Created user");
        Ok(user)
    }
}
