use chrono::Utc;
use exemplar::Model;
use rusqlite::{Connection, TransactionBehavior};
use sea_query::{Expr, Query, SqliteQueryBuilder};
use sea_query_rusqlite::RusqliteBinder;
use tracing::info;

use super::{Profile, ProfileFields, ProfileIden, ProfilePatch, ProfileStatus};
use crate::{
    api::{error::ServerError, response_errors::ProfileError},
    types::Uuid,
};

/// Flips every current profile of the user to historical. Returns how many
/// rows changed, which is 0 or 1 as long as the current profile index holds.
fn retire_current(conn: &Connection, user_id: &Uuid) -> Result<usize, rusqlite::Error> {
    let (sql, values) = Query::update()
        .table(ProfileIden::Table)
        .value(ProfileIden::Status, ProfileStatus::Current.superseded())
        .and_where(Expr::col(ProfileIden::UserId).eq(user_id))
        .and_where(Expr::col(ProfileIden::Status).eq(ProfileStatus::Current))
        .build_rusqlite(SqliteQueryBuilder);

    let mut stmt = conn.prepare_cached(&sql)?;
    stmt.execute(&*values.as_params())
}

fn insert_current(conn: &Connection, user_id: &Uuid, fields: ProfileFields) -> Result<Profile, rusqlite::Error> {
    let profile = Profile {
        id: Uuid::new_v4(),
        user_id: *user_id,
        height: fields.height,
        weight: fields.weight,
        location: fields.location,
        birth_date: fields.birth_date,
        created_at: Utc::now(),
        status: ProfileStatus::Current,
    };
    profile.insert(conn)?;
    Ok(profile)
}

impl Profile {
    /// Makes a new profile the user's current one. The previous current
    /// profile, if any, is retired in the same immediate transaction so two
    /// writers for the same user can't both leave a current row behind.
    pub fn create_current(
        conn: &mut Connection,
        user_id: &Uuid,
        fields: ProfileFields,
    ) -> Result<Profile, ServerError<ProfileError>> {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let retired = retire_current(&tx, user_id)?;
        let profile = insert_current(&tx, user_id, fields)?;
        tx.commit()?;

        info!(%user_id, profile_id = %profile.id, retired, "Created profile version");
        Ok(profile)
    }

    /// Applies `patch` on top of the current profile and stores the result as
    /// a new version. The old row is kept as history.
    pub fn update_current(
        conn: &mut Connection,
        user_id: &Uuid,
        patch: ProfilePatch,
    ) -> Result<Profile, ServerError<ProfileError>> {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let Some(current) = Profile::fetch_current(&tx, user_id)? else {
            return Err(ProfileError::NoCurrentProfile.into());
        };

        let fields = patch.apply(&current);
        let retired = retire_current(&tx, user_id)?;
        if retired != 1 {
            return Err(crate::other_error!(
                "Expected to retire profile {} but {} rows changed",
                current.id,
                retired
            ));
        }
        let profile = insert_current(&tx, user_id, fields)?;
        tx.commit()?;

        info!(%user_id, previous_id = %current.id, profile_id = %profile.id, "Updated profile version");
        Ok(profile)
    }
}
