use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
#[cfg(feature = "backend")]
use {
    exemplar::Model,
    rusqlite::{
        types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef},
        Connection, OptionalExtension, ToSql,
    },
    sea_query::{enum_def, Alias, Expr, Order, Query, SelectStatement, SqliteQueryBuilder},
    sea_query_rusqlite::RusqliteBinder,
};

#[cfg(feature = "backend")]
use crate::analytics::TimeWindow;
use crate::{
    analytics::bmi,
    api::error::ValidationError,
    model::{constants::LOCATION_MAX_LENGTH, ValidateModel},
    types::Uuid,
};

#[cfg(feature = "backend")]
mod versioning;

/// Lifecycle of a profile row. A profile starts out `Current` and becomes
/// `Historical` once a newer profile for the same user is created. There is
/// no way back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileStatus {
    Current,
    Historical,
}

impl ProfileStatus {
    pub fn is_current(self) -> bool {
        self == ProfileStatus::Current
    }

    /// State after a newer profile takes over. `Historical` is terminal.
    pub(crate) fn superseded(self) -> Self {
        ProfileStatus::Historical
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ProfileStatus::Current => "current",
            ProfileStatus::Historical => "historical",
        }
    }
}

#[cfg(feature = "backend")]
impl ToSql for ProfileStatus {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

#[cfg(feature = "backend")]
impl FromSql for ProfileStatus {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value.as_str()? {
            "current" => Ok(ProfileStatus::Current),
            "historical" => Ok(ProfileStatus::Historical),
            other => Err(FromSqlError::Other(
                format!("Unknown profile status: {other}").into(),
            )),
        }
    }
}

#[cfg(feature = "backend")]
impl From<ProfileStatus> for sea_query::Value {
    fn from(value: ProfileStatus) -> Self {
        value.as_str().into()
    }
}

/// Snapshot of a user's body metrics. Rows are append only, the status is the
/// only column that changes after insert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "backend", derive(Model))]
#[cfg_attr(feature = "backend", table("profile"))]
#[cfg_attr(feature = "backend", enum_def)]
pub struct Profile {
    pub id: Uuid,
    pub user_id: Uuid,
    /// Centimeters
    pub height: Option<u16>,
    /// Kilograms
    pub weight: Option<u16>,
    pub location: String,
    pub birth_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub(crate) status: ProfileStatus,
}

impl Profile {
    pub fn status(&self) -> ProfileStatus {
        self.status
    }

    pub fn is_current(&self) -> bool {
        self.status.is_current()
    }

    pub fn bmi(&self) -> Option<f64> {
        bmi(self.height, self.weight)
    }
}

#[cfg(feature = "backend")]
const PROFILE_STAR: [ProfileIden; 8] = [
    ProfileIden::Id,
    ProfileIden::UserId,
    ProfileIden::Height,
    ProfileIden::Weight,
    ProfileIden::Location,
    ProfileIden::BirthDate,
    ProfileIden::CreatedAt,
    ProfileIden::Status,
];

#[cfg(feature = "backend")]
impl Profile {
    fn select_star() -> SelectStatement {
        Query::select().columns(PROFILE_STAR).from(ProfileIden::Table).to_owned()
    }

    fn query_all(conn: &Connection, query: &SelectStatement) -> Result<Vec<Profile>, rusqlite::Error> {
        let (sql, values) = query.build_rusqlite(SqliteQueryBuilder);

        let mut stmt = conn.prepare_cached(&sql)?;
        let res = stmt
            .query_map(&*values.as_params(), Profile::from_row)?
            .collect::<Result<_, _>>()?;
        Ok(res)
    }

    pub fn fetch_by_id(conn: &Connection, id: &Uuid) -> Result<Profile, rusqlite::Error> {
        let (sql, values) = Self::select_star()
            .and_where(Expr::col(ProfileIden::Id).eq(id))
            .limit(1)
            .build_rusqlite(SqliteQueryBuilder);

        let mut stmt = conn.prepare_cached(&sql)?;
        let res = stmt.query_row(&*values.as_params(), Profile::from_row)?;
        Ok(res)
    }

    /// The user's single current profile, if they have ever created one
    pub fn fetch_current(conn: &Connection, user_id: &Uuid) -> Result<Option<Profile>, rusqlite::Error> {
        let (sql, values) = Self::select_star()
            .and_where(Expr::col(ProfileIden::UserId).eq(user_id))
            .and_where(Expr::col(ProfileIden::Status).eq(ProfileStatus::Current))
            .limit(1)
            .build_rusqlite(SqliteQueryBuilder);

        let mut stmt = conn.prepare_cached(&sql)?;
        let res = stmt.query_row(&*values.as_params(), Profile::from_row).optional()?;
        Ok(res)
    }

    /// Every profile of the user, newest first
    pub fn fetch_history(conn: &Connection, user_id: &Uuid) -> Result<Vec<Profile>, rusqlite::Error> {
        let query = Self::select_star()
            .and_where(Expr::col(ProfileIden::UserId).eq(user_id))
            .order_by(ProfileIden::CreatedAt, Order::Desc)
            .order_by(Alias::new("rowid"), Order::Desc)
            .to_owned();
        Self::query_all(conn, &query)
    }

    /// Profiles created inside the window, oldest first
    pub fn fetch_in_window(
        conn: &Connection,
        user_id: &Uuid,
        window: &TimeWindow,
    ) -> Result<Vec<Profile>, rusqlite::Error> {
        let query = Self::select_star()
            .and_where(Expr::col(ProfileIden::UserId).eq(user_id))
            .and_where(Expr::col(ProfileIden::CreatedAt).between(window.start, window.end))
            .order_by(ProfileIden::CreatedAt, Order::Asc)
            .order_by(Alias::new("rowid"), Order::Asc)
            .to_owned();
        Self::query_all(conn, &query)
    }
}

/// Fields supplied when creating a profile
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileFields {
    pub height: Option<u16>,
    pub weight: Option<u16>,
    #[serde(default)]
    pub location: String,
    pub birth_date: Option<NaiveDate>,
}

/// Changes applied on top of the current profile. Missing fields keep the
/// current profile's value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfilePatch {
    pub height: Option<u16>,
    pub weight: Option<u16>,
    pub location: Option<String>,
    pub birth_date: Option<NaiveDate>,
}

impl ProfilePatch {
    pub fn apply(self, current: &Profile) -> ProfileFields {
        ProfileFields {
            height: self.height.or(current.height),
            weight: self.weight.or(current.weight),
            location: self.location.unwrap_or_else(|| current.location.clone()),
            birth_date: self.birth_date.or(current.birth_date),
        }
    }
}

fn validate_body_metrics(
    e: &mut ValidationError,
    height: Option<u16>,
    weight: Option<u16>,
    location: Option<&str>,
) {
    if height == Some(0) {
        e.add_field("height", "Height must be a positive number of centimeters");
    }
    if weight == Some(0) {
        e.add_field("weight", "Weight must be a positive number of kilograms");
    }
    if let Some(location) = location {
        if location.chars().count() > LOCATION_MAX_LENGTH {
            e.add_field(
                "location",
                format!("Location can be at most {LOCATION_MAX_LENGTH} characters"),
            );
        }
    }
}

impl ValidateModel for ProfileFields {
    fn validate(&self) -> Result<(), ValidationError> {
        let mut e = ValidationError::new();
        validate_body_metrics(&mut e, self.height, self.weight, Some(&self.location));
        e.into_result()
    }
}

impl ValidateModel for ProfilePatch {
    fn validate(&self) -> Result<(), ValidationError> {
        let mut e = ValidationError::new();
        validate_body_metrics(&mut e, self.height, self.weight, self.location.as_deref());
        e.into_result()
    }
}

/// Response representation of a profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileView {
    pub id: Uuid,
    pub is_current: bool,
    pub created_at: DateTime<Utc>,
    pub weight: Option<u16>,
    pub bmi: Option<f64>,
    pub height: Option<u16>,
    pub location: String,
    pub birth_date: Option<NaiveDate>,
}

impl From<&Profile> for ProfileView {
    fn from(p: &Profile) -> Self {
        Self {
            id: p.id,
            is_current: p.is_current(),
            created_at: p.created_at,
            weight: p.weight,
            bmi: p.bmi(),
            height: p.height,
            location: p.location.clone(),
            birth_date: p.birth_date,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(height: Option<u16>, weight: Option<u16>) -> Profile {
        Profile {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            height,
            weight,
            location: "Tehran".to_string(),
            birth_date: None,
            created_at: Utc::now(),
            status: ProfileStatus::Current,
        }
    }

    #[test]
    fn historical_is_terminal() {
        assert_eq!(ProfileStatus::Current.superseded(), ProfileStatus::Historical);
        assert_eq!(ProfileStatus::Historical.superseded(), ProfileStatus::Historical);
    }

    #[test]
    fn patch_keeps_missing_fields() {
        let current = profile(Some(175), Some(70));
        let fields = ProfilePatch {
            weight: Some(72),
            ..Default::default()
        }
        .apply(&current);
        assert_eq!(fields.height, Some(175));
        assert_eq!(fields.weight, Some(72));
        assert_eq!(fields.location, "Tehran");
    }

    #[test]
    fn view_carries_bmi_and_status() {
        let view = ProfileView::from(&profile(Some(175), Some(70)));
        assert_eq!(view.bmi, Some(22.9));
        assert!(view.is_current);

        let view = ProfileView::from(&profile(None, Some(70)));
        assert_eq!(view.bmi, None);
    }

    #[test]
    fn rejects_zero_metrics_and_long_location() {
        let fields = ProfileFields {
            height: Some(0),
            weight: Some(0),
            location: "x".repeat(31),
            birth_date: None,
        };
        let err = fields.validate().unwrap_err();
        assert_eq!(err.field_errors.len(), 3);
        assert!(ProfilePatch::default().validate().is_ok());
    }
}
