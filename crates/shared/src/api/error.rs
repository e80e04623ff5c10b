use std::{collections::BTreeMap, error::Error, fmt};

pub use http::StatusCode;
use serde::{Deserialize, Serialize};
#[cfg(feature = "backend")]
use {
    axum::{
        extract::rejection::JsonRejection,
        response::{IntoResponse, Response},
        Json,
    },
    tracing::{debug, error},
};

/// Inner error type for routes that have no domain specific failures
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Nothing {}

impl fmt::Display for Nothing {
    fn fmt(&self, _f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {}
    }
}

impl Error for Nothing {}

/// Input that was rejected before anything was persisted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationError {
    pub error_messages: Vec<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub field_errors: BTreeMap<String, Vec<String>>,
}

impl ValidationError {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field<F: Into<String>, S: Into<String>>(field: F, message: S) -> Self {
        let mut e = Self::new();
        e.add_field(field, message);
        e
    }

    pub fn add_general<S: Into<String>>(&mut self, message: S) {
        self.error_messages.push(message.into());
    }

    pub fn add_field<F: Into<String>, S: Into<String>>(&mut self, field: F, message: S) {
        self.field_errors.entry(field.into()).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.error_messages.is_empty() && self.field_errors.is_empty()
    }

    /// `Ok` when nothing has been recorded
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut messages = self.error_messages.clone();
        for (field, errors) in &self.field_errors {
            for e in errors {
                messages.push(format!("{field}: {e}"));
            }
        }
        write!(f, "{}", messages.join("; "))
    }
}

impl Error for ValidationError {}

#[derive(Debug)]
pub enum ServerError<T> {
    /// A route specific error with the status code it maps to
    Inner { code: StatusCode, inner: T },
    Validation { inner: ValidationError },
    StatusCode { code: StatusCode, message: String },
    Other { message: String },
}

impl<T> ServerError<T> {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServerError::Inner { code, .. } | ServerError::StatusCode { code, .. } => *code,
            ServerError::Validation { .. } => StatusCode::BAD_REQUEST,
            ServerError::Other { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn inner(&self) -> Option<&T> {
        match self {
            ServerError::Inner { inner, .. } => Some(inner),
            _ => None,
        }
    }
}

impl<T: fmt::Display> fmt::Display for ServerError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServerError::Inner { inner, .. } => write!(f, "{inner}"),
            ServerError::Validation { inner } => write!(f, "{inner}"),
            ServerError::StatusCode { message, .. } | ServerError::Other { message } => {
                write!(f, "{message}")
            },
        }
    }
}

impl<T: fmt::Debug + fmt::Display> Error for ServerError<T> {}

impl<T> From<ValidationError> for ServerError<T> {
    fn from(inner: ValidationError) -> Self {
        Self::Validation { inner }
    }
}

#[cfg(feature = "backend")]
impl<T> From<rusqlite::Error> for ServerError<T> {
    fn from(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::QueryReturnedNoRows => Self::StatusCode {
                code: StatusCode::NOT_FOUND,
                message: "Not found".to_string(),
            },
            other => Self::Other {
                message: format!("Database error: {other}"),
            },
        }
    }
}

#[cfg(feature = "backend")]
impl<T> From<deadpool_sqlite::InteractError> for ServerError<T> {
    fn from(err: deadpool_sqlite::InteractError) -> Self {
        Self::Other {
            message: format!("Database interact error: {err}"),
        }
    }
}

#[cfg(feature = "backend")]
impl<T> From<deadpool_sqlite::PoolError> for ServerError<T> {
    fn from(err: deadpool_sqlite::PoolError) -> Self {
        Self::Other {
            message: format!("Database pool error: {err}"),
        }
    }
}

#[cfg(feature = "backend")]
impl<T> From<JsonRejection> for ServerError<T> {
    fn from(rejection: JsonRejection) -> Self {
        let code = match rejection.status() {
            // Bodies that parse but don't fit the payload type are bad requests
            // like any other malformed input
            StatusCode::UNPROCESSABLE_ENTITY => StatusCode::BAD_REQUEST,
            code => code,
        };
        Self::StatusCode {
            code,
            message: rejection.body_text(),
        }
    }
}

#[cfg(feature = "backend")]
#[derive(Serialize)]
struct ErrorBody<'a, T> {
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'a T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    validation: Option<&'a ValidationError>,
}

#[cfg(feature = "backend")]
impl<T: Serialize + fmt::Display> IntoResponse for ServerError<T> {
    fn into_response(self) -> Response {
        let code = self.status_code();
        if code.is_server_error() {
            error!(%code, "{}", self);
        } else {
            debug!(%code, "{}", self);
        }

        let body = ErrorBody {
            message: self.to_string(),
            error: self.inner(),
            validation: match &self {
                ServerError::Validation { inner } => Some(inner),
                _ => None,
            },
        };
        (code, Json(body)).into_response()
    }
}

#[macro_export]
macro_rules! other_error {
    ($($arg:tt)+) => {
        $crate::api::error::ServerError::Other { message: format!($($arg)+) }
    };
}

#[macro_export]
macro_rules! status_code_error {
    ($code:expr, $($arg:tt)+) => {
        $crate::api::error::ServerError::StatusCode { code: $code, message: format!($($arg)+) }
    };
}

#[macro_export]
macro_rules! unauthorized_error {
    ($($arg:tt)+) => {
        $crate::status_code_error!($crate::api::error::StatusCode::UNAUTHORIZED, $($arg)+)
    };
}
