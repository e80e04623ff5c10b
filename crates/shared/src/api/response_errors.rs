use http::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::api::error::ServerError;

macro_rules! response_error {
    ($name:ident {
        $(
            #[code($variant_code:expr)]
            #[error($($message:tt)+)]
            $variant:ident
            $({ $($var_struct_body_tt:tt)* })?
        ,)*
    }) => {

        #[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Error)]
        pub enum $name {
            $(
                #[error($($message)+)]
                $variant $({
                    $($var_struct_body_tt)*
                })?,
            )*
        }

        impl $name {
            pub fn status_code(&self) -> StatusCode {
                match self {
                    $( $name::$variant { .. } => $variant_code, )*
                }
            }
        }

        impl From<$name> for ServerError<$name> {
            fn from(inner: $name) -> Self {
                let code = inner.status_code();
                Self::Inner { code, inner }
            }
        }
    };
}

response_error!(UserError {
    #[code(StatusCode::BAD_REQUEST)]
    #[error("A user with that username already exists")]
    UsernameUnavailable,
});

response_error!(ProfileError {
    #[code(StatusCode::NOT_FOUND)]
    #[error("No current profile")]
    NoCurrentProfile,
});

response_error!(AnalyticsError {
    #[code(StatusCode::NOT_FOUND)]
    #[error("No profile data available")]
    NoProfileData,
    #[code(StatusCode::NOT_FOUND)]
    #[error("Exercise not found")]
    ExerciseNotFound,
    #[code(StatusCode::NOT_FOUND)]
    #[error("No workout data available")]
    NoWorkoutData,
});

response_error!(ExerciseError {
    #[code(StatusCode::BAD_REQUEST)]
    #[error("This exercise already exists for this user and category")]
    AlreadyExists,
});

response_error!(ProgramError {
    #[code(StatusCode::NOT_FOUND)]
    #[error("Program not found")]
    ProgramNotFound,
    #[code(StatusCode::NOT_FOUND)]
    #[error("Exercise not found")]
    ExerciseNotFound,
    #[code(StatusCode::FORBIDDEN)]
    #[error("You do not have permission to access this program")]
    NotProgramOwner,
    #[code(StatusCode::BAD_REQUEST)]
    #[error("The exercise and the program belong to different users")]
    OwnerMismatch,
    #[code(StatusCode::BAD_REQUEST)]
    #[error("This exercise is already part of the program")]
    AlreadyInProgram,
});

response_error!(TrainingSessionError {
    #[code(StatusCode::NOT_FOUND)]
    #[error("Program not found")]
    ProgramNotFound,
    #[code(StatusCode::FORBIDDEN)]
    #[error("You do not have permission to use this program")]
    NotProgramOwner,
});

response_error!(WorkoutLogError {
    #[code(StatusCode::NOT_FOUND)]
    #[error("Training session not found")]
    SessionNotFound,
    #[code(StatusCode::NOT_FOUND)]
    #[error("Exercise not found")]
    ExerciseNotFound,
    #[code(StatusCode::FORBIDDEN)]
    #[error("You do not have permission to log to this session")]
    NotSessionOwner,
    #[code(StatusCode::BAD_REQUEST)]
    #[error("You can only log exercises for your own sessions")]
    OwnerMismatch,
});

// Alias used to allow future expansion of the errors without having to go back
// and update all routes that use it
pub type FetchError = super::error::Nothing;
