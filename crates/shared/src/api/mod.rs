use const_format::concatcp;
pub mod error;
pub mod response_errors;

pub const API_BASE_PATH: &str = "/api/";

/// Set by the upstream authenticator to the id of the logged in user
pub const USER_ID_HEADER: &str = "X-User-Id";

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Object {
    Ping,
    User,
    Profile,
    ProfileHistory,
    Exercise,
    Program,
    ProgramExercises,
    TrainingSession,
    WorkoutLog,
}

impl Object {
    pub const fn path(&self) -> &str {
        use Object::*;
        match self {
            Ping => concatcp!(API_BASE_PATH, "ping"),
            User => concatcp!(API_BASE_PATH, "user"),
            Profile => concatcp!(API_BASE_PATH, "profile"),
            ProfileHistory => concatcp!(API_BASE_PATH, "profile/history"),
            Exercise => concatcp!(API_BASE_PATH, "exercises"),
            Program => concatcp!(API_BASE_PATH, "programs"),
            ProgramExercises => concatcp!(API_BASE_PATH, "programs/:id/exercises"),
            TrainingSession => concatcp!(API_BASE_PATH, "workouts/sessions"),
            WorkoutLog => concatcp!(API_BASE_PATH, "workouts/logs"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Analytics {
    Weight,
    Bmi,
    Exercise,
}

impl Analytics {
    pub const fn path(&self) -> &str {
        use Analytics::*;
        match self {
            Weight => concatcp!(API_BASE_PATH, "analytics/weight"),
            Bmi => concatcp!(API_BASE_PATH, "analytics/bmi"),
            Exercise => concatcp!(API_BASE_PATH, "analytics/exercise/:id"),
        }
    }
}
