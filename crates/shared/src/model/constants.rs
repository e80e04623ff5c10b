pub const USERNAME_MIN_LENGTH: usize = 4;
pub const USERNAME_MAX_LENGTH: usize = 15;

pub const LOCATION_MAX_LENGTH: usize = 30;

pub const EXERCISE_NAME_MAX_LENGTH: usize = 100;
pub const PROGRAM_NAME_MAX_LENGTH: usize = 100;

/// Workout log weights are stored with two decimal places, five digits total
pub const WORKOUT_WEIGHT_MAX_KG: f64 = 999.99;

pub const PROGRAM_EXERCISE_DEFAULT_SETS: u16 = 3;
pub const PROGRAM_EXERCISE_DEFAULT_REPS: u16 = 10;
