mod user;
pub use user::*;

mod profile;
pub use profile::*;

mod exercise;
pub use exercise::*;

mod program;
pub use program::*;

mod workout;
pub use workout::*;

use crate::api::error::ValidationError;

pub mod constants;

pub trait ValidateModel {
    fn validate(&self) -> Result<(), ValidationError>;
}
