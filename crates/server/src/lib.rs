pub mod cli;

pub mod db;

mod errors;
pub use errors::*;

mod payload;
pub use payload::*;

mod record_id;
pub use record_id::*;

mod state;
pub use state::*;

mod user_state;
pub use user_state::*;

pub mod routes;
