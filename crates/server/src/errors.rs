use std::error::Error;

use shared::{api::error::{Nothing, ServerError}, other_error};
use tracing::error;

/// Wraps an infrastructure failure that happened outside of a handler body
pub fn internal_error<E: Error>(err: E) -> ServerError<Nothing> {
    error!("{}", err);
    other_error!("Something went wrong: {}", err)
}
