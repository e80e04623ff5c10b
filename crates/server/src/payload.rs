use axum::extract::FromRequest;
use shared::api::error::{Nothing, ServerError};

/// JSON request body whose rejections are reported like every other error
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ServerError<Nothing>))]
pub struct Payload<T>(pub T);
