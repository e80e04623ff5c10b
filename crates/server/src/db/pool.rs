use deadpool_sqlite::{Config, Hook, HookError, Pool, Runtime};
use shared::{
    api::error::{Nothing, ServerError},
    other_error,
};

use super::configure_new_connection;

/// Pool whose connections get the same pragmas and tracing as the migration
/// connection
pub fn create_pool(connection_string: &str) -> Result<Pool, ServerError<Nothing>> {
    Config::new(connection_string)
        .builder(Runtime::Tokio1)
        .map_err(|e| other_error!("Pool config: {}", e))?
        .post_create(Hook::async_fn(|object, _| {
            Box::pin(async move {
                object
                    .interact(configure_new_connection)
                    .await
                    .map_err(|e| HookError::Message(e.to_string()))?
                    .map_err(|e| HookError::Message(e.to_string()))?;
                Ok(())
            })
        }))
        .build()
        .map_err(|e| other_error!("Pool build: {}", e))
}
