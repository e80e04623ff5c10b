use serde::{Deserialize, Serialize};

use crate::{
    api::error::ValidationError,
    model::{
        constants::{USERNAME_MAX_LENGTH, USERNAME_MIN_LENGTH},
        ValidateModel,
    },
};

/// Payload for creating a user record. Credentials are handled upstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewUser {
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
}

impl NewUser {
    pub fn new<T: Into<String>>(username: T) -> Self {
        Self {
            username: username.into(),
            email: None,
        }
    }
}

impl ValidateModel for NewUser {
    fn validate(&self) -> Result<(), ValidationError> {
        let mut e = ValidationError::new();
        let len = self.username.chars().count();
        if !(USERNAME_MIN_LENGTH..=USERNAME_MAX_LENGTH).contains(&len) {
            e.add_field(
                "username",
                format!(
                    "Username needs to be between {USERNAME_MIN_LENGTH} and {USERNAME_MAX_LENGTH} characters long"
                ),
            );
        }
        if !self
            .username
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "@.+-_".contains(c))
        {
            e.add_field("username", "Letters, digits and @/./+/-/_ only");
        }
        if let Some(email) = &self.email {
            if !email.contains('@') {
                e.add_field("email", "Enter a valid email address");
            }
        }
        e.into_result()
    }
}
