use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::UserId;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CredentialsError {
    #[error("email is required")]
    EmptyEmail,

    #[error("email address is not valid")]
    InvalidEmail,

    #[error("password is required")]
    EmptyPassword,

    #[error("password must be at least {min} characters")]
    PasswordTooShort { min: usize },

    #[error("name is required")]
    EmptyName,
}

pub const MIN_PASSWORD_LEN: usize = 6;

/// Signed-in user. Persisted verbatim as the `userData` entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    email: String,
    password: String,
}

impl Credentials {
    /// # Errors
    ///
    /// Returns `CredentialsError` when either field is missing or the email
    /// is malformed.
    pub fn new(email: &str, password: &str) -> Result<Self, CredentialsError> {
        let email = validate_email(email)?;
        if password.is_empty() {
            return Err(CredentialsError::EmptyPassword);
        }
        Ok(Self {
            email,
            password: password.to_owned(),
        })
    }

    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    #[must_use]
    pub fn password(&self) -> &str {
        &self.password
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct Registration {
    name: String,
    email: String,
    password: String,
}

impl Registration {
    /// # Errors
    ///
    /// Returns `CredentialsError` for a blank name, malformed email, or a
    /// password shorter than `MIN_PASSWORD_LEN`.
    pub fn new(name: &str, email: &str, password: &str) -> Result<Self, CredentialsError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CredentialsError::EmptyName);
        }
        let email = validate_email(email)?;
        if password.is_empty() {
            return Err(CredentialsError::EmptyPassword);
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(CredentialsError::PasswordTooShort {
                min: MIN_PASSWORD_LEN,
            });
        }
        Ok(Self {
            name: name.to_owned(),
            email,
            password: password.to_owned(),
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    #[must_use]
    pub fn password(&self) -> &str {
        &self.password
    }
}

impl std::fmt::Debug for Registration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registration")
            .field("name", &self.name)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

fn validate_email(raw: &str) -> Result<String, CredentialsError> {
    let email = raw.trim();
    if email.is_empty() {
        return Err(CredentialsError::EmptyEmail);
    }
    let Some((local, domain)) = email.split_once('@') else {
        return Err(CredentialsError::InvalidEmail);
    };
    if local.is_empty() || !domain.contains('.') || domain.starts_with('.') || domain.ends_with('.')
    {
        return Err(CredentialsError::InvalidEmail);
    }
    Ok(email.to_ascii_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credentials_normalize_email() {
        let creds = Credentials::new("  Ada@Example.COM ", "secret").unwrap();
        assert_eq!(creds.email(), "ada@example.com");
    }

    #[test]
    fn credentials_reject_missing_fields() {
        assert_eq!(
            Credentials::new("", "x").unwrap_err(),
            CredentialsError::EmptyEmail
        );
        assert_eq!(
            Credentials::new("a@b.io", "").unwrap_err(),
            CredentialsError::EmptyPassword
        );
        assert_eq!(
            Credentials::new("not-an-email", "x").unwrap_err(),
            CredentialsError::InvalidEmail
        );
    }

    #[test]
    fn registration_requires_min_password_length() {
        assert_eq!(
            Registration::new("Ada", "ada@example.com", "123").unwrap_err(),
            CredentialsError::PasswordTooShort { min: 6 }
        );
        assert_eq!(
            Registration::new(" ", "ada@example.com", "123456").unwrap_err(),
            CredentialsError::EmptyName
        );
        assert!(Registration::new("Ada", "ada@example.com", "123456").is_ok());
    }

    #[test]
    fn debug_output_hides_password() {
        let creds = Credentials::new("ada@example.com", "hunter22").unwrap();
        assert!(!format!("{creds:?}").contains("hunter22"));
    }
}
