//! Login and registration input shapes.
//!
//! These types validate untrusted credential input before any port is
//! consulted, so handlers can reject bad payloads without touching
//! persistence.

use crate::domain::user::{DisplayName, Email, UserValidationError};

/// Minimum accepted password length for new accounts.
pub const PASSWORD_MIN: usize = 8;

/// Validation errors for credential payloads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialValidationError {
    /// The email field failed validation.
    Email(UserValidationError),
    /// The password field was empty.
    EmptyPassword,
    /// The password was shorter than [`PASSWORD_MIN`].
    PasswordTooShort {
        /// Minimum accepted length.
        min: usize,
    },
    /// The display name field failed validation.
    DisplayName(UserValidationError),
}

impl std::fmt::Display for CredentialValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Email(err) => write!(f, "{err}"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
            Self::PasswordTooShort { min } => {
                write!(f, "password must be at least {min} characters")
            }
            Self::DisplayName(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for CredentialValidationError {}

/// Validated login credentials.
///
/// Holds the plaintext password only for the duration of the request that
/// carried it; nothing here is persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: Email,
    password: String,
}

impl LoginCredentials {
    /// Validate raw parts into credentials.
    ///
    /// Login accepts any non-empty password: length rules apply when an
    /// account is created, not when one is used.
    pub fn try_from_parts(
        email: &str,
        password: &str,
    ) -> Result<Self, CredentialValidationError> {
        let email = Email::new(email).map_err(CredentialValidationError::Email)?;
        if password.is_empty() {
            return Err(CredentialValidationError::EmptyPassword);
        }
        Ok(Self {
            email,
            password: password.to_owned(),
        })
    }

    /// The normalised login email.
    pub fn email(&self) -> &Email {
        &self.email
    }

    /// The plaintext password as submitted.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Validated registration payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    email: Email,
    display_name: DisplayName,
    password: String,
}

impl Registration {
    /// Validate raw parts into a registration request.
    pub fn try_from_parts(
        email: &str,
        display_name: &str,
        password: &str,
    ) -> Result<Self, CredentialValidationError> {
        let email = Email::new(email).map_err(CredentialValidationError::Email)?;
        let display_name =
            DisplayName::new(display_name).map_err(CredentialValidationError::DisplayName)?;
        if password.is_empty() {
            return Err(CredentialValidationError::EmptyPassword);
        }
        if password.chars().count() < PASSWORD_MIN {
            return Err(CredentialValidationError::PasswordTooShort { min: PASSWORD_MIN });
        }
        Ok(Self {
            email,
            display_name,
            password: password.to_owned(),
        })
    }

    /// The normalised email for the new account.
    pub fn email(&self) -> &Email {
        &self.email
    }

    /// The display name for the new account.
    pub fn display_name(&self) -> &DisplayName {
        &self.display_name
    }

    /// The plaintext password to hash.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

#[cfg(test)]
mod tests {
    //! Validation coverage for credential payloads.
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn login_accepts_short_passwords() {
        let creds = LoginCredentials::try_from_parts("ada@example.com", "pw");
        assert!(creds.is_ok());
    }

    #[rstest]
    fn login_rejects_empty_password() {
        let result = LoginCredentials::try_from_parts("ada@example.com", "");
        assert_eq!(result, Err(CredentialValidationError::EmptyPassword));
    }

    #[rstest]
    fn login_rejects_invalid_email() {
        let result = LoginCredentials::try_from_parts("not-an-email", "password");
        assert!(matches!(result, Err(CredentialValidationError::Email(_))));
    }

    #[rstest]
    fn registration_enforces_password_minimum() {
        let result = Registration::try_from_parts("ada@example.com", "Ada Lovelace", "short");
        assert_eq!(
            result,
            Err(CredentialValidationError::PasswordTooShort { min: PASSWORD_MIN })
        );
    }

    #[rstest]
    fn registration_validates_display_name() {
        let result = Registration::try_from_parts("ada@example.com", "!", "long enough pw");
        assert!(matches!(
            result,
            Err(CredentialValidationError::DisplayName(_))
        ));
    }

    #[rstest]
    fn registration_normalises_email() {
        let registration =
            Registration::try_from_parts("Ada@Example.com", "Ada Lovelace", "long enough pw")
                .expect("valid registration");
        assert_eq!(registration.email().as_ref(), "ada@example.com");
    }
}
