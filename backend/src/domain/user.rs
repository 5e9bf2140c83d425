//! User data model.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Validation errors returned by the user constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    /// The identifier string was empty.
    EmptyId,
    /// The identifier string was not a UUID.
    InvalidId,
    /// The email address was empty.
    EmptyEmail,
    /// The email address is structurally invalid.
    InvalidEmail,
    /// The display name was empty.
    EmptyDisplayName,
    /// The display name was shorter than the minimum.
    DisplayNameTooShort {
        /// Minimum accepted length.
        min: usize,
    },
    /// The display name was longer than the maximum.
    DisplayNameTooLong {
        /// Maximum accepted length.
        max: usize,
    },
    /// The display name contained a disallowed character.
    DisplayNameInvalidCharacters,
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyId => write!(f, "user id must not be empty"),
            Self::InvalidId => write!(f, "user id must be a valid UUID"),
            Self::EmptyEmail => write!(f, "email must not be empty"),
            Self::InvalidEmail => write!(f, "email must be a valid address"),
            Self::EmptyDisplayName => write!(f, "display name must not be empty"),
            Self::DisplayNameTooShort { min } => {
                write!(f, "display name must be at least {min} characters")
            }
            Self::DisplayNameTooLong { max } => {
                write!(f, "display name must be at most {max} characters")
            }
            Self::DisplayNameInvalidCharacters => write!(
                f,
                "display name may only contain letters, numbers, spaces, or underscores",
            ),
        }
    }
}

impl std::error::Error for UserValidationError {}

/// Stable user identifier stored as a UUID.
///
/// Keeps both the parsed UUID and the original string so serialisation
/// round-trips exactly what clients sent.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(Uuid, String);

impl UserId {
    /// Validate and construct a [`UserId`] from borrowed input.
    pub fn new(id: impl AsRef<str>) -> Result<Self, UserValidationError> {
        Self::from_owned(id.as_ref().to_owned())
    }

    /// Generate a new random [`UserId`].
    pub fn random() -> Self {
        let uuid = Uuid::new_v4();
        Self(uuid, uuid.to_string())
    }

    fn from_owned(id: String) -> Result<Self, UserValidationError> {
        if id.is_empty() {
            return Err(UserValidationError::EmptyId);
        }
        if id.trim() != id {
            return Err(UserValidationError::InvalidId);
        }

        let parsed = Uuid::parse_str(&id).map_err(|_| UserValidationError::InvalidId)?;
        Ok(Self(parsed, id))
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        self.1.as_str()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        let UserId(_, raw) = value;
        raw
    }
}

impl From<Uuid> for UserId {
    fn from(value: Uuid) -> Self {
        Self(value, value.to_string())
    }
}

impl TryFrom<String> for UserId {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

/// Normalised email address used as the login identifier.
///
/// Validation is structural only (one `@`, non-empty local part, a domain
/// with a dot, no whitespace); deliverability is the mail system's problem.
/// Addresses are lowercased so lookups are case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    /// Validate and construct an [`Email`] from borrowed input.
    pub fn new(address: impl AsRef<str>) -> Result<Self, UserValidationError> {
        Self::from_owned(address.as_ref().to_owned())
    }

    fn from_owned(address: String) -> Result<Self, UserValidationError> {
        if address.is_empty() {
            return Err(UserValidationError::EmptyEmail);
        }
        if address.chars().any(char::is_whitespace) {
            return Err(UserValidationError::InvalidEmail);
        }
        let mut parts = address.splitn(2, '@');
        let local = parts.next().unwrap_or_default();
        let domain = parts.next().unwrap_or_default();
        if local.is_empty() || domain.is_empty() || domain.contains('@') {
            return Err(UserValidationError::InvalidEmail);
        }
        if !domain.contains('.') || domain.starts_with('.') || domain.ends_with('.') {
            return Err(UserValidationError::InvalidEmail);
        }
        Ok(Self(address.to_lowercase()))
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.as_str())
    }
}

impl From<Email> for String {
    fn from(value: Email) -> Self {
        value.0
    }
}

impl TryFrom<String> for Email {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

/// Minimum allowed length for a display name.
pub const DISPLAY_NAME_MIN: usize = 3;
/// Maximum allowed length for a display name.
pub const DISPLAY_NAME_MAX: usize = 32;

/// Human readable display name for the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DisplayName(String);

impl DisplayName {
    /// Validate and construct a [`DisplayName`] from borrowed input.
    pub fn new(name: impl AsRef<str>) -> Result<Self, UserValidationError> {
        Self::from_owned(name.as_ref().to_owned())
    }

    fn from_owned(name: String) -> Result<Self, UserValidationError> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyDisplayName);
        }
        let length = trimmed.chars().count();
        if length < DISPLAY_NAME_MIN {
            return Err(UserValidationError::DisplayNameTooShort {
                min: DISPLAY_NAME_MIN,
            });
        }
        if length > DISPLAY_NAME_MAX {
            return Err(UserValidationError::DisplayNameTooLong {
                max: DISPLAY_NAME_MAX,
            });
        }
        let allowed = trimmed
            .chars()
            .all(|c| c.is_alphanumeric() || c == ' ' || c == '_');
        if !allowed {
            return Err(UserValidationError::DisplayNameInvalidCharacters);
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for DisplayName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for DisplayName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.as_str())
    }
}

impl From<DisplayName> for String {
    fn from(value: DisplayName) -> Self {
        value.0
    }
}

impl TryFrom<String> for DisplayName {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

/// Registered user account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[schema(value_type = String, example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    id: UserId,
    #[schema(value_type = String, example = "ada@example.com")]
    email: Email,
    #[schema(value_type = String, example = "Ada Lovelace")]
    display_name: DisplayName,
    created_at: DateTime<Utc>,
}

impl User {
    /// Construct a user from already-validated parts.
    pub fn new(id: UserId, email: Email, display_name: DisplayName, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            email,
            display_name,
            created_at,
        }
    }

    /// Validate raw strings and construct a user created now.
    pub fn try_from_strings(
        id: &str,
        email: &str,
        display_name: &str,
    ) -> Result<Self, UserValidationError> {
        Ok(Self {
            id: UserId::new(id)?,
            email: Email::new(email)?,
            display_name: DisplayName::new(display_name)?,
            created_at: Utc::now(),
        })
    }

    /// Stable identifier.
    pub fn id(&self) -> &UserId {
        &self.id
    }

    /// Login email address.
    pub fn email(&self) -> &Email {
        &self.email
    }

    /// Public display name.
    pub fn display_name(&self) -> &DisplayName {
        &self.display_name
    }

    /// Account creation time.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

#[cfg(test)]
mod tests {
    //! Validation coverage for user primitives.
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("ada@example.com", true)]
    #[case("ADA@Example.COM", true)]
    #[case("", false)]
    #[case("no-at-sign", false)]
    #[case("@example.com", false)]
    #[case("ada@", false)]
    #[case("ada@nodot", false)]
    #[case("ada@.example", false)]
    #[case("ada @example.com", false)]
    fn email_validation(#[case] raw: &str, #[case] ok: bool) {
        assert_eq!(Email::new(raw).is_ok(), ok, "address: {raw:?}");
    }

    #[rstest]
    fn email_is_lowercased() {
        let email = Email::new("Ada@Example.COM").expect("valid email");
        assert_eq!(email.as_ref(), "ada@example.com");
    }

    #[rstest]
    #[case("Ada Lovelace", true)]
    #[case("ada_l", true)]
    #[case("ab", false)]
    #[case("", false)]
    #[case("a-very-long-name-that-greatly-exceeds-the-cap", false)]
    #[case("ada!", false)]
    fn display_name_validation(#[case] raw: &str, #[case] ok: bool) {
        assert_eq!(DisplayName::new(raw).is_ok(), ok, "name: {raw:?}");
    }

    #[rstest]
    fn user_id_rejects_non_uuid_input() {
        assert_eq!(UserId::new("not-a-uuid"), Err(UserValidationError::InvalidId));
        assert_eq!(UserId::new(""), Err(UserValidationError::EmptyId));
        assert_eq!(
            UserId::new(" 3fa85f64-5717-4562-b3fc-2c963f66afa6"),
            Err(UserValidationError::InvalidId)
        );
    }

    #[rstest]
    fn user_serialises_camel_case() {
        let user = User::try_from_strings(
            "3fa85f64-5717-4562-b3fc-2c963f66afa6",
            "ada@example.com",
            "Ada Lovelace",
        )
        .expect("valid user");
        let value = serde_json::to_value(&user).expect("serialise");
        assert_eq!(value["id"], "3fa85f64-5717-4562-b3fc-2c963f66afa6");
        assert_eq!(value["email"], "ada@example.com");
        assert_eq!(value["displayName"], "Ada Lovelace");
        assert!(value.get("createdAt").is_some());
    }
}
