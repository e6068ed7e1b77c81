//! User identities and caller capabilities.
//!
//! Users are a small fixed registry rather than persisted records. The active
//! identity is chosen by the client without credentials; the HTTP adapter
//! keeps it in the session cookie and hands a [`Caller`] to the services.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::Error;

const USER_ID_MAX: usize = 32;

/// Validation errors returned by [`UserId::new`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserValidationError {
    #[error("user id must not be empty")]
    EmptyId,
    #[error("user id must be at most {max} characters")]
    IdTooLong { max: usize },
    #[error("user id may only contain lowercase letters, digits, '-' or '_'")]
    InvalidIdCharacters,
    #[error("unknown user id: {0}")]
    UnknownUser(String),
}

/// Stable user identifier, a short lowercase slug such as `minju`.
///
/// Visits store it as plain text; legacy visits may carry ids that no
/// longer appear in the registry, so the type only validates shape.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(String);

impl UserId {
    /// Validate and construct a [`UserId`].
    ///
    /// # Examples
    /// ```
    /// use lunchlog::domain::UserId;
    ///
    /// assert!(UserId::new("minju").is_ok());
    /// assert!(UserId::new("Min Ju").is_err());
    /// ```
    pub fn new(id: impl Into<String>) -> Result<Self, UserValidationError> {
        let id = id.into();
        if id.is_empty() {
            return Err(UserValidationError::EmptyId);
        }
        if id.chars().count() > USER_ID_MAX {
            return Err(UserValidationError::IdTooLong { max: USER_ID_MAX });
        }
        let valid = id
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_');
        if !valid {
            return Err(UserValidationError::InvalidIdCharacters);
        }
        Ok(Self(id))
    }

    fn from_static(id: &'static str) -> Self {
        Self(id.to_owned())
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for UserId {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        value.0
    }
}

/// What a user may do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Access {
    /// May browse and mutate.
    Full,
    /// May browse only.
    Readonly,
}

/// Registry entry for a known user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    id: UserId,
    display_name: String,
    access: Access,
}

impl User {
    /// Stable identifier.
    pub fn id(&self) -> &UserId {
        &self.id
    }

    /// Name shown in the client.
    pub fn display_name(&self) -> &str {
        self.display_name.as_str()
    }

    /// Access level of this user.
    pub fn access(&self) -> Access {
        self.access
    }

    /// Whether this user may create, modify or delete records.
    pub fn can_write(&self) -> bool {
        matches!(self.access, Access::Full)
    }
}

struct RegistryEntry {
    id: &'static str,
    display_name: &'static str,
    access: Access,
}

const GUEST_ID: &str = "guest";

const REGISTRY: [RegistryEntry; 4] = [
    RegistryEntry {
        id: "minju",
        display_name: "민주",
        access: Access::Full,
    },
    RegistryEntry {
        id: "chulsoo",
        display_name: "철수",
        access: Access::Full,
    },
    RegistryEntry {
        id: "younghee",
        display_name: "영희",
        access: Access::Full,
    },
    RegistryEntry {
        id: GUEST_ID,
        display_name: "Guest",
        access: Access::Readonly,
    },
];

impl RegistryEntry {
    fn to_user(&self) -> User {
        User {
            id: UserId::from_static(self.id),
            display_name: self.display_name.to_owned(),
            access: self.access,
        }
    }
}

/// The fixed set of identities a client may switch between.
#[derive(Debug, Default, Clone, Copy)]
pub struct UserRegistry;

impl UserRegistry {
    /// All known users in display order.
    pub fn all(&self) -> Vec<User> {
        REGISTRY.iter().map(RegistryEntry::to_user).collect()
    }

    /// Look up a user by id.
    pub fn find(&self, id: &UserId) -> Option<User> {
        REGISTRY
            .iter()
            .find(|entry| entry.id == id.as_ref())
            .map(RegistryEntry::to_user)
    }

    /// Resolve a user id or report it as unknown.
    pub fn resolve(&self, id: &UserId) -> Result<User, UserValidationError> {
        self.find(id)
            .ok_or_else(|| UserValidationError::UnknownUser(id.to_string()))
    }

    /// Identity used when the client has not selected one.
    pub fn default_user(&self) -> User {
        REGISTRY
            .iter()
            .find(|entry| entry.id == GUEST_ID)
            .map(RegistryEntry::to_user)
            .unwrap_or_else(|| User {
                id: UserId::from_static(GUEST_ID),
                display_name: "Guest".to_owned(),
                access: Access::Readonly,
            })
    }
}

/// The identity attached to a request, passed explicitly to every mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    user: User,
}

impl Caller {
    /// Wrap a registry user.
    pub fn new(user: User) -> Self {
        Self { user }
    }

    /// The readonly default identity.
    pub fn guest() -> Self {
        Self::new(UserRegistry.default_user())
    }

    /// The underlying user.
    pub fn user(&self) -> &User {
        &self.user
    }

    /// Shorthand for the caller's user id.
    pub fn user_id(&self) -> &UserId {
        self.user.id()
    }

    /// Whether the caller may mutate records.
    pub fn can_write(&self) -> bool {
        self.user.can_write()
    }

    /// Fail with [`Error::forbidden`] unless the caller may mutate records.
    pub fn require_write(&self) -> Result<(), Error> {
        if self.can_write() {
            Ok(())
        } else {
            Err(Error::forbidden(format!(
                "user {} is readonly",
                self.user.id()
            )))
        }
    }

    /// Whether the caller wrote a record with the given author.
    pub fn is_author_of(&self, author: Option<&UserId>) -> bool {
        author.is_some_and(|author| author == self.user_id())
    }
}
