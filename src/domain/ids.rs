use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use uuid::Uuid;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident, $kind:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Generates a fresh random identifier
            pub fn generate() -> Self {
                Self(Uuid::new_v4().to_string())
            }

            /// Returns the string representation
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl FromStr for $name {
            type Err = crate::error::KanbanError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return Err(crate::error::KanbanError::BadInput(format!(
                        "empty {} id",
                        $kind
                    )));
                }
                Ok(Self(trimmed.to_string()))
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

string_id!(
    /// Identifier of an organization owning boards
    OrganizationId,
    "organization"
);
string_id!(
    /// Identifier of an authenticated user
    UserId,
    "user"
);
string_id!(
    /// Identifier of a board
    BoardId,
    "board"
);
string_id!(
    /// Identifier of a list on a board
    ListId,
    "list"
);
string_id!(
    /// Identifier of a card inside a list
    CardId,
    "card"
);
string_id!(
    /// Identifier of an image attached to a card
    ImageId,
    "image"
);
