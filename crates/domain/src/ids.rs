//! Identifier newtypes for the directory entities the permission model
//! references. The directory records themselves (users, organisations,
//! services) live outside this crate; only their identities matter here.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! uuid_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        pub struct $name(Uuid);

        impl $name {
            /// Creates a new random identifier.
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Creates an identifier from an existing UUID value.
            #[must_use]
            pub fn from_uuid(value: Uuid) -> Self {
                Self(value)
            }

            /// Returns the underlying UUID value.
            #[must_use]
            pub fn as_uuid(&self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(formatter, "{}", self.0)
            }
        }
    };
}

uuid_id! {
    /// Unique identifier for a user record.
    UserId
}

uuid_id! {
    /// Unique identifier for an organisation in the directory.
    OrganisationId
}

uuid_id! {
    /// Unique identifier for a service in the directory.
    ServiceId
}

#[cfg(test)]
mod tests {
    use super::{OrganisationId, ServiceId, UserId};

    #[test]
    fn ids_format_as_uuid() {
        assert_eq!(UserId::new().to_string().len(), 36);
        assert_eq!(OrganisationId::new().to_string().len(), 36);
        assert_eq!(ServiceId::new().to_string().len(), 36);
    }

    #[test]
    fn distinct_ids_are_not_equal() {
        assert_ne!(UserId::new(), UserId::new());
    }
}
