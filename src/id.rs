//! Identifier types.
//!
//! Stats, derived stats and abilities are named by interned strings
//! (`Arc<str>`): cheap to clone into expression trees and cheap to compare.
//! Nothing here knows about concrete names like "STR" or "HP".

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::sync::Arc;

macro_rules! interned_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Hash, PartialEq, Eq, PartialOrd, Ord)]
        pub struct $name(Arc<str>);

        impl $name {
            /// Create a new identifier from a string slice.
            pub fn new(s: &str) -> Self {
                Self(Arc::from(s))
            }

            /// The string form of this identifier.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self::new(s)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(Arc::from(s))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(&self.0)
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                String::deserialize(deserializer).map(Self::from)
            }
        }
    };
}

interned_id! {
    /// Identifier of a core stat (strength, dexterity, ...).
    ///
    /// ```rust
    /// use zzformula::StatId;
    ///
    /// let str_id = StatId::new("STR");
    /// let same: StatId = "STR".into();
    /// assert_eq!(str_id, same);
    /// assert_eq!(str_id.as_str(), "STR");
    /// ```
    StatId
}

interned_id! {
    /// Identifier of a derived stat definition (max HP, crit chance, ...).
    DerivedStatId
}

interned_id! {
    /// Identifier of an ability.
    AbilityId
}
