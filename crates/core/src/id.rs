//! Opaque record identifiers.
//!
//! Every id crosses the wire as a string. Generated ids are UUIDv7 in
//! hyphenated lowercase form; caller-supplied ids (products) may be any
//! non-blank string. Domain crates wrap `Id` in their own newtypes so the id
//! spaces of different collections cannot be mixed up.

use core::str::FromStr;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

/// Opaque identifier with a defined string encoding.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Id(String);

impl Id {
    /// Generate a fresh identifier.
    ///
    /// Uses UUIDv7 (time-ordered), so generated ids also sort by creation time.
    pub fn generate() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    /// Parse a caller-supplied identifier. Surrounding whitespace is dropped;
    /// blank input is rejected.
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(DomainError::invalid_id("identifier cannot be blank"));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl core::fmt::Display for Id {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Id {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Id {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Id> for String {
    fn from(value: Id) -> Self {
        value.0
    }
}

/// Declare a collection-specific identifier newtype over [`Id`].
///
/// ```ignore
/// stockyard_core::id_newtype!(ProductId, "ProductId");
/// ```
#[macro_export]
macro_rules! id_newtype {
    ($(#[$meta:meta])* $t:ident, $name:literal) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord,
            ::serde::Serialize, ::serde::Deserialize,
        )]
        #[serde(transparent)]
        pub struct $t(pub $crate::Id);

        impl $t {
            pub fn new(id: $crate::Id) -> Self {
                Self(id)
            }

            /// Generate a fresh identifier.
            pub fn generate() -> Self {
                Self($crate::Id::generate())
            }

            pub fn as_str(&self) -> &str {
                self.0.as_str()
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                core::fmt::Display::fmt(&self.0, f)
            }
        }

        impl core::str::FromStr for $t {
            type Err = $crate::DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let id = $crate::Id::parse(s).map_err(|e| match e {
                    $crate::DomainError::InvalidId(msg) => {
                        $crate::DomainError::invalid_id(format!("{}: {}", $name, msg))
                    }
                    other => other,
                })?;
                Ok(Self(id))
            }
        }

        impl From<$crate::Id> for $t {
            fn from(value: $crate::Id) -> Self {
                Self(value)
            }
        }
    };
}
