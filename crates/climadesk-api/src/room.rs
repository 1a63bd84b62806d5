// ── Room identity ──
//
// Every room-addressed endpoint puts the room number in the URL path,
// so the identifier must be usable verbatim as a single path segment.

use std::fmt;
use std::str::FromStr;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::Error;

/// Room number as printed on the door, e.g. `"203"`.
///
/// Non-empty, at most 32 characters, no whitespace and none of `/ ? # %`.
/// The backend sometimes encodes it as a JSON number; both forms
/// deserialize to the same value.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RoomNumber(String);

impl RoomNumber {
    const MAX_LEN: usize = 32;

    pub fn new(raw: impl Into<String>) -> Result<Self, Error> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(Error::validation("room number must not be empty"));
        }
        if trimmed.len() > Self::MAX_LEN {
            return Err(Error::validation(format!(
                "room number '{trimmed}' is longer than {} characters",
                Self::MAX_LEN
            )));
        }
        if let Some(bad) = trimmed
            .chars()
            .find(|c| c.is_whitespace() || matches!(c, '/' | '?' | '#' | '%'))
        {
            return Err(Error::validation(format!(
                "room number '{trimmed}' contains illegal character {bad:?}"
            )));
        }
        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for RoomNumber {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for RoomNumber {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Serialize for RoomNumber {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for RoomNumber {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct RoomNumberVisitor;

        impl Visitor<'_> for RoomNumberVisitor {
            type Value = RoomNumber;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a room number as string or integer")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<RoomNumber, E> {
                RoomNumber::new(v).map_err(|e| E::custom(e.message()))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<RoomNumber, E> {
                self.visit_str(&v.to_string())
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<RoomNumber, E> {
                self.visit_str(&v.to_string())
            }
        }

        deserializer.deserialize_any(RoomNumberVisitor)
    }
}
