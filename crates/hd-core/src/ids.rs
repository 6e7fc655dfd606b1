//! Identifier types.
//!
//! `ItineraryId` is a zero-cost index into a run's itinerary storage.
//! `UserId` is the stable, human-readable customer key (`casual-001`) that
//! also appears in snapshots and booking results.

use std::fmt;
use std::str::FromStr;

use crate::HdError;

/// Generate a typed ID wrapper around a primitive integer.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub $inner);

        impl $name {
            /// Cast to `usize` for direct use as a `Vec` index.
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl TryFrom<usize> for $name {
            type Error = std::num::TryFromIntError;
            fn try_from(n: usize) -> Result<$name, Self::Error> {
                <$inner>::try_from(n).map($name)
            }
        }
    };
}

typed_id! {
    /// Position of an itinerary in `SimulationRun` storage.  Runs keep
    /// itineraries sorted by `(UserId, trip_id)`, so ascending `ItineraryId`
    /// is ascending user id.
    pub struct ItineraryId(u32);
}

// ── PersonaKind ───────────────────────────────────────────────────────────────

/// The customer archetype a user was generated from.
///
/// Variant order matches the lexical order of the labels so that `UserId`
/// sorts the same way its string form does.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum PersonaKind {
    Business,
    Casual,
}

impl PersonaKind {
    pub fn as_str(self) -> &'static str {
        match self {
            PersonaKind::Business => "business",
            PersonaKind::Casual => "casual",
        }
    }
}

impl fmt::Display for PersonaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PersonaKind {
    type Err = HdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "business" => Ok(PersonaKind::Business),
            "casual" => Ok(PersonaKind::Casual),
            other => Err(HdError::Parse(format!(
                "unknown persona {other:?}: expected \"casual\" or \"business\""
            ))),
        }
    }
}

// ── UserId ────────────────────────────────────────────────────────────────────

/// Stable customer identifier: persona plus a 1-based running index within
/// that persona.  Renders as `casual-001`; indices above 999 simply grow
/// wider.  Only the rendered form parses, so `casual-1` is rejected.
///
/// Ordering is `(persona, index)` with the index compared numerically, so
/// `casual-999 < casual-1000` even though the labels sort the other way.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub struct UserId {
    pub persona: PersonaKind,
    pub index: u32,
}

impl UserId {
    pub fn new(persona: PersonaKind, index: u32) -> Self {
        Self { persona, index }
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{:03}", self.persona, self.index)
    }
}

impl FromStr for UserId {
    type Err = HdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (persona, index) = s
            .split_once('-')
            .ok_or_else(|| HdError::Parse(format!("invalid user id {s:?}: missing '-'")))?;
        let persona = persona.parse::<PersonaKind>()?;
        let index = index
            .parse::<u32>()
            .map_err(|_| HdError::Parse(format!("invalid user id {s:?}: bad index")))?;
        let id = UserId { persona, index };
        if id.to_string() != s {
            return Err(HdError::Parse(format!("invalid user id {s:?}: expected {id}")));
        }
        Ok(id)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for UserId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for UserId {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = <String as serde::Deserialize>::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
