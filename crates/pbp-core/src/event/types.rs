//! Closed vocabularies for play-by-play actions.
//!
//! Source feeds name actions with short lowercase tokens (`2pt`, `freethrow`,
//! `foulon`, ...). The loading collaborator maps league-specific names onto
//! these tokens; anything outside the catalog is rejected at parse time.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The primary classification of a raw play-by-play record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ActionType {
    /// Two-point field goal attempt.
    TwoPoint,
    /// Three-point field goal attempt.
    ThreePoint,
    FreeThrow,
    Rebound,
    Turnover,
    /// The defender's half of a turnover.
    Steal,
    /// The passer's half of a made shot.
    Assist,
    /// The blocker's half of a missed shot.
    Block,
    /// Shooter-side marker that a shot was blocked. Never survives correlation.
    Blocked,
    Foul,
    /// The fouled player's half of a foul.
    FoulOn,
    Substitution,
    StartOfPeriod,
    EndOfPeriod,
    JumpBall,
    Timeout,
}

/// Leading text of every [`UnknownActionType`] message.
pub const UNKNOWN_ACTION_TYPE_PREFIX: &str = "unknown action type";

/// Leading text of every [`UnknownSubType`] message.
pub const UNKNOWN_SUB_TYPE_PREFIX: &str = "unknown sub type";

/// Error returned when parsing an unknown action type string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownActionType {
    /// The unrecognised input string.
    pub raw: String,
}

impl fmt::Display for UnknownActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{UNKNOWN_ACTION_TYPE_PREFIX} '{}': expected one of 2pt, 3pt, freethrow, rebound, \
             turnover, steal, assist, block, blocked, foul, foulon, substitution, \
             startperiod, endperiod, jumpball, timeout",
            self.raw
        )
    }
}

impl std::error::Error for UnknownActionType {}

impl ActionType {
    /// All known action types in catalog order.
    pub const ALL: [Self; 16] = [
        Self::TwoPoint,
        Self::ThreePoint,
        Self::FreeThrow,
        Self::Rebound,
        Self::Turnover,
        Self::Steal,
        Self::Assist,
        Self::Block,
        Self::Blocked,
        Self::Foul,
        Self::FoulOn,
        Self::Substitution,
        Self::StartOfPeriod,
        Self::EndOfPeriod,
        Self::JumpBall,
        Self::Timeout,
    ];

    /// Return the canonical feed token.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TwoPoint => "2pt",
            Self::ThreePoint => "3pt",
            Self::FreeThrow => "freethrow",
            Self::Rebound => "rebound",
            Self::Turnover => "turnover",
            Self::Steal => "steal",
            Self::Assist => "assist",
            Self::Block => "block",
            Self::Blocked => "blocked",
            Self::Foul => "foul",
            Self::FoulOn => "foulon",
            Self::Substitution => "substitution",
            Self::StartOfPeriod => "startperiod",
            Self::EndOfPeriod => "endperiod",
            Self::JumpBall => "jumpball",
            Self::Timeout => "timeout",
        }
    }

    /// Two- or three-point attempt.
    #[must_use]
    pub const fn is_field_goal(self) -> bool {
        matches!(self, Self::TwoPoint | Self::ThreePoint)
    }

    /// Any scoring attempt, free throws included.
    #[must_use]
    pub const fn is_shot(self) -> bool {
        matches!(self, Self::TwoPoint | Self::ThreePoint | Self::FreeThrow)
    }

    /// Points awarded when an attempt of this type is made.
    #[must_use]
    pub const fn points(self) -> u8 {
        match self {
            Self::TwoPoint => 2,
            Self::ThreePoint => 3,
            Self::FreeThrow => 1,
            _ => 0,
        }
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActionType {
    type Err = UnknownActionType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|action| action.as_str() == s)
            .ok_or_else(|| UnknownActionType { raw: s.to_string() })
    }
}

impl Serialize for ActionType {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ActionType {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_str(&s).map_err(serde::de::Error::custom)
    }
}

/// Refinement of an [`ActionType`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SubType {
    /// Offensive rebound.
    Offensive,
    /// Defensive rebound.
    Defensive,
    /// Player entering the game.
    In,
    /// Player leaving the game.
    Out,
    Personal,
    Shooting,
    OffensiveFoul,
    Technical,
    Unsportsmanlike,
    Disqualifying,
}

/// Error returned when parsing an unknown sub type string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownSubType {
    pub raw: String,
}

impl fmt::Display for UnknownSubType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{UNKNOWN_SUB_TYPE_PREFIX} '{}'", self.raw)
    }
}

impl std::error::Error for UnknownSubType {}

impl SubType {
    pub const ALL: [Self; 10] = [
        Self::Offensive,
        Self::Defensive,
        Self::In,
        Self::Out,
        Self::Personal,
        Self::Shooting,
        Self::OffensiveFoul,
        Self::Technical,
        Self::Unsportsmanlike,
        Self::Disqualifying,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Offensive => "offensive",
            Self::Defensive => "defensive",
            Self::In => "in",
            Self::Out => "out",
            Self::Personal => "personal",
            Self::Shooting => "shooting",
            Self::OffensiveFoul => "offensive_foul",
            Self::Technical => "technical",
            Self::Unsportsmanlike => "unsportsmanlike",
            Self::Disqualifying => "disqualifying",
        }
    }

    /// Direction of a substitution sub type, `None` for everything else.
    #[must_use]
    pub const fn substitution_direction(self) -> Option<SubstitutionDirection> {
        match self {
            Self::In => Some(SubstitutionDirection::In),
            Self::Out => Some(SubstitutionDirection::Out),
            _ => None,
        }
    }
}

impl fmt::Display for SubType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SubType {
    type Err = UnknownSubType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|sub| sub.as_str() == s)
            .ok_or_else(|| UnknownSubType { raw: s.to_string() })
    }
}

impl Serialize for SubType {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for SubType {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_str(&s).map_err(serde::de::Error::custom)
    }
}

/// Which half of a substitution a raw record describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubstitutionDirection {
    In,
    Out,
}

impl SubstitutionDirection {
    /// The direction of the record that completes this one.
    #[must_use]
    pub const fn counterpart(self) -> Self {
        match self {
            Self::In => Self::Out,
            Self::Out => Self::In,
        }
    }
}

impl fmt::Display for SubstitutionDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::In => "in",
            Self::Out => "out",
        })
    }
}
