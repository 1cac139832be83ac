//! Play-by-play event record.
//!
//! One [`EventRecord`] describes one discrete game action as reported by the
//! source feed. The loading collaborator fills the raw fields; the enrichment
//! engine fills the rest:
//!
//! - correlation outputs (`assist`, `steal`, `block`, `foul_on`,
//!   `sub_in_player_id`, `sub_out_player_id`) are set by the correlator when a
//!   split record is merged into this one,
//! - `previous_event`/`next_event` and the foul snapshots are set by the chain
//!   builder,
//! - `free_throw_ordinal` is set by the free throw sequencer.
//!
//! Links are indices into the owning `Vec<EventRecord>`; records never own
//! each other.

pub mod clock;
pub mod state;
pub mod types;

pub use clock::GameClock;
pub use state::{DEFAULT_FOULS_TO_GIVE, FoulBank, PlayerFouls};
pub use types::{ActionType, SubType, SubstitutionDirection, UnknownActionType, UnknownSubType};

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! feed_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl From<u64> for $name {
            fn from(value: u64) -> Self {
                Self(value.to_string())
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        // Feeds disagree on whether ids are strings or integers.
        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                #[derive(Deserialize)]
                #[serde(untagged)]
                enum RawId {
                    Text(String),
                    Number(u64),
                }

                Ok(match RawId::deserialize(deserializer)? {
                    RawId::Text(text) => Self(text),
                    RawId::Number(n) => Self(n.to_string()),
                })
            }
        }
    };
}

feed_id!(
    /// Team identifier as issued by the source feed.
    TeamId
);

feed_id!(
    /// Player identifier as issued by the source feed.
    PlayerId
);

/// Raw court coordinates of a shot, in feed units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShotLocation {
    pub x: f64,
    pub y: f64,
}

/// Position of a free throw within its trip to the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FreeThrowOrdinal {
    /// 1-based position in the trip.
    pub number: u16,
    /// Number of attempts in the trip.
    pub total: u16,
}

impl FreeThrowOrdinal {
    /// `true` for the final attempt of a trip.
    #[must_use]
    pub const fn is_last(self) -> bool {
        self.number == self.total
    }
}

impl fmt::Display for FreeThrowOrdinal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} of {}", self.number, self.total)
    }
}

impl Serialize for FreeThrowOrdinal {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for FreeThrowOrdinal {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        let parsed = raw.split_once(" of ").and_then(|(number, total)| {
            Some(Self {
                number: number.trim().parse().ok()?,
                total: total.trim().parse().ok()?,
            })
        });
        parsed.ok_or_else(|| serde::de::Error::custom(format!("invalid free throw ordinal '{raw}'")))
    }
}

/// A single play-by-play action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Feed identifier, unique within a game.
    pub event_id: u64,
    #[serde(default)]
    pub game_id: u64,
    /// 1-4 regulation, 5+ overtime.
    pub period: u8,
    /// Time left in the period.
    #[serde(rename = "seconds_remaining")]
    pub clock: GameClock,
    pub action_type: ActionType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_type: Option<SubType>,
    /// Whether a shot or free throw went in. Ignored for other actions.
    #[serde(default)]
    pub made: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team_id: Option<TeamId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player_id: Option<PlayerId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player_name: Option<String>,

    /// Feed-provided id of the action this one follows from. `0` means none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_action_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shot_location: Option<ShotLocation>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assist: Option<PlayerId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub steal: Option<PlayerId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block: Option<PlayerId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub foul_on: Option<PlayerId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_in_player_id: Option<PlayerId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_out_player_id: Option<PlayerId>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_event: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_event: Option<usize>,
    #[serde(default)]
    pub fouls_to_give: FoulBank,
    #[serde(default)]
    pub player_game_fouls: PlayerFouls,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub free_throw_ordinal: Option<FreeThrowOrdinal>,
}

impl EventRecord {
    /// A bare raw record; chain the `with_*` helpers to fill the actors.
    #[must_use]
    pub fn new(event_id: u64, period: u8, clock: GameClock, action_type: ActionType) -> Self {
        Self {
            event_id,
            game_id: 0,
            period,
            clock,
            action_type,
            sub_type: None,
            made: false,
            team_id: None,
            player_id: None,
            player_name: None,
            parent_action_id: None,
            shot_location: None,
            assist: None,
            steal: None,
            block: None,
            foul_on: None,
            sub_in_player_id: None,
            sub_out_player_id: None,
            previous_event: None,
            next_event: None,
            fouls_to_give: FoulBank::default(),
            player_game_fouls: PlayerFouls::default(),
            free_throw_ordinal: None,
        }
    }

    #[must_use]
    pub fn with_game(mut self, game_id: u64) -> Self {
        self.game_id = game_id;
        self
    }

    #[must_use]
    pub fn with_team(mut self, team: impl Into<TeamId>) -> Self {
        self.team_id = Some(team.into());
        self
    }

    #[must_use]
    pub fn with_player(mut self, player: impl Into<PlayerId>) -> Self {
        self.player_id = Some(player.into());
        self
    }

    #[must_use]
    pub fn with_sub_type(mut self, sub_type: SubType) -> Self {
        self.sub_type = Some(sub_type);
        self
    }

    #[must_use]
    pub fn with_made(mut self, made: bool) -> Self {
        self.made = made;
        self
    }

    #[must_use]
    pub fn with_parent_action(mut self, parent_action_id: u64) -> Self {
        self.parent_action_id = Some(parent_action_id);
        self
    }

    #[must_use]
    pub fn with_shot_location(mut self, x: f64, y: f64) -> Self {
        self.shot_location = Some(ShotLocation { x, y });
        self
    }

    /// A made field goal or free throw.
    #[must_use]
    pub const fn is_made_shot(&self) -> bool {
        self.action_type.is_shot() && self.made
    }

    /// A missed two- or three-point attempt. Free throws are excluded.
    #[must_use]
    pub const fn is_missed_field_goal(&self) -> bool {
        self.action_type.is_field_goal() && !self.made
    }

    /// Raw parent action id with `0` folded into `None`.
    #[must_use]
    pub fn parent_action(&self) -> Option<u64> {
        self.parent_action_id.filter(|id| *id != 0)
    }

    /// Whether this foul spends one of the team's fouls to give.
    ///
    /// Technical fouls are charged to the player but not to the team bank.
    #[must_use]
    pub const fn counts_towards_penalty(&self) -> bool {
        matches!(self.action_type, ActionType::Foul)
            && !matches!(self.sub_type, Some(SubType::Technical))
    }

    /// Whether this foul is added to the player's personal total.
    #[must_use]
    pub const fn counts_as_personal_foul(&self) -> bool {
        matches!(self.action_type, ActionType::Foul)
    }

    /// `true` when the records are attributed to different teams.
    #[must_use]
    pub fn is_opponent_of(&self, other: &Self) -> bool {
        self.team_id != other.team_id
    }
}

impl fmt::Display for EventRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{} {} {}", self.period, self.clock, self.action_type)?;
        if let Some(sub) = self.sub_type {
            write!(f, " {sub}")?;
        }
        if self.action_type.is_shot() {
            f.write_str(if self.made { " made" } else { " missed" })?;
        }
        if let Some(team) = &self.team_id {
            write!(f, " team {team}")?;
        }
        if let Some(player) = &self.player_id {
            write!(f, " by {player}")?;
        }
        if let (Some(sub_in), Some(sub_out)) = (&self.sub_in_player_id, &self.sub_out_player_id) {
            write!(f, " {sub_in} for {sub_out}")?;
        }
        Ok(())
    }
}
