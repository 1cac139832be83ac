use std::fmt;

use crate::event::{GameClock, SubstitutionDirection};

/// Machine-readable error codes for scripts and downstream tooling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ConfigParseError,
    InputParseError,
    UnknownActionType,
    UnknownSubType,
    UnpairedSubstitution,
    MissingShotLocation,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::ConfigParseError => "E1001",
            Self::InputParseError => "E1002",
            Self::UnknownActionType => "E2001",
            Self::UnknownSubType => "E2002",
            Self::UnpairedSubstitution => "E3001",
            Self::MissingShotLocation => "E4001",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::ConfigParseError => "Config file parse error",
            Self::InputParseError => "Event input parse error",
            Self::UnknownActionType => "Unknown action type",
            Self::UnknownSubType => "Unknown action sub type",
            Self::UnpairedSubstitution => "Substitution has no counterpart",
            Self::MissingShotLocation => "Shot location missing",
        }
    }

    /// Optional remediation hint surfaced alongside the error.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::ConfigParseError => Some("Fix syntax in the pbp config.toml and retry."),
            Self::InputParseError => {
                Some("Input must be a JSON array of event records in chronological order.")
            }
            Self::UnknownActionType | Self::UnknownSubType => {
                Some("Map source-specific action names before handing records to pbp.")
            }
            Self::UnpairedSubstitution => Some(
                "The source feed dropped one half of a substitution; repair the feed and rerun.",
            ),
            Self::MissingShotLocation => None,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Errors raised by the enrichment engine.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EnrichError {
    /// A substitution could not be paired inside the correlation window.
    ///
    /// Fatal: the whole correlation pass is aborted.
    #[error(
        "substitution {direction} (event {event_id}, period {period}, {clock} left) has no related event"
    )]
    UnpairedSubstitution {
        event_id: u64,
        direction: SubstitutionDirection,
        period: u8,
        clock: GameClock,
    },

    /// Shot geometry was requested for a record without coordinates.
    #[error("cannot calculate distance without shot location data (event {event_id})")]
    MissingShotLocation { event_id: u64 },
}

impl EnrichError {
    /// The stable code for this error.
    #[must_use]
    pub const fn error_code(&self) -> ErrorCode {
        match self {
            Self::UnpairedSubstitution { .. } => ErrorCode::UnpairedSubstitution,
            Self::MissingShotLocation { .. } => ErrorCode::MissingShotLocation,
        }
    }
}
