//! Navigation over an enriched stream.
//!
//! Every function takes the finished `&[EventRecord]` (links resolved, split
//! records merged) and an index into it.

use serde::Serialize;
use std::fmt;

use crate::config::ShotConfig;
use crate::error::EnrichError;
use crate::event::{ActionType, EventRecord, SubType};

/// Court zone a field goal attempt was taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ShotZone {
    AtRim,
    ShortMidRange,
    LongMidRange,
    Arc3,
    Corner3,
}

impl ShotZone {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AtRim => "AtRim",
            Self::ShortMidRange => "ShortMidRange",
            Self::LongMidRange => "LongMidRange",
            Self::Arc3 => "Arc3",
            Self::Corner3 => "Corner3",
        }
    }
}

impl fmt::Display for ShotZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The rebound that immediately followed a missed shot, if any.
#[must_use]
pub fn rebound(events: &[EventRecord], idx: usize) -> Option<usize> {
    let shot = events.get(idx)?;
    if !shot.action_type.is_shot() || shot.made {
        return None;
    }
    shot.next_event
        .filter(|next| events.get(*next).is_some_and(|e| e.action_type == ActionType::Rebound))
}

#[must_use]
pub fn is_blocked(events: &[EventRecord], idx: usize) -> bool {
    events
        .get(idx)
        .is_some_and(|e| e.is_missed_field_goal() && e.block.is_some())
}

#[must_use]
pub fn is_assisted(events: &[EventRecord], idx: usize) -> bool {
    events
        .get(idx)
        .is_some_and(|e| e.is_made_shot() && e.assist.is_some())
}

/// A two-point attempt by the player who just grabbed an offensive rebound.
///
/// Walks back along `previous_event` to the nearest offensive rebound; the
/// shot qualifies when that rebound is the shooter's and came no more than
/// `putback_window_secs` earlier. Assisted shots never qualify.
#[must_use]
pub fn is_putback(events: &[EventRecord], idx: usize, shots: &ShotConfig) -> bool {
    let Some(shot) = events.get(idx) else {
        return false;
    };
    if shot.action_type != ActionType::TwoPoint || is_assisted(events, idx) {
        return false;
    }

    let mut cursor = shot.previous_event;
    while let Some(prev) = cursor.and_then(|i| events.get(i)) {
        if prev.action_type == ActionType::Rebound && prev.sub_type == Some(SubType::Offensive) {
            let window = i64::from(shots.putback_window_secs) * 1_000;
            return prev.player_id == shot.player_id
                && prev.clock.elapsed_until(shot.clock) <= window;
        }
        cursor = prev.previous_event;
    }
    false
}

/// Distance from the basket in feet, rounded to one decimal.
///
/// # Errors
///
/// [`EnrichError::MissingShotLocation`] when the record has no coordinates.
pub fn shot_distance(record: &EventRecord) -> Result<f64, EnrichError> {
    let location = record
        .shot_location
        .ok_or(EnrichError::MissingShotLocation {
            event_id: record.event_id,
        })?;
    let dx = (location.x - 5.0) * 2.0;
    let dy = location.y - 50.0;
    Ok((dx.hypot(dy) * 10.0).round() / 10.0)
}

/// # Errors
///
/// [`EnrichError::MissingShotLocation`] when the record has no coordinates.
pub fn is_corner_three(record: &EventRecord, shots: &ShotConfig) -> Result<bool, EnrichError> {
    if record.action_type != ActionType::ThreePoint {
        return Ok(false);
    }
    let location = record
        .shot_location
        .ok_or(EnrichError::MissingShotLocation {
            event_id: record.event_id,
        })?;
    Ok(location.x <= shots.corner_three_max_x)
}

/// A long attempt in the dying seconds of the period.
///
/// # Errors
///
/// [`EnrichError::MissingShotLocation`] when the record has no coordinates.
pub fn is_heave(record: &EventRecord, shots: &ShotConfig) -> Result<bool, EnrichError> {
    let distance = shot_distance(record)?;
    let cutoff = i64::from(shots.heave_time_cutoff_secs) * 1_000;
    Ok(distance > shots.heave_distance_cutoff && i64::from(record.clock.millis()) < cutoff)
}

/// Classify a field goal attempt. Free throws and non-shots have no zone.
///
/// # Errors
///
/// [`EnrichError::MissingShotLocation`] when the record has no coordinates.
pub fn shot_zone(record: &EventRecord, shots: &ShotConfig) -> Result<Option<ShotZone>, EnrichError> {
    match record.action_type {
        ActionType::ThreePoint => Ok(Some(if is_corner_three(record, shots)? {
            ShotZone::Corner3
        } else {
            ShotZone::Arc3
        })),
        ActionType::TwoPoint => {
            let distance = shot_distance(record)?;
            Ok(Some(if distance < shots.at_rim_cutoff {
                ShotZone::AtRim
            } else if distance < shots.short_mid_range_cutoff {
                ShotZone::ShortMidRange
            } else {
                ShotZone::LongMidRange
            }))
        }
        _ => Ok(None),
    }
}
