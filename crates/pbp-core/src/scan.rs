//! Windowed lookups over a correlating [`EventStream`].
//!
//! Three lookups locate the other half of a split action:
//!
//! - [`scan_forward`] walks ahead inside a bounded game-time window,
//! - [`events_before`] collects the records logged at the very same clock
//!   tick just before an index (zero-width window),
//! - [`related_events`] follows the feed's own parent-action ids.
//!
//! The correlator only uses the first two. [`related_events`] is exported for
//! loaders whose feeds carry parent-action ids and want to group records
//! before handing them over; correlation itself never depends on those ids.

use tracing::trace;

use crate::event::{ActionType, EventRecord, PlayerId, SubType};
use crate::stream::EventStream;

/// Which team the partner record must belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TeamSide {
    /// Same team as the anchor event.
    Same,
    /// The opposing team.
    Opposite,
}

/// The half of a split action that a scan looks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CorrelationTarget {
    Assist,
    Steal,
    Block,
    FoulOn,
    SubstitutionIn,
    SubstitutionOut,
}

impl CorrelationTarget {
    #[must_use]
    pub const fn side(self) -> TeamSide {
        match self {
            Self::Assist | Self::SubstitutionIn | Self::SubstitutionOut => TeamSide::Same,
            Self::Steal | Self::Block | Self::FoulOn => TeamSide::Opposite,
        }
    }

    /// Structural match on action type or sub type.
    #[must_use]
    pub fn matches(self, candidate: &EventRecord) -> bool {
        match self {
            Self::Assist => candidate.action_type == ActionType::Assist,
            Self::Steal => candidate.action_type == ActionType::Steal,
            Self::Block => candidate.action_type == ActionType::Block,
            Self::FoulOn => candidate.action_type == ActionType::FoulOn,
            Self::SubstitutionIn => candidate.sub_type == Some(SubType::In),
            Self::SubstitutionOut => candidate.sub_type == Some(SubType::Out),
        }
    }

    /// Team relation between the anchor and the candidate.
    #[must_use]
    pub fn team_matches(self, anchor: &EventRecord, candidate: &EventRecord) -> bool {
        match self.side() {
            TeamSide::Same => anchor.team_id == candidate.team_id,
            TeamSide::Opposite => anchor.is_opponent_of(candidate),
        }
    }

    /// Store the partner's player on the anchor under this target's field.
    pub fn attach(self, anchor: &mut EventRecord, player: Option<PlayerId>) {
        let slot = match self {
            Self::Assist => &mut anchor.assist,
            Self::Steal => &mut anchor.steal,
            Self::Block => &mut anchor.block,
            Self::FoulOn => &mut anchor.foul_on,
            Self::SubstitutionIn => &mut anchor.sub_in_player_id,
            Self::SubstitutionOut => &mut anchor.sub_out_player_id,
        };
        *slot = player;
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Assist => "assist",
            Self::Steal => "steal",
            Self::Block => "block",
            Self::FoulOn => "foul_on",
            Self::SubstitutionIn => "sub_in",
            Self::SubstitutionOut => "sub_out",
        }
    }
}

/// Find the first record after `start` that completes `target`.
///
/// Walks live records while they share the anchor's period and trail it by
/// at most `window_millis` of game time. Team mismatches are skipped, not
/// fatal to the walk.
#[must_use]
pub fn find_forward(
    stream: &EventStream,
    start: usize,
    target: CorrelationTarget,
    window_millis: i64,
) -> Option<usize> {
    let anchor = stream.get(start)?;
    for idx in stream.live_after(start) {
        let candidate = stream.get(idx)?;
        if candidate.period != anchor.period
            || anchor.clock.elapsed_until(candidate.clock) > window_millis
        {
            trace!(anchor = anchor.event_id, stop = candidate.event_id, "window exhausted");
            return None;
        }
        if target.matches(candidate) && target.team_matches(anchor, candidate) {
            return Some(idx);
        }
    }
    None
}

/// Find, attach and remove the partner for the record at `start`.
///
/// Returns the (now tombstoned) index of the merged partner, or `None` when
/// the window holds no match.
pub fn scan_forward(
    stream: &mut EventStream,
    start: usize,
    target: CorrelationTarget,
    window_millis: i64,
) -> Option<usize> {
    let found = find_forward(stream, start, target, window_millis)?;
    merge_into(stream, start, found, target);
    Some(found)
}

/// Remove `partner` from the stream and attach its player to `anchor`.
pub fn merge_into(
    stream: &mut EventStream,
    anchor: usize,
    partner: usize,
    target: CorrelationTarget,
) -> bool {
    let Some(partner_record) = stream.remove(partner) else {
        return false;
    };
    let Some(anchor_record) = stream.get_mut(anchor) else {
        return false;
    };
    trace!(
        anchor = anchor_record.event_id,
        partner = partner_record.event_id,
        target = target.as_str(),
        "merged split record"
    );
    target.attach(anchor_record, partner_record.player_id);
    true
}

/// Live records just before `idx` sharing its period and clock, nearest first.
///
/// Stops at the first record with a different period or clock reading.
#[must_use]
pub fn events_before(stream: &EventStream, idx: usize) -> Vec<usize> {
    let Some(anchor) = stream.get(idx) else {
        return Vec::new();
    };
    stream
        .live_before(idx)
        .map_while(|i| {
            stream
                .get(i)
                .filter(|prev| prev.period == anchor.period && prev.clock == anchor.clock)
                .map(|_| i)
        })
        .collect()
}

/// Records tied to `idx` through the feed's parent-action ids.
///
/// A record is related when its parent action is the anchor itself, or the
/// same (non-zero) parent the anchor has. Simultaneous records before the
/// anchor are checked individually (nearest first); after the anchor only the
/// unbroken run of related records counts.
#[must_use]
pub fn related_events(stream: &EventStream, idx: usize) -> Vec<usize> {
    let Some(anchor) = stream.get(idx) else {
        return Vec::new();
    };
    let anchor_id = anchor.event_id;
    let anchor_parent = anchor.parent_action();
    let is_related = |record: &EventRecord| {
        let parent = record.parent_action();
        parent == Some(anchor_id) || (anchor_parent.is_some() && parent == anchor_parent)
    };

    let mut related: Vec<usize> = events_before(stream, idx)
        .into_iter()
        .filter(|i| stream.get(*i).is_some_and(is_related))
        .collect();
    related.extend(
        stream
            .live_after(idx)
            .take_while(|i| stream.get(*i).is_some_and(is_related)),
    );
    related
}
