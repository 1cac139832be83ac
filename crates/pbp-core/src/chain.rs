//! Chronological links and per-event game-state snapshots.
//!
//! Runs over an already-correlated stream. Every record gets:
//!
//! - `previous_event`/`next_event` indices to its neighbours in the same
//!   period (unset at period and game boundaries),
//! - a copy of the team foul bank and the personal foul table as they stand
//!   after the record itself has been applied.
//!
//! The foul bank is refreshed at the start of each regulation period and
//! carried forward through overtime.
//!
//! After the pass the [`GameAnnotator`] hooks run, in order, so collaborators
//! can attach period starters, score and margin, and offense team ids on top
//! of the finished chain.

use serde::Serialize;
use tracing::{debug, trace};

use crate::config::FoulConfig;
use crate::event::{ActionType, EventRecord, FoulBank, PlayerFouls};

/// Collaborator hooks invoked once links and snapshots are in place.
///
/// Every method defaults to doing nothing.
pub trait GameAnnotator {
    fn set_period_starters(&mut self, _events: &mut [EventRecord], _period_starts: &[usize]) {}

    fn add_score_and_margin(&mut self, _events: &mut [EventRecord]) {}

    fn add_offense_team_id(&mut self, _events: &mut [EventRecord]) {}
}

/// Annotator that leaves the chain untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopAnnotator;

impl GameAnnotator for NoopAnnotator {}

/// What the chain pass learned about the stream's shape.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ChainSummary {
    /// Index of the first record of every period, in order.
    pub period_starts: Vec<usize>,
    /// Fouls processed by the pass.
    pub fouls: usize,
}

#[derive(Debug, Clone, Default)]
pub struct ChainBuilder {
    fouls: FoulConfig,
}

impl ChainBuilder {
    #[must_use]
    pub const fn new(fouls: FoulConfig) -> Self {
        Self { fouls }
    }

    /// Link `events`, snapshot foul state, then run the annotator hooks.
    pub fn build(
        &self,
        events: &mut [EventRecord],
        annotator: &mut dyn GameAnnotator,
    ) -> ChainSummary {
        let mut summary = ChainSummary::default();
        let mut bank = FoulBank::new(self.fouls.per_period);
        let mut personal = PlayerFouls::default();
        let len = events.len();

        for i in 0..len {
            let period = events[i].period;
            let prev_in_period = i > 0 && events[i - 1].period == period;
            let next_in_period = i + 1 < len && events[i + 1].period == period;
            let event = &mut events[i];

            event.previous_event = prev_in_period.then(|| i - 1);
            event.next_event = next_in_period.then_some(i + 1);

            if !prev_in_period || event.action_type == ActionType::StartOfPeriod {
                summary.period_starts.push(i);
                if period <= self.fouls.regulation_periods {
                    bank.reset();
                }
            }

            if event.action_type == ActionType::Foul {
                summary.fouls += 1;
                if event.counts_towards_penalty() {
                    if let Some(team) = &event.team_id {
                        if bank.charge(team) == 0 {
                            trace!(team = %team, event_id = event.event_id, "team in the penalty");
                        }
                    }
                }
                if event.counts_as_personal_foul() {
                    if let Some(player) = &event.player_id {
                        personal.add(player);
                    }
                }
            }

            event.fouls_to_give = bank.clone();
            event.player_game_fouls = personal.clone();
        }

        annotator.set_period_starters(events, &summary.period_starts);
        annotator.add_score_and_margin(events);
        annotator.add_offense_team_id(events);

        debug!(
            records = len,
            periods = summary.period_starts.len(),
            fouls = summary.fouls,
            "chain built"
        );
        summary
    }
}

/// Chain a correlated stream with default foul rules and no annotator.
#[must_use]
pub fn enrich(mut events: Vec<EventRecord>) -> Vec<EventRecord> {
    ChainBuilder::default().build(&mut events, &mut NoopAnnotator);
    events
}
