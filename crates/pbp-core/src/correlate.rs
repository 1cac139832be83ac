//! Merge split raw records into compound semantic events.
//!
//! Feeds report one on-court action as several records: a made basket and
//! its assist, a turnover and its steal, a foul and the player fouled, the
//! two halves of a substitution. The correlator walks the stream once,
//! dispatching on the action type, and folds each partner record into the
//! record that anchors the action. Partners are tombstoned in an
//! [`EventStream`] so the walk never skips or revisits a record.
//!
//! # Fallbacks
//!
//! When the forward scan finds nothing, some actions look backwards:
//!
//! - turnovers and fouls check only the single preceding record,
//! - made shots search every record logged at the identical clock tick.
//!
//! Substitutions have no fallback: an unpaired half aborts the pass with
//! [`EnrichError::UnpairedSubstitution`].

use serde::Serialize;
use tracing::{debug, warn};

use crate::config::CorrelationConfig;
use crate::error::EnrichError;
use crate::event::{ActionType, EventRecord, SubstitutionDirection};
use crate::scan::{self, CorrelationTarget};
use crate::stream::EventStream;

/// Counts of merges performed by one correlation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CorrelationReport {
    pub input_records: usize,
    pub output_records: usize,
    pub assists: usize,
    pub steals: usize,
    pub blocks: usize,
    pub fouls_on: usize,
    pub substitutions: usize,
    /// Block markers dropped without a missed shot to merge into.
    pub discarded_blocks: usize,
}

impl CorrelationReport {
    /// Records removed from the stream by merging or discarding.
    #[must_use]
    pub const fn removed(&self) -> usize {
        self.input_records.saturating_sub(self.output_records)
    }

    const fn count(&mut self, target: CorrelationTarget) {
        match target {
            CorrelationTarget::Assist => self.assists += 1,
            CorrelationTarget::Steal => self.steals += 1,
            CorrelationTarget::Block => self.blocks += 1,
            CorrelationTarget::FoulOn => self.fouls_on += 1,
            CorrelationTarget::SubstitutionIn | CorrelationTarget::SubstitutionOut => {
                self.substitutions += 1;
            }
        }
    }
}

/// Output of [`Correlator::run`].
#[derive(Debug, Clone)]
pub struct Correlated {
    pub events: Vec<EventRecord>,
    pub report: CorrelationReport,
}

/// Single-pass correlator over an ordered record stream.
#[derive(Debug, Clone, Copy)]
pub struct Correlator {
    window_millis: i64,
}

impl Default for Correlator {
    fn default() -> Self {
        Self::new(&CorrelationConfig::default())
    }
}

impl Correlator {
    #[must_use]
    pub fn new(config: &CorrelationConfig) -> Self {
        Self {
            window_millis: config.window_millis(),
        }
    }

    /// Correlate `records` and return the reduced stream.
    ///
    /// # Errors
    ///
    /// Returns [`EnrichError::UnpairedSubstitution`] when a substitution half
    /// has no counterpart inside the window. No partial output is returned.
    pub fn run(&self, records: Vec<EventRecord>) -> Result<Correlated, EnrichError> {
        let mut report = CorrelationReport {
            input_records: records.len(),
            ..CorrelationReport::default()
        };
        let mut stream = EventStream::from(records);

        for idx in 0..stream.slot_count() {
            let Some(action) = stream.get(idx).map(|record| record.action_type) else {
                continue;
            };
            match action {
                ActionType::Turnover => {
                    self.merge_with_prior_fallback(
                        &mut stream,
                        idx,
                        CorrelationTarget::Steal,
                        &mut report,
                    );
                }
                ActionType::TwoPoint | ActionType::ThreePoint | ActionType::FreeThrow => {
                    self.correlate_shot(&mut stream, idx, &mut report);
                }
                ActionType::Block | ActionType::Blocked => {
                    if let Some(marker) = stream.remove(idx) {
                        if action == ActionType::Block {
                            warn!(event_id = marker.event_id, "discarding block with no missed shot");
                        }
                        report.discarded_blocks += 1;
                    }
                }
                ActionType::Foul => {
                    self.merge_with_prior_fallback(
                        &mut stream,
                        idx,
                        CorrelationTarget::FoulOn,
                        &mut report,
                    );
                }
                ActionType::Substitution => {
                    self.correlate_substitution(&mut stream, idx, &mut report)?;
                }
                ActionType::Rebound
                | ActionType::Steal
                | ActionType::Assist
                | ActionType::FoulOn
                | ActionType::StartOfPeriod
                | ActionType::EndOfPeriod
                | ActionType::JumpBall
                | ActionType::Timeout => {}
            }
        }

        let events = stream.into_records();
        report.output_records = events.len();
        debug!(?report, "correlation pass complete");
        Ok(Correlated { events, report })
    }

    /// Forward scan, then the single immediately preceding live record.
    fn merge_with_prior_fallback(
        &self,
        stream: &mut EventStream,
        idx: usize,
        target: CorrelationTarget,
        report: &mut CorrelationReport,
    ) {
        if scan::scan_forward(stream, idx, target, self.window_millis).is_some() {
            report.count(target);
            return;
        }
        let Some(prev) = stream.prev_live(idx) else {
            return;
        };
        let prior_matches = match (stream.get(idx), stream.get(prev)) {
            (Some(anchor), Some(prior)) => {
                target.matches(prior) && target.team_matches(anchor, prior)
            }
            _ => false,
        };
        if prior_matches && scan::merge_into(stream, idx, prev, target) {
            debug!(slot = idx, target = target.as_str(), "partner recorded before anchor");
            report.count(target);
        }
    }

    fn correlate_shot(&self, stream: &mut EventStream, idx: usize, report: &mut CorrelationReport) {
        let Some((made, missed_field_goal)) = stream
            .get(idx)
            .map(|shot| (shot.is_made_shot(), shot.is_missed_field_goal()))
        else {
            return;
        };

        if made {
            let target = CorrelationTarget::Assist;
            if scan::scan_forward(stream, idx, target, self.window_millis).is_some() {
                report.count(target);
                return;
            }
            let earlier = scan::events_before(stream, idx).into_iter().find(|prev| {
                stream
                    .get(*prev)
                    .zip(stream.get(idx))
                    .is_some_and(|(prior, anchor)| {
                        target.matches(prior) && target.team_matches(anchor, prior)
                    })
            });
            if let Some(prev) = earlier {
                if scan::merge_into(stream, idx, prev, target) {
                    debug!(slot = idx, "assist recorded before shot at same clock");
                    report.count(target);
                }
            }
        } else if missed_field_goal {
            let target = CorrelationTarget::Block;
            if scan::scan_forward(stream, idx, target, self.window_millis).is_some() {
                report.count(target);
            }
        }
    }

    fn correlate_substitution(
        &self,
        stream: &mut EventStream,
        idx: usize,
        report: &mut CorrelationReport,
    ) -> Result<(), EnrichError> {
        let Some(record) = stream.get(idx) else {
            return Ok(());
        };
        if record.sub_in_player_id.is_some() && record.sub_out_player_id.is_some() {
            // Already a compound substitution from an earlier pass.
            return Ok(());
        }
        // A substitution without a direction is treated as the outgoing half.
        let direction = record
            .sub_type
            .and_then(|sub| sub.substitution_direction())
            .unwrap_or(SubstitutionDirection::Out);
        let (target, own) = match direction {
            SubstitutionDirection::In => {
                (CorrelationTarget::SubstitutionOut, CorrelationTarget::SubstitutionIn)
            }
            SubstitutionDirection::Out => {
                (CorrelationTarget::SubstitutionIn, CorrelationTarget::SubstitutionOut)
            }
        };

        if scan::scan_forward(stream, idx, target, self.window_millis).is_none() {
            let record = stream.get(idx);
            return Err(EnrichError::UnpairedSubstitution {
                event_id: record.map_or(0, |r| r.event_id),
                direction,
                period: record.map_or(0, |r| r.period),
                clock: record.map(|r| r.clock).unwrap_or_default(),
            });
        }

        if let Some(record) = stream.get_mut(idx) {
            let player = record.player_id.take();
            own.attach(record, player);
            record.player_name = None;
            record.sub_type = None;
            debug!(
                event_id = record.event_id,
                sub_in = ?record.sub_in_player_id,
                sub_out = ?record.sub_out_player_id,
                "paired substitution"
            );
        }
        report.count(target);
        Ok(())
    }
}

/// Correlate with the default window.
///
/// # Errors
///
/// See [`Correlator::run`].
pub fn correlate(records: Vec<EventRecord>) -> Result<Vec<EventRecord>, EnrichError> {
    Correlator::default().run(records).map(|correlated| correlated.events)
}
