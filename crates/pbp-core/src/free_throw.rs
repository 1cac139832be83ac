//! `k of n` labels for trips to the free throw line.
//!
//! Free throws are taken out of the stream in order and grouped into runs
//! sharing shooter and clock. Records logged between two attempts of a trip
//! (substitutions, timeouts, a technical) do not end it. A change of
//! possession between them (a rebound, a field goal, a turnover, a jump
//! ball or a period marker) does, even when shooter and clock still match.

use tracing::debug;

use crate::event::{ActionType, EventRecord, FreeThrowOrdinal};

/// Label every free throw in `events` and return the number of trips found.
pub fn label_free_throws(events: &mut [EventRecord]) -> usize {
    let positions: Vec<usize> = events
        .iter()
        .enumerate()
        .filter(|(_, e)| e.action_type == ActionType::FreeThrow)
        .map(|(i, _)| i)
        .collect();

    let mut trips = 0;
    let mut start = 0;
    while start < positions.len() {
        let end = run_end(events, &positions, start);
        label_run(events, &positions[start..end]);
        trips += 1;
        start = end;
    }
    debug!(trips, "free throws sequenced");
    trips
}

/// Label free throws and hand the stream back.
#[must_use]
pub fn sequence_free_throws(mut events: Vec<EventRecord>) -> Vec<EventRecord> {
    label_free_throws(&mut events);
    events
}

/// Exclusive end (into `positions`) of the trip that begins at `start`.
fn run_end(events: &[EventRecord], positions: &[usize], start: usize) -> usize {
    let first = &events[positions[start]];
    let mut end = start + 1;
    while end < positions.len() {
        let (prev, next) = (positions[end - 1], positions[end]);
        let candidate = &events[next];
        if candidate.player_id != first.player_id
            || candidate.clock != first.clock
            || events[prev + 1..next].iter().any(ends_trip)
        {
            break;
        }
        end += 1;
    }
    end
}

/// Records that hand the ball over between two attempts.
const fn ends_trip(record: &EventRecord) -> bool {
    matches!(
        record.action_type,
        ActionType::Rebound
            | ActionType::TwoPoint
            | ActionType::ThreePoint
            | ActionType::Turnover
            | ActionType::JumpBall
            | ActionType::StartOfPeriod
            | ActionType::EndOfPeriod
    )
}

fn label_run(events: &mut [EventRecord], run: &[usize]) {
    debug_assert!(run.len() <= usize::from(u16::MAX), "free throw trip of {} attempts", run.len());
    let total = u16::try_from(run.len()).unwrap_or(u16::MAX);
    for (number, &idx) in (1..=total).zip(run) {
        events[idx].free_throw_ordinal = Some(FreeThrowOrdinal { number, total });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{GameClock, SubType};

    fn ft(id: u64, clock: u32, player: &str) -> EventRecord {
        EventRecord::new(id, 2, GameClock::from_secs(clock), ActionType::FreeThrow)
            .with_team("A")
            .with_player(player)
            .with_made(true)
    }

    fn labels(events: &[EventRecord]) -> Vec<Option<String>> {
        events
            .iter()
            .map(|e| e.free_throw_ordinal.map(|o| o.to_string()))
            .collect()
    }

    fn ordinals(events: &[EventRecord]) -> Vec<String> {
        labels(events).into_iter().flatten().collect()
    }

    #[test]
    fn two_shot_trip() {
        let out = sequence_free_throws(vec![ft(1, 30, "p"), ft(2, 30, "p")]);
        assert_eq!(
            labels(&out),
            vec![Some("1 of 2".to_string()), Some("2 of 2".to_string())]
        );
    }

    #[test]
    fn and_one_is_one_of_one() {
        let out = sequence_free_throws(vec![
            EventRecord::new(1, 2, GameClock::from_secs(30), ActionType::TwoPoint).with_made(true),
            ft(2, 30, "p"),
        ]);
        assert_eq!(out[0].free_throw_ordinal, None);
        assert_eq!(labels(&out)[1].as_deref(), Some("1 of 1"));
    }

    #[test]
    fn intervening_rebound_splits_trips() {
        let mut events = vec![ft(1, 30, "p"), ft(2, 30, "p")];
        events.push(
            EventRecord::new(3, 2, GameClock::from_secs(30), ActionType::Rebound).with_team("A"),
        );
        events.extend([ft(4, 30, "p"), ft(5, 30, "p")]);

        let mut out = events;
        let trips = label_free_throws(&mut out);
        assert_eq!(trips, 2);
        assert_eq!(ordinals(&out), vec!["1 of 2", "2 of 2", "1 of 2", "2 of 2"]);
    }

    #[test]
    fn substitution_between_attempts_keeps_the_trip() {
        let sub = EventRecord::new(2, 2, GameClock::from_secs(30), ActionType::Substitution)
            .with_team("B")
            .with_sub_type(SubType::In);
        let timeout =
            EventRecord::new(3, 2, GameClock::from_secs(30), ActionType::Timeout).with_team("B");
        let out = sequence_free_throws(vec![ft(1, 30, "p"), sub, timeout, ft(4, 30, "p")]);
        assert_eq!(ordinals(&out), vec!["1 of 2", "2 of 2"]);
        assert_eq!(out[1].free_throw_ordinal, None);
    }

    #[test]
    fn different_shooters_are_separate_trips() {
        let out = sequence_free_throws(vec![ft(1, 30, "p"), ft(2, 30, "q")]);
        assert_eq!(ordinals(&out), vec!["1 of 1", "1 of 1"]);
    }

    #[test]
    fn clock_change_splits_trips() {
        let out = sequence_free_throws(vec![ft(1, 30, "p"), ft(2, 29, "p"), ft(3, 29, "p")]);
        assert_eq!(ordinals(&out), vec!["1 of 1", "1 of 2", "2 of 2"]);
    }

    #[test]
    fn runs_are_not_merged_across_another_free_throw() {
        let out = sequence_free_throws(vec![ft(1, 30, "p"), ft(2, 29, "q"), ft(3, 30, "p")]);
        assert_eq!(ordinals(&out), vec!["1 of 1", "1 of 1", "1 of 1"]);
    }

    #[test]
    fn ordinal_marks_last_attempt() {
        let out = sequence_free_throws(vec![ft(1, 30, "p"), ft(2, 30, "p"), ft(3, 30, "p")]);
        let last: Vec<bool> = out
            .iter()
            .filter_map(|e| e.free_throw_ordinal)
            .map(FreeThrowOrdinal::is_last)
            .collect();
        assert_eq!(last, vec![false, false, true]);
    }

    #[test]
    fn long_trips_are_counted_exactly() {
        let events: Vec<_> = (0..300).map(|id| ft(id, 30, "p")).collect();
        let out = sequence_free_throws(events);
        let last = out[299].free_throw_ordinal.expect("labelled");
        assert_eq!((last.number, last.total), (300, 300));
    }

    #[test]
    fn no_free_throws_is_a_no_op() {
        let mut events =
            vec![EventRecord::new(1, 1, GameClock::from_secs(600), ActionType::JumpBall)];
        assert_eq!(label_free_throws(&mut events), 0);
        assert_eq!(events[0].free_throw_ordinal, None);
    }
}
