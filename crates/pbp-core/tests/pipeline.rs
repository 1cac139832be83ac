//! End-to-end enrichment scenarios over small hand-written games.
//!
//! Covers:
//!   - split-record merges (steal, assist, block, foul drawn, substitution)
//!   - chain links and foul snapshots on the reduced stream
//!   - free throw trips split by intervening records
//!   - JSON in, JSON out through the feed field names
//!   - annotation hooks seeing the finished chain

use pbp_core::event::{ActionType, EventRecord, GameClock, PlayerId, SubType, TeamId};
use pbp_core::query::{self, ShotZone};
use pbp_core::{EnrichConfig, EnrichError, Enricher, GameAnnotator, correlate, enrich};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn rec(id: u64, period: u8, secs: u32, action: ActionType, team: &str, player: &str) -> EventRecord {
    EventRecord::new(id, period, GameClock::from_secs(secs), action)
        .with_team(team)
        .with_player(player)
}

fn marker(id: u64, period: u8, secs: u32, action: ActionType) -> EventRecord {
    EventRecord::new(id, period, GameClock::from_secs(secs), action)
}

fn ids(events: &[EventRecord]) -> Vec<u64> {
    events.iter().map(|e| e.event_id).collect()
}

fn pid(raw: &str) -> Option<PlayerId> {
    Some(PlayerId::from(raw))
}

// ---------------------------------------------------------------------------
// Correlation scenarios
// ---------------------------------------------------------------------------

#[test]
fn turnover_then_steal_merges() {
    let out = correlate(vec![
        rec(1, 1, 100, ActionType::Turnover, "A", "a1"),
        rec(2, 1, 99, ActionType::Steal, "B", "b1"),
    ])
    .expect("correlate");

    assert_eq!(ids(&out), vec![1]);
    assert_eq!(out[0].steal, pid("b1"));
}

#[test]
fn made_shot_with_same_clock_assist() {
    let out = correlate(vec![
        rec(1, 1, 50, ActionType::TwoPoint, "A", "a1").with_made(true),
        rec(2, 1, 50, ActionType::Assist, "A", "a2"),
    ])
    .expect("correlate");

    assert_eq!(ids(&out), vec![1]);
    assert_eq!(out[0].assist, pid("a2"));
}

#[test]
fn lone_substitution_in_is_fatal() {
    let err = correlate(vec![
        rec(1, 2, 300, ActionType::Substitution, "A", "a6").with_sub_type(SubType::In),
    ])
    .unwrap_err();

    assert!(matches!(
        err,
        EnrichError::UnpairedSubstitution { event_id: 1, period: 2, .. }
    ));
    assert!(err.to_string().contains("has no related event"));
}

#[test]
fn missed_shot_blocked_and_rebounded() {
    let game = Enricher::default()
        .run(vec![
            marker(1, 1, 600, ActionType::StartOfPeriod),
            rec(2, 1, 80, ActionType::TwoPoint, "A", "a1").with_shot_location(6.0, 52.0),
            rec(3, 1, 80, ActionType::Block, "B", "b3"),
            rec(4, 1, 79, ActionType::Rebound, "B", "b1").with_sub_type(SubType::Defensive),
            rec(5, 1, 79, ActionType::Blocked, "A", "a1"),
        ])
        .expect("enrich");

    assert_eq!(ids(&game.events), vec![1, 2, 4]);
    assert_eq!(game.events[1].block, pid("b3"));
    assert_eq!(game.report.blocks, 1);
    assert_eq!(game.report.discarded_blocks, 1);
    assert!(query::is_blocked(&game.events, 1));
    assert_eq!(query::rebound(&game.events, 1), Some(2));
    assert_eq!(
        query::shot_zone(&game.events[1], &EnrichConfig::default().shots).expect("located"),
        Some(ShotZone::AtRim)
    );
}

#[test]
fn foul_drawn_before_the_foul_is_found() {
    let out = correlate(vec![
        rec(1, 1, 70, ActionType::FoulOn, "A", "a4"),
        rec(2, 1, 70, ActionType::Foul, "B", "b2").with_sub_type(SubType::Shooting),
    ])
    .expect("correlate");

    assert_eq!(ids(&out), vec![2]);
    assert_eq!(out[0].foul_on, pid("a4"));
}

#[test]
fn substitution_pair_becomes_one_record() {
    let out = correlate(vec![
        rec(1, 3, 400, ActionType::Substitution, "B", "b9").with_sub_type(SubType::Out),
        rec(2, 3, 400, ActionType::Substitution, "A", "a7").with_sub_type(SubType::Out),
        rec(3, 3, 398, ActionType::Substitution, "B", "b6").with_sub_type(SubType::In),
        rec(4, 3, 397, ActionType::Substitution, "A", "a8").with_sub_type(SubType::In),
    ])
    .expect("correlate");

    assert_eq!(ids(&out), vec![1, 2]);
    assert_eq!(out[0].sub_out_player_id, pid("b9"));
    assert_eq!(out[0].sub_in_player_id, pid("b6"));
    assert_eq!(out[1].sub_out_player_id, pid("a7"));
    assert_eq!(out[1].sub_in_player_id, pid("a8"));
    assert!(out.iter().all(|e| e.player_id.is_none() && e.sub_type.is_none()));
}

// ---------------------------------------------------------------------------
// Chain and foul bank
// ---------------------------------------------------------------------------

#[test]
fn links_point_into_the_reduced_stream() {
    let game = Enricher::default()
        .run(vec![
            marker(1, 1, 600, ActionType::StartOfPeriod),
            rec(2, 1, 100, ActionType::Turnover, "A", "a1"),
            rec(3, 1, 99, ActionType::Steal, "B", "b1"),
            rec(4, 1, 95, ActionType::ThreePoint, "B", "b1").with_made(true),
            rec(5, 1, 95, ActionType::Assist, "B", "b2"),
            marker(6, 1, 0, ActionType::EndOfPeriod),
        ])
        .expect("enrich");

    let len = game.events.len();
    assert_eq!(len, 4);
    for (i, event) in game.events.iter().enumerate() {
        assert_eq!(event.previous_event, i.checked_sub(1));
        assert_eq!(event.next_event, (i + 1 < len).then_some(i + 1));
    }
}

#[test]
fn foul_bank_through_regulation_and_overtime() {
    let mut records = vec![marker(1, 4, 600, ActionType::StartOfPeriod)];
    for (n, secs) in [500_u32, 400, 300, 200, 100].into_iter().enumerate() {
        let id = 2 + u64::try_from(n).expect("small");
        records.push(rec(id, 4, secs, ActionType::Foul, "A", "a1").with_sub_type(SubType::Personal));
    }
    records.push(marker(10, 5, 300, ActionType::StartOfPeriod));
    records.push(rec(11, 5, 250, ActionType::Foul, "B", "b1"));

    let events = enrich(records);
    let a = TeamId::from("A");
    let b = TeamId::from("B");

    let banks: Vec<u8> = events[..6].iter().map(|e| e.fouls_to_give.get(&a)).collect();
    assert_eq!(banks, vec![4, 3, 2, 1, 0, 0]);
    assert!(events[5].fouls_to_give.in_penalty(&a));
    assert_eq!(events[5].player_game_fouls.get(&PlayerId::from("a1")), 5);

    // Overtime keeps team A in the penalty.
    assert_eq!(events[6].fouls_to_give.get(&a), 0);
    assert_eq!(events[7].fouls_to_give.get(&b), 3);
    assert_eq!(events[6].previous_event, None);
}

// ---------------------------------------------------------------------------
// Free throws
// ---------------------------------------------------------------------------

#[test]
fn two_trips_split_by_rebound_at_same_clock() {
    let ft = |id| rec(id, 2, 30, ActionType::FreeThrow, "A", "p").with_made(id % 2 == 0);
    let game = Enricher::default()
        .run(vec![
            ft(1),
            ft(2),
            rec(3, 2, 30, ActionType::Rebound, "A", "a3").with_sub_type(SubType::Offensive),
            ft(4),
            ft(5),
        ])
        .expect("enrich");

    let labels: Vec<String> = game
        .events
        .iter()
        .filter_map(|e| e.free_throw_ordinal.map(|o| o.to_string()))
        .collect();
    assert_eq!(labels, vec!["1 of 2", "2 of 2", "1 of 2", "2 of 2"]);
    assert_eq!(game.free_throw_trips, 2);
}

#[test]
fn substitution_between_attempts_stays_one_trip() {
    let game = Enricher::default()
        .run(vec![
            rec(1, 2, 30, ActionType::FreeThrow, "A", "p").with_made(true),
            rec(2, 2, 30, ActionType::Substitution, "A", "a6").with_sub_type(SubType::In),
            rec(3, 2, 30, ActionType::Substitution, "A", "a1").with_sub_type(SubType::Out),
            rec(4, 2, 30, ActionType::FreeThrow, "A", "p").with_made(false),
        ])
        .expect("enrich");

    assert_eq!(ids(&game.events), vec![1, 2, 4]);
    let labels: Vec<String> = game
        .events
        .iter()
        .filter_map(|e| e.free_throw_ordinal.map(|o| o.to_string()))
        .collect();
    assert_eq!(labels, vec!["1 of 2", "2 of 2"]);
    assert_eq!(game.free_throw_trips, 1);
}

#[test]
fn clock_readings_keep_their_hundredths() {
    let raw = r#"[
        {"event_id": 1, "period": 4, "seconds_remaining": 4.73, "action_type": "assist",
         "team_id": "A", "player_id": "a2"},
        {"event_id": 2, "period": 4, "seconds_remaining": 4.68, "action_type": "2pt",
         "made": true, "team_id": "A", "player_id": "a1"}
    ]"#;
    let records: Vec<EventRecord> = serde_json::from_str(raw).expect("parse feed");
    let game = Enricher::default().run(records).expect("enrich");

    assert_eq!(game.events.len(), 2, "different readings are not simultaneous");
    assert!(game.events[1].assist.is_none());

    let json = serde_json::to_value(&game.events).expect("serialize");
    assert_eq!(json[0]["seconds_remaining"], 4.73);
}

// ---------------------------------------------------------------------------
// Serialization
// ---------------------------------------------------------------------------

#[test]
fn json_feed_round_trips_through_the_pipeline() {
    let raw = r#"[
        {"event_id": 1, "period": 1, "seconds_remaining": 12.5, "action_type": "2pt",
         "made": true, "team_id": 1610612737, "player_id": "203991"},
        {"event_id": 2, "period": 1, "seconds_remaining": 12.5, "action_type": "assist",
         "team_id": "1610612737", "player_id": 201143},
        {"event_id": 3, "period": 1, "seconds_remaining": 11.0, "action_type": "foul",
         "sub_type": "personal", "team_id": "1610612738", "player_id": "1627759"}
    ]"#;
    let records: Vec<EventRecord> = serde_json::from_str(raw).expect("parse feed");
    let game = Enricher::default().run(records).expect("enrich");

    assert_eq!(game.events.len(), 2);
    assert_eq!(game.events[0].assist, pid("201143"));

    let json = serde_json::to_value(&game.events).expect("serialize");
    assert_eq!(json[0]["seconds_remaining"], 12.5);
    assert_eq!(json[0]["assist"], "201143");
    assert_eq!(json[0]["next_event"], 1);
    assert!(json[0].get("previous_event").is_none());
    assert_eq!(json[1]["action_type"], "foul");
}

#[test]
fn unknown_action_type_is_rejected() {
    let raw = r#"[{"event_id": 1, "period": 1, "seconds_remaining": 3, "action_type": "dunk"}]"#;
    let err = serde_json::from_str::<Vec<EventRecord>>(raw).unwrap_err();
    assert!(err.to_string().contains("dunk"));
}

// ---------------------------------------------------------------------------
// Annotation hooks
// ---------------------------------------------------------------------------

/// Tags every record with the team that had the ball, carrying it forward.
#[derive(Default)]
struct OffenseTracker {
    offense: Vec<Option<TeamId>>,
}

impl GameAnnotator for OffenseTracker {
    fn add_offense_team_id(&mut self, events: &mut [EventRecord]) {
        let mut current: Option<TeamId> = None;
        for event in events.iter() {
            if event.action_type.is_shot() || event.action_type == ActionType::Turnover {
                current.clone_from(&event.team_id);
            }
            self.offense.push(current.clone());
        }
    }
}

#[test]
fn annotator_runs_over_the_enriched_stream() {
    let mut tracker = OffenseTracker::default();
    let game = Enricher::default()
        .run_with(
            vec![
                marker(1, 1, 600, ActionType::StartOfPeriod),
                rec(2, 1, 590, ActionType::TwoPoint, "A", "a1"),
                rec(3, 1, 589, ActionType::Rebound, "B", "b1"),
                rec(4, 1, 580, ActionType::Turnover, "B", "b1"),
            ],
            &mut tracker,
        )
        .expect("enrich");

    assert_eq!(game.events.len(), 4);
    assert_eq!(
        tracker.offense,
        vec![None, Some("A".into()), Some("A".into()), Some("B".into())]
    );
}
