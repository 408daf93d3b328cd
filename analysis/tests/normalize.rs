mod support;

use analysis::normalize::{normalize, Orientation};
use analysis::{Court, ReconstructError};
use pretty_assertions::assert_eq;
use support::*;

#[test]
fn ranks_by_shot_count_then_id() {
    let events = session(
        vec![
            rally(1, "bravo", 1.0, 22.0),
            rally(2, "alpha", 2.0, 1.0),
            rally(3, "bravo", 3.0, 23.0),
            rally(4, "alpha", 4.0, 2.0),
            rally(5, "charlie", 5.0, 12.0),
        ],
        vec![],
    );

    let timeline = normalize(&Court::default(), &events).unwrap();

    assert_eq!(vec!["alpha".to_owned(), "bravo".to_owned()], timeline.participants.ids());
    assert_eq!(1, timeline.participants.get("alpha").unwrap().rank);
    assert_eq!(2, timeline.participants.get("bravo").unwrap().rank);
    assert!(timeline.participants.get("charlie").is_none());
    assert_eq!(
        vec![5],
        timeline.unattached.iter().map(|s| s.shot_id).collect::<Vec<_>>()
    );
    assert_eq!(4, timeline.shots.len());
}

#[test]
fn orientation_from_average_contact() {
    let events = session(
        vec![
            rally(1, "near", 1.0, 0.5),
            rally(2, "far", 2.0, 23.0),
            rally(3, "near", 3.0, 6.0),
            rally(4, "far", 4.0, 18.0),
        ],
        vec![],
    );

    let timeline = normalize(&Court::default(), &events).unwrap();

    let orientation = |id: &str| timeline.participants.get(id).map(|p| p.orientation);
    assert_eq!(Some(Orientation::Near), orientation("near"));
    assert_eq!(Some(Orientation::Far), orientation("far"));
    assert!(timeline.participants.is_match());
    assert_eq!(Some("near"), timeline.participants.opponent("far"));
    assert_eq!(None, timeline.participants.opponent("nobody"));
}

#[test]
fn orders_by_time_then_shot_id() {
    let mut from_start = rally(4, "a", 0.0, 1.0);
    from_start.contact_s = None;
    from_start.start_s = Some(1.5);

    let events = session(
        vec![
            rally(9, "a", 3.0, 1.0),
            rally(3, "b", 1.0, 22.0),
            rally(2, "b", 1.0, 22.0),
            from_start,
        ],
        vec![],
    );

    let timeline = normalize(&Court::default(), &events).unwrap();

    assert_eq!(
        vec![2, 3, 4, 9],
        timeline.shots.iter().map(|s| s.id()).collect::<Vec<_>>()
    );
    assert_eq!(1.5, timeline.shots[2].ord_s);
}

#[test]
fn shots_without_time_are_unattached() {
    let mut untimed = rally(3, "a", 0.0, 1.0);
    untimed.contact_s = None;
    untimed.start_s = None;

    let events = session(vec![rally(1, "a", 1.0, 1.0), rally(2, "b", 2.0, 22.0), untimed], vec![]);

    let timeline = normalize(&Court::default(), &events).unwrap();

    assert_eq!(2, timeline.shots.len());
    assert_eq!(
        vec![3],
        timeline.unattached.iter().map(|s| s.shot_id).collect::<Vec<_>>()
    );
    // still counted for ranking
    assert_eq!(2, timeline.participants.get("a").unwrap().shot_count);
}

#[test]
fn foreign_session_shots_are_dropped() {
    let mut foreign = rally(3, "c", 2.5, 1.0);
    foreign.session_id = "other".to_owned();

    let events = session(vec![rally(1, "a", 1.0, 1.0), rally(2, "b", 2.0, 22.0), foreign], vec![]);

    let timeline = normalize(&Court::default(), &events).unwrap();

    assert_eq!(vec!["a".to_owned(), "b".to_owned()], timeline.participants.ids());
    assert!(timeline.unattached.is_empty());
}

#[test]
fn bounces_are_time_ordered() {
    let events = session(
        vec![rally(1, "a", 1.0, 1.0)],
        vec![
            bounce(7, 2.0, 4.0, 4.0, "floor"),
            bounce(5, 1.0, 4.0, 4.0, "floor"),
            bounce(6, 1.0, 4.0, 4.0, "net"),
        ],
    );

    let timeline = normalize(&Court::default(), &events).unwrap();

    assert_eq!(
        vec![5, 6, 7],
        timeline.bounces.iter().map(|b| b.bounce_id).collect::<Vec<_>>()
    );
}

#[test]
fn no_shots_cannot_be_reconstructed() {
    let events = session(vec![], vec![bounce(1, 1.0, 4.0, 4.0, "floor")]);

    let result = normalize(&Court::default(), &events);

    assert_eq!(
        ReconstructError::NoParticipants {
            session_id: SESSION.to_owned()
        },
        result.unwrap_err()
    );
}

#[test]
fn untimed_session_cannot_be_reconstructed() {
    let shots = (1..4)
        .map(|id| {
            let mut s = rally(id, "a", 0.0, 1.0);
            s.contact_s = None;
            s.start_s = None;
            s
        })
        .collect();

    let events = session(shots, vec![]);
    let result = normalize(&Court::default(), &events);

    assert_eq!(
        ReconstructError::MissingTimestamps {
            session_id: SESSION.to_owned()
        },
        result.unwrap_err()
    );
}

#[test]
fn single_participant_yields_empty_log() {
    let events = session(vec![serve(1, "solo", 1.0, 2.0, 0.2), rally(2, "solo", 2.0, 1.0)], vec![]);

    let log = analysis::reconstruct(&analysis::Config::default(), &events).unwrap();

    assert_eq!(vec!["solo".to_owned()], log.players);
    assert!(!normalize(&Court::default(), &events).unwrap().participants.is_match());
    assert!(log.rows.is_empty());
    assert!(log.points.is_empty());
}
