mod support;

use analysis::{bounce::BounceMatch, validity::evidence_score, Config, EvidenceWeights};
use common::{BounceSource, PointLog};
use pretty_assertions::assert_eq;
use support::*;
use tracing_test::traced_test;

fn valid_flags(log: &PointLog) -> Vec<bool> {
    log.rows.iter().map(|r| r.valid).collect()
}

#[test]
fn evidence_weights() {
    let weights = EvidenceWeights::default();
    let floor = bounce(1, 1.0, 4.0, 4.0, "floor");
    let net = bounce(2, 1.0, 4.0, 11.9, "net");
    let floor_match = BounceMatch {
        bounce: &floor,
        source: BounceSource::Floor,
    };
    let any_match = BounceMatch {
        bounce: &net,
        source: BounceSource::Any,
    };

    assert_eq!(0, evidence_score(&weights, None, false, false));
    assert_eq!(2, evidence_score(&weights, None, true, true));
    assert_eq!(3, evidence_score(&weights, Some(&any_match), true, true));
    assert_eq!(5, evidence_score(&weights, Some(&floor_match), true, true));
    assert_eq!(3, evidence_score(&weights, Some(&floor_match), false, false));
}

#[test]
#[traced_test]
fn weaker_same_player_detection_is_killed() {
    let events = session(
        vec![
            serve(1, "a", 0.0, 2.0, 0.2),
            rally(2, "b", 1.0, 23.0),
            rally(3, "a", 2.0, 1.0),
            rally(4, "a", 2.3, 1.5),
            rally(5, "b", 3.3, 23.0),
        ],
        vec![
            bounce(1, 0.6, 3.0, 16.0, "floor"),
            bounce(2, 1.6, 4.0, 5.0, "floor"),
            bounce(3, 2.1, 4.0, 11.9, "net"),
            bounce(4, 2.9, 4.0, 18.0, "floor"),
            bounce(5, 4.0, 4.0, 5.0, "floor"),
        ],
    );

    let log = analysis::reconstruct(&Config::default(), &events).unwrap();

    let weak = row(&log, 3);
    assert_eq!(3, weak.evidence_score);
    assert_eq!(Some(BounceSource::Any), weak.bounce_source);
    assert!(weak.cluster_kill);
    assert!(!weak.valid);

    let strong = row(&log, 4);
    assert_eq!(5, strong.evidence_score);
    assert!(!strong.cluster_kill);
    assert!(strong.valid);

    assert_eq!(vec![true, true, false, true, true], valid_flags(&log));
    assert_eq!(
        vec![1, 2, 2, 3, 4],
        log.rows.iter().map(|r| r.valid_shot_ix).collect::<Vec<_>>()
    );
    assert!(row(&log, 5).is_last_valid_in_point);
    assert!(row(&log, 5).is_last_in_point);
    assert_eq!(Some("b".to_owned()), row(&log, 5).point_winner_id);
}

#[test]
fn equal_evidence_keeps_the_later_detection() {
    let events = session(
        vec![
            serve(1, "a", 0.0, 2.0, 0.2),
            rally(2, "b", 1.0, 23.0),
            rally(3, "a", 2.0, 1.0),
            rally(4, "a", 2.5, 1.0),
            rally(5, "b", 3.5, 23.0),
        ],
        vec![],
    );

    let log = analysis::reconstruct(&Config::default(), &events).unwrap();

    assert_eq!(row(&log, 3).evidence_score, row(&log, 4).evidence_score);
    assert!(row(&log, 3).cluster_kill);
    assert!(!row(&log, 4).cluster_kill);
}

#[test]
fn long_gap_breaks_the_rest_of_the_point() {
    let events = session(
        vec![
            serve(1, "a", 0.0, 2.0, 0.2),
            rally(2, "b", 1.0, 23.0),
            rally(3, "a", 2.0, 1.0),
            rally(4, "b", 7.0, 23.0),
            rally(5, "a", 8.0, 1.0),
        ],
        vec![],
    );

    let log = analysis::reconstruct(&Config::default(), &events).unwrap();

    assert_eq!(vec![true, true, true, false, false], valid_flags(&log));
    assert!(row(&log, 3).is_last_valid_in_point);
    assert_eq!(Some(5), row(&log, 1).last_shot_ix);
}

#[test]
fn late_return_breaks_the_point() {
    let events = session(
        vec![
            serve(1, "a", 0.0, 2.0, 0.2),
            rally(2, "b", 3.0, 23.0),
            rally(3, "a", 4.0, 1.0),
        ],
        vec![],
    );

    let log = analysis::reconstruct(&Config::default(), &events).unwrap();

    assert_eq!(vec![true, false, false], valid_flags(&log));
    assert_eq!(Some(2), row(&log, 2).first_rally_shot_ix);
}

#[test]
fn shots_between_serves_are_noise() {
    let events = session(
        vec![
            serve(1, "a", 0.0, 2.0, 0.2),
            rally(2, "b", 1.0, 23.0),
            serve(3, "a", 3.0, 2.0, 0.2),
            rally(4, "b", 4.2, 23.0),
            rally(5, "a", 5.5, 1.0),
        ],
        vec![],
    );

    let log = analysis::reconstruct(&Config::default(), &events).unwrap();

    assert_eq!(vec![true, false, true, true, true], valid_flags(&log));
    assert!(row(&log, 2).between_serves);

    let fault = row(&log, 1);
    assert_eq!(Some(1), fault.serve_try_ix_in_point);
    assert_eq!(Some(true), fault.is_serve_fault);

    let second = row(&log, 3);
    assert_eq!(Some(2), second.serve_try_ix_in_point);
    assert_eq!(Some(false), second.is_serve_fault);

    assert_eq!(Some(3), row(&log, 4).start_serve_shot_ix);
    assert_eq!(Some(4), row(&log, 4).first_rally_shot_ix);
    assert!(log.rows.iter().all(|r| r.point_number == Some(1)));
}

#[test]
fn serve_without_return_is_a_fault() {
    let events = session(
        vec![
            rally(1, "b", -5.0, 23.0),
            serve(2, "a", 0.0, 2.0, 0.2),
            rally(3, "a", 1.0, 1.0),
        ],
        vec![],
    );

    let log = analysis::reconstruct(&Config::default(), &events).unwrap();

    assert_eq!(Some(true), row(&log, 2).is_serve_fault);
    assert_eq!(None, row(&log, 2).first_rally_shot_ix);
}

#[test]
fn shared_bounce_stays_with_the_earlier_equal_claim() {
    let events = session(
        vec![
            serve(1, "a", 0.0, 2.0, 0.2),
            rally(2, "b", 1.0, 23.0),
            rally(3, "a", 1.5, 1.0),
            rally(4, "b", 2.5, 23.0),
        ],
        vec![
            bounce(1, 0.6, 3.0, 16.0, "floor"),
            bounce(2, 1.51, 4.0, 5.0, "floor"),
            bounce(3, 3.0, 4.0, 5.0, "floor"),
        ],
    );

    let log = analysis::reconstruct(&Config::default(), &events).unwrap();

    assert_eq!(Some(2), row(&log, 2).bounce_id);
    assert_eq!(Some(2), row(&log, 3).bounce_id);
    assert!(!row(&log, 2).bounce_kill);
    assert!(row(&log, 3).bounce_kill);
    assert_eq!(vec![true, true, false, true], valid_flags(&log));
}

#[test]
fn shared_bounce_goes_to_stronger_evidence() {
    let events = session(
        vec![
            serve(1, "a", 0.0, 2.0, 0.2),
            shot(2, "b", 1.0, 4.0, 23.0, "fh", None),
            rally(3, "a", 1.5, 1.0),
            rally(4, "b", 2.5, 23.0),
        ],
        vec![
            bounce(1, 0.6, 3.0, 16.0, "floor"),
            bounce(2, 1.51, 4.0, 5.0, "floor"),
            bounce(3, 3.0, 4.0, 5.0, "floor"),
        ],
    );

    let log = analysis::reconstruct(&Config::default(), &events).unwrap();

    assert_eq!(4, row(&log, 2).evidence_score);
    assert_eq!(5, row(&log, 3).evidence_score);
    assert!(row(&log, 2).bounce_kill);
    assert!(!row(&log, 3).bounce_kill);
    // a soft kill on the return does not break the rally
    assert_eq!(vec![true, false, true, true], valid_flags(&log));
}
