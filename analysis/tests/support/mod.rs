#![allow(dead_code)]

use common::{BounceEvent, SessionEvents, ShotEvent};

pub const SESSION: &str = "session-test";

pub fn shot(id: u64, player: &str, t: f64, x: f64, y: f64, stroke: &str, speed: Option<f64>) -> ShotEvent {
    ShotEvent {
        session_id: SESSION.to_owned(),
        shot_id: id,
        participant_id: player.to_owned(),
        start_s: Some(t - 0.3),
        end_s: Some(t + 0.4),
        contact_s: Some(t),
        contact_x: Some(x),
        contact_y: Some(y),
        stroke_type: Some(stroke.to_owned()),
        ball_speed: speed,
        confidence: Some(0.9),
    }
}

pub fn serve(id: u64, player: &str, t: f64, x: f64, y: f64) -> ShotEvent {
    shot(id, player, t, x, y, "fh_overhead", Some(40.0))
}

pub fn rally(id: u64, player: &str, t: f64, y: f64) -> ShotEvent {
    shot(id, player, t, 4.0, y, "fh", Some(25.0))
}

pub fn bounce(id: u64, t: f64, x: f64, y: f64, kind: &str) -> BounceEvent {
    BounceEvent {
        session_id: SESSION.to_owned(),
        bounce_id: id,
        timestamp_s: t,
        x,
        y,
        bounce_type: kind.to_owned(),
        hitter_participant_id: None,
    }
}

pub fn session(shots: Vec<ShotEvent>, bounces: Vec<BounceEvent>) -> SessionEvents {
    SessionEvents {
        session_id: SESSION.to_owned(),
        shots,
        bounces,
    }
}

pub fn fixture(name: &str) -> SessionEvents {
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("../testfiles/")
        .join(name);
    let data = std::fs::read(path).unwrap();
    serde_json::from_slice(&data).unwrap()
}

pub fn row(log: &common::PointLog, shot_id: u64) -> &common::PointLogRow {
    log.rows.iter().find(|r| r.shot_id == shot_id).unwrap()
}
