//! Reconstructs serves, points, games and the score of a tennis session from provider shot and
//! bounce telemetry.
//!
//! The stages run strictly forward over one session:
//! [`normalize`] → [`serve`] → [`segment`] → [`bounce`] → [`validity`] → [`outcome`] and
//! [`score`]. Sessions share nothing, so callers are free to reconstruct many of them in
//! parallel.

pub mod bounce;
pub mod config;
pub mod court;
pub mod error;
pub mod normalize;
pub mod outcome;
pub mod score;
pub mod segment;
pub mod serve;
pub mod validity;

pub use config::{Config, EvidenceWeights};
pub use court::Court;
pub use error::ReconstructError;

use common::{GameSummary, PointLog, PointLogRow, PointSummary, SessionEvents, ShotEvent};

pub const NO_BOUNCE_IN_WINDOW: &str = "no_bounce_in_window";

/// Runs the full reconstruction. The result supersedes any earlier output for the session.
#[tracing::instrument(name = "Reconstruct", skip(config, events), fields(session = %events.session_id))]
pub fn reconstruct(config: &Config, events: &SessionEvents) -> Result<PointLog, ReconstructError> {
    let timeline = normalize::normalize(&config.court, events)?;

    let players = timeline.participants.ids();
    if !timeline.participants.is_match() {
        tracing::info!(?players, "Fewer than two participants, empty point log");
        let mut log = PointLog::empty(events.session_id.clone());
        log.players = players;
        return Ok(log);
    }
    let participants = &timeline.participants;

    let serves = serve::detect(&config.court, &timeline.shots);
    let segmentation = segment::segment(&serves, timeline.shots.len());
    let landings = bounce::associate(config, &timeline.shots, &timeline.bounces);
    let validity =
        validity::evaluate(config, &timeline.shots, &serves, &segmentation, &landings);
    let outcomes =
        outcome::resolve_all(config, participants, &timeline.shots, &segmentation, &landings);
    let (scores, game_winners) = score::score(participants, &segmentation, &outcomes);

    let stages = Stages {
        config,
        timeline: &timeline,
        segmentation: &segmentation,
        landings: &landings,
        validity: &validity,
        outcomes: &outcomes,
        scores: &scores,
    };

    let mut rows: Vec<PointLogRow> = (0..timeline.shots.len()).map(|seq| stages.row(seq)).collect();
    let mut unattached = timeline.unattached.clone();
    unattached.sort_by_key(|s| s.shot_id);
    rows.extend(unattached.into_iter().map(|s| unattached_row(&timeline, s)));

    let points = segmentation
        .points
        .iter()
        .enumerate()
        .filter_map(|(idx, point)| {
            let outcome = outcomes[idx].as_ref()?;
            let score = scores[idx].as_ref()?;
            Some(PointSummary {
                point_number: point.number,
                game_number: point.game_number,
                point_in_game: point.point_in_game,
                server_id: point.server_id.clone(),
                serving_side: point.side,
                terminal_shot_id: timeline.shots[outcome.terminal_seq].id(),
                terminal_basis: outcome.basis,
                winner_id: outcome.winner_id.clone(),
                valid_chain_len: validity.points[idx].last_valid_shot_ix.unwrap_or(0),
                point_score: score.text.clone(),
            })
        })
        .collect();

    let games = segmentation
        .games
        .iter()
        .zip(game_winners)
        .map(|(game, winner_id)| GameSummary {
            game_number: game.number,
            server_id: game.server_id.clone(),
            winner_id,
            points: game.points.len() as u32,
        })
        .collect();

    tracing::info!(
        rows = rows.len(),
        points = segmentation.points.len(),
        games = segmentation.games.len(),
        "Reconstructed session"
    );

    Ok(PointLog {
        session_id: events.session_id.clone(),
        players,
        rows,
        points,
        games,
    })
}

struct Stages<'a, 'e> {
    config: &'a Config,
    timeline: &'a normalize::Timeline<'e>,
    segmentation: &'a segment::Segmentation,
    landings: &'a [Option<bounce::BounceMatch<'e>>],
    validity: &'a validity::Validity,
    outcomes: &'a [Option<outcome::Outcome>],
    scores: &'a [Option<score::PointScore>],
}

impl<'a, 'e> Stages<'a, 'e> {
    fn row(&self, seq: usize) -> PointLogRow {
        let court = &self.config.court;
        let shots = &self.timeline.shots;
        let shot = &shots[seq];
        let landing = self.landings[seq];
        let validity = &self.validity.shots[seq];

        let mut row = base_row(self.timeline.session_id, shot.event);
        row.participant_rank = Some(shot.rank);
        row.player_is_far_side = Some(shot.orientation.is_far());

        if let Some(m) = landing {
            row.bounce_id = Some(m.bounce.bounce_id);
            row.bounce_s = Some(m.bounce.timestamp_s);
            row.bounce_type = Some(m.bounce.bounce_type.clone());
            row.bounce_x = Some(m.bounce.x);
            row.bounce_y = Some(m.bounce.y);
            row.bounce_source = Some(m.source);
            row.bounce_hitter_id = m.bounce.hitter_participant_id.clone();
            row.bounce_in_court = Some(court.contains(m.bounce.x, m.bounce.y));
            row.why_null = None;
        }

        row.serve = validity.serve;
        row.evidence_score = validity.evidence_score;
        row.bounce_kill = validity.bounce_kill;

        let next = shots.get(seq + 1);
        let floor_x = landing.filter(|m| m.bounce.is_floor()).map(|m| m.bounce.x);

        let point_idx = match self.segmentation.point_index(seq) {
            Some(p) => p,
            None => {
                row.play = Some(outcome::play(court, row.serve, false, shot.event.contact_y));
                return row;
            }
        };
        let point = &self.segmentation.points[point_idx];
        let point_validity = &self.validity.points[point_idx];
        let shot_ix = (seq - point.shots.start) as u32 + 1;

        row.point_number = Some(point.number);
        row.game_number = Some(point.game_number);
        row.point_in_game = Some(point.point_in_game);
        row.serving_side = Some(point.side);
        row.server_id = Some(point.server_id.clone());
        row.shot_ix = Some(shot_ix);
        row.last_shot_ix = Some(point.shots.len() as u32);
        row.first_rally_shot_ix = point_validity.first_rally_shot_ix;
        row.start_serve_shot_ix = point_validity.start_serve_shot_ix;

        row.serve_try_ix_in_point = validity.serve_try_ix;
        row.is_serve_fault = validity.is_serve_fault;
        row.between_serves = validity.between_serves;
        row.cluster_kill = validity.cluster_kill;
        row.valid = validity.valid;
        row.valid_shot_ix = validity.valid_shot_ix;
        row.is_last_valid_in_point = validity.is_last_valid_in_point;
        row.is_last_in_point = validity.is_last_in_point;

        let is_first_rally = point_validity.first_rally_shot_ix == Some(shot_ix);
        row.play = Some(outcome::play(court, row.serve, is_first_rally, shot.event.contact_y));

        let terminal = self.outcomes[point_idx]
            .as_ref()
            .filter(|o| o.terminal_seq == seq);
        if let Some(outcome) = terminal {
            row.terminal_basis = Some(outcome.basis);
            row.point_winner_id = Some(outcome.winner_id.clone());
            row.is_wide_last = outcome.is_wide;
            row.is_long_last = outcome.is_long;
            row.out_axis_last = outcome.out_axis;
        }

        if row.serve && point_validity.start_serve_shot_ix == Some(shot_ix) {
            let server_far_end = shot
                .event
                .contact_y
                .map(|y| y >= court.half_length())
                .unwrap_or(shot.orientation.is_far());
            let receiver_x = next
                .filter(|n| n.player() != shot.player())
                .and_then(|n| n.event.contact_x);
            row.serve_bucket = floor_x
                .or(receiver_x)
                .or(shot.event.contact_x)
                .and_then(|x| outcome::serve_bucket(court, point.side, server_far_end, x));
        }

        if !row.serve {
            let x = if terminal.is_some() {
                landing.map(|m| m.bounce.x)
            } else {
                floor_x
                    .or_else(|| next.and_then(|n| n.event.contact_x))
                    .or(shot.event.contact_x)
            };
            row.placement = x.and_then(|x| outcome::placement(court, shot.orientation, x));
        }

        if let Some(score) = self.scores[point_idx].as_ref() {
            row.point_score = Some(score.text.clone());
            row.is_game_end = Some(score.is_game_end);
            row.game_winner_id = score.game_winner_id.clone();
            row.games_server_after = Some(score.games_server_after);
            row.games_receiver_after = Some(score.games_receiver_after);
            row.game_score_after = Some(score.game_score_after());
        }

        row
    }
}

/// Shots kept out of point logic still get a row, without any derived point fields.
fn unattached_row(timeline: &normalize::Timeline<'_>, shot: &ShotEvent) -> PointLogRow {
    let mut row = base_row(timeline.session_id, shot);
    let participant = timeline.participants.get(&shot.participant_id);
    row.participant_rank = participant.map(|p| p.rank);
    row.player_is_far_side = participant.map(|p| p.orientation.is_far());
    row.why_null = None;
    row
}

fn base_row(session_id: &str, shot: &ShotEvent) -> PointLogRow {
    PointLogRow {
        session_id: session_id.to_owned(),
        shot_id: shot.shot_id,
        participant_id: shot.participant_id.clone(),
        participant_rank: None,
        start_s: shot.start_s,
        end_s: shot.end_s,
        contact_s: shot.contact_s,
        contact_x: shot.contact_x,
        contact_y: shot.contact_y,
        ball_speed: shot.ball_speed,
        stroke_type: shot.stroke_type.clone(),
        bounce_id: None,
        bounce_s: None,
        bounce_type: None,
        bounce_x: None,
        bounce_y: None,
        bounce_source: None,
        bounce_hitter_id: None,
        bounce_in_court: None,
        why_null: Some(NO_BOUNCE_IN_WINDOW.to_owned()),
        serve: false,
        serve_try_ix_in_point: None,
        is_serve_fault: None,
        first_rally_shot_ix: None,
        start_serve_shot_ix: None,
        point_number: None,
        game_number: None,
        point_in_game: None,
        serving_side: None,
        server_id: None,
        shot_ix: None,
        last_shot_ix: None,
        between_serves: false,
        cluster_kill: false,
        bounce_kill: false,
        evidence_score: 0,
        valid: false,
        valid_shot_ix: 0,
        is_last_valid_in_point: false,
        is_last_in_point: false,
        player_is_far_side: None,
        terminal_basis: None,
        point_winner_id: None,
        is_wide_last: None,
        is_long_last: None,
        out_axis_last: None,
        serve_bucket: None,
        placement: None,
        play: None,
        point_score: None,
        is_game_end: None,
        game_winner_id: None,
        games_server_after: None,
        games_receiver_after: None,
        game_score_after: None,
    }
}
