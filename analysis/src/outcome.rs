use common::{BounceSource, Lane, OutAxis, Play, ServeSide, TerminalBasis};

use crate::{
    bounce::BounceMatch,
    config::Config,
    court::Court,
    normalize::{Orientation, Participants, Shot},
    segment::{Point, Segmentation},
};

#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    /// Timeline position of the point's last shot.
    pub terminal_seq: usize,
    pub hitter_id: String,
    pub basis: TerminalBasis,
    pub winner_id: String,
    pub is_wide: Option<bool>,
    pub is_long: Option<bool>,
    pub out_axis: Option<OutAxis>,
}

pub fn terminal_basis(config: &Config, shot: &Shot<'_>, landing: Option<&BounceMatch<'_>>) -> TerminalBasis {
    let speed = shot.event.ball_speed.unwrap_or(0.0);
    if !(speed > 0.0) {
        return TerminalBasis::NoSpeed;
    }

    let landing = match landing {
        Some(l) => l,
        None => return TerminalBasis::NoBounce,
    };

    if config.non_floor_landing_is_error && landing.source == BounceSource::Any {
        return TerminalBasis::Out;
    }

    if config.court.contains(landing.bounce.x, landing.bounce.y) {
        TerminalBasis::In
    } else {
        TerminalBasis::Out
    }
}

pub fn out_axis(court: &Court, x: f64, y: f64, hitter_far_side: bool) -> Option<OutAxis> {
    match (court.is_wide(x), court.is_long(y, hitter_far_side)) {
        (true, true) => Some(OutAxis::Both),
        (true, false) => Some(OutAxis::Wide),
        (false, true) => Some(OutAxis::Long),
        (false, false) => None,
    }
}

/// The point goes to the hitter of the last shot unless that shot is an error. Only resolvable
/// when the session has two ranked players.
pub fn resolve(
    config: &Config,
    participants: &Participants,
    shots: &[Shot<'_>],
    point: &Point,
    landings: &[Option<BounceMatch<'_>>],
) -> Option<Outcome> {
    let terminal_seq = point.shots.end.checked_sub(1).filter(|s| point.shots.contains(s))?;
    let shot = &shots[terminal_seq];
    let landing = landings[terminal_seq].as_ref();

    let basis = terminal_basis(config, shot, landing);
    let hitter_id = shot.player().to_owned();
    let winner_id = if basis.is_error() {
        participants.opponent(&hitter_id)?.to_owned()
    } else {
        hitter_id.clone()
    };

    let far = shot.orientation.is_far();
    let (is_wide, is_long, out_axis) = match landing {
        Some(l) => (
            Some(config.court.is_wide(l.bounce.x)),
            Some(config.court.is_long(l.bounce.y, far)),
            out_axis(&config.court, l.bounce.x, l.bounce.y, far),
        ),
        None => (None, None, None),
    };

    tracing::trace!(point = point.number, shot = shot.id(), ?basis, winner = %winner_id, "Point outcome");

    Some(Outcome {
        terminal_seq,
        hitter_id,
        basis,
        winner_id,
        is_wide,
        is_long,
        out_axis,
    })
}

#[tracing::instrument(name = "Outcomes", skip_all)]
pub fn resolve_all(
    config: &Config,
    participants: &Participants,
    shots: &[Shot<'_>],
    segmentation: &Segmentation,
    landings: &[Option<BounceMatch<'_>>],
) -> Vec<Option<Outcome>> {
    segmentation
        .points
        .iter()
        .map(|point| resolve(config, participants, shots, point, landings))
        .collect()
}

/// Serve placement lane 1-8 across the receiving court: 1-4 on the deuce side, 5-8 on the ad
/// side, mirrored so lane numbers read the same from either end.
pub fn serve_bucket(court: &Court, side: ServeSide, server_far_end: bool, x: f64) -> Option<u8> {
    if side == ServeSide::Unknown || !x.is_finite() {
        return None;
    }

    let x_eff = if server_far_end { x } else { court.width - x };
    let lane_width = court.width / 8.0;
    let clamped = x_eff.clamp(0.0, court.width - court.boundary_eps);
    let lane = (1 + (clamped / lane_width).floor() as i64).clamp(1, 8) as u8;

    Some(match side {
        ServeSide::Deuce if lane > 4 => lane - 4,
        ServeSide::Ad if lane < 5 => lane + 4,
        _ => lane,
    })
}

/// Quarter of the court width, seen from the hitter's end.
pub fn placement(court: &Court, hitter: Orientation, x: f64) -> Option<Lane> {
    if !x.is_finite() {
        return None;
    }

    let x_eff = if hitter.is_far() { court.width - x } else { x };
    let clamped = x_eff.clamp(0.0, court.width - court.boundary_eps);
    let quarter = (clamped / (court.width / 4.0)).floor() as i64;

    Some(match quarter.clamp(0, 3) {
        0 => Lane::A,
        1 => Lane::B,
        2 => Lane::C,
        _ => Lane::D,
    })
}

pub fn play(court: &Court, serve: bool, first_rally: bool, contact_y: Option<f64>) -> Play {
    if serve {
        Play::Serve
    } else if first_rally {
        Play::Return
    } else if contact_y.map(|y| court.is_net_zone(y)).unwrap_or(false) {
        Play::Net
    } else {
        Play::Baseline
    }
}
