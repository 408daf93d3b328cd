//! Decides, shot by shot, which detections belong to the live rally.
//!
//! Soft kills (same-player clusters, duplicate bounce claims) invalidate a single shot. Hard
//! breaks (timing gaps after the rally started, a late return) invalidate the shot and every
//! later shot of the point.

use common::BounceSource;

use crate::{
    bounce::BounceMatch,
    config::{Config, EvidenceWeights},
    normalize::Shot,
    segment::Segmentation,
    serve::Serves,
};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShotValidity {
    pub serve: bool,
    pub evidence_score: u32,
    pub cluster_kill: bool,
    pub bounce_kill: bool,
    pub between_serves: bool,
    pub valid: bool,
    /// Number of valid shots in the point up to and including this one.
    pub valid_shot_ix: u32,
    pub serve_try_ix: Option<u32>,
    pub is_serve_fault: Option<bool>,
    pub is_last_valid_in_point: bool,
    pub is_last_in_point: bool,
}

/// Shot indices are 1-based positions inside the point.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointValidity {
    pub start_serve_shot_ix: Option<u32>,
    pub first_rally_shot_ix: Option<u32>,
    pub last_valid_shot_ix: Option<u32>,
    pub last_valid_shot_ix_ns: Option<u32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Validity {
    pub shots: Vec<ShotValidity>,
    pub points: Vec<PointValidity>,
}

pub fn evidence_score(
    weights: &EvidenceWeights,
    landing: Option<&BounceMatch<'_>>,
    has_speed: bool,
    has_next_contact: bool,
) -> u32 {
    let mut score = 0;
    if landing.map(|m| m.source == BounceSource::Floor).unwrap_or(false) {
        score += weights.floor_source;
    }
    if landing.is_some() {
        score += weights.any_bounce;
    }
    if has_speed {
        score += weights.speed;
    }
    if has_next_contact {
        score += weights.next_contact;
    }
    score
}

#[tracing::instrument(name = "Validity", skip_all)]
pub fn evaluate(
    config: &Config,
    shots: &[Shot<'_>],
    serves: &Serves,
    segmentation: &Segmentation,
    landings: &[Option<BounceMatch<'_>>],
) -> Validity {
    let mut result: Vec<ShotValidity> = shots
        .iter()
        .enumerate()
        .map(|(seq, shot)| ShotValidity {
            serve: serves.is_serve(seq),
            evidence_score: evidence_score(
                &config.evidence,
                landings[seq].as_ref(),
                shot.event.ball_speed.is_some(),
                shots
                    .get(seq + 1)
                    .map(|n| n.event.contact_s.is_some())
                    .unwrap_or(false),
            ),
            ..Default::default()
        })
        .collect();

    cluster_kills(config, shots, segmentation, &mut result);
    bounce_kills(shots, landings, &mut result);

    let points = segmentation
        .points
        .iter()
        .map(|point| cascade(config, shots, point, &mut result))
        .collect();

    Validity {
        shots: result,
        points,
    }
}

/// Same-player shots within the cluster window: the weaker detection dies, the later one wins
/// ties. Serves are never clustered.
fn cluster_kills(
    config: &Config,
    shots: &[Shot<'_>],
    segmentation: &Segmentation,
    result: &mut [ShotValidity],
) {
    for point in segmentation.points.iter() {
        for seq in point.shots.clone() {
            if result[seq].serve {
                continue;
            }

            let shot = &shots[seq];
            let score = result[seq].evidence_score;
            let clusters_with = |other: usize| {
                let other_shot = &shots[other];
                other_shot.player() == shot.player()
                    && (shot.ord_s - other_shot.ord_s).abs() <= config.cluster_window_s
            };

            let prev_kill = seq > point.shots.start
                && clusters_with(seq - 1)
                && score < result[seq - 1].evidence_score;
            let next_kill = seq + 1 < point.shots.end
                && clusters_with(seq + 1)
                && score <= result[seq + 1].evidence_score;

            if prev_kill || next_kill {
                tracing::trace!(shot = shot.id(), score, "Cluster kill");
                result[seq].cluster_kill = true;
            }
        }
    }
}

/// Keeps one claimant per bounce: highest evidence, then floor sourced, then earliest, then
/// lowest shot id.
fn bounce_kills(
    shots: &[Shot<'_>],
    landings: &[Option<BounceMatch<'_>>],
    result: &mut [ShotValidity],
) {
    let mut claims = std::collections::BTreeMap::<u64, Vec<usize>>::new();
    for (seq, landing) in landings.iter().enumerate() {
        if let Some(m) = landing {
            claims.entry(m.bounce.bounce_id).or_default().push(seq);
        }
    }

    for (bounce_id, mut claimants) in claims.into_iter().filter(|(_, c)| c.len() > 1) {
        claimants.sort_by_key(|seq| {
            (
                std::cmp::Reverse(result[*seq].evidence_score),
                landings[*seq].map(|m| m.source != BounceSource::Floor),
                *seq,
                shots[*seq].id(),
            )
        });

        tracing::trace!(bounce_id, keep = shots[claimants[0]].id(), "Bounce claimed by several shots");
        for seq in claimants.into_iter().skip(1) {
            result[seq].bounce_kill = true;
        }
    }
}

/// One left to right pass over the point carrying the cascade flag.
fn cascade(
    config: &Config,
    shots: &[Shot<'_>],
    point: &crate::segment::Point,
    result: &mut [ShotValidity],
) -> PointValidity {
    let range = point.shots.clone();
    let ix_of = |seq: usize| (seq - range.start) as u32 + 1;

    let first_serve = range.clone().find(|seq| result[*seq].serve);
    let last_serve = range.clone().rev().find(|seq| result[*seq].serve);
    let first_rally = last_serve.and_then(|last| {
        (last + 1..range.end)
            .find(|seq| !result[*seq].serve && shots[*seq].player() != point.server_id)
    });

    let mut info = PointValidity {
        start_serve_shot_ix: last_serve.map(ix_of),
        first_rally_shot_ix: first_rally.map(ix_of),
        ..Default::default()
    };

    let mut cascading = false;
    let mut valid_count = 0;
    let mut serve_count = 0;
    for seq in range.clone() {
        let gap = (seq > range.start).then(|| shots[seq].ord_s - shots[seq - 1].ord_s);
        let within = |limit: f64| gap.map(|g| g <= limit).unwrap_or(false);

        let was_cascading = cascading;
        let shot = &mut result[seq];
        shot.between_serves = !shot.serve
            && matches!((first_serve, last_serve), (Some(f), Some(l)) if f < seq && seq < l);

        let valid = if shot.serve {
            true
        } else if shot.between_serves {
            false
        } else if Some(seq) == first_rally {
            let in_time = within(config.first_rally_gap_s);
            if !in_time {
                cascading = true;
            }
            in_time && !shot.cluster_kill && !shot.bounce_kill
        } else {
            let after_rally_start = first_rally.map(|r| seq > r).unwrap_or(false);
            if after_rally_start && !within(config.continuity_gap_s) {
                cascading = true;
            }

            !cascading
                && !shot.cluster_kill
                && !shot.bounce_kill
                && within(config.continuity_gap_s)
        };

        if cascading && !was_cascading {
            tracing::debug!(point = point.number, shot = shots[seq].id(), "Rally continuity broken");
        }

        if shot.serve {
            serve_count += 1;
            shot.serve_try_ix = Some(serve_count);
            shot.is_serve_fault = Some(first_rally.is_none() || Some(seq) != last_serve);
        }
        if valid {
            valid_count += 1;
            info.last_valid_shot_ix = Some(valid_count);
            if !shot.serve {
                info.last_valid_shot_ix_ns = Some(valid_count);
            }
        }
        shot.valid = valid;
        shot.valid_shot_ix = valid_count;
    }

    for seq in range {
        let shot = &mut result[seq];
        shot.is_last_valid_in_point =
            shot.valid && Some(shot.valid_shot_ix) == info.last_valid_shot_ix;
        shot.is_last_in_point =
            shot.valid && Some(shot.valid_shot_ix) == info.last_valid_shot_ix_ns;
    }

    info
}
