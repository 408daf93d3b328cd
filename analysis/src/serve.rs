use common::ServeSide;

use crate::{court::Court, normalize::Shot};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrokeKind {
    Forehand,
    Backhand,
    Overhead,
    Volley,
    Other,
}

pub static STROKE_TYPES: phf::Map<&'static str, StrokeKind> = phf::phf_map! {
    "fh" => StrokeKind::Forehand,
    "forehand" => StrokeKind::Forehand,
    "bh" => StrokeKind::Backhand,
    "backhand" => StrokeKind::Backhand,
    "fh_overhead" => StrokeKind::Overhead,
    "fh-overhead" => StrokeKind::Overhead,
    "overhead" => StrokeKind::Overhead,
    "fh_volley" => StrokeKind::Volley,
    "bh_volley" => StrokeKind::Volley,
    "volley" => StrokeKind::Volley,
};

pub fn stroke_kind(stroke_type: Option<&str>) -> StrokeKind {
    stroke_type
        .and_then(|s| STROKE_TYPES.get(s.trim().to_ascii_lowercase().as_str()))
        .copied()
        .unwrap_or(StrokeKind::Other)
}

/// Overhead stroke with its contact inside the serve band of either baseline.
pub fn is_serve_eligible(court: &Court, shot: &Shot<'_>) -> bool {
    stroke_kind(shot.event.stroke_type.as_deref()) == StrokeKind::Overhead
        && shot
            .event
            .contact_y
            .map(|y| court.in_serve_band(y))
            .unwrap_or(false)
}

/// Median contact x of the serve eligible shots, interpolated between the two middle values.
pub fn centerline(court: &Court, shots: &[Shot<'_>]) -> Option<f64> {
    let mut xs: Vec<f64> = shots
        .iter()
        .filter(|s| is_serve_eligible(court, s))
        .filter_map(|s| s.event.contact_x)
        .filter(|x| x.is_finite())
        .collect();
    if xs.is_empty() {
        return None;
    }
    xs.sort_by(f64::total_cmp);

    let mid = xs.len() / 2;
    if xs.len() % 2 == 1 {
        Some(xs[mid])
    } else {
        Some((xs[mid - 1] + xs[mid]) / 2.0)
    }
}

/// From the near half the deuce court is left of the centerline, from the far half it is right.
pub fn serve_side(court: &Court, centerline: Option<f64>, x: Option<f64>, y: Option<f64>) -> ServeSide {
    let (center, x, y) = match (centerline, x, y) {
        (Some(c), Some(x), Some(y)) => (c, x, y),
        _ => return ServeSide::Unknown,
    };

    let deuce = if court.is_near_half(y) {
        x < center
    } else {
        x > center
    };

    if deuce {
        ServeSide::Deuce
    } else {
        ServeSide::Ad
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Serve {
    /// Position of the serve in the session timeline.
    pub seq: usize,
    pub shot_id: u64,
    pub server_id: String,
    pub ord_s: f64,
    pub side: ServeSide,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Serves {
    pub centerline: Option<f64>,
    pub serves: Vec<Serve>,
}

impl Serves {
    pub fn is_serve(&self, seq: usize) -> bool {
        self.serves.binary_search_by_key(&seq, |s| s.seq).is_ok()
    }
}

#[tracing::instrument(name = "Serves", skip_all)]
pub fn detect(court: &Court, shots: &[Shot<'_>]) -> Serves {
    let centerline = centerline(court, shots);

    let serves: Vec<Serve> = shots
        .iter()
        .enumerate()
        .filter(|(_, shot)| is_serve_eligible(court, shot))
        .map(|(seq, shot)| Serve {
            seq,
            shot_id: shot.id(),
            server_id: shot.player().to_owned(),
            ord_s: shot.ord_s,
            side: serve_side(court, centerline, shot.event.contact_x, shot.event.contact_y),
        })
        .collect();

    tracing::debug!(?centerline, count = serves.len(), "Detected serves");

    Serves { centerline, serves }
}
