//! Merges one session's shots and bounces into a time ordered view and resolves the two players
//! of the match.

use common::{BounceEvent, SessionEvents, ShotEvent};

use crate::{court::Court, error::ReconstructError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Far,
    Near,
}

impl Orientation {
    pub fn is_far(&self) -> bool {
        matches!(self, Self::Far)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Participant {
    pub id: String,
    pub rank: u8,
    pub shot_count: usize,
    pub avg_contact_y: Option<f64>,
    pub orientation: Orientation,
}

/// The ranked players of a session, keyed by participant id. Built once and handed to every
/// later stage.
#[derive(Debug, Clone, PartialEq)]
pub struct Participants {
    players: Vec<Participant>,
}

impl Participants {
    pub fn get(&self, id: &str) -> Option<&Participant> {
        self.players.iter().find(|p| p.id == id)
    }

    pub fn ids(&self) -> Vec<String> {
        self.players.iter().map(|p| p.id.clone()).collect()
    }

    pub fn is_match(&self) -> bool {
        self.players.len() == 2
    }

    pub fn opponent(&self, id: &str) -> Option<&str> {
        if !self.is_match() || self.get(id).is_none() {
            return None;
        }

        self.players
            .iter()
            .find(|p| p.id != id)
            .map(|p| p.id.as_str())
    }
}

/// A shot of one of the ranked players, with its resolved ordering time.
#[derive(Debug, Clone, PartialEq)]
pub struct Shot<'e> {
    pub event: &'e ShotEvent,
    pub ord_s: f64,
    pub rank: u8,
    pub orientation: Orientation,
}

impl<'e> Shot<'e> {
    pub fn id(&self) -> u64 {
        self.event.shot_id
    }

    pub fn player(&self) -> &'e str {
        &self.event.participant_id
    }
}

#[derive(Debug)]
pub struct Timeline<'e> {
    pub session_id: &'e str,
    pub participants: Participants,
    /// Ranked, timed shots, ordered by time then shot id.
    pub shots: Vec<Shot<'e>>,
    /// Shots excluded from point logic: no timestamp, or not by a ranked player.
    pub unattached: Vec<&'e ShotEvent>,
    /// Ordered by time then bounce id.
    pub bounces: Vec<&'e BounceEvent>,
}

#[tracing::instrument(name = "Normalize", skip(court, events), fields(session = %events.session_id))]
pub fn normalize<'e>(
    court: &Court,
    events: &'e SessionEvents,
) -> Result<Timeline<'e>, ReconstructError> {
    let session_shots: Vec<&ShotEvent> = events
        .shots
        .iter()
        .filter(|s| {
            let own = s.session_id == events.session_id;
            if !own {
                tracing::warn!(shot = s.shot_id, other = %s.session_id, "Dropping shot of foreign session");
            }
            own
        })
        .collect();

    if session_shots.is_empty() {
        return Err(ReconstructError::NoParticipants {
            session_id: events.session_id.clone(),
        });
    }
    if session_shots.iter().all(|s| s.ordering_s().is_none()) {
        return Err(ReconstructError::MissingTimestamps {
            session_id: events.session_id.clone(),
        });
    }

    let participants = rank_participants(court, &session_shots);
    tracing::debug!(players = ?participants.ids(), "Ranked participants");

    let mut shots = Vec::with_capacity(session_shots.len());
    let mut unattached = Vec::new();
    for event in session_shots {
        let (participant, ord_s) = match (
            participants.get(&event.participant_id),
            event.ordering_s().filter(|t| t.is_finite()),
        ) {
            (Some(p), Some(t)) => (p, t),
            (None, _) => {
                tracing::trace!(shot = event.shot_id, player = %event.participant_id, "Shot by unranked participant");
                unattached.push(event);
                continue;
            }
            (Some(_), None) => {
                tracing::warn!(shot = event.shot_id, "Shot without contact or start time");
                unattached.push(event);
                continue;
            }
        };

        shots.push(Shot {
            event,
            ord_s,
            rank: participant.rank,
            orientation: participant.orientation,
        });
    }
    shots.sort_by(|a, b| a.ord_s.total_cmp(&b.ord_s).then(a.id().cmp(&b.id())));

    let mut bounces: Vec<&BounceEvent> = events
        .bounces
        .iter()
        .filter(|b| b.session_id == events.session_id && b.timestamp_s.is_finite())
        .collect();
    bounces.sort_by(|a, b| {
        a.timestamp_s
            .total_cmp(&b.timestamp_s)
            .then(a.bounce_id.cmp(&b.bounce_id))
    });

    Ok(Timeline {
        session_id: &events.session_id,
        participants,
        shots,
        unattached,
        bounces,
    })
}

/// Top two participants by shot count, ties broken by ascending id.
fn rank_participants(court: &Court, shots: &[&ShotEvent]) -> Participants {
    let mut per_player = std::collections::BTreeMap::<&str, (usize, f64, usize)>::new();
    for shot in shots {
        let entry = per_player.entry(shot.participant_id.as_str()).or_default();
        entry.0 += 1;
        if let Some(y) = shot.contact_y.filter(|y| y.is_finite()) {
            entry.1 += y;
            entry.2 += 1;
        }
    }

    let mut counted: Vec<_> = per_player.into_iter().collect();
    counted.sort_by(|(a_id, a), (b_id, b)| b.0.cmp(&a.0).then(a_id.cmp(b_id)));

    let players = counted
        .into_iter()
        .take(2)
        .enumerate()
        .map(|(i, (id, (count, sum_y, n_y)))| {
            let avg_contact_y = (n_y > 0).then(|| sum_y / n_y as f64);
            let orientation = match avg_contact_y {
                Some(avg) if avg >= court.half_length() => Orientation::Far,
                _ => Orientation::Near,
            };

            Participant {
                id: id.to_owned(),
                rank: i as u8 + 1,
                shot_count: count,
                avg_contact_y,
                orientation,
            }
        })
        .collect();

    Participants { players }
}
