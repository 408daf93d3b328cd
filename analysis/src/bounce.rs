use common::{BounceEvent, BounceSource};

use crate::{config::Config, normalize::Shot};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BounceMatch<'e> {
    pub bounce: &'e BounceEvent,
    pub source: BounceSource,
}

/// Search window of a shot: `(start, end]` in session seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Window {
    pub start: f64,
    pub end: f64,
}

pub fn window(config: &Config, shot: &Shot<'_>, next_contact: Option<f64>) -> Window {
    let hit = shot.ord_s;
    let ceiling = hit + config.bounce_search_ceiling_s;
    let capped = next_contact.map(|n| n.min(ceiling)).unwrap_or(ceiling);

    Window {
        start: hit + config.bounce_start_guard_s,
        end: capped + config.bounce_trailing_guard_s,
    }
}

/// Earliest bounce in the window, floor bounces first, any bounce type as fallback.
pub fn find<'e>(window: Window, bounces: &[&'e BounceEvent]) -> Option<BounceMatch<'e>> {
    let first = bounces.partition_point(|b| b.timestamp_s <= window.start);
    let candidates = bounces[first..]
        .iter()
        .take_while(|b| b.timestamp_s <= window.end);

    if let Some(floor) = candidates.clone().find(|b| b.is_floor()) {
        return Some(BounceMatch {
            bounce: *floor,
            source: BounceSource::Floor,
        });
    }

    candidates.clone().next().map(|any| BounceMatch {
        bounce: *any,
        source: BounceSource::Any,
    })
}

/// One candidate landing per timeline shot. `bounces` must be time ordered.
#[tracing::instrument(name = "Bounces", skip_all)]
pub fn associate<'e>(
    config: &Config,
    shots: &[Shot<'_>],
    bounces: &[&'e BounceEvent],
) -> Vec<Option<BounceMatch<'e>>> {
    let matches: Vec<_> = shots
        .iter()
        .enumerate()
        .map(|(seq, shot)| {
            let next_contact = shots.get(seq + 1).and_then(|n| n.event.contact_s);
            let window = window(config, shot, next_contact);
            let found = find(window, bounces);

            tracing::trace!(shot = shot.id(), ?window, bounce = ?found.map(|m| m.bounce.bounce_id), "Bounce search");

            found
        })
        .collect();

    tracing::debug!(
        matched = matches.iter().filter(|m| m.is_some()).count(),
        shots = shots.len(),
        "Associated bounces"
    );

    matches
}
