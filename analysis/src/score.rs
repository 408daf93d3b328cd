//! Rolls point winners into tennis game scores and a running games tally.

use crate::{normalize::Participants, outcome::Outcome, segment::Segmentation};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PointScore {
    pub server_points: u32,
    pub receiver_points: u32,
    pub text: String,
    pub is_game_end: bool,
    pub game_winner_id: Option<String>,
    pub games_server_after: u32,
    pub games_receiver_after: u32,
}

impl PointScore {
    pub fn game_score_after(&self) -> String {
        format!("{}-{}", self.games_server_after, self.games_receiver_after)
    }
}

pub fn point_call(points: u32) -> &'static str {
    match points {
        0 => "0",
        1 => "15",
        2 => "30",
        _ => "40",
    }
}

/// Server first. Once both sides have three points the calls collapse to deuce/advantage.
pub fn score_text(server: u32, receiver: u32) -> String {
    if server >= 3 && receiver >= 3 {
        return if server == receiver + 1 {
            "Ad-40".to_owned()
        } else if receiver == server + 1 {
            "40-Ad".to_owned()
        } else {
            "40-40".to_owned()
        };
    }

    format!("{}-{}", point_call(server), point_call(receiver))
}

pub fn is_game_won(server: u32, receiver: u32) -> bool {
    (server >= 4 || receiver >= 4) && server.abs_diff(receiver) >= 2
}

/// One score per point of `segmentation`, and the winner of each game.
#[tracing::instrument(name = "Score", skip_all)]
pub fn score(
    participants: &Participants,
    segmentation: &Segmentation,
    outcomes: &[Option<Outcome>],
) -> (Vec<Option<PointScore>>, Vec<Option<String>>) {
    let mut scores = vec![None; segmentation.points.len()];
    let mut game_winners = Vec::with_capacity(segmentation.games.len());
    let mut games_won = std::collections::BTreeMap::<&str, u32>::new();

    for game in segmentation.games.iter() {
        let server = game.server_id.as_str();
        let receiver = match participants.opponent(server) {
            Some(r) => r,
            None => {
                game_winners.push(None);
                continue;
            }
        };

        let mut server_points = 0;
        let mut receiver_points = 0;
        let mut winner = None;
        for idx in game.points.clone() {
            let outcome = match outcomes[idx].as_ref() {
                Some(o) => o,
                None => continue,
            };
            if outcome.winner_id == server {
                server_points += 1;
            } else {
                receiver_points += 1;
            }

            let is_game_end = is_game_won(server_points, receiver_points)
                && segmentation.is_last_point_of_game(idx);
            let game_winner_id = is_game_end.then(|| {
                if server_points > receiver_points {
                    server.to_owned()
                } else {
                    receiver.to_owned()
                }
            });
            if let Some(w) = game_winner_id.as_deref() {
                let w = if w == server { server } else { receiver };
                *games_won.entry(w).or_default() += 1;
                winner = game_winner_id.clone();
                tracing::debug!(game = game.number, winner = %w, "Game completed");
            }

            scores[idx] = Some(PointScore {
                server_points,
                receiver_points,
                text: score_text(server_points, receiver_points),
                is_game_end,
                game_winner_id,
                games_server_after: games_won.get(server).copied().unwrap_or(0),
                games_receiver_after: games_won.get(receiver).copied().unwrap_or(0),
            });
        }

        game_winners.push(winner);
    }

    (scores, game_winners)
}
