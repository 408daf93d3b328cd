//! Splits the serve stream into points and games.
//!
//! A point starts at every serve whose side differs from the previous serve's side, a game at
//! every serve whose server differs from the previous server. A new game always starts a new
//! point. Every shot from a point's first serve up to the next point's first serve belongs to
//! that point.

use common::ServeSide;

use crate::serve::Serves;

#[derive(Debug, Clone, PartialEq)]
pub struct Point {
    pub number: u32,
    pub game_number: u32,
    pub point_in_game: u32,
    pub server_id: String,
    pub side: ServeSide,
    /// Timeline positions of the point's shots.
    pub shots: std::ops::Range<usize>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Game {
    pub number: u32,
    pub server_id: String,
    /// Indices into [`Segmentation::points`].
    pub points: std::ops::Range<usize>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Segmentation {
    pub points: Vec<Point>,
    pub games: Vec<Game>,
}

impl Segmentation {
    /// Index of the point containing the shot at `seq`.
    pub fn point_index(&self, seq: usize) -> Option<usize> {
        let idx = self.points.partition_point(|p| p.shots.start <= seq);
        let idx = idx.checked_sub(1)?;
        self.points[idx].shots.contains(&seq).then_some(idx)
    }

    pub fn game(&self, number: u32) -> Option<&Game> {
        self.games.iter().find(|g| g.number == number)
    }

    pub fn is_last_point_of_game(&self, point: usize) -> bool {
        let number = self.points[point].game_number;
        self.game(number)
            .map(|g| g.points.end == point + 1)
            .unwrap_or(false)
    }
}

#[tracing::instrument(name = "Segment", skip_all)]
pub fn segment(serves: &Serves, shot_count: usize) -> Segmentation {
    let mut result = Segmentation::default();

    let mut previous: Option<&crate::serve::Serve> = None;
    for serve in serves.serves.iter() {
        let new_game = previous
            .map(|p| p.server_id != serve.server_id)
            .unwrap_or(true);
        let new_point = new_game || previous.map(|p| p.side != serve.side).unwrap_or(true);
        previous = Some(serve);

        if !new_point {
            continue;
        }

        if let Some(last) = result.points.last_mut() {
            last.shots.end = serve.seq;
        }

        if new_game {
            if let Some(game) = result.games.last_mut() {
                game.points.end = result.points.len();
            }
            result.games.push(Game {
                number: result.games.len() as u32 + 1,
                server_id: serve.server_id.clone(),
                points: result.points.len()..result.points.len(),
            });
        }

        let game = result
            .games
            .last()
            .map(|g| (g.number, result.points.len() - g.points.start))
            .unwrap_or((1, 0));

        result.points.push(Point {
            number: result.points.len() as u32 + 1,
            game_number: game.0,
            point_in_game: game.1 as u32 + 1,
            server_id: serve.server_id.clone(),
            side: serve.side,
            shots: serve.seq..shot_count,
        });
    }

    if let Some(game) = result.games.last_mut() {
        game.points.end = result.points.len();
    }

    tracing::debug!(
        points = result.points.len(),
        games = result.games.len(),
        "Segmented serve stream"
    );

    result
}
