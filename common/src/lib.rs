mod events;
pub use events::{BounceEvent, SessionEvents, ShotEvent, FLOOR_BOUNCE};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServeSide {
    Deuce,
    Ad,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BounceSource {
    Floor,
    Any,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminalBasis {
    NoSpeed,
    NoBounce,
    In,
    Out,
}

impl TerminalBasis {
    pub fn is_error(&self) -> bool {
        !matches!(self, Self::In)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutAxis {
    Both,
    Wide,
    Long,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Play {
    Serve,
    Return,
    Net,
    Baseline,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Lane {
    A,
    B,
    C,
    D,
}

/// One row of the point log, one per input shot.
///
/// Point level fields (score, games) are repeated on every row of the point. Terminal fields are
/// only set on the point's last shot.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PointLogRow {
    pub session_id: String,
    pub shot_id: u64,
    pub participant_id: String,
    /// 1 or 2 for the match's players, unset for anyone else.
    pub participant_rank: Option<u8>,
    pub start_s: Option<f64>,
    pub end_s: Option<f64>,
    pub contact_s: Option<f64>,
    pub contact_x: Option<f64>,
    pub contact_y: Option<f64>,
    pub ball_speed: Option<f64>,
    pub stroke_type: Option<String>,

    pub bounce_id: Option<u64>,
    pub bounce_s: Option<f64>,
    pub bounce_type: Option<String>,
    pub bounce_x: Option<f64>,
    pub bounce_y: Option<f64>,
    pub bounce_source: Option<BounceSource>,
    pub bounce_hitter_id: Option<String>,
    pub bounce_in_court: Option<bool>,
    pub why_null: Option<String>,

    pub serve: bool,
    pub serve_try_ix_in_point: Option<u32>,
    pub is_serve_fault: Option<bool>,
    pub first_rally_shot_ix: Option<u32>,
    pub start_serve_shot_ix: Option<u32>,

    pub point_number: Option<u32>,
    pub game_number: Option<u32>,
    pub point_in_game: Option<u32>,
    pub serving_side: Option<ServeSide>,
    pub server_id: Option<String>,
    pub shot_ix: Option<u32>,
    pub last_shot_ix: Option<u32>,

    pub between_serves: bool,
    pub cluster_kill: bool,
    pub bounce_kill: bool,
    pub evidence_score: u32,
    pub valid: bool,
    pub valid_shot_ix: u32,
    pub is_last_valid_in_point: bool,
    pub is_last_in_point: bool,

    pub player_is_far_side: Option<bool>,
    pub terminal_basis: Option<TerminalBasis>,
    pub point_winner_id: Option<String>,
    pub is_wide_last: Option<bool>,
    pub is_long_last: Option<bool>,
    pub out_axis_last: Option<OutAxis>,
    pub serve_bucket: Option<u8>,
    pub placement: Option<Lane>,
    pub play: Option<Play>,

    pub point_score: Option<String>,
    pub is_game_end: Option<bool>,
    pub game_winner_id: Option<String>,
    pub games_server_after: Option<u32>,
    pub games_receiver_after: Option<u32>,
    pub game_score_after: Option<String>,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PointSummary {
    pub point_number: u32,
    pub game_number: u32,
    pub point_in_game: u32,
    pub server_id: String,
    pub serving_side: ServeSide,
    pub terminal_shot_id: u64,
    pub terminal_basis: TerminalBasis,
    pub winner_id: String,
    pub valid_chain_len: u32,
    pub point_score: String,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct GameSummary {
    pub game_number: u32,
    pub server_id: String,
    pub winner_id: Option<String>,
    pub points: u32,
}

/// The full reconstruction output for one session. Regenerated on every run.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PointLog {
    pub session_id: String,
    pub players: Vec<String>,
    pub rows: Vec<PointLogRow>,
    pub points: Vec<PointSummary>,
    pub games: Vec<GameSummary>,
}

impl PointLog {
    pub fn empty(session_id: String) -> Self {
        Self {
            session_id,
            players: Vec::new(),
            rows: Vec::new(),
            points: Vec::new(),
            games: Vec::new(),
        }
    }
}
