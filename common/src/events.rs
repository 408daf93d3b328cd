/// One detected swing, as produced by the ingestion layer.
///
/// Timestamps are seconds from the session-local zero point, positions are meters in the shared
/// court frame (x across the court, y from the near baseline toward the far one).
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ShotEvent {
    pub session_id: String,
    pub shot_id: u64,
    pub participant_id: String,
    #[serde(default)]
    pub start_s: Option<f64>,
    #[serde(default)]
    pub end_s: Option<f64>,
    #[serde(default)]
    pub contact_s: Option<f64>,
    #[serde(default)]
    pub contact_x: Option<f64>,
    #[serde(default)]
    pub contact_y: Option<f64>,
    #[serde(default)]
    pub stroke_type: Option<String>,
    #[serde(default)]
    pub ball_speed: Option<f64>,
    #[serde(default)]
    pub confidence: Option<f64>,
}

impl ShotEvent {
    /// The time used to order shots: contact, falling back to the swing start.
    pub fn ordering_s(&self) -> Option<f64> {
        self.contact_s.or(self.start_s)
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BounceEvent {
    pub session_id: String,
    pub bounce_id: u64,
    pub timestamp_s: f64,
    pub x: f64,
    pub y: f64,
    pub bounce_type: String,
    #[serde(default)]
    pub hitter_participant_id: Option<String>,
}

pub const FLOOR_BOUNCE: &str = "floor";

impl BounceEvent {
    pub fn is_floor(&self) -> bool {
        self.bounce_type.eq_ignore_ascii_case(FLOOR_BOUNCE)
    }
}

/// Both input streams of a single session.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SessionEvents {
    pub session_id: String,
    #[serde(default)]
    pub shots: Vec<ShotEvent>,
    #[serde(default)]
    pub bounces: Vec<BounceEvent>,
}
