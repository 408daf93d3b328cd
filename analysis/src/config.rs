use crate::court::Court;

/// Points added to a shot's evidence score for each piece of supporting data.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct EvidenceWeights {
    pub floor_source: u32,
    pub any_bounce: u32,
    pub speed: u32,
    pub next_contact: u32,
}

impl Default for EvidenceWeights {
    fn default() -> Self {
        Self {
            floor_source: 2,
            any_bounce: 1,
            speed: 1,
            next_contact: 1,
        }
    }
}

/// Calibration constants of the reconstruction.
///
/// The defaults are the empirically chosen values the pipeline has been tuned with. They are
/// calibration targets, so every one of them can be overridden from a (partial) JSON document.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Config {
    pub court: Court,
    /// Same-player shots closer than this are treated as one detection.
    pub cluster_window_s: f64,
    /// Maximum gap between consecutive shots of a live rally.
    pub continuity_gap_s: f64,
    /// Maximum gap between the starting serve and the return.
    pub first_rally_gap_s: f64,
    pub bounce_search_ceiling_s: f64,
    pub bounce_start_guard_s: f64,
    pub bounce_trailing_guard_s: f64,
    pub evidence: EvidenceWeights,
    /// Treat a terminal landing taken from a non-floor bounce as an error instead of judging its
    /// location.
    pub non_floor_landing_is_error: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            court: Court::default(),
            cluster_window_s: 2.0,
            continuity_gap_s: 4.0,
            first_rally_gap_s: 2.0,
            bounce_search_ceiling_s: 2.5,
            bounce_start_guard_s: 0.005,
            bounce_trailing_guard_s: 0.020,
            evidence: EvidenceWeights::default(),
            non_floor_landing_is_error: false,
        }
    }
}
