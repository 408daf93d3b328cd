//! Court geometry in the shared frame: x runs across the court from `0` to `width`, y runs from
//! the near baseline (`0`) to the far baseline (`length`).

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Court {
    pub width: f64,
    pub length: f64,
    pub service_box_depth: f64,
    /// Distance from a baseline within which an overhead counts as a serve contact.
    pub serve_band_eps: f64,
    pub boundary_eps: f64,
}

impl Default for Court {
    fn default() -> Self {
        Self {
            width: 8.23,
            length: 23.77,
            service_box_depth: 6.40,
            serve_band_eps: 0.50,
            boundary_eps: 0.00001,
        }
    }
}

impl Court {
    pub fn half_width(&self) -> f64 {
        self.width / 2.0
    }

    pub fn half_length(&self) -> f64 {
        self.length / 2.0
    }

    pub fn in_serve_band(&self, y: f64) -> bool {
        y <= self.serve_band_eps || y >= self.length - self.serve_band_eps
    }

    pub fn is_near_half(&self, y: f64) -> bool {
        y < self.half_length()
    }

    pub fn is_wide(&self, x: f64) -> bool {
        x < 0.0 || x > self.width
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        (0.0..=self.width).contains(&x) && (0.0..=self.length).contains(&y)
    }

    /// Past the baseline the hitter is facing.
    pub fn is_long(&self, y: f64, hitter_far_side: bool) -> bool {
        if hitter_far_side {
            y < 0.0
        } else {
            y > self.length
        }
    }

    /// Within the service-box depth of the net.
    pub fn is_net_zone(&self, y: f64) -> bool {
        (y - self.half_length()).abs() <= self.service_box_depth
    }
}
