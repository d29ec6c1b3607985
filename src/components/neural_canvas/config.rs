use serde::Deserialize;

/// Tuning constants for the calm idle motion and the camera.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct CalmConfig {
	pub hub_attract: f64,
	pub hub_jiggle: f64,
	pub damping: f64,
	pub orbit_omega_min: f64,
	pub orbit_omega_max: f64,
	pub orbit_wobble_amp: f64,
	pub orbit_wobble_freq: f64,
	pub anchor_wobble_amp: f64,
	pub anchor_wobble_freq: f64,
	pub edge_base_alpha: f64,
	pub edge_pulse_amp: f64,
	pub edge_pulse_freq: f64,
	pub zoom_scale: f64,
	pub zoom_duration_ms: f64,
	pub unzoom_duration_ms: f64,
}

impl Default for CalmConfig {
	fn default() -> Self {
		Self {
			hub_attract: 0.005,
			hub_jiggle: 1.5,
			damping: 0.8,
			orbit_omega_min: 0.1,
			orbit_omega_max: 0.1,
			orbit_wobble_amp: 4.0,
			orbit_wobble_freq: 2.0,
			anchor_wobble_amp: 1.2,
			anchor_wobble_freq: 2.0,
			edge_base_alpha: 0.2,
			edge_pulse_amp: 0.005,
			edge_pulse_freq: 1.0,
			zoom_scale: 1.7,
			zoom_duration_ms: 1000.0,
			unzoom_duration_ms: 600.0,
		}
	}
}

/// Host-level configuration for one canvas instance.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
	pub calm: CalmConfig,
	pub shooting_count: usize,
	pub max_dpr: f64,
	pub well_lifetime_s: f64,
	pub well_strength: f64,
}

impl Default for CanvasConfig {
	fn default() -> Self {
		Self {
			calm: CalmConfig::default(),
			shooting_count: 25,
			max_dpr: 2.0,
			well_lifetime_s: 15.0,
			well_strength: 3000.0,
		}
	}
}

/// Frame delta cap in seconds.
pub const MAX_DT: f64 = 0.033;

/// Sizes derived from the viewport; every value is a clamped linear function
/// of `min(width, height)` (or of the width for hit radii).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Metrics {
	pub width: f64,
	pub height: f64,
}

impl Metrics {
	pub fn new(width: f64, height: f64) -> Self {
		Self {
			width: width.max(0.0),
			height: height.max(0.0),
		}
	}

	pub fn screen(&self) -> f64 {
		self.width.min(self.height)
	}

	fn scaled(&self, factor: f64, min: f64, max: f64) -> f64 {
		(self.screen() * factor).clamp(min, max)
	}

	pub fn hub_radius(&self) -> f64 {
		self.scaled(0.04, 20.0, 45.0)
	}

	pub fn satellite_radius(&self) -> (f64, f64) {
		(self.scaled(0.003, 1.5, 5.0), self.scaled(0.012, 6.0, 18.0))
	}

	pub fn orbit_band(&self) -> (f64, f64) {
		(self.scaled(0.08, 40.0, 100.0), self.scaled(0.12, 80.0, 150.0))
	}

	pub fn edge_distance(&self) -> f64 {
		self.scaled(0.15, 120.0, 200.0)
	}

	pub fn hub_hit_radius(&self) -> f64 {
		(self.width * 0.015).clamp(12.0, 20.0)
	}

	pub fn satellite_hit_radius(&self) -> f64 {
		(self.width * 0.008).clamp(4.0, 10.0)
	}

	pub fn skill_orbit(&self) -> f64 {
		self.scaled(0.15, 50.0, 100.0)
	}

	pub fn project_orbit(&self) -> f64 {
		self.scaled(0.25, 80.0, 180.0)
	}

	pub fn about_orbit(&self) -> f64 {
		self.scaled(0.2, 120.0, 180.0)
	}

	pub fn fact_orbit(&self) -> f64 {
		self.scaled(0.15, 50.0, 100.0)
	}

	pub fn contact_orbit(&self) -> f64 {
		self.scaled(0.1, 50.0, 100.0)
	}

	pub fn well_radius(&self) -> f64 {
		(self.width * 0.15).clamp(150.0, 400.0)
	}

	pub fn well_visual_radius(&self) -> f64 {
		(self.width * 0.09).clamp(35.0, 80.0)
	}

	pub fn well_margin(&self) -> f64 {
		(self.width * 0.08).min(40.0).max(25.0)
	}
}
