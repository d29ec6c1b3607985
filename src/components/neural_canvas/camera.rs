use log::info;

use super::config::{CalmConfig, Metrics};
use super::types::Point;

const REDUCED_ZOOM_MS: f64 = 250.0;
const REDUCED_UNZOOM_MS: f64 = 200.0;

pub fn ease_in_out_quad(t: f64) -> f64 {
	if t < 0.5 {
		2.0 * t * t
	} else {
		1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
	}
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraTransform {
	pub sx: f64,
	pub sy: f64,
	pub tx: f64,
	pub ty: f64,
}

impl Default for CameraTransform {
	fn default() -> Self {
		Self::IDENTITY
	}
}

impl CameraTransform {
	pub const IDENTITY: Self = Self {
		sx: 1.0,
		sy: 1.0,
		tx: 0.0,
		ty: 0.0,
	};

	/// Scales by `scale` and centres `anchor` in the viewport.
	pub fn focused(anchor: Point, metrics: Metrics, scale: f64) -> Self {
		Self {
			sx: scale,
			sy: scale,
			tx: metrics.width / 2.0 - anchor.x * scale,
			ty: metrics.height / 2.0 - anchor.y * scale,
		}
	}

	pub fn to_screen(&self, p: Point) -> Point {
		Point::new(p.x * self.sx + self.tx, p.y * self.sy + self.ty)
	}

	pub fn to_world(&self, p: Point) -> Point {
		Point::new((p.x - self.tx) / self.sx, (p.y - self.ty) / self.sy)
	}

	fn lerp(&self, to: &Self, t: f64) -> Self {
		Self {
			sx: self.sx + (to.sx - self.sx) * t,
			sy: self.sy + (to.sy - self.sy) * t,
			tx: self.tx + (to.tx - self.tx) * t,
			ty: self.ty + (to.ty - self.ty) * t,
		}
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CameraPhase {
	Idle,
	ZoomingIn,
	Expanded,
	ZoomingOut,
}

/// Reported by [`Camera::advance`] when an animation lands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CameraSettled {
	Expanded,
	Collapsed,
}

#[derive(Clone, Debug, PartialEq)]
struct ZoomAnimation {
	from: CameraTransform,
	to: CameraTransform,
	elapsed_ms: f64,
	duration_ms: f64,
}

impl ZoomAnimation {
	fn progress(&self) -> f64 {
		if self.duration_ms <= 0.0 {
			1.0
		} else {
			(self.elapsed_ms / self.duration_ms).clamp(0.0, 1.0)
		}
	}
}

/// Camera transform plus the expand/collapse state machine. Only one
/// animation exists at a time; starting another replaces it.
#[derive(Clone, Debug)]
pub struct Camera {
	pub transform: CameraTransform,
	pub phase: CameraPhase,
	pub expanded: Option<String>,
	/// Hub label opacity, faded out while zoomed in.
	pub label_fade: f64,
	/// Expanded content opacity.
	pub expanded_fade: f64,
	animation: Option<ZoomAnimation>,
}

impl Default for Camera {
	fn default() -> Self {
		Self {
			transform: CameraTransform::IDENTITY,
			phase: CameraPhase::Idle,
			expanded: None,
			label_fade: 1.0,
			expanded_fade: 1.0,
			animation: None,
		}
	}
}

impl Camera {
	pub fn zoom_to(
		&mut self,
		cluster: &str,
		anchor: Point,
		metrics: Metrics,
		calm: &CalmConfig,
		reduced_motion: bool,
	) {
		let duration_ms = if reduced_motion {
			REDUCED_ZOOM_MS
		} else {
			calm.zoom_duration_ms
		};
		info!("zooming into cluster {cluster}");
		self.expanded = Some(cluster.to_string());
		self.phase = CameraPhase::ZoomingIn;
		self.animation = Some(ZoomAnimation {
			from: self.transform,
			to: CameraTransform::focused(anchor, metrics, calm.zoom_scale),
			elapsed_ms: 0.0,
			duration_ms,
		});
	}

	/// Starts the collapse animation. Returns `false` if there is nothing to
	/// collapse or a collapse is already running.
	pub fn collapse(&mut self, calm: &CalmConfig, reduced_motion: bool) -> bool {
		if self.expanded.is_none() || self.phase == CameraPhase::ZoomingOut {
			return false;
		}
		let duration_ms = if reduced_motion {
			REDUCED_UNZOOM_MS
		} else {
			calm.unzoom_duration_ms
		};
		info!("collapsing cluster {:?}", self.expanded);
		self.phase = CameraPhase::ZoomingOut;
		self.animation = Some(ZoomAnimation {
			from: self.transform,
			to: CameraTransform::IDENTITY,
			elapsed_ms: 0.0,
			duration_ms,
		});
		true
	}

	/// Advances the running animation by real elapsed time.
	pub fn advance(&mut self, dt_ms: f64) -> Option<CameraSettled> {
		let anim = self.animation.as_mut()?;
		anim.elapsed_ms += dt_ms.max(0.0);
		let t = anim.progress();
		self.transform = anim.from.lerp(&anim.to, ease_in_out_quad(t));

		match self.phase {
			CameraPhase::ZoomingIn => {
				self.label_fade = (1.0 - t * 1.2).max(0.0);
				self.expanded_fade = (t * 1.5).min(1.0);
			}
			CameraPhase::ZoomingOut => {
				self.label_fade = (t * 2.0).min(1.0);
				self.expanded_fade = (1.0 - t * 1.5).max(0.0);
			}
			CameraPhase::Idle | CameraPhase::Expanded => {}
		}

		if t < 1.0 {
			return None;
		}
		self.transform = anim.to;
		self.animation = None;
		match self.phase {
			CameraPhase::ZoomingIn => {
				self.phase = CameraPhase::Expanded;
				Some(CameraSettled::Expanded)
			}
			CameraPhase::ZoomingOut => {
				self.phase = CameraPhase::Idle;
				self.expanded = None;
				self.label_fade = 1.0;
				self.expanded_fade = 1.0;
				Some(CameraSettled::Collapsed)
			}
			CameraPhase::Idle | CameraPhase::Expanded => None,
		}
	}

	/// Ends any animation at its destination. A cluster that stays expanded is
	/// refocused on `anchor`; used when the viewport changes under the camera.
	pub fn snap(&mut self, anchor: Option<Point>, metrics: Metrics, calm: &CalmConfig) -> Option<CameraSettled> {
		self.animation = None;
		match (self.phase, anchor) {
			(CameraPhase::ZoomingIn | CameraPhase::Expanded, Some(anchor)) => {
				let settled = (self.phase == CameraPhase::ZoomingIn).then_some(CameraSettled::Expanded);
				self.transform = CameraTransform::focused(anchor, metrics, calm.zoom_scale);
				self.phase = CameraPhase::Expanded;
				self.label_fade = 0.0;
				self.expanded_fade = 1.0;
				settled
			}
			(CameraPhase::ZoomingOut, _) => {
				*self = Self::default();
				Some(CameraSettled::Collapsed)
			}
			_ => {
				*self = Self::default();
				None
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn close(a: f64, b: f64) -> bool {
		(a - b).abs() < 1e-9
	}

	#[test]
	fn easing_endpoints() {
		assert_eq!(ease_in_out_quad(0.0), 0.0);
		assert_eq!(ease_in_out_quad(1.0), 1.0);
		assert!(close(ease_in_out_quad(0.5), 0.5));
	}

	#[test]
	fn inversion_round_trips_under_zoom() {
		let m = Metrics::new(1200.0, 800.0);
		let t = CameraTransform::focused(Point::new(264.0, 280.0), m, 1.7);
		let world = Point::new(123.4, 567.8);
		let back = t.to_world(t.to_screen(world));
		assert!(close(back.x, world.x) && close(back.y, world.y));
		let centre = t.to_screen(Point::new(264.0, 280.0));
		assert!(close(centre.x, 600.0) && close(centre.y, 400.0));
	}

	#[test]
	fn zoom_in_lands_on_focused_transform() {
		let calm = CalmConfig::default();
		let m = Metrics::new(1200.0, 800.0);
		let anchor = Point::new(264.0, 280.0);
		let mut cam = Camera::default();
		cam.zoom_to("frontend", anchor, m, &calm, false);
		assert_eq!(cam.phase, CameraPhase::ZoomingIn);
		assert_eq!(cam.advance(16.0), None);
		assert_ne!(cam.transform, CameraTransform::IDENTITY);

		let mut settled = None;
		for _ in 0..100 {
			if let Some(s) = cam.advance(16.0) {
				settled = Some(s);
				break;
			}
		}
		assert_eq!(settled, Some(CameraSettled::Expanded));
		assert_eq!(cam.phase, CameraPhase::Expanded);
		let target = CameraTransform::focused(anchor, m, 1.7);
		assert!(close(cam.transform.sx, 1.7) && close(cam.transform.sy, 1.7));
		assert!(close(cam.transform.tx, target.tx) && close(cam.transform.ty, target.ty));
		assert_eq!(cam.label_fade, 0.0);
		assert_eq!(cam.expanded_fade, 1.0);
	}

	#[test]
	fn collapse_returns_exactly_to_identity() {
		let calm = CalmConfig::default();
		let m = Metrics::new(1200.0, 800.0);
		let mut cam = Camera::default();
		cam.zoom_to("ai", Point::new(360.0, 560.0), m, &calm, false);
		cam.advance(2_000.0);
		assert!(cam.collapse(&calm, false));
		assert!(!cam.collapse(&calm, false));
		assert_eq!(cam.advance(300.0), None);
		assert_eq!(cam.expanded.as_deref(), Some("ai"));
		assert_eq!(cam.advance(300.0), Some(CameraSettled::Collapsed));
		assert_eq!(cam.transform, CameraTransform::IDENTITY);
		assert_eq!(cam.expanded, None);
		assert_eq!(cam.phase, CameraPhase::Idle);
	}

	#[test]
	fn collapse_mid_zoom_starts_from_current_transform() {
		let calm = CalmConfig::default();
		let m = Metrics::new(1200.0, 800.0);
		let mut cam = Camera::default();
		cam.zoom_to("cloud", Point::new(840.0, 560.0), m, &calm, false);
		cam.advance(500.0);
		let mid = cam.transform;
		assert!(cam.collapse(&calm, false));
		cam.advance(0.0);
		assert_eq!(cam.transform, mid);
		cam.advance(600.0);
		assert_eq!(cam.transform, CameraTransform::IDENTITY);
	}

	#[test]
	fn reduced_motion_shortens_zoom() {
		let calm = CalmConfig::default();
		let mut cam = Camera::default();
		cam.zoom_to("ai", Point::new(0.0, 0.0), Metrics::new(800.0, 600.0), &calm, true);
		assert_eq!(cam.advance(250.0), Some(CameraSettled::Expanded));
	}

	#[test]
	fn snap_refocuses_or_finishes_collapse() {
		let calm = CalmConfig::default();
		let mut cam = Camera::default();
		cam.zoom_to("ai", Point::new(360.0, 560.0), Metrics::new(1200.0, 800.0), &calm, false);
		cam.advance(100.0);
		let small = Metrics::new(800.0, 600.0);
		let anchor = Point::new(240.0, 420.0);
		assert_eq!(cam.snap(Some(anchor), small, &calm), Some(CameraSettled::Expanded));
		assert_eq!(cam.transform, CameraTransform::focused(anchor, small, 1.7));
		assert!(cam.animation.is_none());

		assert!(cam.collapse(&calm, false));
		assert_eq!(cam.snap(Some(anchor), small, &calm), Some(CameraSettled::Collapsed));
		assert_eq!(cam.transform, CameraTransform::IDENTITY);
		assert_eq!(cam.expanded, None);
	}

	#[test]
	fn collapse_without_expansion_is_a_no_op() {
		let mut cam = Camera::default();
		assert!(!cam.collapse(&CalmConfig::default(), false));
		assert_eq!(cam.advance(16.0), None);
	}
}
