//! World-space layout of the content orbiting an expanded hub. Drawing and
//! hit-testing both read the same [`ExpandedLayout`], rebuilt every frame.

use std::collections::HashSet;
use std::f64::consts::{PI, TAU};

use super::config::Metrics;
use super::hit::{FactSource, HitRegion, HitTarget};
use super::types::{AboutSection, PortfolioContent, Point, Rgb};

const GEM_RADIUS: f64 = 12.0;
const GEM_HIT_PAD: f64 = 6.0;
const FACT_HIT_RADIUS: f64 = 20.0;
const CONTACT_LABEL_LIFT: f64 = 22.0;
/// Contact id that opens the message form instead of a URL.
pub const MESSAGE_CONTACT: &str = "message";

/// Faint circle drawn along a ring.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OrbitGuide {
	pub radius: f64,
	pub alpha: f64,
}

/// A pill-shaped text chip.
#[derive(Clone, Debug, PartialEq)]
pub struct Chip {
	pub x: f64,
	pub y: f64,
	pub label: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LabelStyle {
	/// Translucent pill floating above the gem.
	Pill,
	/// Chip in the cluster colour above the gem.
	Chip,
}

/// A gem-style marker with a label.
#[derive(Clone, Debug, PartialEq)]
pub struct Marker {
	pub x: f64,
	pub y: f64,
	pub r: f64,
	pub label: String,
	pub style: LabelStyle,
	/// Draw the attention ring shown until the target is visited.
	pub first_view: bool,
}

impl Marker {
	/// Centre of the label chip for [`LabelStyle::Chip`] markers.
	pub fn chip_anchor(&self) -> Point {
		Point::new(self.x, self.y - CONTACT_LABEL_LIFT)
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct ExpandedLayout {
	pub cluster: String,
	pub color: Rgb,
	pub centre: Point,
	pub guides: Vec<OrbitGuide>,
	pub chips: Vec<Chip>,
	pub markers: Vec<Marker>,
	pub hits: Vec<HitRegion>,
}

/// Inputs shared by every ring.
#[derive(Clone, Copy, Debug)]
pub struct RingClock {
	pub time: f64,
	pub reduced_motion: bool,
}

impl RingClock {
	fn angle(&self, speed: f64, reduced_speed: f64, i: usize, n: usize) -> f64 {
		let speed = if self.reduced_motion { reduced_speed } else { speed };
		self.time * speed + i as f64 / n.max(1) as f64 * TAU
	}
}

fn on_ring(centre: Point, angle: f64, radius: f64) -> Point {
	Point::new(centre.x + angle.cos() * radius, centre.y + angle.sin() * radius)
}

/// Lays out everything around the expanded hub of `cluster` at `centre`.
pub fn layout_expanded(
	cluster: &str,
	color: Rgb,
	centre: Point,
	content: &PortfolioContent,
	metrics: Metrics,
	clock: RingClock,
	visited: &HashSet<HitTarget>,
) -> ExpandedLayout {
	let mut layout = ExpandedLayout {
		cluster: cluster.to_string(),
		color,
		centre,
		guides: Vec::new(),
		chips: Vec::new(),
		markers: Vec::new(),
		hits: Vec::new(),
	};
	match cluster {
		"about" => {
			about_ring(&mut layout, metrics, clock);
			fact_ring(&mut layout, content, metrics, clock);
		}
		"contact" => contact_ring(&mut layout, content, metrics, clock),
		_ => {
			skill_ring(&mut layout, content, metrics, clock);
			project_ring(&mut layout, content, metrics, clock, visited);
		}
	}
	layout
}

fn push_gem(layout: &mut ExpandedLayout, p: Point, label: &str, style: LabelStyle, first_view: bool, target: HitTarget) {
	layout.markers.push(Marker {
		x: p.x,
		y: p.y,
		r: GEM_RADIUS,
		label: label.to_string(),
		style,
		first_view,
	});
	layout.hits.push(HitRegion {
		target,
		x: p.x,
		y: p.y,
		r: GEM_RADIUS + GEM_HIT_PAD,
	});
}

fn skill_ring(layout: &mut ExpandedLayout, content: &PortfolioContent, metrics: Metrics, clock: RingClock) {
	let Some(skills) = content.skills.get(&layout.cluster).filter(|s| !s.is_empty()) else {
		return;
	};
	let radius = metrics.skill_orbit() + (clock.time * 0.5).sin() * 4.0;
	layout.guides.push(OrbitGuide { radius, alpha: 0.10 });
	for (i, label) in skills.iter().enumerate() {
		let p = on_ring(layout.centre, clock.angle(0.2, 0.05, i, skills.len()), radius);
		layout.chips.push(Chip {
			x: p.x,
			y: p.y,
			label: label.clone(),
		});
	}
}

fn project_ring(
	layout: &mut ExpandedLayout,
	content: &PortfolioContent,
	metrics: Metrics,
	clock: RingClock,
	visited: &HashSet<HitTarget>,
) {
	let radius = metrics.project_orbit() + (clock.time * 0.7).sin() * 3.0;
	layout.guides.push(OrbitGuide { radius, alpha: 0.18 });
	let projects: Vec<_> = content.projects.iter().filter(|p| p.cluster == layout.cluster).collect();
	for (i, project) in projects.iter().enumerate() {
		let p = on_ring(layout.centre, clock.angle(0.35, 0.1, i, projects.len()), radius);
		let target = HitTarget::Project(project.id.clone());
		let first_view = !visited.contains(&target);
		push_gem(layout, p, &project.title, LabelStyle::Pill, first_view, target);
	}
}

fn about_ring(layout: &mut ExpandedLayout, metrics: Metrics, clock: RingClock) {
	let radius = metrics.about_orbit();
	layout.guides.push(OrbitGuide { radius, alpha: 0.18 });
	let n = AboutSection::ALL.len();
	for (i, section) in AboutSection::ALL.into_iter().enumerate() {
		let p = on_ring(layout.centre, clock.angle(0.25, 0.06, i, n), radius);
		push_gem(layout, p, section.label(), LabelStyle::Pill, false, HitTarget::AboutSection(section));
	}
}

/// Index of the pair of facts on show at `time`.
fn fact_pair(total: usize, clock: RingClock) -> usize {
	let cycle = if clock.reduced_motion { 0.05 } else { 0.2 };
	let pairs = total.div_ceil(2).max(1);
	((clock.time * cycle).floor().max(0.0) as usize) % pairs
}

fn fact_ring(layout: &mut ExpandedLayout, content: &PortfolioContent, metrics: Metrics, clock: RingClock) {
	let about = content.about_facts.len();
	let total = about + content.fun_facts.len();
	if total == 0 {
		return;
	}
	let radius = metrics.fact_orbit();
	layout.guides.push(OrbitGuide { radius, alpha: 0.12 });
	let speed = if clock.reduced_motion { 0.05 } else { 0.18 };
	let pair = fact_pair(total, clock);
	for i in 0..2 {
		let index = (pair * 2 + i) % total;
		let (source, local, text) = if index < about {
			(FactSource::About, index, &content.about_facts[index])
		} else {
			(FactSource::Fun, index - about, &content.fun_facts[index - about])
		};
		let angle = clock.time * speed + i as f64 * PI + PI / 6.0;
		let p = on_ring(layout.centre, angle, radius);
		layout.chips.push(Chip {
			x: p.x,
			y: p.y,
			label: text.clone(),
		});
		layout.hits.push(HitRegion {
			target: HitTarget::Fact { source, index: local },
			x: p.x,
			y: p.y,
			r: FACT_HIT_RADIUS,
		});
	}
}

fn contact_ring(layout: &mut ExpandedLayout, content: &PortfolioContent, metrics: Metrics, clock: RingClock) {
	let radius = metrics.contact_orbit();
	let n = content.contact_links.len();
	for (i, link) in content.contact_links.iter().enumerate() {
		let angle = clock.angle(0.2, 0.06, i, n) + PI / 6.0;
		let p = on_ring(layout.centre, angle, radius);
		push_gem(layout, p, &link.label, LabelStyle::Chip, false, HitTarget::Contact(link.id.clone()));
	}
}
