use super::config::Metrics;
use super::types::{AboutSection, Node, Point};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FactSource {
	About,
	Fun,
}

/// What an interactive marker stands for.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum HitTarget {
	Project(String),
	Contact(String),
	AboutSection(AboutSection),
	Fact { source: FactSource, index: usize },
}

/// A circular world-space hit region recorded while laying out a frame.
#[derive(Clone, Debug, PartialEq)]
pub struct HitRegion {
	pub target: HitTarget,
	pub x: f64,
	pub y: f64,
	pub r: f64,
}

impl HitRegion {
	pub fn contains(&self, p: Point) -> bool {
		let (dx, dy) = (p.x - self.x, p.y - self.y);
		dx * dx + dy * dy < self.r * self.r
	}
}

/// First region containing `p`, in layout order.
pub fn region_at(regions: &[HitRegion], p: Point) -> Option<&HitRegion> {
	regions.iter().find(|s| s.contains(p))
}

/// Nearest live node whose padded radius contains the world point `p`.
pub fn node_at(nodes: &[Node], metrics: Metrics, p: Point) -> Option<usize> {
	let hub_pad = metrics.hub_hit_radius();
	let sat_pad = metrics.satellite_hit_radius();
	nodes
		.iter()
		.enumerate()
		.filter(|(_, n)| !n.is_consumed())
		.filter_map(|(i, n)| {
			let (dx, dy) = (p.x - n.x, p.y - n.y);
			let reach = n.r + if n.is_hub() { hub_pad } else { sat_pad };
			let d2 = dx * dx + dy * dy;
			(d2 <= reach * reach).then_some((i, d2))
		})
		.min_by(|a, b| a.1.total_cmp(&b.1))
		.map(|(i, _)| i)
}
