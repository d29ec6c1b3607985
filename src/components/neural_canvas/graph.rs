use std::collections::HashMap;
use std::f64::consts::TAU;

use log::info;
use rand::Rng;

use super::config::{CalmConfig, Metrics};
use super::types::{Cluster, Edge, EdgeScope, Node, NodeKind, Orbit, Point};

/// Fixed layout slots as fractions of the viewport.
const ANCHOR_SLOTS: &[(&str, f64, f64)] = &[
	("frontend", 0.22, 0.35),
	("backend", 0.78, 0.35),
	("ai", 0.30, 0.70),
	("cloud", 0.70, 0.70),
	("about", 0.50, 0.30),
	("contact", 0.50, 0.60),
];

const SATELLITES_PER_HUB: f64 = 12.0;
const CROSS_LINKS_PER_PAIR: f64 = 5.0;
const EDGE_CHANCE: f64 = 0.08;
const HUB_JITTER: f64 = 10.0;

/// Uniform sample in `[min, max)`; collapses to `min` for empty ranges.
pub fn rand_between(rng: &mut impl Rng, min: f64, max: f64) -> f64 {
	if max > min {
		rng.gen_range(min..max)
	} else {
		min
	}
}

#[derive(Clone, Debug, Default)]
pub struct Anchors {
	points: HashMap<String, Point>,
	center: Point,
}

impl Anchors {
	pub fn layout(width: f64, height: f64) -> Self {
		let points = ANCHOR_SLOTS
			.iter()
			.map(|&(id, fx, fy)| (id.to_string(), Point::new(width * fx, height * fy)))
			.collect();
		Self {
			points,
			center: Point::new(width * 0.5, height * 0.5),
		}
	}

	/// Anchor for a cluster, or the viewport centre for unknown ids.
	pub fn get(&self, cluster: &str) -> Point {
		self.points.get(cluster).copied().unwrap_or(self.center)
	}

}

#[derive(Clone, Debug, Default)]
pub struct Graph {
	pub nodes: Vec<Node>,
	pub edges: Vec<Edge>,
	pub anchors: Anchors,
}

impl Graph {
	pub fn hub(&self, cluster: &str) -> Option<&Node> {
		self.nodes.iter().find(|n| n.is_hub() && n.cluster == cluster)
	}
}

/// Builds a fresh node/edge buffer. Topology is re-rolled on every call.
pub fn build_graph(
	metrics: Metrics,
	clusters: &[Cluster],
	calm: &CalmConfig,
	satellite_multiplier: f64,
	edge_multiplier: f64,
	rng: &mut impl Rng,
) -> Graph {
	let anchors = Anchors::layout(metrics.width, metrics.height);
	let hub_r = metrics.hub_radius();
	let (sat_min, sat_max) = metrics.satellite_radius();
	let (orbit_min, orbit_max) = metrics.orbit_band();
	let satellites = (SATELLITES_PER_HUB * satellite_multiplier).round().max(0.0) as usize;

	let mut nodes = Vec::with_capacity(clusters.len() * (satellites + 1));
	let mut members: Vec<Vec<usize>> = Vec::with_capacity(clusters.len());

	for cluster in clusters {
		let anchor = anchors.get(&cluster.id);
		nodes.push(Node {
			cluster: cluster.id.clone(),
			kind: NodeKind::Hub,
			x: anchor.x + rand_between(rng, -HUB_JITTER, HUB_JITTER),
			y: anchor.y + rand_between(rng, -HUB_JITTER, HUB_JITTER),
			vx: 0.0,
			vy: 0.0,
			r: hub_r,
			orbit: None,
			pulse: None,
		});

		let mut sats = Vec::with_capacity(satellites);
		for _ in 0..satellites {
			let base_r = rand_between(rng, orbit_min, orbit_max);
			let theta = rand_between(rng, 0.0, TAU);
			let direction = if rng.gen_bool(0.5) { -1.0 } else { 1.0 };
			let omega = rand_between(rng, calm.orbit_omega_min, calm.orbit_omega_max) * direction;
			let phase = rand_between(rng, 0.0, TAU);
			sats.push(nodes.len());
			nodes.push(Node {
				cluster: cluster.id.clone(),
				kind: NodeKind::Satellite,
				x: anchor.x + theta.cos() * base_r,
				y: anchor.y + theta.sin() * base_r,
				vx: 0.0,
				vy: 0.0,
				r: rand_between(rng, sat_min, sat_max),
				orbit: Some(Orbit {
					theta,
					base_r,
					omega,
					phase,
				}),
				pulse: None,
			});
		}
		members.push(sats);
	}

	let mut edges = Vec::new();
	let reach = metrics.edge_distance();
	let chance = (EDGE_CHANCE * edge_multiplier).clamp(0.0, 1.0);
	for (cluster, sats) in clusters.iter().zip(&members) {
		for (i, &a) in sats.iter().enumerate() {
			for &b in &sats[i + 1..] {
				let (dx, dy) = (nodes[a].x - nodes[b].x, nodes[a].y - nodes[b].y);
				if dx * dx + dy * dy < reach * reach && rng.gen_bool(chance) {
					edges.push(Edge::new(a, b, EdgeScope::Cluster(cluster.id.clone())));
				}
			}
		}
	}

	let links = (CROSS_LINKS_PER_PAIR * edge_multiplier).round().max(0.0) as usize;
	for i in 0..members.len() {
		for j in i + 1..members.len() {
			let (left, right) = (&members[i], &members[j]);
			if left.is_empty() || right.is_empty() {
				continue;
			}
			for _ in 0..links {
				let a = left[rng.gen_range(0..left.len())];
				let b = right[rng.gen_range(0..right.len())];
				edges.push(Edge::new(a, b, EdgeScope::Cross));
			}
		}
	}

	info!(
		"graph rebuilt: {}x{} viewport, {} clusters, {} nodes, {} edges",
		metrics.width.round(),
		metrics.height.round(),
		clusters.len(),
		nodes.len(),
		edges.len()
	);

	Graph {
		nodes,
		edges,
		anchors,
	}
}

#[cfg(test)]
mod tests {
	use rand::SeedableRng;
	use rand::rngs::StdRng;

	use super::*;

	fn cluster(id: &str) -> Cluster {
		Cluster {
			id: id.into(),
			name: id.into(),
			color: "#22d3ee".into(),
		}
	}

	fn build(w: f64, h: f64, ids: &[&str], sat: f64, edge: f64, seed: u64) -> Graph {
		let clusters: Vec<_> = ids.iter().map(|id| cluster(id)).collect();
		let mut rng = StdRng::seed_from_u64(seed);
		build_graph(
			Metrics::new(w, h),
			&clusters,
			&CalmConfig::default(),
			sat,
			edge,
			&mut rng,
		)
	}

	#[test]
	fn two_clusters_yield_twenty_six_nodes() {
		let g = build(1200.0, 800.0, &["frontend", "backend"], 1.0, 1.0, 1);
		assert_eq!(g.nodes.len(), 26);
		assert_eq!(g.nodes.iter().filter(|n| n.is_hub()).count(), 2);
	}

	#[test]
	fn graph_invariants_hold() {
		let ids = ["frontend", "backend", "ai", "cloud", "about", "contact"];
		for (seed, (w, h)) in [(320.0, 480.0), (1200.0, 800.0), (3840.0, 2160.0)]
			.into_iter()
			.enumerate()
		{
			let g = build(w, h, &ids, 1.5, 2.0, seed as u64);
			for id in ids {
				assert_eq!(
					g.nodes.iter().filter(|n| n.is_hub() && n.cluster == id).count(),
					1
				);
			}
			for n in &g.nodes {
				assert!(n.r > 0.0);
				if !n.is_hub() {
					assert!(g.hub(&n.cluster).is_some());
					assert!(n.orbit.is_some());
				}
			}
			for e in &g.edges {
				assert!(e.a < g.nodes.len() && e.b < g.nodes.len());
				assert!(!g.nodes[e.a].is_hub() && !g.nodes[e.b].is_hub());
				match &e.scope {
					EdgeScope::Cross => {
						assert!(e.cross);
						assert_ne!(g.nodes[e.a].cluster, g.nodes[e.b].cluster);
					}
					EdgeScope::Cluster(c) => {
						assert!(!e.cross);
						assert_eq!(&g.nodes[e.a].cluster, c);
						assert_eq!(&g.nodes[e.b].cluster, c);
					}
				}
			}
		}
	}

	#[test]
	fn cross_links_per_cluster_pair() {
		let g = build(1200.0, 800.0, &["frontend", "backend", "ai"], 1.0, 1.0, 7);
		let cross = g.edges.iter().filter(|e| e.scope == EdgeScope::Cross).count();
		assert_eq!(cross, 3 * 5);
	}

	#[test]
	fn satellites_start_on_their_orbit() {
		let g = build(1200.0, 800.0, &["ai"], 1.0, 1.0, 3);
		let anchor = g.anchors.get("ai");
		let (min, max) = Metrics::new(1200.0, 800.0).orbit_band();
		for n in g.nodes.iter().filter(|n| !n.is_hub()) {
			let orbit = n.orbit.unwrap();
			let d = ((n.x - anchor.x).powi(2) + (n.y - anchor.y).powi(2)).sqrt();
			assert!((d - orbit.base_r).abs() < 1e-9);
			assert!(orbit.base_r >= min && orbit.base_r <= max);
			assert!((orbit.omega.abs() - 0.1).abs() < 1e-12);
		}
	}

	#[test]
	fn unknown_cluster_anchors_at_center() {
		let anchors = Anchors::layout(1000.0, 600.0);
		assert_eq!(anchors.get("mystery"), Point::new(500.0, 300.0));
		assert_eq!(anchors.get("frontend"), Point::new(220.0, 210.0));
	}

	#[test]
	fn multiplier_scales_satellite_count() {
		let g = build(1200.0, 800.0, &["cloud"], 2.5, 1.0, 9);
		assert_eq!(g.nodes.len(), 1 + 30);
		let g = build(1200.0, 800.0, &["cloud"], 0.5, 1.0, 9);
		assert_eq!(g.nodes.len(), 1 + 6);
	}
}
