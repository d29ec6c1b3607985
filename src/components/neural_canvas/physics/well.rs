use log::info;
use rand::Rng;

use super::super::config::{CalmConfig, Metrics};
use super::super::graph::{Graph, rand_between};
use super::super::particles::ParticlePool;
use super::super::types::{Edge, Node};
use super::{anchor_wobble, breathing_radius};

const FORCE_SCALE: f64 = 5.0;
const VELOCITY_GAIN: f64 = 600.0;
const MAX_VELOCITY: f64 = 400.0;
const CONSUME_FRACTION: f64 = 0.4;
const SHRINK_RATE: f64 = 12.0;
const EJECTA_CHANCE: f64 = 0.4;
const EDGE_REACH: f64 = 3.0;
/// Where consumed nodes are parked until the next rebuild.
pub const PARKED: (f64, f64) = (-1000.0, -1000.0);

/// A time-limited point attractor ("black hole").
#[derive(Clone, Debug, PartialEq)]
pub struct GravityWell {
	pub x: f64,
	pub y: f64,
	/// Physics falloff radius.
	pub radius: f64,
	pub visual_radius: f64,
	pub strength: f64,
	pub remaining_s: f64,
}

impl GravityWell {
	/// Places a well at a random spot inside the viewport margin.
	pub fn activate(metrics: Metrics, strength: f64, lifetime_s: f64, rng: &mut impl Rng) -> Self {
		let margin = metrics.well_margin();
		let well = Self {
			x: margin + rand_between(rng, 0.0, (metrics.width - 2.0 * margin).max(0.0)),
			y: margin + rand_between(rng, 0.0, (metrics.height - 2.0 * margin).max(0.0)),
			radius: metrics.well_radius(),
			visual_radius: metrics.well_visual_radius(),
			strength,
			remaining_s: lifetime_s,
		};
		info!(
			"gravity well active at ({:.0}, {:.0}) for {lifetime_s}s",
			well.x, well.y
		);
		well
	}

	pub fn consumption_radius(&self) -> f64 {
		self.radius * CONSUME_FRACTION
	}
}

/// Stage 5: pull, shrink and park every live non-hub node; flag nearby edges.
pub fn apply_well(
	well: &GravityWell,
	nodes: &mut [Node],
	edges: &mut [Edge],
	particles: &mut ParticlePool,
	dt: f64,
	rng: &mut impl Rng,
) {
	for n in nodes.iter_mut() {
		if n.is_hub() || n.is_consumed() {
			continue;
		}
		let (dx, dy) = (well.x - n.x, well.y - n.y);
		let distance = (dx * dx + dy * dy).sqrt();
		if distance < 1.0 {
			continue;
		}

		let force = well.strength * FORCE_SCALE / (distance * distance).max(1.0);
		n.vx += dx / distance * force * dt * VELOCITY_GAIN;
		n.vy += dy / distance * force * dt * VELOCITY_GAIN;
		let speed = n.vx.hypot(n.vy);
		if speed > MAX_VELOCITY {
			let scale = MAX_VELOCITY / speed;
			n.vx *= scale;
			n.vy *= scale;
		}

		if distance >= well.consumption_radius() {
			continue;
		}
		n.r = (n.r - dt * SHRINK_RATE).max(0.0);
		if rng.gen_bool(EJECTA_CHANCE) {
			particles.spawn_ejecta(n.x, n.y, rng);
		}
		if n.r <= 0.0 {
			n.r = 0.0;
			(n.x, n.y) = PARKED;
			n.vx = 0.0;
			n.vy = 0.0;
		}
	}

	for e in edges.iter_mut() {
		let (Some(a), Some(b)) = (nodes.get(e.a), nodes.get(e.b)) else {
			continue;
		};
		let (mx, my) = ((a.x + b.x) * 0.5, (a.y + b.y) * 0.5);
		let distance = (well.x - mx).hypot(well.y - my);
		if distance < well.radius * EDGE_REACH {
			if e.well_saved_cross.is_none() {
				e.well_saved_cross = Some(e.cross);
			}
			e.cross = distance < well.radius;
		}
	}
}

/// Restores edge flags and re-seeds each surviving satellite's orbit from
/// where the well left it, so orbiting resumes without a jump.
pub fn release_well(graph: &mut Graph, calm: &CalmConfig, time: f64) {
	for e in graph.edges.iter_mut() {
		if let Some(cross) = e.well_saved_cross.take() {
			e.cross = cross;
		}
	}

	let mut survivors = 0;
	for n in graph.nodes.iter_mut() {
		if n.is_consumed() {
			continue;
		}
		let Some(orbit) = n.orbit.as_mut() else {
			continue;
		};
		let base = graph.anchors.get(&n.cluster);
		let wob = anchor_wobble(&n.cluster, calm, time);
		let (dx, dy) = (n.x - base.x - wob.x, n.y - base.y - wob.y);
		orbit.theta = dy.atan2(dx);
		let breathe = breathing_radius(0.0, orbit.phase, calm, time);
		orbit.base_r = (dx.hypot(dy) - breathe).max(0.0);
		n.vx = 0.0;
		n.vy = 0.0;
		survivors += 1;
	}
	info!("gravity well expired; {survivors} satellites resume orbit");
}

#[cfg(test)]
mod tests {
	use rand::SeedableRng;
	use rand::rngs::StdRng;

	use super::super::super::graph::Anchors;
	use super::super::super::types::{EdgeScope, NodeKind, Orbit};
	use super::super::Simulation;
	use super::*;

	fn well_at(x: f64, y: f64) -> GravityWell {
		GravityWell {
			x,
			y,
			radius: 200.0,
			visual_radius: 50.0,
			strength: 3000.0,
			remaining_s: 15.0,
		}
	}

	fn satellite(x: f64, y: f64) -> Node {
		Node {
			cluster: "ai".into(),
			kind: NodeKind::Satellite,
			x,
			y,
			vx: 0.0,
			vy: 0.0,
			r: 6.0,
			orbit: Some(Orbit {
				theta: 0.0,
				base_r: 90.0,
				omega: 0.1,
				phase: 0.0,
			}),
			pulse: None,
		}
	}

	#[test]
	fn activation_respects_bounds() {
		let mut rng = StdRng::seed_from_u64(3);
		let m = Metrics::new(1280.0, 720.0);
		for _ in 0..100 {
			let w = GravityWell::activate(m, 3000.0, 15.0, &mut rng);
			assert!(w.x >= 25.0 && w.x <= 1280.0 - 25.0);
			assert!(w.y >= 25.0 && w.y <= 720.0 - 25.0);
			assert!((150.0..=400.0).contains(&w.radius));
			assert!((35.0..=80.0).contains(&w.visual_radius));
		}
	}

	#[test]
	fn pull_points_at_the_well_and_is_capped() {
		let well = well_at(500.0, 500.0);
		let mut nodes = vec![satellite(400.0, 500.0), satellite(498.0, 500.0)];
		let mut pool = ParticlePool::default();
		let mut rng = StdRng::seed_from_u64(1);
		apply_well(&well, &mut nodes, &mut [], &mut pool, 0.033, &mut rng);
		assert!(nodes[0].vx > 0.0);
		assert!(nodes[0].vy.abs() < 1e-9);
		assert!(nodes[1].vx.hypot(nodes[1].vy) <= MAX_VELOCITY + 1e-9);
	}

	#[test]
	fn consumption_is_monotone_and_parks_the_node() {
		let well = well_at(500.0, 500.0);
		let mut nodes = vec![satellite(470.0, 500.0)];
		let mut pool = ParticlePool::default();
		let mut rng = StdRng::seed_from_u64(9);
		let mut last = nodes[0].r;
		let mut frames = 0;
		while nodes[0].r > 0.0 && frames < 1_000 {
			nodes[0].vx = 0.0;
			nodes[0].vy = 0.0;
			apply_well(&well, &mut nodes, &mut [], &mut pool, 0.033, &mut rng);
			assert!(nodes[0].r < last || nodes[0].r == 0.0);
			last = nodes[0].r;
			frames += 1;
		}
		assert_eq!(nodes[0].r, 0.0);
		assert_eq!((nodes[0].x, nodes[0].y), PARKED);
		for _ in 0..50 {
			apply_well(&well, &mut nodes, &mut [], &mut pool, 0.033, &mut rng);
		}
		assert_eq!((nodes[0].x, nodes[0].y), PARKED);
		assert!(pool.len() > 0);
	}

	#[test]
	fn hubs_are_immune() {
		let well = well_at(500.0, 500.0);
		let mut nodes = vec![Node {
			kind: NodeKind::Hub,
			orbit: None,
			..satellite(480.0, 500.0)
		}];
		let mut pool = ParticlePool::default();
		let mut rng = StdRng::seed_from_u64(0);
		apply_well(&well, &mut nodes, &mut [], &mut pool, 0.033, &mut rng);
		assert_eq!(nodes[0].vx, 0.0);
		assert_eq!(nodes[0].r, 6.0);
	}

	#[test]
	fn edge_flags_are_restored_on_release() {
		let well = well_at(500.0, 500.0);
		let mut nodes = vec![satellite(490.0, 480.0), satellite(510.0, 520.0)];
		let mut edges = vec![Edge::new(0, 1, EdgeScope::Cluster("ai".into()))];
		let mut pool = ParticlePool::default();
		let mut rng = StdRng::seed_from_u64(2);
		apply_well(&well, &mut nodes, &mut edges, &mut pool, 0.016, &mut rng);
		assert!(edges[0].cross);
		assert_eq!(edges[0].well_saved_cross, Some(false));

		let mut graph = Graph {
			nodes,
			edges,
			anchors: Anchors::layout(1200.0, 800.0),
		};
		release_well(&mut graph, &CalmConfig::default(), 3.0);
		assert!(!graph.edges[0].cross);
		assert_eq!(graph.edges[0].well_saved_cross, None);
	}

	#[test]
	fn released_satellites_resume_from_where_they_are() {
		let calm = CalmConfig::default();
		let anchors = Anchors::layout(1200.0, 800.0);
		let mut sim = Simulation::new(Graph {
			nodes: vec![satellite(900.0, 150.0)],
			edges: Vec::new(),
			anchors,
		});
		sim.well = Some(GravityWell {
			remaining_s: 0.02,
			..well_at(1100.0, 100.0)
		});
		let mut rng = StdRng::seed_from_u64(6);
		sim.step(&calm, 1.0, 0.016, false, &mut rng);
		assert!(sim.well.is_some());
		sim.step(&calm, 1.016, 0.016, false, &mut rng);
		assert!(sim.well.is_none());

		let before = (sim.graph.nodes[0].x, sim.graph.nodes[0].y);
		sim.step(&calm, 1.032, 0.016, false, &mut rng);
		let after = (sim.graph.nodes[0].x, sim.graph.nodes[0].y);
		let jump = (after.0 - before.0).hypot(after.1 - before.1);
		assert!(jump < 2.0, "satellite jumped {jump}px after release");
	}
}
