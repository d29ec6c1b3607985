//! Per-frame physics stages. Each stage borrows only what it touches so it
//! can be driven in isolation from a synthetic node buffer.

mod well;

use rand::Rng;

use super::config::CalmConfig;
use super::graph::{Anchors, Graph, rand_between};
use super::particles::ParticlePool;
use super::types::{Node, Point};

pub use well::{GravityWell, apply_well, release_well};

const REPULSION_MARGIN: f64 = 14.0;
const REPULSION_GAIN: f64 = 0.01;
const PULSE_RATE: f64 = 1.6;
const WELL_DAMPING: f64 = 0.98;

/// Small drift applied to a cluster's anchor, phase-shifted by its id.
pub fn anchor_wobble(cluster: &str, calm: &CalmConfig, time: f64) -> Point {
	let phase = time * calm.anchor_wobble_freq;
	let bytes = cluster.as_bytes();
	let ox = f64::from(bytes.first().copied().unwrap_or(0) % 7);
	let oy = f64::from(bytes.get(1).copied().unwrap_or(0) % 7);
	Point::new(
		calm.anchor_wobble_amp * (phase + ox).cos(),
		calm.anchor_wobble_amp * (phase + oy).sin(),
	)
}

/// Breathing orbit radius of a satellite at `time`.
pub fn breathing_radius(base_r: f64, phase: f64, calm: &CalmConfig, time: f64) -> f64 {
	base_r + calm.orbit_wobble_amp * (time * calm.orbit_wobble_freq + phase).sin()
}

/// Stage 1: kinematic orbits. Positions are set outright and velocity zeroed.
pub fn orbit_satellites(
	nodes: &mut [Node],
	anchors: &Anchors,
	calm: &CalmConfig,
	time: f64,
	dt: f64,
	reduced_motion: bool,
) {
	let speed_scale = if reduced_motion { 0.5 } else { 1.0 };
	for n in nodes.iter_mut() {
		if n.is_consumed() {
			continue;
		}
		let Some(orbit) = n.orbit.as_mut() else {
			continue;
		};
		let base = anchors.get(&n.cluster);
		let wob = anchor_wobble(&n.cluster, calm, time);
		orbit.theta += orbit.omega * speed_scale * dt;
		let radius = breathing_radius(orbit.base_r, orbit.phase, calm, time);
		n.x = base.x + wob.x + orbit.theta.cos() * radius;
		n.y = base.y + wob.y + orbit.theta.sin() * radius;
		n.vx = 0.0;
		n.vy = 0.0;
	}
}

/// Stage 2: hubs are pulled toward their anchor and jiggled.
pub fn hub_springs(
	nodes: &mut [Node],
	anchors: &Anchors,
	calm: &CalmConfig,
	reduced_motion: bool,
	rng: &mut impl Rng,
) {
	for n in nodes.iter_mut().filter(|n| n.is_hub()) {
		let anchor = anchors.get(&n.cluster);
		n.vx += (anchor.x - n.x) * calm.hub_attract;
		n.vy += (anchor.y - n.y) * calm.hub_attract;
		if !reduced_motion {
			n.vx += rand_between(rng, -0.5, 0.5) * calm.hub_jiggle;
			n.vy += rand_between(rng, -0.5, 0.5) * calm.hub_jiggle;
		}
	}
}

/// Stage 3: soft overlap penalty for every pair involving a hub.
pub fn repulsion(nodes: &mut [Node]) {
	for i in 0..nodes.len() {
		let (head, tail) = nodes.split_at_mut(i + 1);
		let a = &mut head[i];
		if a.is_consumed() {
			continue;
		}
		for b in tail.iter_mut() {
			if (!a.is_hub() && !b.is_hub()) || b.is_consumed() {
				continue;
			}
			let (dx, dy) = (a.x - b.x, a.y - b.y);
			let d2 = dx * dx + dy * dy;
			let min_dist = a.r + b.r + REPULSION_MARGIN;
			if d2 >= min_dist * min_dist || d2 <= 0.01 {
				continue;
			}
			let d = d2.sqrt();
			let force = (min_dist - d) * REPULSION_GAIN;
			let (nx, ny) = (dx / d, dy / d);
			a.vx += nx * force;
			a.vy += ny * force;
			b.vx -= nx * force;
			b.vy -= ny * force;
		}
	}
}

/// Stage 4: hubs always integrate; satellites only while the well is active.
pub fn integrate(nodes: &mut [Node], calm: &CalmConfig, well_active: bool, dt: f64) {
	for n in nodes.iter_mut() {
		if n.is_hub() {
			n.vx *= calm.damping;
			n.vy *= calm.damping;
			n.x += n.vx * dt;
			n.y += n.vy * dt;
			if let Some(pulse) = n.pulse {
				let next = (pulse + dt * PULSE_RATE).min(1.0);
				n.pulse = if next >= 1.0 { None } else { Some(next) };
			}
		} else if well_active && !n.is_consumed() {
			n.vx *= WELL_DAMPING;
			n.vy *= WELL_DAMPING;
			n.x += n.vx * dt;
			n.y += n.vy * dt;
		}
	}
}

/// Everything the physics stages mutate, owned by one controller.
#[derive(Clone, Debug, Default)]
pub struct Simulation {
	pub graph: Graph,
	pub well: Option<GravityWell>,
	pub particles: ParticlePool,
}

impl Simulation {
	pub fn new(graph: Graph) -> Self {
		Self {
			graph,
			..Self::default()
		}
	}

	pub fn well_active(&self) -> bool {
		self.well.is_some()
	}

	/// Runs stages 1 through 5 in order, then retires an expired well.
	pub fn step(
		&mut self,
		calm: &CalmConfig,
		time: f64,
		dt: f64,
		reduced_motion: bool,
		rng: &mut impl Rng,
	) {
		let well_active = self.well_active();
		let Graph { nodes, edges, anchors } = &mut self.graph;

		if !well_active {
			orbit_satellites(nodes, anchors, calm, time, dt, reduced_motion);
		}
		hub_springs(nodes, anchors, calm, reduced_motion, rng);
		repulsion(nodes);
		integrate(nodes, calm, well_active, dt);

		if let Some(well) = self.well.as_mut() {
			apply_well(well, nodes, edges, &mut self.particles, dt, rng);
			well.remaining_s -= dt;
			if well.remaining_s <= 0.0 {
				self.well = None;
				release_well(&mut self.graph, calm, time);
			}
		}
	}
}
