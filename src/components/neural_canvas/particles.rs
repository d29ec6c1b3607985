use std::f64::consts::{PI, TAU};

use rand::Rng;

use super::graph::rand_between;

/// Upper bound on the shared particle pool, ejecta included.
pub const POOL_CAP: usize = 400;
const SPAWN_CHANCE: f64 = 0.01;
const BURST_SIZE: usize = 50;
const BURST_WINDOW_MS: f64 = 10_000.0;
const BURST_CLICKS: u32 = 10;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ParticleKind {
	ShootingStar,
	Ejecta { radius: f64, hue: f64 },
}

impl ParticleKind {
	/// Ejecta spawn at node positions and follow the camera; shooting stars
	/// cross the screen.
	pub fn in_world_space(self) -> bool {
		matches!(self, Self::Ejecta { .. })
	}
}

#[derive(Clone, Debug)]
pub struct Particle {
	pub x: f64,
	pub y: f64,
	pub vx: f64,
	pub vy: f64,
	pub life: f64,
	pub max_life: f64,
	pub kind: ParticleKind,
}

impl Particle {
	/// Fades in over the first 20% of life, then out.
	pub fn alpha(&self) -> f64 {
		let t = (self.life / self.max_life).clamp(0.0, 1.0);
		if t < 0.2 { t / 0.2 } else { 1.0 - (t - 0.2) / 0.8 }
	}
}

#[derive(Clone, Debug, Default)]
pub struct ParticlePool {
	pub particles: Vec<Particle>,
}

impl ParticlePool {
	#[cfg(test)]
	pub fn len(&self) -> usize {
		self.particles.len()
	}

	pub fn push(&mut self, particle: Particle) {
		if self.particles.len() < POOL_CAP {
			self.particles.push(particle);
		}
	}

	/// Occasionally launches a shooting star while under `cap`.
	pub fn spawn_shooting_star(&mut self, width: f64, cap: usize, rng: &mut impl Rng) {
		if self.particles.len() >= cap || !rng.gen_bool(SPAWN_CHANCE) {
			return;
		}
		let angle = rand_between(rng, 0.0, PI / 3.0) + PI * 0.9;
		let speed = rand_between(rng, 300.0, 700.0);
		self.push(Particle {
			x: rand_between(rng, 0.0, width),
			y: 400.0 - rand_between(rng, 0.0, 100.0),
			vx: angle.cos() * speed,
			vy: angle.sin() * speed,
			life: 0.0,
			max_life: rand_between(rng, 2.5, 4.0),
			kind: ParticleKind::ShootingStar,
		});
	}

	pub fn spawn_ejecta(&mut self, x: f64, y: f64, rng: &mut impl Rng) {
		let angle = rand_between(rng, 0.0, TAU);
		let speed = rand_between(rng, 3.0, 8.0);
		self.push(Particle {
			x,
			y,
			vx: angle.cos() * speed,
			vy: angle.sin() * speed,
			life: 0.0,
			max_life: rand_between(rng, 1.0, 2.0),
			kind: ParticleKind::Ejecta {
				radius: rand_between(rng, 1.0, 5.0),
				hue: rand_between(rng, 200.0, 260.0),
			},
		});
	}

	/// Advances every particle and drops the expired ones.
	pub fn advance(&mut self, dt: f64) {
		self.particles.retain_mut(|p| {
			p.x += p.vx * dt;
			p.y += p.vy * dt;
			p.life += dt;
			p.life <= p.max_life
		});
	}
}

#[derive(Clone, Debug)]
pub struct BurstParticle {
	pub x: f64,
	pub y: f64,
	pub vx: f64,
	pub vy: f64,
	pub life: f64,
	pub max_life: f64,
	pub hue: f64,
}

impl BurstParticle {
	pub fn alpha(&self) -> f64 {
		(1.0 - self.life / self.max_life).clamp(0.0, 1.0)
	}
}

/// Cosmetic firework that follows a rapid run of clicks, in screen space.
#[derive(Clone, Debug, Default)]
pub struct Burst {
	pub particles: Vec<BurstParticle>,
}

impl Burst {
	pub fn explode(x: f64, y: f64, rng: &mut impl Rng) -> Self {
		let particles = (0..BURST_SIZE)
			.map(|i| {
				let angle = TAU * i as f64 / BURST_SIZE as f64;
				let speed = rand_between(rng, 2.0, 5.0);
				BurstParticle {
					x,
					y,
					vx: angle.cos() * speed,
					vy: angle.sin() * speed,
					life: 0.0,
					max_life: rand_between(rng, 2.0, 4.0),
					hue: rand_between(rng, 0.0, 360.0),
				}
			})
			.collect();
		Self { particles }
	}

	/// Returns `false` once every particle has expired.
	pub fn advance(&mut self, dt: f64) -> bool {
		self.particles.retain_mut(|p| {
			p.x += p.vx;
			p.y += p.vy;
			p.vx *= 0.98;
			p.vy *= 0.98;
			p.vy += 0.1;
			p.life += dt;
			p.life < p.max_life
		});
		!self.particles.is_empty()
	}
}

/// Counts clicks in a rolling window; independent of hit-testing.
#[derive(Clone, Copy, Debug, Default)]
pub struct ClickCounter {
	pub count: u32,
	last_ms: Option<f64>,
}

impl ClickCounter {
	/// Records a click and reports whether it completes a burst run.
	pub fn register(&mut self, now_ms: f64) -> bool {
		let within = self
			.last_ms
			.is_some_and(|last| now_ms - last < BURST_WINDOW_MS);
		if !within {
			self.count = 1;
			self.last_ms = Some(now_ms);
			return false;
		}
		self.count += 1;
		self.last_ms = Some(now_ms);
		if self.count >= BURST_CLICKS {
			self.count = 0;
			self.last_ms = None;
			return true;
		}
		false
	}
}

#[cfg(test)]
mod tests {
	use rand::SeedableRng;
	use rand::rngs::StdRng;

	use super::*;

	#[test]
	fn shooting_stars_respect_cap() {
		let mut rng = StdRng::seed_from_u64(11);
		let mut pool = ParticlePool::default();
		for _ in 0..20_000 {
			pool.spawn_shooting_star(1200.0, 3, &mut rng);
		}
		assert_eq!(pool.len(), 3);
	}

	#[test]
	fn expired_particles_are_removed() {
		let mut rng = StdRng::seed_from_u64(2);
		let mut pool = ParticlePool::default();
		pool.spawn_ejecta(10.0, 10.0, &mut rng);
		assert_eq!(pool.len(), 1);
		for _ in 0..100 {
			pool.advance(0.033);
		}
		assert_eq!(pool.len(), 0);
	}

	#[test]
	fn only_ejecta_follow_the_camera() {
		let mut rng = StdRng::seed_from_u64(3);
		let mut pool = ParticlePool::default();
		pool.spawn_ejecta(40.0, 40.0, &mut rng);
		while pool.particles.len() < 2 {
			pool.spawn_shooting_star(1200.0, 5, &mut rng);
		}
		let world: Vec<_> = pool.particles.iter().map(|p| p.kind.in_world_space()).collect();
		assert_eq!(world, vec![true, false]);
	}

	#[test]
	fn pool_is_hard_capped() {
		let mut rng = StdRng::seed_from_u64(5);
		let mut pool = ParticlePool::default();
		for _ in 0..POOL_CAP + 50 {
			pool.spawn_ejecta(0.0, 0.0, &mut rng);
		}
		assert_eq!(pool.len(), POOL_CAP);
	}

	#[test]
	fn alpha_ramps_in_then_out() {
		let mut p = Particle {
			x: 0.0,
			y: 0.0,
			vx: 0.0,
			vy: 0.0,
			life: 0.0,
			max_life: 1.0,
			kind: ParticleKind::ShootingStar,
		};
		assert_eq!(p.alpha(), 0.0);
		p.life = 0.2;
		assert!((p.alpha() - 1.0).abs() < 1e-9);
		p.life = 1.0;
		assert!(p.alpha().abs() < 1e-9);
	}

	#[test]
	fn ten_quick_clicks_trigger_a_burst() {
		let mut counter = ClickCounter::default();
		for i in 0..9 {
			assert!(!counter.register(i as f64 * 500.0));
		}
		assert!(counter.register(4_600.0));
		assert_eq!(counter.count, 0);
	}

	#[test]
	fn slow_clicks_restart_the_window() {
		let mut counter = ClickCounter::default();
		for i in 0..20 {
			assert!(!counter.register(i as f64 * 11_000.0));
		}
		assert_eq!(counter.count, 1);
	}

	#[test]
	fn burst_expires() {
		let mut rng = StdRng::seed_from_u64(8);
		let mut burst = Burst::explode(100.0, 100.0, &mut rng);
		assert_eq!(burst.particles.len(), 50);
		let mut alive = true;
		for _ in 0..200 {
			alive = burst.advance(0.033);
		}
		assert!(!alive);
	}
}
