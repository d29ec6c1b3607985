use std::f64::consts::{PI, TAU};

use rand::Rng;

use super::graph::rand_between;

const STAR_DENSITY: f64 = 1.0 / 12_000.0;
const MIN_STARS: usize = 60;

#[derive(Clone, Debug)]
pub struct BackgroundStar {
	pub x: f64,
	pub y: f64,
	pub r: f64,
	pub alpha: f64,
	pub amp: f64,
	pub freq: f64,
	pub phase: f64,
}

impl BackgroundStar {
	/// Current core alpha, twinkling around the base value.
	pub fn twinkle_alpha(&self, time: f64) -> f64 {
		self.alpha * (1.0 + self.amp * (time * self.freq * 2.0 * PI + self.phase).sin())
	}
}

pub fn generate_starfield(width: f64, height: f64, rng: &mut impl Rng) -> Vec<BackgroundStar> {
	let count = ((width * height * STAR_DENSITY).round().max(0.0) as usize).max(MIN_STARS);
	(0..count)
		.map(|_| BackgroundStar {
			x: rand_between(rng, 0.0, width),
			y: rand_between(rng, 0.0, height),
			r: rand_between(rng, 0.6, 2.2),
			alpha: rand_between(rng, 0.15, 0.5),
			amp: rand_between(rng, 0.0, 0.25),
			freq: rand_between(rng, 0.5, 1.4),
			phase: rand_between(rng, 0.0, TAU),
		})
		.collect()
}
