use log::info;

use super::types::Cluster;

const BUFFER_LEN: usize = 20;
const HELP_MS: f64 = 5_000.0;
const FLASH_MS: f64 = 300.0;
const DEV_MODE_MS: f64 = 600_000.0;
const COMMAND_WORDS: [&str; 7] = ["help", "matrix", "cyberpunk", "retro", "blackhole", "reset", "dev"];
const DEV_WORDS: [&str; 2] = ["more", "less"];

pub const DEFAULT_BACKGROUND: &str = "radial-gradient(1200px 800px at 30% 20%, rgba(99,102,241,0.08), transparent 60%), radial-gradient(1000px 700px at 80% 70%, rgba(34,211,238,0.08), transparent 60%), #0b0e14";

/// Commands listed in the help overlay.
pub const COMMANDS: &[(&str, &str)] = &[
	("matrix", "Enable Matrix green theme"),
	("cyberpunk", "Enable Cyberpunk neon theme"),
	("retro", "Enable Retro 80s theme"),
	("blackhole", "Summon a black hole"),
	("help", "Show this help message"),
	("reset", "Reset to default theme"),
	("dev", "Toggle developer mode"),
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Theme {
	Matrix,
	Cyberpunk,
	Retro,
}

impl Theme {
	pub fn name(self) -> &'static str {
		match self {
			Self::Matrix => "Matrix",
			Self::Cyberpunk => "Cyberpunk",
			Self::Retro => "Retro",
		}
	}

	/// Palette override for a cluster id, if the theme has one.
	pub fn color_for(self, cluster: &str) -> Option<&'static str> {
		let palette: [&'static str; 6] = match self {
			Self::Matrix => ["#00ff00", "#00cc00", "#00aa00", "#008800", "#00ff00", "#00cc00"],
			Self::Cyberpunk => ["#ff00ff", "#00ffff", "#ffff00", "#ff0080", "#00ffff", "#ff00ff"],
			Self::Retro => ["#ff6b35", "#f7931e", "#ffd23f", "#5390d9", "#ff6b35", "#f7931e"],
		};
		let slot = match cluster {
			"frontend" => 0,
			"backend" => 1,
			"ai" => 2,
			"cloud" => 3,
			"about" => 4,
			"contact" => 5,
			_ => return None,
		};
		Some(palette[slot])
	}

	pub fn background(self) -> &'static str {
		match self {
			Self::Matrix => "radial-gradient(1200px 800px at 30% 20%, rgba(0,255,0,0.1), transparent 60%), radial-gradient(1000px 700px at 80% 70%, rgba(0,255,0,0.1), transparent 60%), #001100",
			Self::Cyberpunk => "radial-gradient(1200px 800px at 30% 20%, rgba(255,0,255,0.15), transparent 60%), radial-gradient(1000px 700px at 80% 70%, rgba(0,255,255,0.15), transparent 60%), #1a0033",
			Self::Retro => "radial-gradient(1200px 800px at 30% 20%, rgba(255,107,53,0.12), transparent 60%), radial-gradient(1000px 700px at 80% 70%, rgba(247,147,30,0.12), transparent 60%), #2d1b69",
		}
	}
}

/// Applies an optional theme to a cluster list.
pub fn themed_clusters(clusters: &[Cluster], theme: Option<Theme>) -> Vec<Cluster> {
	clusters
		.iter()
		.map(|c| {
			let color = theme
				.and_then(|t| t.color_for(&c.id))
				.map_or_else(|| c.color.clone(), str::to_string);
			Cluster {
				color,
				..c.clone()
			}
		})
		.collect()
}

/// A flag that switches itself off at a stored timestamp.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Expiring {
	until_ms: Option<f64>,
}

impl Expiring {
	pub fn arm(&mut self, now_ms: f64, duration_ms: f64) {
		self.until_ms = Some(now_ms + duration_ms);
	}

	pub fn clear(&mut self) {
		self.until_ms = None;
	}

	pub fn is_active(&self, now_ms: f64) -> bool {
		self.until_ms.is_some_and(|until| now_ms < until)
	}

	/// Drops the deadline once passed.
	pub fn expire(&mut self, now_ms: f64) {
		if !self.is_active(now_ms) {
			self.until_ms = None;
		}
	}
}

/// What the rest of the canvas must do after a command.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SecretAction {
	ActivateWell,
	RebuildGraph,
}

#[derive(Clone, Debug)]
pub struct SecretState {
	buffer: String,
	pub theme: Option<Theme>,
	pub help: Expiring,
	pub flash: Expiring,
	pub dev_mode: Expiring,
	pub satellite_multiplier: f64,
	pub edge_multiplier: f64,
}

impl Default for SecretState {
	fn default() -> Self {
		Self {
			buffer: String::new(),
			theme: None,
			help: Expiring::default(),
			flash: Expiring::default(),
			dev_mode: Expiring::default(),
			satellite_multiplier: 1.0,
			edge_multiplier: 1.0,
		}
	}
}

impl SecretState {
	#[cfg(test)]
	pub fn buffer(&self) -> &str {
		&self.buffer
	}

	pub fn background(&self) -> &'static str {
		self.theme.map_or(DEFAULT_BACKGROUND, Theme::background)
	}

	pub fn show_help(&mut self, now_ms: f64) {
		self.help.arm(now_ms, HELP_MS);
	}

	/// Feeds one typed character into the rolling command buffer.
	pub fn type_char(&mut self, ch: char, now_ms: f64) -> Option<SecretAction> {
		self.buffer.extend(ch.to_lowercase());
		let excess = self.buffer.chars().count().saturating_sub(BUFFER_LEN);
		if excess > 0 {
			self.buffer = self.buffer.chars().skip(excess).collect();
		}

		let dev = self.dev_mode.is_active(now_ms);
		let dev_words: &[&'static str] = if dev { &DEV_WORDS } else { &[] };
		let command = COMMAND_WORDS
			.iter()
			.chain(dev_words)
			.copied()
			.find(|cmd| self.buffer.contains(cmd))?;
		self.buffer.clear();
		info!("secret command: {command}");

		match command {
			"help" => self.show_help(now_ms),
			"matrix" => self.set_theme(Some(Theme::Matrix), now_ms),
			"cyberpunk" => self.set_theme(Some(Theme::Cyberpunk), now_ms),
			"retro" => self.set_theme(Some(Theme::Retro), now_ms),
			"blackhole" => {
				self.flash.arm(now_ms, FLASH_MS);
				return Some(SecretAction::ActivateWell);
			}
			"reset" => {
				self.set_theme(None, now_ms);
				if dev {
					return self.set_multipliers(1.0, 1.0);
				}
			}
			"dev" => self.dev_mode.arm(now_ms, DEV_MODE_MS),
			"more" => {
				return self.set_multipliers(
					(self.satellite_multiplier + 0.5).min(5.0),
					(self.edge_multiplier + 0.2).min(3.0),
				);
			}
			"less" => {
				return self.set_multipliers(
					(self.satellite_multiplier - 0.5).max(0.5),
					(self.edge_multiplier - 0.2).max(0.2),
				);
			}
			_ => {}
		}
		None
	}

	fn set_theme(&mut self, theme: Option<Theme>, now_ms: f64) {
		self.theme = theme;
		self.flash.arm(now_ms, FLASH_MS);
	}

	fn set_multipliers(&mut self, satellites: f64, edges: f64) -> Option<SecretAction> {
		if satellites == self.satellite_multiplier && edges == self.edge_multiplier {
			return None;
		}
		self.satellite_multiplier = satellites;
		self.edge_multiplier = edges;
		Some(SecretAction::RebuildGraph)
	}

	/// Clears deadlines that have passed.
	pub fn expire(&mut self, now_ms: f64) {
		self.help.expire(now_ms);
		self.flash.expire(now_ms);
		self.dev_mode.expire(now_ms);
	}
}
