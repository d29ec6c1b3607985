use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Colour used when a cluster id has no entry in the palette.
pub const FALLBACK_HEX: &str = "#c8c8dc";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeKind {
	Hub,
	Satellite,
}

/// Orbit parameters carried by satellites only.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Orbit {
	pub theta: f64,
	pub base_r: f64,
	pub omega: f64,
	pub phase: f64,
}

#[derive(Clone, Debug)]
pub struct Node {
	pub cluster: String,
	pub kind: NodeKind,
	pub x: f64,
	pub y: f64,
	pub vx: f64,
	pub vy: f64,
	pub r: f64,
	pub orbit: Option<Orbit>,
	pub pulse: Option<f64>,
}

impl Node {
	pub fn is_hub(&self) -> bool {
		self.kind == NodeKind::Hub
	}

	/// Consumed by the gravity well; kept in the buffer until the next rebuild.
	pub fn is_consumed(&self) -> bool {
		self.r <= 0.0
	}
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EdgeScope {
	Cluster(String),
	Cross,
}

#[derive(Clone, Debug)]
pub struct Edge {
	pub a: usize,
	pub b: usize,
	pub scope: EdgeScope,
	pub cross: bool,
	/// `cross` as it was before the gravity well overrode it.
	pub well_saved_cross: Option<bool>,
}

impl Edge {
	pub fn new(a: usize, b: usize, scope: EdgeScope) -> Self {
		let cross = scope == EdgeScope::Cross;
		Self {
			a,
			b,
			scope,
			cross,
			well_saved_cross: None,
		}
	}
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
	pub x: f64,
	pub y: f64,
}

impl Point {
	pub fn new(x: f64, y: f64) -> Self {
		Self { x, y }
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb {
	pub r: u8,
	pub g: u8,
	pub b: u8,
}

impl Rgb {
	/// Parses `#RRGGBB`; anything else yields the neutral fallback.
	pub fn from_hex(hex: &str) -> Self {
		Self::parse(hex).unwrap_or(Self {
			r: 0xc8,
			g: 0xc8,
			b: 0xdc,
		})
	}

	fn parse(hex: &str) -> Option<Self> {
		let h = hex.strip_prefix('#').unwrap_or(hex);
		if h.len() != 6 || !h.is_ascii() {
			return None;
		}
		let channel = |i: usize| u8::from_str_radix(&h[i..i + 2], 16).ok();
		Some(Self {
			r: channel(0)?,
			g: channel(2)?,
			b: channel(4)?,
		})
	}

	/// Adds `amount` to every channel, saturating at 255.
	pub fn lighten(self, amount: u8) -> Self {
		Self {
			r: self.r.saturating_add(amount),
			g: self.g.saturating_add(amount),
			b: self.b.saturating_add(amount),
		}
	}

	pub fn rgba(self, alpha: f64) -> String {
		format!(
			"rgba({},{},{},{:.3})",
			self.r,
			self.g,
			self.b,
			alpha.clamp(0.0, 1.0)
		)
	}
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Cluster {
	pub id: String,
	pub name: String,
	pub color: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Project {
	pub id: String,
	pub title: String,
	pub cluster: String,
	pub description: String,
	#[serde(default)]
	pub tech: Vec<String>,
	#[serde(default)]
	pub demo_url: Option<String>,
	#[serde(default)]
	pub repo_url: Option<String>,
	#[serde(default)]
	pub preview_image: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ContactLink {
	pub id: String,
	pub label: String,
	pub href: String,
}

/// Read-only content the canvas places around expanded hubs.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PortfolioContent {
	pub clusters: Vec<Cluster>,
	pub projects: Vec<Project>,
	pub skills: HashMap<String, Vec<String>>,
	pub contact_links: Vec<ContactLink>,
	pub about_facts: Vec<String>,
	pub fun_facts: Vec<String>,
}

impl PortfolioContent {
	pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
		serde_json::from_str(json)
	}

	pub fn project(&self, id: &str) -> Option<&Project> {
		self.projects.iter().find(|p| p.id == id)
	}

	pub fn contact(&self, id: &str) -> Option<&ContactLink> {
		self.contact_links.iter().find(|l| l.id == id)
	}

	#[cfg(test)]
	pub fn cluster(&self, id: &str) -> Option<&Cluster> {
		self.clusters.iter().find(|c| c.id == id)
	}
}

/// Payload handed to `on_project_select`.
#[derive(Clone, Debug, PartialEq)]
pub enum ProjectSelection {
	Id(String),
	Transition {
		id: String,
		x: f64,
		y: f64,
		color: String,
	},
}

impl ProjectSelection {
	pub fn id(&self) -> &str {
		match self {
			Self::Id(id) | Self::Transition { id, .. } => id,
		}
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AboutSection {
	Profile,
	Timeline,
	Skills,
	Contact,
}

impl AboutSection {
	pub const ALL: [AboutSection; 4] = [
		AboutSection::Profile,
		AboutSection::Timeline,
		AboutSection::Skills,
		AboutSection::Contact,
	];

	pub fn key(self) -> &'static str {
		match self {
			Self::Profile => "profile",
			Self::Timeline => "timeline",
			Self::Skills => "skills",
			Self::Contact => "contact",
		}
	}

	pub fn label(self) -> &'static str {
		match self {
			Self::Profile => "Profile",
			Self::Timeline => "Timeline",
			Self::Skills => "Skills",
			Self::Contact => "Contact",
		}
	}
}

/// Side effects the canvas asks its host to perform.
#[derive(Clone, Debug, PartialEq)]
pub enum CanvasEvent {
	ProjectSelect(Option<ProjectSelection>),
	AboutSelect(AboutSection),
	OpenContactModal,
	OpenUrl(String),
}
