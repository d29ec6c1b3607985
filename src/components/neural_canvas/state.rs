use std::collections::HashSet;

use log::{debug, info};
use rand::SeedableRng;
use rand::rngs::StdRng;

use super::camera::{Camera, CameraSettled};
use super::config::{CanvasConfig, MAX_DT, Metrics};
use super::graph::build_graph;
use super::hit::{FactSource, HitRegion, HitTarget, node_at, region_at};
use super::particles::{Burst, ClickCounter};
use super::physics::{GravityWell, Simulation};
use super::scene::{ExpandedLayout, MESSAGE_CONTACT, RingClock, layout_expanded};
use super::secret::{SecretAction, SecretState, Theme, themed_clusters};
use super::starfield::{BackgroundStar, generate_starfield};
use super::types::{
	CanvasEvent, Cluster, FALLBACK_HEX, Node, PortfolioContent, Point, ProjectSelection, Rgb,
};

const TOOLTIP_OFFSET: (f64, f64) = (10.0, -16.0);
const HUB_PULSE_START: f64 = 0.01;

/// A pointer position in canvas-local and page coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PointerInput {
	pub x: f64,
	pub y: f64,
	pub client_x: f64,
	pub client_y: f64,
}

impl PointerInput {
	fn local(&self) -> Point {
		Point::new(self.x, self.y)
	}

	/// Page position of the canvas's top-left corner.
	fn canvas_origin(&self) -> Point {
		Point::new(self.client_x - self.x, self.client_y - self.y)
	}
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct HoverState {
	pub node: Option<usize>,
	pub cluster: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Tooltip {
	pub x: f64,
	pub y: f64,
	pub text: String,
}

#[derive(Clone, Copy, Debug, Default)]
struct FpsCounter {
	frames: u32,
	window_start_ms: Option<f64>,
	fps: u32,
}

impl FpsCounter {
	fn tick(&mut self, now_ms: f64) {
		let start = *self.window_start_ms.get_or_insert(now_ms);
		self.frames += 1;
		if now_ms - start >= 1000.0 {
			self.fps = self.frames;
			self.frames = 0;
			self.window_start_ms = Some(now_ms);
		}
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct DevStats {
	pub fps: u32,
	pub nodes: usize,
	pub edges: usize,
	pub clicks: u32,
	pub satellite_multiplier: f64,
	pub edge_multiplier: f64,
}

/// Snapshot of everything the DOM overlay renders around the canvas.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Overlay {
	pub tooltip: Option<Tooltip>,
	pub pointer: bool,
	pub expanded: bool,
	pub help: bool,
	pub flash: bool,
	pub theme: Option<Theme>,
	pub dev: Option<DevStats>,
}

pub struct NeuralCanvasState {
	pub config: CanvasConfig,
	pub content: PortfolioContent,
	/// Content clusters with the active theme applied.
	pub clusters: Vec<Cluster>,
	pub metrics: Metrics,
	pub reduced_motion: bool,
	pub sim: Simulation,
	pub camera: Camera,
	pub hover: HoverState,
	pub tooltip: Option<Tooltip>,
	pub pointer_cursor: bool,
	pub expanded: Option<ExpandedLayout>,
	pub visited: HashSet<HitTarget>,
	pub starfield: Vec<BackgroundStar>,
	pub burst: Option<Burst>,
	pub secret: SecretState,
	/// Simulation clock in seconds, advanced by the clamped frame delta.
	pub time: f64,
	/// Starfield clock in seconds, advanced by real elapsed time.
	pub star_time: f64,
	pub now_ms: f64,
	clicks: ClickCounter,
	last_frame_ms: Option<f64>,
	fps: FpsCounter,
	events: Vec<CanvasEvent>,
	rng: StdRng,
}

impl NeuralCanvasState {
	pub fn new(
		content: PortfolioContent,
		config: CanvasConfig,
		width: f64,
		height: f64,
		reduced_motion: bool,
	) -> Self {
		Self::with_rng(content, config, width, height, reduced_motion, StdRng::from_entropy())
	}

	pub fn with_rng(
		content: PortfolioContent,
		config: CanvasConfig,
		width: f64,
		height: f64,
		reduced_motion: bool,
		mut rng: StdRng,
	) -> Self {
		let metrics = Metrics::new(width, height);
		let secret = SecretState::default();
		let graph = build_graph(
			metrics,
			&content.clusters,
			&config.calm,
			secret.satellite_multiplier,
			secret.edge_multiplier,
			&mut rng,
		);
		let starfield = generate_starfield(metrics.width, metrics.height, &mut rng);
		Self {
			clusters: themed_clusters(&content.clusters, secret.theme),
			content,
			config,
			metrics,
			reduced_motion,
			sim: Simulation::new(graph),
			camera: Camera::default(),
			hover: HoverState::default(),
			tooltip: None,
			pointer_cursor: false,
			expanded: None,
			visited: HashSet::new(),
			starfield,
			burst: None,
			secret,
			time: 0.0,
			star_time: 0.0,
			now_ms: 0.0,
			clicks: ClickCounter::default(),
			last_frame_ms: None,
			fps: FpsCounter::default(),
			events: Vec::new(),
			rng,
		}
	}

	/// Regenerates nodes and edges for the current viewport. An active well
	/// and in-flight particles carry over.
	pub fn rebuild(&mut self) {
		let graph = build_graph(
			self.metrics,
			&self.content.clusters,
			&self.config.calm,
			self.secret.satellite_multiplier,
			self.secret.edge_multiplier,
			&mut self.rng,
		);
		self.sim.graph = graph;
		self.hover = HoverState::default();
		self.tooltip = None;
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		info!("viewport resized to {width:.0}x{height:.0}");
		self.metrics = Metrics::new(width, height);
		self.rebuild();
		self.starfield = generate_starfield(self.metrics.width, self.metrics.height, &mut self.rng);
		let anchor = self
			.camera
			.expanded
			.as_deref()
			.map(|cluster| self.sim.graph.anchors.get(cluster));
		if self.camera.snap(anchor, self.metrics, &self.config.calm) == Some(CameraSettled::Collapsed) {
			self.events.push(CanvasEvent::ProjectSelect(None));
		}
		self.expanded = self.layout_expanded();
	}

	/// Swaps in new content; the graph is rebuilt only if the cluster ids change.
	pub fn set_content(&mut self, content: PortfolioContent) {
		let same_clusters = self
			.content
			.clusters
			.iter()
			.map(|c| &c.id)
			.eq(content.clusters.iter().map(|c| &c.id));
		self.content = content;
		self.clusters = themed_clusters(&self.content.clusters, self.secret.theme);
		if !same_clusters {
			self.rebuild();
		}
	}

	/// Advances everything by one display frame at timestamp `now_ms`.
	pub fn frame(&mut self, now_ms: f64) {
		let elapsed_ms = self.last_frame_ms.map_or(0.0, |last| (now_ms - last).max(0.0));
		self.last_frame_ms = Some(now_ms);
		self.now_ms = now_ms;
		let dt = (elapsed_ms / 1000.0).min(MAX_DT);
		self.time += dt;
		self.star_time += elapsed_ms / 1000.0;
		self.fps.tick(now_ms);
		self.secret.expire(now_ms);

		let particles = &mut self.sim.particles;
		particles.spawn_shooting_star(self.metrics.width, self.config.shooting_count, &mut self.rng);
		particles.advance(dt);

		if self.camera.advance(elapsed_ms) == Some(CameraSettled::Collapsed) {
			self.events.push(CanvasEvent::ProjectSelect(None));
		}

		self.sim.step(&self.config.calm, self.time, dt, self.reduced_motion, &mut self.rng);
		self.expanded = self.layout_expanded();

		if let Some(burst) = self.burst.as_mut() {
			if !burst.advance(dt) {
				self.burst = None;
			}
		}
	}

	fn layout_expanded(&self) -> Option<ExpandedLayout> {
		let cluster = self.camera.expanded.as_deref()?;
		let centre = self
			.sim
			.graph
			.hub(cluster)
			.map_or_else(|| self.sim.graph.anchors.get(cluster), |hub| Point::new(hub.x, hub.y));
		Some(layout_expanded(
			cluster,
			self.color_of(cluster),
			centre,
			&self.content,
			self.metrics,
			RingClock {
				time: self.time,
				reduced_motion: self.reduced_motion,
			},
			&self.visited,
		))
	}

	/// Hit regions laid out by the last completed frame.
	pub fn hits(&self) -> &[HitRegion] {
		match &self.expanded {
			Some(layout) => &layout.hits,
			None => &[],
		}
	}

	fn hex_of(&self, cluster: &str) -> &str {
		self.clusters
			.iter()
			.find(|c| c.id == cluster)
			.map_or(FALLBACK_HEX, |c| c.color.as_str())
	}

	pub fn color_of(&self, cluster: &str) -> Rgb {
		Rgb::from_hex(self.hex_of(cluster))
	}

	pub fn name_of<'a>(&'a self, cluster: &'a str) -> &'a str {
		self.clusters
			.iter()
			.find(|c| c.id == cluster)
			.map_or(cluster, |c| c.name.as_str())
	}

	fn hover_at(&self, world: Point) -> HoverState {
		let node = node_at(&self.sim.graph.nodes, self.metrics, world);
		HoverState {
			node,
			cluster: node.map(|i| self.sim.graph.nodes[i].cluster.clone()),
		}
	}

	fn tooltip_text(&self, target: &HitTarget) -> Option<String> {
		match target {
			HitTarget::Project(id) => self.content.project(id).map(|p| p.title.clone()),
			HitTarget::Contact(id) if id == MESSAGE_CONTACT => Some("Send a message".to_string()),
			HitTarget::Contact(id) => self.content.contact(id).map(|l| l.label.clone()),
			HitTarget::AboutSection(_) => None,
			HitTarget::Fact { source, index } => {
				let facts = match source {
					FactSource::About => &self.content.about_facts,
					FactSource::Fun => &self.content.fun_facts,
				};
				facts.get(*index).cloned()
			}
		}
	}

	pub fn pointer_move(&mut self, p: PointerInput) {
		let world = self.camera.transform.to_world(p.local());
		self.hover = self.hover_at(world);

		let region = self
			.camera
			.expanded
			.as_ref()
			.and_then(|_| region_at(self.hits(), world));
		let tooltip = region.and_then(|r| self.tooltip_text(&r.target)).map(|text| Tooltip {
			x: p.client_x + TOOLTIP_OFFSET.0,
			y: p.client_y + TOOLTIP_OFFSET.1,
			text,
		});
		let on_target = region.is_some();
		let on_hub = self
			.hover
			.node
			.and_then(|i| self.sim.graph.nodes.get(i))
			.is_some_and(Node::is_hub);
		self.tooltip = tooltip;
		self.pointer_cursor = on_target || on_hub;
	}

	pub fn pointer_leave(&mut self) {
		self.hover = HoverState::default();
		self.tooltip = None;
		self.pointer_cursor = false;
	}

	pub fn touch_start(&mut self, p: PointerInput) {
		let world = self.camera.transform.to_world(p.local());
		self.hover = self.hover_at(world);
	}

	pub fn touch_end(&mut self, p: PointerInput) {
		self.click(p);
	}

	pub fn click(&mut self, p: PointerInput) {
		if self.clicks.register(self.now_ms) {
			info!("click burst at ({:.0}, {:.0})", p.x, p.y);
			self.burst = Some(Burst::explode(p.x, p.y, &mut self.rng));
		}

		let world = self.camera.transform.to_world(p.local());
		if let Some(expanded) = self.camera.expanded.clone() {
			self.click_expanded(&expanded, world, p);
			return;
		}

		let nodes = &self.sim.graph.nodes;
		let target = self
			.hover
			.node
			.filter(|&i| nodes.get(i).is_some_and(|n| !n.is_consumed()))
			.or_else(|| node_at(nodes, self.metrics, world));
		let Some(hub) = target
			.and_then(|i| self.sim.graph.nodes.get_mut(i))
			.filter(|n| n.is_hub())
		else {
			return;
		};
		hub.pulse = Some(HUB_PULSE_START);
		let cluster = hub.cluster.clone();
		let anchor = self.sim.graph.anchors.get(&cluster);
		self.camera
			.zoom_to(&cluster, anchor, self.metrics, &self.config.calm, self.reduced_motion);
	}

	fn click_expanded(&mut self, expanded: &str, world: Point, p: PointerInput) {
		if let Some(region) = region_at(self.hits(), world).cloned() {
			self.activate(region, p, expanded);
			return;
		}
		let on_expanded_hub = node_at(&self.sim.graph.nodes, self.metrics, world)
			.map(|i| &self.sim.graph.nodes[i])
			.is_some_and(|n| n.is_hub() && n.cluster == expanded);
		if !on_expanded_hub {
			self.collapse();
		}
	}

	fn activate(&mut self, region: HitRegion, p: PointerInput, cluster: &str) {
		debug!("activating {:?}", region.target);
		let event = match &region.target {
			HitTarget::Project(id) => {
				let screen = self.camera.transform.to_screen(Point::new(region.x, region.y));
				let origin = p.canvas_origin();
				let selection = if self.reduced_motion {
					ProjectSelection::Id(id.clone())
				} else {
					ProjectSelection::Transition {
						id: id.clone(),
						x: screen.x + origin.x,
						y: screen.y + origin.y,
						color: self.hex_of(cluster).to_string(),
					}
				};
				Some(CanvasEvent::ProjectSelect(Some(selection)))
			}
			HitTarget::AboutSection(section) => Some(CanvasEvent::AboutSelect(*section)),
			HitTarget::Contact(id) if id == MESSAGE_CONTACT => Some(CanvasEvent::OpenContactModal),
			HitTarget::Contact(id) => self
				.content
				.contact(id)
				.filter(|l| !l.href.is_empty())
				.map(|l| CanvasEvent::OpenUrl(l.href.clone())),
			HitTarget::Fact { .. } => return,
		};
		self.events.extend(event);
		self.visited.insert(region.target);
	}

	/// Starts collapsing the expanded cluster, if any.
	pub fn collapse(&mut self) {
		if self.camera.collapse(&self.config.calm, self.reduced_motion) {
			self.tooltip = None;
		}
	}

	/// Handles a window keydown. Keys typed into a text field only count
	/// for Escape.
	pub fn key(&mut self, key: &str, ctrl: bool, meta: bool, in_field: bool) {
		if key == "Escape" {
			self.collapse();
			self.secret.help.clear();
			return;
		}
		if in_field {
			return;
		}
		let mut chars = key.chars();
		let (Some(ch), None) = (chars.next(), chars.next()) else {
			return;
		};
		if !ctrl && !meta {
			self.type_char(ch);
		}
	}

	/// Runs a whole command string, as typed into the help overlay.
	pub fn run_command(&mut self, command: &str) {
		for ch in command.trim().chars() {
			self.type_char(ch);
		}
	}

	fn type_char(&mut self, ch: char) {
		let theme = self.secret.theme;
		match self.secret.type_char(ch, self.now_ms) {
			Some(SecretAction::ActivateWell) => self.activate_well(),
			Some(SecretAction::RebuildGraph) => self.rebuild(),
			None => {}
		}
		if self.secret.theme != theme {
			self.clusters = themed_clusters(&self.content.clusters, self.secret.theme);
		}
	}

	pub fn activate_well(&mut self) {
		self.sim.well = Some(GravityWell::activate(
			self.metrics,
			self.config.well_strength,
			self.config.well_lifetime_s,
			&mut self.rng,
		));
	}

	pub fn show_help(&mut self) {
		self.secret.show_help(self.now_ms);
	}

	pub fn hide_help(&mut self) {
		self.secret.help.clear();
	}

	/// Side effects queued since the last call.
	pub fn drain_events(&mut self) -> Vec<CanvasEvent> {
		std::mem::take(&mut self.events)
	}

	pub fn overlay(&self) -> Overlay {
		let now = self.now_ms;
		Overlay {
			tooltip: self.tooltip.clone(),
			pointer: self.pointer_cursor,
			expanded: self.camera.expanded.is_some(),
			help: self.secret.help.is_active(now),
			flash: self.secret.flash.is_active(now),
			theme: self.secret.theme,
			dev: self.secret.dev_mode.is_active(now).then(|| DevStats {
				fps: self.fps.fps,
				nodes: self.sim.graph.nodes.len(),
				edges: self.sim.graph.edges.len(),
				clicks: self.clicks.count,
				satellite_multiplier: self.secret.satellite_multiplier,
				edge_multiplier: self.secret.edge_multiplier,
			}),
		}
	}
}

#[cfg(test)]
mod tests {
	use std::collections::HashMap;

	use super::super::camera::{CameraPhase, CameraTransform};
	use super::super::types::{AboutSection, ContactLink, Project};
	use super::*;

	const FRAME_MS: f64 = 16.0;

	fn cluster(id: &str, color: &str) -> Cluster {
		Cluster {
			id: id.into(),
			name: id.to_uppercase(),
			color: color.into(),
		}
	}

	fn project(id: &str, cluster: &str) -> Project {
		Project {
			id: id.into(),
			title: format!("Project {id}"),
			cluster: cluster.into(),
			description: "demo".into(),
			tech: vec!["Rust".into()],
			demo_url: None,
			repo_url: None,
			preview_image: None,
		}
	}

	fn content(clusters: &[&str]) -> PortfolioContent {
		PortfolioContent {
			clusters: clusters.iter().map(|id| cluster(id, "#22d3ee")).collect(),
			projects: vec![project("1", "frontend"), project("2", "frontend")],
			skills: HashMap::from([("frontend".to_string(), vec!["Leptos".into(), "WASM".into()])]),
			contact_links: vec![
				ContactLink {
					id: "github".into(),
					label: "GitHub".into(),
					href: "https://github.com/example".into(),
				},
				ContactLink {
					id: MESSAGE_CONTACT.into(),
					label: "Message".into(),
					href: String::new(),
				},
			],
			about_facts: vec!["Writes Rust".into()],
			fun_facts: vec!["Likes stars".into()],
		}
	}

	fn state(clusters: &[&str]) -> NeuralCanvasState {
		NeuralCanvasState::with_rng(
			content(clusters),
			CanvasConfig::default(),
			1200.0,
			800.0,
			false,
			StdRng::seed_from_u64(42),
		)
	}

	fn at(p: Point) -> PointerInput {
		PointerInput {
			x: p.x,
			y: p.y,
			client_x: p.x,
			client_y: p.y,
		}
	}

	/// Runs frames every 16 ms for `duration_ms`; returns the last timestamp.
	fn run(s: &mut NeuralCanvasState, from_ms: f64, duration_ms: f64) -> f64 {
		let mut now = from_ms;
		while now < from_ms + duration_ms {
			now += FRAME_MS;
			s.frame(now);
		}
		now
	}

	fn hub_screen(s: &NeuralCanvasState, cluster: &str) -> Point {
		let hub = s.sim.graph.hub(cluster).unwrap();
		s.camera.transform.to_screen(Point::new(hub.x, hub.y))
	}

	fn expand(s: &mut NeuralCanvasState, cluster: &str) -> f64 {
		s.frame(0.0);
		s.click(at(hub_screen(s, cluster)));
		run(s, 0.0, 1_100.0)
	}

	fn region_screen(s: &NeuralCanvasState, target: &HitTarget) -> Point {
		let region = s.hits().iter().find(|h| &h.target == target).unwrap();
		s.camera.transform.to_screen(Point::new(region.x, region.y))
	}

	#[test]
	fn builds_two_hubs_and_twenty_four_satellites() {
		let s = state(&["frontend", "backend"]);
		assert_eq!(s.sim.graph.nodes.len(), 26);
		assert_eq!(s.sim.graph.nodes.iter().filter(|n| n.is_hub()).count(), 2);
	}

	#[test]
	fn clicking_a_hub_zooms_into_its_cluster() {
		let mut s = state(&["frontend", "backend"]);
		s.frame(0.0);
		s.click(at(hub_screen(&s, "frontend")));
		assert_eq!(s.camera.phase, CameraPhase::ZoomingIn);
		assert!(s.sim.graph.hub("frontend").unwrap().pulse.is_some());
		s.frame(FRAME_MS);
		assert_ne!(s.camera.transform, CameraTransform::IDENTITY);

		run(&mut s, FRAME_MS, 1_000.0);
		assert_eq!(s.camera.expanded.as_deref(), Some("frontend"));
		assert_eq!(s.camera.phase, CameraPhase::Expanded);
		assert!((s.camera.transform.sx - 1.7).abs() < 1e-9);
		assert!(s.drain_events().is_empty());
	}

	#[test]
	fn long_frame_gaps_cap_the_simulation_step_but_not_the_camera() {
		let mut s = state(&["frontend", "backend"]);
		s.frame(0.0);
		s.click(at(hub_screen(&s, "frontend")));
		assert_eq!(s.camera.phase, CameraPhase::ZoomingIn);

		s.frame(10_000.0);
		assert_eq!(s.time, MAX_DT);
		assert_eq!(s.star_time, 10.0);
		assert_eq!(s.camera.phase, CameraPhase::Expanded);
		assert_eq!(s.camera.expanded.as_deref(), Some("frontend"));
	}

	#[test]
	fn reduced_motion_selects_projects_without_a_transition() {
		let mut s = NeuralCanvasState::with_rng(
			content(&["frontend", "backend"]),
			CanvasConfig::default(),
			1200.0,
			800.0,
			true,
			StdRng::seed_from_u64(42),
		);
		expand(&mut s, "frontend");
		let screen = region_screen(&s, &HitTarget::Project("1".into()));
		s.click(at(screen));

		let events = s.drain_events();
		assert_eq!(
			events,
			vec![CanvasEvent::ProjectSelect(Some(ProjectSelection::Id("1".into())))]
		);
	}

	#[test]
	fn clicking_a_project_selects_it_and_marks_it_visited() {
		let mut s = state(&["frontend", "backend"]);
		let now = expand(&mut s, "frontend");
		let target = HitTarget::Project("1".into());
		let screen = region_screen(&s, &target);
		s.click(PointerInput {
			x: screen.x,
			y: screen.y,
			client_x: screen.x + 5.0,
			client_y: screen.y + 80.0,
		});

		let events = s.drain_events();
		assert_eq!(events.len(), 1);
		let CanvasEvent::ProjectSelect(Some(ProjectSelection::Transition { id, x, y, color })) = &events[0] else {
			panic!("unexpected event {events:?}");
		};
		assert_eq!(id, "1");
		assert!((x - (screen.x + 5.0)).abs() < 1e-9 && (y - (screen.y + 80.0)).abs() < 1e-9);
		assert_eq!(color, "#22d3ee");
		assert!(s.visited.contains(&target));
		assert_eq!(s.camera.expanded.as_deref(), Some("frontend"));

		s.frame(now + FRAME_MS);
		let layout = s.expanded.as_ref().unwrap();
		let visited: Vec<_> = layout.markers.iter().map(|m| m.first_view).collect();
		assert_eq!(visited, vec![false, true]);
	}

	#[test]
	fn escape_collapses_and_reports_once() {
		let mut s = state(&["frontend", "backend"]);
		let now = expand(&mut s, "frontend");
		s.key("Escape", false, false, false);
		assert_eq!(s.camera.phase, CameraPhase::ZoomingOut);
		let now = run(&mut s, now, 608.0);
		assert_eq!(s.camera.transform, CameraTransform::IDENTITY);
		assert_eq!(s.camera.expanded, None);
		assert!(s.expanded.is_none());
		run(&mut s, now, 200.0);
		assert_eq!(s.drain_events(), vec![CanvasEvent::ProjectSelect(None)]);
	}

	#[test]
	fn escape_from_a_text_field_still_closes_help_and_collapses() {
		let mut s = state(&["frontend", "backend"]);
		let now = expand(&mut s, "frontend");
		s.show_help();
		assert!(s.overlay().help);

		for ch in "dev".chars() {
			s.key(&ch.to_string(), false, false, true);
		}
		assert!(s.overlay().dev.is_none());

		s.key("Escape", false, false, true);
		assert!(!s.overlay().help);
		assert_eq!(s.camera.phase, CameraPhase::ZoomingOut);
		run(&mut s, now, 800.0);
		assert_eq!(s.camera.expanded, None);
	}

	#[test]
	fn outside_click_collapses_but_own_hub_does_not() {
		let mut s = state(&["frontend", "backend"]);
		let now = expand(&mut s, "frontend");
		s.click(at(hub_screen(&s, "frontend")));
		assert_eq!(s.camera.phase, CameraPhase::Expanded);
		s.click(at(Point::new(1.0, 1.0)));
		assert_eq!(s.camera.phase, CameraPhase::ZoomingOut);
		run(&mut s, now, 700.0);
		assert_eq!(s.camera.phase, CameraPhase::Idle);
	}

	#[test]
	fn well_consumes_nearby_satellite_then_releases_without_snap() {
		let mut s = state(&["frontend", "backend"]);
		s.frame(0.0);
		let victim = s.sim.graph.nodes.iter().position(|n| !n.is_hub()).unwrap();
		let (vx, vy) = (s.sim.graph.nodes[victim].x, s.sim.graph.nodes[victim].y);
		s.sim.well = Some(GravityWell {
			x: vx + 10.0,
			y: vy,
			radius: s.metrics.well_radius(),
			visual_radius: s.metrics.well_visual_radius(),
			strength: 3_000.0,
			remaining_s: 2.0,
		});

		let mut now = 0.0;
		let mut last_r = s.sim.graph.nodes[victim].r;
		while s.sim.graph.nodes[victim].r > 0.0 {
			now += FRAME_MS;
			s.frame(now);
			let r = s.sim.graph.nodes[victim].r;
			assert!(r <= last_r);
			last_r = r;
			assert!(now < 1_500.0, "satellite never consumed");
		}
		let parked = &s.sim.graph.nodes[victim];
		assert_eq!((parked.x, parked.y), (-1000.0, -1000.0));
		assert_ne!(node_at(&s.sim.graph.nodes, s.metrics, Point::new(parked.x, parked.y)), Some(victim));

		while s.sim.well.is_some() {
			now += FRAME_MS;
			s.frame(now);
		}
		let before: Vec<_> = s.sim.graph.nodes.iter().map(|n| (n.x, n.y)).collect();
		s.frame(now + FRAME_MS);
		for (i, (n, (bx, by))) in s.sim.graph.nodes.iter().zip(before).enumerate() {
			if n.is_hub() || n.is_consumed() {
				continue;
			}
			let jump = (n.x - bx).hypot(n.y - by);
			assert!(jump < 2.0, "satellite {i} jumped {jump}px");
		}
		assert_eq!(s.sim.graph.nodes[victim].r, 0.0);
	}

	#[test]
	fn resize_rebuilds_around_new_anchors() {
		let mut s = state(&["frontend", "backend"]);
		s.resize(800.0, 600.0);
		assert_eq!(s.sim.graph.nodes.len(), 26);
		let hub = s.sim.graph.hub("backend").unwrap();
		assert!((hub.x - 624.0).abs() <= 10.0 && (hub.y - 210.0).abs() <= 10.0);
		assert_eq!(s.starfield.len(), 60);
	}

	#[test]
	fn resize_while_expanded_refocuses_the_camera() {
		let mut s = state(&["frontend", "backend"]);
		expand(&mut s, "frontend");
		s.resize(800.0, 600.0);
		let anchor = s.sim.graph.anchors.get("frontend");
		let target = CameraTransform::focused(anchor, s.metrics, 1.7);
		assert_eq!(s.camera.transform, target);
		assert_eq!(s.camera.expanded.as_deref(), Some("frontend"));
	}

	#[test]
	fn hovering_a_project_shows_its_title() {
		let mut s = state(&["frontend", "backend"]);
		expand(&mut s, "frontend");
		let screen = region_screen(&s, &HitTarget::Project("2".into()));
		s.pointer_move(at(screen));
		let tip = s.tooltip.clone().unwrap();
		assert_eq!(tip.text, "Project 2");
		assert_eq!((tip.x, tip.y), (screen.x + 10.0, screen.y - 16.0));
		assert!(s.pointer_cursor);
		s.pointer_leave();
		assert!(s.tooltip.is_none() && !s.pointer_cursor);
	}

	#[test]
	fn contact_markers_open_modal_or_url() {
		let mut s = state(&["frontend", "contact"]);
		expand(&mut s, "contact");
		let message = region_screen(&s, &HitTarget::Contact(MESSAGE_CONTACT.into()));
		s.pointer_move(at(message));
		assert_eq!(s.tooltip.as_ref().map(|t| t.text.as_str()), Some("Send a message"));
		s.click(at(message));
		let github = region_screen(&s, &HitTarget::Contact("github".into()));
		s.click(at(github));
		assert_eq!(
			s.drain_events(),
			vec![
				CanvasEvent::OpenContactModal,
				CanvasEvent::OpenUrl("https://github.com/example".into())
			]
		);
	}

	#[test]
	fn about_sections_select_and_facts_only_inform() {
		let mut s = state(&["frontend", "about"]);
		expand(&mut s, "about");
		let timeline = region_screen(&s, &HitTarget::AboutSection(AboutSection::Timeline));
		s.click(at(timeline));
		assert_eq!(s.drain_events(), vec![CanvasEvent::AboutSelect(AboutSection::Timeline)]);

		let fact = s
			.hits()
			.iter()
			.find(|h| matches!(h.target, HitTarget::Fact { .. }))
			.cloned()
			.unwrap();
		let screen = s.camera.transform.to_screen(Point::new(fact.x, fact.y));
		s.pointer_move(at(screen));
		assert!(s.tooltip.is_some());
		s.click(at(screen));
		assert!(s.drain_events().is_empty());
		assert_eq!(s.camera.phase, CameraPhase::Expanded);
	}

	#[test]
	fn touch_end_acts_as_a_click() {
		let mut s = state(&["frontend", "backend"]);
		s.frame(0.0);
		let hub = at(hub_screen(&s, "backend"));
		s.touch_start(hub);
		assert_eq!(s.hover.cluster.as_deref(), Some("backend"));
		s.touch_end(hub);
		assert_eq!(s.camera.expanded.as_deref(), Some("backend"));
	}

	#[test]
	fn ten_rapid_clicks_trigger_a_burst() {
		let mut s = state(&["frontend", "backend"]);
		for i in 0..10 {
			s.frame(f64::from(i) * 100.0);
			s.click(at(Point::new(5.0, 5.0)));
		}
		assert!(s.burst.is_some());
	}

	#[test]
	fn typed_commands_drive_theme_well_and_density() {
		let mut s = state(&["frontend", "backend"]);
		s.frame(0.0);
		for ch in "matrix".chars() {
			s.key(&ch.to_string(), false, false, false);
		}
		assert_eq!(s.color_of("frontend"), Rgb::from_hex("#00ff00"));
		assert!(s.overlay().flash);

		s.key("b", true, false, false);
		s.run_command("blackhole");
		assert!(s.sim.well.is_some());

		s.run_command("dev");
		s.run_command("more");
		assert_eq!(s.sim.graph.nodes.len(), 2 + 2 * 18);
		let dev = s.overlay().dev.unwrap();
		assert_eq!(dev.nodes, 38);
		assert_eq!(dev.satellite_multiplier, 1.5);
	}

	#[test]
	fn content_swap_keeps_graph_unless_clusters_change() {
		let mut s = state(&["frontend", "backend"]);
		let first_hub = s.sim.graph.nodes[0].x;
		let mut next = content(&["frontend", "backend"]);
		next.projects.clear();
		s.set_content(next);
		assert_eq!(s.sim.graph.nodes[0].x, first_hub);
		s.set_content(content(&["frontend", "backend", "ai"]));
		assert_eq!(s.sim.graph.nodes.len(), 39);
	}
}
