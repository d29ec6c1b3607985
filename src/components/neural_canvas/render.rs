use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::draw;
use super::physics::GravityWell;
use super::scene::{ExpandedLayout, LabelStyle};
use super::state::NeuralCanvasState;
use super::types::{Edge, EdgeScope, Node};

const HOVER_EDGE_ALPHA: f64 = 0.38;
const CROSS_EDGE_ALPHA: f64 = 0.02;
const SKILL_CHIP_HEIGHT: f64 = 22.0;
/// Edges whose midpoint lies within this many well radii fade and bend.
const WELL_FADE_RADII: f64 = 5.0;

/// Draws one frame. `dpr` maps CSS pixels to the backing store.
pub fn render(state: &NeuralCanvasState, ctx: &CanvasRenderingContext2d, dpr: f64) -> Result<(), JsValue> {
	let (w, h) = (state.metrics.width, state.metrics.height);
	ctx.set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0)?;
	ctx.set_global_composite_operation("source-over")?;
	ctx.set_global_alpha(1.0);
	ctx.clear_rect(0.0, 0.0, w, h);

	draw::particles(ctx, &state.sim.particles.particles, false)?;
	if let Some(layout) = &state.expanded {
		draw::background_tint(ctx, w, h, layout.color)?;
	}

	let t = state.camera.transform;
	ctx.save();
	ctx.transform(t.sx, 0.0, 0.0, t.sy, t.tx, t.ty)?;
	draw_edges(state, ctx);
	draw_nodes(state, ctx)?;
	if let Some(layout) = &state.expanded {
		ctx.save();
		ctx.set_global_alpha(state.camera.expanded_fade.clamp(0.0, 1.0));
		draw_expanded(layout, ctx, state.time)?;
		ctx.restore();
	}
	draw::particles(ctx, &state.sim.particles.particles, true)?;
	if let Some(well) = &state.sim.well {
		draw::gravity_well(ctx, well, state.time)?;
	}
	ctx.restore();

	if let Some(burst) = &state.burst {
		draw::burst(ctx, burst)?;
	}

	ctx.save();
	ctx.set_global_composite_operation("destination-over")?;
	draw::starfield(ctx, &state.starfield, state.star_time)?;
	ctx.restore();
	Ok(())
}

fn is_hover_edge(state: &NeuralCanvasState, e: &Edge, a: &Node, b: &Node) -> bool {
	let hover = &state.hover;
	let cluster = hover.cluster.as_deref();
	let touches = hover.node.is_some()
		&& (hover.node == Some(e.a)
			|| hover.node == Some(e.b)
			|| (a.is_hub() && Some(a.cluster.as_str()) == cluster)
			|| (b.is_hub() && Some(b.cluster.as_str()) == cluster));
	let inside = !e.cross
		&& matches!((&e.scope, cluster), (EdgeScope::Cluster(own), Some(c)) if own == c);
	touches || inside
}

fn draw_edges(state: &NeuralCanvasState, ctx: &CanvasRenderingContext2d) {
	let calm = &state.config.calm;
	let nodes = &state.sim.graph.nodes;
	let ping = ((state.time * calm.edge_pulse_freq).sin() + 1.0) * 0.5;

	for e in &state.sim.graph.edges {
		let (Some(a), Some(b)) = (nodes.get(e.a), nodes.get(e.b)) else {
			continue;
		};
		if a.is_consumed() || b.is_consumed() {
			continue;
		}
		let hovered = is_hover_edge(state, e, a, b);
		let mut alpha = if hovered {
			HOVER_EDGE_ALPHA
		} else if e.cross {
			CROSS_EDGE_ALPHA + ping * calm.edge_pulse_amp
		} else {
			calm.edge_base_alpha + ping * calm.edge_pulse_amp
		};
		let stroke = if hovered && !e.cross {
			state.color_of(&a.cluster).rgba(alpha)
		} else {
			format!("rgba(255,255,255,{alpha:.3})")
		};
		ctx.set_line_width(if e.cross { 0.6 } else { 1.1 });
		ctx.begin_path();
		ctx.move_to(a.x, a.y);

		match state.sim.well.as_ref().and_then(|well| well_bend(well, a, b, state.time)) {
			Some((fade, cx, cy)) => {
				alpha *= fade * 0.3;
				ctx.set_stroke_style_str(&format!("rgba(255,255,255,{alpha:.3})"));
				ctx.quadratic_curve_to(cx, cy, b.x, b.y);
			}
			None => {
				ctx.set_stroke_style_str(&stroke);
				ctx.line_to(b.x, b.y);
			}
		}
		ctx.stroke();
	}
}

/// Fade factor and bent control point for an edge near the well.
fn well_bend(well: &GravityWell, a: &Node, b: &Node, time: f64) -> Option<(f64, f64, f64)> {
	let (mx, my) = ((a.x + b.x) / 2.0, (a.y + b.y) / 2.0);
	let (dx, dy) = (well.x - mx, well.y - my);
	let dist = dx.hypot(dy);
	let reach = well.radius * WELL_FADE_RADII;
	if dist >= reach {
		return None;
	}
	let fade = (1.0 - (reach - dist) / reach).max(0.0);
	let bend = (time * 2.0).sin() * 3.0 * fade;
	let angle = dy.atan2(dx);
	Some((fade, mx + angle.cos() * bend, my + angle.sin() * bend))
}

fn draw_nodes(state: &NeuralCanvasState, ctx: &CanvasRenderingContext2d) -> Result<(), JsValue> {
	let hover_cluster = state.hover.cluster.as_deref();
	let label_fade = state.camera.label_fade.clamp(0.0, 1.0);

	for (i, n) in state.sim.graph.nodes.iter().enumerate() {
		let color = state.color_of(&n.cluster);
		if n.is_hub() {
			let hovered = hover_cluster == Some(n.cluster.as_str());
			draw::hub(ctx, n.x, n.y, n.r, color, hovered, state.time)?;
			if let Some(pulse) = n.pulse {
				draw::hub_pulse(ctx, n.x, n.y, n.r, color, pulse)?;
			}
			if label_fade > 0.0 {
				ctx.save();
				ctx.set_global_alpha(label_fade);
				draw::hub_label(ctx, n.x, n.y, state.name_of(&n.cluster), color, hovered)?;
				ctx.restore();
			}
		} else if !n.is_consumed() {
			ctx.save();
			ctx.set_global_alpha(if state.hover.node == Some(i) { 1.0 } else { 0.8 });
			draw::orbital_node(ctx, n.x, n.y, n.r.max(2.0), color, state.time)?;
			ctx.restore();
		}
	}
	Ok(())
}

fn draw_expanded(layout: &ExpandedLayout, ctx: &CanvasRenderingContext2d, time: f64) -> Result<(), JsValue> {
	let (cx, cy) = (layout.centre.x, layout.centre.y);
	for guide in &layout.guides {
		draw::orbit_guide(ctx, cx, cy, guide.radius, layout.color, guide.alpha)?;
	}
	for chip in &layout.chips {
		draw::skill_chip(ctx, chip.x, chip.y, &chip.label, layout.color, time, SKILL_CHIP_HEIGHT)?;
	}
	for m in &layout.markers {
		draw::project_gem(ctx, m.x, m.y, m.r, layout.color, time, m.first_view)?;
		match m.style {
			LabelStyle::Pill => draw::pill_label(ctx, m.x, m.y - m.r, &m.label)?,
			LabelStyle::Chip => {
				let at = m.chip_anchor();
				draw::skill_chip(ctx, at.x, at.y, &m.label, layout.color, time, SKILL_CHIP_HEIGHT)?;
			}
		}
	}
	Ok(())
}
