//! Canvas primitives. Every function draws in whatever coordinate space the
//! context is currently in.

use std::f64::consts::{PI, TAU};

use wasm_bindgen::JsValue;
use web_sys::{CanvasGradient, CanvasRenderingContext2d};

use super::particles::{Burst, Particle, ParticleKind};
use super::physics::GravityWell;
use super::starfield::BackgroundStar;
use super::types::Rgb;

type DrawResult = Result<(), JsValue>;

const LABEL_FONT: &str = "12px Inter, ui-sans-serif, system-ui, sans-serif";
const CHIP_FONT: &str = "11px Inter, sans-serif";
const HUB_FONT: &str = "600 16px Inter, ui-sans-serif, system-ui, sans-serif";

#[allow(deprecated)]
fn fill_gradient(ctx: &CanvasRenderingContext2d, gradient: &CanvasGradient) {
	ctx.set_fill_style(gradient);
}

#[allow(deprecated)]
fn stroke_gradient(ctx: &CanvasRenderingContext2d, gradient: &CanvasGradient) {
	ctx.set_stroke_style(gradient);
}

fn radial(
	ctx: &CanvasRenderingContext2d,
	x: f64,
	y: f64,
	r: f64,
	stops: &[(f32, String)],
) -> Result<CanvasGradient, JsValue> {
	let gradient = ctx.create_radial_gradient(x, y, 0.0, x, y, r.max(0.01))?;
	for (offset, color) in stops {
		gradient.add_color_stop(*offset, color)?;
	}
	Ok(gradient)
}

pub fn circle(ctx: &CanvasRenderingContext2d, x: f64, y: f64, r: f64) -> DrawResult {
	ctx.begin_path();
	ctx.arc(x, y, r.max(0.0), 0.0, TAU)
}

/// Fills a disc with a radial gradient centred on it.
fn glow(ctx: &CanvasRenderingContext2d, x: f64, y: f64, r: f64, stops: &[(f32, String)]) -> DrawResult {
	let gradient = radial(ctx, x, y, r, stops)?;
	fill_gradient(ctx, &gradient);
	circle(ctx, x, y, r)?;
	ctx.fill();
	Ok(())
}

fn ring(ctx: &CanvasRenderingContext2d, x: f64, y: f64, r: f64, color: &str, width: f64) -> DrawResult {
	circle(ctx, x, y, r)?;
	ctx.set_stroke_style_str(color);
	ctx.set_line_width(width);
	ctx.stroke();
	Ok(())
}

pub fn rounded_rect_path(ctx: &CanvasRenderingContext2d, x: f64, y: f64, w: f64, h: f64, r: f64) {
	let r = r.min(w / 2.0).min(h / 2.0).max(0.0);
	ctx.begin_path();
	ctx.move_to(x + r, y);
	ctx.line_to(x + w - r, y);
	ctx.quadratic_curve_to(x + w, y, x + w, y + r);
	ctx.line_to(x + w, y + h - r);
	ctx.quadratic_curve_to(x + w, y + h, x + w - r, y + h);
	ctx.line_to(x + r, y + h);
	ctx.quadratic_curve_to(x, y + h, x, y + h - r);
	ctx.line_to(x, y + r);
	ctx.quadratic_curve_to(x, y, x + r, y);
	ctx.close_path();
}

fn text_width(ctx: &CanvasRenderingContext2d, text: &str) -> f64 {
	ctx.measure_text(text).map_or(text.len() as f64 * 6.0, |m| m.width())
}

/// Radial tint of the expanded cluster over the whole viewport.
pub fn background_tint(ctx: &CanvasRenderingContext2d, width: f64, height: f64, color: Rgb) -> DrawResult {
	let (cx, cy) = (width / 2.0, height / 2.0);
	let gradient = radial(
		ctx,
		cx,
		cy,
		width.max(height) * 0.6,
		&[(0.0, color.rgba(0.08)), (1.0, "rgba(0,0,0,0)".into())],
	)?;
	fill_gradient(ctx, &gradient);
	ctx.fill_rect(0.0, 0.0, width, height);
	Ok(())
}

pub fn hub(ctx: &CanvasRenderingContext2d, x: f64, y: f64, r: f64, color: Rgb, hovered: bool, time: f64) -> DrawResult {
	let c = if hovered { color.lighten(35) } else { color };
	let pulse = 0.25 + 0.15 * (time * 2.0).sin();

	glow(
		ctx,
		x,
		y,
		r * 4.0,
		&[
			(0.0, c.rgba(0.08 + pulse * 0.04)),
			(0.4, c.lighten(15).rgba(0.04 + pulse * 0.02)),
			(1.0, "rgba(0,0,0,0)".into()),
		],
	)?;
	glow(
		ctx,
		x,
		y,
		r * 2.8,
		&[
			(0.0, c.rgba(0.15 + pulse * 0.05)),
			(0.7, c.rgba(0.05)),
			(1.0, "rgba(0,0,0,0)".into()),
		],
	)?;

	ctx.save();
	ctx.set_shadow_color(&c.rgba(0.4));
	ctx.set_shadow_blur(if hovered { 15.0 } else { 10.0 });
	ctx.set_shadow_offset_y(if hovered { 4.0 } else { 2.0 });
	glow(
		ctx,
		x,
		y,
		r * 1.1,
		&[(0.0, c.rgba(0.98)), (0.7, c.rgba(0.9)), (1.0, c.rgba(0.7))],
	)?;
	ctx.restore();

	glow(
		ctx,
		x,
		y,
		r * 0.7,
		&[(0.0, c.lighten(50).rgba(1.0)), (0.5, c.rgba(0.95)), (1.0, c.rgba(0.8))],
	)?;
	glow(
		ctx,
		x,
		y,
		r * 0.35,
		&[
			(0.0, "rgba(255,255,255,0.6)".into()),
			(0.7, "rgba(255,255,255,0.2)".into()),
			(1.0, "rgba(255,255,255,0)".into()),
		],
	)?;
	ring(ctx, x, y, r + 1.5, &c.rgba(0.8), 2.0)?;
	ring(ctx, x, y, r + 3.0, &c.rgba(0.3), 1.0)?;

	ctx.save();
	ctx.set_global_alpha(0.15);
	ctx.set_line_width(1.0);
	for i in 0..8 {
		let a = f64::from(i) / 8.0 * TAU + time * 0.3;
		ctx.begin_path();
		ctx.move_to(x + a.cos() * (r + 2.0), y + a.sin() * (r + 2.0));
		ctx.line_to(x + a.cos() * (r + 12.0), y + a.sin() * (r + 12.0));
		ctx.set_stroke_style_str(&c.rgba(0.5 + 0.3 * (time * 2.0 + f64::from(i) * 0.3).sin()));
		ctx.stroke();
	}
	ctx.restore();

	for i in 0..2 {
		let i = f64::from(i);
		let alpha = 0.15 - i * 0.05 + (time * 1.5 + i * 0.5).sin() * 0.03;
		ring(ctx, x, y, r + 8.0 + i * 6.0, &c.rgba(alpha), 0.6)?;
	}

	for i in 0..4 {
		let i = f64::from(i);
		let a = i / 4.0 * TAU + time * 0.8;
		let orbit = r + 10.0 + (time * 1.2 + i).sin() * 2.0;
		ctx.set_fill_style_str(&c.rgba(0.2 + 0.1 * (time * 2.0 + i).sin()));
		circle(ctx, x + a.cos() * orbit, y + a.sin() * orbit, 1.0)?;
		ctx.fill();
	}
	Ok(())
}

/// Expanding ring left by a hub click.
pub fn hub_pulse(ctx: &CanvasRenderingContext2d, x: f64, y: f64, r: f64, color: Rgb, pulse: f64) -> DrawResult {
	ring(ctx, x, y, r * (1.0 + pulse * 1.5), &color.rgba(0.5 * (1.0 - pulse)), 2.0)
}

pub fn hub_label(ctx: &CanvasRenderingContext2d, x: f64, y: f64, label: &str, color: Rgb, hovered: bool) -> DrawResult {
	ctx.set_font(HUB_FONT);
	let (w, h) = (text_width(ctx, label) + 24.0, 28.0);
	let (left, top) = (x - w / 2.0, y - h - 30.0);

	let gradient = ctx.create_linear_gradient(left, top, left, top + h);
	let (a0, a1, a2) = if hovered { (0.45, 0.25, 0.15) } else { (0.35, 0.2, 0.1) };
	gradient.add_color_stop(0.0, &color.rgba(a0))?;
	gradient.add_color_stop(0.5, &color.rgba(a1))?;
	gradient.add_color_stop(1.0, &color.rgba(a2))?;

	ctx.save();
	ctx.set_shadow_color(&color.rgba(0.3));
	ctx.set_shadow_blur(8.0);
	ctx.set_shadow_offset_y(2.0);
	rounded_rect_path(ctx, left, top, w, h, 14.0);
	fill_gradient(ctx, &gradient);
	ctx.fill();
	ctx.restore();

	ctx.set_stroke_style_str(&color.rgba(if hovered { 0.8 } else { 0.6 }));
	ctx.set_line_width(if hovered { 1.5 } else { 1.0 });
	ctx.stroke();

	ctx.save();
	ctx.set_shadow_color("rgba(0,0,0,0.3)");
	ctx.set_shadow_blur(2.0);
	ctx.set_shadow_offset_y(1.0);
	ctx.set_fill_style_str("rgba(245,248,255,0.95)");
	ctx.set_text_baseline("middle");
	ctx.set_text_align("center");
	ctx.fill_text(label, x, top + h / 2.0)?;
	ctx.restore();
	Ok(())
}

/// Small satellite with glow and a position-seeded twinkle.
pub fn orbital_node(ctx: &CanvasRenderingContext2d, x: f64, y: f64, r: f64, color: Rgb, time: f64) -> DrawResult {
	glow(
		ctx,
		x,
		y,
		r * 3.0,
		&[(0.0, color.rgba(0.2)), (0.5, color.rgba(0.1)), (1.0, "rgba(0,0,0,0)".into())],
	)?;
	glow(
		ctx,
		x,
		y,
		r * 2.0,
		&[(0.0, color.rgba(0.25)), (0.7, color.rgba(0.12)), (1.0, "rgba(0,0,0,0)".into())],
	)?;
	glow(
		ctx,
		x,
		y,
		r,
		&[
			(0.0, color.lighten(30).rgba(0.95)),
			(0.7, color.rgba(0.85)),
			(1.0, color.rgba(0.6)),
		],
	)?;
	glow(
		ctx,
		x,
		y,
		r,
		&[
			(0.0, "rgba(255,255,255,0.6)".into()),
			(0.5, "rgba(255,255,255,0.2)".into()),
			(1.0, "rgba(255,255,255,0)".into()),
		],
	)?;

	let twinkle = 0.55 + 0.45 * ((x + y) * 0.03 + time * 3.0).sin();
	ctx.save();
	ctx.set_global_alpha(ctx.global_alpha() * 0.6 * twinkle);
	ctx.set_fill_style_str("rgba(255,255,255,0.9)");
	circle(ctx, x, y, (r * 0.45).max(1.0))?;
	ctx.fill();
	ctx.restore();
	Ok(())
}

pub fn skill_chip(ctx: &CanvasRenderingContext2d, x: f64, y: f64, label: &str, color: Rgb, time: f64, height: f64) -> DrawResult {
	ctx.set_font(CHIP_FONT);
	let w = text_width(ctx, label) + 16.0;
	let pulse = 0.25 + 0.15 * (time * 2.0).sin();
	glow(
		ctx,
		x,
		y,
		w * 0.6,
		&[
			(0.0, color.rgba(0.15 + pulse * 0.05)),
			(0.8, color.rgba(0.05)),
			(1.0, "rgba(0,0,0,0)".into()),
		],
	)?;

	ctx.save();
	ctx.set_shadow_color(&color.rgba(0.3));
	ctx.set_shadow_blur(4.0);
	ctx.set_shadow_offset_y(1.0);
	let gradient = ctx.create_linear_gradient(x - w / 2.0, y - height / 2.0, x + w / 2.0, y + height / 2.0);
	gradient.add_color_stop(0.0, &color.rgba(0.72))?;
	gradient.add_color_stop(0.5, &color.lighten(10).rgba(0.7))?;
	gradient.add_color_stop(1.0, &color.rgba(0.68))?;
	fill_gradient(ctx, &gradient);
	rounded_rect_path(ctx, x - w / 2.0, y - height / 2.0, w, height, 8.0);
	ctx.fill();
	ctx.restore();

	ctx.set_fill_style_str("white");
	ctx.set_text_baseline("middle");
	ctx.set_text_align("center");
	ctx.fill_text(label, x, y)
}

pub fn project_gem(ctx: &CanvasRenderingContext2d, x: f64, y: f64, r: f64, color: Rgb, time: f64, first_view: bool) -> DrawResult {
	glow(ctx, x, y, r * 2.0, &[(0.0, color.rgba(0.15)), (1.0, "rgba(0,0,0,0)".into())])?;

	ctx.save();
	ctx.set_shadow_color(&color.rgba(0.3));
	ctx.set_shadow_blur(6.0);
	ctx.set_shadow_offset_y(2.0);
	ctx.set_fill_style_str(&color.rgba(0.9));
	circle(ctx, x, y, r)?;
	ctx.fill();
	ctx.restore();

	glow(
		ctx,
		x,
		y,
		r,
		&[(0.0, "rgba(255,255,255,0.4)".into()), (1.0, "rgba(255,255,255,0)".into())],
	)?;
	ring(ctx, x, y, r + 6.0 + (time * 3.0).sin() * 2.0, "rgba(255,255,255,0.5)", 1.0)?;
	ring(ctx, x, y, r + 0.5, &color.rgba(0.6), 1.2)?;
	if first_view {
		let pulse = 1.0 + 0.1 * (time * 3.0).sin();
		ring(ctx, x, y, r * pulse + 4.0, &color.rgba(0.35), 1.5)?;
	}
	Ok(())
}

/// Translucent pill floating above a marker.
pub fn pill_label(ctx: &CanvasRenderingContext2d, x: f64, y: f64, text: &str) -> DrawResult {
	ctx.save();
	ctx.set_font(LABEL_FONT);
	let pad = 6.0;
	let (w, h) = (text_width(ctx, text) + pad * 2.0, 20.0);
	let (left, top) = (x - w / 2.0, y - h - 12.0);
	rounded_rect_path(ctx, left, top, w, h, 8.0);
	ctx.set_fill_style_str("rgba(255,255,255,0.05)");
	ctx.fill();
	ctx.set_fill_style_str("rgba(235,240,255,0.92)");
	ctx.fill_text(text, left + pad, top + h - 6.0)?;
	ctx.restore();
	Ok(())
}

pub fn orbit_guide(ctx: &CanvasRenderingContext2d, x: f64, y: f64, r: f64, color: Rgb, alpha: f64) -> DrawResult {
	ring(ctx, x, y, r, &color.rgba(alpha), 1.0)
}

pub fn starfield(ctx: &CanvasRenderingContext2d, stars: &[BackgroundStar], time: f64) -> DrawResult {
	for s in stars {
		let alpha = s.twinkle_alpha(time);
		glow(
			ctx,
			s.x,
			s.y,
			s.r * 4.0,
			&[
				(0.0, format!("rgba(235,240,255,{:.3})", alpha.clamp(0.0, 1.0))),
				(1.0, "rgba(235,240,255,0)".into()),
			],
		)?;
		ctx.set_fill_style_str(&format!("rgba(255,255,255,{:.3})", (alpha + 0.2).min(1.0)));
		circle(ctx, s.x, s.y, s.r)?;
		ctx.fill();
	}
	Ok(())
}

fn shooting_star(ctx: &CanvasRenderingContext2d, p: &Particle, alpha: f64) -> DrawResult {
	ctx.set_fill_style_str(&format!("rgba(255,255,255,{:.3})", 0.9 * alpha));
	circle(ctx, p.x, p.y, 2.2)?;
	ctx.fill();

	let (tail_x, tail_y) = (p.x - p.vx * 0.06, p.y - p.vy * 0.06);
	let trail = ctx.create_linear_gradient(p.x, p.y, tail_x, tail_y);
	trail.add_color_stop(0.0, &format!("rgba(255,255,255,{:.3})", 0.5 * alpha))?;
	trail.add_color_stop(1.0, "rgba(255,255,255,0)")?;
	stroke_gradient(ctx, &trail);
	ctx.set_line_width(1.0);
	ctx.begin_path();
	ctx.move_to(p.x, p.y);
	ctx.line_to(tail_x, tail_y);
	ctx.stroke();
	Ok(())
}

/// Shooting stars and well ejecta.
/// Draws the particles whose coordinate space matches `world`.
pub fn particles(ctx: &CanvasRenderingContext2d, particles: &[Particle], world: bool) -> DrawResult {
	for p in particles.iter().filter(|p| p.kind.in_world_space() == world) {
		let alpha = p.alpha();
		match p.kind {
			ParticleKind::ShootingStar => shooting_star(ctx, p, alpha)?,
			ParticleKind::Ejecta { radius, hue } => {
				ctx.set_fill_style_str(&format!("hsla({hue:.0}, 80%, 70%, {alpha:.3})"));
				circle(ctx, p.x, p.y, radius * alpha.max(0.2))?;
				ctx.fill();
			}
		}
	}
	Ok(())
}

pub fn gravity_well(ctx: &CanvasRenderingContext2d, well: &GravityWell, time: f64) -> DrawResult {
	let (x, y, r) = (well.x, well.y, well.visual_radius);
	glow(
		ctx,
		x,
		y,
		r * 2.5,
		&[
			(0.0, "rgba(0,0,0,0)".into()),
			(0.35, "rgba(120,90,255,0.25)".into()),
			(0.6, "rgba(60,140,255,0.12)".into()),
			(1.0, "rgba(0,0,0,0)".into()),
		],
	)?;

	ctx.save();
	ctx.set_line_width(1.5);
	let _ = ctx.set_line_dash(&js_sys::Array::of2(&JsValue::from_f64(6.0), &JsValue::from_f64(10.0)));
	for i in 0..3 {
		let i = f64::from(i);
		ctx.set_line_dash_offset(-time * 40.0 * (1.0 + i * 0.5));
		ring(
			ctx,
			x,
			y,
			r * (1.2 + i * 0.35),
			&format!("rgba(170,150,255,{:.3})", 0.35 - i * 0.08),
			1.5,
		)?;
	}
	let _ = ctx.set_line_dash(&js_sys::Array::new());
	ctx.restore();

	glow(
		ctx,
		x,
		y,
		r,
		&[
			(0.0, "rgba(0,0,0,1)".into()),
			(0.8, "rgba(0,0,0,0.95)".into()),
			(1.0, "rgba(40,20,80,0)".into()),
		],
	)?;
	let flicker = 0.6 + 0.2 * (time * 4.0).sin();
	ring(ctx, x, y, r * 0.85, &format!("rgba(200,180,255,{flicker:.3})"), 2.0)?;
	let swirl = time * 1.5;
	ctx.begin_path();
	ctx.arc(x, y, r * 1.05, swirl, swirl + PI * 0.6)?;
	ctx.set_stroke_style_str("rgba(255,255,255,0.35)");
	ctx.set_line_width(1.0);
	ctx.stroke();
	Ok(())
}

/// Click-burst firework, in screen space.
pub fn burst(ctx: &CanvasRenderingContext2d, burst: &Burst) -> DrawResult {
	for p in &burst.particles {
		ctx.set_fill_style_str(&format!("hsla({:.0}, 70%, 60%, {:.3})", p.hue, p.alpha()));
		circle(ctx, p.x, p.y, 2.0)?;
		ctx.fill();
	}
	Ok(())
}
