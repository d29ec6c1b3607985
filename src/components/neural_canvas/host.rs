use thiserror::Error;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, Window};

const REDUCED_MOTION_QUERY: &str = "(prefers-reduced-motion: reduce)";

/// Failures while wiring the canvas into the page.
#[derive(Debug, Error)]
pub enum CanvasError {
	#[error("no global window")]
	NoWindow,
	#[error("canvas has no 2d context")]
	NoContext,
	#[error("viewport size unavailable")]
	NoViewport,
	#[error("browser call failed: {0}")]
	Js(String),
}

impl From<JsValue> for CanvasError {
	fn from(value: JsValue) -> Self {
		Self::Js(value.as_string().unwrap_or_else(|| format!("{value:?}")))
	}
}

/// The browser objects one canvas instance draws through.
pub struct Host {
	pub window: Window,
	pub canvas: HtmlCanvasElement,
	pub ctx: CanvasRenderingContext2d,
}

impl Host {
	pub fn attach(canvas: HtmlCanvasElement) -> Result<Self, CanvasError> {
		let window = web_sys::window().ok_or(CanvasError::NoWindow)?;
		let ctx = canvas
			.get_context("2d")?
			.ok_or(CanvasError::NoContext)?
			.dyn_into::<CanvasRenderingContext2d>()
			.map_err(|_| CanvasError::NoContext)?;
		Ok(Self { window, canvas, ctx })
	}

	/// Inner window size in CSS pixels.
	pub fn viewport(&self) -> Result<(f64, f64), CanvasError> {
		let w = self.window.inner_width()?.as_f64().ok_or(CanvasError::NoViewport)?;
		let h = self.window.inner_height()?.as_f64().ok_or(CanvasError::NoViewport)?;
		Ok((w, h))
	}

	pub fn device_pixel_ratio(&self, max: f64) -> f64 {
		self.window.device_pixel_ratio().clamp(1.0, max.max(1.0))
	}

	pub fn prefers_reduced_motion(&self) -> bool {
		self.window
			.match_media(REDUCED_MOTION_QUERY)
			.ok()
			.flatten()
			.is_some_and(|query| query.matches())
	}

	/// Sizes the backing store to `dpr` times the CSS size.
	pub fn fit(&self, width: f64, height: f64, dpr: f64) -> Result<(), CanvasError> {
		self.canvas.set_width((width * dpr).round() as u32);
		self.canvas.set_height((height * dpr).round() as u32);
		let style = self.canvas.style();
		style.set_property("width", &format!("{width}px"))?;
		style.set_property("height", &format!("{height}px"))?;
		Ok(())
	}

	pub fn set_page_background(&self, css: &str) -> Result<(), CanvasError> {
		let body = self
			.window
			.document()
			.and_then(|doc| doc.body())
			.ok_or(CanvasError::NoWindow)?;
		body.style().set_property("background", css)?;
		Ok(())
	}

	pub fn open_url(&self, url: &str) -> Result<(), CanvasError> {
		self.window.open_with_url_and_target(url, "_blank")?;
		Ok(())
	}
}
