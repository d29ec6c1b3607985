use log::error;

use crate::components::neural_canvas::PortfolioContent;

const SITE_CONTENT: &str = include_str!("content.json");

/// Content bundled with the site. Falls back to an empty graph if the
/// bundled JSON is malformed.
pub fn site_content() -> PortfolioContent {
	PortfolioContent::from_json(SITE_CONTENT).unwrap_or_else(|err| {
		error!("bundled site content is invalid: {err}");
		PortfolioContent::default()
	})
}
