mod camera;
mod component;
mod config;
mod draw;
mod graph;
mod hit;
mod host;
mod particles;
mod physics;
mod render;
mod scene;
mod secret;
mod starfield;
mod state;
mod types;

pub use component::NeuralCanvas;
pub use types::{AboutSection, PortfolioContent, Project, ProjectSelection};
