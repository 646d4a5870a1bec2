//! HTTP handlers for carprice-web

pub mod buildinfo;
pub mod health;
pub mod predict;
pub mod ui;

pub use buildinfo::get_build_info;
pub use health::health_routes;
pub use predict::submit_prediction;
pub use ui::{serve_css, serve_index};
