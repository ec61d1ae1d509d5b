mod app;
mod config;
mod effects;
mod navigation;
mod results;
mod ui;

pub use app::run_app;
