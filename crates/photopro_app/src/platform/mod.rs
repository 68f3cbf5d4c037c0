mod app;
mod effects;
mod logging;
mod persistence;
mod render;
mod settings;

pub(crate) use app::run_app;
