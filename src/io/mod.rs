pub mod args;
pub mod config_loader;
pub mod render_settings;
