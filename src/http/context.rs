//! Application state shared by request handlers.

use axum_template::engine::Engine;
use std::sync::Arc;

use crate::config::Config;

#[cfg(feature = "reload")]
use minijinja_autoreload::AutoReloader;

#[cfg(feature = "reload")]
/// Template engine with auto-reloading support for development.
pub type AppEngine = Engine<AutoReloader>;

#[cfg(feature = "embed")]
use minijinja::Environment;

#[cfg(feature = "embed")]
pub type AppEngine = Engine<Environment<'static>>;

#[cfg(not(any(feature = "reload", feature = "embed")))]
pub type AppEngine = Engine<minijinja::Environment<'static>>;

/// Immutable state cloned into every request.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    /// Template engine for rendering HTML responses.
    pub template_env: AppEngine,
}
