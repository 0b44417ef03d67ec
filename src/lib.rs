pub mod app;
pub mod core;
pub mod interaction;
pub mod gameplay;
pub mod launcher;
pub mod physics;
pub mod rendering;

// Curated re-exports
pub use app::game::GamePlugin;
pub use crate::core::components::{Ball, MainCamera, Pivot};
pub use crate::core::config::{GameConfig, WindowConfig};
pub use launcher::{LaunchController, LaunchPhase, LaunchTimings, LaunchWorld};
