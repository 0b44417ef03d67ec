use bevy::prelude::*;
use bevy_rapier2d::prelude::*;

use crate::core::config::GameConfig;

/// Installs Rapier scaled by `physics.pixels_per_meter` and applies the configured gravity.
pub struct PhysicsSetupPlugin {
    pub pixels_per_meter: f32,
    pub debug_render: bool,
}

impl PhysicsSetupPlugin {
    pub fn from_config(cfg: &GameConfig) -> Self {
        Self {
            pixels_per_meter: cfg.physics.pixels_per_meter.max(1.0),
            debug_render: cfg.physics.rapier_debug,
        }
    }
}

impl Plugin for PhysicsSetupPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(RapierPhysicsPlugin::<NoUserData>::pixels_per_meter(
            self.pixels_per_meter,
        ))
        .add_systems(Update, apply_config_gravity);
        if self.debug_render {
            app.add_plugins(RapierDebugRenderPlugin::default());
        }
    }
}

/// RapierConfiguration is a component on the default context entity, which
/// appears after startup; re-applied whenever the config changes.
fn apply_config_gravity(mut q_cfg: Query<&mut RapierConfiguration>, game_cfg: Res<GameConfig>) {
    let gravity = Vect::new(0.0, game_cfg.physics.gravity_y);
    for mut cfg in q_cfg.iter_mut() {
        if cfg.gravity != gravity {
            debug!(gravity_y = gravity.y, "applying gravity");
            cfg.gravity = gravity;
        }
    }
}
