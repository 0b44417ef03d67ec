// This file is part of Slingshot.
// Copyright (C) 2025 Adam and contributors
// SPDX-License-Identifier: GPL-3.0-or-later

use bevy::prelude::*;

use crate::core::config::GameConfig;
use crate::core::system::system_order::{PointerCollectSet, PrePhysicsSet};
use crate::gameplay::slingshot::SlingshotPlugin;
use crate::interaction::input::input_interaction::InputInteractionPlugin;
use crate::interaction::session::auto_close::AutoClosePlugin;
use crate::interaction::session::config_hot_reload::ConfigHotReloadPlugin;
use crate::physics::rapier::rapier_physics::PhysicsSetupPlugin;
use crate::rendering::camera::camera::CameraPlugin;

/// Everything needed on top of `DefaultPlugins`. Expects `GameConfig` to be
/// inserted before the plugin is added (falls back to defaults otherwise).
pub struct GamePlugin;

impl Plugin for GamePlugin {
    fn build(&self, app: &mut App) {
        if !app.world().contains_resource::<GameConfig>() {
            warn!("GameConfig missing when building GamePlugin; using defaults");
            app.insert_resource(GameConfig::default());
        }
        let physics = PhysicsSetupPlugin::from_config(app.world().resource::<GameConfig>());
        app.configure_sets(Update, (PointerCollectSet, PrePhysicsSet.after(PointerCollectSet)))
            .add_plugins((
                CameraPlugin,
                physics,
                InputInteractionPlugin,
                SlingshotPlugin,
                ConfigHotReloadPlugin,
                AutoClosePlugin,
            ));
    }
}
