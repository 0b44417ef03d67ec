use bevy::prelude::*;
use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    time::SystemTime,
};

use crate::core::config::GameConfig;
use crate::gameplay::slingshot::{ball_color, BallVisuals, Slingshot};

#[derive(Resource, Debug, Clone)]
pub struct ConfigReloadSettings {
    pub paths: Vec<PathBuf>,
    pub interval_secs: f32,
}
impl Default for ConfigReloadSettings {
    fn default() -> Self {
        Self {
            paths: vec![
                PathBuf::from("assets/config/game.ron"),
                PathBuf::from("assets/config/game.local.ron"),
            ],
            interval_secs: 0.5,
        }
    }
}

/// Command-line values that win over every config layer, reloaded ones included.
#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub struct ConfigOverrides {
    pub auto_close: Option<f32>,
}
impl ConfigOverrides {
    pub fn apply(&self, cfg: &mut GameConfig) {
        if let Some(secs) = self.auto_close {
            cfg.window.auto_close = secs;
        }
    }
}

#[derive(Resource, Debug)]
struct ConfigReloadState {
    /// `None` until the first poll records the times the startup config was loaded at.
    last_mod: Option<HashMap<PathBuf, SystemTime>>,
    timer: Timer,
}
impl Default for ConfigReloadState {
    fn default() -> Self {
        Self {
            last_mod: None,
            timer: Timer::from_seconds(0.5, TimerMode::Repeating),
        }
    }
}

fn modified(path: &Path) -> Option<SystemTime> {
    std::fs::metadata(path).and_then(|m| m.modified()).ok()
}

/// Polls the config layers and applies changes live: new launch delays go to
/// the controller (affecting timers scheduled afterwards), ball/tether values
/// apply from the next spawn.
pub struct ConfigHotReloadPlugin;
impl Plugin for ConfigHotReloadPlugin {
    fn build(&self, app: &mut App) {
        #[cfg(not(target_arch = "wasm32"))]
        {
            app.init_resource::<ConfigReloadSettings>()
                .init_resource::<ConfigOverrides>()
                .init_resource::<ConfigReloadState>()
                .add_systems(Update, (poll_and_reload_config, apply_config_changes).chain());
        }
    }
}

fn poll_and_reload_config(
    time: Res<Time>,
    settings: Res<ConfigReloadSettings>,
    overrides: Res<ConfigOverrides>,
    mut state: ResMut<ConfigReloadState>,
    mut cfg_res: ResMut<GameConfig>,
) {
    let state = &mut *state;
    let Some(last_mod) = state.last_mod.as_mut() else {
        // Layers untouched since startup are not changes.
        let seeded = settings
            .paths
            .iter()
            .filter_map(|p| modified(p).map(|t| (p.clone(), t)))
            .collect();
        state.last_mod = Some(seeded);
        return;
    };
    let interval = settings.interval_secs.max(0.05);
    if (state.timer.duration().as_secs_f32() - interval).abs() > f32::EPSILON {
        state
            .timer
            .set_duration(std::time::Duration::from_secs_f32(interval));
    }
    if !state.timer.tick(time.delta()).finished() {
        return;
    }
    let mut dirty = false;
    for path in &settings.paths {
        let Some(mod_time) = modified(path) else {
            continue;
        };
        if last_mod.get(path).is_none_or(|prev| mod_time > *prev) {
            last_mod.insert(path.clone(), mod_time);
            dirty = true;
        }
    }
    if !dirty {
        return;
    }
    let (mut new_cfg, _used, errors) = GameConfig::load_layered(settings.paths.iter());
    for e in errors {
        warn!("CONFIG HOT-RELOAD issue: {e}");
    }
    overrides.apply(&mut new_cfg);
    if *cfg_res != new_cfg {
        for w in new_cfg.validate() {
            warn!("CONFIG WARNING: {w}");
        }
        info!("Config hot-reload applied");
        *cfg_res = new_cfg;
    }
}

fn apply_config_changes(
    cfg: Res<GameConfig>,
    slingshot: Option<ResMut<Slingshot>>,
    visuals: Option<ResMut<BallVisuals>>,
    mut meshes: Option<ResMut<Assets<Mesh>>>,
    mut materials: Option<ResMut<Assets<ColorMaterial>>>,
    mut windows: Query<&mut Window>,
) {
    if !cfg.is_changed() || cfg.is_added() {
        return;
    }
    if let Some(mut slingshot) = slingshot {
        let timings = cfg.launch.timings();
        if slingshot.controller.timings() != timings {
            info!(?timings, "slingshot timings updated");
            slingshot.controller.set_timings(timings);
        }
    }
    if let Some(mut visuals) = visuals {
        if let Some(meshes) = meshes.as_deref_mut() {
            visuals.mesh = meshes.add(Circle::new(cfg.ball.radius));
        }
        if let Some(materials) = materials.as_deref_mut() {
            visuals.material = materials.add(ball_color(&cfg));
        }
    }
    if let Ok(mut window) = windows.single_mut() {
        if window.width() != cfg.window.width || window.height() != cfg.window.height {
            window.resolution.set(cfg.window.width, cfg.window.height);
        }
        if window.title != cfg.window.title {
            window.title = cfg.window.title.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::launcher::{LaunchController, LaunchTimings};
    use bevy::time::TimeUpdateStrategy;
    use std::fs::File;
    use std::io::Write;
    use std::time::Duration;

    fn reload_app(cfg: GameConfig, settings: ConfigReloadSettings, overrides: ConfigOverrides) -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_millis(100)))
            .insert_resource(cfg)
            .insert_resource(settings)
            .insert_resource(overrides)
            .add_plugins(ConfigHotReloadPlugin);
        app
    }

    #[test]
    fn changed_launch_config_reaches_controller() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .insert_resource(GameConfig::default())
            .add_systems(Update, apply_config_changes);
        let pivot = app.world_mut().spawn_empty().id();
        app.world_mut().insert_resource(Slingshot {
            controller: LaunchController::new(LaunchTimings::default()),
            pivot,
        });
        app.update();
        app.world_mut()
            .resource_mut::<GameConfig>()
            .launch
            .respawn_time = 4.0;
        app.update();
        let timings = app.world().resource::<Slingshot>().controller.timings();
        assert_eq!(timings.respawn_time, Duration::from_secs(4));
    }

    #[test]
    fn unchanged_layers_keep_startup_config() {
        let (mut cfg, used, _) = GameConfig::load_layered(["assets/config/game.ron"]);
        assert_eq!(used.len(), 1);
        cfg.window.auto_close = 5.0;
        let mut app = reload_app(
            cfg,
            ConfigReloadSettings::default(),
            ConfigOverrides {
                auto_close: Some(5.0),
            },
        );
        for _ in 0..10 {
            app.update();
        }
        assert_eq!(app.world().resource::<GameConfig>().window.auto_close, 5.0);
    }

    #[test]
    fn reload_keeps_command_line_auto_close() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("game.ron");
        std::fs::write(&path, "(launch: (respawn_time: 2.0))").unwrap();
        let (mut cfg, _, errors) = GameConfig::load_layered([&path]);
        assert!(errors.is_empty(), "{errors:?}");
        let overrides = ConfigOverrides {
            auto_close: Some(5.0),
        };
        overrides.apply(&mut cfg);
        let settings = ConfigReloadSettings {
            paths: vec![path.clone()],
            interval_secs: 0.1,
        };
        let mut app = reload_app(cfg, settings, overrides);
        app.update();
        app.update();

        let mut file = File::create(&path).unwrap();
        file.write_all(b"(launch: (respawn_time: 3.0), window: (autoClose: 0.0))")
            .unwrap();
        file.set_modified(SystemTime::now() + Duration::from_secs(60))
            .unwrap();
        drop(file);
        for _ in 0..5 {
            app.update();
        }

        let cfg = app.world().resource::<GameConfig>();
        assert_eq!(cfg.launch.respawn_time, 3.0);
        assert_eq!(cfg.window.auto_close, 5.0);
    }

    #[test]
    fn only_listed_layers_are_reloaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.ron");
        std::fs::write(&path, "(launch: (launch_duration: 0.5))").unwrap();
        let (cfg, _, _) = GameConfig::load_layered([&path]);
        let settings = ConfigReloadSettings {
            paths: vec![path],
            interval_secs: 0.1,
        };
        let mut app = reload_app(cfg, settings, ConfigOverrides::default());
        for _ in 0..10 {
            app.update();
        }
        assert_eq!(app.world().resource::<GameConfig>().launch.launch_duration, 0.5);
    }
}
