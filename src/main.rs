use std::path::PathBuf;

use anyhow::Result;
use bevy::prelude::*;
use clap::Parser;

use slingshot::interaction::session::config_hot_reload::{ConfigOverrides, ConfigReloadSettings};
use slingshot::{GameConfig, GamePlugin};

/// Drag the ball away from the pivot and let go.
#[derive(Parser, Debug)]
#[command(name = "slingshot", version)]
struct Args {
    /// Config layers merged in order (later wins). Defaults to
    /// assets/config/game.ron + assets/config/game.local.ron.
    #[arg(long = "config")]
    config: Vec<PathBuf>,
    /// Exit after this many seconds (overrides window.autoClose).
    #[arg(long)]
    auto_close: Option<f32>,
}

fn config_layers(args: &Args) -> Vec<PathBuf> {
    if args.config.is_empty() {
        ConfigReloadSettings::default().paths
    } else {
        args.config.clone()
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    let layers = config_layers(&args);
    let overrides = ConfigOverrides {
        auto_close: args.auto_close,
    };
    let (mut cfg, used, errors) = GameConfig::load_layered(&layers);
    overrides.apply(&mut cfg);
    if !(cfg.window.width > 0.0 && cfg.window.height > 0.0) {
        anyhow::bail!(
            "invalid window size {}x{}",
            cfg.window.width,
            cfg.window.height
        );
    }

    let mut app = App::new();
    app.add_plugins(DefaultPlugins.set(WindowPlugin {
        primary_window: Some(Window {
            title: cfg.window.title.clone(),
            resolution: (cfg.window.width, cfg.window.height).into(),
            resizable: true,
            ..default()
        }),
        ..default()
    }));

    // LogPlugin is up now; report config loading and validation (non-fatal).
    for e in errors {
        warn!("CONFIG LOAD ISSUE: {e}");
    }
    if used.is_empty() {
        info!("No config layers found; using defaults");
    } else {
        info!(?used, "Config layers loaded");
    }
    for w in cfg.validate() {
        warn!("CONFIG WARNING: {w}");
    }
    info!(
        launch_duration = cfg.launch.launch_duration,
        respawn_time = cfg.launch.respawn_time,
        ball_destruction_delay = cfg.launch.ball_destruction_delay,
        "Slingshot timings"
    );

    // Hot reload watches the same layers and re-applies the CLI overrides.
    app.insert_resource(cfg)
        .insert_resource(ConfigReloadSettings {
            paths: layers,
            ..default()
        })
        .insert_resource(overrides)
        .add_plugins(GamePlugin);
    match app.run() {
        AppExit::Success => Ok(()),
        AppExit::Error(code) => anyhow::bail!("app exited with code {code}"),
    }
}
