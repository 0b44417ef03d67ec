use bevy::prelude::*;
use serde::Deserialize;
use std::{fs, path::Path};

use crate::launcher::LaunchTimings;

#[derive(Debug, Deserialize, Resource, Clone, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    pub width: f32,
    pub height: f32,
    pub title: String,
    #[serde(rename = "autoClose")]
    pub auto_close: f32,
}
impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
            title: "Slingshot".into(),
            auto_close: 0.0,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct PhysicsConfig {
    pub pixels_per_meter: f32,
    pub gravity_y: f32,
    pub rapier_debug: bool,
}
impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            pixels_per_meter: 100.0,
            gravity_y: -981.0,
            rapier_debug: false,
        }
    }
}

/// Where the fixed anchor body sits in world space.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct PivotConfig {
    pub x: f32,
    pub y: f32,
}
impl Default for PivotConfig {
    fn default() -> Self {
        Self { x: -300.0, y: 0.0 }
    }
}
impl PivotConfig {
    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct BallConfig {
    pub radius: f32,
    pub restitution: f32,
    pub color: [f32; 3],
}
impl Default for BallConfig {
    fn default() -> Self {
        Self {
            radius: 20.0,
            restitution: 0.4,
            color: [0.95, 0.45, 0.2],
        }
    }
}

/// Spring joint between ball and pivot.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct TetherConfig {
    pub rest_length: f32,
    pub stiffness: f32,
    pub damping: f32,
}
impl Default for TetherConfig {
    fn default() -> Self {
        Self {
            rest_length: 0.0,
            stiffness: 12.0,
            damping: 0.3,
        }
    }
}

/// Delays in seconds.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct LaunchConfig {
    pub launch_duration: f32,
    pub respawn_time: f32,
    pub ball_destruction_delay: f32,
}
impl Default for LaunchConfig {
    fn default() -> Self {
        Self {
            launch_duration: 0.15,
            respawn_time: 2.0,
            ball_destruction_delay: 2.0,
        }
    }
}
impl LaunchConfig {
    pub fn timings(&self) -> LaunchTimings {
        LaunchTimings::from_secs(
            self.launch_duration,
            self.respawn_time,
            self.ball_destruction_delay,
        )
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct InputConfig {
    /// Treat a held left mouse button as a single touch.
    pub mouse_as_touch: bool,
}
impl Default for InputConfig {
    fn default() -> Self {
        Self {
            mouse_as_touch: true,
        }
    }
}

#[derive(Debug, Deserialize, Resource, Clone, PartialEq, Default)]
#[serde(default)]
pub struct GameConfig {
    pub window: WindowConfig,
    pub physics: PhysicsConfig,
    pub pivot: PivotConfig,
    pub ball: BallConfig,
    pub tether: TetherConfig,
    pub launch: LaunchConfig,
    pub input: InputConfig,
}

impl GameConfig {
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, String> {
        let data = fs::read_to_string(&path).map_err(|e| format!("read config: {e}"))?;
        ron::from_str(&data).map_err(|e| format!("parse RON: {e}"))
    }
    pub fn load_or_default(path: impl AsRef<Path>) -> (Self, Option<String>) {
        match Self::load_from_file(&path) {
            Ok(cfg) => (cfg, None),
            Err(e) => (Self::default(), Some(e)),
        }
    }
    /// Merges every readable RON file in order (later layers win, per key) and
    /// returns the config, the layers actually used and any load errors.
    pub fn load_layered<P, I>(paths: I) -> (Self, Vec<String>, Vec<String>)
    where
        P: AsRef<Path>,
        I: IntoIterator<Item = P>,
    {
        use ron::value::Value;
        let mut merged: Option<Value> = None;
        let mut used = Vec::new();
        let mut errors = Vec::new();
        fn merge_value(base: &mut Value, overlay: Value) {
            match (base, overlay) {
                (Value::Map(bm), Value::Map(om)) => {
                    for (k, v) in om.into_iter() {
                        if let Some((_, ev)) = bm.iter_mut().find(|(ek, _)| **ek == k) {
                            merge_value(ev, v);
                            continue;
                        }
                        bm.insert(k, v);
                    }
                }
                (b, o) => *b = o,
            }
        }
        for p in paths {
            let path_ref = p.as_ref();
            match fs::read_to_string(path_ref) {
                Ok(txt) => match ron::from_str::<Value>(&txt) {
                    Ok(val) => {
                        if let Some(cur) = &mut merged {
                            merge_value(cur, val);
                        } else {
                            merged = Some(val);
                        }
                        used.push(path_ref.as_os_str().to_string_lossy().to_string());
                    }
                    Err(e) => errors.push(format!("{}: parse error: {e}", path_ref.display())),
                },
                Err(e) => errors.push(format!("{}: read error: {e}", path_ref.display())),
            }
        }
        if let Some(val) = merged {
            match val.into_rust::<GameConfig>() {
                Ok(cfg) => (cfg, used, errors),
                Err(e) => {
                    errors.push(format!(
                        "failed to deserialize merged config; using defaults: {e}"
                    ));
                    (GameConfig::default(), used, errors)
                }
            }
        } else {
            (GameConfig::default(), used, errors)
        }
    }
    /// Non-fatal sanity warnings.
    pub fn validate(&self) -> Vec<String> {
        let mut w = Vec::new();
        if self.window.width <= 0.0 || self.window.height <= 0.0 {
            w.push("window dimensions must be > 0".into());
        }
        if self.window.auto_close < 0.0 {
            w.push(format!(
                "window.autoClose {} negative -> treated as disabled (should be >= 0)",
                self.window.auto_close
            ));
        }
        if self.physics.pixels_per_meter <= 0.0 {
            w.push(format!(
                "physics.pixels_per_meter {} must be > 0",
                self.physics.pixels_per_meter
            ));
        }
        if self.physics.gravity_y > 0.0 {
            w.push(format!(
                "physics.gravity_y is positive ({}); launched balls will fall upward",
                self.physics.gravity_y
            ));
        }
        if self.ball.radius <= 0.0 {
            w.push(format!("ball.radius {} must be > 0", self.ball.radius));
        }
        if !(0.0..=1.5).contains(&self.ball.restitution) {
            w.push(format!(
                "ball.restitution {} outside recommended 0..1.5",
                self.ball.restitution
            ));
        }
        if self.tether.stiffness <= 0.0 {
            w.push(format!(
                "tether.stiffness {} must be > 0 or the ball never launches",
                self.tether.stiffness
            ));
        }
        if self.tether.damping < 0.0 {
            w.push(format!("tether.damping {} negative", self.tether.damping));
        }
        if self.tether.rest_length < 0.0 {
            w.push(format!(
                "tether.rest_length {} negative",
                self.tether.rest_length
            ));
        }
        let l = &self.launch;
        for (name, v) in [
            ("launch_duration", l.launch_duration),
            ("respawn_time", l.respawn_time),
            ("ball_destruction_delay", l.ball_destruction_delay),
        ] {
            if !(v > 0.0) {
                w.push(format!("launch.{name} {v} must be > 0"));
            }
        }
        if l.ball_destruction_delay > l.respawn_time {
            w.push(format!(
                "launch.ball_destruction_delay ({}) exceeds launch.respawn_time ({}); the old ball stays in the world after the next one spawns",
                l.ball_destruction_delay, l.respawn_time
            ));
        }
        w
    }
}
