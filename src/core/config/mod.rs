pub mod config;

pub use config::{
    BallConfig, GameConfig, InputConfig, LaunchConfig, PhysicsConfig, PivotConfig, TetherConfig,
    WindowConfig,
};
