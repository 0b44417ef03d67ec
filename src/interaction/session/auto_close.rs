use crate::core::config::GameConfig;
use bevy::prelude::*;

/// Exits the app once `window.autoClose` seconds have elapsed (0 disables).
/// The limit is read every frame so a hot-reloaded config takes effect.
pub struct AutoClosePlugin;

impl Plugin for AutoClosePlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, check_autoclose);
    }
}

fn check_autoclose(
    time: Res<Time>,
    cfg: Res<GameConfig>,
    mut requested: Local<bool>,
    mut ev_exit: EventWriter<AppExit>,
) {
    let limit = cfg.window.auto_close;
    if *requested || limit <= 0.0 {
        return;
    }
    if time.elapsed_secs() >= limit {
        info!(seconds = limit, "AutoClose: limit reached, requesting app exit");
        *requested = true;
        ev_exit.write(AppExit::Success);
    }
}
