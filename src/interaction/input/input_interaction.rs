use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use crate::core::config::GameConfig;
use crate::core::system::system_order::PointerCollectSet;

pub struct InputInteractionPlugin;

impl Plugin for InputInteractionPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ActivePointers>().add_systems(
            Update,
            collect_active_pointers.in_set(PointerCollectSet),
        );
    }
}

/// Screen-space positions (logical window pixels) of every pointer held down this frame.
#[derive(Resource, Default, Debug, Clone, PartialEq, Deref, DerefMut)]
pub struct ActivePointers(pub Vec<Vec2>);

/// Touches take priority; the mouse only counts when no finger is down.
pub fn gather_pointers(
    touches: impl IntoIterator<Item = Vec2>,
    mouse_held_at: Option<Vec2>,
    mouse_as_touch: bool,
) -> Vec<Vec2> {
    let mut out: Vec<Vec2> = touches.into_iter().collect();
    if out.is_empty() && mouse_as_touch {
        out.extend(mouse_held_at);
    }
    out
}

fn collect_active_pointers(
    touches: Option<Res<Touches>>,
    buttons: Option<Res<ButtonInput<MouseButton>>>,
    windows_q: Query<&Window, With<PrimaryWindow>>,
    cfg: Res<GameConfig>,
    mut pointers: ResMut<ActivePointers>,
) {
    let mouse_held_at = buttons
        .filter(|b| b.pressed(MouseButton::Left))
        .and_then(|_| windows_q.single().ok())
        .and_then(|w| w.cursor_position());
    let touch_positions: Vec<Vec2> = touches
        .as_deref()
        .map(|t| t.iter().map(|touch| touch.position()).collect())
        .unwrap_or_default();
    pointers.0 = gather_pointers(touch_positions, mouse_held_at, cfg.input.mouse_as_touch);
}
