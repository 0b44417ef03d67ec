//! Pointer aggregation helpers.
use bevy::prelude::*;

/// Arithmetic mean of all active pointer positions; `None` when no pointer is down.
pub fn mean_pointer(pointers: &[Vec2]) -> Option<Vec2> {
    if pointers.is_empty() {
        return None;
    }
    let sum = pointers.iter().copied().fold(Vec2::ZERO, |acc, p| acc + p);
    Some(sum / pointers.len() as f32)
}

/// Projects the averaged pointer into the world and keeps only x/y.
pub fn drag_target(pointers: &[Vec2], project: impl FnOnce(Vec2) -> Option<Vec3>) -> Option<Vec2> {
    let screen = mean_pointer(pointers)?;
    project(screen).map(|w| w.truncate())
}
