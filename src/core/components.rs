use bevy::prelude::*;

/// Marker component identifying a slingshot ball (holds physics body & collider).
#[derive(Component, Debug)]
pub struct Ball;

/// Fixed anchor the active ball is sprung to.
#[derive(Component, Debug)]
pub struct Pivot;

/// Camera used for screen -> world projection of pointers.
#[derive(Component, Debug)]
pub struct MainCamera;
