//! Central system ordering labels to make update sequence explicit.
//! Stages (high-level):
//! 1. PointerCollect (gather touches / mouse into `ActivePointers`)
//! 2. PrePhysics (slingshot driver: kinematic drag, launch, timers)
//! 3. Rapier (handled by plugin, PostUpdate)
use bevy::prelude::*;

#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub struct PointerCollectSet; // input aggregation, before anything reads pointers

#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub struct PrePhysicsSet; // body mode / position edits before physics simulation step
