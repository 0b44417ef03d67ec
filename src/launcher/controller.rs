//! Drag / launch / detach / respawn state machine for a single tethered ball.
//!
//! The controller never touches an engine directly: everything physical goes
//! through [`LaunchWorld`], and every delayed transition goes through a
//! [`TimerQueue`] drained from [`LaunchController::tick`].
use std::fmt;
use std::time::Duration;

use bevy::prelude::*;

use super::pointer::drag_target;
use super::schedule::TimerQueue;

/// A spring joint together with the ball it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tether<H> {
    pub ball: H,
    pub joint: H,
}

/// Host operations the controller needs. Handles are opaque and may go stale
/// when the host removes objects on its own; `is_alive` is the liveness check.
pub trait LaunchWorld {
    type Handle: Copy + Eq + fmt::Debug;

    fn pivot_position(&self) -> Vec2;
    /// Creates a ball at `at` and tethers it to the pivot with a spring joint.
    fn spawn_tethered_ball(&mut self, at: Vec2) -> Tether<Self::Handle>;
    fn set_kinematic(&mut self, ball: Self::Handle, kinematic: bool);
    fn set_ball_position(&mut self, ball: Self::Handle, position: Vec2);
    fn screen_to_world(&self, screen: Vec2) -> Option<Vec3>;
    /// Disables the spring so the ball flies free.
    fn release_tether(&mut self, joint: Self::Handle);
    fn is_alive(&self, ball: Self::Handle) -> bool;
    fn despawn_ball(&mut self, ball: Self::Handle);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LaunchTimings {
    pub launch_duration: Duration,
    pub respawn_time: Duration,
    pub ball_destruction_delay: Duration,
}

impl LaunchTimings {
    pub fn from_secs(launch_duration: f32, respawn_time: f32, ball_destruction_delay: f32) -> Self {
        Self {
            launch_duration: secs(launch_duration),
            respawn_time: secs(respawn_time),
            ball_destruction_delay: secs(ball_destruction_delay),
        }
    }
}

impl Default for LaunchTimings {
    fn default() -> Self {
        Self::from_secs(0.15, 2.0, 2.0)
    }
}

fn secs(s: f32) -> Duration {
    Duration::try_from_secs_f32(s.max(0.0)).unwrap_or(Duration::MAX)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchTimer<H> {
    Detach,
    Spawn,
    Destroy(H),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchPhase {
    /// No ball and no respawn pending (before `start` or after `teardown`).
    NoBall,
    /// Ball tethered at the pivot, not touched.
    Idle,
    Held,
    /// Released; spring still attached until the detach timer fires.
    Launched,
    /// Spring removed; waiting for the next spawn.
    Detached,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchError {
    NoActiveTether,
}

impl fmt::Display for LaunchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LaunchError::NoActiveTether => write!(f, "detach requested with no active tether"),
        }
    }
}

impl std::error::Error for LaunchError {}

#[derive(Debug, Clone)]
pub struct LaunchController<H> {
    active_ball: Option<H>,
    active_tether: Option<Tether<H>>,
    dragging: bool,
    enabled: bool,
    timings: LaunchTimings,
    timers: TimerQueue<LaunchTimer<H>>,
}

impl<H: Copy + Eq + fmt::Debug> LaunchController<H> {
    pub fn new(timings: LaunchTimings) -> Self {
        Self {
            active_ball: None,
            active_tether: None,
            dragging: false,
            enabled: true,
            timings,
            timers: TimerQueue::new(),
        }
    }

    pub fn timings(&self) -> LaunchTimings {
        self.timings
    }

    /// New delays apply to timers scheduled from now on; pending ones keep their fire time.
    pub fn set_timings(&mut self, timings: LaunchTimings) {
        self.timings = timings;
    }

    pub fn active_ball(&self) -> Option<H> {
        self.active_ball
    }

    pub fn active_tether(&self) -> Option<Tether<H>> {
        self.active_tether
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn pending(&self) -> &TimerQueue<LaunchTimer<H>> {
        &self.timers
    }

    pub fn phase(&self) -> LaunchPhase {
        match (self.active_ball, self.active_tether) {
            (Some(_), _) if self.dragging => LaunchPhase::Held,
            (Some(_), _) => LaunchPhase::Idle,
            (None, Some(_)) => LaunchPhase::Launched,
            (None, None) => {
                if self.timers.iter().any(|e| matches!(e.event, LaunchTimer::Spawn)) {
                    LaunchPhase::Detached
                } else {
                    LaunchPhase::NoBall
                }
            }
        }
    }

    /// Spawns the first ball.
    pub fn start<W: LaunchWorld<Handle = H>>(&mut self, world: &mut W) {
        self.spawn(world);
    }

    pub fn enable(&mut self) {
        self.enabled = true;
    }

    /// Stops pointer handling. Already scheduled timers keep firing.
    pub fn disable(&mut self) {
        self.enabled = false;
    }

    /// Forgets every pending timer and reference. Objects already in the
    /// world stay where they are.
    pub fn teardown(&mut self) {
        if !self.timers.is_empty() {
            debug!(pending = self.timers.len(), "slingshot teardown dropping pending timers");
        }
        self.timers.clear();
        self.active_ball = None;
        self.active_tether = None;
        self.dragging = false;
        self.enabled = false;
    }

    /// One simulation tick: pointer handling first, then every timer due at `now`.
    pub fn tick<W: LaunchWorld<Handle = H>>(&mut self, world: &mut W, now: Duration, pointers: &[Vec2]) {
        if self.enabled {
            self.handle_pointers(world, now, pointers);
        }
        self.run_due(world, now);
    }

    fn handle_pointers<W: LaunchWorld<Handle = H>>(&mut self, world: &mut W, now: Duration, pointers: &[Vec2]) {
        if self.active_ball.is_none() && self.active_tether.is_none() {
            return;
        }
        if pointers.is_empty() {
            if self.dragging {
                self.launch(world, now);
            }
            self.dragging = false;
            return;
        }
        // Only a held ball can be dragged; touches during the launch window are ignored.
        let Some(ball) = self.active_ball else {
            return;
        };
        self.dragging = true;
        world.set_kinematic(ball, true);
        if let Some(target) = drag_target(pointers, |screen| world.screen_to_world(screen)) {
            world.set_ball_position(ball, target);
        }
    }

    /// Hands the held ball back to the physics simulation and schedules the detach.
    pub fn launch<W: LaunchWorld<Handle = H>>(&mut self, world: &mut W, now: Duration) {
        let Some(ball) = self.active_ball.take() else {
            return;
        };
        world.set_kinematic(ball, false);
        self.dragging = false;
        self.timers
            .schedule_after(now, self.timings.launch_duration, LaunchTimer::Detach);
        debug!(?ball, "ball launched");
    }

    /// Releases the spring, schedules destruction of the freed ball and the
    /// next spawn. The spawn is scheduled even when there was nothing to release.
    pub fn detach<W: LaunchWorld<Handle = H>>(&mut self, world: &mut W, now: Duration) -> Result<(), LaunchError> {
        let result = match self.active_tether.take() {
            Some(tether) => {
                world.release_tether(tether.joint);
                self.timers.schedule_after(
                    now,
                    self.timings.ball_destruction_delay,
                    LaunchTimer::Destroy(tether.ball),
                );
                debug!(ball = ?tether.ball, "ball detached from pivot");
                Ok(())
            }
            None => {
                let err = LaunchError::NoActiveTether;
                error!("{err}");
                Err(err)
            }
        };
        self.timers
            .schedule_after(now, self.timings.respawn_time, LaunchTimer::Spawn);
        result
    }

    /// Spawns a fresh ball at the pivot's current position.
    pub fn spawn<W: LaunchWorld<Handle = H>>(&mut self, world: &mut W) {
        let at = world.pivot_position();
        let tether = world.spawn_tethered_ball(at);
        self.active_ball = Some(tether.ball);
        self.active_tether = Some(tether);
        debug!(ball = ?tether.ball, x = at.x, y = at.y, "ball spawned");
    }

    fn destroy<W: LaunchWorld<Handle = H>>(&mut self, world: &mut W, ball: H) {
        if world.is_alive(ball) {
            world.despawn_ball(ball);
        }
    }

    fn run_due<W: LaunchWorld<Handle = H>>(&mut self, world: &mut W, now: Duration) {
        while let Some(entry) = self.timers.pop_due(now) {
            match entry.event {
                LaunchTimer::Detach => {
                    let _ = self.detach(world, now);
                }
                LaunchTimer::Spawn => self.spawn(world),
                LaunchTimer::Destroy(ball) => self.destroy(world, ball),
            }
        }
    }
}
