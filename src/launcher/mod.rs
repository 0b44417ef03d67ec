//! Engine-independent slingshot core: timer queue, pointer averaging and the
//! launch state machine. The Bevy side lives in `gameplay::slingshot`.
pub mod controller;
pub mod pointer;
pub mod schedule;

pub use controller::{
    LaunchController, LaunchError, LaunchPhase, LaunchTimer, LaunchTimings, LaunchWorld, Tether,
};
pub use pointer::{drag_target, mean_pointer};
pub use schedule::{ScheduledEntry, TimerQueue};
