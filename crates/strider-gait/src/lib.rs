//! Gait generation for multi-legged robots.
//!
//! # Architecture
//!
//! ```text
//! MotionCommand ─┐
//!                ▼
//! GaitPattern / GaitTransition ──► StepProfile ──► foot targets
//!        (PhaseSource)                                 │
//!                                     stability ◄──────┤
//!                                                      ▼
//!                                          FabrikSolver per LegSetup
//!                                                      │
//!                                                      ▼
//!                                              LocomotionFrame
//! ```
//!
//! [`GaitGenerator`] ties the pieces together and [`ControlLoop`] drives it
//! from a clock.

pub mod command;
pub mod generator;
pub mod leg;
pub mod pattern;
pub mod scheduler;
pub mod stability;
pub mod trajectory;
pub mod transition;

pub use command::MotionCommand;
pub use generator::{GaitGenerator, GaitState, LegFrame, LocomotionFrame};
pub use leg::{LegId, LegSetup};
pub use pattern::{GaitPattern, LegPhase, PatternKind, PhaseSource, StepBehavior};
pub use scheduler::ControlLoop;
pub use stability::StabilityReport;
pub use trajectory::StepProfile;
pub use transition::GaitTransition;

pub mod prelude {
    pub use crate::{
        ControlLoop, GaitGenerator, GaitPattern, GaitState, GaitTransition, LegId, LegSetup,
        LocomotionFrame, MotionCommand, PatternKind, PhaseSource,
    };
    pub use strider_core::{LocomotionConfig, ManualClock, MonotonicClock};
}
