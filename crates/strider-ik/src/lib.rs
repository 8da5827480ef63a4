//! Kinematic chains and FABRIK inverse kinematics for strider legs.
//!
//! # Architecture
//!
//! ```text
//! Joint + Link ──► Chain ──► FabrikSolver ──► joint directions
//! ```
//!
//! A [`Chain`] is built once by the caller and handed to the gait generator,
//! which owns it from then on. The solver mutates only joint directions.

pub mod chain;
pub mod fabrik;
pub mod joint;
pub mod link;

pub use chain::{Chain, ChainElement, LinkState};
pub use fabrik::{FabrikSolver, SolveReport};
pub use joint::{Joint, JointKind};
pub use link::Link;
pub use strider_core::FabrikConfig;
