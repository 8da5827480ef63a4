//! Geometry kernel for the strider locomotion engine.
//!
//! Pure value types: [`Vector3`], [`Quaternion`], [`Matrix3`] and [`Angle`].
//! Conversions to and from `nalgebra` live at the type boundary.

pub mod angle;
pub mod matrix;
pub mod quaternion;
pub mod vector;

pub use angle::Angle;
pub use matrix::Matrix3;
pub use quaternion::Quaternion;
pub use vector::Vector3;
