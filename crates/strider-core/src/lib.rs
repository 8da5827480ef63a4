// strider-core: errors, configuration and control-tick time for the strider locomotion engine.

pub mod config;
pub mod error;
pub mod time;

pub use config::{FabrikConfig, LocomotionConfig, PatternParams, TurnDirection};
pub use error::{ChainError, ConfigError, GaitError, GeometryError, StriderError};
pub use time::{ControlTime, ElapsedSource, ManualClock, MonotonicClock, TickTimer};
