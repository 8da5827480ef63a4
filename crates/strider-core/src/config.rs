use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

// ---------------------------------------------------------------------------
// Serde default functions
// ---------------------------------------------------------------------------

const fn default_step_height() -> f64 {
    0.04
}
const fn default_step_length() -> f64 {
    0.08
}
const fn default_cycle_time() -> f64 {
    1.0
}
const fn default_body_height() -> f64 {
    0.10
}
const fn default_max_velocity() -> f64 {
    0.2
}
const fn default_max_turn_rate() -> f64 {
    1.0
}
fn default_gait_name() -> String {
    "tripod".into()
}
const fn default_min_stance_legs() -> usize {
    3
}
const fn default_blend_duration() -> f64 {
    0.5
}
const fn default_tolerance() -> f64 {
    0.01
}
const fn default_max_iterations() -> u32 {
    20
}
const fn default_min_travel() -> f64 {
    0.01
}
const fn default_differential_gain() -> f64 {
    0.5
}
const fn default_pivot_step_angle() -> f64 {
    0.2
}

// ---------------------------------------------------------------------------
// FabrikConfig
// ---------------------------------------------------------------------------

/// Stopping criteria for the FABRIK solver.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FabrikConfig {
    /// End-effector distance below which the target counts as reached.
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,

    /// Upper bound on forward/backward rounds per solve.
    #[serde(default = "default_max_iterations")]
    pub max_iterations: u32,

    /// Minimum change in end-effector distance between rounds; less than this
    /// stops the solve.
    #[serde(default = "default_min_travel")]
    pub min_travel: f64,
}

impl Default for FabrikConfig {
    fn default() -> Self {
        Self {
            tolerance: default_tolerance(),
            max_iterations: default_max_iterations(),
            min_travel: default_min_travel(),
        }
    }
}

impl FabrikConfig {
    /// Validate configuration. Returns Err on invalid values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tolerance.is_nan() || self.tolerance <= 0.0 {
            return Err(ConfigError::invalid("fabrik.tolerance", "must be > 0"));
        }
        if self.max_iterations == 0 {
            return Err(ConfigError::invalid("fabrik.max_iterations", "must be >= 1"));
        }
        if self.min_travel.is_nan() || self.min_travel < 0.0 {
            return Err(ConfigError::invalid("fabrik.min_travel", "must be >= 0"));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// PatternParams
// ---------------------------------------------------------------------------

/// Rotation sense for pivot turns, seen from above.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnDirection {
    Clockwise,
    #[default]
    CounterClockwise,
}

impl TurnDirection {
    /// +1 for counter-clockwise, -1 for clockwise.
    pub const fn sign(self) -> f64 {
        match self {
            Self::Clockwise => -1.0,
            Self::CounterClockwise => 1.0,
        }
    }
}

/// Parameters consumed by the pattern-specific step behaviors.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PatternParams {
    /// Differential tripod: step-length change per rad/s of turn rate.
    #[serde(default = "default_differential_gain")]
    pub differential_gain: f64,

    /// Crab walk: travel direction in the body frame (radians from +X).
    #[serde(default)]
    pub crab_heading: f64,

    /// Pivot turn: rotation per stance phase when no turn rate is commanded.
    #[serde(default = "default_pivot_step_angle")]
    pub pivot_step_angle: f64,

    /// Pivot turn: rotation sense when no turn rate is commanded.
    #[serde(default)]
    pub pivot_direction: TurnDirection,
}

impl Default for PatternParams {
    fn default() -> Self {
        Self {
            differential_gain: default_differential_gain(),
            crab_heading: 0.0,
            pivot_step_angle: default_pivot_step_angle(),
            pivot_direction: TurnDirection::default(),
        }
    }
}

impl PatternParams {
    /// Validate configuration. Returns Err on invalid values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        non_negative("pattern.differential_gain", self.differential_gain)?;
        if !self.crab_heading.is_finite() {
            return Err(ConfigError::invalid("pattern.crab_heading", "must be finite"));
        }
        if !self.pivot_step_angle.is_finite() {
            return Err(ConfigError::invalid(
                "pattern.pivot_step_angle",
                "must be finite",
            ));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// LocomotionConfig
// ---------------------------------------------------------------------------

/// Gait generator configuration.
///
/// Lengths are meters, times seconds, angles radians. Foot positions are
/// expressed in the body frame: X forward, Y left, Z up, origin at the body
/// center.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocomotionConfig {
    /// Apex of the swing arc above the contact height.
    #[serde(default = "default_step_height")]
    pub step_height: f64,

    /// Longest stride a leg may take in one stance phase.
    #[serde(default = "default_step_length")]
    pub step_length: f64,

    /// Duration of one full gait cycle.
    #[serde(default = "default_cycle_time")]
    pub cycle_time: f64,

    /// Height of the body center above the ground plane.
    #[serde(default = "default_body_height")]
    pub body_height: f64,

    /// Foot contact height above the ground plane.
    #[serde(default)]
    pub ground_clearance: f64,

    /// Linear velocity magnitude commands are clamped to (m/s).
    #[serde(default = "default_max_velocity")]
    pub max_velocity: f64,

    /// Turn rate magnitude commands are clamped to (rad/s).
    #[serde(default = "default_max_turn_rate")]
    pub max_turn_rate: f64,

    /// Pattern selected when the generator is built.
    #[serde(default = "default_gait_name")]
    pub default_gait: String,

    /// Stance legs below which a tick is flagged unstable.
    #[serde(default = "default_min_stance_legs")]
    pub stability_min_stance_legs: usize,

    /// Duration of a blended pattern switch, also used for the stop ramp.
    #[serde(default = "default_blend_duration")]
    pub blend_duration: f64,

    /// Stability margin below which a tick with a support polygon is flagged
    /// unstable.
    #[serde(default)]
    pub min_stability_margin: f64,

    #[serde(default)]
    pub fabrik: FabrikConfig,

    #[serde(default)]
    pub pattern: PatternParams,
}

impl Default for LocomotionConfig {
    fn default() -> Self {
        Self {
            step_height: default_step_height(),
            step_length: default_step_length(),
            cycle_time: default_cycle_time(),
            body_height: default_body_height(),
            ground_clearance: 0.0,
            max_velocity: default_max_velocity(),
            max_turn_rate: default_max_turn_rate(),
            default_gait: default_gait_name(),
            stability_min_stance_legs: default_min_stance_legs(),
            blend_duration: default_blend_duration(),
            min_stability_margin: 0.0,
            fabrik: FabrikConfig::default(),
            pattern: PatternParams::default(),
        }
    }
}

impl LocomotionConfig {
    /// Validate configuration. Returns Err on invalid values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !is_positive(self.cycle_time) {
            return Err(ConfigError::InvalidCycleTime(self.cycle_time));
        }
        non_negative("step_height", self.step_height)?;
        non_negative("step_length", self.step_length)?;
        non_negative("max_velocity", self.max_velocity)?;
        non_negative("max_turn_rate", self.max_turn_rate)?;
        if !is_positive(self.body_height) {
            return Err(ConfigError::invalid("body_height", "must be finite and > 0"));
        }
        if !self.ground_clearance.is_finite() {
            return Err(ConfigError::invalid("ground_clearance", "must be finite"));
        }
        if !is_positive(self.blend_duration) {
            return Err(ConfigError::invalid(
                "blend_duration",
                "must be finite and > 0",
            ));
        }
        if !self.min_stability_margin.is_finite() {
            return Err(ConfigError::invalid("min_stability_margin", "must be finite"));
        }
        if self.default_gait.trim().is_empty() {
            return Err(ConfigError::invalid("default_gait", "must not be empty"));
        }
        self.fabrik.validate()?;
        self.pattern.validate()
    }

    /// Stance duration of a leg at the given duty factor.
    pub fn stance_time(&self, duty_factor: f64) -> f64 {
        self.cycle_time * duty_factor
    }

    /// Foot contact height in the body frame.
    pub fn contact_height(&self) -> f64 {
        self.ground_clearance - self.body_height
    }

    /// Load from TOML file.
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }
}

fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

fn non_negative(field: &str, value: f64) -> Result<(), ConfigError> {
    if value >= 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, "must be finite and >= 0"))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // ---- defaults ----

    #[test]
    fn locomotion_config_default_values() {
        let cfg = LocomotionConfig::default();
        assert!((cfg.step_height - 0.04).abs() < f64::EPSILON);
        assert!((cfg.step_length - 0.08).abs() < f64::EPSILON);
        assert!((cfg.cycle_time - 1.0).abs() < f64::EPSILON);
        assert!((cfg.body_height - 0.10).abs() < f64::EPSILON);
        assert_eq!(cfg.default_gait, "tripod");
        assert_eq!(cfg.stability_min_stance_legs, 3);
        assert!((cfg.blend_duration - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn fabrik_config_default_values() {
        let cfg = FabrikConfig::default();
        assert!((cfg.tolerance - 0.01).abs() < f64::EPSILON);
        assert_eq!(cfg.max_iterations, 20);
        assert!((cfg.min_travel - 0.01).abs() < f64::EPSILON);
    }

    // ---- validate ----

    #[test]
    fn locomotion_config_validate_ok() {
        assert!(LocomotionConfig::default().validate().is_ok());
    }

    #[test]
    fn validate_rejects_zero_cycle_time() {
        let cfg = LocomotionConfig {
            cycle_time: 0.0,
            ..LocomotionConfig::default()
        };
        let err = cfg.validate().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidCycleTime(_)));
    }

    #[test]
    fn validate_rejects_nan_cycle_time() {
        let cfg = LocomotionConfig {
            cycle_time: f64::NAN,
            ..LocomotionConfig::default()
        };
        assert!(matches!(
            cfg.validate().unwrap_err(),
            ConfigError::InvalidCycleTime(_)
        ));
    }

    #[test]
    fn validate_rejects_negative_step_height() {
        let cfg = LocomotionConfig {
            step_height: -0.01,
            ..LocomotionConfig::default()
        };
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("step_height"));
    }

    #[test]
    fn validate_rejects_zero_blend_duration() {
        let cfg = LocomotionConfig {
            blend_duration: 0.0,
            ..LocomotionConfig::default()
        };
        assert!(cfg.validate().unwrap_err().to_string().contains("blend_duration"));
    }

    #[test]
    fn validate_rejects_zero_solver_iterations() {
        let cfg = LocomotionConfig {
            fabrik: FabrikConfig {
                max_iterations: 0,
                ..FabrikConfig::default()
            },
            ..LocomotionConfig::default()
        };
        assert!(cfg.validate().unwrap_err().to_string().contains("max_iterations"));
    }

    #[test]
    fn validate_rejects_empty_gait_name() {
        let cfg = LocomotionConfig {
            default_gait: "  ".into(),
            ..LocomotionConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    // ---- computed ----

    #[test]
    fn contact_height_is_below_body() {
        let cfg = LocomotionConfig {
            body_height: 0.12,
            ground_clearance: 0.01,
            ..LocomotionConfig::default()
        };
        assert!((cfg.contact_height() - (-0.11)).abs() < 1e-12);
    }

    #[test]
    fn stance_time_scales_with_duty() {
        let cfg = LocomotionConfig {
            cycle_time: 0.8,
            ..LocomotionConfig::default()
        };
        assert!((cfg.stance_time(0.5) - 0.4).abs() < 1e-12);
    }

    #[test]
    fn turn_direction_sign() {
        assert!((TurnDirection::Clockwise.sign() + 1.0).abs() < f64::EPSILON);
        assert!((TurnDirection::CounterClockwise.sign() - 1.0).abs() < f64::EPSILON);
    }

    // ---- TOML ----

    #[test]
    fn locomotion_config_toml_deserialization() {
        let toml_str = r#"
            step_height = 0.05
            cycle_time = 0.8
            default_gait = "wave"
            stability_min_stance_legs = 4

            [fabrik]
            tolerance = 0.001
            max_iterations = 30

            [pattern]
            crab_heading = 1.5707963
            pivot_direction = "clockwise"
        "#;
        let cfg: LocomotionConfig = toml::from_str(toml_str).unwrap();
        assert!((cfg.step_height - 0.05).abs() < f64::EPSILON);
        assert!((cfg.cycle_time - 0.8).abs() < f64::EPSILON);
        assert_eq!(cfg.default_gait, "wave");
        assert_eq!(cfg.stability_min_stance_legs, 4);
        assert!((cfg.fabrik.tolerance - 0.001).abs() < f64::EPSILON);
        assert_eq!(cfg.fabrik.max_iterations, 30);
        assert!((cfg.fabrik.min_travel - 0.01).abs() < f64::EPSILON);
        assert_eq!(cfg.pattern.pivot_direction, TurnDirection::Clockwise);
        assert!((cfg.pattern.differential_gain - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn locomotion_config_toml_defaults() {
        let cfg: LocomotionConfig = toml::from_str("").unwrap();
        assert_eq!(cfg, LocomotionConfig::default());
    }

    #[test]
    fn from_toml_str_validates() {
        let result = LocomotionConfig::from_toml_str("cycle_time = -1.0");
        assert!(matches!(result, Err(ConfigError::InvalidCycleTime(_))));
    }

    #[test]
    fn from_toml_str_reports_parse_errors() {
        let result = LocomotionConfig::from_toml_str("cycle_time = \"fast\"");
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    // ---- from_file ----

    #[test]
    fn locomotion_config_from_file() {
        let dir = std::env::temp_dir().join("strider_test_locomotion_config");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("gait.toml");
        std::fs::write(
            &path,
            r#"
            step_length = 0.06
            max_velocity = 0.15
            default_gait = "ripple"
        "#,
        )
        .unwrap();

        let cfg = LocomotionConfig::from_file(&path).unwrap();
        assert!((cfg.step_length - 0.06).abs() < f64::EPSILON);
        assert!((cfg.max_velocity - 0.15).abs() < f64::EPSILON);
        assert_eq!(cfg.default_gait, "ripple");

        // Cleanup
        let _ = std::fs::remove_file(&path);
        let _ = std::fs::remove_dir(&dir);
    }

    #[test]
    fn locomotion_config_from_missing_file() {
        let result = LocomotionConfig::from_file("/nonexistent/path/gait.toml");
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }
}
