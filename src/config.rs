//! Tuning parameters for the body, camera, and agents.
//!
//! All configuration is immutable once a controller has been built from it.
//! Each struct deserialises with defaults for missing fields and exposes a
//! `validate` method; the checked constructors in the controller modules call
//! it so invalid values are rejected up front instead of misbehaving at
//! runtime.

use std::fs;
use std::path::{Path, PathBuf};

use log::warn;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{
    AGENT_SPEED, AGENT_STOPPING_DISTANCE, ALIGN_TO_GROUND_SPEED, CAMERA_DISTANCE,
    CAMERA_FOLLOW_SPEED, CAMERA_HEIGHT_OFFSET, CAMERA_MAX_DISTANCE, CAMERA_MAX_PITCH,
    CAMERA_MIN_DISTANCE, CAMERA_MIN_PITCH, CAMERA_SENSITIVITY_X, CAMERA_SENSITIVITY_Y,
    CAMERA_UP_ALIGN_SPEED, CAMERA_ZOOM_SPEED, CHARGE_SPEED, DECAY_SPEED, DETECT_DISTANCE,
    FOV_DOT_THRESHOLD, GRAVITY_STRENGTH, GROUND_CHECK_DISTANCE, GROUND_OFFSET, LOSE_DISTANCE,
    MOVE_SPEED, SAME_PLANE_DOT_THRESHOLD, TURN_SPEED,
};

/// Largest pitch magnitude accepted, in degrees. Looking straight along the
/// up axis would make the camera frame degenerate.
pub const PITCH_LIMIT: f32 = 89.0;

/// Reasons a configuration value is rejected.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// The value is `NaN` or infinite.
    #[error("`{field}` must be finite")]
    NonFinite {
        /// Offending field.
        field: &'static str,
    },
    /// The value must be zero or positive.
    #[error("`{field}` must not be negative (got {value})")]
    Negative {
        /// Offending field.
        field: &'static str,
        /// Rejected value.
        value: f32,
    },
    /// The value must be strictly positive.
    #[error("`{field}` must be positive (got {value})")]
    NonPositive {
        /// Offending field.
        field: &'static str,
        /// Rejected value.
        value: f32,
    },
    /// A `[min, max]` pair has `min > max`.
    #[error("`{field}` range is inverted: min {min} > max {max}")]
    InvertedRange {
        /// Offending range.
        field: &'static str,
        /// Configured minimum.
        min: f32,
        /// Configured maximum.
        max: f32,
    },
    /// The value lies outside its permitted interval.
    #[error("`{field}` = {value} lies outside [{min}, {max}]")]
    OutOfRange {
        /// Offending field.
        field: &'static str,
        /// Rejected value.
        value: f32,
        /// Lower bound.
        min: f32,
        /// Upper bound.
        max: f32,
    },
    /// Agents would lose the target before they could detect it.
    #[error("lose_distance {lose} is shorter than detect_distance {detect}")]
    LoseBeforeDetect {
        /// Configured detection distance.
        detect: f32,
        /// Configured lose distance.
        lose: f32,
    },
}

/// Failures while reading a configuration file.
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    /// The file could not be read.
    #[error("failed to read config {}: {source}", path.display())]
    Io {
        /// File that failed to load.
        path: PathBuf,
        /// Underlying I/O failure.
        source: std::io::Error,
    },
    /// The file is not valid JSON for [`LimpetConfig`].
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    /// The file parsed but holds invalid values.
    #[error("invalid config: {0}")]
    Invalid(#[from] ConfigError),
}

fn ensure_finite(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NonFinite { field })
    }
}

fn ensure_non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    ensure_finite(field, value)?;
    if value < 0.0 {
        return Err(ConfigError::Negative { field, value });
    }
    Ok(())
}

fn ensure_positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    ensure_finite(field, value)?;
    if value <= 0.0 {
        return Err(ConfigError::NonPositive { field, value });
    }
    Ok(())
}

fn ensure_within(field: &'static str, value: f32, min: f32, max: f32) -> Result<(), ConfigError> {
    ensure_finite(field, value)?;
    if value < min || value > max {
        return Err(ConfigError::OutOfRange {
            field,
            value,
            min,
            max,
        });
    }
    Ok(())
}

fn ensure_ordered(field: &'static str, min: f32, max: f32) -> Result<(), ConfigError> {
    if min > max {
        return Err(ConfigError::InvertedRange { field, min, max });
    }
    Ok(())
}

/// Locomotion tuning for the controlled body.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BodyConfig {
    /// Walking speed in units per second.
    pub move_speed: f32,
    /// Rate of turning toward the motion direction.
    pub turn_speed: f32,
    /// Acceleration along negative up, in units per second squared.
    pub gravity_strength: f32,
    /// Maximum probe length when sampling the surface below.
    pub ground_check_distance: f32,
    /// Resting height above the surface. Velocity into the surface is only
    /// cancelled at or below this height, so gravity pulls a body that has
    /// drifted higher back down.
    pub ground_offset: f32,
    /// Rate of aligning up with the sampled normal.
    pub align_to_ground_speed: f32,
}

impl Default for BodyConfig {
    fn default() -> Self {
        Self {
            move_speed: MOVE_SPEED,
            turn_speed: TURN_SPEED,
            gravity_strength: GRAVITY_STRENGTH,
            ground_check_distance: GROUND_CHECK_DISTANCE,
            ground_offset: GROUND_OFFSET,
            align_to_ground_speed: ALIGN_TO_GROUND_SPEED,
        }
    }
}

impl BodyConfig {
    /// Checks every field.
    ///
    /// # Errors
    /// Returns the first [`ConfigError`] encountered.
    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure_non_negative("move_speed", self.move_speed)?;
        ensure_non_negative("turn_speed", self.turn_speed)?;
        ensure_non_negative("gravity_strength", self.gravity_strength)?;
        ensure_positive("ground_check_distance", self.ground_check_distance)?;
        ensure_within(
            "ground_offset",
            self.ground_offset,
            0.0,
            self.ground_check_distance,
        )?;
        ensure_non_negative("align_to_ground_speed", self.align_to_ground_speed)
    }
}

/// Orbit camera tuning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Initial orbit distance.
    pub distance: f32,
    /// Minimum orbit distance.
    pub min_distance: f32,
    /// Maximum orbit distance.
    pub max_distance: f32,
    /// Minimum pitch in degrees.
    pub min_pitch: f32,
    /// Maximum pitch in degrees.
    pub max_pitch: f32,
    /// Degrees of yaw per unit of horizontal look input.
    pub sensitivity_x: f32,
    /// Degrees of pitch per unit of vertical look input.
    pub sensitivity_y: f32,
    /// Distance change per unit of scroll input.
    pub zoom_speed: f32,
    /// Rate at which the camera position chases its desired position.
    pub follow_speed: f32,
    /// Rate at which the smoothed up chases the body's up.
    pub up_align_speed: f32,
    /// Offset along the smoothed up from the body to the orbit pivot.
    pub height_offset: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            distance: CAMERA_DISTANCE,
            min_distance: CAMERA_MIN_DISTANCE,
            max_distance: CAMERA_MAX_DISTANCE,
            min_pitch: CAMERA_MIN_PITCH,
            max_pitch: CAMERA_MAX_PITCH,
            sensitivity_x: CAMERA_SENSITIVITY_X,
            sensitivity_y: CAMERA_SENSITIVITY_Y,
            zoom_speed: CAMERA_ZOOM_SPEED,
            follow_speed: CAMERA_FOLLOW_SPEED,
            up_align_speed: CAMERA_UP_ALIGN_SPEED,
            height_offset: CAMERA_HEIGHT_OFFSET,
        }
    }
}

impl CameraConfig {
    /// Checks every field.
    ///
    /// # Errors
    /// Returns the first [`ConfigError`] encountered.
    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure_non_negative("min_distance", self.min_distance)?;
        ensure_finite("max_distance", self.max_distance)?;
        ensure_ordered("distance", self.min_distance, self.max_distance)?;
        ensure_within(
            "distance",
            self.distance,
            self.min_distance,
            self.max_distance,
        )?;
        ensure_within("min_pitch", self.min_pitch, -PITCH_LIMIT, PITCH_LIMIT)?;
        ensure_within("max_pitch", self.max_pitch, -PITCH_LIMIT, PITCH_LIMIT)?;
        ensure_ordered("pitch", self.min_pitch, self.max_pitch)?;
        ensure_finite("sensitivity_x", self.sensitivity_x)?;
        ensure_finite("sensitivity_y", self.sensitivity_y)?;
        ensure_non_negative("zoom_speed", self.zoom_speed)?;
        ensure_non_negative("follow_speed", self.follow_speed)?;
        ensure_non_negative("up_align_speed", self.up_align_speed)?;
        ensure_finite("height_offset", self.height_offset)
    }
}

/// Per-agent perception thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionThresholds {
    /// Distance inside which the target can be noticed.
    pub detect_distance: f32,
    /// Distance beyond which an alerted agent gives up the chase.
    pub lose_distance: f32,
    /// Minimum `dot(target_up, agent_up)` for the two to share a plane.
    pub same_plane_dot_threshold: f32,
    /// Minimum `dot(direction_to_target, agent_forward)`.
    pub fov_dot_threshold: f32,
    /// Alarm charge per second while the target is seen.
    pub charge_speed: f32,
    /// Alarm decay per second while the target is unseen.
    pub decay_speed: f32,
}

impl Default for DetectionThresholds {
    fn default() -> Self {
        Self {
            detect_distance: DETECT_DISTANCE,
            lose_distance: LOSE_DISTANCE,
            same_plane_dot_threshold: SAME_PLANE_DOT_THRESHOLD,
            fov_dot_threshold: FOV_DOT_THRESHOLD,
            charge_speed: CHARGE_SPEED,
            decay_speed: DECAY_SPEED,
        }
    }
}

impl DetectionThresholds {
    /// Checks every field and the `lose_distance >= detect_distance` rule.
    ///
    /// # Errors
    /// Returns the first [`ConfigError`] encountered.
    ///
    /// # Examples
    /// ```
    /// use limpet::config::{ConfigError, DetectionThresholds};
    /// let bad = DetectionThresholds {
    ///     detect_distance: 10.0,
    ///     lose_distance: 5.0,
    ///     ..DetectionThresholds::default()
    /// };
    /// assert_eq!(
    ///     bad.validate(),
    ///     Err(ConfigError::LoseBeforeDetect { detect: 10.0, lose: 5.0 })
    /// );
    /// ```
    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure_positive("detect_distance", self.detect_distance)?;
        ensure_finite("lose_distance", self.lose_distance)?;
        if self.lose_distance < self.detect_distance {
            return Err(ConfigError::LoseBeforeDetect {
                detect: self.detect_distance,
                lose: self.lose_distance,
            });
        }
        ensure_within(
            "same_plane_dot_threshold",
            self.same_plane_dot_threshold,
            -1.0,
            1.0,
        )?;
        ensure_within("fov_dot_threshold", self.fov_dot_threshold, -1.0, 1.0)?;
        ensure_non_negative("charge_speed", self.charge_speed)?;
        ensure_non_negative("decay_speed", self.decay_speed)
    }
}

/// Agent tuning: perception plus the demo pathfinder's travel parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Perception thresholds.
    pub detection: DetectionThresholds,
    /// Travel speed used by [`crate::agent::DirectPathfinder`].
    pub speed: f32,
    /// Remaining distance at which a destination counts as reached.
    pub stopping_distance: f32,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            detection: DetectionThresholds::default(),
            speed: AGENT_SPEED,
            stopping_distance: AGENT_STOPPING_DISTANCE,
        }
    }
}

impl AgentConfig {
    /// Checks the thresholds and travel parameters.
    ///
    /// # Errors
    /// Returns the first [`ConfigError`] encountered.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.detection.validate()?;
        ensure_non_negative("speed", self.speed)?;
        ensure_non_negative("stopping_distance", self.stopping_distance)
    }
}

/// Complete configuration for a simulation run.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LimpetConfig {
    /// Controlled body tuning.
    pub body: BodyConfig,
    /// Orbit camera tuning.
    pub camera: CameraConfig,
    /// Tuning shared by every spawned agent.
    pub agent: AgentConfig,
}

impl LimpetConfig {
    /// Checks all sections.
    ///
    /// # Errors
    /// Returns the first [`ConfigError`] encountered.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.body.validate()?;
        self.camera.validate()?;
        self.agent.validate()
    }

    /// Parses and validates a JSON document. Missing fields take defaults.
    ///
    /// # Errors
    /// Returns [`ConfigLoadError::Parse`] for malformed JSON and
    /// [`ConfigLoadError::Invalid`] when a value fails validation.
    ///
    /// # Examples
    /// ```
    /// use limpet::config::LimpetConfig;
    /// let config = LimpetConfig::from_json_str(r#"{ "body": { "move_speed": 2.0 } }"#)
    ///     .expect("valid config");
    /// assert_eq!(config.body.move_speed, 2.0);
    /// ```
    pub fn from_json_str(json: &str) -> Result<Self, ConfigLoadError> {
        let config: Self = serde_json::from_str(json)?;
        if let Err(e) = config.validate() {
            warn!("rejecting configuration: {e}");
            return Err(e.into());
        }
        Ok(config)
    }

    /// Reads, parses, and validates a JSON file.
    ///
    /// # Errors
    /// Returns [`ConfigLoadError::Io`] when the file cannot be read, otherwise
    /// the errors of [`Self::from_json_str`].
    pub fn from_path(path: &Path) -> Result<Self, ConfigLoadError> {
        let json = fs::read_to_string(path).map_err(|source| ConfigLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }
}
