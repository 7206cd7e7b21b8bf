//! Default tuning values shared by the controllers and configuration.
//!
//! These values seed the `Default` implementations in [`crate::config`] and
//! can be overridden per run through a JSON configuration file.

/// Lateral walking speed in world units per second.
pub const MOVE_SPEED: f32 = 5.0;
/// Rate at which the body turns toward its motion direction.
pub const TURN_SPEED: f32 = 10.0;
/// Acceleration applied along the body's negative up every tick.
pub const GRAVITY_STRENGTH: f32 = 20.0;
/// Maximum probe distance for locating the surface beneath the body.
pub const GROUND_CHECK_DISTANCE: f32 = 1.5;
/// Height above the surface at which a standing body rests.
pub const GROUND_OFFSET: f32 = 0.5;
/// Rate at which the body's up tracks the sampled surface normal.
pub const ALIGN_TO_GROUND_SPEED: f32 = 10.0;

/// Default orbit distance between camera and body.
pub const CAMERA_DISTANCE: f32 = 6.0;
/// Closest the camera may zoom in.
pub const CAMERA_MIN_DISTANCE: f32 = 2.0;
/// Furthest the camera may zoom out.
pub const CAMERA_MAX_DISTANCE: f32 = 12.0;
/// Lowest pitch in degrees (negative looks up at the body).
pub const CAMERA_MIN_PITCH: f32 = -30.0;
/// Highest pitch in degrees (positive looks down at the body).
pub const CAMERA_MAX_PITCH: f32 = 70.0;
/// Degrees of yaw per unit of horizontal look input.
pub const CAMERA_SENSITIVITY_X: f32 = 3.0;
/// Degrees of pitch per unit of vertical look input.
pub const CAMERA_SENSITIVITY_Y: f32 = 3.0;
/// Distance change per unit of scroll input.
pub const CAMERA_ZOOM_SPEED: f32 = 2.0;
/// Rate at which the camera position follows its desired position.
pub const CAMERA_FOLLOW_SPEED: f32 = 10.0;
/// Rate at which the camera's smoothed up follows the body's up.
pub const CAMERA_UP_ALIGN_SPEED: f32 = 5.0;
/// Height above the body, along the smoothed up, that the camera orbits.
pub const CAMERA_HEIGHT_OFFSET: f32 = 1.5;

/// Distance inside which an agent may notice the target.
pub const DETECT_DISTANCE: f32 = 10.0;
/// Distance beyond which an alerted agent loses the target.
pub const LOSE_DISTANCE: f32 = 15.0;
/// Minimum up-vector agreement for agent and target to share a plane.
pub const SAME_PLANE_DOT_THRESHOLD: f32 = 0.8;
/// Minimum cosine between agent forward and target direction.
pub const FOV_DOT_THRESHOLD: f32 = 0.5;
/// Alarm charge gained per second while the target is visible.
pub const CHARGE_SPEED: f32 = 0.5;
/// Alarm charge lost per second while the target is not visible.
pub const DECAY_SPEED: f32 = 0.25;

/// Travel speed of the straight-line pathfinder used by demo agents.
pub const AGENT_SPEED: f32 = 3.5;
/// Distance at which an agent considers its destination reached.
pub const AGENT_STOPPING_DISTANCE: f32 = 0.5;
/// Height of an agent's alarm indicator above its position, along its up.
pub const INDICATOR_HEIGHT: f32 = 2.0;

/// Fixed simulation step in seconds (60 Hz).
pub const FIXED_DELTA: f32 = 1.0 / 60.0;
/// Upper bound on fixed steps run for a single frame.
pub const MAX_STEPS_PER_FRAME: u32 = 8;

/// Squared-length cut-off below which a vector is considered degenerate.
pub const DEGENERATE_EPSILON: f32 = 1e-6;
