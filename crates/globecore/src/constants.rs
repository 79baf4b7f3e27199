pub const EARTH_ROTATION_SPEED: f32 = 0.001;
// 27.3 times slower than Earth in the real system, compressed here to ~2.7x
pub const MOON_ROTATION_SPEED: f32 = 0.00037;
pub const EARTH_TILT_DEG: f32 = 23.5;
pub const MOON_TILT_DEG: f32 = 5.14;
pub const MOON_DISTANCE: f32 = 10.0;

pub const EARTH_RADIUS: f32 = 2.0;
pub const ATMOSPHERE_RADIUS: f32 = 2.1;
pub const MOON_RADIUS: f32 = 0.54;
pub const SPHERE_SEGMENTS: u32 = 64;

pub const STAR_COUNT: usize = 5000;
pub const STAR_MIN_RADIUS: f32 = 50.0;
pub const STAR_RADIUS_SPAN: f32 = 150.0;

pub const POLLUTION_MIN: f32 = 0.0;
pub const POLLUTION_MAX: f32 = 100.0;
pub const DEFAULT_POLLUTION: f32 = 50.0;
pub const POLLUTION_STORAGE_KEY: &str = "earthPollution";

pub const INSTABILITY_THRESHOLD: f32 = 90.0;
// Radians of extra axial tilt per pollution unit above the instability threshold
pub const INSTABILITY_TILT_SLOPE: f32 = 0.01;
// World units of tremor per pollution unit above the instability threshold
pub const INSTABILITY_TREMOR_SLOPE: f32 = 0.002;

pub const DESTRUCTION_THRESHOLD: f32 = 99.5;
pub const DESTRUCTION_DURATION_MS: f64 = 5000.0;
pub const DESTRUCTION_RESET_LEVEL: f32 = 80.0;
pub const SHAKE_BASE: f32 = 0.02;
pub const SHAKE_GROWTH: f32 = 0.1;
// Phase multiplier applied to the millisecond timestamp for shake jitter
pub const SHAKE_FREQUENCY: f64 = 0.01;
pub const DESTRUCTION_SPIN_BOOST: f32 = 3.0;

/// Points from the origin toward the sun light.
pub const WORLD_SUN_DIRECTION: [f32; 3] = [1.0, 0.0, 0.0];
pub const SUN_LIGHT_POSITION: [f32; 3] = [50.0, 0.0, 0.0];

pub const MAX_PIXEL_RATIO: f32 = 2.0;

pub const DESTRUCTION_MESSAGE: &str = "The planet has been destroyed! Start over to save the Earth.";
pub const STARTUP_FAILURE_MESSAGE: &str = "Failed to initialize the globe";
