use bevy::math::{Vec2, Vec3};
use std::f32::consts::TAU;

const POLAR_EPSILON: f32 = 1e-6;

/// Camera offset from the orbit target in spherical form. `phi` is measured from +Y.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spherical {
    pub radius: f32,
    pub theta: f32,
    pub phi: f32,
}

impl Spherical {
    pub fn from_offset(offset: Vec3) -> Self {
        let radius = offset.length();
        if radius == 0.0 {
            return Self {
                radius: 0.0,
                theta: 0.0,
                phi: 0.0,
            };
        }
        Self {
            radius,
            theta: offset.x.atan2(offset.z),
            phi: (offset.y / radius).clamp(-1.0, 1.0).acos(),
        }
    }

    pub fn to_offset(self) -> Vec3 {
        let sin_phi_radius = self.phi.sin() * self.radius;
        Vec3::new(
            sin_phi_radius * self.theta.sin(),
            self.phi.cos() * self.radius,
            sin_phi_radius * self.theta.cos(),
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitLimits {
    pub min_distance: f32,
    pub max_distance: f32,
    pub min_polar: f32,
    pub max_polar: f32,
}

/// Motion requested by input but not yet applied to the camera.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendingMotion {
    pub theta: f32,
    pub phi: f32,
    pub scale: f32,
    pub pan: Vec3,
}

impl Default for PendingMotion {
    fn default() -> Self {
        Self {
            theta: 0.0,
            phi: 0.0,
            scale: 1.0,
            pan: Vec3::ZERO,
        }
    }
}

pub struct OrbitInput {
    /// Accumulated pointer drag in pixels
    pub rotate_pixels: Vec2,
    pub pan_pixels: Vec2,
    /// Positive zooms in
    pub wheel_steps: f32,
    /// Ratio of previous to current finger spread; 1 when no pinch happened
    pub pinch_ratio: f32,
    pub viewport_height: f32,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub enable_pan: bool,
}

pub struct OrbitUpdate {
    pub spherical: Spherical,
    pub target: Vec3,
    pub pending: PendingMotion,
}

/// Angles for a drag; a full viewport height of drag turns the camera once around.
pub fn rotation_from_drag(pixels: Vec2, viewport_height: f32, rotate_speed: f32) -> Vec2 {
    if viewport_height <= 0.0 {
        return Vec2::ZERO;
    }
    pixels * (TAU / viewport_height) * rotate_speed
}

pub fn wheel_zoom_scale(zoom_speed: f32) -> f32 {
    0.95_f32.powf(zoom_speed)
}

/// Folds new input into the pending motion. Pan is expressed in camera right/up units.
pub fn accumulate_input(
    mut pending: PendingMotion,
    input: &OrbitInput,
    distance: f32,
    vertical_fov: f32,
    camera_right: Vec3,
    camera_up: Vec3,
) -> PendingMotion {
    let angles = rotation_from_drag(input.rotate_pixels, input.viewport_height, input.rotate_speed);
    pending.theta -= angles.x;
    pending.phi -= angles.y;

    if input.wheel_steps != 0.0 {
        pending.scale *= wheel_zoom_scale(input.zoom_speed).powf(input.wheel_steps);
    }
    if input.pinch_ratio > 0.0 && input.pinch_ratio != 1.0 {
        pending.scale *= input.pinch_ratio.powf(input.zoom_speed);
    }

    if input.enable_pan && input.pan_pixels != Vec2::ZERO && input.viewport_height > 0.0 {
        let world_per_pixel = 2.0 * distance * (vertical_fov / 2.0).tan() / input.viewport_height;
        pending.pan += (-camera_right * input.pan_pixels.x + camera_up * input.pan_pixels.y) * world_per_pixel;
    }

    pending
}

/// One damped step: apply a `damping` share of the pending rotation and pan, then clamp.
pub fn step_orbit(
    spherical: Spherical,
    target: Vec3,
    pending: PendingMotion,
    limits: &OrbitLimits,
    damping: f32,
) -> OrbitUpdate {
    let damping = damping.clamp(0.0, 1.0);
    let mut next = spherical;

    next.theta += pending.theta * damping;
    next.phi += pending.phi * damping;
    next.phi = next
        .phi
        .clamp(limits.min_polar, limits.max_polar)
        .clamp(POLAR_EPSILON, std::f32::consts::PI - POLAR_EPSILON);

    next.radius = (next.radius * pending.scale).clamp(limits.min_distance, limits.max_distance);

    let target = target + pending.pan * damping;
    let remaining = 1.0 - damping;

    OrbitUpdate {
        spherical: next,
        target,
        pending: PendingMotion {
            theta: pending.theta * remaining,
            phi: pending.phi * remaining,
            scale: 1.0,
            pan: pending.pan * remaining,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::f32::consts::PI;

    fn limits() -> OrbitLimits {
        OrbitLimits {
            min_distance: 4.0,
            max_distance: 30.0,
            min_polar: 0.1 * PI,
            max_polar: 0.9 * PI,
        }
    }

    fn idle_input() -> OrbitInput {
        OrbitInput {
            rotate_pixels: Vec2::ZERO,
            pan_pixels: Vec2::ZERO,
            wheel_steps: 0.0,
            pinch_ratio: 1.0,
            viewport_height: 800.0,
            rotate_speed: 0.8,
            zoom_speed: 1.0,
            enable_pan: true,
        }
    }

    #[test]
    fn test_spherical_round_trip() {
        let offset = Vec3::new(0.0, 5.0, 15.0);
        let back = Spherical::from_offset(offset).to_offset();
        assert!(back.abs_diff_eq(offset, 1e-4), "got {}", back);
    }

    #[test]
    fn test_no_input_no_change() {
        let start = Spherical::from_offset(Vec3::new(0.0, 5.0, 15.0));
        let update = step_orbit(start, Vec3::ZERO, PendingMotion::default(), &limits(), 0.05);
        assert_eq!(update.spherical, start);
        assert_eq!(update.target, Vec3::ZERO);
    }

    #[rstest]
    #[case(800.0, 800.0, 1.0, TAU)]
    #[case(400.0, 800.0, 1.0, PI)]
    #[case(400.0, 800.0, 0.5, PI / 2.0)]
    fn test_drag_to_angle(#[case] pixels: f32, #[case] height: f32, #[case] speed: f32, #[case] angle: f32) {
        let angles = rotation_from_drag(Vec2::new(pixels, 0.0), height, speed);
        assert!((angles.x - angle).abs() < 1e-5);
    }

    #[test]
    fn test_damping_converges_to_requested_rotation() {
        let start = Spherical::from_offset(Vec3::new(0.0, 0.0, 15.0));
        let mut input = idle_input();
        input.rotate_pixels = Vec2::new(-100.0, 0.0);
        let mut pending =
            accumulate_input(PendingMotion::default(), &input, start.radius, 0.8, Vec3::X, Vec3::Y);
        let requested = pending.theta;

        let mut spherical = start;
        for _ in 0..500 {
            let update = step_orbit(spherical, Vec3::ZERO, pending, &limits(), 0.05);
            spherical = update.spherical;
            pending = update.pending;
        }

        assert!((spherical.theta - start.theta - requested).abs() < 1e-4);
        assert!(pending.theta.abs() < 1e-6);
    }

    #[rstest]
    #[case(100.0)]
    #[case(-100.0)]
    #[case(0.001)]
    fn test_distance_stays_clamped(#[case] wheel_steps: f32) {
        let mut input = idle_input();
        input.wheel_steps = wheel_steps;
        let start = Spherical::from_offset(Vec3::new(0.0, 5.0, 15.0));
        let pending = accumulate_input(PendingMotion::default(), &input, start.radius, 0.8, Vec3::X, Vec3::Y);

        let update = step_orbit(start, Vec3::ZERO, pending, &limits(), 0.05);
        assert!((4.0..=30.0).contains(&update.spherical.radius));
    }

    #[rstest]
    #[case(1.0e6)]
    #[case(-1.0e6)]
    fn test_polar_angle_stays_clamped(#[case] vertical_pixels: f32) {
        let mut input = idle_input();
        input.rotate_pixels = Vec2::new(0.0, vertical_pixels);
        let start = Spherical::from_offset(Vec3::new(0.0, 5.0, 15.0));
        let pending = accumulate_input(PendingMotion::default(), &input, start.radius, 0.8, Vec3::X, Vec3::Y);

        let update = step_orbit(start, Vec3::ZERO, pending, &limits(), 1.0);
        assert!(update.spherical.phi >= 0.1 * PI - 1e-6);
        assert!(update.spherical.phi <= 0.9 * PI + 1e-6);
    }

    #[test]
    fn test_wheel_up_moves_closer() {
        let mut input = idle_input();
        input.wheel_steps = 1.0;
        let pending = accumulate_input(PendingMotion::default(), &input, 15.0, 0.8, Vec3::X, Vec3::Y);
        assert!((pending.scale - 0.95).abs() < 1e-6);
    }

    #[test]
    fn test_pinch_apart_zooms_in() {
        let mut input = idle_input();
        input.pinch_ratio = 0.5;
        input.zoom_speed = 0.5;
        let pending = accumulate_input(PendingMotion::default(), &input, 15.0, 0.8, Vec3::X, Vec3::Y);
        assert!((pending.scale - 0.5_f32.sqrt()).abs() < 1e-6);
    }

    #[test]
    fn test_pan_disabled_on_mobile_profile() {
        let mut input = idle_input();
        input.enable_pan = false;
        input.pan_pixels = Vec2::new(50.0, 20.0);
        let pending = accumulate_input(PendingMotion::default(), &input, 15.0, 0.8, Vec3::X, Vec3::Y);
        assert_eq!(pending.pan, Vec3::ZERO);
    }
}
