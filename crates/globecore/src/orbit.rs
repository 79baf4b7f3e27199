use crate::config::{RotationConfig, SceneConfig};
use crate::constants::WORLD_SUN_DIRECTION;
use glam::{Affine3A, Quat, Vec3};
use std::f32::consts::TAU;

/// Accumulated spin and orbit angles, advanced by fixed per-frame steps.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct OrbitalState {
    pub earth_spin: f32,
    pub moon_orbit: f32,
    pub moon_spin: f32,
}

impl OrbitalState {
    pub fn advance(&mut self, rotation: &RotationConfig) {
        self.earth_spin = wrap(self.earth_spin + rotation.earth_speed);
        self.moon_orbit = wrap(self.moon_orbit + rotation.moon_speed);
        self.moon_spin = wrap(self.moon_spin + rotation.moon_speed);
    }

    /// Extra Earth spin on top of the regular step, used while the planet is breaking up
    pub fn spin_earth(&mut self, extra: f32) {
        self.earth_spin = wrap(self.earth_spin + extra);
    }
}

fn wrap(angle: f32) -> f32 {
    angle.rem_euclid(TAU)
}

/// Local transforms of every node in the Earth-Moon hierarchy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyPoses {
    pub earth_group: Affine3A,
    pub earth: Affine3A,
    pub moon_orbit: Affine3A,
    pub moon: Affine3A,
}

impl BodyPoses {
    pub fn compute(
        state: &OrbitalState,
        earth_offset: Vec3,
        axial_tilt: f32,
        rotation: &RotationConfig,
        scene: &SceneConfig,
    ) -> Self {
        Self {
            earth_group: Affine3A::from_rotation_translation(Quat::from_rotation_z(axial_tilt), earth_offset),
            earth: Affine3A::from_rotation_y(state.earth_spin),
            moon_orbit: Affine3A::from_quat(
                Quat::from_rotation_x(rotation.moon_tilt()) * Quat::from_rotation_y(state.moon_orbit),
            ),
            moon: Affine3A::from_rotation_translation(
                Quat::from_rotation_y(state.moon_spin),
                Vec3::new(scene.moon_distance, 0.0, 0.0),
            ),
        }
    }

    /// World transform of Earth; the atmosphere shell shares it
    pub fn earth_world(&self) -> Affine3A {
        self.earth_group * self.earth
    }

    pub fn moon_world(&self) -> Affine3A {
        self.moon_orbit * self.moon
    }
}

pub fn world_sun_direction() -> Vec3 {
    Vec3::from_array(WORLD_SUN_DIRECTION)
}

/// The world sun vector expressed in the body's local frame.
pub fn local_sun_direction(world: &Affine3A, sun: Vec3) -> Vec3 {
    world.inverse().transform_vector3(sun).normalize_or_zero()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_unrotated_body_sees_plus_x() {
        let direction = local_sun_direction(&Affine3A::IDENTITY, world_sun_direction());
        assert!(direction.abs_diff_eq(Vec3::X, 1e-6));
    }

    #[rstest]
    #[case(0.3)]
    #[case(1.5)]
    #[case(4.0)]
    fn test_spin_rotates_sun_the_other_way(#[case] theta: f32) {
        let world = Affine3A::from_rotation_y(theta);
        let direction = local_sun_direction(&world, world_sun_direction());
        let expected = Quat::from_rotation_y(-theta) * Vec3::X;
        assert!(direction.abs_diff_eq(expected, 1e-5));
    }

    #[test]
    fn test_translation_does_not_affect_direction() {
        let world = Affine3A::from_translation(Vec3::new(10.0, -3.0, 2.0));
        let direction = local_sun_direction(&world, world_sun_direction());
        assert!(direction.abs_diff_eq(Vec3::X, 1e-6));
    }

    #[test]
    fn test_advance_uses_fixed_steps() {
        let rotation = RotationConfig::default();
        let mut state = OrbitalState::default();
        state.advance(&rotation);
        state.advance(&rotation);
        assert!((state.earth_spin - 0.002).abs() < 1e-7);
        assert!((state.moon_orbit - 0.00074).abs() < 1e-7);
        assert_eq!(state.moon_orbit, state.moon_spin);
    }

    #[test]
    fn test_moon_sits_at_orbit_radius() {
        let poses = BodyPoses::compute(
            &OrbitalState::default(),
            Vec3::ZERO,
            0.4,
            &RotationConfig::default(),
            &SceneConfig::default(),
        );
        let position = poses.moon_world().translation;
        assert!((position.length() - 10.0).abs() < 1e-4);
    }
}
