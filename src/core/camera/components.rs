use crate::core::camera::logic::{OrbitLimits, PendingMotion, Spherical};
use bevy::prelude::*;
use globecore::config::{CameraConfig, InputSensitivity};

#[derive(Component, Reflect, Default)]
#[reflect(Component)]
pub struct MainCamera;

/// Damped spherical orbit around `target`, in the manner of a web orbit-controls widget.
#[derive(Component, Debug, Clone)]
pub struct OrbitController {
    pub target: Vec3,
    pub spherical: Spherical,
    pub pending: PendingMotion,
    pub limits: OrbitLimits,
    pub damping: f32,
    pub sensitivity: InputSensitivity,
    /// Finger spread from the previous two-finger frame
    pub last_pinch: Option<f32>,
}

impl OrbitController {
    pub fn new(position: Vec3, target: Vec3, config: &CameraConfig, mobile: bool) -> Self {
        let (min_polar, max_polar) = config.polar_range();
        Self {
            target,
            spherical: Spherical::from_offset(position - target),
            pending: PendingMotion::default(),
            limits: OrbitLimits {
                min_distance: config.min_distance,
                max_distance: config.max_distance,
                min_polar,
                max_polar,
            },
            damping: config.damping_factor,
            sensitivity: config.sensitivity(mobile),
            last_pinch: None,
        }
    }
}
