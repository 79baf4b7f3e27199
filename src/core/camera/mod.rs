pub(crate) mod components;
pub(crate) mod logic;
mod systems;

use crate::core::camera::components::*;
use crate::core::camera::systems::*;
use crate::core::state::SessionState;
use bevy::prelude::*;
use bevy::transform::TransformSystems;

pub(crate) struct CameraPlugin;

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<MainCamera>()
            .add_systems(Startup, spawn_camera)
            .add_systems(
                PostUpdate,
                orbit_camera_control
                    .before(TransformSystems::Propagate)
                    .run_if(in_state(SessionState::Active)),
            );
    }
}
