pub(crate) mod animation;
pub(crate) mod appearance;
pub mod components;
pub mod events;
pub(crate) mod lifecycle;
pub mod materials;
pub mod resources;
pub(crate) mod systems;

use crate::core::state::SessionState;
use crate::loading::GlobeTextures;
use crate::planet::animation::animate_globe;
use crate::planet::appearance::{apply_external_changes, poll_pollution};
use crate::planet::events::*;
use crate::planet::lifecycle::*;
use crate::planet::materials::*;
use crate::planet::resources::HandshakeTimer;
use crate::planet::systems::build_scene;
use bevy::prelude::*;
use globecore::ManifestError;

#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("invalid texture manifest: {0}")]
    Manifest(#[from] ManifestError),

    #[error("no primary window to render into")]
    NoPrimaryWindow,
}

pub struct PlanetPlugin;

impl Plugin for PlanetPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins((
            MaterialPlugin::<EarthMaterial>::default(),
            MaterialPlugin::<AtmosphereMaterial>::default(),
            MaterialPlugin::<MoonMaterial>::default(),
            MaterialPlugin::<StarfieldMaterial>::default(),
        ))
        .add_message::<PollutionChanged>()
        .add_message::<UserAlert>()
        .add_systems(Startup, begin_session)
        .add_systems(
            Update,
            (
                build_scene
                    .pipe(report_startup_failure)
                    .run_if(resource_added::<GlobeTextures>),
                run_handshake.run_if(resource_exists::<HandshakeTimer>),
            )
                .chain()
                .run_if(in_state(SessionState::Loading)),
        )
        .add_systems(
            Update,
            (apply_external_changes, poll_pollution, animate_globe, handle_resize)
                .chain()
                .run_if(in_state(SessionState::Active)),
        )
        .add_systems(OnEnter(SessionState::Active), fit_viewport_on_activate)
        .add_systems(Update, teardown_on_close);
    }
}

/// Milliseconds since startup, the clock every time-based effect runs on.
pub(crate) fn now_ms(time: &Time) -> f64 {
    time.elapsed_secs_f64() * 1000.0
}
