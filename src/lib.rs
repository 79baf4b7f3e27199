mod core;
mod helpers;
mod loading;
pub mod planet;
pub mod platform;
pub mod storage;
mod ui;

use crate::core::camera::CameraPlugin;
use crate::core::state::SessionState;
use crate::loading::LoadingPlugin;
use crate::planet::PlanetPlugin;
use crate::planet::resources::{GlobeSettings, GlobeState, PollutionFeed};
use crate::platform::HostBridge;
use crate::storage::open_pollution_source;
use crate::ui::UIPlugin;
use bevy::app::App;
#[cfg(debug_assertions)]
use bevy::diagnostic::LogDiagnosticsPlugin;
use bevy::prelude::*;
use bevy_egui::EguiPlugin;
use globecore::{GlobeConfig, GlobeSimulation};

/// Element the renderer draws into when running in a browser.
pub const CANVAS_SELECTOR: &str = "#globe-canvas";

/// One globe session: scene, animation, pollution appearance and host integration.
pub struct GlobePlugin {
    pub config: GlobeConfig,
}

impl Plugin for GlobePlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(GlobeSettings(self.config.clone()))
            .insert_resource(GlobeState(GlobeSimulation::new(self.config.clone())))
            .insert_resource(PollutionFeed(open_pollution_source(&self.config)))
            .insert_non_send_resource(HostBridge::detect())
            .init_state::<SessionState>()
            .add_plugins((
                EguiPlugin::default(),
                CameraPlugin,
                LoadingPlugin,
                PlanetPlugin,
                UIPlugin,
            ));

        #[cfg(debug_assertions)]
        {
            app.add_plugins(LogDiagnosticsPlugin::default());
        }
    }
}
