pub mod bundles;
pub mod components;
mod systems;

use crate::core::state::SessionState;
use bevy::prelude::*;
use bevy_egui::EguiPrimaryContextPass;
use components::AlertQueue;
use systems::*;

pub struct UIPlugin;

impl Plugin for UIPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<AlertQueue>()
            .add_systems(OnEnter(SessionState::Loading), spawn_loading_screen)
            .add_systems(OnExit(SessionState::Loading), despawn_loading_screen)
            .add_systems(
                Update,
                (
                    animate_loading_screen.run_if(in_state(SessionState::Loading)),
                    queue_alerts,
                ),
            )
            .add_systems(EguiPrimaryContextPass, show_alert_dialog);

        #[cfg(debug_assertions)]
        {
            app.add_systems(OnEnter(SessionState::Active), init_pollution_panel)
                .add_systems(
                    Update,
                    sync_pollution_panel
                        .run_if(in_state(SessionState::Active))
                        .run_if(resource_exists::<components::PollutionPanel>),
                )
                .add_systems(
                    EguiPrimaryContextPass,
                    render_pollution_panel
                        .run_if(in_state(SessionState::Active))
                        .run_if(resource_exists::<components::PollutionPanel>),
                );
        }
    }
}
