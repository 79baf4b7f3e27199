use crate::loading::{GlobeTextures, TextureLoads};
use crate::planet::events::UserAlert;
use crate::ui::bundles::*;
use crate::ui::components::*;
use bevy::prelude::*;
use bevy_egui::{EguiContexts, egui};

const LOADING_TEXT: &str = "Loading";

pub fn spawn_loading_screen(mut commands: Commands) {
    commands
        .spawn((OverlayBundle::new(Color::srgb(0.02, 0.02, 0.06)), LoadingScreen))
        .with_children(|overlay| {
            overlay.spawn(
                LabelBundle::new("Pollution Globe", 36.0, Color::srgb(0.85, 0.9, 1.0))
                    .with_margin(UiRect::bottom(Val::Px(24.0))),
            );
            overlay.spawn((
                LabelBundle::new(LOADING_TEXT, 20.0, Color::srgb(0.6, 0.7, 0.85))
                    .with_margin(UiRect::bottom(Val::Px(12.0))),
                LoadingLabel,
            ));
            overlay
                .spawn(ProgressTrackBundle::new(240.0, 6.0, Color::srgb(0.15, 0.17, 0.25)))
                .with_children(|track| {
                    track.spawn((
                        ProgressFillBundle::new(6.0, Color::srgb(0.3, 0.6, 1.0)),
                        LoadingProgress,
                    ));
                });
        });
}

pub fn animate_loading_screen(
    time: Res<Time>,
    loads: Option<Res<TextureLoads>>,
    textures: Option<Res<GlobeTextures>>,
    mut label_q: Query<&mut Text, With<LoadingLabel>>,
    mut fill_q: Query<&mut Node, With<LoadingProgress>>,
) {
    let dots = (time.elapsed_secs() * 2.0) as usize % 4;
    for mut text in &mut label_q {
        text.0 = format!("{}{}", LOADING_TEXT, ".".repeat(dots));
    }

    let progress = match (loads, textures) {
        (Some(loads), _) => loads.0.progress(),
        (None, Some(_)) => 1.0,
        (None, None) => 0.0,
    };
    for mut node in &mut fill_q {
        node.width = Val::Percent(progress * 100.0);
    }
}

pub fn despawn_loading_screen(mut commands: Commands, screens: Query<Entity, With<LoadingScreen>>) {
    for entity in &screens {
        commands.entity(entity).despawn();
    }
}

pub fn queue_alerts(mut alerts: MessageReader<UserAlert>, mut queue: ResMut<AlertQueue>) {
    for alert in alerts.read() {
        queue.0.push_back(alert.message.clone());
    }
}

/// Shows the oldest alert until the user acknowledges it.
pub fn show_alert_dialog(mut contexts: EguiContexts, mut queue: ResMut<AlertQueue>) {
    let Some(message) = queue.0.front().cloned() else {
        return;
    };
    let Ok(ctx) = contexts.ctx_mut() else {
        return;
    };

    let mut acknowledged = false;
    egui::Window::new("Notice")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
        .show(ctx, |ui| {
            ui.label(message);
            ui.add_space(8.0);
            ui.vertical_centered(|ui| {
                if ui.button("OK").clicked() {
                    acknowledged = true;
                }
            });
        });

    if acknowledged {
        queue.0.pop_front();
    }
}

#[cfg(debug_assertions)]
pub use debug_panel::*;

#[cfg(debug_assertions)]
mod debug_panel {
    use crate::planet::events::{ChangeOrigin, PollutionChanged};
    use crate::planet::resources::{GlobeState, PollutionFeed};
    use crate::ui::components::PollutionPanel;
    use bevy::prelude::*;
    use bevy_egui::{EguiContexts, egui};
    use globecore::{PollutionLevel, PollutionSource};

    pub fn init_pollution_panel(mut commands: Commands, globe: Res<GlobeState>) {
        commands.insert_resource(PollutionPanel {
            value: globe.pollution().value(),
        });
    }

    /// Follows changes made by polling or by a destruction reset.
    pub fn sync_pollution_panel(mut changes: MessageReader<PollutionChanged>, mut panel: ResMut<PollutionPanel>) {
        if let Some(change) = changes.read().last() {
            panel.value = change.level.value();
        }
    }

    pub fn render_pollution_panel(
        mut contexts: EguiContexts,
        globe: Res<GlobeState>,
        mut panel: ResMut<PollutionPanel>,
        mut feed: ResMut<PollutionFeed>,
        mut changes: MessageWriter<PollutionChanged>,
    ) {
        let Ok(ctx) = contexts.ctx_mut() else {
            return;
        };

        let mut changed = false;
        egui::SidePanel::right("pollution_panel")
            .default_width(220.0)
            .resizable(false)
            .show(ctx, |ui| {
                ui.heading("Pollution");
                ui.add_space(10.0);
                changed = ui
                    .add(egui::Slider::new(&mut panel.value, 0.0..=100.0).step_by(0.5))
                    .changed();
                ui.label(format!("Tier: {}", globe.appearance().tier.label()));
                if globe.is_destructing() {
                    ui.colored_label(egui::Color32::from_rgb(230, 80, 60), "Planet is breaking apart");
                }
            });

        if changed {
            let level = PollutionLevel::new(panel.value);
            feed.write(level.value());
            changes.write(PollutionChanged {
                level,
                origin: ChangeOrigin::External,
            });
        }
    }
}
