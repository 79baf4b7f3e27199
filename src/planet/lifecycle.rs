use crate::CANVAS_SELECTOR;
use crate::core::camera::components::MainCamera;
use crate::core::state::SessionState;
use crate::loading::GlobeTextures;
use crate::planet::StartupError;
use crate::planet::components::SceneEntity;
use crate::planet::events::UserAlert;
use crate::planet::materials::*;
use crate::planet::now_ms;
use crate::planet::resources::*;
use crate::platform::HostBridge;
use bevy::ecs::system::SystemParam;
use bevy::log::{error, info, warn};
use bevy::prelude::*;
use bevy::window::{PrimaryWindow, WindowCloseRequested, WindowResized};
use globecore::GlobeSimulation;
use globecore::constants::STARTUP_FAILURE_MESSAGE;

pub fn begin_session(
    time: Res<Time>,
    feed: Res<PollutionFeed>,
    mut globe: ResMut<GlobeState>,
    mut next_state: ResMut<NextState<SessionState>>,
) {
    match globe.begin_loading(feed.0.as_ref(), now_ms(&time)) {
        Ok(()) => {
            info!("Globe session loading at pollution {}", globe.pollution());
            next_state.set(SessionState::Loading);
        }
        Err(err) => warn!("Globe session not started: {}", err),
    }
}

/// Fatal startup errors dismiss the loading screen and tell the user.
pub fn report_startup_failure(
    In(result): In<Result<(), StartupError>>,
    mut globe: ResMut<GlobeState>,
    mut alerts: MessageWriter<UserAlert>,
    mut next_state: ResMut<NextState<SessionState>>,
) {
    let Err(err) = result else {
        return;
    };
    error!("Globe initialization failed: {}", err);
    alerts.write(UserAlert {
        message: STARTUP_FAILURE_MESSAGE.to_string(),
    });
    globe.dispose();
    next_state.set(SessionState::Disposed);
}

/// Waits for the settle delay, talks to the host, then starts the animation loop.
pub fn run_handshake(
    mut commands: Commands,
    time: Res<Time>,
    settings: Res<GlobeSettings>,
    mut timer: ResMut<HandshakeTimer>,
    mut bridge: NonSendMut<HostBridge>,
    mut globe: ResMut<GlobeState>,
    mut next_state: ResMut<NextState<SessionState>>,
) {
    if !timer.0.tick(time.delta()).just_finished() {
        return;
    }
    commands.remove_resource::<HandshakeTimer>();

    bridge.handshake(CANVAS_SELECTOR);

    if let Err(err) = globe.activate() {
        warn!("Globe session not activated: {}", err);
        return;
    }
    commands.insert_resource(PollTimer(Timer::from_seconds(
        settings.pollution.poll_interval_secs,
        TimerMode::Repeating,
    )));
    next_state.set(SessionState::Active);
    info!("Globe session active");
}

/// Keeps the camera aspect and the pixel ratio cap in step with the window and host viewport.
pub fn handle_resize(
    mut resized: MessageReader<WindowResized>,
    mut bridge: NonSendMut<HostBridge>,
    globe: Res<GlobeState>,
    mut windows: Query<&mut Window, With<PrimaryWindow>>,
    mut projections: Query<&mut Projection, With<MainCamera>>,
) {
    let window_resized = resized.read().count() > 0;
    let host_changed = bridge.take_viewport_change();
    if !window_resized && !host_changed {
        return;
    }
    let Ok(mut window) = windows.single_mut() else {
        return;
    };
    fit_viewport(&globe, &mut window, &mut projections);
}

/// Resize messages sent while loading are never read, so the first active frame fits the viewport.
pub fn fit_viewport_on_activate(
    globe: Res<GlobeState>,
    mut windows: Query<&mut Window, With<PrimaryWindow>>,
    mut projections: Query<&mut Projection, With<MainCamera>>,
) {
    let Ok(mut window) = windows.single_mut() else {
        return;
    };
    fit_viewport(&globe, &mut window, &mut projections);
}

fn fit_viewport(
    globe: &GlobeSimulation,
    window: &mut Window,
    projections: &mut Query<&mut Projection, With<MainCamera>>,
) {
    // Read ECS state
    let device_ratio = window.resolution.base_scale_factor();
    let width = window.physical_width() as f32 / device_ratio;
    let height = window.physical_height() as f32 / device_ratio;

    // Call business logic
    let Some(viewport) = globe.resize(width, height, device_ratio) else {
        return;
    };

    // Apply results to ECS
    for mut projection in projections.iter_mut() {
        if let Projection::Perspective(perspective) = projection.as_mut() {
            perspective.aspect_ratio = viewport.aspect;
        }
    }
    let scale_override = (viewport.pixel_ratio < device_ratio).then_some(viewport.pixel_ratio);
    if window.resolution.scale_factor_override() != scale_override {
        window.resolution.set_scale_factor_override(scale_override);
        info!("Pixel ratio capped at {}", viewport.pixel_ratio);
    }
}

/// Every asset store the scene allocates into.
#[derive(SystemParam)]
pub struct SceneAssets<'w> {
    meshes: ResMut<'w, Assets<Mesh>>,
    images: ResMut<'w, Assets<Image>>,
    earth: ResMut<'w, Assets<EarthMaterial>>,
    atmosphere: ResMut<'w, Assets<AtmosphereMaterial>>,
    moon: ResMut<'w, Assets<MoonMaterial>>,
    stars: ResMut<'w, Assets<StarfieldMaterial>>,
}

impl SceneAssets<'_> {
    /// Drops one mesh entity's assets; returns the number of meshes and materials released.
    fn release(
        &mut self,
        mesh: &Mesh3d,
        earth: Option<&MeshMaterial3d<EarthMaterial>>,
        atmosphere: Option<&MeshMaterial3d<AtmosphereMaterial>>,
        moon: Option<&MeshMaterial3d<MoonMaterial>>,
        stars: Option<&MeshMaterial3d<StarfieldMaterial>>,
    ) -> (usize, usize) {
        let meshes = usize::from(self.meshes.remove(&mesh.0).is_some());
        let materials = [
            earth.and_then(|handle| self.earth.remove(&handle.0)).is_some(),
            atmosphere.and_then(|handle| self.atmosphere.remove(&handle.0)).is_some(),
            moon.and_then(|handle| self.moon.remove(&handle.0)).is_some(),
            stars.and_then(|handle| self.stars.remove(&handle.0)).is_some(),
        ]
        .into_iter()
        .filter(|removed| *removed)
        .count();
        (meshes, materials)
    }
}

type SceneMeshQuery<'w, 's> = Query<
    'w,
    's,
    (
        &'static Mesh3d,
        Option<&'static MeshMaterial3d<EarthMaterial>>,
        Option<&'static MeshMaterial3d<AtmosphereMaterial>>,
        Option<&'static MeshMaterial3d<MoonMaterial>>,
        Option<&'static MeshMaterial3d<StarfieldMaterial>>,
    ),
>;

/// Releases everything the session owns, once, then closes the window.
pub fn teardown_on_close(
    mut commands: Commands,
    mut close_requests: MessageReader<WindowCloseRequested>,
    report: Option<Res<DisposalReport>>,
    mut globe: ResMut<GlobeState>,
    mut bridge: NonSendMut<HostBridge>,
    mut assets: SceneAssets,
    textures: Option<Res<GlobeTextures>>,
    roots: Query<Entity, With<SceneEntity>>,
    mesh_q: SceneMeshQuery,
    mut next_state: ResMut<NextState<SessionState>>,
) {
    let Some(request) = close_requests.read().last() else {
        return;
    };
    if report.is_some() {
        commands.entity(request.window).despawn();
        return;
    }

    globe.dispose();

    let mut disposal = DisposalReport::default();
    for (mesh, earth, atmosphere, moon, stars) in &mesh_q {
        let (meshes, materials) = assets.release(mesh, earth, atmosphere, moon, stars);
        disposal.meshes += meshes;
        disposal.materials += materials;
    }
    if let Some(textures) = textures {
        for handle in textures.handles() {
            assets.images.remove(handle);
        }
        commands.remove_resource::<GlobeTextures>();
    }
    for entity in &roots {
        commands.entity(entity).despawn();
    }

    commands.remove_resource::<PollTimer>();
    commands.remove_resource::<HandshakeTimer>();
    disposal.listeners = bridge.release();

    info!(
        "Released {} meshes, {} materials and {} listeners",
        disposal.meshes, disposal.materials, disposal.listeners
    );
    commands.insert_resource(disposal);
    next_state.set(SessionState::Disposed);
    commands.entity(request.window).despawn();
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::ecs::system::RunSystemOnce;
    use bevy::window::WindowResolution;
    use globecore::{GlobeConfig, MemoryPollutionSource};
    use rstest::rstest;

    fn active_globe() -> GlobeState {
        let mut simulation = GlobeSimulation::new(GlobeConfig::default());
        simulation.begin_loading(&MemoryPollutionSource::default(), 0.0).unwrap();
        simulation.activate().unwrap();
        GlobeState(simulation)
    }

    #[rstest]
    #[case(3.0, Some(2.0))]
    #[case(1.5, None)]
    fn test_activation_fits_viewport_without_resize(#[case] device_ratio: f32, #[case] expected: Option<f32>) {
        let mut world = World::new();
        world.insert_resource(active_globe());
        let mut resolution = WindowResolution::new(1200, 600);
        resolution.set_scale_factor(device_ratio);
        let window = world
            .spawn((
                Window {
                    resolution,
                    ..default()
                },
                PrimaryWindow,
            ))
            .id();
        let camera = world
            .spawn((Projection::Perspective(PerspectiveProjection::default()), MainCamera))
            .id();

        world.run_system_once(fit_viewport_on_activate).unwrap();

        let window = world.get::<Window>(window).unwrap();
        assert_eq!(window.resolution.scale_factor_override(), expected);
        let Some(Projection::Perspective(perspective)) = world.get::<Projection>(camera) else {
            panic!("camera lost its perspective projection");
        };
        assert!((perspective.aspect_ratio - 2.0).abs() < 1e-5);
    }
}
