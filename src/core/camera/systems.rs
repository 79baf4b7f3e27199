use crate::core::camera::components::{MainCamera, OrbitController};
use crate::core::camera::logic::{OrbitInput, accumulate_input, step_orbit};
use crate::planet::components::SceneEntity;
use crate::planet::resources::GlobeSettings;
use crate::platform::HostBridge;
use bevy::camera::PerspectiveProjection;
use bevy::input::ButtonInput;
use bevy::input::mouse::{MouseMotion, MouseWheel};
use bevy::input::touch::Touches;
use bevy::log::info;
use bevy::math::{Vec2, Vec3};
use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use globecore::config::InputProfile;

pub fn spawn_camera(mut commands: Commands, settings: Res<GlobeSettings>, bridge: NonSend<HostBridge>) {
    let scene = &settings.scene;
    let camera = &settings.camera;
    let mobile = match camera.input_profile {
        InputProfile::Auto => bridge.is_mobile(),
        InputProfile::Desktop => false,
        InputProfile::Mobile => true,
    };
    let position = Vec3::from_array(scene.camera_position);

    commands.spawn((
        Camera3d::default(),
        Projection::Perspective(PerspectiveProjection {
            fov: scene.fov_deg.to_radians(),
            near: scene.near,
            far: scene.far,
            ..default()
        }),
        Transform::from_translation(position).looking_at(Vec3::ZERO, Vec3::Y),
        MainCamera,
        OrbitController::new(position, Vec3::ZERO, camera, mobile),
        SceneEntity,
    ));

    info!("Camera spawned ({} input)", if mobile { "mobile" } else { "desktop" });
}

pub fn orbit_camera_control(
    mouse_input: Res<ButtonInput<MouseButton>>,
    mut mouse_motion: MessageReader<MouseMotion>,
    mut mouse_wheel: MessageReader<MouseWheel>,
    touches: Res<Touches>,
    windows: Query<&Window, With<PrimaryWindow>>,
    mut camera_q: Query<(&mut Transform, &Projection, &mut OrbitController), With<MainCamera>>,
) {
    // Read ECS state
    let Ok((mut transform, projection, mut controller)) = camera_q.single_mut() else {
        return;
    };
    let viewport_height = windows.single().map(|window| window.height()).unwrap_or(0.0);
    let vertical_fov = match projection {
        Projection::Perspective(perspective) => perspective.fov,
        _ => std::f32::consts::FRAC_PI_4,
    };

    // Collect pointer drag
    let mut motion = Vec2::ZERO;
    for ev in mouse_motion.read() {
        motion += ev.delta;
    }
    let mut rotate_pixels = Vec2::ZERO;
    let mut pan_pixels = Vec2::ZERO;
    if mouse_input.pressed(MouseButton::Left) {
        rotate_pixels += motion;
    } else if mouse_input.any_pressed([MouseButton::Right, MouseButton::Middle]) {
        pan_pixels += motion;
    }

    // Collect wheel steps, one per notch regardless of scroll unit
    let mut wheel_steps = 0.0;
    for ev in mouse_wheel.read() {
        wheel_steps += ev.y.signum();
    }

    // One finger rotates, two fingers pinch
    let active: Vec<_> = touches.iter().collect();
    let mut pinch_ratio = 1.0;
    match active.as_slice() {
        [finger] => {
            rotate_pixels += finger.delta();
            controller.last_pinch = None;
        }
        [first, second] => {
            let spread = first.position().distance(second.position());
            if let Some(previous) = controller.last_pinch
                && spread > 0.0
            {
                pinch_ratio = previous / spread;
            }
            controller.last_pinch = Some(spread);
        }
        _ => controller.last_pinch = None,
    }

    // Prepare input for business logic
    let input = OrbitInput {
        rotate_pixels,
        pan_pixels,
        wheel_steps,
        pinch_ratio,
        viewport_height,
        rotate_speed: controller.sensitivity.rotate_speed,
        zoom_speed: controller.sensitivity.zoom_speed,
        enable_pan: controller.sensitivity.enable_pan,
    };

    // Call business logic
    let pending = accumulate_input(
        controller.pending,
        &input,
        controller.spherical.radius,
        vertical_fov,
        transform.right().as_vec3(),
        transform.up().as_vec3(),
    );
    let update = step_orbit(
        controller.spherical,
        controller.target,
        pending,
        &controller.limits,
        controller.damping,
    );

    // Apply results to ECS
    controller.spherical = update.spherical;
    controller.target = update.target;
    controller.pending = update.pending;
    transform.translation = update.target + update.spherical.to_offset();
    transform.look_at(update.target, Vec3::Y);
}
