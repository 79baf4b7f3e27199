use crate::helpers::mesh::{Winding, star_points, uv_sphere};
use crate::loading::GlobeTextures;
use crate::planet::StartupError;
use crate::planet::animation::pose_transform;
use crate::planet::components::*;
use crate::planet::materials::*;
use crate::planet::resources::{GlobeSettings, GlobeState, HandshakeTimer};
use bevy::log::info;
use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use globecore::TextureRole;
use globecore::constants::SUN_LIGHT_POSITION;
use globecore::orbit::{BodyPoses, local_sun_direction, world_sun_direction};
use globecore::starfield::generate_stars;

const ATMOSPHERE_RIM_POWER: f32 = 4.0;
const MOON_NIGHT_BRIGHTNESS: f32 = 0.1;

/// Spawns light, bodies and stars once every texture has resolved.
pub fn build_scene(
    mut commands: Commands,
    settings: Res<GlobeSettings>,
    globe: Res<GlobeState>,
    textures: Res<GlobeTextures>,
    windows: Query<(), With<PrimaryWindow>>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut earth_materials: ResMut<Assets<EarthMaterial>>,
    mut atmosphere_materials: ResMut<Assets<AtmosphereMaterial>>,
    mut moon_materials: ResMut<Assets<MoonMaterial>>,
    mut star_materials: ResMut<Assets<StarfieldMaterial>>,
) -> Result<(), StartupError> {
    if windows.is_empty() {
        return Err(StartupError::NoPrimaryWindow);
    }

    let scene = &settings.scene;
    let appearance = globe.appearance();
    let poses = BodyPoses::compute(
        globe.orbit(),
        globe.earth_offset(),
        appearance.axial_tilt,
        &settings.rotation,
        scene,
    );
    let sun = world_sun_direction();

    commands.spawn((
        Name::new("Sun"),
        DirectionalLight::default(),
        Transform::from_translation(Vec3::from_array(SUN_LIGHT_POSITION)).looking_at(Vec3::ZERO, Vec3::Y),
        SceneEntity,
    ));

    let earth_material = earth_materials.add(EarthMaterial {
        uniforms: EarthUniforms {
            sun_direction: local_sun_direction(&poses.earth_world(), sun),
            pollution_level: appearance.level,
            pollution_tint: appearance.earth_tint,
        },
        day: textures.get(TextureRole::EarthDay),
        night: textures.get(TextureRole::EarthNight),
        normal: textures.get(TextureRole::EarthNormal),
        specular: textures.get(TextureRole::EarthSpecular),
        clouds: textures.get(TextureRole::EarthClouds),
    });
    let atmosphere_material = atmosphere_materials.add(AtmosphereMaterial {
        uniforms: AtmosphereUniforms {
            sun_direction: local_sun_direction(&poses.earth_group, sun),
            pollution_level: appearance.level,
            pollution_color: appearance.atmosphere_color,
            rim_power: ATMOSPHERE_RIM_POWER,
        },
    });
    let moon_material = moon_materials.add(MoonMaterial {
        uniforms: MoonUniforms {
            sun_direction: local_sun_direction(&poses.moon_world(), sun),
            night_brightness: MOON_NIGHT_BRIGHTNESS,
        },
        color: textures.get(TextureRole::MoonColor),
        normal: textures.get(TextureRole::MoonNormal),
    });

    let earth_mesh = meshes.add(uv_sphere(scene.earth_radius, scene.sphere_segments, Winding::Outward));
    let atmosphere_mesh = meshes.add(uv_sphere(scene.atmosphere_radius, scene.sphere_segments, Winding::Inward));
    let moon_mesh = meshes.add(uv_sphere(scene.moon_radius, scene.sphere_segments, Winding::Outward));

    commands
        .spawn((
            Name::new("Earth-Moon system"),
            Transform::default(),
            Visibility::default(),
            SceneEntity,
        ))
        .with_children(|system| {
            system
                .spawn((
                    Name::new("Earth group"),
                    pose_transform(poses.earth_group),
                    Visibility::default(),
                    PoseNode::EarthGroup,
                ))
                .with_children(|group| {
                    group.spawn((
                        Name::new("Earth"),
                        Mesh3d(earth_mesh),
                        MeshMaterial3d(earth_material),
                        pose_transform(poses.earth),
                        PoseNode::Earth,
                        Earth,
                    ));
                    group.spawn((
                        Name::new("Atmosphere"),
                        Mesh3d(atmosphere_mesh),
                        MeshMaterial3d(atmosphere_material),
                        Transform::default(),
                        Atmosphere,
                    ));
                });

            system
                .spawn((
                    Name::new("Moon orbit"),
                    pose_transform(poses.moon_orbit),
                    Visibility::default(),
                    PoseNode::MoonOrbit,
                ))
                .with_children(|orbit| {
                    orbit.spawn((
                        Name::new("Moon"),
                        Mesh3d(moon_mesh),
                        MeshMaterial3d(moon_material),
                        pose_transform(poses.moon),
                        PoseNode::Moon,
                        Moon,
                    ));
                });
        });

    let stars = generate_stars(scene);
    commands.spawn((
        Name::new("Starfield"),
        Mesh3d(meshes.add(star_points(&stars))),
        MeshMaterial3d(star_materials.add(StarfieldMaterial::default())),
        Transform::default(),
        Starfield,
        SceneEntity,
    ));

    info!("Scene built with {} stars", stars.len());
    commands.insert_resource(HandshakeTimer(Timer::from_seconds(
        settings.startup.handshake_delay_secs,
        TimerMode::Once,
    )));
    Ok(())
}
