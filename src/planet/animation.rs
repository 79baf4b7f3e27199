use crate::planet::components::{Atmosphere, Earth, Moon, PoseNode, Starfield};
use crate::planet::events::{ChangeOrigin, PollutionChanged, UserAlert};
use crate::planet::materials::*;
use crate::planet::now_ms;
use crate::planet::resources::{GlobeState, PollutionFeed};
use bevy::log::info;
use bevy::math::Affine3A;
use bevy::prelude::*;
use globecore::{FrameReport, SimulationEvent};

pub fn pose_transform(pose: Affine3A) -> Transform {
    Transform::from_matrix(Mat4::from(pose))
}

fn node_pose(report: &FrameReport, node: PoseNode) -> Affine3A {
    match node {
        PoseNode::EarthGroup => report.poses.earth_group,
        PoseNode::Earth => report.poses.earth,
        PoseNode::MoonOrbit => report.poses.moon_orbit,
        PoseNode::Moon => report.poses.moon,
    }
}

/// Per-frame driver: advances the simulation and writes its results into the scene.
pub fn animate_globe(
    time: Res<Time>,
    mut globe: ResMut<GlobeState>,
    mut feed: ResMut<PollutionFeed>,
    mut nodes: Query<(&mut Transform, &PoseNode)>,
    earth_q: Query<&MeshMaterial3d<EarthMaterial>, With<Earth>>,
    atmosphere_q: Query<&MeshMaterial3d<AtmosphereMaterial>, With<Atmosphere>>,
    moon_q: Query<&MeshMaterial3d<MoonMaterial>, With<Moon>>,
    stars_q: Query<&MeshMaterial3d<StarfieldMaterial>, With<Starfield>>,
    mut earth_materials: ResMut<Assets<EarthMaterial>>,
    mut atmosphere_materials: ResMut<Assets<AtmosphereMaterial>>,
    mut moon_materials: ResMut<Assets<MoonMaterial>>,
    mut star_materials: ResMut<Assets<StarfieldMaterial>>,
    mut pollution_changes: MessageWriter<PollutionChanged>,
    mut alerts: MessageWriter<UserAlert>,
) {
    // Call business logic
    let Some(report) = globe.advance_frame(now_ms(&time), feed.0.as_mut()) else {
        return;
    };

    // Apply results to ECS
    for (mut transform, node) in &mut nodes {
        *transform = pose_transform(node_pose(&report, *node));
    }

    for handle in &earth_q {
        if let Some(material) = earth_materials.get_mut(&handle.0) {
            material.uniforms.sun_direction = report.earth_sun;
            material.uniforms.pollution_level = report.surface.level;
            material.uniforms.pollution_tint = report.surface.earth_tint;
        }
    }
    for handle in &atmosphere_q {
        if let Some(material) = atmosphere_materials.get_mut(&handle.0) {
            material.uniforms.sun_direction = report.atmosphere_sun;
            material.uniforms.pollution_level = report.surface.level;
            material.uniforms.pollution_color = report.surface.atmosphere_color;
        }
    }
    for handle in &moon_q {
        if let Some(material) = moon_materials.get_mut(&handle.0) {
            material.uniforms.sun_direction = report.moon_sun;
        }
    }
    for handle in &stars_q {
        if let Some(material) = star_materials.get_mut(&handle.0) {
            material.uniforms.time = report.star_time;
        }
    }

    for event in report.events {
        match event {
            SimulationEvent::PollutionChanged(level) => {
                pollution_changes.write(PollutionChanged {
                    level,
                    origin: ChangeOrigin::Engine,
                });
            }
            SimulationEvent::Alert(message) => {
                info!("{}", message);
                alerts.write(UserAlert { message });
            }
        }
    }
}
