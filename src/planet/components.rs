use bevy::prelude::*;

/// Root of everything the session spawned; teardown walks these.
#[derive(Component)]
pub struct SceneEntity;

/// Node of the Earth-Moon hierarchy whose local transform is rewritten every frame.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoseNode {
    /// Tilted group holding Earth and its atmosphere; shakes during instability
    EarthGroup,
    Earth,
    MoonOrbit,
    Moon,
}

#[derive(Component)]
pub struct Earth;

#[derive(Component)]
pub struct Atmosphere;

#[derive(Component)]
pub struct Moon;

#[derive(Component)]
pub struct Starfield;
