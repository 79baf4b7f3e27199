use bevy::prelude::*;
use globecore::{GlobeConfig, GlobeSimulation, PollutionSource};

#[derive(Resource, Debug, Clone, Deref)]
pub struct GlobeSettings(pub GlobeConfig);

#[derive(Resource, Debug, Deref, DerefMut)]
pub struct GlobeState(pub GlobeSimulation);

/// The injected persistent pollution value.
#[derive(Resource, Deref, DerefMut)]
pub struct PollutionFeed(pub Box<dyn PollutionSource + Send + Sync>);

#[derive(Resource)]
pub struct PollTimer(pub Timer);

/// Settle delay before talking to the host page.
#[derive(Resource)]
pub struct HandshakeTimer(pub Timer);

#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DisposalReport {
    pub meshes: usize,
    pub materials: usize,
    pub listeners: usize,
}
