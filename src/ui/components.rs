use bevy::prelude::*;
use std::collections::VecDeque;

/// Root of the loading overlay.
#[derive(Component)]
pub struct LoadingScreen;

#[derive(Component)]
pub struct LoadingLabel;

/// Bar that fills as textures resolve.
#[derive(Component)]
pub struct LoadingProgress;

/// Alerts waiting to be acknowledged, oldest first.
#[derive(Resource, Debug, Default)]
pub struct AlertQueue(pub VecDeque<String>);

/// Value edited by the debug pollution panel.
#[cfg(debug_assertions)]
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct PollutionPanel {
    pub value: f32,
}
