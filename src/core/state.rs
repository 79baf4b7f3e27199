use bevy::prelude::States;

/// Mirrors `globecore::SessionLifecycle` so systems can be gated with `in_state`.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Hash, States)]
pub enum SessionState {
    #[default]
    Uninitialized,
    Loading,
    Active,
    Disposed,
}
