use bevy::prelude::*;
use globecore::PollutionLevel;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeOrigin {
    /// Emitted by the globe after polling or a destruction reset
    Engine,
    /// Requested by another system; the globe applies it but never re-emits it
    External,
}

#[derive(Message, Debug, Clone)]
pub struct PollutionChanged {
    pub level: PollutionLevel,
    pub origin: ChangeOrigin,
}

#[derive(Message, Debug, Clone)]
pub struct UserAlert {
    pub message: String,
}
