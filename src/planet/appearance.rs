use crate::planet::events::{ChangeOrigin, PollutionChanged};
use crate::planet::now_ms;
use crate::planet::resources::{GlobeState, PollTimer, PollutionFeed};
use bevy::log::info;
use bevy::prelude::*;

/// Applies changes requested by other systems. The engine's own notifications are skipped.
pub fn apply_external_changes(
    time: Res<Time>,
    mut changes: MessageReader<PollutionChanged>,
    mut globe: ResMut<GlobeState>,
) {
    for change in changes.read() {
        if change.origin != ChangeOrigin::External {
            continue;
        }
        let appearance = globe.apply_pollution(change.level, now_ms(&time));
        info!("Pollution set to {} ({})", change.level, appearance.tier.label());
    }
}

/// Re-reads the stored value on every tick of the poll timer.
pub fn poll_pollution(
    time: Res<Time>,
    mut timer: ResMut<PollTimer>,
    feed: Res<PollutionFeed>,
    mut globe: ResMut<GlobeState>,
    mut changes: MessageWriter<PollutionChanged>,
) {
    if !timer.0.tick(time.delta()).just_finished() {
        return;
    }

    if let Some(level) = globe.poll(feed.0.as_ref(), now_ms(&time)) {
        info!("Stored pollution changed to {}", level);
        changes.write(PollutionChanged {
            level,
            origin: ChangeOrigin::Engine,
        });
    }
}
