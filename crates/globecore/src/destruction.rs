use crate::config::DestructionConfig;
use glam::{Vec2, Vec3};

/// Shake offset shared by the destruction sequence and the instability tremor.
pub fn shake_offset(now_ms: f64, amplitude: f32) -> Vec2 {
    let phase = now_ms * crate::constants::SHAKE_FREQUENCY;
    Vec2::new(phase.sin() as f32 * amplitude, phase.cos() as f32 * amplitude)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DestructionFrame {
    pub progress: f32,
    pub shake: Vec2,
    /// Added to Earth's spin on top of the normal per-frame step
    pub extra_spin: f32,
    pub earth_tint: Vec3,
    pub atmosphere_color: Vec3,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DestructionTick {
    Idle,
    Running(DestructionFrame),
    /// The sequence ended on this tick and the caller must run the recovery steps
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
enum Phase {
    #[default]
    Idle,
    Running {
        start_ms: f64,
    },
}

/// One-shot sequence: idle, running for a fixed window, then idle again.
#[derive(Debug, Clone, PartialEq)]
pub struct DestructionSequence {
    phase: Phase,
    duration_ms: f64,
    shake_base: f32,
    shake_growth: f32,
    spin_boost: f32,
}

impl Default for DestructionSequence {
    fn default() -> Self {
        Self::new(&DestructionConfig::default())
    }
}

impl DestructionSequence {
    pub fn new(config: &DestructionConfig) -> Self {
        Self {
            phase: Phase::Idle,
            duration_ms: config.duration_ms.max(1.0),
            shake_base: config.shake_base,
            shake_growth: config.shake_growth,
            spin_boost: config.spin_boost,
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self.phase, Phase::Running { .. })
    }

    /// Starts the sequence; returns false when one is already live.
    pub fn start(&mut self, now_ms: f64) -> bool {
        if self.is_running() {
            return false;
        }
        log::info!("Destruction sequence started");
        self.phase = Phase::Running { start_ms: now_ms };
        true
    }

    pub fn progress(&self, now_ms: f64) -> Option<f32> {
        match self.phase {
            Phase::Idle => None,
            Phase::Running { start_ms } => Some(((now_ms - start_ms) / self.duration_ms).max(0.0) as f32),
        }
    }

    pub fn tick(&mut self, now_ms: f64, base_spin: f32) -> DestructionTick {
        let Some(progress) = self.progress(now_ms) else {
            return DestructionTick::Idle;
        };

        if progress >= 1.0 {
            self.phase = Phase::Idle;
            log::info!("Destruction sequence finished");
            return DestructionTick::Completed;
        }

        let amplitude = self.shake_base + self.shake_growth * progress;
        DestructionTick::Running(DestructionFrame {
            progress,
            shake: shake_offset(now_ms, amplitude),
            extra_spin: base_spin * self.spin_boost * progress,
            earth_tint: Vec3::new(1.0 - 0.4 * progress, 0.4 - 0.4 * progress, 0.3 - 0.3 * progress),
            atmosphere_color: Vec3::new(0.8 + 0.2 * progress, 0.3 - 0.2 * progress, 0.2 - 0.2 * progress),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_start_is_one_shot() {
        let mut sequence = DestructionSequence::default();
        assert!(sequence.start(0.0));
        assert!(!sequence.start(100.0));
        assert_eq!(sequence.progress(2500.0), Some(0.5));
    }

    #[test]
    fn test_idle_tick_does_nothing() {
        let mut sequence = DestructionSequence::default();
        assert_eq!(sequence.tick(1000.0, 0.001), DestructionTick::Idle);
    }

    #[rstest]
    #[case(0.0, 0.02)]
    #[case(2500.0, 0.07)]
    #[case(4999.0, 0.11998)]
    fn test_shake_amplitude_grows(#[case] elapsed: f64, #[case] amplitude: f32) {
        let mut sequence = DestructionSequence::default();
        sequence.start(1000.0);
        let DestructionTick::Running(frame) = sequence.tick(1000.0 + elapsed, 0.001) else {
            panic!("sequence should be running");
        };
        assert!((frame.shake.length() - amplitude).abs() < 1e-4);
    }

    #[test]
    fn test_colors_and_spin_at_midpoint() {
        let mut sequence = DestructionSequence::default();
        sequence.start(0.0);
        let DestructionTick::Running(frame) = sequence.tick(2500.0, 0.001) else {
            panic!("sequence should be running");
        };
        assert!((frame.extra_spin - 0.0015).abs() < 1e-7);
        assert!(frame.earth_tint.abs_diff_eq(Vec3::new(0.8, 0.2, 0.15), 1e-6));
        assert!(frame.atmosphere_color.abs_diff_eq(Vec3::new(0.9, 0.2, 0.1), 1e-6));
    }

    #[test]
    fn test_completes_and_rearms() {
        let mut sequence = DestructionSequence::default();
        sequence.start(0.0);
        assert_eq!(sequence.tick(5000.0, 0.001), DestructionTick::Completed);
        assert!(!sequence.is_running());
        assert!(sequence.start(6000.0));
    }
}
