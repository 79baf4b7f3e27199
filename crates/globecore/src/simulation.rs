//! Engine-independent state of one globe session.
//!
//! The render layer owns entities and GPU resources; everything that decides *what* they should
//! look like on a given frame lives here so it can be driven from tests without a window.

use crate::appearance::{Appearance, AppearanceMode, AppearanceRules};
use crate::config::GlobeConfig;
use crate::constants::DESTRUCTION_MESSAGE;
use crate::destruction::{DestructionSequence, DestructionTick, shake_offset};
use crate::lifecycle::{LifecycleError, SessionLifecycle};
use crate::orbit::{BodyPoses, OrbitalState, local_sun_direction, world_sun_direction};
use crate::source::PollutionSource;
use crate::tier::PollutionLevel;
use crate::viewport::{Viewport, compute_viewport};
use glam::Vec3;

#[derive(Debug, Clone, PartialEq)]
pub enum SimulationEvent {
    PollutionChanged(PollutionLevel),
    Alert(String),
}

/// Values written into the Earth and atmosphere uniform blocks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceUniforms {
    pub earth_tint: Vec3,
    pub atmosphere_color: Vec3,
    pub level: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FrameReport {
    pub poses: BodyPoses,
    pub earth_sun: Vec3,
    pub atmosphere_sun: Vec3,
    pub moon_sun: Vec3,
    pub surface: SurfaceUniforms,
    /// Seconds fed to the starfield blink
    pub star_time: f32,
    pub destruction_progress: Option<f32>,
    pub events: Vec<SimulationEvent>,
}

#[derive(Debug, Clone)]
pub struct GlobeSimulation {
    config: GlobeConfig,
    rules: AppearanceRules,
    lifecycle: SessionLifecycle,
    pollution: PollutionLevel,
    appearance: Appearance,
    orbit: OrbitalState,
    destruction: DestructionSequence,
    earth_offset: Vec3,
}

impl GlobeSimulation {
    pub fn new(config: GlobeConfig) -> Self {
        let canonical_tilt = config.rotation.earth_tilt();
        let rules = AppearanceRules::new(
            config.appearance.mode,
            canonical_tilt,
            &config.pollution,
            &config.destruction,
        );
        let destruction = DestructionSequence::new(&config.destruction);
        let pollution = PollutionLevel::new(config.pollution.default_level);

        Self {
            config,
            rules,
            lifecycle: SessionLifecycle::Uninitialized,
            pollution,
            appearance: Appearance::baseline(canonical_tilt),
            orbit: OrbitalState::default(),
            destruction,
            earth_offset: Vec3::ZERO,
        }
    }

    pub fn config(&self) -> &GlobeConfig {
        &self.config
    }

    pub fn lifecycle(&self) -> SessionLifecycle {
        self.lifecycle
    }

    pub fn pollution(&self) -> PollutionLevel {
        self.pollution
    }

    pub fn appearance(&self) -> &Appearance {
        &self.appearance
    }

    pub fn orbit(&self) -> &OrbitalState {
        &self.orbit
    }

    pub fn earth_offset(&self) -> Vec3 {
        self.earth_offset
    }

    pub fn is_destructing(&self) -> bool {
        self.destruction.is_running()
    }

    /// Enters `Loading` and applies the stored pollution value. Fails if the session already started.
    pub fn begin_loading(&mut self, source: &dyn PollutionSource, now_ms: f64) -> Result<(), LifecycleError> {
        self.lifecycle.begin_loading()?;
        let level = self.read_level(source);
        self.apply_pollution(level, now_ms);
        Ok(())
    }

    pub fn activate(&mut self) -> Result<(), LifecycleError> {
        self.lifecycle.activate()
    }

    /// Returns true only for the call that performed the teardown transition.
    pub fn dispose(&mut self) -> bool {
        let disposed = self.lifecycle.dispose();
        if disposed {
            log::info!("Globe session disposed");
        }
        disposed
    }

    /// Caches `level`, recomputes the appearance and starts destruction when it crosses the threshold.
    /// Before the session is active the trigger is only recorded; the first frame starts the sequence.
    pub fn apply_pollution(&mut self, level: PollutionLevel, now_ms: f64) -> Appearance {
        if self.lifecycle.is_disposed() {
            return self.appearance;
        }
        self.pollution = level;
        self.appearance = self.rules.apply_pollution(level);
        log::debug!("Pollution {} -> tier {}", level, self.appearance.tier.label());

        if self.appearance.triggers_destruction && self.lifecycle.is_active() {
            self.destruction.start(now_ms);
        }
        self.appearance
    }

    /// Re-reads the source and reapplies when the value moved. Returns the new level on change.
    pub fn poll(&mut self, source: &dyn PollutionSource, now_ms: f64) -> Option<PollutionLevel> {
        if self.lifecycle.is_disposed() {
            return None;
        }
        let level = self.read_level(source);
        if level == self.pollution {
            return None;
        }
        self.apply_pollution(level, now_ms);
        Some(level)
    }

    pub fn resize(&self, width: f32, height: f32, device_pixel_ratio: f32) -> Option<Viewport> {
        if !self.lifecycle.is_active() {
            return None;
        }
        compute_viewport(width, height, device_pixel_ratio)
    }

    /// One step of the animation loop. `None` unless the session is active.
    pub fn advance_frame(&mut self, now_ms: f64, source: &mut dyn PollutionSource) -> Option<FrameReport> {
        if !self.lifecycle.is_active() {
            return None;
        }

        if self.appearance.triggers_destruction && !self.destruction.is_running() {
            self.destruction.start(now_ms);
        }

        let mut events = Vec::new();
        let rotation = self.config.rotation.clone();
        self.orbit.advance(&rotation);

        let mut surface = SurfaceUniforms {
            earth_tint: self.appearance.earth_tint,
            atmosphere_color: self.appearance.atmosphere_color,
            level: self.appearance.level,
        };
        let mut destruction_progress = None;

        match self.destruction.tick(now_ms, rotation.earth_speed) {
            DestructionTick::Running(frame) => {
                self.orbit.spin_earth(frame.extra_spin);
                self.earth_offset = frame.shake.extend(0.0);
                surface.earth_tint = frame.earth_tint;
                surface.atmosphere_color = frame.atmosphere_color;
                destruction_progress = Some(frame.progress);
            }
            DestructionTick::Completed => {
                events.push(SimulationEvent::Alert(DESTRUCTION_MESSAGE.to_string()));

                let reset = PollutionLevel::new(self.config.destruction.reset_level);
                source.write(reset.value());
                self.apply_pollution(reset, now_ms);
                self.earth_offset = Vec3::ZERO;
                events.push(SimulationEvent::PollutionChanged(reset));

                surface = SurfaceUniforms {
                    earth_tint: self.appearance.earth_tint,
                    atmosphere_color: self.appearance.atmosphere_color,
                    level: self.appearance.level,
                };
            }
            DestructionTick::Idle => {
                self.earth_offset = self.tremor(now_ms);
            }
        }

        let poses = BodyPoses::compute(
            &self.orbit,
            self.earth_offset,
            self.appearance.axial_tilt,
            &rotation,
            &self.config.scene,
        );
        let sun = world_sun_direction();

        Some(FrameReport {
            earth_sun: local_sun_direction(&poses.earth_world(), sun),
            atmosphere_sun: local_sun_direction(&poses.earth_group, sun),
            moon_sun: local_sun_direction(&poses.moon_world(), sun),
            poses,
            surface,
            star_time: (now_ms * 0.001) as f32,
            destruction_progress,
            events,
        })
    }

    fn tremor(&self, now_ms: f64) -> Vec3 {
        let value = self.pollution.value();
        let threshold = self.config.pollution.instability_threshold;
        if self.rules.mode == AppearanceMode::Baseline || value < threshold {
            return Vec3::ZERO;
        }
        shake_offset(now_ms, (value - threshold) * self.config.pollution.tremor_slope).extend(0.0)
    }

    fn read_level(&self, source: &dyn PollutionSource) -> PollutionLevel {
        PollutionLevel::parse_or(source.read().as_deref(), self.config.pollution.default_level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::MemoryPollutionSource;
    use crate::tier::PollutionTier;

    fn active(source: &MemoryPollutionSource) -> GlobeSimulation {
        let mut simulation = GlobeSimulation::new(GlobeConfig::default());
        simulation.begin_loading(source, 0.0).unwrap();
        simulation.activate().unwrap();
        simulation
    }

    #[test]
    fn test_missing_value_defaults_to_fifty() {
        let source = MemoryPollutionSource::default();
        let simulation = active(&source);
        assert_eq!(simulation.pollution().value(), 50.0);
        assert_eq!(simulation.appearance().tier, PollutionTier::Warning);
    }

    #[test]
    fn test_poll_reports_only_changes() {
        let mut source = MemoryPollutionSource::with_value(20.0);
        let mut simulation = active(&source);

        assert_eq!(simulation.poll(&source, 10.0), None);
        source.write(75.0);
        assert_eq!(simulation.poll(&source, 20.0), Some(PollutionLevel::new(75.0)));
        assert_eq!(simulation.appearance().tier, PollutionTier::High);
        assert_eq!(simulation.poll(&source, 30.0), None);
    }

    #[test]
    fn test_frames_are_noops_before_active() {
        let mut source = MemoryPollutionSource::default();
        let mut simulation = GlobeSimulation::new(GlobeConfig::default());
        assert!(simulation.advance_frame(0.0, &mut source).is_none());
        assert!(simulation.resize(800.0, 600.0, 1.0).is_none());
    }

    #[test]
    fn test_tremor_above_instability() {
        let mut source = MemoryPollutionSource::with_value(95.0);
        let mut simulation = active(&source);
        simulation.advance_frame(1234.0, &mut source).unwrap();
        assert!((simulation.earth_offset().length() - 0.01).abs() < 1e-5);

        source.write(60.0);
        simulation.poll(&source, 1300.0);
        simulation.advance_frame(1300.0, &mut source).unwrap();
        assert_eq!(simulation.earth_offset(), Vec3::ZERO);
    }

    #[test]
    fn test_destruction_overrides_surface_colors() {
        let mut source = MemoryPollutionSource::with_value(100.0);
        let mut simulation = active(&source);
        simulation.advance_frame(1000.0, &mut source).unwrap();
        let report = simulation.advance_frame(3500.0, &mut source).unwrap();
        assert!(simulation.is_destructing());
        assert!(report.destruction_progress.is_some());
        assert!(report.surface.earth_tint.abs_diff_eq(Vec3::new(0.8, 0.2, 0.15), 1e-5));
    }

    #[test]
    fn test_destruction_waits_for_first_active_frame() {
        let mut source = MemoryPollutionSource::with_value(100.0);
        let mut simulation = GlobeSimulation::new(GlobeConfig::default());
        simulation.begin_loading(&source, 0.0).unwrap();
        assert!(!simulation.is_destructing());
        simulation.activate().unwrap();

        let report = simulation.advance_frame(6000.0, &mut source).unwrap();
        assert!(simulation.is_destructing());
        assert_eq!(report.destruction_progress, Some(0.0));
        assert!(report.events.is_empty());
        assert_eq!(source.read().as_deref(), Some("100"));
    }

    #[test]
    fn test_unparseable_stored_value_falls_back_to_default() {
        let mut source = MemoryPollutionSource::new(Some("85"));
        let mut simulation = active(&source);
        assert_eq!(simulation.pollution().value(), 85.0);

        source.set_raw(Some("not a number"));
        assert_eq!(simulation.poll(&source, 2000.0), Some(PollutionLevel::new(50.0)));
        assert_eq!(simulation.appearance().tier, PollutionTier::Warning);

        source.set_raw(None);
        assert_eq!(simulation.poll(&source, 4000.0), None);
    }

    #[test]
    fn test_baseline_never_destructs() {
        let mut config = GlobeConfig::default();
        config.appearance.mode = AppearanceMode::Baseline;
        let mut source = MemoryPollutionSource::with_value(100.0);
        let mut simulation = GlobeSimulation::new(config);
        simulation.begin_loading(&source, 0.0).unwrap();
        simulation.activate().unwrap();

        let report = simulation.advance_frame(100.0, &mut source).unwrap();
        assert!(!simulation.is_destructing());
        assert_eq!(report.surface.level, 0.0);
        assert_eq!(simulation.earth_offset(), Vec3::ZERO);
    }
}
