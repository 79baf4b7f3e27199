use crate::config::{DestructionConfig, PollutionConfig};
use crate::tier::{PollutionLevel, PollutionTier};
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Which Earth the session renders.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppearanceMode {
    /// Pollution tiers drive tint, atmosphere, tilt and destruction
    #[default]
    Tiered,
    /// Clean Earth regardless of the pollution signal
    Baseline,
}

/// Uniform values and axial tilt derived from one pollution reading.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Appearance {
    pub tier: PollutionTier,
    pub earth_tint: Vec3,
    pub atmosphere_color: Vec3,
    /// Normalized level shared by the Earth and atmosphere shaders
    pub level: f32,
    pub axial_tilt: f32,
    pub triggers_destruction: bool,
}

impl Appearance {
    pub fn baseline(canonical_tilt: f32) -> Self {
        let look = PollutionTier::Normal.appearance();
        Self {
            tier: PollutionTier::Normal,
            earth_tint: look.earth_tint,
            atmosphere_color: look.atmosphere_color,
            level: 0.0,
            axial_tilt: canonical_tilt,
            triggers_destruction: false,
        }
    }
}

/// Everything `apply_pollution` needs besides the reading itself.
#[derive(Debug, Clone, PartialEq)]
pub struct AppearanceRules {
    pub mode: AppearanceMode,
    pub canonical_tilt: f32,
    pub instability_threshold: f32,
    pub tilt_slope: f32,
    pub destruction_threshold: f32,
}

impl AppearanceRules {
    pub fn new(
        mode: AppearanceMode,
        canonical_tilt: f32,
        pollution: &PollutionConfig,
        destruction: &DestructionConfig,
    ) -> Self {
        Self {
            mode,
            canonical_tilt,
            instability_threshold: pollution.instability_threshold,
            tilt_slope: pollution.tilt_slope,
            destruction_threshold: destruction.threshold,
        }
    }

    /// Pure mapping from a reading to shader parameters; repeated calls give identical output.
    pub fn apply_pollution(&self, level: PollutionLevel) -> Appearance {
        if self.mode == AppearanceMode::Baseline {
            return Appearance::baseline(self.canonical_tilt);
        }

        let value = level.value();
        let tier = level.tier();
        let look = tier.appearance();

        let axial_tilt = if value > self.instability_threshold {
            self.canonical_tilt + (value - self.instability_threshold) * self.tilt_slope
        } else {
            self.canonical_tilt
        };

        Appearance {
            tier,
            earth_tint: look.earth_tint,
            atmosphere_color: look.atmosphere_color,
            level: level.normalized(),
            axial_tilt,
            triggers_destruction: value >= self.destruction_threshold,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DestructionConfig, PollutionConfig};
    use rstest::rstest;

    fn rules(mode: AppearanceMode) -> AppearanceRules {
        AppearanceRules::new(
            mode,
            23.5_f32.to_radians(),
            &PollutionConfig::default(),
            &DestructionConfig::default(),
        )
    }

    #[rstest]
    #[case(25.0, PollutionTier::Normal)]
    #[case(45.0, PollutionTier::Warning)]
    #[case(65.0, PollutionTier::Moderate)]
    #[case(85.0, PollutionTier::High)]
    #[case(95.0, PollutionTier::Critical)]
    fn test_uniforms_follow_tier(#[case] value: f32, #[case] tier: PollutionTier) {
        let appearance = rules(AppearanceMode::Tiered).apply_pollution(PollutionLevel::new(value));

        assert_eq!(appearance.tier, tier);
        assert_eq!(appearance.earth_tint, tier.appearance().earth_tint);
        assert_eq!(appearance.atmosphere_color, tier.appearance().atmosphere_color);
        assert!((appearance.level - value / 100.0).abs() < 1e-6);
    }

    #[test]
    fn test_apply_is_idempotent() {
        let rules = rules(AppearanceMode::Tiered);
        let level = PollutionLevel::new(73.0);
        assert_eq!(rules.apply_pollution(level), rules.apply_pollution(level));
    }

    #[rstest]
    #[case(50.0, 0.0)]
    #[case(90.0, 0.0)]
    #[case(95.0, 0.05)]
    #[case(100.0, 0.1)]
    fn test_extra_tilt_above_ninety(#[case] value: f32, #[case] extra: f32) {
        let rules = rules(AppearanceMode::Tiered);
        let appearance = rules.apply_pollution(PollutionLevel::new(value));
        assert!((appearance.axial_tilt - (rules.canonical_tilt + extra)).abs() < 1e-5);
    }

    #[rstest]
    #[case(99.4, false)]
    #[case(99.5, true)]
    #[case(100.0, true)]
    fn test_destruction_trigger(#[case] value: f32, #[case] triggers: bool) {
        let appearance = rules(AppearanceMode::Tiered).apply_pollution(PollutionLevel::new(value));
        assert_eq!(appearance.triggers_destruction, triggers);
    }

    #[test]
    fn test_baseline_ignores_pollution() {
        let rules = rules(AppearanceMode::Baseline);
        let appearance = rules.apply_pollution(PollutionLevel::new(100.0));

        assert_eq!(appearance.tier, PollutionTier::Normal);
        assert_eq!(appearance.level, 0.0);
        assert_eq!(appearance.axial_tilt, rules.canonical_tilt);
        assert!(!appearance.triggers_destruction);
    }
}
