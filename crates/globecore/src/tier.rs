use crate::constants::{DEFAULT_POLLUTION, POLLUTION_MAX, POLLUTION_MIN};
use glam::Vec3;
use std::fmt;

/// Pollution reading, always within [0, 100].
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct PollutionLevel(f32);

impl PollutionLevel {
    pub const DEFAULT: Self = Self(DEFAULT_POLLUTION);

    pub fn new(value: f32) -> Self {
        if value.is_nan() {
            return Self::DEFAULT;
        }
        Self(value.clamp(POLLUTION_MIN, POLLUTION_MAX))
    }

    /// Interprets a raw stored value; absent, unparseable or non-finite input becomes `fallback`.
    pub fn parse_or(raw: Option<&str>, fallback: f32) -> Self {
        raw.and_then(|text| text.trim().parse::<f32>().ok())
            .filter(|value| value.is_finite())
            .map(Self::new)
            .unwrap_or_else(|| Self::new(fallback))
    }

    pub fn parse(raw: Option<&str>) -> Self {
        Self::parse_or(raw, DEFAULT_POLLUTION)
    }

    pub fn value(self) -> f32 {
        self.0
    }

    /// Level mapped into [0, 1] for shader consumption
    pub fn normalized(self) -> f32 {
        self.0 / POLLUTION_MAX
    }

    pub fn tier(self) -> PollutionTier {
        select_tier(self.0)
    }
}

impl Default for PollutionLevel {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for PollutionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PollutionTier {
    Normal,
    Warning,
    Moderate,
    High,
    Critical,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TierAppearance {
    pub max: f32,
    pub atmosphere_color: Vec3,
    pub earth_tint: Vec3,
}

const NORMAL: TierAppearance = TierAppearance {
    max: 30.0,
    atmosphere_color: Vec3::new(0.4, 0.7, 1.0),
    earth_tint: Vec3::new(1.0, 1.0, 1.0),
};

const WARNING: TierAppearance = TierAppearance {
    max: 50.0,
    atmosphere_color: Vec3::new(0.5, 0.6, 0.8),
    earth_tint: Vec3::new(1.0, 0.95, 0.9),
};

const MODERATE: TierAppearance = TierAppearance {
    max: 70.0,
    atmosphere_color: Vec3::new(0.6, 0.5, 0.4),
    earth_tint: Vec3::new(0.9, 0.8, 0.7),
};

const HIGH: TierAppearance = TierAppearance {
    max: 90.0,
    atmosphere_color: Vec3::new(0.7, 0.4, 0.3),
    earth_tint: Vec3::new(0.8, 0.6, 0.5),
};

const CRITICAL: TierAppearance = TierAppearance {
    max: 100.0,
    atmosphere_color: Vec3::new(0.8, 0.3, 0.2),
    earth_tint: Vec3::new(0.6, 0.4, 0.3),
};

impl PollutionTier {
    /// All tiers in ascending order of severity
    pub const ALL: [PollutionTier; 5] = [
        PollutionTier::Normal,
        PollutionTier::Warning,
        PollutionTier::Moderate,
        PollutionTier::High,
        PollutionTier::Critical,
    ];

    pub fn appearance(self) -> &'static TierAppearance {
        match self {
            PollutionTier::Normal => &NORMAL,
            PollutionTier::Warning => &WARNING,
            PollutionTier::Moderate => &MODERATE,
            PollutionTier::High => &HIGH,
            PollutionTier::Critical => &CRITICAL,
        }
    }

    pub fn upper_bound(self) -> f32 {
        self.appearance().max
    }

    pub fn label(self) -> &'static str {
        match self {
            PollutionTier::Normal => "NORMAL",
            PollutionTier::Warning => "WARNING",
            PollutionTier::Moderate => "MODERATE",
            PollutionTier::High => "HIGH",
            PollutionTier::Critical => "CRITICAL",
        }
    }
}

/// Smallest tier whose upper bound is >= `value`; anything above 90 is critical.
pub fn select_tier(value: f32) -> PollutionTier {
    PollutionTier::ALL
        .into_iter()
        .find(|&tier| value <= tier.upper_bound())
        .unwrap_or(PollutionTier::Critical)
}
