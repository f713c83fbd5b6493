//! Timing profiles for the spin animation and balance rollup

use serde::{Deserialize, Serialize};

/// Timing profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimingProfile {
    /// Reference cadence
    #[default]
    Normal,
    /// Fast mode
    Turbo,
    /// Instant (batch simulation, tests)
    Studio,
}

impl TimingProfile {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Turbo => "turbo",
            Self::Studio => "studio",
        }
    }
}

impl std::str::FromStr for TimingProfile {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "normal" => Ok(Self::Normal),
            "turbo" => Ok(Self::Turbo),
            "studio" => Ok(Self::Studio),
            other => Err(format!("unknown timing profile '{other}'")),
        }
    }
}

/// Detailed timing configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimingConfig {
    /// Profile type
    pub profile: TimingProfile,

    /// Interval between transient reel frames (ms)
    pub frame_interval_ms: u64,

    /// Frames per spin; the last one carries the settled grid
    pub spin_frames: u32,

    /// Display-balance smoothing duration (ms)
    pub balance_rollup_ms: u64,

    /// Minimum spacing between emitted rollup samples (ms)
    pub rollup_tick_ms: u64,
}

impl TimingConfig {
    /// Reference timing: 30 frames × 50 ms, 1.5 s balance smoothing
    pub fn normal() -> Self {
        Self {
            profile: TimingProfile::Normal,
            frame_interval_ms: 50,
            spin_frames: 30,
            balance_rollup_ms: 1500,
            rollup_tick_ms: 100,
        }
    }

    /// Fast mode
    pub fn turbo() -> Self {
        Self {
            profile: TimingProfile::Turbo,
            frame_interval_ms: 25,
            spin_frames: 12,
            balance_rollup_ms: 500,
            rollup_tick_ms: 50,
        }
    }

    /// Instant resolution
    pub fn studio() -> Self {
        Self {
            profile: TimingProfile::Studio,
            frame_interval_ms: 0,
            spin_frames: 1,
            balance_rollup_ms: 0,
            rollup_tick_ms: 0,
        }
    }

    /// Get config for profile
    pub fn from_profile(profile: TimingProfile) -> Self {
        match profile {
            TimingProfile::Normal => Self::normal(),
            TimingProfile::Turbo => Self::turbo(),
            TimingProfile::Studio => Self::studio(),
        }
    }

    /// Time from spin acceptance to resolution
    pub fn spin_duration_ms(&self) -> u64 {
        self.frame_interval_ms.saturating_mul(self.spin_frames as u64)
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self::normal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profiles() {
        assert_eq!(TimingConfig::normal().spin_duration_ms(), 1500);
        assert!(TimingConfig::turbo().spin_duration_ms() < TimingConfig::normal().spin_duration_ms());
        assert_eq!(TimingConfig::studio().spin_duration_ms(), 0);
        assert_eq!(
            TimingConfig::from_profile(TimingProfile::Turbo),
            TimingConfig::turbo()
        );
    }

    #[test]
    fn test_profile_parse() {
        assert_eq!("Studio".parse::<TimingProfile>(), Ok(TimingProfile::Studio));
        assert!("slow".parse::<TimingProfile>().is_err());
        assert_eq!(TimingProfile::default().name(), "normal");
    }
}
