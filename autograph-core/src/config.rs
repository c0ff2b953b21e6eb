//! Configuration types
//!
//! Board-agnostic configuration structures for the arm geometry and the
//! per-axis velocity profile. Values are fixed at build time; there is
//! no runtime persistence.

/// Arm geometry and homing behavior, in axis-local step counts.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ArmConfig {
    /// Usable travel of each axis between its limit switches
    pub arm_range: i32,
    /// Relative increment issued per tick while seeking/retreating
    pub homing_step: i32,
    /// Distance to back off a limit switch before the next homing phase
    pub retreat_offset: i32,
    /// "At target" window for the draw-phase settle check
    pub target_tolerance: i32,
}

impl Default for ArmConfig {
    fn default() -> Self {
        Self {
            arm_range: 1000,
            homing_step: 4,
            retreat_offset: 50,
            target_tolerance: 5,
        }
    }
}

impl ArmConfig {
    /// Half the arm range; the shared origin sits here after calibration
    pub fn half_range(&self) -> i32 {
        self.arm_range / 2
    }
}

/// Trapezoidal velocity profile for one axis.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SpeedProfile {
    /// Cruise speed in steps per second
    pub max_speed_sps: u32,
    /// Acceleration in steps per second squared
    pub accel_sps2: u32,
}

impl Default for SpeedProfile {
    fn default() -> Self {
        Self {
            max_speed_sps: 400,
            accel_sps2: 200,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arm_config_defaults() {
        let config = ArmConfig::default();

        assert!(config.arm_range > 0);
        assert!(config.homing_step > 0);
        assert!(config.retreat_offset > config.homing_step);
        assert!(config.target_tolerance > 0);
        // Retreat must leave room inside the travel range
        assert!(config.retreat_offset < config.half_range());
    }

    #[test]
    fn test_half_range() {
        let config = ArmConfig {
            arm_range: 1000,
            ..Default::default()
        };
        assert_eq!(config.half_range(), 500);
    }

    #[test]
    fn test_speed_profile_defaults() {
        let profile = SpeedProfile::default();
        assert!(profile.max_speed_sps > 0);
        assert!(profile.accel_sps2 > 0);
    }
}
