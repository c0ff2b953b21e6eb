//! Hobby servo pen lift
//!
//! Drives a standard 50 Hz hobby servo through an `embedded-hal` PWM
//! channel. The pen rides on the servo horn: one fixed angle presses it
//! onto the surface, another lifts it clear. Commands that match the
//! last written angle are suppressed so the coordinator can call
//! `up`/`down` every tick without spamming the PWM peripheral.

use embedded_hal::pwm::SetDutyCycle;

use autograph_core::traits::PenActuator;

/// Servo signal geometry and the two pen angles.
#[derive(Debug, Clone, Copy)]
pub struct PenServoConfig {
    /// PWM frame length in microseconds (50 Hz hobby standard)
    pub frame_us: u32,
    /// Pulse width at the 90 degree center position
    pub center_us: u32,
    /// Pulse swing per 90 degrees of travel
    pub swing_us: u32,
    /// Horn angle that lifts the pen clear
    pub up_angle_deg: u8,
    /// Horn angle that rests the pen on the surface
    pub down_angle_deg: u8,
}

impl Default for PenServoConfig {
    fn default() -> Self {
        Self {
            frame_us: 20_000,
            center_us: 1500,
            swing_us: 500,
            up_angle_deg: 120,
            down_angle_deg: 80,
        }
    }
}

/// Servo-driven pen lift.
pub struct PenServo<P> {
    pwm: P,
    config: PenServoConfig,
    /// Last commanded angle; `None` until `begin` writes the first one
    angle_deg: Option<u8>,
}

impl<P: SetDutyCycle> PenServo<P> {
    /// Create a pen lift; no signal is emitted until [`Self::begin`]
    pub fn new(pwm: P, config: PenServoConfig) -> Self {
        Self {
            pwm,
            config,
            angle_deg: None,
        }
    }

    /// Start driving the servo, raised
    pub fn begin(&mut self) -> Result<(), P::Error> {
        self.angle_deg = Some(self.config.up_angle_deg);
        self.write_angle(self.config.up_angle_deg)
    }

    /// Last commanded horn angle in degrees
    pub fn angle_deg(&self) -> Option<u8> {
        self.angle_deg
    }

    fn write_angle(&mut self, degrees: u8) -> Result<(), P::Error> {
        let degrees = degrees.min(180) as i32;
        let pulse_us = self.config.center_us as i32
            + (degrees - 90) * self.config.swing_us as i32 / 90;

        let max_duty = self.pwm.max_duty_cycle() as u32;
        let duty = (pulse_us as u32).saturating_mul(max_duty) / self.config.frame_us;
        self.pwm.set_duty_cycle(duty.min(max_duty) as u16)
    }

    fn command_angle(&mut self, degrees: u8) {
        if self.angle_deg == Some(degrees) {
            return;
        }
        self.angle_deg = Some(degrees);
        // The pen lift is fire-and-forget; a PWM write error is not
        // observable by the motion core.
        let _ = self.write_angle(degrees);
    }
}

impl<P: SetDutyCycle> PenActuator for PenServo<P> {
    fn up(&mut self) {
        let angle = self.config.up_angle_deg;
        self.command_angle(angle);
    }

    fn down(&mut self) {
        let angle = self.config.down_angle_deg;
        self.command_angle(angle);
    }

    fn is_up(&self) -> bool {
        let midpoint = (self.config.up_angle_deg as u16 + self.config.down_angle_deg as u16) / 2;
        self.angle_deg
            .map_or(false, |angle| angle as u16 >= midpoint)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;
    use std::vec::Vec;

    struct MockPwm {
        max_duty: u16,
        writes: Vec<u16>,
    }

    impl MockPwm {
        fn new(max_duty: u16) -> Self {
            Self {
                max_duty,
                writes: Vec::new(),
            }
        }
    }

    impl embedded_hal::pwm::ErrorType for MockPwm {
        type Error = Infallible;
    }

    impl SetDutyCycle for MockPwm {
        fn max_duty_cycle(&self) -> u16 {
            self.max_duty
        }

        fn set_duty_cycle(&mut self, duty: u16) -> Result<(), Self::Error> {
            self.writes.push(duty);
            Ok(())
        }
    }

    /// 1 MHz counter over a 20 ms frame: duty units are microseconds
    fn servo_us() -> PenServo<MockPwm> {
        PenServo::new(MockPwm::new(20_000), PenServoConfig::default())
    }

    #[test]
    fn test_begin_raises_pen() {
        let mut servo = servo_us();
        servo.begin().unwrap();

        assert!(servo.is_up());
        // 120 degrees -> 1500 + 30 * 500 / 90 = 1666 us
        assert_eq!(servo.pwm.writes, std::vec![1666]);
    }

    #[test]
    fn test_down_writes_down_pulse() {
        let mut servo = servo_us();
        servo.begin().unwrap();
        servo.down();

        assert!(!servo.is_up());
        // 80 degrees -> 1500 - 10 * 500 / 90 = 1445 us
        assert_eq!(servo.pwm.writes, std::vec![1666, 1445]);
    }

    #[test]
    fn test_redundant_commands_are_suppressed() {
        let mut servo = servo_us();
        servo.begin().unwrap();

        servo.up();
        servo.up();
        servo.down();
        servo.down();
        servo.up();

        assert_eq!(servo.pwm.writes, std::vec![1666, 1445, 1666]);
    }

    #[test]
    fn test_duty_scales_with_resolution() {
        // Coarse 100-count resolution
        let mut servo = PenServo::new(MockPwm::new(100), PenServoConfig::default());
        servo.begin().unwrap();
        // 1666 us / 20000 us * 100 = 8
        assert_eq!(servo.pwm.writes, std::vec![8]);
    }

    #[test]
    fn test_not_up_before_begin() {
        let servo = servo_us();
        assert!(!servo.is_up());
    }
}
