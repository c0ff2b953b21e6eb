//! Trapezoidal-velocity step generator
//!
//! Ramps a per-axis speed toward a cruise value, tapers inside the
//! braking window, and emits at most one step pulse per polling tick
//! through a [`StepDriver`]. All math is integer fixed-point
//! (milli-steps per second); the caller supplies microsecond
//! timestamps, this module owns no clock and never blocks.

use crate::config::SpeedProfile;
use crate::traits::{Direction, StepDriver};

/// Speed floor while closing on a target, in milli-steps/s.
///
/// Keeps the ramp from collapsing short of the target and bounds the
/// first step interval when starting from rest.
const CRAWL_MSPS: i32 = 20_000;

/// Upper bound on one ramp update, so a scheduling gap cannot produce
/// an unbounded speed jump.
const MAX_DT_US: u64 = 50_000;

/// One axis worth of open-loop step generation.
#[derive(Debug)]
pub struct StepGenerator {
    /// Position in steps, counted from emitted pulses
    position: i32,
    /// Commanded target in steps
    target: i32,
    /// Current signed speed in milli-steps/s
    speed_msps: i32,
    /// Cruise speed in milli-steps/s
    max_speed_msps: i32,
    /// Acceleration in steps/s^2
    accel_sps2: u32,
    /// Timestamp of the previous ramp update
    last_update_us: u64,
    /// Wall time the next pulse is due; 0 when none is scheduled
    next_step_due_us: u64,
    /// First `run` call seen (timestamps before that are meaningless)
    started: bool,
}

impl StepGenerator {
    /// Create a stopped generator at position 0
    pub fn new(profile: SpeedProfile) -> Self {
        Self {
            position: 0,
            target: 0,
            speed_msps: 0,
            max_speed_msps: (profile.max_speed_sps * 1000) as i32,
            accel_sps2: profile.accel_sps2.max(1),
            last_update_us: 0,
            next_step_due_us: 0,
            started: false,
        }
    }

    /// Current position in steps
    pub fn current_position(&self) -> i32 {
        self.position
    }

    /// Commanded target in steps
    pub fn target_position(&self) -> i32 {
        self.target
    }

    /// Steps remaining to the target (signed)
    pub fn distance_to_go(&self) -> i32 {
        self.target - self.position
    }

    /// Sign of pending travel: -1, 0, or 1
    pub fn direction(&self) -> i32 {
        self.distance_to_go().clamp(-1, 1)
    }

    /// Whether motion is pending or the ramp is still unwinding
    pub fn is_running(&self) -> bool {
        self.speed_msps != 0 || self.position != self.target
    }

    /// Command an absolute target
    pub fn move_to(&mut self, target: i32) {
        self.target = target;
    }

    /// Command a target relative to the current position
    pub fn move_by(&mut self, delta: i32) {
        self.target = self.position.saturating_add(delta);
    }

    /// Stop dead: the current position becomes the target
    pub fn halt(&mut self) {
        self.target = self.position;
        self.speed_msps = 0;
        self.next_step_due_us = 0;
    }

    /// Redefine the current physical position as `position`.
    ///
    /// No motion results; any pending target is discarded.
    pub fn set_current_position(&mut self, position: i32) {
        self.position = position;
        self.target = position;
        self.speed_msps = 0;
        self.next_step_due_us = 0;
    }

    /// Advance the generator by one scheduling tick.
    ///
    /// Emits at most one pulse through `driver`. Returns whether motion
    /// is still in progress. Non-blocking; call every loop iteration.
    pub fn run<D: StepDriver>(&mut self, now_us: u64, driver: &mut D) -> bool {
        let dt_us = if self.started {
            now_us.saturating_sub(self.last_update_us).min(MAX_DT_US)
        } else {
            self.started = true;
            0
        };
        self.last_update_us = now_us;

        self.update_speed(dt_us);

        if self.speed_msps == 0 {
            self.next_step_due_us = 0;
            return self.is_running();
        }

        let interval_us = 1_000_000_000 / self.speed_msps.unsigned_abs() as u64;
        if self.next_step_due_us == 0 {
            self.next_step_due_us = now_us + interval_us;
        } else if now_us >= self.next_step_due_us {
            if self.speed_msps > 0 {
                self.position += 1;
                driver.step(Direction::Forward);
            } else {
                self.position -= 1;
                driver.step(Direction::Backward);
            }
            self.next_step_due_us = now_us + interval_us;
        }

        self.is_running()
    }

    /// Steps needed to brake from the current speed to rest
    fn steps_to_stop(&self) -> u32 {
        let v_sps = (self.speed_msps / 1000).unsigned_abs() as u64;
        ((v_sps * v_sps) / (2 * self.accel_sps2 as u64)) as u32
    }

    /// One ramp increment for the elapsed time, in milli-steps/s
    fn ramp_step(&self, dt_us: u64) -> i32 {
        ((self.accel_sps2 as u64 * dt_us) / 1000) as i32
    }

    fn update_speed(&mut self, dt_us: u64) {
        let dist = self.target - self.position;

        if dist == 0 {
            if self.speed_msps.abs() <= CRAWL_MSPS {
                // arrived; collapse the ramp
                self.speed_msps = 0;
            } else {
                // retargeted onto the current position at speed: brake,
                // overshoot, and come back
                let dv = self.ramp_step(dt_us);
                self.speed_msps += if self.speed_msps > 0 { -dv } else { dv };
            }
            return;
        }

        let toward: i32 = if dist > 0 { 1 } else { -1 };
        let moving_toward = self.speed_msps != 0 && (self.speed_msps > 0) == (dist > 0);

        let desired = if moving_toward && self.steps_to_stop() >= dist.unsigned_abs() {
            // inside the braking window: taper, keep closing
            toward * CRAWL_MSPS
        } else {
            toward * self.max_speed_msps
        };

        let dv = self.ramp_step(dt_us);
        if self.speed_msps < desired {
            self.speed_msps = (self.speed_msps + dv).min(desired);
        } else if self.speed_msps > desired {
            self.speed_msps = (self.speed_msps - dv).max(desired);
        }

        // Never creep below the crawl floor; this also covers starting
        // from rest and finishing a direction reversal.
        if self.speed_msps.abs() < CRAWL_MSPS {
            self.speed_msps = toward * CRAWL_MSPS;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default)]
    struct CountingDriver {
        forward: u32,
        backward: u32,
    }

    impl StepDriver for CountingDriver {
        fn step(&mut self, direction: Direction) {
            match direction {
                Direction::Forward => self.forward += 1,
                Direction::Backward => self.backward += 1,
            }
        }
    }

    /// Run with a simulated 1 ms tick until idle or the budget expires
    fn run_until_idle(
        gen: &mut StepGenerator,
        driver: &mut CountingDriver,
        clock_us: &mut u64,
        max_ms: u64,
    ) -> bool {
        for _ in 0..max_ms {
            *clock_us += 1000;
            if !gen.run(*clock_us, driver) {
                return true;
            }
        }
        false
    }

    #[test]
    fn test_starts_stopped() {
        let gen = StepGenerator::new(SpeedProfile::default());
        assert_eq!(gen.current_position(), 0);
        assert_eq!(gen.distance_to_go(), 0);
        assert_eq!(gen.direction(), 0);
        assert!(!gen.is_running());
    }

    #[test]
    fn test_reaches_forward_target() {
        let mut gen = StepGenerator::new(SpeedProfile::default());
        let mut driver = CountingDriver::default();
        let mut clock = 0u64;

        gen.move_to(50);
        assert_eq!(gen.direction(), 1);

        assert!(run_until_idle(&mut gen, &mut driver, &mut clock, 30_000));
        assert_eq!(gen.current_position(), 50);
        assert_eq!(driver.forward, 50);
        assert_eq!(driver.backward, 0);
        assert!(!gen.is_running());
    }

    #[test]
    fn test_reaches_backward_target() {
        let mut gen = StepGenerator::new(SpeedProfile::default());
        let mut driver = CountingDriver::default();
        let mut clock = 0u64;

        gen.move_to(-30);
        assert_eq!(gen.direction(), -1);

        assert!(run_until_idle(&mut gen, &mut driver, &mut clock, 30_000));
        assert_eq!(gen.current_position(), -30);
        assert_eq!(driver.backward, 30);
        assert_eq!(driver.forward, 0);
    }

    #[test]
    fn test_move_by_is_relative_to_position() {
        let mut gen = StepGenerator::new(SpeedProfile::default());
        let mut driver = CountingDriver::default();
        let mut clock = 0u64;

        gen.move_to(10);
        assert!(run_until_idle(&mut gen, &mut driver, &mut clock, 30_000));

        gen.move_by(-4);
        assert_eq!(gen.target_position(), 6);
        assert!(run_until_idle(&mut gen, &mut driver, &mut clock, 30_000));
        assert_eq!(gen.current_position(), 6);
    }

    #[test]
    fn test_halt_freezes_position() {
        let mut gen = StepGenerator::new(SpeedProfile::default());
        let mut driver = CountingDriver::default();
        let mut clock = 0u64;

        gen.move_to(1000);
        for _ in 0..500 {
            clock += 1000;
            gen.run(clock, &mut driver);
        }
        let moved = gen.current_position();
        assert!(moved > 0, "no progress before halt");

        gen.halt();
        assert!(!gen.is_running());
        assert_eq!(gen.target_position(), moved);

        let before = driver.forward;
        for _ in 0..500 {
            clock += 1000;
            gen.run(clock, &mut driver);
        }
        assert_eq!(gen.current_position(), moved);
        assert_eq!(driver.forward, before);
    }

    #[test]
    fn test_set_current_position_redefines_frame() {
        let mut gen = StepGenerator::new(SpeedProfile::default());
        let mut driver = CountingDriver::default();
        let mut clock = 0u64;

        gen.move_to(20);
        assert!(run_until_idle(&mut gen, &mut driver, &mut clock, 30_000));

        gen.set_current_position(-7);
        assert_eq!(gen.current_position(), -7);
        assert_eq!(gen.target_position(), -7);
        assert!(!gen.is_running());
    }

    #[test]
    fn test_retarget_reverses() {
        let mut gen = StepGenerator::new(SpeedProfile::default());
        let mut driver = CountingDriver::default();
        let mut clock = 0u64;

        gen.move_to(40);
        assert!(run_until_idle(&mut gen, &mut driver, &mut clock, 30_000));

        gen.move_to(-40);
        assert!(run_until_idle(&mut gen, &mut driver, &mut clock, 60_000));
        assert_eq!(gen.current_position(), -40);
    }

    #[test]
    fn test_position_counts_match_pulses() {
        let mut gen = StepGenerator::new(SpeedProfile {
            max_speed_sps: 800,
            accel_sps2: 1600,
        });
        let mut driver = CountingDriver::default();
        let mut clock = 0u64;

        gen.move_to(120);
        assert!(run_until_idle(&mut gen, &mut driver, &mut clock, 30_000));
        gen.move_to(90);
        assert!(run_until_idle(&mut gen, &mut driver, &mut clock, 30_000));

        assert_eq!(gen.current_position(), 90);
        assert_eq!(driver.forward as i32 - driver.backward as i32, 90);
    }
}
