//! Step/dir GPIO pulse driver
//!
//! Clocks an external stepper driver module (A4988, DRV8825, TMC step
//! interface) through two GPIO lines: a level on DIR, a rising edge on
//! STEP. The two arm motors rotate in opposite physical sense, so the
//! DIR polarity is configurable per axis.

use embedded_hal::digital::OutputPin;

use autograph_core::traits::{Direction, StepDriver};

/// Step/dir pin pair for one axis.
pub struct StepDir<S, D> {
    step_pin: S,
    dir_pin: D,
    invert_direction: bool,
    last_direction: Option<Direction>,
}

impl<S: OutputPin, D: OutputPin> StepDir<S, D> {
    /// Create a driver over a step pin and a dir pin.
    ///
    /// `invert_direction` flips which DIR level means `Forward`.
    pub fn new(step_pin: S, dir_pin: D, invert_direction: bool) -> Self {
        Self {
            step_pin,
            dir_pin,
            invert_direction,
            last_direction: None,
        }
    }

    fn dir_level_high(&self, direction: Direction) -> bool {
        (direction == Direction::Forward) != self.invert_direction
    }
}

impl<S: OutputPin, D: OutputPin> StepDriver for StepDir<S, D> {
    fn step(&mut self, direction: Direction) {
        // Pin writes are fire-and-forget here; GPIO on the supported
        // targets is infallible.
        if self.last_direction != Some(direction) {
            let result = if self.dir_level_high(direction) {
                self.dir_pin.set_high()
            } else {
                self.dir_pin.set_low()
            };
            let _ = result;
            self.last_direction = Some(direction);
        }

        // Rising edge clocks the driver; the minimum high time of the
        // supported driver modules is well under one GPIO write.
        let _ = self.step_pin.set_high();
        let _ = self.step_pin.set_low();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::RefCell;
    use core::convert::Infallible;
    use std::rc::Rc;
    use std::vec::Vec;

    /// Pin that records every level written
    #[derive(Clone)]
    struct MockPin {
        levels: Rc<RefCell<Vec<bool>>>,
    }

    impl MockPin {
        fn new() -> Self {
            Self {
                levels: Rc::new(RefCell::new(Vec::new())),
            }
        }

        fn writes(&self) -> Vec<bool> {
            self.levels.borrow().clone()
        }
    }

    impl embedded_hal::digital::ErrorType for MockPin {
        type Error = Infallible;
    }

    impl OutputPin for MockPin {
        fn set_low(&mut self) -> Result<(), Self::Error> {
            self.levels.borrow_mut().push(false);
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Self::Error> {
            self.levels.borrow_mut().push(true);
            Ok(())
        }
    }

    #[test]
    fn test_each_step_pulses_once() {
        let step = MockPin::new();
        let dir = MockPin::new();
        let mut driver = StepDir::new(step.clone(), dir.clone(), false);

        driver.step(Direction::Forward);
        driver.step(Direction::Forward);

        // Two high/low pulse pairs
        assert_eq!(step.writes(), std::vec![true, false, true, false]);
        // DIR written once for the unchanged direction
        assert_eq!(dir.writes(), std::vec![true]);
    }

    #[test]
    fn test_direction_change_rewrites_dir() {
        let step = MockPin::new();
        let dir = MockPin::new();
        let mut driver = StepDir::new(step.clone(), dir.clone(), false);

        driver.step(Direction::Forward);
        driver.step(Direction::Backward);
        driver.step(Direction::Backward);

        assert_eq!(dir.writes(), std::vec![true, false]);
    }

    #[test]
    fn test_inverted_direction_polarity() {
        let step = MockPin::new();
        let dir = MockPin::new();
        let mut driver = StepDir::new(step.clone(), dir.clone(), true);

        driver.step(Direction::Forward);
        assert_eq!(dir.writes(), std::vec![false]);

        driver.step(Direction::Backward);
        assert_eq!(dir.writes(), std::vec![false, true]);
    }
}
