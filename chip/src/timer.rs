use crate::definitions::{timer, Config};

pub trait Timed {
    /// Will create a new timer with the given value.
    fn new(value: u8) -> Self;

    /// Will set the value from which the timer shall count down from.
    fn set_value(&mut self, value: u8);

    /// Will get the value that the counter is currently at.
    fn get_value(&self) -> u8;

    /// Will count down by a single step, never below zero.
    fn tick(&mut self);
}

/// Represents a timer inside of the chip
/// infrastruture, it will count down to
/// zero from what ever number it was given.
///
/// The timer has no clock of its own, the [`Pacer`](Pacer) decides
/// when a tick happens.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Timer {
    value: u8,
}

impl Timed for Timer {
    fn new(value: u8) -> Self {
        Self { value }
    }

    fn set_value(&mut self, value: u8) {
        self.value = value;
    }

    fn get_value(&self) -> u8 {
        self.value
    }

    fn tick(&mut self) {
        self.value = self.value.saturating_sub(1);
    }
}

/// The amount of work a single `advance` call is worth.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Budget {
    /// Instruction cycles to execute.
    pub cycles: u64,
    /// Times the timers have to count down, a timer never needs more
    /// than `u8::MAX`.
    pub ticks: u8,
}

/// Converts wall clock deltas into instruction cycles and timer ticks.
///
/// The timer side keeps the remainder between calls, so the tick rate does
/// not depend on how often or how irregularly the driver calls in.
/// The remainder is stored scaled by the timer rate, which keeps whole
/// seconds exact (`1000 ms * 60 Hz` is exactly `60` ticks).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pacer {
    config: Config,
    /// elapsed milliseconds times timer hertz, not yet turned into ticks
    remainder: f64,
}

impl Pacer {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            remainder: 0.0,
        }
    }

    pub fn config(&self) -> Config {
        self.config
    }

    pub fn set_clock_hz(&mut self, clock_hz: u32) {
        self.config.clock_hz = clock_hz;
    }

    /// Drops any accumulated timer remainder.
    pub fn reset(&mut self) {
        self.remainder = 0.0;
    }

    /// Will account for `elapsed_ms` milliseconds of wall clock time.
    ///
    /// Negative or non finite values count as zero. At least one cycle is
    /// always granted, so even a zero delta makes progress.
    pub fn advance(&mut self, elapsed_ms: f64) -> Budget {
        let elapsed_ms = if elapsed_ms.is_finite() && elapsed_ms > 0.0 {
            elapsed_ms
        } else {
            0.0
        };

        let clock_hz = f64::from(self.config.clock_hz.max(1));
        let cycles = (elapsed_ms * clock_hz / timer::MILLIS_PER_SECOND).floor() as u64;

        let timer_hz = f64::from(self.config.timer_hz.max(1));
        self.remainder += elapsed_ms * timer_hz;

        let whole = (self.remainder / timer::MILLIS_PER_SECOND).floor();
        self.remainder = self.remainder.rem_euclid(timer::MILLIS_PER_SECOND);
        let ticks = whole.min(f64::from(u8::MAX)) as u8;

        Budget {
            cycles: cycles.max(1),
            ticks,
        }
    }
}

impl Default for Pacer {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timer_floors_at_zero() {
        let mut timer = Timer::new(2);
        timer.tick();
        assert_eq!(timer.get_value(), 1);
        timer.tick();
        timer.tick();
        assert_eq!(timer.get_value(), 0);

        timer.set_value(0xFF);
        assert_eq!(timer.get_value(), 0xFF);
    }

    #[test]
    fn test_whole_second_is_sixty_ticks() {
        let mut pacer = Pacer::default();
        let budget = pacer.advance(1000.0);
        assert_eq!(budget.ticks, 60);
        assert_eq!(budget.cycles, 700);
    }

    #[test]
    fn test_ticks_independent_of_call_frequency() {
        let mut pacer = Pacer::default();
        let ticks: u32 = (0..60)
            .map(|_| u32::from(pacer.advance(16.67).ticks))
            .sum();
        assert_eq!(ticks, 60);

        let mut pacer = Pacer::default();
        let ticks: u32 = (0..60)
            .map(|_| u32::from(pacer.advance(1000.0 / 60.0).ticks))
            .sum();
        assert_eq!(ticks, 60);
    }

    #[test]
    fn test_remainder_carries_over() {
        let mut pacer = Pacer::default();
        // 10 ms is not enough for a single tick
        assert_eq!(pacer.advance(10.0).ticks, 0);
        // 20 ms in total are
        assert_eq!(pacer.advance(10.0).ticks, 1);
        // several ticks inside of a single call
        assert_eq!(pacer.advance(50.0).ticks, 3);
    }

    #[test]
    fn test_cycles_at_least_one() {
        let mut pacer = Pacer::default();
        assert_eq!(pacer.advance(0.0).cycles, 1);
        assert_eq!(pacer.advance(1.0).cycles, 1);
        assert_eq!(pacer.advance(10.0).cycles, 7);

        pacer.set_clock_hz(1000);
        assert_eq!(pacer.advance(10.0).cycles, 10);
    }

    #[test]
    fn test_invalid_elapsed_is_clamped() {
        let mut pacer = Pacer::default();
        let budget = pacer.advance(-500.0);
        assert_eq!(budget, Budget { cycles: 1, ticks: 0 });

        let budget = pacer.advance(f64::NAN);
        assert_eq!(budget, Budget { cycles: 1, ticks: 0 });

        // the negative value must not have eaten into the remainder
        assert_eq!(pacer.advance(1000.0).ticks, 60);
    }

    #[test]
    fn test_huge_elapsed_is_capped() {
        let mut pacer = Pacer::default();
        // five minutes are far more ticks than any timer can hold
        assert_eq!(pacer.advance(300_000.0).ticks, u8::MAX);
        assert_eq!(pacer.advance(7.2e10).ticks, u8::MAX);
        assert_eq!(pacer.advance(1e300).ticks, u8::MAX);

        // the remainder stays usable afterwards
        let mut pacer = Pacer::default();
        pacer.advance(7.2e10);
        assert!(pacer.advance(1000.0).ticks >= 59);
    }
}
