use std::time::{Duration, Instant};

use crate::{
    chip8::ChipSet,
    devices::{DisplayCommands, KeyboardCommands},
    RomError,
};

/// Drives a [`ChipSet`] from a host loop.
///
/// Every tick hands the pending key events to the machine, runs it for the
/// elapsed time and shows the framebuffer if it changed.
pub struct Runner<D, K>
where
    D: DisplayCommands,
    K: KeyboardCommands,
{
    chip: ChipSet,
    display: D,
    keyboard: K,
    last_tick: Option<Instant>,
}

impl<D, K> Runner<D, K>
where
    D: DisplayCommands,
    K: KeyboardCommands,
{
    pub fn new(chip: ChipSet, display: D, keyboard: K) -> Self {
        Self {
            chip,
            display,
            keyboard,
            last_tick: None,
        }
    }

    /// Will load the rom into the machine, see [`ChipSet::load`].
    pub fn load(&mut self, rom: &[u8]) -> Result<(), RomError> {
        self.last_tick = None;
        self.chip.load(rom)
    }

    /// Will run the machine for the time passed since the last tick.
    ///
    /// The first tick counts as zero elapsed time. Returns true if the
    /// display was redrawn.
    pub fn tick(&mut self) -> bool {
        let now = Instant::now();
        let elapsed = self
            .last_tick
            .map(|last| now.duration_since(last))
            .unwrap_or_default();
        self.last_tick = Some(now);

        self.tick_with(elapsed)
    }

    /// Will run the machine for the given time. Returns true if the display
    /// was redrawn.
    pub fn tick_with(&mut self, elapsed: Duration) -> bool {
        while let Some(event) = self.keyboard.poll_key() {
            self.chip.set_key_state(event.key, event.pressed);
        }

        self.chip.advance(elapsed.as_secs_f64() * 1000.0);

        if self.chip.take_redraw() {
            self.display.display(self.chip.get_display());
            return true;
        }
        false
    }

    pub fn chip(&self) -> &ChipSet {
        &self.chip
    }

    pub fn chip_mut(&mut self) -> &mut ChipSet {
        &mut self.chip
    }

    /// Will hand back the parts of the runner.
    pub fn into_inner(self) -> (ChipSet, D, K) {
        (self.chip, self.display, self.keyboard)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        devices::{KeyEvent, MockDisplayCommands, MockKeyboardCommands},
        display::FrameBuffer,
    };

    fn keyboard_with(events: Vec<KeyEvent>) -> MockKeyboardCommands {
        let mut events = events.into_iter();
        let mut keyboard = MockKeyboardCommands::new();
        keyboard.expect_poll_key().returning(move || events.next());
        keyboard
    }

    #[test]
    fn test_draw_reaches_display() {
        // I = glyph 0, draw at (V0, V1), loop
        let rom = [0xA0, 0x00, 0xD0, 0x15, 0x12, 0x04];

        let mut display = MockDisplayCommands::new();
        // once for the fresh load, once for the sprite
        display
            .expect_display()
            .withf(|frame: &FrameBuffer| frame.is_blank())
            .times(1)
            .returning(|_| ());
        display
            .expect_display()
            .withf(|frame: &FrameBuffer| frame.lit() == 14)
            .times(1)
            .returning(|_| ());

        let mut runner = Runner::new(ChipSet::new(), display, keyboard_with(vec![]));
        assert_eq!(runner.load(&rom), Ok(()));

        // the first instruction does not draw, but the load asks for a redraw
        assert!(runner.tick_with(Duration::from_millis(0)));
        assert!(runner.tick_with(Duration::from_millis(10)));
        // the loop does not draw anymore
        assert!(!runner.tick_with(Duration::from_millis(10)));
    }

    #[test]
    fn test_key_events_resolve_wait() {
        // wait for a key in V3, loop
        let rom = [0xF3, 0x0A, 0x12, 0x02];

        let mut display = MockDisplayCommands::new();
        display.expect_display().returning(|_| ());

        let mut runner = Runner::new(ChipSet::new(), display, keyboard_with(vec![]));
        assert_eq!(runner.load(&rom), Ok(()));
        runner.tick_with(Duration::from_millis(10));
        assert!(runner.chip().is_waiting());

        let (chip, display, _) = runner.into_inner();
        let keyboard = keyboard_with(vec![KeyEvent::release(0x2), KeyEvent::press(0x7)]);
        let mut runner = Runner::new(chip, display, keyboard);

        runner.tick_with(Duration::from_millis(10));
        assert!(!runner.chip().is_waiting());
        assert_eq!(runner.chip().get_registers()[0x3], 0x7);
        assert_eq!(runner.chip().get_program_counter(), 0x202);
    }

    #[test]
    fn test_nothing_loaded() {
        let mut display = MockDisplayCommands::new();
        display.expect_display().times(1).returning(|_| ());

        let mut runner = Runner::new(ChipSet::new(), display, keyboard_with(vec![]));
        // a fresh machine shows its blank screen once
        assert!(runner.tick());
        assert!(!runner.tick());
        assert!(!runner.chip().is_loaded());
    }
}
