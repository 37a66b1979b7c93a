use crate::{definitions::keyboard, display::FrameBuffer};

#[cfg_attr(test, mockall::automock)]
/// The traits responsible for the display based code
pub trait DisplayCommands {
    /// Will show the current framebuffer, the buffer can only be read.
    fn display(&mut self, frame: &FrameBuffer);
}

#[cfg_attr(test, mockall::automock)]
/// The trait responsible for handing key events to the machine
pub trait KeyboardCommands {
    /// Will return the next pending key event, `None` once all were handed out.
    fn poll_key(&mut self) -> Option<KeyEvent>;
}

/// A single change of a key on the hex keypad.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: usize,
    pub pressed: bool,
}

impl KeyEvent {
    pub fn press(key: usize) -> Self {
        Self { key, pressed: true }
    }

    pub fn release(key: usize) -> Self {
        Self {
            key,
            pressed: false,
        }
    }
}

/// Whether the machine runs or waits for a key press (`FX0A`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputState {
    Normal,
    /// Waiting for any key, the key gets stored into the given register
    AwaitingKey(usize),
}

impl Default for InputState {
    fn default() -> Self {
        InputState::Normal
    }
}

/// Will store the state of the hex keyboard.
///
/// Input is done with a hex keyboard that has 16 keys ranging `0-F`. The `8`, `4`, `6`, and
/// `2` keys are typically used for directional input. Three opcodes are used to detect input.
/// One skips an instruction if a specific key is pressed, while another does the same if a
/// specific key is not pressed. The third waits for a key press, and then stores it in one of
/// the data registers.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct Keyboard {
    keys: [bool; keyboard::SIZE],
    state: InputState,
}

impl Keyboard {
    pub fn new() -> Self {
        Keyboard::default()
    }

    /// Will release every key and leave any wait.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Will set the state of a key.
    ///
    /// Keys outside of `0x0..=0xF` are ignored. If the keyboard is waiting
    /// and the key was pressed, the wait resolves and the register that
    /// waited is returned together with the key.
    pub fn set_key(&mut self, key: usize, pressed: bool) -> Option<(usize, u8)> {
        if key >= keyboard::SIZE {
            log::debug!("ignoring key {:#X} out of range", key);
            return None;
        }

        self.keys[key] = pressed;

        match self.state {
            InputState::AwaitingKey(register) if pressed => {
                self.state = InputState::Normal;
                Some((register, key as u8))
            }
            _ => None,
        }
    }

    /// Will check a key, only the low nibble of `key` is used.
    pub fn is_pressed(&self, key: u8) -> bool {
        self.keys[usize::from(key & 0xF)]
    }

    pub fn get_keys(&self) -> &[bool] {
        &self.keys
    }

    /// Will suspend the machine until a key is pressed.
    pub fn await_key(&mut self, register: usize) {
        self.state = InputState::AwaitingKey(register);
    }

    pub fn state(&self) -> InputState {
        self.state
    }

    pub fn is_waiting(&self) -> bool {
        matches!(self.state, InputState::AwaitingKey(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_read_keys() {
        let mut kb = Keyboard::new();
        assert_eq!(kb.set_key(0xA, true), None);
        assert!(kb.is_pressed(0xA));
        // only the low nibble counts
        assert!(kb.is_pressed(0xFA));

        kb.set_key(0xA, false);
        assert!(!kb.is_pressed(0xA));
    }

    #[test]
    fn test_out_of_range_is_ignored() {
        let mut kb = Keyboard::new();
        kb.await_key(0x3);
        assert_eq!(kb.set_key(keyboard::SIZE, true), None);
        assert_eq!(kb.get_keys(), &[false; keyboard::SIZE]);
        assert!(kb.is_waiting());
    }

    #[test]
    fn test_press_resolves_wait() {
        let mut kb = Keyboard::new();
        kb.await_key(0x3);
        assert_eq!(kb.state(), InputState::AwaitingKey(0x3));

        // releases never resolve
        assert_eq!(kb.set_key(0x5, false), None);
        assert!(kb.is_waiting());

        assert_eq!(kb.set_key(0x5, true), Some((0x3, 0x5)));
        assert_eq!(kb.state(), InputState::Normal);

        // a second press does not report anything
        assert_eq!(kb.set_key(0x6, true), None);
    }

    #[test]
    fn test_reset() {
        let mut kb = Keyboard::new();
        kb.set_key(0x1, true);
        kb.await_key(0x2);
        kb.reset();
        assert_eq!(kb, Keyboard::default());
    }
}
