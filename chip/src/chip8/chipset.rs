use std::convert::TryFrom;

use {
    crate::{
        definitions::{cpu, display, memory, Config},
        devices::{InputState, Keyboard},
        display::FrameBuffer,
        opcode::{self, ChipOpcodes, Instruction, Opcode, Operation, ProgramCounter, ProgramCounterStep},
        timer::{Pacer, Timed, Timer},
        ProcessError, RomError, StackError,
    },
    rand::RngCore,
    tinyvec::ArrayVec,
};

/// The amount of rom bytes that fit between the program start and the end of memory.
pub const ROM_CAPACITY: usize = memory::SIZE - cpu::PROGRAM_COUNTER as usize;

/// The ChipSet struct represents the current state
/// of the system, it contains all the structures
/// needed for emulating an instant on the
/// Chip8 CPU.
pub struct ChipSet {
    /// the last fetched instruction, stored big-endian in memory
    pub(super) opcode: Opcode,
    /// - `0x000-0x1FF` - Chip 8 interpreter (contains font set in emu)
    /// - `0x000-0x04F` - Used for the built in `4x5` pixel font set (`0-F`)
    /// - `0x200-0xFFF` - Program ROM and work RAM
    pub(super) memory: [u8; memory::SIZE],
    /// `8-bit` data registers named `V0` to `VF`. The `VF` register doubles as a flag for some
    /// instructions. In an addition operation, `VF` is the carry flag, while in subtraction, it
    /// is the "no borrow" flag. In the draw instruction `VF` is set upon pixel collision.
    pub(super) registers: [u8; cpu::register::SIZE],
    /// The index for the register, this is a special register entry
    /// called index `I`
    pub(super) index_register: u16,
    /// The address of the next instruction to be executed from memory.
    pub(super) program_counter: u16,
    /// The stack is only used to store return addresses when subroutines are called. The original
    /// [RCA 1802](https://de.wikipedia.org/wiki/RCA1802) version allocated `48` bytes for up to
    /// `12` levels of nesting; modern implementations usually have more.
    /// (here we are using `16`, the length doubles as the stack pointer)
    pub(super) stack: ArrayVec<[u16; cpu::stack::SIZE]>,
    /// Delay timer: This timer is intended to be used for timing the events of games. Its value
    /// can be set and read.
    pub(super) delay_timer: Timer,
    /// Sound timer: This timer is used for sound effects. When its value is nonzero, a beeping
    /// sound would be made.
    pub(super) sound_timer: Timer,
    pub(super) display: FrameBuffer,
    pub(super) keyboard: Keyboard,
    /// Splits elapsed time into instruction cycles and timer ticks.
    pub(super) pacer: Pacer,
    /// The rom image as it was handed in, used to reload.
    pub(super) rom: Option<Box<[u8]>>,
    pub(super) loaded: bool,
    /// Set whenever an instruction changed the framebuffer.
    pub(super) redraw: bool,
    /// This stores the random number generator, used by the chipset.
    /// It is stored into the chipset, so as to enable simple mocking
    /// of the given type.
    pub(super) rng: Box<dyn RngCore + Send>,
}

impl ChipSet {
    /// will create a new chipset object without a rom
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// will create a new chipset object with the given configuration
    pub fn with_config(config: Config) -> Self {
        let mut chip = Self {
            opcode: 0,
            memory: [0; memory::SIZE],
            registers: [0; cpu::register::SIZE],
            index_register: 0,
            program_counter: cpu::PROGRAM_COUNTER,
            stack: ArrayVec::new(),
            delay_timer: Timer::new(0),
            sound_timer: Timer::new(0),
            display: FrameBuffer::new(),
            keyboard: Keyboard::new(),
            pacer: Pacer::new(config),
            rom: None,
            loaded: false,
            redraw: false,
            rng: Box::new(rand::rngs::OsRng),
        };
        chip.reset();
        chip
    }

    /// Will replace the random number generator used by `CXNN`.
    pub fn with_rng<R>(mut self, rng: R) -> Self
    where
        R: RngCore + Send + 'static,
    {
        self.rng = Box::new(rng);
        self
    }

    /// Will put every part of the machine back into its initial state and
    /// write the font set. The retained rom is kept for
    /// [`reload`](ChipSet::reload), but the machine stops running until a
    /// rom is loaded again.
    pub fn reset(&mut self) {
        self.opcode = 0;
        self.memory = [0; memory::SIZE];
        let font = usize::from(display::fontset::LOCATION);
        self.memory[font..(font + display::fontset::FONTSET.len())]
            .copy_from_slice(&display::fontset::FONTSET);

        self.registers = [0; cpu::register::SIZE];
        self.index_register = 0;
        self.program_counter = cpu::PROGRAM_COUNTER;
        self.stack.clear();
        self.delay_timer.set_value(0);
        self.sound_timer.set_value(0);
        self.display.clear();
        self.keyboard.reset();
        self.pacer.reset();
        self.loaded = false;
        self.redraw = true;
    }

    /// Will reset the machine and load the rom into memory starting at `0x200`.
    ///
    /// A rom larger than the memory after `0x200` is truncated. The
    /// truncated image is loaded and runnable, the error only reports that
    /// bytes were left out.
    pub fn load(&mut self, rom: &[u8]) -> Result<(), RomError> {
        self.rom = Some(rom.into());
        self.load_image()
    }

    /// Will load the last rom again, does nothing if there never was one.
    pub fn reload(&mut self) -> Result<(), RomError> {
        if self.rom.is_none() {
            log::debug!("reload without a rom, nothing to do");
            return Ok(());
        }
        self.load_image()
    }

    fn load_image(&mut self) -> Result<(), RomError> {
        self.reset();

        let rom = match &self.rom {
            Some(rom) => rom,
            None => return Ok(()),
        };

        let start = usize::from(cpu::PROGRAM_COUNTER);
        let len = rom.len().min(ROM_CAPACITY);
        self.memory[start..(start + len)].copy_from_slice(&rom[..len]);
        self.loaded = true;

        log::info!("loaded rom of {} bytes", len);

        if rom.len() > ROM_CAPACITY {
            let err = RomError::TooLarge {
                len: rom.len(),
                max: ROM_CAPACITY,
            };
            log::warn!("{}", err);
            return Err(err);
        }
        Ok(())
    }

    /// Will run the machine for `elapsed_ms` milliseconds of wall clock time.
    ///
    /// Executes `max(1, elapsed_ms * clock_hz / 1000)` instructions, fewer if
    /// an instruction starts waiting for a key, and counts both timers down
    /// at their fixed rate. Errors of single instructions are logged and
    /// skipped. Does nothing while no rom is loaded.
    pub fn advance(&mut self, elapsed_ms: f64) {
        if !self.loaded {
            return;
        }

        let budget = self.pacer.advance(elapsed_ms);

        for _ in 0..budget.cycles {
            if self.keyboard.is_waiting() {
                break;
            }

            if let Err(err) = self.fetch_decode_execute() {
                log::warn!(
                    "skipping {:#06X} before {:#05X}: {}",
                    self.opcode,
                    self.program_counter,
                    err
                );
            }
        }

        for _ in 0..budget.ticks {
            self.delay_timer.tick();
            self.sound_timer.tick();
        }
    }

    /// will advance the program by a single instruction
    ///
    /// The program counter is moved past the instruction before it runs, so a
    /// failing instruction is skipped on the next call. While waiting for a
    /// key nothing is executed and `Operation::Wait` is returned.
    pub fn fetch_decode_execute(&mut self) -> Result<Operation, ProcessError> {
        if self.keyboard.is_waiting() {
            return Ok(Operation::Wait);
        }

        self.opcode = opcode::fetch(&self.memory, self.program_counter);
        self.step(ProgramCounterStep::Skip);

        let instruction = Instruction::try_from(self.opcode)?;
        log::debug!("{:#06X} {:?}", self.opcode, instruction);

        let operation = self.calc(&instruction)?;
        if operation == Operation::Draw {
            self.redraw = true;
        }
        Ok(operation)
    }

    /// Will set the state of a single key, keys outside of `0x0..=0xF` are ignored.
    ///
    /// A press while the machine waits for a key stores the key in the waiting
    /// register and lets the machine continue.
    pub fn set_key_state(&mut self, key: usize, pressed: bool) {
        if let Some((register, key)) = self.keyboard.set_key(key, pressed) {
            log::debug!("key {:#X} resolved the wait on V{:X}", key, register);
            self.registers[register] = key;
        }
    }

    /// Will get the current state of the keyboard
    pub fn get_keyboard(&self) -> &[bool] {
        self.keyboard.get_keys()
    }

    /// Will return whether the machine runs or waits for a key.
    pub fn input_state(&self) -> InputState {
        self.keyboard.state()
    }

    /// Will return true while `FX0A` waits for a key press.
    pub fn is_waiting(&self) -> bool {
        self.keyboard.is_waiting()
    }

    /// Will return true once a rom was loaded and until the next reset.
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// will return the sound timer
    pub fn get_sound_timer(&self) -> u8 {
        self.sound_timer.get_value()
    }

    /// will return the delay timer
    pub fn get_delay_timer(&self) -> u8 {
        self.delay_timer.get_value()
    }

    /// True while the sound timer is running, a host may beep meanwhile.
    pub fn is_sound_active(&self) -> bool {
        self.sound_timer.get_value() > 0
    }

    /// Will return the current framebuffer.
    pub fn get_display(&self) -> &FrameBuffer {
        &self.display
    }

    /// Will return whether the framebuffer changed since the last call and
    /// clear the flag.
    pub fn take_redraw(&mut self) -> bool {
        std::mem::replace(&mut self.redraw, false)
    }

    /// Will return the registers `V0` to `VF`.
    pub fn get_registers(&self) -> &[u8] {
        &self.registers
    }

    /// Will return the index register `I`.
    pub fn get_index_register(&self) -> u16 {
        self.index_register
    }

    /// Will return the address of the next instruction.
    pub fn get_program_counter(&self) -> u16 {
        self.program_counter
    }

    /// Will return the whole memory, font set and rom included.
    pub fn get_memory(&self) -> &[u8] {
        &self.memory
    }

    /// Will return the amount of active subroutine calls.
    pub fn stack_depth(&self) -> usize {
        self.stack.len()
    }

    /// Will return the current clock and timer rates.
    pub fn config(&self) -> Config {
        self.pacer.config()
    }

    /// Will change the instruction rate, the timers are not affected.
    pub fn set_clock_hz(&mut self, clock_hz: u32) {
        self.pacer.set_clock_hz(clock_hz);
    }

    /// Will push the return address to the stack,
    /// the 17th nested call is rejected.
    pub(super) fn push_stack(&mut self, pointer: u16) -> Result<(), StackError> {
        self.stack.try_push(pointer).map_or(Ok(()), |_| Err(StackError::Full))
    }

    /// Will pop the last return address from the stack
    pub(super) fn pop_stack(&mut self) -> Result<u16, StackError> {
        self.stack.pop().ok_or(StackError::Empty)
    }
}

impl Default for ChipSet {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgramCounter for ChipSet {
    fn step(&mut self, step: ProgramCounterStep) {
        self.program_counter = step.apply(self.program_counter);
    }
}
